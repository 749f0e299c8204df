//! Trigger system for processing overlaps

use crate::events::{TriggerCallbacks, TriggerEvent};
use crate::occupant::TrackedOccupant;
use crate::trigger::TriggerComponent;
use forcefield_math::Transform;
use std::collections::{BTreeMap, HashSet};

/// The trigger system that steps all registered triggers
pub struct TriggerSystem {
    /// Registered triggers (trigger id -> component)
    triggers: BTreeMap<u64, TriggerComponent>,
    /// Current simulation time
    current_time: f32,
    /// Collected events from last update
    last_events: Vec<TriggerEvent>,
}

impl TriggerSystem {
    /// Create a new trigger system
    pub fn new() -> Self {
        Self {
            triggers: BTreeMap::new(),
            current_time: 0.0,
            last_events: Vec::new(),
        }
    }

    /// Register a trigger
    pub fn register_trigger(&mut self, trigger_id: u64, trigger: TriggerComponent) {
        self.triggers.insert(trigger_id, trigger);
    }

    /// Unregister a trigger
    pub fn unregister_trigger(&mut self, trigger_id: u64) -> Option<TriggerComponent> {
        self.triggers.remove(&trigger_id)
    }

    /// Get a trigger
    pub fn get_trigger(&self, trigger_id: u64) -> Option<&TriggerComponent> {
        self.triggers.get(&trigger_id)
    }

    /// Get a mutable trigger
    pub fn get_trigger_mut(&mut self, trigger_id: u64) -> Option<&mut TriggerComponent> {
        self.triggers.get_mut(&trigger_id)
    }

    /// Current simulation time
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Step the trigger system
    ///
    /// # Arguments
    /// * `delta_time` - Time since last update
    /// * `placements` - World transform of each trigger to evaluate
    /// * `occupants` - Everything that can occupy a trigger this step
    ///
    /// Events follow the order of `occupants`. Occupants that were inside
    /// but are missing from `occupants` (despawned) exit afterwards.
    pub fn update(
        &mut self,
        delta_time: f32,
        placements: &[(u64, Transform)],
        occupants: &[TrackedOccupant],
    ) {
        self.current_time += delta_time;
        self.last_events.clear();

        for (trigger_id, transform) in placements {
            let Some(trigger) = self.triggers.get_mut(trigger_id) else {
                log::debug!("No trigger registered for placement {}", trigger_id);
                continue;
            };

            let mut seen = HashSet::with_capacity(occupants.len());
            for tracked in occupants {
                seen.insert(tracked.occupant);
                let is_overlapping = trigger
                    .volume
                    .contains_point_transformed(tracked.position, transform);
                trigger.process_overlap(
                    *trigger_id,
                    tracked.occupant,
                    is_overlapping,
                    self.current_time,
                );
            }

            let vanished: Vec<_> = trigger.overlapping().filter(|o| !seen.contains(o)).collect();
            for occupant in vanished {
                trigger.process_overlap(*trigger_id, occupant, false, self.current_time);
            }

            trigger.update(*trigger_id, delta_time, self.current_time);
            self.last_events.extend(trigger.drain_events());
        }
    }

    /// Get events from the last update
    pub fn events(&self) -> &[TriggerEvent] {
        &self.last_events
    }

    /// Drain events from the last update
    pub fn drain_events(&mut self) -> Vec<TriggerEvent> {
        std::mem::take(&mut self.last_events)
    }

    /// Deliver the last update's events for `trigger_id` to `callbacks`.
    /// Returns the number of events delivered.
    pub fn dispatch<C: TriggerCallbacks + ?Sized>(
        &self,
        trigger_id: u64,
        callbacks: &mut C,
    ) -> usize {
        let mut delivered = 0;
        for event in self.last_events.iter().filter(|e| e.trigger_id == trigger_id) {
            event.dispatch(callbacks);
            delivered += 1;
        }
        delivered
    }

    /// Get all trigger ids
    pub fn trigger_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.triggers.keys().copied()
    }

    /// Get trigger count
    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }
}

impl Default for TriggerSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TriggerEventType;
    use crate::occupant::{ActorId, EntityId, Occupant};
    use crate::volume::TriggerVolume;
    use forcefield_math::Vec3;

    const DRONE: EntityId = EntityId(2);

    fn origin() -> Vec<(u64, Transform)> {
        vec![(1, Transform::IDENTITY)]
    }

    #[test]
    fn test_trigger_system() {
        let mut system = TriggerSystem::new();
        system.register_trigger(1, TriggerComponent::new(TriggerVolume::sphere(1.0)));

        assert_eq!(system.trigger_count(), 1);
        assert!(system.get_trigger(1).is_some());
        assert!(system.unregister_trigger(1).is_some());
        assert_eq!(system.trigger_count(), 0);
    }

    #[test]
    fn test_enter_stay_exit_sequence() {
        let mut system = TriggerSystem::new();
        system.register_trigger(
            1,
            TriggerComponent::new(TriggerVolume::sphere(1.0)).with_stay_events(),
        );

        let inside = [TrackedOccupant::entity(DRONE, Vec3::new(0.5, 0.0, 0.0))];
        let outside = [TrackedOccupant::entity(DRONE, Vec3::new(5.0, 0.0, 0.0))];

        let mut kinds = Vec::new();
        for occupants in [&inside, &inside, &inside, &outside] {
            system.update(0.02, &origin(), occupants);
            kinds.extend(system.events().iter().map(|e| e.event_type));
        }

        assert_eq!(
            kinds,
            vec![
                TriggerEventType::Enter,
                TriggerEventType::Stay,
                TriggerEventType::Stay,
                TriggerEventType::Exit,
            ]
        );
    }

    #[test]
    fn test_vanished_occupant_exits() {
        let mut system = TriggerSystem::new();
        system.register_trigger(1, TriggerComponent::new(TriggerVolume::sphere(1.0)));

        system.update(0.02, &origin(), &[TrackedOccupant::entity(DRONE, Vec3::ZERO)]);
        system.update(0.02, &origin(), &[]);

        let events = system.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_exit());
        assert!(!system.get_trigger(1).unwrap().is_inside(Occupant::Entity(DRONE)));
    }

    #[test]
    fn test_events_follow_occupant_order() {
        let mut system = TriggerSystem::new();
        system.register_trigger(1, TriggerComponent::new(TriggerVolume::cube(2.0)));

        let occupants = [
            TrackedOccupant::entity(DRONE, Vec3::ZERO),
            TrackedOccupant::actor(ActorId(7), Vec3::new(0.5, 0.0, 0.0)),
        ];
        system.update(0.02, &origin(), &occupants);

        let order: Vec<_> = system.events().iter().map(|e| e.occupant).collect();
        assert_eq!(order, vec![Occupant::Entity(DRONE), Occupant::Actor(ActorId(7))]);
    }

    #[test]
    fn test_dispatch_filters_by_trigger() {
        struct Count(u32);
        impl TriggerCallbacks for Count {
            fn on_actor_enter(&mut self, _: ActorId) {}
            fn on_actor_exit(&mut self, _: ActorId) {}
            fn on_entity_enter(&mut self, _: EntityId) {
                self.0 += 1;
            }
            fn on_entity_exit(&mut self, _: EntityId) {}
            fn on_entity_stay(&mut self, _: EntityId) {}
        }

        let mut system = TriggerSystem::new();
        system.register_trigger(1, TriggerComponent::new(TriggerVolume::sphere(1.0)));
        system.register_trigger(2, TriggerComponent::new(TriggerVolume::sphere(1.0)));

        let placements = vec![
            (1, Transform::IDENTITY),
            (2, Transform::from_position(Vec3::new(10.0, 0.0, 0.0))),
        ];
        system.update(0.02, &placements, &[TrackedOccupant::entity(DRONE, Vec3::ZERO)]);

        let mut count = Count(0);
        assert_eq!(system.dispatch(1, &mut count), 1);
        assert_eq!(system.dispatch(2, &mut count), 0);
        assert_eq!(count.0, 1);
    }
}
