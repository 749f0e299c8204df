//! Trigger events and the callback interface hosts implement

use crate::occupant::{ActorId, EntityId, Occupant};
use serde::{Deserialize, Serialize};

/// Type of trigger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerEventType {
    /// Occupant entered the trigger volume
    Enter,
    /// Occupant exited the trigger volume
    Exit,
    /// Occupant is still inside the trigger volume (every step after entering)
    Stay,
}

/// A trigger event
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvent {
    /// Type of event
    pub event_type: TriggerEventType,
    /// The trigger that produced the event
    pub trigger_id: u64,
    /// Who entered, stayed, or exited
    pub occupant: Occupant,
    /// Time spent inside so far (zero for enter events)
    pub time_in_trigger: f32,
}

impl TriggerEvent {
    /// Create an enter event
    pub fn enter(trigger_id: u64, occupant: Occupant) -> Self {
        Self {
            event_type: TriggerEventType::Enter,
            trigger_id,
            occupant,
            time_in_trigger: 0.0,
        }
    }

    /// Create an exit event
    pub fn exit(trigger_id: u64, occupant: Occupant, time_spent: f32) -> Self {
        Self {
            event_type: TriggerEventType::Exit,
            trigger_id,
            occupant,
            time_in_trigger: time_spent,
        }
    }

    /// Create a stay event
    pub fn stay(trigger_id: u64, occupant: Occupant, time_spent: f32) -> Self {
        Self {
            event_type: TriggerEventType::Stay,
            trigger_id,
            occupant,
            time_in_trigger: time_spent,
        }
    }

    pub fn is_enter(&self) -> bool {
        self.event_type == TriggerEventType::Enter
    }

    pub fn is_exit(&self) -> bool {
        self.event_type == TriggerEventType::Exit
    }

    pub fn is_stay(&self) -> bool {
        self.event_type == TriggerEventType::Stay
    }

    /// Deliver this event to the matching callback.
    ///
    /// Actors have no stay callback; their stay events are dropped here.
    pub fn dispatch<C: TriggerCallbacks + ?Sized>(&self, callbacks: &mut C) {
        match (self.event_type, self.occupant) {
            (TriggerEventType::Enter, Occupant::Actor(actor)) => callbacks.on_actor_enter(actor),
            (TriggerEventType::Exit, Occupant::Actor(actor)) => callbacks.on_actor_exit(actor),
            (TriggerEventType::Stay, Occupant::Actor(_)) => {}
            (TriggerEventType::Enter, Occupant::Entity(entity)) => {
                callbacks.on_entity_enter(entity)
            }
            (TriggerEventType::Exit, Occupant::Entity(entity)) => callbacks.on_entity_exit(entity),
            (TriggerEventType::Stay, Occupant::Entity(entity)) => callbacks.on_entity_stay(entity),
        }
    }
}

/// Callbacks a trigger source invokes on the behaviour attached to a volume.
///
/// All calls for one receiver arrive on one logical thread, in the order
/// the overlaps changed.
pub trait TriggerCallbacks {
    /// An actor (player) entered the volume
    fn on_actor_enter(&mut self, actor: ActorId);
    /// An actor (player) left the volume
    fn on_actor_exit(&mut self, actor: ActorId);
    /// An entity entered the volume
    fn on_entity_enter(&mut self, entity: EntityId);
    /// An entity left the volume
    fn on_entity_exit(&mut self, entity: EntityId);
    /// An entity is still inside the volume
    fn on_entity_stay(&mut self, entity: EntityId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl TriggerCallbacks for Recorder {
        fn on_actor_enter(&mut self, actor: ActorId) {
            self.calls.push(format!("actor_enter {}", actor.0));
        }
        fn on_actor_exit(&mut self, actor: ActorId) {
            self.calls.push(format!("actor_exit {}", actor.0));
        }
        fn on_entity_enter(&mut self, entity: EntityId) {
            self.calls.push(format!("entity_enter {}", entity.0));
        }
        fn on_entity_exit(&mut self, entity: EntityId) {
            self.calls.push(format!("entity_exit {}", entity.0));
        }
        fn on_entity_stay(&mut self, entity: EntityId) {
            self.calls.push(format!("entity_stay {}", entity.0));
        }
    }

    #[test]
    fn test_event_creation() {
        let event = TriggerEvent::exit(1, Occupant::Entity(EntityId(2)), 1.5);

        assert!(event.is_exit());
        assert_eq!(event.trigger_id, 1);
        assert_eq!(event.occupant, Occupant::Entity(EntityId(2)));
        assert_eq!(event.time_in_trigger, 1.5);
    }

    #[test]
    fn test_dispatch_routes_by_occupant_kind() {
        let mut recorder = Recorder::default();

        TriggerEvent::enter(1, ActorId(7).into()).dispatch(&mut recorder);
        TriggerEvent::stay(1, ActorId(7).into(), 0.1).dispatch(&mut recorder);
        TriggerEvent::enter(1, EntityId(9).into()).dispatch(&mut recorder);
        TriggerEvent::stay(1, EntityId(9).into(), 0.1).dispatch(&mut recorder);
        TriggerEvent::exit(1, EntityId(9).into(), 0.2).dispatch(&mut recorder);
        TriggerEvent::exit(1, ActorId(7).into(), 0.2).dispatch(&mut recorder);

        assert_eq!(
            recorder.calls,
            vec![
                "actor_enter 7",
                "entity_enter 9",
                "entity_stay 9",
                "entity_exit 9",
                "actor_exit 7",
            ]
        );
    }
}
