//! Controller shared across threads
//!
//! For hosts that deliver trigger callbacks for one field from more than one
//! thread. Each callback holds the lock for its whole guard-effect-notify
//! sequence, so occupancy updates and entity events never interleave.

use crate::controller::{FieldResponse, ForcefieldController};
use crate::host::{DroneBody, NotificationSink};
use forcefield_triggers::{ActorId, EntityId, TriggerCallbacks};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Cloneable, mutex-serialized handle to a [`ForcefieldController`]
pub struct SharedController<B, S>
where
    B: DroneBody,
    S: NotificationSink,
{
    inner: Arc<Mutex<ForcefieldController<B, S>>>,
}

impl<B, S> SharedController<B, S>
where
    B: DroneBody,
    S: NotificationSink,
{
    pub fn new(controller: ForcefieldController<B, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Lock for direct access. The lock is not reentrant: calling any other
    /// method on this handle while the guard is alive deadlocks.
    pub fn lock(&self) -> MutexGuard<'_, ForcefieldController<B, S>> {
        self.inner.lock()
    }

    /// External kill-switch, callable from any thread
    pub fn set_ignore_entity(&self, ignore: bool) {
        self.inner.lock().set_ignore_entity(ignore);
    }

    pub fn entity_enter(&self, entity: EntityId) -> FieldResponse {
        self.inner.lock().entity_enter(entity)
    }

    pub fn entity_exit(&self, entity: EntityId) -> FieldResponse {
        self.inner.lock().entity_exit(entity)
    }

    pub fn entity_stay(&self, entity: EntityId) -> FieldResponse {
        self.inner.lock().entity_stay(entity)
    }

    pub fn actor_enter(&self, actor: ActorId) {
        self.inner.lock().actor_enter(actor);
    }

    pub fn actor_exit(&self, actor: ActorId) {
        self.inner.lock().actor_exit(actor);
    }
}

impl<B, S> Clone for SharedController<B, S>
where
    B: DroneBody,
    S: NotificationSink,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B, S> TriggerCallbacks for SharedController<B, S>
where
    B: DroneBody,
    S: NotificationSink,
{
    fn on_actor_enter(&mut self, actor: ActorId) {
        self.actor_enter(actor);
    }

    fn on_actor_exit(&mut self, actor: ActorId) {
        self.actor_exit(actor);
    }

    fn on_entity_enter(&mut self, entity: EntityId) {
        self.entity_enter(entity);
    }

    fn on_entity_exit(&mut self, entity: EntityId) {
        self.entity_exit(entity);
    }

    fn on_entity_stay(&mut self, entity: EntityId) {
        self.entity_stay(entity);
    }
}

impl<B, S> From<ForcefieldController<B, S>> for SharedController<B, S>
where
    B: DroneBody,
    S: NotificationSink,
{
    fn from(controller: ForcefieldController<B, S>) -> Self {
        Self::new(controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldConfig, GatingSettings};
    use crate::host::{EntityLookup, NoNotifications};
    use forcefield_math::{Quat, Transform, Vec3};
    use std::thread;

    #[derive(Debug, Default)]
    struct CountingDrone {
        velocity_writes: u32,
    }

    impl DroneBody for CountingDrone {
        fn id(&self) -> EntityId {
            EntityId(5)
        }
        fn try_position(&self) -> Option<Vec3> {
            Some(Vec3::new(0.0, 0.0, 2.0))
        }
        fn try_rotation(&self) -> Option<Quat> {
            Some(Quat::IDENTITY)
        }
        fn try_velocity(&self) -> Option<Vec3> {
            Some(Vec3::ZERO)
        }
        fn set_velocity(&mut self, _velocity: Vec3) {
            self.velocity_writes += 1;
        }
        fn teleport_to(&mut self, _position: Vec3, _rotation: Quat) {}
    }

    struct Lookup;

    impl EntityLookup for Lookup {
        type Body = CountingDrone;
        fn local_actor(&self) -> Option<ActorId> {
            Some(ActorId(5))
        }
        fn local_drone(&self) -> Option<CountingDrone> {
            Some(CountingDrone::default())
        }
    }

    fn shared(config: FieldConfig) -> SharedController<CountingDrone, NoNotifications> {
        ForcefieldController::initialize(config, Transform::IDENTITY, &Lookup, NoNotifications)
            .unwrap()
            .into()
    }

    #[test]
    fn test_stays_from_many_threads_all_apply() {
        let field = shared(FieldConfig::default());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let field = field.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        field.entity_stay(EntityId(5));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(field.lock().drone().unwrap().velocity_writes, 100);
    }

    #[test]
    fn test_kill_switch_from_another_thread() {
        let field = shared(FieldConfig::default());

        let remote = field.clone();
        thread::spawn(move || remote.set_ignore_entity(true)).join().unwrap();

        assert!(!field.entity_stay(EntityId(5)).outcome.is_applied());
        assert_eq!(field.lock().drone().unwrap().velocity_writes, 0);
    }

    #[test]
    fn test_scoped_guard_then_callbacks() {
        let field = shared(FieldConfig::default());

        {
            let mut guard = field.lock();
            guard.set_ignore_entity(true);
        }
        // Guard dropped; callbacks can take the lock again
        assert!(!field.entity_stay(EntityId(5)).outcome.is_applied());
        assert!(field.lock().ignore_entity());
    }

    #[test]
    fn test_callbacks_through_trait() {
        let config = FieldConfig::default().with_gating(GatingSettings {
            ignore_if_actor_inside: true,
            ignore_entity: false,
        });
        let mut field = shared(config);

        field.on_actor_enter(ActorId(5));
        field.on_entity_stay(EntityId(5));
        assert_eq!(field.lock().drone().unwrap().velocity_writes, 0);

        field.on_actor_exit(ActorId(5));
        field.on_entity_stay(EntityId(5));
        assert_eq!(field.lock().drone().unwrap().velocity_writes, 1);
    }
}
