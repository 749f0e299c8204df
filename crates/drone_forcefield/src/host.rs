//! Interfaces the host platform provides to a forcefield

use crate::config::NotificationTarget;
use crate::notify::FieldEvent;
use forcefield_math::{Quat, Vec3};
use forcefield_triggers::{ActorId, EntityId};

/// Access to the drone a field acts on.
///
/// Reads may fail (the drone may be mid-spawn or owned elsewhere this
/// step); writes are trusted.
pub trait DroneBody {
    /// Host id, compared against trigger callbacks
    fn id(&self) -> EntityId;

    fn try_position(&self) -> Option<Vec3>;

    fn try_rotation(&self) -> Option<Quat>;

    fn try_velocity(&self) -> Option<Vec3>;

    fn set_velocity(&mut self, velocity: Vec3);

    /// Move and rotate in one update that a physics step cannot observe
    /// half-applied
    fn teleport_to(&mut self, position: Vec3, rotation: Quat);
}

/// Resolves the local player and their drone when a field activates
pub trait EntityLookup {
    type Body: DroneBody;

    fn local_actor(&self) -> Option<ActorId>;

    fn local_drone(&self) -> Option<Self::Body>;
}

/// Delivers enter/exit notifications to other behaviours
pub trait NotificationSink {
    /// Concrete receiver a target name resolves to
    type Receiver;

    fn resolve(&self, target: &NotificationTarget) -> Option<Self::Receiver>;

    /// Fire-and-forget delivery
    fn notify(&mut self, receiver: &Self::Receiver, event: FieldEvent);
}

/// Sink for fields nobody listens to
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNotifications;

impl NotificationSink for NoNotifications {
    type Receiver = ();

    fn resolve(&self, _target: &NotificationTarget) -> Option<()> {
        None
    }

    fn notify(&mut self, _receiver: &(), _event: FieldEvent) {}
}
