//! Teleport planning

use crate::config::TeleportSettings;
use forcefield_math::{Pose, Quat};

/// Everything needed to apply one teleport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeleportPlan {
    /// Zero velocity before moving
    pub reset_velocity: bool,
    /// Final position and rotation, applied in one call
    pub pose: Pose,
    /// The drone's rotation was requested but could not be read, so the
    /// destination rotation is used instead
    pub rotation_fallback: bool,
}

/// Plan a teleport. `None` when no destination is configured.
pub fn plan(settings: &TeleportSettings, current_rotation: Option<Quat>) -> Option<TeleportPlan> {
    let destination = settings.destination?;

    let (rotation, rotation_fallback) = match (settings.keep_rotation, current_rotation) {
        (true, Some(rotation)) => (rotation, false),
        (true, None) => (destination.rotation, true),
        (false, _) => (destination.rotation, false),
    };

    Some(TeleportPlan {
        reset_velocity: settings.reset_velocity,
        pose: destination.with_rotation(rotation),
        rotation_fallback,
    })
}
