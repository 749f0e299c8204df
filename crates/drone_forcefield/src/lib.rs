//! Drone Forcefield - Push and Teleport Fields
//!
//! A forcefield is a behaviour attached to a trigger volume. When the local
//! drone enters, stays in, or leaves the volume the field either changes the
//! drone's velocity or teleports it to a fixed destination, and tells other
//! behaviours about enter/exit.
//!
//! # Features
//!
//! - Push away from a point or along a constant (world or local) direction
//! - Additive or overriding pushes
//! - Teleports that keep or replace the drone's rotation
//! - Per-event policy (enter/exit/stay) for both effects
//! - Suppression while the drone's player stands in the field, plus an
//!   external kill-switch
//! - Ordered enter/exit notifications
//! - Offline validation and repair of configurations
//!
//! # Architecture
//!
//! ```text
//!  trigger source ──► TriggerCallbacks ──► ForcefieldController ──► DroneBody
//!  (host or                                 │  push / teleport        (set_velocity,
//!   forcefield_triggers)                    │                          teleport_to)
//!                                           └──► NotificationSink
//! ```
//!
//! Nothing a handler hits at runtime is returned to the host as an error;
//! failures are logged and the affected effect is skipped for that event.
//!
//! # Example
//!
//! ```ignore
//! use drone_forcefield::prelude::*;
//!
//! let config = FieldConfig::push(5.0).with_override_velocity(true);
//! let mut field =
//!     ForcefieldController::initialize(config, Transform::IDENTITY, &host, NoNotifications)?;
//!
//! field.on_entity_enter(drone_id);
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod notify;
pub mod push;
pub mod shared;
pub mod teleport;
pub mod validate;

pub mod prelude {
    //! Common imports for forcefields
    pub use crate::config::{
        EffectFlags, EventPolicy, FieldConfig, FieldMode, GatingSettings, NotificationSettings,
        NotificationTarget, PushSettings, TeleportSettings,
    };
    pub use crate::controller::{
        EffectOutcome, FieldResponse, ForcefieldController, RuntimeState, Suppression,
    };
    pub use crate::error::{ForcefieldError, Result, StateQuery};
    pub use crate::host::{DroneBody, EntityLookup, NoNotifications, NotificationSink};
    pub use crate::notify::{FieldEvent, ReceiverSet};
    pub use crate::shared::SharedController;
    pub use crate::validate::{sanitize, validate, Severity, ValidationIssue, ValidationReport};
    pub use forcefield_math::{Pose, Quat, Transform, Vec3};
    pub use forcefield_triggers::{ActorId, EntityId, TriggerCallbacks};
}

pub use prelude::*;
