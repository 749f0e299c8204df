//! Forcefield Triggers - Reference Trigger Source
//!
//! The forcefield controller only reacts to trigger callbacks; something has
//! to detect overlaps and deliver them. This crate is that something for
//! headless hosts, simulations, and tests.
//!
//! # Features
//!
//! - Volume shapes (box, sphere, capsule, cylinder) placed by a full
//!   [`Transform`](forcefield_math::Transform)
//! - Separate tracking of actors (players) and entities (drones)
//! - Enter/Exit/Stay events delivered through [`TriggerCallbacks`]
//!
//! # Example
//!
//! ```ignore
//! use forcefield_triggers::prelude::*;
//!
//! let mut system = TriggerSystem::new();
//! system.register_trigger(1, TriggerComponent::new(TriggerVolume::cube(4.0)).with_stay_events());
//!
//! system.update(0.02, &[(1, field_transform)], &occupants);
//! system.dispatch(1, &mut controller);
//! ```

pub mod events;
pub mod occupant;
pub mod system;
pub mod trigger;
pub mod volume;

pub mod prelude {
    pub use crate::events::{TriggerCallbacks, TriggerEvent, TriggerEventType};
    pub use crate::occupant::{ActorId, EntityId, Occupant, TrackedOccupant};
    pub use crate::system::TriggerSystem;
    pub use crate::trigger::TriggerComponent;
    pub use crate::volume::TriggerVolume;
}

pub use prelude::*;
