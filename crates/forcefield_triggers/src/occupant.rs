//! Things that can occupy a trigger volume

use forcefield_math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Host id of a player/controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

/// Host id of a simulated entity such as a drone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// An actor or an entity. Triggers report the two kinds through separate
/// callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    Actor(ActorId),
    Entity(EntityId),
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actor(id) => id.fmt(f),
            Self::Entity(id) => id.fmt(f),
        }
    }
}

impl From<ActorId> for Occupant {
    fn from(id: ActorId) -> Self {
        Self::Actor(id)
    }
}

impl From<EntityId> for Occupant {
    fn from(id: EntityId) -> Self {
        Self::Entity(id)
    }
}

/// Occupant snapshot fed into [`TriggerSystem::update`](crate::TriggerSystem::update)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedOccupant {
    pub occupant: Occupant,
    /// World position this step
    pub position: Vec3,
}

impl TrackedOccupant {
    pub fn actor(id: ActorId, position: Vec3) -> Self {
        Self {
            occupant: Occupant::Actor(id),
            position,
        }
    }

    pub fn entity(id: EntityId, position: Vec3) -> Self {
        Self {
            occupant: Occupant::Entity(id),
            position,
        }
    }
}
