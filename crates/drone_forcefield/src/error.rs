//! Error types for forcefield controllers

use std::fmt;
use thiserror::Error;

/// Which piece of drone state a read was attempting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateQuery {
    Position,
    Rotation,
    Velocity,
}

impl fmt::Display for StateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Velocity => "velocity",
        })
    }
}

/// Forcefield errors.
///
/// Apart from configuration errors none of these reach the host; trigger
/// handlers log them and skip the affected effect.
#[derive(Debug, Error)]
pub enum ForcefieldError {
    /// The host has no local drone to track
    #[error("No local drone found")]
    UnresolvedEntity,

    /// The host has no local player to gate on
    #[error("No local player found")]
    UnresolvedActor,

    /// A drone state query failed this step
    #[error("Could not get drone {0}")]
    UnreadableState(StateQuery),

    /// Teleport requested without a destination
    #[error("Teleport destination not set")]
    MisconfiguredTeleport,

    /// A notification target could not be resolved to a receiver
    #[error("No receiver found for notification target '{0}'")]
    UnresolvedReceiver(String),

    /// Configuration that cannot be evaluated
    #[error("Invalid forcefield configuration: {0}")]
    InvalidConfig(String),

    /// Reading a configuration file failed
    #[error("Failed to read forcefield configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// A configuration document did not parse
    #[error("Failed to parse forcefield configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type for forcefield operations
pub type Result<T> = std::result::Result<T, ForcefieldError>;
