//! Error types for configuration and front management.

use thiserror::Error;

use crate::FrontHandle;

/// Rejected configuration. Raised when a config is built or loaded, never
/// during a spread.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite positive number, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("ground_layers must select at least one collision group")]
    EmptyLayerMask,
    #[error("invalid fire config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Failures of the simulation's management API.
#[derive(Debug, Error)]
pub enum FireError {
    #[error("front {0:?} does not exist or is already pooled")]
    UnknownFront(FrontHandle),
    #[error("front {0:?} is still armed and may spread")]
    StillBurning(FrontHandle),
    #[error("front {0:?} is referenced by an active ignition group")]
    InActiveGroup(FrontHandle),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
