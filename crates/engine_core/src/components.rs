//! Common ECS components used across the engine.

/// Marker for entities that are live in the world.
///
/// Pooled entities keep their other components while parked; only this tag
/// is removed, so update and render queries filter on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Active;
