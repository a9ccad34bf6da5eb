//! Terrain queries for the fire simulation, backed by Rapier3D.
//!
//! The simulation plane is z = 0. Platforms are thin static cuboids that
//! straddle it, so ordinary 3D ray and point queries behave like 2D ones.

pub mod collision;
pub mod physics_world;
pub mod raycast;

pub use collision::*;
pub use physics_world::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::ColliderHandle;
