//! Core engine types and utilities for the fire platform workspace.
//!
//! This crate provides the foundational types used across all systems:
//! - Transform with planar orientation helpers
//! - Simulation clock
//! - Activity tagging and a generic object pool

pub mod components;
pub mod pool;
pub mod time;
pub mod transform;

pub use components::*;
pub use pool::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
