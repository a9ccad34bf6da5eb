//! Geometric fire spread along 2D platforms.
//!
//! A root front lit by an ignition splits into a left and a right chain that
//! walk along the terrain, one step per spread delay, until the chains meet
//! (the platform is engulfed) or run out of surface.
//!
//! ```text
//! IgnitionSource ──► root (Both) ──► Left chain ──► …  leaf
//!                         │
//!                         └────────► Right chain ──► … leaf
//! IgnitionTracker: |left leaf − right leaf| < spread_distance ⇒ engulfed
//! ```

pub mod config;
pub mod error;
pub mod factory;
pub mod front;
pub mod ignition;
pub mod simulation;
pub mod tracker;

pub use config::*;
pub use error::*;
pub use factory::*;
pub use front::*;
pub use ignition::*;
pub use simulation::*;
pub use tracker::*;

/// Stable, non-owning handle to a fire front entity.
pub type FrontHandle = hecs::Entity;
