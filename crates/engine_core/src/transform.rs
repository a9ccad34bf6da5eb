//! Transform component and utilities for spatial positioning.
//!
//! The fire simulation works in the XY plane with Z pointing out of the
//! screen. Orientation is therefore a rotation about Z, but it is stored as a
//! full quaternion so downstream consumers can treat it like any 3D transform.

use glam::{Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create a transform whose local up axis matches `up` (projected onto XY).
    pub fn from_position_up(position: Vec3, up: Vec3) -> Self {
        let mut transform = Self::from_position(position);
        transform.set_up(up);
        transform
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotate about Z so that local up points along `up`.
    ///
    /// Only the XY components are considered. A degenerate vector leaves the
    /// rotation untouched.
    pub fn set_up(&mut self, up: Vec3) {
        let planar = Vec3::new(up.x, up.y, 0.0);
        if planar.length_squared() < 1e-12 {
            return;
        }
        let planar = planar.normalize();
        // Rotating Y by `angle` about Z yields (-sin, cos).
        let angle = (-planar.x).atan2(planar.y);
        self.rotation = Quat::from_rotation_z(angle);
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }
}
