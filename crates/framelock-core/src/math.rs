//! Minimal vector math for movement commands
//!
//! Deliberately small: the transition function needs addition, scaling, and
//! normalization, nothing more. Only f32 add/mul/sqrt are used, all of which
//! produce identical results on every IEEE 754 platform.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul};

/// A 3-component vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// The zero vector
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    /// Unit vector along +x
    pub const RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    /// Unit vector along +y
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    /// Unit vector along +z
    pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    /// Create a new vector
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared length
    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Length
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction
    ///
    /// The zero vector normalizes to zero, so an idle movement command
    /// produces no displacement rather than a NaN position.
    pub fn normalized(&self) -> Vec3 {
        let len = self.length();
        if len == 0.0 {
            Vec3::ZERO
        } else {
            *self * (1.0 / len)
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}
