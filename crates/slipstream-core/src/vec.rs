//! 3D vector type used throughout the engine
//!
//! Deliberately minimal: the engine only needs lengths, distances,
//! normalization, and componentwise blending. `y` is usually derived from
//! a floor-height lookup rather than simulated, so most movement math
//! happens in the x/z plane.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Real-valued 3D coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// The zero vector
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new vector
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Length of the x/z projection (movement happens in the ground plane)
    pub fn horizontal_length(&self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Distance to another point
    pub fn distance(&self, other: &Vec3) -> f64 {
        (*other - *self).length()
    }

    /// Distance to another point in the x/z plane only
    pub fn horizontal_distance(&self, other: &Vec3) -> f64 {
        (*other - *self).horizontal_length()
    }

    /// Unit vector in the same direction, or zero if the length is
    /// too small to normalize meaningfully
    pub fn normalized(&self) -> Vec3 {
        let len = self.length();
        if len < 1e-9 {
            Vec3::ZERO
        } else {
            Vec3::new(self.x / len, self.y / len, self.z / len)
        }
    }

    /// Componentwise linear blend, `t = 0` gives `self`, `t = 1` gives `other`
    pub fn lerp(&self, other: &Vec3, t: f64) -> Vec3 {
        Vec3::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }

    /// Whether every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
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
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}
