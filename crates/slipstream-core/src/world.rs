//! World geometry helpers
//!
//! The engine models the world as a rectangular walkable area with a
//! two-level floor: a raised circular platform around the origin and a
//! ground plane everywhere else. This is a deterministic lookup, not
//! collision geometry.

use crate::Vec3;
use serde::{Deserialize, Serialize};

/// Rectangular clamp extents for the walkable area, centered on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Half-extent along x
    pub half_x: f64,
    /// Half-extent along z
    pub half_z: f64,
}

impl WorldBounds {
    /// Create bounds with the given half-extents
    pub const fn new(half_x: f64, half_z: f64) -> Self {
        Self { half_x, half_z }
    }

    /// Clamp a position into the bounds
    ///
    /// Returns the clamped position and whether either axis was clamped.
    /// A clamped step is treated as arrival by the caller.
    pub fn clamp(&self, position: Vec3) -> (Vec3, bool) {
        let x = position.x.clamp(-self.half_x, self.half_x);
        let z = position.z.clamp(-self.half_z, self.half_z);
        let clamped = x != position.x || z != position.z;
        (Vec3::new(x, position.y, z), clamped)
    }

    /// Whether the position is inside the bounds on both axes
    pub fn contains(&self, position: &Vec3) -> bool {
        position.x.abs() <= self.half_x && position.z.abs() <= self.half_z
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(24.0, 24.0)
    }
}

/// Two-level floor-height lookup
///
/// Inside `platform_radius` of the origin the floor sits at
/// `platform_height`; outside it sits at `ground_height`. Resting height
/// is recomputed from this after every position change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorMap {
    /// Radius of the raised platform around the origin
    pub platform_radius: f64,
    /// Elevation on top of the platform
    pub platform_height: f64,
    /// Elevation of the surrounding ground plane
    pub ground_height: f64,
}

impl FloorMap {
    /// Floor elevation at the given ground-plane coordinates
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        if (x * x + z * z).sqrt() < self.platform_radius {
            self.platform_height
        } else {
            self.ground_height
        }
    }

    /// Copy of `position` with `y` set to the floor height at its (x, z)
    pub fn settle(&self, position: Vec3) -> Vec3 {
        Vec3::new(position.x, self.height_at(position.x, position.z), position.z)
    }
}

impl Default for FloorMap {
    fn default() -> Self {
        Self {
            platform_radius: 7.5,
            platform_height: 2.5,
            ground_height: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside_is_identity() {
        let bounds = WorldBounds::new(10.0, 10.0);
        let p = Vec3::new(3.0, 1.0, -4.0);
        let (clamped, hit) = bounds.clamp(p);
        assert_eq!(clamped, p);
        assert!(!hit);
    }

    #[test]
    fn test_clamp_reports_each_axis() {
        let bounds = WorldBounds::new(10.0, 10.0);

        let (clamped, hit) = bounds.clamp(Vec3::new(15.0, 0.0, 0.0));
        assert!(hit);
        assert_eq!(clamped.x, 10.0);

        let (clamped, hit) = bounds.clamp(Vec3::new(0.0, 0.0, -11.0));
        assert!(hit);
        assert_eq!(clamped.z, -10.0);
    }

    #[test]
    fn test_floor_two_levels() {
        let floor = FloorMap::default();
        assert_eq!(floor.height_at(0.0, 0.0), floor.platform_height);
        assert_eq!(floor.height_at(20.0, 0.0), floor.ground_height);

        // The platform edge itself is ground (strict inequality)
        assert_eq!(
            floor.height_at(floor.platform_radius, 0.0),
            floor.ground_height
        );
    }

    #[test]
    fn test_settle_only_touches_y() {
        let floor = FloorMap::default();
        let settled = floor.settle(Vec3::new(1.0, 99.0, 2.0));
        assert_eq!(settled.x, 1.0);
        assert_eq!(settled.z, 2.0);
        assert_eq!(settled.y, floor.platform_height);
    }
}
