//! Per-step displacement vector with polar conversions
//!
//! Angles are in degrees throughout: 0° points along +x, +90° along +y.
//! A `Velocity` is the displacement applied to a body's center in one
//! simulation step; speed is its Euclidean magnitude.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Change in position per simulation step
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: f64,
    pub dy: f64,
}

impl Velocity {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    #[inline]
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Build a velocity from an angle in degrees and a magnitude.
    ///
    /// Inverse of [`Velocity::angle`] / [`Velocity::speed`].
    pub fn from_angle_and_speed(angle_deg: f64, speed: f64) -> Self {
        let radians = angle_deg.to_radians();
        Self {
            dx: speed * radians.cos(),
            dy: speed * radians.sin(),
        }
    }

    /// Magnitude of the displacement
    #[inline]
    pub fn speed(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    /// Direction of the displacement in degrees, in (-180, 180]
    #[inline]
    pub fn angle(&self) -> f64 {
        self.dy.atan2(self.dx).to_degrees()
    }

    /// The point reached from `point` after one step at this velocity
    #[inline]
    pub fn apply_to(&self, point: DVec2) -> DVec2 {
        DVec2::new(point.x + self.dx, point.y + self.dy)
    }

    /// Same magnitude, opposite direction
    #[inline]
    pub fn reversed(&self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}
