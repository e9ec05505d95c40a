//! Brick Breaker - a Breakout-style 2D arcade physics engine
//!
//! Core modules:
//! - `sim`: Deterministic collision simulation (geometry, obstacles,
//!   collision world, moving bodies)
//!
//! Rendering, input and the frame loop are external collaborators; the
//! headless demo binary stands in for them.

pub mod sim;

pub use sim::{
    Ball, Collision, CollisionWorld, Obstacle, ObstacleId, ObstacleKind, Rect, Segment, Steer,
    Velocity,
};

/// Game configuration constants
pub mod consts {
    /// Play field dimensions
    pub const FIELD_WIDTH: f64 = 800.0;
    pub const FIELD_HEIGHT: f64 = 600.0;
    /// Thickness of the border blocks framing the field
    pub const BORDER_THICKNESS: f64 = 30.0;

    /// Paddle defaults
    pub const PADDLE_SPEED: f64 = 5.0;
    /// Inner margins the paddle may never cross
    pub const PADDLE_MIN_X: f64 = 35.0;
    pub const PADDLE_MAX_X: f64 = 765.0;
    /// Number of equal-width paddle hit zones
    pub const PADDLE_ZONES: u32 = 5;

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 5.0;
    pub const BALL_START_SPEED: f64 = 5.0;

    /// Determinant threshold below which segments count as parallel
    pub const INTERSECT_EPSILON: f64 = 1e-8;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_angle_deg(angle: f64) -> f64 {
    let a = angle % 360.0;
    if a < 0.0 { a + 360.0 } else { a }
}
