//! Deterministic simulation module
//!
//! All collision logic lives here. This module must be pure and deterministic:
//! - One discrete step per call, no internal time source
//! - Seeded RNG only (callers pass the generator in)
//! - Stable iteration order (obstacles scan in registration order)
//! - No rendering or platform dependencies

pub mod ball;
pub mod geometry;
pub mod obstacle;
pub mod velocity;
pub mod world;

pub use ball::Ball;
pub use geometry::{random_point_in, Rect, Segment};
pub use obstacle::{Obstacle, ObstacleId, ObstacleKind, Steer};
pub use velocity::Velocity;
pub use world::{Collision, CollisionWorld, HitHook, ListenerId};
