//! Obstacle variants and their hit-response rules
//!
//! An obstacle owns an axis-aligned box and answers one question: given
//! a collision point on its boundary and an incoming velocity, what is
//! the outgoing velocity? `None` means "no effect" and tells the moving
//! body to fall back to an inert reversal.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::velocity::Velocity;
use crate::consts::{PADDLE_MAX_X, PADDLE_MIN_X, PADDLE_ZONES};

/// Stable handle to an obstacle registered in a
/// [`CollisionWorld`](super::world::CollisionWorld)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObstacleId(pub(crate) u32);

/// Paddle steering direction for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
}

/// Obstacle behavior variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Plain reflecting block: reverses the velocity component
    /// orthogonal to whichever edge was struck
    Block,
    /// Player paddle: five equal-width hit zones mapping to fixed
    /// outgoing angles, steerable horizontally by `speed` per tick
    Paddle { speed: f64 },
}

/// A collidable body with a box and a hit-response rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub(crate) id: ObstacleId,
    pub rect: Rect,
    pub kind: ObstacleKind,
}

impl Obstacle {
    #[inline]
    pub fn id(&self) -> ObstacleId {
        self.id
    }

    /// Outgoing velocity for a hit at `point` with `incoming` velocity.
    ///
    /// `None` signals "no effect": the caller falls back to reversing
    /// its own velocity.
    pub fn response(&self, point: DVec2, incoming: Velocity) -> Option<Velocity> {
        match self.kind {
            ObstacleKind::Block => self.block_response(point, incoming),
            ObstacleKind::Paddle { .. } => Some(self.paddle_response(point, incoming)),
        }
    }

    fn block_response(&self, point: DVec2, incoming: Velocity) -> Option<Velocity> {
        let rect = &self.rect;

        // A point that came from this box's own intersection scan is
        // always inside it; anything else gets no response.
        if !rect.contains_point(point) {
            log::warn!(
                "collision point ({}, {}) outside obstacle box at ({}, {})",
                point.x,
                point.y,
                rect.origin.x,
                rect.origin.y
            );
            return None;
        }

        // Exact equality: intersection points are computed from these
        // same edge coordinates. A corner matches both axes.
        let hit_vertical_edge = point.x == rect.left() || point.x == rect.right();
        let hit_horizontal_edge = point.y == rect.top() || point.y == rect.bottom();

        let mut dx = incoming.dx;
        let mut dy = incoming.dy;
        if hit_vertical_edge {
            dx = -dx;
        }
        if hit_horizontal_edge {
            dy = -dy;
        }

        Some(Velocity::new(dx, dy))
    }

    fn paddle_response(&self, point: DVec2, incoming: Velocity) -> Velocity {
        let rect = &self.rect;
        let zone_width = rect.width / PADDLE_ZONES as f64;
        let zone = ((point.x - rect.left()) / zone_width) as i32 + 1;

        let angle = match zone {
            1 => 210.0,
            2 => 240.0,
            // Center zone bounces like a plain block face
            3 => return Velocity::new(incoming.dx, -incoming.dy),
            4 => 300.0,
            5 => 330.0,
            // A boundary-exact hit can land just outside the zones;
            // keep the incoming direction
            _ => incoming.angle(),
        };

        Velocity::from_angle_and_speed(angle, incoming.speed())
    }

    /// Shift a paddle horizontally by its speed increment. The move is
    /// refused outright when it would cross the field's inner margins.
    /// Blocks don't steer.
    pub fn steer(&mut self, direction: Steer) {
        let ObstacleKind::Paddle { speed } = self.kind else {
            return;
        };

        match direction {
            Steer::Left => {
                let new_x = self.rect.origin.x - speed;
                if new_x >= PADDLE_MIN_X {
                    self.rect.origin.x = new_x;
                }
            }
            Steer::Right => {
                let new_x = self.rect.origin.x + speed;
                if new_x + self.rect.width <= PADDLE_MAX_X {
                    self.rect.origin.x = new_x;
                }
            }
        }
    }
}
