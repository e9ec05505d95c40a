//! Moving circular body
//!
//! A ball advances one discrete step per tick. Against a
//! [`CollisionWorld`] it asks for the earliest obstacle its trajectory
//! crosses and applies that obstacle's response; the bounded variants
//! bounce off fixed outer walls with no obstacles involved.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, Segment};
use super::velocity::Velocity;
use super::world::CollisionWorld;

/// A circular body with a center, radius and per-step velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    center: DVec2,
    radius: f64,
    velocity: Velocity,
    /// Set by hit listeners; the driver drops flagged balls between ticks
    removed: bool,
}

impl Ball {
    /// New body at rest (zero velocity)
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self {
            center,
            radius,
            velocity: Velocity::ZERO,
            removed: false,
        }
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        self.center
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.center.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.center.y
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Velocity) {
        self.velocity = velocity;
    }

    /// Flag this ball for removal; the owning driver drops it after the
    /// current tick.
    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    #[inline]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Advance one step against the world's obstacles.
    ///
    /// A hit response replaces the velocity for the next step while the
    /// center still travels the full original displacement, so the body
    /// can overlap the struck obstacle for one frame. The no-response
    /// fallback instead reverses the velocity and moves the center with
    /// the reversed displacement. The two branches move differently on
    /// purpose.
    pub fn step(&mut self, world: &mut CollisionWorld) {
        let trajectory = Segment::new(self.center, self.velocity.apply_to(self.center));

        let Some(collision) = world.closest_collision(&trajectory) else {
            self.center = trajectory.end;
            return;
        };

        let response = world.resolve_hit(collision.obstacle, self, collision.point);
        self.apply_response(&trajectory, response);
    }

    fn apply_response(&mut self, trajectory: &Segment, response: Option<Velocity>) {
        match response {
            Some(new_velocity) => {
                self.velocity = new_velocity;
                self.center = trajectory.end;
            }
            None => {
                log::debug!(
                    "no hit response along ({}, {}) -> ({}, {}), reversing",
                    trajectory.start.x,
                    trajectory.start.y,
                    trajectory.end.x,
                    trajectory.end.y
                );
                let reversed = self.velocity.reversed();
                self.center = reversed.apply_to(trajectory.start);
                self.velocity = reversed;
            }
        }
    }

    /// Advance one step inside `bounds`, reflecting off its walls.
    ///
    /// Each axis clamps and reverses independently, so a corner contact
    /// flips both components in the same step. Obstacles play no part
    /// here.
    pub fn step_bounded(&mut self, bounds: &Rect) {
        let next = self.velocity.apply_to(self.center);
        let mut next_x = next.x;
        let mut next_y = next.y;

        if next_x - self.radius < bounds.left() {
            next_x = bounds.left() + self.radius;
            self.velocity = Velocity::new(-self.velocity.dx, self.velocity.dy);
        }
        if next_x + self.radius > bounds.right() {
            next_x = bounds.right() - self.radius;
            self.velocity = Velocity::new(-self.velocity.dx, self.velocity.dy);
        }
        if next_y - self.radius < bounds.top() {
            next_y = bounds.top() + self.radius;
            self.velocity = Velocity::new(self.velocity.dx, -self.velocity.dy);
        }
        if next_y + self.radius > bounds.bottom() {
            next_y = bounds.bottom() - self.radius;
            self.velocity = Velocity::new(self.velocity.dx, -self.velocity.dy);
        }

        self.center = DVec2::new(next_x, next_y);
    }

    /// The simpler bounded form over `[0, width] x [0, height]`
    pub fn step_bounded_at_origin(&mut self, width: f64, height: f64) {
        self.step_bounded(&Rect::new(DVec2::ZERO, width, height, 0));
    }
}
