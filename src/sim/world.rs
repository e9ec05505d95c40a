//! Obstacle registry and closest-collision queries
//!
//! The one piece of shared mutable state in the simulation. Obstacles
//! are scanned in registration order, which makes equal-distance ties
//! deterministic; hit listeners are notified over a snapshot of the
//! subscriber table so they can freely mutate the world mid-callback.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::geometry::{Rect, Segment};
use super::obstacle::{Obstacle, ObstacleId, ObstacleKind};
use super::velocity::Velocity;

/// A resolved collision: where, and against what
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub point: DVec2,
    pub obstacle: ObstacleId,
}

/// Stable handle to a registered hit listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// Hit-notification callback: (world, struck obstacle, hitter).
///
/// Runs after the hit response is computed and before it is returned.
/// The hook may remove the struck obstacle, subscribe or unsubscribe
/// listeners (itself included) and flag the hitter for removal.
pub type HitHook = Box<dyn FnMut(&mut CollisionWorld, ObstacleId, &mut Ball)>;

struct ListenerEntry {
    id: ListenerId,
    target: ObstacleId,
    hook: HitHook,
}

/// Registry of obstacles shared by all moving bodies
#[derive(Default, Serialize, Deserialize)]
pub struct CollisionWorld {
    obstacles: Vec<Obstacle>,
    next_obstacle_id: u32,
    #[serde(skip)]
    listeners: Vec<ListenerEntry>,
    #[serde(skip)]
    next_listener_id: u32,
    /// Ids unsubscribed while a notification snapshot is in flight
    #[serde(skip)]
    unsubscribed: Vec<ListenerId>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an obstacle; the returned handle stays valid until the
    /// obstacle is removed.
    pub fn add_obstacle(&mut self, rect: Rect, kind: ObstacleKind) -> ObstacleId {
        let id = ObstacleId(self.next_obstacle_id);
        self.next_obstacle_id += 1;
        self.obstacles.push(Obstacle { id, rect, kind });
        id
    }

    /// Remove and return an obstacle. Registration order of the
    /// remaining obstacles is preserved.
    pub fn remove_obstacle(&mut self, id: ObstacleId) -> Option<Obstacle> {
        let index = self.obstacles.iter().position(|o| o.id() == id)?;
        Some(self.obstacles.remove(index))
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id() == id)
    }

    pub fn obstacle_mut(&mut self, id: ObstacleId) -> Option<&mut Obstacle> {
        self.obstacles.iter_mut().find(|o| o.id() == id)
    }

    /// Registered obstacles in registration order
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// The earliest collision along `trajectory`, or `None` when no
    /// obstacle's box is crossed.
    ///
    /// Per obstacle this compares the *first* intersection point in the
    /// box's fixed edge-scan order, not the nearest point on that box.
    /// Equal distances keep the earliest-registered obstacle; both
    /// quirks are load-bearing for reproducibility.
    pub fn closest_collision(&self, trajectory: &Segment) -> Option<Collision> {
        let mut closest = None;
        let mut closest_distance = f64::INFINITY;

        for obstacle in &self.obstacles {
            let points = obstacle.rect.intersection_points(trajectory);
            let Some(&point) = points.first() else {
                continue;
            };
            let distance = point.distance(trajectory.start);
            if distance < closest_distance {
                closest_distance = distance;
                closest = Some(Collision {
                    point,
                    obstacle: obstacle.id(),
                });
            }
        }

        closest
    }

    /// Compute the struck obstacle's hit response, notify its listeners
    /// and return the response.
    ///
    /// An id that no longer resolves yields `None`, the same "no
    /// effect" signal the caller already handles by reversing.
    pub fn resolve_hit(
        &mut self,
        id: ObstacleId,
        hitter: &mut Ball,
        point: DVec2,
    ) -> Option<Velocity> {
        let obstacle = self.obstacle(id)?;
        let response = obstacle.response(point, hitter.velocity())?;
        self.notify_hit(id, hitter);
        Some(response)
    }

    /// Subscribe a hook to hits on `target`
    pub fn add_hit_listener(
        &mut self,
        target: ObstacleId,
        hook: impl FnMut(&mut CollisionWorld, ObstacleId, &mut Ball) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push(ListenerEntry {
            id,
            target,
            hook: Box::new(hook),
        });
        id
    }

    /// Unsubscribe a listener. Safe to call from inside a hook, for any
    /// listener including the running one.
    pub fn remove_hit_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|entry| entry.id != id);
        self.unsubscribed.push(id);
    }

    /// Invoke every listener subscribed to `target`, in subscription
    /// order, over a snapshot of the table.
    ///
    /// Taking the table out for the duration lets hooks re-enter the
    /// world: subscriptions made during notification land in the fresh
    /// table (and don't fire for this hit), unsubscriptions are tracked
    /// through `unsubscribed` and applied when the snapshot merges
    /// back.
    fn notify_hit(&mut self, target: ObstacleId, hitter: &mut Ball) {
        self.unsubscribed.clear();
        let mut snapshot = std::mem::take(&mut self.listeners);

        for entry in snapshot.iter_mut() {
            if entry.target != target || self.unsubscribed.contains(&entry.id) {
                continue;
            }
            (entry.hook)(self, target, hitter);
        }

        let added = std::mem::take(&mut self.listeners);
        snapshot.retain(|entry| !self.unsubscribed.contains(&entry.id));
        snapshot.extend(added);
        self.listeners = snapshot;
        self.unsubscribed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(DVec2::new(x, y), w, h, 0)
    }

    #[test]
    fn test_empty_world_has_no_collision() {
        let world = CollisionWorld::new();
        let trajectory = Segment::from_coords(0.0, 0.0, 100.0, 100.0);
        assert_eq!(world.closest_collision(&trajectory), None);
    }

    #[test]
    fn test_closest_collision_picks_nearer_obstacle() {
        let mut world = CollisionWorld::new();
        let far = world.add_obstacle(rect(0.0, 80.0, 100.0, 10.0), ObstacleKind::Block);
        let near = world.add_obstacle(rect(0.0, 40.0, 100.0, 10.0), ObstacleKind::Block);

        let trajectory = Segment::from_coords(50.0, 0.0, 50.0, 100.0);
        let collision = world.closest_collision(&trajectory).unwrap();
        assert_eq!(collision.obstacle, near);
        assert_eq!(collision.point, DVec2::new(50.0, 40.0));
        assert_ne!(collision.obstacle, far);
    }

    #[test]
    fn test_equal_distance_tie_goes_to_first_registered() {
        let mut world = CollisionWorld::new();
        // Two obstacles with identical boxes
        let first = world.add_obstacle(rect(40.0, 40.0, 20.0, 20.0), ObstacleKind::Block);
        let _second = world.add_obstacle(rect(40.0, 40.0, 20.0, 20.0), ObstacleKind::Block);

        let trajectory = Segment::from_coords(50.0, 0.0, 50.0, 100.0);
        let collision = world.closest_collision(&trajectory).unwrap();
        assert_eq!(collision.obstacle, first);
    }

    #[test]
    fn test_collision_point_is_first_in_edge_order() {
        let mut world = CollisionWorld::new();
        world.add_obstacle(rect(100.0, 100.0, 50.0, 20.0), ObstacleKind::Block);

        // Upward trajectory crossing both horizontal edges: the top
        // edge point is listed first even though the bottom one is
        // nearer to the start
        let trajectory = Segment::from_coords(125.0, 130.0, 125.0, 90.0);
        let collision = world.closest_collision(&trajectory).unwrap();
        assert_eq!(collision.point, DVec2::new(125.0, 100.0));
    }

    #[test]
    fn test_remove_obstacle_keeps_registration_order() {
        let mut world = CollisionWorld::new();
        let a = world.add_obstacle(rect(0.0, 0.0, 10.0, 10.0), ObstacleKind::Block);
        let b = world.add_obstacle(rect(20.0, 0.0, 10.0, 10.0), ObstacleKind::Block);
        let c = world.add_obstacle(rect(40.0, 0.0, 10.0, 10.0), ObstacleKind::Block);

        assert!(world.remove_obstacle(b).is_some());
        let ids: Vec<_> = world.obstacles().map(|o| o.id()).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(world.obstacle_count(), 2);
        assert!(world.remove_obstacle(b).is_none());
    }

    #[test]
    fn test_resolve_hit_on_stale_id_is_no_effect() {
        let mut world = CollisionWorld::new();
        let id = world.add_obstacle(rect(0.0, 0.0, 10.0, 10.0), ObstacleKind::Block);
        world.remove_obstacle(id);

        let mut ball = Ball::new(DVec2::new(5.0, 20.0), 1.0);
        ball.set_velocity(Velocity::new(0.0, -5.0));
        assert_eq!(world.resolve_hit(id, &mut ball, DVec2::new(5.0, 10.0)), None);
    }

    #[test]
    fn test_listener_fires_after_response() {
        let mut world = CollisionWorld::new();
        let id = world.add_obstacle(rect(0.0, 0.0, 10.0, 10.0), ObstacleKind::Block);

        let hits = Rc::new(Cell::new(0));
        let hits_in_hook = hits.clone();
        world.add_hit_listener(id, move |_, _, _| {
            hits_in_hook.set(hits_in_hook.get() + 1);
        });

        let mut ball = Ball::new(DVec2::new(5.0, 20.0), 1.0);
        ball.set_velocity(Velocity::new(0.0, -5.0));
        let response = world.resolve_hit(id, &mut ball, DVec2::new(5.0, 10.0));
        assert_eq!(response, Some(Velocity::new(0.0, 5.0)));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_listener_only_fires_for_its_target() {
        let mut world = CollisionWorld::new();
        let watched = world.add_obstacle(rect(0.0, 0.0, 10.0, 10.0), ObstacleKind::Block);
        let other = world.add_obstacle(rect(20.0, 0.0, 10.0, 10.0), ObstacleKind::Block);

        let hits = Rc::new(Cell::new(0));
        let hits_in_hook = hits.clone();
        world.add_hit_listener(watched, move |_, _, _| {
            hits_in_hook.set(hits_in_hook.get() + 1);
        });

        let mut ball = Ball::new(DVec2::new(25.0, 20.0), 1.0);
        ball.set_velocity(Velocity::new(0.0, -5.0));
        world.resolve_hit(other, &mut ball, DVec2::new(25.0, 10.0));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_listener_may_remove_struck_obstacle() {
        // The remover pattern: a block disappears on its first hit
        let mut world = CollisionWorld::new();
        let id = world.add_obstacle(rect(0.0, 0.0, 10.0, 10.0), ObstacleKind::Block);
        world.add_hit_listener(id, move |world, struck, _| {
            world.remove_obstacle(struck);
        });

        let mut ball = Ball::new(DVec2::new(5.0, 20.0), 1.0);
        ball.set_velocity(Velocity::new(0.0, -5.0));
        let response = world.resolve_hit(id, &mut ball, DVec2::new(5.0, 10.0));

        // The response still comes back even though the obstacle is gone
        assert_eq!(response, Some(Velocity::new(0.0, 5.0)));
        assert_eq!(world.obstacle_count(), 0);
    }

    #[test]
    fn test_listener_may_remove_the_ball() {
        // The sink pattern: balls leaving through the bottom are gone
        let mut world = CollisionWorld::new();
        let sink = world.add_obstacle(rect(0.0, 570.0, 800.0, 30.0), ObstacleKind::Block);
        world.add_hit_listener(sink, move |_, _, ball| {
            ball.mark_removed();
        });

        let mut ball = Ball::new(DVec2::new(400.0, 560.0), 5.0);
        ball.set_velocity(Velocity::new(0.0, 12.0));
        ball.step(&mut world);
        assert!(ball.is_removed());
    }

    #[test]
    fn test_listener_self_removal_fires_once() {
        let mut world = CollisionWorld::new();
        let id = world.add_obstacle(rect(0.0, 0.0, 10.0, 10.0), ObstacleKind::Block);

        let hits = Rc::new(Cell::new(0));
        let listener_slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let hits_in_hook = hits.clone();
        let slot_in_hook = listener_slot.clone();
        let listener = world.add_hit_listener(id, move |world, _, _| {
            hits_in_hook.set(hits_in_hook.get() + 1);
            if let Some(own_id) = slot_in_hook.get() {
                world.remove_hit_listener(own_id);
            }
        });
        listener_slot.set(Some(listener));

        let mut ball = Ball::new(DVec2::new(5.0, 20.0), 1.0);
        ball.set_velocity(Velocity::new(0.0, -5.0));
        world.resolve_hit(id, &mut ball, DVec2::new(5.0, 10.0));
        world.resolve_hit(id, &mut ball, DVec2::new(5.0, 10.0));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_listener_may_unsubscribe_a_later_listener() {
        let mut world = CollisionWorld::new();
        let id = world.add_obstacle(rect(0.0, 0.0, 10.0, 10.0), ObstacleKind::Block);

        let second_slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let second_hits = Rc::new(Cell::new(0));

        let slot_in_first = second_slot.clone();
        world.add_hit_listener(id, move |world, _, _| {
            if let Some(second) = slot_in_first.get() {
                world.remove_hit_listener(second);
            }
        });
        let second_hits_in_hook = second_hits.clone();
        let second = world.add_hit_listener(id, move |_, _, _| {
            second_hits_in_hook.set(second_hits_in_hook.get() + 1);
        });
        second_slot.set(Some(second));

        let mut ball = Ball::new(DVec2::new(5.0, 20.0), 1.0);
        ball.set_velocity(Velocity::new(0.0, -5.0));
        world.resolve_hit(id, &mut ball, DVec2::new(5.0, 10.0));

        // The first listener dropped the second before it ever ran
        assert_eq!(second_hits.get(), 0);
    }

    #[test]
    fn test_listener_subscribed_during_notification_waits_a_hit() {
        let mut world = CollisionWorld::new();
        let id = world.add_obstacle(rect(0.0, 0.0, 10.0, 10.0), ObstacleKind::Block);

        let late_hits = Rc::new(Cell::new(0));
        let late_hits_in_hook = late_hits.clone();
        world.add_hit_listener(id, move |world, struck, _| {
            let late_hits_inner = late_hits_in_hook.clone();
            world.add_hit_listener(struck, move |_, _, _| {
                late_hits_inner.set(late_hits_inner.get() + 1);
            });
        });

        let mut ball = Ball::new(DVec2::new(5.0, 20.0), 1.0);
        ball.set_velocity(Velocity::new(0.0, -5.0));
        world.resolve_hit(id, &mut ball, DVec2::new(5.0, 10.0));
        assert_eq!(late_hits.get(), 0);

        world.resolve_hit(id, &mut ball, DVec2::new(5.0, 10.0));
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn test_world_serde_round_trip_keeps_obstacles() {
        let mut world = CollisionWorld::new();
        world.add_obstacle(rect(0.0, 0.0, 10.0, 10.0), ObstacleKind::Block);
        let paddle = world.add_obstacle(
            rect(375.0, 550.0, 100.0, 10.0),
            ObstacleKind::Paddle { speed: 5.0 },
        );

        let json = serde_json::to_string(&world).unwrap();
        let restored: CollisionWorld = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.obstacle_count(), 2);
        let kind = restored.obstacle(paddle).unwrap().kind;
        assert_eq!(kind, ObstacleKind::Paddle { speed: 5.0 });
    }

    proptest! {
        #[test]
        fn prop_overlapping_ties_always_pick_first_registered(
            x in 0.0f64..200.0,
            y in 10.0f64..200.0,
            w in 1.0f64..50.0,
            h in 1.0f64..50.0,
        ) {
            let mut world = CollisionWorld::new();
            let first = world.add_obstacle(rect(x, y, w, h), ObstacleKind::Block);
            let _second = world.add_obstacle(rect(x, y, w, h), ObstacleKind::Block);

            // Vertical trajectory through the middle of both boxes
            let trajectory = Segment::from_coords(x + w / 2.0, 0.0, x + w / 2.0, y + h + 10.0);
            let collision = world.closest_collision(&trajectory);
            prop_assert!(collision.is_some());
            prop_assert_eq!(collision.unwrap().obstacle, first);
        }
    }
}
