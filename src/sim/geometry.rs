//! Segment and axis-aligned box geometry
//!
//! The intersection math under every collision query. Degenerate inputs
//! (zero-length segments, parallel lines, zero-area boxes) never fail;
//! they fall out as "no intersection".

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::INTERSECT_EPSILON;

/// A directed line segment between two points
///
/// Direction only matters for distance-from-start queries, never for
/// whether two segments intersect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
}

impl Segment {
    #[inline]
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(DVec2::new(x1, y1), DVec2::new(x2, y2))
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    #[inline]
    pub fn midpoint(&self) -> DVec2 {
        (self.start + self.end) / 2.0
    }

    /// The unique point where this segment crosses `other`, if any.
    ///
    /// An endpoint whose coordinates match an endpoint of the other
    /// segment (checked per axis) is returned before the solver runs,
    /// so shared corners come back exact instead of drifting through
    /// the division below.
    pub fn intersection_with(&self, other: &Segment) -> Option<DVec2> {
        let (x1, y1) = (self.start.x, self.start.y);
        let (x2, y2) = (self.end.x, self.end.y);
        let (x3, y3) = (other.start.x, other.start.y);
        let (x4, y4) = (other.end.x, other.end.y);

        if (x1 == x3 || x1 == x4) && (y1 == y3 || y1 == y4) {
            return Some(DVec2::new(x1, y1));
        }
        if (x2 == x3 || x2 == x4) && (y2 == y3 || y2 == y4) {
            return Some(DVec2::new(x2, y2));
        }

        let dx1 = x2 - x1;
        let dy1 = y2 - y1;
        let dx2 = x4 - x3;
        let dy2 = y4 - y3;

        let det = dx1 * dy2 - dy1 * dx2;

        // Parallel (or zero-length) segments never intersect
        if det.abs() < INTERSECT_EPSILON {
            return None;
        }

        let t1 = ((x3 - x1) * dy2 - (y3 - y1) * dx2) / det;
        let t2 = ((x3 - x1) * dy1 - (y3 - y1) * dx1) / det;

        // Both parametric positions must land inside the segments
        if (0.0..=1.0).contains(&t1) && (0.0..=1.0).contains(&t2) {
            return Some(DVec2::new(x1 + t1 * dx1, y1 + t1 * dy1));
        }

        None
    }

    #[inline]
    pub fn is_intersecting(&self, other: &Segment) -> bool {
        self.intersection_with(other).is_some()
    }

    /// Among this segment's crossings with `rect`, the one nearest to
    /// `start`. Equal distances keep the earlier edge-scan point.
    pub fn closest_intersection_to_start(&self, rect: &Rect) -> Option<DVec2> {
        let mut closest = None;
        let mut min_distance = f64::INFINITY;

        for point in rect.intersection_points(self) {
            let distance = point.distance(self.start);
            if distance < min_distance {
                min_distance = distance;
                closest = Some(point);
            }
        }

        closest
    }

    /// Random segment with integer endpoints in [1, max_x] x [1, max_y]
    pub fn random<R: Rng>(rng: &mut R, max_x: u32, max_y: u32) -> Self {
        Self::new(
            random_point_in(rng, max_x, max_y),
            random_point_in(rng, max_x, max_y),
        )
    }
}

/// An axis-aligned rectangle with an attached visual tag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Upper-left corner (minimum x and minimum y)
    pub origin: DVec2,
    pub width: f64,
    pub height: f64,
    /// 0xRRGGBB tag for the renderer, never consulted by collision math
    pub color: u32,
}

impl Rect {
    pub fn new(origin: DVec2, width: f64, height: f64, color: u32) -> Self {
        Self {
            origin,
            width,
            height,
            color,
        }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.origin.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.origin.y
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.origin.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.height
    }

    /// The four boundary edges in the fixed scan order top, left,
    /// right, bottom. Collision tie-breaking depends on this order.
    pub fn edges(&self) -> [Segment; 4] {
        let (x, y) = (self.origin.x, self.origin.y);
        [
            Segment::from_coords(x, y, x + self.width, y),
            Segment::from_coords(x, y, x, y + self.height),
            Segment::from_coords(x + self.width, y, x + self.width, y + self.height),
            Segment::from_coords(x, y + self.height, x + self.width, y + self.height),
        ]
    }

    /// All crossings of `segment` with this box's edges, listed in
    /// edge-scan order. A corner hit can appear twice.
    pub fn intersection_points(&self, segment: &Segment) -> Vec<DVec2> {
        self.edges()
            .iter()
            .filter_map(|edge| segment.intersection_with(edge))
            .collect()
    }

    /// Whether `point` lies inside the box, boundaries included
    pub fn contains_point(&self, point: DVec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }
}

/// Random point with integer coordinates in [1, max_x] x [1, max_y]
pub fn random_point_in<R: Rng>(rng: &mut R, max_x: u32, max_y: u32) -> DVec2 {
    DVec2::new(
        rng.random_range(1..=max_x) as f64,
        rng.random_range(1..=max_y) as f64,
    )
}
