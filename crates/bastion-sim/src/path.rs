//! Route model: the fixed sequence of points enemies follow.
//!
//! Points are immutable after construction. A looped route wraps from its
//! final point back to index 0; a non-looped route ends at the base.

use glam::DVec2;

use bastion_core::errors::PathError;
use bastion_core::types::Position;

use crate::placement::ArenaLayout;

#[derive(Debug, Clone)]
pub struct Path {
    points: Vec<Position>,
    looped: bool,
}

impl Path {
    /// Build a route from explicit points. Needs at least 2 finite points.
    pub fn new(points: Vec<Position>, looped: bool) -> Result<Self, PathError> {
        if points.len() < 2 {
            return Err(PathError::TooFewWaypoints(points.len()));
        }
        if let Some(idx) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(PathError::NonFiniteWaypoint(idx));
        }
        Ok(Self { points, looped })
    }

    /// Build a route by linear interpolation between logical waypoints,
    /// `samples_per_segment` points per segment plus the final waypoint.
    pub fn smoothed(
        waypoints: &[Position],
        samples_per_segment: u32,
        looped: bool,
    ) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints(waypoints.len()));
        }
        let samples = samples_per_segment.max(1);
        let mut points = Vec::with_capacity((waypoints.len() - 1) * samples as usize + 1);
        for pair in waypoints.windows(2) {
            let start = pair[0].as_vec();
            let end = pair[1].as_vec();
            for j in 0..samples {
                let t = j as f64 / samples as f64;
                points.push(Position::from_vec(start.lerp(end, t)));
            }
        }
        points.push(waypoints[waypoints.len() - 1]);
        Self::new(points, looped)
    }

    /// The standard battlefield route. Starts at the centre, visits every
    /// corridor and returns to the centre. Looped.
    pub fn tian(layout: &ArenaLayout, samples_per_segment: u32) -> Result<Self, PathError> {
        let c = 0.0;
        let near = layout.corridor_centre_near();
        let far = layout.corridor_centre_far();
        let waypoints: Vec<Position> = [
            (c, c),
            (c, near),
            (far, near),
            (far, c),
            (c, c),
            (near, c),
            (near, near),
            (c, near),
            (c, c),
            (c, far),
            (near, far),
            (near, c),
            (c, c),
            (far, c),
            (far, far),
            (c, far),
            (c, c),
        ]
        .into_iter()
        .map(Position::from)
        .collect();
        Self::smoothed(&waypoints, samples_per_segment, true)
    }

    pub fn point_at(&self, index: usize) -> Option<Position> {
        self.points.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: construction rejects routes with fewer than 2 points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    pub fn start(&self) -> Position {
        self.points[0]
    }

    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Sum of segment lengths from the first point to the last.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|seg| seg[0].distance_to(&seg[1]))
            .sum()
    }

    /// Fraction of the route completed when standing at `pos` after
    /// reaching waypoint `index`: `(index + segment fraction) / segments`.
    pub fn progress_at(&self, index: usize, pos: &Position) -> f64 {
        let segments = self.segment_count() as f64;
        let (Some(a), Some(b)) = (self.point_at(index), self.point_at(index + 1)) else {
            return 1.0;
        };
        let seg_len = a.distance_to(&b);
        let fraction = if seg_len > 0.0 {
            (a.distance_to(pos) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        ((index as f64 + fraction) / segments).clamp(0.0, 1.0)
    }

    /// Shortest distance from `p` to any segment of the route.
    pub fn distance_to(&self, p: DVec2) -> f64 {
        self.points
            .windows(2)
            .map(|seg| distance_to_segment(p, seg[0].as_vec(), seg[1].as_vec()))
            .fold(f64::INFINITY, f64::min)
    }
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
