//! Geometric utility functions for distance calculations against wall segments.

use geo::algorithm::Distance;
use geo::{Euclidean, Line, Point};
use serde::{Deserialize, Serialize};

use super::vector::Vec2;

/// A static line segment of the environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First endpoint.
    pub start: Vec2,
    /// Second endpoint.
    pub end: Vec2,
}

impl Segment {
    /// Creates a segment between two points.
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Vector from `start` to `end`.
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }
}

/// Calculates the minimum distance between a point and a line segment.
///
/// # Arguments
///
/// * `point` - The query point
/// * `start` - Starting point of the segment
/// * `end` - Ending point of the segment
///
/// # Returns
///
/// The minimum Euclidean distance from `point` to the segment. A zero-length
/// segment degenerates to the distance between two points.
pub fn point_segment_distance(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let p: Point<f32> = point.into();
    let line = Line::new(Point::from(start), Point::from(end));
    Euclidean.distance(&p, &line)
}

/// Checks whether a circle touches a line segment.
pub fn circle_touches_segment(center: Vec2, radius: f32, start: Vec2, end: Vec2) -> bool {
    point_segment_distance(center, start, end) <= radius
}
