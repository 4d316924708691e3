//! Ray casting against wall segments and the multi-ray camera used for vision.
//!
//! Hits are ranked by a distance proxy: the squared Euclidean distance from the ray
//! origin to the intersection point. Callers needing true distances take the root.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::geometric_utils::Segment;
use super::vector::Vec2;

/// A ray/segment intersection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Intersection point.
    pub point: Vec2,
    /// Squared distance from the ray origin to `point`.
    pub distance: f32,
}

/// A half-line from `origin` along `direction`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Vec2,
    /// Direction of travel; its length scales the ray parameter.
    pub direction: Vec2,
    last_hit: Option<RayHit>,
}

impl Ray {
    /// Creates a ray.
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self {
            origin,
            direction,
            last_hit: None,
        }
    }

    /// Intersects the ray with one segment.
    ///
    /// Solves `origin + t·direction = start + u·(end - start)` with 2D cross products.
    /// Parallel lines (zero determinant), hits behind the origin (`t < 0`) and hits
    /// outside the segment (`u ∉ [0, 1]`) are misses.
    pub fn cast(&self, segment: &Segment) -> Option<RayHit> {
        let edge = segment.direction();
        let denom = self.direction.perp_dot(edge);
        if denom == 0.0 {
            return None;
        }

        let to_start = segment.start - self.origin;
        let t = to_start.perp_dot(edge) / denom;
        let u = to_start.perp_dot(self.direction) / denom;
        if t < 0.0 || !(0.0..=1.0).contains(&u) {
            return None;
        }

        let offset = self.direction * t;
        Some(RayHit {
            point: self.origin + offset,
            distance: offset.length_squared(),
        })
    }

    /// Casts against every segment and keeps the nearest hit.
    ///
    /// The result is also cached and available through [`Ray::last_hit`].
    pub fn cast_all<'a, I>(&mut self, segments: I) -> Option<RayHit>
    where
        I: IntoIterator<Item = &'a Segment>,
    {
        let mut nearest: Option<RayHit> = None;
        for segment in segments {
            if let Some(hit) = self.cast(segment) {
                if nearest.is_none_or(|best| hit.distance < best.distance) {
                    nearest = Some(hit);
                }
            }
        }
        self.last_hit = nearest;
        nearest
    }

    /// Result of the most recent [`Ray::cast_all`].
    pub fn last_hit(&self) -> Option<RayHit> {
        self.last_hit
    }
}

/// A fan of rays spread evenly across a field of view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RayCamera {
    rays: Vec<Ray>,
    /// Total field of view in radians.
    pub fov: f32,
    /// Reading reported by a ray that hits nothing.
    pub miss_distance: f32,
    position: Vec2,
    heading: Vec2,
}

impl RayCamera {
    /// Creates a camera with `num_rays` rays facing +x from the origin.
    pub fn new(num_rays: usize, fov: f32, miss_distance: f32) -> Self {
        let mut camera = Self {
            rays: vec![Ray::default(); num_rays],
            fov,
            miss_distance,
            position: Vec2::ZERO,
            heading: Vec2::X,
        };
        camera.aim(Vec2::ZERO, Vec2::X);
        camera
    }

    /// Number of rays.
    pub fn num_rays(&self) -> usize {
        self.rays.len()
    }

    /// The rays, ordered from the clockwise edge of the view to the counter-clockwise edge.
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    /// Current camera position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current unit heading.
    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    /// Moves the camera and recomputes every ray direction.
    ///
    /// The first ray points `fov / 2` clockwise of the heading; each following ray is
    /// rotated counter-clockwise by `fov / (n - 1)`. A single ray looks straight ahead.
    /// A zero heading leaves the previous heading in place.
    pub fn aim(&mut self, position: Vec2, heading: Vec2) {
        let facing = heading.normalize();
        if facing != Vec2::ZERO {
            self.heading = facing;
        }
        self.position = position;

        let n = self.rays.len();
        let (mut direction, step) = if n > 1 {
            let half = Vec2::from_angle(self.fov * 0.5);
            let step = Vec2::from_angle(self.fov / (n - 1) as f32);
            (self.heading.rotate_right(half), step)
        } else {
            (self.heading, Vec2::X)
        };

        for ray in &mut self.rays {
            ray.origin = position;
            ray.direction = direction;
            direction = direction.rotate_left(step);
        }
    }

    /// Casts every ray against `segments` and writes one reading per ray into `out`.
    ///
    /// A miss reports [`RayCamera::miss_distance`]. `out` must hold at least
    /// [`RayCamera::num_rays`] values.
    pub fn sense_into(&mut self, segments: &[Segment], out: &mut [f32]) {
        let miss = self.miss_distance;
        for (ray, reading) in self.rays.iter_mut().zip(out.iter_mut()) {
            *reading = ray
                .cast_all(segments)
                .map_or(miss, |hit| hit.distance);
        }
    }

    /// Casts every ray against `segments` and returns the readings.
    pub fn sense(&mut self, segments: &[Segment]) -> Array1<f32> {
        let mut readings = Array1::zeros(self.rays.len());
        if let Some(slice) = readings.as_slice_mut() {
            self.sense_into(segments, slice);
        }
        readings
    }
}
