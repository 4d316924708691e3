#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::f32::consts::{FRAC_PI_2, FRAC_1_SQRT_2};

use roboevo::simulation::geometric_utils::Segment;
use roboevo::simulation::raycast::{Ray, RayCamera};
use roboevo::simulation::vector::Vec2;

const MISS: f32 = 1e4;

fn wall_at_x(x: f32) -> Segment {
    Segment::new(Vec2::new(x, -1.0), Vec2::new(x, 1.0))
}

fn assert_close(actual: Vec2, expected: Vec2) {
    assert!(
        (actual - expected).length() < 1e-5,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn test_hit_reports_point_and_squared_distance() {
    let ray = Ray::new(Vec2::ZERO, Vec2::X);
    let hit = ray.cast(&wall_at_x(5.0)).unwrap();

    assert_close(hit.point, Vec2::new(5.0, 0.0));
    assert!((hit.distance - 25.0).abs() < 1e-4);
}

#[test]
fn test_parallel_segment_is_a_miss() {
    let ray = Ray::new(Vec2::ZERO, Vec2::X);
    let parallel = Segment::new(Vec2::new(1.0, 0.5), Vec2::new(9.0, 0.5));
    assert!(ray.cast(&parallel).is_none());
}

#[test]
fn test_segment_beside_the_ray_is_a_miss() {
    let ray = Ray::new(Vec2::ZERO, Vec2::X);
    let above = Segment::new(Vec2::new(5.0, 1.0), Vec2::new(5.0, 3.0));
    assert!(ray.cast(&above).is_none());
}

#[test]
fn test_segment_behind_the_origin_is_a_miss() {
    let ray = Ray::new(Vec2::ZERO, Vec2::X);
    assert!(ray.cast(&wall_at_x(-5.0)).is_none());
}

#[test]
fn test_segment_endpoint_counts_as_hit() {
    let ray = Ray::new(Vec2::ZERO, Vec2::X);
    let touching = Segment::new(Vec2::new(3.0, 0.0), Vec2::new(3.0, 4.0));
    assert!(ray.cast(&touching).is_some());
}

#[test]
fn test_cast_all_keeps_nearest_and_caches_it() {
    let mut ray = Ray::new(Vec2::new(1.0, 0.0), Vec2::X);
    assert!(ray.last_hit().is_none());

    let walls = [wall_at_x(10.0), wall_at_x(4.0), wall_at_x(-2.0), wall_at_x(7.0)];
    let hit = ray.cast_all(&walls).unwrap();

    assert_close(hit.point, Vec2::new(4.0, 0.0));
    assert!((hit.distance - 9.0).abs() < 1e-4);
    assert_eq!(ray.last_hit(), Some(hit));

    let nothing: [Segment; 0] = [];
    assert!(ray.cast_all(&nothing).is_none());
    assert!(ray.last_hit().is_none());
}

#[test]
fn test_camera_fans_rays_across_field_of_view() {
    let mut camera = RayCamera::new(3, FRAC_PI_2, MISS);
    camera.aim(Vec2::new(2.0, 3.0), Vec2::new(5.0, 0.0));

    assert_eq!(camera.num_rays(), 3);
    assert_eq!(camera.position(), Vec2::new(2.0, 3.0));
    assert_close(camera.heading(), Vec2::X);

    let directions: Vec<Vec2> = camera.rays().iter().map(|ray| ray.direction).collect();
    assert_close(directions[0], Vec2::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2));
    assert_close(directions[1], Vec2::X);
    assert_close(directions[2], Vec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2));
    assert!(camera.rays().iter().all(|ray| ray.origin == Vec2::new(2.0, 3.0)));
}

#[test]
fn test_single_ray_looks_straight_ahead() {
    let mut camera = RayCamera::new(1, FRAC_PI_2, MISS);
    camera.aim(Vec2::ZERO, Vec2::new(0.0, -2.0));
    assert_close(camera.rays()[0].direction, Vec2::new(0.0, -1.0));
}

#[test]
fn test_zero_heading_keeps_previous_heading() {
    let mut camera = RayCamera::new(2, 1.0, MISS);
    camera.aim(Vec2::ZERO, Vec2::Y);
    camera.aim(Vec2::new(1.0, 1.0), Vec2::ZERO);

    assert_close(camera.heading(), Vec2::Y);
    assert_eq!(camera.position(), Vec2::new(1.0, 1.0));
}

#[test]
fn test_camera_reports_sentinel_without_walls() {
    let mut camera = RayCamera::new(4, FRAC_PI_2, MISS);
    let readings = camera.sense(&[]);

    assert_eq!(readings.len(), 4);
    assert!(readings.iter().all(|&reading| reading == MISS));
}

#[test]
fn test_camera_sees_wall_ahead() {
    let mut camera = RayCamera::new(3, FRAC_PI_2, MISS);
    camera.aim(Vec2::ZERO, Vec2::X);
    let walls = [Segment::new(Vec2::new(5.0, -1.0), Vec2::new(5.0, 1.0))];

    let mut readings = [0.0; 3];
    camera.sense_into(&walls, &mut readings);

    // Only the centre ray reaches the short wall.
    assert_eq!(readings[0], MISS);
    assert!((readings[1] - 25.0).abs() < 1e-4);
    assert_eq!(readings[2], MISS);
}
