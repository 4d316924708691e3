#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::f32::consts::{FRAC_PI_2, PI};

use roboevo::simulation::vector::{Vec2, wrap_angle};

fn assert_close(actual: Vec2, expected: Vec2) {
    assert!(
        (actual - expected).length() < 1e-5,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn test_normalize_has_unit_length() {
    let samples = [
        Vec2::new(3.0, 4.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(1e-3, -2e-3),
        Vec2::new(1e6, 1e6),
        Vec2::new(0.0, -7.5),
    ];
    for v in samples {
        assert!((v.normalize().length() - 1.0).abs() < 1e-6, "{v:?}");
        assert_eq!(v.unit(), v.normalize());
    }
}

#[test]
fn test_zero_vector_normalizes_to_zero() {
    assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    assert_eq!(Vec2::new(0.0, 0.0).unit(), Vec2::ZERO);
}

#[test]
fn test_operators_match_named_methods() {
    let a = Vec2::new(1.5, -2.0);
    let b = Vec2::new(-0.5, 4.0);

    assert_eq!(a + b, a.add_vector(b));
    assert_eq!(a - b, a.sub_vector(b));
    assert_eq!(a * 3.0, a.scale(3.0));
    assert_eq!(3.0 * a, a.scale(3.0));
    assert_eq!(-a, a.scale(-1.0));

    let mut c = a;
    c += b;
    c -= b;
    c *= 2.0;
    assert_eq!(c, a.scale(2.0));
}

#[test]
fn test_dot_and_perp_dot() {
    let a = Vec2::new(2.0, 1.0);
    let b = Vec2::new(-1.0, 3.0);
    assert_eq!(a.dot(b), 1.0);
    assert_eq!(a.perp_dot(b), 7.0);
    assert_eq!(b.perp_dot(a), -7.0);
    assert_eq!(a.perp_dot(a), 0.0);
}

#[test]
fn test_rotation_handedness() {
    let quarter = Vec2::from_angle(FRAC_PI_2);

    assert_close(Vec2::X.rotate(quarter), Vec2::Y);
    assert_close(Vec2::X.rotate_left(quarter), Vec2::Y);
    assert_close(Vec2::X.rotate_right(quarter), Vec2::new(0.0, -1.0));
    assert_close(Vec2::Y.rotate_right(quarter), Vec2::X);

    // Right undoes left.
    let v = Vec2::new(0.3, -1.7);
    let rotor = Vec2::from_angle(0.8);
    assert_close(v.rotate_left(rotor).rotate_right(rotor), v);
}

#[test]
fn test_perp_is_counter_clockwise() {
    assert_eq!(Vec2::X.perp(), Vec2::Y);
    assert!(Vec2::X.perp_dot(Vec2::X.perp()) > 0.0);
}

#[test]
fn test_project() {
    let v = Vec2::new(3.0, 4.0);
    assert_close(v.project(Vec2::new(2.0, 0.0)), Vec2::new(3.0, 0.0));
    assert_eq!(v.project(Vec2::ZERO), Vec2::ZERO);
}

#[test]
fn test_angle_and_distance() {
    assert!((Vec2::new(0.0, 2.0).angle() - FRAC_PI_2).abs() < 1e-6);
    assert_eq!(Vec2::new(1.0, 1.0).distance(Vec2::new(4.0, 5.0)), 5.0);
}

#[test]
fn test_wrap_angle() {
    assert!((wrap_angle(3.0 * PI - 0.5) - (PI - 0.5)).abs() < 1e-5);
    assert!((wrap_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
    assert!((wrap_angle(2.0 * PI + 0.25) - 0.25).abs() < 1e-5);
    assert_eq!(wrap_angle(f32::NAN), 0.0);
}

#[test]
fn test_non_finite_detection() {
    assert!(Vec2::new(1.0, 2.0).is_finite());
    assert!(!Vec2::new(f32::NAN, 0.0).is_finite());
    assert!(!Vec2::new(0.0, f32::INFINITY).is_finite());
}
