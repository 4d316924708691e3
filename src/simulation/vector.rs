//! Two-dimensional vector math.
//!
//! [`Vec2`] is a plain `Copy` value. Every operation returns a new vector, and the
//! zero vector is the associated constant [`Vec2::ZERO`] rather than shared state.
//! Scaling and vector addition are distinct operations so "vector × scalar" can
//! never be confused with "vector × vector".

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A 2D vector of `f32` components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    /// Unit vector along +x.
    pub const X: Vec2 = Vec2 { x: 1.0, y: 0.0 };
    /// Unit vector along +y.
    pub const Y: Vec2 = Vec2 { x: 0.0, y: 1.0 };

    /// Creates a vector from its components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit rotor `(cos θ, sin θ)` encoding the angle `theta`.
    pub fn from_angle(theta: f32) -> Self {
        Self::new(theta.cos(), theta.sin())
    }

    /// Angle of the vector measured counter-clockwise from +x.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Component-wise sum.
    pub fn add_vector(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference.
    pub fn sub_vector(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }

    /// Multiplies both components by `factor`.
    pub fn scale(self, factor: f32) -> Vec2 {
        Vec2::new(self.x * factor, self.y * factor)
    }

    /// Dot product.
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Perpendicular dot product (2D cross product), `self.x * other.y - self.y * other.x`.
    pub fn perp_dot(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Squared length.
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point.
    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Unit vector with the same direction.
    ///
    /// A zero-length vector normalizes to [`Vec2::ZERO`].
    pub fn normalize(self) -> Vec2 {
        let len = self.length();
        if len == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(self.x / len, self.y / len)
    }

    /// Alias of [`Vec2::normalize`].
    pub fn unit(self) -> Vec2 {
        self.normalize()
    }

    /// Counter-clockwise perpendicular `(-y, x)`.
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    /// Rotates `self` counter-clockwise by the angle encoded in the unit rotor
    /// `rotor = (cos θ, sin θ)`.
    pub fn rotate(self, rotor: Vec2) -> Vec2 {
        Vec2::new(
            self.x * rotor.x - self.y * rotor.y,
            self.x * rotor.y + self.y * rotor.x,
        )
    }

    /// Rotates `self` clockwise by the angle encoded in `rotor`.
    pub fn rotate_right(self, rotor: Vec2) -> Vec2 {
        self.rotate(Vec2::new(rotor.x, -rotor.y))
    }

    /// Rotates `self` counter-clockwise by the angle encoded in `rotor`.
    pub fn rotate_left(self, rotor: Vec2) -> Vec2 {
        self.rotate(rotor)
    }

    /// Projection of `self` onto `onto`. Projecting onto a zero vector yields zero.
    pub fn project(self, onto: Vec2) -> Vec2 {
        let denom = onto.length_squared();
        if denom == 0.0 {
            return Vec2::ZERO;
        }
        onto.scale(self.dot(onto) / denom)
    }

    /// Returns `true` when both components are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        self.add_vector(rhs)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        self.sub_vector(rhs)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        self.scale(rhs)
    }
}

impl Mul<Vec2> for f32 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Vec2 {
        rhs.scale(self)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl From<Vec2> for geo::Point<f32> {
    fn from(v: Vec2) -> Self {
        geo::Point::new(v.x, v.y)
    }
}

/// Wraps an angle into `(-π, π]`. NaN maps to zero.
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};

    if !angle.is_finite() {
        return if angle.is_nan() { 0.0 } else { angle };
    }
    let mut wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped -= TAU;
    }
    wrapped
}
