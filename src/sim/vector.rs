//! 2-D vector and point primitives
//!
//! Both are thin value wrappers over `glam::DVec2`. Keeping points and
//! displacements as separate types stops a position from being added to a
//! position by accident.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::DegenerateVectorError;

/// Below this magnitude a vector has no usable direction
const DEGENERATE_EPSILON: f64 = 1e-12;

/// A displacement or velocity in field units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector2D(DVec2);

impl Vector2D {
    pub const ZERO: Self = Self(DVec2::ZERO);
    pub const UP: Self = Self(DVec2::Y);
    pub const DOWN: Self = Self(DVec2::NEG_Y);
    pub const LEFT: Self = Self(DVec2::NEG_X);
    pub const RIGHT: Self = Self(DVec2::X);

    #[inline]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self(DVec2::new(dx, dy))
    }

    #[inline]
    pub fn dx(self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn dy(self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn magnitude(self) -> f64 {
        self.0.length()
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.0.dot(other.0)
    }

    /// Unit vector in the same direction
    pub fn unit(self) -> Result<Self, DegenerateVectorError> {
        let len = self.magnitude();
        if len < DEGENERATE_EPSILON || !len.is_finite() {
            return Err(DegenerateVectorError);
        }
        Ok(Self(self.0 / len))
    }

    /// Unit vector rotated 90° counter-clockwise
    pub fn normal(self) -> Result<Self, DegenerateVectorError> {
        self.unit().map(|u| Self(u.0.perp()))
    }

    /// Length of the projection onto `target`
    pub fn scalar_project(self, target: Self) -> Result<f64, DegenerateVectorError> {
        Ok(self.dot(target.unit()?))
    }

    /// Component of `self` along `target`
    pub fn vector_project(self, target: Self) -> Result<Self, DegenerateVectorError> {
        let unit = target.unit()?;
        Ok(unit * self.dot(unit))
    }

    /// Rotate counter-clockwise by `radians`
    pub fn rotated(self, radians: f64) -> Self {
        Self(DVec2::from_angle(radians).rotate(self.0))
    }
}

impl Add for Vector2D {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Vector2D {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self(self.0 * scalar)
    }
}

impl Mul<Vector2D> for f64 {
    type Output = Vector2D;
    fn mul(self, v: Vector2D) -> Vector2D {
        v * self
    }
}

impl Div<f64> for Vector2D {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self(self.0 / scalar)
    }
}

impl Neg for Vector2D {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// A position in the field (origin at the bottom-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point2D(DVec2);

impl Point2D {
    pub const ORIGIN: Self = Self(DVec2::ZERO);

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    #[inline]
    pub fn x(self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        self.0.distance(other.0)
    }

    /// Displacement from `self` to `other`
    #[inline]
    pub fn to(self, other: Self) -> Vector2D {
        other - self
    }
}

impl Add<Vector2D> for Point2D {
    type Output = Self;
    fn add(self, v: Vector2D) -> Self {
        Self(self.0 + v.0)
    }
}

impl AddAssign<Vector2D> for Point2D {
    fn add_assign(&mut self, v: Vector2D) {
        self.0 += v.0;
    }
}

impl Sub<Vector2D> for Point2D {
    type Output = Self;
    fn sub(self, v: Vector2D) -> Self {
        Self(self.0 - v.0)
    }
}

impl Sub for Point2D {
    type Output = Vector2D;
    fn sub(self, other: Self) -> Vector2D {
        Vector2D(self.0 - other.0)
    }
}
