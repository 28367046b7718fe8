//! Vector space abstraction shared by every curve family.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use glam::{DVec2, DVec3};

/// A real vector space in which control points, tangents and curve points live.
///
/// Curves only ever form affine and linear combinations of their inputs, so
/// scalars (`f64`), planar points (`DVec2`) and spatial points (`DVec3`) are
/// all valid coordinate types.
pub trait VectorSpace:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
{
    const ZERO: Self;

    fn dot(self, rhs: Self) -> f64;

    fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    fn distance(self, rhs: Self) -> f64 {
        (self - rhs).length()
    }

    fn lerp(self, rhs: Self, s: f64) -> Self {
        self + (rhs - self) * s
    }

    fn is_finite(self) -> bool {
        self.dot(self).is_finite()
    }
}

impl VectorSpace for f64 {
    const ZERO: Self = 0.0;

    fn dot(self, rhs: Self) -> f64 {
        self * rhs
    }

    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl VectorSpace for DVec2 {
    const ZERO: Self = DVec2::ZERO;

    fn dot(self, rhs: Self) -> f64 {
        DVec2::dot(self, rhs)
    }

    fn is_finite(self) -> bool {
        DVec2::is_finite(self)
    }
}

impl VectorSpace for DVec3 {
    const ZERO: Self = DVec3::ZERO;

    fn dot(self, rhs: Self) -> f64 {
        DVec3::dot(self, rhs)
    }

    fn is_finite(self) -> bool {
        DVec3::is_finite(self)
    }
}
