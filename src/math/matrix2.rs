//! Matrix2 - row-major 2x2 matrix
//!
//! ```text
//! | a  b |
//! | c  d |
//! ```
//!
//! Only shape matching uses it. `inverse()` divides by the determinant
//! unconditionally; callers that can meet singular input should go through
//! `is_near_singular()` / `try_inverse()` first.

use std::fmt;
use std::ops::{Add, Mul, MulAssign, Neg, Sub};

use super::Vec2;

/// Relative singularity threshold: |det| <= EPS * ||M||_F^2
pub const SINGULAR_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Matrix2 {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Matrix2 {
    pub const ZERO: Matrix2 = Matrix2::new(0.0, 0.0, 0.0, 0.0);
    pub const IDENTITY: Matrix2 = Matrix2::new(1.0, 0.0, 0.0, 1.0);
    pub const ONE: Matrix2 = Matrix2::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    /// Outer product `u * v^T`
    #[inline]
    pub fn outer(u: Vec2, v: Vec2) -> Self {
        Self::new(u.x * v.x, u.x * v.y, u.y * v.x, u.y * v.y)
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self::new(self.a, self.c, self.b, self.d)
    }

    /// Unchecked inverse. Produces inf/NaN entries for a singular matrix.
    #[inline]
    pub fn inverse(&self) -> Self {
        (1.0 / self.determinant()) * Self::new(self.d, -self.b, -self.c, self.a)
    }

    #[inline]
    pub fn frobenius_squared(&self) -> f32 {
        self.a * self.a + self.b * self.b + self.c * self.c + self.d * self.d
    }

    /// Determinant is zero relative to the matrix's own scale (or not finite).
    #[inline]
    pub fn is_near_singular(&self) -> bool {
        let det = self.determinant();
        !det.is_finite() || det.abs() <= SINGULAR_EPSILON * self.frobenius_squared()
    }

    pub fn try_inverse(&self) -> Option<Self> {
        if self.is_near_singular() {
            None
        } else {
            Some(self.inverse())
        }
    }
}

impl fmt::Display for Matrix2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] [{}, {}]", self.a, self.b, self.c, self.d)
    }
}

impl Neg for Matrix2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.a, -self.b, -self.c, -self.d)
    }
}

impl Add for Matrix2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.a + rhs.a, self.b + rhs.b, self.c + rhs.c, self.d + rhs.d)
    }
}

impl Sub for Matrix2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.a - rhs.a, self.b - rhs.b, self.c - rhs.c, self.d - rhs.d)
    }
}

impl Mul for Matrix2 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.a * rhs.a + self.b * rhs.c,
            self.a * rhs.b + self.b * rhs.d,
            self.c * rhs.a + self.d * rhs.c,
            self.c * rhs.b + self.d * rhs.d,
        )
    }
}

impl Mul<f32> for Matrix2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.a * rhs, self.b * rhs, self.c * rhs, self.d * rhs)
    }
}

impl Mul<Matrix2> for f32 {
    type Output = Matrix2;
    fn mul(self, rhs: Matrix2) -> Matrix2 {
        rhs * self
    }
}

impl MulAssign<f32> for Matrix2 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

/// Column vector: `M * v`
impl Mul<Vec2> for Matrix2 {
    type Output = Vec2;
    fn mul(self, v: Vec2) -> Vec2 {
        Vec2::new(self.a * v.x + self.b * v.y, self.c * v.x + self.d * v.y)
    }
}

/// Operand order is free: `v * M` is the same column product as `M * v`.
/// Use `M.transpose()` for a row-vector product.
impl Mul<Matrix2> for Vec2 {
    type Output = Vec2;
    fn mul(self, m: Matrix2) -> Vec2 {
        m * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(m: Matrix2, n: Matrix2) -> bool {
        (m - n).frobenius_squared() < 1e-10
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let m = Matrix2::new(4.0, 7.0, 2.0, 6.0);
        assert_eq!(m.determinant(), 10.0);
        assert!(approx(m * m.inverse(), Matrix2::IDENTITY));
        assert!(approx(m.try_inverse().expect("invertible") * m, Matrix2::IDENTITY));
    }

    #[test]
    fn singular_matrix_has_no_checked_inverse() {
        let m = Matrix2::new(1.0, 2.0, 2.0, 4.0);
        assert!(m.is_near_singular());
        assert!(m.try_inverse().is_none());
        assert!(!m.inverse().a.is_finite());
        assert!(Matrix2::ZERO.is_near_singular());
    }

    #[test]
    fn transpose_swaps_off_diagonal() {
        let m = Matrix2::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(m.transpose(), Matrix2::new(1.0, 3.0, 2.0, 4.0));
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn vector_product_is_column_form_in_either_order() {
        let m = Matrix2::new(1.0, 2.0, 3.0, 4.0);
        let v = Vec2::new(1.0, -1.0);
        assert_eq!(m * v, Vec2::new(-1.0, -1.0));
        assert_eq!(v * m, Vec2::new(-1.0, -1.0));
        assert_eq!(Vec2::new(2.0, 5.0) * m, Vec2::new(12.0, 26.0));
        assert_eq!(v * m.transpose(), Vec2::new(-2.0, -2.0));
    }

    #[test]
    fn arithmetic_operators() {
        let m = Matrix2::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(m + Matrix2::ONE, Matrix2::new(2.0, 3.0, 4.0, 5.0));
        assert_eq!(m - m, Matrix2::ZERO);
        assert_eq!(-m, m * -1.0);
        assert_eq!(2.0 * m, m * 2.0);
        assert_eq!(m * Matrix2::IDENTITY, m);
        assert_eq!(Matrix2::outer(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)),
                   Matrix2::new(3.0, 4.0, 6.0, 8.0));
    }
}
