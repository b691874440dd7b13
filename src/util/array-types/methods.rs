/* ************************************************************************ **
** This file is part of rsp2, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of rsp2 is provided under this permissive license, **
** and that the project as a whole is licensed under the GPL 3.0.           **
** ************************************************************************ */

use crate::traits::{Semiring, Ring, Field};
use crate::types::*;

// ---------------------------------------------------------------------------
// ------------------------------ PUBLIC API ---------------------------------

impl<X> V3<X> {
    /// Construct a fixed-size vector from a function on indices.
    #[inline(always)]
    pub fn from_fn<F>(mut f: F) -> Self
    where F: FnMut(usize) -> X,
    { V3([f(0), f(1), f(2)]) }

    /// Construct a fixed-size vector from a fallible function on indices.
    #[inline(always)]
    pub fn try_from_fn<E, F>(mut f: F) -> Result<Self, E>
    where F: FnMut(usize) -> Result<X, E>,
    { Ok(V3([f(0)?, f(1)?, f(2)?])) }

    /// Apply a function to each element.
    #[inline]
    pub fn map<B, F>(self, mut f: F) -> V3<B>
    where F: FnMut(X) -> B,
    {
        let V3([a, b, c]) = self;
        V3([f(a), f(b), f(c)])
    }

    /// Apply a fallible function to each element, with short-circuiting.
    #[inline]
    pub fn try_map<E, B, F>(self, mut f: F) -> Result<V3<B>, E>
    where F: FnMut(X) -> Result<B, E>,
    {
        let V3([a, b, c]) = self;
        Ok(V3([f(a)?, f(b)?, f(c)?]))
    }
}

impl<X: Semiring> V3<X> {
    /// Get a zero vector.
    #[inline(always)]
    pub fn zero() -> Self
    { V3([X::zero(); 3]) }

    /// Get a basis vector.
    #[inline]
    pub fn axis_unit(i: usize) -> Self {
        assert!(i < 3, "Invalid axis for 3d vector: {}", i);
        V3::from_fn(|k| if k == i { X::one() } else { X::zero() })
    }

    /// Get the inner product of two vectors.
    ///
    /// It is recommended you write this as `V3::dot(a, b)`, rather than `a.dot(b)`.
    #[inline(always)]
    pub fn dot(&self, other: &Self) -> X
    { self[0] * other[0] + self[1] * other[1] + self[2] * other[2] }

    /// Get the vector's squared magnitude.
    #[inline(always)]
    pub fn sqnorm(&self) -> X
    { self.dot(self) }

    /// Perform elementwise multiplication.
    #[inline(always)]
    pub fn mul_diag(&self, other: &Self) -> Self
    { V3::from_fn(|i| self[i] * other[i]) }
}

impl<X: Ring> V3<X> {
    /// Cross-product.
    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        V3([
            self[1] * other[2] - self[2] * other[1],
            self[2] * other[0] - self[0] * other[2],
            self[0] * other[1] - self[1] * other[0],
        ])
    }
}

impl<X: Field> V3<X> {
    /// Get the vector's magnitude.
    #[inline(always)]
    pub fn norm(&self) -> X
    { self.sqnorm().sqrt() }

    /// Normalize the vector.
    #[inline(always)]
    pub fn unit(&self) -> Self
    { *self / self.norm() }
}

impl V3<f64> {
    /// Round each element to the nearest integer.
    #[inline]
    pub fn round(&self) -> V3<f64>
    { self.map(f64::round) }

    /// Reduce each element into `[0, 1)`.
    #[inline]
    pub fn modulo_one(&self) -> V3<f64>
    { self.map(|x| x - x.floor()) }
}

/// Inner product of vectors.
#[inline(always)]
pub fn dot<X: Semiring>(a: &V3<X>, b: &V3<X>) -> X
{ a.dot(b) }

// ---------------------------------------------------------------------------

impl<X> M33<X> {
    /// Construct a matrix from a function on (row, column) indices.
    #[inline(always)]
    pub fn from_fn<F>(mut f: F) -> Self
    where F: FnMut(usize, usize) -> X,
    { M3([V3::from_fn(|c| f(0, c)), V3::from_fn(|c| f(1, c)), V3::from_fn(|c| f(2, c))]) }

    /// Construct a matrix from a 2D array of rows.
    #[inline(always)]
    pub fn from_array(arr: [[X; 3]; 3]) -> Self {
        let [a, b, c] = arr;
        M3([V3(a), V3(b), V3(c)])
    }

    /// Construct a matrix whose columns are the given vectors.
    #[inline]
    pub fn from_cols(cols: [V3<X>; 3]) -> Self
    where X: Copy,
    { M3(cols).t() }

    /// Cast into a plain `[[X; 3]; 3]`.
    #[inline(always)]
    pub fn into_array(self) -> [[X; 3]; 3] {
        let M3([V3(a), V3(b), V3(c)]) = self;
        [a, b, c]
    }

    /// Map each scalar element of a matrix.
    #[inline]
    pub fn map<B, F>(self, mut f: F) -> M33<B>
    where F: FnMut(X) -> B,
    {
        let M3([a, b, c]) = self;
        M3([a.map(&mut f), b.map(&mut f), c.map(&mut f)])
    }

    /// Apply a fallible function to each scalar element, with short-circuiting.
    #[inline]
    pub fn try_map<E, B, F>(self, mut f: F) -> Result<M33<B>, E>
    where F: FnMut(X) -> Result<B, E>,
    {
        let M3([a, b, c]) = self;
        Ok(M3([a.try_map(&mut f)?, b.try_map(&mut f)?, c.try_map(&mut f)?]))
    }
}

impl<X: Copy> M33<X> {
    /// Matrix transpose.
    #[inline]
    pub fn t(&self) -> Self
    { M33::from_fn(|r, c| self[c][r]) }

    /// Get a column as a vector.
    #[inline]
    pub fn col(&self, c: usize) -> V3<X>
    { V3::from_fn(|r| self[r][c]) }
}

impl<X: Semiring> M33<X> {
    /// Construct the identity matrix.
    #[inline(always)]
    pub fn eye() -> Self
    { M33::from_fn(|r, c| if r == c { X::one() } else { X::zero() }) }

    /// Construct the zero matrix.
    #[inline(always)]
    pub fn zero() -> Self
    { M3([V3::zero(); 3]) }

    /// Sum of the diagonal.
    #[inline]
    pub fn trace(&self) -> X
    { self[0][0] + self[1][1] + self[2][2] }
}

impl<X: Ring> M33<X> {
    /// Matrix determinant.
    pub fn det(&self) -> X {
        let [
            [a0, a1, a2],
            [b0, b1, b2],
            [c0, c1, c2],
        ] = self.into_array();

        X::zero()
        + a0 * b1 * c2
        + a1 * b2 * c0
        + a2 * b0 * c1
        - a0 * b2 * c1
        - a1 * b0 * c2
        - a2 * b1 * c0
    }

    /// Transpose of the cofactor matrix.
    ///
    /// For integer matrices this is the exact inverse times the determinant.
    pub fn adjugate(&self) -> Self {
        let m = self;
        let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
            m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
        };
        M33::from_array([
            [cof(1, 2, 1, 2), cof(0, 2, 2, 1), cof(0, 1, 1, 2)],
            [cof(1, 2, 2, 0), cof(0, 2, 0, 2), cof(0, 1, 2, 0)],
            [cof(1, 2, 0, 1), cof(0, 2, 1, 0), cof(0, 1, 0, 1)],
        ])
    }
}

/// Matrix inverse.
///
/// Singular input produces non-finite elements; callers that can receive
/// degenerate matrices are expected to check the determinant first.
pub fn inv(m: &M33<f64>) -> M33<f64> {
    let det = m.det();
    m.adjugate().map(|x| x / det)
}

impl M33<f64> {
    /// Matrix inverse.
    #[inline(always)]
    pub fn inv(&self) -> M33<f64>
    { inv(self) }
}

// ---------------------------------------------------------------------------
