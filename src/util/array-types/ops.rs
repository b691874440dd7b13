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

use std::ops::{Add, Sub, Neg, Mul, Div};
use std::ops::{AddAssign, SubAssign, MulAssign, DivAssign};

use crate::traits::{Semiring, Ring, Field};
use crate::types::*;

// NOTE: Operator impls are deliberately between same-typed operands,
//       rather than e.g. V3<T> and V3<U> where T: Add<U>.
//       Generic output types wreck type inference at the use site.

// ---------------------------------------------------------------------------
// elementwise ops, for every combination of owned and borrowed operands

macro_rules! impl_elementwise {
    ($Ty:ident, $Bound:ident, $Trait:ident, $method:ident, $op:tt) => {
        impl_elementwise!{@one [] $Ty, $Bound, $Trait, $method, $op, [    ] [    ]}
        impl_elementwise!{@one ['a] $Ty, $Bound, $Trait, $method, $op, [&'a] [    ]}
        impl_elementwise!{@one ['b] $Ty, $Bound, $Trait, $method, $op, [    ] [&'b]}
        impl_elementwise!{@one ['a 'b] $Ty, $Bound, $Trait, $method, $op, [&'a] [&'b]}
    };
    (@one [$($lt:tt)*] $Ty:ident, $Bound:ident, $Trait:ident, $method:ident, $op:tt, [$($ra:tt)*] [$($rb:tt)*]) => {
        impl<$($lt,)* X: $Bound> $Trait<$($rb)* $Ty<X>> for $($ra)* $Ty<X> {
            type Output = $Ty<X>;

            #[inline]
            fn $method(self, other: $($rb)* $Ty<X>) -> $Ty<X>
            { $Ty::from_fn(|k| self[k] $op other[k]) }
        }
    };
}

impl_elementwise!{V3, Semiring, Add, add, +}
impl_elementwise!{V3, Ring, Sub, sub, -}

// Matrix addition operates on rows.
macro_rules! impl_mat_elementwise {
    ($Bound:ident, $Trait:ident, $method:ident, $op:tt) => {
        impl_mat_elementwise!{@one [] $Bound, $Trait, $method, $op, [    ] [    ]}
        impl_mat_elementwise!{@one ['a 'b] $Bound, $Trait, $method, $op, [&'a] [&'b]}
    };
    (@one [$($lt:tt)*] $Bound:ident, $Trait:ident, $method:ident, $op:tt, [$($ra:tt)*] [$($rb:tt)*]) => {
        impl<$($lt,)* X: $Bound> $Trait<$($rb)* M33<X>> for $($ra)* M33<X> {
            type Output = M33<X>;

            #[inline]
            fn $method(self, other: $($rb)* M33<X>) -> M33<X>
            { M3([self[0] $op other[0], self[1] $op other[1], self[2] $op other[2]]) }
        }
    };
}

impl_mat_elementwise!{Semiring, Add, add, +}
impl_mat_elementwise!{Ring, Sub, sub, -}

// ---------------------------------------------------------------------------
// unary ops

impl<X: Ring> Neg for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn neg(self) -> V3<X>
    { V3::from_fn(|k| -self[k]) }
}

impl<'a, X: Ring> Neg for &'a V3<X> {
    type Output = V3<X>;

    #[inline]
    fn neg(self) -> V3<X>
    { -*self }
}

impl<X: Ring> Neg for M33<X> {
    type Output = M33<X>;

    #[inline]
    fn neg(self) -> M33<X>
    { M3([-self[0], -self[1], -self[2]]) }
}

// ---------------------------------------------------------------------------
// scalar ops

impl<X: Semiring> Mul<X> for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn mul(self, scalar: X) -> V3<X>
    { V3::from_fn(|k| self[k] * scalar) }
}

impl<'a, X: Semiring> Mul<X> for &'a V3<X> {
    type Output = V3<X>;

    #[inline]
    fn mul(self, scalar: X) -> V3<X>
    { *self * scalar }
}

impl<X: Field> Div<X> for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn div(self, scalar: X) -> V3<X>
    { V3::from_fn(|k| self[k] / scalar) }
}

impl<'a, X: Field> Div<X> for &'a V3<X> {
    type Output = V3<X>;

    #[inline]
    fn div(self, scalar: X) -> V3<X>
    { *self / scalar }
}

impl<X: Semiring> Mul<X> for M33<X> {
    type Output = M33<X>;

    #[inline]
    fn mul(self, scalar: X) -> M33<X>
    { M3([self[0] * scalar, self[1] * scalar, self[2] * scalar]) }
}

// NOTE: the orphan rules prevent us from impl-ing these "for X" so
//       each scalar type gets its own impl.
macro_rules! impl_scalar_lhs {
    ($($T:ty),*) => {$(
        impl Mul<V3<$T>> for $T {
            type Output = V3<$T>;

            #[inline(always)]
            fn mul(self, vector: V3<$T>) -> V3<$T>
            { vector * self }
        }

        impl<'a> Mul<&'a V3<$T>> for $T {
            type Output = V3<$T>;

            #[inline(always)]
            fn mul(self, vector: &'a V3<$T>) -> V3<$T>
            { *vector * self }
        }
    )*};
}

impl_scalar_lhs!{ i32, i64, f64 }

// ---------------------------------------------------------------------------
// assign ops

impl<X, B> AddAssign<B> for V3<X> where V3<X>: Copy + Add<B, Output=V3<X>> {
    #[inline(always)]
    fn add_assign(&mut self, rhs: B)
    { *self = *self + rhs; }
}

impl<X, B> SubAssign<B> for V3<X> where V3<X>: Copy + Sub<B, Output=V3<X>> {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: B)
    { *self = *self - rhs; }
}

// vector *= scalar;
// vector *= matrix;   (row vectors)
impl<X, B> MulAssign<B> for V3<X> where V3<X>: Copy + Mul<B, Output=V3<X>> {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: B)
    { *self = *self * rhs; }
}

impl<X, B> DivAssign<B> for V3<X> where V3<X>: Copy + Div<B, Output=V3<X>> {
    #[inline(always)]
    fn div_assign(&mut self, rhs: B)
    { *self = *self / rhs; }
}

// ---------------------------------------------------------------------------
// matrix products

// matrix * column vector
impl<'m, X: Semiring> Mul<V3<X>> for &'m M33<X> {
    type Output = V3<X>;

    #[inline]
    fn mul(self, vector: V3<X>) -> V3<X>
    { V3::from_fn(|r| row_dot(&self[r], &vector)) }
}

impl<'m, 'v, X: Semiring> Mul<&'v V3<X>> for &'m M33<X> {
    type Output = V3<X>;

    #[inline]
    fn mul(self, vector: &'v V3<X>) -> V3<X>
    { self * *vector }
}

// row vector * matrix
impl<'m, X: Semiring> Mul<&'m M33<X>> for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn mul(self, matrix: &'m M33<X>) -> V3<X> {
        V3::from_fn(|c| {
            (0..3).fold(X::zero(), |acc, i| acc + self[i] * matrix[i][c])
        })
    }
}

impl<'m, 'v, X: Semiring> Mul<&'m M33<X>> for &'v V3<X> {
    type Output = V3<X>;

    #[inline]
    fn mul(self, matrix: &'m M33<X>) -> V3<X>
    { *self * matrix }
}

// matrix * matrix
impl<'a, 'b, X: Semiring> Mul<&'b M33<X>> for &'a M33<X> {
    type Output = M33<X>;

    #[inline]
    fn mul(self, other: &'b M33<X>) -> M33<X> {
        M33::from_fn(|r, c| {
            (0..3).fold(X::zero(), |acc, i| acc + self[r][i] * other[i][c])
        })
    }
}

#[inline(always)]
fn row_dot<X: Semiring>(a: &V3<X>, b: &V3<X>) -> X
{ a[0] * b[0] + a[1] * b[1] + a[2] * b[2] }

// ---------------------------------------------------------------------------
