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

// Traits exposed in public interfaces,
// implemented on finite sets of types rather than more general
//  generic bounds in order to reduce coupling with client crates.

use std::ops::{Add, Sub, Mul, Div, Neg};
use num_traits::{Zero, One};

/// Trait for scalars with addition and multiplication.
///
/// You get primitive floats and signed integers.
/// This trait is sealed to avoid accidental commitments.
pub trait Semiring
    : Copy + PartialEq + Zero + One
    + Add<Output=Self> + Mul<Output=Self>
    + private::Sealed
{ }

/// Trait for scalars with addition, multiplication, and subtraction.
pub trait Ring: Semiring + Sub<Output=Self> + Neg<Output=Self> { }

/// Trait for real floating point scalars.
pub trait Field: Ring + Div<Output=Self> + PartialOrd {
    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
}

mod private {
    pub trait Sealed { }
}

macro_rules! impl_ring {
    ($($T:ty),*) => {$(
        impl private::Sealed for $T { }
        impl Semiring for $T { }
        impl Ring for $T { }
    )*};
}

impl_ring!{ i32, i64, f64 }

impl Field for f64 {
    #[inline(always)] fn sqrt(self) -> f64 { f64::sqrt(self) }
    #[inline(always)] fn abs(self) -> f64 { f64::abs(self) }
}
