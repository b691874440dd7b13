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

use num_integer::Integer;
use num_traits::{PrimInt, Signed};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GcdData<X> {
    /// greatest common divisor (never negative)
    pub gcd: X,
    /// bezout coefficients, `a * coeffs.0 + b * coeffs.1 == gcd`
    pub coeffs: (X, X),
}

/// Compute a greatest common divisor along with Bezout coefficients.
///
/// `extended_gcd(0, 0)` has a gcd of zero and coefficients `(1, 0)`,
/// so that the coefficients always form a primitive vector.
pub fn extended_gcd<X>(a: X, b: X) -> GcdData<X>
where
    X: PrimInt + Integer + Signed,
{
    let (a_sign, a) = (a.signum(), a.abs());
    let (b_sign, b) = (b.signum(), b.abs());

    // Order is (old, current).
    let mut s = (X::one(), X::zero());
    let mut t = (X::zero(), X::one());
    let mut r = (a, b);
    while r.1 != X::zero() {
        let (div, rem) = r.0.div_rem(&r.1);
        r = (r.1, rem);
        s = (s.1, s.0 - div * s.1);
        t = (t.1, t.0 - div * t.1);
    }

    // signum(0) == 0 would otherwise erase a coefficient
    let a_sign = if a_sign == X::zero() { X::one() } else { a_sign };
    let b_sign = if b_sign == X::zero() { X::one() } else { b_sign };
    GcdData {
        gcd: r.0,
        coeffs: (a_sign * s.0, b_sign * t.0),
    }
}

/// Compute a greatest common divisor.
pub fn gcd<X>(a: X, b: X) -> X
where
    X: PrimInt + Integer + Signed,
{ extended_gcd(a, b).gcd }
