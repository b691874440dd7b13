//! Approximate equality for floating point data.
//!
//! `assert_close!` is for tests; `close` is the predicate used at runtime
//! wherever a tolerance decides whether two quantities are the same.
//!
//! ```text
//! assert_close!(a, b);
//! assert_close!(abs=1e-8, a, b);
//! assert_close!(rel=1e-6, abs=1e-8, a, b, "while checking {}", what);
//! ```

use std::fmt;

/// Relative tolerance used by `assert_close!` when none is given.
pub const DEFAULT_NONZERO_TOL: f64 = 1e-9;

#[macro_export]
macro_rules! assert_close {
    ($($t:tt)*) => {
        $crate::__assert_close_parse!{
            tol: ($crate::DEFAULT_NONZERO_TOL, 0.0),
            rest: [$($t)*]
        }
    };
}

#[macro_export]
macro_rules! debug_assert_close {
    ($($t:tt)*) => {{
        #[cfg(debug_assertions)] {
            $crate::assert_close!{$($t)*}
        }
    }};
}

// Keyword arguments are peeled off one at a time; whatever remains is
// `left, right` and an optional panic message.
#[doc(hidden)]
#[macro_export]
macro_rules! __assert_close_parse {
    (tol: ($rel:expr, $abs:expr), rest: [rel=$new:expr, $($rest:tt)*]) => {
        $crate::__assert_close_parse!{ tol: ($new, $abs), rest: [$($rest)*] }
    };
    (tol: ($rel:expr, $abs:expr), rest: [abs=$new:expr, $($rest:tt)*]) => {
        $crate::__assert_close_parse!{ tol: ($rel, $new), rest: [$($rest)*] }
    };
    (tol: $tol:tt, rest: [$a:expr, $b:expr $(,)*]) => {
        $crate::__assert_close_parse!{ @check $tol, $a, $b, ("not nearly equal!") }
    };
    (tol: $tol:tt, rest: [$a:expr, $b:expr, $($fmt:tt)+]) => {
        $crate::__assert_close_parse!{ @check $tol, $a, $b, ($($fmt)+) }
    };
    (@check ($rel:expr, $abs:expr), $a:expr, $b:expr, ($($fmt:tt)+)) => {{
        let (left, right) = ($a, $b);
        let tol = $crate::Tolerances { rel: $rel, abs: $abs };
        if let Err(e) = $crate::CheckClose::check_close(&left, &right, tol) {
            panic!(
                "{} (tolerances: rel={}, abs={})\n left: {:?}\nright: {:?}\n{}",
                format!($($fmt)+), tol.rel, tol.abs, left, right, e,
            );
        }
    }};
}

/// Scalar comparison underlying every `CheckClose` impl.
///
/// Two values are close when they differ by at most `abs`, or by at most
/// `rel` times the larger magnitude.  Equal infinities are close; NaN is
/// never close to anything.
#[inline]
pub fn scalars_close(a: f64, b: f64, tol: Tolerances) -> bool {
    assert!(tol.rel >= 0.0 && tol.abs >= 0.0, "negative tolerance: {:?}", tol);

    if a == b {
        return true;
    }
    if a.is_infinite() || b.is_infinite() {
        return false;
    }
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= tol.abs.max(tol.rel * scale)
}

/// Absolute-tolerance comparison of every scalar in `a` and `b`.
#[inline]
pub fn close<T: ?Sized + CheckClose>(a: &T, b: &T, tol: f64) -> bool
{ a.check_close(b, Tolerances { abs: tol, rel: 0.0 }).is_ok() }

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerances<T = f64> {
    pub abs: T,
    pub rel: T,
}

/// The first pair of scalars that failed a comparison.
#[derive(Debug)]
pub struct CheckCloseError<T = f64> {
    pub values: (T, T),
    pub tol: Tolerances<T>,
}

impl<T: fmt::Debug> fmt::Display for CheckCloseError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (left, right) = &self.values;
        writeln!(f, "first mismatch:")?;
        writeln!(f, "  left: {:?}", left)?;
        writeln!(f, " right: {:?}", right)?;
        write!(f, "   tol: {:?}", self.tol)
    }
}

impl<T: fmt::Debug> std::error::Error for CheckCloseError<T> {}

/// Elementwise approximate equality.
pub trait CheckClose<Rhs: ?Sized = Self> {
    type Scalar: fmt::Debug;

    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>;
}

impl CheckClose for f64 {
    type Scalar = f64;

    #[inline]
    fn check_close(&self, other: &f64, tol: Tolerances) -> Result<(), CheckCloseError<f64>> {
        match scalars_close(*self, *other, tol) {
            true => Ok(()),
            false => Err(CheckCloseError { values: (*self, *other), tol }),
        }
    }
}

impl<'a, T: ?Sized + CheckClose> CheckClose for &'a T {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { (**self).check_close(*other, tol) }
}

impl<T: CheckClose> CheckClose for [T] {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>> {
        assert_eq!(self.len(), other.len(), "length mismatch in check_close");
        for (a, b) in self.iter().zip(other) {
            a.check_close(b, tol)?;
        }
        Ok(())
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { self[..].check_close(&other[..], tol) }
}

impl<T: CheckClose, const N: usize> CheckClose for [T; N] {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { self[..].check_close(&other[..], tol) }
}
