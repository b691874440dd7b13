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

use std::ops::{Deref, DerefMut};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

// ---------------------------------------------------------------------------

/// A 3-dimensional vector with operations for linear algebra.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct V3<X=f64>(pub [X; 3]);

/// A linear algebra dense matrix with 3 rows.
///
/// Matrices are containers of row vectors.  Fractional coordinates and
/// lattice vectors in this workspace are generally row vectors, so the
/// product `v * &m` is the common form; `&m * v` treats `v` as a column.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct M3<V>(pub [V; 3]);

/// A square dense 3x3 matrix.
pub type M33<X=f64> = M3<V3<X>>;

// ---------------------------------------------------------------------------
// Both types behave generally like their backing array type.

macro_rules! impl_array_like {
    ($($Cn:ident<$T:ident>),*) => {$(
        impl<$T> Deref for $Cn<$T> {
            type Target = [$T; 3];

            #[inline(always)]
            fn deref(&self) -> &Self::Target
            { &self.0 }
        }

        impl<$T> DerefMut for $Cn<$T> {
            #[inline(always)]
            fn deref_mut(&mut self) -> &mut Self::Target
            { &mut self.0 }
        }

        impl<'a, $T> IntoIterator for &'a $Cn<$T> {
            type Item = &'a $T;
            type IntoIter = std::slice::Iter<'a, $T>;

            #[inline(always)]
            fn into_iter(self) -> Self::IntoIter
            { self.0.iter() }
        }

        // forward the debug impl without a surrounding "V3(...)", so that
        // debug output is valid JSON and Python for most element types
        impl<$T: fmt::Debug> fmt::Debug for $Cn<$T> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
            { fmt::Debug::fmt(&self.0, f) }
        }

        impl<$T: fmt::Display> fmt::Display for $Cn<$T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "[")?;
                fmt::Display::fmt(&self[0], f)?;
                for x in &self[1..] {
                    write!(f, ", ")?;
                    fmt::Display::fmt(x, f)?;
                }
                write!(f, "]")
            }
        }
    )*};
}

impl_array_like!{ V3<X>, M3<V> }
