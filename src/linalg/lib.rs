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

//! Exact integer linear algebra on small matrices.
//!
//! Everything here works on `i64` and is meant for the tiny matrices that
//! show up in crystallography (3x3 transforms, stacks of a few rotations).

mod gcd;
mod hnf;
mod snf;

pub use crate::gcd::{GcdData, extended_gcd, gcd};
pub use crate::hnf::{Hnf, row_lattice_basis, nullspace_of_row};
pub use crate::snf::{Snf, solve_congruences};
