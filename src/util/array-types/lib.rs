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

//! Fixed-size 3d vector and matrix types used throughout the workspace.

mod types;
mod traits;
mod ops;
mod methods;
mod close;

pub use crate::types::{V3, M3, M33};
pub use crate::traits::{Semiring, Ring, Field};
pub use crate::methods::{dot, inv};
