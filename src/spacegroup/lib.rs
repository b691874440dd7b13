//! Identification of space group types.
//!
//! Given the symmetry operations of a cell (see `rsp2_structure::search`),
//! [`classify`] finds which of the 230 space group types they belong to,
//! along with the transformation to the standard setting of that type.

#[macro_use] extern crate log;
#[macro_use] extern crate lazy_static;
#[cfg(test)] #[macro_use] extern crate rsp2_assert_close;

use thiserror::Error;

mod centering;
mod pointgroup;
mod hall;
mod database;
mod axes;
mod classify;

#[derive(Debug, Error)]
pub enum Error {
    #[error("the operations match no space group type")]
    NoMatch,

    #[error("bad hall symbol: {0}")]
    BadHallSymbol(String),

    #[error("inconsistent symmetry operations: {0}")]
    InconsistentOperations(String),

    #[error(transparent)]
    Structure(#[from] rsp2_structure::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub use crate::centering::Centering;
pub use crate::pointgroup::PointGroup;
pub use crate::hall::HallSymbol;
pub use crate::database::{SpacegroupType, Setting, OriginChoice, spacegroup_types, spacegroup_type};
pub use crate::axes::{bravais_lattice, BravaisLattice};
pub use crate::classify::{classify, classify_with_tol, classify_with, ClassifyOptions, SpacegroupInfo};
