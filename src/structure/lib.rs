//! Periodic cells and the search for their symmetry operations.
//!
//! The conventions used throughout:
//!
//! * A [`Lattice`] is a matrix whose **rows** are the lattice vectors,
//!   so that `cart = frac * lattice` for row vectors.
//! * A [`SymOp`] acts on fractional **column** vectors as `x' = R x + t`.

#[macro_use] extern crate log;
#[macro_use] extern crate itertools;
#[macro_use] extern crate lazy_static;
#[cfg(test)] #[macro_use] extern crate rsp2_assert_close;

use thiserror::Error;

mod core;
mod algo;
mod oper;
mod util;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid lattice: {0}")]
    InvalidLattice(String),

    #[error("invalid cell: {0}")]
    InvalidCell(String),

    #[error("lattice reduction did not converge after {0} iterations")]
    ReductionDidNotConverge(usize),

    #[error("{count} operations found at tolerance {tol:e} do not form a group")]
    NotAGroup { count: usize, tol: f64 },

    #[error("not nearly an integer: {0}")]
    NonIntegerRotation(f64),
}

pub type Result<T> = std::result::Result<T, Error>;

//---------------------------
// public reexports; API

pub use crate::core::lattice::Lattice;
pub use crate::core::cell::Cell;

pub use crate::oper::symmops::{SymOp, OperationSet, FracTrans, FracOp};

pub use crate::algo::reduction::{niggli_reduce, smallest_lattice, LatticeReduction, Unimodular, MAX_REDUCTION_ITERATIONS};
pub use crate::algo::holohedry::{lattice_point_group, Holohedry};
pub use crate::algo::distance::{periodic_distance, NearestImageFinder};
pub use crate::algo::primitive::{pure_translations, find_primitive, primitive, PrimitiveCell};
pub use crate::algo::search::{search, multiplicity, max_multiplicity};
pub use crate::algo::group::generate_finite_group;

pub use crate::util::wrap_frac;
