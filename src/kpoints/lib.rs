//! Symmetry reduction of k-points.
//!
//! A regular mesh of `m0 x m1 x m2` points in reciprocal space is addressed by
//! integer triples `g` with `0 <= g_i < m_i`, each standing for the fractional
//! point `(g + s/2) / m` where `s` is a shift of 0 or 1 along each axis.
//! Grid points are numbered `g0 + m0 * (g1 + m1 * g2)`.
//!
//! Rotations are always supplied in the real-space convention of
//! `rsp2_structure::SymOp`; their action on reciprocal coordinates is
//! handled internally.

#[macro_use] extern crate log;
#[macro_use] extern crate serde_derive;
#[cfg(test)] #[macro_use] extern crate rsp2_assert_close;

use thiserror::Error;

mod grid;
mod group;
mod mesh;
mod triplets;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("mesh is incompatible with the point group: {0}")]
    MeshIncompatible(String),

    #[error("not a point group of the lattice: {0}")]
    InvalidPointGroup(String),

    #[error(transparent)]
    Structure(#[from] rsp2_structure::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// How the work of [`triplets`] is divided between cores.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all="kebab-case")]
pub enum Threading {
    /// Each irreducible point is handled by a rayon task.
    Rayon,

    /// Everything runs on the calling thread.
    Serial,
}

impl Default for Threading {
    fn default() -> Self { Threading::Rayon }
}

pub use crate::grid::Grid;
pub use crate::mesh::{ir_mesh, stabilized_mesh, ir_kpoints, IrMesh};
pub use crate::triplets::{triplets, Triplets};
