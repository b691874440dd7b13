//! Crystal symmetry for periodic structures.
//!
//! The work is split across several crates, all re-exported here:
//!
//! * [`structure`]: cells, lattice reduction, and the search for symmetry
//!   operations.
//! * [`spacegroup`]: identification of the space group type.
//! * [`kpoints`]: symmetry reduction of reciprocal-space meshes.
//!
//! The functions at the root of this crate tie these together, with their
//! tolerances and options taken from [`Settings`].

#[macro_use] extern crate log;
#[macro_use] extern crate serde_derive;

use thiserror::Error;

pub use rsp2_array_types as array_types;
pub use rsp2_structure as structure;
pub use rsp2_spacegroup as spacegroup;
pub use rsp2_kpoints as kpoints;

pub mod config;
pub mod logging;

pub use crate::config::{Settings, YamlRead};
pub use crate::logging::GlobalLogger;

pub use rsp2_structure::{Cell, Lattice, SymOp, OperationSet};
pub use rsp2_spacegroup::SpacegroupInfo;
pub use rsp2_kpoints::{IrMesh, Triplets, Threading};

use rsp2_array_types::{V3, M33};
use rsp2_spacegroup::ClassifyOptions;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Structure(#[from] rsp2_structure::Error),

    #[error(transparent)]
    Spacegroup(#[from] rsp2_spacegroup::Error),

    #[error(transparent)]
    Kpoints(#[from] rsp2_kpoints::Error),

    #[error("bad config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("could not install logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The symmetry operations of a cell.
pub fn symmetry_operations(cell: &Cell, settings: &Settings) -> Result<OperationSet>
{ Ok(rsp2_structure::search(cell, settings.symprec)?) }

/// The space group type of a cell.
pub fn spacegroup_of(cell: &Cell, settings: &Settings) -> Result<SpacegroupInfo> {
    let ops = symmetry_operations(cell, settings)?;
    classify_operations(cell.lattice(), &ops, settings)
}

/// The space group type of operations already found for a lattice.
pub fn classify_operations(lattice: &Lattice, ops: &OperationSet, settings: &Settings) -> Result<SpacegroupInfo> {
    let options = ClassifyOptions {
        tol: settings.classify_tolerance.max(ops.tol()),
        origin_choice: settings.origin_choice.0,
        left_handed: lattice.matrix().det() < 0.0,
    };
    let info = rsp2_spacegroup::classify_with(ops, &options)?;
    info!("space group {} ({})", info.international, info.number);
    Ok(info)
}

/// A human-readable summary of the symmetry of a cell.
pub fn show_symmetry(cell: &Cell, settings: &Settings) -> Result<String> {
    let info = spacegroup_of(cell, settings)?;
    let point_group = info.point_group;
    Ok(format!(
        "{}\nPoint group (Schoenflies): {}\nPoint group order: {}",
        info, point_group.schoenflies(), point_group.order(),
    ))
}

/// Irreducible points of a mesh, under the symmetry of a cell.
pub fn reduce_mesh(mesh: [i32; 3], shift: [i32; 3], cell: &Cell, settings: &Settings) -> Result<IrMesh> {
    Ok(rsp2_kpoints::ir_mesh(mesh, cell, shift, settings.time_reversal, settings.symprec)?)
}

/// Irreducible points of a mesh, under the operations of a point group
/// that leave all of `q_points` invariant.
pub fn reduce_stabilized_mesh(
    mesh: [i32; 3],
    shift: [i32; 3],
    lattice: &Lattice,
    point_group: &[M33<i32>],
    q_points: &[V3],
    settings: &Settings,
) -> Result<IrMesh> {
    Ok(rsp2_kpoints::stabilized_mesh(
        mesh, lattice, point_group, shift,
        settings.time_reversal, q_points, settings.symprec,
    )?)
}

/// Irreducible triplets on an unshifted mesh, under the symmetry of a cell.
pub fn reduce_triplets(mesh: [i32; 3], cell: &Cell, settings: &Settings) -> Result<Triplets> {
    let rotations = symmetry_operations(cell, settings)?.rotations();
    Ok(rsp2_kpoints::triplets(
        mesh, cell.lattice(), &rotations,
        settings.time_reversal, settings.symprec, settings.threading,
    )?)
}

/// For each k-point, the index of the first k-point equivalent to it.
pub fn reduce_kpoints(kpoints: &[V3], cell: &Cell, settings: &Settings) -> Result<Vec<usize>> {
    Ok(rsp2_kpoints::ir_kpoints(kpoints, cell, settings.time_reversal, settings.symprec)?)
}
