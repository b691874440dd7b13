use rsp2_array_types::{V3, M33};

use crate::{Cell, Lattice, Error, SymOp, OperationSet};
use crate::algo::distance::NearestImageFinder;
use crate::algo::holohedry::lattice_point_group;
use crate::algo::primitive::{find_primitive, maps_onto_itself, PrimitiveCell};
use crate::algo::reduction::{niggli_reduce, smallest_lattice};
use crate::util::Tol;

/// Number of times the tolerance is shrunk when the operations found do not form a group.
const MAX_TOLERANCE_SHRINKS: usize = 10;
const TOLERANCE_SHRINK_FACTOR: f64 = 0.95;

/// Find the symmetry operations of a cell.
///
/// `tol` is a cartesian distance.  The output is deterministic, begins with the
/// identity, and contains every pure translation of the cell.
///
/// If the operations found do not form a group (which can happen when `tol`
/// is comparable to real distortions of the structure), the search is repeated
/// with a slightly smaller tolerance.  If they still don't after
/// `MAX_TOLERANCE_SHRINKS` attempts, this fails with `NotAGroup`.
pub fn search(cell: &Cell, tol: f64) -> Result<OperationSet, Error> {
    check_resolvable(cell.lattice(), tol)?;

    let (found, tol) = shrink_until_closed(tol, |tol| {
        let found = search_primitive(cell, tol)?;
        let (count, closed) = (found.ops.len(), found.is_closed(tol));
        Ok(Attempt { value: found, count, closed })
    })?;

    let ops = found.to_input_ops(cell, tol)?;
    debug!("found {} symmetry operations", ops.len());
    Ok(OperationSet::new(ops, tol))
}

// A lattice vector shorter than `tol` makes every small integer matrix look
// like a rotation, so such lattices are rejected outright.
fn check_resolvable(lattice: &Lattice, tol: f64) -> Result<(), Error> {
    // the first Niggli vector is a shortest lattice vector
    let shortest = smallest_lattice(lattice)?.norms()[0];
    if shortest <= tol {
        return Err(Error::InvalidLattice(format!(
            "shortest lattice vector ({:e}) is not longer than the tolerance ({:e})",
            shortest, tol,
        )));
    }
    Ok(())
}

struct Attempt<T> {
    value: T,
    count: usize,
    closed: bool,
}

fn shrink_until_closed<T, F>(tol: f64, mut attempt: F) -> Result<(T, f64), Error>
where F: FnMut(f64) -> Result<Attempt<T>, Error>,
{
    let mut tol = tol;
    let mut found = attempt(tol)?;
    for _ in 0..MAX_TOLERANCE_SHRINKS {
        if found.closed {
            return Ok((found.value, tol));
        }
        let new_tol = tol * TOLERANCE_SHRINK_FACTOR;
        warn!(
            "{} symmetry operations found with tolerance {:e} do not form a group; retrying with {:e}",
            found.count, tol, new_tol,
        );
        tol = new_tol;
        found = attempt(tol)?;
    }
    match found.closed {
        true => Ok((found.value, tol)),
        false => Err(Error::NotAGroup { count: found.count, tol }),
    }
}

/// Number of symmetry operations of the cell.
pub fn multiplicity(cell: &Cell, tol: f64) -> Result<usize, Error>
{ search(cell, tol).map(|ops| ops.len()) }

/// An upper bound on the number of symmetry operations of the cell.
///
/// This is the number of pure translations times the order of the largest
/// crystallographic point group.
pub fn max_multiplicity(cell: &Cell, tol: f64) -> Result<usize, Error>
{ Ok(crate::pure_translations(cell, tol)?.len() * 48) }

// Operations of the primitive cell, in its own basis.
struct PrimitiveOps {
    prim: PrimitiveCell,
    finder: NearestImageFinder,
    ops: Vec<SymOp>,
}

fn search_primitive(cell: &Cell, tol: f64) -> Result<PrimitiveOps, Error> {
    let prim = find_primitive(cell, tol)?;
    let prim_cell = prim.cell();
    check_resolvable(prim_cell.lattice(), tol)?;
    let finder = NearestImageFinder::new(prim_cell.lattice());

    // the primitive lattice is already reduced, so this reduction is trivial
    let rotations = lattice_point_group(&niggli_reduce(prim_cell.lattice())?, tol);

    let fracs = prim_cell.fracs();
    let types = prim_cell.types();
    let reference = prim_cell.rarest_species_atom();

    let mut ops = vec![];
    for rot in rotations {
        let float_rot = rot.map(f64::from);
        let image = &float_rot * &fracs[reference];

        // In a primitive cell there is at most one translation per rotation.
        let found = izip!(fracs, types)
            .filter(|&(_, &ty)| ty == types[reference])
            .map(|(frac, _)| frac - image)
            .find(|trans| maps_onto_itself(prim_cell, &finder, &float_rot, trans, tol));

        if let Some(trans) = found {
            ops.push(SymOp::new(rot, trans));
        }
    }
    debug!("{} of the lattice rotations are symmetries of the primitive cell", ops.len());
    Ok(PrimitiveOps { prim, finder, ops })
}

// Composition of approximate operations accumulates error from both factors.
const CLOSURE_TOL_FACTOR: f64 = 3.0;

impl PrimitiveOps {
    fn is_closed(&self, tol: f64) -> bool
    { is_closed(&self.ops, &self.finder, tol) }

    fn to_input_ops(&self, cell: &Cell, tol: f64) -> Result<Vec<SymOp>, Error> {
        let mut ops = vec![];
        for prim_op in &self.ops {
            let op = match to_input_basis(&self.prim, prim_op) {
                Some(op) => op,
                None => continue,
            };
            for pure in self.prim.translations() {
                ops.push(SymOp::new(op.rot, op.trans + pure));
            }
        }
        let finder = NearestImageFinder::reduced(cell.lattice())?;
        Ok(sorted_and_deduplicated(ops, &finder, tol))
    }
}

// The rotation is only kept if it is integral in the input basis; it might
// not be if the input is a supercell whose shape breaks the symmetry.
fn to_input_basis(prim: &PrimitiveCell, op: &SymOp) -> Option<SymOp> {
    // fractional columns transform as  x_input = M^T x_prim
    let m = prim.to_input();
    let rot = &(&m.t() * &op.float_rot()) * &m.inv().t();
    match Tol(1e-4).unfloat_m33(&rot) {
        Ok(rot) => Some(SymOp::new(rot, &m.t() * &op.trans)),
        Err(_) => {
            trace!("rotation does not preserve the input lattice: {:?}", rot);
            None
        },
    }
}

fn sorted_and_deduplicated(mut ops: Vec<SymOp>, finder: &NearestImageFinder, tol: f64) -> Vec<SymOp> {
    ops.sort_by_key(|op| op.sort_key());

    // sorted by rotation, so duplicates can only occur within a run of equal rotations
    let mut out: Vec<SymOp> = vec![];
    let mut run_start = 0;
    for op in ops {
        if out.get(run_start).map_or(false, |first| first.rot != op.rot) {
            run_start = out.len();
        }
        let dupe = out[run_start..].iter().any(|other| finder.is_close(&other.trans, &op.trans, tol));
        if !dupe {
            out.push(op);
        }
    }

    // identity first
    if let Some(pos) = out.iter().position(|op| is_identity(op, finder, tol)) {
        let eye = out.remove(pos);
        out.insert(0, SymOp { trans: V3::zero(), ..eye });
    }
    out
}

fn is_identity(op: &SymOp, finder: &NearestImageFinder, tol: f64) -> bool
{ op.rot == M33::eye() && finder.is_close(&op.trans, &V3::zero(), tol) }

fn is_closed(ops: &[SymOp], finder: &NearestImageFinder, tol: f64) -> bool {
    ops.iter().all(|a| {
        ops.iter().all(|b| {
            let c = a.of(b);
            ops.iter().any(|d| d.rot == c.rot && finder.is_close(&d.trans, &c.trans, CLOSURE_TOL_FACTOR * tol))
        })
    })
}
