use ordered_float::OrderedFloat;
use rsp2_array_types::{V3, M33};
use rsp2_linalg::row_lattice_basis;

use crate::{Cell, Error};
use crate::algo::distance::NearestImageFinder;
use crate::algo::reduction::niggli_reduce;
use crate::util::{wrap_v3, wrap_diff};

/// A primitive cell, and its relationship to the cell it was found from.
#[derive(Debug, Clone)]
pub struct PrimitiveCell {
    cell: Cell,
    to_input: M33,
    translations: Vec<V3>,
}

impl PrimitiveCell {
    /// The primitive cell, with a Niggli-reduced lattice.
    pub fn cell(&self) -> &Cell { &self.cell }
    pub fn into_cell(self) -> Cell { self.cell }

    /// Rows are the primitive lattice vectors in fractional coordinates of the input.
    ///
    /// `x_input = x_primitive * to_input` for fractional row vectors.
    pub fn to_input(&self) -> &M33 { &self.to_input }

    /// The pure translations of the input cell, in its fractional coordinates.
    pub fn translations(&self) -> &[V3] { &self.translations }

    /// Number of input atoms per primitive atom.
    pub fn multiplicity(&self) -> usize { self.translations.len() }
}

/// Find every translation that maps the cell onto itself.
///
/// Translations are reduced into `[0, 1)` and sorted, with zero first.
pub fn pure_translations(cell: &Cell, tol: f64) -> Result<Vec<V3>, Error> {
    let finder = NearestImageFinder::reduced(cell.lattice())?;
    Ok(pure_translations_with(cell, &finder, tol))
}

pub(crate) fn pure_translations_with(cell: &Cell, finder: &NearestImageFinder, tol: f64) -> Vec<V3> {
    let fracs = cell.fracs();
    let types = cell.types();
    let reference = cell.rarest_species_atom();

    let mut found: Vec<V3> = vec![];
    for (frac, &ty) in izip!(fracs, types) {
        if ty != types[reference] {
            continue;
        }
        let trans = wrap_v3(frac - fracs[reference]);
        if found.iter().any(|t| finder.is_close(t, &trans, tol)) {
            continue;
        }
        if maps_onto_itself(cell, finder, &M33::eye(), &trans, tol) {
            found.push(trans);
        }
    }

    // the reference atom itself produced an exact zero first
    debug_assert_eq!(found[0], V3::zero());
    found[1..].sort_by_key(|v| v.map(OrderedFloat));
    found
}

/// Test whether `x -> rot x + trans` maps every atom onto an atom of the same species.
pub(crate) fn maps_onto_itself(
    cell: &Cell,
    finder: &NearestImageFinder,
    rot: &M33,
    trans: &V3,
    tol: f64,
) -> bool
{
    let fracs = cell.fracs();
    let types = cell.types();
    izip!(fracs, types).all(|(frac, &ty)| {
        let image = rot * frac + trans;
        izip!(fracs, types).any(|(other, &other_ty)| {
            other_ty == ty && finder.is_close(&image, other, tol)
        })
    })
}

/// Find a primitive cell.
///
/// The output has a Niggli-reduced lattice.  Atoms that overlap after
/// reduction into the primitive cell are merged by averaging their positions.
/// Coincident atoms of one species in the input count as one atom.
pub fn find_primitive(cell: &Cell, tol: f64) -> Result<PrimitiveCell, Error> {
    let finder = NearestImageFinder::reduced(cell.lattice())?;
    let translations = pure_translations_with(cell, &finder, tol);
    let n = translations.len();

    // rows of a basis in units of 1/n
    let basis = if n == 1 {
        M33::eye() * (n as i64)
    } else {
        let mut generators: Vec<V3<i64>> = (0..3).map(|k| V3::axis_unit(k) * n as i64).collect();
        generators.extend(translations.iter().map(|t| (t * n as f64).round().map(|x| x as i64)));
        row_lattice_basis(&generators).ok_or_else(|| {
            Error::InvalidCell("translations do not span a lattice".to_string())
        })?
    };
    if basis.det() != (n * n) as i64 {
        return Err(Error::InvalidCell(format!(
            "{} pure translations do not form a group (try a smaller tolerance)", n,
        )));
    }

    let basis = basis.map(|x| x as f64 / n as f64);
    let prim_lattice = &basis * cell.lattice();
    let reduction = niggli_reduce(&prim_lattice)?;
    let to_input = &reduction.transform().matrix().map(f64::from) * &basis;
    debug!("primitive cell has {} atoms (from {})", cell.num_atoms() / n, cell.num_atoms());

    // x_prim = x_input * to_input^-1
    let to_prim = to_input.inv();
    let prim_lattice = reduction.reduced().clone();
    let prim_finder = NearestImageFinder::new(&prim_lattice);

    let mut sites: Vec<(V3, i32, Vec<V3>)> = vec![];
    for (frac, ty) in merge_coincident(cell, &finder, tol) {
        let frac = wrap_v3(frac * &to_prim);
        match sites.iter_mut().find(|(rep, rep_ty, _)| *rep_ty == ty && prim_finder.is_close(rep, &frac, tol)) {
            Some((rep, _, members)) => members.push(*rep + wrap_diff(frac - *rep)),
            None => sites.push((frac, ty, vec![frac])),
        }
    }

    let mut fracs = vec![];
    let mut types = vec![];
    for (_, ty, members) in sites {
        if members.len() != n {
            return Err(Error::InvalidCell(format!(
                "expected {} atoms per primitive site, found {}", n, members.len(),
            )));
        }
        let sum = members.iter().fold(V3::zero(), |acc, v| acc + v);
        fracs.push(sum / n as f64);
        types.push(ty);
    }

    Ok(PrimitiveCell {
        cell: Cell::new_unchecked(prim_lattice, fracs, types),
        to_input,
        translations,
    })
}

/// Atoms of one species within `tol` of each other in the input cell are
/// a single site, placed at their mean position.
fn merge_coincident(cell: &Cell, finder: &NearestImageFinder, tol: f64) -> Vec<(V3, i32)> {
    let mut groups: Vec<(i32, Vec<V3>)> = vec![];
    for (frac, &ty) in izip!(cell.fracs(), cell.types()) {
        match groups.iter_mut().find(|(group_ty, members)| *group_ty == ty && finder.is_close(&members[0], frac, tol)) {
            Some((_, members)) => {
                let first = members[0];
                members.push(first + wrap_diff(*frac - first));
            },
            None => groups.push((ty, vec![*frac])),
        }
    }
    if groups.len() < cell.num_atoms() {
        debug!("merged {} coincident atoms", cell.num_atoms() - groups.len());
    }

    groups.into_iter()
        .map(|(ty, members)| {
            let sum = members.iter().fold(V3::zero(), |acc, v| acc + v);
            (wrap_v3(sum / members.len() as f64), ty)
        })
        .collect()
}

/// Find a primitive cell.  See [`find_primitive`].
pub fn primitive(cell: &Cell, tol: f64) -> Result<Cell, Error>
{ find_primitive(cell, tol).map(PrimitiveCell::into_cell) }
