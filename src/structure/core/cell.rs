use rsp2_array_types::V3;

use crate::{Lattice, Error};
use crate::util::wrap_v3;

/// A periodic arrangement of atoms.
///
/// Positions are fractional, and are wrapped into `[0, 1)` on construction.
/// Species are arbitrary integer tags; only equality between them matters.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    lattice: Lattice,
    fracs: Vec<V3>,
    types: Vec<i32>,
}

impl Cell {
    pub fn new(lattice: Lattice, fracs: Vec<V3>, types: Vec<i32>) -> Result<Self, Error> {
        if fracs.len() != types.len() {
            return Err(Error::InvalidCell(format!(
                "{} positions but {} species", fracs.len(), types.len(),
            )));
        }
        if fracs.is_empty() {
            return Err(Error::InvalidCell("no atoms".to_string()));
        }
        if fracs.iter().flat_map(|v| v.iter()).any(|x| !x.is_finite()) {
            return Err(Error::InvalidCell("non-finite position".to_string()));
        }
        // revalidate, since `Lattice::new` is unchecked
        let lattice = Lattice::checked_new(lattice.matrix())?;

        let fracs = fracs.into_iter().map(wrap_v3).collect();
        Ok(Cell { lattice, fracs, types })
    }

    pub fn from_carts(lattice: Lattice, carts: Vec<V3>, types: Vec<i32>) -> Result<Self, Error> {
        let fracs = carts.iter().map(|c| c / &lattice).collect();
        Cell::new(lattice, fracs, types)
    }

    pub fn num_atoms(&self) -> usize { self.fracs.len() }
    pub fn lattice(&self) -> &Lattice { &self.lattice }
    pub fn fracs(&self) -> &[V3] { &self.fracs }
    pub fn types(&self) -> &[i32] { &self.types }

    pub fn to_carts(&self) -> Vec<V3>
    { self.fracs.iter().map(|f| f * &self.lattice).collect() }

    /// Index of the first atom of the least populous species.
    ///
    /// Ties are broken in favor of the species that appears first.
    pub(crate) fn rarest_species_atom(&self) -> usize {
        let count = |t: i32| self.types.iter().filter(|&&u| u == t).count();
        let mut best = 0;
        let mut best_count = count(self.types[0]);
        for (i, &t) in self.types.iter().enumerate() {
            if self.types[..i].contains(&t) {
                continue;
            }
            let c = count(t);
            if c < best_count {
                best = i;
                best_count = c;
            }
        }
        best
    }

    // for cells derived from an already-validated cell
    pub(crate) fn new_unchecked(lattice: Lattice, fracs: Vec<V3>, types: Vec<i32>) -> Self {
        debug_assert_eq!(fracs.len(), types.len());
        let fracs = fracs.into_iter().map(wrap_v3).collect();
        Cell { lattice, fracs, types }
    }
}
