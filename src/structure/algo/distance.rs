use rsp2_array_types::{V3, M33};

use crate::{Lattice, Error};
use crate::algo::reduction::niggli_reduce;
use crate::util::wrap_diff;

/// A helper type for measuring distances under periodic boundary conditions.
#[derive(Debug, Clone)]
pub struct NearestImageFinder {
    lattice: Lattice,
    // fractional coordinates of the input are multiplied by this (as rows)
    // to get fractional coordinates of `lattice`
    input_to_lattice: M33,
    lattice_vector_carts_around_origin: Vec<V3>,
}

impl NearestImageFinder {
    /// Construct a `NearestImageFinder` for a lattice.
    ///
    /// Distances are only exact when the nearest image of a wrapped difference
    /// lies within the 27 cells centered around the unit cell, which holds for
    /// reduced lattices.  Skewed lattices can overestimate the distance.
    pub fn new(lattice: &Lattice) -> Self
    { Self::with_basis_change(lattice, M33::eye()) }

    /// Construct a `NearestImageFinder` that searches images in the Niggli-reduced
    /// basis, so that it is exact for lattices of any skew.
    ///
    /// Its methods still take fractional coordinates of the given lattice.
    pub fn reduced(lattice: &Lattice) -> Result<Self, Error> {
        let reduction = niggli_reduce(lattice)?;
        // x_orig = x_reduced * T
        let t_inv = reduction.transform().inverse_matrix().map(f64::from);
        Ok(Self::with_basis_change(reduction.reduced(), t_inv))
    }

    fn with_basis_change(lattice: &Lattice, input_to_lattice: M33) -> Self {
        let mut vecs = Vec::with_capacity(27);
        for &fa in &[-1.0, 0.0, 1.0] {
            for &fb in &[-1.0, 0.0, 1.0] {
                for &fc in &[-1.0, 0.0, 1.0] {
                    vecs.push(V3([fa, fb, fc]) * lattice);
                }
            }
        }

        NearestImageFinder {
            lattice: lattice.clone(),
            input_to_lattice,
            lattice_vector_carts_around_origin: vecs,
        }
    }

    /// Cartesian distance between the nearest images of two fractional points.
    pub fn distance(&self, a: &V3, b: &V3) -> f64 {
        let cart = wrap_diff((b - a) * &self.input_to_lattice) * &self.lattice;
        self.lattice_vector_carts_around_origin.iter()
            .map(|v| (v + cart).norm())
            .fold(std::f64::INFINITY, f64::min)
    }

    /// Test whether two fractional points are images of each other within `tol`.
    #[inline]
    pub fn is_close(&self, a: &V3, b: &V3, tol: f64) -> bool
    { self.distance(a, b) <= tol }
}

/// Cartesian distance between the nearest images of two fractional points.
///
/// The difference is wrapped to `[-1/2, 1/2)` before searching the 27
/// neighboring images.
pub fn periodic_distance(lattice: &Lattice, a: &V3, b: &V3) -> f64
{ NearestImageFinder::new(lattice).distance(a, b) }
