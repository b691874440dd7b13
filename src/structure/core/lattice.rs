use std::ops::{Mul, Div};
use std::sync::Arc;

use rsp2_array_types::{V3, M33, M3};
use rsp2_assert_close::{CheckClose, Tolerances, CheckCloseError};

use crate::Error;

/// Lattices whose volume is below this fraction of the product of their
/// vector norms are considered degenerate.
const DEGENERATE_VOLUME_RATIO: f64 = 1e-10;

/// The translational periodicity of a cell.
///
/// Rows of the matrix are the lattice vectors, so that fractional and
/// cartesian coordinates (both row vectors) are related by
///
/// ```text
/// cart = frac * lattice
/// frac = cart / lattice
/// ```
///
/// The inverse is computed once on construction and shared between clones.
#[derive(Debug, Clone)]
pub struct Lattice {
    matrix: Arc<M33>,
    inverse: Arc<M33>,
}

impl PartialEq for Lattice {
    fn eq(&self, other: &Lattice) -> bool
    { self.matrix == other.matrix }
}

impl Lattice {
    /// Wrap a matrix whose rows are lattice vectors.
    ///
    /// Nothing is checked; a singular matrix yields a lattice with a garbage
    /// inverse.  Use [`Lattice::checked_new`] for anything from outside.
    #[inline]
    pub fn new(matrix: &M33) -> Self {
        Lattice {
            inverse: Arc::new(matrix.inv()),
            matrix: Arc::new(*matrix),
        }
    }

    /// Like [`Lattice::new`], but rejects matrices of (nearly) zero volume.
    ///
    /// The volume is compared against the product of the row norms, so the
    /// check is independent of the overall length scale.
    pub fn checked_new(matrix: &M33) -> Result<Self, Error> {
        let volume = matrix.det().abs();
        let scale: f64 = matrix.iter().map(|row| row.norm()).product();
        match volume > DEGENERATE_VOLUME_RATIO * scale {
            true => Ok(Lattice::new(matrix)),
            false => Err(Error::InvalidLattice(format!("degenerate (volume {:e})", volume))),
        }
    }

    /// Like [`Lattice::checked_new`], for a matrix whose **columns** are the lattice vectors.
    pub fn from_column_matrix(matrix: &M33) -> Result<Self, Error>
    { Lattice::checked_new(&matrix.t()) }

    #[inline]
    pub fn from_vectors(vectors: &[V3; 3]) -> Self
    { Lattice::new(&M3(*vectors)) }

    /// Matrix whose rows are the lattice vectors.
    #[inline]
    pub fn matrix(&self) -> &M33
    { &self.matrix }

    /// The precomputed inverse of [`Lattice::matrix`].
    #[inline]
    pub fn inverse_matrix(&self) -> &M33
    { &self.inverse }

    #[inline]
    pub fn vectors(&self) -> &[V3; 3]
    { &self.matrix.0 }

    /// The metric tensor `G = L L^T`, holding dot products of lattice vectors.
    pub fn metric(&self) -> M33
    { self.matrix() * &self.matrix().t() }

    pub fn norms(&self) -> [f64; 3]
    { self.vectors().map(|v| v.norm()) }

    pub fn sqnorms(&self) -> [f64; 3]
    { self.vectors().map(|v| v.sqnorm()) }

    /// Unsigned volume of the unit cell.
    pub fn volume(&self) -> f64
    { self.matrix().det().abs() }
}

impl Lattice {
    /// The unit cube.
    #[inline]
    pub fn eye() -> Self
    { Lattice::cubic(1.0) }

    #[inline]
    pub fn diagonal(&[a, b, c]: &[f64; 3]) -> Self
    { Lattice::orthorhombic(a, b, c) }

    #[inline]
    pub fn cubic(a: f64) -> Self
    { Lattice::orthorhombic(a, a, a) }

    #[inline]
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self
    { Lattice::from(&[[a, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, c]]) }

    /// A lattice with every element drawn uniformly from `[-max, max]`.
    ///
    /// Nothing physical about it, which is the point.
    #[cfg(test)]
    pub(crate) fn random_uniform(max: f64) -> Self
    { Lattice::new(&M33::from_fn(|_, _| (rand::random::<f64>() * 2.0 - 1.0) * max)) }
}

impl Default for Lattice {
    #[inline]
    fn default() -> Lattice
    { Lattice::eye() }
}

impl<'a> From<&'a [[f64; 3]; 3]> for Lattice {
    #[inline]
    fn from(rows: &'a [[f64; 3]; 3]) -> Self
    { Lattice::new(&M33::from_array(*rows)) }
}

/// Change of basis; the inverse is recomputed rather than multiplied,
/// so that long chains of products don't accumulate error.
impl<'a, 'b> Mul<&'b Lattice> for &'a M33 {
    type Output = Lattice;

    fn mul(self, lattice: &'b Lattice) -> Lattice
    { Lattice::new(&(self * lattice.matrix())) }
}

/// Fractional to cartesian.
impl<'a, 'b> Mul<&'b Lattice> for &'a V3 {
    type Output = V3;

    fn mul(self, lattice: &'b Lattice) -> V3
    { self * lattice.matrix() }
}

impl<'b> Mul<&'b Lattice> for V3 {
    type Output = V3;

    fn mul(self, lattice: &'b Lattice) -> V3
    { &self * lattice }
}

/// Cartesian to fractional.
impl<'a, 'b> Div<&'b Lattice> for &'a V3 {
    type Output = V3;

    fn div(self, lattice: &'b Lattice) -> V3
    { self * lattice.inverse_matrix() }
}

impl<'b> Div<&'b Lattice> for V3 {
    type Output = V3;

    fn div(self, lattice: &'b Lattice) -> V3
    { &self / lattice }
}

impl CheckClose for Lattice {
    type Scalar = f64;

    fn check_close(&self, other: &Lattice, tol: Tolerances) -> Result<(), CheckCloseError>
    { self.matrix().check_close(other.matrix(), tol) }
}
