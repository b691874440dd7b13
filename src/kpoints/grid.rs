use rsp2_array_types::{V3, M33};

use crate::{Error, Result};

/// A regular mesh of reciprocal-space points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    dims: V3<i32>,
    shift: V3<i32>,
}

impl Grid {
    /// Each element of `shift` is 0 or 1, in units of half a grid step.
    pub fn new(dims: [i32; 3], shift: [i32; 3]) -> Result<Grid> {
        if dims.iter().any(|&m| m <= 0) {
            return Err(Error::InvalidMesh(format!("dimensions must be positive, got {:?}", dims)));
        }
        if shift.iter().any(|&s| s != 0 && s != 1) {
            return Err(Error::InvalidMesh(format!("shift must be 0 or 1 along each axis, got {:?}", shift)));
        }
        Ok(Grid { dims: V3(dims), shift: V3(shift) })
    }

    pub fn dims(&self) -> [i32; 3] { self.dims.0 }
    pub fn shift(&self) -> [i32; 3] { self.shift.0 }

    pub fn len(&self) -> usize
    { self.dims.0.iter().map(|&m| m as usize).product() }

    /// Linear index of an address.  Addresses outside the mesh are wrapped.
    pub fn index(&self, g: V3<i32>) -> usize {
        let V3([m0, m1, m2]) = self.dims;
        let V3([g0, g1, g2]) = g;
        let (g0, g1, g2) = (g0.rem_euclid(m0), g1.rem_euclid(m1), g2.rem_euclid(m2));
        (g0 + m0 * (g1 + m1 * g2)) as usize
    }

    pub fn address(&self, index: usize) -> V3<i32> {
        let V3([m0, m1, _]) = self.dims.map(|m| m as usize);
        V3([index % m0, (index / m0) % m1, index / (m0 * m1)]).map(|x| x as i32)
    }

    /// The addresses of all points, in order of linear index.
    pub fn addresses(&self) -> Vec<V3<i32>>
    { (0..self.len()).map(|i| self.address(i)).collect() }

    /// Fractional reciprocal coordinates of an address.
    pub fn frac(&self, g: V3<i32>) -> V3 {
        let doubled = g * 2 + self.shift;
        V3::from_fn(|i| f64::from(doubled[i]) / f64::from(2 * self.dims[i]))
    }

    /// Express a reciprocal-space rotation as a permutation of the mesh.
    ///
    /// `rot` acts on fractional reciprocal coordinates.  Fails unless the image
    /// of every mesh point is exactly another mesh point.
    pub(crate) fn action(&self, rot: &M33<i32>) -> Result<GridAction> {
        let m = self.dims;
        let mut coeffs = M33::zero();
        for i in 0..3 {
            for j in 0..3 {
                let numer = rot[i][j] * m[i];
                if numer % m[j] != 0 {
                    return Err(Error::MeshIncompatible(format!(
                        "rotation {:?} does not map a {:?} mesh onto itself", rot, m.0,
                    )));
                }
                coeffs[i][j] = numer / m[j];
            }
        }

        // images of shifted points must land on shifted points
        let parity = &coeffs * self.shift - self.shift;
        if parity.0.iter().any(|x| x % 2 != 0) {
            return Err(Error::MeshIncompatible(format!(
                "rotation {:?} does not preserve the mesh shift {:?}", rot, self.shift.0,
            )));
        }
        Ok(GridAction { coeffs })
    }
}

/// The action of a rotation on doubled grid addresses `2 g + s`.
#[derive(Debug, Clone)]
pub(crate) struct GridAction {
    coeffs: M33<i32>,
}

impl GridAction {
    pub(crate) fn apply(&self, grid: &Grid, g: V3<i32>) -> V3<i32> {
        let doubled = g * 2 + grid.shift;
        let image = &self.coeffs * doubled - grid.shift;
        V3::from_fn(|i| (image[i] / 2).rem_euclid(grid.dims[i]))
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn invalid() {
        match Grid::new([4, 0, 4], [0, 0, 0]) {
            Err(Error::InvalidMesh(_)) => {},
            r => panic!("{:?}", r),
        }
        match Grid::new([4, 4, -2], [0, 0, 0]) {
            Err(Error::InvalidMesh(_)) => {},
            r => panic!("{:?}", r),
        }
        match Grid::new([4, 4, 4], [0, 2, 0]) {
            Err(Error::InvalidMesh(_)) => {},
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn indexing() {
        let grid = Grid::new([3, 4, 5], [0, 0, 0]).unwrap();
        assert_eq!(grid.len(), 60);
        assert_eq!(grid.address(0), V3([0, 0, 0]));
        assert_eq!(grid.address(1), V3([1, 0, 0]));
        assert_eq!(grid.address(3), V3([0, 1, 0]));
        assert_eq!(grid.address(12), V3([0, 0, 1]));
        assert_eq!(grid.index(V3([2, 3, 4])), 59);
        assert_eq!(grid.index(V3([-1, 4, -6])), grid.index(V3([2, 0, 4])));
        for i in 0..grid.len() {
            assert_eq!(grid.index(grid.address(i)), i);
        }
    }

    #[test]
    fn fractional_coords() {
        let grid = Grid::new([4, 2, 1], [1, 0, 1]).unwrap();
        assert_close!(grid.frac(V3([0, 0, 0])).0, [0.125, 0.0, 0.5]);
        assert_close!(grid.frac(V3([3, 1, 0])).0, [0.875, 0.5, 0.5]);
    }

    #[test]
    fn fourfold() {
        let rot = M33::from_array([[0, -1, 0], [1, 0, 0], [0, 0, 1]]);
        let grid = Grid::new([4, 4, 2], [1, 1, 0]).unwrap();
        let action = grid.action(&rot).unwrap();
        // (1/8, 3/8, 0) -> (-3/8, 1/8, 0) == (5/8, 1/8, 0)
        assert_eq!(action.apply(&grid, V3([0, 1, 0])), V3([2, 0, 0]));
        for g in grid.addresses() {
            let image = action.apply(&grid, g);
            let expected = &rot.map(f64::from) * grid.frac(g);
            let diff = grid.frac(image) - expected;
            assert_close!(abs=1e-12, (diff - diff.round()).0, [0.0; 3]);
        }
    }

    #[test]
    fn incompatible() {
        // sixfold in the hexagonal basis mixes the first two axes
        let rot = M33::from_array([[1, 1, 0], [-1, 0, 0], [0, 0, 1]]);
        assert!(Grid::new([6, 6, 2], [0, 0, 0]).unwrap().action(&rot).is_ok());
        match Grid::new([4, 2, 1], [0, 0, 0]).unwrap().action(&rot) {
            Err(Error::MeshIncompatible(_)) => {},
            r => panic!("{:?}", r),
        }

        // threefold about [111] permutes the axes, so the shift must be uniform
        let rot = M33::from_array([[0, 0, 1], [1, 0, 0], [0, 1, 0]]);
        assert!(Grid::new([4, 4, 4], [1, 1, 1]).unwrap().action(&rot).is_ok());
        match Grid::new([4, 4, 4], [1, 0, 0]).unwrap().action(&rot) {
            Err(Error::MeshIncompatible(_)) => {},
            r => panic!("{:?}", r),
        }
    }
}
