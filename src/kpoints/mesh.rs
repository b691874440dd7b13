use rsp2_array_types::{V3, M33};
use rsp2_structure::{Cell, Lattice};

use crate::{Grid, Result};
use crate::grid::GridAction;
use crate::group::{check_point_group, reciprocal_group, stabilizer, common_stabilizer};

/// A mesh reduced by symmetry.
#[derive(Debug, Clone, PartialEq)]
pub struct IrMesh {
    grid: Grid,
    map: Vec<usize>,
    grid_points: Vec<V3<i32>>,
}

impl IrMesh {
    pub fn grid(&self) -> &Grid { &self.grid }

    /// For each grid point, the index of its representative.
    ///
    /// The representative of an orbit is its member with the smallest index.
    pub fn map(&self) -> &[usize] { &self.map }

    /// Address of each grid point.
    pub fn grid_points(&self) -> &[V3<i32>] { &self.grid_points }

    /// Indices of the representatives, in increasing order.
    pub fn irreducible(&self) -> Vec<usize> {
        self.map.iter().enumerate()
            .filter(|&(i, &rep)| i == rep)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn num_irreducible(&self) -> usize
    { self.irreducible().len() }

    /// The size of each orbit, in the same order as [`IrMesh::irreducible`].
    pub fn weights(&self) -> Vec<usize> {
        let sizes = orbit_sizes(&self.map);
        self.irreducible().into_iter().map(|i| sizes[i]).collect()
    }

    /// Fractional reciprocal coordinates of the representatives.
    pub fn kpoints(&self) -> Vec<V3> {
        self.irreducible().into_iter()
            .map(|i| self.grid.frac(self.grid_points[i]))
            .collect()
    }
}

/// Reduce a mesh by the symmetry of a cell.
///
/// `tol` is the tolerance used to search for the cell's symmetry operations.
pub fn ir_mesh(
    mesh: [i32; 3],
    cell: &Cell,
    shift: [i32; 3],
    time_reversal: bool,
    tol: f64,
) -> Result<IrMesh> {
    Grid::new(mesh, shift)?;

    let ops = rsp2_structure::search(cell, tol)?;
    let rotations = ops.rotations();
    debug!("reducing a {:?} mesh by {} rotations", mesh, rotations.len());
    stabilized_mesh(mesh, cell.lattice(), &rotations, shift, time_reversal, &[], tol)
}

/// Reduce a mesh by the operations of a point group that leave every one
/// of `q_points` invariant.
///
/// `point_group` holds rotations of `lattice` in the convention of
/// `rsp2_structure::SymOp`, and need not be closed.  The `q_points` are in
/// fractional reciprocal coordinates; `tol` is the fractional tolerance used
/// to decide whether a q-point is invariant.
pub fn stabilized_mesh(
    mesh: [i32; 3],
    lattice: &Lattice,
    point_group: &[M33<i32>],
    shift: [i32; 3],
    time_reversal: bool,
    q_points: &[V3],
    tol: f64,
) -> Result<IrMesh> {
    let grid = Grid::new(mesh, shift)?;
    check_point_group(lattice, point_group)?;

    let group = reciprocal_group(point_group, time_reversal);
    let kept = common_stabilizer(&group, q_points, tol);
    trace!("{} of {} operations leave the q-points invariant", kept.len(), group.len());

    let actions = kept.into_iter()
        .map(|i| grid.action(&group[i]))
        .collect::<Result<Vec<_>>>()?;

    let map = orbit_map(&grid, &actions);
    let grid_points = grid.addresses();
    Ok(IrMesh { grid, map, grid_points })
}

/// Reduce an arbitrary list of k-points by the symmetry of a cell.
///
/// Each k-point (in fractional reciprocal coordinates) is mapped to the index
/// of the first k-point in the list that is equivalent to it.
pub fn ir_kpoints(
    kpoints: &[V3],
    cell: &Cell,
    time_reversal: bool,
    tol: f64,
) -> Result<Vec<usize>> {
    let ops = rsp2_structure::search(cell, tol)?;
    let group = reciprocal_group(&ops.rotations(), time_reversal);
    let group: Vec<M33> = group.into_iter().map(|rot| rot.map(f64::from)).collect();

    let mut map = Vec::with_capacity(kpoints.len());
    let mut representatives: Vec<usize> = vec![];
    for (i, k) in kpoints.iter().enumerate() {
        let found = representatives.iter().cloned().find(|&j| {
            group.iter().any(|rot| {
                let diff = &(rot * k) - &kpoints[j];
                (diff - diff.round()).0.iter().all(|x| x.abs() <= tol)
            })
        });
        match found {
            Some(j) => map.push(j),
            None => {
                representatives.push(i);
                map.push(i);
            },
        }
    }
    debug!("{} of {} k-points are irreducible", representatives.len(), kpoints.len());
    Ok(map)
}

const UNASSIGNED: usize = ::std::usize::MAX;

/// Map each point of the grid to the smallest index in its orbit.
///
/// `actions` must form a group.
pub(crate) fn orbit_map(grid: &Grid, actions: &[GridAction]) -> Vec<usize> {
    let mut map = vec![UNASSIGNED; grid.len()];
    for i in 0..grid.len() {
        if map[i] != UNASSIGNED {
            continue;
        }
        // the orbit of any earlier point has already been assigned in full,
        // so `i` is the smallest member of its own orbit
        let g = grid.address(i);
        for action in actions {
            map[grid.index(action.apply(grid, g))] = i;
        }
        map[i] = i;
    }
    map
}

pub(crate) fn orbit_sizes(map: &[usize]) -> Vec<usize> {
    let mut sizes = vec![0; map.len()];
    for &rep in map {
        sizes[rep] += 1;
    }
    sizes
}

/// Stabilizer of a grid point, as actions on the grid.
pub(crate) fn little_group(
    grid: &Grid,
    group: &[M33<i32>],
    actions: &[GridAction],
    point: usize,
    tol: f64,
) -> Vec<GridAction> {
    let q = grid.frac(grid.address(point));
    stabilizer(group, &q, tol).into_iter()
        .map(|i| actions[i].clone())
        .collect()
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use crate::Error;
    use rsp2_structure::search;

    fn simple_cubic() -> Cell
    { Cell::new(Lattice::cubic(3.0), vec![V3::zero()], vec![1]).unwrap() }

    fn tetragonal() -> Cell {
        Cell::new(
            Lattice::orthorhombic(3.0, 3.0, 5.0),
            vec![V3([0.0, 0.0, 0.0]), V3([0.5, 0.5, 0.3])],
            vec![1, 2],
        ).unwrap()
    }

    // two species, so that there is no inversion center
    fn triclinic() -> Cell {
        Cell::new(
            Lattice::from(&[
                [3.0, 0.1, 0.2],
                [0.3, 4.0, 0.4],
                [0.5, 0.6, 5.0],
            ]),
            vec![V3([0.1, 0.2, 0.3]), V3([0.4, 0.7, 0.9])],
            vec![1, 2],
        ).unwrap()
    }

    fn check_map_properties(ir: &IrMesh, point_group: &[M33<i32>], time_reversal: bool) {
        let grid = ir.grid();
        let map = ir.map();
        for i in 0..map.len() {
            assert_eq!(map[map[i]], map[i]);
            assert!(map[i] <= i);
        }

        let group = reciprocal_group(point_group, time_reversal);
        for rot in &group {
            let action = grid.action(rot).unwrap();
            for (i, &g) in ir.grid_points().iter().enumerate() {
                assert_eq!(map[grid.index(action.apply(grid, g))], map[i]);
            }
        }
        assert_eq!(ir.weights().iter().sum::<usize>(), grid.len());
    }

    #[test]
    fn cubic_counts() {
        let cell = simple_cubic();
        let rotations = search(&cell, 1e-5).unwrap().rotations();
        assert_eq!(rotations.len(), 48);

        // each orbit is a multiset of |coordinates| drawn from {0, 1/4, 1/2}
        let ir = ir_mesh([4, 4, 4], &cell, [0, 0, 0], true, 1e-5).unwrap();
        assert_eq!(ir.num_irreducible(), 10);
        assert_eq!(ir.irreducible()[0], 0);
        check_map_properties(&ir, &rotations, true);

        // ...or from {1/8, 3/8}
        let ir = ir_mesh([4, 4, 4], &cell, [1, 1, 1], true, 1e-5).unwrap();
        assert_eq!(ir.num_irreducible(), 4);
        check_map_properties(&ir, &rotations, true);
    }

    #[test]
    fn tetragonal_mesh() {
        let cell = tetragonal();
        let rotations = search(&cell, 1e-5).unwrap().rotations();
        assert_eq!(rotations.len(), 8);

        for &(mesh, shift) in &[
            ([6, 6, 4], [0, 0, 0]),
            ([4, 4, 3], [1, 1, 0]),
            ([4, 4, 3], [1, 1, 1]),
        ] {
            for &time_reversal in &[false, true] {
                let ir = ir_mesh(mesh, &cell, shift, time_reversal, 1e-5).unwrap();
                check_map_properties(&ir, &rotations, time_reversal);
            }
        }
    }

    #[test]
    fn time_reversal() {
        let cell = triclinic();

        // every point of a 2x2x2 mesh is its own negative
        let ir = ir_mesh([2, 2, 2], &cell, [0, 0, 0], true, 1e-5).unwrap();
        assert_eq!(ir.num_irreducible(), 8);

        let ir = ir_mesh([3, 1, 1], &cell, [0, 0, 0], false, 1e-5).unwrap();
        assert_eq!(ir.map(), &[0, 1, 2][..]);
        let ir = ir_mesh([3, 1, 1], &cell, [0, 0, 0], true, 1e-5).unwrap();
        assert_eq!(ir.map(), &[0, 1, 1][..]);
        assert_eq!(ir.weights(), vec![1, 2]);
    }

    #[test]
    fn single_point() {
        for cell in vec![simple_cubic(), tetragonal(), triclinic()] {
            for &shift in &[[0, 0, 0], [1, 1, 1]] {
                let ir = ir_mesh([1, 1, 1], &cell, shift, true, 1e-5).unwrap();
                assert_eq!(ir.map(), &[0][..]);
                assert_eq!(ir.irreducible(), vec![0]);
            }
        }
    }

    #[test]
    fn bad_meshes() {
        let cell = simple_cubic();
        match ir_mesh([4, 0, 4], &cell, [0, 0, 0], true, 1e-5) {
            Err(Error::InvalidMesh(_)) => {},
            r => panic!("{:?}", r),
        }
        // the threefold axes need a cubic mesh
        match ir_mesh([4, 4, 2], &cell, [0, 0, 0], true, 1e-5) {
            Err(Error::MeshIncompatible(_)) => {},
            r => panic!("{:?}", r),
        }
        match ir_mesh([4, 4, 4], &cell, [1, 0, 0], true, 1e-5) {
            Err(Error::MeshIncompatible(_)) => {},
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn stabilized() {
        let cell = simple_cubic();
        let rotations = search(&cell, 1e-5).unwrap().rotations();
        let lattice = cell.lattice();

        let full = stabilized_mesh([4, 4, 4], lattice, &rotations, [0, 0, 0], true, &[], 1e-5).unwrap();
        let gamma = stabilized_mesh([4, 4, 4], lattice, &rotations, [0, 0, 0], true, &[V3::zero()], 1e-5).unwrap();
        assert_eq!(full, gamma);

        // little group of X is 4/mmm
        let x = V3([0.5, 0.0, 0.0]);
        let at_x = stabilized_mesh([4, 4, 4], lattice, &rotations, [0, 0, 0], true, &[x], 1e-5).unwrap();
        assert!(at_x.num_irreducible() > full.num_irreducible());
        for (i, &rep) in at_x.map().iter().enumerate() {
            assert_eq!(full.map()[rep], full.map()[i]);
        }

        // adding a second X point can only make the group smaller
        let y = V3([0.0, 0.5, 0.0]);
        let at_xy = stabilized_mesh([4, 4, 4], lattice, &rotations, [0, 0, 0], true, &[x, y], 1e-5).unwrap();
        assert!(at_xy.num_irreducible() > at_x.num_irreducible());
        // mmm: orbits are sign changes of each coordinate, i.e. 3 values per axis
        assert_eq!(at_xy.num_irreducible(), 27);
    }

    #[test]
    fn stabilized_bad_point_group() {
        let fourfold = M33::from_array([[0, -1, 0], [1, 0, 0], [0, 0, 1]]);
        match stabilized_mesh([4, 4, 4], &Lattice::orthorhombic(3.0, 4.0, 5.0), &[fourfold], [0, 0, 0], false, &[], 1e-5) {
            Err(Error::InvalidPointGroup(_)) => {},
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn kpoint_list() {
        let cell = simple_cubic();
        let kpoints = vec![
            V3([0.0, 0.0, 0.0]),
            V3([0.25, 0.0, 0.0]),
            V3([0.0, 0.0, -0.25]),
            V3([0.5, 0.5, 0.0]),
            V3([0.0, 0.5, 0.5 + 1e-9]),
            V3([0.75, 0.0, 0.0]),
            V3([0.1, 0.2, 0.3]),
        ];
        let map = ir_kpoints(&kpoints, &cell, true, 1e-5).unwrap();
        assert_eq!(map, vec![0, 1, 1, 3, 3, 1, 6]);

        let cell = triclinic();
        let map = ir_kpoints(&kpoints, &cell, false, 1e-5).unwrap();
        assert_eq!(map, vec![0, 1, 2, 3, 4, 5, 6]);
        let map = ir_kpoints(&kpoints, &cell, true, 1e-5).unwrap();
        assert_eq!(map, vec![0, 1, 2, 3, 4, 1, 6]);
    }
}
