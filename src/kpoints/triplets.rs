use rayon::prelude::*;

use rsp2_array_types::{V3, M33};
use rsp2_structure::Lattice;

use crate::{Grid, Result, Threading};
use crate::group::{check_point_group, reciprocal_group};
use crate::mesh::{orbit_map, orbit_sizes, little_group};

/// Symmetry-distinct triplets of grid points with `k1 + k2 + k3 = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Triplets {
    /// Grid point indices `[p1, p2, p3]`.  `p1` is always irreducible.
    pub triplets: Vec<[usize; 3]>,
    /// Number of triplets with the same `p1` that are equivalent to each
    /// triplet.  For each `p1` these sum to the number of grid points.
    pub weights: Vec<usize>,
    /// Number of grid points in the star of each triplet's `p1`.
    ///
    /// `star_sizes[i] * weights[i]` counts every triplet on the mesh
    /// equivalent to triplet `i`, and those products sum to `N^2`.
    pub star_sizes: Vec<usize>,
    /// Address of each grid point.
    pub grid_points: Vec<V3<i32>>,
}

/// Reduce the triplets of an unshifted mesh by symmetry.
///
/// For a mesh of `N` points, the weights of the triplets sharing one `p1`
/// sum to `N`.
pub fn triplets(
    mesh: [i32; 3],
    lattice: &Lattice,
    point_group: &[M33<i32>],
    time_reversal: bool,
    tol: f64,
    threading: Threading,
) -> Result<Triplets> {
    let grid = Grid::new(mesh, [0, 0, 0])?;
    check_point_group(lattice, point_group)?;

    let group = reciprocal_group(point_group, time_reversal);
    let actions = group.iter()
        .map(|rot| grid.action(rot))
        .collect::<Result<Vec<_>>>()?;

    let map = orbit_map(&grid, &actions);
    let stars = orbit_sizes(&map);
    let grid_points = grid.addresses();
    let firsts: Vec<usize> = (0..grid.len()).filter(|&i| map[i] == i).collect();
    debug!("{} irreducible points on a {:?} mesh", firsts.len(), mesh);

    // Two triplets that share p1 are related by symmetry exactly when their
    // second points are related by the little group of p1.
    let triplets_at = |p1: usize| -> Vec<([usize; 3], usize, usize)> {
        let stabilizer = little_group(&grid, &group, &actions, p1, tol);
        let second_map = orbit_map(&grid, &stabilizer);
        let second_sizes = orbit_sizes(&second_map);

        (0..grid.len())
            .filter(|&p2| second_map[p2] == p2)
            .map(|p2| {
                let p3 = grid.index(-(grid_points[p1] + grid_points[p2]));
                ([p1, p2, p3], second_sizes[p2], stars[p1])
            })
            .collect()
    };

    let per_point: Vec<Vec<_>> = match threading {
        Threading::Rayon => firsts.par_iter().map(|&p1| triplets_at(p1)).collect(),
        Threading::Serial => firsts.iter().map(|&p1| triplets_at(p1)).collect(),
    };

    let mut out = Triplets { triplets: vec![], weights: vec![], star_sizes: vec![], grid_points };
    for (triplet, weight, star) in per_point.into_iter().flatten() {
        out.triplets.push(triplet);
        out.weights.push(weight);
        out.star_sizes.push(star);
    }
    Ok(out)
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cubic_group() -> Vec<M33<i32>> {
        vec![
            M33::from_array([[0, -1, 0], [1, 0, 0], [0, 0, 1]]),
            M33::from_array([[0, 0, 1], [1, 0, 0], [0, 1, 0]]),
        ]
    }

    fn check_closure(out: &Triplets, mesh: [i32; 3]) {
        for &[i, j, k] in &out.triplets {
            let sum = out.grid_points[i] + out.grid_points[j] + out.grid_points[k];
            for axis in 0..3 {
                assert_eq!(sum[axis].rem_euclid(mesh[axis]), 0);
            }
        }
    }

    /// Weights per `p1` sum to `n`, and with the stars they cover all `n^2` triplets.
    fn check_weights(out: &Triplets, n: usize) -> usize {
        let mut firsts: Vec<usize> = out.triplets.iter().map(|t| t[0]).collect();
        firsts.dedup();
        for &p1 in &firsts {
            let total: usize = out.triplets.iter().zip(&out.weights)
                .filter(|&(t, _)| t[0] == p1)
                .map(|(_, &w)| w)
                .sum();
            assert_eq!(total, n, "weights at p1 = {}", p1);
        }
        let everything: usize = out.weights.iter().zip(&out.star_sizes).map(|(w, s)| w * s).sum();
        assert_eq!(everything, n * n);
        firsts.len()
    }

    #[test]
    fn cubic() {
        let lattice = Lattice::cubic(3.0);
        let out = triplets([4, 4, 4], &lattice, &cubic_group(), true, 1e-5, Threading::Serial).unwrap();
        let n = 64;
        check_closure(&out, [4, 4, 4]);
        assert_eq!(check_weights(&out, n), 10);
        assert_eq!(out.weights.iter().sum::<usize>(), 10 * n);

        // at gamma the little group is the whole group, so the second points
        // are just the irreducible mesh
        let at_gamma = out.triplets.iter().filter(|t| t[0] == 0).count();
        assert_eq!(at_gamma, 10);
        assert_eq!(out.triplets[0], [0, 0, 0]);
        assert_eq!(out.weights[0], 1);
        assert_eq!(out.star_sizes[0], 1);
    }

    #[test]
    fn no_symmetry() {
        let lattice = Lattice::orthorhombic(3.0, 4.0, 5.0);
        let out = triplets([2, 3, 1], &lattice, &[], false, 1e-5, Threading::Serial).unwrap();
        assert_eq!(out.triplets.len(), 36);
        assert!(out.weights.iter().all(|&w| w == 1));
        assert_eq!(check_weights(&out, 6), 6);

        // time reversal pairs up (p1, p2) with (-p1, -p2), leaving four p1
        let out = triplets([2, 3, 1], &lattice, &[], true, 1e-5, Threading::Serial).unwrap();
        assert_eq!(check_weights(&out, 6), 4);
        assert_eq!(out.weights.iter().sum::<usize>(), 24);
        assert!(out.weights.iter().all(|&w| w == 1 || w == 2));
    }

    #[test]
    fn closure() {
        let lattice = Lattice::orthorhombic(3.0, 3.0, 5.0);
        let fourfold = M33::from_array([[0, -1, 0], [1, 0, 0], [0, 0, 1]]);
        let mirror = M33::from_array([[1, 0, 0], [0, -1, 0], [0, 0, 1]]);
        let mesh = [4, 4, 3];
        let out = triplets(mesh, &lattice, &[fourfold, mirror], true, 1e-5, Threading::Serial).unwrap();
        check_closure(&out, mesh);
        let num_firsts = check_weights(&out, 48);
        assert_eq!(out.weights.iter().sum::<usize>(), num_firsts * 48);
    }

    #[test]
    fn rayon_matches_serial() {
        let lattice = Lattice::cubic(3.0);
        let serial = triplets([4, 4, 4], &lattice, &cubic_group(), true, 1e-5, Threading::Serial).unwrap();
        let rayon = triplets([4, 4, 4], &lattice, &cubic_group(), true, 1e-5, Threading::Rayon).unwrap();
        assert_eq!(serial, rayon);
    }

    #[test]
    fn bad_meshes() {
        let lattice = Lattice::cubic(3.0);
        match triplets([4, 4, 2], &lattice, &cubic_group(), true, 1e-5, Threading::Serial) {
            Err(crate::Error::MeshIncompatible(_)) => {},
            r => panic!("{:?}", r),
        }
        match triplets([4, -4, 4], &lattice, &cubic_group(), true, 1e-5, Threading::Serial) {
            Err(crate::Error::InvalidMesh(_)) => {},
            r => panic!("{:?}", r),
        }
    }
}
