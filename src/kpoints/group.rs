use std::collections::BTreeSet;

use rsp2_array_types::{V3, M33};
use rsp2_structure::{Lattice, generate_finite_group};

use crate::{Error, Result};

// Rotations are accepted as symmetries of the lattice when they preserve
// the metric to within this relative error.
const METRIC_RTOL: f64 = 1e-3;

/// Check that every rotation is a symmetry of the lattice.
///
/// This guarantees that the group they generate is finite.
pub(crate) fn check_point_group(lattice: &Lattice, point_group: &[M33<i32>]) -> Result<()> {
    let lattice = Lattice::checked_new(lattice.matrix())?;
    let metric = lattice.metric();
    let scale = (0..3).map(|i| metric[i][i]).fold(0.0, f64::max);

    for rot in point_group {
        let det = rot.det();
        if det != 1 && det != -1 {
            return Err(Error::InvalidPointGroup(format!("{:?} has determinant {}", rot, det)));
        }
        let float_rot = rot.map(f64::from);
        let image = &(&float_rot.t() * &metric) * &float_rot;
        let err = (0..3)
            .flat_map(|i| (0..3).map(move |j| (i, j)))
            .map(|(i, j)| (image[i][j] - metric[i][j]).abs())
            .fold(0.0, f64::max);
        if err > METRIC_RTOL * scale {
            return Err(Error::InvalidPointGroup(format!("{:?} does not preserve the lattice metric", rot)));
        }
    }
    Ok(())
}

/// The group that acts on fractional reciprocal coordinates.
///
/// Contains the transpose of every rotation, and their negations if time
/// reversal is used.  Sorted; every member is distinct.
pub(crate) fn reciprocal_group(point_group: &[M33<i32>], time_reversal: bool) -> Vec<M33<i32>> {
    let mut generators = vec![M33::eye()];
    generators.extend(point_group.iter().map(|rot| rot.t()));
    if time_reversal {
        generators.push(-M33::eye());
    }
    let mut group = generate_finite_group(&generators, |a, b| a * b);
    group.sort();
    group
}

/// Indices of the members of `group` that leave `q` unchanged up to a
/// reciprocal lattice vector.
pub(crate) fn stabilizer(group: &[M33<i32>], q: &V3, tol: f64) -> BTreeSet<usize> {
    group.iter().enumerate()
        .filter(|(_, rot)| {
            let diff = &rot.map(f64::from) * q - q;
            (diff - diff.round()).0.iter().all(|x| x.abs() <= tol)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Indices of the members of `group` that stabilize all of the `q_points`.
pub(crate) fn common_stabilizer(group: &[M33<i32>], q_points: &[V3], tol: f64) -> BTreeSet<usize> {
    let everything: BTreeSet<usize> = (0..group.len()).collect();
    q_points.iter().fold(everything, |acc, q| {
        acc.intersection(&stabilizer(group, q, tol)).cloned().collect()
    })
}
