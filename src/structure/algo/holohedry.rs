use rsp2_array_types::{V3, M33};

use crate::algo::reduction::LatticeReduction;

/// The seven lattice systems, identified by their point groups.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Holohedry {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Trigonal,
    Hexagonal,
    Cubic,
}

impl Holohedry {
    /// Identify a lattice point group by its order.
    ///
    /// Returns `None` for orders that no lattice point group has.
    pub fn from_group_order(order: usize) -> Option<Self> {
        Some(match order {
            2 => Holohedry::Triclinic,
            4 => Holohedry::Monoclinic,
            8 => Holohedry::Orthorhombic,
            16 => Holohedry::Tetragonal,
            12 => Holohedry::Trigonal,
            24 => Holohedry::Hexagonal,
            48 => Holohedry::Cubic,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Holohedry::Triclinic => "triclinic",
            Holohedry::Monoclinic => "monoclinic",
            Holohedry::Orthorhombic => "orthorhombic",
            Holohedry::Tetragonal => "tetragonal",
            Holohedry::Trigonal => "trigonal",
            Holohedry::Hexagonal => "hexagonal",
            Holohedry::Cubic => "cubic",
        }
    }
}

/// Find the rotations that map a lattice onto itself.
///
/// The output matrices act on fractional column vectors of the **original**
/// lattice of the reduction.  The rotations are found in the reduced basis,
/// where every image of a lattice vector has small integer coordinates.
///
/// `tol` is a cartesian length.  Widening it can only add rotations.
pub fn lattice_point_group(
    reduction: &LatticeReduction,
    tol: f64,
) -> Vec<M33<i32>>
{
    // fractional columns transform as  x_orig = T^T x_reduced
    let t = reduction.transform().matrix();
    let t_inv = reduction.transform().inverse_matrix();

    let out: Vec<_> = {
        reduced_lattice_point_group(reduction, tol)
            .iter()
            .map(|r| &(&t.t() * r) * &t_inv.t())
            .collect()
    };
    debug!("lattice point group has {} operations", out.len());
    out
}

fn reduced_lattice_point_group(reduction: &LatticeReduction, tol: f64) -> Vec<M33<i32>>
{
    // A rotation R (acting on fractional columns) is a symmetry of the lattice
    // iff it is unimodular and preserves the metric:   R^T G R == G
    //
    // The kth column of R is the image of the kth lattice vector, so it must
    // be a lattice point of the same length.  For a reduced cell, every such
    // point has coordinates within the catalogue.
    let lattice = reduction.reduced();
    let metric = lattice.metric();
    let norms = lattice.norms();

    let choices = [0, 1, 2].map(|k| lattice_points_of_length(lattice.matrix(), norms[k], tol));
    trace!("catalogue candidates per axis: {} {} {}",
        choices[0].len(), choices[1].len(), choices[2].len());

    let mut out = vec![];
    for col_0 in &choices[0] {
        for col_1 in &choices[1] {
            // skip the third loop early if the first two columns are inconsistent
            if !metric_entry_ok(&metric, &norms, tol, (0, col_0), (1, col_1)) {
                continue;
            }
            for col_2 in &choices[2] {
                let rot = M33::from_cols([col_0.0, col_1.0, col_2.0]);
                if rot.det().abs() != 1 {
                    continue;
                }
                if metric_entry_ok(&metric, &norms, tol, (0, col_0), (2, col_2))
                    && metric_entry_ok(&metric, &norms, tol, (1, col_1), (2, col_2))
                {
                    out.push(rot);
                }
            }
        }
    }
    out
}

// Checks a single off-diagonal element of  R^T G R == G.
//
// An error of `tol` in the position of either image shifts their dot product
// by about `tol` times the length of the other, hence the scale.
fn metric_entry_ok(
    metric: &M33,
    norms: &[f64; 3],
    tol: f64,
    (i, col_i): (usize, &(V3<i32>, V3)),
    (j, col_j): (usize, &(V3<i32>, V3)),
) -> bool
{
    let (_, float_i) = col_i;
    let (_, float_j) = col_j;
    let actual = V3::dot(float_i, &(metric * float_j));
    (actual - metric[i][j]).abs() <= tol * (norms[i] + norms[j])
}

// integer coordinates along with the same coordinates as floats
fn lattice_points_of_length(matrix: &M33, target_length: f64, tol: f64) -> Vec<(V3<i32>, V3)>
{
    LATTICE_POINTS.iter()
        .map(|&v| (v, v.map(f64::from)))
        .filter(|(_, f)| ((f * matrix).norm() - target_length).abs() <= tol)
        .collect()
}

lazy_static!{
    // A set of fractional lattice coordinates large enough that, for a reduced
    // cell, this includes all vectors equal in length to a cell vector.
    static ref LATTICE_POINTS: Vec<V3<i32>> = {
        const MAX: i32 = 2;
        let mut indices = Vec::with_capacity((2 * MAX + 1).pow(3) as usize);
        for i in -MAX..=MAX {
            for j in -MAX..=MAX {
                for k in -MAX..=MAX {
                    if (i, j, k) != (0, 0, 0) {
                        indices.push(V3([i, j, k]));
                    }
                }
            }
        }
        indices
    };
}
