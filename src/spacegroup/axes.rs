//! Conventional axes from a point group, without reference to a metric.
//!
//! All matrices here act on fractional column vectors of some primitive
//! cell.  The conventional axes are returned as the columns of an integer
//! matrix with positive determinant; the determinant is the number of
//! lattice points in the conventional cell.

use rsp2_array_types::{V3, M33};
use rsp2_linalg::{gcd, nullspace_of_row};
use rsp2_structure::{Holohedry, Lattice, lattice_point_group, niggli_reduce, generate_finite_group};

use crate::{Centering, Error, PointGroup};
use crate::centering::centering_of;

/// A metric invariant under every rotation of the group.
///
/// Exact, so that comparisons of lengths involve no tolerance.
pub(crate) fn invariant_metric(rots: &[M33<i64>]) -> M33<i64> {
    rots.iter().fold(M33::zero(), |acc, w| acc + &w.t() * w)
}

fn proper(rot: &M33<i64>) -> M33<i64>
{ *rot * rot.det() }

fn primitive_vector(v: V3<i64>) -> V3<i64> {
    let g = v.0.iter().fold(0, |acc, &x| gcd(acc, x.abs()));
    if g == 0 { v } else { v.map(|x| x / g) }
}

// the shortest lattice vector along the axis of a proper rotation other than the identity
fn rotation_axis(rot: &M33<i64>) -> V3<i64> {
    let a = *rot - M33::eye();
    let candidates = [a[0].cross(&a[1]), a[0].cross(&a[2]), a[1].cross(&a[2])];
    let axis = candidates.iter().cloned().find(|v| v != &V3::zero()).unwrap_or_else(V3::zero);
    debug_assert_ne!(axis, V3::zero(), "not a rotation: {:?}", rot);

    let axis = primitive_vector(axis);
    let first = axis.0.iter().cloned().find(|&x| x != 0).unwrap_or(1);
    if first < 0 { -axis } else { axis }
}

// a basis for the integer kernel of a nonzero rank-1 matrix
fn plane_lattice(m: &M33<i64>) -> Option<[V3<i64>; 2]> {
    let row = m.0.iter().cloned().find(|r| r != &V3::zero())?;
    nullspace_of_row(primitive_vector(row))
}

// Lagrange-Gauss reduction of a 2d basis under the metric `g`.
fn gauss_reduce(g: &M33<i64>, [mut u, mut v]: [V3<i64>; 2]) -> [V3<i64>; 2] {
    let dot = |a: &V3<i64>, b: &V3<i64>| a.dot(&(g * b));
    if dot(&u, &u) > dot(&v, &v) {
        std::mem::swap(&mut u, &mut v);
    }
    loop {
        let uu = dot(&u, &u);
        // nearest integer to  (u.v)/(u.u)
        let q = (2 * dot(&u, &v) + uu).div_euclid(2 * uu);
        v -= u * q;
        if dot(&v, &v) >= uu {
            return [u, v];
        }
        std::mem::swap(&mut u, &mut v);
    }
}

fn kind(rots: &[M33<i64>], trace: i64) -> Vec<M33<i64>> {
    let mut out: Vec<_> = rots.iter().map(proper).filter(|w| w.trace() == trace).collect();
    out.sort();
    out.dedup();
    out
}

/// Conventional axes for the crystal system of `holohedry`.
///
/// `rots` must be a crystallographic point group.  The centering of the
/// output is not normalized; see [`alternatives`].
pub(crate) fn conventional_axes(holohedry: Holohedry, rots: &[M33<i64>]) -> Result<M33<i64>, Error> {
    let inconsistent = || Error::InconsistentOperations(format!("no axes for {} group", holohedry.name()));
    let metric = invariant_metric(rots);
    let twofolds = kind(rots, -1);
    let threefolds = kind(rots, 0);
    let fourfolds = kind(rots, 1);

    let cols = match holohedry {
        Holohedry::Triclinic => [V3([1, 0, 0]), V3([0, 1, 0]), V3([0, 0, 1])],

        Holohedry::Monoclinic => {
            let two = twofolds.first().ok_or_else(inconsistent)?;
            let b = rotation_axis(two);
            let [a, c] = gauss_reduce(&metric, plane_lattice(&(*two + M33::eye())).ok_or_else(inconsistent)?);
            [a, b, c]
        },

        Holohedry::Orthorhombic => match &twofolds[..] {
            [x, y, z] => [rotation_axis(x), rotation_axis(y), rotation_axis(z)],
            _ => return Err(inconsistent()),
        },

        Holohedry::Tetragonal => {
            let four = fourfolds.first().ok_or_else(inconsistent)?;
            let c = rotation_axis(four);
            let plane = plane_lattice(&(four * four + M33::eye())).ok_or_else(inconsistent)?;
            let [a, _] = gauss_reduce(&metric, plane);
            [a, four * a, c]
        },

        Holohedry::Trigonal | Holohedry::Hexagonal => {
            let three = threefolds.first().ok_or_else(inconsistent)?;
            let c = rotation_axis(three);
            let plane = plane_lattice(&(M33::eye() + *three + three * three)).ok_or_else(inconsistent)?;
            let [a, _] = gauss_reduce(&metric, plane);
            [a, three * a, c]
        },

        Holohedry::Cubic => {
            // axial twofolds are the squares of fourfolds, when there are any
            let axial: Vec<_> = match fourfolds.is_empty() {
                true => twofolds.clone(),
                false => fourfolds.iter().map(|w| w * w).collect(),
            };
            let three = threefolds.first().ok_or_else(inconsistent)?;
            let a = rotation_axis(axial.first().ok_or_else(inconsistent)?);
            let b = three * a;
            let c = three * b;
            [a, b, c]
        },
    };

    let axes = M33::from_cols(cols);
    match axes.det() {
        0 => Err(inconsistent()),
        d if d < 0 => Ok(-axes),
        _ => Ok(axes),
    }
}

/// Unimodular changes of the conventional axes to try, with the identity first.
///
/// These are applied as `axes * alt`.
pub(crate) fn alternatives(holohedry: Holohedry) -> &'static [M33<i64>] {
    match holohedry {
        Holohedry::Triclinic => &TRICLINIC,
        Holohedry::Monoclinic => &MONOCLINIC,
        Holohedry::Orthorhombic | Holohedry::Cubic => &CUBIC,
        Holohedry::Tetragonal => &TETRAGONAL,
        Holohedry::Trigonal | Holohedry::Hexagonal => &HEXAGONAL,
    }
}

fn proper_group(generators: &[M33<i64>]) -> Vec<M33<i64>> {
    let mut group = generate_finite_group(generators, |a, b| a * b);
    group.sort();
    // identity first
    group.retain(|m| m != &M33::eye());
    group.insert(0, M33::eye());
    group
}

lazy_static! {
    static ref TRICLINIC: Vec<M33<i64>> = vec![M33::eye()];

    // (a, c) plane changes; b is flipped along with the plane when needed
    static ref MONOCLINIC: Vec<M33<i64>> = {
        let mut out = vec![M33::eye()];
        let entries: [i64; 3] = [-1, 0, 1];
        for &m00 in &entries {
            for &m01 in &entries {
                for &m10 in &entries {
                    for &m11 in &entries {
                        let det = m00 * m11 - m01 * m10;
                        if det.abs() != 1 {
                            continue;
                        }
                        let alt = M33::from_array([
                            [m00, 0, m01],
                            [0, det, 0],
                            [m10, 0, m11],
                        ]);
                        if alt != M33::eye() {
                            out.push(alt);
                        }
                    }
                }
            }
        }
        out
    };

    static ref CUBIC: Vec<M33<i64>> = proper_group(&[
        M33::from_array([[0, -1, 0], [1, 0, 0], [0, 0, 1]]),
        M33::from_array([[0, 0, 1], [1, 0, 0], [0, 1, 0]]),
    ]);

    static ref TETRAGONAL: Vec<M33<i64>> = proper_group(&[
        M33::from_array([[0, -1, 0], [1, 0, 0], [0, 0, 1]]),
        M33::from_array([[1, 0, 0], [0, -1, 0], [0, 0, -1]]),
    ]);

    static ref HEXAGONAL: Vec<M33<i64>> = proper_group(&[
        M33::from_array([[1, -1, 0], [1, 0, 0], [0, 0, 1]]),
        M33::from_array([[0, -1, 0], [-1, 0, 0], [0, 0, -1]]),
    ]);
}

/// The Bravais lattice of a lattice.
#[derive(Debug, Clone)]
pub struct BravaisLattice {
    pub holohedry: Holohedry,
    pub centering: Centering,
    /// Rows are the conventional lattice vectors.
    pub lattice: Lattice,
    /// Columns are the conventional lattice vectors, in fractional coordinates
    /// of the Niggli-reduced lattice.
    pub transformation: M33<i32>,
}

/// Identify the Bravais lattice of a lattice.
///
/// `tol` is a cartesian length, as in [`lattice_point_group`].
pub fn bravais_lattice(lattice: &Lattice, tol: f64) -> Result<BravaisLattice, Error> {
    let reduction = niggli_reduce(lattice)?;
    let reduced = reduction.reduced();
    // rotations in the reduced basis
    let group = lattice_point_group(&niggli_reduce(reduced)?, tol);
    let holohedry = PointGroup::from_rotations(&group)
        .map(|pg| pg.holohedry())
        .ok_or_else(|| Error::InconsistentOperations("lattice point group is not a holohedry".to_string()))?;
    let rots: Vec<M33<i64>> = group.iter().map(|r| r.map(i64::from)).collect();

    let axes = conventional_axes(holohedry, &rots)?;
    let allowed: &[Centering] = match holohedry {
        Holohedry::Triclinic => &[Centering::P],
        Holohedry::Monoclinic => &[Centering::P, Centering::C],
        Holohedry::Orthorhombic => &[Centering::P, Centering::C, Centering::I, Centering::F],
        Holohedry::Tetragonal => &[Centering::P, Centering::I],
        Holohedry::Trigonal | Holohedry::Hexagonal => &[Centering::P, Centering::R],
        Holohedry::Cubic => &[Centering::P, Centering::I, Centering::F],
    };

    for alt in alternatives(holohedry) {
        let axes = &axes * alt;
        let centering = match centering_of(&axes) {
            Some(c) if allowed.contains(&c) => c,
            _ => continue,
        };
        trace!("{} {} lattice with axes {:?}", centering, holohedry.name(), axes);
        let float_axes = axes.map(|x| x as f64);
        return Ok(BravaisLattice {
            holohedry,
            centering,
            lattice: Lattice::new(&(&float_axes.t() * reduced.matrix())),
            transformation: axes.map(|x| x as i32),
        });
    }
    // every holohedry has an allowed centering among its alternatives
    Err(Error::NoMatch)
}
