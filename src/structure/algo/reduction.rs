//! Niggli reduction.
//!
//! This is algorithm B of Gruber, normalized by steps N1-N3, in the
//! numerically stable form of Grosse-Kunstleve et al.
//!
//! * B. Gruber, "The Relationship between Reduced Cells
//!   in a General Bravais lattice." Acta Crystallographica
//!   Section A 29 (1973): 433-440.
//!
//! * Grosse-Kunstleve, Ralf W., Nicholas K. Sauter,
//!   and Paul D. Adams. "Numerically stable algorithms
//!   for the computation of reduced unit cells."
//!   Acta Crystallographica Section A: Foundations of
//!   Crystallography 60.1 (2004): 1-6.
//!
//! The quantities tracked are the Gruber characteristic
//! `(a, b, c) = (|v0|², |v1|², |v2|²)` and
//! `(x, y, z) = (2 v1·v2, 2 v0·v2, 2 v0·v1)`.

use std::cmp::Ordering;

use rsp2_array_types::{M33, dot};

use crate::{Lattice, Error};

/// Number of passes through steps B2-B5 before giving up.
pub const MAX_REDUCTION_ITERATIONS: usize = 1000;

/// Comparisons that treat values within `eps` of each other as equal.
#[derive(Debug, Copy, Clone)]
struct Fuzz {
    eps: f64,
}

impl Fuzz {
    fn for_lattice(lattice: &Lattice) -> Fuzz
    { Fuzz { eps: 1e-5 * lattice.volume().abs().cbrt() } }

    fn cmp(&self, x: f64, y: f64) -> Ordering {
        match () {
            _ if x < y - self.eps => Ordering::Less,
            _ if y < x - self.eps => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }

    fn lt(&self, x: f64, y: f64) -> bool { self.cmp(x, y) == Ordering::Less }
    fn gt(&self, x: f64, y: f64) -> bool { self.cmp(x, y) == Ordering::Greater }
    fn eq(&self, x: f64, y: f64) -> bool { self.cmp(x, y) == Ordering::Equal }
    fn sign(&self, x: f64) -> Ordering { self.cmp(x, 0.0) }
}

/// An integer matrix of determinant 1, along with its (integer) inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct Unimodular {
    matrix: M33<i32>,
    inverse: M33<i32>,
}

impl Unimodular {
    fn from_matrix(matrix: M33<i32>) -> Unimodular {
        let det = matrix.det();
        debug_assert_eq!(det, 1);
        // adj(M) = det(M) M⁻¹
        Unimodular { matrix, inverse: matrix.adjugate() * det }
    }

    #[inline] pub fn matrix(&self) -> &M33<i32> { &self.matrix }
    #[inline] pub fn inverse_matrix(&self) -> &M33<i32> { &self.inverse }
}

/// A lattice midway through reduction.
///
/// Every change of basis goes through `apply`, which keeps the
/// characteristic in sync with the accumulated transform.
#[derive(Debug, Clone)]
struct Reducer {
    original: Lattice,
    fuzz: Fuzz,
    transform: M33<i32>,
    current: M33,
    abc: [f64; 3],
    xyz: [f64; 3],
}

/// An elementary row operation on the basis.
#[derive(Debug, Copy, Clone)]
enum RowOp {
    Swap(usize, usize),
    Negate(usize),
    /// `row[to] += mul * row[from]`
    AddMultiple { to: usize, mul: i32, from: usize },
}

impl Reducer {
    fn new(lattice: &Lattice) -> Reducer {
        let mut out = Reducer {
            original: lattice.clone(),
            fuzz: Fuzz::for_lattice(lattice),
            transform: M33::eye(),
            current: *lattice.matrix(),
            abc: [0.0; 3],
            xyz: [0.0; 3],
        };
        out.recompute();
        out
    }

    fn recompute(&mut self) {
        self.current = &self.transform.map(f64::from) * self.original.matrix();
        let v = &self.current;
        self.abc = [dot(&v[0], &v[0]), dot(&v[1], &v[1]), dot(&v[2], &v[2])];
        self.xyz = [
            2.0 * dot(&v[1], &v[2]),
            2.0 * dot(&v[0], &v[2]),
            2.0 * dot(&v[0], &v[1]),
        ];
    }

    fn apply(&mut self, ops: &[RowOp]) {
        for &op in ops {
            let t = &mut self.transform;
            match op {
                RowOp::Swap(j, k) => t.swap(j, k),
                RowOp::Negate(k) => t[k] *= -1,
                RowOp::AddMultiple { to, mul, from } => {
                    assert_ne!(to, from);
                    let addend = t[from] * mul;
                    t[to] += addend;
                },
            }
        }
        self.recompute();
    }

    fn finish(mut self) -> LatticeReduction {
        // Grosse-Kunstleve fixes the handedness at every step; since the
        // dimension is odd, negating everything once at the end does the same.
        if self.transform.det() < 0 {
            self.apply(&[RowOp::Negate(0), RowOp::Negate(1), RowOp::Negate(2)]);
        }
        LatticeReduction {
            original: self.original,
            transform: Unimodular::from_matrix(self.transform),
            reduced: Lattice::new(&self.current),
        }
    }

    // Steps N1-N2: sort by length, breaking ties on |xyz|.
    fn sort_lengths(&mut self) {
        let fuzz = self.fuzz;
        let out_of_order = |r: &Reducer, j: usize, k: usize| {
            match fuzz.cmp(r.abc[j], r.abc[k]) {
                Ordering::Greater => true,
                Ordering::Equal => fuzz.gt(r.xyz[j].abs(), r.xyz[k].abs()),
                Ordering::Less => false,
            }
        };

        loop {
            if out_of_order(self, 0, 1) {
                self.apply(&[RowOp::Swap(0, 1)]);
            }
            if out_of_order(self, 1, 2) {
                self.apply(&[RowOp::Swap(1, 2)]);
                continue;
            }
            break;
        }
    }

    // Step N3: make x, y, z all positive, or all non-positive.
    //
    // Negating vector k flips the signs of the two entries of xyz other than k.
    fn normalize_signs(&mut self) {
        let fuzz = self.fuzz;
        let signs = self.xyz.map(|v| fuzz.sign(v));
        let num_negative = signs.iter().filter(|&&s| s == Ordering::Less).count();
        let zero_at = signs.iter().position(|&s| s == Ordering::Equal);

        let mut ops = vec![];
        if zero_at.is_none() && num_negative % 2 == 0 {
            for k in 0..3 {
                if signs[k] == Ordering::Less {
                    ops.push(RowOp::Negate(k));
                }
            }
        } else {
            for k in 0..3 {
                if signs[k] == Ordering::Greater {
                    ops.push(RowOp::Negate(k));
                }
            }
            // An odd number of flips would leave one entry positive.
            // This case only arises when there is a zero, and flipping
            // the zero's vector flips the other two back.
            if ops.len() % 2 == 1 {
                if let Some(k) = zero_at {
                    ops.push(RowOp::Negate(k));
                }
            }
        }
        if !ops.is_empty() {
            self.apply(&ops);
        }
    }

    // Steps B2-B4 share a shape: an off-diagonal `value` must not exceed
    // the squared length `bound`, with tie-breaking rules on the boundary.
    //
    // Returns the multiple of `from` to subtract from `to`.
    fn off_diagonal_step(&self, value: f64, bound: f64, tie: f64, tie_limit: f64) -> Option<i32> {
        let fuzz = self.fuzz;
        let violated = fuzz.gt(value.abs(), bound)
            || (fuzz.eq(value, bound) && fuzz.gt(tie, tie_limit))
            || (fuzz.eq(value, -bound) && fuzz.lt(tie, 0.0));
        if !violated {
            return None;
        }

        // Exactly on the boundary the floor can be zero; step off it
        // in the direction that triggered the condition.
        let j = ((value + bound) / (2.0 * bound)).floor();
        Some(if j == 0.0 { value.signum() as i32 } else { j as i32 })
    }

    /// Performs one of steps B2-B5, if any applies.
    fn reduce_once(&mut self) -> bool {
        let [a, b, _] = self.abc;
        let [x, y, z] = self.xyz;

        // (to, from, value, bound, tie, tie_limit)
        let b2_to_b4 = [
            (2, 1, x, b, z, 2.0 * y),
            (2, 0, y, a, z, 2.0 * x),
            (1, 0, z, a, y, 2.0 * x),
        ];
        for &(to, from, value, bound, tie, tie_limit) in &b2_to_b4 {
            if let Some(j) = self.off_diagonal_step(value, bound, tie, tie_limit) {
                self.apply(&[RowOp::AddMultiple { to, mul: -j, from }]);
                return true;
            }
        }

        // B5
        let sum = x + y + z + a + b;
        let tie = 2.0 * (a + y) + z;
        if self.fuzz.lt(sum, 0.0) || (self.fuzz.eq(sum, 0.0) && self.fuzz.gt(tie, 0.0)) {
            self.apply(&[
                RowOp::AddMultiple { to: 2, mul: 1, from: 0 },
                RowOp::AddMultiple { to: 2, mul: 1, from: 1 },
            ]);
            return true;
        }
        false
    }
}

/// A pairing of a lattice matrix with its reduced form,
/// along with the integer coefficient matrices that convert
/// between the two.
///
/// `reduced = transform * original` (as matrices whose rows are lattice vectors).
#[derive(Debug, Clone)]
pub struct LatticeReduction {
    original: Lattice,
    transform: Unimodular,
    reduced: Lattice,
}

impl LatticeReduction {
    #[inline] pub fn original(&self) -> &Lattice { &self.original }
    #[inline] pub fn reduced(&self) -> &Lattice { &self.reduced }
    #[inline] pub fn transform(&self) -> &Unimodular { &self.transform }
}

/// Niggli-reduce a lattice.
///
/// The reduced lattice vectors are integer combinations of the original ones,
/// spanning the same lattice, with a right-handed (positive determinant) transform.
pub fn niggli_reduce(lattice: &Lattice) -> Result<LatticeReduction, Error>
{ niggli_reduce_within(lattice, MAX_REDUCTION_ITERATIONS) }

fn niggli_reduce_within(lattice: &Lattice, max_iterations: usize) -> Result<LatticeReduction, Error>
{
    let lattice = Lattice::checked_new(lattice.matrix())?;
    let mut reducer = Reducer::new(&lattice);

    for iteration in 1..=max_iterations {
        reducer.sort_lengths();
        reducer.normalize_signs();
        if !reducer.reduce_once() {
            trace!("niggli reduction finished after {} iterations", iteration);
            return Ok(reducer.finish());
        }
    }
    Err(Error::ReductionDidNotConverge(max_iterations))
}

/// The Niggli-reduced form of a lattice, which has the shortest possible basis vectors.
pub fn smallest_lattice(lattice: &Lattice) -> Result<Lattice, Error>
{ niggli_reduce(lattice).map(|r| r.reduced().clone()) }

/// Test whether a lattice satisfies the Niggli conditions
/// (cctbx/uctbx/reduction_base.py).
#[cfg(test)]
pub(crate) fn is_niggli(lattice: &Lattice) -> bool {
    let r = Reducer::new(lattice);
    let f = r.fuzz;
    let le = |x: f64, y: f64| !f.gt(x, y);
    let ([a, b, c], [x, y, z]) = (r.abc, r.xyz);
    let implies = |p: bool, q: bool| !p || q;

    let all_positive = [x, y, z].iter().all(|&v| f.gt(v, 0.0));
    let all_nonpositive = [x, y, z].iter().all(|&v| le(v, 0.0));

    let buerger = le(a, b) && le(b, c)
        && le(x.abs(), b) && le(y.abs(), a) && le(z.abs(), a)
        && (all_positive || (all_nonpositive && !f.lt(x + y + z + a + b, 0.0)))
        && implies(f.eq(a, b), le(x.abs(), y.abs()))
        && implies(f.eq(b, c), le(y.abs(), z.abs()));

    buerger
        && implies(f.eq(x, b), le(z, 2.0 * y))
        && implies(f.eq(y, a), le(z, 2.0 * x))
        && implies(f.eq(z, a), le(y, 2.0 * x))
        && implies(f.eq(x, -b), f.eq(z, 0.0))
        && implies(f.eq(y, -a), f.eq(z, 0.0))
        && implies(f.eq(z, -a), f.eq(y, 0.0))
        && implies(f.eq(x + y + z + a + b, 0.0), le(2.0 * (a + y) + z, 0.0))
}
