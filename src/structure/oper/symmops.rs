use std::fmt;

use ordered_float::OrderedFloat;
use rsp2_array_types::{V3, M33};

use crate::Error;
use crate::util::{Tol, wrap_v3};

/// A space group operation acting on fractional column vectors.
///
/// ```text
/// x' = rot * x + trans
/// ```
///
/// Invariants:
///  - `abs(det(rot)) == 1`
///  - elements of `trans` lie in `[0, 1)`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SymOp {
    pub(crate) rot: M33<i32>,
    pub(crate) trans: V3,
}

impl SymOp {
    pub fn new(rot: M33<i32>, trans: V3) -> Self {
        debug_assert_eq!(rot.det().abs(), 1, "{:?}", rot);
        SymOp { rot, trans: wrap_v3(trans) }
    }

    pub fn eye() -> Self
    { SymOp { rot: M33::eye(), trans: V3::zero() } }

    pub fn translation(trans: V3) -> Self
    { SymOp::new(M33::eye(), trans) }

    pub fn rot(&self) -> &M33<i32> { &self.rot }
    pub fn trans(&self) -> &V3 { &self.trans }

    pub fn is_pure_translation(&self) -> bool
    { self.rot == M33::eye() }

    pub fn float_rot(&self) -> M33
    { self.rot.map(f64::from) }

    /// Apply to a fractional position.  The output is not wrapped.
    pub fn transform_frac(&self, x: &V3) -> V3
    { &self.float_rot() * x + self.trans }

    /// Conventional group operator; `a.of(b)` applies `b` first.
    pub fn of(&self, other: &SymOp) -> SymOp {
        SymOp::new(
            &self.rot * &other.rot,
            &self.float_rot() * &other.trans + self.trans,
        )
    }

    /// Flipped group operator.
    ///
    /// `a.then(b) == b.of(a)`.
    pub fn then(&self, other: &SymOp) -> SymOp
    { other.of(self) }

    pub fn inverse(&self) -> SymOp {
        // exact because the determinant is a unit
        let inv_rot = self.rot.adjugate() * self.rot.det();
        let inv_float = inv_rot.map(f64::from);
        SymOp::new(inv_rot, -(&inv_float * &self.trans))
    }

    // sorting key for deterministic output
    pub(crate) fn sort_key(&self) -> (M33<i32>, V3<OrderedFloat<f64>>)
    { (self.rot, self.trans.map(OrderedFloat)) }
}

impl fmt::Display for SymOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..3 {
            writeln!(f, "{:>3} {:>3} {:>3}   {:>10.6}",
                self.rot[r][0], self.rot[r][1], self.rot[r][2], self.trans[r])?;
        }
        Ok(())
    }
}

/// The symmetry operations of a cell.
///
/// The identity is always first.  The set includes every pure translation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSet {
    ops: Vec<SymOp>,
    /// cartesian tolerance that was used to find the operations
    tol: f64,
}

impl OperationSet {
    pub fn new(ops: Vec<SymOp>, tol: f64) -> Self
    { OperationSet { ops, tol } }

    pub fn ops(&self) -> &[SymOp] { &self.ops }
    pub fn into_ops(self) -> Vec<SymOp> { self.ops }
    pub fn tol(&self) -> f64 { self.tol }
    pub fn len(&self) -> usize { self.ops.len() }
    pub fn is_empty(&self) -> bool { self.ops.is_empty() }
    pub fn iter(&self) -> std::slice::Iter<'_, SymOp> { self.ops.iter() }

    /// Distinct rotation parts, in order of first appearance.
    pub fn rotations(&self) -> Vec<M33<i32>> {
        let mut out: Vec<M33<i32>> = vec![];
        for op in &self.ops {
            if !out.contains(&op.rot) {
                out.push(op.rot);
            }
        }
        out
    }

    /// Translation parts of the operations whose rotation is the identity.
    pub fn pure_translations(&self) -> Vec<V3> {
        self.ops.iter()
            .filter(|op| op.is_pure_translation())
            .map(|op| op.trans)
            .collect()
    }
}

impl<'a> IntoIterator for &'a OperationSet {
    type Item = &'a SymOp;
    type IntoIter = std::slice::Iter<'a, SymOp>;

    fn into_iter(self) -> Self::IntoIter
    { self.ops.iter() }
}

/// The translation part of an exact operation.
///
/// This always has coordinates that are multiples of `1/12`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FracTrans (
    /// This is the vector times 12.
    ///
    /// Invariants:
    ///  - elements are reduced into the range `0 <= x < 12`.
    V3<i32>,
);

impl FracTrans {
    pub fn eye() -> Self
    { FracTrans(V3([0, 0, 0])) }

    /// Construct from numerators over 12.
    pub fn from_twelfths(v: V3<i32>) -> Self
    { FracTrans(v.map(|x| x.rem_euclid(12))) }

    pub fn from_floats(xs: &V3) -> Result<FracTrans, Error>
    { Ok(FracTrans::from_twelfths(xs.try_map(|x| Tol(1e-4).unfloat(x * 12.0))?)) }

    pub fn twelfths(&self) -> V3<i32>
    { self.0 }

    pub fn float(&self) -> V3
    { self.0.map(|x| f64::from(x) / 12f64) }
}

impl Default for FracTrans {
    fn default() -> Self
    { Self::eye() }
}

/// A space group operation with exact translations.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FracOp {
    rot: M33<i32>,
    trans: FracTrans,
}

impl Default for FracOp {
    fn default() -> Self
    { Self::eye() }
}

impl FracOp {
    pub fn eye() -> Self
    { FracOp { rot: M33::eye(), trans: FracTrans::eye() } }

    pub fn new(rot: &M33<i32>, trans: &FracTrans) -> Self
    { FracOp { rot: *rot, trans: *trans } }

    pub fn rot(&self) -> &M33<i32> { &self.rot }
    pub fn trans(&self) -> &FracTrans { &self.trans }

    /// Conventional group operator; `a.of(b)` applies `b` first.
    pub fn of(&self, other: &FracOp) -> FracOp {
        let rot = &self.rot * &other.rot;
        let trans = &self.rot * &other.trans.0 + self.trans.0;
        FracOp { rot, trans: FracTrans::from_twelfths(trans) }
    }

    /// Flipped group operator.
    ///
    /// `a.then(b) == b.of(a)`.
    pub fn then(&self, other: &FracOp) -> FracOp
    { other.of(self) }

    pub fn to_symop(&self) -> SymOp
    { SymOp::new(self.rot, self.trans.float()) }
}

impl FracOp {
    /// Fails if the translation is not close to a multiple of `1/12`.
    pub fn from_symop(op: &SymOp) -> Result<FracOp, Error>
    { Ok(FracOp::new(&op.rot, &FracTrans::from_floats(&op.trans)?)) }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn two_transform() {
        // two operations that don't commute
        let xy = M33::from_array([
            [0, 1, 0],
            [1, 0, 0],
            [0, 0, 1],
        ]);
        let zx = M33::from_array([
            [0, 0, 1],
            [0, 1, 0],
            [1, 0, 0],
        ]);
        let xy = SymOp::new(xy, V3([0.5, 0.0, 0.0]));
        let zx = SymOp::new(zx, V3([0.0, 0.0, 0.25]));

        // a point that is sensitive to any permutations of the axes
        let point = V3([0.1, 0.2, 0.3]);
        let composed = zx.of(&xy);
        assert_eq!(composed, xy.then(&zx));
        assert_close!(
            abs=1e-12,
            wrap_v3(composed.transform_frac(&point)).0,
            wrap_v3(zx.transform_frac(&xy.transform_frac(&point))).0,
        );
    }

    #[test]
    fn inverse() {
        let op = SymOp::new(
            M33::from_array([
                [ 0, -1, 0],
                [ 1, -1, 0],
                [ 0,  0, 1],
            ]),
            V3([1./3., 2./3., 0.5]),
        );
        let eye = op.of(&op.inverse());
        assert_eq!(eye.rot, M33::eye());
        assert_close!(abs=1e-12, wrap_v3(eye.trans + V3([0.5; 3])).0, [0.5; 3]);
    }

    #[test]
    fn symmop_mul() {
        let op = FracOp::new(
            &M33::from_array([
                [0, -1, 0],
                [1, -1, 0],
                [0,  0, 1],
            ]),
            &FracTrans::from_floats(&V3([0.0, 0.0, 1./3.])).unwrap(),
        );
        let square = FracOp::new(
            &M33::from_array([
                [-1, 1, 0],
                [-1, 0, 0],
                [ 0, 0, 1],
            ]),
            &FracTrans::from_floats(&V3([0., 0., 2./3.])).unwrap(),
        );
        assert_eq!(op.then(&op), square);
        assert_eq!(op.then(&op).then(&op), FracOp::eye());
    }

    #[test]
    fn operation_set() {
        let set = OperationSet::new(vec![
            SymOp::eye(),
            SymOp::translation(V3([0.5, 0.5, 0.5])),
            SymOp::new(M33::eye() * -1, V3::zero()),
            SymOp::new(M33::eye() * -1, V3([0.5, 0.5, 0.5])),
        ], 1e-5);
        assert_eq!(set.rotations().len(), 2);
        assert_eq!(set.pure_translations(), vec![V3::zero(), V3([0.5; 3])]);
    }
}
