use std::fmt;

use rsp2_array_types::{V3, M33};
use rsp2_linalg::{row_lattice_basis, solve_congruences};
use rsp2_structure::{Lattice, OperationSet, SymOp, wrap_frac};

use crate::{Centering, Error, PointGroup, Setting, OriginChoice, SpacegroupType};
use crate::axes::{alternatives, conventional_axes};
use crate::centering::centering_of;
use crate::database::candidates;

/// Smallest fractional tolerance used by [`classify`].
pub const MIN_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Copy, Clone)]
pub struct ClassifyOptions {
    /// Tolerance on translations, in fractional units.
    pub tol: f64,
    /// Setting to report for types with two origin choices.
    pub origin_choice: OriginChoice,
    /// Set this when the lattice the operations belong to has a negative
    /// determinant, so that enantiomorphic pairs (e.g. `P4_1` and `P4_3`)
    /// are not confused.
    pub left_handed: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        ClassifyOptions {
            tol: MIN_TOLERANCE,
            origin_choice: OriginChoice::default(),
            left_handed: false,
        }
    }
}

/// The space group type of a set of operations, and its setting.
#[derive(Debug, Clone, PartialEq)]
pub struct SpacegroupInfo {
    pub number: u16,
    /// Short Hermann-Mauguin symbol.
    pub international: String,
    pub hall_symbol: String,
    pub schoenflies: String,
    pub point_group: PointGroup,
    pub setting: Setting,
    pub centering: Centering,
    /// Columns are the standard conventional lattice vectors, in fractional
    /// coordinates of the input.
    pub transformation: M33,
    /// Origin of the standard setting, in fractional coordinates of the input.
    pub origin_shift: V3,
    /// Number of operations of the input.
    pub multiplicity: usize,
}

impl SpacegroupInfo {
    /// The conventional lattice of the standard setting.
    pub fn conventional_lattice(&self, lattice: &Lattice) -> Lattice
    { Lattice::new(&(&self.transformation.t() * lattice.matrix())) }
}

impl fmt::Display for SpacegroupInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Space group: {} ({})", self.international, self.number)?;
        writeln!(f, "Schoenflies: {}", self.schoenflies)?;
        writeln!(f, "Hall symbol: {}", self.hall_symbol)?;
        if self.setting != Setting::Standard {
            writeln!(f, "Setting: {}", self.setting)?;
        }
        writeln!(f, "Point group: {}", self.point_group)?;
        write!(f, "Multiplicity: {}", self.multiplicity)
    }
}

/// Identify the space group type of a set of operations.
///
/// The tolerance is taken from the operation set, but is at least
/// [`MIN_TOLERANCE`].
pub fn classify(ops: &OperationSet) -> Result<SpacegroupInfo, Error>
{ classify_with_tol(ops, ops.tol().max(MIN_TOLERANCE)) }

pub fn classify_with_tol(ops: &OperationSet, tol: f64) -> Result<SpacegroupInfo, Error>
{ classify_with(ops, &ClassifyOptions { tol, ..Default::default() }) }

pub fn classify_with(ops: &OperationSet, options: &ClassifyOptions) -> Result<SpacegroupInfo, Error> {
    let tol = options.tol;
    // flipping the third axis makes a left-handed basis right-handed
    let flip = match options.left_handed {
        true => M33::from_array([[1, 0, 0], [0, 1, 0], [0, 0, -1]]),
        false => M33::eye(),
    };
    let float_flip = flip.map(f64::from);
    let flipped: Vec<SymOp> = {
        ops.iter()
            .map(|op| SymOp::new(&(&flip * op.rot()) * &flip, &float_flip * op.trans()))
            .collect()
    };

    let group = PrimitiveGroup::new(&flipped)?;
    let rots: Vec<M33<i32>> = group.ops.iter().map(|(rot, _)| rot.map(|x| x as i32)).collect();
    let point_group = PointGroup::from_rotations(&rots).ok_or_else(|| {
        Error::InconsistentOperations(format!("{} rotations do not form a point group", rots.len()))
    })?;
    let holohedry = point_group.holohedry();
    let prim_rots: Vec<M33<i64>> = group.ops.iter().map(|&(rot, _)| rot).collect();
    let axes = conventional_axes(holohedry, &prim_rots)?;
    debug!("point group {}, conventional axes {:?}", point_group, axes);

    for entry in candidates(point_group, options.origin_choice) {
        if entry.representatives().len() != group.ops.len() {
            continue;
        }
        for alt in alternatives(holohedry) {
            let axes = &axes * alt;
            if centering_of(&axes) != Some(entry.centering()) {
                continue;
            }
            trace!("trying {} ({}) with axes {:?}", entry.hall_symbol(), entry.number(), axes);
            if let Some(shift) = group.origin_of(entry, &axes, tol) {
                let transformation = &group.to_input * &axes.map(|x| x as f64);
                let origin_shift = &group.to_input * &shift;
                return Ok(SpacegroupInfo {
                    number: entry.number(),
                    international: entry.international().to_string(),
                    hall_symbol: entry.hall_symbol().to_string(),
                    schoenflies: entry.schoenflies(),
                    point_group,
                    setting: entry.setting(),
                    centering: entry.centering(),
                    transformation: &float_flip * &transformation,
                    origin_shift: (&float_flip * &origin_shift).map(wrap_frac),
                    multiplicity: ops.len(),
                });
            }
        }
    }
    Err(Error::NoMatch)
}

// The operations in a primitive basis, one per rotation.
struct PrimitiveGroup {
    // columns are the primitive lattice vectors, in fractional coordinates of the input
    to_input: M33,
    ops: Vec<(M33<i64>, V3)>,
}

impl PrimitiveGroup {
    fn new(ops: &[SymOp]) -> Result<Self, Error> {
        let inconsistent = |msg: &str| Error::InconsistentOperations(msg.to_string());

        let translations: Vec<&V3> = ops.iter().filter(|op| op.is_pure_translation()).map(|op| op.trans()).collect();
        let n = translations.len() as i64;
        if n == 0 {
            return Err(inconsistent("no identity"));
        }

        // rows are n times the primitive vectors
        let mut generators: Vec<V3<i64>> = (0..3).map(|k| V3::axis_unit(k) * n).collect();
        generators.extend(translations.iter().map(|t| (*t * n as f64).round().map(|x| x as i64)));
        let basis = row_lattice_basis(&generators).ok_or_else(|| inconsistent("degenerate translations"))?;
        if basis.det() != n * n {
            return Err(inconsistent("pure translations do not form a group"));
        }

        // x_input = Q x_prim,  Q = basis^T / n,  Q^-1 = adj(basis)^T / n
        let q = basis.t();
        let q_inv = basis.adjugate().t();
        let float_q_inv = q_inv.map(|x| x as f64 / n as f64);

        let mut out: Vec<(M33<i64>, V3)> = vec![];
        for op in ops {
            let rot = op.rot().map(i64::from);
            let numer = &(&q_inv * &rot) * &q;
            if numer.0.iter().any(|row| row.0.iter().any(|x| x % (n * n) != 0)) {
                return Err(inconsistent("rotation does not preserve the lattice of pure translations"));
            }
            let rot = numer.map(|x| x / (n * n));
            if out.iter().any(|(other, _)| other == &rot) {
                continue;
            }
            out.push((rot, (&float_q_inv * op.trans()).map(wrap_frac)));
        }

        Ok(PrimitiveGroup {
            to_input: q.map(|x| x as f64 / n as f64),
            ops: out,
        })
    }

    // Find the origin of `entry` in primitive coordinates, given its axes.
    //
    // Each operation must satisfy  w - P w_db == (I - W) s  (mod 1).
    fn origin_of(&self, entry: &SpacegroupType, axes: &M33<i64>, tol: f64) -> Option<V3> {
        let det = axes.det();
        let adj = axes.adjugate();
        let float_axes = axes.map(|x| x as f64);

        let mut rows = vec![];
        let mut rhs = vec![];
        let mut pairs = vec![];
        for rep in entry.representatives() {
            let numer = &(axes * &rep.rot().map(i64::from)) * &adj;
            if numer.0.iter().any(|row| row.0.iter().any(|x| x % det != 0)) {
                return None;
            }
            let rot = numer.map(|x| x / det);
            let ours = self.ops.iter().find(|(other, _)| other == &rot).map(|&(_, trans)| trans)?;
            let theirs = &float_axes * &rep.trans().float();

            let lhs = M33::eye() - rot;
            for k in 0..3 {
                let diff = ours[k] - theirs[k];
                rows.push(lhs[k]);
                rhs.push(diff - diff.round());
            }
            pairs.push((rot, ours, theirs));
        }

        let shift = solve_congruences(&rows, &rhs, tol)?;
        let all_ok = pairs.iter().all(|(rot, ours, theirs)| {
            let moved = (*rot - M33::eye()).map(|x| x as f64);
            let residual = *ours + &moved * &shift - *theirs;
            residual.0.iter().all(|x| (x - x.round()).abs() <= tol)
        });
        match all_ok {
            true => Some(shift.map(wrap_frac)),
            false => None,
        }
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rsp2_structure::FracOp;
    use crate::{spacegroup_type, spacegroup_types};

    fn ops_of(entry: &SpacegroupType) -> OperationSet {
        let ops = entry.hall().group().iter().map(FracOp::to_symop).collect();
        OperationSet::new(ops, 1e-5)
    }

    // the same operations in the basis  x' = U x + o
    fn change_basis(ops: &OperationSet, u: &M33<i32>, origin: V3) -> OperationSet {
        let u_inv = u.adjugate() * u.det();
        let float_u = u.map(f64::from);
        let ops = ops.iter().map(|op| {
            let rot = &(u * op.rot()) * &u_inv;
            let trans = &float_u * op.trans() + origin - &rot.map(f64::from) * &origin;
            SymOp::new(rot, trans)
        }).collect();
        OperationSet::new(ops, 1e-5)
    }

    #[test]
    fn every_type_classifies_as_itself() {
        for entry in spacegroup_types() {
            let info = classify(&ops_of(entry)).unwrap_or_else(|e| panic!("{} {}: {}", entry.number(), entry.hall_symbol(), e));
            assert_eq!(info.number, entry.number(), "{}", entry.hall_symbol());
            assert_eq!(info.multiplicity, entry.hall().group().len());
            // same lattice as the input, so the same volume
            assert_close!(abs=1e-8, info.transformation.det(), 1.0);
        }
    }

    #[test]
    fn origin_choice() {
        let entry = spacegroup_types().iter()
            .find(|e| e.number() == 227 && e.setting() == Setting::Origin2)
            .unwrap();

        let info = classify(&ops_of(entry)).unwrap();
        assert_eq!(info.setting, Setting::Origin1);
        assert_eq!(info.hall_symbol, "F 4d 2 3 -1d");

        let options = ClassifyOptions { origin_choice: OriginChoice::Two, ..Default::default() };
        let info = classify_with(&ops_of(entry), &options).unwrap();
        assert_eq!(info.setting, Setting::Origin2);
        assert_eq!(info.hall_symbol, "-F 4vw 2vw 3");

        // the origin of the second setting is an inversion center
        let doubled = (info.origin_shift * 2.0).map(wrap_frac);
        let centers: Vec<V3> = {
            ops_of(entry).iter()
                .filter(|op| *op.rot() == M33::eye() * -1)
                .map(|op| *op.trans())
                .collect()
        };
        assert!(centers.iter().any(|t| {
            let diff = (*t - doubled).map(|x| x - x.round());
            diff.0.iter().all(|x| x.abs() < 1e-8)
        }), "{:?}", info.origin_shift);
    }

    #[test]
    fn skewed_basis_and_shifted_origin() {
        let u = M33::from_array([[1, 1, 0], [0, 1, 0], [1, 0, 1]]);
        for &number in &[14, 62, 136, 167, 194, 227, 230] {
            let ops = change_basis(&ops_of(spacegroup_type(number).unwrap()), &u, V3([0.1, 0.3, 0.7]));
            let info = classify(&ops).unwrap();
            assert_eq!(info.number, number);
        }
    }

    #[test]
    fn enantiomorphs_under_reflection() {
        // P4_1 seen through a left-handed basis looks like P4_3
        let flip = M33::from_array([[1, 0, 0], [0, 1, 0], [0, 0, -1]]);
        let ops = change_basis(&ops_of(spacegroup_type(76).unwrap()), &flip, V3::zero());
        assert_eq!(classify(&ops).unwrap().number, 78);

        let options = ClassifyOptions { left_handed: true, ..Default::default() };
        assert_eq!(classify_with(&ops, &options).unwrap().number, 76);
    }

    #[test]
    fn screw_of_no_space_group() {
        // squares to a translation by 0.6 along c, which is not in the lattice
        let ops = OperationSet::new(vec![
            SymOp::new(M33::eye(), V3::zero()),
            SymOp::new(M33::from_array([[-1, 0, 0], [0, -1, 0], [0, 0, 1]]), V3([0.0, 0.0, 0.3])),
        ], 1e-5);
        match classify(&ops) {
            Err(Error::NoMatch) => {},
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn noisy_translations() {
        let ops = ops_of(spacegroup_type(136).unwrap());
        let noisy = ops.iter().enumerate().map(|(i, op)| {
            let noise = if i % 2 == 0 { 2e-5 } else { -2e-5 };
            SymOp::new(*op.rot(), *op.trans() + V3([noise, -noise, noise]))
        }).collect();
        let info = classify(&OperationSet::new(noisy, 1e-5)).unwrap();
        assert_eq!(info.number, 136);
        assert_eq!(info.schoenflies, "D4h^14");
    }

    #[test]
    fn display() {
        let info = classify(&ops_of(spacegroup_type(227).unwrap())).unwrap();
        let text = info.to_string();
        assert!(text.contains("Fd-3m (227)"), "{}", text);
        assert!(text.contains("Oh^7"), "{}", text);
        assert!(text.contains("origin 1"), "{}", text);
        assert!(text.contains("Multiplicity: 192"), "{}", text);
    }

    #[test]
    fn not_a_group() {
        // a fourfold without its square
        let ops = vec![
            SymOp::eye(),
            SymOp::new(M33::from_array([[0, -1, 0], [1, 0, 0], [0, 0, 1]]), V3::zero()),
        ];
        match classify(&OperationSet::new(ops, 1e-5)) {
            Err(Error::InconsistentOperations(_)) => {},
            r => panic!("{:?}", r),
        }
    }
}
