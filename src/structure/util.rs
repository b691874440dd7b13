use rsp2_array_types::{V3, M33};

use crate::Error;

/// Fractional coordinates within this distance below 1 are wrapped to 0.
pub(crate) const WRAP_EPS: f64 = 1e-12;

/// Reduce a fractional coordinate into `[0, 1)`.
pub fn wrap_frac(x: f64) -> f64 {
    let y = x - x.floor();
    if y >= 1.0 - WRAP_EPS { 0.0 } else { y }
}

pub(crate) fn wrap_v3(v: V3) -> V3
{ v.map(wrap_frac) }

/// Reduce a fractional difference into `[-0.5, 0.5)`.
pub(crate) fn wrap_diff(v: V3) -> V3
{ v.map(|x| x - (x + 0.5).floor()) }

// these f64 -> i32 conversions are written on a silly little type
// simply to avoid having a function with a signature like 'fn f(x: f64, tol: f64)'
// where the arguments could be swapped
pub(crate) struct Tol(pub(crate) f64);

impl Tol {
    pub(crate) fn unfloat(&self, x: f64) -> Result<i32, Error> {
        let r = x.round();
        if (r - x).abs() > self.0 {
            return Err(Error::NonIntegerRotation(x));
        }
        Ok(r as i32)
    }

    pub(crate) fn unfloat_m33(&self, m: &M33) -> Result<M33<i32>, Error>
    { m.try_map(|x| self.unfloat(x)) }
}
