use rsp2_assert_close::{CheckClose, CheckCloseError, Tolerances};

use crate::types::*;

impl CheckClose for V3<f64> {
    type Scalar = f64;

    #[inline]
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError>
    { self.0.check_close(&other.0, tol) }
}

impl CheckClose for M33<f64> {
    type Scalar = f64;

    #[inline]
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError>
    { self.0.check_close(&other.0, tol) }
}
