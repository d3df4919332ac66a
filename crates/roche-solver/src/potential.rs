//! Roche potential and its first derivatives in the corotating frame.
//!
//! The primary sits at the origin and the companion at `(1, 0, 0)`;
//! distances are in units of the orbital separation.

use crate::direction::Direction;
use crate::error::SolverResult;
use nalgebra::Vector3;
use roche_core::{BinaryParameters, Real, ensure_finite, ensure_positive};

/// Coefficients of the Roche potential: mass ratio and centrifugal term.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RocheField {
    q: Real,
    qp1by2om2: Real,
}

/// Potential and gradient at one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PotentialSample {
    /// Distance to the primary
    pub rc: Real,
    /// Distance to the companion
    pub rx: Real,
    /// Shared first-derivative factor `-1/rc^3 - q/rx^3`
    pub dpsi: Real,
    pub dpsidx: Real,
    pub dpsidy: Real,
    pub dpsidz: Real,
    /// Potential value
    pub psi: Real,
}

impl PotentialSample {
    pub fn gradient(&self) -> Vector3<Real> {
        Vector3::new(self.dpsidx, self.dpsidy, self.dpsidz)
    }

    /// Derivative of the potential along `direction`.
    #[inline]
    pub fn radial_derivative(&self, direction: &Direction) -> Real {
        self.dpsidx * direction.cosx()
            + self.dpsidy * direction.cosy()
            + self.dpsidz * direction.cosz()
    }
}

impl RocheField {
    /// Field from a mass ratio and a precomputed `(q + 1) / 2 * omega^2`.
    pub fn new(q: Real, qp1by2om2: Real) -> SolverResult<Self> {
        let q = ensure_positive(q, "mass ratio q")?;
        let qp1by2om2 = ensure_finite(qp1by2om2, "qp1by2om2")?;
        Ok(Self { q, qp1by2om2 })
    }

    pub fn q(&self) -> Real {
        self.q
    }

    pub fn qp1by2om2(&self) -> Real {
        self.qp1by2om2
    }

    /// Evaluate the potential at `(x, y, z)`.
    ///
    /// Undefined on either stellar centre, where `rc` or `rx` is zero.
    #[inline]
    pub fn evaluate(&self, x: Real, y: Real, z: Real) -> PotentialSample {
        let q = self.q;
        let k = self.qp1by2om2;
        let rc2 = x * x + y * y + z * z;
        let rc = rc2.sqrt();
        let rx = (rc2 + 1.0 - 2.0 * x).sqrt();
        let rx3 = rx * rx * rx;
        let psi = 1.0 / rc + q / rx - q * x + k * (rc2 - z * z);
        let dpsi = -1.0 / (rc * rc * rc) - q / rx3;
        PotentialSample {
            rc,
            rx,
            dpsi,
            dpsidx: x * (dpsi + 2.0 * k) + q * (1.0 / rx3 - 1.0),
            dpsidy: y * (dpsi + 2.0 * k),
            dpsidz: z * dpsi,
            psi,
        }
    }

    /// Second derivative along the line of centres, from a sample at `(x, 0, 0)`.
    #[inline]
    pub(crate) fn axial_curvature(&self, x: Real, sample: &PotentialSample) -> Real {
        let rc = sample.rc;
        let rx = sample.rx;
        let rc5 = rc * rc * rc * rc * rc;
        let rx5 = rx * rx * rx * rx * rx;
        sample.dpsi
            + 3.0 * (x * x / rc5 + self.q * (x - 1.0) * (x - 1.0) / rx5)
            + 2.0 * self.qp1by2om2
    }
}

impl From<BinaryParameters> for RocheField {
    fn from(params: BinaryParameters) -> Self {
        Self {
            q: params.q(),
            qp1by2om2: params.qp1by2om2(),
        }
    }
}

/// Potential at `(x, y, z)` for mass ratio `q` and rotation rate `omega`.
pub fn potential(
    x: Real,
    y: Real,
    z: Real,
    q: Real,
    omega: Real,
) -> SolverResult<PotentialSample> {
    let field = RocheField::from(BinaryParameters::new(q, omega)?);
    Ok(field.evaluate(x, y, z))
}
