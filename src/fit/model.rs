//! The Michaelis-Menten equation and its least-squares cost.

use argmin::core::CostFunction;
use ndarray::Array1;

use crate::rate::ConcentrationVelocityPair;

/// Evaluates the Michaelis-Menten model `v(S) = Vmax * S / (Km + S)`.
pub fn michaelis_menten(s: f64, vmax: f64, km: f64) -> f64 {
    vmax * s / (km + s)
}

/// Residual sum of squares of the model against observed pairs.
pub fn residual_sum_of_squares(pairs: &[ConcentrationVelocityPair], vmax: f64, km: f64) -> f64 {
    pairs
        .iter()
        .map(|p| (p.v - michaelis_menten(p.s, vmax, km)).powi(2))
        .sum()
}

/// Least-squares problem for the nonlinear Michaelis-Menten fit.
///
/// The parameter vector is `[Vmax, Km]`. Both parameters are bounded below
/// by zero to exclude unphysical solutions; the bound is enforced by an
/// infinite cost outside the feasible region, which the derivative-free
/// solver handles without special casing.
#[derive(Debug, Clone)]
pub struct MichaelisMentenProblem {
    s: Array1<f64>,
    v: Array1<f64>,
}

impl MichaelisMentenProblem {
    pub fn new(pairs: &[ConcentrationVelocityPair]) -> Self {
        Self {
            s: pairs.iter().map(|p| p.s).collect(),
            v: pairs.iter().map(|p| p.v).collect(),
        }
    }
}

impl CostFunction for MichaelisMentenProblem {
    type Param = Array1<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let (vmax, km) = (param[0], param[1]);
        if vmax < 0.0 || km < 0.0 {
            return Ok(f64::INFINITY);
        }

        let sse: f64 = self
            .s
            .iter()
            .zip(self.v.iter())
            .map(|(&s, &v)| (v - michaelis_menten(s, vmax, km)).powi(2))
            .sum();

        // Km = 0 with S = 0 yields 0/0. Treat it as infeasible instead of
        // letting NaN poison the simplex ordering.
        if sse.is_nan() {
            return Ok(f64::INFINITY);
        }
        Ok(sse)
    }
}
