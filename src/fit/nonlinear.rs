//! Nonlinear least-squares fitting of the Michaelis-Menten model.
//!
//! The fit minimizes the sum of squared velocity residuals with argmin's
//! Nelder-Mead solver, a derivative-free simplex method that is
//! deterministic for a fixed initial simplex. The initial guess is
//! `Vmax = max(v)`, `Km = median(S)`, a reproducible default that places the
//! starting simplex in the right order of magnitude regardless of units.

use argmin::core::{Executor, State, TerminationReason};
use argmin::solver::neldermead::NelderMead;
use ndarray::Array1;
use statrs::statistics::{Data, OrderStatistics};

use crate::rate::ConcentrationVelocityPair;

use super::error::FitError;
use super::model::MichaelisMentenProblem;
use super::result::{FitDiagnostics, FitMethod, FitResult};

/// Nonlinear least-squares fitter for the Michaelis-Menten model.
///
/// Use [`MichaelisMentenFitter::default`] for the standard configuration or
/// [`MichaelisMentenFitterBuilder`] to adjust the iteration budget and
/// convergence tolerance.
pub struct MichaelisMentenFitter {
    /// Maximum number of simplex iterations before giving up
    pub max_iters: u64,
    /// Termination tolerance on the standard deviation of simplex costs
    pub sd_tolerance: f64,
}

impl Default for MichaelisMentenFitter {
    fn default() -> Self {
        MichaelisMentenFitterBuilder::default().build()
    }
}

impl MichaelisMentenFitter {
    /// Fits `v(S) = Vmax * S / (Km + S)` to the given pairs.
    ///
    /// A 2-parameter model is underdetermined below 3 points, so `n >= 3` is
    /// required. Both parameters are bounded below by zero.
    ///
    /// # Arguments
    /// * `pairs` - Concentration/velocity pairs, `S = 0` is tolerated
    ///
    /// # Errors
    /// * [`FitError::TooFewPoints`] for fewer than 3 pairs
    /// * [`FitError::Convergence`] when the iteration budget is exhausted
    ///   without the simplex converging
    pub fn fit(&self, pairs: &[ConcentrationVelocityPair]) -> Result<FitResult, FitError> {
        if pairs.len() < 3 {
            return Err(FitError::TooFewPoints { found: pairs.len() });
        }

        let problem = MichaelisMentenProblem::new(pairs);
        let simplex = initial_simplex(pairs);
        let solver = NelderMead::new(simplex)
            .with_sd_tolerance(self.sd_tolerance)
            .map_err(FitError::ArgMin)?;

        let res = Executor::new(problem, solver)
            .configure(|state| state.max_iters(self.max_iters))
            .run()
            .map_err(FitError::ArgMin)?;

        let converged = matches!(
            res.state().get_termination_reason(),
            Some(TerminationReason::SolverConverged) | Some(TerminationReason::TargetCostReached)
        );
        if !converged {
            return Err(FitError::Convergence {
                max_iters: self.max_iters,
            });
        }

        let best = res
            .state()
            .get_best_param()
            .ok_or(FitError::Convergence {
                max_iters: self.max_iters,
            })?
            .clone();

        Ok(FitResult {
            method: FitMethod::MichaelisMenten,
            vmax: best[0],
            km: best[1],
            diagnostics: FitDiagnostics {
                rss: res.state().get_best_cost(),
                iterations: Some(res.state().get_iter()),
            },
        })
    }
}

/// Builds the initial simplex around the deterministic guess
/// `[max(v), median(S)]`.
fn initial_simplex(pairs: &[ConcentrationVelocityPair]) -> Vec<Array1<f64>> {
    let vmax0 = pairs.iter().map(|p| p.v).fold(f64::MIN, f64::max).max(0.0);
    let km0 = Data::new(pairs.iter().map(|p| p.s).collect::<Vec<_>>()).median();

    // Perturbations point into the feasible region so no vertex starts on
    // the infinite-cost side of the bounds.
    let step = |x: f64| if x > f64::EPSILON { 0.1 * x } else { 0.1 };
    vec![
        Array1::from_vec(vec![vmax0, km0]),
        Array1::from_vec(vec![vmax0 + step(vmax0), km0]),
        Array1::from_vec(vec![vmax0, km0 + step(km0)]),
    ]
}

/// Builder for configuring a [`MichaelisMentenFitter`].
pub struct MichaelisMentenFitterBuilder {
    max_iters: u64,
    sd_tolerance: f64,
}

impl MichaelisMentenFitterBuilder {
    /// Sets the maximum number of simplex iterations.
    pub fn max_iters(mut self, max_iters: u64) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Sets the termination tolerance on the standard deviation of the
    /// simplex cost values.
    pub fn sd_tolerance(mut self, sd_tolerance: f64) -> Self {
        self.sd_tolerance = sd_tolerance;
        self
    }

    /// Builds the fitter with the configured settings.
    pub fn build(self) -> MichaelisMentenFitter {
        MichaelisMentenFitter {
            max_iters: self.max_iters,
            sd_tolerance: self.sd_tolerance,
        }
    }
}

impl Default for MichaelisMentenFitterBuilder {
    /// Default values:
    /// - max_iters: 2000
    /// - sd_tolerance: 1e-10
    fn default() -> Self {
        Self {
            max_iters: 2000,
            sd_tolerance: 1e-10,
        }
    }
}
