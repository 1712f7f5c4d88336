//! Linear-regression based Michaelis-Menten estimators.
//!
//! Each method rewrites the Michaelis-Menten equation as a straight line,
//! fits the transformed pairs by ordinary least squares and inverts the
//! slope/intercept back into `(Vmax, Km)`:
//!
//! | Method          | x'   | y'   | Vmax      | Km        |
//! |-----------------|------|------|-----------|-----------|
//! | Lineweaver-Burk | 1/S  | 1/v  | 1/c       | m * Vmax  |
//! | Eadie-Hofstee   | v/S  | v    | c         | -m        |
//! | Hanes-Woolf     | S    | S/v  | 1/m       | c * Vmax  |
//!
//! All three weight low-S/low-v points disproportionately, so under
//! measurement noise their estimates are expected to diverge from the
//! nonlinear fit. That divergence is reported as-is, not corrected.

use serde::Serialize;

use crate::rate::ConcentrationVelocityPair;
use crate::regression::{fit_line, RegressionError};

use super::error::FitError;
use super::model::residual_sum_of_squares;
use super::result::{FitDiagnostics, FitMethod, FitResult};

/// The three classical linearizations of the Michaelis-Menten equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LinearizationMethod {
    LineweaverBurk,
    EadieHofstee,
    HanesWoolf,
}

impl LinearizationMethod {
    /// All linearization methods, in reporting order.
    pub const ALL: [LinearizationMethod; 3] = [
        LinearizationMethod::LineweaverBurk,
        LinearizationMethod::EadieHofstee,
        LinearizationMethod::HanesWoolf,
    ];

    fn transform(&self, pair: &ConcentrationVelocityPair) -> (f64, f64) {
        match self {
            LinearizationMethod::LineweaverBurk => (1.0 / pair.s, 1.0 / pair.v),
            LinearizationMethod::EadieHofstee => (pair.v / pair.s, pair.v),
            LinearizationMethod::HanesWoolf => (pair.s, pair.s / pair.v),
        }
    }

    /// Checks the division preconditions, naming the offending pair.
    fn check_preconditions(&self, pairs: &[ConcentrationVelocityPair]) -> Result<(), FitError> {
        let method = FitMethod::from(*self);

        // Every transform divides by S, and Lineweaver-Burk and Hanes-Woolf
        // divide by v. Eadie-Hofstee rejects v = 0 as well: a zero velocity
        // collapses its ordinate onto the origin and carries no information.
        for (index, pair) in pairs.iter().enumerate() {
            if pair.s == 0.0 {
                return Err(FitError::DivisionByZero {
                    method,
                    quantity: "substrate concentration",
                    index,
                });
            }
            if pair.v == 0.0 {
                return Err(FitError::DivisionByZero {
                    method,
                    quantity: "velocity",
                    index,
                });
            }
        }
        Ok(())
    }

    /// Inverts the fitted slope `m` and intercept `c` back to `(Vmax, Km)`.
    fn invert(&self, m: f64, c: f64) -> Result<(f64, f64), FitError> {
        let method = FitMethod::from(*self);
        let (vmax, km) = match self {
            LinearizationMethod::LineweaverBurk => {
                if c == 0.0 {
                    return Err(FitError::NonInvertible { method });
                }
                let vmax = 1.0 / c;
                (vmax, m * vmax)
            }
            LinearizationMethod::EadieHofstee => (c, -m),
            LinearizationMethod::HanesWoolf => {
                if m == 0.0 {
                    return Err(FitError::NonInvertible { method });
                }
                let vmax = 1.0 / m;
                (vmax, c * vmax)
            }
        };
        Ok((vmax, km))
    }
}

impl From<LinearizationMethod> for FitMethod {
    fn from(method: LinearizationMethod) -> Self {
        match method {
            LinearizationMethod::LineweaverBurk => FitMethod::LineweaverBurk,
            LinearizationMethod::EadieHofstee => FitMethod::EadieHofstee,
            LinearizationMethod::HanesWoolf => FitMethod::HanesWoolf,
        }
    }
}

/// Transform/fit/invert estimator parametrized by method.
pub struct LinearizationFitter {
    method: LinearizationMethod,
}

impl LinearizationFitter {
    pub fn new(method: LinearizationMethod) -> Self {
        Self { method }
    }

    /// Estimates `(Vmax, Km)` from the linearized regression.
    ///
    /// Requires the same minimum of 3 pairs as the nonlinear fit so every
    /// enabled method sees identical input requirements.
    ///
    /// # Errors
    /// * [`FitError::TooFewPoints`] for fewer than 3 pairs
    /// * [`FitError::DivisionByZero`] when a pair violates the method's
    ///   precondition (`S = 0` or `v = 0`, depending on the method)
    /// * [`FitError::DegenerateRegression`] when the transformed abscissa
    ///   has zero variance
    /// * [`FitError::NonInvertible`] when the fitted line has a zero slope
    ///   or intercept where the back-transform divides by it
    pub fn fit(&self, pairs: &[ConcentrationVelocityPair]) -> Result<FitResult, FitError> {
        if pairs.len() < 3 {
            return Err(FitError::TooFewPoints { found: pairs.len() });
        }
        self.method.check_preconditions(pairs)?;

        let (x, y): (Vec<f64>, Vec<f64>) =
            pairs.iter().map(|p| self.method.transform(p)).unzip();

        let method = FitMethod::from(self.method);
        let line = fit_line(&x, &y).map_err(|err| match err {
            RegressionError::ZeroVariance => FitError::DegenerateRegression { method },
            RegressionError::TooFewPoints { found } => FitError::TooFewPoints { found },
        })?;

        let (vmax, km) = self.method.invert(line.slope, line.intercept)?;

        Ok(FitResult {
            method,
            vmax,
            km,
            diagnostics: FitDiagnostics {
                rss: residual_sum_of_squares(pairs, vmax, km),
                iterations: None,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::model::michaelis_menten;
    use approx::assert_relative_eq;

    fn noiseless_pairs(vmax: f64, km: f64) -> Vec<ConcentrationVelocityPair> {
        [0.5, 1.0, 2.0, 5.0, 10.0, 20.0]
            .iter()
            .map(|&s| ConcentrationVelocityPair {
                s,
                v: michaelis_menten(s, vmax, km),
            })
            .collect()
    }

    #[test]
    fn test_exact_recovery_on_noiseless_data() {
        // The transforms are exact linearizations, so noiseless data is
        // recovered to floating-point accuracy.
        let pairs = noiseless_pairs(0.5, 2.0);

        for method in LinearizationMethod::ALL {
            let result = LinearizationFitter::new(method)
                .fit(&pairs)
                .expect("Failed to fit");

            assert_relative_eq!(result.vmax, 0.5, max_relative = 1e-6);
            assert_relative_eq!(result.km, 2.0, max_relative = 1e-6);
            assert!(result.diagnostics.rss < 1e-12);
            assert_eq!(result.diagnostics.iterations, None);
        }
    }

    #[test]
    fn test_lineweaver_burk_rejects_zero_concentration() {
        let mut pairs = noiseless_pairs(0.5, 2.0);
        pairs.insert(1, ConcentrationVelocityPair { s: 0.0, v: 0.1 });

        let result = LinearizationFitter::new(LinearizationMethod::LineweaverBurk).fit(&pairs);

        assert!(matches!(
            result,
            Err(FitError::DivisionByZero {
                method: FitMethod::LineweaverBurk,
                index: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_velocity_rejected_by_all_methods() {
        let mut pairs = noiseless_pairs(0.5, 2.0);
        pairs.push(ConcentrationVelocityPair { s: 3.0, v: 0.0 });
        let last = pairs.len() - 1;

        for method in LinearizationMethod::ALL {
            let result = LinearizationFitter::new(method).fit(&pairs);
            assert!(
                matches!(result, Err(FitError::DivisionByZero { index, .. }) if index == last)
            );
        }
    }

    #[test]
    fn test_too_few_points() {
        let pairs = noiseless_pairs(0.5, 2.0);

        let result = LinearizationFitter::new(LinearizationMethod::HanesWoolf).fit(&pairs[..2]);
        assert!(matches!(result, Err(FitError::TooFewPoints { found: 2 })));
    }

    #[test]
    fn test_degenerate_transformed_abscissa() {
        // Identical concentrations collapse the Hanes-Woolf abscissa.
        let pairs = vec![
            ConcentrationVelocityPair { s: 2.0, v: 0.10 },
            ConcentrationVelocityPair { s: 2.0, v: 0.11 },
            ConcentrationVelocityPair { s: 2.0, v: 0.12 },
        ];

        let result = LinearizationFitter::new(LinearizationMethod::HanesWoolf).fit(&pairs);
        assert!(matches!(
            result,
            Err(FitError::DegenerateRegression {
                method: FitMethod::HanesWoolf
            })
        ));
    }
}
