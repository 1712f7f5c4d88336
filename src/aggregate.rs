//! Aggregation of per-method estimates into a kinetics summary.
//!
//! Aggregation is best-effort: a failed or disabled method is simply
//! excluded from the means. It fails only when no method succeeded at all.

use serde::Serialize;
use thiserror::Error;

use crate::fit::FitResult;

/// Errors raised by the aggregator.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("No fit succeeded, nothing to aggregate")]
    NoFitAvailable,
    #[error("Enzyme concentration must be positive, got {0}")]
    NonPositiveEnzymeConcentration(f64),
}

/// Best-effort summary over the successful fit results.
///
/// `kcat` and `efficiency` are only available when the enzyme concentration
/// was supplied; `efficiency` additionally requires a nonzero mean Km.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KineticsSummary {
    /// Arithmetic mean of Vmax over the successful methods
    pub vmax_mean: f64,
    /// Arithmetic mean of Km over the successful methods
    pub km_mean: f64,
    /// Turnover number, `vmax_mean / enzyme_concentration`
    pub kcat: Option<f64>,
    /// Catalytic efficiency, `kcat / km_mean`
    pub efficiency: Option<f64>,
    /// Number of methods that contributed to the means
    pub n_methods: usize,
}

/// Combines the successful fit results into a [`KineticsSummary`].
///
/// # Arguments
/// * `results` - The fit results that succeeded among the enabled methods
/// * `enzyme_concentration` - Enzyme concentration for the Kcat derivation,
///   `None` leaves `kcat` and `efficiency` unset
///
/// # Errors
/// * [`AggregateError::NoFitAvailable`] when `results` is empty
/// * [`AggregateError::NonPositiveEnzymeConcentration`] for a non-positive
///   enzyme concentration
pub fn summarize(
    results: &[&FitResult],
    enzyme_concentration: Option<f64>,
) -> Result<KineticsSummary, AggregateError> {
    if results.is_empty() {
        return Err(AggregateError::NoFitAvailable);
    }
    if let Some(e) = enzyme_concentration {
        if !e.is_finite() || e <= 0.0 {
            return Err(AggregateError::NonPositiveEnzymeConcentration(e));
        }
    }

    let n = results.len() as f64;
    let vmax_mean = results.iter().map(|r| r.vmax).sum::<f64>() / n;
    let km_mean = results.iter().map(|r| r.km).sum::<f64>() / n;

    let kcat = enzyme_concentration.map(|e| vmax_mean / e);
    let efficiency = kcat.and_then(|kcat| (km_mean != 0.0).then(|| kcat / km_mean));

    Ok(KineticsSummary {
        vmax_mean,
        km_mean,
        kcat,
        efficiency,
        n_methods: results.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::{FitDiagnostics, FitError, FitMethod};
    use approx::assert_relative_eq;

    fn result(method: FitMethod, vmax: f64, km: f64) -> FitResult {
        FitResult {
            method,
            vmax,
            km,
            diagnostics: FitDiagnostics {
                rss: 0.0,
                iterations: None,
            },
        }
    }

    #[test]
    fn test_mean_over_successful_methods() {
        // Three successes and one failure: the failure is excluded, the
        // summary is the mean over the three and contains no NaN.
        let results = [
            result(FitMethod::MichaelisMenten, 0.50, 2.0),
            result(FitMethod::EadieHofstee, 0.52, 2.2),
            result(FitMethod::HanesWoolf, 0.48, 1.8),
        ];
        let outcomes: Vec<Result<FitResult, FitError>> = vec![
            Ok(results[0].clone()),
            Err(FitError::DivisionByZero {
                method: FitMethod::LineweaverBurk,
                quantity: "substrate concentration",
                index: 0,
            }),
            Ok(results[1].clone()),
            Ok(results[2].clone()),
        ];
        let successes: Vec<&FitResult> = outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();

        let summary = summarize(&successes, Some(0.1)).expect("Failed to aggregate");

        assert_eq!(summary.n_methods, 3);
        assert_relative_eq!(summary.vmax_mean, 0.5, epsilon = 1e-12);
        assert_relative_eq!(summary.km_mean, 2.0, epsilon = 1e-12);
        assert_relative_eq!(summary.kcat.unwrap(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(summary.efficiency.unwrap(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_no_fit_available() {
        let summary = summarize(&[], Some(0.1));
        assert!(matches!(summary, Err(AggregateError::NoFitAvailable)));
    }

    #[test]
    fn test_missing_enzyme_concentration() {
        let r = result(FitMethod::MichaelisMenten, 0.5, 2.0);

        let summary = summarize(&[&r], None).expect("Failed to aggregate");

        assert!(summary.kcat.is_none());
        assert!(summary.efficiency.is_none());
    }

    #[test]
    fn test_non_positive_enzyme_concentration() {
        let r = result(FitMethod::MichaelisMenten, 0.5, 2.0);

        let summary = summarize(&[&r], Some(0.0));
        assert!(matches!(
            summary,
            Err(AggregateError::NonPositiveEnzymeConcentration(_))
        ));
    }
}
