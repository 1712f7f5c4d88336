//! Ordinary least-squares fitting of a straight line.
//!
//! This is the single regression routine shared by the initial-rate
//! estimator and the linearization fitters.

use serde::Serialize;
use thiserror::Error;

/// Errors raised when a line cannot be fitted to the given points.
#[derive(Error, Debug)]
pub enum RegressionError {
    #[error("At least 2 points are required for a line fit, got {found}")]
    TooFewPoints { found: usize },
    #[error("All x values are equal, the regression is undefined")]
    ZeroVariance,
}

/// Result of an ordinary least-squares line fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    /// Evaluates the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits `y = slope * x + intercept` by ordinary least squares.
///
/// # Arguments
/// * `x` - Abscissa values
/// * `y` - Ordinate values, same length as `x`
///
/// # Errors
/// Returns [`RegressionError::TooFewPoints`] for fewer than 2 points and
/// [`RegressionError::ZeroVariance`] when all `x` values are equal. A
/// zero-variance abscissa must never silently produce NaN or infinity.
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LineFit, RegressionError> {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    if n < 2 {
        return Err(RegressionError::TooFewPoints { found: n });
    }

    let x_mean = x.iter().sum::<f64>() / n as f64;
    let y_mean = y.iter().sum::<f64>() / n as f64;

    let sxx: f64 = x.iter().map(|&xi| (xi - x_mean).powi(2)).sum();
    if sxx == 0.0 {
        return Err(RegressionError::ZeroVariance);
    }
    let sxy: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| (xi - x_mean) * (yi - y_mean))
        .sum();

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    Ok(LineFit { slope, intercept })
}
