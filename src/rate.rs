//! Initial reaction velocity estimation.
//!
//! The initial velocity of an enzymatic reaction is the slope of the
//! earliest, most linear portion of the time/absorbance curve, before
//! substrate depletion bends it. [`estimate_initial_rate`] fits an ordinary
//! least-squares line over a user-selected window of a [`TimeSeries`] and
//! reports the slope as the velocity.

use serde::Serialize;
use thiserror::Error;

use crate::regression::{fit_line, RegressionError};
use crate::series::TimeSeries;

/// Errors raised by the initial-rate estimator.
#[derive(Error, Debug)]
pub enum RateError {
    #[error("Window [{lo}, {hi}] is invalid for a series of {len} points. At least 2 points inside the series are required.")]
    InvalidRange { lo: usize, hi: usize, len: usize },
    #[error("All time values in the selected window are equal, the regression is undefined")]
    DegenerateRegression,
}

/// Selection of the sub-range used for the initial-rate regression.
///
/// The two modes are equivalent when `FirstPoints(n)` matches
/// `Range { lo: 0, hi: n - 1 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Window {
    /// The first `n` points of the series, `2 <= n <= len`.
    FirstPoints(usize),
    /// An explicit inclusive index interval with `hi > lo` and `hi < len`.
    Range { lo: usize, hi: usize },
}

impl Window {
    /// Resolves the selection into an inclusive `(lo, hi)` index pair.
    ///
    /// # Errors
    /// Returns [`RateError::InvalidRange`] when the window is out of bounds
    /// or covers fewer than 2 points.
    pub fn resolve(&self, len: usize) -> Result<(usize, usize), RateError> {
        let (lo, hi) = match *self {
            Window::FirstPoints(n) => (0, n.wrapping_sub(1)),
            Window::Range { lo, hi } => (lo, hi),
        };
        if hi <= lo || hi >= len {
            return Err(RateError::InvalidRange { lo, hi, len });
        }
        Ok((lo, hi))
    }
}

impl Default for Window {
    /// The first 5 points, the conventional default for short assay traces.
    fn default() -> Self {
        Window::FirstPoints(5)
    }
}

/// An initial reaction velocity derived from one series.
///
/// `slope` is the initial velocity in absorbance units per time unit.
/// Estimates are recomputed wholesale when the window changes; they are
/// never patched in place. `sample` holds the label of the source series
/// for lookup only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateEstimate {
    /// Initial velocity (slope of the fitted line)
    pub slope: f64,
    /// Intercept of the fitted line
    pub intercept: f64,
    /// Inclusive index range the fit was computed over
    pub range: (usize, usize),
    /// Label of the source series
    pub sample: Option<String>,
}

impl RateEstimate {
    /// Joins this estimate with a substrate concentration.
    pub fn paired_with(&self, concentration: f64) -> ConcentrationVelocityPair {
        ConcentrationVelocityPair {
            s: concentration,
            v: self.slope,
        }
    }
}

/// A `(substrate concentration, initial velocity)` pair, the input to the
/// Michaelis-Menten fitters.
///
/// `s > 0` is required by the linearization methods and enforced there, not
/// here, since the nonlinear fit tolerates `s = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConcentrationVelocityPair {
    /// Substrate concentration
    pub s: f64,
    /// Initial velocity
    pub v: f64,
}

/// Estimates the initial reaction velocity over a window of a series.
///
/// Fits `absorbance = slope * time + intercept` by ordinary least squares
/// over the selected sub-range. Pure function of its inputs.
///
/// # Arguments
/// * `series` - The time/absorbance series to estimate from
/// * `window` - The sub-range selection
///
/// # Errors
/// * [`RateError::InvalidRange`] when the window is out of bounds or has
///   fewer than 2 points
/// * [`RateError::DegenerateRegression`] when all time values in the window
///   are equal
pub fn estimate_initial_rate(
    series: &TimeSeries,
    window: Window,
) -> Result<RateEstimate, RateError> {
    let (lo, hi) = window.resolve(series.len())?;
    let time = &series.time()[lo..=hi];
    let absorbance = &series.absorbance()[lo..=hi];

    let fit = fit_line(time, absorbance).map_err(|err| match err {
        RegressionError::ZeroVariance => RateError::DegenerateRegression,
        RegressionError::TooFewPoints { .. } => RateError::InvalidRange {
            lo,
            hi,
            len: series.len(),
        },
    })?;

    Ok(RateEstimate {
        slope: fit.slope,
        intercept: fit.intercept,
        range: (lo, hi),
        sample: series.label().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linear_series() -> TimeSeries {
        TimeSeries::new(
            Some("Sample1".to_string()),
            vec![0.0, 5.0, 10.0, 15.0, 20.0],
            vec![0.02, 0.06, 0.10, 0.14, 0.18],
            Some(1.0),
        )
        .expect("Failed to build series")
    }

    #[test]
    fn test_first_points_exact_slope() {
        let series = linear_series();

        let estimate = estimate_initial_rate(&series, Window::FirstPoints(5))
            .expect("Failed to estimate rate");

        assert_relative_eq!(estimate.slope, 0.008, epsilon = 1e-12);
        assert_relative_eq!(estimate.intercept, 0.02, epsilon = 1e-12);
        assert_eq!(estimate.range, (0, 4));
        assert_eq!(estimate.sample.as_deref(), Some("Sample1"));
    }

    #[test]
    fn test_selection_modes_are_equivalent() {
        let series = linear_series();

        let by_count = estimate_initial_rate(&series, Window::FirstPoints(3)).unwrap();
        let by_range = estimate_initial_rate(&series, Window::Range { lo: 0, hi: 2 }).unwrap();

        assert_eq!(by_count, by_range);
    }

    #[test]
    fn test_inner_range() {
        let series = linear_series();

        let estimate = estimate_initial_rate(&series, Window::Range { lo: 1, hi: 3 }).unwrap();

        assert_relative_eq!(estimate.slope, 0.008, epsilon = 1e-12);
        assert_eq!(estimate.range, (1, 3));
    }

    #[test]
    fn test_window_out_of_bounds() {
        let series = linear_series();

        let result = estimate_initial_rate(&series, Window::FirstPoints(6));
        assert!(matches!(result, Err(RateError::InvalidRange { .. })));

        let result = estimate_initial_rate(&series, Window::Range { lo: 2, hi: 5 });
        assert!(matches!(result, Err(RateError::InvalidRange { .. })));
    }

    #[test]
    fn test_window_too_short() {
        let series = linear_series();

        for window in [
            Window::FirstPoints(1),
            Window::FirstPoints(0),
            Window::Range { lo: 2, hi: 2 },
            Window::Range { lo: 3, hi: 2 },
        ] {
            let result = estimate_initial_rate(&series, window);
            assert!(matches!(result, Err(RateError::InvalidRange { .. })));
        }
    }

    #[test]
    fn test_degenerate_window() {
        let series = TimeSeries::new(
            None,
            vec![0.0, 5.0, 5.0, 5.0],
            vec![0.02, 0.06, 0.07, 0.08],
            None,
        )
        .unwrap();

        let result = estimate_initial_rate(&series, Window::Range { lo: 1, hi: 3 });
        assert!(matches!(result, Err(RateError::DegenerateRegression)));
    }

    #[test]
    fn test_paired_with() {
        let estimate = estimate_initial_rate(&linear_series(), Window::default()).unwrap();
        let pair = estimate.paired_with(2.0);
        assert_relative_eq!(pair.s, 2.0);
        assert_relative_eq!(pair.v, 0.008, epsilon = 1e-12);
    }
}
