//! Time/absorbance series value type.
//!
//! A [`TimeSeries`] holds one sample's measured absorbance trace and is the
//! only way raw data enters the numeric core. All structural invariants are
//! enforced at construction, so downstream estimators never have to re-check
//! lengths or ordering.

use serde::Serialize;
use thiserror::Error;

/// Errors raised when raw input cannot be converted into a valid series.
#[derive(Error, Debug)]
pub enum InputValidationError {
    #[error("Time and absorbance vectors have different lengths. Got {time} time points and {absorbance} absorbance values.")]
    LengthMismatch { time: usize, absorbance: usize },
    #[error("At least 2 data points are required, got {found}")]
    TooFewPoints { found: usize },
    #[error("Non-finite {quantity} value at index {index}")]
    NonFinite { quantity: &'static str, index: usize },
    #[error("Time values must be non-decreasing, but the value at index {index} decreases")]
    TimeNotSorted { index: usize },
    #[error("Substrate concentration must be positive, got {0}")]
    NonPositiveConcentration(f64),
    #[error("Non-numeric entry '{value}' in column '{column}' at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },
    #[error("Table has no time column")]
    MissingTimeColumn,
    #[error("Table has no sample columns besides the time column")]
    NoSampleColumns,
    #[error("Failed to read tabular data")]
    Csv(#[from] csv::Error),
}

/// One sample's time-resolved absorbance measurement.
///
/// Holds an ordered time vector, the matching absorbance vector, an optional
/// sample label and an optional substrate concentration. Immutable once
/// constructed; derived values ([`crate::rate::RateEstimate`], fit results)
/// reference it by label only and never own it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    label: Option<String>,
    time: Vec<f64>,
    absorbance: Vec<f64>,
    concentration: Option<f64>,
}

impl TimeSeries {
    /// Creates a validated series from raw vectors.
    ///
    /// # Arguments
    /// * `label` - Optional sample label used to reference this series
    /// * `time` - Non-decreasing time points, at least 2
    /// * `absorbance` - Absorbance values, same length as `time`
    /// * `concentration` - Optional substrate concentration, must be positive
    ///
    /// # Errors
    /// Returns [`InputValidationError`] when the vectors are mismatched, too
    /// short, contain non-finite entries, the time vector decreases, or the
    /// concentration is not positive.
    pub fn new(
        label: Option<String>,
        time: Vec<f64>,
        absorbance: Vec<f64>,
        concentration: Option<f64>,
    ) -> Result<Self, InputValidationError> {
        if time.len() != absorbance.len() {
            return Err(InputValidationError::LengthMismatch {
                time: time.len(),
                absorbance: absorbance.len(),
            });
        }
        if time.len() < 2 {
            return Err(InputValidationError::TooFewPoints { found: time.len() });
        }
        for (index, t) in time.iter().enumerate() {
            if !t.is_finite() {
                return Err(InputValidationError::NonFinite {
                    quantity: "time",
                    index,
                });
            }
        }
        for (index, y) in absorbance.iter().enumerate() {
            if !y.is_finite() {
                return Err(InputValidationError::NonFinite {
                    quantity: "absorbance",
                    index,
                });
            }
        }
        if let Some(index) = (1..time.len()).find(|&i| time[i] < time[i - 1]) {
            return Err(InputValidationError::TimeNotSorted { index });
        }
        if let Some(s) = concentration {
            if !s.is_finite() || s <= 0.0 {
                return Err(InputValidationError::NonPositiveConcentration(s));
            }
        }

        Ok(Self {
            label,
            time,
            absorbance,
            concentration,
        })
    }

    /// Sample label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Time points.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Absorbance values.
    pub fn absorbance(&self) -> &[f64] {
        &self.absorbance
    }

    /// Substrate concentration, if known.
    pub fn concentration(&self) -> Option<f64> {
        self.concentration
    }

    /// Number of data points.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.time.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_series() -> Result<TimeSeries, InputValidationError> {
        TimeSeries::new(
            Some("Sample1".to_string()),
            vec![0.0, 5.0, 10.0],
            vec![0.02, 0.06, 0.10],
            Some(1.0),
        )
    }

    #[test]
    fn test_valid_series() {
        let series = valid_series().expect("Failed to build series");
        assert_eq!(series.len(), 3);
        assert_eq!(series.label(), Some("Sample1"));
        assert_eq!(series.concentration(), Some(1.0));
    }

    #[test]
    fn test_length_mismatch() {
        let result = TimeSeries::new(None, vec![0.0, 5.0, 10.0], vec![0.02, 0.06], None);
        assert!(matches!(
            result,
            Err(InputValidationError::LengthMismatch {
                time: 3,
                absorbance: 2
            })
        ));
    }

    #[test]
    fn test_too_few_points() {
        let result = TimeSeries::new(None, vec![0.0], vec![0.02], None);
        assert!(matches!(
            result,
            Err(InputValidationError::TooFewPoints { found: 1 })
        ));
    }

    #[test]
    fn test_non_finite_absorbance() {
        let result = TimeSeries::new(None, vec![0.0, 5.0], vec![0.02, f64::NAN], None);
        assert!(matches!(
            result,
            Err(InputValidationError::NonFinite {
                quantity: "absorbance",
                index: 1
            })
        ));
    }

    #[test]
    fn test_decreasing_time() {
        let result = TimeSeries::new(None, vec![0.0, 5.0, 4.0], vec![0.02, 0.06, 0.10], None);
        assert!(matches!(
            result,
            Err(InputValidationError::TimeNotSorted { index: 2 })
        ));
    }

    #[test]
    fn test_repeated_time_is_allowed() {
        // Non-decreasing, not strictly increasing. The regression window is
        // responsible for rejecting zero-variance selections.
        let result = TimeSeries::new(None, vec![0.0, 5.0, 5.0], vec![0.02, 0.06, 0.10], None);
        assert!(result.is_ok());
    }

    #[test]
    fn test_non_positive_concentration() {
        let result = TimeSeries::new(None, vec![0.0, 5.0], vec![0.02, 0.06], Some(0.0));
        assert!(matches!(
            result,
            Err(InputValidationError::NonPositiveConcentration(_))
        ));
    }
}
