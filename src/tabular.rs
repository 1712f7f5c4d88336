//! Conversion of raw tabular input into validated series.
//!
//! The expected table shape follows the assay workbook convention: the
//! first column holds time, every following column one sample's absorbance
//! trace, with sample names in the header. Loose tabular data is validated
//! and converted into immutable [`TimeSeries`] values here, at the system
//! boundary, so malformed input never reaches the numeric core.

use std::collections::HashMap;
use std::io::Read;

use crate::series::{InputValidationError, TimeSeries};

/// A parsed numeric table: one time column plus named sample columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Time points shared by all samples
    pub time: Vec<f64>,
    /// Absorbance columns keyed by sample name, in file order
    pub samples: Vec<(String, Vec<f64>)>,
}

impl RawTable {
    /// Parses a CSV table with a header row.
    ///
    /// # Errors
    /// * [`InputValidationError::MissingTimeColumn`] for an empty header
    /// * [`InputValidationError::NoSampleColumns`] when only the time
    ///   column is present
    /// * [`InputValidationError::NonNumeric`] for any cell that does not
    ///   parse as a number, naming the column and row
    /// * [`InputValidationError::Csv`] for structural CSV errors
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, InputValidationError> {
        let mut reader = csv::Reader::from_reader(reader);

        let headers = reader.headers()?.clone();
        let mut columns = headers.iter().map(str::to_string);
        let time_column = columns
            .next()
            .ok_or(InputValidationError::MissingTimeColumn)?;
        let names: Vec<String> = columns.collect();
        if names.is_empty() {
            return Err(InputValidationError::NoSampleColumns);
        }

        let mut time = Vec::new();
        let mut samples: Vec<(String, Vec<f64>)> =
            names.into_iter().map(|name| (name, Vec::new())).collect();

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let mut cells = record.iter();

            let t = cells.next().unwrap_or_default();
            time.push(parse_cell(&time_column, row, t)?);

            for ((name, values), cell) in samples.iter_mut().zip(cells) {
                values.push(parse_cell(name, row, cell)?);
            }
        }

        Ok(Self { time, samples })
    }

    /// Converts the table into one validated series per sample column.
    ///
    /// Concentrations are looked up by sample name; samples without an
    /// entry get none and must be assigned one before a session will
    /// accept them.
    ///
    /// # Errors
    /// Propagates the [`TimeSeries`] construction errors (mismatched
    /// lengths, too few points, non-finite values, decreasing time,
    /// non-positive concentration).
    pub fn into_series(
        self,
        concentrations: &HashMap<String, f64>,
    ) -> Result<Vec<TimeSeries>, InputValidationError> {
        let time = self.time;
        self.samples
            .into_iter()
            .map(|(name, values)| {
                let concentration = concentrations.get(&name).copied();
                TimeSeries::new(Some(name), time.clone(), values, concentration)
            })
            .collect()
    }
}

fn parse_cell(column: &str, row: usize, cell: &str) -> Result<f64, InputValidationError> {
    cell.trim()
        .parse()
        .map_err(|_| InputValidationError::NonNumeric {
            column: column.to_string(),
            row,
            value: cell.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CSV: &str = "\
Time (s),Sample1,Sample2
0,0.02,0.01
5,0.06,0.04
10,0.10,0.07
";

    #[test]
    fn test_parse_and_convert() {
        let table = RawTable::from_csv(CSV.as_bytes()).expect("Failed to parse");
        assert_eq!(table.time, vec![0.0, 5.0, 10.0]);
        assert_eq!(table.samples.len(), 2);

        let concentrations = HashMap::from([("Sample1".to_string(), 2.0)]);
        let series = table
            .into_series(&concentrations)
            .expect("Failed to convert");

        assert_eq!(series[0].label(), Some("Sample1"));
        assert_eq!(series[0].concentration(), Some(2.0));
        assert_relative_eq!(series[0].absorbance()[1], 0.06);
        assert_eq!(series[1].concentration(), None);
    }

    #[test]
    fn test_non_numeric_cell_named() {
        let csv = "Time (s),Sample1\n0,0.02\n5,oops\n";

        let result = RawTable::from_csv(csv.as_bytes());

        assert!(matches!(
            result,
            Err(InputValidationError::NonNumeric { column, row: 1, value })
                if column == "Sample1" && value == "oops"
        ));
    }

    #[test]
    fn test_no_sample_columns() {
        let csv = "Time (s)\n0\n5\n";

        let result = RawTable::from_csv(csv.as_bytes());
        assert!(matches!(result, Err(InputValidationError::NoSampleColumns)));
    }

    #[test]
    fn test_malformed_series_rejected() {
        // A single data row is structurally fine as CSV but too short for
        // a series.
        let csv = "Time (s),Sample1\n0,0.02\n";
        let table = RawTable::from_csv(csv.as_bytes()).unwrap();

        let result = table.into_series(&HashMap::new());
        assert!(matches!(
            result,
            Err(InputValidationError::TooFewPoints { found: 1 })
        ));
    }
}
