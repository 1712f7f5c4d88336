//! Enzyme kinetics estimation library
//!
//! This library turns time-resolved absorbance measurements into
//! Michaelis-Menten kinetic parameters, including:
//! - Extracting initial reaction velocities via windowed linear regression
//! - Nonlinear least-squares fitting of the Michaelis-Menten model
//! - The classical linearizations (Lineweaver-Burk, Eadie-Hofstee, Hanes-Woolf)
//! - Aggregating per-method estimates into a kinetics summary
//! - Converting and validating raw tabular input
//! - Exporting results to flat files

#![warn(unused_imports)]

/// Commonly used types and functionality re-exported for convenience
pub mod prelude {
    pub use crate::aggregate::*;
    pub use crate::fit::*;
    pub use crate::rate::*;
    pub use crate::regression::*;
    pub use crate::sample::*;
    pub use crate::series::*;
    pub use crate::session::*;
    pub use crate::tabular::*;
}

/// Time/absorbance series value type and input validation
pub mod series;

/// Ordinary least-squares line fitting shared by the estimators
pub mod regression;

/// Initial reaction velocity estimation from a windowed series
pub mod rate;

/// Parameter estimation for the Michaelis-Menten model
pub mod fit {
    pub use crate::fit::error::*;
    pub use crate::fit::linearization::*;
    pub use crate::fit::model::*;
    pub use crate::fit::nonlinear::*;
    pub use crate::fit::result::*;

    /// Error types for fitting failures
    pub mod error;
    /// Linear-regression based estimators
    pub mod linearization;
    /// The Michaelis-Menten equation and its least-squares cost
    pub mod model;
    /// Nonlinear least-squares fitting via Nelder-Mead
    pub mod nonlinear;
    /// Per-method fit results and diagnostics
    pub mod result;
}

/// Aggregation of per-method estimates into a summary
pub mod aggregate;

/// Session state machine driving the estimation pipeline
pub mod session;

/// Conversion of raw tabular input into validated series
pub mod tabular;

/// CSV export of results
pub mod export;

/// Deterministic sample data generation
pub mod sample;
