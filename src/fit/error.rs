use thiserror::Error;

use super::result::FitMethod;

/// Errors raised by the Michaelis-Menten fitters.
///
/// Each method is evaluated independently; a failure in one method never
/// aborts the others. The fitters return a typed error instead of
/// substituting NaN, infinity or any other sentinel value.
#[derive(Error, Debug)]
pub enum FitError {
    #[error("At least 3 concentration/velocity pairs are required, got {found}")]
    TooFewPoints { found: usize },
    #[error("{method} requires a nonzero {quantity}, but pair {index} has {quantity} = 0")]
    DivisionByZero {
        method: FitMethod,
        quantity: &'static str,
        index: usize,
    },
    #[error("Optimizer did not converge within {max_iters} iterations")]
    Convergence { max_iters: u64 },
    #[error("Transformed data for {method} has zero variance, the regression is undefined")]
    DegenerateRegression { method: FitMethod },
    #[error("{method} produced a line fit that cannot be inverted to (Vmax, Km)")]
    NonInvertible { method: FitMethod },
    #[error("Optimizer failed")]
    ArgMin(argmin::core::Error),
}
