use std::fmt;

use serde::Serialize;

/// Estimation method that produced a [`FitResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FitMethod {
    /// Nonlinear least squares on the untransformed model
    MichaelisMenten,
    /// Double-reciprocal plot, 1/v against 1/S
    LineweaverBurk,
    /// v against v/S
    EadieHofstee,
    /// S/v against S
    HanesWoolf,
}

impl FitMethod {
    /// All methods, in reporting order.
    pub const ALL: [FitMethod; 4] = [
        FitMethod::MichaelisMenten,
        FitMethod::LineweaverBurk,
        FitMethod::EadieHofstee,
        FitMethod::HanesWoolf,
    ];
}

impl fmt::Display for FitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FitMethod::MichaelisMenten => "Michaelis-Menten",
            FitMethod::LineweaverBurk => "Lineweaver-Burk",
            FitMethod::EadieHofstee => "Eadie-Hofstee",
            FitMethod::HanesWoolf => "Hanes-Woolf",
        };
        write!(f, "{name}")
    }
}

/// Goodness-of-fit diagnostics for one method.
///
/// The residual sum of squares is always computed in the untransformed
/// (S, v) space so linearized and nonlinear fits are comparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitDiagnostics {
    /// Residual sum of squares in (S, v) space
    pub rss: f64,
    /// Optimizer iterations, `None` for the closed-form linearizations
    pub iterations: Option<u64>,
}

/// Point estimate of the Michaelis-Menten parameters from one method.
///
/// Results are produced independently per method; the absence of one result
/// does not invalidate the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    /// Method that produced this estimate
    pub method: FitMethod,
    /// Maximum reaction velocity
    pub vmax: f64,
    /// Substrate concentration at half-maximal velocity
    pub km: f64,
    /// Goodness-of-fit diagnostics
    pub diagnostics: FitDiagnostics,
}
