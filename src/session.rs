//! Session state machine driving the estimation pipeline.
//!
//! A [`KineticsSession`] owns the loaded series, the per-sample window
//! selections, the enabled-method set and the current generation of derived
//! results. Any change to a window, a concentration or the method set
//! invalidates the downstream state; recomputation is always full, never
//! incremental, which is the simplest correct design at these data sizes.

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::aggregate::{summarize, AggregateError, KineticsSummary};
use crate::fit::{
    FitError, FitMethod, FitResult, LinearizationFitter, LinearizationMethod,
    MichaelisMentenFitter,
};
use crate::rate::{
    estimate_initial_rate, ConcentrationVelocityPair, RateError, RateEstimate, Window,
};
use crate::series::TimeSeries;

/// Errors raised by session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No samples have been loaded")]
    NoData,
    #[error("Sample '{0}' not found")]
    UnknownSample(String),
    #[error("Duplicate sample label '{0}'")]
    DuplicateSample(String),
    #[error("Sample '{0}' has no substrate concentration")]
    MissingConcentration(String),
    #[error("Substrate concentration must be positive and finite, got {0}")]
    InvalidConcentration(f64),
    #[error("Enzyme concentration must be positive and finite, got {0}")]
    InvalidEnzymeConcentration(f64),
    #[error("Initial rates have not been computed yet")]
    RatesNotComputed,
    #[error("Recorded pair must be finite with a non-negative concentration, got (s = {s}, v = {v})")]
    InvalidRecordedPair { s: f64, v: f64 },
    #[error(transparent)]
    Rate(#[from] RateError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Pipeline progress of a session.
///
/// Invalidation moves the state backwards: a window change drops back to
/// `DataLoaded`, a concentration or method-set change to `RatesComputed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SessionState {
    Empty,
    DataLoaded,
    RatesComputed,
    FitComplete,
}

/// The set of enabled estimation methods.
///
/// Which methods run is configuration, not separate code paths; the session
/// evaluates every enabled method independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSet(Vec<FitMethod>);

impl MethodSet {
    /// All four methods enabled.
    pub fn all() -> Self {
        Self(FitMethod::ALL.to_vec())
    }

    /// No methods enabled.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Enables a method.
    pub fn with(mut self, method: FitMethod) -> Self {
        if !self.0.contains(&method) {
            self.0.push(method);
        }
        self
    }

    /// Disables a method.
    pub fn without(mut self, method: FitMethod) -> Self {
        self.0.retain(|m| *m != method);
        self
    }

    pub fn is_enabled(&self, method: FitMethod) -> bool {
        self.0.contains(&method)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Enabled methods in the canonical reporting order.
    pub fn iter(&self) -> impl Iterator<Item = FitMethod> + '_ {
        FitMethod::ALL
            .into_iter()
            .filter(move |m| self.is_enabled(*m))
    }
}

impl Default for MethodSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Runs every enabled method over the pairs, independently.
///
/// A failure in one method never aborts the others; the caller receives the
/// full per-method outcome set and decides what to surface.
pub fn fit_all(
    pairs: &[ConcentrationVelocityPair],
    methods: &MethodSet,
) -> Vec<(FitMethod, Result<FitResult, FitError>)> {
    let nonlinear = MichaelisMentenFitter::default();
    methods
        .iter()
        .map(|method| {
            let outcome = match method {
                FitMethod::MichaelisMenten => nonlinear.fit(pairs),
                FitMethod::LineweaverBurk => {
                    LinearizationFitter::new(LinearizationMethod::LineweaverBurk).fit(pairs)
                }
                FitMethod::EadieHofstee => {
                    LinearizationFitter::new(LinearizationMethod::EadieHofstee).fit(pairs)
                }
                FitMethod::HanesWoolf => {
                    LinearizationFitter::new(LinearizationMethod::HanesWoolf).fit(pairs)
                }
            };
            (method, outcome)
        })
        .collect()
}

/// One loaded sample with its current configuration.
#[derive(Debug, Clone)]
struct Sample {
    name: String,
    series: TimeSeries,
    window: Window,
    concentration: f64,
}

/// Orchestrates the estimation pipeline over a set of samples.
///
/// See the module documentation for the state machine and invalidation
/// rules. The session additionally owns an append-only log of manually
/// recorded `(S, v)` pairs for the one-measurement-at-a-time interaction
/// mode; appends happen only through [`KineticsSession::record_pair`].
#[derive(Debug, Default)]
pub struct KineticsSession {
    samples: Vec<Sample>,
    enzyme_concentration: Option<f64>,
    methods: MethodSet,
    rates: Vec<RateEstimate>,
    fits: Vec<(FitMethod, Result<FitResult, FitError>)>,
    summary: Option<KineticsSummary>,
    recorded: Vec<ConcentrationVelocityPair>,
    state: SessionState,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Empty
    }
}

impl KineticsSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pipeline state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Loads samples into the session, replacing any previous set.
    ///
    /// Every series must carry a substrate concentration. Unlabeled series
    /// are named `sample1`, `sample2`, ... by position. The initial window
    /// is the first 5 points, clamped to the series length.
    ///
    /// # Errors
    /// * [`SessionError::NoData`] for an empty set
    /// * [`SessionError::MissingConcentration`] when a series has no
    ///   concentration
    /// * [`SessionError::DuplicateSample`] for repeated labels
    pub fn load_samples(&mut self, series: Vec<TimeSeries>) -> Result<(), SessionError> {
        if series.is_empty() {
            return Err(SessionError::NoData);
        }

        let mut samples = Vec::with_capacity(series.len());
        for (i, series) in series.into_iter().enumerate() {
            let name = series
                .label()
                .map(str::to_string)
                .unwrap_or_else(|| format!("sample{}", i + 1));
            if samples.iter().any(|s: &Sample| s.name == name) {
                return Err(SessionError::DuplicateSample(name));
            }
            let concentration = series
                .concentration()
                .ok_or_else(|| SessionError::MissingConcentration(name.clone()))?;
            let window = Window::FirstPoints(series.len().min(5));
            samples.push(Sample {
                name,
                series,
                window,
                concentration,
            });
        }

        debug!("Loaded {} samples", samples.len());
        self.samples = samples;
        self.invalidate_to(SessionState::DataLoaded);
        // Loading is the one transition that moves forward: a fresh set of
        // samples always leaves the session at DataLoaded exactly.
        self.state = SessionState::DataLoaded;
        Ok(())
    }

    /// Changes the regression window of one sample.
    ///
    /// The window is validated against the series immediately; the session
    /// drops back to `DataLoaded`, discarding stale rates and fits.
    pub fn set_window(&mut self, sample: &str, window: Window) -> Result<(), SessionError> {
        let idx = self.sample_index(sample)?;
        window.resolve(self.samples[idx].series.len())?;
        self.samples[idx].window = window;
        self.invalidate_to(SessionState::DataLoaded);
        Ok(())
    }

    /// Changes the substrate concentration of one sample.
    ///
    /// Rates do not depend on concentrations, so the session only drops
    /// back to `RatesComputed`, discarding stale fits.
    pub fn set_concentration(&mut self, sample: &str, s: f64) -> Result<(), SessionError> {
        if !s.is_finite() || s <= 0.0 {
            return Err(SessionError::InvalidConcentration(s));
        }
        let idx = self.sample_index(sample)?;
        self.samples[idx].concentration = s;
        self.invalidate_to(SessionState::RatesComputed);
        Ok(())
    }

    /// Sets the enzyme concentration used for the Kcat derivation.
    ///
    /// Discards the stale summary along with the fits.
    pub fn set_enzyme_concentration(&mut self, e: Option<f64>) -> Result<(), SessionError> {
        if let Some(e) = e {
            if !e.is_finite() || e <= 0.0 {
                return Err(SessionError::InvalidEnzymeConcentration(e));
            }
        }
        self.enzyme_concentration = e;
        self.invalidate_to(SessionState::RatesComputed);
        Ok(())
    }

    /// Replaces the enabled-method set, discarding stale fits.
    pub fn set_methods(&mut self, methods: MethodSet) {
        self.methods = methods;
        self.invalidate_to(SessionState::RatesComputed);
    }

    /// Computes an initial rate for every loaded sample.
    ///
    /// Always a full recompute; the previous generation of estimates is
    /// replaced atomically.
    ///
    /// # Errors
    /// * [`SessionError::NoData`] when nothing is loaded
    /// * [`SessionError::Rate`] when any sample's window fails
    pub fn compute_rates(&mut self) -> Result<&[RateEstimate], SessionError> {
        if self.samples.is_empty() {
            return Err(SessionError::NoData);
        }

        let mut rates = Vec::with_capacity(self.samples.len());
        for sample in &self.samples {
            let mut estimate = estimate_initial_rate(&sample.series, sample.window)?;
            estimate.sample = Some(sample.name.clone());
            debug!(
                "Sample '{}': initial velocity {:.6} over window {:?}",
                sample.name, estimate.slope, estimate.range
            );
            rates.push(estimate);
        }

        self.rates = rates;
        self.fits.clear();
        self.summary = None;
        self.state = SessionState::RatesComputed;
        Ok(&self.rates)
    }

    /// Runs every enabled fitter and the aggregator.
    ///
    /// Per-method failures are logged and kept in the outcome set; they
    /// never abort the other methods. Only when no method succeeds does the
    /// summary fail, in which case the per-method outcomes remain available
    /// and the session stays at `RatesComputed`.
    ///
    /// # Errors
    /// * [`SessionError::RatesNotComputed`] when called before
    ///   [`KineticsSession::compute_rates`]
    /// * [`SessionError::Aggregate`] when zero methods succeeded
    pub fn fit(&mut self) -> Result<&KineticsSummary, SessionError> {
        if self.state < SessionState::RatesComputed {
            return Err(SessionError::RatesNotComputed);
        }

        let pairs = self.pairs();
        let outcomes = fit_all(&pairs, &self.methods);
        for (method, outcome) in &outcomes {
            if let Err(err) = outcome {
                warn!("{method} failed: {err}");
            }
        }

        let successes: Vec<&FitResult> = outcomes
            .iter()
            .filter_map(|(_, outcome)| outcome.as_ref().ok())
            .collect();
        let summary = summarize(&successes, self.enzyme_concentration);

        self.fits = outcomes;
        match summary {
            Ok(summary) => {
                self.state = SessionState::FitComplete;
                Ok(self.summary.insert(summary))
            }
            Err(err) => {
                self.summary = None;
                Err(err.into())
            }
        }
    }

    /// Convenience: computes rates and fits in one call.
    pub fn run(&mut self) -> Result<&KineticsSummary, SessionError> {
        self.compute_rates()?;
        self.fit()
    }

    /// The `(S, v)` pairs joining the current rates with their sample
    /// concentrations, in load order.
    pub fn pairs(&self) -> Vec<ConcentrationVelocityPair> {
        self.rates
            .iter()
            .zip(self.samples.iter())
            .map(|(rate, sample)| rate.paired_with(sample.concentration))
            .collect()
    }

    /// Current rate estimates, empty before `compute_rates`.
    pub fn rate_estimates(&self) -> &[RateEstimate] {
        &self.rates
    }

    /// Per-method fit outcomes of the current generation, including
    /// failures.
    pub fn fit_outcomes(&self) -> &[(FitMethod, Result<FitResult, FitError>)] {
        &self.fits
    }

    /// The successful fit results of the current generation.
    pub fn fit_results(&self) -> Vec<&FitResult> {
        self.fits
            .iter()
            .filter_map(|(_, outcome)| outcome.as_ref().ok())
            .collect()
    }

    /// The current summary, `None` unless the state is `FitComplete`.
    pub fn summary(&self) -> Option<&KineticsSummary> {
        self.summary.as_ref()
    }

    /// Appends one manually recorded `(S, v)` pair to the session log.
    ///
    /// The log is append-only and independent of the loaded samples; it is
    /// never mutated by the pipeline.
    pub fn record_pair(&mut self, s: f64, v: f64) -> Result<(), SessionError> {
        if !s.is_finite() || !v.is_finite() || s < 0.0 {
            return Err(SessionError::InvalidRecordedPair { s, v });
        }
        self.recorded.push(ConcentrationVelocityPair { s, v });
        Ok(())
    }

    /// The recorded pairs, in append order.
    pub fn recorded_pairs(&self) -> &[ConcentrationVelocityPair] {
        &self.recorded
    }

    /// Empties the recorded-pair log.
    pub fn clear_recorded(&mut self) {
        self.recorded.clear();
    }

    /// Fits the enabled methods against the recorded-pair log.
    ///
    /// Used by the interaction mode where the host records one measurement
    /// at a time instead of loading full series. Does not touch the
    /// session's pipeline state.
    pub fn fit_recorded(&self) -> Vec<(FitMethod, Result<FitResult, FitError>)> {
        fit_all(&self.recorded, &self.methods)
    }

    fn sample_index(&self, name: &str) -> Result<usize, SessionError> {
        self.samples
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| SessionError::UnknownSample(name.to_string()))
    }

    /// Drops derived state down to `target`, never forward.
    fn invalidate_to(&mut self, target: SessionState) {
        if target <= SessionState::RatesComputed {
            self.fits.clear();
            self.summary = None;
        }
        if target <= SessionState::DataLoaded {
            self.rates.clear();
        }
        self.state = self.state.min(target);
    }
}
