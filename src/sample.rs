//! Deterministic sample data generation.
//!
//! Mirrors the demo workbook the original assay tool ships: three linear
//! absorbance traces over one minute at 5 second intervals. Also provides
//! noiseless and noisy Michaelis-Menten data for demos, tests and benches.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::fit::michaelis_menten;
use crate::rate::ConcentrationVelocityPair;
use crate::series::TimeSeries;

/// Assay time grid of the demo data: 0 s to 55 s at 5 s intervals.
fn demo_time() -> Vec<f64> {
    (0..12).map(|i| (i * 5) as f64).collect()
}

/// The built-in demo samples: three exactly linear absorbance traces with
/// initial velocities 0.008, 0.006 and 0.004 Abs/s.
///
/// The original demo leaves concentrations to be typed in by the user;
/// here each trace carries a distinct one so the demo runs end to end.
pub fn demo_series() -> Vec<TimeSeries> {
    let time = demo_time();
    [
        ("Sample1", 0.02, 0.008, 10.0),
        ("Sample2", 0.01, 0.006, 2.0),
        ("Sample3", 0.00, 0.004, 0.5),
    ]
    .iter()
    .map(|&(label, intercept, slope, concentration)| {
        let absorbance = time.iter().map(|t| intercept + slope * t).collect();
        TimeSeries::new(
            Some(label.to_string()),
            time.clone(),
            absorbance,
            Some(concentration),
        )
        .expect("demo data is valid by construction")
    })
    .collect()
}

/// Generates one linear absorbance trace per concentration whose slope is
/// the Michaelis-Menten velocity `v(S)`, labeled `S=<concentration>`.
///
/// Useful for exercising the full pipeline against known parameters: the
/// initial-rate estimator recovers `v(S)` exactly and the fitters should
/// recover `(vmax, km)`.
pub fn series_from_model(vmax: f64, km: f64, concentrations: &[f64]) -> Vec<TimeSeries> {
    let time = demo_time();
    concentrations
        .iter()
        .map(|&s| {
            let v = michaelis_menten(s, vmax, km);
            let absorbance = time.iter().map(|t| 0.02 + v * t).collect();
            TimeSeries::new(Some(format!("S={s}")), time.clone(), absorbance, Some(s))
                .expect("generated data is valid by construction")
        })
        .collect()
}

/// Noiseless `(S, v)` pairs generated exactly from the model.
pub fn velocity_pairs(vmax: f64, km: f64, concentrations: &[f64]) -> Vec<ConcentrationVelocityPair> {
    concentrations
        .iter()
        .map(|&s| ConcentrationVelocityPair {
            s,
            v: michaelis_menten(s, vmax, km),
        })
        .collect()
}

/// `(S, v)` pairs with seeded Gaussian noise on the velocities.
///
/// The seed makes runs reproducible; the noise level is the standard
/// deviation in velocity units.
pub fn noisy_velocity_pairs(
    vmax: f64,
    km: f64,
    concentrations: &[f64],
    sigma: f64,
    seed: u64,
) -> Vec<ConcentrationVelocityPair> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma).expect("sigma must be finite and non-negative");
    concentrations
        .iter()
        .map(|&s| ConcentrationVelocityPair {
            s,
            v: michaelis_menten(s, vmax, km) + normal.sample(&mut rng),
        })
        .collect()
}
