//! Command-line interface for the enzkin library
//!
//! This binary runs the kinetics estimation pipeline over a CSV table of
//! absorbance traces, or over the built-in demo data:
//!
//! ```bash
//! # Analyze a CSV (first column time, one column per sample)
//! enzkin fit --path assay.csv --conc Sample1=10 --conc Sample2=2 --conc Sample3=0.5
//!
//! # Derive Kcat as well and write the result tables next to the input
//! enzkin fit --path assay.csv --conc S1=5 --enzyme-conc 0.01 --output-dir results
//!
//! # Run the built-in demo data end to end
//! enzkin demo
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use tabled::{Table, Tabled};

use enzkin::export::{write_fit_results_csv, write_pairs_csv, write_summary_csv};
use enzkin::prelude::*;

/// Main CLI configuration struct
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Estimate kinetic parameters from a CSV of absorbance traces
    Fit {
        /// Path to the CSV file (first column time, one column per sample)
        #[arg(short, long)]
        path: PathBuf,

        /// Substrate concentration per sample, e.g. --conc Sample1=2.5
        #[arg(short, long = "conc", value_name = "NAME=VALUE")]
        concentrations: Vec<String>,

        /// Enzyme concentration for the Kcat derivation
        #[arg(short, long)]
        enzyme_conc: Option<f64>,

        /// Number of leading points used for the initial-rate regression
        #[arg(short, long, default_value_t = 5)]
        window: usize,

        /// Directory to write the result CSV tables to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the results as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Run the built-in demo data end to end
    Demo {
        /// Enzyme concentration for the Kcat derivation
        #[arg(short, long)]
        enzyme_conc: Option<f64>,

        /// Print the results as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

#[derive(Tabled)]
struct RateRow {
    #[tabled(rename = "Sample")]
    sample: String,
    #[tabled(rename = "S")]
    concentration: String,
    #[tabled(rename = "v (Abs/s)")]
    velocity: String,
    #[tabled(rename = "Window")]
    window: String,
}

#[derive(Tabled)]
struct FitRow {
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Vmax")]
    vmax: String,
    #[tabled(rename = "Km")]
    km: String,
    #[tabled(rename = "RSS")]
    rss: String,
}

/// Main entry point for the CLI application
pub fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Fit {
            path,
            concentrations,
            enzyme_conc,
            window,
            output_dir,
            json,
        } => {
            let file = File::open(path).expect("Failed to open input file");
            let table = RawTable::from_csv(file).expect("Failed to parse input file");
            let concentrations = parse_concentrations(concentrations);
            let series = table
                .into_series(&concentrations)
                .expect("Failed to validate input data");
            let names: Vec<String> = series
                .iter()
                .filter_map(|s| s.label().map(str::to_string))
                .collect();

            let mut session = KineticsSession::new();
            session
                .load_samples(series)
                .expect("Failed to load samples");
            for name in &names {
                session
                    .set_window(name, Window::FirstPoints(*window))
                    .expect("Failed to set window");
            }
            session
                .set_enzyme_concentration(*enzyme_conc)
                .expect("Failed to set enzyme concentration");

            run_and_report(&mut session, output_dir.as_deref(), *json);
        }
        Commands::Demo { enzyme_conc, json } => {
            let mut session = KineticsSession::new();
            session
                .load_samples(demo_series())
                .expect("Failed to load demo samples");
            session
                .set_enzyme_concentration(*enzyme_conc)
                .expect("Failed to set enzyme concentration");

            run_and_report(&mut session, None, *json);
        }
    }
}

/// Runs the pipeline and prints the rate, fit and summary tables.
fn run_and_report(session: &mut KineticsSession, output_dir: Option<&Path>, json: bool) {
    session.compute_rates().expect("Failed to compute rates");

    if json {
        report_json(session);
    } else {
        report_tables(session);
    }

    if let Some(dir) = output_dir {
        write_tables(session, dir);
    }
}

/// Serializes rates, per-method fits and the summary as one JSON document.
fn report_json(session: &mut KineticsSession) {
    let _ = session.fit();

    let report = serde_json::json!({
        "rates": session.rate_estimates(),
        "fits": session.fit_results(),
        "summary": session.summary(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).expect("Failed to serialize report")
    );
}

fn report_tables(session: &mut KineticsSession) {
    let pairs = session.pairs();
    let rate_rows: Vec<RateRow> = session
        .rate_estimates()
        .iter()
        .zip(pairs.iter())
        .map(|(rate, pair)| RateRow {
            sample: rate.sample.clone().unwrap_or_default(),
            concentration: format!("{}", pair.s),
            velocity: format!("{:.6}", rate.slope),
            window: format!("[{}, {}]", rate.range.0, rate.range.1),
        })
        .collect();
    println!("\n{}", "Initial velocities".bold());
    println!("{}", Table::new(rate_rows));

    let summary = session.fit().map(|s| s.clone());

    let fit_rows: Vec<FitRow> = session
        .fit_outcomes()
        .iter()
        .map(|(method, outcome)| match outcome {
            Ok(result) => FitRow {
                method: method.to_string(),
                vmax: format!("{:.6}", result.vmax),
                km: format!("{:.6}", result.km),
                rss: format!("{:.3e}", result.diagnostics.rss),
            },
            Err(err) => FitRow {
                method: method.to_string(),
                vmax: "-".to_string(),
                km: "-".to_string(),
                rss: err.to_string(),
            },
        })
        .collect();
    println!("\n{}", "Parameter estimates".bold());
    println!("{}", Table::new(fit_rows));

    match &summary {
        Ok(summary) => {
            println!(
                "\n{} Vmax = {:.6}, Km = {:.6} (mean over {} methods)",
                "Summary:".green().bold(),
                summary.vmax_mean,
                summary.km_mean,
                summary.n_methods
            );
            if let (Some(kcat), Some(efficiency)) = (summary.kcat, summary.efficiency) {
                println!(
                    "{} Kcat = {:.6}, Kcat/Km = {:.6}",
                    "Derived:".green().bold(),
                    kcat,
                    efficiency
                );
            }
        }
        Err(err) => println!("\n{} {}", "No summary:".red().bold(), err),
    }
}

/// Writes the pair, fit and summary tables as CSV files under `dir`.
fn write_tables(session: &KineticsSession, dir: &Path) {
    std::fs::create_dir_all(dir).expect("Failed to create output directory");

    let pairs_file = File::create(dir.join("pairs.csv")).expect("Failed to create pairs.csv");
    write_pairs_csv(pairs_file, &session.pairs()).expect("Failed to write pairs.csv");

    let fits_file = File::create(dir.join("fits.csv")).expect("Failed to create fits.csv");
    write_fit_results_csv(fits_file, &session.fit_results()).expect("Failed to write fits.csv");

    if let Some(summary) = session.summary() {
        let summary_file =
            File::create(dir.join("summary.csv")).expect("Failed to create summary.csv");
        write_summary_csv(summary_file, summary).expect("Failed to write summary.csv");
    }

    println!("\nResult tables written to {}", dir.display());
}

/// Parses repeated `NAME=VALUE` concentration arguments.
fn parse_concentrations(args: &[String]) -> HashMap<String, f64> {
    args.iter()
        .map(|arg| {
            let (name, value) = arg
                .split_once('=')
                .expect("Concentration must be given as NAME=VALUE");
            let value = value
                .parse()
                .expect("Concentration value must be a number");
            (name.to_string(), value)
        })
        .collect()
}
