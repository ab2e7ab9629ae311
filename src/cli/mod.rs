//! Command-line parsing for the `lab` helpers.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting/dilution/binning code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "lab", version, about = "Standard curves, dilutions and 1-D binning for lab data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the built-in example standards and estimate one unknown.
    Demo,
    /// Fit a standard curve from CSV, print diagnostics, and optionally plot/export.
    Fit(FitArgs),
    /// Estimate concentrations for measured responses.
    Predict(PredictArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
    /// Solve C1·V1 = C2·V2 for the one missing term.
    Dilute(DiluteArgs),
    /// Lay out a dilution series from a stock solution.
    Series(SeriesArgs),
    /// Average every column of a CSV table into fixed-width bins.
    Bin(BinArgs),
}

/// Where the standards come from and which columns hold them.
#[derive(Debug, Args, Clone)]
pub struct StandardsArgs {
    /// Concentration column name (case-insensitive).
    #[arg(long, default_value = "concentration")]
    pub conc_col: String,

    /// Response column name (case-insensitive).
    #[arg(long, default_value = "response")]
    pub resp_col: String,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// CSV file with one standard per row.
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub columns: StandardsArgs,

    /// Skip the terminal plot (it is rendered by default).
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the fitted curve (parameters + standards + fitted grid) to JSON.
    #[arg(long = "export-curve", value_name = "JSON")]
    pub export_curve: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
#[command(group = clap::ArgGroup::new("source").required(true).args(["curve", "csv"]))]
pub struct PredictArgs {
    /// Curve JSON produced by `lab fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: Option<PathBuf>,

    /// CSV of standards to fit before predicting.
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    #[command(flatten)]
    pub columns: StandardsArgs,

    /// Measured responses.
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub responses: Vec<f64>,
}

/// Options for plotting a saved curve.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Curve JSON file produced by `lab fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Leave exactly one of the four terms out; it is the one solved for.
#[derive(Debug, Args, Clone)]
pub struct DiluteArgs {
    /// Initial (stock) concentration, in M.
    #[arg(long)]
    pub c1: Option<f64>,

    /// Volume of stock to add, in L.
    #[arg(long)]
    pub v1: Option<f64>,

    /// Final concentration, in M.
    #[arg(long)]
    pub c2: Option<f64>,

    /// Final volume, in L.
    #[arg(long)]
    pub v2: Option<f64>,
}

#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    /// Number of standards in the series.
    #[arg(short = 'n', long)]
    pub count: usize,

    /// Total volume of each standard, in L.
    #[arg(long)]
    pub total_vol: f64,

    /// Stock concentration, in M.
    #[arg(long)]
    pub stock_conc: f64,
}

#[derive(Debug, Args, Clone)]
pub struct BinArgs {
    /// CSV table; every column must be numeric.
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    /// Bin width in units of the binning column (e.g. 1 for 1 m intervals).
    #[arg(long)]
    pub width: f64,

    /// Column to bin by (exact header name, e.g. `Depth`).
    #[arg(long)]
    pub by: String,

    /// Export the binned table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}
