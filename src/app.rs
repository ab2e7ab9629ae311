//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - runs fits, dilutions and binning
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{BinArgs, Command, DiluteArgs, FitArgs, PlotArgs, PredictArgs, SeriesArgs};
use crate::dilution::DilutionInput;
use crate::domain::FitConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `lab` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may set LAB_LOG; a missing file is fine.
    dotenvy::dotenv().ok();
    init_logging();

    // `lab` with no arguments runs the demonstration.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Demo => handle_demo(),
        Command::Fit(args) => handle_fit(args),
        Command::Predict(args) => handle_predict(args),
        Command::Plot(args) => handle_plot(args),
        Command::Dilute(args) => handle_dilute(args),
        Command::Series(args) => handle_series(args),
        Command::Bin(args) => handle_bin(args),
    }
}

fn init_logging() {
    let env = env_logger::Env::default().filter_or("LAB_LOG", "warn");
    // A logger may already be installed (e.g. when embedded); keep it.
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn handle_demo() -> Result<(), AppError> {
    let demo = pipeline::run_demo()?;
    let fit = &demo.run.fit;

    println!("Slope: {:.4}", fit.slope);
    println!("Intercept: {:.4}", fit.intercept);
    println!("R2: {:.4}", fit.r_squared);
    println!("{}", crate::report::equation(fit));
    println!("concentration = {:.2} nM", demo.unknown_concentration);

    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    println!("{}", crate::report::format_fit_summary(&run.fit));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.curve.standards(),
            &run.fit,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    if let Some(path) = &config.export_curve {
        crate::io::curve::write_curve_json(path, &run.fit, &run.curve.standards())?;
        log::info!("curve written to {}", path.display());
    }

    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let curve = match (&args.curve, &args.csv) {
        (Some(path), _) => pipeline::curve_from_json(path)?,
        (None, Some(path)) => {
            let config = FitConfig {
                csv_path: path.clone(),
                conc_col: args.columns.conc_col.clone(),
                resp_col: args.columns.resp_col.clone(),
                plot: false,
                plot_width: 0,
                plot_height: 0,
                export_curve: None,
            };
            pipeline::run_fit(&config)?.curve
        }
        (None, None) => return Err(AppError::new(3, "Provide either --curve or --csv.")),
    };

    let concentrations = curve.predict_concentrations(&args.responses)?;
    print!("{}", crate::report::format_predictions(&args.responses, &concentrations));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;
    let plot = crate::plot::render_ascii_plot_from_curve_file(&curve, args.width, args.height);

    println!("{plot}");
    Ok(())
}

fn handle_dilute(args: DiluteArgs) -> Result<(), AppError> {
    let solved = crate::dilution::dilute(DilutionInput {
        c1: args.c1,
        v1: args.v1,
        c2: args.c2,
        v2: args.v2,
    })?;
    println!("{}", crate::report::format_dilution(&solved));
    Ok(())
}

fn handle_series(args: SeriesArgs) -> Result<(), AppError> {
    let series = crate::dilution::dilution_series(args.count, args.total_vol, args.stock_conc)?;
    print!("{}", crate::report::format_series(&series));
    Ok(())
}

fn handle_bin(args: BinArgs) -> Result<(), AppError> {
    let ingest = crate::io::ingest::read_table_csv(&args.csv)?;
    if !ingest.row_errors.is_empty() {
        log::warn!(
            "{} of {} rows in '{}' were skipped",
            ingest.row_errors.len(),
            ingest.rows_read,
            args.csv.display()
        );
    }

    let binned = crate::binning::bin1d(&ingest.table, args.width, &args.by)?;
    print!("{}", crate::report::format_binned(&binned));

    if let Some(path) = &args.export {
        crate::io::export::write_binned_csv(path, &binned)?;
        log::info!("binned table written to {}", path.display());
    }
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        csv_path: args.csv.clone(),
        conc_col: args.columns.conc_col.clone(),
        resp_col: args.columns.resp_col.clone(),
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_curve: args.export_curve.clone(),
    }
}

/// Rewrite argv so `lab` defaults to `lab demo`.
///
/// Rules:
/// - `lab`                      -> `lab demo`
/// - `lab --help/--version/-h`  -> unchanged
/// - anything else              -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    if argv.len() <= 1 {
        argv.truncate(1);
        if argv.is_empty() {
            argv.push("lab".to_string());
        }
        argv.push("demo".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_demo() {
        assert_eq!(rewrite_args(args(&["lab"])), args(&["lab", "demo"]));
        assert_eq!(rewrite_args(Vec::new()), args(&["lab", "demo"]));
    }

    #[test]
    fn explicit_commands_are_untouched() {
        assert_eq!(rewrite_args(args(&["lab", "--help"])), args(&["lab", "--help"]));
        assert_eq!(
            rewrite_args(args(&["lab", "dilute", "--c1", "1"])),
            args(&["lab", "dilute", "--c1", "1"])
        );
    }

    #[test]
    fn plot_is_on_unless_disabled() {
        let cli = crate::cli::Cli::parse_from(args(&["lab", "fit", "--csv", "s.csv"]));
        let Command::Fit(fit) = cli.command else {
            panic!("expected fit command");
        };
        assert!(fit_config_from_args(&fit).plot);
    }

    #[test]
    fn no_plot_disables_plot() {
        let cli = crate::cli::Cli::parse_from(args(&["lab", "fit", "--csv", "s.csv", "--no-plot"]));
        let Command::Fit(fit) = cli.command else {
            panic!("expected fit command");
        };
        let config = fit_config_from_args(&fit);
        assert!(!config.plot);
        assert_eq!(config.conc_col, "concentration");
        assert_eq!(config.resp_col, "response");
    }

    #[test]
    fn predict_accepts_negative_responses() {
        let cli = crate::cli::Cli::parse_from(args(&["lab", "predict", "--curve", "c.json", "-5", "12.5"]));
        let Command::Predict(p) = cli.command else {
            panic!("expected predict command");
        };
        assert_eq!(p.responses, vec![-5.0, 12.5]);
    }

    #[test]
    fn plot_reads_curve_path_and_size() {
        let cli = crate::cli::Cli::parse_from(args(&["lab", "plot", "--curve", "c.json", "--width", "40"]));
        let Command::Plot(p) = cli.command else {
            panic!("expected plot command");
        };
        assert_eq!(p.curve, std::path::PathBuf::from("c.json"));
        assert_eq!(p.width, 40);
        assert_eq!(p.height, 20);
    }

    #[test]
    fn predict_requires_a_source() {
        let res = crate::cli::Cli::try_parse_from(args(&["lab", "predict", "1.0"]));
        assert!(res.is_err());
    }
}
