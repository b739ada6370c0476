//! Validate a job file for structure, referenced files and format names.
//!
//! Usage:
//!   validate-job en.waj
//!   validate-job --check-documents --check-stationery en.waj
//!   validate-job --strict --json en.waj

use anyhow::{Context, Result};
use automap::console::{Console, Palette, init_logging};
use automap::validate::{FILE_EXISTS, WELL_FORMED};
use automap::{ValidationOptions, ValidationReport, exit_code_for, render, validate_file};
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "validate-job")]
#[command(about = "Validate an AutoMap job file")]
struct Cli {
    /// Path to the job file (.waj).
    #[arg(value_name = "JOB")]
    job: PathBuf,
    /// Check that every referenced source document exists.
    #[arg(short = 'd', long)]
    check_documents: bool,
    /// Check target format names against the referenced Stationery.
    #[arg(short = 's', long)]
    check_stationery: bool,
    /// Treat warnings as failures.
    #[arg(long)]
    strict: bool,
    /// Print the report as JSON.
    #[arg(short, long)]
    json: bool,
    /// Show passing checks too, and enable debug logging on stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            Console::detect().error(&format!("{err:#}"));
            std::process::exit(exit_code_for(&err));
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let options = ValidationOptions {
        check_documents: cli.check_documents,
        check_formats: cli.check_stationery,
    };
    let report = validate_file(&cli.job, options);
    let code = report.exit_code(cli.strict);

    if cli.json {
        let value = json!({
            "file": report.file,
            "passed": code == automap::exit::SUCCESS,
            "strict": cli.strict,
            "checks": report.results.len(),
            "warnings": report.warning_count(),
            "results": report.results,
        });
        let text = serde_json::to_string_pretty(&value).context("serializing validation report")?;
        println!("{text}");
    } else {
        print!("{}", render_text(&report, cli, Palette::detect()));
    }
    Ok(code)
}

fn render_text(report: &ValidationReport, cli: &Cli, palette: Palette) -> String {
    let stopped_early = [FILE_EXISTS, WELL_FORMED]
        .iter()
        .any(|name| report.result(name).is_some_and(|result| !result.passed));
    if stopped_early {
        return report
            .results
            .iter()
            .map(|result| render::validation_result(result, palette))
            .collect();
    }
    render::validation_report(report, cli.verbose, cli.strict, palette)
}
