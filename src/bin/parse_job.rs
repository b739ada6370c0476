//! Summarize a job file (`.waj`), or re-emit it as JSON.
//!
//! Usage:
//!   parse-job en.waj
//!   parse-job --json en.waj
//!   parse-job --config en.waj > en-config.json

use anyhow::{Context, Result};
use automap::console::{Console, Palette, init_logging};
use automap::render::{self, JobReport};
use automap::{exit_code_for, read_job, require_job};
use clap::Parser;
use log::debug;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "parse-job")]
#[command(about = "Parse an AutoMap job file and print its configuration")]
struct Cli {
    /// Path to the job file (.waj).
    #[arg(value_name = "JOB")]
    job: PathBuf,
    /// Print the parsed job with stationery resolution as JSON.
    #[arg(short, long, conflicts_with = "config")]
    json: bool,
    /// Print a configuration that `create-job --config` accepts.
    #[arg(short, long)]
    config: bool,
    /// Enable debug logging on stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = run(&cli) {
        Console::detect().error(&format!("{err:#}"));
        std::process::exit(exit_code_for(&err));
    }
}

fn run(cli: &Cli) -> Result<()> {
    require_job(&cli.job)?;
    let job = read_job(&cli.job).with_context(|| format!("reading job {}", cli.job.display()))?;
    debug!("stationery status: {:?}", job.stationery);

    if cli.json {
        let report = serde_json::to_string_pretty(&JobReport::new(&job))
            .context("serializing job report")?;
        println!("{report}");
    } else if cli.config {
        let config =
            serde_json::to_string_pretty(&job.descriptor).context("serializing job config")?;
        println!("{config}");
    } else {
        print!("{}", render::job_summary(&job, Palette::detect()));
    }
    Ok(())
}
