//! List the build targets of a job file.
//!
//! Usage:
//!   list-job-targets en.waj
//!   list-job-targets --enabled --simple en.waj
//!   list-job-targets --detailed en.waj
//!   list-job-targets --json en.waj

use anyhow::{Context, Result};
use automap::console::{Console, Palette, init_logging};
use automap::render::{self, TargetReport};
use automap::{AutomapError, Target, exit_code_for, read_job, require_job};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "list-job-targets")]
#[command(about = "List targets from an AutoMap job file")]
struct Cli {
    /// Path to the job file (.waj).
    #[arg(value_name = "JOB")]
    job: PathBuf,
    /// Show only targets that build by default.
    #[arg(short, long, conflicts_with = "disabled")]
    enabled: bool,
    /// Show only targets that are skipped by default.
    #[arg(short, long)]
    disabled: bool,
    /// Show every override of each target.
    #[arg(long, conflicts_with_all = ["simple", "json"])]
    detailed: bool,
    /// One line per target: build status and name.
    #[arg(short, long, conflicts_with = "json")]
    simple: bool,
    /// Print targets as JSON.
    #[arg(short, long)]
    json: bool,
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
    let descriptor = &job.descriptor;
    if descriptor.targets.is_empty() {
        return Err(AutomapError::NoTargets(cli.job.clone()).into());
    }

    let targets: Vec<&Target> = descriptor
        .targets
        .iter()
        .filter(|target| {
            if cli.enabled {
                target.build
            } else if cli.disabled {
                !target.build
            } else {
                true
            }
        })
        .collect();
    if targets.is_empty() {
        println!("No targets match the filter criteria");
        return Ok(());
    }

    let palette = Palette::detect();
    if cli.json {
        let reports: Vec<TargetReport<'_>> =
            targets.iter().map(|target| TargetReport::new(target)).collect();
        let text = serde_json::to_string_pretty(&reports).context("serializing targets")?;
        println!("{text}");
    } else if cli.simple {
        print!("{}", render::targets_simple(&targets));
    } else if cli.detailed {
        print!("{}", render::targets_detailed(descriptor, &targets, palette));
    } else {
        print!("{}", render::targets_table(descriptor, &targets, palette));
    }
    Ok(())
}
