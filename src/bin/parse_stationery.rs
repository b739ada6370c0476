//! List the output formats, per-format settings and file mappings a
//! Stationery (`.wxsp`) file declares.
//!
//! Usage:
//!   parse-stationery project.wxsp
//!   parse-stationery --json project.wxsp

use anyhow::{Context, Result};
use automap::console::{Console, Palette, init_logging};
use automap::{AutomapError, exit_code_for, read_capabilities, render, require_stationery};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "parse-stationery")]
#[command(about = "Parse a Stationery file and list its formats and settings")]
struct Cli {
    /// Path to the Stationery file (.wxsp).
    #[arg(value_name = "STATIONERY")]
    stationery: PathBuf,
    /// Print a JSON report instead of tables.
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
    require_stationery(&cli.stationery)?;
    let capabilities = read_capabilities(&cli.stationery)
        .with_context(|| format!("reading stationery {}", cli.stationery.display()))?;
    if capabilities.formats.is_empty() {
        return Err(AutomapError::NoFormats(capabilities.path.clone()).into());
    }

    if cli.json {
        let report =
            serde_json::to_string_pretty(&capabilities).context("serializing stationery report")?;
        println!("{report}");
    } else {
        print!("{}", render::stationery_table(&capabilities, Palette::detect()));
    }
    Ok(())
}
