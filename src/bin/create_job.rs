//! Create AutoMap job files (`.waj`) interactively, from a JSON
//! configuration, or print a configuration template.
//!
//! Usage:
//!   create-job --stationery Stationery/project.wxsp
//!   create-job --config en-config.json --output en.waj
//!   create-job --template --stationery Stationery/project.wxsp > template.json

use anyhow::{Context, Result};
use automap::console::{Console, Palette, init_logging};
use automap::interactive::{Assembler, Decision, LinePrompter, Prompter, decide};
use automap::{
    AutomapError, JOB_EXTENSION, JobDescriptor, SafeWriter, compile_job, exit, exit_code_for,
    load_config, read_capabilities, render, require_stationery, sanitize_file_stem, template_from,
};
use clap::{CommandFactory, Parser};
use std::io::{Stdin, StdinLock, Stdout};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "create-job")]
#[command(about = "Create AutoMap job files interactively or from a configuration")]
struct Cli {
    /// Stationery file (.wxsp) for interactive mode or --template.
    #[arg(short, long, value_name = "FILE")]
    stationery: Option<PathBuf>,
    /// Job configuration JSON file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Output path for the job file, relative to the working directory
    /// (default: <name>.waj).
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Print a configuration template built from --stationery.
    #[arg(short, long)]
    template: bool,
    /// Skip the XML preview in config mode.
    #[arg(long)]
    no_preview: bool,
    /// Generate without asking for confirmation.
    #[arg(short, long)]
    yes: bool,
    /// Print the generated XML and write nothing.
    #[arg(long)]
    dry_run: bool,
    /// Replace an existing output file.
    #[arg(long)]
    force: bool,
    /// Enable debug logging on stderr.
    #[arg(short, long)]
    verbose: bool,
}

type StdPrompter = LinePrompter<StdinLock<'static>, Stdout>;

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
    let console = Console::detect();

    if cli.template {
        let stationery = cli.stationery.as_deref().ok_or_else(|| {
            AutomapError::Usage("--stationery is required with --template".to_string())
        })?;
        return print_template(stationery);
    }
    if let Some(config) = &cli.config {
        return from_config(cli, config, console);
    }
    if let Some(stationery) = &cli.stationery {
        return interactive(cli, stationery, console);
    }

    Cli::command()
        .print_help()
        .context("printing usage")?;
    Ok(exit::ARG_ERROR)
}

fn prompter() -> StdPrompter {
    let stdin: Stdin = std::io::stdin();
    LinePrompter::new(stdin.lock(), std::io::stdout())
}

fn writer(cli: &Cli) -> Result<SafeWriter> {
    let cwd = std::env::current_dir().context("reading current directory")?;
    Ok(SafeWriter::new(cwd).overwrite(cli.force))
}

fn default_output(job: &JobDescriptor) -> PathBuf {
    PathBuf::from(format!("{}{JOB_EXTENSION}", sanitize_file_stem(&job.name)))
}

fn print_template(stationery: &Path) -> Result<i32> {
    require_stationery(stationery)?;
    let capabilities = read_capabilities(stationery)
        .with_context(|| format!("reading stationery {}", stationery.display()))?;
    let template = template_from(&capabilities, &stationery.display().to_string());
    let text = serde_json::to_string_pretty(&template).context("serializing template")?;
    println!("{text}");
    Ok(exit::SUCCESS)
}

fn from_config(cli: &Cli, config: &Path, console: Console) -> Result<i32> {
    let job = load_config(config)?;
    let xml = compile_job(&job).with_context(|| format!("compiling {}", config.display()))?;

    if cli.dry_run {
        println!("{xml}");
        return Ok(exit::SUCCESS);
    }

    if !cli.no_preview && !cli.yes {
        println!();
        println!("{}", console.palette.cyan("Generated XML:"));
        println!();
        println!("{xml}");
        println!();
        if !prompter().confirm("Generate job file?", true)? {
            println!("Cancelled.");
            return Ok(exit::CANCELLED);
        }
    }

    let output = cli.output.clone().unwrap_or_else(|| default_output(&job));
    let written = writer(cli)?.write(&output, xml.as_bytes())?;
    console.success(&format!("Created: {}", written.display()));
    Ok(exit::SUCCESS)
}

fn interactive(cli: &Cli, stationery: &Path, console: Console) -> Result<i32> {
    require_stationery(stationery)?;
    let palette = console.palette;
    let banner = palette.cyan(&"=".repeat(60));
    println!();
    println!("{banner}");
    println!("{}", palette.cyan("  AutoMap Job File Creator - Interactive Mode"));
    println!("{banner}");
    println!();
    console.info(&format!("Parsing Stationery: {}", stationery.display()));

    let capabilities = read_capabilities(stationery)
        .with_context(|| format!("reading stationery {}", stationery.display()))?;
    if capabilities.formats.is_empty() {
        return Err(AutomapError::NoFormats(capabilities.path.clone()).into());
    }
    println!(
        "{}",
        palette.green(&format!("Found {} format(s)", capabilities.formats.len()))
    );

    let mut prompter = prompter();
    let job = Assembler::new(&mut prompter, &capabilities, palette)
        .run(&stationery.display().to_string())?;

    print!("{}", render::config_preview(&job, palette));
    let xml = compile_job(&job).context("compiling assembled job")?;

    if cli.dry_run {
        println!("{xml}");
        return Ok(exit::SUCCESS);
    }

    let decision = if cli.yes {
        Decision::Generate
    } else {
        if prompter.confirm("Preview XML?", true)? {
            prompter.say("")?;
            prompter.say(&xml)?;
        }
        prompter.say("")?;
        decide(&mut prompter)?
    };

    let writer = writer(cli)?;
    match decision {
        Decision::Cancel => {
            println!("Cancelled.");
            Ok(exit::CANCELLED)
        }
        Decision::ExportConfig => {
            let name = PathBuf::from(format!("{}-config.json", sanitize_file_stem(&job.name)));
            let json = serde_json::to_string_pretty(&job).context("serializing job config")?;
            let written = writer.write(&name, json.as_bytes())?;
            console.success(&format!("Exported config: {}", written.display()));
            Ok(exit::SUCCESS)
        }
        Decision::Generate => {
            let output = cli.output.clone().unwrap_or_else(|| default_output(&job));
            let written = writer.write(&output, xml.as_bytes())?;
            console.success(&format!("Created: {}", written.display()));
            println!();
            println!("{}", palette.cyan("Next steps:"));
            println!("  - Validate: validate-job {}", written.display());
            println!("  - Inspect: list-job-targets {}", written.display());
            Ok(exit::SUCCESS)
        }
    }
}
