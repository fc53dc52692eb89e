//! # gtkmmcargo CLI Entry Point
//!
//! - no `--config`: build with `./gtkmmcargo.cfg`
//! - `--config PATH`: build with that config
//! - `--config template [--scan]`: write a template config
//! - `--config` alone: print the flags discovered through `pkg-config`

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::*;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use gtkmmcargo::build::Builder;
use gtkmmcargo::config::{BuildSpec, DEFAULT_CONFIG_FILE_NAME};
use gtkmmcargo::flags::{GlobalFlags, PkgConfig};
use gtkmmcargo::import;

/// `--config` value that writes a template instead of building
const TEMPLATE_ARG: &str = "template";

#[derive(Parser)]
#[command(name = "gtkmmcargo")]
#[command(about = "Parallel build driver for gtkmm projects", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Config file to build with; `template` writes a new one, no value prints the global flags
    #[arg(short, long, value_name = "PATH", num_args = 0..=1)]
    config: Option<Option<String>>,

    /// Only with `--config template`: list the sources found under the current directory
    #[arg(long)]
    scan: bool,

    /// Log every compiler and linker command line
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let is_template = matches!(cli.config.as_ref(), Some(Some(v)) if v == TEMPLATE_ARG);
    if cli.scan && !is_template {
        bail!("--scan can only be used with --config {}", TEMPLATE_ARG);
    }

    let flags = GlobalFlags::discover(&PkgConfig::default());

    match cli.config {
        Some(None) => {
            flags.print();
            Ok(())
        }
        Some(Some(value)) if value == TEMPLATE_ARG => write_template(cli.scan),
        Some(Some(path)) => build(&path, flags),
        None => build(DEFAULT_CONFIG_FILE_NAME, flags),
    }
}

fn build(config_path: &str, flags: GlobalFlags) -> Result<()> {
    let Some(spec) = BuildSpec::load(config_path) else {
        println!(
            "{} Nothing to build. Run 'gtkmmcargo --config {}' to create {}.",
            "!".yellow(),
            TEMPLATE_ARG,
            DEFAULT_CONFIG_FILE_NAME
        );
        std::process::exit(1);
    };

    let result = Builder::new(spec, flags).build();
    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

fn write_template(scan: bool) -> Result<()> {
    let current_dir = std::env::current_dir().context("Failed to read current directory")?;
    let path = current_dir.join(DEFAULT_CONFIG_FILE_NAME);
    if path.exists() {
        println!(
            "{} {} already exists, not overwriting it.",
            "x".red(),
            path.display()
        );
        std::process::exit(1);
    }

    let spec = if scan {
        import::scan_project(&current_dir)?
    } else {
        BuildSpec {
            project_directory: current_dir,
            ..BuildSpec::new()
        }
    };

    spec.save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} Created {}", "✓".green(), path.display());
    Ok(())
}
