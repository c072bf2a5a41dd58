//! Command-line front end for the octo machine
//!
//! Loads a program image, hands the bytes to the engine, and runs it to
//! completion. Loader and runtime failures render to stderr and exit
//! non-zero; the engine itself never touches the file system.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use octo_loader::LoaderError;
use octo_runtime::{Machine, MachineConfig};
use tracing_subscriber::EnvFilter;

/// Run a program image on the octo 8-bit register machine
#[derive(Debug, Parser)]
#[command(name = "octo", version, about)]
struct Args {
    /// Program image file (one binary literal per line, `#` comments)
    image: Option<PathBuf>,

    /// Print a trace row to stderr before every instruction
    #[arg(long)]
    trace: bool,

    /// Stop after this many cycles even without HLT
    #[arg(long, default_value_t = 1_000_000)]
    max_cycles: u64,

    /// Suppress PRN echo on stdout
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let path = args.image.ok_or(LoaderError::MissingArgument)?;
    let program = octo_loader::read_image(&path)?;
    tracing::info!(image = %path.display(), bytes = program.len(), "program loaded");

    let config = MachineConfig {
        max_cycles: args.max_cycles,
        trace: args.trace,
        echo: !args.quiet,
    };
    let mut machine = Machine::with_program(&program, config)?;
    let result = machine.run()?;
    tracing::info!(cycles = result.cycles, reason = ?result.halt_reason, "machine stopped");

    Ok(())
}
