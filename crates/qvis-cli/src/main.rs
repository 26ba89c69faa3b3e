//! qvis Command-Line Interface
//!
//! Simulates small quantum circuits by statevector evolution and prints the
//! resulting amplitudes, probabilities and per-qubit marginals.
//!
//! ```text
//! qvis simulate --example bell_state
//! qvis simulate -i circuit.json --format json --shots 1024 --seed 7
//! qvis examples --name quantum_fourier_transform
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

mod commands;
mod logging;

use commands::{examples, simulate, version};
use qvis_sim::SimulatorConfig;

/// qvis - statevector simulation of small quantum circuits
#[derive(Parser)]
#[command(name = "qvis")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Simulator configuration file (YAML)
    #[arg(short, long, global = true, env = "QVIS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a circuit and print the final state
    Simulate {
        /// Request file (JSON)
        #[arg(short, long, conflicts_with = "example", required_unless_present = "example")]
        input: Option<PathBuf>,

        /// Built-in example circuit to simulate
        #[arg(short, long)]
        example: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Sample this many measurement shots from the final state
        #[arg(short, long)]
        shots: Option<u32>,

        /// Seed for shot sampling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List built-in example circuits
    Examples {
        /// Print the request document of one example
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show version information
    Version,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = SimulatorConfig::load(cli.config.as_deref())?;
    logging::init(cli.verbose, &config.logging)?;

    match cli.command {
        Commands::Simulate {
            input,
            example,
            format,
            shots,
            seed,
        } => simulate::execute(
            &config,
            input.as_deref(),
            example.as_deref(),
            &format,
            shots,
            seed,
        ),

        Commands::Examples { name } => examples::execute(&config, name.as_deref()),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
