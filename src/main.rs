// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Plateau Navigator command-line tool
//!
//! # Usage
//!
//! ```bash
//! # Show effective configuration
//! plateau-nav config
//!
//! # Validate a configuration file
//! plateau-nav --config plateau.yaml validate
//!
//! # Exact ground-state energy of a Hamiltonian file
//! plateau-nav ground-state --hamiltonian h2.yaml
//!
//! # List supported gates
//! plateau-nav gates
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use plateau_navigator::{
    circuit::Gate, config::LoggingConfig, hamiltonian::Hamiltonian, Config, Result, VERSION,
};

/// Variational quantum eigensolver toolkit
#[derive(Parser)]
#[command(name = "plateau-nav")]
#[command(author = "Plateau Navigator Contributors")]
#[command(version = VERSION)]
#[command(about = "VQE engine with barren plateau detection")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,

    /// Exact ground state of a Hamiltonian file
    GroundState {
        /// YAML or JSON file with `real` and optional `imag` rows
        #[arg(long, env = "PLATEAU_HAMILTONIAN")]
        hamiltonian: PathBuf,

        /// Also print the ground-state amplitudes
        #[arg(long)]
        state: bool,
    },

    /// List supported gates
    Gates,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging);

    match cli.command {
        Commands::Config => {
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => match config.validate() {
            Ok(()) => {
                println!("Configuration is valid");
            }
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::GroundState { hamiltonian, state } => {
            let h = Hamiltonian::load(&hamiltonian)?;
            let ground = h.ground_state();
            info!(
                path = %hamiltonian.display(),
                dim = h.dim(),
                energy = ground.energy,
                "Exact ground state computed"
            );

            println!("Dimension:    {}", h.dim());
            if let Some(n) = h.num_qubits() {
                println!("Qubits:       {}", n);
            }
            println!("Ground energy: {:.12}", ground.energy);
            println!("Spectrum:     {:?}", h.eigenvalues());
            if state {
                println!("Ground state:");
                for (index, amplitude) in ground.state.iter().enumerate() {
                    println!("  |{}> {:+.6} {:+.6}i", index, amplitude.re, amplitude.im);
                }
            }
        }

        Commands::Gates => {
            println!("Supported gates:");
            for gate in Gate::ALL {
                let keys = gate.param_keys();
                let params = if keys.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", keys.join(", "))
                };
                println!("  {:<4} qubits={}{}", gate.mnemonic(), gate.arity(), params);
            }
        }
    }

    Ok(())
}

/// Initialize logging with tracing.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}
