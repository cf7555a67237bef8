//! # ds-credentials CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dsc_cli::decode::{run_decode, DecodeArgs};
use dsc_cli::generate::{run_generate, GenerateArgs};
use dsc_cli::scaffold::{run_create_config, CreateConfigArgs};
use dsc_cli::summary::{run_summary, SummaryArgs};
use dsc_cli::validate::{run_validate, ValidateArgs};

/// Dynamic Scoliosis Credentials
///
/// Generates W3C Verifiable Credentials for practitioner training and
/// patient health records, and packs them into scannable QR codes.
#[derive(Parser, Debug)]
#[command(name = "ds-credentials", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a credential and its QR code.
    Generate(GenerateArgs),

    /// Validate a credential file.
    Validate(ValidateArgs),

    /// Decode a QR payload back to credential JSON.
    #[command(name = "decode-qr")]
    DecodeQr(DecodeArgs),

    /// Write example configuration files.
    #[command(name = "create-config")]
    CreateConfig(CreateConfigArgs),

    /// Print a summary of a credential file.
    Summary(SummaryArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "ds-credentials starting");

    let result = match cli.command {
        Commands::Generate(args) => run_generate(&args),
        Commands::Validate(args) => run_validate(&args),
        Commands::DecodeQr(args) => run_decode(&args),
        Commands::CreateConfig(args) => run_create_config(&args),
        Commands::Summary(args) => run_summary(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
