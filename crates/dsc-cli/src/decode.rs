//! # Decode Subcommand
//!
//! Decodes a `VC:` transport payload and prints the credential JSON, or
//! writes it to `--output`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

/// Arguments for the `ds-credentials decode-qr` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// The payload scanned from a QR code, starting with `VC:`.
    #[arg(value_name = "PAYLOAD")]
    pub payload: String,

    /// Write the decoded credential to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the decode-qr subcommand.
pub fn run_decode(args: &DecodeArgs) -> Result<u8> {
    let credential: Value =
        dsc_qr::decode(args.payload.trim()).context("failed to decode QR payload")?;
    match &args.output {
        Some(path) => {
            crate::write_json_pretty(path, &credential)?;
            println!("OK: decoded credential saved to: {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&credential)?),
    }
    Ok(0)
}
