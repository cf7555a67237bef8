//! # Summary Subcommand

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use dsc_vc::CredentialSummary;

/// Arguments for the `ds-credentials summary` subcommand.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Path to the credential JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the summary subcommand.
pub fn run_summary(args: &SummaryArgs) -> Result<u8> {
    let credential = crate::read_json(&args.file)?;
    let summary = CredentialSummary::from_value(&credential);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Credential summary:");
        crate::print_rows(&summary.rows());
    }
    Ok(0)
}
