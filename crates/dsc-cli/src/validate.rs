//! # Validate Subcommand
//!
//! Runs the structural and domain checks from `dsc_vc::validate_credential`
//! against a credential file and prints the report. Exits 1 when the
//! credential is invalid.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use dsc_vc::{validate_credential, ValidationReport};

/// Arguments for the `ds-credentials validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the credential JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Also print the types, issuer and subject found in the credential.
    #[arg(long)]
    pub show_info: bool,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let credential = crate::read_json(&args.file)?;
    let report = validate_credential(&credential);
    print!("{}", render_report(&report, args.show_info));
    Ok(if report.is_valid { 0 } else { 1 })
}

fn render_report(report: &ValidationReport, show_info: bool) -> String {
    let mut out = String::new();
    out.push_str(if report.is_valid {
        "OK: credential is valid\n"
    } else {
        "FAIL: credential is invalid\n"
    });
    if !report.errors.is_empty() {
        out.push_str("\nErrors:\n");
        for error in &report.errors {
            out.push_str(&format!("  - {error}\n"));
        }
    }
    if !report.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for warning in &report.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }
    if show_info {
        let info = &report.info;
        out.push_str("\nInformation:\n");
        out.push_str(&format!(
            "  - credential_types: {}\n",
            info.credential_types.join(", ")
        ));
        if let Some(issuer) = &info.issuer {
            out.push_str(&format!("  - issuer: {issuer}\n"));
        }
        if let Some(name) = &info.subject_name {
            out.push_str(&format!("  - subject_name: {name}\n"));
        }
    }
    out
}
