//! # Generate Subcommand
//!
//! Assembles a credential from a configuration file, or from `--type`,
//! `--name` and `--issuer` with defaults for everything else, then writes
//! `credential.json` and `credential_qr.{png,svg}` into the output directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use dsc_qr::{default_renderer, estimate_capacity, render_to_file, QrRenderer, SvgRenderer};
use dsc_vc::{CredentialDocument, CredentialSummary, CredentialVariant, DocumentAssembler};

use crate::config::{self, CredentialFile};

/// Arguments for the `ds-credentials generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Configuration file (JSON, or YAML for .yaml/.yml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory for generated files.
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Credential type when no config file is given.
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub credential_type: Option<CredentialVariant>,

    /// Name of the credential subject.
    #[arg(short, long)]
    pub name: Option<String>,

    /// DID of the credential issuer.
    #[arg(short, long)]
    pub issuer: Option<String>,

    /// Skip QR code generation.
    #[arg(long)]
    pub no_qr: bool,

    /// Render the QR code as SVG instead of PNG.
    #[arg(long)]
    pub svg: bool,
}

/// Paths written by a generate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub credential: PathBuf,
    pub qr_image: Option<PathBuf>,
}

/// Execute the generate subcommand.
pub fn run_generate(args: &GenerateArgs) -> Result<u8> {
    let file = match &args.config {
        Some(path) => {
            if args.credential_type.is_some() || args.name.is_some() || args.issuer.is_some() {
                tracing::warn!("--type, --name and --issuer are ignored when --config is given");
            }
            config::load_config(path)?
        }
        None => config::quick_config(
            args.credential_type.unwrap_or(CredentialVariant::Practitioner),
            args.name.as_deref(),
            args.issuer.as_deref(),
        )?,
    };

    let renderer: Box<dyn QrRenderer> = if args.svg {
        Box::new(SvgRenderer)
    } else {
        default_renderer()
    };
    let (document, files) = generate(&file, &args.output, (!args.no_qr).then_some(renderer.as_ref()))?;

    println!("OK: generated credential: {}", files.credential.display());
    if let Some(qr_path) = &files.qr_image {
        let report = estimate_capacity(&document, file.qr_config.use_compression)
            .context("failed to measure QR payload")?;
        println!("OK: generated QR code: {}", qr_path.display());
        println!("  QR payload size:   {} bytes", report.payload_bytes);
        println!("  Compression ratio: {}", report.compression_ratio());
        println!("  Recommended:       {}", report.recommended_version);
    }

    println!();
    println!("Credential summary:");
    let summary = CredentialSummary::from_value(&document.to_value()?);
    crate::print_rows(&summary.rows());
    Ok(0)
}

/// Assemble the credential described by `file` and write it, plus a QR image
/// when a renderer is given, into `output_dir`.
pub fn generate(
    file: &CredentialFile,
    output_dir: &Path,
    renderer: Option<&dyn QrRenderer>,
) -> Result<(CredentialDocument, GeneratedFiles)> {
    let options = file
        .qr_config
        .render_options()
        .context("invalid qr_config")?;
    let assembly = DocumentAssembler::new()
        .assemble_config(&file.credential)
        .context("failed to assemble credential")?;
    for warning in &assembly.warnings {
        tracing::warn!("{warning}");
    }
    let document = assembly.document;

    let credential_path = output_dir.join("credential.json");
    crate::write_json_pretty(&credential_path, &document)?;
    tracing::info!(id = %document.id, path = %credential_path.display(), "saved credential");

    let qr_image = match renderer {
        Some(renderer) => {
            let payload = dsc_qr::encode(&document, file.qr_config.use_compression)
                .context("failed to encode QR payload")?;
            let path = output_dir.join(format!("credential_qr.{}", renderer.extension()));
            render_to_file(renderer, payload.as_str(), &options, &path)
                .context("failed to render QR code")?;
            Some(path)
        }
        None => None,
    };

    Ok((
        document,
        GeneratedFiles {
            credential: credential_path,
            qr_image,
        },
    ))
}
