//! # dsc-cli — CLI Tool for Dynamic Scoliosis Credentials
//!
//! Provides the `ds-credentials` command-line interface over `dsc-vc` and
//! `dsc-qr`.
//!
//! ## Subcommands
//!
//! - `ds-credentials generate` — Assemble a credential from a config file or
//!   flags, write `credential.json` and a QR image.
//! - `ds-credentials validate` — Structural and domain checks on a credential
//!   file.
//! - `ds-credentials decode-qr` — Decode a `VC:` payload back to JSON.
//! - `ds-credentials create-config` — Write example configuration files.
//! - `ds-credentials summary` — Print the key facts of a credential file.
//!
//! ```bash
//! ds-credentials create-config --output config
//! ds-credentials generate --config config/practitioner_config.json --output out
//! ds-credentials validate out/credential.json --show-info
//! ```

pub mod config;
pub mod decode;
pub mod generate;
pub mod scaffold;
pub mod summary;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

/// Write `value` as indented UTF-8 JSON, creating parent directories.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let mut json = serde_json::to_string_pretty(value).context("failed to serialize JSON")?;
    json.push('\n');
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Read a JSON file as an untyped value.
pub fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Print label/value rows with the labels aligned.
pub fn print_rows(rows: &[(&str, String)]) {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
        println!("  {:<width$}  {value}", format!("{label}:"), width = width + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_roundtrip_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/doc.json");
        let doc = json!({"name": "José Müller", "n": 1});
        write_json_pretty(&path, &doc).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("José Müller"));
        assert!(text.contains("\n  \"n\": 1"));
        assert_eq!(read_json(&path).unwrap(), doc);
    }

    #[test]
    fn read_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = read_json(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
