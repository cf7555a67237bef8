//! # Create-Config Subcommand
//!
//! Writes the example practitioner and patient configurations as starting
//! points for `generate --config`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::config::{self, CredentialFile};

/// Which example configurations to write.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigKind {
    Practitioner,
    Patient,
    #[default]
    All,
}

/// Arguments for the `ds-credentials create-config` subcommand.
#[derive(Args, Debug)]
pub struct CreateConfigArgs {
    /// Output directory for configuration files.
    #[arg(short, long, default_value = "config")]
    pub output: PathBuf,

    /// Which configuration to create.
    #[arg(short = 't', long = "type", value_enum, default_value_t = ConfigKind::All)]
    pub kind: ConfigKind,
}

/// Execute the create-config subcommand.
pub fn run_create_config(args: &CreateConfigArgs) -> Result<u8> {
    for (name, path) in write_examples(&args.output, args.kind)? {
        println!("OK: created {name} configuration: {}", path.display());
    }
    Ok(0)
}

/// Write the selected example configs into `dir`, returning what was written.
pub fn write_examples(dir: &Path, kind: ConfigKind) -> Result<Vec<(&'static str, PathBuf)>> {
    let mut examples: Vec<(&'static str, CredentialFile)> = Vec::new();
    if matches!(kind, ConfigKind::Practitioner | ConfigKind::All) {
        examples.push(("practitioner", config::practitioner_example()?));
    }
    if matches!(kind, ConfigKind::Patient | ConfigKind::All) {
        examples.push(("patient", config::patient_example()?));
    }

    let mut written = Vec::with_capacity(examples.len());
    for (name, example) in examples {
        let path = dir.join(format!("{name}_config.json"));
        config::save_config(&example, &path)?;
        written.push((name, path));
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_writes_both() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_examples(dir.path(), ConfigKind::All).unwrap();
        let names: Vec<_> = written.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["practitioner", "patient"]);
        for (_, path) in &written {
            assert!(config::load_config(path).is_ok());
        }
    }

    #[test]
    fn single_kind_writes_one() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_examples(dir.path(), ConfigKind::Patient).unwrap();
        assert_eq!(written.len(), 1);
        assert!(dir.path().join("patient_config.json").exists());
        assert!(!dir.path().join("practitioner_config.json").exists());
    }

    #[test]
    fn written_config_has_qr_section() {
        let dir = tempfile::tempdir().unwrap();
        write_examples(dir.path(), ConfigKind::Practitioner).unwrap();
        let raw = crate::read_json(&dir.path().join("practitioner_config.json")).unwrap();
        assert_eq!(raw["credential_type"], "practitioner");
        assert_eq!(raw["qr_config"]["error_correction"], "Q");
        assert_eq!(raw["practitioner"]["training_hours"], 40);
    }
}
