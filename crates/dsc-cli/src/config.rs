//! # Configuration files
//!
//! Loading and saving [`CredentialFile`]s, the on-disk form of a credential
//! configuration plus its QR settings, and the built-in example configs.
//!
//! `.yaml`/`.yml` files are read as YAML; every other extension as JSON.
//! Configs are always written as indented JSON.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use dsc_qr::QrConfig;
use dsc_vc::{
    CredentialConfig, CredentialLevel, CredentialVariant, EmergencyContact, IssuerConfig,
    MedicalAlert, PatientClaims, PractitionerClaims, ProofConfig, SubjectConfig,
};

/// Issuer used when generating from flags without a config file.
pub const DEFAULT_ISSUER_DID: &str = "did:web:kim-clinic.example";
const DEFAULT_ISSUER_NAME: &str = "Dr. Kim's Dynamic Scoliosis Clinic";
const DEFAULT_SUBJECT_NAME: &str = "Kim Johnson";
const DEFAULT_PATIENT_ID: &str = "P123456";

/// A configuration file: the credential config with a `qr_config` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialFile {
    #[serde(flatten)]
    pub credential: CredentialConfig,
    #[serde(default)]
    pub qr_config: QrConfig,
}

impl From<CredentialConfig> for CredentialFile {
    fn from(credential: CredentialConfig) -> Self {
        Self {
            credential,
            qr_config: QrConfig::default(),
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

/// Load a configuration file, choosing the format by extension.
pub fn load_config(path: &Path) -> Result<CredentialFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("configuration file not found: {}", path.display()))?;
    let file = if is_yaml(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?
    };
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(file)
}

/// Save a configuration as indented JSON, creating parent directories.
pub fn save_config(config: &CredentialFile, path: &Path) -> Result<()> {
    crate::write_json_pretty(path, config)?;
    tracing::info!(path = %path.display(), "saved configuration");
    Ok(())
}

/// Build a configuration from command-line flags, filling the rest with
/// defaults.
pub fn quick_config(
    variant: CredentialVariant,
    subject_name: Option<&str>,
    issuer_did: Option<&str>,
) -> Result<CredentialFile> {
    let did = issuer_did.unwrap_or(DEFAULT_ISSUER_DID);
    let issuer = IssuerConfig::new(did, DEFAULT_ISSUER_NAME, format!("{did}#key-1"))
        .context("invalid --issuer")?;
    let (practitioner, patient_record) = match variant {
        CredentialVariant::Practitioner => (
            Some(PractitionerClaims::at_level(CredentialLevel::Level1)),
            None,
        ),
        CredentialVariant::PatientRecord
        | CredentialVariant::EmergencyContact
        | CredentialVariant::MedicalAlert => (None, Some(PatientClaims::with_id(DEFAULT_PATIENT_ID))),
    };
    Ok(CredentialConfig {
        credential_type: variant,
        issuer,
        subject: SubjectConfig::named(subject_name.unwrap_or(DEFAULT_SUBJECT_NAME)),
        practitioner,
        patient_record,
        proof: ProofConfig::default(),
        custom_context: Default::default(),
        expiry_date: None,
    }
    .into())
}

/// Example practitioner training credential.
pub fn practitioner_example() -> Result<CredentialFile> {
    let mut practitioner = PractitionerClaims::at_level(CredentialLevel::Level1);
    practitioner.training_hours = Some(40);
    practitioner.specializations = vec![
        "Dynamic Scoliosis Assessment".to_string(),
        "Treatment Planning".to_string(),
    ];
    Ok(CredentialConfig {
        credential_type: CredentialVariant::Practitioner,
        issuer: IssuerConfig::new(
            "did:web:kim-clinic.example",
            "Dr. Kim's Dynamic Scoliosis Training Center",
            "did:web:kim-clinic.example#key-1",
        )?,
        subject: SubjectConfig {
            email: Some("practitioner@example.com".to_string()),
            organization: Some("Example Medical Center".to_string()),
            ..SubjectConfig::named("Example Practitioner")
        },
        practitioner: Some(practitioner),
        patient_record: None,
        proof: ProofConfig::default(),
        custom_context: Default::default(),
        expiry_date: None,
    }
    .into())
}

/// Example patient health record credential.
pub fn patient_example() -> Result<CredentialFile> {
    let record = PatientClaims {
        blood_type: Some("O+".to_string()),
        emergency_contacts: vec![EmergencyContact {
            name: "Emergency Contact".to_string(),
            relationship: "Spouse".to_string(),
            phone: "+1-555-0123".to_string(),
            email: Some("emergency@example.com".to_string()),
        }],
        medical_alerts: vec![MedicalAlert {
            condition: "Dynamic Scoliosis".to_string(),
            severity: "medium".to_string(),
            treatment: Some("Physical therapy recommended".to_string()),
            medications: Vec::new(),
            allergies: Vec::new(),
        }],
        allergies: vec!["Penicillin".to_string()],
        scoliosis_type: Some("dynamic".to_string()),
        curve_degree: Some(25.5),
        ..PatientClaims::with_id(DEFAULT_PATIENT_ID)
    };
    Ok(CredentialConfig {
        credential_type: CredentialVariant::PatientRecord,
        issuer: IssuerConfig::new(
            "did:web:hospital.example",
            "Example Hospital System",
            "did:web:hospital.example#key-1",
        )?,
        subject: SubjectConfig::named("Example Patient"),
        practitioner: None,
        patient_record: Some(record),
        proof: ProofConfig::default(),
        custom_context: Default::default(),
        expiry_date: None,
    }
    .into())
}
