//! # Credential configuration model
//!
//! Typed configuration consumed by the [`DocumentAssembler`](crate::DocumentAssembler).
//! Field names follow the snake_case layout of the JSON/YAML configuration
//! files. Identifiers and URLs are validated when the configuration is
//! deserialized; the variant/claims pairing is validated by
//! [`CredentialConfig::claims()`] before any assembly work starts.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use dsc_core::{Did, Timestamp, ValidationError};

use crate::credential::VcError;
use crate::proof::{ProofPurpose, ProofType};

/// Context URL used when the issuer does not configure one.
pub const DEFAULT_CONTEXT_URL: &str = "https://example.com/credentials/ds-practitioner";

/// Path segment in the issuer context URL that names the practitioner context.
///
/// Patient-family variants derive their context URL by replacing it.
const PRACTITIONER_CONTEXT_SEGMENT: &str = "ds-practitioner";

/// Default practitioner credential description.
pub const DEFAULT_PRACTITIONER_DESCRIPTION: &str =
    "Completed foundational training in Dynamic Scoliosis assessment & management.";

// ---------------------------------------------------------------------------
// Variants and levels
// ---------------------------------------------------------------------------

/// The four supported credential shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialVariant {
    /// Practitioner training credential.
    Practitioner,
    /// Full patient health record.
    PatientRecord,
    /// Patient record presented as an emergency-contact card.
    EmergencyContact,
    /// Patient record presented as a medical-alert card.
    MedicalAlert,
}

impl CredentialVariant {
    /// Every variant, in declaration order.
    pub const ALL: [CredentialVariant; 4] = [
        CredentialVariant::Practitioner,
        CredentialVariant::PatientRecord,
        CredentialVariant::EmergencyContact,
        CredentialVariant::MedicalAlert,
    ];

    /// The configuration spelling (`practitioner`, `patient_record`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialVariant::Practitioner => "practitioner",
            CredentialVariant::PatientRecord => "patient_record",
            CredentialVariant::EmergencyContact => "emergency_contact",
            CredentialVariant::MedicalAlert => "medical_alert",
        }
    }

    /// The credential type name written into the document `type` array.
    pub fn type_name(&self) -> &'static str {
        match self {
            CredentialVariant::Practitioner => "DynamicScoliosisPractitionerCredential",
            CredentialVariant::PatientRecord => "PatientHealthRecordCredential",
            CredentialVariant::EmergencyContact => "EmergencyContactCredential",
            CredentialVariant::MedicalAlert => "MedicalAlertCredential",
        }
    }

    /// Look up a variant by its document type name.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.type_name() == name)
    }

    /// Whether this variant carries practitioner claims.
    pub fn is_practitioner(&self) -> bool {
        matches!(self, CredentialVariant::Practitioner)
    }

    /// Derive this variant's context URL from the issuer's base URL.
    ///
    /// Practitioner uses the URL unchanged; the patient family substitute
    /// their own slug for `ds-practitioner`.
    pub fn context_url(&self, base: &str) -> String {
        let slug = match self {
            CredentialVariant::Practitioner => return base.to_string(),
            CredentialVariant::PatientRecord => "patient-record",
            CredentialVariant::EmergencyContact => "emergency-contact",
            CredentialVariant::MedicalAlert => "medical-alert",
        };
        base.replace(PRACTITIONER_CONTEXT_SEGMENT, slug)
    }
}

impl std::fmt::Display for CredentialVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialVariant {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownValue {
                field: "credential_type",
                value: s.to_string(),
                expected: Self::ALL.map(|v| v.as_str()).join(", "),
            })
    }
}

/// Practitioner certification level, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CredentialLevel {
    #[serde(rename = "Level 1")]
    Level1,
    #[serde(rename = "Level 2")]
    Level2,
    #[serde(rename = "Level 3")]
    Level3,
    Certified,
    Expert,
}

impl CredentialLevel {
    /// Every level, lowest first.
    pub const ALL: [CredentialLevel; 5] = [
        CredentialLevel::Level1,
        CredentialLevel::Level2,
        CredentialLevel::Level3,
        CredentialLevel::Certified,
        CredentialLevel::Expert,
    ];

    /// The literal written into `credentialLevel`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialLevel::Level1 => "Level 1",
            CredentialLevel::Level2 => "Level 2",
            CredentialLevel::Level3 => "Level 3",
            CredentialLevel::Certified => "Certified",
            CredentialLevel::Expert => "Expert",
        }
    }
}

impl std::fmt::Display for CredentialLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownValue {
                field: "credentialLevel",
                value: s.to_string(),
                expected: Self::ALL.map(|l| l.as_str()).join(", "),
            })
    }
}

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

/// An http(s) URL, normalized by the `url` crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContextUrl(String);

impl ContextUrl {
    /// Parse and normalize a context URL.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidUrl`] for unparseable URLs and for
    /// schemes other than `http`/`https`.
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let parsed = url::Url::parse(value).map_err(|e| ValidationError::InvalidUrl {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl {
                value: value.to_string(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }
        Ok(Self(parsed.to_string()))
    }

    /// Access the normalized URL text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ContextUrl {
    fn default() -> Self {
        Self(DEFAULT_CONTEXT_URL.to_string())
    }
}

impl<'de> Deserialize<'de> for ContextUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// The credential issuer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuerConfig {
    /// Issuer DID, written to the document `issuer` field.
    pub did: Did,
    /// Human-readable issuer name.
    pub name: String,
    /// Verification method, e.g. `did:web:example.com#key-1`.
    pub verification_method: String,
    /// Base URL from which variant context URLs are derived.
    #[serde(default)]
    pub context_url: ContextUrl,
}

impl IssuerConfig {
    /// Build an issuer with the default context URL.
    pub fn new(
        did: &str,
        name: impl Into<String>,
        verification_method: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            did: Did::new(did)?,
            name: name.into(),
            verification_method: verification_method.into(),
            context_url: ContextUrl::default(),
        })
    }
}

/// The credential subject.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubjectConfig {
    /// Subject DID, written as `credentialSubject.id` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did: Option<Did>,
    /// Full name of the subject.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Organization or clinic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl SubjectConfig {
    /// A subject with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

fn default_description() -> String {
    DEFAULT_PRACTITIONER_DESCRIPTION.to_string()
}

/// Practitioner-specific claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PractitionerClaims {
    pub level: CredentialLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_hours: Option<u32>,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default = "default_description")]
    pub description: String,
}

impl PractitionerClaims {
    /// Claims with only a level; everything else defaulted.
    pub fn at_level(level: CredentialLevel) -> Self {
        Self {
            level,
            completion_date: None,
            training_hours: None,
            specializations: Vec::new(),
            description: default_description(),
        }
    }
}

/// An emergency contact on a patient record.
///
/// Serialized unchanged into `credentialSubject.emergencyContacts`, always
/// with `name`, `relationship`, `phone` and `email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
    /// Written as `null` when absent so every contact has four keys.
    #[serde(default)]
    pub email: Option<String>,
}

/// A medical alert on a patient record.
///
/// Serialized unchanged into `credentialSubject.medicalAlerts`, always with
/// all five fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalAlert {
    pub condition: String,
    /// Free-form severity (low, medium, high, critical).
    pub severity: String,
    /// Written as `null` when absent so every alert has five keys.
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

/// Patient-record claims, shared by the three patient-family variants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatientClaims {
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub emergency_contacts: Vec<EmergencyContact>,
    #[serde(default)]
    pub medical_alerts: Vec<MedicalAlert>,
    #[serde(default)]
    pub current_medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medical_devices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_physician: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoliosis_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve_degree: Option<f64>,
    /// When the record was last updated; `None` means "at assembly time".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<Timestamp>,
}

impl PatientClaims {
    /// A record carrying only the patient identifier.
    pub fn with_id(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            ..Self::default()
        }
    }
}

/// Type-specific claims, one case per subject shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Claims {
    Practitioner(PractitionerClaims),
    Patient(PatientClaims),
}

impl Claims {
    /// Whether these claims may be used for `variant`.
    pub fn fits(&self, variant: CredentialVariant) -> bool {
        match variant {
            CredentialVariant::Practitioner => matches!(self, Claims::Practitioner(_)),
            CredentialVariant::PatientRecord
            | CredentialVariant::EmergencyContact
            | CredentialVariant::MedicalAlert => matches!(self, Claims::Patient(_)),
        }
    }

    /// Short name of the claims shape, for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Claims::Practitioner(_) => "practitioner claims",
            Claims::Patient(_) => "patient claims",
        }
    }
}

// ---------------------------------------------------------------------------
// Proof and top-level configuration
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// Proof block settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofConfig {
    #[serde(rename = "type", default)]
    pub proof_type: ProofType,
    #[serde(default)]
    pub purpose: ProofPurpose,
    /// Emit the placeholder signature. Disabling it requests real signing,
    /// which is not implemented and fails assembly.
    #[serde(default = "default_true")]
    pub use_demo_signature: bool,
}

impl Default for ProofConfig {
    fn default() -> Self {
        Self {
            proof_type: ProofType::default(),
            purpose: ProofPurpose::default(),
            use_demo_signature: true,
        }
    }
}

/// Everything needed to assemble one credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialConfig {
    pub credential_type: CredentialVariant,
    pub issuer: IssuerConfig,
    pub subject: SubjectConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practitioner: Option<PractitionerClaims>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_record: Option<PatientClaims>,
    #[serde(default)]
    pub proof: ProofConfig,
    /// Extra `@context` entry appended last, verbatim. Empty means none.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub custom_context: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<Timestamp>,
}

impl CredentialConfig {
    /// Select the claims matching `credential_type`.
    ///
    /// This is the configuration validation stage: it runs before assembly
    /// and fails if the claims block required by the variant is missing.
    ///
    /// # Errors
    ///
    /// Returns [`VcError::Configuration`] when the required block is absent.
    pub fn claims(&self) -> Result<Claims, VcError> {
        match self.credential_type {
            CredentialVariant::Practitioner => self
                .practitioner
                .clone()
                .map(Claims::Practitioner)
                .ok_or_else(|| VcError::Configuration {
                    variant: self.credential_type,
                    reason: "practitioner fields required for practitioner credentials"
                        .to_string(),
                }),
            CredentialVariant::PatientRecord
            | CredentialVariant::EmergencyContact
            | CredentialVariant::MedicalAlert => self
                .patient_record
                .clone()
                .map(Claims::Patient)
                .ok_or_else(|| VcError::Configuration {
                    variant: self.credential_type,
                    reason: "patient record fields required for patient record credentials"
                        .to_string(),
                }),
        }
    }

    /// The custom context entry, if one was configured.
    pub fn custom_context(&self) -> Option<&Map<String, Value>> {
        (!self.custom_context.is_empty()).then_some(&self.custom_context)
    }
}
