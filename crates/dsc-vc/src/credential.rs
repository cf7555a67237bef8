//! # Credential document envelope
//!
//! Defines [`CredentialDocument`], the assembled W3C-style credential, and
//! [`VcError`], the error type of the assembly path.
//!
//! The envelope is rigid: context, identifier, two-entry type list, issuer
//! DID, issuance instant, subject, proof and optional expiry. The subject is
//! kept as an open JSON object because its shape depends on the variant.
//!
//! ## Field Naming
//!
//! Serde rename attributes map between Rust snake_case and the W3C JSON
//! names (`@context`, `issuanceDate`, `credentialSubject`, ...). Field
//! declaration order is the on-disk key order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dsc_core::{CredentialId, Did, Timestamp, ValidationError};

use crate::config::CredentialVariant;
use crate::proof::Proof;

/// Base W3C credentials context. Always the first `@context` entry.
pub const BASE_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// schema.org vocabulary. Always the second `@context` entry.
pub const SCHEMA_ORG_CONTEXT: &str = "https://schema.org";

/// Type marker. Always the first `type` entry.
pub const VC_TYPE: &str = "VerifiableCredential";

/// Errors from credential configuration and assembly.
#[derive(Error, Debug)]
pub enum VcError {
    /// The configuration does not satisfy the variant/claims pairing.
    #[error("configuration error for {variant} credential: {reason}")]
    Configuration {
        /// The requested variant.
        variant: CredentialVariant,
        /// What is missing or mismatched.
        reason: String,
    },

    /// A real signature was requested; only demo signatures exist.
    #[error("real signature generation not implemented (enable use_demo_signature)")]
    UnimplementedSigning,

    /// A domain primitive failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An assembled credential document.
///
/// Created fresh by one assembly call. There is no mutation API; callers
/// persist, encode or inspect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialDocument {
    /// JSON-LD contexts: two fixed URIs, the variant entry, then the
    /// optional custom entry.
    #[serde(rename = "@context")]
    pub context: Vec<serde_json::Value>,

    /// `urn:uuid:<v4>` identifier.
    pub id: CredentialId,

    /// `["VerifiableCredential", <variant type name>]`.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,

    /// Issuer DID.
    pub issuer: Did,

    /// Issuance instant; identical to `proof.created`.
    #[serde(rename = "issuanceDate")]
    pub issuance_date: Timestamp,

    /// Variant-shaped claims object.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: serde_json::Value,

    /// Proof block.
    pub proof: Proof,

    #[serde(
        rename = "expirationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<Timestamp>,
}

impl CredentialDocument {
    /// The variant named by the `type` list, if any entry is a known type name.
    pub fn variant(&self) -> Option<CredentialVariant> {
        self.credential_type
            .iter()
            .find_map(|t| CredentialVariant::from_type_name(t))
    }

    /// Serialize into a JSON value, e.g. for validation.
    pub fn to_value(&self) -> Result<serde_json::Value, VcError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Render as indented JSON with non-ASCII characters preserved.
    pub fn to_pretty_json(&self) -> Result<String, VcError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::{ProofPurpose, ProofType};
    use serde_json::json;

    fn sample() -> CredentialDocument {
        let created = Timestamp::parse_iso8601("2026-01-15T12:00:00Z").unwrap();
        CredentialDocument {
            context: vec![json!(BASE_CONTEXT), json!(SCHEMA_ORG_CONTEXT)],
            id: CredentialId::new_v4(),
            credential_type: vec![
                VC_TYPE.to_string(),
                "MedicalAlertCredential".to_string(),
            ],
            issuer: Did::new("did:web:hospital.example").unwrap(),
            issuance_date: created,
            credential_subject: json!({"name": "José Álvarez", "patientId": "P1"}),
            proof: Proof::demo(
                ProofType::default(),
                ProofPurpose::default(),
                "did:web:hospital.example#key-1".to_string(),
                created,
            ),
            expiration_date: None,
        }
    }

    #[test]
    fn serializes_w3c_field_names_in_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        let order = [
            "\"@context\"",
            "\"id\"",
            "\"type\"",
            "\"issuer\"",
            "\"issuanceDate\"",
            "\"credentialSubject\"",
            "\"proof\"",
        ];
        let positions: Vec<usize> = order.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
        assert!(!json.contains("expirationDate"));
    }

    #[test]
    fn variant_from_type_list() {
        assert_eq!(sample().variant(), Some(CredentialVariant::MedicalAlert));
    }

    #[test]
    fn pretty_json_preserves_non_ascii() {
        let pretty = sample().to_pretty_json().unwrap();
        assert!(pretty.contains("José Álvarez"));
        assert!(pretty.contains("\n  \"id\""));
    }

    #[test]
    fn deserialize_roundtrip() {
        let doc = sample();
        let value = doc.to_value().unwrap();
        let back: CredentialDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn configuration_error_display() {
        let err = VcError::Configuration {
            variant: CredentialVariant::Practitioner,
            reason: "practitioner fields required".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("practitioner credential"));
        assert!(msg.contains("practitioner fields required"));
    }
}
