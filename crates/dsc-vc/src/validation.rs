//! # Credential validation
//!
//! Checks an arbitrary JSON value against the credential envelope and the
//! Dynamic Scoliosis domain rules.
//!
//! Validation never fails: every applicable problem is accumulated into a
//! [`ValidationReport`], hard errors separately from warnings. Structurally
//! empty input (`{}`, `null`, an array) still yields a report.
//!
//! ## Rules
//!
//! - Structural: required envelope fields, `@context` list containing the
//!   base URI, `type` list containing `VerifiableCredential`, DID issuer,
//!   ISO 8601 dates, object subject.
//! - Domain: practitioner subjects need `credentialLevel` (one of the five
//!   levels) and `description`; patient health records need `patientId`.
//! - Warnings: demo signature in `proof.jws`, `expirationDate` not in the
//!   future.

use serde::Serialize;
use serde_json::Value;

use dsc_core::Timestamp;

use crate::config::{CredentialLevel, CredentialVariant};
use crate::credential::{BASE_CONTEXT, VC_TYPE};
use crate::proof::DEMO_SIGNATURE;

/// Envelope fields every credential must carry.
const REQUIRED_FIELDS: [&str; 5] = [
    "@context",
    "type",
    "issuer",
    "issuanceDate",
    "credentialSubject",
];

const DATE_FIELDS: [&str; 2] = ["issuanceDate", "expirationDate"];

const PRACTITIONER_REQUIRED: [&str; 2] = ["credentialLevel", "description"];

const PATIENT_REQUIRED: [&str; 1] = ["patientId"];

/// Descriptive facts extracted while validating.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationInfo {
    /// The `type` list, or empty when it is missing or not a list.
    pub credential_types: Vec<String>,
    pub issuer: Option<String>,
    pub subject_name: Option<String>,
}

/// Outcome of validating one credential.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: ValidationInfo,
}

/// Validate a credential against the current time.
pub fn validate_credential(credential: &Value) -> ValidationReport {
    validate_credential_at(credential, Timestamp::now())
}

/// Validate a credential, judging expiry against `now`.
pub fn validate_credential_at(credential: &Value, now: Timestamp) -> ValidationReport {
    let mut errors = structural_errors(credential);
    errors.extend(domain_errors(credential));

    let mut warnings = Vec::new();
    let jws = credential
        .get("proof")
        .and_then(|p| p.get("jws"))
        .and_then(Value::as_str);
    if jws == Some(DEMO_SIGNATURE) {
        warnings.push("Using demo signature - not suitable for production".to_string());
    }
    if let Some(expiry) = credential
        .get("expirationDate")
        .and_then(Value::as_str)
        .and_then(|s| Timestamp::parse_iso8601(s).ok())
    {
        if expiry <= now {
            warnings.push("Credential has expired".to_string());
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        info: extract_info(credential),
    }
}

fn structural_errors(credential: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if credential.get(field).is_none() {
            errors.push(format!("Missing required field: {field}"));
        }
    }

    if let Some(context) = credential.get("@context") {
        match context.as_array() {
            Some(entries) if !entries.is_empty() => {
                if !entries.iter().any(|e| e == BASE_CONTEXT) {
                    errors.push(format!("@context must include {BASE_CONTEXT}"));
                }
            }
            _ => errors.push("@context must be a non-empty array".to_string()),
        }
    }

    if let Some(types) = credential.get("type") {
        let has_marker = types
            .as_array()
            .is_some_and(|entries| entries.iter().any(|t| t == VC_TYPE));
        if !has_marker {
            errors.push(format!("type must be an array containing '{VC_TYPE}'"));
        }
    }

    if let Some(issuer) = credential.get("issuer") {
        let is_did = issuer.as_str().is_some_and(|s| s.starts_with("did:"));
        if !is_did {
            errors.push("issuer must be a DID string".to_string());
        }
    }

    for field in DATE_FIELDS {
        if let Some(value) = credential.get(field) {
            let parses = value
                .as_str()
                .is_some_and(|s| Timestamp::parse_iso8601(s).is_ok());
            if !parses {
                errors.push(format!("{field} must be a valid ISO 8601 date"));
            }
        }
    }

    if let Some(subject) = credential.get("credentialSubject") {
        if !subject.is_object() {
            errors.push("credentialSubject must be an object".to_string());
        }
    }

    errors
}

fn domain_errors(credential: &Value) -> Vec<String> {
    let Some(subject) = credential.get("credentialSubject") else {
        return vec!["Missing credentialSubject".to_string()];
    };
    let types = type_list(credential);
    let has_type = |variant: CredentialVariant| types.iter().any(|t| t == variant.type_name());

    let mut errors = Vec::new();
    if has_type(CredentialVariant::Practitioner) {
        for field in PRACTITIONER_REQUIRED {
            if subject.get(field).is_none() {
                errors.push(format!("Missing required practitioner field: {field}"));
            }
        }
        if let Some(level) = subject.get("credentialLevel") {
            let known = level
                .as_str()
                .is_some_and(|s| s.parse::<CredentialLevel>().is_ok());
            if !known {
                errors.push(format!("Invalid credentialLevel: {}", display_value(level)));
            }
        }
    } else if has_type(CredentialVariant::PatientRecord) {
        for field in PATIENT_REQUIRED {
            if subject.get(field).is_none() {
                errors.push(format!("Missing required patient field: {field}"));
            }
        }
    }
    errors
}

fn extract_info(credential: &Value) -> ValidationInfo {
    ValidationInfo {
        credential_types: type_list(credential),
        issuer: credential.get("issuer").map(display_value),
        subject_name: credential
            .get("credentialSubject")
            .and_then(|s| s.get("name"))
            .map(display_value),
    }
}

/// String entries of the `type` list.
pub(crate) fn type_list(credential: &Value) -> Vec<String> {
    credential
        .get("type")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Strings without quotes, anything else as compact JSON.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
