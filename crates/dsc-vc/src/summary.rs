//! # Credential summary
//!
//! A human-readable digest of any credential-shaped JSON value, used by the
//! CLI `summary` and `generate` commands. Missing fields fall back to
//! placeholder text instead of failing.

use serde::Serialize;
use serde_json::Value;

use crate::config::CredentialVariant;
use crate::validation::{display_value, type_list};

const UNKNOWN: &str = "Unknown";

/// Fields specific to one subject shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VariantSummary {
    Practitioner {
        credential_level: String,
        description: String,
    },
    PatientRecord {
        patient_id: String,
        blood_type: String,
        has_emergency_contacts: bool,
        has_medical_alerts: bool,
    },
}

/// Summary of one credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialSummary {
    pub id: String,
    pub types: Vec<String>,
    pub issuer: String,
    pub issuance_date: String,
    pub expiration_date: String,
    pub subject_name: String,
    pub subject_id: String,
    #[serde(flatten)]
    pub details: Option<VariantSummary>,
}

fn text_or(value: Option<&Value>, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_string(), display_value)
}

fn non_empty_list(value: Option<&Value>) -> bool {
    value.and_then(Value::as_array).is_some_and(|a| !a.is_empty())
}

impl CredentialSummary {
    /// Summarize a credential value. Never fails.
    pub fn from_value(credential: &Value) -> Self {
        let types = type_list(credential);
        let subject = credential.get("credentialSubject");
        let field = |name: &str| subject.and_then(|s| s.get(name));
        let has_type = |variant: CredentialVariant| types.iter().any(|t| t == variant.type_name());

        let details = if has_type(CredentialVariant::Practitioner) {
            Some(VariantSummary::Practitioner {
                credential_level: text_or(field("credentialLevel"), UNKNOWN),
                description: text_or(field("description"), "No description"),
            })
        } else if has_type(CredentialVariant::PatientRecord) {
            Some(VariantSummary::PatientRecord {
                patient_id: text_or(field("patientId"), UNKNOWN),
                blood_type: text_or(field("bloodType"), UNKNOWN),
                has_emergency_contacts: non_empty_list(field("emergencyContacts")),
                has_medical_alerts: non_empty_list(field("medicalAlerts")),
            })
        } else {
            None
        };

        Self {
            id: text_or(credential.get("id"), UNKNOWN),
            issuer: text_or(credential.get("issuer"), UNKNOWN),
            issuance_date: text_or(credential.get("issuanceDate"), UNKNOWN),
            expiration_date: text_or(credential.get("expirationDate"), "No expiration"),
            subject_name: text_or(field("name"), UNKNOWN),
            subject_id: text_or(field("id"), "No DID"),
            types,
            details,
        }
    }

    /// Ordered label/value rows for display.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("ID", self.id.clone()),
            ("Types", self.types.join(", ")),
            ("Issuer", self.issuer.clone()),
            ("Issued", self.issuance_date.clone()),
            ("Expires", self.expiration_date.clone()),
            ("Subject", self.subject_name.clone()),
            ("Subject DID", self.subject_id.clone()),
        ];
        match &self.details {
            Some(VariantSummary::Practitioner {
                credential_level,
                description,
            }) => {
                rows.push(("Credential Level", credential_level.clone()));
                rows.push(("Description", description.clone()));
            }
            Some(VariantSummary::PatientRecord {
                patient_id,
                blood_type,
                has_emergency_contacts,
                has_medical_alerts,
            }) => {
                rows.push(("Patient ID", patient_id.clone()));
                rows.push(("Blood Type", blood_type.clone()));
                rows.push(("Emergency Contacts", yes_no(*has_emergency_contacts)));
                rows.push(("Medical Alerts", yes_no(*has_medical_alerts)));
            }
            None => {}
        }
        rows
    }
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn practitioner_summary() {
        let doc = json!({
            "id": "urn:uuid:123e4567-e89b-42d3-a456-426614174000",
            "type": ["VerifiableCredential", "DynamicScoliosisPractitionerCredential"],
            "issuer": "did:web:kim-clinic.example",
            "issuanceDate": "2026-01-15T12:00:00Z",
            "credentialSubject": {
                "name": "Example Practitioner",
                "credentialLevel": "Level 1",
                "description": "Completed training."
            }
        });
        let s = CredentialSummary::from_value(&doc);
        assert_eq!(s.expiration_date, "No expiration");
        assert_eq!(s.subject_id, "No DID");
        assert_eq!(
            s.details,
            Some(VariantSummary::Practitioner {
                credential_level: "Level 1".to_string(),
                description: "Completed training.".to_string(),
            })
        );
        let rows = s.rows();
        assert_eq!(rows[0].0, "ID");
        assert_eq!(rows.last().unwrap(), &("Description", "Completed training.".to_string()));
    }

    #[test]
    fn patient_summary_flags() {
        let doc = json!({
            "type": ["VerifiableCredential", "PatientHealthRecordCredential"],
            "credentialSubject": {
                "id": "did:example:patient",
                "name": "Example Patient",
                "patientId": "P123456",
                "emergencyContacts": [{"name": "A", "relationship": "B", "phone": "1"}],
                "medicalAlerts": []
            }
        });
        let s = CredentialSummary::from_value(&doc);
        assert_eq!(s.subject_id, "did:example:patient");
        assert_eq!(
            s.details,
            Some(VariantSummary::PatientRecord {
                patient_id: "P123456".to_string(),
                blood_type: "Unknown".to_string(),
                has_emergency_contacts: true,
                has_medical_alerts: false,
            })
        );
        let rows = s.rows();
        assert!(rows.contains(&("Emergency Contacts", "Yes".to_string())));
        assert!(rows.contains(&("Medical Alerts", "No".to_string())));
    }

    #[test]
    fn empty_input_uses_placeholders() {
        let s = CredentialSummary::from_value(&json!({}));
        assert_eq!(s.id, "Unknown");
        assert!(s.types.is_empty());
        assert_eq!(s.subject_name, "Unknown");
        assert!(s.details.is_none());
        assert_eq!(s.rows().len(), 7);
    }

    #[test]
    fn serializes_flat() {
        let doc = json!({
            "type": ["VerifiableCredential", "DynamicScoliosisPractitionerCredential"],
            "credentialSubject": {"name": "N", "credentialLevel": "Expert"}
        });
        let v = serde_json::to_value(CredentialSummary::from_value(&doc)).unwrap();
        assert_eq!(v["credential_level"], "Expert");
        assert_eq!(v["description"], "No description");
        assert_eq!(v["expiration_date"], "No expiration");
    }
}
