//! # Document assembly
//!
//! [`DocumentAssembler`] maps a typed configuration onto a
//! [`CredentialDocument`]. Apart from reading its injected [`Clock`] and
//! [`IdSource`] it is a pure function: no I/O, no logging, no global state.
//!
//! ## Stages
//!
//! 1. **Configuration check.** The claims must fit the variant and the
//!    proof must be in demo mode. Both are checked before any document
//!    field is built, so a failed assembly never produces a partial document.
//! 2. **Clock read.** The issuance instant is read once and reused for
//!    `issuanceDate`, `proof.created` and a defaulted `lastUpdated`.
//! 3. **Envelope.** Context, type, subject and proof are built by exhaustive
//!    dispatch on [`CredentialVariant`].
//!
//! Non-fatal conditions (the demo signature) are returned as
//! [`AssemblyWarning`] values for the caller to report.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use dsc_core::{Clock, Did, IdSource, RandomIdSource, SystemClock, Timestamp};

use crate::config::{
    Claims, CredentialConfig, CredentialLevel, CredentialVariant, EmergencyContact,
    IssuerConfig, MedicalAlert, PatientClaims, PractitionerClaims, ProofConfig, SubjectConfig,
};
use crate::credential::{CredentialDocument, VcError, BASE_CONTEXT, SCHEMA_ORG_CONTEXT, VC_TYPE};
use crate::proof::Proof;

/// Everything one assembly call reads, borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub variant: CredentialVariant,
    pub issuer: &'a IssuerConfig,
    pub subject: &'a SubjectConfig,
    pub claims: &'a Claims,
    pub proof: &'a ProofConfig,
    pub expiry: Option<Timestamp>,
    /// Appended to `@context` verbatim as the last entry.
    pub custom_context: Option<&'a Map<String, Value>>,
}

/// A non-fatal condition noticed during assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyWarning {
    /// The proof carries the placeholder signature.
    DemoSignature {
        /// The issuer key the proof claims to be verified by.
        verification_method: String,
    },
}

impl std::fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssemblyWarning::DemoSignature { .. } => {
                f.write_str("Using demo signature - not suitable for production!")
            }
        }
    }
}

/// The result of a successful assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub document: CredentialDocument,
    pub warnings: Vec<AssemblyWarning>,
}

/// Builds credential documents from typed configuration.
///
/// Stateless apart from its sources; share one instance across threads.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler<C = SystemClock, I = RandomIdSource> {
    clock: C,
    ids: I,
}

impl DocumentAssembler {
    /// An assembler reading the system clock and random UUIDs.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock, I: IdSource> DocumentAssembler<C, I> {
    /// An assembler with explicit time and identifier sources.
    pub fn with_sources(clock: C, ids: I) -> Self {
        Self { clock, ids }
    }

    /// Assemble a credential from a full configuration.
    ///
    /// Runs [`CredentialConfig::claims()`] first, then [`assemble()`](Self::assemble).
    pub fn assemble_config(&self, config: &CredentialConfig) -> Result<Assembly, VcError> {
        let claims = config.claims()?;
        self.assemble(AssemblyInput {
            variant: config.credential_type,
            issuer: &config.issuer,
            subject: &config.subject,
            claims: &claims,
            proof: &config.proof,
            expiry: config.expiry_date,
            custom_context: config.custom_context(),
        })
    }

    /// Assemble one credential document.
    ///
    /// # Errors
    ///
    /// - [`VcError::Configuration`] if the claims do not fit the variant.
    /// - [`VcError::UnimplementedSigning`] if demo signatures are disabled.
    pub fn assemble(&self, input: AssemblyInput<'_>) -> Result<Assembly, VcError> {
        if !input.claims.fits(input.variant) {
            return Err(VcError::Configuration {
                variant: input.variant,
                reason: format!(
                    "{} cannot be used for {} credentials",
                    input.claims.shape(),
                    input.variant
                ),
            });
        }
        if !input.proof.use_demo_signature {
            return Err(VcError::UnimplementedSigning);
        }

        let issued = self.clock.now();

        let mut context = vec![
            Value::String(BASE_CONTEXT.to_string()),
            Value::String(SCHEMA_ORG_CONTEXT.to_string()),
            variant_context(input.variant, input.issuer),
        ];
        if let Some(custom) = input.custom_context {
            context.push(Value::Object(custom.clone()));
        }

        let credential_subject =
            serde_json::to_value(subject_fields(input.subject, input.claims, issued))?;

        let proof = Proof::demo(
            input.proof.proof_type.clone(),
            input.proof.purpose,
            input.issuer.verification_method.clone(),
            issued,
        );
        let warnings = vec![AssemblyWarning::DemoSignature {
            verification_method: input.issuer.verification_method.clone(),
        }];

        let document = CredentialDocument {
            context,
            id: self.ids.next_id(),
            credential_type: vec![VC_TYPE.to_string(), input.variant.type_name().to_string()],
            issuer: input.issuer.did.clone(),
            issuance_date: issued,
            credential_subject,
            proof,
            expiration_date: input.expiry,
        };
        Ok(Assembly { document, warnings })
    }
}

/// The single-key `{<TypeName>: <url>}` context entry for a variant.
fn variant_context(variant: CredentialVariant, issuer: &IssuerConfig) -> Value {
    let mut entry = Map::new();
    entry.insert(
        variant.type_name().to_string(),
        Value::String(variant.context_url(issuer.context_url.as_str())),
    );
    Value::Object(entry)
}

// ---------------------------------------------------------------------------
// Subject shapes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SubjectFields<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a Did>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    organization: Option<&'a str>,
    #[serde(flatten)]
    claims: ClaimFields<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ClaimFields<'a> {
    Practitioner(PractitionerFields<'a>),
    Patient(PatientFields<'a>),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PractitionerFields<'a> {
    credential_level: CredentialLevel,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    completion_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    training_hours: Option<u32>,
    #[serde(skip_serializing_if = "is_empty")]
    specializations: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PatientFields<'a> {
    patient_id: &'a str,
    last_updated: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    blood_type: Option<&'a str>,
    #[serde(skip_serializing_if = "is_empty")]
    emergency_contacts: &'a [EmergencyContact],
    #[serde(skip_serializing_if = "is_empty")]
    medical_alerts: &'a [MedicalAlert],
    #[serde(skip_serializing_if = "is_empty")]
    current_medications: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    allergies: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    medical_devices: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_physician: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scoliosis_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    curve_degree: Option<f64>,
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

/// Empty strings count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn subject_fields<'a>(
    subject: &'a SubjectConfig,
    claims: &'a Claims,
    issued: Timestamp,
) -> SubjectFields<'a> {
    let claims = match claims {
        Claims::Practitioner(p) => ClaimFields::Practitioner(practitioner_fields(p)),
        Claims::Patient(p) => ClaimFields::Patient(patient_fields(p, issued)),
    };
    SubjectFields {
        name: &subject.name,
        id: subject.did.as_ref(),
        email: present(&subject.email),
        phone: present(&subject.phone),
        organization: present(&subject.organization),
        claims,
    }
}

fn practitioner_fields(p: &PractitionerClaims) -> PractitionerFields<'_> {
    PractitionerFields {
        credential_level: p.level,
        description: &p.description,
        completion_date: p.completion_date,
        training_hours: p.training_hours,
        specializations: &p.specializations,
    }
}

fn patient_fields(p: &PatientClaims, issued: Timestamp) -> PatientFields<'_> {
    PatientFields {
        patient_id: &p.patient_id,
        last_updated: p.last_updated.unwrap_or(issued),
        blood_type: present(&p.blood_type),
        emergency_contacts: &p.emergency_contacts,
        medical_alerts: &p.medical_alerts,
        current_medications: &p.current_medications,
        allergies: &p.allergies,
        medical_devices: &p.medical_devices,
        primary_physician: present(&p.primary_physician),
        scoliosis_type: present(&p.scoliosis_type),
        curve_degree: p.curve_degree,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use dsc_core::FixedClock;
    use proptest::prelude::*;

    fn level() -> impl Strategy<Value = CredentialLevel> {
        prop::sample::select(CredentialLevel::ALL.to_vec())
    }

    proptest! {
        /// Practitioner documents echo their claims and never carry patient keys.
        #[test]
        fn practitioner_subject_reflects_claims(
            name in "[A-Za-z][A-Za-z .'-]{0,30}",
            lvl in level(),
            hours in proptest::option::of(0u32..10_000),
            specs in prop::collection::vec("[a-z]{1,12}", 0..4),
        ) {
            let issued = Timestamp::parse_iso8601("2026-03-01T09:15:00Z").unwrap();
            let asm = DocumentAssembler::with_sources(FixedClock(issued), RandomIdSource);
            let issuer = IssuerConfig::new("did:web:issuer", "Issuer", "did:web:issuer#key-1").unwrap();
            let subject = SubjectConfig::named(name.clone());
            let mut claims = PractitionerClaims::at_level(lvl);
            claims.training_hours = hours;
            claims.specializations = specs.clone();
            let claims = Claims::Practitioner(claims);
            let assembly = asm.assemble(AssemblyInput {
                variant: CredentialVariant::Practitioner,
                issuer: &issuer,
                subject: &subject,
                claims: &claims,
                proof: &ProofConfig::default(),
                expiry: None,
                custom_context: None,
            }).unwrap();

            let s = assembly.document.credential_subject.as_object().unwrap();
            prop_assert_eq!(s["name"].as_str(), Some(name.as_str()));
            prop_assert_eq!(s["credentialLevel"].as_str(), Some(lvl.as_str()));
            prop_assert_eq!(s.get("trainingHours").and_then(Value::as_u64), hours.map(u64::from));
            prop_assert_eq!(s.contains_key("specializations"), !specs.is_empty());
            prop_assert!(!s.contains_key("patientId"));
            prop_assert_eq!(assembly.document.proof.created, assembly.document.issuance_date);
        }
    }
}
