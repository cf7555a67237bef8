//! # Credential flows across crates
//!
//! Assemble with `dsc-vc`, carry through the `dsc-qr` transport, and check
//! the decoded document with the validator and summary.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{json, Map, Value};

use dsc_core::{CredentialId, FixedClock, IdSource, Timestamp};
use dsc_qr::{decode, encode, estimate_capacity, TransportCodec};
use dsc_vc::{
    validate_credential_at, Claims, CredentialConfig, CredentialLevel, CredentialSummary,
    CredentialVariant, DocumentAssembler, EmergencyContact, IssuerConfig, MedicalAlert,
    PatientClaims, PractitionerClaims, ProofConfig, SubjectConfig,
};

const ISSUED: &str = "2026-03-01T09:30:00Z";

#[derive(Default)]
struct CountingIds(AtomicU64);

impl IdSource for CountingIds {
    fn next_id(&self) -> CredentialId {
        let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        CredentialId::from_uuid(uuid_from(n))
    }
}

fn uuid_from(n: u64) -> uuid::Uuid {
    uuid::Uuid::from_u128(0x4000_0000_0000_4000_8000_0000_0000_0000 | u128::from(n))
}

fn issued() -> Timestamp {
    Timestamp::parse_iso8601(ISSUED).unwrap()
}

fn assembler() -> DocumentAssembler<FixedClock, CountingIds> {
    DocumentAssembler::with_sources(FixedClock(issued()), CountingIds::default())
}

fn practitioner_config() -> CredentialConfig {
    let mut claims = PractitionerClaims::at_level(CredentialLevel::Certified);
    claims.training_hours = Some(120);
    claims.specializations = vec!["A".to_string(), "B".to_string()];
    CredentialConfig {
        credential_type: CredentialVariant::Practitioner,
        issuer: IssuerConfig::new(
            "did:web:kim-clinic.example",
            "Kim Clinic",
            "did:web:kim-clinic.example#key-1",
        )
        .unwrap(),
        subject: SubjectConfig {
            did: Some("did:example:practitioner-7".parse().unwrap()),
            ..SubjectConfig::named("Kim Johnson")
        },
        practitioner: Some(claims),
        patient_record: None,
        proof: ProofConfig::default(),
        custom_context: Map::new(),
        expiry_date: None,
    }
}

fn patient_config(variant: CredentialVariant) -> CredentialConfig {
    let record = PatientClaims {
        blood_type: Some("AB-".to_string()),
        emergency_contacts: vec![EmergencyContact {
            name: "Sam Rivera".to_string(),
            relationship: "Parent".to_string(),
            phone: "+1-555-0199".to_string(),
            email: None,
        }],
        medical_alerts: vec![MedicalAlert {
            condition: "Dynamic Scoliosis".to_string(),
            severity: "high".to_string(),
            treatment: None,
            medications: vec!["Ibuprofen".to_string()],
            allergies: Vec::new(),
        }],
        curve_degree: Some(32.0),
        ..PatientClaims::with_id("P-0042")
    };
    CredentialConfig {
        credential_type: variant,
        issuer: IssuerConfig::new(
            "did:web:hospital.example",
            "Example Hospital",
            "did:web:hospital.example#key-1",
        )
        .unwrap(),
        subject: SubjectConfig::named("Renée Dubois"),
        practitioner: None,
        patient_record: Some(record),
        proof: ProofConfig::default(),
        custom_context: Map::new(),
        expiry_date: None,
    }
}

#[test]
fn practitioner_survives_qr_transport_and_validates() {
    let assembly = assembler().assemble_config(&practitioner_config()).unwrap();
    let original = assembly.document.to_value().unwrap();

    let payload = encode(&assembly.document, true).unwrap();
    let decoded: Value = decode(payload.as_str()).unwrap();
    assert_eq!(decoded, original);

    let report = validate_credential_at(&decoded, issued());
    assert!(report.is_valid, "{:?}", report.errors);
    assert_eq!(
        report.warnings,
        vec!["Using demo signature - not suitable for production".to_string()]
    );
    assert_eq!(report.info.subject_name.as_deref(), Some("Kim Johnson"));

    let subject = &decoded["credentialSubject"];
    assert_eq!(subject["credentialLevel"], "Certified");
    assert_eq!(subject["trainingHours"], 120);
    assert_eq!(subject["specializations"], json!(["A", "B"]));
    assert_eq!(decoded["issuanceDate"], ISSUED);
    assert_eq!(decoded["proof"]["created"], ISSUED);
}

#[test]
fn every_patient_variant_roundtrips_and_validates() {
    for variant in [
        CredentialVariant::PatientRecord,
        CredentialVariant::EmergencyContact,
        CredentialVariant::MedicalAlert,
    ] {
        let assembly = assembler().assemble_config(&patient_config(variant)).unwrap();
        for codec in [TransportCodec::new(true), TransportCodec::new(false)] {
            let payload = codec.encode(&assembly.document).unwrap();
            let decoded: Value = codec.decode(payload.as_str()).unwrap();
            assert_eq!(decoded, assembly.document.to_value().unwrap());
            assert_eq!(decoded["credentialSubject"]["name"], "Renée Dubois");
            assert_eq!(decoded["type"][1], variant.type_name());

            let report = validate_credential_at(&decoded, issued());
            assert!(report.is_valid, "{variant}: {:?}", report.errors);
        }
    }
}

#[test]
fn decoded_document_parses_back_into_typed_form() {
    let assembly = assembler().assemble_config(&practitioner_config()).unwrap();
    let payload = encode(&assembly.document, true).unwrap();
    let typed: dsc_vc::CredentialDocument = decode(payload.as_str()).unwrap();
    assert_eq!(typed, assembly.document);
    assert_eq!(typed.variant(), Some(CredentialVariant::Practitioner));
}

#[test]
fn summary_of_decoded_patient_record() {
    let assembly = assembler()
        .assemble_config(&patient_config(CredentialVariant::PatientRecord))
        .unwrap();
    let payload = encode(&assembly.document, true).unwrap();
    let decoded: Value = decode(payload.as_str()).unwrap();

    let rows = CredentialSummary::from_value(&decoded).rows();
    let get = |label: &str| {
        rows.iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
            .unwrap()
    };
    assert_eq!(get("Patient ID"), "P-0042");
    assert_eq!(get("Blood Type"), "AB-");
    assert_eq!(get("Emergency Contacts"), "Yes");
    assert_eq!(get("Medical Alerts"), "Yes");
    assert_eq!(get("Expires"), "No expiration");
    assert_eq!(get("Subject DID"), "No DID");
}

#[test]
fn expired_credential_is_valid_with_warning() {
    let mut config = practitioner_config();
    config.expiry_date = Some(Timestamp::parse_iso8601("2026-03-02T00:00:00Z").unwrap());
    let assembly = assembler().assemble_config(&config).unwrap();
    let decoded: Value = decode(encode(&assembly.document, true).unwrap().as_str()).unwrap();

    let later = Timestamp::parse_iso8601("2027-01-01T00:00:00Z").unwrap();
    let report = validate_credential_at(&decoded, later);
    assert!(report.is_valid);
    assert!(report.warnings.contains(&"Credential has expired".to_string()));

    assert!(!validate_credential_at(&decoded, issued())
        .warnings
        .contains(&"Credential has expired".to_string()));
}

#[test]
fn capacity_report_matches_emitted_payload() {
    let assembly = assembler()
        .assemble_config(&patient_config(CredentialVariant::PatientRecord))
        .unwrap();
    for compress in [true, false] {
        let report = estimate_capacity(&assembly.document, compress).unwrap();
        let payload = encode(&assembly.document, compress).unwrap();
        assert_eq!(report.payload_bytes, payload.len());
        assert_eq!(
            report.recommended_version,
            dsc_qr::recommended_version(payload.len())
        );
    }
    let packed = estimate_capacity(&assembly.document, true).unwrap();
    let plain = estimate_capacity(&assembly.document, false).unwrap();
    assert!(packed.payload_bytes < plain.payload_bytes);
}

#[test]
fn identifiers_differ_across_assemblies() {
    let asm = assembler();
    let config = practitioner_config();
    let first = asm.assemble_config(&config).unwrap().document;
    let second = asm.assemble_config(&config).unwrap().document;
    assert_ne!(first.id, second.id);
    assert_eq!(first.issuance_date, second.issuance_date);
}

#[test]
fn mismatched_claims_never_reach_transport() {
    let mut config = practitioner_config();
    config.credential_type = CredentialVariant::MedicalAlert;
    assert!(matches!(
        config.claims(),
        Err(dsc_vc::VcError::Configuration { .. })
    ));
    assert!(assembler().assemble_config(&config).is_err());
    assert!(matches!(
        patient_config(CredentialVariant::PatientRecord).claims(),
        Ok(Claims::Patient(_))
    ));
}
