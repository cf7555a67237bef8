//! Property tests over the assemble → encode → decode → validate pipeline.

use proptest::prelude::*;
use serde_json::{Map, Value};

use dsc_core::{FixedClock, RandomIdSource, Timestamp};
use dsc_qr::{decode, encode};
use dsc_vc::{
    validate_credential_at, CredentialConfig, CredentialLevel, CredentialVariant,
    DocumentAssembler, IssuerConfig, PatientClaims, PractitionerClaims, ProofConfig,
    SubjectConfig,
};

fn variant() -> impl Strategy<Value = CredentialVariant> {
    prop::sample::select(CredentialVariant::ALL.to_vec())
}

fn config(variant: CredentialVariant, name: String, patient_id: String) -> CredentialConfig {
    let (practitioner, patient_record) = if variant.is_practitioner() {
        (Some(PractitionerClaims::at_level(CredentialLevel::Level1)), None)
    } else {
        (None, Some(PatientClaims::with_id(patient_id)))
    };
    CredentialConfig {
        credential_type: variant,
        issuer: IssuerConfig::new("did:web:clinic.example", "Clinic", "did:web:clinic.example#k")
            .unwrap(),
        subject: SubjectConfig::named(name),
        practitioner,
        patient_record,
        proof: ProofConfig::default(),
        custom_context: Map::new(),
        expiry_date: None,
    }
}

proptest! {
    /// Any assembled credential survives transport unchanged and validates.
    #[test]
    fn assembled_credentials_survive_transport(
        variant in variant(),
        name in "[ -~À-ÿ]{1,40}",
        patient_id in "[A-Z0-9-]{1,12}",
        compress in any::<bool>(),
        secs in 0i64..4_000_000_000,
    ) {
        let now = Timestamp::from_utc(
            chrono::DateTime::from_timestamp(secs, 0).unwrap(),
        );
        let asm = DocumentAssembler::with_sources(FixedClock(now), RandomIdSource);
        let assembly = asm.assemble_config(&config(variant, name.clone(), patient_id)).unwrap();

        let decoded: Value = decode(encode(&assembly.document, compress).unwrap().as_str()).unwrap();
        prop_assert_eq!(&decoded, &assembly.document.to_value().unwrap());
        prop_assert_eq!(decoded["credentialSubject"]["name"].as_str(), Some(name.as_str()));

        let report = validate_credential_at(&decoded, now);
        prop_assert!(report.is_valid, "{:?}", report.errors);
    }
}
