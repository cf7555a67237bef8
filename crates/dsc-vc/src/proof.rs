//! # Proof block
//!
//! The `proof` object attached to every assembled credential. Real signing
//! is not implemented: the only proof value this crate ever emits is the
//! fixed [`DEMO_SIGNATURE`] placeholder in the `jws` field.

use serde::{Deserialize, Serialize};

use dsc_core::Timestamp;

/// Placeholder JWS written when demo signatures are enabled.
///
/// Validators treat this exact value as a warning, never as a valid
/// signature.
pub const DEMO_SIGNATURE: &str = "eyJhbGciOiJFZERTQSJ9..demo-signature";

/// Suite name used when a configuration does not name one.
pub const DEFAULT_PROOF_TYPE: &str = "Ed25519Signature2020";

/// Signature suite named in the proof `type` field.
///
/// Any suite name is carried through unchanged, e.g. `JsonWebSignature2020`
/// or `DataIntegrityProof`. Nothing here checks that the suite exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofType(String);

impl ProofType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProofType {
    fn default() -> Self {
        Self::new(DEFAULT_PROOF_TYPE)
    }
}

impl From<&str> for ProofType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The purpose of a proof, from the W3C proof purpose vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// The issuer asserts the credential claims are true.
    #[default]
    AssertionMethod,
    /// Authentication of the credential holder.
    Authentication,
}

impl std::fmt::Display for ProofPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofPurpose::AssertionMethod => write!(f, "assertionMethod"),
            ProofPurpose::Authentication => write!(f, "authentication"),
        }
    }
}

/// The proof object of a credential document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    /// Signature suite.
    #[serde(rename = "type")]
    pub proof_type: ProofType,

    /// Creation time; equal to the document's `issuanceDate`.
    pub created: Timestamp,

    /// Why the proof was made.
    #[serde(rename = "proofPurpose")]
    pub proof_purpose: ProofPurpose,

    /// DID URL of the key that would verify this proof.
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,

    /// Detached JWS. Only ever [`DEMO_SIGNATURE`] when produced here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jws: Option<String>,
}

impl Proof {
    /// Build a proof carrying the demo placeholder signature.
    pub fn demo(
        proof_type: ProofType,
        proof_purpose: ProofPurpose,
        verification_method: String,
        created: Timestamp,
    ) -> Self {
        Self {
            proof_type,
            created,
            proof_purpose,
            verification_method,
            jws: Some(DEMO_SIGNATURE.to_string()),
        }
    }

    /// Whether this proof carries the demo placeholder instead of a signature.
    pub fn is_demo(&self) -> bool {
        self.jws.as_deref() == Some(DEMO_SIGNATURE)
    }
}
