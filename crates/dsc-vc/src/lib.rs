//! # dsc-vc — Verifiable Credentials for Dynamic Scoliosis Credentials
//!
//! Implements the credential side of the system:
//!
//! - **Configuration model** ([`CredentialConfig`]) with validating
//!   deserializers and the variant/claims pairing check.
//! - **Document assembly** ([`DocumentAssembler`]) producing a
//!   [`CredentialDocument`] per [`CredentialVariant`], with time and
//!   identifier sources injected.
//! - **Proof block** ([`Proof`]) carrying the demo placeholder signature.
//!   Real signing is not implemented and is reported as
//!   [`VcError::UnimplementedSigning`].
//! - **Validation** ([`validate_credential()`]) and **summaries**
//!   ([`CredentialSummary`]) over arbitrary JSON values.
//!
//! ## Crate Policy
//!
//! - Assembly performs no I/O and emits no log events; warnings are
//!   returned in [`Assembly::warnings`].
//! - Validation and summaries never fail.

pub mod assembler;
pub mod config;
pub mod credential;
pub mod proof;
pub mod summary;
pub mod validation;

// Re-export primary types.
pub use assembler::{Assembly, AssemblyInput, AssemblyWarning, DocumentAssembler};
pub use config::{
    Claims, ContextUrl, CredentialConfig, CredentialLevel, CredentialVariant, EmergencyContact,
    IssuerConfig, MedicalAlert, PatientClaims, PractitionerClaims, ProofConfig, SubjectConfig,
    DEFAULT_CONTEXT_URL, DEFAULT_PRACTITIONER_DESCRIPTION,
};
pub use credential::{CredentialDocument, VcError, BASE_CONTEXT, SCHEMA_ORG_CONTEXT, VC_TYPE};
pub use proof::{Proof, ProofPurpose, ProofType, DEFAULT_PROOF_TYPE, DEMO_SIGNATURE};
pub use summary::{CredentialSummary, VariantSummary};
pub use validation::{validate_credential, validate_credential_at, ValidationInfo, ValidationReport};
