//! # dsc-core — Foundational Types for Dynamic Scoliosis Credentials
//!
//! Every other crate in the workspace depends on `dsc-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** [`Did`] validates the `did:`
//!    prefix at construction and at deserialization. [`CredentialId`] is a
//!    UUID v4 rendered as `urn:uuid:<uuid>`.
//!
//! 2. **UTC-only timestamps.** [`Timestamp`] is truncated to whole seconds and
//!    renders with a `Z` suffix, so `issuanceDate` and `proof.created` compare
//!    byte-for-byte when they come from the same instant.
//!
//! 3. **Injected sources.** Assembly reads the current time through a
//!    [`Clock`] and new identifiers through an [`IdSource`]. Tests pass fixed
//!    implementations; there is no process-wide override.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dsc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;

pub use error::ValidationError;
pub use identity::{CredentialId, Did, IdSource, RandomIdSource};
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
