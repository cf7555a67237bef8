//! # Identity Newtypes
//!
//! - [`Did`]: a Decentralized Identifier, validated at construction to carry
//!   the literal `did:` prefix. Issuers always have one; subjects may.
//! - [`CredentialId`]: the `urn:uuid:<v4>` identifier of an assembled
//!   credential document.
//!
//! New identifiers are drawn from an [`IdSource`] so that assembly stays
//! deterministic under test.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// URN prefix for credential identifiers.
const URN_UUID_PREFIX: &str = "urn:uuid:";

/// Decentralized Identifier (DID).
///
/// Only the `did:` prefix is enforced. Method-specific syntax is left to the
/// resolver that eventually consumes the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Did(String);

impl<'de> Deserialize<'de> for Did {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl Did {
    /// Create a DID from a string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDid`] if the value does not start
    /// with `did:`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !s.starts_with("did:") {
            return Err(ValidationError::InvalidDid(s));
        }
        Ok(Self(s))
    }

    /// Access the DID string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Did {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Identifier of an assembled credential, rendered as `urn:uuid:<uuid>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialId(Uuid);

impl CredentialId {
    /// Create a new random (v4) credential identifier.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Render as `urn:uuid:<uuid>`.
    pub fn to_urn(&self) -> String {
        format!("{URN_UUID_PREFIX}{}", self.0)
    }

    /// Parse a `urn:uuid:<uuid>` string.
    pub fn parse_urn(s: &str) -> Option<Self> {
        let raw = s.strip_prefix(URN_UUID_PREFIX)?;
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{URN_UUID_PREFIX}{}", self.0)
    }
}

impl Serialize for CredentialId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CredentialId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse_urn(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("expected urn:uuid:<uuid>, got {raw:?}"))
        })
    }
}

/// Source of fresh credential identifiers.
pub trait IdSource: Send + Sync {
    /// Produce the identifier for the next assembled credential.
    fn next_id(&self) -> CredentialId;
}

/// Production [`IdSource`]: random UUID v4 per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn next_id(&self) -> CredentialId {
        CredentialId::new_v4()
    }
}
