//! # Error Hierarchy
//!
//! Validation errors for domain primitives, built with `thiserror`.
//! Each variant carries the rejected input so a misconfigured file can be
//! fixed without guesswork.

use thiserror::Error;

/// Validation errors raised when constructing domain primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// DID does not start with the `did:` prefix.
    #[error("invalid DID format: \"{0}\" (DID must start with \"did:\")")]
    InvalidDid(String),

    /// Timestamp string is not valid ISO 8601.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A numeric option is below its permitted minimum.
    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum {
        /// The option name as it appears in configuration.
        field: &'static str,
        /// The smallest accepted value.
        min: u64,
        /// The value that was supplied.
        value: u64,
    },

    /// A string does not name any member of a closed set.
    #[error("unknown {field} \"{value}\" (expected one of: {expected})")]
    UnknownValue {
        /// The option name as it appears in configuration.
        field: &'static str,
        /// The value that was supplied.
        value: String,
        /// Comma-separated list of accepted spellings.
        expected: String,
    },

    /// A URL could not be parsed or uses an unsupported scheme.
    #[error("invalid URL \"{value}\": {reason}")]
    InvalidUrl {
        /// The rejected URL text.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_did_display() {
        let err = ValidationError::InvalidDid("web:example.com".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("web:example.com"));
        assert!(msg.contains("did:"));
    }

    #[test]
    fn below_minimum_display() {
        let err = ValidationError::BelowMinimum {
            field: "box_size",
            min: 1,
            value: 0,
        };
        assert_eq!(format!("{err}"), "box_size must be at least 1, got 0");
    }

    #[test]
    fn unknown_value_display() {
        let err = ValidationError::UnknownValue {
            field: "error_correction",
            value: "Z".to_string(),
            expected: "L, M, Q, H".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("error_correction"));
        assert!(msg.contains("\"Z\""));
        assert!(msg.contains("L, M, Q, H"));
    }

    #[test]
    fn invalid_timestamp_display() {
        let err = ValidationError::InvalidTimestamp {
            value: "yesterday".to_string(),
            reason: "not ISO 8601".to_string(),
        };
        assert!(format!("{err}").contains("yesterday"));
    }
}
