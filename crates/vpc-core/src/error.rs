//! # Error Types
//!
//! Construction and serialization errors for the core primitives. Contract
//! call failures live in `vpc-registry`; this module only covers input that
//! can never become a valid identifier, timestamp, or canonical document.

use thiserror::Error;

/// Top-level error type for `vpc-core`.
#[derive(Error, Debug)]
pub enum VpcError {
    /// A principal string failed validation.
    #[error("invalid principal {value:?}: {reason}")]
    InvalidPrincipal {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A credential identifier failed validation.
    #[error("invalid credential id {value:?}: {reason}")]
    InvalidIdentifier {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A timestamp could not be parsed or constructed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_principal_display_names_value_and_reason() {
        let err = VpcError::InvalidPrincipal {
            value: "a b".to_string(),
            reason: "contains whitespace",
        };
        let msg = err.to_string();
        assert!(msg.contains("\"a b\""));
        assert!(msg.contains("contains whitespace"));
    }

    #[test]
    fn canonicalization_error_converts() {
        let err: VpcError = CanonicalizationError::FloatRejected(0.5).into();
        assert!(matches!(err, VpcError::Canonicalization(_)));
        assert!(err.to_string().contains("0.5"));
    }
}
