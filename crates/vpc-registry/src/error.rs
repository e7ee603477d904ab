//! # Contract Errors
//!
//! One error enum per contract. Each variant maps to the numeric code the
//! contract returns on the wire, via [`ContractError::code`].
//!
//! Codes are not globally unique: `102` is "not an authorized issuer" on
//! `issue-credential` but "not owner" on `add-authorized-revoker` and
//! `add-authorized-provider`; `400`/`401` mean different things in the
//! education contract and in the issuance contract's internal
//! `mark-credential-revoked`. The distinct Rust variants keep the meanings
//! apart while the codes stay bit-for-bit compatible.
//!
//! ```text
//! set-contract-owner          100 OwnerTransferDenied
//! add-authorized-issuer       101 IssuerGrantDenied
//! issue-credential            102 UnauthorizedIssuer, 103 DuplicateCredential
//! verify-credential           200 NotFound, 201 Revoked, 202 Expired
//! add-authorized-revoker      102 RevokerGrantDenied
//! revoke-credential           300 UnauthorizedRevoker, 301 NotFound
//! add-authorized-provider     102 ProviderGrantDenied
//! add-education-credits       400 UnauthorizedProvider, 401 CredentialNotFound,
//!                             402 CreditOverflow
//! mark-credential-revoked     400 NotFound, 401 UnauthorizedCaller
//! ```

use thiserror::Error;

use vpc_core::{CredentialId, Principal, Timestamp};

/// A contract failure with a stable numeric code.
pub trait ContractError: std::error::Error {
    /// The numeric error code returned to callers.
    fn code(&self) -> u32;
}

/// Errors from the credential issuance contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssuanceError {
    /// `set-contract-owner` called by someone other than the owner.
    #[error("{caller} is not the contract owner and cannot transfer ownership")]
    OwnerTransferDenied {
        /// The rejected caller.
        caller: Principal,
    },

    /// `add-authorized-issuer` called by someone other than the owner.
    #[error("{caller} is not the contract owner and cannot authorize issuers")]
    IssuerGrantDenied {
        /// The rejected caller.
        caller: Principal,
    },

    /// The caller is not an authorized issuer.
    #[error("{caller} is not an authorized issuer")]
    UnauthorizedIssuer {
        /// The rejected caller.
        caller: Principal,
    },

    /// A credential already exists for this (id, recipient) pair.
    #[error("credential {credential_id} already issued to {recipient}")]
    DuplicateCredential {
        /// The credential id.
        credential_id: CredentialId,
        /// The recipient.
        recipient: Principal,
    },
}

impl ContractError for IssuanceError {
    fn code(&self) -> u32 {
        match self {
            Self::OwnerTransferDenied { .. } => 100,
            Self::IssuerGrantDenied { .. } => 101,
            Self::UnauthorizedIssuer { .. } => 102,
            Self::DuplicateCredential { .. } => 103,
        }
    }
}

/// Errors from the issuance contract's internal revocation hook.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkRevokedError {
    /// No credential for this (id, recipient) pair.
    #[error("credential {credential_id} for {recipient} not found")]
    NotFound {
        /// The credential id.
        credential_id: CredentialId,
        /// The recipient.
        recipient: Principal,
    },

    /// Only the owner or the revocation registry contract may call the hook.
    #[error("{caller} may not mark credentials revoked")]
    UnauthorizedCaller {
        /// The rejected caller.
        caller: Principal,
    },
}

impl ContractError for MarkRevokedError {
    fn code(&self) -> u32 {
        match self {
            Self::NotFound { .. } => 400,
            Self::UnauthorizedCaller { .. } => 401,
        }
    }
}

/// Errors from the verification contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// No credential for this (id, recipient) pair.
    #[error("credential {credential_id} for {recipient} not found")]
    NotFound {
        /// The credential id.
        credential_id: CredentialId,
        /// The recipient.
        recipient: Principal,
    },

    /// The credential has been revoked.
    #[error("credential {credential_id} for {recipient} has been revoked")]
    Revoked {
        /// The credential id.
        credential_id: CredentialId,
        /// The recipient.
        recipient: Principal,
    },

    /// Block time is past the credential's expiry date.
    #[error("credential {credential_id} for {recipient} expired at {expiry_date}")]
    Expired {
        /// The credential id.
        credential_id: CredentialId,
        /// The recipient.
        recipient: Principal,
        /// The stored expiry date.
        expiry_date: Timestamp,
    },
}

impl ContractError for VerificationError {
    fn code(&self) -> u32 {
        match self {
            Self::NotFound { .. } => 200,
            Self::Revoked { .. } => 201,
            Self::Expired { .. } => 202,
        }
    }
}

/// Errors from the revocation registry contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevocationError {
    /// `add-authorized-revoker` called by someone other than the owner.
    #[error("{caller} is not the contract owner and cannot authorize revokers")]
    RevokerGrantDenied {
        /// The rejected caller.
        caller: Principal,
    },

    /// The caller is neither an authorized revoker nor the owner.
    #[error("{caller} is not authorized to revoke credentials")]
    UnauthorizedRevoker {
        /// The rejected caller.
        caller: Principal,
    },

    /// No credential for this (id, recipient) pair.
    #[error("credential {credential_id} for {recipient} not found")]
    NotFound {
        /// The credential id.
        credential_id: CredentialId,
        /// The recipient.
        recipient: Principal,
    },

    /// The issuance contract rejected the revocation hook.
    #[error("issuance contract rejected revocation: {0}")]
    Issuance(#[from] MarkRevokedError),
}

impl ContractError for RevocationError {
    fn code(&self) -> u32 {
        match self {
            Self::RevokerGrantDenied { .. } => 102,
            Self::UnauthorizedRevoker { .. } => 300,
            Self::NotFound { .. } => 301,
            Self::Issuance(inner) => inner.code(),
        }
    }
}

/// Errors from the continuing education contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EducationError {
    /// `add-authorized-provider` called by someone other than the owner.
    #[error("{caller} is not the contract owner and cannot authorize providers")]
    ProviderGrantDenied {
        /// The rejected caller.
        caller: Principal,
    },

    /// The caller is not an authorized provider.
    #[error("{caller} is not an authorized education provider")]
    UnauthorizedProvider {
        /// The rejected caller.
        caller: Principal,
    },

    /// The referenced credential does not exist.
    #[error("credential {credential_id} for {recipient} not found")]
    CredentialNotFound {
        /// The credential id.
        credential_id: CredentialId,
        /// The recipient.
        recipient: Principal,
    },

    /// Adding the credits would overflow the running total.
    #[error("adding {credits} credits to total {total} overflows")]
    CreditOverflow {
        /// The current total.
        total: u64,
        /// The credits being added.
        credits: u64,
    },
}

impl ContractError for EducationError {
    fn code(&self) -> u32 {
        match self {
            Self::ProviderGrantDenied { .. } => 102,
            Self::UnauthorizedProvider { .. } => 400,
            Self::CredentialNotFound { .. } => 401,
            Self::CreditOverflow { .. } => 402,
        }
    }
}

/// Errors from moving the chain clock.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// Block height or block time would overflow.
    #[error("advancing {blocks} blocks overflows the chain clock")]
    Overflow {
        /// The number of blocks requested.
        blocks: u64,
    },
}

/// Any contract error, for callers that dispatch across the whole suite.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Issuance contract error.
    #[error(transparent)]
    Issuance(#[from] IssuanceError),

    /// Internal revocation hook error.
    #[error(transparent)]
    MarkRevoked(#[from] MarkRevokedError),

    /// Verification contract error.
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// Revocation registry error.
    #[error(transparent)]
    Revocation(#[from] RevocationError),

    /// Continuing education contract error.
    #[error(transparent)]
    Education(#[from] EducationError),
}

impl ContractError for RegistryError {
    fn code(&self) -> u32 {
        match self {
            Self::Issuance(e) => e.code(),
            Self::MarkRevoked(e) => e.code(),
            Self::Verification(e) => e.code(),
            Self::Revocation(e) => e.code(),
            Self::Education(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn cert() -> CredentialId {
        CredentialId::new("CERT-123").unwrap()
    }

    #[test]
    fn issuance_codes() {
        let caller = principal("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG");
        assert_eq!(IssuanceError::OwnerTransferDenied { caller: caller.clone() }.code(), 100);
        assert_eq!(IssuanceError::IssuerGrantDenied { caller: caller.clone() }.code(), 101);
        assert_eq!(IssuanceError::UnauthorizedIssuer { caller: caller.clone() }.code(), 102);
        assert_eq!(
            IssuanceError::DuplicateCredential {
                credential_id: cert(),
                recipient: caller,
            }
            .code(),
            103
        );
    }

    #[test]
    fn shared_code_102_has_distinct_variants() {
        let caller = principal("ST3AM1A56AK2C1XAFJ4115ZSV26EB49BVQ10MGCS0");
        let issuer = RegistryError::from(IssuanceError::UnauthorizedIssuer { caller: caller.clone() });
        let revoker = RegistryError::from(RevocationError::RevokerGrantDenied { caller: caller.clone() });
        let provider = RegistryError::from(EducationError::ProviderGrantDenied { caller });
        assert_eq!(issuer.code(), 102);
        assert_eq!(revoker.code(), 102);
        assert_eq!(provider.code(), 102);
        assert_ne!(issuer, revoker);
        assert_ne!(revoker, provider);
    }

    #[test]
    fn revocation_passes_through_hook_codes() {
        let hook = MarkRevokedError::UnauthorizedCaller {
            caller: principal("ST3AM1A56AK2C1XAFJ4115ZSV26EB49BVQ10MGCS0"),
        };
        let err = RevocationError::from(hook);
        assert_eq!(err.code(), 401);
    }

    #[test]
    fn verification_codes_and_messages() {
        let recipient = principal("ST3AM1A56AK2C1XAFJ4115ZSV26EB49BVQ10MGCS0");
        let expired = VerificationError::Expired {
            credential_id: cert(),
            recipient: recipient.clone(),
            expiry_date: Timestamp::from_epoch_secs(1_680_000_000).unwrap(),
        };
        assert_eq!(expired.code(), 202);
        assert!(expired.to_string().contains("2023-03-28T10:40:00Z"));
        assert_eq!(
            VerificationError::Revoked { credential_id: cert(), recipient: recipient.clone() }.code(),
            201
        );
        assert_eq!(VerificationError::NotFound { credential_id: cert(), recipient }.code(), 200);
    }

    #[test]
    fn education_codes() {
        let caller = principal("ST3AM1A56AK2C1XAFJ4115ZSV26EB49BVQ10MGCS0");
        assert_eq!(EducationError::UnauthorizedProvider { caller: caller.clone() }.code(), 400);
        assert_eq!(
            EducationError::CredentialNotFound { credential_id: cert(), recipient: caller }.code(),
            401
        );
        assert_eq!(EducationError::CreditOverflow { total: u64::MAX, credits: 1 }.code(), 402);
    }

    #[test]
    fn registry_error_display_is_transparent() {
        let inner = MarkRevokedError::NotFound {
            credential_id: cert(),
            recipient: principal("ST3AM1A56AK2C1XAFJ4115ZSV26EB49BVQ10MGCS0"),
        };
        let outer = RegistryError::from(inner.clone());
        assert_eq!(outer.to_string(), inner.to_string());
        assert_eq!(outer.code(), 400);
    }
}
