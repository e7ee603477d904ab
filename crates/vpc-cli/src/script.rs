//! # Call Scripts
//!
//! A script is a YAML (or JSON) list of contract calls, each tagged with an
//! `op` in kebab case:
//!
//! ```yaml
//! - op: add-authorized-issuer
//!   sender: ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM
//!   issuer: ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG
//! - op: issue-credential
//!   sender: ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG
//!   credential_id: CERT-123
//!   recipient: ST3AM1A56AK2C1XAFJ4115ZSV26EB49BVQ10MGCS0
//!   credential_type: Professional Engineer
//!   expiry_date: 1680000000
//!   metadata_uri: ipfs://QmXoypizjW3WknFiJnKLwHCnL72vedxjQkDDP1mXWo6uco
//! ```
//!
//! Principals and credential ids are validated while parsing. Unquoted
//! integers (`credential_id: 2024`) are read as their decimal text; quote
//! ids with leading zeros. Each executed step yields an [`Outcome`] in the
//! contract response shape:
//! `{"success": <payload>}` or `{"error": <code>, "message": "..."}`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use vpc_core::{CredentialId, Principal, Timestamp};
use vpc_registry::{ContractError, CredentialSuite};

/// One contract call or clock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case", deny_unknown_fields)]
pub enum Step {
    SetContractOwner {
        sender: Principal,
        new_owner: Principal,
    },
    AddAuthorizedIssuer {
        sender: Principal,
        issuer: Principal,
    },
    AddAuthorizedRevoker {
        sender: Principal,
        revoker: Principal,
    },
    AddAuthorizedProvider {
        sender: Principal,
        provider: Principal,
    },
    IssueCredential {
        sender: Principal,
        credential_id: CredentialId,
        recipient: Principal,
        credential_type: String,
        /// Unix seconds.
        expiry_date: i64,
        metadata_uri: String,
    },
    RevokeCredential {
        sender: Principal,
        credential_id: CredentialId,
        recipient: Principal,
    },
    MarkCredentialRevoked {
        sender: Principal,
        credential_id: CredentialId,
        recipient: Principal,
    },
    VerifyCredential {
        credential_id: CredentialId,
        recipient: Principal,
    },
    GetCredential {
        credential_id: CredentialId,
        recipient: Principal,
    },
    AddEducationCredits {
        sender: Principal,
        recipient: Principal,
        credential_id: CredentialId,
        credits: u64,
        activity_type: String,
        metadata_uri: String,
    },
    GetTotalCredits {
        recipient: Principal,
        credential_id: CredentialId,
    },
    GetCreditHistoryEntry {
        recipient: Principal,
        credential_id: CredentialId,
        entry_id: u64,
    },
    AdvanceBlocks {
        blocks: u64,
    },
    SetBlockTime {
        /// Unix seconds.
        block_time: i64,
    },
}

impl Step {
    /// The `op` tag of this step.
    pub fn op(&self) -> &'static str {
        match self {
            Self::SetContractOwner { .. } => "set-contract-owner",
            Self::AddAuthorizedIssuer { .. } => "add-authorized-issuer",
            Self::AddAuthorizedRevoker { .. } => "add-authorized-revoker",
            Self::AddAuthorizedProvider { .. } => "add-authorized-provider",
            Self::IssueCredential { .. } => "issue-credential",
            Self::RevokeCredential { .. } => "revoke-credential",
            Self::MarkCredentialRevoked { .. } => "mark-credential-revoked",
            Self::VerifyCredential { .. } => "verify-credential",
            Self::GetCredential { .. } => "get-credential",
            Self::AddEducationCredits { .. } => "add-education-credits",
            Self::GetTotalCredits { .. } => "get-total-credits",
            Self::GetCreditHistoryEntry { .. } => "get-credit-history-entry",
            Self::AdvanceBlocks { .. } => "advance-blocks",
            Self::SetBlockTime { .. } => "set-block-time",
        }
    }

    /// Check the fields serde cannot: epoch seconds must be representable.
    pub fn check(&self) -> Result<()> {
        match self {
            Self::IssueCredential { expiry_date, .. } => {
                Timestamp::from_epoch_secs(*expiry_date).context("invalid expiry_date")?;
            }
            Self::SetBlockTime { block_time } => {
                Timestamp::from_epoch_secs(*block_time).context("invalid block_time")?;
            }
            _ => {}
        }
        Ok(())
    }
}

/// A parsed script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse YAML or JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("failed to parse script")
    }

    /// Read and parse a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid script {}", path.display()))
    }

    /// Check every step, reporting the first bad one by index.
    pub fn check(&self) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            step.check()
                .with_context(|| format!("step {index} ({})", step.op()))?;
        }
        Ok(())
    }
}

/// Response of one executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Success { success: Value },
    Error { error: u32, message: String },
}

impl Outcome {
    fn ok() -> Self {
        Self::Success { success: Value::Bool(true) }
    }

    fn value<T: Serialize>(payload: Option<&T>) -> Result<Self> {
        let success = serde_json::to_value(payload).context("failed to serialize payload")?;
        Ok(Self::Success { success })
    }

    fn from_result<E: ContractError>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(err) => Self::failed(&err),
        }
    }

    fn failed<E: ContractError>(err: &E) -> Self {
        Self::Error {
            error: err.code(),
            message: err.to_string(),
        }
    }

    /// Whether this is an error response.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Execute one step against `suite`.
///
/// Contract rejections are returned as [`Outcome::Error`]. Only failures
/// outside the contract surface (clock overflow, bad timestamps) are `Err`.
pub fn execute(
    suite: &mut CredentialSuite,
    step: &Step,
    seconds_per_block: u64,
) -> Result<Outcome> {
    let outcome = match step {
        Step::SetContractOwner { sender, new_owner } => {
            Outcome::from_result(suite.set_contract_owner(sender, new_owner))
        }
        Step::AddAuthorizedIssuer { sender, issuer } => {
            Outcome::from_result(suite.add_authorized_issuer(sender, issuer))
        }
        Step::AddAuthorizedRevoker { sender, revoker } => {
            Outcome::from_result(suite.add_authorized_revoker(sender, revoker))
        }
        Step::AddAuthorizedProvider { sender, provider } => {
            Outcome::from_result(suite.add_authorized_provider(sender, provider))
        }
        Step::IssueCredential {
            sender,
            credential_id,
            recipient,
            credential_type,
            expiry_date,
            metadata_uri,
        } => {
            let expiry = Timestamp::from_epoch_secs(*expiry_date).context("invalid expiry_date")?;
            Outcome::from_result(suite.issue_credential(
                sender,
                credential_id,
                recipient,
                credential_type.as_str(),
                expiry,
                metadata_uri.as_str(),
            ))
        }
        Step::RevokeCredential {
            sender,
            credential_id,
            recipient,
        } => Outcome::from_result(suite.revoke_credential(sender, credential_id, recipient)),
        Step::MarkCredentialRevoked {
            sender,
            credential_id,
            recipient,
        } => Outcome::from_result(suite.mark_credential_revoked(sender, credential_id, recipient)),
        Step::VerifyCredential {
            credential_id,
            recipient,
        } => match suite.verify_credential(credential_id, recipient) {
            Ok(credential) => Outcome::value(Some(credential))?,
            Err(err) => Outcome::failed(&err),
        },
        Step::GetCredential {
            credential_id,
            recipient,
        } => Outcome::value(suite.get_credential(credential_id, recipient))?,
        Step::AddEducationCredits {
            sender,
            recipient,
            credential_id,
            credits,
            activity_type,
            metadata_uri,
        } => Outcome::from_result(suite.add_education_credits(
            sender,
            recipient,
            credential_id,
            *credits,
            activity_type.as_str(),
            metadata_uri.as_str(),
        )),
        Step::GetTotalCredits {
            recipient,
            credential_id,
        } => Outcome::value(suite.get_total_credits(recipient, credential_id))?,
        Step::GetCreditHistoryEntry {
            recipient,
            credential_id,
            entry_id,
        } => Outcome::value(suite.get_credit_history_entry(recipient, credential_id, *entry_id))?,
        Step::AdvanceBlocks { blocks } => {
            suite.advance_blocks(*blocks, seconds_per_block)?;
            Outcome::value(Some(suite.clock()))?
        }
        Step::SetBlockTime { block_time } => {
            let time = Timestamp::from_epoch_secs(*block_time).context("invalid block_time")?;
            suite.set_block_time(time);
            Outcome::value(Some(suite.clock()))?
        }
    };
    Ok(outcome)
}
