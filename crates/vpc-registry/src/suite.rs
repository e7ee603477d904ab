//! # Credential Suite
//!
//! The deployed contract suite: issuance, verification, revocation
//! registry, and continuing education, sharing one owner, one chain clock,
//! and one event log. Every public method is one contract call: it takes
//! the caller, runs its authorization and existence checks, and either
//! mutates state and returns `Ok` or returns a coded error having mutated
//! nothing.
//!
//! ## Cross-contract call
//!
//! `revoke_credential` is the only call that crosses contracts. After its
//! own checks pass, the revocation registry calls the issuance contract's
//! `mark_credential_revoked` with the revocation registry's *contract
//! principal* as the caller. The hook accepts only that principal or the
//! owner.
//!
//! ## Re-revocation
//!
//! Revoking an already-revoked credential succeeds without changing state
//! or emitting an event.

use tracing::{debug, info, warn};

use vpc_core::{CredentialId, Principal, Timestamp, VpcError};

use crate::authorization::{Action, AuthorizationGate, Role};
use crate::clock::ChainClock;
use crate::credential::{
    Credential, CredentialKey, CredentialRegistry, CredentialStatus, RevokeOutcome,
};
use crate::education::{CreditBalance, CreditHistoryEntry, CreditKey, EducationLedger};
use crate::error::{
    ClockError, ContractError, EducationError, IssuanceError, MarkRevokedError, RevocationError,
    VerificationError,
};
use crate::events::{EventLog, EventRecord, RegistryEvent};
use crate::snapshot::SuiteSnapshot;

/// Contract name of the issuance contract.
pub const ISSUANCE_CONTRACT: &str = "credential-issuance";
/// Contract name of the verification contract.
pub const VERIFICATION_CONTRACT: &str = "credential-verification";
/// Contract name of the revocation registry.
pub const REVOCATION_CONTRACT: &str = "revocation-registry";
/// Contract name of the continuing education contract.
pub const EDUCATION_CONTRACT: &str = "continuing-education";

/// Contract principals of the four deployed contracts.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractPrincipals {
    /// `<deployer>.credential-issuance`
    pub issuance: Principal,
    /// `<deployer>.credential-verification`
    pub verification: Principal,
    /// `<deployer>.revocation-registry`
    pub revocation: Principal,
    /// `<deployer>.continuing-education`
    pub education: Principal,
}

impl ContractPrincipals {
    /// Derive the contract principals for contracts deployed by `deployer`.
    pub fn deployed_by(deployer: &Principal) -> Result<Self, VpcError> {
        Ok(Self {
            issuance: Principal::contract(deployer, ISSUANCE_CONTRACT)?,
            verification: Principal::contract(deployer, VERIFICATION_CONTRACT)?,
            revocation: Principal::contract(deployer, REVOCATION_CONTRACT)?,
            education: Principal::contract(deployer, EDUCATION_CONTRACT)?,
        })
    }
}

/// The whole credential system.
#[derive(Debug, Clone)]
pub struct CredentialSuite {
    contracts: ContractPrincipals,
    clock: ChainClock,
    gate: AuthorizationGate,
    credentials: CredentialRegistry,
    education: EducationLedger,
    events: EventLog,
}

/// Log a rejected call and hand the error back.
fn rejected<E: ContractError>(operation: &'static str, caller: &Principal, err: E) -> E {
    warn!(operation, %caller, code = err.code(), "{err}");
    err
}

impl CredentialSuite {
    /// Deploy the suite from `deployer`, administered by `owner`, starting at `clock`.
    ///
    /// # Errors
    ///
    /// Fails if `deployer` cannot deploy contracts (it is itself a contract
    /// principal).
    pub fn deploy(owner: Principal, deployer: &Principal, clock: ChainClock) -> Result<Self, VpcError> {
        let contracts = ContractPrincipals::deployed_by(deployer)?;
        info!(
            %owner,
            issuance = %contracts.issuance,
            block_height = clock.block_height(),
            block_time = %clock.block_time(),
            "credential suite deployed"
        );
        Ok(Self {
            contracts,
            clock,
            gate: AuthorizationGate::new(owner),
            credentials: CredentialRegistry::new(),
            education: EducationLedger::new(),
            events: EventLog::new(),
        })
    }

    // ── Suite state ─────────────────────────────────────────────────

    /// The current administrative principal.
    pub fn owner(&self) -> &Principal {
        self.gate.owner()
    }

    /// The deployed contract principals.
    pub fn contracts(&self) -> &ContractPrincipals {
        &self.contracts
    }

    /// The chain clock.
    pub fn clock(&self) -> &ChainClock {
        &self.clock
    }

    /// The authorization gate.
    pub fn gate(&self) -> &AuthorizationGate {
        &self.gate
    }

    /// The credential registry.
    pub fn credentials(&self) -> &CredentialRegistry {
        &self.credentials
    }

    /// The education credit ledger.
    pub fn education(&self) -> &EducationLedger {
        &self.education
    }

    /// All emitted events.
    pub fn events(&self) -> &[EventRecord] {
        self.events.records()
    }

    /// Mine `blocks` blocks, each `seconds_per_block` apart.
    pub fn advance_blocks(&mut self, blocks: u64, seconds_per_block: u64) -> Result<(), ClockError> {
        self.clock.advance_blocks(blocks, seconds_per_block)?;
        debug!(
            block_height = self.clock.block_height(),
            block_time = %self.clock.block_time(),
            "advanced chain clock"
        );
        Ok(())
    }

    /// Jump block time without mining blocks.
    pub fn set_block_time(&mut self, time: Timestamp) {
        self.clock.set_block_time(time);
        debug!(block_time = %time, "set block time");
    }

    /// A serializable copy of the full state.
    pub fn snapshot(&self) -> SuiteSnapshot {
        SuiteSnapshot::capture(self)
    }

    // ── Issuance contract ───────────────────────────────────────────

    /// Transfer ownership. Owner only (100).
    pub fn set_contract_owner(
        &mut self,
        sender: &Principal,
        new_owner: &Principal,
    ) -> Result<(), IssuanceError> {
        if !self.gate.is_allowed(sender, Action::Admin) {
            return Err(rejected(
                "set-contract-owner",
                sender,
                IssuanceError::OwnerTransferDenied { caller: sender.clone() },
            ));
        }
        let previous = self.gate.owner().clone();
        self.gate.transfer_ownership(new_owner.clone());
        info!(%previous, owner = %new_owner, "contract owner changed");
        self.events.emit(
            &self.clock,
            &self.contracts.issuance,
            RegistryEvent::OwnerChanged {
                previous,
                owner: new_owner.clone(),
            },
        );
        Ok(())
    }

    /// Authorize an issuer. Owner only (101).
    pub fn add_authorized_issuer(
        &mut self,
        sender: &Principal,
        issuer: &Principal,
    ) -> Result<(), IssuanceError> {
        if !self.gate.is_allowed(sender, Action::Admin) {
            return Err(rejected(
                "add-authorized-issuer",
                sender,
                IssuanceError::IssuerGrantDenied { caller: sender.clone() },
            ));
        }
        let contract = self.contracts.issuance.clone();
        self.grant(&contract, Role::Issuer, issuer);
        Ok(())
    }

    /// Whether `issuer` is an authorized issuer.
    pub fn is_authorized_issuer(&self, issuer: &Principal) -> bool {
        self.gate.has_role(Role::Issuer, issuer)
    }

    /// Issue a credential stamped with the current block time.
    ///
    /// Fails with 102 if the sender is not an authorized issuer, then with
    /// 103 if `(credential_id, recipient)` already exists.
    pub fn issue_credential(
        &mut self,
        sender: &Principal,
        credential_id: &CredentialId,
        recipient: &Principal,
        credential_type: impl Into<String>,
        expiry_date: Timestamp,
        metadata_uri: impl Into<String>,
    ) -> Result<(), IssuanceError> {
        const OP: &str = "issue-credential";
        if !self.gate.is_allowed(sender, Action::Issue) {
            return Err(rejected(
                OP,
                sender,
                IssuanceError::UnauthorizedIssuer { caller: sender.clone() },
            ));
        }

        let credential = Credential {
            issuer: sender.clone(),
            credential_type: credential_type.into(),
            issue_date: self.clock.block_time(),
            expiry_date,
            metadata_uri: metadata_uri.into(),
            revoked: false,
        };
        if !self
            .credentials
            .insert(CredentialKey::new(credential_id, recipient), credential)
        {
            return Err(rejected(
                OP,
                sender,
                IssuanceError::DuplicateCredential {
                    credential_id: credential_id.clone(),
                    recipient: recipient.clone(),
                },
            ));
        }

        info!(
            issuer = %sender,
            %credential_id,
            %recipient,
            expiry_date = %expiry_date,
            "credential issued"
        );
        self.events.emit(
            &self.clock,
            &self.contracts.issuance,
            RegistryEvent::CredentialIssued {
                credential_id: credential_id.clone(),
                recipient: recipient.clone(),
                issuer: sender.clone(),
            },
        );
        Ok(())
    }

    /// Look up a credential.
    pub fn get_credential(
        &self,
        credential_id: &CredentialId,
        recipient: &Principal,
    ) -> Option<&Credential> {
        self.credentials.get(credential_id, recipient)
    }

    /// Internal revocation hook of the issuance contract.
    ///
    /// Fails with 400 if the credential does not exist, then with 401 unless
    /// the sender is the owner or the revocation registry contract.
    pub fn mark_credential_revoked(
        &mut self,
        sender: &Principal,
        credential_id: &CredentialId,
        recipient: &Principal,
    ) -> Result<(), MarkRevokedError> {
        const OP: &str = "mark-credential-revoked";
        if !self.credentials.contains(credential_id, recipient) {
            return Err(rejected(
                OP,
                sender,
                MarkRevokedError::NotFound {
                    credential_id: credential_id.clone(),
                    recipient: recipient.clone(),
                },
            ));
        }
        if !self.gate.is_owner(sender) && sender != &self.contracts.revocation {
            return Err(rejected(
                OP,
                sender,
                MarkRevokedError::UnauthorizedCaller { caller: sender.clone() },
            ));
        }

        match self.credentials.mark_revoked(credential_id, recipient) {
            Some(RevokeOutcome::Revoked) => {
                info!(%credential_id, %recipient, revoked_by = %sender, "credential revoked");
                self.events.emit(
                    &self.clock,
                    &self.contracts.issuance,
                    RegistryEvent::CredentialRevoked {
                        credential_id: credential_id.clone(),
                        recipient: recipient.clone(),
                        revoked_by: sender.clone(),
                    },
                );
            }
            Some(RevokeOutcome::AlreadyRevoked) => {
                debug!(%credential_id, %recipient, "credential already revoked");
            }
            None => {
                return Err(MarkRevokedError::NotFound {
                    credential_id: credential_id.clone(),
                    recipient: recipient.clone(),
                })
            }
        }
        Ok(())
    }

    /// Credentials held by `recipient`, ordered by credential id.
    pub fn credentials_for(&self, recipient: &Principal) -> Vec<(&CredentialId, &Credential)> {
        self.credentials.for_recipient(recipient).collect()
    }

    // ── Verification contract ───────────────────────────────────────

    /// Verify a credential at the current block time.
    ///
    /// Fails with 200 (absent), 201 (revoked), or 202 (block time past expiry).
    pub fn verify_credential(
        &self,
        credential_id: &CredentialId,
        recipient: &Principal,
    ) -> Result<&Credential, VerificationError> {
        self.credentials
            .verify(credential_id, recipient, self.clock.block_time())
            .map_err(|err| {
                debug!(%credential_id, %recipient, code = err.code(), "verification failed");
                err
            })
    }

    /// The computed status at the current block time, if the credential exists.
    pub fn credential_status(
        &self,
        credential_id: &CredentialId,
        recipient: &Principal,
    ) -> Option<CredentialStatus> {
        self.credentials
            .get(credential_id, recipient)
            .map(|c| c.status_at(self.clock.block_time()))
    }

    // ── Revocation registry ─────────────────────────────────────────

    /// Authorize a revoker. Owner only (102).
    pub fn add_authorized_revoker(
        &mut self,
        sender: &Principal,
        revoker: &Principal,
    ) -> Result<(), RevocationError> {
        if !self.gate.is_allowed(sender, Action::Admin) {
            return Err(rejected(
                "add-authorized-revoker",
                sender,
                RevocationError::RevokerGrantDenied { caller: sender.clone() },
            ));
        }
        let contract = self.contracts.revocation.clone();
        self.grant(&contract, Role::Revoker, revoker);
        Ok(())
    }

    /// Whether `revoker` is an authorized revoker.
    pub fn is_authorized_revoker(&self, revoker: &Principal) -> bool {
        self.gate.has_role(Role::Revoker, revoker)
    }

    /// Revoke a credential.
    ///
    /// Fails with 300 unless the sender is an authorized revoker or the
    /// owner, then with 301 if the credential does not exist. On success the
    /// issuance contract's hook is called as the revocation registry.
    pub fn revoke_credential(
        &mut self,
        sender: &Principal,
        credential_id: &CredentialId,
        recipient: &Principal,
    ) -> Result<(), RevocationError> {
        const OP: &str = "revoke-credential";
        if !self.gate.is_allowed(sender, Action::Revoke) {
            return Err(rejected(
                OP,
                sender,
                RevocationError::UnauthorizedRevoker { caller: sender.clone() },
            ));
        }
        if !self.credentials.contains(credential_id, recipient) {
            return Err(rejected(
                OP,
                sender,
                RevocationError::NotFound {
                    credential_id: credential_id.clone(),
                    recipient: recipient.clone(),
                },
            ));
        }
        debug!(requested_by = %sender, %credential_id, %recipient, "forwarding revocation to issuance contract");
        let registry = self.contracts.revocation.clone();
        self.mark_credential_revoked(&registry, credential_id, recipient)?;
        Ok(())
    }

    // ── Continuing education contract ───────────────────────────────

    /// Authorize an education provider. Owner only (102).
    pub fn add_authorized_provider(
        &mut self,
        sender: &Principal,
        provider: &Principal,
    ) -> Result<(), EducationError> {
        if !self.gate.is_allowed(sender, Action::Admin) {
            return Err(rejected(
                "add-authorized-provider",
                sender,
                EducationError::ProviderGrantDenied { caller: sender.clone() },
            ));
        }
        let contract = self.contracts.education.clone();
        self.grant(&contract, Role::Provider, provider);
        Ok(())
    }

    /// Whether `provider` is an authorized provider.
    pub fn is_authorized_provider(&self, provider: &Principal) -> bool {
        self.gate.has_role(Role::Provider, provider)
    }

    /// Add education credits toward an existing credential.
    ///
    /// Fails with 400 if the sender is not an authorized provider, 401 if
    /// the credential does not exist, 402 if the total would overflow.
    /// Revoked and expired credentials still accept credits.
    pub fn add_education_credits(
        &mut self,
        sender: &Principal,
        recipient: &Principal,
        credential_id: &CredentialId,
        credits: u64,
        activity_type: impl Into<String>,
        metadata_uri: impl Into<String>,
    ) -> Result<(), EducationError> {
        const OP: &str = "add-education-credits";
        if !self.gate.is_allowed(sender, Action::Provide) {
            return Err(rejected(
                OP,
                sender,
                EducationError::UnauthorizedProvider { caller: sender.clone() },
            ));
        }
        if !self.credentials.contains(credential_id, recipient) {
            return Err(rejected(
                OP,
                sender,
                EducationError::CredentialNotFound {
                    credential_id: credential_id.clone(),
                    recipient: recipient.clone(),
                },
            ));
        }

        let entry = CreditHistoryEntry {
            provider: sender.clone(),
            credits,
            activity_type: activity_type.into(),
            date: self.clock.block_time(),
            metadata_uri: metadata_uri.into(),
        };
        let receipt = self
            .education
            .record(CreditKey::new(recipient, credential_id), entry)
            .map_err(|err| rejected(OP, sender, err))?;

        info!(
            provider = %sender,
            %recipient,
            %credential_id,
            credits,
            total_credits = receipt.total_credits,
            entry_index = receipt.entry_index,
            "education credits added"
        );
        self.events.emit(
            &self.clock,
            &self.contracts.education,
            RegistryEvent::CreditsAdded {
                recipient: recipient.clone(),
                credential_id: credential_id.clone(),
                provider: sender.clone(),
                credits,
                entry_index: receipt.entry_index,
            },
        );
        Ok(())
    }

    /// Running credit total, if credits were ever added.
    pub fn get_total_credits(
        &self,
        recipient: &Principal,
        credential_id: &CredentialId,
    ) -> Option<&CreditBalance> {
        self.education.balance(recipient, credential_id)
    }

    /// History entry `entry_id`, if in range.
    pub fn get_credit_history_entry(
        &self,
        recipient: &Principal,
        credential_id: &CredentialId,
        entry_id: u64,
    ) -> Option<&CreditHistoryEntry> {
        self.education.entry(recipient, credential_id, entry_id)
    }

    /// Full credit history in insertion order.
    pub fn credit_history(
        &self,
        recipient: &Principal,
        credential_id: &CredentialId,
    ) -> &[CreditHistoryEntry] {
        self.education.history(recipient, credential_id)
    }

    /// Number of history entries, i.e. the index the next addition gets.
    pub fn entry_count(&self, recipient: &Principal, credential_id: &CredentialId) -> u64 {
        self.education.entry_count(recipient, credential_id)
    }

    fn grant(&mut self, contract: &Principal, role: Role, principal: &Principal) {
        if self.gate.grant(role, principal.clone()) {
            info!(%role, %principal, "role granted");
            self.events.emit(
                &self.clock,
                contract,
                RegistryEvent::RoleGranted {
                    role,
                    principal: principal.clone(),
                },
            );
        } else {
            debug!(%role, %principal, "role already granted");
        }
    }
}
