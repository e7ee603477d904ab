//! # Suite Snapshot
//!
//! A serializable copy of the full suite state and its content digest.
//! Maps are flattened to ordered lists of records so the snapshot has a
//! single canonical JSON form regardless of key type.

use serde::{Deserialize, Serialize};

use vpc_core::{sha256_digest, CanonicalBytes, ContentDigest, CredentialId, Principal, VpcError};

use crate::authorization::Role;
use crate::clock::ChainClock;
use crate::credential::Credential;
use crate::education::{CreditBalance, CreditHistoryEntry};
use crate::suite::{ContractPrincipals, CredentialSuite};

/// A credential with its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialEntry {
    /// The credential id.
    pub credential_id: CredentialId,
    /// The recipient.
    pub recipient: Principal,
    /// The stored record.
    pub credential: Credential,
}

/// A credit balance with its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceEntry {
    /// The recipient.
    pub recipient: Principal,
    /// The credential the credits count toward.
    pub credential_id: CredentialId,
    /// The running total.
    pub balance: CreditBalance,
}

/// A credit history with its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The recipient.
    pub recipient: Principal,
    /// The credential the credits count toward.
    pub credential_id: CredentialId,
    /// Additions in index order.
    pub entries: Vec<CreditHistoryEntry>,
}

/// Full suite state at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteSnapshot {
    /// The administrative principal.
    pub owner: Principal,
    /// The deployed contract principals.
    pub contracts: ContractPrincipals,
    /// Block height and time at capture.
    pub clock: ChainClock,
    /// Authorized issuers, sorted.
    pub issuers: Vec<Principal>,
    /// Authorized revokers, sorted.
    pub revokers: Vec<Principal>,
    /// Authorized providers, sorted.
    pub providers: Vec<Principal>,
    /// Credentials in key order.
    pub credentials: Vec<CredentialEntry>,
    /// Credit balances in key order.
    pub balances: Vec<BalanceEntry>,
    /// Credit histories in key order.
    pub histories: Vec<HistoryEntry>,
    /// Number of events emitted so far.
    pub event_count: u64,
}

impl SuiteSnapshot {
    /// Capture the state of `suite`.
    pub fn capture(suite: &CredentialSuite) -> Self {
        let gate = suite.gate();
        let members = |role| gate.members(role).cloned().collect::<Vec<_>>();

        Self {
            owner: suite.owner().clone(),
            contracts: suite.contracts().clone(),
            clock: *suite.clock(),
            issuers: members(Role::Issuer),
            revokers: members(Role::Revoker),
            providers: members(Role::Provider),
            credentials: suite
                .credentials()
                .iter()
                .map(|(key, credential)| CredentialEntry {
                    credential_id: key.credential_id.clone(),
                    recipient: key.recipient.clone(),
                    credential: credential.clone(),
                })
                .collect(),
            balances: suite
                .education()
                .balances()
                .map(|(key, balance)| BalanceEntry {
                    recipient: key.recipient.clone(),
                    credential_id: key.credential_id.clone(),
                    balance: *balance,
                })
                .collect(),
            histories: suite
                .education()
                .histories()
                .map(|(key, entries)| HistoryEntry {
                    recipient: key.recipient.clone(),
                    credential_id: key.credential_id.clone(),
                    entries: entries.to_vec(),
                })
                .collect(),
            event_count: suite.events().len() as u64,
        }
    }

    /// SHA-256 of the canonical JSON form.
    pub fn digest(&self) -> Result<ContentDigest, VpcError> {
        let canonical = CanonicalBytes::new(self)?;
        Ok(sha256_digest(&canonical))
    }

    /// Pretty-printed JSON for humans and files.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpc_core::Timestamp;

    fn p(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn suite() -> CredentialSuite {
        let clock = ChainClock::new(100, Timestamp::from_epoch_secs(1_648_000_000).unwrap());
        CredentialSuite::deploy(p("OWNER"), &p("OWNER"), clock).unwrap()
    }

    fn populate(s: &mut CredentialSuite) {
        let id = CredentialId::new("CERT-123").unwrap();
        s.add_authorized_issuer(&p("OWNER"), &p("ISSUER")).unwrap();
        s.add_authorized_provider(&p("OWNER"), &p("PROVIDER")).unwrap();
        s.issue_credential(
            &p("ISSUER"),
            &id,
            &p("RECIPIENT"),
            "Professional Engineer",
            Timestamp::from_epoch_secs(1_680_000_000).unwrap(),
            "ipfs://meta",
        )
        .unwrap();
        s.add_education_credits(&p("PROVIDER"), &p("RECIPIENT"), &id, 10, "Workshop", "/w1")
            .unwrap();
    }

    #[test]
    fn capture_flattens_state() {
        let mut s = suite();
        populate(&mut s);
        let snap = s.snapshot();
        assert_eq!(snap.issuers, vec![p("ISSUER")]);
        assert!(snap.revokers.is_empty());
        assert_eq!(snap.credentials.len(), 1);
        assert_eq!(snap.balances[0].balance.total_credits, 10);
        assert_eq!(snap.histories[0].entries.len(), 1);
        assert_eq!(snap.event_count, 4);
    }

    #[test]
    fn identical_histories_share_a_digest() {
        let mut a = suite();
        let mut b = suite();
        populate(&mut a);
        populate(&mut b);
        assert_eq!(a.snapshot().digest().unwrap(), b.snapshot().digest().unwrap());
    }

    #[test]
    fn digest_tracks_state_changes() {
        let mut s = suite();
        let before = s.snapshot().digest().unwrap();
        populate(&mut s);
        assert_ne!(before, s.snapshot().digest().unwrap());
    }

    #[test]
    fn pretty_json_round_trips() {
        let mut s = suite();
        populate(&mut s);
        let snap = s.snapshot();
        let back: SuiteSnapshot = serde_json::from_str(&snap.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, snap);
    }
}
