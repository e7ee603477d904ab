//! # Education Credit Ledger
//!
//! Continuing-education credits per `(recipient, credential id)`: a running
//! balance and an append-only history. The history index doubles as the
//! per-key entry counter; entry `n` is the `n`-th successful addition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vpc_core::{CredentialId, Principal, Timestamp};

use crate::error::EducationError;

/// Composite key of the credit ledger, ordered recipient first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditKey {
    /// The credential holder.
    pub recipient: Principal,
    /// The credential the credits count toward.
    pub credential_id: CredentialId,
}

impl CreditKey {
    /// Build a key from borrowed parts.
    pub fn new(recipient: &Principal, credential_id: &CredentialId) -> Self {
        Self {
            recipient: recipient.clone(),
            credential_id: credential_id.clone(),
        }
    }
}

/// Running credit total. Exists only after the first addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBalance {
    /// Sum of all credits added.
    pub total_credits: u64,
    /// Block time of the latest addition.
    pub last_updated: Timestamp,
}

/// One credit addition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditHistoryEntry {
    /// The provider that added the credits.
    pub provider: Principal,
    /// Credits added by this entry.
    pub credits: u64,
    /// Activity description (e.g. "Workshop").
    pub activity_type: String,
    /// Block time of the addition.
    pub date: Timestamp,
    /// Off-chain metadata pointer.
    pub metadata_uri: String,
}

/// Result of a successful addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditReceipt {
    /// History index assigned to the new entry.
    pub entry_index: u64,
    /// Balance after the addition.
    pub total_credits: u64,
}

/// Balances and histories keyed by `(recipient, credential id)`.
#[derive(Debug, Clone, Default)]
pub struct EducationLedger {
    balances: BTreeMap<CreditKey, CreditBalance>,
    history: BTreeMap<CreditKey, Vec<CreditHistoryEntry>>,
}

impl EducationLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `entry.credits` to the balance and append `entry` to the history.
    ///
    /// Either both the balance and the history change or neither does.
    pub fn record(
        &mut self,
        key: CreditKey,
        entry: CreditHistoryEntry,
    ) -> Result<CreditReceipt, EducationError> {
        let current = self.balances.get(&key).map_or(0, |b| b.total_credits);
        let total_credits =
            current
                .checked_add(entry.credits)
                .ok_or(EducationError::CreditOverflow {
                    total: current,
                    credits: entry.credits,
                })?;

        self.balances.insert(
            key.clone(),
            CreditBalance {
                total_credits,
                last_updated: entry.date,
            },
        );
        let entries = self.history.entry(key).or_default();
        let entry_index = entries.len() as u64;
        entries.push(entry);

        Ok(CreditReceipt {
            entry_index,
            total_credits,
        })
    }

    /// The balance, if credits were ever added.
    pub fn balance(&self, recipient: &Principal, credential_id: &CredentialId) -> Option<&CreditBalance> {
        self.balances.get(&CreditKey::new(recipient, credential_id))
    }

    /// The history entry at `index`, if in range.
    pub fn entry(
        &self,
        recipient: &Principal,
        credential_id: &CredentialId,
        index: u64,
    ) -> Option<&CreditHistoryEntry> {
        let index = usize::try_from(index).ok()?;
        self.history(recipient, credential_id).get(index)
    }

    /// The full history in insertion order; empty if none.
    pub fn history(&self, recipient: &Principal, credential_id: &CredentialId) -> &[CreditHistoryEntry] {
        self.history
            .get(&CreditKey::new(recipient, credential_id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of history entries, i.e. the next index to be assigned.
    pub fn entry_count(&self, recipient: &Principal, credential_id: &CredentialId) -> u64 {
        self.history(recipient, credential_id).len() as u64
    }

    /// All balances in key order.
    pub fn balances(&self) -> impl Iterator<Item = (&CreditKey, &CreditBalance)> {
        self.balances.iter()
    }

    /// All histories in key order.
    pub fn histories(&self) -> impl Iterator<Item = (&CreditKey, &[CreditHistoryEntry])> {
        self.history.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
