//! # Credential Registry
//!
//! Credentials keyed by `(credential id, recipient)`. At most one record
//! exists per pair; records are never deleted and the only mutation is the
//! one-way `revoked` flag.
//!
//! ## Lifecycle
//!
//! ```text
//! NonExistent ──issue──▶ Active ──revoke──▶ Revoked (terminal)
//!                          │
//!                          └── block time > expiry ──▶ Expired (computed)
//! ```
//!
//! `Expired` is never stored. It is evaluated against the block time on
//! every read, so advancing the clock past the expiry date is enough to
//! change the status. Revocation takes precedence over expiry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vpc_core::{CredentialId, Principal, Timestamp};

use crate::error::VerificationError;

/// Composite key of the credential registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialKey {
    /// The credential id.
    pub credential_id: CredentialId,
    /// The recipient the credential was issued to.
    pub recipient: Principal,
}

impl CredentialKey {
    /// Build a key from borrowed parts.
    pub fn new(credential_id: &CredentialId, recipient: &Principal) -> Self {
        Self {
            credential_id: credential_id.clone(),
            recipient: recipient.clone(),
        }
    }
}

/// A stored credential record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// The issuer that created the record.
    pub issuer: Principal,
    /// Free-form credential type (e.g. "Professional Engineer").
    pub credential_type: String,
    /// Block time at issuance.
    pub issue_date: Timestamp,
    /// Expiry date supplied by the issuer.
    pub expiry_date: Timestamp,
    /// Off-chain metadata pointer (e.g. an `ipfs://` URI).
    pub metadata_uri: String,
    /// Whether the credential has been revoked.
    pub revoked: bool,
}

impl Credential {
    /// Whether `now` is strictly past the expiry date.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expiry_date
    }

    /// The computed status at `now`.
    pub fn status_at(&self, now: Timestamp) -> CredentialStatus {
        if self.revoked {
            CredentialStatus::Revoked
        } else if self.is_expired_at(now) {
            CredentialStatus::Expired
        } else {
            CredentialStatus::Active
        }
    }
}

/// Observable status of an existing credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialStatus {
    /// Issued, not revoked, not past expiry.
    Active,
    /// Not revoked but past expiry (computed, not stored).
    Expired,
    /// Revoked (terminal).
    Revoked,
}

impl std::fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Revoked => "REVOKED",
        };
        f.write_str(s)
    }
}

/// Outcome of flagging a credential revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
    /// The credential went from unrevoked to revoked.
    Revoked,
    /// The credential was already revoked; nothing changed.
    AlreadyRevoked,
}

/// Mapping `(credential id, recipient) → credential`.
#[derive(Debug, Clone, Default)]
pub struct CredentialRegistry {
    credentials: BTreeMap<CredentialKey, Credential>,
}

impl CredentialRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record. Returns `false` without touching the existing
    /// record if the key is already present.
    pub fn insert(&mut self, key: CredentialKey, credential: Credential) -> bool {
        match self.credentials.entry(key) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(credential);
                true
            }
        }
    }

    /// Look up a credential.
    pub fn get(&self, credential_id: &CredentialId, recipient: &Principal) -> Option<&Credential> {
        self.credentials
            .get(&CredentialKey::new(credential_id, recipient))
    }

    /// Whether a credential exists for the pair.
    pub fn contains(&self, credential_id: &CredentialId, recipient: &Principal) -> bool {
        self.get(credential_id, recipient).is_some()
    }

    /// Set the revoked flag. `None` if the credential does not exist.
    pub fn mark_revoked(
        &mut self,
        credential_id: &CredentialId,
        recipient: &Principal,
    ) -> Option<RevokeOutcome> {
        let credential = self
            .credentials
            .get_mut(&CredentialKey::new(credential_id, recipient))?;
        if credential.revoked {
            return Some(RevokeOutcome::AlreadyRevoked);
        }
        credential.revoked = true;
        Some(RevokeOutcome::Revoked)
    }

    /// Verify a credential at `now`.
    ///
    /// Checks run in order: existence (200), revocation (201), expiry (202).
    pub fn verify(
        &self,
        credential_id: &CredentialId,
        recipient: &Principal,
        now: Timestamp,
    ) -> Result<&Credential, VerificationError> {
        let credential =
            self.get(credential_id, recipient)
                .ok_or_else(|| VerificationError::NotFound {
                    credential_id: credential_id.clone(),
                    recipient: recipient.clone(),
                })?;
        match credential.status_at(now) {
            CredentialStatus::Active => Ok(credential),
            CredentialStatus::Revoked => Err(VerificationError::Revoked {
                credential_id: credential_id.clone(),
                recipient: recipient.clone(),
            }),
            CredentialStatus::Expired => Err(VerificationError::Expired {
                credential_id: credential_id.clone(),
                recipient: recipient.clone(),
                expiry_date: credential.expiry_date,
            }),
        }
    }

    /// All credentials issued to `recipient`, ordered by credential id.
    pub fn for_recipient(
        &self,
        recipient: &Principal,
    ) -> impl Iterator<Item = (&CredentialId, &Credential)> + '_ {
        let recipient = recipient.clone();
        self.credentials
            .iter()
            .filter(move |(key, _)| key.recipient == recipient)
            .map(|(key, credential)| (&key.credential_id, credential))
    }

    /// All records in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&CredentialKey, &Credential)> {
        self.credentials.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn id(s: &str) -> CredentialId {
        CredentialId::new(s).unwrap()
    }

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_epoch_secs(secs).unwrap()
    }

    fn engineer() -> Credential {
        Credential {
            issuer: p("ISSUER"),
            credential_type: "Professional Engineer".to_string(),
            issue_date: ts(1_648_000_000),
            expiry_date: ts(1_680_000_000),
            metadata_uri: "ipfs://QmXoypizjW3WknFiJnKLwHCnL72vedxjQkDDP1mXWo6uco".to_string(),
            revoked: false,
        }
    }

    fn registry_with_cert() -> CredentialRegistry {
        let mut r = CredentialRegistry::new();
        assert!(r.insert(CredentialKey::new(&id("CERT-123"), &p("RECIPIENT")), engineer()));
        r
    }

    #[test]
    fn insert_rejects_duplicate_and_keeps_original() {
        let mut r = registry_with_cert();
        let mut other = engineer();
        other.credential_type = "Architect".to_string();
        assert!(!r.insert(CredentialKey::new(&id("CERT-123"), &p("RECIPIENT")), other));
        assert_eq!(r.len(), 1);
        assert_eq!(
            r.get(&id("CERT-123"), &p("RECIPIENT")).unwrap().credential_type,
            "Professional Engineer"
        );
    }

    #[test]
    fn same_id_different_recipients_coexist() {
        let mut r = registry_with_cert();
        assert!(r.insert(CredentialKey::new(&id("CERT-123"), &p("OTHER")), engineer()));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn hyphenated_keys_do_not_collide() {
        let mut r = CredentialRegistry::new();
        assert!(r.insert(CredentialKey::new(&id("A-B"), &p("C")), engineer()));
        assert!(r.insert(CredentialKey::new(&id("A"), &p("B-C")), engineer()));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn verify_active() {
        let r = registry_with_cert();
        let c = r.verify(&id("CERT-123"), &p("RECIPIENT"), ts(1_648_000_000)).unwrap();
        assert_eq!(c, &engineer());
    }

    #[test]
    fn verify_at_exact_expiry_is_still_valid() {
        let r = registry_with_cert();
        assert!(r.verify(&id("CERT-123"), &p("RECIPIENT"), ts(1_680_000_000)).is_ok());
        assert!(matches!(
            r.verify(&id("CERT-123"), &p("RECIPIENT"), ts(1_680_000_001)),
            Err(VerificationError::Expired { .. })
        ));
    }

    #[test]
    fn verify_missing() {
        let r = registry_with_cert();
        assert!(matches!(
            r.verify(&id("CERT-456"), &p("RECIPIENT"), ts(1_648_000_000)),
            Err(VerificationError::NotFound { .. })
        ));
    }

    #[test]
    fn revoked_wins_over_expired() {
        let mut r = registry_with_cert();
        assert_eq!(
            r.mark_revoked(&id("CERT-123"), &p("RECIPIENT")),
            Some(RevokeOutcome::Revoked)
        );
        assert!(matches!(
            r.verify(&id("CERT-123"), &p("RECIPIENT"), ts(1_690_000_000)),
            Err(VerificationError::Revoked { .. })
        ));
    }

    #[test]
    fn mark_revoked_twice_reports_already_revoked() {
        let mut r = registry_with_cert();
        r.mark_revoked(&id("CERT-123"), &p("RECIPIENT"));
        assert_eq!(
            r.mark_revoked(&id("CERT-123"), &p("RECIPIENT")),
            Some(RevokeOutcome::AlreadyRevoked)
        );
        assert_eq!(r.mark_revoked(&id("CERT-456"), &p("RECIPIENT")), None);
    }

    #[test]
    fn status_transitions_with_time() {
        let c = engineer();
        assert_eq!(c.status_at(ts(1_648_000_000)), CredentialStatus::Active);
        assert_eq!(c.status_at(ts(1_690_000_000)), CredentialStatus::Expired);
        assert_eq!(CredentialStatus::Expired.to_string(), "EXPIRED");
    }

    #[test]
    fn for_recipient_filters_and_orders() {
        let mut r = registry_with_cert();
        r.insert(CredentialKey::new(&id("CERT-001"), &p("RECIPIENT")), engineer());
        r.insert(CredentialKey::new(&id("CERT-999"), &p("OTHER")), engineer());
        let ids: Vec<&str> = r
            .for_recipient(&p("RECIPIENT"))
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(ids, vec!["CERT-001", "CERT-123"]);
    }

    #[test]
    fn for_recipient_outlives_recipient_borrow() {
        let r = registry_with_cert();
        let held = {
            let recipient = p("RECIPIENT");
            r.for_recipient(&recipient)
        };
        assert_eq!(held.count(), 1);
    }

    #[test]
    fn credential_serializes_camel_case_fields() {
        let json = serde_json::to_value(engineer()).unwrap();
        assert_eq!(json["credentialType"], "Professional Engineer");
        assert_eq!(json["issueDate"], "2022-03-23T01:46:40Z");
        assert_eq!(json["expiryDate"], "2023-03-28T10:40:00Z");
        assert_eq!(json["revoked"], false);
        assert!(json.get("metadataUri").is_some());
    }
}
