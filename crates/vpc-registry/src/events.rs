//! # Event Log
//!
//! Append-only record of successful state changes, stamped with the block
//! that produced them and the contract that emitted them. Rejected calls
//! and no-op calls (re-granting a role, re-revoking) leave no record.

use serde::{Deserialize, Serialize};

use vpc_core::{CredentialId, Principal, Timestamp};

use crate::authorization::Role;
use crate::clock::ChainClock;

/// A state change emitted by one of the contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// The administrative principal changed.
    OwnerChanged {
        /// Previous owner.
        previous: Principal,
        /// New owner.
        owner: Principal,
    },
    /// A principal was added to a role set.
    RoleGranted {
        /// The role.
        role: Role,
        /// The new member.
        principal: Principal,
    },
    /// A credential was issued.
    CredentialIssued {
        /// The credential id.
        credential_id: CredentialId,
        /// The recipient.
        recipient: Principal,
        /// The issuing principal.
        issuer: Principal,
    },
    /// A credential was revoked.
    CredentialRevoked {
        /// The credential id.
        credential_id: CredentialId,
        /// The recipient.
        recipient: Principal,
        /// The principal that requested revocation.
        revoked_by: Principal,
    },
    /// Education credits were added.
    CreditsAdded {
        /// The recipient.
        recipient: Principal,
        /// The credential the credits count toward.
        credential_id: CredentialId,
        /// The provider.
        provider: Principal,
        /// Credits added.
        credits: u64,
        /// History index of the new entry.
        entry_index: u64,
    },
}

/// An event with its position and block context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Zero-based position in the log.
    pub sequence: u64,
    /// Block height at emission.
    pub block_height: u64,
    /// Block time at emission.
    pub block_time: Timestamp,
    /// The emitting contract principal.
    pub contract: Principal,
    /// The event payload.
    pub event: RegistryEvent,
}

/// The append-only event log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event at the clock's current block.
    pub fn emit(&mut self, clock: &ChainClock, contract: &Principal, event: RegistryEvent) {
        let sequence = self.records.len() as u64;
        self.records.push(EventRecord {
            sequence,
            block_height: clock.block_height(),
            block_time: clock.block_time(),
            contract: contract.clone(),
            event,
        });
    }

    /// All records in emission order.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    #[test]
    fn emit_assigns_sequence_and_block() {
        let mut clock = ChainClock::new(100, Timestamp::from_epoch_secs(1_648_000_000).unwrap());
        let mut log = EventLog::new();
        let contract = p("OWNER.credential-issuance");

        log.emit(
            &clock,
            &contract,
            RegistryEvent::RoleGranted { role: Role::Issuer, principal: p("ISSUER") },
        );
        clock.advance_blocks(1, 600).unwrap();
        log.emit(
            &clock,
            &contract,
            RegistryEvent::OwnerChanged { previous: p("OWNER"), owner: p("NEW") },
        );

        assert_eq!(log.records().len(), 2);
        assert_eq!(log.records()[0].sequence, 0);
        assert_eq!(log.records()[0].block_height, 100);
        assert_eq!(log.records()[1].sequence, 1);
        assert_eq!(log.records()[1].block_height, 101);
        assert_eq!(log.records()[1].block_time.epoch_secs(), 1_648_000_600);
    }

    #[test]
    fn event_json_is_tagged() {
        let event = RegistryEvent::CreditsAdded {
            recipient: p("R"),
            credential_id: CredentialId::new("CERT-123").unwrap(),
            provider: p("PROV"),
            credits: 10,
            entry_index: 0,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "credits_added");
        assert_eq!(json["credits"], 10);
        let back: RegistryEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
