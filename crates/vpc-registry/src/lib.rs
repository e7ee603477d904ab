//! # vpc-registry: Credential Suite Registries
//!
//! The four cooperating contracts of the credentials system, modelled as
//! one in-process [`CredentialSuite`]:
//!
//! - **Credential issuance**: owner administration, the issuer allow-list,
//!   the credential registry, and the internal revocation hook.
//! - **Credential verification**: read-only validity checks against the
//!   chain clock.
//! - **Revocation registry**: the revoker allow-list and the revocation
//!   call that crosses into the issuance contract.
//! - **Continuing education**: the provider allow-list and per-credential
//!   credit balances with an append-only history.
//!
//! Every rejected call returns a per-contract error whose `code()` is the
//! numeric code callers match on. Rejected calls never mutate state.

pub mod authorization;
pub mod clock;
pub mod credential;
pub mod education;
pub mod error;
pub mod events;
pub mod snapshot;
pub mod suite;

pub use authorization::{Action, AuthorizationGate, Role};
pub use clock::ChainClock;
pub use credential::{Credential, CredentialKey, CredentialRegistry, CredentialStatus};
pub use education::{CreditBalance, CreditHistoryEntry, CreditKey, EducationLedger};
pub use error::{
    ClockError, ContractError, EducationError, IssuanceError, MarkRevokedError, RegistryError,
    RevocationError, VerificationError,
};
pub use events::{EventRecord, RegistryEvent};
pub use snapshot::SuiteSnapshot;
pub use suite::{ContractPrincipals, CredentialSuite};
