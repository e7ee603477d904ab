//! # vpc-core: Foundational Types for the Credentials Suite
//!
//! Leaf crate of the workspace. Defines the primitives every registry
//! operation is expressed in, so that the registries themselves never handle
//! bare strings or raw epoch integers.
//!
//! ## Key Design Principles
//!
//! 1. **Validated newtypes for identities.** `Principal` and `CredentialId`
//!    reject empty, oversized, or control-character input at construction,
//!    including during deserialization.
//!
//! 2. **UTC-only timestamps.** `Timestamp` is seconds precision with a `Z`
//!    suffix, so logical block time and stored credential dates compare and
//!    serialize deterministically.
//!
//! 3. **`CanonicalBytes` for digests.** Snapshot digests are only computed
//!    over canonical bytes, never over ad-hoc `serde_json::to_vec()` output.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vpc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CanonicalizationError, VpcError};
pub use identity::{CredentialId, Principal};
pub use temporal::Timestamp;
