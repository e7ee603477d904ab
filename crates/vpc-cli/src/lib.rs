//! # vpc-cli: Credentials Suite Command-Line Interface
//!
//! Drives an in-process [`vpc_registry::CredentialSuite`] from call
//! scripts, so issuance, revocation, and credit flows can be replayed and
//! their final state compared by digest.
//!
//! ## Subcommands
//!
//! - `run`: replay a script and print per-step outcomes and the final digest
//! - `validate`: parse and check a script without executing it
//! - `config`: print the effective configuration
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers live here.
//! - Contract rejections are data, printed as outcomes. Only I/O, parse,
//!   and clock failures end the process with an error.

pub mod config;
pub mod run;
pub mod script;
pub mod validate;
