//! # Identity Newtypes
//!
//! `Principal` identifies a caller (a standard account or a deployed
//! contract); `CredentialId` names a credential within the issuance
//! contract. Keeping them distinct means a recipient can never be passed
//! where a credential id is expected, and composite keys built from them
//! are tuples rather than delimiter-joined strings.
//!
//! Both types validate on construction and on deserialization, so every
//! value held by a registry is well-formed. Deserialization also accepts
//! integer scalars (`credential_id: 2024` in YAML) and stores their decimal
//! text; ids with leading zeros must be quoted to keep them.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::VpcError;

/// Upper bound on the byte length of any identifier.
pub const MAX_IDENTIFIER_LEN: usize = 128;

/// Separator between a deployer address and a contract name.
const CONTRACT_SEPARATOR: char = '.';

/// An opaque caller identity, compared by equality for authorization.
///
/// Standard principals are bare addresses (`ST1PQHQ…`). Contract principals
/// are `<deployer>.<contract-name>` and are built with
/// [`Principal::contract`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct Principal(String);

impl Principal {
    /// Validate and wrap a principal string.
    ///
    /// # Errors
    ///
    /// Rejects empty input, input longer than [`MAX_IDENTIFIER_LEN`] bytes,
    /// and input containing whitespace or control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, VpcError> {
        let value = value.into();
        let reason = if value.is_empty() {
            Some("must not be empty")
        } else if value.len() > MAX_IDENTIFIER_LEN {
            Some("exceeds 128 bytes")
        } else if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            Some("contains whitespace or control characters")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(VpcError::InvalidPrincipal { value, reason }),
            None => Ok(Self(value)),
        }
    }

    /// Build the contract principal `<deployer>.<name>`.
    ///
    /// # Errors
    ///
    /// Fails if `deployer` is itself a contract principal, if `name` is
    /// empty or contains the separator, or if the joined value is invalid.
    pub fn contract(deployer: &Principal, name: &str) -> Result<Self, VpcError> {
        if deployer.is_contract() {
            return Err(VpcError::InvalidPrincipal {
                value: deployer.0.clone(),
                reason: "contract principals cannot deploy contracts",
            });
        }
        if name.is_empty() || name.contains(CONTRACT_SEPARATOR) {
            return Err(VpcError::InvalidPrincipal {
                value: name.to_string(),
                reason: "contract name must be non-empty and must not contain '.'",
            });
        }
        Self::new(format!("{}{CONTRACT_SEPARATOR}{name}", deployer.0))
    }

    /// Whether this principal names a deployed contract.
    pub fn is_contract(&self) -> bool {
        self.0.contains(CONTRACT_SEPARATOR)
    }

    /// The contract name, for contract principals.
    pub fn contract_name(&self) -> Option<&str> {
        self.0
            .split_once(CONTRACT_SEPARATOR)
            .map(|(_, name)| name)
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Principal {
    type Error = VpcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Principal> for String {
    fn from(principal: Principal) -> Self {
        principal.0
    }
}

impl std::str::FromStr for Principal {
    type Err = VpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = deserializer.deserialize_any(ScalarVisitor)?;
        Self::new(value).map_err(de::Error::custom)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a credential within the issuance contract (e.g. `CERT-123`).
///
/// The same id may be issued to many recipients; uniqueness is enforced on
/// the `(CredentialId, Principal)` pair by the registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct CredentialId(String);

impl CredentialId {
    /// Validate and wrap a credential identifier.
    ///
    /// # Errors
    ///
    /// Rejects empty input, input longer than [`MAX_IDENTIFIER_LEN`] bytes,
    /// and input containing control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, VpcError> {
        let value = value.into();
        let reason = if value.is_empty() {
            Some("must not be empty")
        } else if value.len() > MAX_IDENTIFIER_LEN {
            Some("exceeds 128 bytes")
        } else if value.chars().any(char::is_control) {
            Some("contains control characters")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(VpcError::InvalidIdentifier { value, reason }),
            None => Ok(Self(value)),
        }
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CredentialId {
    type Error = VpcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CredentialId> for String {
    fn from(id: CredentialId) -> Self {
        id.0
    }
}

impl std::str::FromStr for CredentialId {
    type Err = VpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for CredentialId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = deserializer.deserialize_any(ScalarVisitor)?;
        Self::new(value).map_err(de::Error::custom)
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads a string or integer scalar as identifier text.
struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer identifier")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }
}
