//! # Temporal Types: UTC-Only Timestamps
//!
//! `Timestamp` is the single time type of the suite. Logical block time,
//! credential issue/expiry dates, balance update times, and history entry
//! dates are all `Timestamp`, so expiry checks are plain `>` comparisons.
//!
//! ## Invariants
//!
//! - Always UTC, truncated to whole seconds.
//! - Serializes as `YYYY-MM-DDTHH:MM:SSZ`; deserialization rejects any
//!   offset other than `Z`.
//!
//! Contract-style inputs (block time `1648000000`, expiry `1680000000`)
//! arrive as Unix epoch seconds and go through [`Timestamp::from_epoch_secs`].

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VpcError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// From Unix epoch seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, VpcError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| VpcError::InvalidTimestamp(format!("epoch seconds out of range: {secs}")))
    }

    /// Parse an RFC 3339 string. Only the `Z` suffix is accepted.
    pub fn parse(s: &str) -> Result<Self, VpcError> {
        if !s.ends_with('Z') {
            return Err(VpcError::InvalidTimestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| VpcError::InvalidTimestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// This timestamp moved forward by `secs` seconds, or `None` on overflow.
    pub fn checked_add_secs(&self, secs: u64) -> Option<Self> {
        let secs = i64::try_from(secs).ok()?;
        let delta = Duration::try_seconds(secs)?;
        self.0.checked_add_signed(delta).map(Self)
    }

    /// Render as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
