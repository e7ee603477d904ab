//! # Chain Clock
//!
//! Logical block height and block time. Every timestamp the registries
//! store (issue dates, balance updates, history dates, event times) is read
//! from here, never from the wall clock, so a replayed call sequence
//! produces identical state.

use serde::{Deserialize, Serialize};
use tracing::warn;

use vpc_core::Timestamp;

use crate::error::ClockError;

/// Current block height and block time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainClock {
    block_height: u64,
    block_time: Timestamp,
}

impl ChainClock {
    /// A clock at the given genesis height and time.
    pub fn new(block_height: u64, block_time: Timestamp) -> Self {
        Self {
            block_height,
            block_time,
        }
    }

    /// Current block height.
    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    /// Current block time.
    pub fn block_time(&self) -> Timestamp {
        self.block_time
    }

    /// Mine `blocks` blocks, each `seconds_per_block` apart.
    ///
    /// Leaves the clock unchanged on overflow.
    pub fn advance_blocks(&mut self, blocks: u64, seconds_per_block: u64) -> Result<(), ClockError> {
        let overflow = ClockError::Overflow { blocks };
        let height = self.block_height.checked_add(blocks).ok_or(overflow.clone())?;
        let elapsed = blocks.checked_mul(seconds_per_block).ok_or(overflow.clone())?;
        let time = self.block_time.checked_add_secs(elapsed).ok_or(overflow)?;
        self.block_height = height;
        self.block_time = time;
        Ok(())
    }

    /// Jump block time to `time` without mining blocks.
    ///
    /// Moving backwards is allowed but logged.
    pub fn set_block_time(&mut self, time: Timestamp) {
        if time < self.block_time {
            warn!(from = %self.block_time, to = %time, "block time moved backwards");
        }
        self.block_time = time;
    }
}
