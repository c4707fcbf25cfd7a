//! Auction configuration.
//!
//! Fixed at deployment; the ledger rejects a deployment whose configuration
//! does not validate.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Public upper bound on any bid, in the smallest currency unit (10^19).
pub const MAX_BID: u64 = 10_000_000_000_000_000_000;

/// Deterministic rule used when two verified bids rank equally.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The bid submitted first wins
    #[default]
    EarliestBid,
    /// The bidder with the numerically smallest address wins
    LowestAddress,
}

/// Parameters of a single auction instance.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Public bound B on bid values
    pub max_bid: u64,
    /// Last block at which bids are accepted
    pub bid_block_number: u64,
    /// Last block at which challenge responses are accepted
    pub reveal_block_number: u64,
    /// Last block at which the winner may pay
    pub winner_payment_block_number: u64,
    pub max_bidders_count: u32,
    /// Minimum stake for the auctioneer and minimum deposit per bid
    pub fairness_fees: u64,
    /// Number of challenge/verify rounds (k)
    pub proof_rounds: u32,
    /// Skip every block-height check. Never enable outside local testing.
    pub testing: bool,
    pub tie_break: TieBreak,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            max_bid: MAX_BID,
            bid_block_number: 50,
            reveal_block_number: 100,
            winner_payment_block_number: 150,
            max_bidders_count: 5,
            fairness_fees: 1,
            proof_rounds: 1,
            testing: false,
            tie_break: TieBreak::default(),
        }
    }
}

impl AuctionConfig {
    /// Configuration for local runs: block-height checks disabled.
    pub fn testing() -> Self {
        Self {
            testing: true,
            ..Default::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bid == 0 || self.max_bid > MAX_BID {
            return Err(ConfigError::InvalidMaxBid {
                got: self.max_bid,
                max: MAX_BID,
            });
        }
        if self.max_bidders_count == 0 {
            return Err(ConfigError::NoBidders);
        }
        if self.proof_rounds == 0 {
            return Err(ConfigError::NoProofRounds);
        }

        // Deadlines are only meaningful when block checks are enforced
        if !self.testing
            && (self.bid_block_number >= self.reveal_block_number
                || self.reveal_block_number >= self.winner_payment_block_number)
        {
            return Err(ConfigError::InvalidTiming {
                bid: self.bid_block_number,
                reveal: self.reveal_block_number,
                payment: self.winner_payment_block_number,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Maximum bid must be between 1 and {max}, got {got}")]
    InvalidMaxBid { got: u64, max: u64 },

    #[error("Maximum bidder count cannot be zero")]
    NoBidders,

    #[error("At least one proof round is required")]
    NoProofRounds,

    #[error("Block thresholds must increase: bid {bid}, reveal {reveal}, payment {payment}")]
    InvalidTiming { bid: u64, reveal: u64, payment: u64 },
}
