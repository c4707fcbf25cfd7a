//! Protocol error types.

use thiserror::Error;

use auction_crypto::CryptoError;
use auction_ledger::ExecutorError;
use auction_types::AuctionState;

/// Errors that can occur while driving an auction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Invalid state. Expected one of {expected:?}, Got: {got}")]
    InvalidState {
        expected: Vec<AuctionState>,
        got: AuctionState,
    },

    #[error("Bid {value} out of range, maximum {max}")]
    BidOutOfRange { value: u64, max: u64 },

    #[error("Bidder {0} already challenged this round")]
    DuplicateChallenge(String),

    #[error("Unknown bidder: {0}")]
    UnknownBidder(String),

    #[error("Opening for {0} does not match the stored commitment")]
    OpeningMismatch(String),

    #[error("No challenge issued for {0}")]
    MissingChallenge(String),

    #[error("No split generated for {0}")]
    MissingSplit(String),

    #[error("{0} is not the auctioneer")]
    NotAuctioneer(String),

    #[error("Auction made no progress in state {0}")]
    Stalled(AuctionState),

    #[error("Executor failure: {0}")]
    Executor(#[from] ExecutorError),
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
