//! Ledger error types.

use thiserror::Error;

use auction_crypto::CryptoError;
use auction_types::{AuctionState, ConfigError};

/// Errors returned by call handlers. A call that fails leaves the ledger
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Auction not found: {0}")]
    AuctionNotFound(String),

    #[error("Auction destroyed")]
    AuctionDestroyed,

    #[error("Invalid state. Expected: {expected}, Got: {got}")]
    InvalidState {
        expected: AuctionState,
        got: AuctionState,
    },

    #[error("Bidding closed at block {deadline}, current block {height}")]
    BiddingClosed { height: u64, deadline: u64 },

    #[error("Bidding open until block {deadline}, current block {height}")]
    BiddingStillOpen { height: u64, deadline: u64 },

    #[error("Reveal deadline passed")]
    RevealDeadlinePassed,

    #[error("Payment deadline passed")]
    PaymentDeadlinePassed,

    #[error("Not authorized")]
    NotAuthorized,

    #[error("Already submitted bid")]
    AlreadyBid,

    #[error("Bidder limit of {max} reached")]
    TooManyBidders { max: u32 },

    #[error("Insufficient deposit: need {required}, got {got}")]
    InsufficientDeposit { required: u64, got: u64 },

    #[error("No pending bids")]
    NoPendingBids,

    #[error("Unknown bidder: {0}")]
    UnknownBidder(String),

    #[error("Bid is not pending")]
    BidNotPending,

    #[error("Split already submitted for this round")]
    DuplicateSplit,

    #[error("No challenge issued for bidder")]
    MissingChallenge,

    #[error("Challenge already answered")]
    AlreadyAnswered,

    #[error("Invalid response: {0}")]
    InvalidResponse(CryptoError),

    #[error("No verified bids")]
    NoVerifiedBids,

    #[error("Not the winner")]
    NotWinner,

    #[error("Winner already claimed")]
    AlreadyClaimed,

    #[error("Winner has not claimed")]
    NotClaimed,

    #[error("Winner already paid")]
    AlreadyPaid,

    #[error("Bid {value} out of range, maximum {max}")]
    BidOutOfRange { value: u64, max: u64 },

    #[error("Opening does not match the stored commitment")]
    OpeningMismatch,

    #[error("Opened value {value} differs from deposit {deposit}")]
    DepositMismatch { value: u64, deposit: u64 },

    #[error("Nothing to withdraw")]
    WithdrawNotAvailable,

    #[error("Escrow not empty: {remaining} remaining")]
    EscrowNotEmpty { remaining: u128 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
