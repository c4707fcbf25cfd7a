//! The ledger interface the auction protocol drives.
//!
//! The executor is the single owner of auction state. Every state-changing
//! call either succeeds with a [`Receipt`] or fails with an
//! [`ExecutorError`] carrying the executor's reason; callers never retry.

use thiserror::Error;

use auction_types::{
    Address, AuctionConfig, AuctionState, BidRecord, BlockThresholds, Challenge, CurveDescriptor,
    DeployRequest, PedersenCommitment, Receipt, Scalar, SplitCommitment, SplitResponse,
};

/// Errors reported by a ledger executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// The ledger refused the call; its state is unchanged.
    #[error("{operation} rejected: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },

    /// The ledger could not be reached or failed internally.
    #[error("{operation} unavailable: {reason}")]
    Unavailable {
        operation: &'static str,
        reason: String,
    },
}

impl ExecutorError {
    pub fn operation(&self) -> &'static str {
        match self {
            ExecutorError::Rejected { operation, .. } | ExecutorError::Unavailable { operation, .. } => {
                *operation
            }
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            ExecutorError::Rejected { reason, .. } | ExecutorError::Unavailable { reason, .. } => {
                reason
            }
        }
    }
}

/// Result type for executor calls.
pub type ExecResult<T> = Result<T, ExecutorError>;

/// Typed access to an auction ledger.
///
/// `sender` is the account the call is issued from; the ledger enforces who
/// may call what.
pub trait LedgerExecutor: Send + Sync {
    // === Transactions ===

    /// Open an auction; `request.deposit` is the auctioneer's stake.
    fn deploy(&self, sender: &Address, request: DeployRequest) -> ExecResult<(Address, Receipt)>;

    fn bid(
        &self,
        sender: &Address,
        auction: &Address,
        commitment: PedersenCommitment,
        deposit: u64,
    ) -> ExecResult<Receipt>;

    fn zkp_commit(
        &self,
        sender: &Address,
        auction: &Address,
        bidder: &Address,
        split: SplitCommitment,
    ) -> ExecResult<Receipt>;

    fn commit_delta(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt>;

    fn zkp_verify(
        &self,
        sender: &Address,
        auction: &Address,
        bidder: &Address,
        response: SplitResponse,
    ) -> ExecResult<Receipt>;

    fn verify_all(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt>;

    fn claim_winner(
        &self,
        sender: &Address,
        auction: &Address,
        bidder: &Address,
        value: u64,
        blinding: Scalar,
    ) -> ExecResult<Receipt>;

    fn withdraw(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt>;

    fn winner_pay(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt>;

    fn destroy(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt>;

    // === Queries ===

    fn auction_state(&self, auction: &Address) -> ExecResult<AuctionState>;

    fn round(&self, auction: &Address) -> ExecResult<u32>;

    /// Splits submitted in the current round.
    fn split_count(&self, auction: &Address) -> ExecResult<u32>;

    fn highest_bid(&self, auction: &Address) -> ExecResult<Option<u64>>;

    fn winner(&self, auction: &Address) -> ExecResult<Option<Address>>;

    fn auctioneer(&self, auction: &Address) -> ExecResult<Address>;

    fn thresholds(&self, auction: &Address) -> ExecResult<BlockThresholds>;

    fn config(&self, auction: &Address) -> ExecResult<AuctionConfig>;

    fn curve(&self, auction: &Address) -> ExecResult<CurveDescriptor>;

    fn bids(&self, auction: &Address) -> ExecResult<Vec<BidRecord>>;

    fn challenge(&self, auction: &Address, bidder: &Address) -> ExecResult<Option<Challenge>>;

    /// Whether the current round's challenge for `bidder` has a response.
    fn answered(&self, auction: &Address, bidder: &Address) -> ExecResult<bool>;

    fn block_height(&self) -> ExecResult<u64>;
}
