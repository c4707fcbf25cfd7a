//! Call message types for the auction ledger.

use auction_types::{Address, DeployRequest, PedersenCommitment, Scalar, SplitCommitment, SplitResponse};
use borsh::{BorshDeserialize, BorshSerialize};

/// State-changing calls accepted by the ledger.
///
/// Value attached to a call (stake or deposit) travels in the call context,
/// not in the message.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum LedgerCall {
    // === Auction Lifecycle ===
    /// Open a new auction. The sender becomes the auctioneer.
    Deploy { request: DeployRequest },

    /// Submit a bid commitment with an escrowed deposit.
    Bid {
        auction: Address,
        commitment: PedersenCommitment,
    },

    // === Proof Rounds (auctioneer only) ===
    /// Publish the split commitments for one bid.
    ZkpCommit {
        auction: Address,
        bidder: Address,
        split: SplitCommitment,
    },

    /// Compute deltas and issue challenges for the round.
    CommitDelta { auction: Address },

    /// Answer the challenge issued for one bid.
    ZkpVerify {
        auction: Address,
        bidder: Address,
        response: SplitResponse,
    },

    /// Resolve the winner across verified bids.
    VerifyAll { auction: Address },

    // === Settlement ===
    /// Open the winning commitment.
    ClaimWinner {
        auction: Address,
        bidder: Address,
        value: u64,
        blinding: Scalar,
    },

    /// Pay the winning price from the winner's escrow.
    WinnerPay { auction: Address },

    /// Reclaim whatever escrow the sender is entitled to.
    Withdraw { auction: Address },

    /// Close an auction whose escrow is empty.
    Destroy { auction: Address },
}

impl LedgerCall {
    /// Operation name used in receipts, logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCall::Deploy { .. } => "deploy",
            LedgerCall::Bid { .. } => "bid",
            LedgerCall::ZkpCommit { .. } => "zkp_commit",
            LedgerCall::CommitDelta { .. } => "commit_delta",
            LedgerCall::ZkpVerify { .. } => "zkp_verify",
            LedgerCall::VerifyAll { .. } => "verify_all",
            LedgerCall::ClaimWinner { .. } => "claim_winner",
            LedgerCall::WinnerPay { .. } => "winner_pay",
            LedgerCall::Withdraw { .. } => "withdraw",
            LedgerCall::Destroy { .. } => "destroy",
        }
    }
}
