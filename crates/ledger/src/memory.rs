//! In-memory reference executor.
//!
//! Every accepted call is mined into its own block. Handles are cheap to
//! clone and share one ledger.

use std::sync::Arc;

use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, warn};

use auction_crypto::{IntervalChallenge, ResponseScheme};
use auction_types::{
    address_hex, sha256, Address, AuctionConfig, AuctionState, BidRecord, BlockThresholds,
    Challenge, CurveDescriptor, DeployRequest, PedersenCommitment, Receipt, Scalar,
    SplitCommitment, SplitResponse,
};

use crate::call::LedgerCall;
use crate::executor::{ExecResult, ExecutorError, LedgerExecutor};
use crate::handlers::{dispatch, CallContext, CallOutput, Environment, HandlerResult};
use crate::queries;
use crate::state::LedgerState;
use crate::winner::{HighestDeposit, WinnerRule};

/// Shared in-memory ledger.
#[derive(Clone, Debug)]
pub struct InMemoryLedger {
    state: Arc<RwLock<LedgerState>>,
    scheme: Arc<dyn ResponseScheme>,
    rule: Arc<dyn WinnerRule>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    /// Ledger checking responses with [`IntervalChallenge`] and ranking with
    /// [`HighestDeposit`].
    pub fn new() -> Self {
        Self::with_components(Arc::new(IntervalChallenge), Arc::new(HighestDeposit))
    }

    pub fn with_components(scheme: Arc<dyn ResponseScheme>, rule: Arc<dyn WinnerRule>) -> Self {
        Self {
            state: Arc::new(RwLock::new(LedgerState::new())),
            scheme,
            rule,
        }
    }

    /// The response scheme responses are checked with.
    pub fn scheme(&self) -> Arc<dyn ResponseScheme> {
        Arc::clone(&self.scheme)
    }

    // ============ Admin Methods ============

    /// Mine `blocks` empty blocks. Returns the new height.
    pub fn advance_blocks(&self, blocks: u64) -> u64 {
        let mut state = self.state.write();
        state.block_height += blocks;
        debug!(height = state.block_height, "blocks advanced");
        state.block_height
    }

    /// Funds paid out to `account` so far.
    pub fn balance(&self, account: &Address) -> u128 {
        self.state.read().get_balance(account)
    }

    /// Deposits and stake still held by an auction.
    pub fn escrow(&self, auction: &Address) -> ExecResult<u128> {
        self.read("escrow", |state| queries::query_escrow(state, auction))
    }

    // ============ Internals ============

    fn submit(&self, sender: &Address, value: u64, call: LedgerCall) -> ExecResult<(CallOutput, Receipt)> {
        let operation = call.name();
        let encoded = borsh::to_vec(&call).map_err(|e| ExecutorError::Unavailable {
            operation,
            reason: e.to_string(),
        })?;

        let mut entropy = [0u8; 32];
        OsRng.fill_bytes(&mut entropy);
        let env = Environment {
            scheme: self.scheme.as_ref(),
            rule: self.rule.as_ref(),
            entropy,
        };

        let mut state = self.state.write();
        let ctx = CallContext {
            sender: *sender,
            block_height: state.block_height + 1,
            value,
        };

        match dispatch(&mut state, &ctx, &env, &call) {
            Ok(output) => {
                state.block_height = ctx.block_height;
                state.tx_count += 1;
                let receipt = Receipt {
                    tx_hash: transaction_hash(&encoded, sender, state.tx_count),
                    block_height: ctx.block_height,
                };
                debug!(
                    operation,
                    block = receipt.block_height,
                    tx = %address_hex(&receipt.tx_hash),
                    "call mined"
                );
                Ok((output, receipt))
            }
            Err(err) => {
                warn!(
                    operation,
                    sender = %address_hex(sender),
                    error = %err,
                    "call rejected"
                );
                Err(ExecutorError::Rejected {
                    operation,
                    reason: err.to_string(),
                })
            }
        }
    }

    fn transact(&self, sender: &Address, value: u64, call: LedgerCall) -> ExecResult<Receipt> {
        self.submit(sender, value, call).map(|(_, receipt)| receipt)
    }

    fn read<T>(
        &self,
        operation: &'static str,
        query: impl FnOnce(&LedgerState) -> HandlerResult<T>,
    ) -> ExecResult<T> {
        let state = self.state.read();
        query(&state).map_err(|err| ExecutorError::Rejected {
            operation,
            reason: err.to_string(),
        })
    }
}

/// Hash identifying an accepted call.
pub fn transaction_hash(encoded_call: &[u8], sender: &Address, counter: u64) -> [u8; 32] {
    let mut data = Vec::with_capacity(encoded_call.len() + 40);
    data.extend_from_slice(encoded_call);
    data.extend_from_slice(sender);
    data.extend_from_slice(&counter.to_le_bytes());
    sha256(&data)
}

impl LedgerExecutor for InMemoryLedger {
    fn deploy(&self, sender: &Address, request: DeployRequest) -> ExecResult<(Address, Receipt)> {
        let stake = request.deposit;
        match self.submit(sender, stake, LedgerCall::Deploy { request })? {
            (CallOutput::Deployed(address), receipt) => Ok((address, receipt)),
            (other, _) => Err(ExecutorError::Unavailable {
                operation: "deploy",
                reason: format!("unexpected call output {other:?}"),
            }),
        }
    }

    fn bid(
        &self,
        sender: &Address,
        auction: &Address,
        commitment: PedersenCommitment,
        deposit: u64,
    ) -> ExecResult<Receipt> {
        self.transact(
            sender,
            deposit,
            LedgerCall::Bid {
                auction: *auction,
                commitment,
            },
        )
    }

    fn zkp_commit(
        &self,
        sender: &Address,
        auction: &Address,
        bidder: &Address,
        split: SplitCommitment,
    ) -> ExecResult<Receipt> {
        self.transact(
            sender,
            0,
            LedgerCall::ZkpCommit {
                auction: *auction,
                bidder: *bidder,
                split,
            },
        )
    }

    fn commit_delta(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt> {
        self.transact(sender, 0, LedgerCall::CommitDelta { auction: *auction })
    }

    fn zkp_verify(
        &self,
        sender: &Address,
        auction: &Address,
        bidder: &Address,
        response: SplitResponse,
    ) -> ExecResult<Receipt> {
        self.transact(
            sender,
            0,
            LedgerCall::ZkpVerify {
                auction: *auction,
                bidder: *bidder,
                response,
            },
        )
    }

    fn verify_all(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt> {
        self.transact(sender, 0, LedgerCall::VerifyAll { auction: *auction })
    }

    fn claim_winner(
        &self,
        sender: &Address,
        auction: &Address,
        bidder: &Address,
        value: u64,
        blinding: Scalar,
    ) -> ExecResult<Receipt> {
        self.transact(
            sender,
            0,
            LedgerCall::ClaimWinner {
                auction: *auction,
                bidder: *bidder,
                value,
                blinding,
            },
        )
    }

    fn withdraw(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt> {
        self.transact(sender, 0, LedgerCall::Withdraw { auction: *auction })
    }

    fn winner_pay(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt> {
        self.transact(sender, 0, LedgerCall::WinnerPay { auction: *auction })
    }

    fn destroy(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt> {
        self.transact(sender, 0, LedgerCall::Destroy { auction: *auction })
    }

    fn auction_state(&self, auction: &Address) -> ExecResult<AuctionState> {
        self.read("auction_state", |state| queries::query_state(state, auction))
    }

    fn round(&self, auction: &Address) -> ExecResult<u32> {
        self.read("round", |state| queries::query_round(state, auction))
    }

    fn split_count(&self, auction: &Address) -> ExecResult<u32> {
        self.read("split_count", |state| {
            queries::query_split_count(state, auction)
        })
    }

    fn highest_bid(&self, auction: &Address) -> ExecResult<Option<u64>> {
        self.read("highest_bid", |state| {
            queries::query_highest_bid(state, auction)
        })
    }

    fn winner(&self, auction: &Address) -> ExecResult<Option<Address>> {
        self.read("winner", |state| queries::query_winner(state, auction))
    }

    fn auctioneer(&self, auction: &Address) -> ExecResult<Address> {
        self.read("auctioneer", |state| {
            queries::query_auctioneer(state, auction)
        })
    }

    fn thresholds(&self, auction: &Address) -> ExecResult<BlockThresholds> {
        self.read("thresholds", |state| {
            queries::query_thresholds(state, auction)
        })
    }

    fn config(&self, auction: &Address) -> ExecResult<AuctionConfig> {
        self.read("config", |state| queries::query_config(state, auction))
    }

    fn curve(&self, auction: &Address) -> ExecResult<CurveDescriptor> {
        self.read("curve", |state| queries::query_curve(state, auction))
    }

    fn bids(&self, auction: &Address) -> ExecResult<Vec<BidRecord>> {
        self.read("bids", |state| queries::query_bids(state, auction))
    }

    fn challenge(&self, auction: &Address, bidder: &Address) -> ExecResult<Option<Challenge>> {
        self.read("challenge", |state| {
            queries::query_challenge(state, auction, bidder)
        })
    }

    fn answered(&self, auction: &Address, bidder: &Address) -> ExecResult<bool> {
        self.read("answered", |state| {
            queries::query_answered(state, auction, bidder)
        })
    }

    fn block_height(&self) -> ExecResult<u64> {
        Ok(self.state.read().block_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auction_crypto::{bn128_descriptor, CurveContext, Opening};

    const AUCTIONEER: Address = [1u8; 32];

    fn deploy(ledger: &InMemoryLedger, config: AuctionConfig) -> Address {
        let request = DeployRequest {
            config,
            curve: bn128_descriptor().unwrap(),
            deposit: 5,
        };
        ledger.deploy(&AUCTIONEER, request).unwrap().0
    }

    #[test]
    fn test_each_call_mines_a_block() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.block_height().unwrap(), 0);

        let auction = deploy(&ledger, AuctionConfig::testing());
        assert_eq!(ledger.block_height().unwrap(), 1);

        let ctx = CurveContext::bn128().unwrap();
        let opening = Opening::random(&ctx, 2000, &mut OsRng);
        let receipt = ledger
            .bid(&[2u8; 32], &auction, opening.commitment(&ctx), 2000)
            .unwrap();
        assert_eq!(receipt.block_height, 2);
        assert_eq!(ledger.block_height().unwrap(), 2);
    }

    #[test]
    fn test_rejected_call_changes_nothing() {
        let ledger = InMemoryLedger::new();
        let auction = deploy(&ledger, AuctionConfig::testing());
        let height = ledger.block_height().unwrap();

        let err = ledger.commit_delta(&AUCTIONEER, &auction).unwrap_err();
        assert_eq!(err.operation(), "commit_delta");
        assert!(matches!(err, ExecutorError::Rejected { .. }));
        assert!(err.reason().contains("Invalid state"));

        assert_eq!(ledger.block_height().unwrap(), height);
        assert_eq!(ledger.auction_state(&auction).unwrap(), AuctionState::Init);
    }

    #[test]
    fn test_transaction_hashes_are_unique() {
        let ledger = InMemoryLedger::new();
        let a = ledger
            .deploy(
                &AUCTIONEER,
                DeployRequest {
                    config: AuctionConfig::testing(),
                    curve: bn128_descriptor().unwrap(),
                    deposit: 5,
                },
            )
            .unwrap();
        let b = ledger
            .deploy(
                &AUCTIONEER,
                DeployRequest {
                    config: AuctionConfig::testing(),
                    curve: bn128_descriptor().unwrap(),
                    deposit: 5,
                },
            )
            .unwrap();
        assert_ne!(a.0, b.0);
        assert_ne!(a.1.tx_hash, b.1.tx_hash);
    }

    #[test]
    fn test_advance_blocks_and_clones_share_state() {
        let ledger = InMemoryLedger::new();
        let handle = ledger.clone();

        assert_eq!(ledger.advance_blocks(10), 10);
        assert_eq!(handle.block_height().unwrap(), 10);

        let auction = deploy(&handle, AuctionConfig::default());
        assert_eq!(ledger.config(&auction).unwrap(), AuctionConfig::default());
        assert_eq!(ledger.escrow(&auction).unwrap(), 5);
    }

    #[test]
    fn test_unknown_auction_query() {
        let ledger = InMemoryLedger::new();
        let err = ledger.auction_state(&[4u8; 32]).unwrap_err();
        assert_eq!(err.operation(), "auction_state");
        assert!(err.reason().starts_with("Auction not found"));
    }

    #[test]
    fn test_concurrent_bids() {
        let ledger = InMemoryLedger::new();
        let auction = deploy(
            &ledger,
            AuctionConfig {
                max_bidders_count: 8,
                ..AuctionConfig::testing()
            },
        );
        let ctx = CurveContext::bn128().unwrap();

        std::thread::scope(|scope| {
            for i in 0..8u8 {
                let ledger = ledger.clone();
                let ctx = ctx.clone();
                scope.spawn(move || {
                    let opening = Opening::random(&ctx, 1000 + u64::from(i), &mut OsRng);
                    ledger
                        .bid(&[10 + i; 32], &auction, opening.commitment(&ctx), opening.value)
                        .unwrap();
                });
            }
        });

        let bids = ledger.bids(&auction).unwrap();
        assert_eq!(bids.len(), 8);
        let mut sequences: Vec<u32> = bids.iter().map(|bid| bid.sequence).collect();
        sequences.sort_unstable();
        assert_eq!(sequences, (0..8).collect::<Vec<_>>());
        assert_eq!(ledger.block_height().unwrap(), 9);
    }
}
