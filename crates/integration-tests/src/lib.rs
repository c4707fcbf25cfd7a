//! End-to-end integration tests for the sealed-bid auction.
//!
//! These tests exercise the full auction lifecycle:
//! 1. Deployment with the auctioneer's stake
//! 2. Committed bids with escrowed deposits
//! 3. Split, challenge and verify rounds
//! 4. Winner resolution and settlement
//! 5. Withdrawals, forfeits and destruction

#![cfg(test)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use auction_crypto::{
    CryptoError, CurveContext, IntervalChallenge, Opening, ResponseScheme, SplitProof,
    SplitStatement,
};
use auction_ledger::{ExecResult, ExecutorError, InMemoryLedger, LedgerExecutor};
use auction_protocol::{
    claim_winner, create_bid, pay, submit_bid, withdraw, AuctionProtocol, BidBuilder,
    PreparedBid, ProtocolError,
};
use auction_types::{
    Address, AuctionConfig, AuctionState, BidRecord, BlockThresholds, Challenge,
    CurveDescriptor, DeployRequest, PedersenCommitment, Receipt, Scalar, SplitCommitment,
    SplitResponse, TieBreak, MAX_BID,
};
use rand::rngs::OsRng;

const AUCTIONEER: Address = [0xA0; 32];
const ALICE: Address = [1u8; 32];
const BOB: Address = [2u8; 32];
const CAROL: Address = [3u8; 32];

/// Test the complete auction flow over two proof rounds.
#[test]
fn test_full_auction_flow() {
    let ledger = InMemoryLedger::new();

    // ========================================
    // Phase 1: Deploy
    // ========================================

    let config = AuctionConfig {
        proof_rounds: 2,
        ..AuctionConfig::testing()
    };
    let mut protocol = AuctionProtocol::deploy(ledger.clone(), AUCTIONEER, config, 10).unwrap();
    let auction = protocol.address();
    assert_eq!(ledger.auction_state(&auction).unwrap(), AuctionState::Init);

    println!("Auction deployed");

    // ========================================
    // Phase 2: Bidders commit
    // ========================================

    let bids = place_bids(
        &ledger,
        &mut protocol,
        &[(ALICE, 2000), (BOB, 4500), (CAROL, 7000)],
    );
    assert_eq!(ledger.escrow(&auction).unwrap(), 10 + 2000 + 4500 + 7000);

    println!("3 bids submitted");

    // ========================================
    // Phase 3: Proof rounds
    // ========================================

    let outcome = protocol.run(&mut OsRng).unwrap();
    assert_eq!(outcome.winner, CAROL);
    assert_eq!(outcome.rounds, 2);
    assert_eq!(outcome.verified, vec![ALICE, BOB, CAROL]);
    assert!(outcome.failed.is_empty());

    println!("Winner resolved after {} rounds", outcome.rounds);

    // ========================================
    // Phase 4: Settlement
    // ========================================

    let (_, carol_bid) = &bids[2];
    claim_winner(&ledger, &CAROL, &auction, carol_bid).unwrap();
    assert_eq!(ledger.highest_bid(&auction).unwrap(), Some(7000));
    pay(&ledger, &CAROL, &auction).unwrap();

    for bidder in [ALICE, BOB] {
        withdraw(&ledger, &bidder, &auction).unwrap();
    }
    protocol.withdraw_stake().unwrap();

    assert_eq!(ledger.balance(&ALICE), 2000);
    assert_eq!(ledger.balance(&BOB), 4500);
    assert_eq!(ledger.balance(&CAROL), 0);
    assert_eq!(ledger.balance(&AUCTIONEER), 10 + 7000);
    assert_eq!(ledger.escrow(&auction).unwrap(), 0);

    protocol.destroy().unwrap();

    println!("Auction settled and destroyed");
}

/// Equal deposits are ordered by the configured tie-break.
#[test]
fn test_tie_break_rules() {
    let first: Address = [9u8; 32];
    let second: Address = [4u8; 32];

    for (tie_break, expected) in [
        (TieBreak::EarliestBid, first),
        (TieBreak::LowestAddress, second),
    ] {
        let ledger = InMemoryLedger::new();
        let config = AuctionConfig {
            tie_break,
            ..AuctionConfig::testing()
        };
        let mut protocol = AuctionProtocol::deploy(ledger.clone(), AUCTIONEER, config, 1).unwrap();
        place_bids(&ledger, &mut protocol, &[(first, 3000), (second, 3000)]);

        let outcome = protocol.run(&mut OsRng).unwrap();
        assert_eq!(outcome.winner, expected, "tie-break {tie_break:?}");
    }
}

/// Answers nothing for bids whose opening it never received.
#[derive(Debug)]
struct Withholding;

impl ResponseScheme for Withholding {
    fn name(&self) -> &'static str {
        "withholding"
    }

    fn respond(
        &self,
        challenge: Challenge,
        split: &SplitProof,
        opening: Option<&Opening>,
    ) -> Result<SplitResponse, CryptoError> {
        match opening {
            Some(_) => IntervalChallenge.respond(challenge, split, opening),
            None => Ok(SplitResponse::Decline),
        }
    }

    fn check(
        &self,
        ctx: &CurveContext,
        bound: u64,
        statement: &SplitStatement,
        challenge: Challenge,
        response: &SplitResponse,
    ) -> Result<bool, CryptoError> {
        IntervalChallenge.check(ctx, bound, statement, challenge, response)
    }
}

/// A bid whose opening the auctioneer lacks is excluded, however high.
#[test]
fn test_unanswered_bid_excluded() {
    let ledger = InMemoryLedger::new();
    let mut protocol =
        AuctionProtocol::deploy(ledger.clone(), AUCTIONEER, AuctionConfig::testing(), 1)
            .unwrap()
            .with_scheme(Arc::new(Withholding));
    let auction = protocol.address();

    place_bids(&ledger, &mut protocol, &[(ALICE, 2000), (BOB, 4500)]);

    // Carol commits but keeps her opening to herself
    let carol_bid = create_bid(protocol.curve(), 9000, protocol.max_bid(), &mut OsRng).unwrap();
    submit_bid(&ledger, &CAROL, &auction, &carol_bid).unwrap();

    let outcome = protocol.run(&mut OsRng).unwrap();
    assert_eq!(outcome.winner, BOB);
    assert_eq!(outcome.failed, vec![CAROL]);
    assert_eq!(outcome.verified, vec![ALICE, BOB]);

    // Auctioneer claims on the winner's behalf
    protocol.claim_winner().unwrap();
    assert_eq!(ledger.highest_bid(&auction).unwrap(), Some(4500));

    // The excluded bid gets its deposit back in full
    withdraw(&ledger, &CAROL, &auction).unwrap();
    assert_eq!(ledger.balance(&CAROL), 9000);

    // Only the winner may pay
    assert!(matches!(
        pay(&ledger, &ALICE, &auction),
        Err(ProtocolError::Executor(ExecutorError::Rejected { operation: "winner_pay", .. }))
    ));
    pay(&ledger, &BOB, &auction).unwrap();
}

/// Executor that can be switched off to simulate an unreachable ledger.
struct FlakyExecutor {
    inner: InMemoryLedger,
    down: Arc<AtomicBool>,
    /// Responses delivered before zkp_verify starts failing
    verifies_left: Arc<AtomicUsize>,
}

impl FlakyExecutor {
    fn new(inner: InMemoryLedger) -> Self {
        Self {
            inner,
            down: Arc::new(AtomicBool::new(false)),
            verifies_left: Arc::new(AtomicUsize::new(usize::MAX)),
        }
    }

    fn take_verify(&self) -> ExecResult<()> {
        self.verifies_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .map(|_| ())
            .map_err(|_| ExecutorError::Unavailable {
                operation: "zkp_verify",
                reason: "connection reset".to_string(),
            })
    }

    fn check(&self, operation: &'static str) -> ExecResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(ExecutorError::Unavailable {
                operation,
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

impl LedgerExecutor for FlakyExecutor {
    fn deploy(&self, sender: &Address, request: DeployRequest) -> ExecResult<(Address, Receipt)> {
        self.check("deploy")?;
        self.inner.deploy(sender, request)
    }

    fn bid(
        &self,
        sender: &Address,
        auction: &Address,
        commitment: PedersenCommitment,
        deposit: u64,
    ) -> ExecResult<Receipt> {
        self.check("bid")?;
        self.inner.bid(sender, auction, commitment, deposit)
    }

    fn zkp_commit(
        &self,
        sender: &Address,
        auction: &Address,
        bidder: &Address,
        split: SplitCommitment,
    ) -> ExecResult<Receipt> {
        self.check("zkp_commit")?;
        self.inner.zkp_commit(sender, auction, bidder, split)
    }

    fn commit_delta(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt> {
        self.check("commit_delta")?;
        self.inner.commit_delta(sender, auction)
    }

    fn zkp_verify(
        &self,
        sender: &Address,
        auction: &Address,
        bidder: &Address,
        response: SplitResponse,
    ) -> ExecResult<Receipt> {
        self.check("zkp_verify")?;
        self.take_verify()?;
        self.inner.zkp_verify(sender, auction, bidder, response)
    }

    fn verify_all(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt> {
        self.check("verify_all")?;
        self.inner.verify_all(sender, auction)
    }

    fn claim_winner(
        &self,
        sender: &Address,
        auction: &Address,
        bidder: &Address,
        value: u64,
        blinding: Scalar,
    ) -> ExecResult<Receipt> {
        self.check("claim_winner")?;
        self.inner
            .claim_winner(sender, auction, bidder, value, blinding)
    }

    fn withdraw(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt> {
        self.check("withdraw")?;
        self.inner.withdraw(sender, auction)
    }

    fn winner_pay(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt> {
        self.check("winner_pay")?;
        self.inner.winner_pay(sender, auction)
    }

    fn destroy(&self, sender: &Address, auction: &Address) -> ExecResult<Receipt> {
        self.check("destroy")?;
        self.inner.destroy(sender, auction)
    }

    // Queries stay reachable so the driver can observe the ledger

    fn auction_state(&self, auction: &Address) -> ExecResult<AuctionState> {
        self.inner.auction_state(auction)
    }

    fn round(&self, auction: &Address) -> ExecResult<u32> {
        self.inner.round(auction)
    }

    fn split_count(&self, auction: &Address) -> ExecResult<u32> {
        self.inner.split_count(auction)
    }

    fn highest_bid(&self, auction: &Address) -> ExecResult<Option<u64>> {
        self.inner.highest_bid(auction)
    }

    fn winner(&self, auction: &Address) -> ExecResult<Option<Address>> {
        self.inner.winner(auction)
    }

    fn auctioneer(&self, auction: &Address) -> ExecResult<Address> {
        self.inner.auctioneer(auction)
    }

    fn thresholds(&self, auction: &Address) -> ExecResult<BlockThresholds> {
        self.inner.thresholds(auction)
    }

    fn config(&self, auction: &Address) -> ExecResult<AuctionConfig> {
        self.inner.config(auction)
    }

    fn curve(&self, auction: &Address) -> ExecResult<CurveDescriptor> {
        self.inner.curve(auction)
    }

    fn bids(&self, auction: &Address) -> ExecResult<Vec<BidRecord>> {
        self.inner.bids(auction)
    }

    fn challenge(&self, auction: &Address, bidder: &Address) -> ExecResult<Option<Challenge>> {
        self.inner.challenge(auction, bidder)
    }

    fn answered(&self, auction: &Address, bidder: &Address) -> ExecResult<bool> {
        self.inner.answered(auction, bidder)
    }

    fn block_height(&self) -> ExecResult<u64> {
        self.inner.block_height()
    }
}

/// Executor failures surface unchanged and leave the auction resumable.
#[test]
fn test_executor_outage_surfaces() {
    let ledger = InMemoryLedger::new();
    let executor = FlakyExecutor::new(ledger.clone());
    let down = Arc::clone(&executor.down);

    let mut protocol =
        AuctionProtocol::deploy(executor, AUCTIONEER, AuctionConfig::testing(), 1).unwrap();
    let auction = protocol.address();
    place_bids(&ledger, &mut protocol, &[(ALICE, 2000), (BOB, 4500)]);

    down.store(true, Ordering::SeqCst);
    let err = protocol.run(&mut OsRng).unwrap_err();
    assert_eq!(
        err,
        ProtocolError::Executor(ExecutorError::Unavailable {
            operation: "zkp_commit",
            reason: "connection refused".to_string(),
        })
    );
    assert_eq!(ledger.auction_state(&auction).unwrap(), AuctionState::Init);
    assert_eq!(ledger.split_count(&auction).unwrap(), 0);

    down.store(false, Ordering::SeqCst);
    let outcome = protocol.run(&mut OsRng).unwrap();
    assert_eq!(outcome.winner, BOB);
}

/// A round cut off after some responses resumes where it stopped.
#[test]
fn test_partial_verify_outage_resumes() {
    let ledger = InMemoryLedger::new();
    let executor = FlakyExecutor::new(ledger.clone());
    let verifies_left = Arc::clone(&executor.verifies_left);

    let mut protocol =
        AuctionProtocol::deploy(executor, AUCTIONEER, AuctionConfig::testing(), 1).unwrap();
    let auction = protocol.address();
    place_bids(
        &ledger,
        &mut protocol,
        &[(ALICE, 2000), (BOB, 4500), (CAROL, 3000)],
    );

    verifies_left.store(1, Ordering::SeqCst);
    let err = protocol.run(&mut OsRng).unwrap_err();
    assert_eq!(
        err,
        ProtocolError::Executor(ExecutorError::Unavailable {
            operation: "zkp_verify",
            reason: "connection reset".to_string(),
        })
    );
    assert_eq!(ledger.auction_state(&auction).unwrap(), AuctionState::Verify);
    assert!(ledger.answered(&auction, &ALICE).unwrap());
    assert!(!ledger.answered(&auction, &BOB).unwrap());

    verifies_left.store(usize::MAX, Ordering::SeqCst);
    let outcome = protocol.run(&mut OsRng).unwrap();
    assert_eq!(outcome.winner, BOB);
    assert_eq!(outcome.verified, vec![ALICE, BOB, CAROL]);
}

/// The winner pays what it committed to, not a larger escrow.
#[test]
fn test_deposit_above_commitment_cannot_claim() {
    let ledger = InMemoryLedger::new();
    let mut protocol = AuctionProtocol::deploy(ledger.clone(), AUCTIONEER, timed_config(), 5).unwrap();
    let auction = protocol.address();
    place_bids(&ledger, &mut protocol, &[(ALICE, 4500)]);

    // Bob commits to 1 and escrows 5000 directly on the ledger
    let bob_bid = BidBuilder::new(protocol.max_bid())
        .bid_value(1)
        .build(protocol.curve(), &mut OsRng)
        .unwrap();
    ledger.bid(&BOB, &auction, bob_bid.commitment, 5000).unwrap();
    protocol.accept_opening(&BOB, bob_bid.opening).unwrap();

    let height = ledger.block_height().unwrap();
    ledger.advance_blocks(10 - height);
    let outcome = protocol.run(&mut OsRng).unwrap();
    assert_eq!(outcome.winner, BOB);

    match claim_winner(&ledger, &BOB, &auction, &bob_bid) {
        Err(ProtocolError::Executor(err)) => {
            assert_eq!(err.operation(), "claim_winner");
            assert!(err.reason().contains("differs from deposit"));
        }
        other => panic!("expected rejected claim, got {other:?}"),
    }
    assert_eq!(ledger.highest_bid(&auction).unwrap(), None);
    assert!(pay(&ledger, &BOB, &auction).is_err());

    // Unpaid by the deadline: the whole escrow goes to the auctioneer
    let height = ledger.block_height().unwrap();
    ledger.advance_blocks(41 - height);
    withdraw(&ledger, &ALICE, &auction).unwrap();
    protocol.withdraw_stake().unwrap();
    assert_eq!(ledger.balance(&ALICE), 4500);
    assert_eq!(ledger.balance(&AUCTIONEER), 5 + 5000);
    assert_eq!(ledger.balance(&BOB), 0);
}

/// Bids at the bound settle without overflowing escrow totals.
#[test]
fn test_bids_at_bound_settle() {
    let ledger = InMemoryLedger::new();
    let mut protocol =
        AuctionProtocol::deploy(ledger.clone(), AUCTIONEER, AuctionConfig::testing(), 1).unwrap();
    let auction = protocol.address();
    let bids = place_bids(&ledger, &mut protocol, &[(ALICE, MAX_BID), (BOB, MAX_BID)]);
    assert_eq!(ledger.escrow(&auction).unwrap(), 2 * u128::from(MAX_BID) + 1);

    let outcome = protocol.run(&mut OsRng).unwrap();
    assert_eq!(outcome.winner, ALICE);

    claim_winner(&ledger, &ALICE, &auction, &bids[0].1).unwrap();
    pay(&ledger, &ALICE, &auction).unwrap();
    withdraw(&ledger, &BOB, &auction).unwrap();
    protocol.withdraw_stake().unwrap();

    assert_eq!(ledger.balance(&AUCTIONEER), u128::from(MAX_BID) + 1);
    assert_eq!(ledger.balance(&BOB), u128::from(MAX_BID));
    assert_eq!(ledger.escrow(&auction).unwrap(), 0);
    protocol.destroy().unwrap();
}

/// Independent auctions driven from separate threads share one ledger.
#[test]
fn test_concurrent_auctions() {
    let ledger = InMemoryLedger::new();

    let winners: Vec<(Address, Address)> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4u8)
            .map(|i| {
                let ledger = ledger.clone();
                s.spawn(move || {
                    let auctioneer = [0xB0 + i; 32];
                    let mut protocol = AuctionProtocol::deploy(
                        ledger.clone(),
                        auctioneer,
                        AuctionConfig::testing(),
                        1,
                    )
                    .unwrap();
                    let bidders = [
                        ([0x10 + i; 32], 1000 + u64::from(i)),
                        ([0x20 + i; 32], 5000 + u64::from(i)),
                        ([0x30 + i; 32], 3000 + u64::from(i)),
                    ];
                    place_bids(&ledger, &mut protocol, &bidders);

                    let outcome = protocol.run(&mut OsRng).unwrap();
                    (outcome.auction, outcome.winner)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, (auction, winner)) in winners.iter().enumerate() {
        assert_eq!(*winner, [0x20 + i as u8; 32]);
        assert_eq!(
            ledger.auction_state(auction).unwrap(),
            AuctionState::ValidWinner
        );
    }
}

fn timed_config() -> AuctionConfig {
    AuctionConfig {
        bid_block_number: 10,
        reveal_block_number: 30,
        winner_payment_block_number: 40,
        fairness_fees: 5,
        ..AuctionConfig::default()
    }
}

/// Proof rounds wait for the bid window to close; late bids are refused.
#[test]
fn test_bid_window_enforced() {
    let ledger = InMemoryLedger::new();
    let mut protocol = AuctionProtocol::deploy(ledger.clone(), AUCTIONEER, timed_config(), 5).unwrap();
    let auction = protocol.address();
    place_bids(&ledger, &mut protocol, &[(ALICE, 2000), (BOB, 4500)]);

    match protocol.run(&mut OsRng) {
        Err(ProtocolError::Executor(err)) => {
            assert_eq!(err.operation(), "zkp_commit");
            assert!(err.reason().contains("Bidding open"));
        }
        other => panic!("expected rejected split, got {other:?}"),
    }

    let height = ledger.block_height().unwrap();
    ledger.advance_blocks(10 - height);

    let late = create_bid(protocol.curve(), 8000, protocol.max_bid(), &mut OsRng).unwrap();
    assert!(matches!(
        submit_bid(&ledger, &CAROL, &auction, &late),
        Err(ProtocolError::Executor(ExecutorError::Rejected { operation: "bid", .. }))
    ));

    let outcome = protocol.run(&mut OsRng).unwrap();
    assert_eq!(outcome.winner, BOB);
    assert!(ledger.block_height().unwrap() <= 30);
}

/// Bidders recover deposit plus a fee when the auctioneer never reveals.
#[test]
fn test_reveal_deadline_forfeit() {
    let ledger = InMemoryLedger::new();
    let mut protocol =
        AuctionProtocol::deploy(ledger.clone(), AUCTIONEER, timed_config(), 20).unwrap();
    let auction = protocol.address();
    place_bids(&ledger, &mut protocol, &[(ALICE, 2000), (BOB, 4500)]);

    // Nothing to withdraw while the auction can still proceed
    assert!(withdraw(&ledger, &ALICE, &auction).is_err());

    let height = ledger.block_height().unwrap();
    ledger.advance_blocks(31 - height);

    withdraw(&ledger, &ALICE, &auction).unwrap();
    withdraw(&ledger, &BOB, &auction).unwrap();
    assert_eq!(ledger.balance(&ALICE), 2005);
    assert_eq!(ledger.balance(&BOB), 4505);

    // What is left of the stake returns to the auctioneer
    protocol.withdraw_stake().unwrap();
    assert_eq!(ledger.balance(&AUCTIONEER), 10);
    assert_eq!(ledger.escrow(&auction).unwrap(), 0);

    protocol.destroy().unwrap();
}

/// An unpaid winner forfeits its deposit to the auctioneer.
#[test]
fn test_unpaid_winner_forfeits_deposit() {
    let ledger = InMemoryLedger::new();
    let mut protocol = AuctionProtocol::deploy(ledger.clone(), AUCTIONEER, timed_config(), 5).unwrap();
    let auction = protocol.address();
    let bids = place_bids(&ledger, &mut protocol, &[(ALICE, 2000), (BOB, 4500)]);

    let height = ledger.block_height().unwrap();
    ledger.advance_blocks(10 - height);
    let outcome = protocol.run(&mut OsRng).unwrap();
    assert_eq!(outcome.winner, BOB);
    claim_winner(&ledger, &BOB, &auction, &bids[1].1).unwrap();

    // Escrow still held: destruction refused
    assert!(matches!(
        protocol.destroy(),
        Err(ProtocolError::Executor(ExecutorError::Rejected { operation: "destroy", .. }))
    ));

    let height = ledger.block_height().unwrap();
    ledger.advance_blocks(41 - height);
    assert!(pay(&ledger, &BOB, &auction).is_err());

    withdraw(&ledger, &ALICE, &auction).unwrap();
    protocol.withdraw_stake().unwrap();
    assert_eq!(ledger.balance(&ALICE), 2000);
    assert_eq!(ledger.balance(&AUCTIONEER), 5 + 4500);
    assert_eq!(ledger.balance(&BOB), 0);

    protocol.destroy().unwrap();

    // Destroyed auctions refuse every call
    let err = ledger.withdraw(&ALICE, &auction).unwrap_err();
    assert_eq!(err.operation(), "withdraw");
    assert!(err.reason().contains("destroyed"));
}

/// Split generation runs independently per thread.
#[test]
fn test_parallel_split_generation() {
    let ctx = CurveContext::bn128().unwrap();
    let bound = auction_types::MAX_BID;

    let splits: Vec<SplitProof> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| SplitProof::generate(&ctx, bound, &mut OsRng)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for split in &splits {
        let (big_w1, big_w2) = split.points();
        assert_eq!(split.w1() + split.w2(), bound);
        assert!(auction_crypto::sums_to_bound(
            &ctx,
            bound,
            &big_w1,
            &big_w2,
            split.r1(),
            split.r2()
        ));
    }
}

// Helper functions

/// Submit one bid per `(bidder, value)` and hand each opening to the
/// auctioneer.
fn place_bids<E: LedgerExecutor>(
    ledger: &InMemoryLedger,
    protocol: &mut AuctionProtocol<E>,
    bids: &[(Address, u64)],
) -> Vec<(Address, PreparedBid)> {
    let auction = protocol.address();
    bids.iter()
        .map(|(bidder, value)| {
            let bid = create_bid(protocol.curve(), *value, protocol.max_bid(), &mut OsRng).unwrap();
            submit_bid(ledger, bidder, &auction, &bid).unwrap();
            protocol.accept_opening(bidder, bid.opening).unwrap();
            (*bidder, bid)
        })
        .collect()
}
