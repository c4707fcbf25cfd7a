//! Auctioneer-side driver of the proof rounds.
//!
//! The driver never trusts its own view of the auction: it queries the
//! executor before each step and refuses to act on a state that does not
//! allow the step. Split secrets live here for one round only.

use std::collections::HashMap;
use std::sync::Arc;

use rand::{CryptoRng, RngCore};
use tracing::{debug, info, warn};

use auction_crypto::{
    bn128_descriptor, decode_point, CurveContext, IntervalChallenge, Opening, ResponseScheme,
    SplitProof,
};
use auction_ledger::LedgerExecutor;
use auction_types::{
    address_hex, Address, AuctionConfig, AuctionState, BidRecord, BidStatus, DeployRequest,
    Receipt,
};

use crate::error::{ProtocolError, ProtocolResult};

/// Result of a completed auction run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuctionOutcome {
    pub auction: Address,
    pub winner: Address,
    /// Proof rounds played
    pub rounds: u32,
    pub verified: Vec<Address>,
    pub failed: Vec<Address>,
}

/// Drives one auction through its proof rounds as the auctioneer.
pub struct AuctionProtocol<E> {
    executor: E,
    auctioneer: Address,
    auction: Address,
    curve: CurveContext,
    max_bid: u64,
    scheme: Arc<dyn ResponseScheme>,
    /// Bid openings received from bidders
    openings: HashMap<Address, Opening>,
    /// Splits of the round in `split_round`
    splits: HashMap<Address, SplitProof>,
    split_round: u32,
}

impl<E: LedgerExecutor> AuctionProtocol<E> {
    /// Deploy a new auction on the canonical curve and attach to it.
    pub fn deploy(
        executor: E,
        auctioneer: Address,
        config: AuctionConfig,
        stake: u64,
    ) -> ProtocolResult<Self> {
        let request = DeployRequest {
            config,
            curve: bn128_descriptor()?,
            deposit: stake,
        };
        let (auction, receipt) = executor.deploy(&auctioneer, request)?;
        info!(
            auction = %address_hex(&auction),
            block = receipt.block_height,
            "auction deployed"
        );
        Self::attach(executor, auctioneer, auction)
    }

    /// Attach to an existing auction run by `auctioneer`.
    pub fn attach(executor: E, auctioneer: Address, auction: Address) -> ProtocolResult<Self> {
        if executor.auctioneer(&auction)? != auctioneer {
            return Err(ProtocolError::NotAuctioneer(address_hex(&auctioneer)));
        }
        let curve = CurveContext::new(&executor.curve(&auction)?)?;
        let max_bid = executor.config(&auction)?.max_bid;

        Ok(Self {
            executor,
            auctioneer,
            auction,
            curve,
            max_bid,
            scheme: Arc::new(IntervalChallenge),
            openings: HashMap::new(),
            splits: HashMap::new(),
            split_round: 0,
        })
    }

    /// Answer challenges with `scheme`; must match the ledger's.
    pub fn with_scheme(mut self, scheme: Arc<dyn ResponseScheme>) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn address(&self) -> Address {
        self.auction
    }

    pub fn auctioneer(&self) -> Address {
        self.auctioneer
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn curve(&self) -> &CurveContext {
        &self.curve
    }

    pub fn max_bid(&self) -> u64 {
        self.max_bid
    }

    pub fn state(&self) -> ProtocolResult<AuctionState> {
        Ok(self.executor.auction_state(&self.auction)?)
    }

    /// Record a bid opening handed over by its bidder.
    ///
    /// The opening must match the commitment stored on the ledger.
    pub fn accept_opening(&mut self, bidder: &Address, opening: Opening) -> ProtocolResult<()> {
        let bid = self
            .executor
            .bids(&self.auction)?
            .into_iter()
            .find(|bid| bid.bidder == *bidder)
            .ok_or_else(|| ProtocolError::UnknownBidder(address_hex(bidder)))?;

        if opening.value > self.max_bid {
            return Err(ProtocolError::BidOutOfRange {
                value: opening.value,
                max: self.max_bid,
            });
        }
        if !opening.verify(&self.curve, &decode_point(&bid.commitment.point)?) {
            return Err(ProtocolError::OpeningMismatch(address_hex(bidder)));
        }

        debug!(bidder = %address_hex(bidder), "opening accepted");
        self.openings.insert(*bidder, opening);
        Ok(())
    }

    // =========================
    // PHASE STEPS
    // =========================

    /// Submit a split for every pending bid that has none this round.
    ///
    /// Returns the number of splits submitted.
    pub fn challenge<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> ProtocolResult<usize> {
        self.expect_state(&[AuctionState::Init, AuctionState::Challenge])?;
        self.sync_round()?;

        let mut submitted = 0;
        for bid in self.pending_bids()? {
            if self.splits.contains_key(&bid.bidder) {
                continue;
            }
            self.challenge_bid(&bid.bidder, rng)?;
            submitted += 1;
        }

        info!(
            auction = %address_hex(&self.auction),
            round = self.split_round,
            submitted,
            "splits submitted"
        );
        Ok(submitted)
    }

    /// Generate and submit the split for one bid.
    pub fn challenge_bid<R: RngCore + CryptoRng>(
        &mut self,
        bidder: &Address,
        rng: &mut R,
    ) -> ProtocolResult<Receipt> {
        self.expect_state(&[AuctionState::Init, AuctionState::Challenge])?;
        self.sync_round()?;

        if self.splits.contains_key(bidder) {
            return Err(ProtocolError::DuplicateChallenge(address_hex(bidder)));
        }

        let split = SplitProof::generate(&self.curve, self.max_bid, rng);
        let receipt =
            self.executor
                .zkp_commit(&self.auctioneer, &self.auction, bidder, split.commitment())?;
        debug!(
            bidder = %address_hex(bidder),
            round = self.split_round,
            block = receipt.block_height,
            "split submitted"
        );
        self.splits.insert(*bidder, split);
        Ok(receipt)
    }

    /// Ask the ledger to compute deltas and issue challenges.
    pub fn commit_delta(&self) -> ProtocolResult<Receipt> {
        self.expect_state(&[AuctionState::ChallengeDelta])?;
        let receipt = self
            .executor
            .commit_delta(&self.auctioneer, &self.auction)?;
        info!(
            auction = %address_hex(&self.auction),
            block = receipt.block_height,
            "deltas committed"
        );
        Ok(receipt)
    }

    /// Answer every issued challenge of the round.
    ///
    /// Challenges already answered are skipped, so a round interrupted by an
    /// executor failure can be resumed. Returns the bids the ledger excluded
    /// this round.
    pub fn respond(&mut self) -> ProtocolResult<Vec<Address>> {
        self.expect_state(&[AuctionState::Verify])?;

        let pending = self.pending_bids()?;
        for bid in &pending {
            if self.executor.answered(&self.auction, &bid.bidder)? {
                continue;
            }
            let challenge = self
                .executor
                .challenge(&self.auction, &bid.bidder)?
                .ok_or_else(|| ProtocolError::MissingChallenge(address_hex(&bid.bidder)))?;
            let split = self
                .splits
                .get(&bid.bidder)
                .ok_or_else(|| ProtocolError::MissingSplit(address_hex(&bid.bidder)))?;

            let response = self
                .scheme
                .respond(challenge, split, self.openings.get(&bid.bidder))?;
            self.executor
                .zkp_verify(&self.auctioneer, &self.auction, &bid.bidder, response)?;
            debug!(bidder = %address_hex(&bid.bidder), ?challenge, "challenge answered");
        }

        // Round is over; its split secrets are no longer needed
        self.splits.clear();

        let statuses = self.executor.bids(&self.auction)?;
        let excluded: Vec<Address> = pending
            .iter()
            .filter(|bid| {
                statuses
                    .iter()
                    .any(|now| now.bidder == bid.bidder && now.status == BidStatus::Failed)
            })
            .map(|bid| bid.bidder)
            .collect();
        for bidder in &excluded {
            warn!(bidder = %address_hex(bidder), "bid excluded");
        }

        Ok(excluded)
    }

    /// Resolve the winner.
    pub fn verify_all(&self) -> ProtocolResult<Address> {
        self.expect_state(&[AuctionState::VerifyDelta])?;
        self.executor.verify_all(&self.auctioneer, &self.auction)?;
        let winner = self
            .executor
            .winner(&self.auction)?
            .ok_or(ProtocolError::Stalled(AuctionState::VerifyDelta))?;
        info!(
            auction = %address_hex(&self.auction),
            winner = %address_hex(&winner),
            "winner resolved"
        );
        Ok(winner)
    }

    /// Run the proof rounds until the winner is resolved.
    pub fn run<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> ProtocolResult<AuctionOutcome> {
        loop {
            let state = self.state()?;
            match state {
                AuctionState::Init | AuctionState::Challenge => {
                    self.challenge(rng)?;
                }
                AuctionState::ChallengeDelta => {
                    self.commit_delta()?;
                }
                AuctionState::Verify => {
                    self.respond()?;
                }
                AuctionState::VerifyDelta => {
                    self.verify_all()?;
                }
                AuctionState::ValidWinner => break,
            }

            if self.state()? == state {
                return Err(ProtocolError::Stalled(state));
            }
        }

        self.outcome()
    }

    /// Summary of a resolved auction.
    pub fn outcome(&self) -> ProtocolResult<AuctionOutcome> {
        self.expect_state(&[AuctionState::ValidWinner])?;
        let winner = self
            .executor
            .winner(&self.auction)?
            .ok_or(ProtocolError::Stalled(AuctionState::ValidWinner))?;
        let bids = self.executor.bids(&self.auction)?;

        Ok(AuctionOutcome {
            auction: self.auction,
            winner,
            rounds: self.executor.round(&self.auction)?,
            verified: bidders_with(&bids, BidStatus::Verified),
            failed: bidders_with(&bids, BidStatus::Failed),
        })
    }

    // =========================
    // SETTLEMENT
    // =========================

    /// Open the winning bid on the winner's behalf.
    pub fn claim_winner(&self) -> ProtocolResult<Receipt> {
        self.expect_state(&[AuctionState::ValidWinner])?;
        let winner = self
            .executor
            .winner(&self.auction)?
            .ok_or(ProtocolError::Stalled(AuctionState::ValidWinner))?;
        let opening = self
            .openings
            .get(&winner)
            .ok_or_else(|| ProtocolError::UnknownBidder(address_hex(&winner)))?;

        Ok(self.executor.claim_winner(
            &self.auctioneer,
            &self.auction,
            &winner,
            opening.value,
            opening.blinding_scalar(),
        )?)
    }

    /// Reclaim the auctioneer's stake.
    pub fn withdraw_stake(&self) -> ProtocolResult<Receipt> {
        Ok(self.executor.withdraw(&self.auctioneer, &self.auction)?)
    }

    pub fn destroy(&self) -> ProtocolResult<Receipt> {
        let receipt = self.executor.destroy(&self.auctioneer, &self.auction)?;
        info!(auction = %address_hex(&self.auction), "auction destroyed");
        Ok(receipt)
    }

    // =========================
    // HELPERS
    // =========================

    fn expect_state(&self, expected: &[AuctionState]) -> ProtocolResult<AuctionState> {
        let got = self.state()?;
        if !expected.contains(&got) {
            return Err(ProtocolError::InvalidState {
                expected: expected.to_vec(),
                got,
            });
        }
        Ok(got)
    }

    fn pending_bids(&self) -> ProtocolResult<Vec<BidRecord>> {
        Ok(self
            .executor
            .bids(&self.auction)?
            .into_iter()
            .filter(|bid| bid.status == BidStatus::Pending)
            .collect())
    }

    /// Drop splits left over from an earlier round.
    fn sync_round(&mut self) -> ProtocolResult<()> {
        let round = match self.state()? {
            AuctionState::Init => 1,
            _ => self.executor.round(&self.auction)?,
        };
        if round != self.split_round {
            self.splits.clear();
            self.split_round = round;
        }
        Ok(())
    }
}

fn bidders_with(bids: &[BidRecord], status: BidStatus) -> Vec<Address> {
    bids.iter()
        .filter(|bid| bid.status == status)
        .map(|bid| bid.bidder)
        .collect()
}
