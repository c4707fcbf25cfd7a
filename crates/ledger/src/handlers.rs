//! Call handlers for the auction ledger.
//!
//! Each handler validates the whole call before mutating anything, so a
//! rejected call leaves the state as it was.

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use auction_crypto::{
    decode_point, encode_point, pedersen_verify_encoded, CurveContext, ResponseScheme,
    SplitStatement,
};
use auction_types::{
    address_hex, compute_auction_address, Address, AuctionState, BidRecord, BidStatus, Challenge,
    DeployRequest, PedersenCommitment, Scalar, SplitCommitment, SplitResponse,
};

use crate::call::LedgerCall;
use crate::error::LedgerError;
use crate::state::{AuctionRecord, LedgerState, RoundEntry};
use crate::winner::WinnerRule;

/// Context provided by the executor for each call.
pub struct CallContext {
    /// Sender of the transaction
    pub sender: Address,
    /// Height of the block the call is mined into
    pub block_height: u64,
    /// Value attached to the call (stake or deposit)
    pub value: u64,
}

/// Pluggable pieces the handlers delegate to.
pub struct Environment<'a> {
    pub scheme: &'a dyn ResponseScheme,
    pub rule: &'a dyn WinnerRule,
    /// Fresh randomness, used as the challenge seed of a new auction
    pub entropy: [u8; 32],
}

/// Result type for handlers.
pub type HandlerResult<T> = Result<T, LedgerError>;

/// What an accepted call produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallOutput {
    Deployed(Address),
    Withdrawn(u128),
    Done,
}

/// Route a call to its handler.
pub fn dispatch(
    state: &mut LedgerState,
    ctx: &CallContext,
    env: &Environment<'_>,
    call: &LedgerCall,
) -> HandlerResult<CallOutput> {
    match call {
        LedgerCall::Deploy { request } => {
            handle_deploy(state, ctx, env, request).map(CallOutput::Deployed)
        }
        LedgerCall::Bid {
            auction,
            commitment,
        } => handle_bid(state, ctx, auction, commitment).map(|()| CallOutput::Done),
        LedgerCall::ZkpCommit {
            auction,
            bidder,
            split,
        } => handle_zkp_commit(state, ctx, auction, bidder, split).map(|()| CallOutput::Done),
        LedgerCall::CommitDelta { auction } => {
            handle_commit_delta(state, ctx, auction).map(|()| CallOutput::Done)
        }
        LedgerCall::ZkpVerify {
            auction,
            bidder,
            response,
        } => handle_zkp_verify(state, ctx, env, auction, bidder, response)
            .map(|()| CallOutput::Done),
        LedgerCall::VerifyAll { auction } => {
            handle_verify_all(state, ctx, env, auction).map(|()| CallOutput::Done)
        }
        LedgerCall::ClaimWinner {
            auction,
            bidder,
            value,
            blinding,
        } => handle_claim_winner(state, ctx, auction, bidder, *value, blinding)
            .map(|()| CallOutput::Done),
        LedgerCall::WinnerPay { auction } => {
            handle_winner_pay(state, ctx, auction).map(|()| CallOutput::Done)
        }
        LedgerCall::Withdraw { auction } => {
            handle_withdraw(state, ctx, auction).map(CallOutput::Withdrawn)
        }
        LedgerCall::Destroy { auction } => {
            handle_destroy(state, ctx, auction).map(|()| CallOutput::Done)
        }
    }
}

// =========================
// LIFECYCLE
// =========================

/// Handle Deploy call. Returns the new auction's address.
pub fn handle_deploy(
    state: &mut LedgerState,
    ctx: &CallContext,
    env: &Environment<'_>,
    request: &DeployRequest,
) -> HandlerResult<Address> {
    request.config.validate()?;

    if ctx.value < request.config.fairness_fees {
        return Err(LedgerError::InsufficientDeposit {
            required: request.config.fairness_fees,
            got: ctx.value,
        });
    }

    let curve = CurveContext::new(&request.curve)?;

    let nonce = state.allocate_nonce(&ctx.sender);
    let address = compute_auction_address(&ctx.sender, nonce);

    if request.config.testing {
        warn!(
            auction = %address_hex(&address),
            "auction deployed in testing mode, block-height checks disabled"
        );
    }
    info!(
        auction = %address_hex(&address),
        auctioneer = %address_hex(&ctx.sender),
        max_bidders = request.config.max_bidders_count,
        proof_rounds = request.config.proof_rounds,
        "auction deployed"
    );

    state.auctions.insert(
        address,
        AuctionRecord::new(
            address,
            ctx.sender,
            request.config.clone(),
            curve,
            env.entropy,
            ctx.value,
        ),
    );

    Ok(address)
}

/// Handle Bid call.
pub fn handle_bid(
    state: &mut LedgerState,
    ctx: &CallContext,
    address: &Address,
    commitment: &PedersenCommitment,
) -> HandlerResult<()> {
    let auction = live_auction(state, address)?;
    expect_state(auction, AuctionState::Init)?;

    if !auction.config.testing && ctx.block_height > auction.config.bid_block_number {
        return Err(LedgerError::BiddingClosed {
            height: ctx.block_height,
            deadline: auction.config.bid_block_number,
        });
    }

    if ctx.sender == auction.auctioneer {
        return Err(LedgerError::NotAuthorized);
    }

    if auction.get_bid(&ctx.sender).is_some() {
        return Err(LedgerError::AlreadyBid);
    }

    if auction.bids.len() >= auction.config.max_bidders_count as usize {
        return Err(LedgerError::TooManyBidders {
            max: auction.config.max_bidders_count,
        });
    }

    if ctx.value < auction.config.fairness_fees {
        return Err(LedgerError::InsufficientDeposit {
            required: auction.config.fairness_fees,
            got: ctx.value,
        });
    }

    // Commitment must be a curve point
    decode_point(&commitment.point)?;

    let sequence = auction.bids.len() as u32;
    auction.bids.push(BidRecord {
        bidder: ctx.sender,
        commitment: *commitment,
        deposit: ctx.value,
        sequence,
        block_height: ctx.block_height,
        status: BidStatus::Pending,
    });
    auction.escrow.insert(ctx.sender, ctx.value);

    debug!(
        auction = %address_hex(address),
        bidder = %address_hex(&ctx.sender),
        sequence,
        "bid recorded"
    );

    Ok(())
}

// =========================
// PROOF ROUNDS
// =========================

/// Handle ZkpCommit call: record one bid's split for the current round.
pub fn handle_zkp_commit(
    state: &mut LedgerState,
    ctx: &CallContext,
    address: &Address,
    bidder: &Address,
    split: &SplitCommitment,
) -> HandlerResult<()> {
    let auction = live_auction(state, address)?;
    require_auctioneer(auction, ctx)?;

    match auction.state {
        AuctionState::Init => {
            if !auction.config.testing && ctx.block_height <= auction.config.bid_block_number {
                return Err(LedgerError::BiddingStillOpen {
                    height: ctx.block_height,
                    deadline: auction.config.bid_block_number,
                });
            }
            if auction.pending_bids().next().is_none() {
                return Err(LedgerError::NoPendingBids);
            }
        }
        AuctionState::Challenge => {}
        got => {
            return Err(LedgerError::InvalidState {
                expected: AuctionState::Challenge,
                got,
            })
        }
    }
    check_reveal_window(auction, ctx)?;

    let bid = auction
        .get_bid(bidder)
        .ok_or_else(|| LedgerError::UnknownBidder(address_hex(bidder)))?;
    if bid.status != BidStatus::Pending {
        return Err(LedgerError::BidNotPending);
    }
    if auction.round_entries.contains_key(bidder) {
        return Err(LedgerError::DuplicateSplit);
    }

    decode_point(&split.w1)?;
    decode_point(&split.w2)?;

    if auction.state == AuctionState::Init {
        auction.state = AuctionState::Challenge;
        auction.round = 1;
        info!(auction = %address_hex(address), "bidding closed, proof round 1 started");
    }

    auction.round_entries.insert(*bidder, RoundEntry::new(*split));
    debug!(
        auction = %address_hex(address),
        bidder = %address_hex(bidder),
        round = auction.round,
        "split recorded"
    );

    if auction
        .pending_bids()
        .all(|bid| auction.round_entries.contains_key(&bid.bidder))
    {
        auction.state = AuctionState::ChallengeDelta;
        info!(
            auction = %address_hex(address),
            round = auction.round,
            splits = auction.round_entries.len(),
            "all splits received"
        );
    }

    Ok(())
}

/// Handle CommitDelta call: compute C + W1, C + W2 and a challenge per bid.
pub fn handle_commit_delta(
    state: &mut LedgerState,
    ctx: &CallContext,
    address: &Address,
) -> HandlerResult<()> {
    let auction = live_auction(state, address)?;
    require_auctioneer(auction, ctx)?;
    expect_state(auction, AuctionState::ChallengeDelta)?;
    check_reveal_window(auction, ctx)?;

    let mut issued = Vec::with_capacity(auction.round_entries.len());
    for bid in auction.pending_bids() {
        let entry = auction
            .round_entries
            .get(&bid.bidder)
            .ok_or(LedgerError::MissingChallenge)?;
        let statement = SplitStatement::decode(&bid.commitment, &entry.split)?;
        let challenge = derive_challenge(
            &auction.seed,
            &auction.address,
            auction.round,
            &bid.bidder,
            &bid.commitment,
            &entry.split,
        );
        issued.push((
            bid.bidder,
            (
                encode_point(&statement.delta1),
                encode_point(&statement.delta2),
            ),
            challenge,
        ));
    }

    for (bidder, deltas, challenge) in issued {
        if let Some(entry) = auction.round_entries.get_mut(&bidder) {
            entry.deltas = Some(deltas);
            entry.challenge = Some(challenge);
        }
        debug!(
            auction = %address_hex(address),
            bidder = %address_hex(&bidder),
            ?challenge,
            "challenge issued"
        );
    }

    auction.state = AuctionState::Verify;
    info!(auction = %address_hex(address), round = auction.round, "deltas committed");

    Ok(())
}

/// Handle ZkpVerify call: check one bid's response.
///
/// A response that checks false excludes the bid. A response that cannot be
/// interpreted is rejected and can be resubmitted.
pub fn handle_zkp_verify(
    state: &mut LedgerState,
    ctx: &CallContext,
    env: &Environment<'_>,
    address: &Address,
    bidder: &Address,
    response: &SplitResponse,
) -> HandlerResult<()> {
    let auction = live_auction(state, address)?;
    require_auctioneer(auction, ctx)?;
    expect_state(auction, AuctionState::Verify)?;
    check_reveal_window(auction, ctx)?;

    let bid = auction
        .get_bid(bidder)
        .ok_or_else(|| LedgerError::UnknownBidder(address_hex(bidder)))?;
    let entry = auction
        .round_entries
        .get(bidder)
        .ok_or(LedgerError::MissingChallenge)?;
    let (challenge, (delta1, delta2)) = match (entry.challenge, entry.deltas) {
        (Some(challenge), Some(deltas)) => (challenge, deltas),
        _ => return Err(LedgerError::MissingChallenge),
    };
    if entry.answered {
        return Err(LedgerError::AlreadyAnswered);
    }

    let statement = SplitStatement {
        commitment: decode_point(&bid.commitment.point)?,
        w1: decode_point(&entry.split.w1)?,
        w2: decode_point(&entry.split.w2)?,
        delta1: decode_point(&delta1)?,
        delta2: decode_point(&delta2)?,
    };
    let passed = env
        .scheme
        .check(
            &auction.curve,
            auction.config.max_bid,
            &statement,
            challenge,
            response,
        )
        .map_err(LedgerError::InvalidResponse)?;

    if let Some(entry) = auction.round_entries.get_mut(bidder) {
        entry.answered = true;
    }
    if passed {
        debug!(
            auction = %address_hex(address),
            bidder = %address_hex(bidder),
            round = auction.round,
            "response accepted"
        );
    } else {
        if let Some(bid) = auction.get_bid_mut(bidder) {
            bid.status = BidStatus::Failed;
        }
        warn!(
            auction = %address_hex(address),
            bidder = %address_hex(bidder),
            round = auction.round,
            scheme = env.scheme.name(),
            "response failed, bid excluded"
        );
    }

    if auction.round_entries.values().all(|entry| entry.answered) {
        finish_round(auction);
    }

    Ok(())
}

fn finish_round(auction: &mut AuctionRecord) {
    let pending = auction.pending_bids().count();
    auction.round_entries.clear();

    if auction.round < auction.config.proof_rounds && pending > 0 {
        auction.round += 1;
        auction.state = AuctionState::Challenge;
        info!(
            auction = %address_hex(&auction.address),
            round = auction.round,
            pending,
            "proof round started"
        );
    } else {
        for bid in auction
            .bids
            .iter_mut()
            .filter(|bid| bid.status == BidStatus::Pending)
        {
            bid.status = BidStatus::Verified;
        }
        auction.state = AuctionState::VerifyDelta;
        info!(
            auction = %address_hex(&auction.address),
            verified = pending,
            "proof rounds complete"
        );
    }
}

/// Handle VerifyAll call: resolve the winner.
pub fn handle_verify_all(
    state: &mut LedgerState,
    ctx: &CallContext,
    env: &Environment<'_>,
    address: &Address,
) -> HandlerResult<()> {
    let auction = live_auction(state, address)?;
    require_auctioneer(auction, ctx)?;
    expect_state(auction, AuctionState::VerifyDelta)?;
    check_reveal_window(auction, ctx)?;

    let winner = env
        .rule
        .select(&auction.bids, auction.config.tie_break)
        .filter(|winner| {
            auction
                .get_bid(winner)
                .is_some_and(|bid| bid.status == BidStatus::Verified)
        })
        .ok_or(LedgerError::NoVerifiedBids)?;

    auction.winner = Some(winner);
    auction.state = AuctionState::ValidWinner;
    info!(
        auction = %address_hex(address),
        winner = %address_hex(&winner),
        rule = env.rule.name(),
        "winner resolved"
    );

    Ok(())
}

/// Challenge for one bid: low bit of a hash over the seed and the round's
/// public artifacts.
pub fn derive_challenge(
    seed: &[u8; 32],
    auction: &Address,
    round: u32,
    bidder: &Address,
    commitment: &PedersenCommitment,
    split: &SplitCommitment,
) -> Challenge {
    let mut hasher = Sha256::new();
    hasher.update(b"AUCTION_CHALLENGE_V1:");
    hasher.update(seed);
    hasher.update(auction);
    hasher.update(round.to_le_bytes());
    hasher.update(bidder);
    hasher.update(commitment.point.0);
    hasher.update(split.w1.0);
    hasher.update(split.w2.0);
    let digest: [u8; 32] = hasher.finalize().into();
    Challenge::from_bit(digest[31])
}

// =========================
// SETTLEMENT
// =========================

/// Handle ClaimWinner call: open the winning commitment.
pub fn handle_claim_winner(
    state: &mut LedgerState,
    ctx: &CallContext,
    address: &Address,
    bidder: &Address,
    value: u64,
    blinding: &Scalar,
) -> HandlerResult<()> {
    let auction = live_auction(state, address)?;
    expect_state(auction, AuctionState::ValidWinner)?;

    if ctx.sender != *bidder && ctx.sender != auction.auctioneer {
        return Err(LedgerError::NotAuthorized);
    }
    if auction.winner != Some(*bidder) {
        return Err(LedgerError::NotWinner);
    }
    if auction.highest_bid.is_some() {
        return Err(LedgerError::AlreadyClaimed);
    }
    if value > auction.config.max_bid {
        return Err(LedgerError::BidOutOfRange {
            value,
            max: auction.config.max_bid,
        });
    }

    let bid = auction
        .get_bid(bidder)
        .ok_or_else(|| LedgerError::UnknownBidder(address_hex(bidder)))?;
    // Bids are ranked by deposit; the opening must account for all of it
    if value != bid.deposit {
        return Err(LedgerError::DepositMismatch {
            value,
            deposit: bid.deposit,
        });
    }
    if !pedersen_verify_encoded(&auction.curve, &bid.commitment, value, blinding)? {
        return Err(LedgerError::OpeningMismatch);
    }

    auction.highest_bid = Some(value);
    info!(
        auction = %address_hex(address),
        winner = %address_hex(bidder),
        value,
        "winning bid opened"
    );

    Ok(())
}

/// Handle WinnerPay call: pay the price to the auctioneer, refund the rest.
pub fn handle_winner_pay(
    state: &mut LedgerState,
    ctx: &CallContext,
    address: &Address,
) -> HandlerResult<()> {
    let (auctioneer, payment, refund) = {
        let auction = live_auction(state, address)?;
        expect_state(auction, AuctionState::ValidWinner)?;

        if auction.winner != Some(ctx.sender) {
            return Err(LedgerError::NotWinner);
        }
        let price = auction.highest_bid.ok_or(LedgerError::NotClaimed)?;
        if auction.paid {
            return Err(LedgerError::AlreadyPaid);
        }
        if !auction.config.testing
            && ctx.block_height > auction.config.winner_payment_block_number
        {
            return Err(LedgerError::PaymentDeadlinePassed);
        }

        let escrow = auction.take_escrow(&ctx.sender);
        // payment ≤ escrow, so the refund never underflows
        let payment = price.min(escrow);
        auction.paid = true;
        (auction.auctioneer, payment, escrow.saturating_sub(payment))
    };

    state.add_balance(auctioneer, u128::from(payment));
    state.add_balance(ctx.sender, u128::from(refund));
    info!(
        auction = %address_hex(address),
        payment,
        refund,
        "winner paid"
    );

    Ok(())
}

/// Handle Withdraw call. Returns the amount released to the sender.
pub fn handle_withdraw(
    state: &mut LedgerState,
    ctx: &CallContext,
    address: &Address,
) -> HandlerResult<u128> {
    let amount = {
        let auction = live_auction(state, address)?;
        let testing = auction.config.testing;
        let reveal_passed = !testing && ctx.block_height > auction.config.reveal_block_number;
        let payment_passed =
            !testing && ctx.block_height > auction.config.winner_payment_block_number;

        if ctx.sender == auction.auctioneer {
            withdraw_stake(auction, reveal_passed, payment_passed)?
        } else {
            withdraw_deposit(auction, &ctx.sender, reveal_passed)?
        }
    };

    state.add_balance(ctx.sender, amount);
    debug!(
        auction = %address_hex(address),
        account = %address_hex(&ctx.sender),
        amount,
        "withdrawal"
    );

    Ok(amount)
}

fn withdraw_deposit(
    auction: &mut AuctionRecord,
    bidder: &Address,
    reveal_passed: bool,
) -> HandlerResult<u128> {
    let failed = auction
        .get_bid(bidder)
        .map(|bid| bid.status == BidStatus::Failed)
        .ok_or(LedgerError::WithdrawNotAvailable)?;
    let escrow = auction.get_escrow(bidder);
    if escrow == 0 {
        return Err(LedgerError::WithdrawNotAvailable);
    }

    let resolved = matches!(
        auction.state,
        AuctionState::VerifyDelta | AuctionState::ValidWinner
    );
    let lost = auction.state == AuctionState::ValidWinner && auction.winner != Some(*bidder);

    let amount = if lost || (failed && resolved) {
        u128::from(escrow)
    } else if reveal_passed && auction.winner.is_none() {
        // Auctioneer missed the reveal deadline: refund plus a fairness fee
        let fee = auction.config.fairness_fees.min(auction.auctioneer_stake);
        auction.auctioneer_stake -= fee;
        u128::from(escrow) + u128::from(fee)
    } else {
        return Err(LedgerError::WithdrawNotAvailable);
    };

    auction.take_escrow(bidder);
    Ok(amount)
}

fn withdraw_stake(
    auction: &mut AuctionRecord,
    reveal_passed: bool,
    payment_passed: bool,
) -> HandlerResult<u128> {
    if auction.auctioneer_stake == 0 && !payment_passed {
        return Err(LedgerError::WithdrawNotAvailable);
    }

    let all_failed = auction.state == AuctionState::VerifyDelta && !auction.has_verified_bid();
    let winner = auction.winner;
    let forfeited = match winner {
        // Winner never paid: its deposit goes to the auctioneer
        Some(winner) if payment_passed && !auction.paid => auction.take_escrow(&winner),
        _ if auction.paid || all_failed => 0,
        None if reveal_passed && auction.escrow.is_empty() => 0,
        _ => return Err(LedgerError::WithdrawNotAvailable),
    };

    let amount = u128::from(auction.auctioneer_stake) + u128::from(forfeited);
    if amount == 0 {
        return Err(LedgerError::WithdrawNotAvailable);
    }
    auction.auctioneer_stake = 0;
    Ok(amount)
}

/// Handle Destroy call.
pub fn handle_destroy(
    state: &mut LedgerState,
    ctx: &CallContext,
    address: &Address,
) -> HandlerResult<()> {
    let auction = live_auction(state, address)?;
    require_auctioneer(auction, ctx)?;

    let remaining = auction.total_escrow();
    if remaining > 0 {
        return Err(LedgerError::EscrowNotEmpty { remaining });
    }

    auction.destroyed = true;
    info!(auction = %address_hex(address), "auction destroyed");

    Ok(())
}

// =========================
// HELPERS
// =========================

fn live_auction<'s>(
    state: &'s mut LedgerState,
    address: &Address,
) -> HandlerResult<&'s mut AuctionRecord> {
    let auction = state
        .get_auction_mut(address)
        .ok_or_else(|| LedgerError::AuctionNotFound(address_hex(address)))?;
    if auction.destroyed {
        return Err(LedgerError::AuctionDestroyed);
    }
    Ok(auction)
}

fn expect_state(auction: &AuctionRecord, expected: AuctionState) -> HandlerResult<()> {
    if auction.state != expected {
        return Err(LedgerError::InvalidState {
            expected,
            got: auction.state,
        });
    }
    Ok(())
}

fn require_auctioneer(auction: &AuctionRecord, ctx: &CallContext) -> HandlerResult<()> {
    if ctx.sender != auction.auctioneer {
        return Err(LedgerError::NotAuthorized);
    }
    Ok(())
}

fn check_reveal_window(auction: &AuctionRecord, ctx: &CallContext) -> HandlerResult<()> {
    if !auction.config.testing && ctx.block_height > auction.config.reveal_block_number {
        return Err(LedgerError::RevealDeadlinePassed);
    }
    Ok(())
}
