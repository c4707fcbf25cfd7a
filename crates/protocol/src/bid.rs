//! Bid creation and submission.

use rand::{CryptoRng, RngCore};
use tracing::{debug, info};

use auction_crypto::{CurveContext, Fr, Opening};
use auction_ledger::LedgerExecutor;
use auction_types::{address_hex, Address, AuctionState, PedersenCommitment, Receipt, Scalar};

use crate::error::{ProtocolError, ProtocolResult};

/// A prepared bid ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBid {
    /// Pedersen commitment to the bid value
    pub commitment: PedersenCommitment,
    /// Bid value and blinding (share only with the auctioneer)
    pub opening: Opening,
    /// Amount escrowed with the bid; always the bid value
    pub deposit: u64,
}

impl PreparedBid {
    pub fn bid_value(&self) -> u64 {
        self.opening.value
    }

    pub fn blinding(&self) -> Scalar {
        self.opening.blinding_scalar()
    }
}

/// Create a bid with a fresh blinding factor.
///
/// The deposit equals the bid value.
///
/// # Arguments
/// * `ctx` - Curve context of the auction
/// * `bid_value` - The bid amount
/// * `max_bid` - Public bound of the auction
/// * `rng` - Cryptographically secure random number generator
pub fn create_bid<R: RngCore + CryptoRng>(
    ctx: &CurveContext,
    bid_value: u64,
    max_bid: u64,
    rng: &mut R,
) -> ProtocolResult<PreparedBid> {
    BidBuilder::new(max_bid).bid_value(bid_value).build(ctx, rng)
}

/// Builder for creating bids with additional options.
#[derive(Debug, Clone)]
pub struct BidBuilder {
    max_bid: u64,
    bid_value: u64,
    blinding: Option<Fr>,
}

impl BidBuilder {
    pub fn new(max_bid: u64) -> Self {
        Self {
            max_bid,
            bid_value: 0,
            blinding: None,
        }
    }

    pub fn bid_value(mut self, value: u64) -> Self {
        self.bid_value = value;
        self
    }

    /// Use a chosen blinding factor instead of a random one.
    pub fn blinding(mut self, blinding: Fr) -> Self {
        self.blinding = Some(blinding);
        self
    }

    pub fn build<R: RngCore + CryptoRng>(
        self,
        ctx: &CurveContext,
        rng: &mut R,
    ) -> ProtocolResult<PreparedBid> {
        if self.bid_value > self.max_bid {
            return Err(ProtocolError::BidOutOfRange {
                value: self.bid_value,
                max: self.max_bid,
            });
        }

        let opening = match self.blinding {
            Some(blinding) => Opening::new(self.bid_value, blinding),
            None => Opening::random(ctx, self.bid_value, rng),
        };

        Ok(PreparedBid {
            commitment: opening.commitment(ctx),
            opening,
            deposit: self.bid_value,
        })
    }
}

/// Submit a prepared bid from `bidder`.
pub fn submit_bid<E: LedgerExecutor>(
    executor: &E,
    bidder: &Address,
    auction: &Address,
    bid: &PreparedBid,
) -> ProtocolResult<Receipt> {
    expect_state(executor, auction, AuctionState::Init)?;
    let receipt = executor.bid(bidder, auction, bid.commitment, bid.deposit)?;
    debug!(
        auction = %address_hex(auction),
        bidder = %address_hex(bidder),
        block = receipt.block_height,
        "bid submitted"
    );
    Ok(receipt)
}

/// Open the winning bid on the ledger.
pub fn claim_winner<E: LedgerExecutor>(
    executor: &E,
    bidder: &Address,
    auction: &Address,
    bid: &PreparedBid,
) -> ProtocolResult<Receipt> {
    expect_state(executor, auction, AuctionState::ValidWinner)?;
    let receipt = executor.claim_winner(bidder, auction, bidder, bid.bid_value(), bid.blinding())?;
    info!(
        auction = %address_hex(auction),
        bidder = %address_hex(bidder),
        value = bid.bid_value(),
        "winning bid claimed"
    );
    Ok(receipt)
}

/// Pay the claimed price out of the winner's escrow.
pub fn pay<E: LedgerExecutor>(
    executor: &E,
    bidder: &Address,
    auction: &Address,
) -> ProtocolResult<Receipt> {
    expect_state(executor, auction, AuctionState::ValidWinner)?;
    Ok(executor.winner_pay(bidder, auction)?)
}

/// Reclaim a losing or excluded deposit.
pub fn withdraw<E: LedgerExecutor>(
    executor: &E,
    bidder: &Address,
    auction: &Address,
) -> ProtocolResult<Receipt> {
    Ok(executor.withdraw(bidder, auction)?)
}

fn expect_state<E: LedgerExecutor>(
    executor: &E,
    auction: &Address,
    expected: AuctionState,
) -> ProtocolResult<()> {
    let got = executor.auction_state(auction)?;
    if got != expected {
        return Err(ProtocolError::InvalidState {
            expected: vec![expected],
            got,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use auction_crypto::bn128_descriptor;
    use auction_ledger::InMemoryLedger;
    use auction_types::{AuctionConfig, DeployRequest};
    use rand::rngs::OsRng;

    fn ctx() -> CurveContext {
        CurveContext::bn128().unwrap()
    }

    #[test]
    fn test_create_bid() {
        let ctx = ctx();
        let bid = create_bid(&ctx, 1000, 10_000, &mut OsRng).unwrap();

        assert_eq!(bid.bid_value(), 1000);
        assert_eq!(bid.deposit, 1000);
        assert_eq!(bid.commitment, bid.opening.commitment(&ctx));
    }

    #[test]
    fn test_bid_above_bound_rejected() {
        assert_eq!(
            create_bid(&ctx(), 10_001, 10_000, &mut OsRng),
            Err(ProtocolError::BidOutOfRange {
                value: 10_001,
                max: 10_000
            })
        );
    }

    #[test]
    fn test_bid_builder() {
        let ctx = ctx();
        let bid = BidBuilder::new(10_000)
            .bid_value(2000)
            .blinding(Fr::from(100u64))
            .build(&ctx, &mut OsRng)
            .unwrap();

        assert_eq!(bid.deposit, 2000);
        assert_eq!(bid.blinding(), Scalar::from_u64(100));
        assert_eq!(
            bid.commitment,
            Opening::new(2000, Fr::from(100u64)).commitment(&ctx)
        );
    }

    #[test]
    fn test_submit_bid_checks_state() {
        let ledger = InMemoryLedger::new();
        let (auction, _) = ledger
            .deploy(
                &[1u8; 32],
                DeployRequest {
                    config: AuctionConfig::testing(),
                    curve: bn128_descriptor().unwrap(),
                    deposit: 1,
                },
            )
            .unwrap();

        let bid = create_bid(&ctx(), 2000, 10_000, &mut OsRng).unwrap();
        submit_bid(&ledger, &[2u8; 32], &auction, &bid).unwrap();

        // Claiming before a winner exists is a state error
        assert_eq!(
            claim_winner(&ledger, &[2u8; 32], &auction, &bid),
            Err(ProtocolError::InvalidState {
                expected: vec![AuctionState::ValidWinner],
                got: AuctionState::Init
            })
        );

        // Ledger rejections surface as executor failures
        assert!(matches!(
            submit_bid(&ledger, &[2u8; 32], &auction, &bid),
            Err(ProtocolError::Executor(_))
        ));
    }
}
