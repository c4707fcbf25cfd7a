//! Query handlers for the auction ledger.
//!
//! These functions provide read-only access to auction state.

use auction_types::{
    address_hex, Address, AuctionConfig, AuctionState, BidRecord, BlockThresholds, Challenge,
    CurveDescriptor,
};

use crate::error::LedgerError;
use crate::handlers::HandlerResult;
use crate::state::{AuctionRecord, LedgerState};

/// Get an auction by address. Destroyed auctions stay readable.
pub fn query_auction<'s>(
    state: &'s LedgerState,
    address: &Address,
) -> HandlerResult<&'s AuctionRecord> {
    state
        .get_auction(address)
        .ok_or_else(|| LedgerError::AuctionNotFound(address_hex(address)))
}

pub fn query_state(state: &LedgerState, address: &Address) -> HandlerResult<AuctionState> {
    query_auction(state, address).map(|auction| auction.state)
}

/// Current proof round, 0 before the first split.
pub fn query_round(state: &LedgerState, address: &Address) -> HandlerResult<u32> {
    query_auction(state, address).map(|auction| auction.round)
}

/// Number of splits submitted in the current round.
pub fn query_split_count(state: &LedgerState, address: &Address) -> HandlerResult<u32> {
    query_auction(state, address).map(|auction| auction.round_entries.len() as u32)
}

pub fn query_highest_bid(state: &LedgerState, address: &Address) -> HandlerResult<Option<u64>> {
    query_auction(state, address).map(|auction| auction.highest_bid)
}

pub fn query_winner(state: &LedgerState, address: &Address) -> HandlerResult<Option<Address>> {
    query_auction(state, address).map(|auction| auction.winner)
}

pub fn query_auctioneer(state: &LedgerState, address: &Address) -> HandlerResult<Address> {
    query_auction(state, address).map(|auction| auction.auctioneer)
}

pub fn query_thresholds(state: &LedgerState, address: &Address) -> HandlerResult<BlockThresholds> {
    query_auction(state, address).map(AuctionRecord::thresholds)
}

pub fn query_config(state: &LedgerState, address: &Address) -> HandlerResult<AuctionConfig> {
    query_auction(state, address).map(|auction| auction.config.clone())
}

pub fn query_curve(state: &LedgerState, address: &Address) -> HandlerResult<CurveDescriptor> {
    query_auction(state, address).map(|auction| auction.curve.descriptor().clone())
}

/// All bids in submission order.
pub fn query_bids(state: &LedgerState, address: &Address) -> HandlerResult<Vec<BidRecord>> {
    query_auction(state, address).map(|auction| auction.bids.clone())
}

/// Challenge issued to `bidder` in the current round, if any.
pub fn query_challenge(
    state: &LedgerState,
    address: &Address,
    bidder: &Address,
) -> HandlerResult<Option<Challenge>> {
    query_auction(state, address).map(|auction| {
        auction
            .round_entries
            .get(bidder)
            .and_then(|entry| entry.challenge)
    })
}

/// Whether `bidder`'s challenge of the current round has been answered.
pub fn query_answered(state: &LedgerState, address: &Address, bidder: &Address) -> HandlerResult<bool> {
    query_auction(state, address).map(|auction| {
        auction
            .round_entries
            .get(bidder)
            .is_some_and(|entry| entry.answered)
    })
}

/// Deposits and stake still held by the auction.
pub fn query_escrow(state: &LedgerState, address: &Address) -> HandlerResult<u128> {
    query_auction(state, address).map(AuctionRecord::total_escrow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use auction_crypto::CurveContext;

    #[test]
    fn test_unknown_auction() {
        let state = LedgerState::new();
        assert!(matches!(
            query_state(&state, &[5u8; 32]),
            Err(LedgerError::AuctionNotFound(_))
        ));
    }

    #[test]
    fn test_queries_on_fresh_auction() {
        let mut state = LedgerState::new();
        let address = [5u8; 32];
        state.auctions.insert(
            address,
            AuctionRecord::new(
                address,
                [1u8; 32],
                AuctionConfig::default(),
                CurveContext::bn128().unwrap(),
                [0u8; 32],
                3,
            ),
        );

        assert_eq!(query_state(&state, &address), Ok(AuctionState::Init));
        assert_eq!(query_round(&state, &address), Ok(0));
        assert_eq!(query_split_count(&state, &address), Ok(0));
        assert_eq!(query_winner(&state, &address), Ok(None));
        assert_eq!(query_highest_bid(&state, &address), Ok(None));
        assert_eq!(query_auctioneer(&state, &address), Ok([1u8; 32]));
        assert_eq!(query_escrow(&state, &address), Ok(3));
        assert_eq!(
            query_thresholds(&state, &address).unwrap().reveal_block_number,
            100
        );
        assert_eq!(
            query_curve(&state, &address).unwrap(),
            *CurveContext::bn128().unwrap().descriptor()
        );
        assert_eq!(query_challenge(&state, &address, &[2u8; 32]), Ok(None));
        assert_eq!(query_answered(&state, &address, &[2u8; 32]), Ok(false));
    }
}
