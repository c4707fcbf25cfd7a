//! Ledger state structures.

use std::collections::HashMap;

use auction_crypto::CurveContext;
use auction_types::{
    Address, AuctionConfig, AuctionState, BidRecord, BidStatus, BlockThresholds, Challenge,
    G1Point, SplitCommitment,
};

/// Per-bid artifacts of the current proof round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundEntry {
    pub split: SplitCommitment,
    /// (C + W1, C + W2), set by commit_delta
    pub deltas: Option<(G1Point, G1Point)>,
    pub challenge: Option<Challenge>,
    pub answered: bool,
}

impl RoundEntry {
    pub fn new(split: SplitCommitment) -> Self {
        Self {
            split,
            deltas: None,
            challenge: None,
            answered: false,
        }
    }
}

/// One deployed auction.
#[derive(Clone, Debug)]
pub struct AuctionRecord {
    pub address: Address,
    pub auctioneer: Address,
    pub config: AuctionConfig,
    pub curve: CurveContext,
    pub state: AuctionState,
    /// Current proof round, 0 before the first split
    pub round: u32,
    /// Challenge derivation seed drawn at deployment
    pub seed: [u8; 32],
    /// Bids in submission order
    pub bids: Vec<BidRecord>,
    /// Current round artifacts by bidder
    pub round_entries: HashMap<Address, RoundEntry>,
    /// Escrowed deposits by bidder
    pub escrow: HashMap<Address, u64>,
    pub auctioneer_stake: u64,
    pub winner: Option<Address>,
    pub highest_bid: Option<u64>,
    pub paid: bool,
    pub destroyed: bool,
}

impl AuctionRecord {
    pub fn new(
        address: Address,
        auctioneer: Address,
        config: AuctionConfig,
        curve: CurveContext,
        seed: [u8; 32],
        stake: u64,
    ) -> Self {
        Self {
            address,
            auctioneer,
            config,
            curve,
            state: AuctionState::Init,
            round: 0,
            seed,
            bids: Vec::new(),
            round_entries: HashMap::new(),
            escrow: HashMap::new(),
            auctioneer_stake: stake,
            winner: None,
            highest_bid: None,
            paid: false,
            destroyed: false,
        }
    }

    pub fn thresholds(&self) -> BlockThresholds {
        BlockThresholds {
            bid_block_number: self.config.bid_block_number,
            reveal_block_number: self.config.reveal_block_number,
            winner_payment_block_number: self.config.winner_payment_block_number,
        }
    }

    pub fn get_bid(&self, bidder: &Address) -> Option<&BidRecord> {
        self.bids.iter().find(|bid| bid.bidder == *bidder)
    }

    pub fn get_bid_mut(&mut self, bidder: &Address) -> Option<&mut BidRecord> {
        self.bids.iter_mut().find(|bid| bid.bidder == *bidder)
    }

    pub fn pending_bids(&self) -> impl Iterator<Item = &BidRecord> {
        self.bids
            .iter()
            .filter(|bid| bid.status == BidStatus::Pending)
    }

    pub fn has_verified_bid(&self) -> bool {
        self.bids
            .iter()
            .any(|bid| bid.status == BidStatus::Verified)
    }

    pub fn get_escrow(&self, bidder: &Address) -> u64 {
        self.escrow.get(bidder).copied().unwrap_or(0)
    }

    /// Deposits still held plus the auctioneer stake.
    ///
    /// Summed in u128: two deposits at the bid bound already exceed u64.
    pub fn total_escrow(&self) -> u128 {
        self.escrow
            .values()
            .map(|deposit| u128::from(*deposit))
            .sum::<u128>()
            + u128::from(self.auctioneer_stake)
    }

    /// Remove and return a bidder's whole escrow.
    pub fn take_escrow(&mut self, bidder: &Address) -> u64 {
        self.escrow.remove(bidder).unwrap_or(0)
    }
}

/// Whole ledger: every auction plus account balances and chain position.
#[derive(Debug, Default)]
pub struct LedgerState {
    /// Height of the last mined block
    pub block_height: u64,

    /// Accepted transactions so far
    pub tx_count: u64,

    /// Auctions by address
    pub auctions: HashMap<Address, AuctionRecord>,

    /// Deployment nonce per deployer
    pub nonces: HashMap<Address, u64>,

    /// Funds paid out to accounts (refunds, payments)
    pub balances: HashMap<Address, u128>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the deployment nonce for `deployer` and increment.
    pub fn allocate_nonce(&mut self, deployer: &Address) -> u64 {
        let nonce = self.nonces.entry(*deployer).or_insert(0);
        let current = *nonce;
        *nonce += 1;
        current
    }

    pub fn get_auction(&self, address: &Address) -> Option<&AuctionRecord> {
        self.auctions.get(address)
    }

    pub fn get_auction_mut(&mut self, address: &Address) -> Option<&mut AuctionRecord> {
        self.auctions.get_mut(address)
    }

    pub fn get_balance(&self, address: &Address) -> u128 {
        self.balances.get(address).copied().unwrap_or(0)
    }

    pub fn add_balance(&mut self, address: Address, amount: u128) {
        let balance = self.balances.entry(address).or_insert(0);
        *balance = balance.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auction_types::{PedersenCommitment, MAX_BID};

    fn record() -> AuctionRecord {
        AuctionRecord::new(
            [9u8; 32],
            [1u8; 32],
            AuctionConfig::testing(),
            CurveContext::bn128().unwrap(),
            [0u8; 32],
            10,
        )
    }

    fn bid(bidder: u8, sequence: u32, status: BidStatus) -> BidRecord {
        BidRecord {
            bidder: [bidder; 32],
            commitment: PedersenCommitment::default(),
            deposit: 100,
            sequence,
            block_height: 1,
            status,
        }
    }

    #[test]
    fn test_allocate_nonce() {
        let mut state = LedgerState::new();
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_eq!(state.allocate_nonce(&a), 0);
        assert_eq!(state.allocate_nonce(&a), 1);
        assert_eq!(state.allocate_nonce(&b), 0);
    }

    #[test]
    fn test_balances() {
        let mut state = LedgerState::new();
        let addr = [1u8; 32];

        assert_eq!(state.get_balance(&addr), 0);
        state.add_balance(addr, 100);
        state.add_balance(addr, 50);
        assert_eq!(state.get_balance(&addr), 150);
    }

    #[test]
    fn test_escrow_operations() {
        let mut auction = record();
        auction.escrow.insert([2u8; 32], 100);
        auction.escrow.insert([3u8; 32], 40);

        assert_eq!(auction.total_escrow(), 150);
        assert_eq!(auction.take_escrow(&[2u8; 32]), 100);
        assert_eq!(auction.take_escrow(&[2u8; 32]), 0);
        assert_eq!(auction.total_escrow(), 50);
    }

    #[test]
    fn test_escrow_total_at_bid_bound() {
        let mut auction = record();
        auction.escrow.insert([2u8; 32], MAX_BID);
        auction.escrow.insert([3u8; 32], MAX_BID);

        assert_eq!(auction.total_escrow(), 2 * u128::from(MAX_BID) + 10);

        let mut state = LedgerState::new();
        state.add_balance([2u8; 32], u128::from(u64::MAX));
        state.add_balance([2u8; 32], u128::from(u64::MAX));
        assert_eq!(state.get_balance(&[2u8; 32]), 2 * u128::from(u64::MAX));
    }

    #[test]
    fn test_bid_filters() {
        let mut auction = record();
        auction.bids.push(bid(2, 0, BidStatus::Pending));
        auction.bids.push(bid(3, 1, BidStatus::Failed));

        assert_eq!(auction.pending_bids().count(), 1);
        assert!(!auction.has_verified_bid());

        auction.get_bid_mut(&[2u8; 32]).unwrap().status = BidStatus::Verified;
        assert!(auction.has_verified_bid());
        assert_eq!(auction.pending_bids().count(), 0);
        assert!(auction.get_bid(&[4u8; 32]).is_none());
    }
}
