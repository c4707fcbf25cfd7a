//! Winner selection across verified bids.

use std::cmp::Ordering;
use std::fmt;

use auction_types::{Address, BidRecord, BidStatus, TieBreak};

/// Ranks verified bids and picks the winner.
pub trait WinnerRule: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Pick the winner among `bids` with status `Verified`, or `None` if
    /// there is none.
    fn select(&self, bids: &[BidRecord], tie_break: TieBreak) -> Option<Address>;
}

/// Ranks by escrowed deposit; the bid value travels as the deposit.
#[derive(Clone, Copy, Debug, Default)]
pub struct HighestDeposit;

impl WinnerRule for HighestDeposit {
    fn name(&self) -> &'static str {
        "highest-deposit"
    }

    fn select(&self, bids: &[BidRecord], tie_break: TieBreak) -> Option<Address> {
        bids.iter()
            .filter(|bid| bid.status == BidStatus::Verified)
            .min_by(|a, b| {
                b.deposit
                    .cmp(&a.deposit)
                    .then_with(|| break_tie(a, b, tie_break))
            })
            .map(|bid| bid.bidder)
    }
}

/// Ordering between two equally ranked bids; `Less` wins.
pub fn break_tie(a: &BidRecord, b: &BidRecord, tie_break: TieBreak) -> Ordering {
    match tie_break {
        TieBreak::EarliestBid => a.sequence.cmp(&b.sequence),
        TieBreak::LowestAddress => a.bidder.cmp(&b.bidder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auction_types::PedersenCommitment;

    fn bid(bidder: u8, sequence: u32, deposit: u64, status: BidStatus) -> BidRecord {
        BidRecord {
            bidder: [bidder; 32],
            commitment: PedersenCommitment::default(),
            deposit,
            sequence,
            block_height: u64::from(sequence) + 1,
            status,
        }
    }

    #[test]
    fn test_highest_deposit_wins() {
        let bids = vec![
            bid(1, 0, 2000, BidStatus::Verified),
            bid(2, 1, 4500, BidStatus::Verified),
            bid(3, 2, 3000, BidStatus::Verified),
        ];
        assert_eq!(
            HighestDeposit.select(&bids, TieBreak::EarliestBid),
            Some([2u8; 32])
        );
    }

    #[test]
    fn test_failed_bids_excluded() {
        let bids = vec![
            bid(1, 0, 2000, BidStatus::Verified),
            bid(2, 1, 9000, BidStatus::Failed),
            bid(3, 2, 8000, BidStatus::Pending),
        ];
        assert_eq!(
            HighestDeposit.select(&bids, TieBreak::EarliestBid),
            Some([1u8; 32])
        );
    }

    #[test]
    fn test_no_verified_bids() {
        let bids = vec![bid(1, 0, 2000, BidStatus::Failed)];
        assert_eq!(HighestDeposit.select(&bids, TieBreak::EarliestBid), None);
        assert_eq!(HighestDeposit.select(&[], TieBreak::LowestAddress), None);
    }

    #[test]
    fn test_tie_break_rules() {
        let bids = vec![
            bid(7, 0, 5000, BidStatus::Verified),
            bid(4, 1, 5000, BidStatus::Verified),
            bid(9, 2, 100, BidStatus::Verified),
        ];
        assert_eq!(
            HighestDeposit.select(&bids, TieBreak::EarliestBid),
            Some([7u8; 32])
        );
        assert_eq!(
            HighestDeposit.select(&bids, TieBreak::LowestAddress),
            Some([4u8; 32])
        );
    }
}
