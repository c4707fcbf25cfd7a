//! Auctioneer driver and bidder SDK for sealed-bid auctions.
//!
//! This crate provides a high-level API for:
//! - Creating bid commitments and submitting them to a ledger
//! - Driving the challenge/verify rounds as the auctioneer
//! - Claiming, paying for and withdrawing from a resolved auction

pub mod auctioneer;
pub mod bid;
pub mod error;

pub use auctioneer::{AuctionOutcome, AuctionProtocol};
pub use bid::{claim_winner, create_bid, pay, submit_bid, withdraw, BidBuilder, PreparedBid};
pub use error::{ProtocolError, ProtocolResult};
