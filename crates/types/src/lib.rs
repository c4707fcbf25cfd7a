//! Core type definitions for sealed-bid Pedersen auctions.
//!
//! This crate provides the wire-level data structures shared by the
//! commitment library, the ledger executor and the auctioneer: encoded curve
//! points and scalars, auction configuration, the auction state machine and
//! the artifacts exchanged during the challenge/verify rounds.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use std::fmt;

pub mod config;

pub use config::{AuctionConfig, ConfigError, TieBreak, MAX_BID};

// =========================
// CRYPTOGRAPHIC PRIMITIVES
// =========================

/// Uncompressed BN254 G1 point: big-endian `x || y` (64 bytes).
///
/// The all-zero encoding is the point at infinity, matching the EVM
/// precompile convention.
#[serde_as]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct G1Point(#[serde_as(as = "Hex")] pub [u8; 64]);

impl Default for G1Point {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl G1Point {
    /// Encoding of the point at infinity.
    pub const IDENTITY: G1Point = G1Point([0u8; 64]);

    /// Build an encoded point from big-endian affine coordinates.
    pub fn from_coordinates(x: [u8; 32], y: [u8; 32]) -> Self {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&x);
        bytes[32..].copy_from_slice(&y);
        Self(bytes)
    }

    /// Big-endian x coordinate.
    pub fn x(&self) -> [u8; 32] {
        let mut x = [0u8; 32];
        x.copy_from_slice(&self.0[..32]);
        x
    }

    /// Big-endian y coordinate.
    pub fn y(&self) -> [u8; 32] {
        let mut y = [0u8; 32];
        y.copy_from_slice(&self.0[32..]);
        y
    }

    pub fn is_identity(&self) -> bool {
        self.0 == [0u8; 64]
    }
}

/// Scalar field element (32 bytes, big-endian)
#[serde_as]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct Scalar(#[serde_as(as = "Hex")] pub [u8; 32]);

impl Default for Scalar {
    fn default() -> Self {
        Self([0u8; 32])
    }
}

impl Scalar {
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

/// Pedersen commitment: C = value·G + randomness·H
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct PedersenCommitment {
    pub point: G1Point,
}

/// Short Weierstrass domain parameters and the two commitment generators.
///
/// All integers are 256-bit big-endian.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct CurveDescriptor {
    #[serde_as(as = "Hex")]
    pub field_modulus: [u8; 32],
    #[serde_as(as = "Hex")]
    pub coeff_a: [u8; 32],
    #[serde_as(as = "Hex")]
    pub coeff_b: [u8; 32],
    #[serde_as(as = "Hex")]
    pub group_order: [u8; 32],
    /// Value generator
    pub g: G1Point,
    /// Blinding generator
    pub h: G1Point,
}

// =========================
// AUCTION TYPES
// =========================

/// Generic address type (32 bytes)
pub type Address = [u8; 32];

/// Hex rendering of an address for logs and error messages.
pub fn address_hex(address: &Address) -> String {
    hex::encode(address)
}

/// Auction lifecycle state, owned by the ledger executor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub enum AuctionState {
    /// Accepting bid commitments
    Init,
    /// Collecting split commitments for the current proof round
    Challenge,
    /// Splits complete, waiting for deltas and challenges
    ChallengeDelta,
    /// Collecting responses to the issued challenges
    Verify,
    /// All rounds answered, waiting for winner resolution
    VerifyDelta,
    /// Winner resolved
    ValidWinner,
}

impl AuctionState {
    pub fn name(&self) -> &'static str {
        match self {
            AuctionState::Init => "Init",
            AuctionState::Challenge => "Challenge",
            AuctionState::ChallengeDelta => "ChallengeDelta",
            AuctionState::Verify => "Verify",
            AuctionState::VerifyDelta => "VerifyDelta",
            AuctionState::ValidWinner => "ValidWinner",
        }
    }
}

impl fmt::Display for AuctionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Verification status of a recorded bid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub enum BidStatus {
    /// Still taking part in the proof rounds
    Pending,
    /// Passed every proof round
    Verified,
    /// Failed a round; excluded from winner selection
    Failed,
}

/// A submitted bid (stored by the ledger)
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct BidRecord {
    #[serde_as(as = "Hex")]
    pub bidder: Address,
    pub commitment: PedersenCommitment,
    pub deposit: u64,
    /// Submission order within the auction (0-based)
    pub sequence: u32,
    pub block_height: u64,
    pub status: BidStatus,
}

/// Published half of a split argument: commitments W1 and W2.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct SplitCommitment {
    pub w1: G1Point,
    pub w2: G1Point,
}

impl SplitCommitment {
    /// The `[W1x, W1y, W2x, W2y]` words submitted with `zkp_commit`.
    pub fn words(&self) -> [[u8; 32]; 4] {
        [self.w1.x(), self.w1.y(), self.w2.x(), self.w2.y()]
    }

    pub fn from_words(words: [[u8; 32]; 4]) -> Self {
        Self {
            w1: G1Point::from_coordinates(words[0], words[1]),
            w2: G1Point::from_coordinates(words[2], words[3]),
        }
    }
}

/// Challenge issued by the ledger for one bid in one proof round.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub enum Challenge {
    /// Reveal both shares and their blinding factors
    OpenShares,
    /// Reveal the bid masked by one share
    OpenMasked,
}

impl Challenge {
    pub fn from_bit(bit: u8) -> Self {
        if bit & 1 == 0 {
            Challenge::OpenShares
        } else {
            Challenge::OpenMasked
        }
    }
}

/// Which share masks the bid in a masked opening.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub enum ShareIndex {
    /// z = x + w1, opened against C + W1
    First,
    /// z = x − w2, opened against C + W2
    Second,
}

/// Auctioneer response submitted with `zkp_verify`.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub enum SplitResponse {
    /// Opening of both split commitments
    Shares { w1: u64, r1: u64, w2: u64, r2: u64 },
    /// Opening of the delta `C + W_share` to `(value, blinding)`
    Masked {
        share: ShareIndex,
        value: u64,
        blinding: Scalar,
    },
    /// The auctioneer cannot answer; the bid is excluded
    Decline,
}

/// Block-height deadlines of an auction.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct BlockThresholds {
    pub bid_block_number: u64,
    pub reveal_block_number: u64,
    pub winner_payment_block_number: u64,
}

/// Everything needed to open a new auction on a ledger.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct DeployRequest {
    pub config: AuctionConfig,
    pub curve: CurveDescriptor,
    /// Auctioneer stake attached to the deployment
    pub deposit: u64,
}

/// Proof of inclusion of an accepted ledger call.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Receipt {
    #[serde_as(as = "Hex")]
    pub tx_hash: [u8; 32],
    pub block_height: u64,
}

// =========================
// HELPER FUNCTIONS
// =========================

/// Derive the address of a newly deployed auction.
pub fn compute_auction_address(deployer: &Address, nonce: u64) -> Address {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(b"AUCTION_ADDRESS_V1:");
    hasher.update(deployer);
    hasher.update(nonce.to_le_bytes());
    hasher.finalize().into()
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    Sha256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_auction_address() {
        let a1 = compute_auction_address(&[1u8; 32], 0);
        let a2 = compute_auction_address(&[1u8; 32], 1);
        let a3 = compute_auction_address(&[2u8; 32], 0);

        assert_ne!(a1, a2);
        assert_ne!(a1, a3);
        assert_eq!(a1, compute_auction_address(&[1u8; 32], 0));
    }

    #[test]
    fn test_g1_point_coordinates() {
        let point = G1Point::from_coordinates([1u8; 32], [2u8; 32]);
        assert_eq!(point.x(), [1u8; 32]);
        assert_eq!(point.y(), [2u8; 32]);
        assert!(!point.is_identity());
        assert!(G1Point::default().is_identity());
    }

    #[test]
    fn test_split_commitment_words() {
        let split = SplitCommitment {
            w1: G1Point::from_coordinates([1u8; 32], [2u8; 32]),
            w2: G1Point::from_coordinates([3u8; 32], [4u8; 32]),
        };
        let words = split.words();
        assert_eq!(words[2], [3u8; 32]);
        assert_eq!(SplitCommitment::from_words(words), split);
    }

    #[test]
    fn test_scalar_from_u64_is_big_endian() {
        let scalar = Scalar::from_u64(0x0102);
        assert_eq!(scalar.0[31], 0x02);
        assert_eq!(scalar.0[30], 0x01);
        assert!(scalar.0[..30].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_challenge_from_bit() {
        assert_eq!(Challenge::from_bit(0), Challenge::OpenShares);
        assert_eq!(Challenge::from_bit(1), Challenge::OpenMasked);
        assert_eq!(Challenge::from_bit(0xfe), Challenge::OpenShares);
    }

    #[test]
    fn test_g1_point_serializes_as_hex() {
        let point = G1Point::from_coordinates([0u8; 32], [0xabu8; 32]);
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains(&"ab".repeat(32)));

        let encoded = borsh::to_vec(&point).unwrap();
        let decoded: G1Point = borsh::from_slice(&encoded).unwrap();
        assert_eq!(point, decoded);
    }

    #[test]
    fn test_auction_state_display() {
        assert_eq!(AuctionState::ChallengeDelta.to_string(), "ChallengeDelta");
    }
}
