//! Pedersen commitments and the split argument for sealed-bid auctions.
//!
//! All operations run on the BN254 (alt_bn128) G1 group.
//!
//! # Overview
//!
//! 1. **Curve context**: [`CurveContext`] validates the domain parameters and
//!    the generators G, H once, then is passed to every operation.
//!
//! 2. **Commitments**: a bidder commits to a bid x as C = x·G + r·H and keeps
//!    the [`Opening`] `(x, r)` private.
//!
//! 3. **Split**: per bid and per proof round the auctioneer draws a
//!    [`SplitProof`] of the public bound B into two committed shares.
//!
//! 4. **Challenge**: the ledger adds each share to the bid commitment and
//!    issues a challenge bit; a [`ResponseScheme`] builds and checks the
//!    auctioneer's answer.

pub mod curve;
pub mod error;
pub mod pedersen;
pub mod scheme;
pub mod split;

pub use ark_bn254::{Fr, G1Affine};

pub use curve::{
    bn128_descriptor, decode_point, decode_scalar, encode_point, encode_scalar, parse_scalar,
    point_from_decimal, point_to_decimal, scalar_to_decimal, CurveContext,
};
pub use error::CryptoError;
pub use pedersen::{
    pedersen_add, pedersen_add_encoded, pedersen_commit, pedersen_commit_negated, pedersen_sub,
    pedersen_verify, pedersen_verify_encoded, Opening,
};
pub use scheme::{IntervalChallenge, ResponseScheme, ShareOpening, SplitStatement};
pub use split::{check_masked_opening, check_share_opening, sums_to_bound, SplitProof};
