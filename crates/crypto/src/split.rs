//! Randomized two-share split of the public bound B.
//!
//! The auctioneer draws w1 from [0, B/2], sets w2 = B − w1 and publishes
//! W1 = commit(w1, r1) and W2 = commit_negated(w2, r2). The pair satisfies
//! W1 − W2 == commit(B, r1 − r2). Adding a share to a bid commitment C gives
//! the deltas C + W1 and C + W2 that a challenge may ask to open.

use ark_bn254::{Fr, G1Affine};
use rand::{CryptoRng, Rng, RngCore};

use auction_types::{ShareIndex, SplitCommitment, SplitResponse};

use crate::curve::{encode_point, encode_scalar, CurveContext};
use crate::error::CryptoError;
use crate::pedersen::{pedersen_commit, pedersen_commit_negated, pedersen_sub, Opening};

/// Secret shares of one split together with their commitments.
///
/// Generated fresh for every bid in every proof round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitProof {
    bound: u64,
    w1: u64,
    r1: u64,
    w2: u64,
    r2: u64,
    big_w1: G1Affine,
    big_w2: G1Affine,
}

impl SplitProof {
    /// Draw a fresh split of `bound`.
    pub fn generate<R: RngCore + CryptoRng>(ctx: &CurveContext, bound: u64, rng: &mut R) -> Self {
        let half = bound / 2;
        let w1 = rng.gen_range(0..=half);
        let r1 = rng.gen_range(0..=half);
        let r2 = rng.gen_range(0..=half);
        Self::build(ctx, bound, w1, r1, r2)
    }

    /// Rebuild a split from chosen shares. `w1` must not exceed `bound / 2`.
    pub fn from_shares(
        ctx: &CurveContext,
        bound: u64,
        w1: u64,
        r1: u64,
        r2: u64,
    ) -> Result<Self, CryptoError> {
        if w1 > bound / 2 {
            return Err(CryptoError::DomainRange(format!(
                "share {w1} exceeds half of the bound {bound}"
            )));
        }
        Ok(Self::build(ctx, bound, w1, r1, r2))
    }

    fn build(ctx: &CurveContext, bound: u64, w1: u64, r1: u64, r2: u64) -> Self {
        let w2 = w1.abs_diff(bound);
        Self {
            bound,
            w1,
            r1,
            w2,
            r2,
            big_w1: pedersen_commit(ctx, &Fr::from(w1), &Fr::from(r1)),
            big_w2: pedersen_commit_negated(ctx, &Fr::from(w2), &Fr::from(r2)),
        }
    }

    pub fn bound(&self) -> u64 {
        self.bound
    }

    pub fn w1(&self) -> u64 {
        self.w1
    }

    pub fn r1(&self) -> u64 {
        self.r1
    }

    pub fn w2(&self) -> u64 {
        self.w2
    }

    pub fn r2(&self) -> u64 {
        self.r2
    }

    /// The committed shares (W1, W2).
    pub fn points(&self) -> (G1Affine, G1Affine) {
        (self.big_w1, self.big_w2)
    }

    /// The published half of the split.
    pub fn commitment(&self) -> SplitCommitment {
        SplitCommitment {
            w1: encode_point(&self.big_w1),
            w2: encode_point(&self.big_w2),
        }
    }

    /// Response opening both shares.
    pub fn shares_response(&self) -> SplitResponse {
        SplitResponse::Shares {
            w1: self.w1,
            r1: self.r1,
            w2: self.w2,
            r2: self.r2,
        }
    }

    /// Response opening the bid masked by one share.
    ///
    /// Uses z = x + w1 against C + W1 when that stays within the bound,
    /// otherwise z = x − w2 against C + W2. Either way 0 ≤ z ≤ B.
    pub fn masked_response(&self, opening: &Opening) -> Result<SplitResponse, CryptoError> {
        if opening.value > self.bound {
            return Err(CryptoError::DomainRange(format!(
                "bid {} exceeds the bound {}",
                opening.value, self.bound
            )));
        }

        let (share, value, blinding) =
            if u128::from(opening.value) + u128::from(self.w1) <= u128::from(self.bound) {
                (
                    ShareIndex::First,
                    opening.value + self.w1,
                    opening.blinding + Fr::from(self.r1),
                )
            } else {
                (
                    ShareIndex::Second,
                    opening.value - self.w2,
                    opening.blinding + Fr::from(self.r2),
                )
            };

        Ok(SplitResponse::Masked {
            share,
            value,
            blinding: encode_scalar(&blinding),
        })
    }
}

/// Check an opening of both shares against W1 and W2.
///
/// Requires w1 + w2 = B with w1 ≤ B/2, W1 = commit(w1, r1) and
/// W2 = commit_negated(w2, r2).
pub fn check_share_opening(
    ctx: &CurveContext,
    bound: u64,
    big_w1: &G1Affine,
    big_w2: &G1Affine,
    shares: (u64, u64, u64, u64),
) -> bool {
    let (w1, r1, w2, r2) = shares;
    if u128::from(w1) + u128::from(w2) != u128::from(bound) || w1 > bound / 2 {
        return false;
    }
    pedersen_commit(ctx, &Fr::from(w1), &Fr::from(r1)) == *big_w1
        && pedersen_commit_negated(ctx, &Fr::from(w2), &Fr::from(r2)) == *big_w2
}

/// Check a masked opening `(z, s)` of a delta: D == commit(z, s) and z ≤ B.
pub fn check_masked_opening(
    ctx: &CurveContext,
    bound: u64,
    delta: &G1Affine,
    value: u64,
    blinding: &Fr,
) -> bool {
    value <= bound && pedersen_commit(ctx, &Fr::from(value), blinding) == *delta
}

/// Check W1 − W2 == commit(B, r1 − r2).
pub fn sums_to_bound(
    ctx: &CurveContext,
    bound: u64,
    big_w1: &G1Affine,
    big_w2: &G1Affine,
    r1: u64,
    r2: u64,
) -> bool {
    pedersen_sub(big_w1, big_w2)
        == pedersen_commit(ctx, &Fr::from(bound), &(Fr::from(r1) - Fr::from(r2)))
}
