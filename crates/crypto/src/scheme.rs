//! Challenge response schemes.
//!
//! The same [`ResponseScheme`] is used on both sides: the auctioneer builds a
//! response from its secret split and the bid opening, the ledger checks it
//! against the published commitments and deltas.

use std::fmt;

use ark_bn254::G1Affine;

use auction_types::{Challenge, PedersenCommitment, ShareIndex, SplitCommitment, SplitResponse};

use crate::curve::{decode_point, decode_scalar, CurveContext};
use crate::error::CryptoError;
use crate::pedersen::{pedersen_add, Opening};
use crate::split::{check_masked_opening, check_share_opening, SplitProof};

/// Public statement for one bid in one proof round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitStatement {
    /// Bid commitment C
    pub commitment: G1Affine,
    pub w1: G1Affine,
    pub w2: G1Affine,
    /// D1 = C + W1
    pub delta1: G1Affine,
    /// D2 = C + W2
    pub delta2: G1Affine,
}

impl SplitStatement {
    pub fn new(commitment: G1Affine, w1: G1Affine, w2: G1Affine) -> Self {
        Self {
            commitment,
            w1,
            w2,
            delta1: pedersen_add(&commitment, &w1),
            delta2: pedersen_add(&commitment, &w2),
        }
    }

    /// Decode the wire commitment and split, computing both deltas.
    pub fn decode(
        commitment: &PedersenCommitment,
        split: &SplitCommitment,
    ) -> Result<Self, CryptoError> {
        Ok(Self::new(
            decode_point(&commitment.point)?,
            decode_point(&split.w1)?,
            decode_point(&split.w2)?,
        ))
    }

    pub fn delta(&self, share: ShareIndex) -> G1Affine {
        match share {
            ShareIndex::First => self.delta1,
            ShareIndex::Second => self.delta2,
        }
    }
}

/// Builds and checks responses to split challenges.
pub trait ResponseScheme: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Build the response to `challenge`. `opening` is the bid opening the
    /// auctioneer received from the bidder, if any.
    fn respond(
        &self,
        challenge: Challenge,
        split: &SplitProof,
        opening: Option<&Opening>,
    ) -> Result<SplitResponse, CryptoError>;

    /// Check a response.
    ///
    /// `Ok(false)` marks a well-formed response that fails; `Err` means the
    /// response could not be interpreted at all.
    fn check(
        &self,
        ctx: &CurveContext,
        bound: u64,
        statement: &SplitStatement,
        challenge: Challenge,
        response: &SplitResponse,
    ) -> Result<bool, CryptoError>;
}

/// Interval challenge: bit 0 opens both shares, bit 1 opens the bid masked
/// by one share, which shows the committed bid lies in [0, B].
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalChallenge;

impl ResponseScheme for IntervalChallenge {
    fn name(&self) -> &'static str {
        "interval-challenge"
    }

    fn respond(
        &self,
        challenge: Challenge,
        split: &SplitProof,
        opening: Option<&Opening>,
    ) -> Result<SplitResponse, CryptoError> {
        match (challenge, opening) {
            (Challenge::OpenShares, _) => Ok(split.shares_response()),
            (Challenge::OpenMasked, Some(opening)) => split.masked_response(opening),
            (Challenge::OpenMasked, None) => Ok(SplitResponse::Decline),
        }
    }

    fn check(
        &self,
        ctx: &CurveContext,
        bound: u64,
        statement: &SplitStatement,
        challenge: Challenge,
        response: &SplitResponse,
    ) -> Result<bool, CryptoError> {
        match (challenge, response) {
            (Challenge::OpenShares, SplitResponse::Shares { w1, r1, w2, r2 }) => Ok(
                check_share_opening(ctx, bound, &statement.w1, &statement.w2, (*w1, *r1, *w2, *r2)),
            ),
            (
                Challenge::OpenMasked,
                SplitResponse::Masked {
                    share,
                    value,
                    blinding,
                },
            ) => {
                let blinding = decode_scalar(blinding)?;
                Ok(check_masked_opening(
                    ctx,
                    bound,
                    &statement.delta(*share),
                    *value,
                    &blinding,
                ))
            }
            _ => Ok(false),
        }
    }
}

/// Always opens both shares, whatever the challenge.
///
/// Only shows the split was honest; says nothing about the bid itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShareOpening;

impl ResponseScheme for ShareOpening {
    fn name(&self) -> &'static str {
        "share-opening"
    }

    fn respond(
        &self,
        _challenge: Challenge,
        split: &SplitProof,
        _opening: Option<&Opening>,
    ) -> Result<SplitResponse, CryptoError> {
        Ok(split.shares_response())
    }

    fn check(
        &self,
        ctx: &CurveContext,
        bound: u64,
        statement: &SplitStatement,
        _challenge: Challenge,
        response: &SplitResponse,
    ) -> Result<bool, CryptoError> {
        match response {
            SplitResponse::Shares { w1, r1, w2, r2 } => Ok(check_share_opening(
                ctx,
                bound,
                &statement.w1,
                &statement.w2,
                (*w1, *r1, *w2, *r2),
            )),
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use auction_types::Scalar as TypesScalar;
    use rand::rngs::OsRng;

    const BOUND: u64 = 10_000;

    struct Fixture {
        ctx: CurveContext,
        split: SplitProof,
        opening: Opening,
        statement: SplitStatement,
    }

    fn fixture(value: u64) -> Fixture {
        let ctx = CurveContext::bn128().unwrap();
        let split = SplitProof::generate(&ctx, BOUND, &mut OsRng);
        let opening = Opening::random(&ctx, value, &mut OsRng);
        let (w1, w2) = split.points();
        let statement = SplitStatement::new(opening.commit(&ctx), w1, w2);
        Fixture {
            ctx,
            split,
            opening,
            statement,
        }
    }

    fn round_trip(scheme: &dyn ResponseScheme, f: &Fixture, challenge: Challenge) -> bool {
        let response = scheme
            .respond(challenge, &f.split, Some(&f.opening))
            .unwrap();
        scheme
            .check(&f.ctx, BOUND, &f.statement, challenge, &response)
            .unwrap()
    }

    #[test]
    fn test_interval_challenge_honest() {
        for value in [0, 2000, 4500, BOUND] {
            let f = fixture(value);
            assert!(round_trip(&IntervalChallenge, &f, Challenge::OpenShares));
            assert!(round_trip(&IntervalChallenge, &f, Challenge::OpenMasked));
        }
    }

    #[test]
    fn test_interval_challenge_without_opening_declines() {
        let f = fixture(2000);
        let response = IntervalChallenge
            .respond(Challenge::OpenMasked, &f.split, None)
            .unwrap();
        assert_eq!(response, SplitResponse::Decline);
        assert!(!IntervalChallenge
            .check(&f.ctx, BOUND, &f.statement, Challenge::OpenMasked, &response)
            .unwrap());
    }

    #[test]
    fn test_interval_challenge_wrong_response_kind() {
        let f = fixture(2000);
        let shares = f.split.shares_response();
        assert!(!IntervalChallenge
            .check(&f.ctx, BOUND, &f.statement, Challenge::OpenMasked, &shares)
            .unwrap());
    }

    #[test]
    fn test_interval_challenge_bid_above_bound() {
        // A commitment to a value above B cannot be opened through either delta
        let f = fixture(BOUND + 500);
        assert!(f.split.masked_response(&f.opening).is_err());

        let forged = SplitResponse::Masked {
            share: ShareIndex::First,
            value: BOUND + 500 + f.split.w1(),
            blinding: crate::curve::encode_scalar(&(f.opening.blinding + Fr::from(f.split.r1()))),
        };
        assert!(!IntervalChallenge
            .check(&f.ctx, BOUND, &f.statement, Challenge::OpenMasked, &forged)
            .unwrap());
    }

    #[test]
    fn test_malformed_blinding_is_error() {
        let f = fixture(2000);
        let malformed = SplitResponse::Masked {
            share: ShareIndex::Second,
            value: 1,
            blinding: TypesScalar([0xff; 32]),
        };
        assert!(matches!(
            IntervalChallenge.check(&f.ctx, BOUND, &f.statement, Challenge::OpenMasked, &malformed),
            Err(CryptoError::DomainRange(_))
        ));
    }

    #[test]
    fn test_share_opening_scheme() {
        let f = fixture(2000);
        assert!(round_trip(&ShareOpening, &f, Challenge::OpenShares));
        assert!(round_trip(&ShareOpening, &f, Challenge::OpenMasked));

        let tampered = SplitResponse::Shares {
            w1: f.split.w1() + 1,
            r1: f.split.r1(),
            w2: f.split.w2() - 1,
            r2: f.split.r2(),
        };
        assert!(!ShareOpening
            .check(&f.ctx, BOUND, &f.statement, Challenge::OpenShares, &tampered)
            .unwrap());
    }

    #[test]
    fn test_statement_decode() {
        let f = fixture(2000);
        let decoded =
            SplitStatement::decode(&f.opening.commitment(&f.ctx), &f.split.commitment()).unwrap();
        assert_eq!(decoded, f.statement);
    }
}
