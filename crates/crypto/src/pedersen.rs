//! Pedersen commitments on BN254 G1.
//!
//! A Pedersen commitment C = x·G + r·H is:
//! - **Hiding**: Given C, cannot determine x without r
//! - **Binding**: Cannot find different (x', r') with same C
//!
//! Commitments are additively homomorphic, which the split argument relies
//! on: commit(x1, r1) + commit(x2, r2) = commit(x1 + x2, r1 + r2).

use std::ops::Mul;

use ark_bn254::{Fr, G1Affine, G1Projective};
use ark_ec::CurveGroup;
use rand::{CryptoRng, RngCore};

use auction_types::{PedersenCommitment, Scalar as TypesScalar};

use crate::curve::{decode_point, decode_scalar, encode_point, encode_scalar, CurveContext};
use crate::error::CryptoError;

/// Compute x·G + r·H. Scalars are already reduced mod n; no range check.
pub fn pedersen_commit(ctx: &CurveContext, value: &Fr, randomness: &Fr) -> G1Affine {
    (ctx.g().mul(*value) + ctx.h().mul(*randomness)).into_affine()
}

/// Compute (−x)·G + r·H.
pub fn pedersen_commit_negated(ctx: &CurveContext, value: &Fr, randomness: &Fr) -> G1Affine {
    pedersen_commit(ctx, &-*value, randomness)
}

/// Check that `commitment` opens to `(value, randomness)`.
pub fn pedersen_verify(
    ctx: &CurveContext,
    value: &Fr,
    randomness: &Fr,
    commitment: &G1Affine,
) -> bool {
    pedersen_commit(ctx, value, randomness) == *commitment
}

/// Verify an opening against a wire commitment.
///
/// Fails only if the commitment or blinding is malformed; a well-formed
/// mismatch is `Ok(false)`.
pub fn pedersen_verify_encoded(
    ctx: &CurveContext,
    commitment: &PedersenCommitment,
    value: u64,
    randomness: &TypesScalar,
) -> Result<bool, CryptoError> {
    let point = decode_point(&commitment.point)?;
    let r = decode_scalar(randomness)?;
    Ok(pedersen_verify(ctx, &Fr::from(value), &r, &point))
}

/// Homomorphic addition: commits to v1 + v2 with randomness r1 + r2.
pub fn pedersen_add(c1: &G1Affine, c2: &G1Affine) -> G1Affine {
    (G1Projective::from(*c1) + G1Projective::from(*c2)).into_affine()
}

/// Homomorphic subtraction: commits to v1 − v2 with randomness r1 − r2.
pub fn pedersen_sub(c1: &G1Affine, c2: &G1Affine) -> G1Affine {
    (G1Projective::from(*c1) - G1Projective::from(*c2)).into_affine()
}

/// Add two wire points. Either operand being off the curve is an error.
pub fn pedersen_add_encoded(
    c1: &auction_types::G1Point,
    c2: &auction_types::G1Point,
) -> Result<auction_types::G1Point, CryptoError> {
    let sum = pedersen_add(&decode_point(c1)?, &decode_point(c2)?);
    Ok(encode_point(&sum))
}

/// Opening of a bid commitment: the bid value and its blinding factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opening {
    pub value: u64,
    pub blinding: Fr,
}

impl Opening {
    pub fn new(value: u64, blinding: Fr) -> Self {
        Self { value, blinding }
    }

    /// Open `value` with a fresh uniformly random blinding factor.
    pub fn random<R: RngCore + CryptoRng>(ctx: &CurveContext, value: u64, rng: &mut R) -> Self {
        Self::new(value, ctx.random_scalar(rng))
    }

    pub fn commit(&self, ctx: &CurveContext) -> G1Affine {
        pedersen_commit(ctx, &Fr::from(self.value), &self.blinding)
    }

    /// The wire form of [`Opening::commit`].
    pub fn commitment(&self, ctx: &CurveContext) -> PedersenCommitment {
        PedersenCommitment {
            point: encode_point(&self.commit(ctx)),
        }
    }

    pub fn verify(&self, ctx: &CurveContext, commitment: &G1Affine) -> bool {
        pedersen_verify(ctx, &Fr::from(self.value), &self.blinding, commitment)
    }

    pub fn blinding_scalar(&self) -> TypesScalar {
        encode_scalar(&self.blinding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::point_from_decimal;
    use ark_ec::AffineRepr;
    use rand::rngs::OsRng;

    fn ctx() -> CurveContext {
        CurveContext::bn128().unwrap()
    }

    fn fr(value: u64) -> Fr {
        Fr::from(value)
    }

    #[test]
    fn test_pedersen_commit_verify() {
        let ctx = ctx();
        let r = ctx.random_scalar(&mut OsRng);
        let c = pedersen_commit(&ctx, &fr(1000), &r);

        // Verification should succeed with correct values
        assert!(pedersen_verify(&ctx, &fr(1000), &r, &c));

        // Verification should fail with wrong value or randomness
        assert!(!pedersen_verify(&ctx, &fr(1001), &r, &c));
        assert!(!pedersen_verify(&ctx, &fr(1000), &(r + fr(1)), &c));
    }

    #[test]
    fn test_pedersen_hiding() {
        let ctx = ctx();
        let a = Opening::random(&ctx, 1000, &mut OsRng);
        let b = Opening::random(&ctx, 1000, &mut OsRng);

        // Same value, different randomness -> different commitments
        assert_ne!(a.commit(&ctx), b.commit(&ctx));
    }

    #[test]
    fn test_pedersen_homomorphic() {
        let ctx = ctx();
        let r1 = ctx.random_scalar(&mut OsRng);
        let r2 = ctx.random_scalar(&mut OsRng);

        let c1 = pedersen_commit(&ctx, &fr(100), &r1);
        let c2 = pedersen_commit(&ctx, &fr(200), &r2);

        assert_eq!(
            pedersen_add(&c1, &c2),
            pedersen_commit(&ctx, &fr(300), &(r1 + r2))
        );
        assert_eq!(
            pedersen_sub(&c2, &c1),
            pedersen_commit(&ctx, &fr(100), &(r2 - r1))
        );
    }

    #[test]
    fn test_small_homomorphic_example() {
        let ctx = ctx();
        let sum = pedersen_add(
            &pedersen_commit(&ctx, &fr(3), &fr(7)),
            &pedersen_commit(&ctx, &fr(4), &fr(2)),
        );
        assert_eq!(sum, pedersen_commit(&ctx, &fr(7), &fr(9)));
    }

    #[test]
    fn test_negated_commitment() {
        let ctx = ctx();
        let r = ctx.random_scalar(&mut OsRng);
        let x = fr(4500);

        let negated = pedersen_commit_negated(&ctx, &x, &r);
        assert_eq!(negated, pedersen_commit(&ctx, &-x, &r));
        assert_ne!(negated, pedersen_commit(&ctx, &x, &r));

        // x·G + (−x)·G cancels
        let sum = pedersen_add(&pedersen_commit(&ctx, &x, &fr(0)), &negated);
        assert_eq!(sum, pedersen_commit(&ctx, &fr(0), &r));
    }

    #[test]
    fn test_two_bids_cross_verification() {
        let ctx = ctx();
        let alice = Opening::new(2000, fr(100));
        let bob = Opening::new(4500, fr(100));

        let c_alice = alice.commit(&ctx);
        let c_bob = bob.commit(&ctx);

        assert!(alice.verify(&ctx, &c_alice));
        assert!(bob.verify(&ctx, &c_bob));
        assert!(!alice.verify(&ctx, &c_bob));
        assert!(!bob.verify(&ctx, &c_alice));
    }

    #[test]
    fn test_zero_commitment_is_identity() {
        let ctx = ctx();
        let c = pedersen_commit(&ctx, &fr(0), &fr(0));
        assert!(c.is_zero());
        assert_eq!(encode_point(&c), auction_types::G1Point::IDENTITY);
    }

    #[test]
    fn test_verify_encoded() {
        let ctx = ctx();
        let opening = Opening::new(2000, fr(100));
        let commitment = opening.commitment(&ctx);

        assert_eq!(
            pedersen_verify_encoded(&ctx, &commitment, 2000, &TypesScalar::from_u64(100)),
            Ok(true)
        );
        assert_eq!(
            pedersen_verify_encoded(&ctx, &commitment, 2001, &TypesScalar::from_u64(100)),
            Ok(false)
        );

        let off_curve = PedersenCommitment {
            point: point_from_decimal("1", "3").unwrap(),
        };
        assert_eq!(
            pedersen_verify_encoded(&ctx, &off_curve, 2000, &TypesScalar::from_u64(100)),
            Err(CryptoError::InvalidPoint)
        );

        let oversized = TypesScalar([0xff; 32]);
        assert!(matches!(
            pedersen_verify_encoded(&ctx, &commitment, 2000, &oversized),
            Err(CryptoError::DomainRange(_))
        ));
    }

    #[test]
    fn test_add_encoded_rejects_off_curve() {
        let ctx = ctx();
        let c = Opening::new(5, fr(9)).commitment(&ctx);
        let bad = point_from_decimal("1", "3").unwrap();

        assert_eq!(
            pedersen_add_encoded(&c.point, &bad),
            Err(CryptoError::InvalidPoint)
        );
        assert_eq!(
            pedersen_add_encoded(&c.point, &auction_types::G1Point::IDENTITY),
            Ok(c.point)
        );
    }
}
