//! BN254 (alt_bn128) G1 domain and the commitment generators.
//!
//! A [`CurveContext`] is built once from a [`CurveDescriptor`] and passed
//! explicitly to every commitment operation. Construction checks the
//! descriptor against the curve this crate implements, so a context that
//! exists is always usable.

use ark_bn254::{Fq, Fr, G1Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInt, BigInteger, PrimeField, UniformRand, Zero};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use auction_types::{CurveDescriptor, G1Point, Scalar as TypesScalar};

use crate::error::CryptoError;

/// Base field modulus p.
pub const FIELD_MODULUS: &str =
    "21888242871839275222246405745257275088696311157297823662689037894645226208583";

/// Order n of the G1 group (the scalar field modulus).
pub const GROUP_ORDER: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

pub const COEFF_A: u64 = 0;
pub const COEFF_B: u64 = 3;

/// Value generator G.
pub const G_X: &str =
    "19823850254741169819033785099293761935467223354323761392354670518001715552183";
pub const G_Y: &str =
    "15097907474011103550430959168661954736283086276546887690628027914974507414020";

/// Blinding generator H.
pub const H_X: &str =
    "3184834430741071145030522771540763108892281233703148152311693391954704539228";
pub const H_Y: &str =
    "1405615944858121891163559530323310827496899969303520166098610312148921359100";

/// Validated curve parameters and generators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveContext {
    g: G1Affine,
    h: G1Affine,
    descriptor: CurveDescriptor,
}

impl CurveContext {
    /// Build a context from a descriptor.
    ///
    /// Fails with [`CryptoError::UnsupportedCurve`] if p, a, b or n differ
    /// from BN254, and with [`CryptoError::InconsistentParameters`] if the
    /// generators are the identity, coincide, or are not of order n.
    pub fn new(descriptor: &CurveDescriptor) -> Result<Self, CryptoError> {
        if descriptor.field_modulus != bigint_to_be(&Fq::MODULUS) {
            return Err(CryptoError::UnsupportedCurve("field modulus"));
        }
        if descriptor.group_order != bigint_to_be(&Fr::MODULUS) {
            return Err(CryptoError::UnsupportedCurve("group order"));
        }
        if descriptor.coeff_a != u64_word(COEFF_A) || descriptor.coeff_b != u64_word(COEFF_B) {
            return Err(CryptoError::UnsupportedCurve("curve coefficients"));
        }

        let g = decode_point(&descriptor.g)?;
        let h = decode_point(&descriptor.h)?;

        if g.is_zero() || h.is_zero() {
            return Err(CryptoError::InconsistentParameters("generator is the identity"));
        }
        if g == h {
            return Err(CryptoError::InconsistentParameters("generators coincide"));
        }
        for generator in [g, h] {
            if !generator.mul_bigint(Fr::MODULUS).is_zero() {
                return Err(CryptoError::InconsistentParameters(
                    "generator order does not divide n",
                ));
            }
        }

        Ok(Self {
            g,
            h,
            descriptor: descriptor.clone(),
        })
    }

    /// The canonical BN254 context with the fixed generators.
    pub fn bn128() -> Result<Self, CryptoError> {
        Self::new(&bn128_descriptor()?)
    }

    pub fn g(&self) -> G1Affine {
        self.g
    }

    pub fn h(&self) -> G1Affine {
        self.h
    }

    pub fn descriptor(&self) -> &CurveDescriptor {
        &self.descriptor
    }

    /// Uniformly random scalar in [0, n).
    pub fn random_scalar<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Fr {
        Fr::rand(rng)
    }
}

/// The descriptor of the canonical parameter set.
pub fn bn128_descriptor() -> Result<CurveDescriptor, CryptoError> {
    Ok(CurveDescriptor {
        field_modulus: decimal_word(FIELD_MODULUS)?,
        coeff_a: u64_word(COEFF_A),
        coeff_b: u64_word(COEFF_B),
        group_order: decimal_word(GROUP_ORDER)?,
        g: point_from_decimal(G_X, G_Y)?,
        h: point_from_decimal(H_X, H_Y)?,
    })
}

// =========================
// POINT ENCODING
// =========================

/// Decode a wire point, rejecting anything that is not on the curve.
pub fn decode_point(point: &G1Point) -> Result<G1Affine, CryptoError> {
    if point.is_identity() {
        return Ok(G1Affine::zero());
    }

    let x = field_from_be::<Fq>(&point.x()).ok_or(CryptoError::InvalidPoint)?;
    let y = field_from_be::<Fq>(&point.y()).ok_or(CryptoError::InvalidPoint)?;

    let decoded = G1Affine::new_unchecked(x, y);
    if !decoded.is_on_curve() || !decoded.is_in_correct_subgroup_assuming_on_curve() {
        return Err(CryptoError::InvalidPoint);
    }

    Ok(decoded)
}

/// Encode a point as big-endian `x‖y`; the identity encodes as all zeros.
pub fn encode_point(point: &G1Affine) -> G1Point {
    if point.is_zero() {
        return G1Point::IDENTITY;
    }
    G1Point::from_coordinates(field_to_be(&point.x), field_to_be(&point.y))
}

/// Parse affine coordinates given in decimal.
///
/// Only checks that each coordinate fits in 256 bits; curve membership is
/// checked by [`decode_point`].
pub fn point_from_decimal(x: &str, y: &str) -> Result<G1Point, CryptoError> {
    let x = decimal_word(x).map_err(|_| CryptoError::InvalidPoint)?;
    let y = decimal_word(y).map_err(|_| CryptoError::InvalidPoint)?;
    Ok(G1Point::from_coordinates(x, y))
}

/// Render a wire point as decimal affine coordinates.
pub fn point_to_decimal(point: &G1Point) -> (String, String) {
    (
        BigUint::from_bytes_be(&point.x()).to_str_radix(10),
        BigUint::from_bytes_be(&point.y()).to_str_radix(10),
    )
}

// =========================
// SCALAR ENCODING
// =========================

/// Decode a wire scalar. Values ≥ n are rejected rather than reduced.
pub fn decode_scalar(scalar: &TypesScalar) -> Result<Fr, CryptoError> {
    field_from_be::<Fr>(&scalar.0).ok_or_else(|| {
        CryptoError::DomainRange(format!(
            "scalar {} is not below the group order",
            BigUint::from_bytes_be(&scalar.0)
        ))
    })
}

pub fn encode_scalar(scalar: &Fr) -> TypesScalar {
    TypesScalar(field_to_be(scalar))
}

/// Parse a decimal scalar, rejecting values ≥ n.
pub fn parse_scalar(decimal: &str) -> Result<Fr, CryptoError> {
    let word = decimal_word(decimal)?;
    decode_scalar(&TypesScalar(word))
}

pub fn scalar_to_decimal(scalar: &Fr) -> String {
    BigUint::from_bytes_be(&field_to_be(scalar)).to_str_radix(10)
}

// =========================
// HELPERS
// =========================

fn decimal_word(decimal: &str) -> Result<[u8; 32], CryptoError> {
    let value = BigUint::parse_bytes(decimal.trim().as_bytes(), 10)
        .ok_or_else(|| CryptoError::InvalidScalar(decimal.to_string()))?;
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return Err(CryptoError::DomainRange(format!("{decimal} exceeds 256 bits")));
    }
    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(word)
}

fn u64_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

fn bigint_from_be(bytes: &[u8; 32]) -> BigInt<4> {
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.rchunks_exact(8)) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *limb = u64::from_be_bytes(buf);
    }
    BigInt::new(limbs)
}

fn bigint_to_be(value: &BigInt<4>) -> [u8; 32] {
    let bytes = value.to_bytes_be();
    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(&bytes);
    word
}

fn field_from_be<F: PrimeField<BigInt = BigInt<4>>>(bytes: &[u8; 32]) -> Option<F> {
    F::from_bigint(bigint_from_be(bytes))
}

fn field_to_be<F: PrimeField<BigInt = BigInt<4>>>(value: &F) -> [u8; 32] {
    bigint_to_be(&value.into_bigint())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_bn128_context_builds() {
        let ctx = CurveContext::bn128().unwrap();
        assert!(ctx.g().is_on_curve());
        assert!(ctx.h().is_on_curve());
        assert_ne!(ctx.g(), ctx.h());
    }

    #[test]
    fn test_descriptor_constants() {
        let descriptor = bn128_descriptor().unwrap();
        assert_eq!(
            BigUint::from_bytes_be(&descriptor.field_modulus).to_str_radix(10),
            FIELD_MODULUS
        );
        assert_eq!(
            BigUint::from_bytes_be(&descriptor.group_order).to_str_radix(10),
            GROUP_ORDER
        );
        assert_eq!(point_to_decimal(&descriptor.g), (G_X.to_string(), G_Y.to_string()));
        assert_eq!(point_to_decimal(&descriptor.h), (H_X.to_string(), H_Y.to_string()));
    }

    #[test]
    fn test_wrong_modulus_rejected() {
        let mut descriptor = bn128_descriptor().unwrap();
        descriptor.field_modulus[31] ^= 1;
        assert_eq!(
            CurveContext::new(&descriptor),
            Err(CryptoError::UnsupportedCurve("field modulus"))
        );
    }

    #[test]
    fn test_wrong_coefficient_rejected() {
        let mut descriptor = bn128_descriptor().unwrap();
        descriptor.coeff_b = u64_word(7);
        assert_eq!(
            CurveContext::new(&descriptor),
            Err(CryptoError::UnsupportedCurve("curve coefficients"))
        );
    }

    #[test]
    fn test_degenerate_generators_rejected() {
        let mut descriptor = bn128_descriptor().unwrap();
        descriptor.h = descriptor.g;
        assert_eq!(
            CurveContext::new(&descriptor),
            Err(CryptoError::InconsistentParameters("generators coincide"))
        );

        descriptor.h = G1Point::IDENTITY;
        assert_eq!(
            CurveContext::new(&descriptor),
            Err(CryptoError::InconsistentParameters("generator is the identity"))
        );
    }

    #[test]
    fn test_off_curve_generator_rejected() {
        let mut descriptor = bn128_descriptor().unwrap();
        descriptor.h = point_from_decimal("1", "1").unwrap();
        assert_eq!(CurveContext::new(&descriptor), Err(CryptoError::InvalidPoint));
    }

    #[test]
    fn test_point_encoding() {
        let ctx = CurveContext::bn128().unwrap();
        let encoded = encode_point(&ctx.g());
        assert_eq!(encoded, ctx.descriptor().g);
        assert_eq!(decode_point(&encoded).unwrap(), ctx.g());

        assert_eq!(encode_point(&G1Affine::zero()), G1Point::IDENTITY);
        assert!(decode_point(&G1Point::IDENTITY).unwrap().is_zero());
    }

    #[test]
    fn test_off_curve_point_rejected() {
        // (1, 2) is the standard generator, (1, 3) is not on y² = x³ + 3
        assert!(decode_point(&point_from_decimal("1", "2").unwrap()).is_ok());
        assert_eq!(
            decode_point(&point_from_decimal("1", "3").unwrap()),
            Err(CryptoError::InvalidPoint)
        );

        // Coordinate not reduced mod p
        let p_plus_one = point_from_decimal(
            "21888242871839275222246405745257275088696311157297823662689037894645226208584",
            "2",
        )
        .unwrap();
        assert_eq!(decode_point(&p_plus_one), Err(CryptoError::InvalidPoint));
    }

    #[test]
    fn test_scalar_range() {
        assert!(matches!(
            parse_scalar(GROUP_ORDER),
            Err(CryptoError::DomainRange(_))
        ));

        let below = parse_scalar(
            "21888242871839275222246405745257275088548364400416034343698204186575808495616",
        )
        .unwrap();
        assert_eq!(below, -Fr::from(1u64));

        assert!(matches!(
            parse_scalar("not a number"),
            Err(CryptoError::InvalidScalar(_))
        ));
    }

    #[test]
    fn test_scalar_encoding() {
        let ctx = CurveContext::bn128().unwrap();
        let s = ctx.random_scalar(&mut OsRng);
        assert_eq!(decode_scalar(&encode_scalar(&s)).unwrap(), s);
        assert_eq!(parse_scalar(&scalar_to_decimal(&s)).unwrap(), s);

        assert_eq!(encode_scalar(&Fr::from(100u64)), TypesScalar::from_u64(100));
    }
}
