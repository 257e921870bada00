//! Arkworks-backed driver for BN254.
//!
//! Provides [`ArkBn254`] with the wrapped group types [`ArkBnG1`],
//! [`ArkBnG2`] and [`ArkBnGt`]. Points use the arkworks canonical
//! serialization (little-endian coordinates, flags in the top bits of the
//! last byte). Hashing to the groups is a SHA-256 try-and-increment map
//! followed by cofactor clearing.
//!
//! # Feature
//!
//! Compiled when the Cargo feature `ark_bn254` is enabled.

use std::sync::OnceLock;

use ark_bn254::{
    g1, g2, Bn254, Fq, Fq2, Fr as BnFr, G1Affine as BnG1Affine, G1Projective as BnG1,
    G2Affine as BnG2Affine, G2Projective as BnG2,
};
use ark_ec::{
    pairing::{MillerLoopOutput, Pairing, PairingOutput},
    scalar_mul::variable_base::VariableBaseMSM,
    AffineRepr, CurveGroup, PrimeGroup,
};
use ark_ff::{AdditiveGroup, PrimeField};
use ark_serialize::CanonicalDeserialize;
use ark_std::{One, Zero};
use num_bigint::BigUint;

use crate::backend::{
    expect_len, field_order, hash_to_base, scalar_from_be_bytes, scalar_to_be_bytes, serialize,
    target_from_bytes, target_to_bytes, try_and_increment, CurvePoint, Driver, FieldElement,
    TargetGroup,
};
use crate::config::{BackendConfig, BackendId, CurveId};
use crate::errors::BackendError;

const FP_BYTES: usize = 32;

impl FieldElement for BnFr {
    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn from_u64(value: u64) -> Self {
        BnFr::from(value)
    }

    fn negate(&self) -> Self {
        -*self
    }

    fn to_be_bytes(&self) -> [u8; 32] {
        scalar_to_be_bytes(self)
    }

    fn from_be_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        scalar_from_be_bytes(bytes)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArkBnG1(pub BnG1);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArkBnG2(pub BnG2);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArkBnGt(pub PairingOutput<Bn254>);

fn hash_to_g1(msg: &[u8], dst: &[u8]) -> Result<BnG1Affine, BackendError> {
    try_and_increment::<g1::Config>("bn254 g1", |counter| {
        hash_to_base::<Fq>(msg, dst, counter, 0)
    })
}

fn hash_to_g2(msg: &[u8], dst: &[u8]) -> Result<BnG2Affine, BackendError> {
    try_and_increment::<g2::Config>("bn254 g2", |counter| {
        let (c0, greatest) = hash_to_base::<Fq>(msg, dst, counter, 1);
        let (c1, _) = hash_to_base::<Fq>(msg, dst, counter, 2);
        (Fq2::new(c0, c1), greatest)
    })
}

impl CurvePoint<BnFr> for ArkBnG1 {
    const UNCOMPRESSED_BYTES: usize = 2 * FP_BYTES;
    const COMPRESSED_BYTES: usize = FP_BYTES;

    fn identity() -> Self {
        ArkBnG1(BnG1::zero())
    }

    fn generator() -> Self {
        ArkBnG1(BnG1::generator())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        ArkBnG1(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        ArkBnG1(self.0 - other.0)
    }

    fn negate(&self) -> Self {
        ArkBnG1(-self.0)
    }

    fn double(&self) -> Self {
        ArkBnG1(AdditiveGroup::double(&self.0))
    }

    fn mul_scalar(&self, scalar: &BnFr) -> Self {
        ArkBnG1(self.0 * scalar)
    }

    fn multi_scalar_multiplication(points: &[Self], scalars: &[BnFr]) -> Result<Self, BackendError> {
        if points.len() != scalars.len() {
            return Err(BackendError::Math("msm length mismatch"));
        }
        let projectives: Vec<BnG1> = points.iter().map(|p| p.0).collect();
        let affines = BnG1::normalize_batch(&projectives);
        BnG1::msm(&affines, scalars)
            .map(ArkBnG1)
            .map_err(|_| BackendError::Math("msm length mismatch"))
    }

    fn to_uncompressed(&self) -> Vec<u8> {
        serialize(&self.0.into_affine(), false)
    }

    fn to_compressed(&self) -> Vec<u8> {
        serialize(&self.0.into_affine(), true)
    }

    fn from_uncompressed(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("g1", bytes, Self::UNCOMPRESSED_BYTES)?;
        BnG1Affine::deserialize_uncompressed(bytes)
            .map(|p| ArkBnG1(p.into_group()))
            .map_err(|_| BackendError::Decoding("invalid g1 point"))
    }

    fn from_compressed(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("compressed g1", bytes, Self::COMPRESSED_BYTES)?;
        BnG1Affine::deserialize_compressed(bytes)
            .map(|p| ArkBnG1(p.into_group()))
            .map_err(|_| BackendError::Decoding("invalid compressed g1 point"))
    }

    fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self, BackendError> {
        if dst.is_empty() {
            return Err(BackendError::HashToGroup("empty domain separation tag"));
        }
        hash_to_g1(msg, dst).map(|p| ArkBnG1(p.into_group()))
    }
}

impl CurvePoint<BnFr> for ArkBnG2 {
    const UNCOMPRESSED_BYTES: usize = 4 * FP_BYTES;
    const COMPRESSED_BYTES: usize = 2 * FP_BYTES;

    fn identity() -> Self {
        ArkBnG2(BnG2::zero())
    }

    fn generator() -> Self {
        ArkBnG2(BnG2::generator())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        ArkBnG2(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        ArkBnG2(self.0 - other.0)
    }

    fn negate(&self) -> Self {
        ArkBnG2(-self.0)
    }

    fn double(&self) -> Self {
        ArkBnG2(AdditiveGroup::double(&self.0))
    }

    fn mul_scalar(&self, scalar: &BnFr) -> Self {
        ArkBnG2(self.0 * scalar)
    }

    fn multi_scalar_multiplication(points: &[Self], scalars: &[BnFr]) -> Result<Self, BackendError> {
        if points.len() != scalars.len() {
            return Err(BackendError::Math("msm length mismatch"));
        }
        let projectives: Vec<BnG2> = points.iter().map(|p| p.0).collect();
        let affines = BnG2::normalize_batch(&projectives);
        BnG2::msm(&affines, scalars)
            .map(ArkBnG2)
            .map_err(|_| BackendError::Math("msm length mismatch"))
    }

    fn to_uncompressed(&self) -> Vec<u8> {
        serialize(&self.0.into_affine(), false)
    }

    fn to_compressed(&self) -> Vec<u8> {
        serialize(&self.0.into_affine(), true)
    }

    fn from_uncompressed(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("g2", bytes, Self::UNCOMPRESSED_BYTES)?;
        BnG2Affine::deserialize_uncompressed(bytes)
            .map(|p| ArkBnG2(p.into_group()))
            .map_err(|_| BackendError::Decoding("invalid g2 point"))
    }

    fn from_compressed(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("compressed g2", bytes, Self::COMPRESSED_BYTES)?;
        BnG2Affine::deserialize_compressed(bytes)
            .map(|p| ArkBnG2(p.into_group()))
            .map_err(|_| BackendError::Decoding("invalid compressed g2 point"))
    }

    fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self, BackendError> {
        if dst.is_empty() {
            return Err(BackendError::HashToGroup("empty domain separation tag"));
        }
        hash_to_g2(msg, dst).map(|p| ArkBnG2(p.into_group()))
    }
}

impl TargetGroup for ArkBnGt {
    type Scalar = BnFr;

    const BYTES: usize = 12 * FP_BYTES;

    fn identity() -> Self {
        ArkBnGt(PairingOutput::zero())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn combine(&self, other: &Self) -> Self {
        ArkBnGt(self.0 + other.0)
    }

    fn invert(&self) -> Self {
        ArkBnGt(-self.0)
    }

    fn mul_scalar(&self, scalar: &BnFr) -> Self {
        ArkBnGt(self.0 * scalar)
    }

    fn to_bytes(&self) -> Vec<u8> {
        target_to_bytes(&self.0, FP_BYTES)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        target_from_bytes(bytes, FP_BYTES).map(ArkBnGt)
    }
}

/// arkworks driver for BN254.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArkBn254;

impl Driver for ArkBn254 {
    type Scalar = BnFr;
    type G1 = ArkBnG1;
    type G2 = ArkBnG2;
    type Target = ArkBnGt;
    type MillerLoop = MillerLoopOutput<Bn254>;

    const CONFIG: BackendConfig = BackendConfig::new(BackendId::Arkworks, CurveId::Bn254);
    const COORDINATE_BYTES: usize = FP_BYTES;

    fn order() -> &'static BigUint {
        static ORDER: OnceLock<BigUint> = OnceLock::new();
        ORDER.get_or_init(field_order::<BnFr>)
    }

    fn miller_loop(g2: &ArkBnG2, g1: &ArkBnG1) -> Self::MillerLoop {
        Bn254::miller_loop(g1.0, g2.0)
    }

    fn multi_miller_loop(g2: &[ArkBnG2], g1: &[ArkBnG1]) -> Result<Self::MillerLoop, BackendError> {
        if g1.len() != g2.len() {
            return Err(BackendError::Math("pairing length mismatch"));
        }
        let lhs: Vec<BnG1> = g1.iter().map(|p| p.0).collect();
        let rhs: Vec<BnG2> = g2.iter().map(|p| p.0).collect();
        Ok(Bn254::multi_miller_loop(lhs, rhs))
    }

    fn combine_miller_loops(a: &Self::MillerLoop, b: &Self::MillerLoop) -> Self::MillerLoop {
        MillerLoopOutput(a.0 * b.0)
    }

    fn final_exponentiation(f: &Self::MillerLoop) -> Result<ArkBnGt, BackendError> {
        Bn254::final_exponentiation(*f)
            .map(ArkBnGt)
            .ok_or(BackendError::Math("final exponentiation of zero"))
    }

    fn miller_loop2(p2a: &ArkBnG2, p1a: &ArkBnG1, p2b: &ArkBnG2, p1b: &ArkBnG1) -> Self::MillerLoop {
        Bn254::multi_miller_loop([p1a.0, p1b.0], [p2a.0, p2b.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_points_are_in_the_subgroup() {
        let order = <BnFr as PrimeField>::MODULUS;
        for msg in [&b""[..], b"abc", b"a longer message for the bn254 map"] {
            let g1 = ArkBnG1::hash_to_curve(msg, b"BN254G1_TEST").unwrap();
            let g2 = ArkBnG2::hash_to_curve(msg, b"BN254G2_TEST").unwrap();
            assert!(!g1.is_identity());
            assert!(!g2.is_identity());
            assert!(g1.0.mul_bigint(order).is_zero());
            assert!(g2.0.mul_bigint(order).is_zero());
        }
    }

    #[test]
    fn hashing_separates_domains() {
        let a = ArkBnG1::hash_to_curve(b"msg", b"DOMAIN_A").unwrap();
        let b = ArkBnG1::hash_to_curve(b"msg", b"DOMAIN_B").unwrap();
        let again = ArkBnG1::hash_to_curve(b"msg", b"DOMAIN_A").unwrap();
        assert_ne!(a, b);
        assert_eq!(a, again);
    }

    #[test]
    fn sizes_follow_the_field() {
        assert_eq!(ArkBnG1::generator().to_compressed().len(), ArkBnG1::COMPRESSED_BYTES);
        assert_eq!(ArkBnG1::generator().to_uncompressed().len(), ArkBnG1::UNCOMPRESSED_BYTES);
        assert_eq!(ArkBnG2::generator().to_compressed().len(), ArkBnG2::COMPRESSED_BYTES);
        assert_eq!(ArkBnG2::generator().to_uncompressed().len(), ArkBnG2::UNCOMPRESSED_BYTES);
        assert_eq!(ArkBnGt::identity().to_bytes().len(), ArkBnGt::BYTES);
    }
}
