//! Arkworks-backed driver for BLS12-377.
//!
//! Provides [`ArkBls377`] with the wrapped group types [`Ark377G1`],
//! [`Ark377G2`] and [`Ark377Gt`]. Points use the arkworks canonical
//! serialization. Hashing to the groups follows the `XMD:SHA-256_SSWU_RO_`
//! suites through the isogeny maps shipped with `ark-bls12-377`.
//!
//! # Feature
//!
//! Compiled when the Cargo feature `ark_bls12377` is enabled.

use std::sync::OnceLock;

use ark_bls12_377::{
    g1, g2, Bls12_377, Fr as Bls377Fr, G1Affine as Raw377G1Affine, G1Projective as Raw377G1,
    G2Affine as Raw377G2Affine, G2Projective as Raw377G2,
};
use ark_ec::{
    hashing::{curve_maps::wb::WBMap, map_to_curve_hasher::MapToCurveBasedHasher, HashToCurve},
    pairing::{MillerLoopOutput, Pairing, PairingOutput},
    scalar_mul::variable_base::VariableBaseMSM,
    AffineRepr, CurveGroup, PrimeGroup,
};
use ark_ff::{field_hashers::DefaultFieldHasher, AdditiveGroup};
use ark_serialize::CanonicalDeserialize;
use ark_std::{One, Zero};
use num_bigint::BigUint;
use sha2::Sha256;

use crate::backend::{
    expect_len, field_order, scalar_from_be_bytes, scalar_to_be_bytes, serialize,
    target_from_bytes, target_to_bytes, CurvePoint, Driver, FieldElement, TargetGroup,
};
use crate::config::{BackendConfig, BackendId, CurveId};
use crate::errors::BackendError;

const FP_BYTES: usize = 48;

impl FieldElement for Bls377Fr {
    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn from_u64(value: u64) -> Self {
        Bls377Fr::from(value)
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
pub struct Ark377G1(pub Raw377G1);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ark377G2(pub Raw377G2);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ark377Gt(pub PairingOutput<Bls12_377>);

type G1Hasher =
    MapToCurveBasedHasher<Raw377G1, DefaultFieldHasher<Sha256, 128>, WBMap<g1::Config>>;
type G2Hasher =
    MapToCurveBasedHasher<Raw377G2, DefaultFieldHasher<Sha256, 128>, WBMap<g2::Config>>;

impl CurvePoint<Bls377Fr> for Ark377G1 {
    const UNCOMPRESSED_BYTES: usize = 2 * FP_BYTES;
    const COMPRESSED_BYTES: usize = FP_BYTES;

    fn identity() -> Self {
        Ark377G1(Raw377G1::zero())
    }

    fn generator() -> Self {
        Ark377G1(Raw377G1::generator())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        Ark377G1(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        Ark377G1(self.0 - other.0)
    }

    fn negate(&self) -> Self {
        Ark377G1(-self.0)
    }

    fn double(&self) -> Self {
        Ark377G1(AdditiveGroup::double(&self.0))
    }

    fn mul_scalar(&self, scalar: &Bls377Fr) -> Self {
        Ark377G1(self.0 * scalar)
    }

    fn multi_scalar_multiplication(
        points: &[Self],
        scalars: &[Bls377Fr],
    ) -> Result<Self, BackendError> {
        if points.len() != scalars.len() {
            return Err(BackendError::Math("msm length mismatch"));
        }
        let projectives: Vec<Raw377G1> = points.iter().map(|p| p.0).collect();
        let affines = Raw377G1::normalize_batch(&projectives);
        Raw377G1::msm(&affines, scalars)
            .map(Ark377G1)
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
        Raw377G1Affine::deserialize_uncompressed(bytes)
            .map(|p| Ark377G1(p.into_group()))
            .map_err(|_| BackendError::Decoding("invalid g1 point"))
    }

    fn from_compressed(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("compressed g1", bytes, Self::COMPRESSED_BYTES)?;
        Raw377G1Affine::deserialize_compressed(bytes)
            .map(|p| Ark377G1(p.into_group()))
            .map_err(|_| BackendError::Decoding("invalid compressed g1 point"))
    }

    fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self, BackendError> {
        if dst.is_empty() {
            return Err(BackendError::HashToGroup("empty domain separation tag"));
        }
        let hasher = G1Hasher::new(dst)
            .map_err(|_| BackendError::HashToGroup("invalid domain separation tag"))?;
        let point = hasher
            .hash(msg)
            .map_err(|_| BackendError::HashToGroup("map to curve failed"))?;
        if point.is_zero() {
            return Err(BackendError::HashToGroup("hashed to the identity"));
        }
        Ok(Ark377G1(point.into_group()))
    }
}

impl CurvePoint<Bls377Fr> for Ark377G2 {
    const UNCOMPRESSED_BYTES: usize = 4 * FP_BYTES;
    const COMPRESSED_BYTES: usize = 2 * FP_BYTES;

    fn identity() -> Self {
        Ark377G2(Raw377G2::zero())
    }

    fn generator() -> Self {
        Ark377G2(Raw377G2::generator())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        Ark377G2(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        Ark377G2(self.0 - other.0)
    }

    fn negate(&self) -> Self {
        Ark377G2(-self.0)
    }

    fn double(&self) -> Self {
        Ark377G2(AdditiveGroup::double(&self.0))
    }

    fn mul_scalar(&self, scalar: &Bls377Fr) -> Self {
        Ark377G2(self.0 * scalar)
    }

    fn multi_scalar_multiplication(
        points: &[Self],
        scalars: &[Bls377Fr],
    ) -> Result<Self, BackendError> {
        if points.len() != scalars.len() {
            return Err(BackendError::Math("msm length mismatch"));
        }
        let projectives: Vec<Raw377G2> = points.iter().map(|p| p.0).collect();
        let affines = Raw377G2::normalize_batch(&projectives);
        Raw377G2::msm(&affines, scalars)
            .map(Ark377G2)
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
        Raw377G2Affine::deserialize_uncompressed(bytes)
            .map(|p| Ark377G2(p.into_group()))
            .map_err(|_| BackendError::Decoding("invalid g2 point"))
    }

    fn from_compressed(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("compressed g2", bytes, Self::COMPRESSED_BYTES)?;
        Raw377G2Affine::deserialize_compressed(bytes)
            .map(|p| Ark377G2(p.into_group()))
            .map_err(|_| BackendError::Decoding("invalid compressed g2 point"))
    }

    fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self, BackendError> {
        if dst.is_empty() {
            return Err(BackendError::HashToGroup("empty domain separation tag"));
        }
        let hasher = G2Hasher::new(dst)
            .map_err(|_| BackendError::HashToGroup("invalid domain separation tag"))?;
        let point = hasher
            .hash(msg)
            .map_err(|_| BackendError::HashToGroup("map to curve failed"))?;
        if point.is_zero() {
            return Err(BackendError::HashToGroup("hashed to the identity"));
        }
        Ok(Ark377G2(point.into_group()))
    }
}

impl TargetGroup for Ark377Gt {
    type Scalar = Bls377Fr;

    const BYTES: usize = 12 * FP_BYTES;

    fn identity() -> Self {
        Ark377Gt(PairingOutput::zero())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn combine(&self, other: &Self) -> Self {
        Ark377Gt(self.0 + other.0)
    }

    fn invert(&self) -> Self {
        Ark377Gt(-self.0)
    }

    fn mul_scalar(&self, scalar: &Bls377Fr) -> Self {
        Ark377Gt(self.0 * scalar)
    }

    fn to_bytes(&self) -> Vec<u8> {
        target_to_bytes(&self.0, FP_BYTES)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        target_from_bytes(bytes, FP_BYTES).map(Ark377Gt)
    }
}

/// arkworks driver for BLS12-377.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArkBls377;

impl Driver for ArkBls377 {
    type Scalar = Bls377Fr;
    type G1 = Ark377G1;
    type G2 = Ark377G2;
    type Target = Ark377Gt;
    type MillerLoop = MillerLoopOutput<Bls12_377>;

    const CONFIG: BackendConfig = BackendConfig::new(BackendId::Arkworks, CurveId::Bls12_377);
    const COORDINATE_BYTES: usize = FP_BYTES;

    fn order() -> &'static BigUint {
        static ORDER: OnceLock<BigUint> = OnceLock::new();
        ORDER.get_or_init(field_order::<Bls377Fr>)
    }

    fn miller_loop(g2: &Ark377G2, g1: &Ark377G1) -> Self::MillerLoop {
        Bls12_377::miller_loop(g1.0, g2.0)
    }

    fn multi_miller_loop(
        g2: &[Ark377G2],
        g1: &[Ark377G1],
    ) -> Result<Self::MillerLoop, BackendError> {
        if g1.len() != g2.len() {
            return Err(BackendError::Math("pairing length mismatch"));
        }
        let lhs: Vec<Raw377G1> = g1.iter().map(|p| p.0).collect();
        let rhs: Vec<Raw377G2> = g2.iter().map(|p| p.0).collect();
        Ok(Bls12_377::multi_miller_loop(lhs, rhs))
    }

    fn combine_miller_loops(a: &Self::MillerLoop, b: &Self::MillerLoop) -> Self::MillerLoop {
        MillerLoopOutput(a.0 * b.0)
    }

    fn final_exponentiation(f: &Self::MillerLoop) -> Result<Ark377Gt, BackendError> {
        Bls12_377::final_exponentiation(*f)
            .map(Ark377Gt)
            .ok_or(BackendError::Math("final exponentiation of zero"))
    }

    fn miller_loop2(
        p2a: &Ark377G2,
        p1a: &Ark377G1,
        p2b: &Ark377G2,
        p1b: &Ark377G1,
    ) -> Self::MillerLoop {
        Bls12_377::multi_miller_loop([p1a.0, p1b.0], [p2a.0, p2b.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::PrimeField;

    #[test]
    fn scalar_order_matches_modulus() {
        assert_eq!(
            ArkBls377::order().to_str_radix(16),
            "12ab655e9a2ca55660b44d1e5c37b00159aa76fed00000010a11800000000001"
        );
        assert_eq!(ArkBls377::order().bits(), 253);
    }

    #[test]
    fn sizes_follow_the_field() {
        assert_eq!(Ark377G1::generator().to_compressed().len(), Ark377G1::COMPRESSED_BYTES);
        assert_eq!(Ark377G1::generator().to_uncompressed().len(), Ark377G1::UNCOMPRESSED_BYTES);
        assert_eq!(Ark377G2::generator().to_compressed().len(), Ark377G2::COMPRESSED_BYTES);
        assert_eq!(Ark377G2::generator().to_uncompressed().len(), Ark377G2::UNCOMPRESSED_BYTES);
        assert_eq!(Ark377Gt::identity().to_bytes().len(), Ark377Gt::BYTES);
    }

    #[test]
    fn hashed_points_are_in_the_subgroup() {
        let order = <Bls377Fr as PrimeField>::MODULUS;
        for msg in [&b""[..], b"abc", b"a longer message for the bls12-377 map"] {
            let g1 = Ark377G1::hash_to_curve(msg, b"BLS12377G1_TEST").unwrap();
            let g2 = Ark377G2::hash_to_curve(msg, b"BLS12377G2_TEST").unwrap();
            assert!(!g1.is_identity());
            assert!(!g2.is_identity());
            assert!(g1.0.mul_bigint(order).is_zero());
            assert!(g2.0.mul_bigint(order).is_zero());
        }
    }

    #[test]
    fn gt_identity_round_trips() {
        let bytes = Ark377Gt::identity().to_bytes();
        assert_eq!(bytes[Ark377Gt::BYTES - 1], 1);
        assert!(Ark377Gt::from_bytes(&bytes).unwrap().is_identity());
        assert!(Ark377Gt::from_bytes(&vec![0u8; Ark377Gt::BYTES]).is_err());
    }
}
