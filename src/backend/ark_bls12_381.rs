//! Arkworks-backed driver for BLS12-381.
//!
//! Provides [`ArkBls12`] with the wrapped group types [`ArkG1`], [`ArkG2`]
//! and [`ArkGt`]. `ark-bls12-381` serializes points in the ZCash format, so
//! every encoding here matches the blstrs driver byte for byte. Hashing to
//! the groups follows the `XMD:SHA-256_SSWU_RO_` suites.
//!
//! # Feature
//!
//! Compiled when the Cargo feature `ark_bls12381` is enabled.

use std::sync::OnceLock;

use ark_bls12_381::{
    g1, g2, Bls12_381, Fr as BlsFr, G1Affine as RawG1Affine, G1Projective as RawG1,
    G2Affine as RawG2Affine, G2Projective as RawG2,
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

impl FieldElement for BlsFr {
    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn from_u64(value: u64) -> Self {
        BlsFr::from(value)
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
pub struct ArkG1(pub RawG1);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArkG2(pub RawG2);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArkGt(pub PairingOutput<Bls12_381>);

type G1Hasher = MapToCurveBasedHasher<RawG1, DefaultFieldHasher<Sha256, 128>, WBMap<g1::Config>>;
type G2Hasher = MapToCurveBasedHasher<RawG2, DefaultFieldHasher<Sha256, 128>, WBMap<g2::Config>>;

impl CurvePoint<BlsFr> for ArkG1 {
    const UNCOMPRESSED_BYTES: usize = 2 * FP_BYTES;
    const COMPRESSED_BYTES: usize = FP_BYTES;

    fn identity() -> Self {
        ArkG1(RawG1::zero())
    }

    fn generator() -> Self {
        ArkG1(RawG1::generator())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        ArkG1(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        ArkG1(self.0 - other.0)
    }

    fn negate(&self) -> Self {
        ArkG1(-self.0)
    }

    fn double(&self) -> Self {
        ArkG1(AdditiveGroup::double(&self.0))
    }

    fn mul_scalar(&self, scalar: &BlsFr) -> Self {
        ArkG1(self.0 * scalar)
    }

    fn multi_scalar_multiplication(points: &[Self], scalars: &[BlsFr]) -> Result<Self, BackendError> {
        if points.len() != scalars.len() {
            return Err(BackendError::Math("msm length mismatch"));
        }
        let projectives: Vec<RawG1> = points.iter().map(|p| p.0).collect();
        let affines = RawG1::normalize_batch(&projectives);
        RawG1::msm(&affines, scalars)
            .map(ArkG1)
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
        RawG1Affine::deserialize_uncompressed(bytes)
            .map(|p| ArkG1(p.into_group()))
            .map_err(|_| BackendError::Decoding("invalid g1 point"))
    }

    fn from_compressed(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("compressed g1", bytes, Self::COMPRESSED_BYTES)?;
        RawG1Affine::deserialize_compressed(bytes)
            .map(|p| ArkG1(p.into_group()))
            .map_err(|_| BackendError::Decoding("invalid compressed g1 point"))
    }

    fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self, BackendError> {
        if dst.is_empty() {
            return Err(BackendError::HashToGroup("empty domain separation tag"));
        }
        let hasher =
            G1Hasher::new(dst).map_err(|_| BackendError::HashToGroup("invalid domain separation tag"))?;
        let point = hasher
            .hash(msg)
            .map_err(|_| BackendError::HashToGroup("map to curve failed"))?;
        if point.is_zero() {
            return Err(BackendError::HashToGroup("hashed to the identity"));
        }
        Ok(ArkG1(point.into_group()))
    }
}

impl CurvePoint<BlsFr> for ArkG2 {
    const UNCOMPRESSED_BYTES: usize = 4 * FP_BYTES;
    const COMPRESSED_BYTES: usize = 2 * FP_BYTES;

    fn identity() -> Self {
        ArkG2(RawG2::zero())
    }

    fn generator() -> Self {
        ArkG2(RawG2::generator())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        ArkG2(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        ArkG2(self.0 - other.0)
    }

    fn negate(&self) -> Self {
        ArkG2(-self.0)
    }

    fn double(&self) -> Self {
        ArkG2(AdditiveGroup::double(&self.0))
    }

    fn mul_scalar(&self, scalar: &BlsFr) -> Self {
        ArkG2(self.0 * scalar)
    }

    fn multi_scalar_multiplication(points: &[Self], scalars: &[BlsFr]) -> Result<Self, BackendError> {
        if points.len() != scalars.len() {
            return Err(BackendError::Math("msm length mismatch"));
        }
        let projectives: Vec<RawG2> = points.iter().map(|p| p.0).collect();
        let affines = RawG2::normalize_batch(&projectives);
        RawG2::msm(&affines, scalars)
            .map(ArkG2)
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
        RawG2Affine::deserialize_uncompressed(bytes)
            .map(|p| ArkG2(p.into_group()))
            .map_err(|_| BackendError::Decoding("invalid g2 point"))
    }

    fn from_compressed(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("compressed g2", bytes, Self::COMPRESSED_BYTES)?;
        RawG2Affine::deserialize_compressed(bytes)
            .map(|p| ArkG2(p.into_group()))
            .map_err(|_| BackendError::Decoding("invalid compressed g2 point"))
    }

    fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self, BackendError> {
        if dst.is_empty() {
            return Err(BackendError::HashToGroup("empty domain separation tag"));
        }
        let hasher =
            G2Hasher::new(dst).map_err(|_| BackendError::HashToGroup("invalid domain separation tag"))?;
        let point = hasher
            .hash(msg)
            .map_err(|_| BackendError::HashToGroup("map to curve failed"))?;
        if point.is_zero() {
            return Err(BackendError::HashToGroup("hashed to the identity"));
        }
        Ok(ArkG2(point.into_group()))
    }
}

impl TargetGroup for ArkGt {
    type Scalar = BlsFr;

    const BYTES: usize = 12 * FP_BYTES;

    fn identity() -> Self {
        ArkGt(PairingOutput::zero())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn combine(&self, other: &Self) -> Self {
        ArkGt(self.0 + other.0)
    }

    fn invert(&self) -> Self {
        ArkGt(-self.0)
    }

    fn mul_scalar(&self, scalar: &BlsFr) -> Self {
        ArkGt(self.0 * scalar)
    }

    fn to_bytes(&self) -> Vec<u8> {
        target_to_bytes(&self.0, FP_BYTES)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        target_from_bytes(bytes, FP_BYTES).map(ArkGt)
    }
}

/// arkworks driver for BLS12-381.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArkBls12;

impl Driver for ArkBls12 {
    type Scalar = BlsFr;
    type G1 = ArkG1;
    type G2 = ArkG2;
    type Target = ArkGt;
    type MillerLoop = MillerLoopOutput<Bls12_381>;

    const CONFIG: BackendConfig = BackendConfig::new(BackendId::Arkworks, CurveId::Bls12_381);
    const COORDINATE_BYTES: usize = FP_BYTES;

    fn order() -> &'static BigUint {
        static ORDER: OnceLock<BigUint> = OnceLock::new();
        ORDER.get_or_init(field_order::<BlsFr>)
    }

    fn miller_loop(g2: &ArkG2, g1: &ArkG1) -> Self::MillerLoop {
        Bls12_381::miller_loop(g1.0, g2.0)
    }

    fn multi_miller_loop(g2: &[ArkG2], g1: &[ArkG1]) -> Result<Self::MillerLoop, BackendError> {
        if g1.len() != g2.len() {
            return Err(BackendError::Math("pairing length mismatch"));
        }
        let lhs: Vec<RawG1> = g1.iter().map(|p| p.0).collect();
        let rhs: Vec<RawG2> = g2.iter().map(|p| p.0).collect();
        Ok(Bls12_381::multi_miller_loop(lhs, rhs))
    }

    fn combine_miller_loops(a: &Self::MillerLoop, b: &Self::MillerLoop) -> Self::MillerLoop {
        MillerLoopOutput(a.0 * b.0)
    }

    fn final_exponentiation(f: &Self::MillerLoop) -> Result<ArkGt, BackendError> {
        Bls12_381::final_exponentiation(*f)
            .map(ArkGt)
            .ok_or(BackendError::Math("final exponentiation of zero"))
    }

    fn miller_loop2(p2a: &ArkG2, p1a: &ArkG1, p2b: &ArkG2, p1b: &ArkG1) -> Self::MillerLoop {
        Bls12_381::multi_miller_loop([p1a.0, p1b.0], [p2a.0, p2b.0])
    }
}
