//! blstrs-backed driver for BLS12-381.
//!
//! Provides [`BlstBls12`] together with the wrapped group types
//! [`BlstG1`], [`BlstG2`] and [`BlstGt`]. Point encodings are the ZCash
//! format produced by blstrs; target-group elements are written as the
//! twelve Fp coefficients of the tower, highest first, big-endian.
//!
//! # Feature
//!
//! Compiled when the Cargo feature `blst` is enabled.

use std::sync::OnceLock;

use blst::{blst_fp, blst_fp12, blst_fp12_in_group, blst_fp_from_lendian, blst_lendian_from_fp};
use blstrs::{
    Bls12, G1Affine, G1Projective, G2Affine, G2Prepared, G2Projective, Gt, Scalar,
};
use group::{prime::PrimeCurveAffine, Curve, Group};
use num_bigint::BigUint;
use pairing::{MillerLoopResult as PairingMillerLoopResult, MultiMillerLoop};

use crate::backend::{expect_len, field_order, CurvePoint, Driver, FieldElement, TargetGroup};
use crate::config::{BackendConfig, BackendId, CurveId};
use crate::errors::BackendError;

const FP_BYTES: usize = 48;
const GT_BYTES: usize = 12 * FP_BYTES;

impl FieldElement for Scalar {
    fn zero() -> Self {
        <Scalar as ff::Field>::ZERO
    }

    fn one() -> Self {
        <Scalar as ff::Field>::ONE
    }

    fn from_u64(value: u64) -> Self {
        Scalar::from(value)
    }

    fn negate(&self) -> Self {
        -*self
    }

    fn to_be_bytes(&self) -> [u8; 32] {
        self.to_bytes_be()
    }

    fn from_be_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("scalar", bytes, 32)?;
        let mut repr = [0u8; 32];
        repr.copy_from_slice(bytes);
        Option::<Scalar>::from(Scalar::from_bytes_be(&repr))
            .ok_or(BackendError::Decoding("scalar is not reduced"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlstG1(pub G1Projective);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlstG2(pub G2Projective);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlstGt(pub Gt);

fn ensure_dst(dst: &[u8]) -> Result<(), BackendError> {
    if dst.is_empty() {
        return Err(BackendError::HashToGroup("empty domain separation tag"));
    }
    Ok(())
}

impl CurvePoint<Scalar> for BlstG1 {
    const UNCOMPRESSED_BYTES: usize = 2 * FP_BYTES;
    const COMPRESSED_BYTES: usize = FP_BYTES;

    fn identity() -> Self {
        BlstG1(G1Projective::identity())
    }

    fn generator() -> Self {
        BlstG1(G1Projective::generator())
    }

    fn is_identity(&self) -> bool {
        bool::from(self.0.is_identity())
    }

    fn add(&self, other: &Self) -> Self {
        BlstG1(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        BlstG1(self.0 - other.0)
    }

    fn negate(&self) -> Self {
        BlstG1(-self.0)
    }

    fn double(&self) -> Self {
        BlstG1(self.0.double())
    }

    fn mul_scalar(&self, scalar: &Scalar) -> Self {
        BlstG1(self.0 * scalar)
    }

    fn multi_scalar_multiplication(points: &[Self], scalars: &[Scalar]) -> Result<Self, BackendError> {
        if points.len() != scalars.len() {
            return Err(BackendError::Math("msm length mismatch"));
        }
        if points.is_empty() {
            return Ok(Self::identity());
        }
        let projectives: Vec<G1Projective> = points.iter().map(|p| p.0).collect();
        Ok(BlstG1(G1Projective::multi_exp(&projectives, scalars)))
    }

    fn to_uncompressed(&self) -> Vec<u8> {
        self.0.to_uncompressed().to_vec()
    }

    fn to_compressed(&self) -> Vec<u8> {
        self.0.to_compressed().to_vec()
    }

    fn from_uncompressed(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("g1", bytes, Self::UNCOMPRESSED_BYTES)?;
        let mut repr = [0u8; 2 * FP_BYTES];
        repr.copy_from_slice(bytes);
        Option::<G1Affine>::from(G1Affine::from_uncompressed(&repr))
            .map(|p| BlstG1(p.to_curve()))
            .ok_or(BackendError::Decoding("invalid g1 point"))
    }

    fn from_compressed(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("compressed g1", bytes, Self::COMPRESSED_BYTES)?;
        let mut repr = [0u8; FP_BYTES];
        repr.copy_from_slice(bytes);
        Option::<G1Affine>::from(G1Affine::from_compressed(&repr))
            .map(|p| BlstG1(p.to_curve()))
            .ok_or(BackendError::Decoding("invalid compressed g1 point"))
    }

    fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self, BackendError> {
        ensure_dst(dst)?;
        let point = G1Projective::hash_to_curve(msg, dst, &[]);
        if bool::from(point.is_identity()) {
            return Err(BackendError::HashToGroup("hashed to the identity"));
        }
        Ok(BlstG1(point))
    }
}

impl CurvePoint<Scalar> for BlstG2 {
    const UNCOMPRESSED_BYTES: usize = 4 * FP_BYTES;
    const COMPRESSED_BYTES: usize = 2 * FP_BYTES;

    fn identity() -> Self {
        BlstG2(G2Projective::identity())
    }

    fn generator() -> Self {
        BlstG2(G2Projective::generator())
    }

    fn is_identity(&self) -> bool {
        bool::from(self.0.is_identity())
    }

    fn add(&self, other: &Self) -> Self {
        BlstG2(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        BlstG2(self.0 - other.0)
    }

    fn negate(&self) -> Self {
        BlstG2(-self.0)
    }

    fn double(&self) -> Self {
        BlstG2(self.0.double())
    }

    fn mul_scalar(&self, scalar: &Scalar) -> Self {
        BlstG2(self.0 * scalar)
    }

    fn multi_scalar_multiplication(points: &[Self], scalars: &[Scalar]) -> Result<Self, BackendError> {
        if points.len() != scalars.len() {
            return Err(BackendError::Math("msm length mismatch"));
        }
        if points.is_empty() {
            return Ok(Self::identity());
        }
        let projectives: Vec<G2Projective> = points.iter().map(|p| p.0).collect();
        Ok(BlstG2(G2Projective::multi_exp(&projectives, scalars)))
    }

    fn to_uncompressed(&self) -> Vec<u8> {
        self.0.to_uncompressed().to_vec()
    }

    fn to_compressed(&self) -> Vec<u8> {
        self.0.to_compressed().to_vec()
    }

    fn from_uncompressed(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("g2", bytes, Self::UNCOMPRESSED_BYTES)?;
        let mut repr = [0u8; 4 * FP_BYTES];
        repr.copy_from_slice(bytes);
        Option::<G2Affine>::from(G2Affine::from_uncompressed(&repr))
            .map(|p| BlstG2(p.to_curve()))
            .ok_or(BackendError::Decoding("invalid g2 point"))
    }

    fn from_compressed(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("compressed g2", bytes, Self::COMPRESSED_BYTES)?;
        let mut repr = [0u8; 2 * FP_BYTES];
        repr.copy_from_slice(bytes);
        Option::<G2Affine>::from(G2Affine::from_compressed(&repr))
            .map(|p| BlstG2(p.to_curve()))
            .ok_or(BackendError::Decoding("invalid compressed g2 point"))
    }

    fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self, BackendError> {
        ensure_dst(dst)?;
        let point = G2Projective::hash_to_curve(msg, dst, &[]);
        if bool::from(point.is_identity()) {
            return Err(BackendError::HashToGroup("hashed to the identity"));
        }
        Ok(BlstG2(point))
    }
}

impl TargetGroup for BlstGt {
    type Scalar = Scalar;

    const BYTES: usize = GT_BYTES;

    fn identity() -> Self {
        BlstGt(Gt::identity())
    }

    fn is_identity(&self) -> bool {
        bool::from(self.0.is_identity())
    }

    fn combine(&self, other: &Self) -> Self {
        BlstGt(self.0 + other.0)
    }

    fn invert(&self) -> Self {
        BlstGt(-self.0)
    }

    fn mul_scalar(&self, scalar: &Scalar) -> Self {
        BlstGt(self.0 * scalar)
    }

    fn to_bytes(&self) -> Vec<u8> {
        // SAFETY: `Gt` is a transparent wrapper around `blst_fp12`.
        let fp12: blst_fp12 = unsafe { std::mem::transmute::<Gt, blst_fp12>(self.0) };
        let mut bytes = Vec::with_capacity(GT_BYTES);
        for fp6 in fp12.fp6.iter() {
            for fp2 in fp6.fp2.iter() {
                for fp in fp2.fp.iter() {
                    let mut le = [0u8; FP_BYTES];
                    unsafe { blst_lendian_from_fp(le.as_mut_ptr(), fp) };
                    bytes.extend_from_slice(&le);
                }
            }
        }
        bytes.reverse();
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        expect_len("gt", bytes, GT_BYTES)?;
        if bytes.iter().all(|b| *b == 0) {
            return Err(BackendError::Decoding("gt element is zero"));
        }
        let mut le = bytes.to_vec();
        le.reverse();
        let mut fp12 = blst_fp12::default();
        let mut chunks = le.chunks_exact(FP_BYTES);
        for fp6 in fp12.fp6.iter_mut() {
            for fp2 in fp6.fp2.iter_mut() {
                for fp in fp2.fp.iter_mut() {
                    let chunk = chunks.next().ok_or(BackendError::Decoding("gt coefficient count"))?;
                    let mut limb = blst_fp::default();
                    unsafe { blst_fp_from_lendian(&mut limb, chunk.as_ptr()) };
                    *fp = limb;
                }
            }
        }
        if !unsafe { blst_fp12_in_group(&fp12) } {
            return Err(BackendError::Decoding("gt element outside the order-r subgroup"));
        }
        // SAFETY: see `to_bytes`.
        let element = BlstGt(unsafe { std::mem::transmute::<blst_fp12, Gt>(fp12) });
        if element.to_bytes() != bytes {
            return Err(BackendError::Decoding("gt coefficient is not reduced"));
        }
        Ok(element)
    }
}

/// blstrs driver for BLS12-381.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlstBls12;

impl Driver for BlstBls12 {
    type Scalar = Scalar;
    type G1 = BlstG1;
    type G2 = BlstG2;
    type Target = BlstGt;
    type MillerLoop = <Bls12 as MultiMillerLoop>::Result;

    const CONFIG: BackendConfig = BackendConfig::new(BackendId::Blst, CurveId::Bls12_381);
    const COORDINATE_BYTES: usize = FP_BYTES;

    fn order() -> &'static BigUint {
        static ORDER: OnceLock<BigUint> = OnceLock::new();
        ORDER.get_or_init(field_order::<Scalar>)
    }

    fn miller_loop(g2: &BlstG2, g1: &BlstG1) -> Self::MillerLoop {
        let prepared = G2Prepared::from(g2.0.to_affine());
        Bls12::multi_miller_loop(&[(&g1.0.to_affine(), &prepared)])
    }

    fn multi_miller_loop(g2: &[BlstG2], g1: &[BlstG1]) -> Result<Self::MillerLoop, BackendError> {
        if g1.len() != g2.len() {
            return Err(BackendError::Math("pairing length mismatch"));
        }
        let lhs_proj: Vec<G1Projective> = g1.iter().map(|p| p.0).collect();
        let rhs_proj: Vec<G2Projective> = g2.iter().map(|p| p.0).collect();
        let mut g1_affine = vec![G1Affine::identity(); lhs_proj.len()];
        let mut g2_affine = vec![G2Affine::identity(); rhs_proj.len()];
        G1Projective::batch_normalize(&lhs_proj, &mut g1_affine);
        G2Projective::batch_normalize(&rhs_proj, &mut g2_affine);
        let g2_prepared: Vec<G2Prepared> = g2_affine.into_iter().map(G2Prepared::from).collect();
        let terms: Vec<_> = g1_affine.iter().zip(g2_prepared.iter()).collect();
        Ok(Bls12::multi_miller_loop(&terms))
    }

    fn combine_miller_loops(a: &Self::MillerLoop, b: &Self::MillerLoop) -> Self::MillerLoop {
        *a + *b
    }

    fn final_exponentiation(f: &Self::MillerLoop) -> Result<BlstGt, BackendError> {
        Ok(BlstGt(f.final_exponentiation()))
    }

    fn miller_loop2(p2a: &BlstG2, p1a: &BlstG1, p2b: &BlstG2, p1b: &BlstG1) -> Self::MillerLoop {
        let a = G2Prepared::from(p2a.0.to_affine());
        let b = G2Prepared::from(p2b.0.to_affine());
        Bls12::multi_miller_loop(&[(&p1a.0.to_affine(), &a), (&p1b.0.to_affine(), &b)])
    }
}
