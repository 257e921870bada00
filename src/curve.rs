//! The curve façade.
//!
//! A [`Curve`] binds one [`Driver`] to a named curve. It caches the
//! generators, the group order and the encoding sizes, builds scalars and
//! points, and provides the modular helpers that operate on [`Zr`] values
//! with an explicit modulus. A curve is immutable once built and may be
//! shared freely across threads.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "blst")]
//! # {
//! use bilinear::{BlstBls12, Curve};
//!
//! let curve = Curve::<BlstBls12>::new().expect("blst is enabled");
//! let a = curve.new_zr_from_i64(35);
//! let b = curve.new_zr_from_i64(23);
//! let g = curve.gen_g1();
//! assert_eq!(g.mul2(&a, &g, &b), g.mul(&curve.new_zr_from_i64(58)));
//! # }
//! ```

use std::sync::Arc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::arith::{ScalarField, ScratchPool, Zr};
use crate::backend::{CurvePoint, Driver, TargetGroup};
use crate::config::{BackendConfig, CurveId};
use crate::elements::{native_scalar, Gt, MillerLoopOutput, G1, G2};
use crate::errors::{BackendError, Error};

const SCALAR_BYTES: usize = 32;

/// Domain separation tag used by [`Curve::hash_to_g1`].
pub fn default_g1_domain(curve: CurveId) -> &'static [u8] {
    match curve {
        CurveId::Bls12_381 => b"BLS12381G1_XMD:SHA-256_SSWU_RO_",
        CurveId::Bls12_377 => b"BLS12377G1_XMD:SHA-256_SSWU_RO_",
        CurveId::Bn254 => b"BN254G1_XMD:SHA-256_TAI_RO_",
    }
}

/// Domain separation tag used by [`Curve::hash_to_g2`].
pub fn default_g2_domain(curve: CurveId) -> &'static [u8] {
    match curve {
        CurveId::Bls12_381 => b"BLS12381G2_XMD:SHA-256_SSWU_RO_",
        CurveId::Bls12_377 => b"BLS12377G2_XMD:SHA-256_SSWU_RO_",
        CurveId::Bn254 => b"BN254G2_XMD:SHA-256_TAI_RO_",
    }
}

fn reset_bigint(value: &mut BigInt) {
    value.set_zero();
}

/// The helpers reduce by `|m|`, matching [`Zr::mod_assign`].
fn ensure_modulus(m: &Zr) -> Result<BigInt, Error> {
    if m.value().is_zero() {
        return Err(BackendError::Math("reduction modulo zero").into());
    }
    Ok(m.value().abs())
}

fn ensure_same_len(left: usize, right: usize) -> Result<(), Error> {
    if left != right {
        return Err(Error::LengthMismatch { left, right });
    }
    Ok(())
}

/// A driver bound to its curve, with cached constants.
pub struct Curve<D: Driver> {
    field: Arc<ScalarField>,
    group_order: Zr,
    gen_g1: G1<D>,
    gen_g2: G2<D>,
    gen_gt: Gt<D>,
    scratch: ScratchPool<BigInt>,
}

impl<D: Driver> Curve<D> {
    /// Builds the façade, computing `GenGt = e(GenG1, GenG2)` once.
    #[instrument(level = "debug", fields(config = %D::CONFIG))]
    pub fn new() -> Result<Self, Error> {
        D::CONFIG.ensure_supported()?;
        let field = ScalarField::new(D::order().clone(), SCALAR_BYTES)?;
        let group_order = Zr::from_bigint(&field, field.modulus().clone());
        let gen_g1 = G1::generator();
        let gen_g2 = G2::generator();
        let gen_gt = Gt::from_raw(D::final_exponentiation(&D::miller_loop(
            gen_g2.as_raw(),
            gen_g1.as_raw(),
        ))?);
        Ok(Self {
            field,
            group_order,
            gen_g1,
            gen_g2,
            gen_gt,
            scratch: ScratchPool::new(BigInt::zero, reset_bigint),
        })
    }

    pub fn config(&self) -> BackendConfig {
        D::CONFIG
    }

    pub fn curve_id(&self) -> CurveId {
        D::CONFIG.curve
    }

    pub fn field(&self) -> &Arc<ScalarField> {
        &self.field
    }

    pub fn group_order(&self) -> &Zr {
        &self.group_order
    }

    pub fn coordinate_byte_size(&self) -> usize {
        D::COORDINATE_BYTES
    }

    pub fn g1_byte_size(&self) -> usize {
        D::G1::UNCOMPRESSED_BYTES
    }

    pub fn compressed_g1_byte_size(&self) -> usize {
        D::G1::COMPRESSED_BYTES
    }

    pub fn g2_byte_size(&self) -> usize {
        D::G2::UNCOMPRESSED_BYTES
    }

    pub fn compressed_g2_byte_size(&self) -> usize {
        D::G2::COMPRESSED_BYTES
    }

    pub fn scalar_byte_size(&self) -> usize {
        SCALAR_BYTES
    }

    pub fn gt_byte_size(&self) -> usize {
        D::Target::BYTES
    }

    pub fn gen_g1(&self) -> G1<D> {
        self.gen_g1
    }

    pub fn gen_g2(&self) -> G2<D> {
        self.gen_g2
    }

    pub fn gen_gt(&self) -> Gt<D> {
        self.gen_gt
    }

    /// Point at infinity of G1.
    pub fn new_g1(&self) -> G1<D> {
        G1::identity()
    }

    /// Point at infinity of G2.
    pub fn new_g2(&self) -> G2<D> {
        G2::identity()
    }

    pub fn new_zr_from_i64(&self, value: i64) -> Zr {
        Zr::from_i64(&self.field, value)
    }

    pub fn new_zr_from_u64(&self, value: u64) -> Zr {
        Zr::from_u64(&self.field, value)
    }

    /// Unsigned big-endian interpretation of `bytes`, not reduced.
    pub fn new_zr_from_bytes(&self, bytes: &[u8]) -> Zr {
        Zr::from_bytes(&self.field, bytes)
    }

    /// Uniform scalar in `[0, order)`.
    pub fn new_random_zr<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> Zr {
        Zr::random(&self.field, rng)
    }

    /// Operating-system CSPRNG. Panics if the OS source fails.
    pub fn rng(&self) -> OsRng {
        OsRng
    }

    /// SHA-256 of `data`, reduced modulo the group order.
    pub fn hash_to_zr(&self, data: &[u8]) -> Zr {
        let digest = Sha256::digest(data);
        self.zr(Zr::from_bytes(&self.field, &digest).normalized().into())
    }

    pub fn hash_to_g1(&self, data: &[u8]) -> Result<G1<D>, Error> {
        self.hash_to_g1_with_domain(data, default_g1_domain(self.curve_id()))
    }

    #[instrument(level = "trace", skip_all, fields(len = data.len()))]
    pub fn hash_to_g1_with_domain(&self, data: &[u8], domain: &[u8]) -> Result<G1<D>, Error> {
        Ok(G1::from_raw(D::G1::hash_to_curve(data, domain)?))
    }

    pub fn hash_to_g2(&self, data: &[u8]) -> Result<G2<D>, Error> {
        self.hash_to_g2_with_domain(data, default_g2_domain(self.curve_id()))
    }

    #[instrument(level = "trace", skip_all, fields(len = data.len()))]
    pub fn hash_to_g2_with_domain(&self, data: &[u8], domain: &[u8]) -> Result<G2<D>, Error> {
        Ok(G2::from_raw(D::G2::hash_to_curve(data, domain)?))
    }

    pub fn new_g1_from_bytes(&self, bytes: &[u8]) -> Result<G1<D>, Error> {
        Ok(G1::from_bytes(bytes)?)
    }

    pub fn new_g1_from_compressed(&self, bytes: &[u8]) -> Result<G1<D>, Error> {
        Ok(G1::from_compressed(bytes)?)
    }

    pub fn new_g2_from_bytes(&self, bytes: &[u8]) -> Result<G2<D>, Error> {
        Ok(G2::from_bytes(bytes)?)
    }

    pub fn new_g2_from_compressed(&self, bytes: &[u8]) -> Result<G2<D>, Error> {
        Ok(G2::from_compressed(bytes)?)
    }

    pub fn new_gt_from_bytes(&self, bytes: &[u8]) -> Result<Gt<D>, Error> {
        Ok(Gt::from_bytes(bytes)?)
    }

    /// Raw Miller loop of `e(p, q)`; pass it to [`Curve::final_exp`].
    pub fn pairing(&self, q: &G2<D>, p: &G1<D>) -> MillerLoopOutput<D> {
        MillerLoopOutput::from_raw(D::miller_loop(q.as_raw(), p.as_raw()))
    }

    /// Raw Miller loop of `e(p1a, p2a) · e(p1b, p2b)` computed in one loop.
    pub fn pairing2(
        &self,
        p2a: &G2<D>,
        p1a: &G1<D>,
        p2b: &G2<D>,
        p1b: &G1<D>,
    ) -> MillerLoopOutput<D> {
        MillerLoopOutput::from_raw(D::miller_loop2(
            p2a.as_raw(),
            p1a.as_raw(),
            p2b.as_raw(),
            p1b.as_raw(),
        ))
    }

    /// Raw Miller loop of `∏ e(g1s[i], g2s[i])`.
    #[instrument(level = "trace", skip_all, fields(len = g1s.len()))]
    pub fn multi_pairing(&self, g2s: &[G2<D>], g1s: &[G1<D>]) -> Result<MillerLoopOutput<D>, Error> {
        ensure_same_len(g2s.len(), g1s.len())?;
        let lhs: Vec<D::G2> = g2s.iter().map(|q| *q.as_raw()).collect();
        let rhs: Vec<D::G1> = g1s.iter().map(|p| *p.as_raw()).collect();
        Ok(MillerLoopOutput::from_raw(D::multi_miller_loop(&lhs, &rhs)?))
    }

    pub fn final_exp(&self, f: &MillerLoopOutput<D>) -> Result<Gt<D>, Error> {
        Ok(f.final_exp()?)
    }

    /// `(a + b) mod m`.
    pub fn mod_add(&self, a: &Zr, b: &Zr, m: &Zr) -> Result<Zr, Error> {
        let m = ensure_modulus(m)?;
        Ok(self.zr((a.value() + b.value()).mod_floor(&m)))
    }

    /// `(a - b) mod m`.
    pub fn mod_sub(&self, a: &Zr, b: &Zr, m: &Zr) -> Result<Zr, Error> {
        let m = ensure_modulus(m)?;
        Ok(self.zr((a.value() - b.value()).mod_floor(&m)))
    }

    /// `(a · b) mod m`.
    pub fn mod_mul(&self, a: &Zr, b: &Zr, m: &Zr) -> Result<Zr, Error> {
        let m = ensure_modulus(m)?;
        Ok(self.zr((a.value() * b.value()).mod_floor(&m)))
    }

    /// `-a mod m`.
    pub fn mod_neg(&self, a: &Zr, m: &Zr) -> Result<Zr, Error> {
        let m = ensure_modulus(m)?;
        Ok(self.zr((-a.value()).mod_floor(&m)))
    }

    /// In place `a ← (a + b + c) mod m`.
    pub fn mod_add2(&self, a: &mut Zr, b: &Zr, c: &Zr, m: &Zr) -> Result<(), Error> {
        let m = ensure_modulus(m)?;
        let mut acc = self.scratch.checkout();
        acc.clone_from(a.value());
        *acc += b.value();
        *acc += c.value();
        *a = self.zr(acc.mod_floor(&m));
        Ok(())
    }

    /// `Σ a[i] · b[i] mod m`.
    pub fn mod_add_mul(&self, a: &[Zr], b: &[Zr], m: &Zr) -> Result<Zr, Error> {
        ensure_same_len(a.len(), b.len())?;
        let m = ensure_modulus(m)?;
        let mut acc = self.scratch.checkout();
        let mut product = self.scratch.checkout();
        for (x, y) in a.iter().zip(b) {
            product.clone_from(x.value());
            *product *= y.value();
            *acc += &*product;
        }
        Ok(self.zr(acc.mod_floor(&m)))
    }

    /// `(a · c + b · d) mod m`.
    pub fn mod_add_mul2(&self, a: &Zr, c: &Zr, b: &Zr, d: &Zr, m: &Zr) -> Result<Zr, Error> {
        let m = ensure_modulus(m)?;
        let mut acc = self.scratch.checkout();
        let mut product = self.scratch.checkout();
        acc.clone_from(a.value());
        *acc *= c.value();
        product.clone_from(b.value());
        *product *= d.value();
        *acc += &*product;
        Ok(self.zr(acc.mod_floor(&m)))
    }

    /// `Σ ([left[i]]left_gen[i] + [right[i]]right_gen[i])`, one joint
    /// multiplication per index, evaluated in parallel.
    #[instrument(level = "trace", skip_all, fields(len = left.len()))]
    pub fn add_pairs_of_products(
        &self,
        left: &[Zr],
        right: &[Zr],
        left_gen: &[G1<D>],
        right_gen: &[G1<D>],
    ) -> Result<G1<D>, Error> {
        ensure_same_len(left.len(), right.len())?;
        ensure_same_len(left.len(), left_gen.len())?;
        ensure_same_len(left.len(), right_gen.len())?;
        Ok((0..left.len())
            .into_par_iter()
            .map(|i| left_gen[i].mul2(&left[i], &right_gen[i], &right[i]))
            .reduce(G1::identity, |a, b| a.add(&b)))
    }

    /// `Σ [scalars[i]]points[i]` in G1 via the driver's multi-exponentiation.
    #[instrument(level = "trace", skip_all, fields(len = points.len()))]
    pub fn multi_scalar_mul_g1(&self, points: &[G1<D>], scalars: &[Zr]) -> Result<G1<D>, Error> {
        ensure_same_len(points.len(), scalars.len())?;
        let bases: Vec<D::G1> = points.iter().map(|p| *p.as_raw()).collect();
        let natives: Vec<D::Scalar> = scalars.iter().map(native_scalar::<D>).collect();
        Ok(G1::from_raw(D::G1::multi_scalar_multiplication(&bases, &natives)?))
    }

    /// `Σ [scalars[i]]points[i]` in G2 via the driver's multi-exponentiation.
    #[instrument(level = "trace", skip_all, fields(len = points.len()))]
    pub fn multi_scalar_mul_g2(&self, points: &[G2<D>], scalars: &[Zr]) -> Result<G2<D>, Error> {
        ensure_same_len(points.len(), scalars.len())?;
        let bases: Vec<D::G2> = points.iter().map(|p| *p.as_raw()).collect();
        let natives: Vec<D::Scalar> = scalars.iter().map(native_scalar::<D>).collect();
        Ok(G2::from_raw(D::G2::multi_scalar_multiplication(&bases, &natives)?))
    }

    fn zr(&self, value: BigInt) -> Zr {
        Zr::from_bigint(&self.field, value)
    }
}

impl<D: Driver> core::fmt::Debug for Curve<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Curve")
            .field("config", &D::CONFIG)
            .field("group_order", &self.group_order)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn scalar_helper<D: Driver>() {
        let curve = Curve::<D>::new().unwrap();
        let a = curve.new_zr_from_i64(35);
        assert_eq!(a.plus(&curve.new_zr_from_i64(1)), curve.new_zr_from_i64(36));
        assert_eq!(a.bytes().len(), curve.scalar_byte_size());
        assert_eq!(curve.new_zr_from_bytes(&a.bytes()), a);

        let mut rng = StdRng::seed_from_u64(1);
        let r = curve.new_random_zr(&mut rng);
        let mut inv = r.clone();
        inv.inv_mod_assign(curve.group_order()).unwrap();
        assert_eq!(r.mul(&inv), curve.new_zr_from_i64(1));

        let h1 = curve.hash_to_zr(b"Message");
        assert_eq!(h1, curve.hash_to_zr(b"Message"));
        assert_ne!(h1, curve.hash_to_zr(b"message"));
        assert!(h1.value() < curve.group_order().value());

        let mut os = curve.rng();
        let fresh = curve.new_random_zr(&mut os);
        assert!(fresh.value() < curve.group_order().value());
    }

    fn g1_helper<D: Driver>() {
        let curve = Curve::<D>::new().unwrap();
        let g = curve.gen_g1();
        let a = curve.new_zr_from_i64(35);
        let b = curve.new_zr_from_i64(23);
        let c = curve.new_zr_from_i64(58);

        let ga = g.mul(&a);
        let gb = g.mul(&b);
        assert_eq!(ga.add(&gb), g.mul(&c));
        assert_eq!(ga + gb, g.mul(&c));
        assert_eq!(g.mul2(&a, &g, &b), g.mul(&c));
        assert_eq!(g.mul(&c).sub(&gb), ga);
        assert!(ga.sub(&ga).is_infinity());
        assert!((ga + -ga).is_infinity());
        assert!(g.mul(&curve.new_zr_from_i64(0)).is_infinity());
        assert!(g.mul(curve.group_order()).is_infinity());
        assert!(curve.new_g1().is_infinity());

        // receivers are left untouched
        let copy = ga;
        let _ = ga.add(&gb);
        let _ = ga.neg();
        assert_eq!(ga, copy);

        let mut minus_a = a.clone();
        minus_a.neg_assign();
        assert_eq!(g.mul(&minus_a), ga.neg());

        let bytes = ga.bytes();
        assert_eq!(bytes.len(), curve.g1_byte_size());
        assert_eq!(curve.new_g1_from_bytes(&bytes).unwrap(), ga);
        let compressed = ga.compressed();
        assert_eq!(compressed.len(), curve.compressed_g1_byte_size());
        assert_eq!(curve.new_g1_from_compressed(&compressed).unwrap(), ga);
        let infinity = curve.new_g1();
        assert!(curve.new_g1_from_bytes(&infinity.bytes()).unwrap().is_infinity());
        assert!(curve
            .new_g1_from_compressed(&infinity.compressed())
            .unwrap()
            .is_infinity());

        for bad in [vec![], vec![0u8; 3], vec![0xffu8; curve.g1_byte_size()]] {
            let err = curve.new_g1_from_bytes(&bad).unwrap_err();
            assert!(err.backend().unwrap().is_decoding());
        }
        assert!(curve.new_g1_from_compressed(&[]).is_err());

        let shown = ga.to_string();
        assert_eq!(shown.len(), 2 * curve.compressed_g1_byte_size());
        assert_eq!(hex::decode(&shown).unwrap(), compressed);
        assert_ne!(shown, gb.to_string());

        let h = curve.hash_to_g1(b"Amazing Grace (how sweet the sound)").unwrap();
        assert!(!h.is_infinity());
        assert_eq!(h, curve.hash_to_g1(b"Amazing Grace (how sweet the sound)").unwrap());
        let other = curve
            .hash_to_g1_with_domain(b"Amazing Grace (how sweet the sound)", b"another domain")
            .unwrap();
        assert_ne!(h, other);
        assert!(curve.hash_to_g1_with_domain(b"x", b"").is_err());
    }

    fn g2_helper<D: Driver>() {
        let curve = Curve::<D>::new().unwrap();
        let g = curve.gen_g2();
        let a = curve.new_zr_from_i64(35);
        let b = curve.new_zr_from_i64(23);
        let c = curve.new_zr_from_i64(58);

        assert_eq!(g.mul(&a).add(&g.mul(&b)), g.mul(&c));
        assert_eq!(g.mul2(&a, &g, &b), g.mul(&c));
        assert_eq!(g.mul(&c).sub(&g.mul(&b)), g.mul(&a));
        assert!(g.sub(&g).is_infinity());

        let p = g.mul(&a);
        assert_eq!(p.bytes().len(), curve.g2_byte_size());
        assert_eq!(curve.new_g2_from_bytes(&p.bytes()).unwrap(), p);
        assert_eq!(p.compressed().len(), curve.compressed_g2_byte_size());
        assert_eq!(curve.new_g2_from_compressed(&p.compressed()).unwrap(), p);
        assert!(curve.new_g2_from_bytes(&p.compressed()).is_err());
        assert_eq!(p.to_string(), hex::encode(p.compressed()));

        let h = curve.hash_to_g2(b"Amazing Grace (how sweet the sound)").unwrap();
        assert!(!h.is_infinity());
        assert!(curve.hash_to_g2_with_domain(b"x", b"").is_err());
    }

    fn pairing_helper<D: Driver>() {
        let curve = Curve::<D>::new().unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let g1 = curve.gen_g1();
        let g2 = curve.gen_g2();

        let expected = curve.final_exp(&curve.pairing(&g2, &g1)).unwrap();
        assert_eq!(curve.gen_gt(), expected);
        assert!(!expected.is_unity());
        assert!(curve.final_exp(&curve.pairing(&g2, &curve.new_g1())).unwrap().is_unity());

        let r = curve.new_zr_from_i64(1541);
        let lhs = curve.final_exp(&curve.pairing(&g2, &g1.mul(&r))).unwrap();
        let rhs = curve.final_exp(&curve.pairing(&g2.mul(&r), &g1)).unwrap();
        assert_eq!(lhs, rhs);
        assert_eq!(lhs, curve.gen_gt().exp(&r));

        let a = curve.new_random_zr(&mut rng);
        let b = curve.new_random_zr(&mut rng);
        let p1 = g1.mul(&a);
        let p2 = g2.mul(&b);
        let e = curve.final_exp(&curve.pairing(&p2, &p1)).unwrap();
        assert_eq!(e, curve.gen_gt().exp(&a.mul(&b)));

        let pa = curve.pairing(&g2, &p1);
        let pb = curve.pairing(&p2, &g1);
        let joint = curve.final_exp(&curve.pairing2(&g2, &p1, &p2, &g1)).unwrap();
        let separate = curve.final_exp(&pa).unwrap().mul(&curve.final_exp(&pb).unwrap());
        assert_eq!(joint, separate);
        assert_eq!(curve.final_exp(&pa.combine(&pb)).unwrap(), joint);
        let batched = curve.multi_pairing(&[g2, p2], &[p1, g1]).unwrap();
        assert_eq!(curve.final_exp(&batched).unwrap(), joint);
        assert!(matches!(
            curve.multi_pairing(&[g2], &[g1, g1]),
            Err(Error::LengthMismatch { left: 1, right: 2 })
        ));

        // e(aG1, G2) · e(-aG1, G2) == 1
        let check = curve.pairing2(&g2, &p1, &g2, &p1.neg());
        assert!(curve.final_exp(&check).unwrap().is_unity());

        assert!(e.inverse().mul(&e).is_unity());

        let bytes = e.bytes();
        assert_eq!(bytes.len(), curve.gt_byte_size());
        assert_eq!(curve.new_gt_from_bytes(&bytes).unwrap(), e);
        assert!(curve.new_gt_from_bytes(&bytes[1..]).is_err());
        assert_eq!(e.to_string().len(), 2 * curve.gt_byte_size());
        assert_eq!(hex::decode(e.to_string()).unwrap(), bytes);
        let mut tampered = bytes.clone();
        let last = tampered.len() - 1;
        tampered[last] ^= 1;
        assert!(curve.new_gt_from_bytes(&tampered).is_err());
    }

    fn diffie_hellman_helper<D: Driver>() {
        let curve = Curve::<D>::new().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let a = curve.new_random_zr(&mut rng);
        let b = curve.new_random_zr(&mut rng);

        let g1 = curve.gen_g1();
        assert_eq!(g1.mul(&a).mul(&b), g1.mul(&b).mul(&a));
        let g2 = curve.gen_g2();
        assert_eq!(g2.mul(&a).mul(&b), g2.mul(&b).mul(&a));
        let gt = curve.gen_gt();
        assert_eq!(gt.exp(&a).exp(&b), gt.exp(&b).exp(&a));
    }

    fn mod_helper<D: Driver>() {
        let curve = Curve::<D>::new().unwrap();
        let order = curve.group_order();
        let a = curve.new_zr_from_i64(35);
        let b = curve.new_zr_from_i64(23);

        let neg = curve.mod_neg(&a, order).unwrap();
        assert_eq!(curve.mod_add(&neg, &a, order).unwrap(), curve.new_zr_from_i64(0));
        assert_eq!(
            curve.mod_sub(&b, &a, order).unwrap(),
            curve.mod_neg(&curve.new_zr_from_i64(12), order).unwrap()
        );
        assert_eq!(
            curve.mod_mul(&a, &b, &curve.new_zr_from_i64(100)).unwrap(),
            curve.new_zr_from_i64(5)
        );
        assert!(curve.mod_add(&a, &b, &curve.new_zr_from_i64(0)).is_err());

        // a negative modulus reduces like its absolute value
        let minus_seven = curve.new_zr_from_i64(-7);
        let five = curve.new_zr_from_i64(5);
        let one = curve.new_zr_from_i64(1);
        assert_eq!(curve.mod_add(&five, &one, &minus_seven).unwrap(), curve.new_zr_from_i64(6));
        assert_eq!(curve.mod_sub(&one, &five, &minus_seven).unwrap(), curve.new_zr_from_i64(3));
        assert_eq!(curve.mod_mul(&five, &five, &minus_seven).unwrap(), curve.new_zr_from_i64(4));
        assert_eq!(curve.mod_neg(&one, &minus_seven).unwrap(), curve.new_zr_from_i64(6));
        let mut six = curve.new_zr_from_i64(6);
        six.mod_assign(&minus_seven).unwrap();
        assert_eq!(curve.mod_add(&five, &one, &minus_seven).unwrap(), six);
        let mut acc = curve.new_zr_from_i64(0);
        curve.mod_add2(&mut acc, &five, &five, &minus_seven).unwrap();
        assert_eq!(acc, curve.new_zr_from_i64(3));
        assert_eq!(
            curve.mod_add_mul2(&five, &one, &one, &one, &minus_seven).unwrap(),
            curve.new_zr_from_i64(6)
        );

        let mut acc = curve.new_zr_from_i64(10);
        curve
            .mod_add2(&mut acc, &a, &b, &curve.new_zr_from_i64(50))
            .unwrap();
        assert_eq!(acc, curve.new_zr_from_i64(18));

        let xs = [a.clone(), b.clone(), curve.new_zr_from_i64(-2)];
        let ys = [b.clone(), a.clone(), curve.new_zr_from_i64(7)];
        assert_eq!(
            curve.mod_add_mul(&xs, &ys, order).unwrap(),
            curve.new_zr_from_i64(35 * 23 * 2 - 14)
        );
        assert!(curve.mod_add_mul(&xs, &ys[..2], order).is_err());
        assert_eq!(
            curve.mod_add_mul2(&a, &b, &b, &a, order).unwrap(),
            curve.new_zr_from_i64(35 * 23 * 2)
        );

        // joint multiplication with large signed scalars agrees with reduction
        let g = curve.gen_g1();
        let i = curve.new_zr_from_i64(i64::MAX);
        let j = curve.new_zr_from_i64(i64::MAX);
        let sum = curve.mod_add(&i, &j, order).unwrap();
        assert_eq!(g.mul2(&i, &g, &j), g.mul(&sum));

        let mut rng = StdRng::seed_from_u64(4);
        let x = curve.new_random_zr(&mut rng);
        let y = curve.new_random_zr(&mut rng);
        let unreduced = x.plus(&y);
        let sum = g.mul(&x).add(&g.mul(&y));
        assert!(!sum.is_infinity());
        assert_eq!(sum, g.mul(&unreduced));
    }

    fn pairs_of_products_helper<D: Driver>() {
        let curve = Curve::<D>::new().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let n = 6;
        let left: Vec<Zr> = (0..n).map(|_| curve.new_random_zr(&mut rng)).collect();
        let right: Vec<Zr> = (0..n).map(|_| curve.new_random_zr(&mut rng)).collect();
        let left_gen: Vec<G1<D>> = (0..n)
            .map(|_| curve.gen_g1().mul(&curve.new_random_zr(&mut rng)))
            .collect();
        let right_gen: Vec<G1<D>> = (0..n)
            .map(|_| curve.gen_g1().mul(&curve.new_random_zr(&mut rng)))
            .collect();

        let sum = curve
            .add_pairs_of_products(&left, &right, &left_gen, &right_gen)
            .unwrap();
        let mut expected = curve.new_g1();
        for i in 0..n {
            expected = expected.add(&left_gen[i].mul2(&left[i], &right_gen[i], &right[i]));
        }
        assert_eq!(sum, expected);

        let mut points = left_gen.clone();
        points.extend_from_slice(&right_gen);
        let mut scalars = left.clone();
        scalars.extend_from_slice(&right);
        assert_eq!(curve.multi_scalar_mul_g1(&points, &scalars).unwrap(), sum);

        // negated scalars on the same generators cancel
        let negated: Vec<Zr> = left
            .iter()
            .map(|s| {
                let mut s = s.clone();
                s.neg_assign();
                s
            })
            .collect();
        let cancel = curve
            .add_pairs_of_products(&left, &negated, &left_gen, &left_gen)
            .unwrap();
        assert!(cancel.is_infinity());

        assert!(curve
            .add_pairs_of_products(&left, &right[..1], &left_gen, &right_gen)
            .is_err());
        assert!(curve
            .add_pairs_of_products(&[], &[], &[], &[])
            .unwrap()
            .is_infinity());

        let g2s: Vec<G2<D>> = (1..4)
            .map(|k| curve.gen_g2().mul(&curve.new_zr_from_i64(k)))
            .collect();
        let ks: Vec<Zr> = (1..4).map(|k| curve.new_zr_from_i64(-k)).collect();
        let msm = curve.multi_scalar_mul_g2(&g2s, &ks).unwrap();
        assert_eq!(msm, curve.gen_g2().mul(&curve.new_zr_from_i64(-14)));
        assert!(curve.multi_scalar_mul_g2(&g2s, &ks[..1]).is_err());
    }

    macro_rules! per_driver {
        ($name:ident, $helper:ident) => {
            #[test]
            fn $name() {
                #[cfg(feature = "blst")]
                $helper::<crate::backend::BlstBls12>();
                #[cfg(feature = "ark_bls12381")]
                $helper::<crate::backend::ArkBls12>();
                #[cfg(feature = "ark_bls12377")]
                $helper::<crate::backend::ArkBls377>();
                #[cfg(feature = "ark_bn254")]
                $helper::<crate::backend::ArkBn254>();
            }
        };
    }

    per_driver!(scalars_follow_curve_order, scalar_helper);
    per_driver!(g1_group_laws, g1_helper);
    per_driver!(g2_group_laws, g2_helper);
    per_driver!(pairing_is_bilinear, pairing_helper);
    per_driver!(diffie_hellman_agrees, diffie_hellman_helper);
    per_driver!(modular_helpers, mod_helper);
    per_driver!(pairs_of_products, pairs_of_products_helper);
}
