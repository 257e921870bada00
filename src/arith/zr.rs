//! Scalars modulo the group order.
//!
//! A [`Zr`] is an arbitrary-precision signed integer paired with the
//! [`ScalarField`] it belongs to. Values are **not** kept reduced: addition
//! and subtraction are exact integer operations, and a scalar may be negative
//! or exceed the modulus in memory. Multiplication and modular
//! exponentiation reduce. Reduction happens explicitly through
//! [`Zr::mod_assign`] and implicitly whenever a scalar is encoded or fed to a
//! group operation.

use core::fmt;
use std::sync::Arc;

use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rand_core::{CryptoRng, RngCore};

use crate::errors::BackendError;

/// Modulus and encoding width shared by a family of scalars.
#[derive(Debug, PartialEq, Eq)]
pub struct ScalarField {
    modulus: BigInt,
    modulus_unsigned: BigUint,
    byte_len: usize,
}

impl ScalarField {
    /// Creates a field description. The modulus must be at least 2 and fit
    /// in `byte_len` bytes.
    pub fn new(modulus: BigUint, byte_len: usize) -> Result<Arc<Self>, BackendError> {
        if modulus < BigUint::from(2u8) {
            return Err(BackendError::Math("modulus must be at least 2"));
        }
        if modulus.bits() > 8 * byte_len as u64 {
            return Err(BackendError::Math("modulus does not fit the encoding width"));
        }
        Ok(Arc::new(Self {
            modulus: BigInt::from_biguint(Sign::Plus, modulus.clone()),
            modulus_unsigned: modulus,
            byte_len,
        }))
    }

    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    /// Width of [`Zr::bytes`].
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

/// Signed scalar with a modulus.
///
/// `==` compares the raw integers: `-1` and `modulus - 1` encode to the same
/// bytes but are not equal. Use [`Zr::is_congruent`] to compare residues.
#[derive(Debug)]
pub struct Zr {
    value: BigInt,
    field: Arc<ScalarField>,
}

impl Zr {
    pub fn from_bigint(field: &Arc<ScalarField>, value: BigInt) -> Self {
        Self {
            value,
            field: Arc::clone(field),
        }
    }

    pub fn from_i64(field: &Arc<ScalarField>, value: i64) -> Self {
        Self::from_bigint(field, BigInt::from(value))
    }

    pub fn from_u64(field: &Arc<ScalarField>, value: u64) -> Self {
        Self::from_bigint(field, BigInt::from(value))
    }

    /// Interprets `bytes` as an unsigned big-endian integer. No reduction is
    /// applied.
    pub fn from_bytes(field: &Arc<ScalarField>, bytes: &[u8]) -> Self {
        Self::from_bigint(field, BigInt::from_bytes_be(Sign::Plus, bytes))
    }

    /// Uniform sample from `[0, modulus)`.
    pub fn random<R: RngCore + CryptoRng + ?Sized>(field: &Arc<ScalarField>, rng: &mut R) -> Self {
        let value = rng.gen_biguint_below(&field.modulus_unsigned);
        Self::from_bigint(field, BigInt::from_biguint(Sign::Plus, value))
    }

    pub fn zero(field: &Arc<ScalarField>) -> Self {
        Self::from_bigint(field, BigInt::zero())
    }

    pub fn one(field: &Arc<ScalarField>) -> Self {
        Self::from_bigint(field, BigInt::one())
    }

    /// Raw integer value, possibly negative or unreduced.
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    pub fn field(&self) -> &Arc<ScalarField> {
        &self.field
    }

    /// Exact sum, not reduced.
    pub fn plus(&self, other: &Zr) -> Zr {
        self.with_value(&self.value + &other.value)
    }

    /// Exact difference, not reduced.
    pub fn minus(&self, other: &Zr) -> Zr {
        self.with_value(&self.value - &other.value)
    }

    /// Product reduced into `[0, modulus)`.
    pub fn mul(&self, other: &Zr) -> Zr {
        self.with_value((&self.value * &other.value).mod_floor(&self.field.modulus))
    }

    /// `self^exp mod modulus`. A negative exponent raises the inverse, which
    /// fails when `self` is not invertible.
    pub fn pow_mod(&self, exp: &Zr) -> Result<Zr, BackendError> {
        let modulus = &self.field.modulus;
        let base = if exp.value.is_negative() {
            self.value
                .modinv(modulus)
                .ok_or(BackendError::Math("value has no inverse"))?
        } else {
            self.value.clone()
        };
        Ok(self.with_value(base.modpow(&exp.value.abs(), modulus)))
    }

    /// Reduces in place into `[0, m)`.
    pub fn mod_assign(&mut self, m: &Zr) -> Result<(), BackendError> {
        if m.value.is_zero() {
            return Err(BackendError::Math("reduction modulo zero"));
        }
        self.value = self.value.mod_floor(&m.value.abs());
        Ok(())
    }

    /// Negates in place without reducing.
    pub fn neg_assign(&mut self) {
        self.value = -core::mem::take(&mut self.value);
    }

    /// Replaces `self` with its inverse modulo `m`.
    pub fn inv_mod_assign(&mut self, m: &Zr) -> Result<(), BackendError> {
        if m.value.is_zero() {
            return Err(BackendError::Math("reduction modulo zero"));
        }
        self.value = self
            .value
            .modinv(&m.value.abs())
            .ok_or(BackendError::Math("value has no inverse"))?;
        Ok(())
    }

    /// Replaces `self` with its inverse modulo the field modulus.
    pub fn inv_mod_order(&mut self) -> Result<(), BackendError> {
        self.value = self
            .value
            .modinv(&self.field.modulus)
            .ok_or(BackendError::Math("value has no inverse"))?;
        Ok(())
    }

    /// Residue in `[0, modulus)`.
    pub fn normalized(&self) -> BigUint {
        let reduced = self.value.mod_floor(&self.field.modulus);
        reduced.to_biguint().unwrap_or_default()
    }

    /// Fixed-width big-endian encoding of the residue.
    pub fn bytes(&self) -> Vec<u8> {
        let repr = self.normalized().to_bytes_be();
        let width = self.field.byte_len;
        let mut out = vec![0u8; width];
        if repr != [0] {
            out[width - repr.len()..].copy_from_slice(&repr);
        }
        out
    }

    /// True when both values have the same residue.
    pub fn is_congruent(&self, other: &Zr) -> bool {
        (&self.value - &other.value)
            .mod_floor(&self.field.modulus)
            .is_zero()
    }

    /// Raw value as an `i64`.
    pub fn to_i64(&self) -> Result<i64, BackendError> {
        self.value
            .to_i64()
            .ok_or(BackendError::Math("scalar out of i64 range"))
    }

    fn with_value(&self, value: BigInt) -> Zr {
        Zr {
            value,
            field: Arc::clone(&self.field),
        }
    }
}

impl Clone for Zr {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            field: Arc::clone(&self.field),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.value.clone_from(&source.value);
        if !Arc::ptr_eq(&self.field, &source.field) {
            self.field = Arc::clone(&source.field);
        }
    }
}

impl PartialEq for Zr {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Zr {}

/// Lower-case hexadecimal of the raw value.
impl fmt::Display for Zr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value.to_str_radix(16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const BLS12_381_ORDER: &str =
        "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001";

    fn bls_field() -> Arc<ScalarField> {
        let order = BigUint::parse_bytes(BLS12_381_ORDER.as_bytes(), 16).unwrap();
        ScalarField::new(order, 32).unwrap()
    }

    fn small_field(modulus: u64) -> Arc<ScalarField> {
        ScalarField::new(BigUint::from(modulus), 8).unwrap()
    }

    #[test]
    fn plus_is_exact() {
        let field = bls_field();
        let a = Zr::from_i64(&field, 35);
        let b = Zr::from_i64(&field, 1);
        assert_eq!(a.plus(&b), Zr::from_i64(&field, 36));

        let mut max = Zr::from_i64(&field, i64::MAX);
        let sum = max.plus(&max).plus(&Zr::from_i64(&field, 2));
        assert!(sum.to_i64().is_err());
        max.neg_assign();
        assert_eq!(max.to_i64().unwrap(), -i64::MAX);
    }

    #[test]
    fn mod_reduces() {
        let field = bls_field();
        let mut a = Zr::from_i64(&field, 5);
        a.mod_assign(&Zr::from_i64(&field, 3)).unwrap();
        assert_eq!(a, Zr::from_i64(&field, 2));

        let mut negative = Zr::from_i64(&field, -7);
        negative.mod_assign(&Zr::from_i64(&field, 3)).unwrap();
        assert_eq!(negative, Zr::from_i64(&field, 2));

        assert!(a.mod_assign(&Zr::zero(&field)).is_err());
    }

    #[test]
    fn inverse_modulo_small_prime() {
        let field = bls_field();
        let mut a = Zr::from_i64(&field, 3);
        a.inv_mod_assign(&Zr::from_i64(&field, 11)).unwrap();
        assert_eq!(a, Zr::from_i64(&field, 4));

        let mut b = Zr::from_i64(&field, 6);
        let err = b.inv_mod_assign(&Zr::from_i64(&field, 9)).unwrap_err();
        assert!(err.is_arithmetic());
        assert_eq!(b, Zr::from_i64(&field, 6));
    }

    #[test]
    fn inverse_modulo_order() {
        let field = bls_field();
        let mut rng = StdRng::seed_from_u64(7);
        let r = Zr::random(&field, &mut rng);
        let mut inv = r.clone();
        inv.inv_mod_order().unwrap();
        assert_eq!(r.mul(&inv), Zr::one(&field));

        let mut zero = Zr::zero(&field);
        assert!(zero.inv_mod_order().is_err());
    }

    #[test]
    fn display_is_hex() {
        let field = bls_field();
        assert_eq!(Zr::from_i64(&field, 35).to_string(), "23");
        assert_eq!(Zr::from_i64(&field, -35).to_string(), "-23");
    }

    #[test]
    fn i64_round_trip() {
        let field = bls_field();
        for v in [0, 1, -1, 35, -35, i64::MAX, i64::MIN] {
            assert_eq!(Zr::from_i64(&field, v).to_i64().unwrap(), v);
        }
    }

    #[test]
    fn bytes_are_fixed_width_residues() {
        let field = bls_field();
        let zero = Zr::zero(&field).bytes();
        assert_eq!(zero, vec![0u8; 32]);

        let bytes = Zr::from_i64(&field, 35).bytes();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 35);
        assert_eq!(Zr::from_bytes(&field, &bytes), Zr::from_i64(&field, 35));

        let minus_one = Zr::from_i64(&field, -1);
        let order_bytes = hex::decode(BLS12_381_ORDER).unwrap();
        let mut expected = order_bytes.clone();
        expected[31] -= 1;
        assert_eq!(minus_one.bytes(), expected);

        let wrapped = Zr::from_bytes(&field, &order_bytes).plus(&Zr::from_i64(&field, 5));
        assert_eq!(wrapped.bytes(), Zr::from_i64(&field, 5).bytes());
    }

    #[test]
    fn equality_is_raw_congruence_is_not() {
        let field = small_field(11);
        let a = Zr::from_i64(&field, -1);
        let b = Zr::from_i64(&field, 10);
        assert_ne!(a, b);
        assert!(a.is_congruent(&b));
        assert_eq!(a.bytes(), b.bytes());
    }

    #[test]
    fn pow_mod_commutes_in_the_exponent() {
        let field = bls_field();
        let mut rng = StdRng::seed_from_u64(11);
        let g = Zr::random(&field, &mut rng);
        let a = Zr::random(&field, &mut rng);
        let b = Zr::random(&field, &mut rng);
        let ga = g.pow_mod(&a).unwrap();
        let gb = g.pow_mod(&b).unwrap();
        assert_eq!(ga.pow_mod(&b).unwrap(), gb.pow_mod(&a).unwrap());
    }

    #[test]
    fn fermat_little_theorem() {
        let field = bls_field();
        let mut rng = StdRng::seed_from_u64(13);
        let r = Zr::random(&field, &mut rng);
        let order = Zr::from_bigint(&field, field.modulus().clone());
        let exp = order.minus(&Zr::one(&field));
        assert_eq!(r.pow_mod(&exp).unwrap(), Zr::one(&field));
    }

    #[test]
    fn negative_exponent_inverts() {
        let field = small_field(11);
        let three = Zr::from_i64(&field, 3);
        assert_eq!(three.pow_mod(&Zr::from_i64(&field, -1)).unwrap(), Zr::from_i64(&field, 4));
        assert!(Zr::zero(&field).pow_mod(&Zr::from_i64(&field, -1)).is_err());
    }

    #[test]
    fn random_values_are_reduced_and_spread() {
        let field = small_field(7);
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 7];
        for _ in 0..200 {
            let v = Zr::random(&field, &mut rng).to_i64().unwrap();
            assert!((0..7).contains(&v));
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn clone_from_copies_value_and_field() {
        let bls = bls_field();
        let small = small_field(11);
        let source = Zr::from_i64(&small, 9);
        let mut target = Zr::from_i64(&bls, 123_456);
        target.clone_from(&source);
        assert_eq!(target, source);
        assert!(Arc::ptr_eq(target.field(), &small));
    }

    #[test]
    fn field_rejects_bad_modulus() {
        assert!(ScalarField::new(BigUint::from(1u8), 32).is_err());
        assert!(ScalarField::new(BigUint::from(1u32 << 16), 1).is_err());
    }
}
