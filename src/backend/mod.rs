//! Driver trait abstractions.
//!
//! Every supported (library, curve) binding implements the same set of
//! traits so that the generic layers above ([`Curve`](crate::Curve), the
//! element wrappers and the joint multiplication) never depend on a concrete
//! library.
//!
//! - **[`FieldElement`]**: native scalar field of a driver
//! - **[`CurvePoint`]**: G1 / G2 point operations and canonical encodings
//! - **[`TargetGroup`]**: pairing target group (Gt)
//! - **[`Driver`]**: umbrella trait binding the above with the Miller loop and
//!   final exponentiation
//!
//! # Available drivers
//!
//! - **`BlstBls12`** (feature `blst`): BLS12-381 on blstrs
//! - **`ArkBls12`** (feature `ark_bls12381`): BLS12-381 on arkworks
//! - **`ArkBls377`** (feature `ark_bls12377`): BLS12-377 on arkworks
//! - **`ArkBn254`** (feature `ark_bn254`): BN254 on arkworks
//!
//! Drivers of the same curve agree byte for byte on every encoding.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "blst")]
//! # {
//! use bilinear::backend::{BlstBls12, CurvePoint, Driver, FieldElement};
//!
//! type G1 = <BlstBls12 as Driver>::G1;
//! type Scalar = <BlstBls12 as Driver>::Scalar;
//!
//! let two = Scalar::from_u64(2);
//! let p = G1::generator().mul_scalar(&two);
//! assert_eq!(p, G1::generator().double());
//! # }
//! ```

use core::fmt::Debug;

use num_bigint::BigUint;

use crate::config::BackendConfig;
use crate::errors::BackendError;

/// Native scalar field of a driver.
///
/// Scalars of every supported curve fit in 32 bytes; the canonical encoding
/// is the big-endian residue.
pub trait FieldElement: Copy + Clone + PartialEq + Send + Sync + Debug + 'static {
    fn zero() -> Self;

    fn one() -> Self;

    fn from_u64(value: u64) -> Self;

    fn negate(&self) -> Self;

    /// Big-endian canonical encoding.
    fn to_be_bytes(&self) -> [u8; 32];

    /// Parses a big-endian canonical encoding. Values not below the field
    /// order are rejected.
    fn from_be_bytes(bytes: &[u8]) -> Result<Self, BackendError>;
}

/// G1 or G2 element of a driver.
///
/// Points compare by group value, never by coordinate representation.
pub trait CurvePoint<F: FieldElement>:
    Copy + Clone + PartialEq + Send + Sync + Debug + 'static
{
    /// Length of [`to_uncompressed`](CurvePoint::to_uncompressed).
    const UNCOMPRESSED_BYTES: usize;
    /// Length of [`to_compressed`](CurvePoint::to_compressed).
    const COMPRESSED_BYTES: usize;

    /// Returns the point at infinity.
    fn identity() -> Self;

    /// Returns the standard generator.
    fn generator() -> Self;

    fn is_identity(&self) -> bool;

    fn add(&self, other: &Self) -> Self;

    fn sub(&self, other: &Self) -> Self;

    fn negate(&self) -> Self;

    fn double(&self) -> Self;

    fn mul_scalar(&self, scalar: &F) -> Self;

    /// Computes `∑ scalars[i] * points[i]` with the library's native
    /// multi-exponentiation.
    fn multi_scalar_multiplication(points: &[Self], scalars: &[F]) -> Result<Self, BackendError>;

    fn to_uncompressed(&self) -> Vec<u8>;

    fn to_compressed(&self) -> Vec<u8>;

    /// Parses an uncompressed encoding, checking the curve equation and
    /// subgroup membership.
    fn from_uncompressed(bytes: &[u8]) -> Result<Self, BackendError>;

    /// Parses a compressed encoding, checking subgroup membership.
    fn from_compressed(bytes: &[u8]) -> Result<Self, BackendError>;

    /// Deterministic, domain-separated hash onto the prime-order subgroup.
    /// Never returns the identity.
    fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<Self, BackendError>;
}

/// Pairing target group, written multiplicatively.
pub trait TargetGroup: Copy + Clone + PartialEq + Send + Sync + Debug + 'static {
    /// Scalar field type for exponentiation.
    type Scalar: FieldElement;

    /// Length of [`to_bytes`](TargetGroup::to_bytes).
    const BYTES: usize;

    /// Returns the multiplicative identity.
    fn identity() -> Self;

    fn is_identity(&self) -> bool;

    /// Multiplies two target group elements.
    fn combine(&self, other: &Self) -> Self;

    fn invert(&self) -> Self;

    /// Exponentiation by a scalar.
    fn mul_scalar(&self, scalar: &Self::Scalar) -> Self;

    /// Canonical encoding: the twelve base-field coefficients of the tower,
    /// highest first, each big-endian.
    fn to_bytes(&self) -> Vec<u8>;

    /// Parses [`to_bytes`](TargetGroup::to_bytes) output, rejecting
    /// non-canonical coefficients and elements outside the order-r subgroup.
    fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError>;
}

/// A (library, curve) binding.
///
/// Drivers are stateless; every operation is an associated function. The
/// raw pairing output ([`Driver::MillerLoop`]) is deliberately a separate
/// type from [`Driver::Target`]: it has no group semantics until it passes
/// through [`Driver::final_exponentiation`].
pub trait Driver: Copy + Clone + Default + Debug + Send + Sync + 'static {
    type Scalar: FieldElement;
    type G1: CurvePoint<Self::Scalar>;
    type G2: CurvePoint<Self::Scalar>;
    type Target: TargetGroup<Scalar = Self::Scalar>;
    type MillerLoop: Copy + Clone + Debug + Send + Sync + 'static;

    /// Registry key of this driver.
    const CONFIG: BackendConfig;
    /// Size of one base-field coordinate in bytes.
    const COORDINATE_BYTES: usize;

    /// Order of the prime-order groups (and modulus of [`Driver::Scalar`]).
    fn order() -> &'static BigUint;

    /// Raw Miller loop of `e(g1, g2)`.
    fn miller_loop(g2: &Self::G2, g1: &Self::G1) -> Self::MillerLoop;

    /// One shared Miller loop over all pairs.
    fn multi_miller_loop(
        g2: &[Self::G2],
        g1: &[Self::G1],
    ) -> Result<Self::MillerLoop, BackendError>;

    /// Product of two raw Miller-loop outputs.
    fn combine_miller_loops(a: &Self::MillerLoop, b: &Self::MillerLoop) -> Self::MillerLoop;

    fn final_exponentiation(f: &Self::MillerLoop) -> Result<Self::Target, BackendError>;

    /// Miller loop of `e(p1a, p2a) · e(p1b, p2b)` sharing one loop.
    fn miller_loop2(
        p2a: &Self::G2,
        p1a: &Self::G1,
        p2b: &Self::G2,
        p1b: &Self::G1,
    ) -> Self::MillerLoop {
        Self::combine_miller_loops(&Self::miller_loop(p2a, p1a), &Self::miller_loop(p2b, p1b))
    }

    /// Reduces an unsigned integer into the native scalar field.
    fn scalar_from_biguint(value: &BigUint) -> Self::Scalar {
        let reduced = if value < Self::order() {
            value.to_bytes_be()
        } else {
            (value % Self::order()).to_bytes_be()
        };
        let mut bytes = [0u8; 32];
        bytes[32 - reduced.len()..].copy_from_slice(&reduced);
        Self::Scalar::from_be_bytes(&bytes).expect("reduced scalar is canonical")
    }
}

/// Recovers the field order from the encoding of `-1`.
pub(crate) fn field_order<F: FieldElement>() -> BigUint {
    BigUint::from_bytes_be(&F::one().negate().to_be_bytes()) + 1u32
}

/// Checks an input slice against the expected encoding length.
pub(crate) fn expect_len(
    what: &'static str,
    bytes: &[u8],
    expected: usize,
) -> Result<(), BackendError> {
    if bytes.len() != expected {
        return Err(BackendError::InvalidLength {
            what,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

#[cfg(any(feature = "ark_bls12381", feature = "ark_bls12377", feature = "ark_bn254"))]
mod ark_common {
    use ark_ec::{
        pairing::{Pairing, PairingOutput},
        short_weierstrass::{Affine, SWCurveConfig},
        AffineRepr, PrimeGroup,
    };
    use ark_ff::{BigInteger, Field, PrimeField};
    use ark_serialize::CanonicalSerialize;
    use ark_std::Zero;
    use sha2::{Digest, Sha256};
    use tracing::trace;

    use super::expect_len;
    use crate::errors::BackendError;

    const MAX_HASH_ATTEMPTS: u8 = u8::MAX;

    pub(crate) fn serialize<T: CanonicalSerialize>(value: &T, compressed: bool) -> Vec<u8> {
        let mut bytes = Vec::new();
        let written = if compressed {
            value.serialize_compressed(&mut bytes)
        } else {
            value.serialize_uncompressed(&mut bytes)
        };
        written.expect("point serialization");
        bytes
    }

    /// Derives a base-field element and a sign bit from
    /// `SHA-256(len(dst) ‖ dst ‖ msg ‖ counter ‖ index)`, using two digests to
    /// keep the modular bias negligible.
    pub(crate) fn hash_to_base<F: PrimeField>(
        msg: &[u8],
        dst: &[u8],
        counter: u8,
        index: u8,
    ) -> (F, bool) {
        let mut wide = [0u8; 64];
        for (half, chunk) in wide.chunks_exact_mut(32).enumerate() {
            let digest = Sha256::new()
                .chain_update((dst.len() as u64).to_be_bytes())
                .chain_update(dst)
                .chain_update(msg)
                .chain_update([counter, index, half as u8])
                .finalize();
            chunk.copy_from_slice(&digest);
        }
        (F::from_be_bytes_mod_order(&wide), wide[0] & 1 == 1)
    }

    /// Try-and-increment: the first candidate abscissa that lands on the
    /// curve is lifted, then multiplied into the prime-order subgroup.
    pub(crate) fn try_and_increment<P: SWCurveConfig>(
        group: &'static str,
        mut candidate: impl FnMut(u8) -> (P::BaseField, bool),
    ) -> Result<Affine<P>, BackendError> {
        for counter in 0..MAX_HASH_ATTEMPTS {
            let (x, greatest) = candidate(counter);
            if let Some(point) = Affine::<P>::get_point_from_x_unchecked(x, greatest) {
                let point = point.clear_cofactor();
                if !point.is_zero() {
                    return Ok(point);
                }
            }
            trace!(counter, group, "hash candidate rejected");
        }
        Err(BackendError::HashToGroup("no curve point found"))
    }

    pub(crate) fn scalar_to_be_bytes<F: PrimeField>(value: &F) -> [u8; 32] {
        let repr = value.into_bigint().to_bytes_be();
        let mut bytes = [0u8; 32];
        bytes[32 - repr.len()..].copy_from_slice(&repr);
        bytes
    }

    pub(crate) fn scalar_from_be_bytes<F: PrimeField>(bytes: &[u8]) -> Result<F, BackendError> {
        expect_len("scalar", bytes, 32)?;
        let value = F::from_be_bytes_mod_order(bytes);
        if scalar_to_be_bytes(&value) != bytes {
            return Err(BackendError::Decoding("scalar is not reduced"));
        }
        Ok(value)
    }

    /// Tower coefficients of a target-group element, highest first,
    /// big-endian, `coordinate` bytes each.
    pub(crate) fn target_to_bytes<E: Pairing>(value: &PairingOutput<E>, coordinate: usize) -> Vec<u8> {
        let coeffs: Vec<_> = value.0.to_base_prime_field_elements().collect();
        let mut bytes = Vec::with_capacity(coeffs.len() * coordinate);
        for coeff in coeffs.iter().rev() {
            let repr = coeff.into_bigint().to_bytes_be();
            bytes.extend_from_slice(&repr[repr.len() - coordinate..]);
        }
        bytes
    }

    pub(crate) fn target_from_bytes<E: Pairing>(
        bytes: &[u8],
        coordinate: usize,
    ) -> Result<PairingOutput<E>, BackendError> {
        let degree = <E::TargetField as Field>::extension_degree() as usize;
        expect_len("gt", bytes, degree * coordinate)?;
        let mut coeffs = Vec::with_capacity(degree);
        for chunk in bytes.chunks_exact(coordinate).rev() {
            let coeff = <<E::TargetField as Field>::BasePrimeField as PrimeField>::from_be_bytes_mod_order(chunk);
            let repr = coeff.into_bigint().to_bytes_be();
            if repr[repr.len() - coordinate..] != *chunk {
                return Err(BackendError::Decoding("gt coefficient is not reduced"));
            }
            coeffs.push(coeff);
        }
        let value = <E::TargetField as Field>::from_base_prime_field_elems(coeffs)
            .ok_or(BackendError::Decoding("gt coefficient count"))?;
        let element = PairingOutput::<E>(value);
        if value.is_zero() || !element.mul_bigint(<E::ScalarField as PrimeField>::MODULUS).is_zero() {
            return Err(BackendError::Decoding("gt element outside the order-r subgroup"));
        }
        Ok(element)
    }
}

#[cfg(any(feature = "ark_bls12381", feature = "ark_bls12377", feature = "ark_bn254"))]
pub(crate) use ark_common::*;

#[cfg(feature = "ark_bls12377")]
mod ark_bls12_377;
#[cfg(feature = "ark_bls12381")]
mod ark_bls12_381;
#[cfg(feature = "ark_bn254")]
mod ark_bn254;
#[cfg(feature = "blst")]
mod blst_bls12_381;

#[cfg(feature = "ark_bls12377")]
pub use ark_bls12_377::*;
#[cfg(feature = "ark_bls12381")]
pub use ark_bls12_381::*;
#[cfg(feature = "ark_bn254")]
pub use ark_bn254::*;
#[cfg(feature = "blst")]
pub use blst_bls12_381::*;
