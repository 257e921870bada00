//! Driver-generic element wrappers.
//!
//! [`G1`], [`G2`], [`Gt`] and [`MillerLoopOutput`] wrap a driver's native
//! types and accept [`Zr`] scalars directly. All operations return new
//! values; receivers are never mutated. Elements are typed by their driver,
//! so points of different curves or libraries cannot be mixed.

use core::fmt;
use core::ops::{Add, Neg, Sub};

use num_bigint::BigUint;
use num_traits::{Signed, Zero};

use crate::arith::{joint_scalar_mul, Zr};
use crate::backend::{CurvePoint, Driver, TargetGroup};
use crate::errors::BackendError;

/// Reduces a signed scalar into the driver's native field.
pub(crate) fn native_scalar<D: Driver>(zr: &Zr) -> D::Scalar {
    let order = D::order();
    let magnitude: BigUint = zr.value().magnitude() % order;
    if zr.value().is_negative() && !magnitude.is_zero() {
        D::scalar_from_biguint(&(order - magnitude))
    } else {
        D::scalar_from_biguint(&magnitude)
    }
}

macro_rules! group_element {
    ($(#[$doc:meta])* $name:ident, $raw:ident, $what:literal) => {
        $(#[$doc])*
        pub struct $name<D: Driver> {
            inner: D::$raw,
        }

        impl<D: Driver> $name<D> {
            pub fn from_raw(inner: D::$raw) -> Self {
                Self { inner }
            }

            pub fn as_raw(&self) -> &D::$raw {
                &self.inner
            }

            /// Point at infinity.
            pub fn identity() -> Self {
                Self::from_raw(D::$raw::identity())
            }

            pub fn generator() -> Self {
                Self::from_raw(D::$raw::generator())
            }

            pub fn add(&self, other: &Self) -> Self {
                Self::from_raw(self.inner.add(&other.inner))
            }

            pub fn sub(&self, other: &Self) -> Self {
                Self::from_raw(self.inner.sub(&other.inner))
            }

            pub fn neg(&self) -> Self {
                Self::from_raw(self.inner.negate())
            }

            /// `[s]self`, with `s` reduced modulo the group order first.
            pub fn mul(&self, s: &Zr) -> Self {
                Self::from_raw(self.inner.mul_scalar(&native_scalar::<D>(s)))
            }

            /// `[s1]self + [s2]other` in one pass.
            pub fn mul2(&self, s1: &Zr, other: &Self, s2: &Zr) -> Self {
                Self::from_raw(joint_scalar_mul::<D::Scalar, D::$raw>(
                    &self.inner,
                    s1.value(),
                    &other.inner,
                    s2.value(),
                    D::order(),
                ))
            }

            pub fn is_infinity(&self) -> bool {
                self.inner.is_identity()
            }

            /// Canonical uncompressed encoding.
            pub fn bytes(&self) -> Vec<u8> {
                self.inner.to_uncompressed()
            }

            pub fn compressed(&self) -> Vec<u8> {
                self.inner.to_compressed()
            }

            pub fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
                D::$raw::from_uncompressed(bytes).map(Self::from_raw)
            }

            pub fn from_compressed(bytes: &[u8]) -> Result<Self, BackendError> {
                D::$raw::from_compressed(bytes).map(Self::from_raw)
            }
        }

        impl<D: Driver> Clone for $name<D> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<D: Driver> Copy for $name<D> {}

        impl<D: Driver> PartialEq for $name<D> {
            fn eq(&self, other: &Self) -> bool {
                self.inner == other.inner
            }
        }

        impl<D: Driver> Eq for $name<D> {}

        impl<D: Driver> fmt::Debug for $name<D> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple($what).field(&self.inner).finish()
            }
        }

        /// Lower-case hexadecimal of the compressed encoding.
        impl<D: Driver> fmt::Display for $name<D> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.compressed()))
            }
        }

        impl<D: Driver> Add for $name<D> {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                $name::add(&self, &rhs)
            }
        }

        impl<D: Driver> Sub for $name<D> {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                $name::sub(&self, &rhs)
            }
        }

        impl<D: Driver> Neg for $name<D> {
            type Output = Self;

            fn neg(self) -> Self {
                $name::neg(&self)
            }
        }
    };
}

group_element!(
    /// Element of the first source group.
    G1,
    G1,
    "G1"
);

group_element!(
    /// Element of the second source group.
    G2,
    G2,
    "G2"
);

/// Element of the pairing target group, written multiplicatively.
pub struct Gt<D: Driver> {
    inner: D::Target,
}

impl<D: Driver> Gt<D> {
    pub fn from_raw(inner: D::Target) -> Self {
        Self { inner }
    }

    pub fn as_raw(&self) -> &D::Target {
        &self.inner
    }

    pub fn unity() -> Self {
        Self::from_raw(D::Target::identity())
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::from_raw(self.inner.combine(&other.inner))
    }

    pub fn inverse(&self) -> Self {
        Self::from_raw(self.inner.invert())
    }

    /// `self^s`, with `s` reduced modulo the group order first.
    pub fn exp(&self, s: &Zr) -> Self {
        Self::from_raw(self.inner.mul_scalar(&native_scalar::<D>(s)))
    }

    pub fn is_unity(&self) -> bool {
        self.inner.is_identity()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.inner.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        D::Target::from_bytes(bytes).map(Self::from_raw)
    }
}

impl<D: Driver> Clone for Gt<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Driver> Copy for Gt<D> {}

impl<D: Driver> PartialEq for Gt<D> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<D: Driver> Eq for Gt<D> {}

impl<D: Driver> fmt::Debug for Gt<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Gt").field(&self.inner).finish()
    }
}

/// Lower-case hexadecimal of the canonical encoding.
impl<D: Driver> fmt::Display for Gt<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.bytes()))
    }
}

/// Raw output of a Miller loop.
///
/// Not yet a target-group element: it has no canonical encoding and no
/// equality. Products of raw outputs are allowed; anything else needs
/// [`final_exp`](MillerLoopOutput::final_exp) first.
pub struct MillerLoopOutput<D: Driver> {
    inner: D::MillerLoop,
}

impl<D: Driver> MillerLoopOutput<D> {
    pub fn from_raw(inner: D::MillerLoop) -> Self {
        Self { inner }
    }

    pub fn as_raw(&self) -> &D::MillerLoop {
        &self.inner
    }

    pub fn combine(&self, other: &Self) -> Self {
        Self::from_raw(D::combine_miller_loops(&self.inner, &other.inner))
    }

    pub fn final_exp(&self) -> Result<Gt<D>, BackendError> {
        D::final_exponentiation(&self.inner).map(Gt::from_raw)
    }
}

impl<D: Driver> Clone for MillerLoopOutput<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Driver> Copy for MillerLoopOutput<D> {}

impl<D: Driver> fmt::Debug for MillerLoopOutput<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MillerLoopOutput").field(&self.inner).finish()
    }
}
