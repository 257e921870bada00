//! # bilinear: interchangeable pairing-curve drivers
//!
//! `bilinear` exposes pairing-friendly elliptic-curve arithmetic through one
//! interface: a scalar type [`Zr`] with signed big-integer semantics, the
//! source groups [`G1`] and [`G2`], the target group [`Gt`] and a bilinear
//! pairing between them. Each (library, curve) binding is a [`Driver`];
//! several drivers of the same curve can be swapped freely because they
//! agree byte for byte on every encoding.
//!
//! ## Architecture
//!
//! - **[`backend`]**: the driver contract ([`FieldElement`], [`CurvePoint`],
//!   [`TargetGroup`], [`Driver`]) and one module per library.
//! - **[`arith`]**: curve-independent arithmetic. Signed scalars ([`Zr`]),
//!   the joint multiplication `[a]A + [b]B` ([`joint_scalar_mul`]) and the
//!   scratch pool used by the modular helpers.
//! - **[`elements`]**: driver-typed wrappers [`G1`], [`G2`], [`Gt`] and the
//!   raw [`MillerLoopOutput`].
//! - **[`curve`]**: the [`Curve`] façade with cached generators, byte sizes,
//!   constructors, hashing, pairing and modular arithmetic.
//! - **[`registry`]**: the process-wide [`Registry`] of compiled-in curves.
//! - **[`config`]**: [`CurveId`], [`BackendId`] and [`BackendConfig`].
//! - **[`errors`]**: [`BackendError`] and [`Error`].
//!
//! ## Quick example
//!
//! ```rust,no_run
//! # #[cfg(feature = "blst")]
//! # fn main() -> Result<(), bilinear::Error> {
//! use bilinear::{BlstBls12, RegisteredDriver};
//!
//! let curve = BlstBls12::curve();
//! let mut rng = curve.rng();
//! let a = curve.new_random_zr(&mut rng);
//! let b = curve.new_random_zr(&mut rng);
//!
//! let p = curve.gen_g1().mul(&a);
//! let q = curve.gen_g2().mul(&b);
//! let e = curve.final_exp(&curve.pairing(&q, &p))?;
//! assert_eq!(e, curve.gen_gt().exp(&a.mul(&b)));
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "blst"))]
//! # fn main() {}
//! ```
//!
//! ## Scalars
//!
//! [`Zr`] values are not kept reduced. `plus` and `minus` are exact,
//! `mul` and `pow_mod` reduce, and `==` compares raw integers. Encodings and
//! group operations always reduce first, so `-1` and `order - 1` serialize
//! identically and act identically on points.
//!
//! ## Feature flags
//!
//! - **`blst`**: blstrs driver for BLS12-381
//! - **`ark_bls12381`**: arkworks driver for BLS12-381
//! - **`ark_bls12377`**: arkworks driver for BLS12-377
//! - **`ark_bn254`**: arkworks driver for BN254
//!
//! All four are enabled by default.

pub mod arith;
pub mod backend;
pub mod config;
pub mod curve;
pub mod elements;
pub mod errors;
pub mod registry;

pub use arith::*;
pub use backend::*;
pub use config::*;
pub use curve::*;
pub use elements::*;
pub use errors::*;
pub use registry::*;
