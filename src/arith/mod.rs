//! Curve-independent arithmetic.
//!
//! - **[`zr`]**: signed arbitrary-precision scalars carrying their modulus
//! - **[`joint`]**: joint scalar multiplication `[a]A + [b]B` (Shamir's trick)
//! - **[`scratch`]**: pooled scratch buffers handed out as scoped checkouts

mod zr;
pub use zr::*;

mod joint;
pub use joint::*;

mod scratch;
pub use scratch::*;
