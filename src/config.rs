//! Curve and backend selection.
//!
//! A [`BackendConfig`] names one (library, curve) binding. The same curve may
//! be served by several libraries; every binding of a curve produces
//! byte-identical encodings, so a configuration can be switched without
//! touching stored data.
//!
//! Configurations have stable textual identifiers of the form
//! `CURVE/backend`, for example `BLS12_381/blst`.
//!
//! # Example
//!
//! ```rust
//! use bilinear::{BackendConfig, BackendId, CurveId};
//!
//! let config: BackendConfig = "BLS12_381/arkworks".parse().expect("known id");
//! assert_eq!(config, BackendConfig::new(BackendId::Arkworks, CurveId::Bls12_381));
//! assert_eq!(config.to_string(), "BLS12_381/arkworks");
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{BackendError, Error};

/// Supported pairing-friendly elliptic curves.
///
/// - **BLS12-381**: ~128-bit security. Served by both arkworks and blstrs.
/// - **BLS12-377**: ~128-bit security. Served by arkworks only.
/// - **BN254**: ~100-bit security. Served by arkworks only.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CurveId {
    /// BN254 curve (~100-bit security)
    Bn254,
    /// BLS12-381 curve (~128-bit security)
    Bls12_381,
    /// BLS12-377 curve (~128-bit security)
    Bls12_377,
}

impl CurveId {
    /// Stable identifier used in registry keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            CurveId::Bn254 => "BN254",
            CurveId::Bls12_381 => "BLS12_381",
            CurveId::Bls12_377 => "BLS12_377",
        }
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BN254" => Ok(CurveId::Bn254),
            "BLS12_381" => Ok(CurveId::Bls12_381),
            "BLS12_377" => Ok(CurveId::Bls12_377),
            other => Err(Error::InvalidConfig(format!("unknown curve `{other}`"))),
        }
    }
}

/// Backend libraries.
///
/// Backend support is controlled via Cargo features:
/// - `ark_bls12381`: arkworks with BLS12-381
/// - `ark_bls12377`: arkworks with BLS12-377
/// - `ark_bn254`: arkworks with BN254
/// - `blst`: blstrs with BLS12-381
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum BackendId {
    /// arkworks (pure Rust, BLS12-381, BLS12-377 and BN254)
    Arkworks,
    /// blstrs (assembly-optimized, BLS12-381 only)
    Blst,
}

impl BackendId {
    pub const fn as_str(self) -> &'static str {
        match self {
            BackendId::Arkworks => "arkworks",
            BackendId::Blst => "blst",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arkworks" => Ok(BackendId::Arkworks),
            "blst" => Ok(BackendId::Blst),
            other => Err(Error::InvalidConfig(format!("unknown backend `{other}`"))),
        }
    }
}

/// Backend and curve binding.
///
/// Not all combinations exist; use
/// [`ensure_supported`](BackendConfig::ensure_supported) to validate.
///
/// | Backend    | BLS12-381 | BLS12-377 | BN254 |
/// |------------|-----------|-----------|-------|
/// | arkworks   | ✓         | ✓         | ✓     |
/// | blst       | ✓         | ✗         | ✗     |
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BackendConfig {
    /// The library providing the arithmetic
    pub backend: BackendId,
    /// The pairing-friendly curve
    pub curve: CurveId,
}

impl BackendConfig {
    pub const fn new(backend: BackendId, curve: CurveId) -> Self {
        Self { backend, curve }
    }

    /// Validates that this backend/curve combination exists and that its
    /// feature flag was enabled at compile time.
    ///
    /// ```rust
    /// use bilinear::{BackendConfig, BackendId, CurveId};
    ///
    /// let config = BackendConfig::new(BackendId::Blst, CurveId::Bn254);
    /// assert!(config.ensure_supported().is_err());
    /// ```
    pub fn ensure_supported(&self) -> Result<(), BackendError> {
        match (self.backend, self.curve) {
            (BackendId::Arkworks, CurveId::Bls12_381) => {
                if cfg!(feature = "ark_bls12381") {
                    Ok(())
                } else {
                    Err(BackendError::UnsupportedFeature(
                        "compile with `ark_bls12381` feature to use arkworks BLS12-381",
                    ))
                }
            }
            (BackendId::Arkworks, CurveId::Bls12_377) => {
                if cfg!(feature = "ark_bls12377") {
                    Ok(())
                } else {
                    Err(BackendError::UnsupportedFeature(
                        "compile with `ark_bls12377` feature to use arkworks BLS12-377",
                    ))
                }
            }
            (BackendId::Arkworks, CurveId::Bn254) => {
                if cfg!(feature = "ark_bn254") {
                    Ok(())
                } else {
                    Err(BackendError::UnsupportedFeature(
                        "compile with `ark_bn254` feature to use arkworks BN254",
                    ))
                }
            }
            (BackendId::Blst, CurveId::Bls12_381) => {
                if cfg!(feature = "blst") {
                    Ok(())
                } else {
                    Err(BackendError::UnsupportedFeature(
                        "compile with `blst` feature to use the blstrs backend",
                    ))
                }
            }
            (BackendId::Blst, CurveId::Bn254) => Err(BackendError::UnsupportedCurve(
                "bn254 is not provided by the blstrs backend",
            )),
            (BackendId::Blst, CurveId::Bls12_377) => Err(BackendError::UnsupportedCurve(
                "bls12-377 is not provided by the blstrs backend",
            )),
        }
    }
}

impl fmt::Display for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.curve, self.backend)
    }
}

impl FromStr for BackendConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (curve, backend) = s
            .split_once('/')
            .ok_or_else(|| Error::InvalidConfig(format!("expected CURVE/backend, got `{s}`")))?;
        Ok(BackendConfig::new(backend.parse()?, curve.parse()?))
    }
}
