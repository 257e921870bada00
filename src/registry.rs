//! Process-wide table of curves.
//!
//! The registry holds one [`Curve`] per compiled-in driver. It is built on
//! first use and never changes afterwards, so lookups need no locking.
//! Typed access goes through [`RegisteredDriver::curve`]; lookups by
//! [`BackendConfig`] or by textual identifier return a [`CurveRef`].

use std::sync::OnceLock;

use tracing::{debug, instrument};

use crate::backend::Driver;
use crate::config::BackendConfig;
use crate::curve::Curve;
use crate::errors::Error;

#[cfg(feature = "ark_bls12381")]
use crate::backend::ArkBls12;
#[cfg(feature = "ark_bls12377")]
use crate::backend::ArkBls377;
#[cfg(feature = "ark_bn254")]
use crate::backend::ArkBn254;
#[cfg(feature = "blst")]
use crate::backend::BlstBls12;

pub struct Registry {
    #[cfg(feature = "blst")]
    blst_bls12: Curve<BlstBls12>,
    #[cfg(feature = "ark_bls12381")]
    ark_bls12: Curve<ArkBls12>,
    #[cfg(feature = "ark_bls12377")]
    ark_bls377: Curve<ArkBls377>,
    #[cfg(feature = "ark_bn254")]
    ark_bn254: Curve<ArkBn254>,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn build<D: Driver>() -> Curve<D> {
    Curve::new().expect("compiled-in drivers are supported")
}

impl Registry {
    /// The shared registry, built on first call.
    pub fn global() -> &'static Registry {
        REGISTRY.get_or_init(Registry::init)
    }

    #[instrument(level = "debug")]
    fn init() -> Registry {
        let registry = Registry {
            #[cfg(feature = "blst")]
            blst_bls12: build(),
            #[cfg(feature = "ark_bls12381")]
            ark_bls12: build(),
            #[cfg(feature = "ark_bls12377")]
            ark_bls377: build(),
            #[cfg(feature = "ark_bn254")]
            ark_bn254: build(),
        };
        debug!(curves = registry.configs().len(), "curve registry ready");
        registry
    }

    /// Every configuration served by this build.
    pub fn configs(&self) -> Vec<BackendConfig> {
        #[allow(unused_mut)]
        let mut configs = Vec::new();
        #[cfg(feature = "blst")]
        configs.push(BlstBls12::CONFIG);
        #[cfg(feature = "ark_bls12381")]
        configs.push(ArkBls12::CONFIG);
        #[cfg(feature = "ark_bls12377")]
        configs.push(ArkBls377::CONFIG);
        #[cfg(feature = "ark_bn254")]
        configs.push(ArkBn254::CONFIG);
        configs
    }

    pub fn lookup(&'static self, config: BackendConfig) -> Result<CurveRef, Error> {
        config.ensure_supported()?;
        match config {
            #[cfg(feature = "blst")]
            c if c == BlstBls12::CONFIG => Ok(CurveRef::BlstBls12(&self.blst_bls12)),
            #[cfg(feature = "ark_bls12381")]
            c if c == ArkBls12::CONFIG => Ok(CurveRef::ArkBls12(&self.ark_bls12)),
            #[cfg(feature = "ark_bls12377")]
            c if c == ArkBls377::CONFIG => Ok(CurveRef::ArkBls377(&self.ark_bls377)),
            #[cfg(feature = "ark_bn254")]
            c if c == ArkBn254::CONFIG => Ok(CurveRef::ArkBn254(&self.ark_bn254)),
            other => Err(Error::InvalidConfig(format!("no curve registered for {other}"))),
        }
    }

    /// Looks up a curve by identifier such as `"BN254/arkworks"`.
    pub fn get(&'static self, id: &str) -> Result<CurveRef, Error> {
        self.lookup(id.parse()?)
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("configs", &self.configs())
            .finish()
    }
}

/// A registered curve whose driver is chosen at run time.
#[derive(Clone, Copy, Debug)]
pub enum CurveRef {
    #[cfg(feature = "blst")]
    BlstBls12(&'static Curve<BlstBls12>),
    #[cfg(feature = "ark_bls12381")]
    ArkBls12(&'static Curve<ArkBls12>),
    #[cfg(feature = "ark_bls12377")]
    ArkBls377(&'static Curve<ArkBls377>),
    #[cfg(feature = "ark_bn254")]
    ArkBn254(&'static Curve<ArkBn254>),
}

macro_rules! dispatch {
    ($self:ident, $curve:ident => $body:expr) => {
        match *$self {
            #[cfg(feature = "blst")]
            CurveRef::BlstBls12($curve) => $body,
            #[cfg(feature = "ark_bls12381")]
            CurveRef::ArkBls12($curve) => $body,
            #[cfg(feature = "ark_bls12377")]
            CurveRef::ArkBls377($curve) => $body,
            #[cfg(feature = "ark_bn254")]
            CurveRef::ArkBn254($curve) => $body,
        }
    };
}

impl CurveRef {
    pub fn config(&self) -> BackendConfig {
        dispatch!(self, c => c.config())
    }

    pub fn coordinate_byte_size(&self) -> usize {
        dispatch!(self, c => c.coordinate_byte_size())
    }

    pub fn g1_byte_size(&self) -> usize {
        dispatch!(self, c => c.g1_byte_size())
    }

    pub fn compressed_g1_byte_size(&self) -> usize {
        dispatch!(self, c => c.compressed_g1_byte_size())
    }

    pub fn g2_byte_size(&self) -> usize {
        dispatch!(self, c => c.g2_byte_size())
    }

    pub fn compressed_g2_byte_size(&self) -> usize {
        dispatch!(self, c => c.compressed_g2_byte_size())
    }

    pub fn gt_byte_size(&self) -> usize {
        dispatch!(self, c => c.gt_byte_size())
    }

    pub fn scalar_byte_size(&self) -> usize {
        dispatch!(self, c => c.scalar_byte_size())
    }

    /// Encoded generators `(G1, G2, Gt)`.
    pub fn generator_bytes(&self) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        dispatch!(self, c => (c.gen_g1().bytes(), c.gen_g2().bytes(), c.gen_gt().bytes()))
    }
}

/// Drivers with a slot in the global registry.
pub trait RegisteredDriver: Driver {
    fn curve() -> &'static Curve<Self>;
}

#[cfg(feature = "blst")]
impl RegisteredDriver for BlstBls12 {
    fn curve() -> &'static Curve<Self> {
        &Registry::global().blst_bls12
    }
}

#[cfg(feature = "ark_bls12381")]
impl RegisteredDriver for ArkBls12 {
    fn curve() -> &'static Curve<Self> {
        &Registry::global().ark_bls12
    }
}

#[cfg(feature = "ark_bls12377")]
impl RegisteredDriver for ArkBls377 {
    fn curve() -> &'static Curve<Self> {
        &Registry::global().ark_bls377
    }
}

#[cfg(feature = "ark_bn254")]
impl RegisteredDriver for ArkBn254 {
    fn curve() -> &'static Curve<Self> {
        &Registry::global().ark_bn254
    }
}
