//! Error types for the crate.
//!
//! Drivers and the scalar layer report [`BackendError`]; the curve façade and
//! the registry report [`Error`], which wraps backend failures. Decoding
//! failures and arithmetic-domain failures are separate variants so callers
//! can tell malformed input apart from a mathematically undefined request.
//!
//! # Examples
//!
//! ```rust
//! use bilinear::errors::BackendError;
//!
//! let err = BackendError::InvalidLength { what: "g1", expected: 96, actual: 3 };
//! assert!(err.is_decoding());
//! ```

use thiserror::Error;

/// Errors raised by drivers and by scalar arithmetic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("unsupported curve: {0}")]
    UnsupportedCurve(&'static str),
    #[error("unsupported backend feature: {0}")]
    UnsupportedFeature(&'static str),
    #[error("decoding failure: {0}")]
    Decoding(&'static str),
    #[error("invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("math error: {0}")]
    Math(&'static str),
    #[error("hash to group failed: {0}")]
    HashToGroup(&'static str),
}

impl BackendError {
    /// True for failures caused by malformed encodings.
    pub fn is_decoding(&self) -> bool {
        matches!(
            self,
            BackendError::Decoding(_) | BackendError::InvalidLength { .. }
        )
    }

    /// True for requests that have no mathematical answer (non-invertible
    /// values, empty domains, out-of-range conversions).
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BackendError::Math(_) | BackendError::HashToGroup(_))
    }
}

/// High-level errors returned by the curve façade and the registry.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

impl Error {
    /// Returns the wrapped backend error, if any.
    pub fn backend(&self) -> Option<&BackendError> {
        match self {
            Error::Backend(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_and_arithmetic_are_disjoint() {
        let decoding = [
            BackendError::Decoding("not on curve"),
            BackendError::InvalidLength {
                what: "scalar",
                expected: 32,
                actual: 0,
            },
        ];
        for err in &decoding {
            assert!(err.is_decoding());
            assert!(!err.is_arithmetic());
        }
        let math = BackendError::Math("no inverse");
        assert!(math.is_arithmetic());
        assert!(!math.is_decoding());
    }

    #[test]
    fn backend_error_converts_into_error() {
        let err: Error = BackendError::Math("no inverse").into();
        assert_eq!(err.backend(), Some(&BackendError::Math("no inverse")));
        assert_eq!(err.to_string(), "backend error: math error: no inverse");
    }

    #[test]
    fn every_facade_error_carries_a_cause() {
        let errors = [
            Error::InvalidConfig("unknown curve `X`".into()),
            Error::Backend(BackendError::Decoding("not on curve")),
            Error::LengthMismatch { left: 1, right: 2 },
        ];
        for err in &errors {
            let recognized = match err {
                Error::InvalidConfig(msg) => !msg.is_empty(),
                Error::Backend(inner) => inner.is_decoding() || inner.is_arithmetic(),
                Error::LengthMismatch { left, right } => left != right,
            };
            assert!(recognized, "{err}");
        }
    }
}
