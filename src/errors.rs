//! Error types for the crate.
//!
//! This module defines low-level backend errors returned by the curve
//! backends (arkworks BN254, arkworks BLS12-381) as well as the
//! engine-facing `Error` type returned by every re-encryption operation.
//!
//! The errors are implemented with `thiserror` so they are easy to convert
//! and debug in higher-level code. No operation in this crate retries on
//! failure; every error reaches the caller unchanged.
//!
//! # Examples
//!
//! ```rust
//! use recrypt_engine::errors::Error;
//!
//! let err = Error::AuthenticationFailure("signature mismatch");
//! assert!(err.is_authentication_failure());
//! ```

use thiserror::Error;

/// Errors bubbled up from backend implementations.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("unsupported backend feature: {0}")]
    UnsupportedFeature(&'static str),
    #[error("serialization failure: {0}")]
    Serialization(&'static str),
}

/// High-level errors returned by the re-encryption API.
#[derive(Debug, Error)]
pub enum Error {
    /// The injected random source failed or kept producing unusable bytes.
    #[error("random source failure: {0}")]
    RandomSourceFailure(String),
    /// A scalar or point failed range, identity or curve-membership checks.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// A signature or auth hash did not verify.
    #[error("authentication failure: {0}")]
    AuthenticationFailure(&'static str),
    /// Malformed byte input handed to a decode operation.
    #[error("encoding failure: {0}")]
    EncodingFailure(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A deferred job never produced a result (worker panic or lost channel).
    #[error("worker failure: {0}")]
    WorkerFailure(String),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Error::AuthenticationFailure(_))
    }

    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Error::InvalidKey(_))
    }

    pub(crate) fn encoding(err: BackendError) -> Self {
        Error::EncodingFailure(err.to_string())
    }
}
