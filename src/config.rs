//! Configuration types for the re-encryption engine.
//!
//! This module provides the knobs a deployment chooses once at startup:
//! which pairing-friendly curve the build targets, which hash function
//! backs the authenticity layer, and which signature scheme protects
//! encrypted values and transform keys.
//!
//! # Example
//!
//! ```rust
//! use recrypt_engine::{EngineConfig, HashId};
//!
//! let config = EngineConfig::default().with_hash(HashId::Sha256);
//! config.validate().expect("compiled curve is supported");
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{BackendError, Error};

/// Supported pairing-friendly elliptic curves.
///
/// - **BN254**: ~100-bit security, 32-byte base field. The default build.
/// - **BLS12-381**: ~128-bit security, 48-byte base field.
///
/// The curve fixes the width of every canonical encoding, so values
/// produced under one curve never decode under the other.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CurveId {
    /// BN254 curve (~100-bit security)
    Bn254,
    /// BLS12-381 curve (~128-bit security)
    Bls12_381,
}

impl CurveId {
    /// Checks that the backend for this curve is compiled in.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recrypt_engine::CurveId;
    ///
    /// # #[cfg(feature = "ark_bn254")]
    /// assert!(CurveId::Bn254.ensure_supported().is_ok());
    /// ```
    pub fn ensure_supported(&self) -> Result<(), BackendError> {
        match self {
            CurveId::Bn254 => {
                if cfg!(feature = "ark_bn254") {
                    Ok(())
                } else {
                    Err(BackendError::UnsupportedFeature(
                        "compile with `ark_bn254` feature to use BN254",
                    ))
                }
            }
            CurveId::Bls12_381 => {
                if cfg!(feature = "ark_bls12381") {
                    Ok(())
                } else {
                    Err(BackendError::UnsupportedFeature(
                        "compile with `ark_bls12381` feature to use BLS12-381",
                    ))
                }
            }
        }
    }
}

/// Hash functions available to the authenticity layer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum HashId {
    #[default]
    Blake3,
    Sha256,
}

/// Signature schemes available for envelope signing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum SignatureId {
    #[default]
    Ed25519,
}

/// Complete engine configuration.
///
/// # Fields
///
/// - `curve`: must name the curve this build was compiled for
/// - `hash`: hash function used for auth hashes, key derivation and hashing to the curve
/// - `signature`: signature scheme used for envelopes
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub curve: CurveId,
    #[serde(default)]
    pub hash: HashId,
    #[serde(default)]
    pub signature: SignatureId,
}

impl EngineConfig {
    /// Creates and validates a configuration.
    pub fn new(curve: CurveId, hash: HashId, signature: SignatureId) -> Result<Self, Error> {
        let config = Self {
            curve,
            hash,
            signature,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_hash(mut self, hash: HashId) -> Self {
        self.hash = hash;
        self
    }

    /// Validates that the requested curve is the one compiled into this build.
    pub fn validate(&self) -> Result<(), Error> {
        self.curve.ensure_supported().map_err(Error::Backend)?;
        if self.curve != compiled_curve() {
            return Err(Error::InvalidConfig(format!(
                "configured curve {:?} differs from compiled curve {:?}",
                self.curve,
                compiled_curve()
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            curve: compiled_curve(),
            hash: HashId::default(),
            signature: SignatureId::default(),
        }
    }
}

/// The curve selected by the enabled backend feature.
pub fn compiled_curve() -> CurveId {
    <crate::PairingEngine as crate::PairingBackend>::CURVE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hash, HashId::Blake3);
        assert_eq!(config.signature, SignatureId::Ed25519);
    }

    #[test]
    fn mismatched_curve_is_rejected() {
        let other = match compiled_curve() {
            CurveId::Bn254 => CurveId::Bls12_381,
            CurveId::Bls12_381 => CurveId::Bn254,
        };
        let err = EngineConfig::new(other, HashId::Blake3, SignatureId::Ed25519);
        assert!(matches!(
            err,
            Err(Error::Backend(BackendError::UnsupportedFeature(_))) | Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = EngineConfig::default().with_hash(HashId::Sha256);
        let json = serde_json::to_string(&config).expect("serialize");
        let back: EngineConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, back);
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let json = format!("{{\"curve\":\"{:?}\"}}", compiled_curve());
        let config: EngineConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config.hash, HashId::Blake3);
        assert!(config.validate().is_ok());
    }
}
