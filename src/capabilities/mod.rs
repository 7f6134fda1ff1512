//! Injected capabilities: randomness, hashing and envelope signatures.
//!
//! The engine never reaches for global state. Everything that touches the
//! outside world or that a deployment may want to swap is passed in once,
//! at construction, as a [`Capabilities`] record:
//!
//! - [`RandomBytes`]: the entropy source behind every ephemeral scalar
//! - [`HashFunction`]: a 32-byte hash used for auth hashes, key derivation
//!   and hashing onto the scalar field
//! - [`SignatureScheme`]: signs and verifies the canonical encodings of
//!   encrypted values and transform keys
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use recrypt_engine::capabilities::{Capabilities, SeededRandom};
//!
//! let caps = Capabilities::default().with_random(Arc::new(SeededRandom::from_seed(42)));
//! let mut bytes = [0u8; 16];
//! caps.random.fill_bytes(&mut bytes).expect("seeded source never fails");
//! ```

use std::fmt::{self, Debug};
use std::sync::Arc;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{EngineConfig, HashId, SignatureId};
use crate::errors::Error;

mod ed25519;
mod hash;
mod random;

pub use ed25519::{Ed25519Signer, generate_signing_key_pair};
pub use hash::{Blake3Hash, Sha256Hash};
pub use random::{OsRandom, SeededRandom};

/// Width of every digest produced by a [`HashFunction`].
pub const HASH_BYTES: usize = 32;

/// Source of cryptographically secure random bytes.
pub trait RandomBytes: Debug + Send + Sync {
    /// Fills `dest` completely or reports why it could not.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), Error>;
}

/// Deterministic 32-byte hash function.
pub trait HashFunction: Debug + Send + Sync {
    fn hash(&self, data: &[u8]) -> [u8; HASH_BYTES];

    /// Hashes the concatenation of `parts` without allocating the joined buffer
    /// when the implementation supports incremental input.
    fn hash_parts(&self, parts: &[&[u8]]) -> [u8; HASH_BYTES] {
        self.hash(&parts.concat())
    }
}

/// Signature scheme protecting encrypted values and transform keys.
pub trait SignatureScheme: Debug + Send + Sync {
    fn sign(&self, key: &PrivateSigningKey, message: &[u8]) -> Result<Signature, Error>;

    fn verify(&self, key: &PublicSigningKey, message: &[u8], signature: &Signature) -> bool;

    /// Public half of `key`.
    fn public_key(&self, key: &PrivateSigningKey) -> PublicSigningKey;

    /// Generates a signing key pair from a 32-byte seed drawn from `random`.
    fn generate_key_pair(&self, random: &dyn RandomBytes) -> Result<SigningKeyPair, Error> {
        let mut seed = [0u8; 32];
        random.fill_bytes(&mut seed)?;
        let private = PrivateSigningKey::from_bytes(seed);
        seed.zeroize();
        Ok(SigningKeyPair {
            public: self.public_key(&private),
            private,
        })
    }
}

/// 32-byte public verification key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicSigningKey(pub [u8; 32]);

impl PublicSigningKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Debug for PublicSigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicSigningKey(")?;
        for b in &self.0[..4] {
            write!(f, "{b:02x}")?;
        }
        write!(f, "..)")
    }
}

/// 32-byte private signing seed. Wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateSigningKey(pub(crate) [u8; 32]);

impl PrivateSigningKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Debug for PrivateSigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateSigningKey(<redacted>)")
    }
}

/// 64-byte envelope signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(")?;
        for b in &self.0[..4] {
            write!(f, "{b:02x}")?;
        }
        write!(f, "..)")
    }
}

/// A signing key together with its verification key.
#[derive(Clone, Debug)]
pub struct SigningKeyPair {
    pub public: PublicSigningKey,
    pub private: PrivateSigningKey,
}

/// Capability record handed to the engine at construction.
#[derive(Clone, Debug)]
pub struct Capabilities {
    pub random: Arc<dyn RandomBytes>,
    pub hash: Arc<dyn HashFunction>,
    pub signer: Arc<dyn SignatureScheme>,
}

impl Capabilities {
    pub fn new(
        random: Arc<dyn RandomBytes>,
        hash: Arc<dyn HashFunction>,
        signer: Arc<dyn SignatureScheme>,
    ) -> Self {
        Self {
            random,
            hash,
            signer,
        }
    }

    /// Builds the default capability set named by a validated configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self, Error> {
        config.validate()?;
        let hash: Arc<dyn HashFunction> = match config.hash {
            HashId::Blake3 => Arc::new(Blake3Hash),
            HashId::Sha256 => Arc::new(Sha256Hash),
        };
        let signer: Arc<dyn SignatureScheme> = match config.signature {
            SignatureId::Ed25519 => Arc::new(Ed25519Signer),
        };
        Ok(Self::new(Arc::new(OsRandom), hash, signer))
    }

    pub fn with_random(mut self, random: Arc<dyn RandomBytes>) -> Self {
        self.random = random;
        self
    }

    pub fn with_hash(mut self, hash: Arc<dyn HashFunction>) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn SignatureScheme>) -> Self {
        self.signer = signer;
        self
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::new(Arc::new(OsRandom), Arc::new(Blake3Hash), Arc::new(Ed25519Signer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_selects_hash() {
        let config = EngineConfig::default().with_hash(HashId::Sha256);
        let caps = Capabilities::from_config(&config).expect("valid config");
        assert_eq!(caps.hash.hash(b"abc"), Sha256Hash.hash(b"abc"));
        assert_ne!(caps.hash.hash(b"abc"), Blake3Hash.hash(b"abc"));
    }

    #[test]
    fn private_signing_key_debug_is_redacted() {
        let key = PrivateSigningKey::from_bytes([7u8; 32]);
        assert_eq!(format!("{key:?}"), "PrivateSigningKey(<redacted>)");
    }
}
