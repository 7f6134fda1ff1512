//! Multi-hop transform (proxy re-encryption) protocol.
//!
//! A data owner encrypts a [`Plaintext`] (a random pairing target group
//! element whose hash seeds a symmetric key) once under their own public
//! key. A [`TransformKey`] later lets an untrusted proxy convert that
//! [`EncryptedValue`] so that another party can decrypt it, without the
//! proxy learning the plaintext or either private key. Transforms chain:
//! group → user → device appends one [`TransformBlock`] per hop and the
//! final key holder unwinds the whole chain in a single decrypt.
//!
//! # Protocol Overview
//!
//! 1. **Key Generation** ([`TransformEncryption::generate_key_pair`]): a
//!    non-zero scalar `a` and its public key `A = a·g` in G1.
//!
//! 2. **Encryption** ([`TransformEncryption::encrypt`]): an ephemeral
//!    `E = e·g` and shared secret `S = e(e·A, h)` blind the plaintext as
//!    `M = P·S`. An auth hash over `(S, M)` and an envelope signature
//!    protect the result.
//!
//! 3. **Transform Key Generation**
//!    ([`TransformEncryption::generate_transform_key`]): the delegator picks
//!    a temp key `K` in GT, encrypts it to the delegatee and hides their own
//!    private key behind `H2(K, B) − a·h`.
//!
//! 4. **Transform** ([`TransformEncryption::transform`]): the proxy pairs
//!    the current key-carrying ephemeral with the transform key, re-randomizes
//!    the delegatee part and appends a block. `M` and the auth hash never
//!    change.
//!
//! 5. **Decryption** ([`TransformEncryption::decrypt`]): zero-hop values are
//!    opened directly; otherwise the chain is unwound from the last block to
//!    the first to recover `S`.
//!
//! # Example
//!
//! ```rust
//! use recrypt_engine::{PairingEngine, RecryptScheme, TransformEncryption};
//!
//! let scheme = RecryptScheme::<PairingEngine>::default();
//! let signing = scheme.generate_signing_key_pair()?;
//!
//! let alice = scheme.generate_key_pair()?;
//! let bob = scheme.generate_key_pair()?;
//! let plaintext = scheme.generate_plaintext()?;
//!
//! let value = scheme.encrypt(&plaintext, alice.public_key(), &signing.public, &signing.private)?;
//! let alice_to_bob = scheme.generate_transform_key(
//!     alice.private_key(),
//!     bob.public_key(),
//!     &signing.public,
//!     &signing.private,
//! )?;
//! let for_bob = scheme.transform(&value, &alice_to_bob, &signing.public, &signing.private)?;
//!
//! let recovered = scheme.decrypt(&for_bob, bob.private_key())?;
//! assert_eq!(scheme.derive_symmetric_key(&recovered), scheme.derive_symmetric_key(&plaintext));
//! # Ok::<(), recrypt_engine::Error>(())
//! ```

use core::fmt::Debug;

use crate::PairingBackend;
use crate::capabilities::{PrivateSigningKey, PublicSigningKey};
use crate::errors::Error;

pub(crate) mod authenticity;
mod chain;
mod ciphertext;
mod encoding;
pub(crate) mod keys;
mod schnorr;
mod scheme;

pub use authenticity::AuthHash;
pub use ciphertext::{EncryptedValue, MAX_TRANSFORM_BLOCKS, TransformBlock, TransformKey};
pub use keys::{DerivedSymmetricKey, KeyPair, MAX_SAMPLING_ATTEMPTS, Plaintext, PrivateKey, PublicKey};
pub use schnorr::SchnorrSignature;
pub use scheme::RecryptScheme;

/// High-level transform encryption interface.
///
/// Every fallible operation returns [`Error`]; signatures are checked before
/// any other processing and nothing is retried.
pub trait TransformEncryption<B: PairingBackend>: Debug + Send + Sync + 'static {
    /// Generates a fresh key pair from the injected random source.
    fn generate_key_pair(&self) -> Result<KeyPair<B>, Error>;

    /// Recomputes `private_key · g`. Deterministic.
    fn compute_public_key(&self, private_key: &PrivateKey<B>) -> Result<PublicKey<B>, Error>;

    /// Samples a uniformly random plaintext.
    fn generate_plaintext(&self) -> Result<Plaintext<B>, Error>;

    /// Hashes a plaintext into a 32-byte symmetric key.
    fn derive_symmetric_key(&self, plaintext: &Plaintext<B>) -> DerivedSymmetricKey;

    /// Deterministically derives a private key from a plaintext.
    fn derive_private_key(&self, plaintext: &Plaintext<B>) -> PrivateKey<B>;

    /// Encrypts a plaintext to `to_public_key` and signs the result.
    fn encrypt(
        &self,
        plaintext: &Plaintext<B>,
        to_public_key: &PublicKey<B>,
        public_signing_key: &PublicSigningKey,
        private_signing_key: &PrivateSigningKey,
    ) -> Result<EncryptedValue<B>, Error>;

    /// Decrypts a value with any number of transform blocks.
    ///
    /// Fails with `AuthenticationFailure` on a bad signature or auth hash and
    /// with `InvalidKey` when the key does not match the last block.
    fn decrypt(
        &self,
        value: &EncryptedValue<B>,
        private_key: &PrivateKey<B>,
    ) -> Result<Plaintext<B>, Error>;

    /// Creates a signed delegation from `from_private_key` to `to_public_key`.
    fn generate_transform_key(
        &self,
        from_private_key: &PrivateKey<B>,
        to_public_key: &PublicKey<B>,
        public_signing_key: &PublicSigningKey,
        private_signing_key: &PrivateSigningKey,
    ) -> Result<TransformKey<B>, Error>;

    /// Canonical bytes of a transform key, suitable for storage or transport.
    fn create_transform_key_bytes(&self, transform_key: &TransformKey<B>) -> Vec<u8>;

    /// Appends one transform block and re-signs with the transforming party's keys.
    ///
    /// Returns a new value; the input is left unchanged.
    fn transform(
        &self,
        value: &EncryptedValue<B>,
        transform_key: &TransformKey<B>,
        public_signing_key: &PublicSigningKey,
        private_signing_key: &PrivateSigningKey,
    ) -> Result<EncryptedValue<B>, Error>;

    /// Schnorr-signs `message` with a re-encryption key pair.
    fn schnorr_sign(
        &self,
        private_key: &PrivateKey<B>,
        public_key: &PublicKey<B>,
        message: &[u8],
    ) -> Result<SchnorrSignature<B>, Error>;

    fn schnorr_verify(
        &self,
        public_key: &PublicKey<B>,
        message: &[u8],
        signature: &SchnorrSignature<B>,
    ) -> bool;
}
