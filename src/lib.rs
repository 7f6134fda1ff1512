//! # Recrypt Engine: Multi-hop Transform Encryption
//!
//! A pairing-based proxy re-encryption library. Data is encrypted once to a
//! public key; an untrusted proxy holding a signed transform key can later
//! re-target it to another public key, any number of times, without ever
//! seeing the plaintext or a private key.
//!
//! ## Overview
//!
//! The plaintext is a random element of the pairing target group GT. Callers
//! hash it with [`TransformEncryption::derive_symmetric_key`] and encrypt bulk
//! data under the resulting 32-byte key with a symmetric cipher of their
//! choice. Only the plaintext travels through the re-encryption layer.
//!
//! ## Architecture
//!
//! - **Arithmetic**: backend-neutral traits ([`FieldElement`], [`CurvePoint`],
//!   [`TargetGroup`], [`PairingBackend`]) for the scalar field, G1/G2, GT
//!   and the pairing, with arkworks implementations selected by feature flag.
//! - **[`capabilities`]**: injected randomness, hashing and the envelope
//!   signature scheme.
//! - **[`config`]**: [`EngineConfig`] selecting the curve, hash and
//!   signature scheme.
//! - **Protocol**: [`TransformEncryption`] and its implementation
//!   [`RecryptScheme`], with [`EncryptedValue`], [`TransformKey`] and
//!   [`TransformBlock`] and their canonical byte encodings.
//! - **Deferred execution**: [`AsyncRecrypt`] runs the same operations on the
//!   rayon pool and hands back a [`Deferred`].
//! - **[`errors`]**: the single [`Error`] type every operation returns.
//!
//! ## Quick Example
//!
//! ```rust
//! use recrypt_engine::{PairingEngine, RecryptScheme, TransformEncryption};
//!
//! let scheme = RecryptScheme::<PairingEngine>::default();
//! let signing = scheme.generate_signing_key_pair()?;
//!
//! // A group key, a user key and a device key.
//! let group = scheme.generate_key_pair()?;
//! let user = scheme.generate_key_pair()?;
//! let device = scheme.generate_key_pair()?;
//!
//! let plaintext = scheme.generate_plaintext()?;
//! let value = scheme.encrypt(&plaintext, group.public_key(), &signing.public, &signing.private)?;
//!
//! let group_to_user = scheme.generate_transform_key(
//!     group.private_key(), user.public_key(), &signing.public, &signing.private,
//! )?;
//! let user_to_device = scheme.generate_transform_key(
//!     user.private_key(), device.public_key(), &signing.public, &signing.private,
//! )?;
//!
//! let for_user = scheme.transform(&value, &group_to_user, &signing.public, &signing.private)?;
//! let for_device = scheme.transform(&for_user, &user_to_device, &signing.public, &signing.private)?;
//! assert_eq!(for_device.hops(), 2);
//!
//! let recovered = scheme.decrypt(&for_device, device.private_key())?;
//! assert_eq!(recovered, plaintext);
//! # Ok::<(), recrypt_engine::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! Exactly one curve backend is compiled in:
//!
//! - **`ark_bn254`** (default): arkworks BN254
//! - **`ark_bls12381`**: arkworks BLS12-381
//!
//! ## Security Considerations
//!
//! - **Signatures first**: every encrypted value and transform key carries an
//!   Ed25519 signature over its canonical encoding, checked before any other
//!   processing. The signing key travels with the value, so a signature only
//!   proves integrity since the last signer, not who that signer was.
//! - **Auth hash**: decryption recomputes `H(S || M)` and fails with
//!   `AuthenticationFailure` when a re-signed value was tampered with.
//! - **Secrets**: private keys, plaintexts and derived keys are wiped on drop.

mod arith;
pub mod capabilities;
pub mod config;
mod deferred;
pub mod errors;
mod recrypt;
mod serde_impl;

pub use arith::*;
pub use capabilities::{
    Capabilities, PrivateSigningKey, PublicSigningKey, Signature, SigningKeyPair,
};
pub use config::*;
pub use deferred::*;
pub use errors::*;
pub use recrypt::*;
