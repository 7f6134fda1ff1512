//! Hashing and signatures that bind encrypted values to their producers.
//!
//! Two independent checks protect every value:
//!
//! 1. The **auth hash** `H("auth" || S || M)` ties the encrypted message `M`
//!    to the shared secret `S` that only a legitimate decryptor recovers.
//!    It catches tampering that survives re-signing.
//! 2. The **envelope signature** covers the canonical encoding of the whole
//!    value and is checked before any other processing.

use subtle::ConstantTimeEq;

use crate::PairingBackend;
use crate::arith::{CurvePoint, FieldElement, TargetGroup};
use crate::capabilities::{
    HASH_BYTES, HashFunction, PrivateSigningKey, PublicSigningKey, Signature, SignatureScheme,
};
use crate::errors::Error;
use crate::recrypt::keys::PublicKey;

const AUTH_TAG: &[u8] = b"auth";
const TEMP_KEY_TAG: &[u8] = b"temp-key";

/// 32-byte digest binding an encrypted message to its shared secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthHash(pub(crate) [u8; HASH_BYTES]);

impl AuthHash {
    pub fn from_bytes(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_BYTES] {
        &self.0
    }

    /// Constant-time comparison.
    pub fn matches(&self, other: &AuthHash) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

pub(crate) fn compute_auth_hash<B: PairingBackend>(
    hash: &dyn HashFunction,
    shared_secret: &B::Target,
    encrypted_message: &B::Target,
) -> AuthHash {
    AuthHash(hash.hash_parts(&[
        AUTH_TAG,
        shared_secret.to_repr().as_slice(),
        encrypted_message.to_repr().as_slice(),
    ]))
}

/// Recomputes the auth hash and compares it with the stored one.
pub(crate) fn check_auth_hash<B: PairingBackend>(
    hash: &dyn HashFunction,
    shared_secret: &B::Target,
    encrypted_message: &B::Target,
    expected: &AuthHash,
) -> Result<(), Error> {
    let actual = compute_auth_hash::<B>(hash, shared_secret, encrypted_message);
    if actual.matches(expected) {
        Ok(())
    } else {
        Err(Error::AuthenticationFailure("auth hash mismatch"))
    }
}

/// Maps arbitrary input onto the scalar field.
///
/// Two domain-separated digests are concatenated and reduced, so the
/// reduction bias is negligible for both supported group orders.
pub(crate) fn hash_to_scalar<B: PairingBackend>(
    hash: &dyn HashFunction,
    parts: &[&[u8]],
) -> B::Scalar {
    let mut wide = Vec::with_capacity(2 * HASH_BYTES);
    for prefix in [[0u8], [1u8]] {
        let mut input: Vec<&[u8]> = Vec::with_capacity(parts.len() + 1);
        input.push(prefix.as_slice());
        input.extend_from_slice(parts);
        wide.extend_from_slice(&hash.hash_parts(&input));
    }
    B::Scalar::from_be_bytes_mod_order(&wide)
}

/// `H2(K, pk) = h · hash_to_scalar("temp-key" || K || pk)`.
///
/// Including the recipient of the hop ties each transform block to the key
/// it was generated for.
pub(crate) fn hash_temp_key<B: PairingBackend>(
    hash: &dyn HashFunction,
    temp_key: &B::Target,
    recipient: &PublicKey<B>,
) -> B::G2 {
    let scalar = hash_to_scalar::<B>(
        hash,
        &[
            TEMP_KEY_TAG,
            temp_key.to_repr().as_slice(),
            recipient.to_bytes().as_slice(),
        ],
    );
    B::G2::generator().mul_scalar(&scalar)
}

pub(crate) fn sign_envelope(
    signer: &dyn SignatureScheme,
    key: &PrivateSigningKey,
    encoding: &[u8],
) -> Result<Signature, Error> {
    signer.sign(key, encoding)
}

pub(crate) fn verify_envelope(
    signer: &dyn SignatureScheme,
    key: &PublicSigningKey,
    encoding: &[u8],
    signature: &Signature,
    what: &'static str,
) -> Result<(), Error> {
    if signer.verify(key, encoding, signature) {
        Ok(())
    } else {
        Err(Error::AuthenticationFailure(what))
    }
}
