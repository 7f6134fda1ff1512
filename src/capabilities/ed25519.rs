use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

use super::{
    OsRandom, PrivateSigningKey, PublicSigningKey, Signature, SignatureScheme, SigningKeyPair,
};
use crate::errors::Error;

/// Ed25519 envelope signatures.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Signer;

impl SignatureScheme for Ed25519Signer {
    fn sign(&self, key: &PrivateSigningKey, message: &[u8]) -> Result<Signature, Error> {
        let signing = SigningKey::from_bytes(key.as_bytes());
        Ok(Signature(signing.sign(message).to_bytes()))
    }

    fn verify(&self, key: &PublicSigningKey, message: &[u8], signature: &Signature) -> bool {
        let verifying = match VerifyingKey::from_bytes(key.as_bytes()) {
            Ok(k) => k,
            Err(_) => return false,
        };
        let sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
        verifying.verify_strict(message, &sig).is_ok()
    }

    fn public_key(&self, key: &PrivateSigningKey) -> PublicSigningKey {
        PublicSigningKey(SigningKey::from_bytes(key.as_bytes()).verifying_key().to_bytes())
    }
}

/// Generates an Ed25519 signing key pair from operating-system entropy.
pub fn generate_signing_key_pair() -> Result<SigningKeyPair, Error> {
    Ed25519Signer.generate_key_pair(&OsRandom)
}
