use crate::PairingBackend;
use crate::capabilities::{PublicSigningKey, Signature};
use crate::errors::Error;
use crate::recrypt::authenticity::AuthHash;
use crate::recrypt::keys::PublicKey;

/// One hop of re-encryption appended by `transform`.
///
/// # Fields
///
/// - `public_key`: the key the hop delegates to
/// - `encrypted_temp_key`: the previous level's key material, re-encrypted
///   under this hop's temp key
/// - `random_transform_public_key`: re-randomized transform ephemeral key
/// - `random_transform_encrypted_temp_key`: this hop's temp key, encrypted
///   to `public_key`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformBlock<B: PairingBackend> {
    pub(crate) public_key: PublicKey<B>,
    pub(crate) encrypted_temp_key: B::Target,
    pub(crate) random_transform_public_key: PublicKey<B>,
    pub(crate) random_transform_encrypted_temp_key: B::Target,
}

impl<B: PairingBackend> TransformBlock<B> {
    pub fn public_key(&self) -> &PublicKey<B> {
        &self.public_key
    }

    pub fn encrypted_temp_key(&self) -> &B::Target {
        &self.encrypted_temp_key
    }

    pub fn random_transform_public_key(&self) -> &PublicKey<B> {
        &self.random_transform_public_key
    }

    pub fn random_transform_encrypted_temp_key(&self) -> &B::Target {
        &self.random_transform_encrypted_temp_key
    }
}

/// Most transform blocks one value can carry; the wire count is a `u32`.
pub const MAX_TRANSFORM_BLOCKS: usize = u32::MAX as usize;

/// An encrypted plaintext plus the transform blocks accumulated so far.
///
/// Immutable: `transform` returns a new value with one more block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedValue<B: PairingBackend> {
    pub(crate) ephemeral_public_key: PublicKey<B>,
    pub(crate) encrypted_message: B::Target,
    pub(crate) auth_hash: AuthHash,
    pub(crate) transform_blocks: Vec<TransformBlock<B>>,
    pub(crate) public_signing_key: PublicSigningKey,
    pub(crate) signature: Signature,
}

impl<B: PairingBackend> EncryptedValue<B> {
    pub fn ephemeral_public_key(&self) -> &PublicKey<B> {
        &self.ephemeral_public_key
    }

    pub fn encrypted_message(&self) -> &B::Target {
        &self.encrypted_message
    }

    pub fn auth_hash(&self) -> &AuthHash {
        &self.auth_hash
    }

    pub fn transform_blocks(&self) -> &[TransformBlock<B>] {
        &self.transform_blocks
    }

    /// Number of hops applied.
    pub fn hops(&self) -> usize {
        self.transform_blocks.len()
    }

    /// Fails when one more block would not fit the encoded block count.
    pub(crate) fn ensure_room_for_block(&self) -> Result<(), Error> {
        check_block_capacity(self.hops())
    }

    pub fn public_signing_key(&self) -> &PublicSigningKey {
        &self.public_signing_key
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

/// Delegation from one key pair to another public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformKey<B: PairingBackend> {
    pub(crate) ephemeral_public_key: PublicKey<B>,
    pub(crate) to_public_key: PublicKey<B>,
    pub(crate) encrypted_temp_key: B::Target,
    pub(crate) hashed_temp_key: B::G2,
    pub(crate) public_signing_key: PublicSigningKey,
    pub(crate) signature: Signature,
}

impl<B: PairingBackend> TransformKey<B> {
    pub fn ephemeral_public_key(&self) -> &PublicKey<B> {
        &self.ephemeral_public_key
    }

    pub fn to_public_key(&self) -> &PublicKey<B> {
        &self.to_public_key
    }

    pub fn encrypted_temp_key(&self) -> &B::Target {
        &self.encrypted_temp_key
    }

    pub fn hashed_temp_key(&self) -> &B::G2 {
        &self.hashed_temp_key
    }

    pub fn public_signing_key(&self) -> &PublicSigningKey {
        &self.public_signing_key
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

fn check_block_capacity(hops: usize) -> Result<(), Error> {
    if hops >= MAX_TRANSFORM_BLOCKS {
        return Err(Error::EncodingFailure(format!(
            "value already carries {hops} transform blocks, the most an encoding holds"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_capacity_stops_at_u32_count() {
        assert!(check_block_capacity(0).is_ok());
        assert!(check_block_capacity(MAX_TRANSFORM_BLOCKS - 1).is_ok());
        let err = check_block_capacity(MAX_TRANSFORM_BLOCKS).unwrap_err();
        assert!(matches!(err, Error::EncodingFailure(_)));
        assert_eq!(u32::try_from(MAX_TRANSFORM_BLOCKS).ok(), Some(u32::MAX));
    }
}
