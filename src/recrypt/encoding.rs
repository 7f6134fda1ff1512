//! Canonical big-endian encodings of the engine's value types.
//!
//! Every field has a fixed width for the compiled curve, so the layouts are
//! plain concatenations. These bytes are what envelope signatures cover.
//!
//! | value | layout |
//! |---|---|
//! | `TransformBlock` | `public_key ‖ encrypted_temp_key ‖ random_transform_public_key ‖ random_transform_encrypted_temp_key` |
//! | `TransformKey` | `ephemeral_public_key ‖ to_public_key ‖ encrypted_temp_key ‖ hashed_temp_key ‖ public_signing_key ‖ signature` |
//! | `EncryptedValue` | `ephemeral_public_key ‖ encrypted_message ‖ auth_hash ‖ count (u32) ‖ blocks ‖ public_signing_key ‖ signature` |
//!
//! The signed portion of a `TransformKey` or `EncryptedValue` is its
//! encoding without the trailing 64-byte signature.

use crate::PairingBackend;
use crate::arith::{CurvePoint, TargetGroup};
use crate::capabilities::{HASH_BYTES, PublicSigningKey, Signature};
use crate::errors::Error;
use crate::recrypt::authenticity::AuthHash;
use crate::recrypt::ciphertext::{EncryptedValue, TransformBlock, TransformKey};
use crate::recrypt::keys::PublicKey;

const SIGNING_KEY_BYTES: usize = 32;
const SIGNATURE_BYTES: usize = 64;

/// Cursor over an input buffer that fails with `EncodingFailure` on short reads.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8], Error> {
        if self.remaining() < len {
            return Err(Error::EncodingFailure(format!(
                "truncated input reading {field}: need {len} bytes, have {}",
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, field: &str) -> Result<[u8; N], Error> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    fn u32(&mut self, field: &str) -> Result<u32, Error> {
        Ok(u32::from_be_bytes(self.array::<4>(field)?))
    }

    fn public_key<B: PairingBackend>(&mut self, field: &str) -> Result<PublicKey<B>, Error> {
        let bytes = self.take(B::G1::encoded_len(), field)?;
        PublicKey::from_bytes(bytes)
            .map_err(|err| Error::EncodingFailure(format!("{field}: {err}")))
    }

    fn g2<B: PairingBackend>(&mut self, field: &str) -> Result<B::G2, Error> {
        let bytes = self.take(B::G2::encoded_len(), field)?;
        B::G2::from_repr(bytes).map_err(|err| Error::EncodingFailure(format!("{field}: {err}")))
    }

    fn target<B: PairingBackend>(&mut self, field: &str) -> Result<B::Target, Error> {
        let bytes = self.take(B::Target::encoded_len(), field)?;
        B::Target::from_repr(bytes)
            .map_err(|err| Error::EncodingFailure(format!("{field}: {err}")))
    }

    fn finish(self) -> Result<(), Error> {
        if self.remaining() != 0 {
            return Err(Error::EncodingFailure(format!(
                "{} trailing bytes",
                self.remaining()
            )));
        }
        Ok(())
    }
}

impl<B: PairingBackend> TransformBlock<B> {
    pub fn encoded_len() -> usize {
        2 * B::G1::encoded_len() + 2 * B::Target::encoded_len()
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.public_key.to_bytes());
        out.extend_from_slice(&self.encrypted_temp_key.to_repr());
        out.extend_from_slice(&self.random_transform_public_key.to_bytes());
        out.extend_from_slice(&self.random_transform_encrypted_temp_key.to_repr());
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self, Error> {
        Ok(Self {
            public_key: reader.public_key::<B>("block public key")?,
            encrypted_temp_key: reader.target::<B>("block encrypted temp key")?,
            random_transform_public_key: reader
                .public_key::<B>("block random transform public key")?,
            random_transform_encrypted_temp_key: reader
                .target::<B>("block random transform encrypted temp key")?,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::encoded_len());
        self.write(&mut out);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::new(bytes);
        let block = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(block)
    }
}

impl<B: PairingBackend> TransformKey<B> {
    pub fn encoded_len() -> usize {
        Self::signed_len() + SIGNATURE_BYTES
    }

    fn signed_len() -> usize {
        2 * B::G1::encoded_len()
            + B::Target::encoded_len()
            + B::G2::encoded_len()
            + SIGNING_KEY_BYTES
    }

    /// Encoding of every field except the signature.
    pub(crate) fn signed_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::encoded_len());
        out.extend_from_slice(&self.ephemeral_public_key.to_bytes());
        out.extend_from_slice(&self.to_public_key.to_bytes());
        out.extend_from_slice(&self.encrypted_temp_key.to_repr());
        out.extend_from_slice(&self.hashed_temp_key.to_repr());
        out.extend_from_slice(self.public_signing_key.as_bytes());
        out
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.signed_bytes();
        out.extend_from_slice(self.signature.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::new(bytes);
        let key = Self {
            ephemeral_public_key: reader.public_key::<B>("ephemeral public key")?,
            to_public_key: reader.public_key::<B>("to public key")?,
            encrypted_temp_key: reader.target::<B>("encrypted temp key")?,
            hashed_temp_key: reader.g2::<B>("hashed temp key")?,
            public_signing_key: PublicSigningKey(reader.array("public signing key")?),
            signature: Signature(reader.array("signature")?),
        };
        reader.finish()?;
        Ok(key)
    }
}

impl<B: PairingBackend> EncryptedValue<B> {
    pub fn encoded_len(&self) -> usize {
        B::G1::encoded_len()
            + B::Target::encoded_len()
            + HASH_BYTES
            + 4
            + self.transform_blocks.len() * TransformBlock::<B>::encoded_len()
            + SIGNING_KEY_BYTES
            + SIGNATURE_BYTES
    }

    /// Encoding of every field except the signature.
    pub(crate) fn signed_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.ephemeral_public_key.to_bytes());
        out.extend_from_slice(&self.encrypted_message.to_repr());
        out.extend_from_slice(self.auth_hash.as_bytes());
        // `transform` refuses to grow a value past MAX_TRANSFORM_BLOCKS.
        let count = u32::try_from(self.transform_blocks.len())
            .expect("block count bounded by MAX_TRANSFORM_BLOCKS");
        out.extend_from_slice(&count.to_be_bytes());
        for block in &self.transform_blocks {
            block.write(&mut out);
        }
        out.extend_from_slice(self.public_signing_key.as_bytes());
        out
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.signed_bytes();
        out.extend_from_slice(self.signature.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::new(bytes);
        let ephemeral_public_key = reader.public_key::<B>("ephemeral public key")?;
        let encrypted_message = reader.target::<B>("encrypted message")?;
        let auth_hash = AuthHash(reader.array("auth hash")?);

        let count = reader.u32("block count")? as usize;
        let block_len = TransformBlock::<B>::encoded_len();
        let needed = count.checked_mul(block_len).ok_or_else(|| {
            Error::EncodingFailure(format!("block count {count} overflows"))
        })?;
        if needed > reader.remaining() {
            return Err(Error::EncodingFailure(format!(
                "block count {count} exceeds remaining input"
            )));
        }
        let mut transform_blocks = Vec::with_capacity(count);
        for _ in 0..count {
            transform_blocks.push(TransformBlock::read(&mut reader)?);
        }

        let value = Self {
            ephemeral_public_key,
            encrypted_message,
            auth_hash,
            transform_blocks,
            public_signing_key: PublicSigningKey(reader.array("public signing key")?),
            signature: Signature(reader.array("signature")?),
        };
        reader.finish()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PairingEngine;
    use crate::capabilities::{Capabilities, SeededRandom};
    use crate::recrypt::{RecryptScheme, TransformEncryption};
    use std::sync::Arc;

    type B = PairingEngine;

    fn scheme(seed: u64) -> RecryptScheme<B> {
        RecryptScheme::new(
            Capabilities::default().with_random(Arc::new(SeededRandom::from_seed(seed))),
        )
    }

    #[test]
    fn transform_key_roundtrip() {
        let scheme = scheme(40);
        let signing = scheme.generate_signing_key_pair().expect("signing keys");
        let from = scheme.generate_key_pair().expect("from");
        let to = scheme.generate_key_pair().expect("to");
        let tk = scheme
            .generate_transform_key(
                from.private_key(),
                to.public_key(),
                &signing.public,
                &signing.private,
            )
            .expect("transform key");

        let bytes = scheme.create_transform_key_bytes(&tk);
        assert_eq!(bytes.len(), TransformKey::<B>::encoded_len());
        let decoded = TransformKey::<B>::from_bytes(&bytes).expect("decode");
        assert_eq!(decoded, tk);
        assert_eq!(decoded.to_bytes(), bytes);
    }

    #[test]
    fn encrypted_value_roundtrip_with_blocks() {
        let scheme = scheme(41);
        let signing = scheme.generate_signing_key_pair().expect("signing keys");
        let owner = scheme.generate_key_pair().expect("owner");
        let device = scheme.generate_key_pair().expect("device");
        let plaintext = scheme.generate_plaintext().expect("plaintext");

        let value = scheme
            .encrypt(&plaintext, owner.public_key(), &signing.public, &signing.private)
            .expect("encrypt");
        let tk = scheme
            .generate_transform_key(
                owner.private_key(),
                device.public_key(),
                &signing.public,
                &signing.private,
            )
            .expect("transform key");
        let transformed = scheme
            .transform(&value, &tk, &signing.public, &signing.private)
            .expect("transform");

        for v in [&value, &transformed] {
            let bytes = v.to_bytes();
            assert_eq!(bytes.len(), v.encoded_len());
            assert_eq!(&EncryptedValue::<B>::from_bytes(&bytes).expect("decode"), v);
        }

        let block = &transformed.transform_blocks()[0];
        assert_eq!(
            &TransformBlock::<B>::from_bytes(&block.to_bytes()).expect("block"),
            block
        );
    }

    #[test]
    fn truncated_and_trailing_input_is_rejected() {
        let scheme = scheme(42);
        let signing = scheme.generate_signing_key_pair().expect("signing keys");
        let owner = scheme.generate_key_pair().expect("owner");
        let plaintext = scheme.generate_plaintext().expect("plaintext");
        let value = scheme
            .encrypt(&plaintext, owner.public_key(), &signing.public, &signing.private)
            .expect("encrypt");
        let bytes = value.to_bytes();

        let err =
            EncryptedValue::<B>::from_bytes(&bytes[..bytes.len() - 1]).expect_err("truncated");
        assert!(matches!(err, Error::EncodingFailure(_)));

        let mut longer = bytes.clone();
        longer.push(0);
        let err = EncryptedValue::<B>::from_bytes(&longer).expect_err("trailing");
        assert!(matches!(err, Error::EncodingFailure(_)));

        assert!(TransformBlock::<B>::from_bytes(&[]).is_err());
    }

    #[test]
    fn oversized_block_count_is_rejected() {
        let scheme = scheme(43);
        let signing = scheme.generate_signing_key_pair().expect("signing keys");
        let owner = scheme.generate_key_pair().expect("owner");
        let plaintext = scheme.generate_plaintext().expect("plaintext");
        let value = scheme
            .encrypt(&plaintext, owner.public_key(), &signing.public, &signing.private)
            .expect("encrypt");
        let mut bytes = value.to_bytes();

        let count_at = <B as PairingBackend>::G1::encoded_len()
            + <B as PairingBackend>::Target::encoded_len()
            + HASH_BYTES;
        bytes[count_at..count_at + 4].copy_from_slice(&u32::MAX.to_be_bytes());
        let err = EncryptedValue::<B>::from_bytes(&bytes).expect_err("huge count");
        assert!(matches!(err, Error::EncodingFailure(_)));
    }

    #[test]
    fn off_curve_public_key_is_an_encoding_failure() {
        let scheme = scheme(44);
        let signing = scheme.generate_signing_key_pair().expect("signing keys");
        let from = scheme.generate_key_pair().expect("from");
        let to = scheme.generate_key_pair().expect("to");
        let tk = scheme
            .generate_transform_key(
                from.private_key(),
                to.public_key(),
                &signing.public,
                &signing.private,
            )
            .expect("transform key");
        let mut bytes = tk.to_bytes();
        let last_of_first_point = <B as PairingBackend>::G1::encoded_len() - 1;
        bytes[last_of_first_point] ^= 0x01;

        let err = TransformKey::<B>::from_bytes(&bytes).expect_err("off curve");
        assert!(matches!(err, Error::EncodingFailure(_)));
    }
}
