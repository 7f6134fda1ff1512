//! Serde serialization support for the engine's public value types.
//!
//! Every field is serialized as its canonical big-endian encoding, so the
//! serde form carries exactly the same bytes the envelope signatures cover.
//! Deserialization runs the same validation as `from_bytes`: off-curve
//! points, out-of-range scalars and wrong widths are rejected.
//!
//! # Serialization Strategy
//!
//! - **Public keys** and **Schnorr signatures**: a single byte string
//! - **Curve points** (G1, G2) and **target group elements** (GT): byte strings via `to_repr()`
//! - **Transform blocks**: arrays of structs
//!
//! # Example
//!
//! ```rust
//! use recrypt_engine::{PairingEngine, RecryptScheme, TransformEncryption, TransformKey};
//!
//! let scheme = RecryptScheme::<PairingEngine>::default();
//! let signing = scheme.generate_signing_key_pair()?;
//! let from = scheme.generate_key_pair()?;
//! let to = scheme.generate_key_pair()?;
//! let tk = scheme.generate_transform_key(
//!     from.private_key(),
//!     to.public_key(),
//!     &signing.public,
//!     &signing.private,
//! )?;
//!
//! let json = serde_json::to_string(&tk).expect("serialize");
//! let back: TransformKey<PairingEngine> = serde_json::from_str(&json).expect("deserialize");
//! assert_eq!(back, tk);
//! # Ok::<(), recrypt_engine::Error>(())
//! ```

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    AuthHash, CurvePoint, EncryptedValue, PairingBackend, PublicKey, PublicSigningKey,
    SchnorrSignature, Signature, TargetGroup, TransformBlock, TransformKey,
};

fn array_from_bytes<const N: usize, E: de::Error>(bytes: &[u8], what: &str) -> Result<[u8; N], E> {
    bytes.try_into().map_err(|_| {
        E::custom(format!("{} must be {} bytes, got {}", what, N, bytes.len()))
    })
}

fn public_key_from_bytes<B: PairingBackend, E: de::Error>(bytes: &[u8]) -> Result<PublicKey<B>, E> {
    PublicKey::from_bytes(bytes).map_err(E::custom)
}

fn target_from_bytes<B: PairingBackend, E: de::Error>(bytes: &[u8]) -> Result<B::Target, E> {
    B::Target::from_repr(bytes).map_err(E::custom)
}

// Implement Serialize and Deserialize for PublicKey
impl<B: PairingBackend> Serialize for PublicKey<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for PublicKey<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        public_key_from_bytes::<B, D::Error>(&bytes)
    }
}

// Implement Serialize and Deserialize for SchnorrSignature
impl<B: PairingBackend> Serialize for SchnorrSignature<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for SchnorrSignature<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        SchnorrSignature::from_bytes(&bytes).map_err(de::Error::custom)
    }
}

// Implement Serialize and Deserialize for TransformBlock
impl<B: PairingBackend> Serialize for TransformBlock<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("TransformBlock", 4)?;
        state.serialize_field("public_key", &self.public_key)?;
        state.serialize_field("encrypted_temp_key", &self.encrypted_temp_key.to_repr())?;
        state.serialize_field(
            "random_transform_public_key",
            &self.random_transform_public_key,
        )?;
        state.serialize_field(
            "random_transform_encrypted_temp_key",
            &self.random_transform_encrypted_temp_key.to_repr(),
        )?;
        state.end()
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for TransformBlock<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(bound(deserialize = ""))]
        struct TransformBlockHelper<B: PairingBackend> {
            public_key: PublicKey<B>,
            encrypted_temp_key: Vec<u8>,
            random_transform_public_key: PublicKey<B>,
            random_transform_encrypted_temp_key: Vec<u8>,
        }

        let helper = TransformBlockHelper::<B>::deserialize(deserializer)?;

        Ok(TransformBlock {
            public_key: helper.public_key,
            encrypted_temp_key: target_from_bytes::<B, D::Error>(&helper.encrypted_temp_key)?,
            random_transform_public_key: helper.random_transform_public_key,
            random_transform_encrypted_temp_key: target_from_bytes::<B, D::Error>(
                &helper.random_transform_encrypted_temp_key,
            )?,
        })
    }
}

// Implement Serialize and Deserialize for EncryptedValue
impl<B: PairingBackend> Serialize for EncryptedValue<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("EncryptedValue", 6)?;
        state.serialize_field("ephemeral_public_key", &self.ephemeral_public_key)?;
        state.serialize_field("encrypted_message", &self.encrypted_message.to_repr())?;
        state.serialize_field("auth_hash", self.auth_hash.as_bytes().as_slice())?;
        state.serialize_field("transform_blocks", &self.transform_blocks)?;
        state.serialize_field(
            "public_signing_key",
            self.public_signing_key.as_bytes().as_slice(),
        )?;
        state.serialize_field("signature", self.signature.as_bytes().as_slice())?;
        state.end()
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for EncryptedValue<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(bound(deserialize = ""))]
        struct EncryptedValueHelper<B: PairingBackend> {
            ephemeral_public_key: PublicKey<B>,
            encrypted_message: Vec<u8>,
            auth_hash: Vec<u8>,
            transform_blocks: Vec<TransformBlock<B>>,
            public_signing_key: Vec<u8>,
            signature: Vec<u8>,
        }

        let helper = EncryptedValueHelper::<B>::deserialize(deserializer)?;

        Ok(EncryptedValue {
            ephemeral_public_key: helper.ephemeral_public_key,
            encrypted_message: target_from_bytes::<B, D::Error>(&helper.encrypted_message)?,
            auth_hash: AuthHash::from_bytes(array_from_bytes::<32, D::Error>(
                &helper.auth_hash,
                "auth hash",
            )?),
            transform_blocks: helper.transform_blocks,
            public_signing_key: PublicSigningKey(array_from_bytes::<32, D::Error>(
                &helper.public_signing_key,
                "public signing key",
            )?),
            signature: Signature(array_from_bytes::<64, D::Error>(
                &helper.signature,
                "signature",
            )?),
        })
    }
}

// Implement Serialize and Deserialize for TransformKey
impl<B: PairingBackend> Serialize for TransformKey<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("TransformKey", 6)?;
        state.serialize_field("ephemeral_public_key", &self.ephemeral_public_key)?;
        state.serialize_field("to_public_key", &self.to_public_key)?;
        state.serialize_field("encrypted_temp_key", &self.encrypted_temp_key.to_repr())?;
        state.serialize_field("hashed_temp_key", &self.hashed_temp_key.to_repr())?;
        state.serialize_field(
            "public_signing_key",
            self.public_signing_key.as_bytes().as_slice(),
        )?;
        state.serialize_field("signature", self.signature.as_bytes().as_slice())?;
        state.end()
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for TransformKey<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(bound(deserialize = ""))]
        struct TransformKeyHelper<B: PairingBackend> {
            ephemeral_public_key: PublicKey<B>,
            to_public_key: PublicKey<B>,
            encrypted_temp_key: Vec<u8>,
            hashed_temp_key: Vec<u8>,
            public_signing_key: Vec<u8>,
            signature: Vec<u8>,
        }

        let helper = TransformKeyHelper::<B>::deserialize(deserializer)?;

        Ok(TransformKey {
            ephemeral_public_key: helper.ephemeral_public_key,
            to_public_key: helper.to_public_key,
            encrypted_temp_key: target_from_bytes::<B, D::Error>(&helper.encrypted_temp_key)?,
            hashed_temp_key: B::G2::from_repr(&helper.hashed_temp_key)
                .map_err(<D::Error as de::Error>::custom)?,
            public_signing_key: PublicSigningKey(array_from_bytes::<32, D::Error>(
                &helper.public_signing_key,
                "public signing key",
            )?),
            signature: Signature(array_from_bytes::<64, D::Error>(
                &helper.signature,
                "signature",
            )?),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::capabilities::{Capabilities, SeededRandom};
    use crate::{EncryptedValue, PairingEngine, PublicKey, RecryptScheme, TransformEncryption};

    type B = PairingEngine;

    #[test]
    fn encrypted_value_json_roundtrip() {
        let scheme = RecryptScheme::<B>::new(
            Capabilities::default().with_random(Arc::new(SeededRandom::from_seed(60))),
        );
        let signing = scheme.generate_signing_key_pair().expect("signing");
        let a = scheme.generate_key_pair().expect("a");
        let b = scheme.generate_key_pair().expect("b");
        let plaintext = scheme.generate_plaintext().expect("plaintext");
        let value = scheme
            .encrypt(&plaintext, a.public_key(), &signing.public, &signing.private)
            .expect("encrypt");
        let tk = scheme
            .generate_transform_key(a.private_key(), b.public_key(), &signing.public, &signing.private)
            .expect("tk");
        let transformed = scheme
            .transform(&value, &tk, &signing.public, &signing.private)
            .expect("transform");

        let json = serde_json::to_string(&transformed).expect("serialize");
        let back: EncryptedValue<B> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, transformed);
        assert_eq!(scheme.decrypt(&back, b.private_key()).expect("decrypt"), plaintext);
    }

    #[test]
    fn invalid_public_key_fails_deserialization() {
        let zeros = vec![0u8; PublicKey::<B>::encoded_len()];
        let json = serde_json::to_string(&zeros).expect("serialize");
        assert!(serde_json::from_str::<PublicKey<B>>(&json).is_err());
    }
}
