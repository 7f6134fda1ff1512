use core::marker::PhantomData;

use tracing::{debug, instrument};
use zeroize::Zeroize;

use crate::PairingBackend;
use crate::arith::{CurvePoint, FieldElement, TargetGroup};
use crate::capabilities::{
    Capabilities, PrivateSigningKey, PublicSigningKey, Signature, SigningKeyPair,
};
use crate::config::EngineConfig;
use crate::errors::Error;
use crate::recrypt::authenticity::{
    check_auth_hash, compute_auth_hash, hash_temp_key, sign_envelope, verify_envelope,
};
use crate::recrypt::chain::{direct_shared_secret, unwind_shared_secret};
use crate::recrypt::keys::{self, random_scalar, random_target};
use crate::recrypt::schnorr::{self, SchnorrSignature};
use crate::recrypt::{
    DerivedSymmetricKey, EncryptedValue, KeyPair, Plaintext, PrivateKey, PublicKey,
    TransformBlock, TransformEncryption, TransformKey,
};

/// Pairing-based transform encryption over the backend `B`.
///
/// Holds only the injected capabilities; every operation is a pure function
/// of its inputs and fresh randomness, so one instance can be shared freely
/// across threads.
#[derive(Clone, Debug)]
pub struct RecryptScheme<B: PairingBackend> {
    capabilities: Capabilities,
    _phantom: PhantomData<B>,
}

impl<B: PairingBackend> RecryptScheme<B> {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            _phantom: PhantomData,
        }
    }

    /// Builds a scheme with the default capabilities a configuration names.
    pub fn from_config(config: &EngineConfig) -> Result<Self, Error> {
        if config.curve != B::CURVE {
            return Err(Error::InvalidConfig(format!(
                "configured curve {:?} does not match backend curve {:?}",
                config.curve,
                B::CURVE
            )));
        }
        Ok(Self::new(Capabilities::from_config(config)?))
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Generates an envelope signing key pair from the injected random source.
    pub fn generate_signing_key_pair(&self) -> Result<SigningKeyPair, Error> {
        self.capabilities
            .signer
            .generate_key_pair(self.capabilities.random.as_ref())
    }

    fn verify_value(&self, value: &EncryptedValue<B>) -> Result<(), Error> {
        verify_envelope(
            self.capabilities.signer.as_ref(),
            &value.public_signing_key,
            &value.signed_bytes(),
            &value.signature,
            "encrypted value signature is invalid",
        )
    }

    fn verify_transform_key(&self, key: &TransformKey<B>) -> Result<(), Error> {
        verify_envelope(
            self.capabilities.signer.as_ref(),
            &key.public_signing_key,
            &key.signed_bytes(),
            &key.signature,
            "transform key signature is invalid",
        )
    }

    fn sign_value(
        &self,
        value: &mut EncryptedValue<B>,
        public_signing_key: &PublicSigningKey,
        private_signing_key: &PrivateSigningKey,
    ) -> Result<(), Error> {
        value.public_signing_key = *public_signing_key;
        value.signature = sign_envelope(
            self.capabilities.signer.as_ref(),
            private_signing_key,
            &value.signed_bytes(),
        )?;
        Ok(())
    }
}

impl<B: PairingBackend> Default for RecryptScheme<B> {
    fn default() -> Self {
        Self::new(Capabilities::default())
    }
}

impl<B: PairingBackend> TransformEncryption<B> for RecryptScheme<B> {
    #[instrument(level = "debug", skip_all, fields(curve = ?B::CURVE))]
    fn generate_key_pair(&self) -> Result<KeyPair<B>, Error> {
        keys::generate_key_pair(self.capabilities.random.as_ref())
    }

    fn compute_public_key(&self, private_key: &PrivateKey<B>) -> Result<PublicKey<B>, Error> {
        keys::compute_public_key(private_key)
    }

    #[instrument(level = "debug", skip_all)]
    fn generate_plaintext(&self) -> Result<Plaintext<B>, Error> {
        Ok(Plaintext {
            element: random_target::<B>(self.capabilities.random.as_ref())?,
        })
    }

    fn derive_symmetric_key(&self, plaintext: &Plaintext<B>) -> DerivedSymmetricKey {
        keys::derive_symmetric_key(self.capabilities.hash.as_ref(), plaintext)
    }

    fn derive_private_key(&self, plaintext: &Plaintext<B>) -> PrivateKey<B> {
        keys::derive_private_key(self.capabilities.hash.as_ref(), plaintext)
    }

    #[instrument(level = "debug", skip_all, fields(curve = ?B::CURVE))]
    fn encrypt(
        &self,
        plaintext: &Plaintext<B>,
        to_public_key: &PublicKey<B>,
        public_signing_key: &PublicSigningKey,
        private_signing_key: &PrivateSigningKey,
    ) -> Result<EncryptedValue<B>, Error> {
        let mut ephemeral = random_scalar::<B>(self.capabilities.random.as_ref())?;
        let ephemeral_public_key =
            PublicKey::from_point(B::G1::generator().mul_scalar(&ephemeral))?;
        let mut shared_secret = B::pairing(
            &to_public_key.point.mul_scalar(&ephemeral),
            &B::G2::generator(),
        );
        ephemeral.zeroize();

        let encrypted_message = plaintext.element.combine(&shared_secret);
        let auth_hash = compute_auth_hash::<B>(
            self.capabilities.hash.as_ref(),
            &shared_secret,
            &encrypted_message,
        );
        shared_secret.zeroize();

        let mut value = EncryptedValue {
            ephemeral_public_key,
            encrypted_message,
            auth_hash,
            transform_blocks: Vec::new(),
            public_signing_key: *public_signing_key,
            signature: Signature([0u8; 64]),
        };
        self.sign_value(&mut value, public_signing_key, private_signing_key)?;
        Ok(value)
    }

    #[instrument(level = "debug", skip_all, fields(blocks = value.transform_blocks.len()))]
    fn decrypt(
        &self,
        value: &EncryptedValue<B>,
        private_key: &PrivateKey<B>,
    ) -> Result<Plaintext<B>, Error> {
        self.verify_value(value)?;

        let mut shared_secret = if value.transform_blocks.is_empty() {
            direct_shared_secret(&value.ephemeral_public_key, private_key)
        } else {
            unwind_shared_secret(
                self.capabilities.hash.as_ref(),
                &value.ephemeral_public_key,
                &value.transform_blocks,
                private_key,
            )?
        };

        let result = check_auth_hash::<B>(
            self.capabilities.hash.as_ref(),
            &shared_secret,
            &value.encrypted_message,
            &value.auth_hash,
        )
        .map(|()| Plaintext {
            element: value.encrypted_message.divide(&shared_secret),
        });
        shared_secret.zeroize();
        result
    }

    #[instrument(level = "debug", skip_all, fields(curve = ?B::CURVE))]
    fn generate_transform_key(
        &self,
        from_private_key: &PrivateKey<B>,
        to_public_key: &PublicKey<B>,
        public_signing_key: &PublicSigningKey,
        private_signing_key: &PrivateSigningKey,
    ) -> Result<TransformKey<B>, Error> {
        if from_private_key.scalar.is_zero() {
            return Err(Error::InvalidKey("delegating private key is zero".into()));
        }
        if to_public_key.point.is_identity() {
            return Err(Error::InvalidKey("delegatee public key is the identity".into()));
        }
        let random = self.capabilities.random.as_ref();

        let mut ephemeral = random_scalar::<B>(random)?;
        let ephemeral_public_key =
            PublicKey::from_point(B::G1::generator().mul_scalar(&ephemeral))?;
        let mut temp_key = random_target::<B>(random)?;

        let encrypted_temp_key = temp_key.combine(&B::pairing(
            &to_public_key.point.mul_scalar(&ephemeral),
            &B::G2::generator(),
        ));
        let hashed_temp_key =
            hash_temp_key::<B>(self.capabilities.hash.as_ref(), &temp_key, to_public_key)
            .sub(&B::G2::generator().mul_scalar(&from_private_key.scalar));
        ephemeral.zeroize();
        temp_key.zeroize();

        let mut key = TransformKey {
            ephemeral_public_key,
            to_public_key: *to_public_key,
            encrypted_temp_key,
            hashed_temp_key,
            public_signing_key: *public_signing_key,
            signature: Signature([0u8; 64]),
        };
        key.signature = sign_envelope(
            self.capabilities.signer.as_ref(),
            private_signing_key,
            &key.signed_bytes(),
        )?;
        Ok(key)
    }

    fn create_transform_key_bytes(&self, transform_key: &TransformKey<B>) -> Vec<u8> {
        transform_key.to_bytes()
    }

    #[instrument(level = "debug", skip_all, fields(blocks = value.transform_blocks.len()))]
    fn transform(
        &self,
        value: &EncryptedValue<B>,
        transform_key: &TransformKey<B>,
        public_signing_key: &PublicSigningKey,
        private_signing_key: &PrivateSigningKey,
    ) -> Result<EncryptedValue<B>, Error> {
        self.verify_value(value)?;
        self.verify_transform_key(transform_key)?;
        value.ensure_room_for_block()?;

        let carrier = value
            .transform_blocks
            .last()
            .map(|block| block.random_transform_public_key)
            .unwrap_or(value.ephemeral_public_key);
        let encrypted_temp_key = B::pairing(&carrier.point, &transform_key.hashed_temp_key);

        let mut blinding = random_scalar::<B>(self.capabilities.random.as_ref())?;
        let random_transform_public_key = PublicKey::from_point(
            transform_key
                .ephemeral_public_key
                .point
                .add(&B::G1::generator().mul_scalar(&blinding)),
        )?;
        let random_transform_encrypted_temp_key =
            transform_key.encrypted_temp_key.combine(&B::pairing(
                &transform_key.to_public_key.point.mul_scalar(&blinding),
                &B::G2::generator(),
            ));
        blinding.zeroize();

        let mut transformed = value.clone();
        transformed.transform_blocks.push(TransformBlock {
            public_key: transform_key.to_public_key,
            encrypted_temp_key,
            random_transform_public_key,
            random_transform_encrypted_temp_key,
        });
        self.sign_value(&mut transformed, public_signing_key, private_signing_key)?;
        debug!(blocks = transformed.transform_blocks.len(), "appended transform block");
        Ok(transformed)
    }

    fn schnorr_sign(
        &self,
        private_key: &PrivateKey<B>,
        public_key: &PublicKey<B>,
        message: &[u8],
    ) -> Result<SchnorrSignature<B>, Error> {
        schnorr::sign(
            self.capabilities.random.as_ref(),
            self.capabilities.hash.as_ref(),
            private_key,
            public_key,
            message,
        )
    }

    fn schnorr_verify(
        &self,
        public_key: &PublicKey<B>,
        message: &[u8],
        signature: &SchnorrSignature<B>,
    ) -> bool {
        schnorr::verify(self.capabilities.hash.as_ref(), public_key, message, signature)
    }
}
