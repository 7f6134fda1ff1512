//! Schnorr signatures over G1 with the engine's own key pairs.
//!
//! Lets a holder of a re-encryption key pair sign arbitrary messages
//! without a second signing identity.
//!
//! ```text
//! sign:   k <- random, R = g·k
//!         r = Hs("schnorr-r" || R.x)
//!         c = Hs("schnorr" || r || pub || msg)
//!         s = k + c·priv
//! verify: R' = g·s - pub·c, accept iff Hs("schnorr-r" || R'.x) == r
//! ```

use tracing::instrument;
use zeroize::Zeroize;

use crate::PairingBackend;
use crate::arith::{CurvePoint, FieldElement, SCALAR_BYTES};
use crate::capabilities::{HashFunction, RandomBytes};
use crate::errors::Error;
use crate::recrypt::authenticity::hash_to_scalar;
use crate::recrypt::keys::{PrivateKey, PublicKey, compute_public_key, random_scalar};

const COMMITMENT_TAG: &[u8] = b"schnorr-r";
const CHALLENGE_TAG: &[u8] = b"schnorr";

/// Signature `r || s`, two 32-byte scalars.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchnorrSignature<B: PairingBackend> {
    pub(crate) r: B::Scalar,
    pub(crate) s: B::Scalar,
}

impl<B: PairingBackend> SchnorrSignature<B> {
    pub const ENCODED_LEN: usize = 2 * SCALAR_BYTES;

    pub fn to_bytes(&self) -> [u8; 2 * SCALAR_BYTES] {
        let mut out = [0u8; 2 * SCALAR_BYTES];
        out[..SCALAR_BYTES].copy_from_slice(&self.r.to_repr());
        out[SCALAR_BYTES..].copy_from_slice(&self.s.to_repr());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(Error::EncodingFailure(format!(
                "schnorr signature must be {} bytes, got {}",
                Self::ENCODED_LEN,
                bytes.len()
            )));
        }
        let mut half = [0u8; SCALAR_BYTES];
        half.copy_from_slice(&bytes[..SCALAR_BYTES]);
        let r = B::Scalar::from_repr(&half).map_err(Error::encoding)?;
        half.copy_from_slice(&bytes[SCALAR_BYTES..]);
        let s = B::Scalar::from_repr(&half).map_err(Error::encoding)?;
        Ok(Self { r, s })
    }
}

fn commitment_scalar<B: PairingBackend>(
    hash: &dyn HashFunction,
    commitment: &B::G1,
) -> B::Scalar {
    let encoded = commitment.to_repr();
    let x = &encoded[..encoded.len() / 2];
    hash_to_scalar::<B>(hash, &[COMMITMENT_TAG, x])
}

fn challenge<B: PairingBackend>(
    hash: &dyn HashFunction,
    r: &B::Scalar,
    public_key: &PublicKey<B>,
    message: &[u8],
) -> B::Scalar {
    hash_to_scalar::<B>(
        hash,
        &[
            CHALLENGE_TAG,
            r.to_repr().as_slice(),
            public_key.to_bytes().as_slice(),
            message,
        ],
    )
}

#[instrument(level = "debug", skip_all, fields(message_len = message.len()))]
pub(crate) fn sign<B: PairingBackend>(
    random: &dyn RandomBytes,
    hash: &dyn HashFunction,
    private_key: &PrivateKey<B>,
    public_key: &PublicKey<B>,
    message: &[u8],
) -> Result<SchnorrSignature<B>, Error> {
    if &compute_public_key(private_key)? != public_key {
        return Err(Error::InvalidKey(
            "public key does not match the signing private key".into(),
        ));
    }
    let mut nonce = random_scalar::<B>(random)?;
    let commitment = B::G1::generator().mul_scalar(&nonce);
    let r = commitment_scalar::<B>(hash, &commitment);
    let c = challenge(hash, &r, public_key, message);
    let s = nonce.add(&c.mul(&private_key.scalar));
    nonce.zeroize();
    Ok(SchnorrSignature { r, s })
}

#[instrument(level = "debug", skip_all, fields(message_len = message.len()))]
pub(crate) fn verify<B: PairingBackend>(
    hash: &dyn HashFunction,
    public_key: &PublicKey<B>,
    message: &[u8],
    signature: &SchnorrSignature<B>,
) -> bool {
    let c = challenge(hash, &signature.r, public_key, message);
    let commitment = B::G1::generator()
        .mul_scalar(&signature.s)
        .sub(&public_key.point.mul_scalar(&c));
    if commitment.is_identity() {
        return false;
    }
    commitment_scalar::<B>(hash, &commitment) == signature.r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PairingEngine;
    use crate::capabilities::{Blake3Hash, SeededRandom};
    use crate::recrypt::keys::generate_key_pair;

    type B = PairingEngine;

    #[test]
    fn sign_then_verify() {
        let random = SeededRandom::from_seed(17);
        let pair = generate_key_pair::<B>(&random).expect("keygen");
        let sig = sign(&random, &Blake3Hash, pair.private_key(), pair.public_key(), b"hello")
            .expect("sign");

        assert!(verify(&Blake3Hash, pair.public_key(), b"hello", &sig));
        assert!(!verify(&Blake3Hash, pair.public_key(), b"hellp", &sig));

        let decoded = SchnorrSignature::<B>::from_bytes(&sig.to_bytes()).expect("decode");
        assert_eq!(decoded, sig);
    }

    #[test]
    fn verify_rejects_other_public_key() {
        let random = SeededRandom::from_seed(18);
        let alice = generate_key_pair::<B>(&random).expect("keygen");
        let bob = generate_key_pair::<B>(&random).expect("keygen");
        let sig = sign(&random, &Blake3Hash, alice.private_key(), alice.public_key(), b"m")
            .expect("sign");
        assert!(!verify(&Blake3Hash, bob.public_key(), b"m", &sig));
    }

    #[test]
    fn forged_commitment_is_rejected() {
        let random = SeededRandom::from_seed(19);
        let pair = generate_key_pair::<B>(&random).expect("keygen");
        let sig = sign(&random, &Blake3Hash, pair.private_key(), pair.public_key(), b"m")
            .expect("sign");

        let forged_r = SchnorrSignature::<B> {
            r: sig.r.add(&<B as PairingBackend>::Scalar::one()),
            s: sig.s,
        };
        assert!(!verify(&Blake3Hash, pair.public_key(), b"m", &forged_r));

        let forged_s = SchnorrSignature::<B> {
            r: sig.r,
            s: sig.s.add(&<B as PairingBackend>::Scalar::one()),
        };
        assert!(!verify(&Blake3Hash, pair.public_key(), b"m", &forged_s));
    }

    #[test]
    fn mismatched_public_key_cannot_sign() {
        let random = SeededRandom::from_seed(20);
        let alice = generate_key_pair::<B>(&random).expect("keygen");
        let bob = generate_key_pair::<B>(&random).expect("keygen");
        let err = sign(&random, &Blake3Hash, alice.private_key(), bob.public_key(), b"m")
            .expect_err("mismatched keys");
        assert!(err.is_invalid_key());
    }

    #[test]
    fn decoding_rejects_wrong_length() {
        assert!(SchnorrSignature::<B>::from_bytes(&[0u8; 63]).is_err());
    }
}
