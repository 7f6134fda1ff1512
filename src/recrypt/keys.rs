use core::fmt;

use subtle::ConstantTimeEq;
use tracing::{instrument, trace};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::arith::{CurvePoint, FieldElement, SCALAR_BYTES, TargetGroup};
use crate::capabilities::{HashFunction, RandomBytes};
use crate::errors::Error;
use crate::recrypt::authenticity::hash_to_scalar;
use crate::PairingBackend;

fn ct_eq_bytes(lhs: &[u8], rhs: &[u8]) -> bool {
    lhs.ct_eq(rhs).into()
}

/// Upper bound on rejected candidates before the random source is declared broken.
pub const MAX_SAMPLING_ATTEMPTS: usize = 64;

/// Secret scalar owned by one party.
///
/// Always non-zero. The scalar is wiped when the key is dropped and
/// compared in constant time.
#[derive(Clone)]
pub struct PrivateKey<B: PairingBackend> {
    pub(crate) scalar: B::Scalar,
}

impl<B: PairingBackend> PrivateKey<B> {
    pub(crate) fn from_scalar(scalar: B::Scalar) -> Result<Self, Error> {
        if scalar.is_zero() {
            return Err(Error::InvalidKey("private key must be non-zero".into()));
        }
        Ok(Self { scalar })
    }

    /// Decodes a 32-byte big-endian scalar, rejecting zero and values not
    /// reduced modulo the group order.
    pub fn from_bytes(bytes: &[u8; SCALAR_BYTES]) -> Result<Self, Error> {
        let scalar = B::Scalar::from_repr(bytes)
            .map_err(|err| Error::InvalidKey(format!("private key out of range: {err}")))?;
        Self::from_scalar(scalar)
    }

    pub fn to_bytes(&self) -> [u8; SCALAR_BYTES] {
        self.scalar.to_repr()
    }
}

impl<B: PairingBackend> PartialEq for PrivateKey<B> {
    fn eq(&self, other: &Self) -> bool {
        let mut lhs = self.to_bytes();
        let mut rhs = other.to_bytes();
        let equal = ct_eq_bytes(&lhs, &rhs);
        lhs.zeroize();
        rhs.zeroize();
        equal
    }
}

impl<B: PairingBackend> Eq for PrivateKey<B> {}

impl<B: PairingBackend> Drop for PrivateKey<B> {
    fn drop(&mut self) {
        self.scalar.zeroize();
    }
}

impl<B: PairingBackend> fmt::Debug for PrivateKey<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Public key `private_key · g` in G1. Never the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey<B: PairingBackend> {
    pub(crate) point: B::G1,
}

impl<B: PairingBackend> PublicKey<B> {
    pub(crate) fn from_point(point: B::G1) -> Result<Self, Error> {
        if point.is_identity() {
            return Err(Error::InvalidKey("public key is the identity".into()));
        }
        Ok(Self { point })
    }

    /// Decodes `x || y`, rejecting the identity and points off the curve or
    /// outside the prime-order subgroup.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let point = B::G1::from_repr(bytes)
            .map_err(|err| Error::InvalidKey(format!("invalid public key: {err}")))?;
        Self::from_point(point)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.point.to_repr()
    }

    pub fn point(&self) -> &B::G1 {
        &self.point
    }

    /// Width of the canonical encoding for the compiled curve.
    pub fn encoded_len() -> usize {
        B::G1::encoded_len()
    }
}

/// Matching private and public key.
#[derive(Clone, Debug)]
pub struct KeyPair<B: PairingBackend> {
    pub(crate) private_key: PrivateKey<B>,
    pub(crate) public_key: PublicKey<B>,
}

impl<B: PairingBackend> KeyPair<B> {
    pub fn private_key(&self) -> &PrivateKey<B> {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey<B> {
        &self.public_key
    }

    pub fn into_parts(self) -> (PrivateKey<B>, PublicKey<B>) {
        (self.private_key, self.public_key)
    }
}

/// A random target-group element. Its hash is the symmetric key a caller
/// actually encrypts bulk data with.
#[derive(Clone)]
pub struct Plaintext<B: PairingBackend> {
    pub(crate) element: B::Target,
}

impl<B: PairingBackend> Plaintext<B> {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let element = B::Target::from_repr(bytes).map_err(Error::encoding)?;
        Ok(Self { element })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.element.to_repr()
    }

    pub fn encoded_len() -> usize {
        B::Target::encoded_len()
    }
}

impl<B: PairingBackend> PartialEq for Plaintext<B> {
    fn eq(&self, other: &Self) -> bool {
        let mut lhs = self.to_bytes();
        let mut rhs = other.to_bytes();
        let equal = ct_eq_bytes(&lhs, &rhs);
        lhs.zeroize();
        rhs.zeroize();
        equal
    }
}

impl<B: PairingBackend> Eq for Plaintext<B> {}

impl<B: PairingBackend> Drop for Plaintext<B> {
    fn drop(&mut self) {
        self.element.zeroize();
    }
}

impl<B: PairingBackend> fmt::Debug for Plaintext<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Plaintext(<redacted>)")
    }
}

/// 32-byte key derived from a plaintext.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedSymmetricKey([u8; 32]);

impl DerivedSymmetricKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for DerivedSymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedSymmetricKey(<redacted>)")
    }
}

/// Samples a non-zero scalar by rejection from raw bytes of the injected source.
///
/// Bits above the modulus length are cleared before the range check so that
/// at most about half of the candidates are rejected.
pub(crate) fn random_scalar<B: PairingBackend>(
    random: &dyn RandomBytes,
) -> Result<B::Scalar, Error> {
    let bits = B::Scalar::modulus_bits() as usize;
    let mut candidate = [0u8; SCALAR_BYTES];
    for attempt in 0..MAX_SAMPLING_ATTEMPTS {
        random.fill_bytes(&mut candidate)?;
        clear_high_bits(&mut candidate, bits);
        if let Ok(scalar) = B::Scalar::from_repr(&candidate) {
            if !scalar.is_zero() {
                candidate.zeroize();
                return Ok(scalar);
            }
        }
        trace!(attempt, "rejected scalar candidate");
    }
    candidate.zeroize();
    Err(Error::RandomSourceFailure(format!(
        "no usable scalar after {MAX_SAMPLING_ATTEMPTS} draws"
    )))
}

fn clear_high_bits(bytes: &mut [u8; SCALAR_BYTES], bits: usize) {
    let excess = SCALAR_BYTES * 8 - bits.min(SCALAR_BYTES * 8);
    let whole = excess / 8;
    bytes[..whole].fill(0);
    if whole < SCALAR_BYTES {
        bytes[whole] &= 0xff >> (excess % 8);
    }
}

pub(crate) fn generate_key_pair<B: PairingBackend>(
    random: &dyn RandomBytes,
) -> Result<KeyPair<B>, Error> {
    let private_key = PrivateKey::from_scalar(random_scalar::<B>(random)?)?;
    let public_key = compute_public_key(&private_key)?;
    Ok(KeyPair {
        private_key,
        public_key,
    })
}

pub(crate) fn compute_public_key<B: PairingBackend>(
    private_key: &PrivateKey<B>,
) -> Result<PublicKey<B>, Error> {
    if private_key.scalar.is_zero() {
        return Err(Error::InvalidKey("private key must be non-zero".into()));
    }
    PublicKey::from_point(B::G1::generator().mul_scalar(&private_key.scalar))
}

/// `e(g, h)` raised to a fresh scalar.
pub(crate) fn random_target<B: PairingBackend>(
    random: &dyn RandomBytes,
) -> Result<B::Target, Error> {
    let exponent = random_scalar::<B>(random)?;
    Ok(B::pairing(&B::G1::generator(), &B::G2::generator()).mul_scalar(&exponent))
}

pub(crate) fn derive_symmetric_key<B: PairingBackend>(
    hash: &dyn HashFunction,
    plaintext: &Plaintext<B>,
) -> DerivedSymmetricKey {
    let mut bytes = plaintext.to_bytes();
    let key = DerivedSymmetricKey(hash.hash(&bytes));
    bytes.zeroize();
    key
}

#[instrument(level = "trace", skip_all)]
pub(crate) fn derive_private_key<B: PairingBackend>(
    hash: &dyn HashFunction,
    plaintext: &Plaintext<B>,
) -> PrivateKey<B> {
    let mut bytes = plaintext.to_bytes();
    let mut counter: u32 = 0;
    let scalar = loop {
        let counter_bytes = counter.to_be_bytes();
        let candidate = hash_to_scalar::<B>(hash, &[bytes.as_slice(), counter_bytes.as_slice()]);
        if !candidate.is_zero() {
            break candidate;
        }
        counter = counter.wrapping_add(1);
    };
    bytes.zeroize();
    PrivateKey { scalar }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PairingEngine;
    use crate::capabilities::{Blake3Hash, SeededRandom};

    type B = PairingEngine;

    #[derive(Debug)]
    struct ZeroRandom;

    impl RandomBytes for ZeroRandom {
        fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), Error> {
            dest.fill(0);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct BrokenRandom;

    impl RandomBytes for BrokenRandom {
        fn fill_bytes(&self, _dest: &mut [u8]) -> Result<(), Error> {
            Err(Error::RandomSourceFailure("device unplugged".into()))
        }
    }

    #[test]
    fn secret_equality_compares_encodings() {
        let random = SeededRandom::from_seed(9);
        let a = generate_key_pair::<B>(&random).expect("a");
        let b = generate_key_pair::<B>(&random).expect("b");
        let a_again = PrivateKey::<B>::from_bytes(&a.private_key().to_bytes()).expect("decode");
        assert!(a_again == *a.private_key());
        assert!(*a.private_key() != *b.private_key());

        let p = Plaintext::<B> {
            element: random_target::<B>(&random).expect("p"),
        };
        let q = Plaintext::<B> {
            element: random_target::<B>(&random).expect("q"),
        };
        assert!(p == Plaintext::<B>::from_bytes(&p.to_bytes()).expect("decode"));
        assert!(p != q);
    }

    #[test]
    fn public_key_is_deterministic() {
        let pair = generate_key_pair::<B>(&SeededRandom::from_seed(3)).expect("keygen");
        let again = compute_public_key(pair.private_key()).expect("public key");
        assert_eq!(&again, pair.public_key());

        let decoded = PrivateKey::<B>::from_bytes(&pair.private_key().to_bytes()).expect("decode");
        assert_eq!(compute_public_key(&decoded).expect("public key"), again);
    }

    #[test]
    fn seeded_sources_give_identical_keys() {
        let a = generate_key_pair::<B>(&SeededRandom::from_seed(5)).expect("keygen");
        let b = generate_key_pair::<B>(&SeededRandom::from_seed(5)).expect("keygen");
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn zero_entropy_is_rejected() {
        let err = generate_key_pair::<B>(&ZeroRandom).expect_err("zero source");
        assert!(matches!(err, Error::RandomSourceFailure(_)));
    }

    #[test]
    fn failing_source_is_reported() {
        let err = random_target::<B>(&BrokenRandom).expect_err("broken source");
        assert!(matches!(err, Error::RandomSourceFailure(_)));
    }

    #[test]
    fn private_key_decoding_rejects_zero_and_overflow() {
        assert!(PrivateKey::<B>::from_bytes(&[0u8; 32]).expect_err("zero").is_invalid_key());
        assert!(PrivateKey::<B>::from_bytes(&[0xffu8; 32]).expect_err("overflow").is_invalid_key());
    }

    #[test]
    fn public_key_decoding_rejects_identity() {
        let zeros = vec![0u8; PublicKey::<B>::encoded_len()];
        assert!(PublicKey::<B>::from_bytes(&zeros).expect_err("identity").is_invalid_key());
    }

    #[test]
    fn derivations_are_deterministic() {
        let random = SeededRandom::from_seed(8);
        let plaintext = Plaintext::<B> {
            element: random_target::<B>(&random).expect("plaintext"),
        };
        let other = Plaintext::<B> {
            element: random_target::<B>(&random).expect("plaintext"),
        };

        let k1 = derive_symmetric_key(&Blake3Hash, &plaintext);
        let k2 = derive_symmetric_key(&Blake3Hash, &plaintext.clone());
        assert_eq!(k1, k2);
        assert_ne!(k1, derive_symmetric_key(&Blake3Hash, &other));

        let p1 = derive_private_key(&Blake3Hash, &plaintext);
        let p2 = derive_private_key(&Blake3Hash, &plaintext);
        assert_eq!(p1, p2);
        assert_ne!(p1, derive_private_key(&Blake3Hash, &other));
    }

    #[test]
    fn high_bits_are_cleared() {
        let mut bytes = [0xffu8; 32];
        clear_high_bits(&mut bytes, 254);
        assert_eq!(bytes[0], 0x3f);
        assert_eq!(bytes[1], 0xff);

        let mut bytes = [0xffu8; 32];
        clear_high_bits(&mut bytes, 255);
        assert_eq!(bytes[0], 0x7f);
    }
}
