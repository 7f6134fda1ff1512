use std::fmt::Debug;

use rand_core::RngCore;
use zeroize::Zeroize;

use crate::BackendError;

#[cfg(feature = "ark_bls12381")]
mod ark_bls12_381;
#[cfg(feature = "ark_bls12381")]
pub use ark_bls12_381::Fr;

#[cfg(feature = "ark_bn254")]
mod ark_bn254;
#[cfg(feature = "ark_bn254")]
pub use ark_bn254::Fr;

/// Width in bytes of every canonical scalar encoding.
pub const SCALAR_BYTES: usize = 32;

/// Field element abstraction for scalar field operations.
///
/// This trait abstracts over the scalar field Fr of the elliptic curve, providing
/// the field operations the re-encryption protocol needs: private keys, ephemeral
/// keys, Schnorr nonces and hash-derived scalars all live here.
///
/// # Encoding
///
/// `to_repr` / `from_repr` use a fixed 32-byte big-endian encoding. `from_repr`
/// rejects values that are not reduced modulo the group order, so a decoded
/// scalar always has a unique encoding.
///
/// # Example
///
/// ```rust
/// use recrypt_engine::{FieldElement, Fr};
///
/// let mut rng = rand::thread_rng();
/// let a = Fr::random(&mut rng);
/// let b = Fr::random(&mut rng);
///
/// let sum = FieldElement::add(&a, &b);
/// assert_eq!(FieldElement::sub(&sum, &b), a);
///
/// let bytes = a.to_repr();
/// let recovered = Fr::from_repr(&bytes).expect("valid repr");
/// assert_eq!(recovered, a);
/// ```
pub trait FieldElement:
    Clone + Copy + Send + Sync + Debug + PartialEq + Eq + Zeroize + 'static
{
    /// Byte representation type (32-byte big-endian array).
    type Repr: AsRef<[u8]> + AsMut<[u8]> + Default + Debug + Send + Sync + Copy + 'static;

    /// Returns the additive identity (zero) element.
    fn zero() -> Self;

    /// Returns the multiplicative identity (one) element.
    fn one() -> Self;

    fn is_zero(&self) -> bool;

    /// Generates a random field element using the provided RNG.
    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self;

    fn add(&self, other: &Self) -> Self;

    fn sub(&self, other: &Self) -> Self;

    fn mul(&self, other: &Self) -> Self;

    /// Serializes this field element to its big-endian byte representation.
    fn to_repr(&self) -> Self::Repr;

    /// Deserializes a field element from its big-endian byte representation.
    ///
    /// Returns an error if the representation is not reduced modulo the field order.
    fn from_repr(repr: &Self::Repr) -> Result<Self, BackendError>;

    /// Interprets arbitrary bytes as a big-endian integer reduced modulo the field order.
    fn from_be_bytes_mod_order(bytes: &[u8]) -> Self;

    /// Bit length of the field modulus.
    fn modulus_bits() -> u32;
}
