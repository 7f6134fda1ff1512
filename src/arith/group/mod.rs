use std::fmt::Debug;

use zeroize::Zeroize;

use crate::{BackendError, FieldElement};

#[cfg(feature = "ark_bls12381")]
mod ark_bls12_381;
#[cfg(feature = "ark_bls12381")]
pub use ark_bls12_381::{G1, G2, Gt};

#[cfg(feature = "ark_bn254")]
mod ark_bn254;
#[cfg(feature = "ark_bn254")]
pub use ark_bn254::{G1, G2, Gt};

/// Elliptic curve point abstraction for G1 and G2 groups.
///
/// Points are held in projective coordinates. The canonical encoding is the
/// affine `x || y` pair, each coordinate a fixed-width big-endian integer
/// (extension-field coordinates list the highest coefficient first). The
/// identity encodes as all zeroes.
///
/// # Example
///
/// ```rust
/// use recrypt_engine::{CurvePoint, FieldElement, Fr, G1};
///
/// let mut rng = rand::thread_rng();
/// let scalar = Fr::random(&mut rng);
///
/// let g = G1::generator();
/// let point = g.mul_scalar(&scalar);
/// let doubled = point.add(&point);
/// assert_eq!(doubled.sub(&point), point);
///
/// let bytes = point.to_repr();
/// assert_eq!(bytes.len(), G1::encoded_len());
/// assert_eq!(G1::from_repr(&bytes).expect("valid point"), point);
/// ```
pub trait CurvePoint<F: FieldElement>:
    Clone + Copy + Send + Sync + Debug + PartialEq + Eq + 'static
{
    /// Returns the point at infinity (identity element).
    fn identity() -> Self;

    /// Returns the standard generator for this group.
    fn generator() -> Self;

    fn is_identity(&self) -> bool;

    fn add(&self, other: &Self) -> Self;

    fn sub(&self, other: &Self) -> Self;

    /// Performs scalar multiplication: returns `scalar * self`.
    fn mul_scalar(&self, scalar: &F) -> Self;

    /// Width in bytes of the canonical encoding.
    fn encoded_len() -> usize;

    /// Serializes the point to its canonical big-endian encoding.
    fn to_repr(&self) -> Vec<u8>;

    /// Deserializes a point, rejecting wrong lengths, off-curve coordinates
    /// and points outside the prime-order subgroup.
    fn from_repr(bytes: &[u8]) -> Result<Self, BackendError>;
}

/// Pairing target group (GT) abstraction.
///
/// GT is a multiplicative subgroup of the degree-12 extension field. This
/// trait uses multiplicative names: `combine` multiplies, `divide` multiplies
/// by the inverse and `mul_scalar` exponentiates.
///
/// # Example
///
/// ```rust
/// use recrypt_engine::{CurvePoint, G1, G2, PairingBackend, PairingEngine, TargetGroup};
///
/// let gt = PairingEngine::pairing(&G1::generator(), &G2::generator());
/// let squared = gt.combine(&gt);
/// assert_eq!(squared.divide(&gt), gt);
/// assert_eq!(gt.divide(&gt), TargetGroup::identity());
/// ```
pub trait TargetGroup:
    Clone + Copy + Send + Sync + Debug + PartialEq + Eq + Zeroize + 'static
{
    /// Scalar field type for exponentiation.
    type Scalar: FieldElement;

    /// Returns the multiplicative identity element.
    fn identity() -> Self;

    fn is_identity(&self) -> bool;

    /// Exponentiation by a scalar.
    fn mul_scalar(&self, scalar: &Self::Scalar) -> Self;

    /// Group multiplication.
    fn combine(&self, other: &Self) -> Self;

    /// Returns `self * other^-1`.
    fn divide(&self, other: &Self) -> Self;

    /// Width in bytes of the canonical encoding.
    fn encoded_len() -> usize;

    /// Serializes this element as twelve big-endian base field integers,
    /// highest tower coefficient first.
    fn to_repr(&self) -> Vec<u8>;

    /// Deserializes an element, rejecting values outside the order-r subgroup.
    fn from_repr(bytes: &[u8]) -> Result<Self, BackendError>;
}
