use std::fmt::Debug;

#[cfg(feature = "ark_bls12381")]
mod ark_bls12_381;
#[cfg(feature = "ark_bls12381")]
pub use ark_bls12_381::PairingEngine;

#[cfg(feature = "ark_bn254")]
mod ark_bn254;
#[cfg(feature = "ark_bn254")]
pub use ark_bn254::PairingEngine;

use crate::{CurveId, CurvePoint, FieldElement, TargetGroup};

/// Main backend trait that ties together the algebra of one curve.
///
/// The re-encryption scheme is generic over this trait; exactly one
/// implementation, [`PairingEngine`], is compiled in depending on the
/// enabled curve feature.
///
/// # Type Parameters
///
/// - `Scalar`: The scalar field type (Fr)
/// - `G1`: The first elliptic curve group, home of public keys
/// - `G2`: The second elliptic curve group, home of hashed temp keys
/// - `Target`: The pairing target group (GT), home of plaintexts
///
/// # Example
///
/// ```rust
/// use recrypt_engine::{CurveId, CurvePoint, PairingBackend, PairingEngine};
///
/// type G1 = <PairingEngine as PairingBackend>::G1;
/// type G2 = <PairingEngine as PairingBackend>::G2;
///
/// let gt = PairingEngine::pairing(&G1::generator(), &G2::generator());
/// # let _ = gt;
/// # #[cfg(feature = "ark_bn254")]
/// assert_eq!(PairingEngine::CURVE, CurveId::Bn254);
/// ```
pub trait PairingBackend:
    Clone + Copy + Send + Sync + Debug + PartialEq + Eq + Sized + 'static
{
    /// Curve this backend implements.
    const CURVE: CurveId;

    /// Scalar field type (Fr).
    type Scalar: FieldElement<Repr = [u8; 32]>;
    /// First curve group (G1).
    type G1: CurvePoint<Self::Scalar>;
    /// Second curve group (G2).
    type G2: CurvePoint<Self::Scalar>;
    /// Pairing target group (GT).
    type Target: TargetGroup<Scalar = Self::Scalar>;

    /// Computes the bilinear pairing: `e(g1, g2) -> GT`.
    ///
    /// The pairing satisfies bilinearity: `e(a*P, b*Q) = e(P, Q)^(ab)`.
    fn pairing(g1: &Self::G1, g2: &Self::G2) -> Self::Target;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{G1, G2};
    use rand::{SeedableRng, rngs::StdRng};

    type Scalar = <PairingEngine as PairingBackend>::Scalar;

    #[test]
    fn pairing_is_bilinear() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = Scalar::random(&mut rng);
        let b = Scalar::random(&mut rng);

        let lhs = PairingEngine::pairing(
            &G1::generator().mul_scalar(&a),
            &G2::generator().mul_scalar(&b),
        );
        let rhs = PairingEngine::pairing(&G1::generator(), &G2::generator())
            .mul_scalar(&FieldElement::mul(&a, &b));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn pairing_is_non_degenerate() {
        let gt = PairingEngine::pairing(&G1::generator(), &G2::generator());
        assert!(!gt.is_identity());
        assert!(PairingEngine::pairing(&G1::identity(), &G2::generator()).is_identity());
    }

    #[test]
    fn encodings_have_fixed_width_and_roundtrip() {
        let mut rng = StdRng::seed_from_u64(11);
        let s = Scalar::random(&mut rng);
        let p1 = G1::generator().mul_scalar(&s);
        let p2 = G2::generator().mul_scalar(&s);
        let gt = PairingEngine::pairing(&p1, &p2);

        assert_eq!(p1.to_repr().len(), G1::encoded_len());
        assert_eq!(p2.to_repr().len(), G2::encoded_len());
        assert_eq!(gt.to_repr().len(), <PairingEngine as PairingBackend>::Target::encoded_len());
        assert_eq!(G1::encoded_len() * 2, G2::encoded_len());
        assert_eq!(G1::encoded_len() * 6, <PairingEngine as PairingBackend>::Target::encoded_len());

        assert_eq!(G1::from_repr(&p1.to_repr()).expect("g1"), p1);
        assert_eq!(G2::from_repr(&p2.to_repr()).expect("g2"), p2);
        assert_eq!(
            <PairingEngine as PairingBackend>::Target::from_repr(&gt.to_repr()).expect("gt"),
            gt
        );
        assert_eq!(Scalar::from_repr(&s.to_repr()).expect("scalar"), s);
    }

    #[test]
    fn identity_encodes_as_zeroes() {
        let bytes = G1::identity().to_repr();
        assert!(bytes.iter().all(|b| *b == 0));
        assert!(G1::from_repr(&bytes).expect("identity").is_identity());
    }

    #[test]
    fn decoding_rejects_malformed_points() {
        let good = G1::generator().to_repr();
        assert!(G1::from_repr(&good[..good.len() - 1]).is_err());

        let mut off_curve = good.clone();
        let last = off_curve.len() - 1;
        off_curve[last] ^= 1;
        assert!(G1::from_repr(&off_curve).is_err());

        let mut gt_bytes = PairingEngine::pairing(&G1::generator(), &G2::generator()).to_repr();
        gt_bytes[0] ^= 0x01;
        let last = gt_bytes.len() - 1;
        gt_bytes[last] ^= 0x01;
        assert!(<PairingEngine as PairingBackend>::Target::from_repr(&gt_bytes).is_err());
    }

    #[test]
    fn scalar_repr_is_big_endian() {
        let one = Scalar::one();
        let bytes = one.to_repr();
        assert_eq!(bytes[31], 1);
        assert!(bytes[..31].iter().all(|b| *b == 0));
        assert_eq!(Scalar::from_be_bytes_mod_order(&bytes), one);
    }

    #[test]
    fn scalar_decoding_rejects_unreduced_values() {
        assert!(Scalar::from_repr(&[0xff; 32]).is_err());
    }
}
