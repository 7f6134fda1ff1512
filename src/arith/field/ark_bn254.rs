use ark_bn254::Fr as ArkFr;
use ark_ff::{One, PrimeField, UniformRand, Zero};
use rand_core::RngCore;

use crate::arith::ark_codec::{scalar_from_be, scalar_to_be};
use crate::{BackendError, FieldElement};

pub type Fr = ArkFr;

impl FieldElement for Fr {
    type Repr = [u8; 32];

    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        Fr::rand(rng)
    }

    fn add(&self, other: &Self) -> Self {
        *self + *other
    }

    fn sub(&self, other: &Self) -> Self {
        *self - *other
    }

    fn mul(&self, other: &Self) -> Self {
        *self * *other
    }

    fn to_repr(&self) -> Self::Repr {
        scalar_to_be(self)
    }

    fn from_repr(repr: &Self::Repr) -> Result<Self, BackendError> {
        scalar_from_be(repr)
    }

    fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        <Fr as PrimeField>::from_be_bytes_mod_order(bytes)
    }

    fn modulus_bits() -> u32 {
        <Fr as PrimeField>::MODULUS_BIT_SIZE
    }
}
