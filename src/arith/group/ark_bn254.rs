//! Arkworks BN254 group operations.
//!
//! This module provides elliptic curve group operations for the BN254 (BN128) curve
//! using the Arkworks library. It implements the [`CurvePoint`] and [`TargetGroup`]
//! traits for G1, G2, and Gt (pairing target group).
//!
//! # Feature Flag
//!
//! This module is only available when the `ark_bn254` feature is enabled.
//!
//! # Encoded widths
//!
//! - **G1**: 64 bytes (`x || y` over Fq)
//! - **G2**: 128 bytes (`x.c1 || x.c0 || y.c1 || y.c0` over Fq2)
//! - **Gt**: 384 bytes (twelve Fq integers)

use ark_bn254::{Bn254, G1Projective, G2Projective, g1, g2};
use ark_ec::PrimeGroup;
use ark_ec::pairing::PairingOutput;
use ark_ff::{PrimeField, Zero};

use crate::arith::ark_codec::{
    point_from_be, point_len, point_to_be, target_from_be, target_len, write_be,
};
use crate::{BackendError, CurvePoint, Fr, TargetGroup};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// G1 group element wrapper for the Arkworks BN254 backend.
pub struct G1(pub G1Projective);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// G2 group element wrapper for the Arkworks BN254 backend.
pub struct G2(pub G2Projective);

/// Target group type for the Arkworks BN254 backend.
pub type Gt = PairingOutput<Bn254>;

impl CurvePoint<Fr> for G1 {
    fn identity() -> Self {
        G1(G1Projective::zero())
    }

    fn generator() -> Self {
        G1(<G1Projective as PrimeGroup>::generator())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        G1(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        G1(self.0 - other.0)
    }

    fn mul_scalar(&self, scalar: &Fr) -> Self {
        G1(self.0 * scalar)
    }

    fn encoded_len() -> usize {
        point_len::<g1::Config>()
    }

    fn to_repr(&self) -> Vec<u8> {
        point_to_be(&self.0)
    }

    fn from_repr(bytes: &[u8]) -> Result<Self, BackendError> {
        point_from_be::<g1::Config>(bytes).map(G1)
    }
}

impl CurvePoint<Fr> for G2 {
    fn identity() -> Self {
        G2(G2Projective::zero())
    }

    fn generator() -> Self {
        G2(<G2Projective as PrimeGroup>::generator())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        G2(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        G2(self.0 - other.0)
    }

    fn mul_scalar(&self, scalar: &Fr) -> Self {
        G2(self.0 * scalar)
    }

    fn encoded_len() -> usize {
        point_len::<g2::Config>()
    }

    fn to_repr(&self) -> Vec<u8> {
        point_to_be(&self.0)
    }

    fn from_repr(bytes: &[u8]) -> Result<Self, BackendError> {
        point_from_be::<g2::Config>(bytes).map(G2)
    }
}

impl TargetGroup for Gt {
    type Scalar = Fr;

    fn identity() -> Self {
        <Gt as Zero>::zero()
    }

    fn is_identity(&self) -> bool {
        <Gt as Zero>::is_zero(self)
    }

    fn mul_scalar(&self, scalar: &Self::Scalar) -> Self {
        let bigint = scalar.into_bigint();
        self.mul_bigint(bigint.as_ref())
    }

    fn combine(&self, other: &Self) -> Self {
        *self + *other
    }

    fn divide(&self, other: &Self) -> Self {
        *self - *other
    }

    fn encoded_len() -> usize {
        target_len::<Gt>()
    }

    fn to_repr(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::encoded_len());
        write_be(self, &mut bytes);
        bytes
    }

    fn from_repr(bytes: &[u8]) -> Result<Self, BackendError> {
        target_from_be::<Gt>(bytes)
    }
}
