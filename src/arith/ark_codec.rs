//! Fixed-width big-endian codecs shared by the arkworks backends.
//!
//! Arkworks serializes field elements little-endian, lowest tower
//! coefficient first. Reversing the whole uncompressed buffer yields
//! big-endian integers with the highest coefficient first, which is the
//! canonical wire order of this crate. Points are encoded as affine
//! `x || y`; the identity is all zeroes (never a valid affine point on the
//! supported curves).

use ark_ec::short_weierstrass::{Affine, Projective, SWCurveConfig};
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::{BigInt, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::BackendError;

pub(crate) fn write_be<T: CanonicalSerialize>(value: &T, out: &mut Vec<u8>) {
    let start = out.len();
    value
        .serialize_uncompressed(&mut *out)
        .expect("in-memory serialization");
    out[start..].reverse();
}

pub(crate) fn read_be<T: CanonicalDeserialize>(bytes: &[u8]) -> Result<T, BackendError> {
    let mut le = bytes.to_vec();
    le.reverse();
    T::deserialize_uncompressed(le.as_slice())
        .map_err(|_| BackendError::Serialization("invalid field element bytes"))
}

pub(crate) fn scalar_to_be<F: PrimeField<BigInt = BigInt<4>>>(scalar: &F) -> [u8; 32] {
    let limbs = scalar.into_bigint().0;
    let mut out = [0u8; 32];
    for (chunk, limb) in out.rchunks_mut(8).zip(limbs.iter()) {
        chunk.copy_from_slice(&limb.to_be_bytes());
    }
    out
}

pub(crate) fn scalar_from_be<F: PrimeField<BigInt = BigInt<4>>>(
    bytes: &[u8; 32],
) -> Result<F, BackendError> {
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.rchunks(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *limb = u64::from_be_bytes(word);
    }
    F::from_bigint(BigInt::new(limbs)).ok_or(BackendError::Serialization("scalar out of range"))
}

pub(crate) fn point_len<P: SWCurveConfig>() -> usize {
    2 * P::BaseField::zero().uncompressed_size()
}

pub(crate) fn point_to_be<P: SWCurveConfig>(point: &Projective<P>) -> Vec<u8> {
    let len = point_len::<P>();
    let affine = (*point).into_affine();
    let mut out = Vec::with_capacity(len);
    if affine.is_zero() {
        out.resize(len, 0);
        return out;
    }
    write_be(&affine.x, &mut out);
    write_be(&affine.y, &mut out);
    out
}

pub(crate) fn point_from_be<P: SWCurveConfig>(bytes: &[u8]) -> Result<Projective<P>, BackendError> {
    let len = point_len::<P>();
    if bytes.len() != len {
        return Err(BackendError::Serialization("invalid point length"));
    }
    if bytes.iter().all(|b| *b == 0) {
        return Ok(Projective::<P>::zero());
    }
    let (x_bytes, y_bytes) = bytes.split_at(len / 2);
    let affine = Affine::<P>::new_unchecked(read_be(x_bytes)?, read_be(y_bytes)?);
    if !affine.is_on_curve() {
        return Err(BackendError::Serialization("point is not on the curve"));
    }
    if !affine.is_in_correct_subgroup_assuming_on_curve() {
        return Err(BackendError::Serialization(
            "point is not in the prime-order subgroup",
        ));
    }
    Ok(affine.into_group())
}

pub(crate) fn target_len<T: CanonicalSerialize + Zero>() -> usize {
    T::zero().uncompressed_size()
}

pub(crate) fn target_from_be<T: PrimeGroup>(bytes: &[u8]) -> Result<T, BackendError> {
    if bytes.len() != target_len::<T>() {
        return Err(BackendError::Serialization("invalid GT length"));
    }
    let value: T = read_be(bytes).map_err(|_| BackendError::Serialization("invalid GT bytes"))?;
    if !value.mul_bigint(T::ScalarField::MODULUS).is_zero() {
        return Err(BackendError::Serialization("GT element outside the order-r subgroup"));
    }
    Ok(value)
}
