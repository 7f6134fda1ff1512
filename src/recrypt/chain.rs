//! Unwinding a chain of transform blocks back to the original shared secret.
//!
//! For blocks `1..=n` and the final recipient's private key `b`:
//!
//! ```text
//! K_n     = C'_n / e(X'_n · b, h)
//! K_{i-1} = C'_{i-1} / ( e(X'_{i-1}, H2(K_i, P_i)) / C_i )      for i = n..2
//! S       = e(E, H2(K_1, P_1)) / C_1
//! ```
//!
//! where `P_i` is block `i`'s public key, `C_i` its encrypted temp key,
//! and `X'_i`, `C'_i` its re-randomized transform public key and encrypted
//! temp key. A tampered block yields a wrong `S`, which the auth hash check
//! rejects.

use tracing::{instrument, trace};
use zeroize::Zeroize;

use crate::PairingBackend;
use crate::arith::{CurvePoint, TargetGroup};
use crate::capabilities::HashFunction;
use crate::errors::Error;
use crate::recrypt::authenticity::hash_temp_key;
use crate::recrypt::ciphertext::TransformBlock;
use crate::recrypt::keys::{PrivateKey, PublicKey};

/// Shared secret of a value that was never transformed: `e(E · b, h)`.
pub(crate) fn direct_shared_secret<B: PairingBackend>(
    ephemeral_public_key: &PublicKey<B>,
    private_key: &PrivateKey<B>,
) -> B::Target {
    B::pairing(
        &ephemeral_public_key.point.mul_scalar(&private_key.scalar),
        &B::G2::generator(),
    )
}

/// Recovers the shared secret of the original encryption from a non-empty chain.
#[instrument(level = "trace", skip_all, fields(blocks = blocks.len()))]
pub(crate) fn unwind_shared_secret<B: PairingBackend>(
    hash: &dyn HashFunction,
    ephemeral_public_key: &PublicKey<B>,
    blocks: &[TransformBlock<B>],
    private_key: &PrivateKey<B>,
) -> Result<B::Target, Error> {
    let (last, _) = blocks
        .split_last()
        .ok_or_else(|| Error::InvalidKey("no transform blocks to unwind".into()))?;

    let own_public = B::G1::generator().mul_scalar(&private_key.scalar);
    if own_public != last.public_key.point {
        return Err(Error::InvalidKey(
            "private key does not match the last transform block".into(),
        ));
    }

    let mut temp_key = last.random_transform_encrypted_temp_key.divide(&B::pairing(
        &last
            .random_transform_public_key
            .point
            .mul_scalar(&private_key.scalar),
        &B::G2::generator(),
    ));

    for pair in blocks.windows(2).rev() {
        let (lower, upper) = (&pair[0], &pair[1]);
        let mask = B::pairing(
            &lower.random_transform_public_key.point,
            &hash_temp_key::<B>(hash, &temp_key, &upper.public_key),
        )
        .divide(&upper.encrypted_temp_key);
        temp_key.zeroize();
        temp_key = lower.random_transform_encrypted_temp_key.divide(&mask);
        trace!("unwrapped one level");
    }

    let first = &blocks[0];
    let shared_secret = B::pairing(
        &ephemeral_public_key.point,
        &hash_temp_key::<B>(hash, &temp_key, &first.public_key),
    )
    .divide(&first.encrypted_temp_key);
    temp_key.zeroize();
    Ok(shared_secret)
}
