use blake3::Hasher;
use sha2::{Digest, Sha256};

use super::{HASH_BYTES, HashFunction};

/// BLAKE3 with 32-byte output.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Hash;

impl HashFunction for Blake3Hash {
    fn hash(&self, data: &[u8]) -> [u8; HASH_BYTES] {
        *blake3::hash(data).as_bytes()
    }

    fn hash_parts(&self, parts: &[&[u8]]) -> [u8; HASH_BYTES] {
        let mut hasher = Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        *hasher.finalize().as_bytes()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hash;

impl HashFunction for Sha256Hash {
    fn hash(&self, data: &[u8]) -> [u8; HASH_BYTES] {
        Sha256::digest(data).into()
    }

    fn hash_parts(&self, parts: &[&[u8]]) -> [u8; HASH_BYTES] {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }
}
