use ripemd160::Ripemd160;
use sha2::{Digest, Sha256};

/// RIPEMD-160 over SHA-256 of `bytes`.
pub fn hash160(bytes: &[u8]) -> [u8; 20] {
    ripemd160(&Sha256::digest(bytes))
}

/// A single RIPEMD-160 pass over `bytes`.
pub fn ripemd160(bytes: &[u8]) -> [u8; 20] {
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&Ripemd160::digest(bytes));
    hash
}
