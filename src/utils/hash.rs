//! Hashing utilities.
//!
//! - `compute()`: fast FxHash, used to detect config file edits
//! - `digest_hex()`: blake3, used for cache file names and HTTP validators

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

/// Full blake3 digest as lowercase hex (64 chars).
#[inline]
pub fn digest_hex<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    hex::encode(blake3::hash(data.as_ref()).as_bytes())
}
