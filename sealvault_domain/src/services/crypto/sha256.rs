// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! SHA-256, used throughout key assembly, strengthening, and block hashing.

use sha2::{Digest, Sha256};

/// Hashes the concatenation of `parts` with SHA-256.
///
/// Taking multiple slices instead of a single pre-concatenated buffer lets
/// callers hash `master_seed || transformed_key` (and similar compositions)
/// without an intermediate allocation.
pub fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_matches_known_vector() {
        let digest = sha256(&[b""]);
        assert_eq!(
            hex::encode(digest),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b85"
        );
    }

    #[test]
    fn concatenation_matches_single_buffer_hash() {
        let a = sha256(&[b"hello", b" ", b"world"]);
        let b = sha256(&[b"hello world"]);
        assert_eq!(a, b);
    }
}
