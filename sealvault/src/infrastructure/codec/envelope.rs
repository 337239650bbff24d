// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The outer envelope (§4.3): AES-256-CBC decryption of the file remainder
//! under the derived final key, with the stream-start marker check folded
//! in so a wrong key and a corrupted header read identically to a caller.

use sealvault_domain::services::crypto::{cbc_decrypt, cbc_encrypt};
use sealvault_domain::VaultError;

/// Decrypts `ciphertext` and verifies the first 32 bytes equal
/// `stream_start_bytes`, returning the remainder — the block-hashed inner
/// stream. A padding failure and a stream-start mismatch both collapse to
/// `InvalidCompositeKey` (§7: "indistinguishable by design").
pub fn open_envelope(
    key: &[u8; 32],
    iv: &[u8; 16],
    stream_start_bytes: &[u8; 32],
    ciphertext: &[u8],
) -> Result<Vec<u8>, VaultError> {
    let plaintext = cbc_decrypt(key, iv, ciphertext).map_err(|_| VaultError::InvalidCompositeKey)?;
    if plaintext.len() < 32 {
        return Err(VaultError::InvalidCompositeKey);
    }
    if &plaintext[..32] != stream_start_bytes {
        return Err(VaultError::InvalidCompositeKey);
    }
    Ok(plaintext[32..].to_vec())
}

/// Prefixes `inner_stream` with `stream_start_bytes` and encrypts the
/// whole under `key`/`iv` (§4.3 "write: the mirror image").
pub fn seal_envelope(key: &[u8; 32], iv: &[u8; 16], stream_start_bytes: &[u8; 32], inner_stream: &[u8]) -> Vec<u8> {
    let mut plaintext = Vec::with_capacity(32 + inner_stream.len());
    plaintext.extend_from_slice(stream_start_bytes);
    plaintext.extend_from_slice(inner_stream);
    cbc_encrypt(key, iv, &plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_the_same_key() {
        let key = [0x11u8; 32];
        let iv = [0x22u8; 16];
        let marker = [0x33u8; 32];
        let ciphertext = seal_envelope(&key, &iv, &marker, b"inner stream payload");

        let opened = open_envelope(&key, &iv, &marker, &ciphertext).unwrap();
        assert_eq!(opened, b"inner stream payload");
    }

    #[test]
    fn wrong_key_fails_with_invalid_composite_key() {
        let key = [0x11u8; 32];
        let wrong_key = [0x99u8; 32];
        let iv = [0x22u8; 16];
        let marker = [0x33u8; 32];
        let ciphertext = seal_envelope(&key, &iv, &marker, b"payload");

        let err = open_envelope(&wrong_key, &iv, &marker, &ciphertext).unwrap_err();
        assert!(matches!(err, VaultError::InvalidCompositeKey));
    }

    #[test]
    fn mismatched_stream_start_fails_even_with_the_right_key() {
        let key = [0x11u8; 32];
        let iv = [0x22u8; 16];
        let marker = [0x33u8; 32];
        let wrong_marker = [0x44u8; 32];
        let ciphertext = seal_envelope(&key, &iv, &marker, b"payload");

        let err = open_envelope(&key, &iv, &wrong_marker, &ciphertext).unwrap_err();
        assert!(matches!(err, VaultError::InvalidCompositeKey));
    }
}
