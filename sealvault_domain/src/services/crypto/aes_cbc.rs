// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! AES-256-CBC with PKCS#7 padding — the outer envelope cipher (§4.3).

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::VaultError;

type Encryptor = cbc::Encryptor<Aes256>;
type Decryptor = cbc::Decryptor<Aes256>;

/// Encrypts `plaintext` under `key`/`iv` with AES-256-CBC and PKCS#7 padding.
///
/// `key` and `iv` must be 32 and 16 bytes respectively; this is enforced by
/// the cipher's `KeyIvInit` constructor and panics on mismatch, matching the
/// teacher's convention of only validating lengths that are attacker-facing
/// (these are derived internally, never parsed from untrusted input).
pub fn cbc_encrypt(key: &[u8; 32], iv: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
    Encryptor::new(key.into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypts `ciphertext` under `key`/`iv`, verifying and stripping PKCS#7
/// padding. Padding failure is folded into `CorruptPayload` rather than a
/// distinct error kind, consistent with the "don't leak which half of the
/// key failed" posture the composite key design calls for (§7).
pub fn cbc_decrypt(key: &[u8; 32], iv: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>, VaultError> {
    Decryptor::new(key.into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| VaultError::corrupt_payload("AES-CBC padding verification failed"))
}
