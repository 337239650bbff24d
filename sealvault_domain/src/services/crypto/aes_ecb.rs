// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Raw AES-256 block self-encryption used by the key-strengthening loop
//! (§4.1). This is deliberately *not* a general ECB-mode cipher over
//! arbitrary-length data — it encrypts exactly one 16-byte block in place,
//! which is all the transform rounds ever need.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes256;

/// Encrypts a single 32-byte state in place under `seed`, by AES-256
/// block-encrypting each 16-byte half independently — one "round" of the
/// key-strengthening loop.
pub fn ecb_self_encrypt_round(seed: &[u8; 32], state: &mut [u8; 32]) {
    let cipher = Aes256::new(GenericArray::from_slice(seed));
    let (first, second) = state.split_at_mut(16);
    cipher.encrypt_block(GenericArray::from_mut_slice(first));
    cipher.encrypt_block(GenericArray::from_mut_slice(second));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_deterministic_for_a_fixed_seed() {
        let seed = [0x42u8; 32];
        let mut a = [0xAAu8; 32];
        let mut b = [0xAAu8; 32];
        ecb_self_encrypt_round(&seed, &mut a);
        ecb_self_encrypt_round(&seed, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn changes_the_state() {
        let seed = [0x01u8; 32];
        let original = [0x00u8; 32];
        let mut state = original;
        ecb_self_encrypt_round(&seed, &mut state);
        assert_ne!(state, original);
    }
}
