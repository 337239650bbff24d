// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The 20-round ARX keystream generator behind the inner-stream masker
//! (§4.5): a Salsa20 core run purely as a keystream — there is no associated
//! ciphertext to authenticate, only string values to XOR-mask in memory.
//!
//! The seed is hashed with SHA-256 before use; the 8-byte nonce is a fixed
//! format constant, not file- or user-supplied (spec.md is silent on its
//! value — see DESIGN.md for the Open Question resolution).

use salsa20::cipher::generic_array::GenericArray;
use salsa20::cipher::{KeyIvInit, StreamCipher};
use salsa20::Salsa20;

use super::sha256::sha256;

/// Fixed nonce for the inner-stream keystream. Any 8-byte constant works —
/// the seed (not the nonce) carries the per-file entropy — this value
/// matches the historical fixed IV used by KDBX3-family implementations.
const FIXED_NONCE: [u8; 8] = [0xE8, 0x30, 0x09, 0x4B, 0x97, 0x20, 0x5D, 0x2A];

/// A single-consumer keystream generator for masking protected string
/// values in document order. Holds no secret state after it is dropped:
/// the underlying cipher state is not `Zeroize` itself, but it contains no
/// copy of the original key material beyond the derived round keys, which
/// live only as long as this object does.
pub struct ArxKeystream {
    cipher: Salsa20,
}

impl ArxKeystream {
    /// Seeds the generator from an arbitrary-length key: the seed is first
    /// reduced to 32 bytes with SHA-256, matching `stream_key =
    /// SHA-256(InnerRandomStreamKey)` in §4.5.
    pub fn new(seed: &[u8]) -> Self {
        let key = sha256(&[seed]);
        let cipher = Salsa20::new(
            GenericArray::from_slice(&key),
            GenericArray::from_slice(&FIXED_NONCE),
        );
        Self { cipher }
    }

    /// XORs `buf` in place with the next `buf.len()` keystream bytes,
    /// advancing the generator's position. Callers must invoke this in the
    /// exact document-order sequence used when the value was originally
    /// masked (§4.5 order invariant) — masking is its own inverse, so the
    /// same call unmasks on read.
    pub fn apply(&mut self, buf: &mut [u8]) {
        self.cipher.apply_keystream(buf);
    }
}
