// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Randomness sources. Salts, IVs, and seeds always come from the OS CSPRNG;
//! a separate, explicitly non-cryptographic RNG is offered only for
//! UI-visible shuffling (§5), so the two uses can never be confused at a
//! call site.

use rand::rngs::{OsRng, SmallRng};
use rand::{RngCore, SeedableRng};

/// Fills `buf` with cryptographically secure random bytes (salts, IVs,
/// transform seeds, master seeds).
pub fn fill_random(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
}

/// A fast, non-cryptographic RNG for cosmetic shuffling only (e.g.
/// randomizing icon picker order in a front-end). Never use this for
/// anything that touches key material.
pub fn shuffle_rng() -> impl RngCore {
    SmallRng::from_os_rng()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_the_whole_buffer() {
        let mut buf = [0u8; 32];
        fill_random(&mut buf);
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn two_calls_produce_different_output() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        fill_random(&mut a);
        fill_random(&mut b);
        assert_ne!(a, b);
    }
}
