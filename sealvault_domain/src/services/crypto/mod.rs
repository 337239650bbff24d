// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Cryptographic primitives the rest of the domain builds on: SHA-256,
//! AES-256 in CBC (envelope) and raw-block form (key strengthening), the
//! ARX keystream generator behind the inner-stream masker, and the
//! supporting RNG/constant-time helpers.

pub mod aes_cbc;
pub mod aes_ecb;
pub mod arx_keystream;
pub mod random;
pub mod sha256;

pub use aes_cbc::{cbc_decrypt, cbc_encrypt};
pub use aes_ecb::ecb_self_encrypt_round;
pub use arx_keystream::ArxKeystream;
pub use random::{fill_random, shuffle_rng};
pub use sha256::sha256;
