// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Composite key sources and the finished secret they assemble into (§4.1).
//! Assembly and strengthening live in
//! `services::composite_key_service`; this module only holds the input and
//! output shapes.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// One contributing source to a composite key, in the order §4.1 lists
/// them. A caller supplies one or more of these; `composite_key_service`
/// reduces each to 32 bytes and concatenates them in source order.
#[derive(Clone)]
pub enum KeySource {
    /// UTF-8 passphrase bytes, hashed with SHA-256.
    Passphrase(Vec<u8>),
    /// Raw key-file bytes, before the 32-byte/64-hex/XML/SHA-256 fallback
    /// decoding in §4.1 rule 2.
    KeyFile(Vec<u8>),
    /// Platform-stable user identifier and machine identifier, concatenated
    /// and hashed with SHA-256.
    OsAccountToken { user: String, machine: String },
}

impl Drop for KeySource {
    fn drop(&mut self) {
        match self {
            KeySource::Passphrase(bytes) | KeySource::KeyFile(bytes) => bytes.zeroize(),
            KeySource::OsAccountToken { user, machine } => {
                user.zeroize();
                machine.zeroize();
            }
        }
    }
}

/// The finished 32-byte secret produced by composite key assembly and
/// strengthening (§4.1's `final_key`). Zeroized on drop; never `Debug` or
/// `Display`-printed in full.
pub struct CompositeKey {
    final_key: [u8; 32],
}

impl CompositeKey {
    pub(crate) fn from_final_key(final_key: [u8; 32]) -> Self {
        Self { final_key }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.final_key
    }
}

impl Drop for CompositeKey {
    fn drop(&mut self) {
        self.final_key.zeroize();
    }
}

impl Clone for CompositeKey {
    fn clone(&self) -> Self {
        Self {
            final_key: self.final_key,
        }
    }
}

impl std::fmt::Debug for CompositeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeKey").field("final_key", &"<redacted>").finish()
    }
}

/// Constant-time so comparing keys never leaks timing information about
/// where they first differ.
impl PartialEq for CompositeKey {
    fn eq(&self, other: &Self) -> bool {
        self.final_key.ct_eq(&other.final_key).into()
    }
}

impl Eq for CompositeKey {}
