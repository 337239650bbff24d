// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `ProtectedString` (§3): a value-bytes/protect-flag pair whose buffer is
//! kept XOR-masked in memory by a per-process keystream while `protect` is
//! set, so plaintext is never resident between accesses.

use zeroize::Zeroize;

use crate::services::crypto::ArxKeystream;

/// A string value that may be stored masked in memory. `read` returns the
/// plaintext transiently; callers must not retain the returned `String`
/// longer than the immediate use (the type itself cannot enforce this —
/// it's a documented contract, matching the teacher's treatment of other
/// transient-secret accessors).
pub struct ProtectedString {
    buffer: Vec<u8>,
    protect: bool,
    /// `Some` while `buffer` holds masked bytes; `None` when `protect` is
    /// false and `buffer` holds plaintext directly.
    mask_seed: Option<Vec<u8>>,
}

impl ProtectedString {
    /// Builds an unprotected value. Plaintext is stored as-is.
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            buffer: value.into().into_bytes(),
            protect: false,
            mask_seed: None,
        }
    }

    /// Builds a protected value, masking `value` immediately under a fresh
    /// per-process keystream seed so the plaintext bytes handed in do not
    /// linger unmasked inside `self`.
    pub fn protected(value: impl Into<String>, process_seed: &[u8]) -> Self {
        let mut buffer = value.into().into_bytes();
        let mut generator = ArxKeystream::new(process_seed);
        generator.apply(&mut buffer);
        Self {
            buffer,
            protect: true,
            mask_seed: Some(process_seed.to_vec()),
        }
    }

    pub fn is_protected(&self) -> bool {
        self.protect
    }

    /// Returns the plaintext. For protected values this unmasks a scratch
    /// copy, leaving `self.buffer` untouched (masked) — re-reading twice
    /// must give the same answer, unlike `ArxKeystream::apply`'s
    /// stream-advancing semantics.
    pub fn read(&self) -> String {
        let plaintext = match &self.mask_seed {
            Some(seed) => {
                let mut scratch = self.buffer.clone();
                let mut generator = ArxKeystream::new(seed);
                generator.apply(&mut scratch);
                scratch
            }
            None => self.buffer.clone(),
        };
        String::from_utf8_lossy(&plaintext).into_owned()
    }

    /// Replaces the value, preserving the current `protect` flag and
    /// generating a fresh mask seed if protected.
    pub fn set(&mut self, value: impl Into<String>, process_seed: &[u8]) {
        if self.protect {
            *self = Self::protected(value, process_seed);
        } else {
            self.buffer.zeroize();
            self.buffer = value.into().into_bytes();
        }
    }
}

impl Drop for ProtectedString {
    fn drop(&mut self) {
        self.buffer.zeroize();
    }
}

impl Clone for ProtectedString {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            protect: self.protect,
            mask_seed: self.mask_seed.clone(),
        }
    }
}

/// Equality compares plaintext and flag (§3), not the masked representation
/// or mask seed.
impl PartialEq for ProtectedString {
    fn eq(&self, other: &Self) -> bool {
        self.protect == other.protect && self.read() == other.read()
    }
}

impl Eq for ProtectedString {}

impl std::fmt::Debug for ProtectedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtectedString")
            .field("protect", &self.protect)
            .field("value", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_value_round_trips() {
        let s = ProtectedString::plain("hello");
        assert!(!s.is_protected());
        assert_eq!(s.read(), "hello");
    }

    #[test]
    fn protected_value_round_trips_and_is_masked_at_rest() {
        let seed = b"process-seed";
        let s = ProtectedString::protected("p4ss!", seed);
        assert!(s.is_protected());
        assert_eq!(s.read(), "p4ss!");
        assert_ne!(s.buffer, b"p4ss!");
    }

    #[test]
    fn repeated_reads_are_stable() {
        let s = ProtectedString::protected("stable", b"seed");
        assert_eq!(s.read(), s.read());
    }

    #[test]
    fn equality_compares_plaintext_and_flag_not_representation() {
        let a = ProtectedString::protected("same", b"seed-a");
        let b = ProtectedString::protected("same", b"seed-b");
        assert_eq!(a, b);

        let c = ProtectedString::plain("same");
        assert_ne!(a, c);
    }
}
