// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The inner-stream masker (§4.5): a scoped, single-consumer keystream
//! object taken by mutable reference into the body codec for the duration
//! of one parse or emit pass (§9 "Dynamic keystream state"). It cannot be
//! cloned or duplicated, so two callers can never independently advance —
//! and therefore desynchronize — the same keystream.

use crate::services::crypto::ArxKeystream;
use crate::value_objects::ProtectedString;

/// Wraps an `ArxKeystream` seeded from the file's `InnerRandomStreamKey`
/// and exposes only the document-order mask/unmask operations the body
/// codec needs, never the raw keystream.
pub struct InnerStreamMasker {
    generator: ArxKeystream,
}

impl InnerStreamMasker {
    pub fn new(inner_random_stream_key: &[u8]) -> Self {
        Self {
            generator: ArxKeystream::new(inner_random_stream_key),
        }
    }

    /// Masks `plaintext` with the next block of keystream bytes, producing
    /// the on-disk representation of a protected `<Value>` element.
    pub fn mask(&mut self, plaintext: &[u8]) -> Vec<u8> {
        let mut buf = plaintext.to_vec();
        self.generator.apply(&mut buf);
        buf
    }

    /// Unmasks `ciphertext` read from a protected `<Value>` element. Must
    /// be called in the same document-order sequence the writer used
    /// (§4.5 order invariant) — this method does not and cannot check
    /// that on its own.
    pub fn unmask(&mut self, ciphertext: &[u8]) -> Vec<u8> {
        let mut buf = ciphertext.to_vec();
        self.generator.apply(&mut buf);
        buf
    }

    /// Unmasks directly into a `ProtectedString`, re-protecting it under
    /// the given in-memory process seed for the duration the database
    /// stays open (§3, §5: distinct from the on-disk inner-stream key).
    pub fn unmask_into_protected(&mut self, ciphertext: &[u8], process_seed: &[u8]) -> ProtectedString {
        let plaintext = self.unmask(ciphertext);
        let value = String::from_utf8_lossy(&plaintext).into_owned();
        ProtectedString::protected(value, process_seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_then_unmask_with_independently_seeded_maskers_round_trips() {
        let mut writer = InnerStreamMasker::new(b"stream-key");
        let mut reader = InnerStreamMasker::new(b"stream-key");

        let masked = writer.mask(b"p4ss!");
        let unmasked = reader.unmask(&masked);
        assert_eq!(unmasked, b"p4ss!");
    }

    #[test]
    fn sequential_fields_must_be_consumed_in_the_same_order() {
        let mut writer = InnerStreamMasker::new(b"stream-key");
        let a_masked = writer.mask(b"first");
        let b_masked = writer.mask(b"second");

        let mut reader = InnerStreamMasker::new(b"stream-key");
        assert_eq!(reader.unmask(&a_masked), b"first");
        assert_eq!(reader.unmask(&b_masked), b"second");
    }
}
