// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Composite key assembly and strengthening (§4.1): reduces each
//! `KeySource` to 32 bytes, concatenates and hashes them, then runs the
//! AES-256-ECB self-encryption loop under the file's transform seed before
//! combining with the master seed.

use base64::Engine;

use crate::error::VaultError;
use crate::repositories::{CancellationSignal, StatusCallback, StatusUpdate};
use crate::services::crypto::{ecb_self_encrypt_round, sha256};
use crate::value_objects::{CompositeKey, KeySource};

/// Cancellation is sampled at most this often (§5: "sampling granularity
/// <= 8192 rounds").
const CANCELLATION_SAMPLE_INTERVAL: u64 = 8192;

/// Produces the final 32-byte cipher key from an ordered list of key
/// sources, the file's transform seed, round count, and master seed.
///
/// Fails with `InvalidKey` if `sources` is empty or `rounds == 0` (§4.1).
/// If `status` reports `Cancel` between rounds, fails with `Cancelled` and
/// discards the partial strengthening state.
pub fn derive_composite_key(
    sources: &[KeySource],
    transform_seed: &[u8; 32],
    rounds: u64,
    master_seed: &[u8; 32],
    mut status: Option<&mut dyn StatusCallback>,
) -> Result<CompositeKey, VaultError> {
    if sources.is_empty() {
        return Err(VaultError::invalid_key("no key sources supplied"));
    }
    if rounds == 0 {
        return Err(VaultError::invalid_key("transform rounds must be >= 1"));
    }

    let reduced: Vec<[u8; 32]> = sources.iter().map(reduce_source).collect();
    let concatenated: Vec<&[u8]> = reduced.iter().map(|h| h.as_slice()).collect();
    let mut state = sha256(&concatenated);

    for round in 0..rounds {
        ecb_self_encrypt_round(transform_seed, &mut state);

        if round % CANCELLATION_SAMPLE_INTERVAL == 0 {
            if let Some(cb) = status.as_deref_mut() {
                let progress = ((round * 100) / rounds.max(1)) as u8;
                let update = StatusUpdate::new(progress, "strengthening composite key");
                if cb.report(update) == CancellationSignal::Cancel {
                    return Err(VaultError::Cancelled);
                }
            }
        }
    }

    let strengthened = sha256(&[&state]);
    let final_key = sha256(&[master_seed, &strengthened]);
    Ok(CompositeKey::from_final_key(final_key))
}

fn reduce_source(source: &KeySource) -> [u8; 32] {
    match source {
        KeySource::Passphrase(bytes) => sha256(&[bytes]),
        KeySource::KeyFile(bytes) => decode_key_file(bytes),
        KeySource::OsAccountToken { user, machine } => {
            sha256(&[user.as_bytes(), machine.as_bytes()])
        }
    }
}

/// Key-file decoding (§4.1 rule 2): 32 raw bytes as-is; else 64 hex chars;
/// else the `<Data>` element of the key-file XML document; else SHA-256 of
/// the whole file.
fn decode_key_file(bytes: &[u8]) -> [u8; 32] {
    if bytes.len() == 32 {
        let mut out = [0u8; 32];
        out.copy_from_slice(bytes);
        return out;
    }

    if bytes.len() == 64 {
        if let Ok(text) = std::str::from_utf8(bytes) {
            if text.bytes().all(|b| b.is_ascii_hexdigit()) {
                if let Ok(decoded) = hex::decode(text) {
                    if decoded.len() == 32 {
                        let mut out = [0u8; 32];
                        out.copy_from_slice(&decoded);
                        return out;
                    }
                }
            }
        }
    }

    if let Some(data) = extract_xml_data_element(bytes) {
        if let Ok(decoded) = base64::engine::general_purpose::STANDARD.decode(data.trim()) {
            if decoded.len() == 32 {
                let mut out = [0u8; 32];
                out.copy_from_slice(&decoded);
                return out;
            }
        }
    }

    sha256(&[bytes])
}

/// Pulls the text content of a `<Data>...</Data>` element out of a
/// key-file XML document without a full XML parser — the key-file schema
/// is a single flat element, so substring extraction is exact and avoids
/// pulling a parsing dependency into the domain crate for one field.
fn extract_xml_data_element(bytes: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(bytes).ok()?;
    let open_tag = text.find("<Data")?;
    let content_start = text[open_tag..].find('>')? + open_tag + 1;
    let close_tag = text[content_start..].find("</Data>")? + content_start;
    Some(&text[content_start..close_tag])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sources_fail_with_invalid_key() {
        let err = derive_composite_key(&[], &[0u8; 32], 6000, &[0u8; 32], None).unwrap_err();
        assert!(matches!(err, VaultError::InvalidKey(_)));
    }

    #[test]
    fn zero_rounds_fail_with_invalid_key() {
        let sources = vec![KeySource::Passphrase(b"test".to_vec())];
        let err = derive_composite_key(&sources, &[0u8; 32], 0, &[0u8; 32], None).unwrap_err();
        assert!(matches!(err, VaultError::InvalidKey(_)));
    }

    #[test]
    fn is_deterministic_for_fixed_inputs() {
        let sources = vec![KeySource::Passphrase(b"test".to_vec())];
        let a = derive_composite_key(&sources, &[7u8; 32], 100, &[9u8; 32], None).unwrap();
        let b = derive_composite_key(&sources, &[7u8; 32], 100, &[9u8; 32], None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_passphrases_yield_different_keys() {
        let a = derive_composite_key(
            &[KeySource::Passphrase(b"test".to_vec())],
            &[7u8; 32],
            100,
            &[9u8; 32],
            None,
        )
        .unwrap();
        let b = derive_composite_key(
            &[KeySource::Passphrase(b"Test".to_vec())],
            &[7u8; 32],
            100,
            &[9u8; 32],
            None,
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn key_file_exactly_32_bytes_matches_scenario_six() {
        // §8 scenario 6: 32-byte key-file `00 01 ... 1F` combined with an
        // empty passphrase should give SHA-256(SHA-256("") || {00..1F}).
        let key_file_bytes: Vec<u8> = (0u8..32).collect();
        let reduced = decode_key_file(&key_file_bytes);
        assert_eq!(reduced.as_slice(), key_file_bytes.as_slice());

        let expected_raw = sha256(&[&sha256(&[b""]), &key_file_bytes]);
        let sources = vec![
            KeySource::Passphrase(b"".to_vec()),
            KeySource::KeyFile(key_file_bytes),
        ];
        let reduced_concat: Vec<[u8; 32]> = sources.iter().map(reduce_source).collect();
        let refs: Vec<&[u8]> = reduced_concat.iter().map(|h| h.as_slice()).collect();
        assert_eq!(sha256(&refs), expected_raw);
    }

    #[test]
    fn key_file_64_hex_chars_decodes_to_32_bytes() {
        let raw: Vec<u8> = (0u8..32).collect();
        let hex_text = hex::encode(&raw);
        let reduced = decode_key_file(hex_text.as_bytes());
        assert_eq!(reduced.as_slice(), raw.as_slice());
    }

    #[test]
    fn key_file_xml_data_element_is_extracted() {
        let raw = [0x5Au8; 32];
        let encoded = base64::engine::general_purpose::STANDARD.encode(raw);
        let xml = format!("<KeyFile><Key><Data>{encoded}</Data></Key></KeyFile>");
        let reduced = decode_key_file(xml.as_bytes());
        assert_eq!(reduced, raw);
    }

    #[test]
    fn arbitrary_key_file_falls_back_to_whole_file_hash() {
        let bytes = b"not a recognized key-file format at all";
        let reduced = decode_key_file(bytes);
        assert_eq!(reduced, sha256(&[bytes]));
    }
}
