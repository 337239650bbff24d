// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The outer file header (§4.2): fixed signature bytes, a format version,
//! and a run of TLV fields terminated by a zero-length tag-`0x00` entry.
//! Parsing and serialization are plain byte-slice operations — there is no
//! streaming reader here, the header is small and always read whole.

use sealvault_domain::VaultError;

pub const SIGNATURE_1: [u8; 4] = [0x9A, 0xA2, 0xD9, 0x03];
pub const SIGNATURE_2: [u8; 4] = [0xB5, 0x4B, 0xFB, 0x67];

/// Major 3, minor 1 packed little-endian (major in the high 16 bits).
pub const FORMAT_VERSION: u32 = 0x0003_0001;

const TAG_CIPHER_UUID: u8 = 0x02;
const TAG_COMPRESSION_FLAGS: u8 = 0x03;
const TAG_MASTER_SEED: u8 = 0x04;
const TAG_TRANSFORM_SEED: u8 = 0x05;
const TAG_TRANSFORM_ROUNDS: u8 = 0x06;
const TAG_ENCRYPTION_IV: u8 = 0x07;
const TAG_INNER_RANDOM_STREAM_KEY: u8 = 0x08;
const TAG_STREAM_START_BYTES: u8 = 0x09;
const TAG_INNER_RANDOM_STREAM_ID: u8 = 0x0A;
const TAG_END: u8 = 0x00;

/// `InnerRandomStreamID` values (§4.2). `None` stores string values in
/// clear; `ArxKeystream` is the only masking scheme this crate implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnerStreamId {
    None,
    ArxKeystream,
}

impl InnerStreamId {
    fn from_u32(value: u32) -> Result<Self, VaultError> {
        match value {
            0 => Ok(InnerStreamId::None),
            2 => Ok(InnerStreamId::ArxKeystream),
            other => Err(VaultError::corrupt_header(format!("unrecognized inner stream id {other}"))),
        }
    }

    fn as_u32(self) -> u32 {
        match self {
            InnerStreamId::None => 0,
            InnerStreamId::ArxKeystream => 2,
        }
    }
}

/// Every field the outer header carries, fully decoded. `compression` and
/// `inner_stream_id` fall back to their documented defaults (gzip-off,
/// ARX-20) when absent from the file (§4.2 "Required fields").
#[derive(Clone)]
pub struct FileHeader {
    pub compression: u32,
    pub master_seed: [u8; 32],
    pub transform_seed: [u8; 32],
    pub transform_rounds: u64,
    pub encryption_iv: [u8; 16],
    pub inner_random_stream_key: [u8; 32],
    pub stream_start_bytes: [u8; 32],
    pub inner_stream_id: InnerStreamId,
}

impl FileHeader {
    /// Parses the signature, format version, and TLV field run from the
    /// start of `data`. Returns the decoded header plus the byte offset
    /// where the encrypted envelope begins.
    pub fn parse(data: &[u8]) -> Result<(FileHeader, usize), VaultError> {
        if data.len() < 12 {
            return Err(VaultError::corrupt_header("file shorter than fixed header prefix"));
        }
        if data[0..4] != SIGNATURE_1 {
            return Err(VaultError::corrupt_header("bad signature 1"));
        }
        if data[4..8] != SIGNATURE_2 {
            return Err(VaultError::corrupt_header("bad signature 2"));
        }
        let version = u32::from_le_bytes(data[8..12].try_into().unwrap());
        if version & 0xFFFF_0000 != FORMAT_VERSION & 0xFFFF_0000 {
            return Err(VaultError::UnsupportedVersion(format!("major version mismatch: {version:#010x}")));
        }

        let mut cipher_uuid: Option<[u8; 16]> = None;
        let mut compression: Option<u32> = None;
        let mut master_seed: Option<[u8; 32]> = None;
        let mut transform_seed: Option<[u8; 32]> = None;
        let mut transform_rounds: Option<u64> = None;
        let mut encryption_iv: Option<[u8; 16]> = None;
        let mut inner_random_stream_key: Option<[u8; 32]> = None;
        let mut stream_start_bytes: Option<[u8; 32]> = None;
        let mut inner_stream_id: Option<u32> = None;

        let mut offset = 12;
        loop {
            if offset >= data.len() {
                return Err(VaultError::corrupt_header("header ran off the end of the file without a terminator"));
            }
            let tag = data[offset];
            offset += 1;
            if tag == TAG_END {
                // KDBX3-family terminator entries still carry a (usually
                // empty) length field; tolerate either shape.
                if data.len() >= offset + 2 {
                    let len = u16::from_le_bytes(data[offset..offset + 2].try_into().unwrap()) as usize;
                    offset += 2 + len;
                }
                break;
            }
            if offset + 2 > data.len() {
                return Err(VaultError::corrupt_header("truncated TLV length"));
            }
            let len = u16::from_le_bytes(data[offset..offset + 2].try_into().unwrap()) as usize;
            offset += 2;
            if offset + len > data.len() {
                return Err(VaultError::corrupt_header("truncated TLV value"));
            }
            let value = &data[offset..offset + len];
            offset += len;

            match tag {
                TAG_CIPHER_UUID => cipher_uuid = Some(fixed_16(value, "CipherUUID")?),
                TAG_COMPRESSION_FLAGS => compression = Some(fixed_u32(value, "CompressionFlags")?),
                TAG_MASTER_SEED => master_seed = Some(fixed_32(value, "MasterSeed")?),
                TAG_TRANSFORM_SEED => transform_seed = Some(fixed_32(value, "TransformSeed")?),
                TAG_TRANSFORM_ROUNDS => transform_rounds = Some(fixed_u64(value, "TransformRounds")?),
                TAG_ENCRYPTION_IV => encryption_iv = Some(fixed_16(value, "EncryptionIV")?),
                TAG_INNER_RANDOM_STREAM_KEY => inner_random_stream_key = Some(fixed_32(value, "InnerRandomStreamKey")?),
                TAG_STREAM_START_BYTES => stream_start_bytes = Some(fixed_32(value, "StreamStartBytes")?),
                TAG_INNER_RANDOM_STREAM_ID => inner_stream_id = Some(fixed_u32(value, "InnerRandomStreamID")?),
                _ => {} // forward-compatible: unrecognized tags are skipped, not preserved (no body to attach them to)
            }
        }

        let cipher_uuid = cipher_uuid.ok_or_else(|| VaultError::corrupt_header("missing CipherUUID"))?;
        if cipher_uuid != sealvault_domain::Cipher::AES_UUID {
            return Err(VaultError::unknown_cipher(hex::encode(cipher_uuid)));
        }

        let header = FileHeader {
            compression: compression.unwrap_or(0),
            master_seed: master_seed.ok_or_else(|| VaultError::corrupt_header("missing MasterSeed"))?,
            transform_seed: transform_seed.ok_or_else(|| VaultError::corrupt_header("missing TransformSeed"))?,
            transform_rounds: transform_rounds.ok_or_else(|| VaultError::corrupt_header("missing TransformRounds"))?,
            encryption_iv: encryption_iv.ok_or_else(|| VaultError::corrupt_header("missing EncryptionIV"))?,
            inner_random_stream_key: inner_random_stream_key
                .ok_or_else(|| VaultError::corrupt_header("missing InnerRandomStreamKey"))?,
            stream_start_bytes: stream_start_bytes
                .ok_or_else(|| VaultError::corrupt_header("missing StreamStartBytes"))?,
            inner_stream_id: InnerStreamId::from_u32(inner_stream_id.unwrap_or(2))?,
        };
        Ok((header, offset))
    }

    /// Serializes the signature, format version, and every TLV field plus
    /// the terminator, in the same field order `parse` recognizes them.
    pub fn write(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(256);
        out.extend_from_slice(&SIGNATURE_1);
        out.extend_from_slice(&SIGNATURE_2);
        out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());

        push_field(&mut out, TAG_CIPHER_UUID, &sealvault_domain::Cipher::AES_UUID);
        push_field(&mut out, TAG_COMPRESSION_FLAGS, &self.compression.to_le_bytes());
        push_field(&mut out, TAG_MASTER_SEED, &self.master_seed);
        push_field(&mut out, TAG_TRANSFORM_SEED, &self.transform_seed);
        push_field(&mut out, TAG_TRANSFORM_ROUNDS, &self.transform_rounds.to_le_bytes());
        push_field(&mut out, TAG_ENCRYPTION_IV, &self.encryption_iv);
        push_field(&mut out, TAG_INNER_RANDOM_STREAM_KEY, &self.inner_random_stream_key);
        push_field(&mut out, TAG_STREAM_START_BYTES, &self.stream_start_bytes);
        push_field(&mut out, TAG_INNER_RANDOM_STREAM_ID, &self.inner_stream_id.as_u32().to_le_bytes());
        push_field(&mut out, TAG_END, &[]);
        out
    }
}

fn push_field(out: &mut Vec<u8>, tag: u8, value: &[u8]) {
    out.push(tag);
    out.extend_from_slice(&(value.len() as u16).to_le_bytes());
    out.extend_from_slice(value);
}

fn fixed_16(value: &[u8], field: &str) -> Result<[u8; 16], VaultError> {
    value
        .try_into()
        .map_err(|_| VaultError::corrupt_header(format!("{field} has wrong length")))
}

fn fixed_32(value: &[u8], field: &str) -> Result<[u8; 32], VaultError> {
    value
        .try_into()
        .map_err(|_| VaultError::corrupt_header(format!("{field} has wrong length")))
}

fn fixed_u32(value: &[u8], field: &str) -> Result<u32, VaultError> {
    let bytes: [u8; 4] = value
        .try_into()
        .map_err(|_| VaultError::corrupt_header(format!("{field} has wrong length")))?;
    Ok(u32::from_le_bytes(bytes))
}

fn fixed_u64(value: &[u8], field: &str) -> Result<u64, VaultError> {
    let bytes: [u8; 8] = value
        .try_into()
        .map_err(|_| VaultError::corrupt_header(format!("{field} has wrong length")))?;
    Ok(u64::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> FileHeader {
        FileHeader {
            compression: 1,
            master_seed: [1u8; 32],
            transform_seed: [2u8; 32],
            transform_rounds: 6000,
            encryption_iv: [3u8; 16],
            inner_random_stream_key: [4u8; 32],
            stream_start_bytes: [5u8; 32],
            inner_stream_id: InnerStreamId::ArxKeystream,
        }
    }

    #[test]
    fn round_trips_every_field() {
        let header = sample_header();
        let bytes = header.write();
        let (parsed, offset) = FileHeader::parse(&bytes).unwrap();
        assert_eq!(offset, bytes.len());
        assert_eq!(parsed.compression, header.compression);
        assert_eq!(parsed.master_seed, header.master_seed);
        assert_eq!(parsed.transform_seed, header.transform_seed);
        assert_eq!(parsed.transform_rounds, header.transform_rounds);
        assert_eq!(parsed.encryption_iv, header.encryption_iv);
        assert_eq!(parsed.inner_random_stream_key, header.inner_random_stream_key);
        assert_eq!(parsed.stream_start_bytes, header.stream_start_bytes);
        assert_eq!(parsed.inner_stream_id, header.inner_stream_id);
    }

    #[test]
    fn rejects_bad_signature() {
        let mut bytes = sample_header().write();
        bytes[0] ^= 0xFF;
        assert!(matches!(FileHeader::parse(&bytes), Err(VaultError::CorruptHeader(_))));
    }

    #[test]
    fn rejects_unknown_cipher_uuid() {
        let mut bytes = sample_header().write();
        // CipherUUID is the first TLV field, right after the 12-byte prefix.
        bytes[12 + 3] ^= 0xFF;
        assert!(matches!(FileHeader::parse(&bytes), Err(VaultError::UnknownCipher(_))));
    }

    #[test]
    fn rejects_truncated_header() {
        let bytes = sample_header().write();
        let truncated = &bytes[..bytes.len() - 40];
        assert!(FileHeader::parse(truncated).is_err());
    }

    #[test]
    fn defaults_compression_and_stream_id_when_absent() {
        // Build a minimal header by hand, omitting the two fields with
        // documented defaults.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&SIGNATURE_1);
        bytes.extend_from_slice(&SIGNATURE_2);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        push_field(&mut bytes, TAG_CIPHER_UUID, &sealvault_domain::Cipher::AES_UUID);
        push_field(&mut bytes, TAG_MASTER_SEED, &[1u8; 32]);
        push_field(&mut bytes, TAG_TRANSFORM_SEED, &[2u8; 32]);
        push_field(&mut bytes, TAG_TRANSFORM_ROUNDS, &6000u64.to_le_bytes());
        push_field(&mut bytes, TAG_ENCRYPTION_IV, &[3u8; 16]);
        push_field(&mut bytes, TAG_INNER_RANDOM_STREAM_KEY, &[4u8; 32]);
        push_field(&mut bytes, TAG_STREAM_START_BYTES, &[5u8; 32]);
        push_field(&mut bytes, TAG_END, &[]);

        let (parsed, _) = FileHeader::parse(&bytes).unwrap();
        assert_eq!(parsed.compression, 0);
        assert_eq!(parsed.inner_stream_id, InnerStreamId::ArxKeystream);
    }
}
