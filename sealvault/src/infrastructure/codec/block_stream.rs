// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Block-hashed inner stream framing (§4.4): the decrypted envelope is a
//! sequence of `BlockIndex | BlockHash | BlockSize | BlockData` records, a
//! zero-sized block terminating the stream. This layer's integrity check is
//! independent of the CBC envelope's padding check — either one alone can
//! catch a tampered file.

use sealvault_domain::services::crypto::sha256;
use sealvault_domain::VaultError;

/// Writers never emit a block larger than this; readers place no upper
/// bound on an individual block's declared size beyond the buffer actually
/// available.
pub const MAX_BLOCK_SIZE: usize = 1024 * 1024;

/// Splits `payload` into `MAX_BLOCK_SIZE` chunks, hashes each, and appends
/// the zero-sized terminator block.
pub fn write_blocks(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + payload.len() / MAX_BLOCK_SIZE * 40 + 40);
    let mut index: u32 = 0;
    for chunk in payload.chunks(MAX_BLOCK_SIZE) {
        write_one_block(&mut out, index, chunk);
        index += 1;
    }
    write_one_block(&mut out, index, &[]);
    out
}

fn write_one_block(out: &mut Vec<u8>, index: u32, data: &[u8]) {
    out.extend_from_slice(&index.to_le_bytes());
    let hash = if data.is_empty() { [0u8; 32] } else { sha256(&[data]) };
    out.extend_from_slice(&hash);
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
}

/// Reads every block in `stream`, verifying each hash, and concatenates
/// their payloads up to (not including) the terminator. Fails with
/// `CorruptPayload` on a hash mismatch, out-of-order index, or truncated
/// record.
pub fn read_blocks(stream: &[u8]) -> Result<Vec<u8>, VaultError> {
    let mut offset = 0;
    let mut expected_index: u32 = 0;
    let mut out = Vec::new();

    loop {
        if offset + 4 + 32 + 4 > stream.len() {
            return Err(VaultError::corrupt_payload("truncated block record"));
        }
        let index = u32::from_le_bytes(stream[offset..offset + 4].try_into().unwrap());
        if index != expected_index {
            return Err(VaultError::corrupt_payload(format!(
                "out-of-order block index: expected {expected_index}, got {index}"
            )));
        }
        offset += 4;
        let hash: [u8; 32] = stream[offset..offset + 32].try_into().unwrap();
        offset += 32;
        let size = u32::from_le_bytes(stream[offset..offset + 4].try_into().unwrap()) as usize;
        offset += 4;

        if offset + size > stream.len() {
            return Err(VaultError::corrupt_payload("block data runs past end of stream"));
        }
        let data = &stream[offset..offset + size];
        offset += size;

        if size == 0 {
            if hash != [0u8; 32] {
                return Err(VaultError::corrupt_payload("terminator block has a non-zero hash"));
            }
            return Ok(out);
        }

        let computed = sha256(&[data]);
        if computed != hash {
            return Err(VaultError::corrupt_payload(format!("block {index} hash mismatch")));
        }
        out.extend_from_slice(data);
        expected_index += 1;
    }
}
