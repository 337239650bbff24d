// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The whole-file codec (§4): header → envelope → block-hashed stream →
//! compression → body, composed end to end. Everything upstream of this
//! module deals with one layer at a time; `open`/`save` are the only entry
//! points the application layer calls.

pub mod block_stream;
mod body;
mod compression;
mod envelope;
pub mod header;

use sealvault_domain::entities::{Compression, Database};
use sealvault_domain::repositories::StatusCallback;
use sealvault_domain::services::crypto::fill_random;
use sealvault_domain::services::{derive_composite_key, InnerStreamMasker};
use sealvault_domain::value_objects::KeySource;
use sealvault_domain::VaultError;

use header::{FileHeader, InnerStreamId};

/// Parses, decrypts, de-frames, decompresses, and deserializes a whole
/// file, deriving the master key from `sources` under the header's own
/// transform seed/rounds/master seed (§4.1–§4.6).
pub fn open(data: &[u8], sources: &[KeySource], status: Option<&mut dyn StatusCallback>) -> Result<Database, VaultError> {
    let (header, offset) = FileHeader::parse(data)?;
    let master_key = derive_composite_key(sources, &header.transform_seed, header.transform_rounds, &header.master_seed, status)?;

    let inner_stream = envelope::open_envelope(
        master_key.as_bytes(),
        &header.encryption_iv,
        &header.stream_start_bytes,
        &data[offset..],
    )?;
    let framed_payload = block_stream::read_blocks(&inner_stream)?;
    let compression = compression_from_flag(header.compression)?;
    let xml = compression::decompress(compression, &framed_payload)?;

    let mut process_seed = [0u8; 32];
    fill_random(&mut process_seed);
    let mut masker = InnerStreamMasker::new(&header.inner_random_stream_key);

    let mut db = Database::new(master_key, header.transform_rounds);
    db.compression = compression;
    body::parse(&xml, &mut masker, &process_seed, &mut db)?;

    Ok(db)
}

/// Serializes, compresses, re-frames, and re-encrypts `db` under freshly
/// generated salts (§4.3: a master seed and transform seed are drawn fresh
/// on every save, never reused from the file that was opened).
/// `db.master_key` is replaced with the freshly derived key on success.
pub fn save(db: &mut Database, sources: &[KeySource], status: Option<&mut dyn StatusCallback>) -> Result<Vec<u8>, VaultError> {
    let mut transform_seed = [0u8; 32];
    let mut master_seed = [0u8; 32];
    let mut encryption_iv = [0u8; 16];
    let mut inner_random_stream_key = [0u8; 32];
    let mut stream_start_bytes = [0u8; 32];
    fill_random(&mut transform_seed);
    fill_random(&mut master_seed);
    fill_random(&mut encryption_iv);
    fill_random(&mut inner_random_stream_key);
    fill_random(&mut stream_start_bytes);

    let master_key = derive_composite_key(sources, &transform_seed, db.key_transform_rounds, &master_seed, status)?;

    let mut masker = InnerStreamMasker::new(&inner_random_stream_key);
    let xml = body::serialize(db, &mut masker)?;
    let compressed = compression::compress(db.compression, &xml)?;
    let framed = block_stream::write_blocks(&compressed);
    let ciphertext = envelope::seal_envelope(master_key.as_bytes(), &encryption_iv, &stream_start_bytes, &framed);

    let header = FileHeader {
        compression: compression_to_flag(db.compression),
        master_seed,
        transform_seed,
        transform_rounds: db.key_transform_rounds,
        encryption_iv,
        inner_random_stream_key,
        stream_start_bytes,
        inner_stream_id: InnerStreamId::ArxKeystream,
    };

    let mut out = header.write();
    out.extend_from_slice(&ciphertext);

    db.master_key = master_key;
    db.modified = false;
    Ok(out)
}

fn compression_from_flag(flag: u32) -> Result<Compression, VaultError> {
    match flag {
        0 => Ok(Compression::None),
        1 => Ok(Compression::GZip),
        other => Err(VaultError::corrupt_header(format!("unrecognized compression flag {other}"))),
    }
}

fn compression_to_flag(compression: Compression) -> u32 {
    match compression {
        Compression::None => 0,
        Compression::GZip => 1,
    }
}
