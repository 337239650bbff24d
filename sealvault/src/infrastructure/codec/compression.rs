// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Gzip compression of the de-framed inner stream (§4.4 "after de-framing,
//! if CompressionFlags=1, the payload is gzip"). Applied after block-hash
//! verification, so a corrupt compressed stream is caught by the block
//! hash before it ever reaches the inflator.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression as GzCompression;

use sealvault_domain::entities::Compression;
use sealvault_domain::VaultError;

pub fn compress(compression: Compression, payload: &[u8]) -> Result<Vec<u8>, VaultError> {
    match compression {
        Compression::None => Ok(payload.to_vec()),
        Compression::GZip => {
            let mut encoder = GzEncoder::new(Vec::new(), GzCompression::default());
            encoder.write_all(payload)?;
            encoder.finish().map_err(VaultError::from)
        }
    }
}

pub fn decompress(compression: Compression, payload: &[u8]) -> Result<Vec<u8>, VaultError> {
    match compression {
        Compression::None => Ok(payload.to_vec()),
        Compression::GZip => {
            let mut decoder = GzDecoder::new(payload);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| VaultError::corrupt_payload(format!("gzip inflate failed: {e}")))?;
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_a_passthrough() {
        let payload = b"plain bytes".to_vec();
        let compressed = compress(Compression::None, &payload).unwrap();
        assert_eq!(compressed, payload);
        assert_eq!(decompress(Compression::None, &compressed).unwrap(), payload);
    }

    #[test]
    fn gzip_round_trips() {
        let payload = b"some body bytes to squeeze, repeated repeated repeated".to_vec();
        let compressed = compress(Compression::GZip, &payload).unwrap();
        assert_ne!(compressed, payload);
        assert_eq!(decompress(Compression::GZip, &compressed).unwrap(), payload);
    }

    #[test]
    fn corrupted_gzip_stream_fails_as_corrupt_payload() {
        let payload = b"some body bytes".to_vec();
        let mut compressed = compress(Compression::GZip, &payload).unwrap();
        for byte in compressed.iter_mut().take(8) {
            *byte ^= 0xFF;
        }
        assert!(decompress(Compression::GZip, &compressed).is_err());
    }
}
