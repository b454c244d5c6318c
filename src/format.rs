use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEncoding {
    Raw,
    Gzip,
}

pub fn detect_encoding(data: &[u8]) -> TileEncoding {
    if data.starts_with(&GZIP_MAGIC) {
        TileEncoding::Gzip
    } else {
        TileEncoding::Raw
    }
}

/// Returns the protobuf payload, inflating gzip-compressed tiles.
pub fn decode_tile_payload(data: &[u8]) -> Result<Vec<u8>> {
    match detect_encoding(data) {
        TileEncoding::Gzip => {
            let mut decoder = GzDecoder::new(data);
            let mut decoded = Vec::new();
            decoder
                .read_to_end(&mut decoded)
                .context("decode gzip tile data")?;
            Ok(decoded)
        }
        TileEncoding::Raw => Ok(data.to_vec()),
    }
}

pub fn read_tile_file(path: &Path) -> Result<Vec<u8>> {
    let data = std::fs::read(path)
        .with_context(|| format!("failed to read tile file {}", path.display()))?;
    decode_tile_payload(&data).with_context(|| format!("failed to decode {}", path.display()))
}
