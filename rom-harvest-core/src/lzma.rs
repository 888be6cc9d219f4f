//! LZMA stream decompression.
//!
//! Containers store each compressed blob either as a classic `.lzma` stream
//! (a 13-byte header holding the properties byte, dictionary size and
//! uncompressed size, followed by the raw range-coded data) or as an `.xz`
//! stream. The two are told apart by the xz magic. An LZMA-alone stream may
//! record its size as unknown, in which case it ends with an end marker.

use std::io::{Read, Write};

use lzma_rust2::{LzmaOptions, LzmaReader, LzmaWriter, XzReader};

use crate::ExtractError;

/// Preset used by [`compress`].
const COMPRESS_PRESET: u32 = 6;

/// Stream header magic of the `.xz` container format.
pub const XZ_MAGIC: [u8; 6] = [0xFD, b'7', b'z', b'X', b'Z', 0x00];

/// Whether `data` starts with an `.xz` stream header.
pub fn is_xz(data: &[u8]) -> bool {
    data.starts_with(&XZ_MAGIC)
}

/// Decompress a complete LZMA-alone or xz stream into memory.
///
/// The output size is not trusted up front; the buffer grows as data is
/// decoded. For LZMA-alone streams, bytes after the end of the stream are
/// ignored.
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>, ExtractError> {
    let xz = is_xz(compressed);
    let mut out = Vec::new();
    if xz {
        XzReader::new(compressed, false)
            .read_to_end(&mut out)
            .map_err(|e| ExtractError::corrupt_stream(format!("xz: {e}")))?;
    } else {
        let mut reader = LzmaReader::new_mem_limit(compressed, u32::MAX, None)
            .map_err(|e| ExtractError::corrupt_stream(format!("invalid header: {e}")))?;
        reader
            .read_to_end(&mut out)
            .map_err(|e| ExtractError::corrupt_stream(e.to_string()))?;
    }

    log::debug!(
        "Decompressed {} bytes into {} bytes{}",
        compressed.len(),
        out.len(),
        if xz { " (xz)" } else { "" }
    );
    Ok(out)
}

/// Compress `data` into an LZMA-alone stream with an end marker.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, ExtractError> {
    let options = LzmaOptions::with_preset(COMPRESS_PRESET);
    let mut writer =
        LzmaWriter::new_use_header(Vec::new(), &options, None).map_err(ExtractError::write)?;
    writer.write_all(data).map_err(ExtractError::write)?;
    writer.finish().map_err(ExtractError::write)
}
