//! `UnityFS` archive container.
//!
//! Layout: a big-endian header, a (usually compressed) block-info table
//! describing the data blocks and the directory of nodes, then the data
//! blocks themselves. Concatenated, the decompressed blocks form one flat
//! buffer that the directory nodes slice into files.

use std::io::Read;

use lzma_rust2::LzmaReader;

use super::UnityError;
use super::stream::Stream;

pub(crate) const SIGNATURE: &str = "UnityFS";
pub(crate) const MIN_VERSION: u32 = 6;
pub(crate) const MAX_VERSION: u32 = 8;

/// Low bits of the header and block flags.
const COMPRESSION_MASK: u32 = 0x3F;
/// Block info is stored at the end of the file instead of after the header.
pub(crate) const FLAG_INFO_AT_END: u32 = 0x80;
/// Data blocks start on a 16-byte boundary after the block info.
pub(crate) const FLAG_INFO_PADDING: u32 = 0x200;
/// Directory node holds a serialized file.
pub(crate) const NODE_SERIALIZED: u32 = 0x04;

/// Compression scheme of a block or of the block-info table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Compression {
    None,
    Lzma,
    Lz4,
}

impl Compression {
    pub(crate) fn from_flags(flags: u32) -> Result<Self, UnityError> {
        match flags & COMPRESSION_MASK {
            0 => Ok(Self::None),
            1 => Ok(Self::Lzma),
            // LZ4HC shares the LZ4 block format
            2 | 3 => Ok(Self::Lz4),
            other => Err(UnityError::UnsupportedCompression(other)),
        }
    }

    #[cfg(test)]
    pub(crate) fn flag(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Lzma => 1,
            Self::Lz4 => 2,
        }
    }
}

/// One file in the bundle directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub offset: u64,
    pub size: u64,
    pub flags: u32,
    pub path: String,
}

impl Node {
    pub(crate) fn is_serialized(&self) -> bool {
        self.flags & NODE_SERIALIZED != 0
    }
}

struct BlockInfo {
    uncompressed: usize,
    compressed: usize,
    compression: Compression,
}

/// A parsed bundle with its data blocks already expanded.
pub(crate) struct UnityFs {
    pub nodes: Vec<Node>,
    data: Vec<u8>,
}

impl UnityFs {
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self, UnityError> {
        let mut s = Stream::new(bytes, true);

        let signature = s.cstr()?;
        if signature != SIGNATURE {
            return Err(UnityError::Signature(signature));
        }
        let version = s.u32()?;
        if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
            return Err(UnityError::UnsupportedVersion {
                format: SIGNATURE,
                version,
            });
        }
        let engine = s.cstr()?;
        let _revision = s.cstr()?;
        let _total_size = s.i64()?;
        let info_compressed = s.u32()? as usize;
        let info_uncompressed = s.u32()? as usize;
        let flags = s.u32()?;
        log::debug!("UnityFS v{version} built by {engine}, flags {flags:#x}");

        if version >= 7 {
            s.align(16)?;
        }

        let info_raw = if flags & FLAG_INFO_AT_END != 0 {
            let start = bytes
                .len()
                .checked_sub(info_compressed)
                .ok_or(UnityError::Truncated {
                    offset: 0,
                    wanted: info_compressed,
                })?;
            &bytes[start..]
        } else {
            s.bytes(info_compressed)?
        };
        let info = decompress(
            Compression::from_flags(flags)?,
            info_raw,
            info_uncompressed,
        )?;
        if flags & FLAG_INFO_PADDING != 0 {
            s.align(16)?;
        }

        let (blocks, nodes) = parse_block_info(&info)?;

        let mut data = Vec::new();
        for block in &blocks {
            let raw = s.bytes(block.compressed)?;
            data.extend(decompress(block.compression, raw, block.uncompressed)?);
        }

        Ok(Self { nodes, data })
    }

    /// Contents of a directory node.
    pub(crate) fn node_data(&self, node: &Node) -> Result<&[u8], UnityError> {
        let out_of_range = || UnityError::Truncated {
            offset: usize::try_from(node.offset).unwrap_or(usize::MAX),
            wanted: usize::try_from(node.size).unwrap_or(usize::MAX),
        };
        let start = usize::try_from(node.offset).map_err(|_| out_of_range())?;
        let size = usize::try_from(node.size).map_err(|_| out_of_range())?;
        start
            .checked_add(size)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(out_of_range)
    }
}

fn parse_block_info(info: &[u8]) -> Result<(Vec<BlockInfo>, Vec<Node>), UnityError> {
    let mut s = Stream::new(info, true);
    // Hash of the uncompressed data; not verified
    s.bytes(16)?;

    let block_count = s.count()?;
    let mut blocks = Vec::with_capacity(block_count.min(1024));
    for _ in 0..block_count {
        let uncompressed = s.u32()? as usize;
        let compressed = s.u32()? as usize;
        let flags = u32::from(s.u16()?);
        blocks.push(BlockInfo {
            uncompressed,
            compressed,
            compression: Compression::from_flags(flags)?,
        });
    }

    let node_count = s.count()?;
    let mut nodes = Vec::with_capacity(node_count.min(1024));
    for _ in 0..node_count {
        let offset = s.u64()?;
        let size = s.u64()?;
        let flags = s.u32()?;
        let path = s.cstr()?;
        nodes.push(Node {
            offset,
            size,
            flags,
            path,
        });
    }
    Ok((blocks, nodes))
}

/// Expand one block to exactly `size` bytes.
fn decompress(compression: Compression, raw: &[u8], size: usize) -> Result<Vec<u8>, UnityError> {
    let out = match compression {
        Compression::None => raw.to_vec(),
        Compression::Lz4 => lz4_flex::block::decompress(raw, size)
            .map_err(|e| UnityError::Decompress(format!("lz4: {e}")))?,
        Compression::Lzma => decompress_lzma(raw, size)?,
    };
    if out.len() != size {
        return Err(UnityError::Decompress(format!(
            "block expanded to {} bytes, expected {}",
            out.len(),
            size
        )));
    }
    Ok(out)
}

/// Bundle LZMA blocks carry the 5-byte properties header (properties byte,
/// little-endian dictionary size) but no size field; the size comes from
/// the block table.
fn decompress_lzma(raw: &[u8], size: usize) -> Result<Vec<u8>, UnityError> {
    if raw.len() < 5 {
        return Err(UnityError::Decompress("lzma: missing properties".into()));
    }
    let props = raw[0];
    let dict_size = u32::from_le_bytes([raw[1], raw[2], raw[3], raw[4]]);
    let mut reader = LzmaReader::new_with_props(&raw[5..], size as u64, props, dict_size, None)
        .map_err(|e| UnityError::Decompress(format!("lzma: {e}")))?;
    let mut out = Vec::with_capacity(size);
    reader
        .read_to_end(&mut out)
        .map_err(|e| UnityError::Decompress(format!("lzma: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unity::testing::{BundleBuilder, text_asset_file};

    #[test]
    fn test_compression_flags() {
        assert_eq!(Compression::from_flags(0x40).unwrap(), Compression::None);
        assert_eq!(Compression::from_flags(0x41).unwrap(), Compression::Lzma);
        assert_eq!(Compression::from_flags(0x43).unwrap(), Compression::Lz4);
        assert!(matches!(
            Compression::from_flags(0x04),
            Err(UnityError::UnsupportedCompression(4))
        ));
    }

    #[test]
    fn test_nodes_and_data() {
        let file = text_asset_file(&[("Assets/Roms/A.bytes", b"rom a")]).build();
        for compression in [Compression::None, Compression::Lz4] {
            let bytes = BundleBuilder::new(compression)
                .node("CAB-0001", NODE_SERIALIZED, &file)
                .node("CAB-0001.resS", 0, b"stream data")
                .build();
            let fs = UnityFs::parse(&bytes).unwrap();
            assert_eq!(fs.nodes.len(), 2);
            assert!(fs.nodes[0].is_serialized());
            assert!(!fs.nodes[1].is_serialized());
            assert_eq!(fs.node_data(&fs.nodes[0]).unwrap(), &file[..]);
            assert_eq!(fs.node_data(&fs.nodes[1]).unwrap(), b"stream data");
        }
    }

    #[test]
    fn test_info_at_end() {
        let bytes = BundleBuilder::new(Compression::Lz4)
            .info_at_end()
            .node("CAB-0002", 0, b"payload")
            .build();
        let fs = UnityFs::parse(&bytes).unwrap();
        assert_eq!(fs.node_data(&fs.nodes[0]).unwrap(), b"payload");
    }

    #[test]
    fn test_lzma_block() {
        let payload: Vec<u8> = (0..4096u32).map(|i| (i % 97) as u8).collect();
        let bytes = BundleBuilder::new(Compression::Lzma)
            .node("CAB-0003", 0, &payload)
            .build();
        let fs = UnityFs::parse(&bytes).unwrap();
        assert_eq!(fs.node_data(&fs.nodes[0]).unwrap(), &payload[..]);
    }

    #[test]
    fn test_bad_signature() {
        let err = UnityFs::parse(b"UnityWeb\0\0\0\0\x06").err().unwrap();
        assert!(matches!(err, UnityError::Signature(s) if s == "UnityWeb"));
    }

    #[test]
    fn test_truncated_blocks() {
        let bytes = BundleBuilder::new(Compression::None)
            .node("CAB-0004", 0, &[0x55; 256])
            .build();
        let err = UnityFs::parse(&bytes[..bytes.len() - 16]).err().unwrap();
        assert!(matches!(err, UnityError::Truncated { .. }));
    }

    #[test]
    fn test_node_out_of_range() {
        let bytes = BundleBuilder::new(Compression::None)
            .node("CAB-0005", 0, b"abc")
            .build();
        let mut fs = UnityFs::parse(&bytes).unwrap();
        fs.nodes[0].size = 64;
        assert!(fs.node_data(&fs.nodes[0]).is_err());
    }
}
