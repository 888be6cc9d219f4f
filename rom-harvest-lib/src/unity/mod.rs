//! Unity asset-bundle reader.
//!
//! Implements [`BundleReader`] for `UnityFS` bundles: block decompression
//! (LZ4 or LZMA), the node directory, and enough of each serialized file to
//! resolve `AssetBundle` container paths to `TextAsset` payloads.

mod fs;
mod serialized;
mod stream;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::bundle::BundleReader;
use fs::UnityFs;
use serialized::{CLASS_TEXT_ASSET, PPtr, SerializedFile};

/// Errors raised while reading a Unity bundle.
#[derive(Debug, Error)]
pub enum UnityError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("not a UnityFS bundle (signature {0:?})")]
    Signature(String),

    #[error("unsupported {format} version {version}")]
    UnsupportedVersion { format: &'static str, version: u32 },

    #[error("unsupported block compression {0}")]
    UnsupportedCompression(u32),

    #[error("decompression failed: {0}")]
    Decompress(String),

    #[error("data truncated: wanted {wanted} bytes at offset {offset:#x}")]
    Truncated { offset: usize, wanted: usize },

    #[error("invalid element count {0}")]
    BadCount(i32),

    #[error("object refers to unknown type index {0}")]
    BadTypeIndex(i32),

    #[error("no container entry for {0}")]
    UnknownAsset(String),

    #[error("container entry {path} points at missing object {path_id}")]
    MissingObject { path: String, path_id: i64 },

    #[error("{path} is a class {class_id} object, not a TextAsset")]
    NotTextAsset { path: String, class_id: i32 },
}

/// Where a container path points.
#[derive(Debug, Clone, Copy)]
struct AssetRef {
    /// Index into `UnityBundle::files`
    file: usize,
    pptr: PPtr,
}

/// An opened `UnityFS` bundle.
pub struct UnityBundle {
    fs: UnityFs,
    /// Serialized files with the index of the node they came from
    files: Vec<(usize, SerializedFile)>,
    container: BTreeMap<String, AssetRef>,
}

impl UnityBundle {
    /// Parse a bundle already read into memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, UnityError> {
        let fs = UnityFs::parse(bytes)?;

        let mut files = Vec::new();
        let mut container = BTreeMap::new();
        for (node_index, node) in fs.nodes.iter().enumerate() {
            if !node.is_serialized() {
                continue;
            }
            let data = fs.node_data(node)?;
            let file = SerializedFile::parse(data)?;
            for (path, pptr) in file.container(data)? {
                // First mapping wins, matching how the engine resolves duplicates
                container.entry(path).or_insert(AssetRef {
                    file: files.len(),
                    pptr,
                });
            }
            log::debug!(
                "Node {} (format {}) holds {} objects",
                node.path,
                file.version,
                file.objects.len()
            );
            files.push((node_index, file));
        }

        Ok(Self {
            fs,
            files,
            container,
        })
    }

    /// `m_Script` bytes of the `TextAsset` behind a container path.
    pub fn text_asset(&self, path: &str) -> Result<&[u8], UnityError> {
        let asset = self
            .container
            .get(path)
            .ok_or_else(|| UnityError::UnknownAsset(path.to_string()))?;

        // A non-zero file ID names another serialized file of the bundle; the
        // external table is not read, so search the other files instead.
        let (owner, local) = &self.files[asset.file];
        let found = if asset.pptr.file_id == 0 {
            local.object(asset.pptr.path_id).map(|o| (*owner, local, o))
        } else {
            self.files
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != asset.file)
                .find_map(|(_, (node, file))| {
                    file.object(asset.pptr.path_id).map(|o| (*node, file, o))
                })
        };
        let (node, file, object) = found.ok_or_else(|| UnityError::MissingObject {
            path: path.to_string(),
            path_id: asset.pptr.path_id,
        })?;

        if object.class_id != CLASS_TEXT_ASSET {
            return Err(UnityError::NotTextAsset {
                path: path.to_string(),
                class_id: object.class_id,
            });
        }
        let data = self.fs.node_data(&self.fs.nodes[node])?;
        file.text_asset_script(data, object)
    }
}

impl BundleReader for UnityBundle {
    type Error = UnityError;

    fn open(path: &Path) -> Result<Self, Self::Error> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    fn asset_paths(&self) -> Vec<String> {
        self.container.keys().cloned().collect()
    }

    fn read_asset(&mut self, path: &str) -> Result<Vec<u8>, Self::Error> {
        self.text_asset(path).map(<[u8]>::to_vec)
    }
}
