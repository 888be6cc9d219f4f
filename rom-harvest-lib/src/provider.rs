//! Source providers: where an entry's raw bytes come from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rom_harvest_core::{ExtractError, SourceLocator, region};

/// Something that can resolve a [`SourceLocator`] into raw bytes.
///
/// The orchestrator only talks to containers through this trait, so the
/// same extraction loop serves raw executables and asset bundles alike.
pub trait SourceProvider {
    /// Fetch the raw (still compressed, for region locators) bytes.
    fn fetch(&mut self, locator: &SourceLocator) -> Result<Vec<u8>, ExtractError>;
}

/// A container image held entirely in memory, addressed by byte offset.
#[derive(Debug, Clone)]
pub struct RawContainerProvider {
    path: Option<PathBuf>,
    contents: Vec<u8>,
}

impl RawContainerProvider {
    /// Wrap an already loaded container image.
    pub fn new(contents: Vec<u8>) -> Self {
        Self {
            path: None,
            contents,
        }
    }

    /// Read a container file fully into memory.
    ///
    /// A missing file is reported as [`ExtractError::SourceMissing`], which
    /// callers treat as fatal for the whole run.
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let contents = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ExtractError::SourceMissing(path.to_path_buf()),
            _ => ExtractError::Io(e),
        })?;
        log::info!("Loaded {} ({} bytes)", path.display(), contents.len());
        Ok(Self {
            path: Some(path.to_path_buf()),
            contents,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl SourceProvider for RawContainerProvider {
    fn fetch(&mut self, locator: &SourceLocator) -> Result<Vec<u8>, ExtractError> {
        match *locator {
            SourceLocator::Region { offset, length } => region::cut(&self.contents, offset, length),
            SourceLocator::Asset { .. } => Err(ExtractError::unsupported_locator(format!(
                "raw container cannot resolve bundle asset {locator}"
            ))),
        }
    }
}
