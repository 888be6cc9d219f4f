use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while extracting a catalog entry.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A region reaches past the end of the buffer it is cut from
    #[error("Region {offset:#x}+{length:#x} exceeds buffer of {available:#x} bytes")]
    OutOfBounds {
        offset: usize,
        length: usize,
        available: usize,
    },

    /// The compressed stream is truncated or malformed
    #[error("Corrupt compressed stream: {0}")]
    CorruptStream(String),

    /// No asset with this exact path exists in the bundle
    #[error("Asset not found in bundle: {0}")]
    AssetNotFound(String),

    /// The bundle container could not be parsed
    #[error("Failed to open bundle {}: {reason}", path.display())]
    BundleOpen { path: PathBuf, reason: String },

    /// Output archive or file could not be written
    #[error("Write failed: {0}")]
    Write(String),

    /// A declared container file is absent
    #[error("Source container not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// The locator kind is not served by this provider
    #[error("Unsupported locator: {0}")]
    UnsupportedLocator(String),

    /// I/O error while reading an input container
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    pub fn corrupt_stream(msg: impl Into<String>) -> Self {
        Self::CorruptStream(msg.into())
    }

    pub fn asset_not_found(path: impl Into<String>) -> Self {
        Self::AssetNotFound(path.into())
    }

    pub fn bundle_open(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::BundleOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn write(msg: impl fmt::Display) -> Self {
        Self::Write(msg.to_string())
    }

    pub fn unsupported_locator(msg: impl Into<String>) -> Self {
        Self::UnsupportedLocator(msg.into())
    }

    /// The failure category, used to group failures in run summaries.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            Self::CorruptStream(_) => ErrorKind::CorruptStream,
            Self::AssetNotFound(_) => ErrorKind::AssetNotFound,
            Self::BundleOpen { .. } => ErrorKind::BundleOpenError,
            Self::Write(_) => ErrorKind::WriteError,
            Self::SourceMissing(_) => ErrorKind::SourceMissing,
            Self::UnsupportedLocator(_) => ErrorKind::UnsupportedLocator,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Category of an [`ExtractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    OutOfBounds,
    CorruptStream,
    AssetNotFound,
    BundleOpenError,
    WriteError,
    SourceMissing,
    UnsupportedLocator,
    Io,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OutOfBounds => "out-of-bounds",
            Self::CorruptStream => "corrupt-stream",
            Self::AssetNotFound => "asset-not-found",
            Self::BundleOpenError => "bundle-open-error",
            Self::WriteError => "write-error",
            Self::SourceMissing => "source-missing",
            Self::UnsupportedLocator => "unsupported-locator",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
