//! Zip packaging for extracted ROM sets.

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::{ExtractError, output};

/// Ordered set of named buffers destined for one archive.
///
/// Members are written in insertion order so identical input always yields
/// identical archive bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveMembers {
    members: Vec<(String, Vec<u8>)>,
}

impl ArchiveMembers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.members.push((name.into(), data));
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.members
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.members
            .iter()
            .map(|(name, data)| (name.as_str(), data.as_slice()))
    }

    /// Total payload size across all members.
    pub fn total_size(&self) -> usize {
        self.members.iter().map(|(_, data)| data.len()).sum()
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<u8>)> for ArchiveMembers {
    fn from_iter<I: IntoIterator<Item = (N, Vec<u8>)>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().map(|(n, d)| (n.into(), d)).collect(),
        }
    }
}

/// Build a zip archive in memory.
///
/// Every member is deflated and stamped with the zip epoch (1980-01-01)
/// rather than the current time. No directory entries are written.
/// Duplicate member names are rejected by the zip writer.
pub fn build(members: &ArchiveMembers) -> Result<Vec<u8>, ExtractError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in members.iter() {
        zip.start_file(name, options)
            .map_err(|e| ExtractError::write(format!("{name}: {e}")))?;
        zip.write_all(data)
            .map_err(|e| ExtractError::write(format!("{name}: {e}")))?;
    }
    let cursor = zip.finish().map_err(ExtractError::write)?;
    Ok(cursor.into_inner())
}

/// Build a zip archive and write it to `path` atomically.
pub fn write(members: &ArchiveMembers, path: &Path) -> Result<(), ExtractError> {
    let bytes = build(members)?;
    output::write_atomic(path, &bytes)
}

#[cfg(test)]
#[path = "tests/archive_tests.rs"]
mod tests;
