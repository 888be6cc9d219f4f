//! Output file writing.

use std::fs;
use std::path::{Path, PathBuf};

use crate::ExtractError;

/// Temporary sibling path used while `path` is being written.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `bytes` to `path` via a temporary file and rename.
///
/// An interrupted run never leaves a truncated file under the final name.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ExtractError> {
    let tmp = temp_path(path);
    let result = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(ExtractError::write(format!("{}: {e}", path.display())));
    }
    Ok(())
}
