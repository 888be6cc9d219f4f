//! Persisted extraction defaults.
//!
//! The settings file lives at `~/.config/rom-harvest/settings.toml`:
//!
//! ```toml
//! [extract]
//! include_partials = true
//! ```
//!
//! A command-line flag always wins over the file.

use std::io;
use std::path::{Path, PathBuf};

use crate::extract::ExtractOptions;

/// Canonical path to the settings file: `~/.config/rom-harvest/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("rom-harvest").join("settings.toml")
}

/// Resolve extraction options using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. Saved `extract.include_partials` in `settings.toml`
/// 3. Off
pub fn resolve_options(include_partials_override: Option<bool>) -> ExtractOptions {
    let include = include_partials_override
        .or_else(|| load_include_partials(&settings_path()))
        .unwrap_or(false);
    ExtractOptions::new().include_partials(include)
}

/// Read `extract.include_partials` from a settings file, if set.
pub fn load_include_partials(path: &Path) -> Option<bool> {
    let contents = std::fs::read_to_string(path).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    doc.get("extract")?.get("include_partials")?.as_bool()
}

/// Save (or clear) `extract.include_partials` in a settings file.
///
/// Uses `toml::Value` for a surgical update so unrelated fields are
/// preserved.
pub fn save_include_partials(path: &Path, value: Option<bool>) -> io::Result<()> {
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(path) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    // Ensure [extract] table exists
    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let extract = table
        .entry("extract")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let extract_table = extract
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[extract] is not a table"))?;

    match value {
        Some(v) => {
            extract_table.insert("include_partials".to_string(), toml::Value::Boolean(v));
        }
        None => {
            extract_table.remove("include_partials");
        }
    }

    // Write atomically
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, path)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}
