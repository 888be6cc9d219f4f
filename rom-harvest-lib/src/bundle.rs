//! Asset-bundle sources.
//!
//! Bundle formats are parsed by a [`BundleReader`] (see [`crate::unity`]);
//! this module only adapts "find the asset at this path and give me its
//! bytes" to the [`SourceProvider`] contract.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rom_harvest_core::{ExtractError, SourceLocator};

use crate::provider::SourceProvider;

/// Reader for a structured asset bundle.
///
/// Implementations own the format details (block compression, serialized
/// object tables, and so on). Asset paths are the bundle's own container
/// paths, e.g. `Assets/Roms/FFL1.bytes`.
pub trait BundleReader: Sized {
    type Error: fmt::Display;

    /// Parse the bundle at `path`.
    fn open(path: &Path) -> Result<Self, Self::Error>;

    /// Every asset path the bundle exposes.
    fn asset_paths(&self) -> Vec<String>;

    /// Decoded payload of the asset at `path`.
    fn read_asset(&mut self, path: &str) -> Result<Vec<u8>, Self::Error>;
}

/// A single opened bundle, indexed by asset path.
pub struct BundleProvider<R> {
    path: PathBuf,
    assets: BTreeSet<String>,
    reader: R,
}

impl<R: BundleReader> BundleProvider<R> {
    /// Open and index a bundle file.
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        if !path.is_file() {
            return Err(ExtractError::SourceMissing(path.to_path_buf()));
        }
        let reader = R::open(path).map_err(|e| ExtractError::bundle_open(path, e))?;
        let assets: BTreeSet<String> = reader.asset_paths().into_iter().collect();
        log::debug!("Opened {} ({} assets)", path.display(), assets.len());
        Ok(Self {
            path: path.to_path_buf(),
            assets,
            reader,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn asset_paths(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(String::as_str)
    }

    /// Payload of the asset with exactly this path.
    pub fn fetch_asset(&mut self, asset_path: &str) -> Result<Vec<u8>, ExtractError> {
        if !self.assets.contains(asset_path) {
            return Err(ExtractError::asset_not_found(asset_path));
        }
        self.reader
            .read_asset(asset_path)
            .map_err(|e| ExtractError::bundle_open(&self.path, e))
    }
}

impl<R: BundleReader> SourceProvider for BundleProvider<R> {
    fn fetch(&mut self, locator: &SourceLocator) -> Result<Vec<u8>, ExtractError> {
        match *locator {
            SourceLocator::Asset { path, .. } => self.fetch_asset(path),
            SourceLocator::Region { .. } => Err(ExtractError::unsupported_locator(format!(
                "bundle cannot resolve raw region {locator}"
            ))),
        }
    }
}

/// A directory of bundle files, each opened on first use.
///
/// Locators name the bundle file they live in; a bundle that was not found
/// on disk fails only the entries that reference it.
pub struct BundleSetProvider<R> {
    files: HashMap<String, PathBuf>,
    opened: HashMap<String, BundleProvider<R>>,
}

impl<R: BundleReader> BundleSetProvider<R> {
    pub fn new(files: impl IntoIterator<Item = PathBuf>) -> Self {
        let files = files
            .into_iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                Some((name, path))
            })
            .collect();
        Self {
            files,
            opened: HashMap::new(),
        }
    }

    /// Whether a bundle with this file name was discovered.
    pub fn contains(&self, bundle: &str) -> bool {
        self.files.contains_key(bundle)
    }

    fn bundle(&mut self, bundle: &str) -> Result<&mut BundleProvider<R>, ExtractError> {
        if !self.opened.contains_key(bundle) {
            let path = self
                .files
                .get(bundle)
                .ok_or_else(|| ExtractError::SourceMissing(PathBuf::from(bundle)))?;
            let provider = BundleProvider::open(path)?;
            self.opened.insert(bundle.to_string(), provider);
        }
        self.opened
            .get_mut(bundle)
            .ok_or_else(|| ExtractError::SourceMissing(PathBuf::from(bundle)))
    }
}

impl<R: BundleReader> SourceProvider for BundleSetProvider<R> {
    fn fetch(&mut self, locator: &SourceLocator) -> Result<Vec<u8>, ExtractError> {
        match *locator {
            SourceLocator::Asset { bundle, path } => self.bundle(bundle)?.fetch_asset(path),
            SourceLocator::Region { .. } => Err(ExtractError::unsupported_locator(format!(
                "bundle set cannot resolve raw region {locator}"
            ))),
        }
    }
}

/// Find bundle files in `dir` whose names start with `prefix` and end with
/// `.bundle`, sorted by name.
pub fn discover_bundles(dir: &Path, prefix: &str) -> io::Result<Vec<PathBuf>> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.starts_with(prefix) && name.ends_with(".bundle"))
        })
        .collect();
    found.sort();
    Ok(found)
}
