//! Collection of SaGa Final Fantasy Legend.
//!
//! Each Game Boy ROM ships as a `TextAsset` inside its own asset bundle,
//! so extraction is a path lookup and a straight copy. Bundles are found by
//! file name; names that are not in the catalog are ignored.

use std::path::{Path, PathBuf};

use rom_harvest_core::{Catalog, CatalogEntry, ExtractError, SourceLocator, Status};

use crate::bundle::{BundleReader, BundleSetProvider, discover_bundles};
use crate::extract::{ExtractOptions, extract_catalog_with_progress};
use crate::progress::ExtractProgress;
use crate::report::BatchReport;
use crate::unity::UnityBundle;

/// Bundle directory relative to the install folder.
pub const BUNDLE_DIR: &[&str] = &[
    "Sa・Ga COLLECTION_Data",
    "StreamingAssets",
    "aa",
    "Windows",
    "StandaloneWindows64",
];

/// File name prefix shared by the ROM bundles.
pub const BUNDLE_PREFIX: &str = "rom";

const fn rom(
    identity: &'static str,
    output_name: &'static str,
    bundle: &'static str,
    path: &'static str,
) -> CatalogEntry {
    CatalogEntry {
        identity,
        output_name,
        status: Status::Good,
        notes: &[],
        source: Some(SourceLocator::Asset { bundle, path }),
        sub_regions: &[],
    }
}

const ENTRIES: &[CatalogEntry] = &[
    rom(
        "Final Fantasy Legend 1",
        "FinalFantasyLegend.gb",
        "romffl1_assets_all_e8aea7590909c1eb45f3809e4f3da68f.bundle",
        "Assets/Roms/FFL1.bytes",
    ),
    rom(
        "Final Fantasy Legend 2",
        "FinalFantasyLegend2.gb",
        "romffl2_assets_all_5d8137a1fdbca63a9fa7b533aa1d9db0.bundle",
        "Assets/Roms/FFL2.bytes",
    ),
    rom(
        "Final Fantasy Legend 3",
        "FinalFantasyLegend3.gb",
        "romffl3_assets_all_5818995041c2c3cbe070bb00b1783274.bundle",
        "Assets/Roms/FFL3.bytes",
    ),
    rom(
        "SaGa 1",
        "SaGa.gb",
        "romjsg1_assets_all_c6047cf2db4f38cbc8f51d592e1a1c76.bundle",
        "Assets/Roms/JSG1.bytes",
    ),
    rom(
        "SaGa 2",
        "SaGa2.gb",
        "romjsg2_assets_all_148d5b61843deae44f69f2dfcc30e168.bundle",
        "Assets/Roms/JSG2.bytes",
    ),
    rom(
        "SaGa 3",
        "SaGa3.gb",
        "romjsg3_assets_all_942cc896cee03850dc45bfc837017e8f.bundle",
        "Assets/Roms/JSG3.bytes",
    ),
];

pub static CATALOG: Catalog = Catalog {
    entries: ENTRIES,
    notes: &[],
};

/// Directory holding the ROM bundles inside an install folder.
pub fn bundle_dir(in_dir: &Path) -> PathBuf {
    BUNDLE_DIR.iter().fold(in_dir.to_path_buf(), |p, c| p.join(c))
}

fn is_cataloged(bundle_name: &str) -> bool {
    CATALOG.entries.iter().any(|e| {
        matches!(e.source, Some(SourceLocator::Asset { bundle, .. }) if bundle == bundle_name)
    })
}

/// Extract every ROM from an install folder into `out_dir`.
///
/// A missing bundle directory is fatal. A cataloged bundle that is absent
/// fails only its own entry.
pub fn run<R: BundleReader>(
    in_dir: &Path,
    out_dir: &Path,
    options: &ExtractOptions,
    on_progress: &mut dyn FnMut(ExtractProgress),
) -> Result<BatchReport, ExtractError> {
    let dir = bundle_dir(in_dir);
    if !dir.is_dir() {
        return Err(ExtractError::SourceMissing(dir));
    }

    let bundles = discover_bundles(&dir, BUNDLE_PREFIX)?;
    for path in &bundles {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if !is_cataloged(name) {
            log::info!(
                "Skipping {} as it contains no known ROMs!",
                path.display()
            );
        }
    }

    let mut provider = BundleSetProvider::<R>::new(bundles);
    Ok(extract_catalog_with_progress(
        CATALOG.entries,
        &mut provider,
        out_dir,
        options,
        on_progress,
    ))
}

/// [`run`] with the built-in `UnityFS` reader.
pub fn run_unity(
    in_dir: &Path,
    out_dir: &Path,
    options: &ExtractOptions,
    on_progress: &mut dyn FnMut(ExtractProgress),
) -> Result<BatchReport, ExtractError> {
    run::<UnityBundle>(in_dir, out_dir, options, on_progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_valid() {
        assert_eq!(CATALOG.validate(), vec![]);
    }

    #[test]
    fn test_bundle_dir() {
        let dir = bundle_dir(Path::new("/games/saga"));
        assert!(dir.ends_with("aa/Windows/StandaloneWindows64"));
        assert!(dir.starts_with("/games/saga/Sa・Ga COLLECTION_Data"));
    }

    #[test]
    fn test_is_cataloged() {
        assert!(is_cataloged(
            "romjsg2_assets_all_148d5b61843deae44f69f2dfcc30e168.bundle"
        ));
        assert!(!is_cataloged("romextra_assets_all_0000.bundle"));
    }

    #[test]
    fn test_run_unity_extracts_text_assets() {
        use crate::unity::testing::write_text_asset_bundle;
        use rom_harvest_core::ErrorKind;

        let install = tempfile::TempDir::new().unwrap();
        let out = tempfile::TempDir::new().unwrap();
        let dir = bundle_dir(install.path());
        std::fs::create_dir_all(&dir).unwrap();

        let ffl1: Vec<u8> = (0..0x8000u32).map(|i| (i % 253) as u8).collect();
        write_text_asset_bundle(
            &dir.join("romffl1_assets_all_e8aea7590909c1eb45f3809e4f3da68f.bundle"),
            &[("Assets/Roms/FFL1.bytes", &ffl1)],
        );
        // Readable bundle without the cataloged path
        write_text_asset_bundle(
            &dir.join("romjsg2_assets_all_148d5b61843deae44f69f2dfcc30e168.bundle"),
            &[("Assets/Roms/JSG2_old.bytes", b"old")],
        );
        // Not a UnityFS file at all
        std::fs::write(
            dir.join("romjsg3_assets_all_942cc896cee03850dc45bfc837017e8f.bundle"),
            b"garbage\0",
        )
        .unwrap();

        let report =
            run_unity(install.path(), out.path(), &ExtractOptions::new(), &mut |_| {}).unwrap();

        assert_eq!(
            std::fs::read(out.path().join("FinalFantasyLegend.gb")).unwrap(),
            ffl1
        );
        assert!(!out.path().join("SaGa2.gb").exists());
        let summary = report.summary();
        assert_eq!(summary.extracted, 1);
        assert_eq!(summary.failed_for(ErrorKind::AssetNotFound), 1);
        assert_eq!(summary.failed_for(ErrorKind::BundleOpenError), 1);
        assert_eq!(summary.failed_for(ErrorKind::SourceMissing), 3);
    }

    #[test]
    fn test_every_bundle_matches_prefix() {
        for entry in CATALOG.entries {
            match entry.source {
                Some(SourceLocator::Asset { bundle, .. }) => {
                    assert!(bundle.starts_with(BUNDLE_PREFIX));
                    assert!(bundle.ends_with(".bundle"));
                }
                other => panic!("unexpected locator for {}: {:?}", entry.identity, other),
            }
        }
    }
}
