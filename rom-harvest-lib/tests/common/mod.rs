#![allow(dead_code)]

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use rom_harvest_core::{ArchiveMembers, archive};
use rom_harvest_lib::BundleReader;

/// Bundle reader backed by a plain zip file: asset paths are member names.
pub struct ZipBundle {
    archive: zip::ZipArchive<File>,
}

impl BundleReader for ZipBundle {
    type Error = zip::result::ZipError;

    fn open(path: &Path) -> Result<Self, Self::Error> {
        let archive = zip::ZipArchive::new(File::open(path)?)?;
        Ok(Self { archive })
    }

    fn asset_paths(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    fn read_asset(&mut self, path: &str) -> Result<Vec<u8>, Self::Error> {
        let mut file = self.archive.by_name(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }
}

/// Write a bundle file holding the given assets.
pub fn write_bundle(path: &Path, assets: &[(&str, &[u8])]) {
    let members: ArchiveMembers = assets
        .iter()
        .map(|(name, data)| (*name, data.to_vec()))
        .collect();
    archive::write(&members, path).unwrap();
}

/// Read every member of a zip file on disk, in archive order.
pub fn read_zip(path: &Path) -> Vec<(String, Vec<u8>)> {
    let bytes = std::fs::read(path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_string(), data)
        })
        .collect()
}

/// Names of the files in a directory, sorted.
pub fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
