//! Registered extraction tasks, one per supported collection.

pub mod acac;
pub mod saga;

use std::path::Path;

use rom_harvest_core::{Catalog, ExtractError};

use crate::extract::ExtractOptions;
use crate::progress::ExtractProgress;
use crate::report::BatchReport;

/// Entry point of a task that needs nothing beyond its input folder.
pub type TaskRunner = fn(
    in_dir: &Path,
    out_dir: &Path,
    options: &ExtractOptions,
    on_progress: &mut dyn FnMut(ExtractProgress),
) -> Result<BatchReport, ExtractError>;

/// How a task's container is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Single executable image with LZMA blobs at fixed offsets
    Executable,
    /// Directory of asset bundles addressed by path
    Bundle,
}

/// Metadata about a registered task.
#[derive(Debug, Clone, Copy)]
pub struct TaskInfo {
    /// Short name used on the command line
    pub name: &'static str,
    /// Full collection title
    pub title: &'static str,
    /// System the extracted ROMs run on
    pub system: &'static str,
    /// What the input folder should be
    pub input_desc: &'static str,
    pub container: ContainerKind,
    pub catalog: &'static Catalog,
    pub run: TaskRunner,
}

static TASKS: &[TaskInfo] = &[
    TaskInfo {
        name: "acac",
        title: "Arcade Classics Anniversary Collection",
        system: "Arcade",
        input_desc: "Arcade Classics Anniversary Collection install folder",
        container: ContainerKind::Executable,
        catalog: &acac::CATALOG,
        run: acac::run,
    },
    TaskInfo {
        name: "saga",
        title: "Collection of SaGa Final Fantasy Legend",
        system: "Game Boy",
        input_desc: "Collection of SaGa Steam folder",
        container: ContainerKind::Bundle,
        catalog: &saga::CATALOG,
        run: saga::run_unity,
    },
];

/// All registered tasks.
pub fn all() -> &'static [TaskInfo] {
    TASKS
}

/// Find a task by short name (case-insensitive).
pub fn find(name: &str) -> Option<&'static TaskInfo> {
    TASKS.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

/// Short names of all tasks.
pub fn names() -> Vec<&'static str> {
    TASKS.iter().map(|t| t.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find() {
        assert_eq!(find("ACAC").map(|t| t.container), Some(ContainerKind::Executable));
        assert_eq!(find("saga").map(|t| t.system), Some("Game Boy"));
        assert!(find("unknown").is_none());
    }

    #[test]
    fn test_every_catalog_valid() {
        for task in all() {
            assert!(
                task.catalog.validate().is_empty(),
                "catalog for {} has violations",
                task.name
            );
        }
    }

    #[test]
    fn test_runners_need_their_container() {
        let empty = tempfile::TempDir::new().unwrap();
        for task in all() {
            let err = (task.run)(empty.path(), empty.path(), &ExtractOptions::new(), &mut |_| {})
                .err()
                .unwrap();
            assert_eq!(err.kind(), rom_harvest_core::ErrorKind::SourceMissing, "{}", task.name);
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(names(), ["acac", "saga"]);
    }
}
