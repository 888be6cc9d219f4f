//! Extraction engine for ROMs embedded in game collections.
//!
//! A task pairs a static [`Catalog`] with a container. Source providers turn
//! catalog locators into raw bytes, and the extraction loop decompresses,
//! splits and packages them into one output file per catalog entry.

pub mod bundle;
pub mod extract;
pub mod progress;
pub mod provider;
pub mod report;
pub mod settings;
pub mod tasks;
pub mod unity;

pub use bundle::{BundleProvider, BundleReader, BundleSetProvider};
pub use extract::{ExtractOptions, extract_catalog, extract_catalog_with_progress};
pub use progress::ExtractProgress;
pub use provider::{RawContainerProvider, SourceProvider};
pub use report::{BatchReport, ByteSize, EntryOutcome, EntryReport, ExtractedMember, ReportSummary, SkipReason};
pub use tasks::{ContainerKind, TaskInfo};
pub use unity::{UnityBundle, UnityError};

// Re-export core types so front-ends only need this crate
pub use rom_harvest_core::{
    Catalog, CatalogEntry, ErrorKind, ExtractError, Note, SourceLocator, Status, SubRegion,
};
