//! Core building blocks for pulling ROM images out of game collections.
//!
//! Everything here is a pure transformation over byte buffers: cutting
//! regions, expanding LZMA streams, and packing named buffers into zip
//! archives, plus the declarative catalog model that drives them.

pub mod archive;
pub mod catalog;
pub mod error;
pub mod lzma;
pub mod output;
pub mod region;

pub use archive::ArchiveMembers;
pub use catalog::{
    Catalog, CatalogEntry, CatalogViolation, DIAGNOSTIC_MEMBER, Note, PARTIAL_PREFIX,
    SourceLocator, Status, SubRegion,
};
pub use error::{ErrorKind, ExtractError};
pub use region::cut;
