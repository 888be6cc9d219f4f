//! Declarative catalog model.
//!
//! A catalog lists every known game in one container together with the
//! recipe for pulling it out: where the source bytes live, and how the
//! (possibly decompressed) source is split into individual ROM files.
//! Catalogs are built from `static` data and never change at runtime.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Archive member holding the undivided buffer of an incomplete entry.
pub const DIAGNOSTIC_MEMBER: &str = "decompressed_blob";

/// Prefix added to output file names of incomplete entries.
pub const PARTIAL_PREFIX: &str = "partial_";

/// How far along the extraction recipe for an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Recipe is complete and verified
    Good,
    /// Recipe exists but is known to be incomplete or unverified
    Partial,
    /// This container holds no ROM for the entry
    NoRom,
    /// No extraction method is known yet
    Unresolved,
}

impl Status {
    /// Whether entries with this status are only extracted on request.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Partial | Self::Unresolved)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Partial => "partial",
            Self::NoRom => "no-rom",
            Self::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the source bytes of an entry live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceLocator {
    /// LZMA-compressed byte range inside a raw container image
    Region { offset: usize, length: usize },
    /// Asset addressed by path inside a named bundle file
    Asset {
        bundle: &'static str,
        path: &'static str,
    },
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Region { offset, length } => write!(f, "{offset:#x}+{length:#x}"),
            Self::Asset { bundle, path } => write!(f, "{bundle}:{path}"),
        }
    }
}

/// One named file cut out of an entry's source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubRegion {
    pub name: &'static str,
    pub offset: usize,
    pub length: usize,
}

impl SubRegion {
    pub const fn new(name: &'static str, offset: usize, length: usize) -> Self {
        Self {
            name,
            offset,
            length,
        }
    }
}

/// Shared explanatory note referenced by entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: u8,
    pub text: &'static str,
}

/// A single game (or game variant) and its extraction recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Human-readable game name
    pub identity: &'static str,
    /// Output file name (zip archive or raw ROM)
    pub output_name: &'static str,
    pub status: Status,
    /// Ids into the owning catalog's notes
    pub notes: &'static [u8],
    /// Absent for `NoRom` entries and for recipes not yet worked out
    pub source: Option<SourceLocator>,
    /// How to split the source buffer; empty for single-file outputs
    pub sub_regions: &'static [SubRegion],
}

impl CatalogEntry {
    /// File name written to the output directory.
    ///
    /// Incomplete entries get the `partial_` prefix so they are never
    /// mistaken for a working dump.
    pub fn output_file_name(&self) -> Cow<'static, str> {
        if self.status.is_incomplete() {
            Cow::Owned(format!("{PARTIAL_PREFIX}{}", self.output_name))
        } else {
            Cow::Borrowed(self.output_name)
        }
    }
}

/// Static description of everything extractable from one container.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Catalog {
    pub entries: &'static [CatalogEntry],
    pub notes: &'static [Note],
}

impl Catalog {
    /// Text of the note with the given id.
    pub fn note(&self, id: u8) -> Option<&'static str> {
        self.notes.iter().find(|n| n.id == id).map(|n| n.text)
    }

    /// Find an entry by identity or output name (case-insensitive).
    pub fn entry(&self, name: &str) -> Option<&'static CatalogEntry> {
        self.entries.iter().find(|e| {
            e.identity.eq_ignore_ascii_case(name) || e.output_name.eq_ignore_ascii_case(name)
        })
    }

    /// Check every invariant that can be decided without the container.
    ///
    /// Returns all violations rather than stopping at the first.
    pub fn validate(&self) -> Vec<CatalogViolation> {
        let mut violations = Vec::new();
        let mut outputs = HashSet::new();

        for entry in self.entries {
            let id = entry.identity.to_string();

            if !outputs.insert(entry.output_name) {
                violations.push(CatalogViolation::DuplicateOutput(
                    entry.output_name.to_string(),
                ));
            }

            match (entry.status, &entry.source) {
                (Status::NoRom, Some(_)) => {
                    violations.push(CatalogViolation::NoRomWithSource(id.clone()))
                }
                (Status::Good, None) => {
                    violations.push(CatalogViolation::GoodWithoutSource(id.clone()))
                }
                (_, Some(SourceLocator::Asset { .. })) if !entry.sub_regions.is_empty() => {
                    violations.push(CatalogViolation::AssetWithSubRegions(id.clone()))
                }
                _ => {}
            }

            let mut members = HashSet::new();
            for region in entry.sub_regions {
                if region.name == DIAGNOSTIC_MEMBER {
                    violations.push(CatalogViolation::ReservedMember(id.clone()));
                } else if !members.insert(region.name) {
                    violations.push(CatalogViolation::DuplicateMember {
                        entry: id.clone(),
                        member: region.name.to_string(),
                    });
                }
            }

            for &note in entry.notes {
                if self.note(note).is_none() {
                    violations.push(CatalogViolation::UnknownNote {
                        entry: id.clone(),
                        id: note,
                    });
                }
            }
        }

        violations
    }
}

/// A catalog invariant that does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogViolation {
    #[error("Output name used more than once: {0}")]
    DuplicateOutput(String),

    #[error("{0}: no-rom entry declares a source")]
    NoRomWithSource(String),

    #[error("{0}: good entry has no source")]
    GoodWithoutSource(String),

    #[error("{0}: bundle assets cannot be split into sub-regions")]
    AssetWithSubRegions(String),

    #[error("{0}: sub-region uses the reserved name decompressed_blob")]
    ReservedMember(String),

    #[error("{entry}: member name used more than once: {member}")]
    DuplicateMember { entry: String, member: String },

    #[error("{entry}: unknown note id {id}")]
    UnknownNote { entry: String, id: u8 },
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
