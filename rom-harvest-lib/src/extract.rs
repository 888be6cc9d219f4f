//! Catalog-driven extraction.
//!
//! Each catalog entry is run through its own pipeline and ends up as exactly
//! one [`EntryOutcome`]. Failures are recorded and the loop moves on, so a
//! single bad recipe never costs the rest of the batch.
//!
//! Region entries: fetch → decompress → cut sub-regions → zip.
//! Asset entries: fetch → write the payload as-is.

use std::path::{Path, PathBuf};

use rom_harvest_core::{
    ArchiveMembers, CatalogEntry, DIAGNOSTIC_MEMBER, ExtractError, SourceLocator, Status, archive,
    lzma, output, region,
};

use crate::progress::ExtractProgress;
use crate::provider::SourceProvider;
use crate::report::{
    BatchReport, ByteSize, EntryOutcome, EntryReport, ExtractedMember, SkipReason,
};

/// Options recognized by the extraction loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Also extract partial/unresolved entries, with their undivided
    /// buffer kept for inspection
    pub include_partials: bool,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_partials(mut self, include: bool) -> Self {
        self.include_partials = include;
        self
    }
}

/// Extract every entry of a catalog into `out_dir`.
pub fn extract_catalog(
    entries: &[CatalogEntry],
    provider: &mut dyn SourceProvider,
    out_dir: &Path,
    options: &ExtractOptions,
) -> BatchReport {
    extract_catalog_with_progress(entries, provider, out_dir, options, &mut |_| {})
}

/// Extract every entry of a catalog, reporting progress to `on_progress`.
pub fn extract_catalog_with_progress(
    entries: &[CatalogEntry],
    provider: &mut dyn SourceProvider,
    out_dir: &Path,
    options: &ExtractOptions,
    on_progress: &mut dyn FnMut(ExtractProgress),
) -> BatchReport {
    let mut report = BatchReport::new();
    on_progress(ExtractProgress::started(entries.len()));

    for (index, entry) in entries.iter().enumerate() {
        on_progress(ExtractProgress::entry(index, entry.identity));

        let outcome = match plan(entry, options) {
            Err(reason) => {
                log_skip(entry, reason);
                EntryOutcome::Skipped(reason)
            }
            Ok(locator) => {
                log::info!("Extracting {}...", entry.identity);
                match extract_entry(entry, locator, provider, out_dir) {
                    Ok((path, members)) => EntryOutcome::Extracted { path, members },
                    Err(e) => {
                        log::warn!("Error while extracting {}: {}", entry.identity, e);
                        EntryOutcome::Failed(e)
                    }
                }
            }
        };

        on_progress(ExtractProgress::Finished {
            identity: entry.identity,
            outcome: outcome.label(),
        });
        report.add(EntryReport {
            identity: entry.identity,
            output_name: entry.output_name,
            outcome,
        });
    }

    on_progress(ExtractProgress::Completed);
    log::info!("Processing complete.");
    report
}

/// Decide whether an entry is processed, and from where.
fn plan<'a>(
    entry: &'a CatalogEntry,
    options: &ExtractOptions,
) -> Result<&'a SourceLocator, SkipReason> {
    if entry.status == Status::NoRom {
        return Err(SkipReason::NoRom);
    }
    if entry.status.is_incomplete() && !options.include_partials {
        return Err(SkipReason::IncompleteExcluded);
    }
    entry.source.as_ref().ok_or(SkipReason::NoRecipe)
}

fn log_skip(entry: &CatalogEntry, reason: SkipReason) {
    match reason {
        SkipReason::NoRom => log::info!(
            "Skipping {} as there is no ROM to extract...",
            entry.identity
        ),
        SkipReason::IncompleteExcluded => log::info!(
            "Skipping {} as this tool cannot extract a working copy...",
            entry.identity
        ),
        SkipReason::NoRecipe => log::info!(
            "Skipping {} as its location is not yet known...",
            entry.identity
        ),
    }
}

fn extract_entry(
    entry: &CatalogEntry,
    locator: &SourceLocator,
    provider: &mut dyn SourceProvider,
    out_dir: &Path,
) -> Result<(PathBuf, Vec<ExtractedMember>), ExtractError> {
    let raw = provider.fetch(locator)?;
    let path = out_dir.join(&*entry.output_file_name());

    match locator {
        SourceLocator::Region { .. } => {
            let expanded = lzma::decompress(&raw)?;
            let members = split_members(entry, expanded)?;
            log::info!(
                "Saving {} ({} members, {})...",
                path.display(),
                members.len(),
                ByteSize(members.total_size() as u64)
            );
            archive::write(&members, &path)?;
            let listed = members
                .iter()
                .map(|(name, data)| ExtractedMember::from_bytes(name, data))
                .collect();
            Ok((path, listed))
        }
        SourceLocator::Asset { .. } => {
            log::info!("Saving {}...", path.display());
            output::write_atomic(&path, &raw)?;
            let member = ExtractedMember::from_bytes(entry.output_name, &raw);
            Ok((path, vec![member]))
        }
    }
}

/// Split an expanded source buffer into the entry's archive members.
///
/// Incomplete entries carry the undivided buffer as the first member so the
/// unsliced payload can be inspected.
fn split_members(entry: &CatalogEntry, expanded: Vec<u8>) -> Result<ArchiveMembers, ExtractError> {
    let mut cuts = Vec::with_capacity(entry.sub_regions.len());
    for sub in entry.sub_regions {
        log::debug!(
            "  {} @ {:#08x} ({:#x} bytes)",
            sub.name,
            sub.offset,
            sub.length
        );
        cuts.push((sub.name, region::cut(&expanded, sub.offset, sub.length)?));
    }

    let mut members = ArchiveMembers::new();
    if entry.status.is_incomplete() {
        members.push(DIAGNOSTIC_MEMBER, expanded);
    } else if cuts.is_empty() {
        members.push(entry.output_name, expanded);
    }
    for (name, data) in cuts {
        members.push(name, data);
    }

    Ok(members)
}
