//! Per-entry outcomes and run summaries.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use rom_harvest_core::{ErrorKind, ExtractError};

/// A byte count shown in binary units.
///
/// Whole multiples of KiB/MiB print without a fraction (ROM chips are
/// power-of-two sized, so member listings read "32 KiB"); anything else gets
/// one decimal place. Counts below 1 KiB print in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const KIB: u64 = 1 << 10;
        const MIB: u64 = 1 << 20;

        let text = match self.0 {
            n if n < KIB => format!("{n} bytes"),
            n => {
                let (unit, label) = if n >= MIB { (MIB, "MiB") } else { (KIB, "KiB") };
                if n.is_multiple_of(unit) {
                    format!("{} {label}", n / unit)
                } else {
                    format!("{:.1} {label}", n as f64 / unit as f64)
                }
            }
        };
        // Honor width/alignment so the value lines up in column listings
        f.pad(&text)
    }
}

/// Why an entry was not extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    /// The container holds no ROM for this entry
    NoRom,
    /// Partial/unresolved entry and incomplete entries were not requested
    IncompleteExcluded,
    /// No source location is known for this entry
    NoRecipe,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoRom => "no-rom",
            Self::IncompleteExcluded => "partial-excluded",
            Self::NoRecipe => "no-recipe",
        })
    }
}

/// A file written into an output archive (or the raw output itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMember {
    pub name: String,
    pub size: u64,
    pub crc32: u32,
}

impl ExtractedMember {
    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> Self {
        Self {
            name: name.into(),
            size: data.len() as u64,
            crc32: crc32fast::hash(data),
        }
    }
}

/// Result of processing one catalog entry.
#[derive(Debug)]
pub enum EntryOutcome {
    Extracted {
        path: PathBuf,
        members: Vec<ExtractedMember>,
    },
    Skipped(SkipReason),
    Failed(ExtractError),
}

impl EntryOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Extracted { .. } => "extracted",
            Self::Skipped(_) => "skipped",
            Self::Failed(_) => "failed",
        }
    }
}

/// Outcome of one entry, tagged with the entry it belongs to.
#[derive(Debug)]
pub struct EntryReport {
    pub identity: &'static str,
    pub output_name: &'static str,
    pub outcome: EntryOutcome,
}

/// Collects per-entry outcomes for a whole run.
#[derive(Debug, Default)]
pub struct BatchReport {
    entries: Vec<EntryReport>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: EntryReport) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[EntryReport] {
        &self.entries
    }

    /// Outcome recorded for the entry with this identity.
    pub fn outcome(&self, identity: &str) -> Option<&EntryOutcome> {
        self.entries
            .iter()
            .find(|e| e.identity == identity)
            .map(|e| &e.outcome)
    }

    pub fn has_failures(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.outcome, EntryOutcome::Failed(_)))
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for entry in &self.entries {
            match &entry.outcome {
                EntryOutcome::Extracted { .. } => summary.extracted += 1,
                EntryOutcome::Skipped(reason) => {
                    *summary.skipped.entry(*reason).or_default() += 1;
                }
                EntryOutcome::Failed(err) => {
                    *summary.failed.entry(err.kind()).or_default() += 1;
                }
            }
        }
        summary
    }

    /// Write the report to a plain-text file.
    pub fn write_to_file(&self, path: &Path, title: &str) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(path)?;
        let summary = self.summary();

        writeln!(file, "=== {} ===", title)?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(file, "Extracted: {}", summary.extracted)?;
        writeln!(file, "Skipped: {}", summary.total_skipped())?;
        for (reason, count) in &summary.skipped {
            writeln!(file, "  {}: {}", reason, count)?;
        }
        writeln!(file, "Failed: {}", summary.total_failed())?;
        for (kind, count) in &summary.failed {
            writeln!(file, "  {}: {}", kind, count)?;
        }
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match &entry.outcome {
                EntryOutcome::Extracted { path, members } => {
                    writeln!(file, "[OK] {} -> {}", entry.identity, path.display())?;
                    for m in members {
                        writeln!(
                            file,
                            "     {:<24} {:>12}  crc32 {:08x}",
                            m.name,
                            ByteSize(m.size),
                            m.crc32
                        )?;
                    }
                }
                EntryOutcome::Skipped(reason) => {
                    writeln!(file, "[SKIPPED] {} ({})", entry.identity, reason)?;
                }
                EntryOutcome::Failed(err) => {
                    writeln!(
                        file,
                        "[ERROR] {} ({}): {}",
                        entry.identity,
                        err.kind(),
                        err
                    )?;
                }
            }
        }

        Ok(())
    }
}

/// Counts of outcomes across a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub extracted: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
    pub failed: BTreeMap<ErrorKind, usize>,
}

impl ReportSummary {
    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn total_failed(&self) -> usize {
        self.failed.values().sum()
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub fn failed_for(&self, kind: ErrorKind) -> usize {
        self.failed.get(&kind).copied().unwrap_or(0)
    }
}
