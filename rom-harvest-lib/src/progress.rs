/// Progress update sent while a catalog is being extracted.
///
/// Front-ends pass an observer to
/// [`extract_catalog_with_progress`](crate::extract::extract_catalog_with_progress)
/// to drive progress bars.
#[derive(Debug, Clone)]
pub enum ExtractProgress {
    /// The batch has started
    Started {
        /// Number of catalog entries in the batch
        total: usize,
    },

    /// An entry is about to be processed
    Entry {
        /// Zero-based position in the catalog
        index: usize,
        identity: &'static str,
    },

    /// An entry has been processed
    Finished {
        identity: &'static str,
        /// Short outcome label ("extracted", "skipped", "failed")
        outcome: &'static str,
    },

    /// All entries have been processed
    Completed,
}

impl ExtractProgress {
    pub fn started(total: usize) -> Self {
        Self::Started { total }
    }

    pub fn entry(index: usize, identity: &'static str) -> Self {
        Self::Entry { index, identity }
    }
}
