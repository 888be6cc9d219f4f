use rom_harvest_lib::ExtractError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Fatal extraction error (missing container, unreadable input)
    #[error("{0}")]
    Extract(#[from] ExtractError),

    /// Unknown collection name
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Some entries failed while the rest were extracted
    #[error("{failed} of {total} entries failed")]
    EntriesFailed { failed: usize, total: usize },

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn unknown_task(msg: impl Into<String>) -> Self {
        Self::UnknownTask(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
