//! Errors of the save adapter.

use thiserror::Error;

/// Reasons a save document is rejected as a whole.  Individually malformed
/// records are not errors; the loader skips them with a warning.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("malformed save document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("save document has no meta section")]
    MissingMeta,
}

pub type SaveResult<T> = Result<T, SaveError>;
