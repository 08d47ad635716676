//! Crate-wide error type

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::metadata::MetadataError;

/// Result type alias defaulting to [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that abort a collection traversal.
///
/// Recoverable conditions (structural violations, unreadable tags,
/// unrecognized date strings) are logged and skipped where they occur and
/// never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while listing or inspecting the collection
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Tag reading failed in a way the year inference does not recover from
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Renaming an album directory failed
    #[error("cannot rename {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}
