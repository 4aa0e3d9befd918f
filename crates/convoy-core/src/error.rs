//! Error types for archive build operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while building a snapshot archive.
///
/// Every variant names the filesystem path that caused the failure. All
/// variants except a skipped unreadable directory (handled inside the
/// walker, never surfaced) abort the build: the operation is all-or-nothing
/// and the partially written destination file is removed.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Destination archive file could not be created.
    #[error("cannot create destination archive {path}: {source}")]
    CannotCreateDestination {
        /// The destination path that was not writable.
        path: PathBuf,
        /// Underlying I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// A filesystem object could not be read or stat'd during the walk.
    #[error("cannot read {path}: {source}")]
    WalkFailure {
        /// The path that failed.
        path: PathBuf,
        /// Underlying I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// Writing a header or payload to the archive stream failed.
    #[error("cannot write archive entry for {path}: {source}")]
    EncodingFailure {
        /// The entry (or destination) being written when the stream failed.
        path: PathBuf,
        /// Underlying I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// Bytes streamed for a regular file differ from the size its header
    /// declared. The file changed between stat and copy.
    #[error("payload for {path} was {actual} bytes, header declared {expected}")]
    SizeMismatch {
        /// The file whose size changed mid-build.
        path: PathBuf,
        /// Size recorded in the emitted header.
        expected: u64,
        /// Bytes actually observed in the source file.
        actual: u64,
    },
}

impl ArchiveError {
    /// Returns the filesystem path this error is about.
    #[must_use]
    pub fn offending_path(&self) -> &Path {
        match self {
            Self::CannotCreateDestination { path, .. }
            | Self::WalkFailure { path, .. }
            | Self::EncodingFailure { path, .. }
            | Self::SizeMismatch { path, .. } => path,
        }
    }
}
