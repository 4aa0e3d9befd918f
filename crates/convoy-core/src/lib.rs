//! Snapshot archiving and compose-service orchestration for the convoy CLI.
//!
//! `convoy-core` provides the building blocks behind the `convoy` operator
//! tool: a deterministic directory-tree walker, a streaming tar+gzip
//! archive encoder, the archive-build orchestrator that ties them together,
//! and thin helpers for discovering and driving container-compose services.
//!
//! # Examples
//!
//! ```no_run
//! use convoy_core::ArchiveBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let stats = ArchiveBuilder::new("/srv/stack", "/srv/backup.tar.gz").build()?;
//! println!("archived {} files", stats.files_added);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod backup;
pub mod error;
pub mod io;
pub mod services;

// Re-export main API types
pub use backup::ArchiveBuilder;
pub use backup::ArchiveStats;
pub use backup::EntryKind;
pub use backup::ExclusionSet;
pub use backup::FsEntry;
pub use backup::NoopProgress;
pub use backup::ProgressSink;
pub use backup::TreeWalker;
pub use error::ArchiveError;
pub use error::Result;
pub use services::ComposeRunner;
pub use services::ServiceError;
pub use services::ServiceRun;
