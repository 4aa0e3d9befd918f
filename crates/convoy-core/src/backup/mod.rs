//! Snapshot archive construction.
//!
//! This module walks a directory tree and streams it into a single
//! gzip-compressed tar archive: [`TreeWalker`] produces entries,
//! [`ArchiveEncoder`] serializes them, and [`ArchiveBuilder`] binds the two
//! together with exclusion rules and progress reporting.

pub mod builder;
pub mod encoder;
pub mod exclude;
pub mod progress;
pub mod stats;
pub mod walker;

// Re-exports for public API
pub use builder::ArchiveBuilder;
pub use encoder::ArchiveEncoder;
pub use exclude::ExclusionSet;
pub use progress::NoopProgress;
pub use progress::ProgressSink;
pub use stats::ArchiveStats;
pub use walker::EntryKind;
pub use walker::FsEntry;
pub use walker::TreeWalker;
