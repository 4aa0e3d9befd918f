//! Archive build orchestration.
//!
//! Binds the tree walker and the archive encoder together: opens the
//! destination sink, layers gzip compression and tar encoding over it,
//! drives the walk, applies exclusion rules, and reports progress. The
//! whole build is single-threaded and strictly sequential; the archive
//! format needs one ordered writer and the workload is bound on a single
//! destination file anyway.

use crate::ArchiveError;
use crate::Result;
use crate::backup::encoder::ArchiveEncoder;
use crate::backup::exclude::ExclusionSet;
use crate::backup::progress::NoopProgress;
use crate::backup::progress::ProgressSink;
use crate::backup::stats::ArchiveStats;
use crate::backup::walker::EntryKind;
use crate::backup::walker::TreeWalker;
use crate::io::CountingWriter;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

/// Builds a gzip-compressed tar snapshot of a directory tree.
///
/// The build is all-or-nothing: the first fatal error aborts the run and
/// the partially written destination file is deleted, so a file at the
/// destination path is always a complete archive. No retries happen at
/// this level; rerunning a failed backup is the caller's decision.
///
/// # Examples
///
/// ```no_run
/// use convoy_core::ArchiveBuilder;
///
/// let stats = ArchiveBuilder::new("/srv/stack", "/srv/backup.tar.gz")
///     .exclude("/srv/stack/cache")
///     .compression_level(9)
///     .build()?;
///
/// println!("{} entries, {} bytes", stats.total_entries(), stats.bytes_compressed);
/// # Ok::<(), convoy_core::ArchiveError>(())
/// ```
#[derive(Debug)]
pub struct ArchiveBuilder {
    root: PathBuf,
    destination: PathBuf,
    exclusions: ExclusionSet,
    compression_level: Option<u8>,
}

impl ArchiveBuilder {
    /// Creates a builder archiving `root` into the file at `destination`.
    #[must_use]
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(root: P, destination: Q) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            destination: destination.as_ref().to_path_buf(),
            exclusions: ExclusionSet::new(),
            compression_level: None,
        }
    }

    /// Excludes a path (and everything below it) from the archive.
    #[must_use]
    pub fn exclude<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.exclusions.insert(path);
        self
    }

    /// Replaces the exclusion set wholesale.
    #[must_use]
    pub fn exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Sets the gzip compression level (1-9). Default is balanced.
    #[must_use]
    pub fn compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Builds the archive without progress reporting.
    pub fn build(self) -> Result<ArchiveStats> {
        let mut progress = NoopProgress;
        self.build_with_progress(&mut progress)
    }

    /// Builds the archive, notifying `progress` per archived file.
    ///
    /// Layer order on success is encoder finalize, then gzip finalize,
    /// then destination flush; on any fatal error the same layers are
    /// abandoned and the destination file is removed.
    pub fn build_with_progress(self, progress: &mut dyn ProgressSink) -> Result<ArchiveStats> {
        let start = Instant::now();

        // Fail fast before any walk begins.
        let file =
            File::create(&self.destination).map_err(|e| ArchiveError::CannotCreateDestination {
                path: self.destination.clone(),
                source: e,
            })?;
        let destination = self
            .destination
            .canonicalize()
            .unwrap_or_else(|_| self.destination.clone());

        let result = self.run(file, &destination, progress, start);
        if result.is_err() {
            // Deletion policy: never leave an ambiguous half-written
            // archive at the destination.
            let _ = fs::remove_file(&destination);
        }
        result
    }

    fn run(
        &self,
        file: File,
        destination: &Path,
        progress: &mut dyn ProgressSink,
        start: Instant,
    ) -> Result<ArchiveStats> {
        let root = self
            .root
            .canonicalize()
            .map_err(|e| ArchiveError::WalkFailure {
                path: self.root.clone(),
                source: e,
            })?;

        // The destination excludes itself so the archive is never
        // archived mid-write; caller exclusions are resolved to the same
        // canonical form the walker reports.
        let mut excluded: ExclusionSet = self
            .exclusions
            .iter()
            .map(|p| p.canonicalize().unwrap_or_else(|_| p.clone()))
            .collect();
        excluded.insert(destination.to_path_buf());

        let gz = GzEncoder::new(
            CountingWriter::new(file),
            gzip_level(self.compression_level),
        );
        let mut encoder = ArchiveEncoder::new(gz);
        let mut stats = ArchiveStats::new();

        stream_entries(&root, &excluded, &mut encoder, &mut stats, progress)?;

        stats.bytes_compressed = finalize(encoder, destination)?;
        stats.duration = start.elapsed();
        progress.finished();
        Ok(stats)
    }
}

/// Drives the walk and appends every non-excluded entry to the encoder.
fn stream_entries<W: Write>(
    root: &Path,
    excluded: &ExclusionSet,
    encoder: &mut ArchiveEncoder<W>,
    stats: &mut ArchiveStats,
    progress: &mut dyn ProgressSink,
) -> Result<()> {
    let walker = TreeWalker::new(root);

    for entry in walker.entries() {
        let entry = entry?;

        if excluded.is_excluded(&entry.path) {
            continue;
        }
        let Some(name) = archive_name(root, &entry.path) else {
            continue;
        };

        match &entry.kind {
            EntryKind::Directory => {
                encoder.append_directory(&name, &entry)?;
                stats.directories_added += 1;
            }
            EntryKind::Symlink { target } => {
                encoder.append_symlink(&name, &entry, target)?;
                stats.symlinks_added += 1;
            }
            EntryKind::File => {
                // Scoped handle: released on every exit path of the copy.
                let mut payload =
                    File::open(&entry.path).map_err(|e| ArchiveError::WalkFailure {
                        path: entry.path.clone(),
                        source: e,
                    })?;
                encoder.append_file(&name, &entry, &mut payload)?;
                stats.files_added += 1;
                stats.bytes_written += entry.size;
                progress.bytes_copied(entry.size);
                progress.file_archived(&name);
            }
        }
    }

    Ok(())
}

/// Closes the layered writers in reverse order and returns the compressed
/// byte count.
fn finalize(
    encoder: ArchiveEncoder<GzEncoder<CountingWriter<File>>>,
    destination: &Path,
) -> Result<u64> {
    let gz = encoder
        .finish()
        .map_err(|e| finalize_failed(destination, e))?;
    let mut sink = gz.finish().map_err(|e| finalize_failed(destination, e))?;
    sink.flush().map_err(|e| finalize_failed(destination, e))?;
    Ok(sink.total_bytes())
}

fn finalize_failed(destination: &Path, source: io::Error) -> ArchiveError {
    ArchiveError::EncodingFailure {
        path: destination.to_path_buf(),
        source,
    }
}

/// Root-relative archive name; `None` for the root itself.
fn archive_name(root: &Path, path: &Path) -> Option<PathBuf> {
    let rel = path.strip_prefix(root).ok()?;
    if rel.as_os_str().is_empty() || rel == Path::new(".") {
        return None;
    }
    Some(rel.to_path_buf())
}

/// Maps a 1-9 level onto flate2's scale.
fn gzip_level(level: Option<u8>) -> Compression {
    match level {
        None | Some(6) => Compression::default(),
        Some(1..=3) => Compression::fast(),
        Some(7..=9) => Compression::best(),
        Some(n) => Compression::new(u32::from(n)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builder_fluent_configuration() {
        let builder = ArchiveBuilder::new("/srv/stack", "/srv/out.tar.gz")
            .exclude("/srv/stack/cache")
            .compression_level(9);

        assert_eq!(builder.root, Path::new("/srv/stack"));
        assert_eq!(builder.destination, Path::new("/srv/out.tar.gz"));
        assert_eq!(builder.exclusions.len(), 1);
        assert_eq!(builder.compression_level, Some(9));
    }

    #[test]
    fn test_build_fails_fast_on_unwritable_destination() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "data").unwrap();

        let result = ArchiveBuilder::new(temp.path(), "/nonexistent/dir/out.tar.gz").build();

        assert!(matches!(
            result.unwrap_err(),
            ArchiveError::CannotCreateDestination { .. }
        ));
    }

    #[test]
    fn test_build_missing_root_removes_destination() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out.tar.gz");

        let result = ArchiveBuilder::new(temp.path().join("missing"), &dest).build();

        assert!(matches!(
            result.unwrap_err(),
            ArchiveError::WalkFailure { .. }
        ));
        assert!(!dest.exists(), "partial destination must be deleted");
    }

    #[test]
    fn test_archive_name_skips_root() {
        let root = Path::new("/srv/stack");
        assert_eq!(archive_name(root, root), None);
        assert_eq!(
            archive_name(root, Path::new("/srv/stack/sub/a.txt")),
            Some(PathBuf::from("sub/a.txt"))
        );
        assert_eq!(archive_name(root, Path::new("/elsewhere/a.txt")), None);
    }

    #[test]
    fn test_gzip_level_mapping() {
        assert_eq!(gzip_level(None), Compression::default());
        assert_eq!(gzip_level(Some(1)), Compression::fast());
        assert_eq!(gzip_level(Some(6)), Compression::default());
        assert_eq!(gzip_level(Some(9)), Compression::best());
    }
}
