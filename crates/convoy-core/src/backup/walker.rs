//! Deterministic directory tree walking.
//!
//! The walker yields one entry per filesystem object below a root
//! directory, depth-first, with siblings sorted by file name so two walks
//! of an unmodified tree always produce the same sequence.

use crate::ArchiveError;
use crate::Result;
use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

/// Walks a directory tree rooted at, but excluding, a root directory.
///
/// Traversal is lazy: entries are produced one at a time as the caller
/// pulls from the iterator, so early termination on the first fatal error
/// is plain control flow.
///
/// Error policy: a permission-denied error while reading a directory skips
/// that subtree and continues with its siblings; any other walk error is
/// fatal and surfaces as [`ArchiveError::WalkFailure`].
///
/// # Examples
///
/// ```no_run
/// use convoy_core::TreeWalker;
///
/// let walker = TreeWalker::new("/srv/stack");
/// for entry in walker.entries() {
///     let entry = entry?;
///     println!("{}", entry.path.display());
/// }
/// # Ok::<(), convoy_core::ArchiveError>(())
/// ```
pub struct TreeWalker {
    root: PathBuf,
}

impl TreeWalker {
    /// Creates a walker for the given root directory.
    #[must_use]
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Returns a lazy iterator over the tree below the root.
    ///
    /// The root directory itself produces no entry; all descendants do.
    /// Symbolic links are recorded as their own entry and never followed,
    /// so the walk cannot cycle or escape the root boundary.
    pub fn entries(&self) -> impl Iterator<Item = Result<FsEntry>> + '_ {
        WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => Some(build_entry(&entry)),
                Err(err) if is_skippable(&err) => None,
                Err(err) => {
                    let path = err
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
                    Some(Err(ArchiveError::WalkFailure { path, source }))
                }
            })
    }
}

/// Directory read failures caused by missing permissions skip the subtree.
fn is_skippable(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::PermissionDenied)
}

/// Builds an [`FsEntry`] from a raw walkdir entry.
fn build_entry(entry: &walkdir::DirEntry) -> Result<FsEntry> {
    let path = entry.path().to_path_buf();
    let metadata = entry.metadata().map_err(|e| {
        let source = e
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("cannot stat entry"));
        ArchiveError::WalkFailure {
            path: path.clone(),
            source,
        }
    })?;

    let kind = if metadata.is_symlink() {
        let target = std::fs::read_link(&path).map_err(|e| ArchiveError::WalkFailure {
            path: path.clone(),
            source: e,
        })?;
        EntryKind::Symlink { target }
    } else if metadata.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    };

    let size = match kind {
        EntryKind::File => metadata.len(),
        _ => 0,
    };

    Ok(FsEntry {
        path,
        kind,
        size,
        mode: mode_bits(&metadata),
        owner: try_owner(&metadata),
        mtime: mtime_secs(&metadata),
    })
}

/// Immutable snapshot of one filesystem object at visit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    /// Absolute (or root-joined) filesystem path of the object.
    pub path: PathBuf,

    /// What kind of object this is.
    pub kind: EntryKind,

    /// Size in bytes; nonzero only for regular files.
    pub size: u64,

    /// Permission bits as reported by the platform.
    pub mode: u32,

    /// Owning user and group ids when the platform exposes them.
    pub owner: Option<(u32, u32)>,

    /// Modification time, seconds since the Unix epoch.
    pub mtime: u64,
}

/// Kind of filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file with a payload.
    File,

    /// Directory.
    Directory,

    /// Symbolic link, stored with its target and never followed.
    Symlink {
        /// Target of the symlink.
        target: PathBuf,
    },
}

/// Owner-id extraction is a platform capability; absence means "unknown".
#[cfg(unix)]
fn try_owner(metadata: &Metadata) -> Option<(u32, u32)> {
    use std::os::unix::fs::MetadataExt;
    Some((metadata.uid(), metadata.gid()))
}

#[cfg(not(unix))]
fn try_owner(_metadata: &Metadata) -> Option<(u32, u32)> {
    None
}

#[cfg(unix)]
fn mode_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    metadata.mode()
}

#[cfg(not(unix))]
fn mode_bits(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

/// mtime can predate the epoch; clamp to 0 rather than fail.
fn mtime_secs(metadata: &Metadata) -> u64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walker_excludes_root() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "data").unwrap();

        let walker = TreeWalker::new(temp.path());
        let entries: Vec<_> = walker.entries().collect::<Result<Vec<_>>>().unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries.iter().all(|e| e.path != temp.path()));
    }

    #[test]
    fn test_walker_deterministic_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(root.join("zeta.txt"), "z").unwrap();
        fs::write(root.join("alpha.txt"), "a").unwrap();
        fs::create_dir(root.join("mid")).unwrap();
        fs::write(root.join("mid/inner.txt"), "i").unwrap();

        let collect = || {
            TreeWalker::new(root)
                .entries()
                .map(|e| e.unwrap().path)
                .collect::<Vec<_>>()
        };

        let first = collect();
        let second = collect();
        assert_eq!(first, second);

        // Siblings sorted by name, parents before children.
        assert_eq!(
            first,
            vec![
                root.join("alpha.txt"),
                root.join("mid"),
                root.join("mid/inner.txt"),
                root.join("zeta.txt"),
            ]
        );
    }

    #[test]
    fn test_walker_captures_metadata() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("file.bin"), vec![0u8; 512]).unwrap();
        fs::create_dir(root.join("dir")).unwrap();

        let entries: Vec<_> = TreeWalker::new(root)
            .entries()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        let file = entries.iter().find(|e| e.kind == EntryKind::File).unwrap();
        assert_eq!(file.size, 512);
        assert!(file.mtime > 0);

        let dir = entries
            .iter()
            .find(|e| e.kind == EntryKind::Directory)
            .unwrap();
        assert_eq!(dir.size, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_walker_reports_owner_on_unix() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("owned.txt"), "x").unwrap();

        let entries: Vec<_> = TreeWalker::new(temp.path())
            .entries()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert!(entries[0].owner.is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_walker_records_symlink_without_following() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("real")).unwrap();
        fs::write(root.join("real/file.txt"), "content").unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        let entries: Vec<_> = TreeWalker::new(root)
            .entries()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        let link = entries.iter().find(|e| e.path == root.join("link")).unwrap();
        match &link.kind {
            EntryKind::Symlink { target } => assert_eq!(target, &root.join("real")),
            other => panic!("expected symlink, got {other:?}"),
        }

        // The link target's contents appear once, under "real" only.
        let under_link = entries
            .iter()
            .filter(|e| e.path.starts_with(root.join("link")) && e.path != root.join("link"))
            .count();
        assert_eq!(under_link, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_walker_skips_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(root.join("visible.txt"), "ok").unwrap();
        fs::create_dir(root.join("sealed")).unwrap();
        fs::write(root.join("sealed/hidden.txt"), "no").unwrap();
        fs::set_permissions(root.join("sealed"), fs::Permissions::from_mode(0o000)).unwrap();

        // Root bypasses permission checks; nothing to test in that case.
        if fs::read_dir(root.join("sealed")).is_ok() {
            fs::set_permissions(root.join("sealed"), fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result: Result<Vec<_>> = TreeWalker::new(root).entries().collect();

        // Restore permissions so TempDir can clean up.
        fs::set_permissions(root.join("sealed"), fs::Permissions::from_mode(0o755)).unwrap();

        let entries = result.unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.clone()).collect();
        assert!(paths.contains(&root.join("visible.txt")));
        assert!(paths.contains(&root.join("sealed")));
        assert!(!paths.contains(&root.join("sealed/hidden.txt")));
    }
}
