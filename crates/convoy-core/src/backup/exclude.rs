//! Absolute-path exclusion rules for the archive builder.

use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

/// Set of absolute paths the builder must never emit as entries.
///
/// Membership is checked once per visited entry before its header is
/// written. A path excludes itself and everything below it, so excluding a
/// directory suppresses its whole subtree.
///
/// # Examples
///
/// ```
/// use convoy_core::ExclusionSet;
/// use std::path::Path;
///
/// let mut exclusions = ExclusionSet::new();
/// exclusions.insert("/srv/stack/cache");
///
/// assert!(exclusions.is_excluded(Path::new("/srv/stack/cache")));
/// assert!(exclusions.is_excluded(Path::new("/srv/stack/cache/blob")));
/// assert!(!exclusions.is_excluded(Path::new("/srv/stack/data")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    paths: BTreeSet<PathBuf>,
}

impl ExclusionSet {
    /// Creates an empty exclusion set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a path to the set.
    pub fn insert<P: Into<PathBuf>>(&mut self, path: P) {
        self.paths.insert(path.into());
    }

    /// Returns `true` if `path` equals, or lies below, any excluded path.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| path.starts_with(p))
    }

    /// Iterates over the excluded roots in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }

    /// Returns the number of excluded roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if no paths are excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for ExclusionSet {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<P: Into<PathBuf>> Extend<P> for ExclusionSet {
    fn extend<T: IntoIterator<Item = P>>(&mut self, iter: T) {
        self.paths.extend(iter.into_iter().map(Into::into));
    }
}
