//! Archive build statistics.

use std::time::Duration;

/// Outcome of a successful archive build.
///
/// # Examples
///
/// ```
/// use convoy_core::ArchiveStats;
///
/// let mut stats = ArchiveStats::default();
/// stats.bytes_written = 1000;
/// stats.bytes_compressed = 500;
///
/// assert_eq!(stats.compression_ratio(), 2.0);
/// assert_eq!(stats.compression_percentage(), 50.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveStats {
    /// Number of regular files archived.
    pub files_added: usize,

    /// Number of directories archived.
    pub directories_added: usize,

    /// Number of symlinks archived.
    pub symlinks_added: usize,

    /// Total payload bytes read from the source tree (uncompressed).
    pub bytes_written: u64,

    /// Size of the finished archive file on disk (compressed).
    pub bytes_compressed: u64,

    /// Wall-clock duration of the build.
    pub duration: Duration,
}

impl ArchiveStats {
    /// Creates empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries in the archive.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.files_added + self.directories_added + self.symlinks_added
    }

    /// Compression ratio (uncompressed / compressed), 0.0 when either side
    /// is zero.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.bytes_compressed as f64
    }

    /// Space saved by compression as a percentage of the input.
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_written == 0 {
            return 0.0;
        }
        if self.bytes_compressed == 0 {
            return 100.0;
        }
        let saved = self.bytes_written.saturating_sub(self.bytes_compressed);
        (saved as f64 / self.bytes_written as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = ArchiveStats::default();
        assert_eq!(stats.total_entries(), 0);
        assert_eq!(stats.bytes_written, 0);
        assert_eq!(stats.duration, Duration::default());
    }

    #[test]
    fn test_total_entries() {
        let mut stats = ArchiveStats::new();
        stats.files_added = 10;
        stats.directories_added = 3;
        stats.symlinks_added = 2;
        assert_eq!(stats.total_entries(), 15);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_compression_ratio() {
        let mut stats = ArchiveStats::new();

        stats.bytes_written = 1000;
        stats.bytes_compressed = 500;
        assert_eq!(stats.compression_ratio(), 2.0);

        stats.bytes_compressed = 0;
        assert_eq!(stats.compression_ratio(), 0.0);

        stats.bytes_written = 0;
        stats.bytes_compressed = 500;
        assert_eq!(stats.compression_ratio(), 0.0);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_compression_percentage() {
        let mut stats = ArchiveStats::new();

        stats.bytes_written = 1000;
        stats.bytes_compressed = 250;
        assert_eq!(stats.compression_percentage(), 75.0);

        // Expansion never reports negative savings.
        stats.bytes_written = 500;
        stats.bytes_compressed = 1000;
        assert_eq!(stats.compression_percentage(), 0.0);

        stats.bytes_written = 1000;
        stats.bytes_compressed = 0;
        assert_eq!(stats.compression_percentage(), 100.0);
    }
}
