//! Progress reporting for archive builds.

use std::path::Path;

/// Receives build progress notifications.
///
/// Notifications are observational only and never affect control flow:
/// one [`file_archived`](Self::file_archived) call per archived regular
/// file, byte counts as payloads are copied, and a single
/// [`finished`](Self::finished) call when the build completes successfully.
pub trait ProgressSink {
    /// One regular file was fully written to the archive.
    fn file_archived(&mut self, name: &Path);

    /// Payload bytes were copied into the archive stream.
    fn bytes_copied(&mut self, bytes: u64);

    /// The build completed successfully.
    fn finished(&mut self);
}

/// Progress sink that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn file_archived(&mut self, _name: &Path) {}

    fn bytes_copied(&mut self, _bytes: u64) {}

    fn finished(&mut self) {}
}
