//! Streaming archive encoding.
//!
//! The encoder serializes walk entries into tar records on any byte sink.
//! It is a strict one-pass forward stream: sizes come from walk-time
//! metadata, headers are never rewritten, and compression is layered
//! outside by the caller.

use crate::ArchiveError;
use crate::Result;
use crate::backup::walker::FsEntry;
use crate::io::CountingReader;
use std::io;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use tar::Builder;
use tar::Header;

/// Appends header+payload records to an open archive stream.
///
/// The encoder only sees a generic [`Write`] sink; whether that sink
/// compresses is the orchestrator's concern.
///
/// # Examples
///
/// ```
/// use convoy_core::backup::ArchiveEncoder;
///
/// let encoder = ArchiveEncoder::new(Vec::new());
/// let sink = encoder.finish()?;
/// assert!(!sink.is_empty()); // end-of-archive marker
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct ArchiveEncoder<W: Write> {
    builder: Builder<W>,
}

impl<W: Write> ArchiveEncoder<W> {
    /// Creates an encoder writing to `sink`.
    #[must_use]
    pub fn new(sink: W) -> Self {
        Self {
            builder: Builder::new(sink),
        }
    }

    /// Appends a directory record under the archive-relative `name`.
    pub fn append_directory(&mut self, name: &Path, entry: &FsEntry) -> Result<()> {
        let mut header = entry_header(entry, tar::EntryType::Directory);
        self.builder
            .append_data(&mut header, name, io::empty())
            .map_err(|e| ArchiveError::EncodingFailure {
                path: entry.path.clone(),
                source: e,
            })
    }

    /// Appends a symlink record pointing at `target`.
    pub fn append_symlink(&mut self, name: &Path, entry: &FsEntry, target: &Path) -> Result<()> {
        let mut header = entry_header(entry, tar::EntryType::Symlink);
        self.builder
            .append_link(&mut header, name, target)
            .map_err(|e| ArchiveError::EncodingFailure {
                path: entry.path.clone(),
                source: e,
            })
    }

    /// Appends a regular-file record followed by its payload bytes.
    ///
    /// The payload is capped at the size the header declares and counted;
    /// a shortfall, or any byte still left in `payload` afterwards, means
    /// the file changed between stat and copy and is a fatal
    /// [`ArchiveError::SizeMismatch`]. The archive must never silently
    /// truncate or pad.
    pub fn append_file<R: Read>(
        &mut self,
        name: &Path,
        entry: &FsEntry,
        payload: &mut R,
    ) -> Result<()> {
        let mut header = entry_header(entry, tar::EntryType::Regular);
        header.set_size(entry.size);

        let mut counted = CountingReader::new(payload.by_ref().take(entry.size));
        self.builder
            .append_data(&mut header, name, &mut counted)
            .map_err(|e| ArchiveError::EncodingFailure {
                path: entry.path.clone(),
                source: e,
            })?;

        let streamed = counted.total_bytes();
        if streamed != entry.size {
            return Err(ArchiveError::SizeMismatch {
                path: entry.path.clone(),
                expected: entry.size,
                actual: streamed,
            });
        }

        // A leftover byte means the file grew after its header was emitted.
        let mut probe = [0u8; 1];
        let extra = payload
            .read(&mut probe)
            .map_err(|e| ArchiveError::WalkFailure {
                path: entry.path.clone(),
                source: e,
            })?;
        if extra > 0 {
            return Err(ArchiveError::SizeMismatch {
                path: entry.path.clone(),
                expected: entry.size,
                actual: entry.size + extra as u64,
            });
        }

        Ok(())
    }

    /// Writes the end-of-archive marker and returns the underlying sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.builder.finish()?;
        self.builder.into_inner()
    }
}

/// Builds a GNU tar header from walk-time metadata.
///
/// `append_data`/`append_link` fill in the path and checksum; everything
/// else is fixed here so the record is reproducible for a given entry.
fn entry_header(entry: &FsEntry, kind: tar::EntryType) -> Header {
    let mut header = Header::new_gnu();
    header.set_entry_type(kind);
    header.set_size(0);
    header.set_mode(entry.mode);
    header.set_mtime(entry.mtime);
    if let Some((uid, gid)) = entry.owner {
        header.set_uid(u64::from(uid));
        header.set_gid(u64::from(gid));
    }
    header
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backup::walker::EntryKind;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn file_entry(size: u64) -> FsEntry {
        FsEntry {
            path: PathBuf::from("/src/data.bin"),
            kind: EntryKind::File,
            size,
            mode: 0o644,
            owner: Some((1000, 1000)),
            mtime: 1_700_000_000,
        }
    }

    #[test]
    fn test_encoder_roundtrips_file_metadata() {
        let mut encoder = ArchiveEncoder::new(Vec::new());
        let entry = file_entry(4);
        let mut payload = Cursor::new(b"data".to_vec());

        encoder
            .append_file(Path::new("sub/data.bin"), &entry, &mut payload)
            .unwrap();
        let bytes = encoder.finish().unwrap();

        let mut archive = tar::Archive::new(Cursor::new(bytes));
        let mut entries = archive.entries().unwrap();
        let mut first = entries.next().unwrap().unwrap();

        assert_eq!(first.path().unwrap().as_ref(), Path::new("sub/data.bin"));
        assert_eq!(first.header().size().unwrap(), 4);
        assert_eq!(first.header().mode().unwrap(), 0o644);
        assert_eq!(first.header().uid().unwrap(), 1000);
        assert_eq!(first.header().mtime().unwrap(), 1_700_000_000);

        let mut content = Vec::new();
        first.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"data");
    }

    #[test]
    fn test_encoder_rejects_shrunken_payload() {
        let mut encoder = ArchiveEncoder::new(Vec::new());
        let entry = file_entry(10);
        let mut payload = Cursor::new(b"shrt".to_vec());

        let err = encoder
            .append_file(Path::new("data.bin"), &entry, &mut payload)
            .unwrap_err();

        match err {
            ArchiveError::SizeMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, 10);
                assert_eq!(actual, 4);
            }
            other => panic!("expected SizeMismatch, got {other}"),
        }
    }

    #[test]
    fn test_encoder_rejects_grown_payload() {
        let mut encoder = ArchiveEncoder::new(Vec::new());
        let entry = file_entry(2);
        let mut payload = Cursor::new(b"grown".to_vec());

        let err = encoder
            .append_file(Path::new("data.bin"), &entry, &mut payload)
            .unwrap_err();

        assert!(matches!(err, ArchiveError::SizeMismatch { .. }));
    }

    #[test]
    fn test_encoder_directory_and_symlink_records() {
        let mut encoder = ArchiveEncoder::new(Vec::new());

        let dir = FsEntry {
            path: PathBuf::from("/src/sub"),
            kind: EntryKind::Directory,
            size: 0,
            mode: 0o755,
            owner: None,
            mtime: 1_700_000_000,
        };
        encoder.append_directory(Path::new("sub"), &dir).unwrap();

        let link = FsEntry {
            path: PathBuf::from("/src/link"),
            kind: EntryKind::Symlink {
                target: PathBuf::from("sub"),
            },
            size: 0,
            mode: 0o777,
            owner: None,
            mtime: 1_700_000_000,
        };
        encoder
            .append_symlink(Path::new("link"), &link, Path::new("sub"))
            .unwrap();

        let bytes = encoder.finish().unwrap();
        let mut archive = tar::Archive::new(Cursor::new(bytes));
        let entries: Vec<_> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().header().entry_type())
            .collect();

        assert_eq!(
            entries,
            vec![tar::EntryType::Directory, tar::EntryType::Symlink]
        );
    }

    #[test]
    fn test_encoder_empty_payload() {
        let mut encoder = ArchiveEncoder::new(Vec::new());
        let entry = file_entry(0);
        let mut payload = Cursor::new(Vec::new());

        encoder
            .append_file(Path::new("empty.txt"), &entry, &mut payload)
            .unwrap();
        let bytes = encoder.finish().unwrap();

        let mut archive = tar::Archive::new(Cursor::new(bytes));
        let first = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(first.header().size().unwrap(), 0);
    }
}
