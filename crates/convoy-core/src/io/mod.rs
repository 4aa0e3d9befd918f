//! Byte-counting I/O adapters used by the archive pipeline.

mod counting;

pub use counting::CountingReader;
pub use counting::CountingWriter;
