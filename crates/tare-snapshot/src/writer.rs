//! Streaming snapshot writer.
//!
//! [`SnapshotWriter`] appends capture fragments to any `Write` sink,
//! untouched and in arrival order. Generic over the sink so tests use
//! `Vec<u8>` and production code uses `BufWriter<File>`.

use std::io::Write;

use crate::profiler::Fragment;

/// Appends snapshot fragments to a byte sink.
pub struct SnapshotWriter<W: Write> {
    sink: W,
    fragments_written: u64,
    bytes_written: u64,
}

impl<W: Write> SnapshotWriter<W> {
    /// Wrap a sink.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            fragments_written: 0,
            bytes_written: 0,
        }
    }

    /// Append one fragment verbatim.
    pub fn append(&mut self, fragment: &Fragment) -> std::io::Result<()> {
        let bytes = fragment.as_bytes();
        self.sink.write_all(bytes)?;
        self.fragments_written += 1;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.sink.flush()
    }

    /// Number of fragments appended so far.
    pub fn fragments_written(&self) -> u64 {
        self.fragments_written
    }

    /// Total payload bytes appended so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
