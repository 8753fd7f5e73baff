//! Heap-graph capture protocol and snapshot streaming.
//!
//! Serializes the live object graph of a measurement run to a portable
//! snapshot file through a strict sequential protocol against an
//! in-process profiler service:
//!
//! 1. open a profiling session;
//! 2. enable heap profiling;
//! 3. register a streaming handler appending every fragment, in arrival
//!    order, to the output;
//! 4. request a full capture;
//! 5. unregister the handler on completion;
//! 6. flush and close the output, waiting for the close to finish;
//! 7. disable profiling, then close the session.
//!
//! The session is released on every exit path, including errors — a
//! leaked session would poison repeated invocations, since the profiler
//! is process-wide state with one active session assumed at a time.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod capture;
mod error;
mod graph;
mod profiler;
mod writer;

pub use capture::{capture_to_file, capture_to_writer, CaptureReport, CaptureState};
pub use error::{ProfilerError, SnapshotError};
pub use graph::{EdgeKind, GraphBuilder, HeapEdge, HeapGraph, HeapNode, NodeKind};
pub use profiler::{CaptureStats, Fragment, ProfilerSession, StreamEvent};
pub use writer::SnapshotWriter;
