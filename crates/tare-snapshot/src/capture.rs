//! Sequential capture driver.
//!
//! The synchronous-looking blocking call over the profiler protocol.
//! Internally an explicit state machine — `Idle → Enabling → Capturing
//! → Draining → Disabling → Closed` — where each step is one request
//! awaiting a single completion signal, executed strictly in order.
//! The fallible steps tag their errors with the state they occurred in;
//! `Draining` (handler unregistration) and `Closed` are pure
//! transitions and cannot fail. The session's release steps (disable,
//! close) run best-effort on every error path so the process-wide
//! session never leaks.
//!
//! Cancellation is not supported: once the capture is requested, the
//! driver waits out the remaining steps.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crossbeam_channel::bounded;

use crate::error::{ProfilerError, SnapshotError};
use crate::graph::HeapGraph;
use crate::profiler::{CaptureStats, ProfilerSession, StreamEvent};
use crate::writer::SnapshotWriter;

/// Capacity of the streaming handler's fragment channel.
const STREAM_CAPACITY: usize = 16;

/// Driver state, advanced strictly forward. Protocol errors carry the
/// state they occurred in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    /// Opening the session.
    Idle,
    /// Waiting for heap profiling to enable.
    Enabling,
    /// Capture requested; fragments streaming.
    Capturing,
    /// Capture complete; handler unregistered, output flushing.
    Draining,
    /// Output closed; profiling disabling and the session closing.
    Disabling,
    /// Session fully released.
    Closed,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Enabling => "enabling",
            Self::Capturing => "capturing",
            Self::Draining => "draining",
            Self::Disabling => "disabling",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Outcome of a successful file capture.
#[derive(Debug)]
pub struct CaptureReport {
    /// Where the snapshot was written.
    pub path: PathBuf,
    /// Stream statistics from the profiler.
    pub stats: CaptureStats,
}

/// Steps 2–5: enable, capture, drain the ordered stream into the
/// writer, unregister the handler.
fn run_protocol<W: Write>(
    session: &ProfilerSession,
    writer: &mut SnapshotWriter<W>,
) -> Result<CaptureStats, SnapshotError> {
    session
        .enable()
        .map_err(|e| SnapshotError::protocol(CaptureState::Enabling, e))?;

    // Registering the streaming handler is creating the channel the
    // service will feed; fragments arrive on it in send order.
    let (stream_tx, stream_rx) = bounded(STREAM_CAPACITY);
    session
        .capture(stream_tx)
        .map_err(|e| SnapshotError::protocol(CaptureState::Capturing, e))?;

    let stats = loop {
        match stream_rx.recv() {
            Ok(StreamEvent::Chunk(fragment)) => writer
                .append(&fragment)
                .map_err(|source| SnapshotError::Stream { source })?,
            Ok(StreamEvent::End(result)) => {
                break result.map_err(|e| SnapshotError::protocol(CaptureState::Capturing, e))?
            }
            Err(_) => {
                return Err(SnapshotError::protocol(
                    CaptureState::Capturing,
                    ProfilerError::SessionClosed,
                ))
            }
        }
    };

    // Draining: unregister the handler. After this drop nothing can
    // feed the writer, so "no writes after close" holds structurally.
    drop(stream_rx);

    Ok(stats)
}

/// Step 7: disable profiling, then close the session. Both steps are
/// always attempted; the first failure wins.
fn release(session: ProfilerSession) -> Result<(), SnapshotError> {
    let disabled = session.disable();
    let closed = session.close();
    disabled
        .and(closed)
        .map_err(|e| SnapshotError::protocol(CaptureState::Disabling, e))
}

/// Best-effort release on an error path: the original error is the one
/// surfaced, but the session must still be let go.
fn release_quiet(session: ProfilerSession) {
    let _ = release(session);
}

/// Capture a heap graph into an arbitrary sink.
///
/// Runs the full protocol; "closing" the output for a generic sink
/// means flushing it. Returns the stats and the sink for inspection.
/// Used by tests; production runs go through [`capture_to_file`].
pub fn capture_to_writer<W: Write>(
    graph: HeapGraph,
    sink: W,
) -> Result<(CaptureStats, W), SnapshotError> {
    let session = ProfilerSession::open(graph)
        .map_err(|e| SnapshotError::protocol(CaptureState::Idle, e))?;
    let mut writer = SnapshotWriter::new(sink);

    let stats = match run_protocol(&session, &mut writer) {
        Ok(stats) => stats,
        Err(e) => {
            release_quiet(session);
            return Err(e);
        }
    };

    // Step 6: flush completes the output before the session winds down.
    if let Err(source) = writer.flush() {
        release_quiet(session);
        return Err(SnapshotError::Stream { source });
    }

    release(session)?;
    Ok((stats, writer.into_inner()))
}

/// Capture a heap graph into a snapshot file at `path`.
///
/// Parent directories are created if absent. The file is flushed and
/// synced — close fully complete — before profiling is disabled and
/// the session closed. On success the file exists, is non-empty, and
/// no handler can write to it again.
pub fn capture_to_file(graph: HeapGraph, path: &Path) -> Result<CaptureReport, SnapshotError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| SnapshotError::io(parent.to_path_buf(), e))?;
        }
    }
    let file = File::create(path).map_err(|e| SnapshotError::io(path.to_path_buf(), e))?;

    let session = ProfilerSession::open(graph)
        .map_err(|e| SnapshotError::protocol(CaptureState::Idle, e))?;
    let mut writer = SnapshotWriter::new(BufWriter::new(file));

    let stats = match run_protocol(&session, &mut writer) {
        Ok(stats) => stats,
        Err(e) => {
            release_quiet(session);
            return Err(e.with_path(path));
        }
    };

    // Step 6: flush the buffer and sync the file; the close must be
    // fully complete before the session is released.
    if let Err(e) = finish_file(writer, path) {
        release_quiet(session);
        return Err(e);
    }

    release(session)?;

    Ok(CaptureReport {
        path: path.to_path_buf(),
        stats,
    })
}

/// Flush, unwrap the buffer, and sync the file to completion.
fn finish_file(writer: SnapshotWriter<BufWriter<File>>, path: &Path) -> Result<(), SnapshotError> {
    let buffered = writer.into_inner();
    let file = buffered
        .into_inner()
        .map_err(|e| SnapshotError::io(path.to_path_buf(), e.into_error()))?;
    file.sync_all()
        .map_err(|e| SnapshotError::io(path.to_path_buf(), e))
}

impl SnapshotError {
    /// Re-tag sink-level errors with the file path being written.
    fn with_path(self, path: &Path) -> Self {
        match self {
            SnapshotError::Stream { source } => SnapshotError::io(path.to_path_buf(), source),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tare_core::StrategyKind;
    use tare_population::Population;

    const T0: i64 = 1_700_000_000;

    fn test_graph(count: u32) -> HeapGraph {
        HeapGraph::from_population(&Population::generate_at(StrategyKind::Delegate, count, T0))
    }

    #[test]
    fn writer_capture_round_trips_to_valid_json() {
        let (stats, sink) = capture_to_writer(test_graph(5), Vec::new()).unwrap();
        assert_eq!(sink.len() as u64, stats.bytes);
        let value: serde_json::Value = serde_json::from_slice(&sink).unwrap();
        assert_eq!(
            value["snapshot"]["edge_count"].as_u64().unwrap() as usize,
            stats.edges
        );
    }

    #[test]
    fn repeated_captures_are_identical() {
        let (_, a) = capture_to_writer(test_graph(3), Vec::new()).unwrap();
        let (_, b) = capture_to_writer(test_graph(3), Vec::new()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn capture_state_displays_every_step() {
        let states = [
            CaptureState::Idle,
            CaptureState::Enabling,
            CaptureState::Capturing,
            CaptureState::Draining,
            CaptureState::Disabling,
            CaptureState::Closed,
        ];
        let labels: Vec<String> = states.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            labels,
            ["idle", "enabling", "capturing", "draining", "disabling", "closed"]
        );
    }
}
