//! The in-process profiler service.
//!
//! A dedicated service thread owns the heap graph for one session and
//! answers protocol requests over a bounded channel: `Enable` and
//! `Disable` reply through a bounded(1) completion channel; `Capture`
//! streams the serialized graph as ordered fragments followed by a
//! terminal [`StreamEvent::End`] on the same channel, so ordering and
//! loss-freedom are structural — there is no second channel for the
//! race to hide in.
//!
//! The service handles one request at a time, which is what makes a
//! second in-flight capture unrepresentable: requests queue and run to
//! completion in submission order. The session closes when the request
//! sender is dropped; the thread is joined on close.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::error::ProfilerError;
use crate::graph::HeapGraph;

/// Upper bound on fragment payload size.
const FRAGMENT_BYTES: usize = 64 * 1024;

/// One ordered chunk of the serialized snapshot stream.
///
/// Fragments are forwarded untouched, in arrival order; the writer
/// never inspects or reframes them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    /// A chunk that is valid UTF-8.
    Text(String),
    /// A chunk carrying raw bytes.
    Binary(Vec<u8>),
}

impl Fragment {
    /// The fragment payload as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Binary(b) => b,
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Event on the capture stream channel.
#[derive(Debug)]
pub enum StreamEvent {
    /// One fragment of the snapshot, in order.
    Chunk(Fragment),
    /// Terminal event: the capture finished (or was rejected).
    End(Result<CaptureStats, ProfilerError>),
}

/// Statistics of a completed capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureStats {
    /// Fragments streamed.
    pub fragments: u64,
    /// Total payload bytes streamed.
    pub bytes: u64,
    /// Nodes in the captured graph.
    pub nodes: usize,
    /// Edges in the captured graph.
    pub edges: usize,
}

/// A protocol request to the service thread.
enum ProfilerRequest {
    Enable {
        reply: Sender<Result<(), ProfilerError>>,
    },
    Capture {
        stream: Sender<StreamEvent>,
    },
    Disable {
        reply: Sender<Result<(), ProfilerError>>,
    },
}

/// One open conversation with the in-process profiler.
///
/// The process-wide profiler assumes a single active session at a time;
/// the capture driver sequences every request and never overlaps them.
pub struct ProfilerSession {
    requests: Option<Sender<ProfilerRequest>>,
    service: Option<JoinHandle<()>>,
}

impl ProfilerSession {
    /// Open a session over the given graph, spawning the service
    /// thread.
    pub fn open(graph: HeapGraph) -> Result<Self, ProfilerError> {
        let (requests, request_rx) = bounded(4);
        let service = thread::Builder::new()
            .name("tare-profiler".into())
            .spawn(move || service_loop(request_rx, graph))
            .map_err(|e| ProfilerError::OpenFailed {
                detail: e.to_string(),
            })?;
        Ok(Self {
            requests: Some(requests),
            service: Some(service),
        })
    }

    /// Enable heap profiling; blocks until the service confirms.
    pub fn enable(&self) -> Result<(), ProfilerError> {
        self.roundtrip(|reply| ProfilerRequest::Enable { reply })
    }

    /// Disable heap profiling; blocks until the service confirms.
    pub fn disable(&self) -> Result<(), ProfilerError> {
        self.roundtrip(|reply| ProfilerRequest::Disable { reply })
    }

    /// Request a full capture, streaming fragments to `stream`.
    ///
    /// Completion (or rejection) arrives as [`StreamEvent::End`] on the
    /// same channel, after every fragment.
    pub fn capture(&self, stream: Sender<StreamEvent>) -> Result<(), ProfilerError> {
        let requests = self
            .requests
            .as_ref()
            .ok_or(ProfilerError::SessionClosed)?;
        requests
            .send(ProfilerRequest::Capture { stream })
            .map_err(|_| ProfilerError::SessionClosed)
    }

    /// Close the session: stop accepting requests and join the service
    /// thread.
    pub fn close(mut self) -> Result<(), ProfilerError> {
        self.requests.take();
        match self.service.take() {
            Some(handle) => handle.join().map_err(|_| ProfilerError::SessionClosed),
            None => Ok(()),
        }
    }

    fn roundtrip(
        &self,
        make: impl FnOnce(Sender<Result<(), ProfilerError>>) -> ProfilerRequest,
    ) -> Result<(), ProfilerError> {
        let requests = self
            .requests
            .as_ref()
            .ok_or(ProfilerError::SessionClosed)?;
        let (reply_tx, reply_rx) = bounded(1);
        requests
            .send(make(reply_tx))
            .map_err(|_| ProfilerError::SessionClosed)?;
        reply_rx.recv().map_err(|_| ProfilerError::SessionClosed)?
    }
}

impl Drop for ProfilerSession {
    fn drop(&mut self) {
        // Best-effort release for abandoned sessions; `close()` leaves
        // both fields empty, making this a no-op after a clean close.
        self.requests.take();
        if let Some(handle) = self.service.take() {
            let _ = handle.join();
        }
    }
}

/// Service thread main loop. Exits when the request channel closes.
fn service_loop(requests: Receiver<ProfilerRequest>, graph: HeapGraph) {
    let mut enabled = false;
    while let Ok(request) = requests.recv() {
        match request {
            ProfilerRequest::Enable { reply } => {
                let result = if enabled {
                    Err(ProfilerError::AlreadyEnabled)
                } else {
                    enabled = true;
                    Ok(())
                };
                let _ = reply.send(result);
            }
            ProfilerRequest::Capture { stream } => {
                let result = if enabled {
                    stream_graph(&graph, &stream)
                } else {
                    Err(ProfilerError::NotEnabled)
                };
                let _ = stream.send(StreamEvent::End(result));
            }
            ProfilerRequest::Disable { reply } => {
                let result = if enabled {
                    enabled = false;
                    Ok(())
                } else {
                    Err(ProfilerError::NotEnabled)
                };
                let _ = reply.send(result);
            }
        }
    }
}

/// Serialize the graph and stream it in bounded fragments.
fn stream_graph(
    graph: &HeapGraph,
    stream: &Sender<StreamEvent>,
) -> Result<CaptureStats, ProfilerError> {
    let encoded = graph.to_json().map_err(|e| ProfilerError::Encode {
        detail: e.to_string(),
    })?;

    let mut fragments = 0u64;
    for chunk in encoded.chunks(FRAGMENT_BYTES) {
        // Chunk boundaries may split a multi-byte character, so each
        // chunk independently decides its framing.
        let fragment = match std::str::from_utf8(chunk) {
            Ok(text) => Fragment::Text(text.to_owned()),
            Err(_) => Fragment::Binary(chunk.to_vec()),
        };
        stream
            .send(StreamEvent::Chunk(fragment))
            .map_err(|_| ProfilerError::StreamClosed)?;
        fragments += 1;
    }

    Ok(CaptureStats {
        fragments,
        bytes: encoded.len() as u64,
        nodes: graph.node_count(),
        edges: graph.edge_count(),
    })
}
