//! Error types for snapshot capture.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::capture::CaptureState;

/// A profiling-session step was rejected.
#[derive(Debug)]
pub enum ProfilerError {
    /// The session's service thread could not be started.
    OpenFailed {
        /// Human-readable description of the failure.
        detail: String,
    },
    /// `enable` was requested on an already-enabled session.
    AlreadyEnabled,
    /// `capture` or `disable` was requested before `enable`.
    NotEnabled,
    /// The streaming handler disappeared mid-capture.
    StreamClosed,
    /// The session's service thread is gone.
    SessionClosed,
    /// The heap graph could not be serialized.
    Encode {
        /// Human-readable description of the failure.
        detail: String,
    },
}

impl fmt::Display for ProfilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFailed { detail } => write!(f, "session open failed: {detail}"),
            Self::AlreadyEnabled => write!(f, "heap profiling already enabled"),
            Self::NotEnabled => write!(f, "heap profiling not enabled"),
            Self::StreamClosed => write!(f, "streaming handler closed mid-capture"),
            Self::SessionClosed => write!(f, "profiling session closed"),
            Self::Encode { detail } => write!(f, "snapshot encoding failed: {detail}"),
        }
    }
}

impl std::error::Error for ProfilerError {}

/// A snapshot capture failed.
#[derive(Debug)]
pub enum SnapshotError {
    /// Filesystem step failed; carries the attempted path.
    Io {
        /// The path being created or written.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The output sink rejected a write or flush.
    Stream {
        /// The underlying I/O error.
        source: io::Error,
    },
    /// A protocol step was rejected, tagged with the driver state it
    /// failed in.
    Protocol {
        /// Driver state at the time of the failure.
        state: CaptureState,
        /// The rejected step's error.
        source: ProfilerError,
    },
}

impl SnapshotError {
    /// Filesystem error at `path`.
    pub(crate) fn io(path: PathBuf, source: io::Error) -> Self {
        Self::Io { path, source }
    }

    /// Protocol error while in `state`.
    pub(crate) fn protocol(state: CaptureState, source: ProfilerError) -> Self {
        Self::Protocol { state, source }
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "I/O error at '{}': {source}", path.display())
            }
            Self::Stream { source } => write!(f, "snapshot stream write failed: {source}"),
            Self::Protocol { state, source } => {
                write!(f, "capture protocol failed while {state}: {source}")
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } | Self::Stream { source } => Some(source),
            Self::Protocol { source, .. } => Some(source),
        }
    }
}
