use std::fmt;
use std::path::PathBuf;

use compress_core::{ProgressEvent, STATUS_READY, STATUS_UNRESPONSIVE};

use crate::decode::DecodeError;
use crate::persist::PersistError;

/// Result of a readiness probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub ready: bool,
    pub attempts: u32,
}

impl Readiness {
    pub fn status_text(&self) -> &'static str {
        if self.ready {
            STATUS_READY
        } else {
            STATUS_UNRESPONSIVE
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Readiness(Readiness),
    UploadAccepted,
    Progress(ProgressEvent),
    JobCompleted {
        result: Result<JobOutcome, JobError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub saved_to: PathBuf,
    pub bytes_written: u64,
}

/// A job failure. `message` is what the user sees after "Error: ".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct JobError {
    pub kind: FailureKind,
    pub message: String,
}

impl JobError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn http_status(code: u16) -> Self {
        Self::new(FailureKind::HttpStatus(code), format!("HTTP {code}"))
    }
}

impl From<DecodeError> for JobError {
    fn from(err: DecodeError) -> Self {
        Self::new(FailureKind::MalformedStream, err.to_string())
    }
}

impl From<PersistError> for JobError {
    fn from(err: PersistError) -> Self {
        Self::new(FailureKind::Persist, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    MissingBody,
    Timeout,
    Network,
    StreamEnded,
    MalformedStream,
    ServerRejected,
    InvalidLocator,
    Persist,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::MissingBody => write!(f, "missing response body"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::StreamEnded => write!(f, "stream ended early"),
            FailureKind::MalformedStream => write!(f, "malformed stream"),
            FailureKind::ServerRejected => write!(f, "rejected by server"),
            FailureKind::InvalidLocator => write!(f, "invalid download locator"),
            FailureKind::Persist => write!(f, "could not save artifact"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}
