//! Error types returned by the transfer core.
//!
//! Every failed network call keeps the HTTP status and the response body so the
//! caller can report it without digging through logs.

use chrono::{DateTime, Utc};
use std::{fmt, path::PathBuf};

/// A non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    pub status: u16,
    pub body: String,
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "HTTP Status Code: {}", self.status)
        } else {
            write!(f, "HTTP Status Code: {}\nResponse: {}", self.status, self.body)
        }
    }
}

/// Errors raised by a transport call.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("unauthorized, {0}")]
    Unauthorized(HttpFailure),

    #[error("request rejected, {0}")]
    Status(HttpFailure),

    #[error("credential expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    Response(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Maps a non-2xx status and its body to the matching variant.
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        let failure = HttpFailure { status, body };
        if status == 401 || status == 403 {
            Self::Unauthorized(failure)
        } else {
            Self::Status(failure)
        }
    }

    /// True when the credential was rejected or is known to be expired.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::Expired { .. })
    }

    #[must_use]
    pub const fn http_failure(&self) -> Option<&HttpFailure> {
        match self {
            Self::Unauthorized(f) | Self::Status(f) => Some(f),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Open,
    Reserve,
    Transfer,
    Finalize,
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Self::Open => "open",
            Self::Reserve => "reserve",
            Self::Transfer => "transfer",
            Self::Finalize => "finalize",
        };
        f.write_str(phase)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("could not read {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error fetching upload urls: {0}")]
    Reservation(#[source] TransportError),

    #[error("error fetching upload urls: expected {expected} urls, got {got}")]
    ReservationMismatch { expected: u64, got: usize },

    #[error("error uploading chunk {chunk_index} ({} chunks confirmed): {source}", .completed.len())]
    Transfer {
        chunk_index: u64,
        completed: Vec<u64>,
        #[source]
        source: TransportError,
    },

    #[error("error completing upload: {0}")]
    Finalize(#[source] TransportError),

    #[error("upload cancelled during {phase} ({} chunks confirmed)", .completed.len())]
    Cancelled {
        phase: UploadPhase,
        completed: Vec<u64>,
    },
}

impl UploadError {
    /// The phase the session was in when it stopped.
    #[must_use]
    pub const fn phase(&self) -> UploadPhase {
        match self {
            Self::Open { .. } => UploadPhase::Open,
            Self::Reservation(_) | Self::ReservationMismatch { .. } => UploadPhase::Reserve,
            Self::Transfer { .. } => UploadPhase::Transfer,
            Self::Finalize(_) => UploadPhase::Finalize,
            Self::Cancelled { phase, .. } => *phase,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        match self {
            Self::Reservation(e) | Self::Finalize(e) | Self::Transfer { source: e, .. } => {
                e.is_unauthorized()
            }
            _ => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("job failed with status {status} after {attempts} attempts")]
    Failed { status: String, attempts: u32 },

    #[error("gave up waiting after {attempts} attempts, last status: {last_status}")]
    TimedOut { last_status: String, attempts: u32 },

    #[error("wait cancelled after {attempts} attempts")]
    Cancelled {
        attempts: u32,
        last_status: Option<String>,
    },

    #[error("could not query job status (attempt {attempt}): {source}")]
    Transport {
        attempt: u32,
        #[source]
        source: TransportError,
    },
}

impl JobError {
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_unauthorized(),
            _ => false,
        }
    }
}
