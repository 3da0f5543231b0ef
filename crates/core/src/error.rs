use std::time::Duration;

use thiserror::Error;

/// Fieldless tag for [`CaptionError`], for branching without string inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    RateLimited,
    ServerError,
    RequestError,
    NetworkError,
    DecodeError,
    Timeout,
    Canceled,
    Io,
}

#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("Invalid video id {0:?}: expected 11 characters from [A-Za-z0-9_-]")]
    InvalidInput(String),

    #[error("No captions found: {reason}")]
    NotFound { reason: String },

    #[error("Rate limited by YouTube (HTTP 429)")]
    RateLimited,

    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    #[error("Request rejected: HTTP {status}")]
    RequestError { status: u16 },

    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    #[error("Failed to decode {what}: {source}")]
    DecodeError {
        what: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Retry budget exhausted after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<CaptionError>,
    },

    #[error("Deadline of {0:?} exceeded")]
    Timeout(Duration),

    #[error("Canceled")]
    Canceled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CaptionError {
    pub(crate) fn not_found(reason: impl Into<String>) -> Self {
        CaptionError::NotFound {
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(
        what: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CaptionError::DecodeError {
            what,
            source: Box::new(source),
        }
    }

    /// Classification of this error. `Exhausted` reports the kind of the
    /// error that used up the retry budget.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CaptionError::InvalidInput(_) => ErrorKind::InvalidInput,
            CaptionError::NotFound { .. } => ErrorKind::NotFound,
            CaptionError::RateLimited => ErrorKind::RateLimited,
            CaptionError::ServerError { .. } => ErrorKind::ServerError,
            CaptionError::RequestError { .. } => ErrorKind::RequestError,
            CaptionError::NetworkError(_) => ErrorKind::NetworkError,
            CaptionError::DecodeError { .. } => ErrorKind::DecodeError,
            CaptionError::Exhausted { last, .. } => last.kind(),
            CaptionError::Timeout(_) => ErrorKind::Timeout,
            CaptionError::Canceled => ErrorKind::Canceled,
            CaptionError::Io(_) => ErrorKind::Io,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, CaptionError::Exhausted { .. })
    }

    /// Whether the transport may try the request again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CaptionError::RateLimited
                | CaptionError::ServerError { .. }
                | CaptionError::NetworkError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CaptionError>;
