use reqwest::StatusCode;
use thiserror::Error;

/// Why an entry moment could not be turned into a point in time.
///
/// The stay calculations never surface this to callers; they degrade to the
/// `Invalid` sentinel instead. It exists so the parser can be tested and so
/// the reason can be logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryMomentError {
    #[error("entry date or time is missing")]
    Missing,
    #[error("malformed entry moment '{input}'")]
    Malformed { input: String },
    #[error("local time '{input}' does not exist in this time zone")]
    NonexistentLocalTime { input: String },
}

/// A failed call to the back-office API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{resource} API error: status {status}")]
    Status {
        resource: String,
        status: StatusCode,
    },
    #[error("Failed to fetch {resource}")]
    Transport {
        resource: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to parse {resource} response")]
    Decode {
        resource: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Whether the same request may succeed if sent again: server errors,
    /// rate limiting, timeouts and refused connections. Client errors such
    /// as 401 or 404 will not change on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => {
                status.is_server_error()
                    || *status == StatusCode::REQUEST_TIMEOUT
                    || *status == StatusCode::TOO_MANY_REQUESTS
            }
            ApiError::Transport { source, .. } => source.is_timeout() || source.is_connect(),
            ApiError::Decode { .. } => false,
        }
    }
}
