use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classified failure of a call against the WHM json-api.
///
/// Every variant carries enough context (endpoint, host, raw message) for an
/// operator to act on it. All variants are serializable for structured error
/// reporting to the host platform.
///
/// None of these are retried by the client. [`AccountExists`](Self::AccountExists)
/// is the only variant a caller may reasonably retry, with a different username.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "code")]
pub enum ApiError {
    /// The endpoint does not exist on the remote host (HTTP 404).
    ///
    /// Usually a wrong hostname path or a control-panel version mismatch.
    /// Should be reported to an operator, not retried.
    #[error(
        "WHM endpoint '{endpoint}' was not found on {host} (HTTP 404); check the hostname and that the control panel version exposes this API"
    )]
    NotFound {
        /// Endpoint that was requested (e.g. `createacct`).
        endpoint: String,
        /// Host the request was sent to.
        host: String,
    },

    /// The remote refused the credentials or the operation (HTTP 403).
    #[error(
        "WHM refused access to '{endpoint}' (HTTP 403); check that the API token is valid and not expired, and that the API user has permission for this operation"
    )]
    Forbidden {
        /// Endpoint that was requested.
        endpoint: String,
        /// Raw response body, if any.
        raw_message: Option<String>,
    },

    /// Any other failing status, transport failure, or unreadable payload.
    #[error(
        "WHM request to '{endpoint}' failed{}: {detail}; check that the hostname and API token are correct",
        .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
    )]
    Unknown {
        /// Endpoint that was requested.
        endpoint: String,
        /// HTTP status, when a response was received at all.
        status: Option<u16>,
        /// Error details.
        detail: String,
    },

    /// `createacct` was rejected because the username (or domain) is taken.
    #[error("WHM account '{username}' already exists: {reason}")]
    AccountExists {
        /// Username that collided.
        username: String,
        /// Reason reported by the remote.
        reason: String,
    },

    /// The remote answered HTTP 200 but flagged the operation as failed.
    #[error("WHM rejected '{endpoint}': {reason}")]
    Rejected {
        /// Endpoint that was requested.
        endpoint: String,
        /// Reason reported by the remote.
        reason: String,
    },
}

impl ApiError {
    /// Whether the failure is expected behavior (bad input, missing resource,
    /// refused credentials). Used for log levels: `warn` when `true`, `error`
    /// otherwise.
    ///
    /// **Update this when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Forbidden { .. } | Self::AccountExists { .. } | Self::Rejected { .. }
        )
    }

    /// Whether repeating the operation with different input may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AccountExists { .. })
    }

    /// Endpoint the failure relates to, when known.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::NotFound { endpoint, .. }
            | Self::Forbidden { endpoint, .. }
            | Self::Unknown { endpoint, .. }
            | Self::Rejected { endpoint, .. } => Some(endpoint.as_str()),
            Self::AccountExists { .. } => None,
        }
    }
}

/// Convenience type alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;
