//! Error types for the client crate.

use camino::Utf8PathBuf;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Error body returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub trace_id: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

impl ApiError {
    /// Machine-readable reason such as `invalid_credentials`, when provided.
    pub fn detail_code(&self) -> Option<&str> {
        self.details.as_ref()?.get("code")?.as_str()
    }

    /// Field the server rejected, when provided.
    pub fn field(&self) -> Option<&str> {
        self.details.as_ref()?.get("field")?.as_str()
    }

    /// Stand-in for error responses without a decodable body.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body.trim().to_owned()
        };
        Self {
            code: "unknown".to_owned(),
            message,
            trace_id: None,
            details: None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)?;
        if let Some(code) = self.detail_code() {
            write!(f, " ({code})")?;
        }
        if let Some(trace_id) = &self.trace_id {
            write!(f, " [trace {trace_id}]")?;
        }
        Ok(())
    }
}

/// Errors raised while reading or writing the session file.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file at '{path}': {message}")]
    Io { path: Utf8PathBuf, message: String },
    #[error("failed to encode session: {message}")]
    Encode { message: String },
    #[error("session path '{path}' must name a file")]
    InvalidPath { path: Utf8PathBuf },
}

/// Everything an [`ApiClient`](crate::ApiClient) call can fail with.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credentials were rejected or the session expired.
    #[error("unauthorised: {0}")]
    Unauthorized(ApiError),
    #[error("invalid request: {0}")]
    InvalidRequest(ApiError),
    #[error("not found: {0}")]
    NotFound(ApiError),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(ApiError),
    /// 500 or an unrecognised status.
    #[error("server error: {0}")]
    Server(ApiError),
    #[error("log in first")]
    NotLoggedIn,
    #[error("select a workspace first")]
    NoWorkspaceSelected,
    #[error("request failed: {message}")]
    Transport { message: String },
    #[error("unexpected response body: {message}")]
    Decode { message: String },
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    /// Map an error response onto the taxonomy.
    pub(crate) fn from_response(status: u16, error: ApiError) -> Self {
        match (status, error.code.as_str()) {
            (401, _) | (_, "unauthorized") => Self::Unauthorized(error),
            (400, _) | (_, "invalid_request") => Self::InvalidRequest(error),
            (404, _) | (_, "not_found") => Self::NotFound(error),
            (503, _) | (_, "service_unavailable") => Self::ServiceUnavailable(error),
            _ => Self::Server(error),
        }
    }

    /// Error body returned by the server, if this error came from one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Unauthorized(e)
            | Self::InvalidRequest(e)
            | Self::NotFound(e)
            | Self::ServiceUnavailable(e)
            | Self::Server(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}
