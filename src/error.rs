//! Proxy error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// No usable `Authorization: Bearer` header.
    #[error("Missing or invalid Authorization header")]
    Unauthorized,

    /// No proxied route matches the method and path.
    #[error("Not found")]
    NotFound,

    /// A JSON route received a body that is not JSON.
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    /// The upstream call failed before a status came back.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProxyError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::HttpClientBuild(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body sent to the client.
    #[must_use]
    pub fn body(&self) -> Value {
        match self {
            Self::Unauthorized | Self::NotFound => json!({ "error": self.to_string() }),
            Self::InvalidJson(e) => json!({ "error": "Invalid JSON body", "message": e }),
            Self::Upstream(_) | Self::HttpClientBuild(_) | Self::Io(_) => {
                json!({ "error": "Internal server error", "message": self.to_string() })
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
