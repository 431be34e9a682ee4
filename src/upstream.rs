//! Messaging API client.
//!
//! Thin HTTP wrapper: forwards the caller's channel token and hands back
//! status, content type, and raw body for the route to shape.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::Method;
use axum::http::header::CONTENT_TYPE;

use crate::config::ProxyConfig;
use crate::error::ProxyError;

/// Request body forwarded upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Empty,
    /// Already-validated JSON.
    Json(Bytes),
    /// Binary upload with its content type.
    Raw { content_type: String, body: Bytes },
}

/// What came back from upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl UpstreamReply {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Clone)]
pub struct Upstream {
    http: reqwest::Client,
}

impl Upstream {
    /// Build the shared client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::HttpClientBuild`] if the TLS backend fails to initialize.
    pub fn new(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ProxyError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }

    /// Send one request with `token` as the bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Upstream`] on connect, timeout, or body-read failure.
    /// Non-2xx statuses are not errors here.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        token: &str,
        outgoing: Outgoing,
    ) -> Result<UpstreamReply, ProxyError> {
        let request = self.http.request(method, url).bearer_auth(token);
        let request = match outgoing {
            Outgoing::Empty => request,
            Outgoing::Json(body) => request.header(CONTENT_TYPE, "application/json").body(body),
            Outgoing::Raw { content_type, body } => request.header(CONTENT_TYPE, content_type).body(body),
        };

        let response = request.send().await.map_err(|e| ProxyError::Upstream(e.to_string()))?;
        let status = response.status().as_u16();
        let content_type =
            response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()).map(str::to_owned);
        let body = response.bytes().await.map_err(|e| ProxyError::Upstream(e.to_string()))?;

        Ok(UpstreamReply { status, content_type, body })
    }
}
