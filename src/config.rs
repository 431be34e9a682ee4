//! Proxy configuration parsed from environment variables.

use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_API_BASE: &str = "https://api.line.me/v2/bot";
pub const DEFAULT_DATA_BASE: &str = "https://api-data.line.me/v2/bot";
pub const DEFAULT_ALLOWED_ORIGINS: &str = "https://toru-takahashi.github.io,http://localhost:5173";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Which upstream base a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamHost {
    /// JSON API.
    Api,
    /// Binary content API (menu images).
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub port: u16,
    pub api_base: String,
    pub data_base: String,
    /// CORS allow-list. Never empty; the first entry is the fallback origin.
    pub allowed_origins: Vec<String>,
    pub timeouts: UpstreamTimeouts,
}

impl ProxyConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 8787
    /// - `RICHMENU_API_BASE`: JSON API base URL
    /// - `RICHMENU_API_DATA_BASE`: binary content API base URL
    /// - `RICHMENU_ALLOWED_ORIGINS`: comma-separated CORS allow-list
    /// - `RICHMENU_REQUEST_TIMEOUT_SECS`: default 30
    /// - `RICHMENU_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = |key: &str, default: &str| {
            lookup(key).unwrap_or_else(|| default.to_owned()).trim_end_matches('/').to_owned()
        };
        let origins = lookup("RICHMENU_ALLOWED_ORIGINS").map(|raw| parse_origins(&raw)).unwrap_or_default();

        Self {
            port: parse_or(lookup("PORT"), DEFAULT_PORT),
            api_base: base("RICHMENU_API_BASE", DEFAULT_API_BASE),
            data_base: base("RICHMENU_API_DATA_BASE", DEFAULT_DATA_BASE),
            allowed_origins: if origins.is_empty() { parse_origins(DEFAULT_ALLOWED_ORIGINS) } else { origins },
            timeouts: UpstreamTimeouts {
                request_secs: parse_or(lookup("RICHMENU_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
                connect_secs: parse_or(lookup("RICHMENU_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
            },
        }
    }

    /// Full upstream URL for `path` (which starts with `/`).
    #[must_use]
    pub fn upstream_url(&self, host: UpstreamHost, path: &str) -> String {
        let base = match host {
            UpstreamHost::Api => &self.api_base,
            UpstreamHost::Data => &self.data_base,
        };
        format!("{base}{path}")
    }
}

/// Split a comma-separated origin list, dropping blanks.
#[must_use]
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|o| !o.is_empty()).map(str::to_owned).collect()
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
