//! Shared application state.
//!
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! proxy keeps nothing per request: just config and the pooled HTTP client.

use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::upstream::Upstream;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub upstream: Upstream,
}

impl AppState {
    #[must_use]
    pub fn new(config: ProxyConfig, upstream: Upstream) -> Self {
        Self { config: Arc::new(config), upstream }
    }
}
