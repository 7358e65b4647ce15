//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::fallback::FallbackPolicy;
use crate::upstream::{UpstreamClient, UpstreamError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the upstream client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: GatewayConfig,
    upstream: UpstreamClient,
    policy: FallbackPolicy,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream HTTP client fails to build.
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let upstream = UpstreamClient::new(&config.upstream_url)?;
        let policy = FallbackPolicy::new(config.demo_mode);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                upstream,
                policy,
            }),
        })
    }

    /// Get a reference to the gateway configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Get a reference to the remote API client.
    #[must_use]
    pub fn upstream(&self) -> &UpstreamClient {
        &self.inner.upstream
    }

    /// Get a reference to the fallback policy.
    #[must_use]
    pub fn policy(&self) -> &FallbackPolicy {
        &self.inner.policy
    }
}
