//! Typed client for the remote content/auth API.
//!
//! The remote API wraps every payload in `{success, message, data}`. Any
//! transport failure or non-2xx status collapses into [`UpstreamError`];
//! callers decide fallback policy, so 4xx and 5xx are not distinguished.

mod client;

pub use client::ApiClient;

use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::models::{ApiEnvelope, ContentItem, Session};

/// Errors that can occur when calling the remote API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the remote content and auth endpoints.
///
/// Thin typed layer over [`ApiClient`]; each method maps to one remote
/// endpoint and deserializes its envelope.
#[derive(Clone)]
pub struct UpstreamClient {
    api: ApiClient,
}

impl UpstreamClient {
    /// Create a new client for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base: &Url) -> Result<Self, UpstreamError> {
        Ok(Self {
            api: ApiClient::new(base)?,
        })
    }

    /// Fetch the full content collection.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a
    /// malformed envelope.
    #[instrument(skip(self))]
    pub async fn list_content(&self) -> Result<ApiEnvelope<Vec<ContentItem>>, UpstreamError> {
        // "magzines" is the remote API's spelling.
        let value = self.api.get("/user/magzines").await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch a single content item by id.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a
    /// malformed envelope.
    #[instrument(skip(self))]
    pub async fn content_by_id(&self, id: &str) -> Result<ApiEnvelope<ContentItem>, UpstreamError> {
        let value = self.api.get(&format!("/user/magzines/{id}")).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Log a user in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a
    /// malformed envelope.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ApiEnvelope<Session>, UpstreamError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let value = self.api.post("/user/login", &body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a
    /// malformed envelope.
    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<ApiEnvelope<Session>, UpstreamError> {
        let body = serde_json::json!({ "name": name, "email": email, "password": password });
        let value = self.api.post("/user/signup", &body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Reset a password using a one-time code.
    ///
    /// The response carries no typed payload, so the envelope data is left
    /// as raw JSON.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a
    /// malformed envelope.
    #[instrument(skip(self, new_password))]
    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<ApiEnvelope<serde_json::Value>, UpstreamError> {
        let body = serde_json::json!({
            "email": email,
            "otp": otp,
            "newPassword": new_password,
        });
        let value = self.api.post("/user/reset-password-with-otp", &body).await?;
        Ok(serde_json::from_value(value)?)
    }
}
