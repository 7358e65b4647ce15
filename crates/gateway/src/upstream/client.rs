//! Low-level HTTP client for the remote API.

use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use super::UpstreamError;

/// HTTP client wrapper with fixed JSON headers.
///
/// Paths are appended to the configured base URL. GET responses must not
/// be cached by intermediaries, so reads send `Cache-Control: no-store`.
/// Timeouts are left to reqwest's defaults.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// Create a new API client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base: &Url) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base: base.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Issue a GET request and return the response body as JSON.
    ///
    /// # Errors
    ///
    /// Any network failure or non-2xx status is returned as
    /// [`UpstreamError`]; callers decide fallback policy.
    pub async fn get(&self, path: &str) -> Result<serde_json::Value, UpstreamError> {
        let url = format!("{}{path}", self.base);

        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        Self::json_body(response).await
    }

    /// Issue a POST request with a JSON body and return the response as JSON.
    ///
    /// # Errors
    ///
    /// Any network failure or non-2xx status is returned as
    /// [`UpstreamError`]; callers decide fallback policy.
    pub async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, UpstreamError> {
        let url = format!("{}{path}", self.base);

        let response = self.client.post(&url).json(body).send().await?;

        Self::json_body(response).await
    }

    /// Check the status and parse the body as JSON.
    async fn json_body(response: reqwest::Response) -> Result<serde_json::Value, UpstreamError> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!(
                status = %status,
                body = %message.chars().take(200).collect::<String>(),
                "Remote API returned non-success status"
            );
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// The base URL paths are appended to.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_trailing_slash_trimmed() {
        let base: Url = "https://api.example.com/api/".parse().unwrap();
        let client = ApiClient::new(&base).unwrap();
        assert_eq!(client.base(), "https://api.example.com/api");
    }

    #[test]
    fn test_base_without_trailing_slash_kept() {
        let base: Url = "https://api.example.com/api".parse().unwrap();
        let client = ApiClient::new(&base).unwrap();
        assert_eq!(client.base(), "https://api.example.com/api");
    }
}
