//! Authentication service.
//!
//! Wraps the upstream auth endpoints with validation, fallback policy,
//! and dual-scope session persistence. Every operation resolves to an
//! [`AuthOutcome`] rather than an error: upstream failures are folded
//! into the outcome by [`FallbackPolicy`], so callers branch on
//! `success` instead of matching error variants.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use newsstand_core::Email;

use crate::fallback::{AuthOp, FallbackPolicy};
use crate::models::{ApiEnvelope, Session, UserProfile};
use crate::session::SessionStore;
use crate::upstream::UpstreamClient;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Tokens at or below this length fail local validation.
const MIN_TOKEN_LENGTH: usize = 10;

/// Result of an authentication operation.
///
/// Mirrors the upstream envelope: `message` is always user-presentable,
/// and `session` is populated only on success.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
    pub session: Option<Session>,
}

impl AuthOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            session: None,
        }
    }
}

/// Authentication service.
///
/// Handles login, signup, password reset, and the local session
/// lifecycle. Successful sessions are written to both scopes of the
/// [`SessionStore`]; a persistence failure is logged but does not fail
/// the operation, since the caller already holds the session.
#[derive(Clone)]
pub struct AuthService {
    upstream: UpstreamClient,
    store: SessionStore,
    policy: FallbackPolicy,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(upstream: UpstreamClient, store: SessionStore, policy: FallbackPolicy) -> Self {
        Self {
            upstream,
            store,
            policy,
        }
    }

    // =========================================================================
    // Credential Operations
    // =========================================================================

    /// Log in with email and password.
    ///
    /// Validation failures short-circuit without a network call. An
    /// unreachable upstream resolves through the fallback policy, which
    /// fabricates a session only in demo mode.
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let email = match Email::parse(email) {
            Ok(email) => email,
            Err(err) => return AuthOutcome::failure(err.to_string()),
        };
        if password.is_empty() {
            return AuthOutcome::failure("Password is required");
        }

        let result = self.upstream.login(email.as_str(), password).await;
        let envelope = self.policy.resolve_session(AuthOp::Login, &email, None, result);
        self.finish_session(envelope)
    }

    /// Create an account with name, email, and password.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> AuthOutcome {
        let name = name.trim();
        if name.is_empty() {
            return AuthOutcome::failure("Name is required");
        }
        let email = match Email::parse(email) {
            Ok(email) => email,
            Err(err) => return AuthOutcome::failure(err.to_string()),
        };
        if password.len() < MIN_PASSWORD_LENGTH {
            return AuthOutcome::failure(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
        }

        let result = self
            .upstream
            .signup(name, email.as_str(), password)
            .await;
        let envelope = self
            .policy
            .resolve_session(AuthOp::Signup, &email, Some(name), result);
        self.finish_session(envelope)
    }

    /// Reset a password with a one-time code.
    ///
    /// Never fabricates success: an unreachable upstream yields a
    /// failure outcome even in demo mode.
    pub async fn reset_password(&self, email: &str, otp: &str, new_password: &str) -> AuthOutcome {
        let email = match Email::parse(email) {
            Ok(email) => email,
            Err(err) => return AuthOutcome::failure(err.to_string()),
        };
        if otp.trim().is_empty() {
            return AuthOutcome::failure("Reset code is required");
        }
        if new_password.len() < MIN_PASSWORD_LENGTH {
            return AuthOutcome::failure(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
        }

        let result = self
            .upstream
            .reset_password(email.as_str(), otp, new_password)
            .await;
        let envelope = self.policy.resolve_reset(result);
        AuthOutcome {
            success: envelope.success,
            message: envelope.message,
            session: None,
        }
    }

    /// Persist the session if the envelope carries one, then fold the
    /// envelope into an outcome.
    fn finish_session(&self, envelope: ApiEnvelope<Session>) -> AuthOutcome {
        if envelope.success {
            if let Some(session) = &envelope.data {
                if let Err(err) = self.store.store_session(session) {
                    tracing::error!(error = %err, "Failed to persist session");
                }
            }
        }
        AuthOutcome {
            success: envelope.success,
            message: envelope.message,
            session: envelope.data,
        }
    }

    // =========================================================================
    // Session Lifecycle
    // =========================================================================

    /// Clear the stored session from both scopes.
    pub fn logout(&self) {
        self.store.clear_all();
    }

    /// Whether a token is currently stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.token().is_some()
    }

    /// The stored user profile, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        self.store.user()
    }

    /// Local token plausibility check.
    ///
    /// This is a length check on the stored token, not a verification
    /// against the upstream. It filters out empty and truncated values;
    /// the upstream remains the authority on token validity.
    #[must_use]
    pub fn validate_token(&self) -> bool {
        self.store
            .token()
            .is_some_and(|token| token.len() > MIN_TOKEN_LENGTH)
    }

    /// Headers for authenticated upstream requests.
    ///
    /// Always carries the JSON content headers; the `Authorization`
    /// bearer header is present only when a token is stored and forms a
    /// valid header value.
    #[must_use]
    pub fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = self.store.token() {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    /// The backing session store.
    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;

    /// Nothing listens on this port, so every request fails at the
    /// transport layer and exercises the fallback path.
    fn unreachable_service(demo_mode: bool) -> AuthService {
        let base: Url = "http://127.0.0.1:1/api".parse().unwrap();
        let upstream = UpstreamClient::new(&base).unwrap();
        AuthService::new(
            upstream,
            SessionStore::in_memory(),
            FallbackPolicy::new(demo_mode),
        )
    }

    #[tokio::test]
    async fn test_login_demo_mode_fabricates_session() {
        let service = unreachable_service(true);
        let outcome = service.login("pat@example.com", "hunter22").await;

        assert!(outcome.success);
        assert_eq!(outcome.message, "Login successful (demo mode)");
        let session = outcome.session.unwrap();
        assert!(session.token.starts_with("demo-"));
        assert_eq!(session.user.email, "pat@example.com");

        assert!(service.is_authenticated());
        assert!(service.validate_token());
        assert_eq!(service.current_user().unwrap().email, "pat@example.com");
    }

    #[tokio::test]
    async fn test_login_without_demo_mode_fails() {
        let service = unreachable_service(false);
        let outcome = service.login("pat@example.com", "hunter22").await;

        assert!(!outcome.success);
        assert!(outcome.session.is_none());
        assert!(!service.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_invalid_email_short_circuits() {
        let service = unreachable_service(true);
        let outcome = service.login("not-an-email", "hunter22").await;

        assert!(!outcome.success);
        assert!(outcome.session.is_none());
    }

    #[tokio::test]
    async fn test_login_empty_password_short_circuits() {
        let service = unreachable_service(true);
        let outcome = service.login("pat@example.com", "").await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Password is required");
    }

    #[tokio::test]
    async fn test_signup_demo_mode_uses_provided_name() {
        let service = unreachable_service(true);
        let outcome = service
            .signup("Pat Reader", "pat@example.com", "hunter22")
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.message, "Signup successful (demo mode)");
        assert_eq!(outcome.session.unwrap().user.name, "Pat Reader");
    }

    #[tokio::test]
    async fn test_signup_short_password_rejected() {
        let service = unreachable_service(true);
        let outcome = service.signup("Pat", "pat@example.com", "abc").await;

        assert!(!outcome.success);
        assert!(outcome.message.contains("at least 6 characters"));
    }

    #[tokio::test]
    async fn test_reset_password_never_fabricates() {
        let service = unreachable_service(true);
        let outcome = service
            .reset_password("pat@example.com", "123456", "new-password")
            .await;

        assert!(!outcome.success);
        assert!(outcome.session.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let service = unreachable_service(true);
        service.login("pat@example.com", "hunter22").await;
        assert!(service.is_authenticated());

        service.logout();

        assert!(!service.is_authenticated());
        assert!(service.current_user().is_none());
        assert!(!service.validate_token());
    }

    #[tokio::test]
    async fn test_auth_headers_without_token() {
        let service = unreachable_service(false);
        let headers = service.auth_headers();

        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_auth_headers_with_token() {
        let service = unreachable_service(true);
        service.login("pat@example.com", "hunter22").await;

        let headers = service.auth_headers();
        let auth = headers.get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert!(auth.starts_with("Bearer demo-"));
    }
}
