//! Auth proxy endpoints.
//!
//! Validation failures are the only HTTP errors (400). Upstream
//! verdicts and transport failures come back as 200 envelope bodies,
//! with the fallback policy deciding whether a failure may become a
//! demo session.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;

use newsstand_core::Email;

use crate::error::{AppError, set_sentry_user};
use crate::fallback::AuthOp;
use crate::models::{ApiEnvelope, Session};
use crate::services::auth::MIN_PASSWORD_LENGTH;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Password-reset request body. Field names match the upstream wire.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default, rename = "newPassword")]
    pub new_password: String,
}

/// `POST /api/auth/login`.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<Json<ApiEnvelope<Session>>, AppError> {
    let Json(payload) = payload?;

    let email = parse_email(&payload.email)?;
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }

    let result = state
        .upstream()
        .login(email.as_str(), &payload.password)
        .await;
    let envelope = state
        .policy()
        .resolve_session(AuthOp::Login, &email, None, result);

    tag_sentry_user(&envelope);
    Ok(Json(envelope))
}

/// `POST /api/auth/signup`.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupPayload>, JsonRejection>,
) -> Result<Json<ApiEnvelope<Session>>, AppError> {
    let Json(payload) = payload?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    let email = parse_email(&payload.email)?;
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let result = state
        .upstream()
        .signup(name, email.as_str(), &payload.password)
        .await;
    let envelope = state
        .policy()
        .resolve_session(AuthOp::Signup, &email, Some(name), result);

    tag_sentry_user(&envelope);
    Ok(Json(envelope))
}

/// `POST /api/auth/reset-password`.
///
/// Forwarded without fallback: an unreachable upstream yields a failure
/// envelope, never a fabricated success.
pub async fn reset_password(
    State(state): State<AppState>,
    payload: Result<Json<ResetPasswordPayload>, JsonRejection>,
) -> Result<Json<ApiEnvelope<serde_json::Value>>, AppError> {
    let Json(payload) = payload?;

    let email = parse_email(&payload.email)?;
    if payload.otp.trim().is_empty() {
        return Err(AppError::BadRequest("Reset code is required".to_string()));
    }
    if payload.new_password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let result = state
        .upstream()
        .reset_password(email.as_str(), &payload.otp, &payload.new_password)
        .await;
    Ok(Json(state.policy().resolve_reset(result)))
}

fn parse_email(raw: &str) -> Result<Email, AppError> {
    Email::parse(raw).map_err(|err| AppError::BadRequest(err.to_string()))
}

/// Associate subsequent Sentry events with the authenticated user.
fn tag_sentry_user(envelope: &ApiEnvelope<Session>) {
    if envelope.success {
        if let Some(session) = &envelope.data {
            set_sentry_user(&session.user.id, Some(&session.user.email));
        }
    }
}
