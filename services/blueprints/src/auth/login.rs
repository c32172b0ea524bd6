//! Username/password login that mints RS256 access tokens.
//!
//! # Purpose
//! `POST /auth/login` checks credentials against the [`UserDirectory`] and,
//! on success, returns a bearer token carrying the fixed blueprint scopes.
//!
//! # Security notes
//! - Unknown users and wrong passwords produce the same response.
//! - Passwords are never logged.
use crate::api::error::{ApiError, api_internal_message, api_validation_error};
use crate::app::AppState;
use crate::auth::users::UserDirectory;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use blueprints_auth::{AuthError, IssuedToken, TokenIssuer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("failed to sign token: {0}")]
    Token(#[from] AuthError),
}

/// Pairs the user directory with the token issuer.
pub struct CredentialIssuer {
    users: UserDirectory,
    tokens: TokenIssuer,
}

impl CredentialIssuer {
    pub fn new(users: UserDirectory, tokens: TokenIssuer) -> Self {
        Self { users, tokens }
    }

    /// Blocking: runs a bcrypt verification.
    pub fn login(&self, username: &str, password: &str) -> Result<IssuedToken, LoginError> {
        if !self.users.verify(username, password) {
            return Err(LoginError::InvalidCredentials);
        }
        Ok(self.tokens.mint(username)?)
    }
}

#[derive(Debug, Deserialize, ToSchema, Clone, Default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

impl From<IssuedToken> for TokenResponse {
    fn from(token: IssuedToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
        }
    }
}

/// Body returned for rejected credentials.
#[derive(Debug, Serialize, ToSchema)]
pub struct InvalidCredentials {
    #[schema(example = "invalid_credentials")]
    pub error: String,
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing username or password", body = crate::api::types::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = InvalidCredentials)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<axum::response::Response, ApiError> {
    let Json(request) = body.map_err(|rejection| api_validation_error(&rejection.body_text()))?;
    let username = required_field(request.username, "username")?;
    let password = required_field(request.password, "password")?;

    let credentials = Arc::clone(&state.credentials);
    let subject = username.clone();
    let outcome = tokio::task::spawn_blocking(move || credentials.login(&subject, &password))
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "login task failed");
            api_internal_message("login failed")
        })?;

    match outcome {
        Ok(token) => {
            metrics::counter!("blueprints_logins_total", "outcome" => "success").increment(1);
            tracing::info!(%username, "token issued");
            Ok(Json(TokenResponse::from(token)).into_response())
        }
        Err(LoginError::InvalidCredentials) => {
            metrics::counter!("blueprints_logins_total", "outcome" => "invalid").increment(1);
            tracing::info!(%username, "login rejected");
            Ok((
                StatusCode::UNAUTHORIZED,
                Json(InvalidCredentials {
                    error: "invalid_credentials".to_string(),
                }),
            )
                .into_response())
        }
        Err(err @ LoginError::Token(_)) => {
            metrics::counter!("blueprints_logins_total", "outcome" => "error").increment(1);
            tracing::error!(error = %err, "token signing failed");
            Err(api_internal_message("failed to issue token"))
        }
    }
}

fn required_field(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(api_validation_error(&format!("{field} is required"))),
    }
}
