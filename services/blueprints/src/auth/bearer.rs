//! Bearer token checks for the blueprint routes.
use crate::api::error::{ApiError, api_forbidden, api_unauthorized};
use crate::app::AppState;
use axum::http::HeaderMap;
use blueprints_auth::{AccessClaims, AuthError, Scope};

pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?;
    let value = value.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify the bearer token and require `scope` in its `scope` claim.
///
/// Missing or invalid tokens yield 401; a valid token lacking the scope
/// yields 403.
pub fn require_scope(
    state: &AppState,
    headers: &HeaderMap,
    scope: Scope,
) -> Result<AccessClaims, ApiError> {
    let token = extract_bearer(headers).ok_or_else(|| api_unauthorized("missing bearer token"))?;
    let claims = state.verifier.verify(token).map_err(|err| {
        tracing::debug!(error = %err, "bearer token rejected");
        match err {
            AuthError::Jwt(ref inner)
                if matches!(
                    inner.kind(),
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature
                ) =>
            {
                api_unauthorized("token expired")
            }
            _ => api_unauthorized("invalid token"),
        }
    })?;
    if !scope.is_granted_by(&claims.scope) {
        return Err(api_forbidden(&format!("missing scope {scope}")));
    }
    Ok(claims)
}
