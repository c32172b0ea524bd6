//! Publishes the token verification key as a JWKS document.
//!
//! Only the RSA public components (`n`, `e`) leave the process.
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use blueprints_auth::Jwks;

#[utoipa::path(
    get,
    path = "/.well-known/jwks.json",
    tag = "auth",
    responses(
        (status = 200, description = "RSA public key used to verify access tokens")
    )
)]
pub async fn jwks(State(state): State<AppState>) -> Json<Jwks> {
    Json(state.keys.jwks())
}
