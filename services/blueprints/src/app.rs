//! Blueprints HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and testable.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::auth;
use crate::auth::login::CredentialIssuer;
use crate::service::BlueprintService;
use axum::Router;
use blueprints_auth::{KeyMaterial, TokenVerifier};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub service: BlueprintService,
    pub credentials: Arc<CredentialIssuer>,
    pub verifier: Arc<TokenVerifier>,
    pub keys: Arc<KeyMaterial>,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    Router::new()
        .route("/health", axum::routing::get(api::system::health))
        .route("/auth/login", axum::routing::post(auth::login::login))
        .route("/.well-known/jwks.json", axum::routing::get(auth::jwks::jwks))
        .route(
            "/api/blueprints",
            axum::routing::get(api::blueprints::list_blueprints)
                .post(api::blueprints::create_blueprint),
        )
        .route(
            "/api/blueprints/:author",
            axum::routing::get(api::blueprints::list_by_author),
        )
        .route(
            "/api/blueprints/:author/:name",
            axum::routing::get(api::blueprints::get_blueprint),
        )
        .route(
            "/api/blueprints/:author/:name/points",
            axum::routing::put(api::blueprints::add_point),
        )
        .merge(utoipa_swagger_ui::SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(trace_layer)
        .with_state(state)
}
