//! Blueprint API handlers.
//!
//! # Purpose
//! Implements list, fetch, create and append-point endpoints. Reads require
//! the `blueprints.read` scope and writes require `blueprints.write`.
use crate::api::error::{ApiError, from_store_error, api_validation_error};
use crate::api::types::{ErrorResponse, NewBlueprintRequest};
use crate::app::AppState;
use crate::auth::bearer::require_scope;
use crate::model::{Blueprint, Point};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use blueprints_auth::Scope;

#[utoipa::path(
    get,
    path = "/api/blueprints",
    tag = "blueprints",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All blueprints, sorted by author then name", body = [Blueprint]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token lacks blueprints.read", body = ErrorResponse)
    )
)]
pub(crate) async fn list_blueprints(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Blueprint>>, ApiError> {
    require_scope(&state, &headers, Scope::Read)?;
    let items = state
        .service
        .list_all()
        .await
        .map_err(|err| from_store_error(err, "failed to list blueprints"))?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/blueprints/{author}",
    tag = "blueprints",
    security(("bearer" = [])),
    params(("author" = String, Path, description = "Blueprint author")),
    responses(
        (status = 200, description = "Blueprints owned by the author", body = [Blueprint]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token lacks blueprints.read", body = ErrorResponse),
        (status = 404, description = "Author has no blueprints", body = ErrorResponse)
    )
)]
pub(crate) async fn list_by_author(
    Path(author): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Blueprint>>, ApiError> {
    require_scope(&state, &headers, Scope::Read)?;
    let items = state
        .service
        .list_by_author(&author)
        .await
        .map_err(|err| from_store_error(err, "failed to list blueprints"))?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/blueprints/{author}/{name}",
    tag = "blueprints",
    security(("bearer" = [])),
    params(
        ("author" = String, Path, description = "Blueprint author"),
        ("name" = String, Path, description = "Blueprint name")
    ),
    responses(
        (status = 200, description = "Blueprint after the configured filter", body = Blueprint),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token lacks blueprints.read", body = ErrorResponse),
        (status = 404, description = "Blueprint not found", body = ErrorResponse)
    )
)]
pub(crate) async fn get_blueprint(
    Path((author, name)): Path<(String, String)>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Blueprint>, ApiError> {
    require_scope(&state, &headers, Scope::Read)?;
    let blueprint = state
        .service
        .get(&author, &name)
        .await
        .map_err(|err| from_store_error(err, "failed to fetch blueprint"))?;
    Ok(Json(blueprint))
}

#[utoipa::path(
    post,
    path = "/api/blueprints",
    tag = "blueprints",
    security(("bearer" = [])),
    request_body = NewBlueprintRequest,
    responses(
        (status = 201, description = "Blueprint created"),
        (status = 400, description = "Blank author or name", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing blueprints.write or blueprint already exists", body = ErrorResponse)
    )
)]
pub(crate) async fn create_blueprint(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<NewBlueprintRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    require_scope(&state, &headers, Scope::Write)?;
    let Json(body) = body.map_err(|rejection| api_validation_error(&rejection.body_text()))?;
    if body.author.trim().is_empty() {
        return Err(api_validation_error("author must not be blank"));
    }
    if body.name.trim().is_empty() {
        return Err(api_validation_error("name must not be blank"));
    }
    state
        .service
        .create(Blueprint::new(body.author, body.name, body.points))
        .await
        .map_err(|err| from_store_error(err, "failed to create blueprint"))?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    put,
    path = "/api/blueprints/{author}/{name}/points",
    tag = "blueprints",
    security(("bearer" = [])),
    params(
        ("author" = String, Path, description = "Blueprint author"),
        ("name" = String, Path, description = "Blueprint name")
    ),
    request_body = Point,
    responses(
        (status = 202, description = "Point appended"),
        (status = 400, description = "Malformed point", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token lacks blueprints.write", body = ErrorResponse),
        (status = 404, description = "Blueprint not found", body = ErrorResponse)
    )
)]
pub(crate) async fn add_point(
    Path((author, name)): Path<(String, String)>,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Point>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    require_scope(&state, &headers, Scope::Write)?;
    let Json(point) = body.map_err(|rejection| api_validation_error(&rejection.body_text()))?;
    state
        .service
        .append_point(&author, &name, point)
        .await
        .map_err(|err| from_store_error(err, "failed to append point"))?;
    Ok(StatusCode::ACCEPTED)
}
