//! OpenAPI schema aggregation for the blueprints API.
use crate::api::{
    blueprints, system,
    types::{ErrorResponse, HealthStatus, NewBlueprintRequest},
};
use crate::auth::jwks;
use crate::auth::login::{self, InvalidCredentials, LoginRequest, TokenResponse};
use crate::model::{Blueprint, Point};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "blueprints",
        version = "v1",
        description = "Blueprint CRUD API with RS256 bearer authentication"
    ),
    paths(
        system::health,
        login::login,
        jwks::jwks,
        blueprints::list_blueprints,
        blueprints::list_by_author,
        blueprints::get_blueprint,
        blueprints::create_blueprint,
        blueprints::add_point
    ),
    components(schemas(
        Blueprint,
        Point,
        NewBlueprintRequest,
        LoginRequest,
        TokenResponse,
        InvalidCredentials,
        HealthStatus,
        ErrorResponse
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "auth", description = "Token issuance"),
        (name = "blueprints", description = "Blueprint resources"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route_and_bearer_scheme() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serialize");
        let paths = doc["paths"].as_object().expect("paths");
        for path in [
            "/health",
            "/auth/login",
            "/.well-known/jwks.json",
            "/api/blueprints",
            "/api/blueprints/{author}",
            "/api/blueprints/{author}/{name}",
            "/api/blueprints/{author}/{name}/points",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
    }
}
