mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use blueprints::app::build_router;
use blueprints::filter::IdentityFilter;
use blueprints::store::memory::InMemoryStore;
use blueprints_auth::{AccessClaims, Scope};
use common::read_json;
use http_helpers::json_request;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> axum::routing::RouterIntoService<Body, ()> {
    build_router(common::test_state(
        Arc::new(InMemoryStore::new()),
        Arc::new(IdentityFilter),
    ))
    .into_service()
}

#[tokio::test]
async fn login_issues_rs256_token_with_fixed_scopes() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            serde_json::json!({"username": "assistant", "password": "assistant123"}),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], common::TTL_SECS);
    let token = body["access_token"].as_str().expect("token");

    let header = jsonwebtoken::decode_header(token).expect("header");
    assert_eq!(header.alg, Algorithm::RS256);
    assert_eq!(header.kid.as_deref(), Some(common::KID));

    let keys = common::test_keys();
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[common::ISSUER]);
    let claims = jsonwebtoken::decode::<AccessClaims>(token, keys.decoding_key(), &validation)
        .expect("decode")
        .claims;
    assert_eq!(claims.sub, "assistant");
    assert_eq!(claims.exp - claims.iat, common::TTL_SECS as i64);
    assert!(Scope::Read.is_granted_by(&claims.scope));
    assert!(Scope::Write.is_granted_by(&claims.scope));
}

#[tokio::test]
async fn bad_credentials_are_rejected_uniformly() {
    for (username, password) in [("student", "wrong"), ("ghost", "student123")] {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/auth/login",
                serde_json::json!({"username": username, "password": password}),
            ))
            .await
            .expect("login");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            read_json(response).await,
            serde_json::json!({"error": "invalid_credentials"})
        );
    }
}

#[tokio::test]
async fn incomplete_requests_are_bad_requests() {
    for body in [
        serde_json::json!({"username": "student"}),
        serde_json::json!({"password": "student123"}),
        serde_json::json!({"username": "", "password": "student123"}),
        serde_json::json!({"username": "student", "password": ""}),
    ] {
        let response = app()
            .oneshot(json_request("POST", "/auth/login", body.clone()))
            .await
            .expect("login");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert!(read_json(response).await["error"].is_string());
    }

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .expect("request"),
        )
        .await
        .expect("malformed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn jwks_publishes_key_that_verifies_issued_tokens() {
    let app = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/.well-known/jwks.json")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("jwks");
    assert_eq!(response.status(), StatusCode::OK);
    let jwks = read_json(response).await;
    let key = &jwks["keys"][0];
    assert_eq!(key["kty"], "RSA");
    assert_eq!(key["alg"], "RS256");
    assert_eq!(key["use"], "sig");
    assert_eq!(key["kid"], common::KID);
    assert!(key.get("d").is_none());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            serde_json::json!({"username": "student", "password": "student123"}),
        ))
        .await
        .expect("login");
    let token = read_json(response).await["access_token"]
        .as_str()
        .expect("token")
        .to_string();

    let decoding = DecodingKey::from_rsa_components(
        key["n"].as_str().expect("n"),
        key["e"].as_str().expect("e"),
    )
    .expect("components");
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[common::ISSUER]);
    let claims = jsonwebtoken::decode::<AccessClaims>(&token, &decoding, &validation)
        .expect("verify with published key")
        .claims;
    assert_eq!(claims.sub, "student");
}
