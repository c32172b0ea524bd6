#![allow(dead_code)]

use blueprints::app::AppState;
use blueprints::auth::login::CredentialIssuer;
use blueprints::auth::users::UserDirectory;
use blueprints::filter::BlueprintFilter;
use blueprints::service::BlueprintService;
use blueprints::store::BlueprintStore;
use blueprints_auth::{AccessClaims, KeyMaterial, TokenIssuer, TokenVerifier};
use jsonwebtoken::{Algorithm, Header};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const ISSUER: &str = "blueprints-test";
pub const KID: &str = "test-kid";
pub const TTL_SECS: u64 = 3600;

const PRIVATE_PEM: &str =
    include_str!("../../../../crates/blueprints-auth/testdata/rsa_private.pem");
const PUBLIC_PEM: &str = include_str!("../../../../crates/blueprints-auth/testdata/rsa_public.pem");

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

pub fn test_keys() -> Arc<KeyMaterial> {
    Arc::new(KeyMaterial::from_pem(KID, PRIVATE_PEM, PUBLIC_PEM).expect("test keys"))
}

pub fn test_state(
    store: Arc<dyn BlueprintStore>,
    filter: Arc<dyn BlueprintFilter>,
) -> AppState {
    let keys = test_keys();
    let users = UserDirectory::from_plaintext(
        &[("student", "student123"), ("assistant", "assistant123")],
        4,
    )
    .expect("users");
    let tokens = TokenIssuer::new(ISSUER, Duration::from_secs(TTL_SECS), keys.clone());
    AppState {
        service: BlueprintService::new(store, filter),
        credentials: Arc::new(CredentialIssuer::new(users, tokens)),
        verifier: Arc::new(TokenVerifier::new(ISSUER, 0, keys.clone())),
        keys,
    }
}

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_secs() as i64
}

/// Sign arbitrary claims with the test key.
pub fn sign_claims(claims: &AccessClaims) -> String {
    let keys = test_keys();
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(KID.to_string());
    jsonwebtoken::encode(&header, claims, keys.encoding_key()).expect("sign")
}

pub fn token_with_scope(scope: &str) -> String {
    let iat = now();
    sign_claims(&AccessClaims {
        iss: ISSUER.to_string(),
        sub: "student".to_string(),
        iat,
        exp: iat + 600,
        scope: scope.to_string(),
    })
}
