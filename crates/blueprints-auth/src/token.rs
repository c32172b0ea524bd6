//! RS256 access-token minting and verification.
//!
//! # Purpose
//! Define the access-token claim set and the issuer/verifier pair used by the
//! login endpoint and the resource routes.
//!
//! # Key invariants
//! - `exp - iat` always equals the issuer TTL.
//! - `scope` is always [`DEFAULT_SCOPE`].
//! - Verification pins the algorithm to RS256 and checks `iss` and `exp`.
use crate::{AuthError, AuthResult, DEFAULT_SCOPE, KeyMaterial};
use jsonwebtoken::{Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// TTL applied when none is configured.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Longest TTL accepted by configuration (one year).
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Claims carried by blueprint access tokens.
///
/// # Examples
/// ```rust
/// use blueprints_auth::AccessClaims;
///
/// let claims = AccessClaims {
///     iss: "blueprints-api".to_string(),
///     sub: "student".to_string(),
///     iat: 1_700_000_000,
///     exp: 1_700_003_600,
///     scope: "blueprints.read blueprints.write".to_string(),
/// };
/// assert_eq!(claims.exp - claims.iat, 3600);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub scope: String,
}

/// A freshly minted token together with the metadata returned to the caller.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

pub struct TokenIssuer {
    issuer: String,
    ttl: Duration,
    keys: Arc<KeyMaterial>,
}

impl TokenIssuer {
    pub fn new(issuer: impl Into<String>, ttl: Duration, keys: Arc<KeyMaterial>) -> Self {
        Self {
            issuer: issuer.into(),
            ttl,
            keys,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `subject` with the fixed blueprint scopes.
    ///
    /// # Errors
    /// - `AuthError::TtlOutOfRange` if `iat + ttl` does not fit the `exp` claim.
    /// - `AuthError::Jwt` if signing fails.
    pub fn mint(&self, subject: &str) -> AuthResult<IssuedToken> {
        let iat = now_epoch_seconds();
        let ttl_secs = self.ttl.as_secs();
        let exp = i64::try_from(ttl_secs)
            .ok()
            .and_then(|ttl| iat.checked_add(ttl))
            .ok_or(AuthError::TtlOutOfRange(ttl_secs))?;
        let claims = AccessClaims {
            iss: self.issuer.clone(),
            sub: subject.to_string(),
            iat,
            exp,
            scope: DEFAULT_SCOPE.to_string(),
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.keys.kid().to_string());
        let access_token = jsonwebtoken::encode(&header, &claims, self.keys.encoding_key())?;
        Ok(IssuedToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.ttl.as_secs(),
        })
    }
}

pub struct TokenVerifier {
    issuer: String,
    leeway: u64,
    keys: Arc<KeyMaterial>,
}

impl TokenVerifier {
    pub fn new(issuer: impl Into<String>, leeway: u64, keys: Arc<KeyMaterial>) -> Self {
        Self {
            issuer: issuer.into(),
            leeway,
            keys,
        }
    }

    /// Verify signature, algorithm, issuer and expiry, returning the claims.
    ///
    /// # Errors
    /// - `AuthError::UnsupportedAlgorithm` if the header is not RS256.
    /// - `AuthError::Jwt` for malformed, expired, mis-issued or forged tokens.
    pub fn verify(&self, token: &str) -> AuthResult<AccessClaims> {
        let header = jsonwebtoken::decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_aud = false;
        validation.leeway = self.leeway;
        let data =
            jsonwebtoken::decode::<AccessClaims>(token, self.keys.decoding_key(), &validation)?;
        Ok(data.claims)
    }
}

fn now_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs() as i64
}
