//! Token primitives shared by the blueprints credential issuer and the
//! resource routes that verify bearer tokens.
//!
//! # Purpose
//! Centralizes the access-token claim set, the fixed blueprint scopes, RSA key
//! material handling, and JWKS publication.
//!
//! # How it fits
//! The login endpoint mints tokens with [`TokenIssuer`]; the resource routes
//! verify them with [`TokenVerifier`] and check [`Scope`] membership. External
//! verifiers fetch the public key through the [`Jwks`] document.
//!
//! # Key invariants
//! - Tokens are always RS256; other algorithms are rejected on verification.
//! - Every issued token carries the same scope string,
//!   `"blueprints.read blueprints.write"`.
//!
//! # Examples
//! ```rust
//! use blueprints_auth::Scope;
//!
//! assert_eq!(Scope::Read.as_str(), "blueprints.read");
//! assert!(Scope::Write.is_granted_by("blueprints.read blueprints.write"));
//! ```

mod errors;
mod jwks;
mod keys;
mod scope;
mod token;

pub use errors::{AuthError, AuthResult};
pub use jwks::{Jwk, Jwks, KeyUse};
pub use keys::KeyMaterial;
pub use scope::{DEFAULT_SCOPE, Scope};
pub use token::{
    AccessClaims, DEFAULT_TOKEN_TTL, IssuedToken, MAX_TOKEN_TTL, TokenIssuer, TokenVerifier,
};
