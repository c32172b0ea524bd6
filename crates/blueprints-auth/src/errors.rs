use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("invalid key material: {0}")]
    Key(String),
    #[error("unsupported token algorithm: {0:?}")]
    UnsupportedAlgorithm(jsonwebtoken::Algorithm),
    #[error("token ttl of {0}s is out of range")]
    TtlOutOfRange(u64),
}

pub type AuthResult<T> = Result<T, AuthError>;
