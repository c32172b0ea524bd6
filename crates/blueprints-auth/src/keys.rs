//! RSA key material for RS256 access tokens.
//!
//! # Purpose
//! Load (or generate) the issuer's RSA key pair once at startup and expose the
//! `jsonwebtoken` encoding/decoding keys plus the public JWKS form.
//!
//! # Key invariants
//! - The public key must be the public half of the private key; mismatched
//!   pairs are rejected at construction.
//! - Private key material is never serialized or logged; `Debug` prints only
//!   the `kid`.
use crate::{AuthError, AuthResult, Jwk, Jwks, KeyUse};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rand::RngCore;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, LineEnding};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::path::Path;

#[derive(Clone)]
pub struct KeyMaterial {
    kid: String,
    public_key: RsaPublicKey,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("kid", &self.kid)
            .finish_non_exhaustive()
    }
}

impl KeyMaterial {
    /// Build key material from PEM-encoded RSA keys.
    ///
    /// Accepts PKCS#1 (`RSA PRIVATE KEY` / `RSA PUBLIC KEY`) and PKCS#8/SPKI
    /// (`PRIVATE KEY` / `PUBLIC KEY`) encodings.
    ///
    /// # Errors
    /// - `AuthError::Key` when either PEM cannot be parsed or the halves do
    ///   not belong to the same key pair.
    pub fn from_pem(
        kid: impl Into<String>,
        private_key_pem: &str,
        public_key_pem: &str,
    ) -> AuthResult<Self> {
        let private_key = RsaPrivateKey::from_pkcs1_pem(private_key_pem)
            .or_else(|_| RsaPrivateKey::from_pkcs8_pem(private_key_pem))
            .map_err(|err| AuthError::Key(format!("parse RSA private key: {err}")))?;
        let public_key = RsaPublicKey::from_pkcs1_pem(public_key_pem)
            .or_else(|_| RsaPublicKey::from_public_key_pem(public_key_pem))
            .map_err(|err| AuthError::Key(format!("parse RSA public key: {err}")))?;
        if RsaPublicKey::from(&private_key) != public_key {
            return Err(AuthError::Key(
                "RSA public key does not match private key".to_string(),
            ));
        }
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?;
        Ok(Self {
            kid: kid.into(),
            public_key,
            encoding_key,
            decoding_key,
        })
    }

    /// Read both PEM files from disk and build key material.
    pub fn from_pem_files(
        kid: impl Into<String>,
        private_key_path: &Path,
        public_key_path: &Path,
    ) -> AuthResult<Self> {
        let private_pem = std::fs::read_to_string(private_key_path).map_err(|err| {
            AuthError::Key(format!("read {}: {err}", private_key_path.display()))
        })?;
        let public_pem = std::fs::read_to_string(public_key_path).map_err(|err| {
            AuthError::Key(format!("read {}: {err}", public_key_path.display()))
        })?;
        Self::from_pem(kid, &private_pem, &public_pem)
    }

    /// Generate a fresh RSA key pair with a random `kid`.
    ///
    /// Tokens signed with generated keys stop verifying once the process
    /// restarts; intended for local development.
    pub fn generate(bits: usize) -> AuthResult<Self> {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|err| AuthError::Key(format!("generate RSA key: {err}")))?;
        let public_key = RsaPublicKey::from(&private_key);
        let private_der = private_key
            .to_pkcs1_der()
            .map_err(|err| AuthError::Key(format!("encode RSA private key: {err}")))?;
        let public_pem = rsa::pkcs1::EncodeRsaPublicKey::to_pkcs1_pem(&public_key, LineEnding::LF)
            .map_err(|err| AuthError::Key(format!("encode RSA public key: {err}")))?;

        let mut kid_bytes = [0u8; 12];
        rng.fill_bytes(&mut kid_bytes);

        Ok(Self {
            kid: URL_SAFE_NO_PAD.encode(kid_bytes),
            public_key,
            encoding_key: EncodingKey::from_rsa_der(private_der.as_bytes()),
            decoding_key: DecodingKey::from_rsa_pem(public_pem.as_bytes())?,
        })
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Public key as a single-entry JWKS document.
    pub fn jwks(&self) -> Jwks {
        Jwks {
            keys: vec![Jwk {
                kty: "RSA".to_string(),
                kid: self.kid.clone(),
                alg: "RS256".to_string(),
                use_field: KeyUse::Sig,
                n: URL_SAFE_NO_PAD.encode(self.public_key.n().to_bytes_be()),
                e: URL_SAFE_NO_PAD.encode(self.public_key.e().to_bytes_be()),
            }],
        }
    }
}
