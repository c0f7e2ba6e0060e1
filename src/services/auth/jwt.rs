//! HMAC key material shared by the credential issuer and verifier.
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::services::auth::identity::Role;

/// Minimum secret length accepted for HS256 (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Signing secret loaded from configuration.
///
/// - Debug does not print key material.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(raw: impl Into<Vec<u8>>) -> Result<Self, WeakSecret> {
        let raw = raw.into();
        if raw.len() < MIN_SECRET_BYTES {
            return Err(WeakSecret { len: raw.len() });
        }
        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("signing secret must be at least {MIN_SECRET_BYTES} bytes, got {len}")]
pub struct WeakSecret {
    pub len: usize,
}

/// Claims written into every credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialClaims {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &SigningSecret) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }

    pub fn sign(&self, claims: &CredentialClaims) -> Result<String, jsonwebtoken::errors::Error> {
        let mut header = Header::new(ALGORITHM);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding).map_err(|e| {
            error!(error = %e, "failed to sign credential");
            e
        })
    }
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JwtKeys(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_secret_is_rejected() {
        let err = SigningSecret::new("too-short").unwrap_err();
        assert_eq!(err.len, 9);
        assert!(SigningSecret::new(vec![7u8; MIN_SECRET_BYTES]).is_ok());
    }

    #[test]
    fn secret_debug_does_not_leak() {
        let secret = SigningSecret::new("0123456789abcdef0123456789abcdef").unwrap();
        assert!(!format!("{secret:?}").contains("0123"));
    }
}
