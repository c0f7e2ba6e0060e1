use chrono::{DateTime, Utc};
use jsonwebtoken::{Validation, errors::ErrorKind};
use std::{error::Error as StdError, fmt};

use crate::error::AppError;
use crate::services::auth::identity::{IdentityClaim, SubjectId};
use crate::services::auth::jwt::{ALGORITHM, CredentialClaims, JwtKeys, SigningSecret};

// Reasons a presented credential was rejected.
//
// These are for logs only; the HTTP boundary collapses all of them into 401.
#[derive(Debug)]
pub enum TokenError {
    Missing,
    Malformed(jsonwebtoken::errors::Error),
    BadSignature,
    Expired,
    InvalidClaim(&'static str),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "credential is missing"),
            Self::Malformed(e) => write!(f, "malformed credential: {}", e),
            Self::BadSignature => write!(f, "credential signature is invalid"),
            Self::Expired => write!(f, "credential has expired"),
            Self::InvalidClaim(name) => write!(f, "invalid '{}' claim", name),
        }
    }
}

impl StdError for TokenError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidIssuer => Self::InvalidClaim("iss"),
            ErrorKind::InvalidAudience => Self::InvalidClaim("aud"),
            ErrorKind::MissingRequiredClaim(_) | ErrorKind::Json(_) => {
                Self::InvalidClaim("payload")
            }
            _ => Self::Malformed(e),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        AppError::Unauthorized
    }
}

/// HS256 credential verifier.
///
/// Holds no mutable state: the result depends only on the token, the clock
/// value and the configured secret/issuer/audience.
#[derive(Clone)]
pub struct CredentialVerifier {
    keys: JwtKeys,
    validation: Validation,
    leeway_seconds: u64,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("CredentialVerifier")
            .field("validation", &self.validation)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl CredentialVerifier {
    pub fn new(secret: &SigningSecret, issuer: &str, audience: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        // exp is checked in `verify_at` against the caller-supplied clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            keys: JwtKeys::from_secret(secret),
            validation,
            leeway_seconds,
        }
    }

    pub fn verify(&self, token: &str) -> Result<IdentityClaim, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature and claims, then check expiry against `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaim, TokenError> {
        if token.trim().is_empty() {
            return Err(TokenError::Missing);
        }

        let data =
            jsonwebtoken::decode::<CredentialClaims>(token, self.keys.decoding(), &self.validation)?;
        let claims = data.claims;

        let leeway = i64::try_from(self.leeway_seconds).unwrap_or(i64::MAX);
        if now.timestamp() >= claims.exp.saturating_add(leeway) {
            return Err(TokenError::Expired);
        }
        if claims.jti.trim().is_empty() {
            return Err(TokenError::InvalidClaim("jti"));
        }

        let subject_id = claims
            .sub
            .parse::<SubjectId>()
            .map_err(|_| TokenError::InvalidClaim("sub"))?;

        Ok(IdentityClaim {
            subject_id,
            role: claims.role,
            jti: claims.jti,
            expires_at: claims.exp,
        })
    }
}
