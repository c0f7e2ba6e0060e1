use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::identity::{Role, SubjectId};
use crate::services::auth::jwt::{CredentialClaims, JwtKeys, SigningSecret};

/// A freshly signed credential plus the metadata clients need.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedCredential {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub expires_at: DateTime<Utc>,
    #[serde(skip)]
    pub jti: String,
}

/// Issues signed bearer credentials.
///
/// Secret, issuer, audience and TTL all come from configuration at construction time.
#[derive(Clone, Debug)]
pub struct CredentialIssuer {
    keys: JwtKeys,
    issuer: String,
    audience: String,
    ttl_seconds: u64,
}

impl CredentialIssuer {
    pub fn new(
        secret: &SigningSecret,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            keys: JwtKeys::from_secret(secret),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn issue(&self, subject_id: SubjectId, role: Role) -> Result<IssuedCredential, AppError> {
        self.issue_at(subject_id, role, Utc::now())
    }

    /// Issue a credential as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject_id: SubjectId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<IssuedCredential, AppError> {
        let expires_at = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                tracing::error!(ttl_seconds = self.ttl_seconds, "credential expiry out of range");
                AppError::Internal
            })?;
        let jti = Uuid::new_v4().to_string();

        let claims = CredentialClaims {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            sub: subject_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: jti.clone(),
        };

        let token = self.keys.sign(&claims).map_err(|_| AppError::Internal)?;

        tracing::debug!(
            subject_id = %subject_id,
            role = %role,
            jti = %jti,
            expires_at = %expires_at,
            "issued credential"
        );

        Ok(IssuedCredential {
            token,
            token_type: "Bearer",
            expires_in: self.ttl_seconds,
            expires_at,
            jti,
        })
    }
}
