/*
 * Responsibility
 * - /auth 系の request/response DTO
 * - role は request に含めない (users から引く)。register で送られても無視される
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::UserRecord;
use crate::services::auth::{IdentityClaim, IssuedCredential, Role, SubjectId};

const NAME_MAX_CHARS: usize = 100;

fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

// Unknown fields (e.g. "role") are ignored, not honoured.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("name is required");
        }
        if name.chars().count() > NAME_MAX_CHARS {
            return Err("name must be 100 characters or fewer");
        }

        let email = self.email();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err("email is invalid"),
        }
    }

    pub fn email(&self) -> String {
        normalize_email(&self.email)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn email(&self) -> String {
        normalize_email(&self.email)
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: SubjectId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.user_name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: &'static str,
    /// Seconds until expiry.
    pub expires_in: u64,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedCredential> for TokenResponse {
    fn from(issued: IssuedCredential) -> Self {
        Self {
            access_token: issued.token,
            token_type: issued.token_type,
            expires_in: issued.expires_in,
            expires_at: issued.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub subject_id: SubjectId,
    pub role: Role,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&IdentityClaim> for IdentityResponse {
    fn from(claim: &IdentityClaim) -> Self {
        Self {
            subject_id: claim.subject_id,
            role: claim.role,
            expires_at: DateTime::from_timestamp(claim.expires_at, 0),
        }
    }
}
