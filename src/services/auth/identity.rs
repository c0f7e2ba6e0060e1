/*
 * Responsibility
 * - 認証・認可で共有する型 (SubjectId / Role / IdentityClaim)
 * - subject と owner の比較はここにある SubjectId だけで行う
 */
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical identifier for a subject (user).
///
/// Every owner field on every resource type stores this type, so ownership is
/// always a `SubjectId == SubjectId` comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(Uuid);

impl SubjectId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for SubjectId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for SubjectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Capability set carried inside a credential.
///
/// Unknown strings do not deserialize, so a token with a foreign role is
/// rejected instead of being downgraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Verified identity attached to a single request by the access guard.
///
/// - `jti` は revocation と監査ログの相関用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    pub subject_id: SubjectId,
    pub role: Role,
    pub jti: String,
    pub expires_at: i64,
}

impl IdentityClaim {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_subject(&self, subject_id: &SubjectId) -> bool {
        self.subject_id == *subject_id
    }
}
