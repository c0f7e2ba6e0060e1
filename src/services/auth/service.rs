use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::services::auth::access_jwt::CredentialVerifier;
use crate::services::auth::identity::{IdentityClaim, Role, SubjectId};
use crate::services::auth::revocation::RevocationStore;
use crate::services::auth::token_issuer::{CredentialIssuer, IssuedCredential};

/// Issuer + verifier + revocation list, as seen by handlers and the access guard.
#[derive(Clone)]
pub struct AuthService {
    issuer: CredentialIssuer,
    verifier: CredentialVerifier,
    revocations: Arc<dyn RevocationStore>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("issuer", &self.issuer)
            .field("verifier", &self.verifier)
            .finish()
    }
}

impl AuthService {
    pub fn new(
        issuer: CredentialIssuer,
        verifier: CredentialVerifier,
        revocations: Arc<dyn RevocationStore>,
    ) -> Self {
        Self {
            issuer,
            verifier,
            revocations,
        }
    }

    pub fn issue(&self, subject_id: SubjectId, role: Role) -> Result<IssuedCredential, AppError> {
        self.issuer.issue(subject_id, role)
    }

    /// Verify a raw bearer token and reject it if its `jti` was revoked.
    ///
    /// Every failure (including a revocation backend error) is `Unauthorized`.
    pub async fn authenticate(&self, token: &str) -> Result<IdentityClaim, AppError> {
        let claim = self.verifier.verify(token).map_err(|err| {
            tracing::warn!(error = %err, "credential verification failed");
            AppError::Unauthorized
        })?;

        let revoked = self
            .revocations
            .is_revoked(&claim.jti)
            .await
            .map_err(|err| {
                tracing::warn!(error = ?err, "revocation backend failure");
                AppError::Unauthorized
            })?;

        if revoked {
            tracing::warn!(subject_id = %claim.subject_id, jti = %claim.jti, "revoked credential presented");
            return Err(AppError::Unauthorized);
        }

        Ok(claim)
    }

    /// Revoke the credential behind `claim` until it would have expired anyway.
    pub async fn revoke(&self, claim: &IdentityClaim) -> Result<(), AppError> {
        self.revoke_at(claim, Utc::now()).await
    }

    pub async fn revoke_at(&self, claim: &IdentityClaim, now: DateTime<Utc>) -> Result<(), AppError> {
        let remaining = claim.expires_at.saturating_sub(now.timestamp());
        if remaining <= 0 {
            return Ok(());
        }

        self.revocations
            .revoke(&claim.jti, remaining as u64)
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, jti = %claim.jti, "failed to revoke credential");
                AppError::Internal
            })?;

        tracing::info!(subject_id = %claim.subject_id, jti = %claim.jti, "credential revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::services::auth::jwt::SigningSecret;
    use crate::services::auth::revocation::MemoryRevocationStore;

    fn service() -> AuthService {
        let secret = SigningSecret::new("service-test-secret-0123456789abcdef").unwrap();
        AuthService::new(
            CredentialIssuer::new(&secret, "iss", "aud", 600),
            CredentialVerifier::new(&secret, "iss", "aud", 0),
            Arc::new(MemoryRevocationStore::new()),
        )
    }

    #[tokio::test]
    async fn revoked_credential_no_longer_authenticates() {
        let auth = service();
        let issued = auth
            .issue(SubjectId::new(Uuid::new_v4()), Role::User)
            .unwrap();

        let claim = auth.authenticate(&issued.token).await.unwrap();
        auth.revoke(&claim).await.unwrap();

        assert!(matches!(
            auth.authenticate(&issued.token).await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn revoking_one_credential_leaves_others_valid() {
        let auth = service();
        let subject = SubjectId::new(Uuid::new_v4());
        let first = auth.issue(subject, Role::User).unwrap();
        let second = auth.issue(subject, Role::User).unwrap();

        let claim = auth.authenticate(&first.token).await.unwrap();
        auth.revoke(&claim).await.unwrap();

        assert!(auth.authenticate(&second.token).await.is_ok());
    }
}
