/// Factory: build `AuthService` and its revocation backend from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::revocation::{
    MemoryRevocationStore, RevocationStore, ValkeyRevocationStore,
};
use crate::services::auth::{AuthService, CredentialIssuer, CredentialVerifier};

pub fn build_auth_service(
    config: &Config,
    revocations: Arc<dyn RevocationStore>,
) -> Arc<AuthService> {
    let issuer = CredentialIssuer::new(
        &config.auth_signing_secret,
        config.auth_issuer.clone(),
        config.auth_audience.clone(),
        config.access_token_ttl_seconds,
    );
    let verifier = CredentialVerifier::new(
        &config.auth_signing_secret,
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_leeway_seconds,
    );

    Arc::new(AuthService::new(issuer, verifier, revocations))
}

pub async fn build_revocation_store(config: &Config) -> Result<Arc<dyn RevocationStore>, AppError> {
    match config.valkey_url.as_deref() {
        Some(url) => {
            let store = ValkeyRevocationStore::connect(url).await.map_err(|e| {
                tracing::error!(error = %e, "failed to connect revocation store");
                AppError::Internal
            })?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("VALKEY_URL not set; using in-process revocation list");
            Ok(Arc::new(MemoryRevocationStore::new()))
        }
    }
}
