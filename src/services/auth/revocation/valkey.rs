use std::{future::Future, pin::Pin, time::Duration};

use crate::services::{
    auth::revocation::store::{RevocationError, RevocationStore},
    cache::{ExpiringKeys, ValkeyKeys},
};

const KEY_PREFIX: &str = "auth:revoked";

/// Revocation list shared across instances through Valkey.
///
/// Each revoked `jti` is one key that expires together with the credential.
pub struct ValkeyRevocationStore<K = ValkeyKeys> {
    keys: K,
    prefix: String,
}

impl ValkeyRevocationStore {
    pub async fn connect(url: &str) -> Result<Self, RevocationError> {
        let keys = ValkeyKeys::connect(url).await?;
        tracing::info!(backend = keys.backend_name(), "revocation store connected");

        Ok(Self::with_keys(keys, KEY_PREFIX))
    }
}

impl<K: ExpiringKeys> ValkeyRevocationStore<K> {
    pub fn with_keys(keys: K, prefix: impl Into<String>) -> Self {
        Self {
            keys,
            prefix: prefix.into(),
        }
    }

    fn key(&self, jti: &str) -> String {
        format!("{}:{}", self.prefix, jti)
    }
}

impl<K: ExpiringKeys> RevocationStore for ValkeyRevocationStore<K> {
    fn revoke<'a>(
        &'a self,
        jti: &'a str,
        ttl_secs: u64,
    ) -> Pin<Box<dyn Future<Output = Result<(), RevocationError>> + Send + 'a>> {
        Box::pin(async move {
            self.keys
                .insert(&self.key(jti), Duration::from_secs(ttl_secs))
                .await?;
            Ok(())
        })
    }

    fn is_revoked<'a>(
        &'a self,
        jti: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool, RevocationError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.keys.contains(&self.key(jti)).await?) })
    }
}
