use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;

use crate::services::auth::revocation::store::{RevocationError, RevocationStore};

/// Process-local revocation list.
///
/// Expired entries are pruned on every `revoke`.
#[derive(Debug, Default)]
pub struct MemoryRevocationStore {
    entries: RwLock<HashMap<String, Instant>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|until| **until > now)
            .count()
    }
}

impl RevocationStore for MemoryRevocationStore {
    fn revoke<'a>(
        &'a self,
        jti: &'a str,
        ttl_secs: u64,
    ) -> Pin<Box<dyn Future<Output = Result<(), RevocationError>> + Send + 'a>> {
        Box::pin(async move {
            let now = Instant::now();
            let until = now + Duration::from_secs(ttl_secs.max(1));

            let mut entries = self.entries.write().await;
            entries.retain(|_, expires| *expires > now);
            entries.insert(jti.to_string(), until);

            Ok(())
        })
    }

    fn is_revoked<'a>(
        &'a self,
        jti: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool, RevocationError>> + Send + 'a>> {
        Box::pin(async move {
            let entries = self.entries.read().await;
            Ok(entries
                .get(jti)
                .is_some_and(|until| *until > Instant::now()))
        })
    }
}
