use std::{future::Future, pin::Pin};

use crate::services::cache::CacheError;

/// Denylist of credential ids (`jti`).
///
/// Entries only need to outlive the credential they revoke, so every insert
/// carries a TTL equal to the credential's remaining lifetime.
pub trait RevocationStore: Send + Sync {
    // Mark `jti` as revoked for `ttl_secs` seconds.
    fn revoke<'a>(
        &'a self,
        jti: &'a str,
        ttl_secs: u64,
    ) -> Pin<Box<dyn Future<Output = Result<(), RevocationError>> + Send + 'a>>;

    // Returns:
    // - Ok(true)  => revoked
    // - Ok(false) => not revoked
    // - Err(_)    => backend failure (caller must treat as authentication failure)
    fn is_revoked<'a>(
        &'a self,
        jti: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool, RevocationError>> + Send + 'a>>;
}

#[derive(Debug, thiserror::Error)]
pub enum RevocationError {
    #[error(transparent)]
    Cache(#[from] CacheError),
}
