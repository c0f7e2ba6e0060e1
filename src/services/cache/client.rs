//! Expiring-key storage behind the revocation list.
//!
//! Only presence matters: a key is either live (inserted and not yet expired) or absent.
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("{backend} unreachable: {reason}")]
    Unreachable { backend: &'static str, reason: String },
    #[error("{backend} rejected {command}: {reason}")]
    Command {
        backend: &'static str,
        command: &'static str,
        reason: String,
    },
}

#[async_trait]
pub trait ExpiringKeys: Send + Sync + 'static {
    fn backend_name(&self) -> &'static str;

    /// Mark `key` live for `ttl` (rounded up to whole seconds, at least one).
    async fn insert(&self, key: &str, ttl: Duration) -> CacheResult<()>;

    async fn contains(&self, key: &str) -> CacheResult<bool>;
}

/// Whole seconds for an EX-style TTL; sub-second remainders round up.
pub fn ttl_secs(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}
