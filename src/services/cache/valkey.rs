use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::time::Duration;

use crate::services::cache::client::{CacheError, CacheResult, ExpiringKeys, ttl_secs};

const BACKEND: &str = "valkey";

/// Valkey (Redis protocol) expiring keys: `SET key 1 EX ttl` / `EXISTS key`.
#[derive(Clone)]
pub struct ValkeyKeys {
    conn: ConnectionManager,
}

impl ValkeyKeys {
    /// Connect to e.g. `redis://localhost:6379`. Reconnects are handled by the manager.
    pub async fn connect(url: &str) -> CacheResult<Self> {
        let unreachable = |e: redis::RedisError| CacheError::Unreachable {
            backend: BACKEND,
            reason: e.to_string(),
        };

        let client = redis::Client::open(url).map_err(unreachable)?;
        let conn = ConnectionManager::new(client).await.map_err(unreachable)?;

        Ok(Self { conn })
    }
}

fn command_failed(command: &'static str) -> impl FnOnce(redis::RedisError) -> CacheError {
    move |e| CacheError::Command {
        backend: BACKEND,
        command,
        reason: e.to_string(),
    }
}

#[async_trait]
impl ExpiringKeys for ValkeyKeys {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn insert(&self, key: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, 1u8, ttl_secs(ttl))
            .await
            .map_err(command_failed("SET"))
    }

    async fn contains(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.conn.clone();
        conn.exists::<_, bool>(key)
            .await
            .map_err(command_failed("EXISTS"))
    }
}
