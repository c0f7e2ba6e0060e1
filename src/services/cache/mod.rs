pub mod client;
pub mod valkey;

pub use client::{CacheError, CacheResult, ExpiringKeys};
pub use valkey::ValkeyKeys;
