//! Durable key-value storage for client state that outlives a process:
//! the session token and the selected category filter.

pub mod file;
pub mod memory;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StorageBackend;
use crate::error::Result;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

pub const TOKEN_KEY: &str = "df_token";
pub const FILTER_KEY: &str = "df_filter";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

pub async fn open(backend: &StorageBackend) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File(path) => Arc::new(FileStore::open(path).await?),
        StorageBackend::Redis(url) => Arc::new(RedisStore::new(url).await?),
    };
    tracing::debug!(?backend, "storage opened");
    Ok(store)
}
