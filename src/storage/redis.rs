use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::storage::KeyValueStore;

const KEY_PREFIX: &str = "forum_client";

/// Storage shared between machines through a Redis server.
#[derive(Clone)]
pub struct RedisStore {
    manager: Arc<Mutex<ConnectionManager>>,
}

impl RedisStore {
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self {
            manager: Arc::new(Mutex::new(manager)),
        })
    }

    fn namespaced(key: &str) -> String {
        format!("{}:{}", KEY_PREFIX, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.lock().await;
        let value: Option<String> = conn.get(Self::namespaced(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.manager.lock().await;
        let _: () = conn.set(Self::namespaced(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.manager.lock().await;
        let _: () = conn.del(Self::namespaced(key)).await?;
        Ok(())
    }
}
