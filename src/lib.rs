pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod services;
pub mod storage;
pub mod store;

#[cfg(test)]
mod testing;

use std::sync::Arc;

pub use crate::client::ForumClient;
use crate::{config::Config, error::Result, services::ApiClient};

/// Wires the HTTP gateway and the configured storage backend into a client.
pub async fn create_client(config: Config) -> Result<ForumClient> {
    let storage = storage::open(&config.storage).await?;
    let gateway = Arc::new(ApiClient::new(&config)?);
    tracing::debug!(api_url = %config.api_url, vote_lock = ?config.vote_lock, "client created");
    Ok(ForumClient::new(config, gateway, storage))
}
