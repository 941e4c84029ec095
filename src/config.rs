use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "https://forum-api.dicoding.dev/v1";
pub const DEFAULT_STORAGE_PATH: &str = "./.forum_client/storage.json";

/// Where the durable key-value state (session token, category filter) lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File(PathBuf),
    Redis(String),
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::Config("Empty storage URL".to_string()));
        }
        if s == "memory:" || s == "memory" {
            Ok(StorageBackend::Memory)
        } else if s.starts_with("redis://") || s.starts_with("rediss://") {
            Ok(StorageBackend::Redis(s.to_string()))
        } else {
            Ok(StorageBackend::File(PathBuf::from(
                s.strip_prefix("file://").unwrap_or(s),
            )))
        }
    }
}

/// How the vote controller refuses overlapping votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteLockPolicy {
    /// Any outstanding request blocks every vote.
    #[default]
    Global,
    /// Only a pending vote on the same entity blocks.
    PerKey,
}

impl FromStr for VoteLockPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "global" | "Global" => Ok(VoteLockPolicy::Global),
            "per-key" | "per_key" | "PerKey" => Ok(VoteLockPolicy::PerKey),
            other => Err(AppError::Config(format!("Unknown vote lock policy: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub storage: StorageBackend,
    pub request_timeout: Duration,
    pub vote_lock: VoteLockPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage: StorageBackend::File(PathBuf::from(DEFAULT_STORAGE_PATH)),
            request_timeout: Duration::from_secs(10),
            vote_lock: VoteLockPolicy::Global,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            api_url: env::var("FORUM_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            storage: env::var("FORUM_STORAGE_URL")
                .unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string())
                .parse()?,
            request_timeout: Duration::from_secs(
                env::var("FORUM_REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            ),
            vote_lock: env::var("FORUM_VOTE_LOCK")
                .unwrap_or_else(|_| "global".to_string())
                .parse()?,
        })
    }
}
