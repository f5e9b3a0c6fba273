use crate::utils::from_env::{EnvItemInfo, FromEnv, FromEnvErr, FromEnvVar};
use core::{fmt, num::ParseIntError};
use moka::sync::Cache;
use std::time::Duration;

/// The cache key the token provider reads and writes.
pub const TOKEN_CACHE_KEY: &str = "token";

const TOKEN_CACHE_TTL: &str = "BNET_TOKEN_CACHE_TTL";

static INVENTORY: [EnvItemInfo; 1] = [EnvItemInfo {
    var: TOKEN_CACHE_TTL,
    description: "Lifetime of cached entries in milliseconds. Defaults to 10 minutes",
    optional: true,
}];

/// Errors loading a [`MemoryCache`] from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryCacheEnvError {
    /// The TTL was not a whole number of milliseconds.
    #[error("error reading cache ttl: {0}")]
    Ttl(ParseIntError),
}

/// A string cache with an externally owned expiry policy.
///
/// Callers never choose a lifetime. Whatever the implementation's policy is,
/// an expired entry must read as absent.
pub trait TokenCache: Send + Sync {
    /// Get the live value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str);
}

/// An in-process [`TokenCache`] where every entry lives for the same TTL.
pub struct MemoryCache {
    ttl: Duration,
    entries: Cache<String, String>,
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

impl MemoryCache {
    /// The default entry lifetime, 10 minutes.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Cache::builder().time_to_live(ttl).build(),
        }
    }

    /// Get the entry lifetime.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl TokenCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key)
    }

    fn put(&self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }
}

impl FromEnv for MemoryCache {
    type Error = MemoryCacheEnvError;

    fn inventory() -> Vec<&'static EnvItemInfo> {
        INVENTORY.iter().collect()
    }

    fn from_env() -> Result<Self, FromEnvErr<Self::Error>> {
        let ttl = Option::<Duration>::from_env_var(TOKEN_CACHE_TTL)
            .map_err(|e| e.map(MemoryCacheEnvError::Ttl))?
            .unwrap_or(Self::DEFAULT_TTL);

        Ok(Self::new(ttl))
    }
}
