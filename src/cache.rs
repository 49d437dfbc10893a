//! Process-local time-to-live cache for identity lookups
//!
//! [`Cache`] memoizes idempotent reads (current user, guild list, user by
//! id, application metadata). Expiry is checked lazily when an entry is
//! read; there is no background sweep and no size bound, so sustained
//! unique-key traffic grows the map until entries are read or cleared.
//!
//! [`Cache::with_cache`] is the combinator the client wraps around each
//! fetch: it derives nothing itself, it takes the key, the per-call
//! [`CacheOptions`] and the fetch future factory.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::Result;
use crate::store::ShardedMap;

/// Default entry lifetime when none is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    expires_at: Instant,
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Per-call cache policy.
///
/// The default is cache-enabled with the cache's own default TTL.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use netcord::cache::CacheOptions;
///
/// let bypass = CacheOptions::bypass();
/// assert!(!bypass.enabled);
///
/// let short = CacheOptions::ttl(Duration::from_secs(5));
/// assert!(short.enabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// When `false` the cache is neither read nor written.
    pub enabled: bool,
    /// Overrides the default TTL for the entry written on a miss.
    pub ttl: Option<Duration>,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: None,
        }
    }
}

impl CacheOptions {
    /// Skip the cache entirely for this call.
    pub fn bypass() -> Self {
        Self {
            enabled: false,
            ttl: None,
        }
    }

    /// Cache with a specific TTL.
    pub fn ttl(ttl: Duration) -> Self {
        Self {
            enabled: true,
            ttl: Some(ttl),
        }
    }
}

/// Builds the key used for a cached operation: `{operation}:{argument}`.
pub fn cache_key(operation: &str, argument: &str) -> String {
    format!("{}:{}", operation, argument)
}

/// Keyed store of type-erased values with lazy expiry.
///
/// Each engine instance owns its own `Cache`; there is no process-wide
/// singleton.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use netcord::cache::Cache;
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = Cache::new(Duration::from_secs(60));
/// cache.set("greeting", "hello".to_string(), None);
/// assert_eq!(cache.get::<String>("greeting").as_deref(), Some("hello"));
///
/// cache.delete("greeting");
/// assert!(cache.get::<String>("greeting").is_none());
/// # }
/// ```
#[derive(Debug)]
pub struct Cache {
    entries: ShardedMap<CacheEntry>,
    default_ttl: Duration,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Cache {
    /// Creates an empty cache whose entries live `default_ttl` unless the
    /// writer overrides it.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: ShardedMap::new(),
            default_ttl,
        }
    }

    /// The TTL applied when `set` is called without one.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the live value stored under `key`.
    ///
    /// An entry past its expiry is removed and reported absent. An entry
    /// holding a different type than `T` is reported absent but kept.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let now = Instant::now();
        self.entries.with_shard(key, |map| {
            let entry = map.get(key)?;
            if now >= entry.expires_at {
                map.remove(key);
                return None;
            }
            entry.value.downcast_ref::<T>().cloned()
        })
    }

    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// A zero TTL produces an entry that is already expired.
    pub fn set<T>(&self, key: impl Into<String>, value: T, ttl: Option<Duration>)
    where
        T: Send + Sync + 'static,
    {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry {
            value: Arc::new(value),
            expires_at: Instant::now() + ttl,
        };
        self.entries.insert(key.into(), entry);
    }

    /// Removes the entry for `key`, if any.
    pub fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included until they are read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serves `key` from the cache or computes it with `fetch`.
    ///
    /// On a miss the fetched value is written back with `options.ttl` (or
    /// the default TTL). With `options.enabled == false` the cache is
    /// neither consulted nor updated. Errors from `fetch` are returned
    /// unchanged and nothing is cached.
    ///
    /// Two concurrent misses on the same key both call `fetch`; the later
    /// write wins.
    pub async fn with_cache<T, F, Fut>(&self, key: &str, options: CacheOptions, fetch: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !options.enabled {
            return fetch().await;
        }

        if let Some(hit) = self.get::<T>(key) {
            tracing::debug!(key = %redact_key(key), "cache hit");
            return Ok(hit);
        }

        tracing::debug!(key = %redact_key(key), "cache miss");
        let value = fetch().await?;
        self.set(key.to_string(), value.clone(), options.ttl);
        Ok(value)
    }
}

/// Keeps the operation name of a cache key and masks the argument, which
/// may be an access token.
fn redact_key(key: &str) -> String {
    match key.split_once(':') {
        Some((operation, _)) => format!("{}:***", operation),
        None => "***".to_string(),
    }
}
