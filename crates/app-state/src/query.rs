//! Query management with caching and staleness tracking
//!
//! Queries are cached reads keyed by scope and id. A query result is served
//! from cache while fresh; once stale it is still served immediately, with a
//! background refetch keeping the cache warm. Mutations invalidate scopes to
//! force the next read through the fetcher.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use storage::{CacheConfig, QueryCache};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors that can occur during query operations
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Cache operation failed
    #[error("Cache error: {0}")]
    CacheError(#[from] storage::CacheError),

    /// Serialization or deserialization failed
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The query fetcher failed
    #[error("Fetch error: {0}")]
    FetchError(String),
}

// ============================================================================
// Query Key
// ============================================================================

/// Identifies a query in the cache.
///
/// Keys are namespaced by `scope` (e.g. `"locations"`, `"circles"`, `"log"`)
/// so that a whole scope can be invalidated at once, with an `id` for the
/// specific query and optional parameters for parameterized queries.
///
/// # Examples
///
/// ```
/// use app_state::QueryKey;
///
/// let key = QueryKey::new("locations", "list");
/// assert_eq!(key.to_cache_key(), "query:locations:list");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    /// Invalidation namespace
    pub scope: String,
    /// Query identifier within the scope
    pub id: String,
    /// Optional parameters distinguishing variants of the same query
    pub params: Option<HashMap<String, String>>,
}

impl QueryKey {
    /// Create a query key with no parameters
    pub fn new(scope: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            id: id.into(),
            params: None,
        }
    }

    /// Attach parameters to the key
    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = Some(params);
        self
    }

    /// Render the key as a cache key string.
    ///
    /// Parameters are hashed in sorted order so that insertion order does not
    /// produce distinct cache entries.
    pub fn to_cache_key(&self) -> String {
        match &self.params {
            Some(params) if !params.is_empty() => {
                let mut entries: Vec<_> = params.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                let mut hasher = DefaultHasher::new();
                for (key, value) in entries {
                    key.hash(&mut hasher);
                    value.hash(&mut hasher);
                }
                format!("query:{}:{}:{:x}", self.scope, self.id, hasher.finish())
            }
            _ => format!("query:{}:{}", self.scope, self.id),
        }
    }
}

// ============================================================================
// Query State
// ============================================================================

/// Lifecycle state of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryState {
    /// Never fetched
    #[default]
    Idle,
    /// A fetch is in flight
    Fetching,
    /// Last fetch succeeded
    Success,
    /// Last fetch failed
    Error,
}

/// Bookkeeping for a cached query
#[derive(Debug, Clone, Default)]
pub struct QueryMeta {
    /// Current lifecycle state
    pub state: QueryState,
    /// When the data was last fetched successfully
    pub fetched_at: Option<SystemTime>,
    /// When the data becomes stale
    pub stale_at: Option<SystemTime>,
    /// Number of successful fetches
    pub fetch_count: u32,
    /// Message from the last failed fetch
    pub last_error: Option<String>,
}

impl QueryMeta {
    /// Whether the cached data is past its stale time.
    ///
    /// A query with no recorded stale time is considered stale.
    pub fn is_stale(&self) -> bool {
        match self.stale_at {
            Some(stale_at) => SystemTime::now() >= stale_at,
            None => true,
        }
    }
}

// ============================================================================
// Query Config
// ============================================================================

/// Per-query caching and retry behavior
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// How long fetched data counts as fresh
    pub stale_time: Duration,
    /// How long fetched data stays in the cache
    pub cache_time: Duration,
    /// Whether serving stale data triggers a background refetch
    pub refetch_on_stale: bool,
    /// Whether failed fetches are retried
    pub retry: bool,
    /// Total fetch attempts when retrying
    pub retry_count: u32,
    /// Delay between attempts
    pub retry_delay: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(0),
            cache_time: Duration::from_secs(300),
            refetch_on_stale: true,
            retry: true,
            retry_count: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

// ============================================================================
// Query Trait
// ============================================================================

/// A cacheable read.
///
/// Implementors describe how to fetch their data and where it lives in the
/// cache. The client handles caching, staleness, retries, and background
/// refetching.
#[async_trait]
pub trait Query: Send + Sync + Clone + 'static {
    /// The data this query produces
    type Data: Serialize + DeserializeOwned + Clone + Send + Sync;

    /// Fetch the data from its source
    async fn fetch(&self) -> Result<Self::Data>;

    /// The cache key for this query
    fn key(&self) -> QueryKey;

    /// Caching and retry behavior
    fn config(&self) -> QueryConfig {
        QueryConfig::default()
    }
}

// ============================================================================
// Query Client
// ============================================================================

/// Coordinates cached queries.
///
/// Cheap to clone; clones share the same cache and bookkeeping.
#[derive(Clone)]
pub struct QueryClient {
    cache: Arc<QueryCache<String>>,
    meta: Arc<RwLock<HashMap<String, QueryMeta>>>,
    background_tasks: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
}

impl QueryClient {
    /// Create a query client backed by an in-memory cache
    pub fn new(cache_config: CacheConfig) -> Self {
        Self {
            cache: Arc::new(QueryCache::new(cache_config)),
            meta: Arc::new(RwLock::new(HashMap::new())),
            background_tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get cached data for a query.
    ///
    /// Returns `Ok(None)` when nothing is cached. Stale data is returned
    /// immediately; if the query's config allows it, a background refetch is
    /// started so the next read sees fresh data.
    pub async fn get<Q: Query>(&self, query: &Q) -> Result<Option<Q::Data>> {
        let cache_key = query.key().to_cache_key();

        if let Some(cached) = self.cache.get(&cache_key)? {
            let is_stale = {
                let meta = self.meta.read().await;
                meta.get(&cache_key).map(QueryMeta::is_stale).unwrap_or(true)
            };

            let data: Q::Data = serde_json::from_str(&cached)?;

            if is_stale && query.config().refetch_on_stale {
                self.maybe_spawn_refetch(query, &cache_key).await;
            }

            return Ok(Some(data));
        }

        Ok(None)
    }

    /// Fetch a query, bypassing the cache, and store the result.
    ///
    /// Retries per the query's config; `retry_count` is the total number of
    /// attempts. On success the result is cached for the query's cache time.
    pub async fn fetch<Q: Query>(&self, query: &Q) -> Result<Q::Data> {
        let cache_key = query.key().to_cache_key();
        let config = query.config();

        {
            let mut meta = self.meta.write().await;
            let entry = meta.entry(cache_key.clone()).or_default();
            entry.state = QueryState::Fetching;
        }

        let attempts = if config.retry { config.retry_count.max(1) } else { 1 };
        let mut last_error = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                tokio::time::sleep(config.retry_delay).await;
            }

            match query.fetch().await {
                Ok(data) => {
                    let serialized = serde_json::to_string(&data)?;
                    self.cache
                        .put(cache_key.clone(), serialized, Some(config.cache_time))?;

                    let now = SystemTime::now();
                    let mut meta = self.meta.write().await;
                    let entry = meta.entry(cache_key).or_default();
                    entry.state = QueryState::Success;
                    entry.fetched_at = Some(now);
                    entry.stale_at = Some(now + config.stale_time);
                    entry.fetch_count += 1;
                    entry.last_error = None;

                    return Ok(data);
                }
                Err(error) => {
                    tracing::debug!(
                        key = %cache_key,
                        attempt = attempt + 1,
                        %error,
                        "query fetch attempt failed"
                    );
                    last_error = Some(error);
                }
            }
        }

        let error = last_error.unwrap_or_else(|| {
            QueryError::FetchError("query produced no result".to_string())
        });

        {
            let mut meta = self.meta.write().await;
            let entry = meta.entry(cache_key).or_default();
            entry.state = QueryState::Error;
            entry.last_error = Some(error.to_string());
        }

        Err(error)
    }

    /// Remove a single query from the cache
    pub async fn invalidate(&self, key: &QueryKey) -> Result<()> {
        let cache_key = key.to_cache_key();
        self.cache.remove(&cache_key)?;
        let mut meta = self.meta.write().await;
        meta.remove(&cache_key);
        Ok(())
    }

    /// Remove every cached query in a scope.
    ///
    /// Used by mutations to force dependent reads back through their
    /// fetchers.
    pub async fn invalidate_scope(&self, scope: &str) -> Result<()> {
        let prefix = format!("query:{scope}:");
        let mut meta = self.meta.write().await;
        let keys: Vec<String> = meta
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();

        for key in &keys {
            self.cache.remove(key)?;
            meta.remove(key);
        }

        tracing::debug!(scope, removed = keys.len(), "invalidated query scope");
        Ok(())
    }

    /// Fetch a query in the background to warm the cache
    pub fn prefetch<Q: Query>(&self, query: Q) {
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(error) = client.fetch(&query).await {
                tracing::debug!(%error, "prefetch failed");
            }
        });
    }

    /// Bookkeeping for a query, if it has ever been fetched
    pub async fn get_meta(&self, key: &QueryKey) -> Option<QueryMeta> {
        let meta = self.meta.read().await;
        meta.get(&key.to_cache_key()).cloned()
    }

    /// Start a background refetch unless one is already running for the key
    async fn maybe_spawn_refetch<Q: Query>(&self, query: &Q, cache_key: &str) {
        let mut tasks = self.background_tasks.lock().await;
        if let Some(handle) = tasks.get(cache_key) {
            if !handle.is_finished() {
                return;
            }
        }

        let client = self.clone();
        let query = query.clone();
        let handle = tokio::spawn(async move {
            if let Err(error) = client.fetch(&query).await {
                tracing::debug!(%error, "background refetch failed");
            }
        });
        tasks.insert(cache_key.to_string(), handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Counts fetches and fails the first `fail_first` of them.
    #[derive(Clone)]
    struct CountingQuery {
        calls: Arc<AtomicU32>,
        fail_first: u32,
        config: QueryConfig,
    }

    impl CountingQuery {
        fn new(fail_first: u32, config: QueryConfig) -> Self {
            Self {
                calls: Arc::new(AtomicU32::new(0)),
                fail_first,
                config,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Query for CountingQuery {
        type Data = Vec<String>;

        async fn fetch(&self) -> Result<Self::Data> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.fail_first {
                return Err(QueryError::FetchError(format!(
                    "service unavailable (attempt {call})"
                )));
            }
            Ok(vec!["Hope Center".to_string(), "Recovery House".to_string()])
        }

        fn key(&self) -> QueryKey {
            QueryKey::new("locations", "list")
        }

        fn config(&self) -> QueryConfig {
            self.config.clone()
        }
    }

    fn fast_config() -> QueryConfig {
        QueryConfig {
            retry_delay: Duration::from_millis(1),
            ..Default::default()
        }
    }

    #[test]
    fn cache_key_without_params() {
        let key = QueryKey::new("circles", "mine");
        assert_eq!(key.to_cache_key(), "query:circles:mine");
    }

    #[test]
    fn cache_key_params_order_insensitive() {
        let mut a = HashMap::new();
        a.insert("radius".to_string(), "10".to_string());
        a.insert("kind".to_string(), "meeting".to_string());

        let mut b = HashMap::new();
        b.insert("kind".to_string(), "meeting".to_string());
        b.insert("radius".to_string(), "10".to_string());

        let key_a = QueryKey::new("find", "nearby").with_params(a);
        let key_b = QueryKey::new("find", "nearby").with_params(b);
        assert_eq!(key_a.to_cache_key(), key_b.to_cache_key());
    }

    #[test]
    fn cache_key_empty_params_same_as_none() {
        let plain = QueryKey::new("log", "entries");
        let empty = QueryKey::new("log", "entries").with_params(HashMap::new());
        assert_eq!(plain.to_cache_key(), empty.to_cache_key());
    }

    #[tokio::test]
    async fn get_without_fetch_returns_none() {
        let client = QueryClient::new(CacheConfig::default());
        let query = CountingQuery::new(0, fast_config());

        let result = client.get(&query).await.unwrap();
        assert!(result.is_none());
        assert_eq!(query.calls(), 0);
    }

    #[tokio::test]
    async fn fetch_stores_result_for_get() {
        let client = QueryClient::new(CacheConfig::default());
        let config = QueryConfig {
            stale_time: Duration::from_secs(60),
            ..fast_config()
        };
        let query = CountingQuery::new(0, config);

        let fetched = client.fetch(&query).await.unwrap();
        assert_eq!(fetched.len(), 2);

        let cached = client.get(&query).await.unwrap();
        assert_eq!(cached, Some(fetched));
        assert_eq!(query.calls(), 1);

        let meta = client.get_meta(&query.key()).await.unwrap();
        assert_eq!(meta.state, QueryState::Success);
        assert_eq!(meta.fetch_count, 1);
        assert!(!meta.is_stale());
    }

    #[tokio::test]
    async fn fetch_retries_until_success() {
        let client = QueryClient::new(CacheConfig::default());
        let query = CountingQuery::new(2, fast_config());

        let result = client.fetch(&query).await;
        assert!(result.is_ok());
        assert_eq!(query.calls(), 3);
    }

    #[tokio::test]
    async fn fetch_exhausts_retries() {
        let client = QueryClient::new(CacheConfig::default());
        let config = QueryConfig {
            retry_count: 2,
            ..fast_config()
        };
        let query = CountingQuery::new(10, config);

        let result = client.fetch(&query).await;
        assert!(matches!(result, Err(QueryError::FetchError(_))));
        assert_eq!(query.calls(), 2);

        let meta = client.get_meta(&query.key()).await.unwrap();
        assert_eq!(meta.state, QueryState::Error);
        assert!(meta.last_error.is_some());
    }

    #[tokio::test]
    async fn no_retry_means_single_attempt() {
        let client = QueryClient::new(CacheConfig::default());
        let config = QueryConfig {
            retry: false,
            ..fast_config()
        };
        let query = CountingQuery::new(10, config);

        let result = client.fetch(&query).await;
        assert!(result.is_err());
        assert_eq!(query.calls(), 1);
    }

    #[tokio::test]
    async fn stale_data_served_then_refetched() {
        let client = QueryClient::new(CacheConfig::default());
        // Zero stale time: data is stale the moment it lands.
        let query = CountingQuery::new(0, fast_config());

        client.fetch(&query).await.unwrap();
        assert_eq!(query.calls(), 1);

        let cached = client.get(&query).await.unwrap();
        assert!(cached.is_some());

        // The stale read spawns a background refetch.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(query.calls(), 2);
    }

    #[tokio::test]
    async fn fresh_data_does_not_refetch() {
        let client = QueryClient::new(CacheConfig::default());
        let config = QueryConfig {
            stale_time: Duration::from_secs(300),
            ..fast_config()
        };
        let query = CountingQuery::new(0, config);

        client.fetch(&query).await.unwrap();
        client.get(&query).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(query.calls(), 1);
    }

    #[tokio::test]
    async fn invalidate_removes_entry() {
        let client = QueryClient::new(CacheConfig::default());
        let query = CountingQuery::new(0, fast_config());

        client.fetch(&query).await.unwrap();
        client.invalidate(&query.key()).await.unwrap();

        let cached = client.get(&query).await.unwrap();
        assert!(cached.is_none());
        assert!(client.get_meta(&query.key()).await.is_none());
    }

    #[tokio::test]
    async fn invalidate_scope_removes_matching_only() {
        #[derive(Clone)]
        struct ScopedQuery {
            scope: &'static str,
        }

        #[async_trait]
        impl Query for ScopedQuery {
            type Data = u32;

            async fn fetch(&self) -> Result<u32> {
                Ok(7)
            }

            fn key(&self) -> QueryKey {
                QueryKey::new(self.scope, "value")
            }
        }

        let client = QueryClient::new(CacheConfig::default());
        let circles = ScopedQuery { scope: "circles" };
        let log = ScopedQuery { scope: "log" };

        client.fetch(&circles).await.unwrap();
        client.fetch(&log).await.unwrap();

        client.invalidate_scope("circles").await.unwrap();

        assert!(client.get(&circles).await.unwrap().is_none());
        assert_eq!(client.get(&log).await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn prefetch_warms_cache() {
        let client = QueryClient::new(CacheConfig::default());
        let config = QueryConfig {
            stale_time: Duration::from_secs(60),
            ..fast_config()
        };
        let query = CountingQuery::new(0, config);

        client.prefetch(query.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;

        let cached = client.get(&query).await.unwrap();
        assert!(cached.is_some());
        assert_eq!(query.calls(), 1);
    }
}
