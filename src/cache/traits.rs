use async_trait::async_trait;

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    Error(String),
}

/// String-keyed object cache.
///
/// Values are stored as serialized JSON so that backends stay agnostic of
/// the cached types.
#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;

    /// Insert a value with a TTL in seconds. A TTL of 0 means the
    /// backend default applies.
    async fn insert_raw(&self, key: String, value: String, ttl: u64);

    async fn remove(&self, key: &str);

    async fn invalidate_all(&self);
}
