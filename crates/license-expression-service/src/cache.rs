//! Parse result caching for license expressions.
//!
//! Provides an LRU cache with TTL expiration for parsed and simplified
//! expression trees. Thread-safe using a `parking_lot::Mutex` for LRU
//! operations.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use license_expression::{LicenseExpression, ParseOptions};
use lru::LruCache;
use parking_lot::Mutex;

use crate::config::CacheConfig;

/// A parsed expression together with its simplified form.
///
/// Both are `None` for empty expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedExpression {
    /// The tree as parsed.
    pub parsed: Option<LicenseExpression>,
    /// The simplified tree.
    pub simplified: Option<LicenseExpression>,
}

impl CachedExpression {
    /// Simplifies `parsed` once and keeps both forms.
    pub fn new(parsed: Option<LicenseExpression>) -> Self {
        let simplified = parsed.as_ref().map(LicenseExpression::simplify);
        Self { parsed, simplified }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Arc<CachedExpression>,
    created_at: Instant,
}

impl CacheEntry {
    fn new(value: Arc<CachedExpression>) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Thread-safe LRU cache with TTL expiration for parsed expressions.
///
/// When full, the least recently used entry is evicted. Entries older than
/// the configured TTL are dropped on access.
///
/// # Example
///
/// ```rust
/// use license_expression::{Licensing, ParseOptions};
/// use license_expression_service::{CacheConfig, CachedExpression, ExpressionCache};
/// use std::sync::Arc;
///
/// let cache = ExpressionCache::new(CacheConfig::default());
/// let parsed = Licensing::default().parse("mit or mit", ParseOptions::default()).unwrap();
/// cache.insert("mit or mit".to_string(), Arc::new(CachedExpression::new(parsed)));
///
/// let cached = cache.get("mit or mit").unwrap();
/// assert_eq!(cached.simplified.as_ref().unwrap().to_string(), "mit");
/// ```
pub struct ExpressionCache {
    inner: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl ExpressionCache {
    /// Creates a new cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_capacity(config.max_entries, config.ttl)
    }

    /// Creates a cache with custom capacity and TTL.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(max_entries: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Gets a cached expression by key.
    ///
    /// Returns `None` if the key is absent or its entry has expired. On a
    /// hit the entry is promoted to most-recently-used.
    pub fn get(&self, key: &str) -> Option<Arc<CachedExpression>> {
        let mut cache = self.inner.lock();
        let entry = cache.get(key)?;
        if !entry.is_expired(self.ttl) {
            return Some(Arc::clone(&entry.value));
        }
        cache.pop(key);
        None
    }

    /// Stores an expression, evicting the least recently used entry if full.
    pub fn insert(&self, key: String, value: Arc<CachedExpression>) {
        self.inner.lock().put(key, CacheEntry::new(value));
    }

    /// Checks if a key exists in the cache without affecting LRU order.
    ///
    /// Expiration is not checked.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().contains(key)
    }

    /// Returns the number of entries, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the time-to-live of entries.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Clears all entries.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Removes expired entries and returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let mut cache = self.inner.lock();
        let expired: Vec<String> = cache
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.ttl))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            cache.pop(key);
        }
        expired.len()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let cache = self.inner.lock();
        let total = cache.len();
        let expired = cache
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.ttl))
            .count();
        CacheStats {
            total_entries: total,
            expired_entries: expired,
            valid_entries: total.saturating_sub(expired),
        }
    }
}

impl std::fmt::Debug for ExpressionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpressionCache")
            .field("entries", &self.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Statistics about the cache state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheStats {
    /// Total number of entries in the cache.
    pub total_entries: usize,
    /// Number of expired entries not yet cleaned up.
    pub expired_entries: usize,
    /// Number of valid entries.
    pub valid_entries: usize,
}

/// Builds the cache key for an expression parsed with `options`.
///
/// Whitespace runs collapse to one space and the ends are trimmed, so
/// spellings that tokenize identically share an entry. Case is kept:
/// unregistered keys compare case-sensitively.
///
/// ```rust
/// use license_expression::ParseOptions;
/// use license_expression_service::normalize_cache_key;
///
/// let options = ParseOptions::default();
/// assert_eq!(
///     normalize_cache_key("  mit   or\tbsd ", &options),
///     normalize_cache_key("mit or bsd", &options)
/// );
/// assert_ne!(
///     normalize_cache_key("mit", &options),
///     normalize_cache_key("mit", &options.with_strict(true))
/// );
/// ```
pub fn normalize_cache_key(expression: &str, options: &ParseOptions) -> String {
    let mut key = String::with_capacity(expression.len() + 8);
    for (i, word) in expression.split_whitespace().enumerate() {
        if i > 0 {
            key.push(' ');
        }
        key.push_str(word);
    }
    key.push('|');
    for flag in [options.validate, options.strict, options.simple] {
        key.push(if flag { '1' } else { '0' });
    }
    key
}
