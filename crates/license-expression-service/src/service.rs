//! Cached license expression service.

use std::sync::Arc;

use license_expression::{LicenseExpression, Licensing, ParseOptions};
use parking_lot::RwLock;
use tracing::debug;

use crate::cache::{normalize_cache_key, CacheStats, CachedExpression, ExpressionCache};
use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::statistics::ServiceStats;
use crate::types::ExpressionReport;

/// A thread-safe service answering license expression queries against one
/// registry, with parsed and simplified trees cached by expression text.
///
/// # Example
///
/// ```rust
/// use license_expression::Licensing;
/// use license_expression_service::LicenseService;
///
/// let licensing = Licensing::new(["MIT", "Apache-2.0"]).unwrap();
/// let service = LicenseService::new(licensing);
///
/// assert_eq!(service.normalize("apache-2.0 or mit or MIT").unwrap(), "Apache-2.0 OR MIT");
/// assert!(service.is_equivalent("mit and apache-2.0", "apache-2.0 and mit").unwrap());
///
/// let report = service.validate("mit or zlib");
/// assert_eq!(report.unknown_keys, vec!["zlib"]);
/// ```
pub struct LicenseService {
    licensing: Licensing,
    config: ServiceConfig,
    cache: Option<ExpressionCache>,
    stats: RwLock<ServiceStats>,
}

impl LicenseService {
    /// Creates a service with the default configuration.
    pub fn new(licensing: Licensing) -> Self {
        Self::with_config(licensing, ServiceConfig::default())
    }

    /// Creates a service with a custom configuration.
    pub fn with_config(licensing: Licensing, config: ServiceConfig) -> Self {
        let cache = config.cache.map(ExpressionCache::new);
        Self {
            licensing,
            config,
            cache,
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Returns the underlying registry.
    pub fn licensing(&self) -> &Licensing {
        &self.licensing
    }

    /// Returns the service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    /// Parses an expression with the configured options.
    pub fn parse(&self, expression: &str) -> ServiceResult<Option<LicenseExpression>> {
        Ok(self.lookup(expression, self.config.parse_options)?.parsed.clone())
    }

    /// Parses and simplifies an expression.
    pub fn simplify(&self, expression: &str) -> ServiceResult<Option<LicenseExpression>> {
        Ok(self
            .lookup(expression, self.config.parse_options)?
            .simplified
            .clone())
    }

    /// Renders the simplified form of an expression with its keys.
    ///
    /// Fails with [`ServiceError::EmptyExpression`] if nothing was parsed.
    pub fn normalize(&self, expression: &str) -> ServiceResult<String> {
        let cached = self.lookup(expression, self.config.parse_options)?;
        cached
            .simplified
            .as_ref()
            .map(LicenseExpression::to_string)
            .ok_or(ServiceError::EmptyExpression)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// True if both expressions simplify to the same tree.
    pub fn is_equivalent(&self, expression1: &str, expression2: &str) -> ServiceResult<bool> {
        let ex1 = self.lookup(expression1, self.config.parse_options)?;
        let ex2 = self.lookup(expression2, self.config.parse_options)?;
        Ok(ex1.simplified == ex2.simplified)
    }

    /// True if the simplified `expression2` is found in the simplified
    /// `expression1`. False when either side is empty.
    pub fn contains(&self, expression1: &str, expression2: &str) -> ServiceResult<bool> {
        let ex1 = self.lookup(expression1, self.config.parse_options)?;
        let ex2 = self.lookup(expression2, self.config.parse_options)?;
        Ok(match (&ex1.simplified, &ex2.simplified) {
            (Some(ex1), Some(ex2)) => ex1.contains(ex2),
            _ => false,
        })
    }

    /// Keys of an expression in first-appearance order.
    pub fn license_keys(&self, expression: &str, unique: bool) -> ServiceResult<Vec<String>> {
        let cached = self.lookup(expression, self.config.parse_options)?;
        Ok(self.licensing.license_keys(cached.parsed.as_ref(), unique)?)
    }

    /// Keys of an expression that are not in the registry.
    pub fn unknown_license_keys(&self, expression: &str, unique: bool) -> ServiceResult<Vec<String>> {
        let cached = self.lookup(expression, self.config.parse_options)?;
        Ok(self
            .licensing
            .unknown_license_keys(cached.parsed.as_ref(), unique)?)
    }

    /// Checks an expression against the registry.
    ///
    /// Never fails: parse errors are reported in the result. Unknown keys
    /// are listed rather than rejected, whatever the configured `validate`
    /// option.
    pub fn validate(&self, expression: &str) -> ExpressionReport {
        self.inspect(expression)
            .unwrap_or_else(|err| ExpressionReport {
                expression: expression.to_string(),
                normalized: None,
                unknown_keys: Vec::new(),
                error: Some(err.to_string()),
            })
    }

    fn inspect(&self, expression: &str) -> ServiceResult<ExpressionReport> {
        let options = self.config.parse_options.with_validate(false);
        let cached = self.lookup(expression, options)?;
        let unknown_keys = self
            .licensing
            .unknown_license_keys(cached.parsed.as_ref(), true)?;
        Ok(ExpressionReport {
            expression: expression.to_string(),
            normalized: cached.simplified.as_ref().map(LicenseExpression::to_string),
            unknown_keys,
            error: None,
        })
    }

    // ========================================================================
    // Cache management
    // ========================================================================

    /// Pre-parses common expressions. Returns how many parsed successfully.
    pub fn warm_cache<'a>(&self, expressions: impl IntoIterator<Item = &'a str>) -> usize {
        expressions
            .into_iter()
            .filter(|expression| self.lookup(expression, self.config.parse_options).is_ok())
            .count()
    }

    /// Clears the cache.
    pub fn clear_cache(&self) {
        if let Some(ref cache) = self.cache {
            cache.clear();
        }
    }

    /// Returns the current cache size.
    pub fn cache_len(&self) -> usize {
        self.cache.as_ref().map(ExpressionCache::len).unwrap_or(0)
    }

    /// Returns cache statistics, or `None` when caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(ExpressionCache::stats)
    }

    /// Removes expired cache entries and returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        self.cache
            .as_ref()
            .map(ExpressionCache::cleanup_expired)
            .unwrap_or(0)
    }

    /// Returns service statistics.
    pub fn stats(&self) -> ServiceStats {
        *self.stats.read()
    }

    /// Resets statistics.
    pub fn reset_stats(&self) {
        *self.stats.write() = ServiceStats::default();
    }

    fn lookup(&self, expression: &str, options: ParseOptions) -> ServiceResult<Arc<CachedExpression>> {
        let Some(ref cache) = self.cache else {
            return self.parse_uncached(expression, options).map(Arc::new);
        };

        let key = normalize_cache_key(expression, &options);
        if let Some(cached) = cache.get(&key) {
            self.stats.write().cache_hits += 1;
            return Ok(cached);
        }

        self.stats.write().cache_misses += 1;
        debug!(expression, "license expression cache miss");
        let cached = Arc::new(self.parse_uncached(expression, options)?);
        cache.insert(key, Arc::clone(&cached));
        Ok(cached)
    }

    fn parse_uncached(&self, expression: &str, options: ParseOptions) -> ServiceResult<CachedExpression> {
        self.stats.write().parses += 1;
        let parsed = self.licensing.parse(expression, options).map_err(|err| {
            self.stats.write().parse_errors += 1;
            err
        })?;
        Ok(CachedExpression::new(parsed))
    }
}

impl std::fmt::Debug for LicenseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseService")
            .field("known_keys", &self.licensing.len())
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish()
    }
}
