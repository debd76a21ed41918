//! Configuration for the license expression service.

use std::time::Duration;

use license_expression::ParseOptions;

/// Configuration for the parse cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheConfig {
    /// Maximum number of cached expressions.
    pub max_entries: usize,
    /// Time-to-live for cached expressions.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(300),
        }
    }
}

/// Configuration for a [`LicenseService`](crate::LicenseService).
///
/// # Example
///
/// ```rust
/// use license_expression::ParseOptions;
/// use license_expression_service::{CacheConfig, ServiceConfig};
/// use std::time::Duration;
///
/// let config = ServiceConfig::builder()
///     .with_cache(CacheConfig {
///         max_entries: 500,
///         ttl: Duration::from_secs(60),
///     })
///     .with_parse_options(ParseOptions::new().with_strict(true))
///     .build();
///
/// assert_eq!(config.cache.map(|c| c.max_entries), Some(500));
/// assert!(config.parse_options.strict);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceConfig {
    /// Parse cache configuration. `None` disables caching.
    pub cache: Option<CacheConfig>,
    /// Options used for every parse issued by the service.
    pub parse_options: ParseOptions,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache: Some(CacheConfig::default()),
            parse_options: ParseOptions::default(),
        }
    }
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// A configuration with caching disabled.
    pub fn no_cache() -> Self {
        Self {
            cache: None,
            ..Self::default()
        }
    }

    /// A configuration with a cache of `max_entries` and the default TTL.
    pub fn with_cache_size(max_entries: usize) -> Self {
        Self {
            cache: Some(CacheConfig {
                max_entries,
                ..CacheConfig::default()
            }),
            ..Self::default()
        }
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug, Clone, Default)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    /// Sets the cache configuration.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.config.cache = Some(cache);
        self
    }

    /// Disables caching.
    pub fn without_cache(mut self) -> Self {
        self.config.cache = None;
        self
    }

    /// Sets the options used for every parse.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.config.parse_options = options;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ServiceConfig {
        self.config
    }
}
