//! # license-expression-service
//!
//! A thread-safe, cached service over a [`license_expression::Licensing`]
//! registry.
//!
//! Parsing an expression and simplifying it are the costly parts of every
//! query. The service keeps both forms in an LRU cache with TTL expiration,
//! keyed by the whitespace-normalized expression text and the parse options,
//! and counts hits, misses and parse errors.
//!
//! ## Quick Start
//!
//! ```rust
//! use license_expression::{LicenseSymbol, Licensing};
//! use license_expression_service::LicenseService;
//!
//! let symbols = vec![
//!     LicenseSymbol::new("GPL-2.0").unwrap().with_aliases(["GNU GPL 2.0"]),
//!     LicenseSymbol::exception("Classpath-exception-2.0").unwrap(),
//!     LicenseSymbol::new("MIT").unwrap(),
//! ];
//! let service = LicenseService::new(Licensing::new(symbols).unwrap());
//!
//! let keys = service
//!     .license_keys("gnu gpl 2.0 with classpath-exception-2.0 or mit", true)
//!     .unwrap();
//! assert_eq!(keys, vec!["GPL-2.0", "Classpath-exception-2.0", "MIT"]);
//!
//! service.license_keys("gnu gpl 2.0 with classpath-exception-2.0 or mit", true).unwrap();
//! assert_eq!(service.stats().cache_hits, 1);
//! ```
//!
//! ## With Configuration
//!
//! ```rust
//! use license_expression::{Licensing, ParseOptions};
//! use license_expression_service::{CacheConfig, LicenseService, ServiceConfig};
//! use std::time::Duration;
//!
//! let config = ServiceConfig::builder()
//!     .with_cache(CacheConfig {
//!         max_entries: 1_000,
//!         ttl: Duration::from_secs(60),
//!     })
//!     .with_parse_options(ParseOptions::new().with_validate(true))
//!     .build();
//!
//! let service = LicenseService::with_config(Licensing::new(["MIT"]).unwrap(), config);
//! assert!(service.parse("mit or unknown-license").is_err());
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for configuration, statistics and
//!   reports.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cache;
mod config;
mod error;
mod service;
mod statistics;
mod types;

pub use cache::{normalize_cache_key, CacheStats, CachedExpression, ExpressionCache};
pub use config::{CacheConfig, ServiceConfig, ServiceConfigBuilder};
pub use error::{ServiceError, ServiceResult};
pub use service::LicenseService;
pub use statistics::ServiceStats;
pub use types::ExpressionReport;
