//! # license-expression
//!
//! Parse, normalize, compare and render license expressions such as
//! `GPL-2.0+ WITH Classpath-exception OR (MIT AND BSD-3-Clause)`.
//!
//! This crate provides:
//! - **Symbols**: license and exception identifiers, optionally backed by
//!   caller types through [`SymbolLike`]
//! - **Licensing**: a registry of known symbols and the parser driver
//! - **Expressions**: boolean trees with simplification, containment and
//!   template rendering
//!
//! ## Parsing
//!
//! ```rust
//! use license_expression::{Licensing, ParseOptions};
//!
//! let licensing = Licensing::default();
//! let expr = licensing
//!     .parse("EPL-1.0 and Apache-1.1 OR GPL-2.0 with Classpath-exception", ParseOptions::default())
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(
//!     expr.render("{symbol.key}").unwrap(),
//!     "(EPL-1.0 AND Apache-1.1) OR GPL-2.0 WITH Classpath-exception"
//! );
//! ```
//!
//! ## Known symbols
//!
//! Registered keys and aliases are matched ignoring case, and may span
//! several words:
//!
//! ```rust
//! use license_expression::{LicenseSymbol, Licensing, ParseOptions};
//!
//! let symbols = vec![
//!     LicenseSymbol::new("GPL-2.0").unwrap().with_aliases(["GNU GPL 2.0"]),
//!     LicenseSymbol::exception("Classpath-exception-2.0").unwrap(),
//! ];
//! let licensing = Licensing::new(symbols).unwrap();
//!
//! let expr = licensing
//!     .parse("gnu gpl 2.0 with classpath-exception-2.0", ParseOptions::new().with_strict(true))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(expr.to_string(), "GPL-2.0 WITH Classpath-exception-2.0");
//! assert!(licensing.unknown_license_keys(&expr, true).unwrap().is_empty());
//! ```
//!
//! ## Expression Syntax Quick Reference
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `A AND B` | Both licenses apply | `MIT AND BSD` |
//! | `A OR B` | Choice of license | `MIT OR Apache-2.0` |
//! | `A WITH E` | License with an exception | `GPL-2.0 WITH Classpath-exception` |
//! | `( ... )` | Grouping | `MIT OR (BSD AND Zlib)` |
//!
//! `AND` binds tighter than `OR`; keywords are case-insensitive.
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for symbols, expressions, tokens
//!   and options, plus [`Licensing::from_json`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod error;
mod expression;
mod licensing;
mod parser;
mod symbol;
mod template;
mod tokenizer;
mod validation;

pub use config::{LicensingConfig, LicensingConfigBuilder, ParseOptions};
pub use error::{LicenseError, LicenseResult, ParseError, ParseErrorCode};
pub use expression::{LicenseExpression, Operator};
pub use licensing::{ExpressionInput, Licensing};
#[cfg(feature = "serde")]
pub use symbol::SymbolRecord;
pub use symbol::{
    IntoLicenseSymbol, LicenseSymbol, LicenseSymbolLike, LicenseWithExceptionSymbol, Symbol,
    SymbolLike,
};
pub use template::{Template, DEFAULT_TEMPLATE};
pub use tokenizer::{ExpressionToken, Keyword, TokenKind, TokenValue};
pub use validation::{validate_symbols, ValidationReport};
