//! The [`Licensing`] registry and expression driver.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use once_cell::sync::OnceCell;
use tracing::{debug, trace, warn};

use crate::config::{LicensingConfig, ParseOptions};
use crate::error::{LicenseError, LicenseResult, ParseError, ParseErrorCode};
use crate::expression::LicenseExpression;
use crate::parser::parse_tokens;
use crate::symbol::{as_symbols, IntoLicenseSymbol, LicenseSymbol, Symbol};
use crate::tokenizer::automaton::AdvancedTokenizer;
use crate::tokenizer::{self, simple, ExpressionToken};
use crate::validation::validate_symbols;

/// An expression as accepted by [`Licensing`] operations: text, UTF-8
/// bytes, an already parsed tree, or nothing.
#[derive(Debug, Clone)]
pub enum ExpressionInput<'a> {
    /// No expression.
    Empty,
    /// Expression text.
    Text(&'a str),
    /// Expression text as bytes; must be UTF-8.
    Bytes(&'a [u8]),
    /// A parsed expression, returned as is.
    Parsed(Cow<'a, LicenseExpression>),
}

impl<'a> From<&'a str> for ExpressionInput<'a> {
    fn from(text: &'a str) -> Self {
        ExpressionInput::Text(text)
    }
}

impl<'a> From<&'a String> for ExpressionInput<'a> {
    fn from(text: &'a String) -> Self {
        ExpressionInput::Text(text)
    }
}

impl<'a> From<&'a [u8]> for ExpressionInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ExpressionInput::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for ExpressionInput<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        ExpressionInput::Bytes(bytes)
    }
}

impl<'a> From<&'a LicenseExpression> for ExpressionInput<'a> {
    fn from(expression: &'a LicenseExpression) -> Self {
        ExpressionInput::Parsed(Cow::Borrowed(expression))
    }
}

impl From<LicenseExpression> for ExpressionInput<'_> {
    fn from(expression: LicenseExpression) -> Self {
        ExpressionInput::Parsed(Cow::Owned(expression))
    }
}

impl<'a, T: Into<ExpressionInput<'a>>> From<Option<T>> for ExpressionInput<'a> {
    fn from(expression: Option<T>) -> Self {
        expression.map_or(ExpressionInput::Empty, Into::into)
    }
}

/// A registry of known license symbols and the entry point for parsing
/// and comparing license expressions.
///
/// The registry is validated on construction and never changes afterwards.
/// The multi-word tokenizer is built on first use and shared by every
/// later call, including calls from other threads.
///
/// # Example
///
/// ```rust
/// use license_expression::{Licensing, ParseOptions};
///
/// let licensing = Licensing::new(["GPL-2.0+", "Classpath", "BSD"]).unwrap();
/// let expr = licensing
///     .parse("GPL-2.0+ with Classpath or (bsd)", ParseOptions::default())
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(expr.render("{symbol.key}").unwrap(), "GPL-2.0+ WITH Classpath OR BSD");
/// assert!(licensing.is_equivalent("mit or bsd", "bsd OR mit").unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Licensing {
    known_symbols: HashMap<String, LicenseSymbol>,
    known_symbols_lowercase: HashMap<String, LicenseSymbol>,
    advanced_tokenizer: OnceCell<AdvancedTokenizer>,
    config: LicensingConfig,
}

impl Licensing {
    /// Creates a registry with the default configuration.
    ///
    /// Accepts [`LicenseSymbol`]s, [`LicenseSymbolLike`] adapters or key
    /// strings; blank strings are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidRegistry`] listing every problem
    /// found by [`validate_symbols`], or the error of the first string
    /// that is not a valid key.
    ///
    /// [`LicenseSymbolLike`]: crate::LicenseSymbolLike
    pub fn new<I>(symbols: I) -> LicenseResult<Self>
    where
        I: IntoIterator,
        I::Item: IntoLicenseSymbol,
    {
        Self::with_config(symbols, LicensingConfig::default())
    }

    /// Creates a registry with the given configuration.
    pub fn with_config<I>(symbols: I, config: LicensingConfig) -> LicenseResult<Self>
    where
        I: IntoIterator,
        I::Item: IntoLicenseSymbol,
    {
        let symbols = as_symbols(symbols)?;
        let report = validate_symbols(&symbols);

        if !config.quiet {
            for warning in &report.warnings {
                warn!(%warning, "license registry warning");
            }
            for error in &report.errors {
                warn!(%error, "license registry error");
            }
        }

        let refuse_warnings = config.warnings_as_errors && !report.warnings.is_empty();
        if !report.is_valid() || refuse_warnings {
            return Err(LicenseError::InvalidRegistry {
                errors: report.errors,
                warnings: report.warnings,
            });
        }

        let mut known_symbols = HashMap::with_capacity(symbols.len());
        let mut known_symbols_lowercase = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            known_symbols_lowercase.insert(symbol.key().to_lowercase(), symbol.clone());
            known_symbols.insert(symbol.key().to_string(), symbol);
        }
        debug!(symbols = known_symbols.len(), "license registry created");

        Ok(Self {
            known_symbols,
            known_symbols_lowercase,
            advanced_tokenizer: OnceCell::new(),
            config,
        })
    }

    /// Creates a registry from a JSON array of symbol records.
    ///
    /// ```rust
    /// use license_expression::Licensing;
    ///
    /// let licensing = Licensing::from_json(r#"[
    ///     {"key": "GPL-2.0", "aliases": ["GPL v2"]},
    ///     {"key": "Classpath-exception-2.0", "is_exception": true}
    /// ]"#).unwrap();
    /// assert_eq!(licensing.len(), 2);
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> LicenseResult<Self> {
        Self::from_json_with_config(json, LicensingConfig::default())
    }

    /// Creates a registry from a JSON array with the given configuration.
    #[cfg(feature = "serde")]
    pub fn from_json_with_config(json: &str, config: LicensingConfig) -> LicenseResult<Self> {
        let records: Vec<crate::symbol::SymbolRecord> = serde_json::from_str(json)
            .map_err(|e| LicenseError::RegistryDocument(e.to_string()))?;
        Self::with_config(records, config)
    }

    /// The configuration this registry was built with.
    pub fn config(&self) -> &LicensingConfig {
        &self.config
    }

    /// Looks up a known symbol by exact key.
    pub fn get(&self, key: &str) -> Option<&LicenseSymbol> {
        self.known_symbols.get(key)
    }

    /// True if `key` is a known key, with exact case.
    pub fn is_known_key(&self, key: &str) -> bool {
        self.known_symbols.contains_key(key)
    }

    /// Known keys, sorted.
    pub fn known_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.known_symbols.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of known symbols.
    pub fn len(&self) -> usize {
        self.known_symbols.len()
    }

    /// True if the registry has no symbols.
    pub fn is_empty(&self) -> bool {
        self.known_symbols.is_empty()
    }

    fn advanced_tokenizer(&self) -> LicenseResult<&AdvancedTokenizer> {
        self.advanced_tokenizer.get_or_try_init(|| {
            let tokenizer = AdvancedTokenizer::from_symbols(self.known_symbols.values())?;
            debug!(patterns = tokenizer.len(), "license expression tokenizer built");
            Ok(tokenizer)
        })
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    /// Parses an expression.
    ///
    /// Returns `Ok(None)` for no input or blank text, and a parsed tree
    /// unchanged. Known keys are matched ignoring case and replaced by the
    /// registered symbol; unknown keys keep their spelling.
    ///
    /// # Errors
    ///
    /// - [`LicenseError::Parse`] for malformed expressions or bytes that
    ///   are not UTF-8.
    /// - [`LicenseError::UnknownLicenseKeys`] with `validate` when keys are
    ///   missing from the registry.
    /// - [`LicenseError::InvalidKey`] for text that is not a valid key.
    ///
    /// # Example
    ///
    /// ```rust
    /// use license_expression::{Licensing, ParseOptions};
    ///
    /// let licensing = Licensing::default();
    /// let expr = licensing
    ///     .parse("GPL-2.0 or LGPL-2.1 and mit", ParseOptions::default())
    ///     .unwrap()
    ///     .unwrap();
    /// assert_eq!(expr.to_string(), "GPL-2.0 OR (LGPL-2.1 AND mit)");
    ///
    /// assert_eq!(licensing.parse("", ParseOptions::default()).unwrap(), None);
    /// assert_eq!(licensing.parse(None::<&str>, ParseOptions::default()).unwrap(), None);
    /// assert!(licensing.parse("mit and", ParseOptions::default()).is_err());
    /// ```
    pub fn parse<'a>(
        &self,
        expression: impl Into<ExpressionInput<'a>>,
        options: ParseOptions,
    ) -> LicenseResult<Option<LicenseExpression>> {
        let text = match expression.into() {
            ExpressionInput::Empty => return Ok(None),
            ExpressionInput::Parsed(expression) => return Ok(Some(expression.into_owned())),
            ExpressionInput::Text(text) => text,
            ExpressionInput::Bytes(bytes) => decode(bytes)?,
        };
        if text.trim().is_empty() {
            return Ok(None);
        }

        let tokens = self.tokenize_text(text, options)?;
        let expression = parse_tokens(&tokens)?;
        trace!(expression = text, tokens = tokens.len(), "parsed license expression");

        if options.validate {
            if let Some(ref parsed) = expression {
                let unknown = self.unknown_keys_of(parsed, true);
                if !unknown.is_empty() {
                    return Err(LicenseError::UnknownLicenseKeys { keys: unknown });
                }
            }
        }
        Ok(expression)
    }

    /// Tokenizes an expression into keywords and symbols.
    ///
    /// Only `simple` and `strict` of `options` apply. No input yields no
    /// tokens; a parsed tree is tokenized from its key rendering.
    ///
    /// ```rust
    /// use license_expression::{Licensing, ParseOptions, TokenKind};
    ///
    /// let licensing = Licensing::new(["GPL 2.0"]).unwrap();
    /// let tokens = licensing.tokenize("gpl 2.0 or mit", ParseOptions::default()).unwrap();
    /// let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
    /// assert_eq!(kinds, vec![TokenKind::Symbol, TokenKind::Or, TokenKind::Symbol]);
    /// assert_eq!(tokens[2].position, 11);
    /// ```
    pub fn tokenize<'a>(
        &self,
        expression: impl Into<ExpressionInput<'a>>,
        options: ParseOptions,
    ) -> LicenseResult<Vec<ExpressionToken>> {
        let text = match expression.into() {
            ExpressionInput::Empty => return Ok(Vec::new()),
            ExpressionInput::Text(text) => Cow::Borrowed(text),
            ExpressionInput::Bytes(bytes) => Cow::Borrowed(decode(bytes)?),
            ExpressionInput::Parsed(expression) => Cow::Owned(expression.to_string()),
        };
        self.tokenize_text(&text, options)
    }

    fn tokenize_text(&self, expression: &str, options: ParseOptions) -> LicenseResult<Vec<ExpressionToken>> {
        let raw = if options.simple {
            simple::tokenize(expression, &self.known_symbols_lowercase)?
        } else {
            self.advanced_tokenizer()?.tokenize(expression)?
        };
        tokenizer::finish(raw, options.strict)
    }

    fn parse_and_simplify<'a>(
        &self,
        expression: impl Into<ExpressionInput<'a>>,
    ) -> LicenseResult<Option<LicenseExpression>> {
        Ok(self
            .parse(expression, ParseOptions::default())?
            .map(|parsed| parsed.simplify()))
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// True if both expressions simplify to the same tree. Two empty
    /// expressions are equivalent.
    pub fn is_equivalent<'a, 'b>(
        &self,
        expression1: impl Into<ExpressionInput<'a>>,
        expression2: impl Into<ExpressionInput<'b>>,
    ) -> LicenseResult<bool> {
        let ex1 = self.parse_and_simplify(expression1)?;
        let ex2 = self.parse_and_simplify(expression2)?;
        Ok(ex1 == ex2)
    }

    /// True if the simplified `expression2` is found in the simplified
    /// `expression1`. False when either side is empty.
    ///
    /// ```rust
    /// use license_expression::Licensing;
    ///
    /// let licensing = Licensing::default();
    /// assert!(licensing.contains("mit or (bsd and gpl)", "gpl and bsd").unwrap());
    /// assert!(licensing.contains("gpl with classpath", "gpl").unwrap());
    /// assert!(!licensing.contains("mit", "mit or bsd").unwrap());
    /// ```
    pub fn contains<'a, 'b>(
        &self,
        expression1: impl Into<ExpressionInput<'a>>,
        expression2: impl Into<ExpressionInput<'b>>,
    ) -> LicenseResult<bool> {
        let ex1 = self.parse_and_simplify(expression1)?;
        let ex2 = self.parse_and_simplify(expression2)?;
        Ok(match (ex1, ex2) {
            (Some(ex1), Some(ex2)) => ex1.contains(&ex2),
            _ => false,
        })
    }

    // ========================================================================
    // Symbols and keys
    // ========================================================================

    /// Symbols of an expression in first-appearance order.
    ///
    /// With `decompose`, license-with-exception symbols are replaced by
    /// their license and exception. With `unique`, repeats are dropped.
    pub fn license_symbols<'a>(
        &self,
        expression: impl Into<ExpressionInput<'a>>,
        unique: bool,
        decompose: bool,
    ) -> LicenseResult<Vec<Symbol>> {
        Ok(match self.parse(expression, ParseOptions::default())? {
            Some(parsed) => symbols_of(&parsed, unique, decompose),
            None => Vec::new(),
        })
    }

    /// The first symbol of an expression.
    pub fn primary_license_symbol<'a>(
        &self,
        expression: impl Into<ExpressionInput<'a>>,
        decompose: bool,
    ) -> LicenseResult<Option<Symbol>> {
        Ok(self
            .license_symbols(expression, true, decompose)?
            .into_iter()
            .next())
    }

    /// The key of the first license of an expression.
    ///
    /// ```rust
    /// use license_expression::Licensing;
    ///
    /// let licensing = Licensing::default();
    /// let key = licensing.primary_license_key("gpl with classpath and mit").unwrap();
    /// assert_eq!(key.as_deref(), Some("gpl"));
    /// ```
    pub fn primary_license_key<'a>(
        &self,
        expression: impl Into<ExpressionInput<'a>>,
    ) -> LicenseResult<Option<String>> {
        Ok(self
            .primary_license_symbol(expression, true)?
            .map(|symbol| symbol.to_string()))
    }

    /// Keys of an expression in first-appearance order, license-with-exception
    /// symbols decomposed.
    ///
    /// ```rust
    /// use license_expression::Licensing;
    ///
    /// let licensing = Licensing::default();
    /// let keys = licensing.license_keys("mit or gpl with classpath and mit", true).unwrap();
    /// assert_eq!(keys, vec!["mit", "gpl", "classpath"]);
    /// ```
    pub fn license_keys<'a>(
        &self,
        expression: impl Into<ExpressionInput<'a>>,
        unique: bool,
    ) -> LicenseResult<Vec<String>> {
        let symbols = self.license_symbols(expression, false, true)?;
        Ok(keys_of(symbols.iter().flat_map(Symbol::decompose), unique))
    }

    /// Symbols of an expression whose key is not in the registry.
    pub fn unknown_license_symbols<'a>(
        &self,
        expression: impl Into<ExpressionInput<'a>>,
        unique: bool,
    ) -> LicenseResult<Vec<LicenseSymbol>> {
        Ok(self
            .license_symbols(expression, unique, true)?
            .iter()
            .flat_map(Symbol::decompose)
            .filter(|symbol| !self.is_known_key(symbol.key()))
            .cloned()
            .collect())
    }

    /// Keys of an expression that are not in the registry.
    pub fn unknown_license_keys<'a>(
        &self,
        expression: impl Into<ExpressionInput<'a>>,
        unique: bool,
    ) -> LicenseResult<Vec<String>> {
        Ok(match self.parse(expression, ParseOptions::default())? {
            Some(parsed) => self.unknown_keys_of(&parsed, unique),
            None => Vec::new(),
        })
    }

    fn unknown_keys_of(&self, expression: &LicenseExpression, unique: bool) -> Vec<String> {
        let symbols = symbols_of(expression, false, true);
        let unknown = symbols
            .iter()
            .flat_map(Symbol::decompose)
            .filter(|symbol| !self.is_known_key(symbol.key()));
        keys_of(unknown, unique)
    }
}

fn decode(bytes: &[u8]) -> LicenseResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| {
        ParseError::new(ParseErrorCode::ExpressionNotUnicode)
            .at_position(e.valid_up_to())
            .into()
    })
}

fn symbols_of(expression: &LicenseExpression, unique: bool, decompose: bool) -> Vec<Symbol> {
    let symbols = expression.literals().into_iter().flat_map(|symbol| {
        if decompose {
            symbol
                .decompose()
                .into_iter()
                .map(|s| Symbol::License(s.clone()))
                .collect()
        } else {
            vec![symbol.clone()]
        }
    });

    if unique {
        let mut seen = HashSet::new();
        symbols.filter(|symbol| seen.insert(symbol.clone())).collect()
    } else {
        symbols.collect()
    }
}

fn keys_of<'a>(symbols: impl Iterator<Item = &'a LicenseSymbol>, unique: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    symbols
        .map(|symbol| symbol.key())
        .filter(|key| !unique || seen.insert(*key))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(licensing: &Licensing, text: &str) -> LicenseExpression {
        licensing.parse(text, ParseOptions::default()).unwrap().unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn test_default_is_empty() {
            let licensing = Licensing::default();
            assert!(licensing.is_empty());
            assert!(licensing.config().quiet);
        }

        #[test]
        fn test_blank_strings_are_skipped() {
            let licensing = Licensing::new(["mit", " ", "", "bsd"]).unwrap();
            assert_eq!(licensing.known_keys(), vec!["bsd", "mit"]);
        }

        #[test]
        fn test_case_duplicates_are_refused() {
            let err = Licensing::new(["MIT", "mit"]).unwrap_err();
            assert!(matches!(err, LicenseError::InvalidRegistry { ref errors, .. } if errors.len() == 1));
        }

        #[test]
        fn test_invalid_key_string() {
            let err = Licensing::new(["mit", "or"]).unwrap_err();
            assert!(matches!(err, LicenseError::InvalidKey { .. }));
        }

        #[test]
        fn test_warnings_as_errors() {
            let symbols = [LicenseSymbol::new("mit").unwrap().with_aliases(["expat", "EXPAT"])];
            assert!(Licensing::new(symbols.clone()).is_ok());

            let config = LicensingConfig::builder()
                .with_quiet(false)
                .with_warnings_as_errors(true)
                .build();
            let err = Licensing::with_config(symbols, config).unwrap_err();
            match err {
                LicenseError::InvalidRegistry { errors, warnings } => {
                    assert!(errors.is_empty());
                    assert_eq!(warnings.len(), 1);
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        #[test]
        fn test_is_send_and_sync() {
            fn assert_send_sync<T: Send + Sync>() {}
            assert_send_sync::<Licensing>();
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn test_registered_keys_are_canonical() {
            let licensing = Licensing::new(["MIT", "Apache-2.0"]).unwrap();
            let expr = parse(&licensing, "mit or APACHE-2.0");
            assert_eq!(expr.to_string(), "MIT OR Apache-2.0");
        }

        #[test]
        fn test_aliases_resolve_in_advanced_mode() {
            let symbols = [LicenseSymbol::new("Apache-2.0")
                .unwrap()
                .with_aliases(["Apache License 2.0"])];
            let licensing = Licensing::new(symbols).unwrap();
            let expr = parse(&licensing, "apache license 2.0 and mit");
            assert_eq!(expr.to_string(), "Apache-2.0 AND mit");
        }

        #[test]
        fn test_unregistered_multi_word_names_fuse() {
            let licensing = Licensing::default();
            let expr = parse(&licensing, "gnu  general public license or mit");
            assert_eq!(expr.to_string(), "gnu general public license OR mit");

            let err = licensing
                .parse("gnu general or", ParseOptions::new().with_simple(true))
                .unwrap_err();
            assert_eq!(err.parse_code(), Some(ParseErrorCode::InvalidSymbolSequence));
        }

        #[test]
        fn test_parsed_tree_passes_through() {
            let licensing = Licensing::default();
            let expr = parse(&licensing, "mit and bsd");
            let again = licensing.parse(&expr, ParseOptions::default()).unwrap();
            assert_eq!(again, Some(expr.clone()));
            let again = licensing.parse(expr.clone(), ParseOptions::default()).unwrap();
            assert_eq!(again, Some(expr));
        }

        #[test]
        fn test_bytes() {
            let licensing = Licensing::default();
            let expr = licensing.parse(b"mit or bsd", ParseOptions::default()).unwrap();
            assert_eq!(expr.unwrap().to_string(), "mit OR bsd");

            let err = licensing
                .parse(&[b'm', 0xff, 0xfe][..], ParseOptions::default())
                .unwrap_err();
            assert_eq!(err.parse_code(), Some(ParseErrorCode::ExpressionNotUnicode));
        }

        #[test]
        fn test_blank_input() {
            let licensing = Licensing::default();
            assert_eq!(licensing.parse("  \t ", ParseOptions::default()).unwrap(), None);
        }

        #[test]
        fn test_validate_lists_every_unknown_key() {
            let licensing = Licensing::new(["mit"]).unwrap();
            let options = ParseOptions::new().with_validate(true);
            assert!(licensing.parse("MIT", options).is_ok());

            let err = licensing
                .parse("foo and mit or bar with baz", options)
                .unwrap_err();
            assert_eq!(
                err,
                LicenseError::UnknownLicenseKeys {
                    keys: vec!["foo".to_string(), "bar".to_string(), "baz".to_string()]
                }
            );
        }

        #[test]
        fn test_strict_mode() {
            let symbols = [
                LicenseSymbol::new("GPL-2.0").unwrap(),
                LicenseSymbol::exception("Classpath").unwrap(),
            ];
            let licensing = Licensing::new(symbols).unwrap();
            let strict = ParseOptions::new().with_strict(true);

            assert!(licensing.parse("gpl-2.0 with classpath", strict).is_ok());

            let err = licensing.parse("classpath or gpl-2.0", strict).unwrap_err();
            assert_eq!(err.parse_code(), Some(ParseErrorCode::InvalidException));

            let err = licensing.parse("gpl-2.0 with mit", strict).unwrap_err();
            assert_eq!(err.parse_code(), Some(ParseErrorCode::InvalidSymbolAsException));

            assert!(licensing.parse("classpath or gpl-2.0", ParseOptions::default()).is_ok());
        }

        #[test]
        fn test_with_validity() {
            let licensing = Licensing::default();
            let expr = parse(&licensing, "A WITH B");
            let pair = expr.as_symbol().and_then(Symbol::as_with_exception).unwrap();
            assert_eq!(pair.license_symbol().key(), "A");
            assert_eq!(pair.exception_symbol().key(), "B");

            for bad in ["WITH", "A WITH", "WITH B", "A WITH WITH B"] {
                let err = licensing.parse(bad, ParseOptions::default()).unwrap_err();
                assert!(err.parse_code().is_some(), "{bad} did not fail to parse");
            }
        }

        #[test]
        fn test_tokenizer_is_built_once() {
            let licensing = Licensing::new(["mit"]).unwrap();
            assert!(licensing.advanced_tokenizer.get().is_none());
            parse(&licensing, "mit");
            let first = licensing.advanced_tokenizer.get().map(|t| t as *const _);
            parse(&licensing, "mit or bsd");
            let second = licensing.advanced_tokenizer.get().map(|t| t as *const _);
            assert!(first.is_some());
            assert_eq!(first, second);
        }

        #[test]
        fn test_tokenize_accepts_every_input() {
            let licensing = Licensing::default();
            let options = ParseOptions::default();
            let strings = |tokens: Vec<ExpressionToken>| -> Vec<String> {
                tokens.into_iter().map(|t| t.string).collect()
            };

            let from_text = strings(licensing.tokenize("mit or bsd", options).unwrap());
            let from_bytes = strings(licensing.tokenize(b"mit or bsd", options).unwrap());
            let tree = parse(&licensing, "mit or bsd");
            let from_tree = strings(licensing.tokenize(&tree, options).unwrap());
            assert_eq!(from_text, vec!["mit", "or", "bsd"]);
            assert_eq!(from_bytes, from_text);
            assert_eq!(from_tree, vec!["mit", "OR", "bsd"]);

            assert!(licensing.tokenize(None::<&str>, options).unwrap().is_empty());
            let err = licensing.tokenize(&b"mit \xff"[..], options).unwrap_err();
            assert_eq!(err.parse_code(), Some(ParseErrorCode::ExpressionNotUnicode));
        }
    }

    mod queries {
        use super::*;

        #[test]
        fn test_license_symbols_options() {
            let licensing = Licensing::default();
            let text = "gpl with classpath or mit and gpl with classpath";

            let all = licensing.license_symbols(text, false, false).unwrap();
            assert_eq!(all.len(), 3);

            let unique = licensing.license_symbols(text, true, false).unwrap();
            let names: Vec<String> = unique.iter().map(|s| s.to_string()).collect();
            assert_eq!(names, vec!["gpl WITH classpath", "mit"]);

            let decomposed = licensing.license_symbols(text, true, true).unwrap();
            let names: Vec<String> = decomposed.iter().map(|s| s.to_string()).collect();
            assert_eq!(names, vec!["gpl", "classpath", "mit"]);
        }

        #[test]
        fn test_primary_license() {
            let licensing = Licensing::default();
            let primary = licensing
                .primary_license_symbol("gpl with classpath or mit", false)
                .unwrap()
                .unwrap();
            assert_eq!(primary.to_string(), "gpl WITH classpath");
            assert_eq!(licensing.primary_license_key("").unwrap(), None);
        }

        #[test]
        fn test_license_keys_without_unique() {
            let licensing = Licensing::default();
            let keys = licensing.license_keys("mit and mit", false).unwrap();
            assert_eq!(keys, vec!["mit", "mit"]);
        }

        #[test]
        fn test_unknown_symbols() {
            let licensing = Licensing::new(["mit"]).unwrap();
            let unknown = licensing
                .unknown_license_symbols("MIT or bsd or gpl with bsd", true)
                .unwrap();
            let keys: Vec<_> = unknown.iter().map(|s| s.key()).collect();
            assert_eq!(keys, vec!["bsd", "gpl"]);

            let keys = licensing
                .unknown_license_keys("MIT or bsd or gpl with bsd", false)
                .unwrap();
            assert_eq!(keys, vec!["bsd", "gpl", "bsd"]);
        }

        #[test]
        fn test_equivalence_and_containment() {
            let licensing = Licensing::default();
            assert!(licensing.is_equivalent("mit and (bsd or mit)", "mit").unwrap());
            assert!(licensing.is_equivalent("", None::<&str>).unwrap());
            assert!(!licensing.is_equivalent("mit", "bsd").unwrap());

            assert!(licensing.contains("a or b or c", "c or a").unwrap());
            assert!(!licensing.contains("a or b", "").unwrap());
            assert!(!licensing.contains("", "a").unwrap());
        }
    }
}
