//! License symbols: the leaves of a license expression.
//!
//! - [`LicenseSymbol`] is one license or exception identifier.
//! - [`LicenseSymbolLike`] adapts a caller type implementing [`SymbolLike`].
//! - [`LicenseWithExceptionSymbol`] pairs a license with an exception, as
//!   written `GPL-2.0 WITH Classpath-exception`.
//! - [`Symbol`] is either of the two leaf kinds found in an expression tree.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{LicenseError, LicenseResult};
use crate::template::Template;
use crate::tokenizer::Keyword;

/// A caller-defined type that can stand in for a license symbol.
///
/// Only `key` and `is_exception` are required. Implementors may expose
/// aliases, extra template attributes, or render themselves.
///
/// # Example
///
/// ```rust
/// use license_expression::{LicenseSymbolLike, SymbolLike};
///
/// #[derive(Debug)]
/// struct DbLicense {
///     key: String,
///     url: String,
/// }
///
/// impl SymbolLike for DbLicense {
///     fn key(&self) -> &str {
///         &self.key
///     }
///
///     fn is_exception(&self) -> bool {
///         false
///     }
///
///     fn attribute(&self, name: &str) -> Option<String> {
///         (name == "url").then(|| self.url.clone())
///     }
/// }
///
/// let symbol = LicenseSymbolLike::new(DbLicense {
///     key: "mit".to_string(),
///     url: "https://example.com/mit".to_string(),
/// })
/// .unwrap()
/// .into_symbol();
///
/// assert_eq!(symbol.render("{symbol.key}: {symbol.url}").unwrap(), "mit: https://example.com/mit");
/// ```
pub trait SymbolLike: fmt::Debug + Send + Sync {
    /// The symbol key.
    fn key(&self) -> &str;

    /// Whether this symbol is a license exception.
    fn is_exception(&self) -> bool;

    /// Alternate spellings of the key.
    fn aliases(&self) -> Vec<String> {
        Vec::new()
    }

    /// An extra attribute available to templates as `{symbol.<name>}`.
    fn attribute(&self, _name: &str) -> Option<String> {
        None
    }

    /// Renders this symbol; `None` falls back to template substitution.
    fn render(&self, _template: &Template) -> Option<String> {
        None
    }
}

/// Validates and normalizes a license key.
///
/// The key is trimmed, checked for allowed characters and reserved
/// keywords, and internal whitespace runs are collapsed to one space.
pub(crate) fn normalize_key(key: &str) -> LicenseResult<String> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(LicenseError::InvalidKey {
            key: key.to_string(),
            reason: "a license key cannot be empty or blank",
        });
    }
    if !trimmed.chars().all(is_valid_key_char) {
        return Err(LicenseError::InvalidKey {
            key: key.to_string(),
            reason: "the valid characters are: letters and numbers, underscore, dot, colon, \
                     plus or hyphen signs and spaces",
        });
    }
    let normalized = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    if Keyword::is_reserved(&normalized) {
        return Err(LicenseError::InvalidKey {
            key: key.to_string(),
            reason: "a key cannot be a reserved keyword: \"or\", \"and\" or \"with\"",
        });
    }
    Ok(normalized)
}

fn is_valid_key_char(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '.' | ':' | '-' | '+')
}

/// A license (or license exception) as used in a license expression.
///
/// Two symbols are equal when their keys and `is_exception` flags are
/// equal; aliases and any wrapped value do not take part in equality.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SymbolRecord", into = "SymbolRecord")
)]
pub struct LicenseSymbol {
    key: String,
    aliases: Vec<String>,
    is_exception: bool,
    wrapped: Option<Arc<dyn SymbolLike>>,
}

impl LicenseSymbol {
    /// Creates a license symbol.
    ///
    /// # Errors
    ///
    /// Fails if the key is blank, contains characters other than letters,
    /// digits, whitespace, `_`, `.`, `:`, `+` or `-`, or is a reserved
    /// keyword.
    ///
    /// # Example
    ///
    /// ```rust
    /// use license_expression::LicenseSymbol;
    ///
    /// let gpl = LicenseSymbol::new("  GNU   GPL 2.0 ").unwrap();
    /// assert_eq!(gpl.key(), "GNU GPL 2.0");
    ///
    /// assert!(LicenseSymbol::new("or").is_err());
    /// assert!(LicenseSymbol::new("mit/x11").is_err());
    /// ```
    pub fn new(key: impl AsRef<str>) -> LicenseResult<Self> {
        Ok(Self {
            key: normalize_key(key.as_ref())?,
            aliases: Vec::new(),
            is_exception: false,
            wrapped: None,
        })
    }

    /// Creates a license exception symbol.
    pub fn exception(key: impl AsRef<str>) -> LicenseResult<Self> {
        Ok(Self::new(key)?.with_exception(true))
    }

    /// Sets the aliases of this symbol.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether this symbol is a license exception.
    pub fn with_exception(mut self, is_exception: bool) -> Self {
        self.is_exception = is_exception;
        self
    }

    /// The normalized key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Alternate spellings of the key.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Whether this symbol is a license exception.
    pub fn is_exception(&self) -> bool {
        self.is_exception
    }

    /// The caller value this symbol was adapted from, if any.
    pub fn wrapped(&self) -> Option<&Arc<dyn SymbolLike>> {
        self.wrapped.as_ref()
    }

    /// Yields this symbol; the uniform counterpart of
    /// [`LicenseWithExceptionSymbol::decompose`].
    pub fn decompose(&self) -> impl Iterator<Item = &LicenseSymbol> {
        std::iter::once(self)
    }

    /// Looks up a template attribute.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "key" => Some(self.key.clone()),
            "aliases" => Some(self.aliases.join(", ")),
            "is_exception" => Some(self.is_exception.to_string()),
            _ => self.wrapped.as_ref().and_then(|w| w.attribute(name)),
        }
    }

    /// Renders this symbol with a template string.
    pub fn render(&self, template: &str) -> LicenseResult<String> {
        self.render_with(&Template::new(template)?)
    }

    /// Renders this symbol with a parsed template, delegating to the wrapped
    /// value when it renders itself.
    pub fn render_with(&self, template: &Template) -> LicenseResult<String> {
        if let Some(rendered) = self.wrapped.as_ref().and_then(|w| w.render(template)) {
            return Ok(rendered);
        }
        template.render_symbol(self)
    }
}

impl PartialEq for LicenseSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.is_exception == other.is_exception
    }
}

impl Eq for LicenseSymbol {}

impl Hash for LicenseSymbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.is_exception.hash(state);
    }
}

impl PartialOrd for LicenseSymbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LicenseSymbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.is_exception.cmp(&other.is_exception))
    }
}

impl fmt::Display for LicenseSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl SymbolLike for LicenseSymbol {
    fn key(&self) -> &str {
        &self.key
    }

    fn is_exception(&self) -> bool {
        self.is_exception
    }

    fn aliases(&self) -> Vec<String> {
        self.aliases.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        LicenseSymbol::attribute(self, name)
    }
}

impl TryFrom<&str> for LicenseSymbol {
    type Error = LicenseError;

    fn try_from(key: &str) -> Result<Self, Self::Error> {
        LicenseSymbol::new(key)
    }
}

impl TryFrom<String> for LicenseSymbol {
    type Error = LicenseError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        LicenseSymbol::new(key)
    }
}

/// Adapts a caller value implementing [`SymbolLike`] to a license symbol.
///
/// The key, aliases and exception flag are copied at construction time; the
/// wrapped value is kept for rendering and template attributes.
pub struct LicenseSymbolLike<T: SymbolLike + 'static> {
    wrapped: Arc<T>,
    key: String,
    aliases: Vec<String>,
    is_exception: bool,
}

impl<T: SymbolLike + 'static> LicenseSymbolLike<T> {
    /// Wraps a symbol-like value.
    ///
    /// # Errors
    ///
    /// Fails if the wrapped key is not a valid license key.
    pub fn new(wrapped: T) -> LicenseResult<Self> {
        Self::from_arc(Arc::new(wrapped))
    }

    /// Wraps a shared symbol-like value.
    pub fn from_arc(wrapped: Arc<T>) -> LicenseResult<Self> {
        let key = normalize_key(wrapped.key())?;
        let aliases = wrapped.aliases();
        let is_exception = wrapped.is_exception();
        Ok(Self {
            wrapped,
            key,
            aliases,
            is_exception,
        })
    }

    /// The wrapped value.
    pub fn wrapped(&self) -> &T {
        &self.wrapped
    }

    /// The normalized key snapshot.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The aliases snapshot.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The exception flag snapshot.
    pub fn is_exception(&self) -> bool {
        self.is_exception
    }

    /// Converts into an expression leaf that remembers the wrapped value.
    pub fn into_symbol(self) -> LicenseSymbol {
        let wrapped: Arc<dyn SymbolLike> = self.wrapped;
        LicenseSymbol {
            key: self.key,
            aliases: self.aliases,
            is_exception: self.is_exception,
            wrapped: Some(wrapped),
        }
    }
}

impl<T: SymbolLike + 'static> Clone for LicenseSymbolLike<T> {
    fn clone(&self) -> Self {
        Self {
            wrapped: Arc::clone(&self.wrapped),
            key: self.key.clone(),
            aliases: self.aliases.clone(),
            is_exception: self.is_exception,
        }
    }
}

impl<T: SymbolLike + 'static> fmt::Debug for LicenseSymbolLike<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LicenseSymbolLike")
            .field("key", &self.key)
            .field("aliases", &self.aliases)
            .field("is_exception", &self.is_exception)
            .field("wrapped", &self.wrapped)
            .finish()
    }
}

impl<T: SymbolLike + 'static> From<LicenseSymbolLike<T>> for LicenseSymbol {
    fn from(like: LicenseSymbolLike<T>) -> Self {
        like.into_symbol()
    }
}

/// A license paired with an exception: `license WITH exception`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LicenseWithExceptionSymbol {
    license_symbol: LicenseSymbol,
    exception_symbol: LicenseSymbol,
}

impl LicenseWithExceptionSymbol {
    /// Pairs a license with an exception.
    ///
    /// # Errors
    ///
    /// With `strict`, fails if `license_symbol` is an exception or
    /// `exception_symbol` is not.
    pub fn new(
        license_symbol: LicenseSymbol,
        exception_symbol: LicenseSymbol,
        strict: bool,
    ) -> LicenseResult<Self> {
        if strict && license_symbol.is_exception() {
            return Err(LicenseError::InvalidWithException(format!(
                "license_symbol cannot be an exception with \"is_exception\" set to true: {}",
                license_symbol.key()
            )));
        }
        if strict && !exception_symbol.is_exception() {
            return Err(LicenseError::InvalidWithException(format!(
                "exception_symbol must be an exception with \"is_exception\" set to true: {}",
                exception_symbol.key()
            )));
        }
        Ok(Self {
            license_symbol,
            exception_symbol,
        })
    }

    /// The left-hand license.
    pub fn license_symbol(&self) -> &LicenseSymbol {
        &self.license_symbol
    }

    /// The right-hand exception.
    pub fn exception_symbol(&self) -> &LicenseSymbol {
        &self.exception_symbol
    }

    /// Yields the license then the exception.
    pub fn decompose(&self) -> impl Iterator<Item = &LicenseSymbol> {
        [&self.license_symbol, &self.exception_symbol].into_iter()
    }

    /// Renders `license WITH exception`, each member through `template`,
    /// optionally wrapped in parentheses.
    pub fn render_with(&self, template: &Template, wrap_with_in_parens: bool) -> LicenseResult<String> {
        let lic = self.license_symbol.render_with(template)?;
        let exc = self.exception_symbol.render_with(template)?;
        Ok(if wrap_with_in_parens {
            format!("({} WITH {})", lic, exc)
        } else {
            format!("{} WITH {}", lic, exc)
        })
    }
}

impl fmt::Display for LicenseWithExceptionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} WITH {}", self.license_symbol.key(), self.exception_symbol.key())
    }
}

/// A leaf of a license expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbol {
    /// A plain license or exception.
    License(LicenseSymbol),
    /// A `license WITH exception` pair.
    WithException(LicenseWithExceptionSymbol),
}

impl Symbol {
    /// Yields the underlying license symbols.
    pub fn decompose(&self) -> Vec<&LicenseSymbol> {
        match self {
            Symbol::License(s) => s.decompose().collect(),
            Symbol::WithException(s) => s.decompose().collect(),
        }
    }

    /// Returns the plain license symbol, if this is one.
    pub fn as_license(&self) -> Option<&LicenseSymbol> {
        match self {
            Symbol::License(s) => Some(s),
            Symbol::WithException(_) => None,
        }
    }

    /// Returns the license-with-exception pair, if this is one.
    pub fn as_with_exception(&self) -> Option<&LicenseWithExceptionSymbol> {
        match self {
            Symbol::WithException(s) => Some(s),
            Symbol::License(_) => None,
        }
    }

    /// True if `other` equals this symbol or one of its members.
    pub fn contains(&self, other: &Symbol) -> bool {
        if self == other {
            return true;
        }
        match other {
            Symbol::License(theirs) => self.decompose().into_iter().any(|mine| mine == theirs),
            Symbol::WithException(_) => false,
        }
    }

    /// Renders this symbol through `template`.
    pub fn render_with(&self, template: &Template, wrap_with_in_parens: bool) -> LicenseResult<String> {
        match self {
            Symbol::License(s) => s.render_with(template),
            Symbol::WithException(s) => s.render_with(template, wrap_with_in_parens),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Symbol::License(_) => 0,
            Symbol::WithException(_) => 1,
        }
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Symbols order by their string form; ties fall back to structure so the
/// order agrees with equality.
impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string()
            .cmp(&other.to_string())
            .then_with(|| self.rank().cmp(&other.rank()))
            .then_with(|| match (self, other) {
                (Symbol::License(a), Symbol::License(b)) => a.cmp(b),
                (Symbol::WithException(a), Symbol::WithException(b)) => a
                    .license_symbol
                    .cmp(&b.license_symbol)
                    .then_with(|| a.exception_symbol.cmp(&b.exception_symbol)),
                _ => Ordering::Equal,
            })
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::License(s) => s.fmt(f),
            Symbol::WithException(s) => s.fmt(f),
        }
    }
}

impl From<LicenseSymbol> for Symbol {
    fn from(symbol: LicenseSymbol) -> Self {
        Symbol::License(symbol)
    }
}

impl From<LicenseWithExceptionSymbol> for Symbol {
    fn from(symbol: LicenseWithExceptionSymbol) -> Self {
        Symbol::WithException(symbol)
    }
}

/// A serializable symbol definition, as found in registry documents.
///
/// ```json
/// {"key": "GPL-2.0", "aliases": ["GPLv2"], "is_exception": false}
/// ```
#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SymbolRecord {
    /// The license key.
    pub key: String,
    /// Alternate spellings.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Whether this is a license exception.
    #[serde(default)]
    pub is_exception: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<SymbolRecord> for LicenseSymbol {
    type Error = LicenseError;

    fn try_from(record: SymbolRecord) -> Result<Self, Self::Error> {
        Ok(LicenseSymbol::new(&record.key)?
            .with_aliases(record.aliases)
            .with_exception(record.is_exception))
    }
}

#[cfg(feature = "serde")]
impl From<LicenseSymbol> for SymbolRecord {
    fn from(symbol: LicenseSymbol) -> Self {
        SymbolRecord {
            key: symbol.key,
            aliases: symbol.aliases,
            is_exception: symbol.is_exception,
        }
    }
}

/// Conversion of registry inputs into license symbols.
///
/// Bare strings become plain symbols; blank strings are skipped.
pub trait IntoLicenseSymbol {
    /// Converts into a symbol, or `None` for an input to skip.
    fn into_license_symbol(self) -> LicenseResult<Option<LicenseSymbol>>;
}

impl IntoLicenseSymbol for LicenseSymbol {
    fn into_license_symbol(self) -> LicenseResult<Option<LicenseSymbol>> {
        Ok(Some(self))
    }
}

impl IntoLicenseSymbol for &LicenseSymbol {
    fn into_license_symbol(self) -> LicenseResult<Option<LicenseSymbol>> {
        Ok(Some(self.clone()))
    }
}

impl IntoLicenseSymbol for &str {
    fn into_license_symbol(self) -> LicenseResult<Option<LicenseSymbol>> {
        if self.trim().is_empty() {
            return Ok(None);
        }
        LicenseSymbol::new(self).map(Some)
    }
}

impl IntoLicenseSymbol for String {
    fn into_license_symbol(self) -> LicenseResult<Option<LicenseSymbol>> {
        self.as_str().into_license_symbol()
    }
}

impl IntoLicenseSymbol for &String {
    fn into_license_symbol(self) -> LicenseResult<Option<LicenseSymbol>> {
        self.as_str().into_license_symbol()
    }
}

impl<T: SymbolLike + 'static> IntoLicenseSymbol for LicenseSymbolLike<T> {
    fn into_license_symbol(self) -> LicenseResult<Option<LicenseSymbol>> {
        Ok(Some(self.into_symbol()))
    }
}

#[cfg(feature = "serde")]
impl IntoLicenseSymbol for SymbolRecord {
    fn into_license_symbol(self) -> LicenseResult<Option<LicenseSymbol>> {
        LicenseSymbol::try_from(self).map(Some)
    }
}

/// Converts registry inputs into symbols, skipping blank strings.
pub(crate) fn as_symbols<I>(symbols: I) -> LicenseResult<Vec<LicenseSymbol>>
where
    I: IntoIterator,
    I::Item: IntoLicenseSymbol,
{
    let mut out = Vec::new();
    for symbol in symbols {
        if let Some(symbol) = symbol.into_license_symbol()? {
            out.push(symbol);
        }
    }
    Ok(out)
}
