//! Symbol rendering templates.
//!
//! A template is plain text with `{symbol...}` placeholders that are
//! substituted once per rendered symbol:
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `{symbol}` | the symbol key |
//! | `{symbol.key}` | the symbol key |
//! | `{symbol.aliases}` | aliases joined with `, ` |
//! | `{symbol.is_exception}` | `true` or `false` |
//! | `{symbol.<name>}` | an extra attribute exposed by a wrapped [`SymbolLike`] |
//!
//! `{{` and `}}` render literal braces.
//!
//! [`SymbolLike`]: crate::SymbolLike

use std::fmt;
use std::str::FromStr;

use crate::error::{LicenseError, LicenseResult};
use crate::symbol::LicenseSymbol;

/// The template used when none is given: renders symbol keys.
pub const DEFAULT_TEMPLATE: &str = "{symbol.key}";

const VARIABLE: &str = "symbol";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    /// `None` is the bare `{symbol}` placeholder.
    Placeholder(Option<String>),
}

/// A parsed rendering template.
///
/// # Example
///
/// ```rust
/// use license_expression::{LicenseSymbol, Template};
///
/// let template = Template::new("<a href=\"/licenses/{symbol.key}\">{symbol.key}</a>").unwrap();
/// let symbol = LicenseSymbol::new("MIT").unwrap();
/// assert_eq!(
///     symbol.render_with(&template).unwrap(),
///     "<a href=\"/licenses/MIT\">MIT</a>"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    parts: Vec<Part>,
}

impl Template {
    /// Parses a template.
    pub fn new(source: &str) -> LicenseResult<Self> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(template_error(source, "single '}' encountered")),
                '{' => {
                    let mut field = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        field.push(c);
                    }
                    if !closed {
                        return Err(template_error(source, "single '{' encountered"));
                    }
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(Part::Placeholder(parse_field(source, field.trim())?));
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    /// Returns the template source text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Renders one symbol through this template.
    pub(crate) fn render_symbol(&self, symbol: &LicenseSymbol) -> LicenseResult<String> {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Placeholder(None) => out.push_str(symbol.key()),
                Part::Placeholder(Some(attribute)) => match symbol.attribute(attribute) {
                    Some(value) => out.push_str(&value),
                    None => {
                        return Err(template_error(
                            &self.source,
                            &format!("symbol {:?} has no attribute {:?}", symbol.key(), attribute),
                        ))
                    }
                },
            }
        }
        Ok(out)
    }
}

impl Default for Template {
    fn default() -> Self {
        Self {
            source: DEFAULT_TEMPLATE.to_string(),
            parts: vec![Part::Placeholder(Some("key".to_string()))],
        }
    }
}

impl FromStr for Template {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::new(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_field(source: &str, field: &str) -> LicenseResult<Option<String>> {
    if field == VARIABLE {
        return Ok(None);
    }
    match field.strip_prefix(VARIABLE).and_then(|rest| rest.strip_prefix('.')) {
        Some(attribute)
            if !attribute.is_empty()
                && attribute.chars().all(|c| c.is_alphanumeric() || c == '_') =>
        {
            Ok(Some(attribute.to_string()))
        }
        _ => Err(template_error(
            source,
            &format!("unknown template variable {:?}", field),
        )),
    }
}

fn template_error(source: &str, reason: &str) -> LicenseError {
    LicenseError::Template {
        template: source.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mit() -> LicenseSymbol {
        LicenseSymbol::new("MIT")
            .unwrap()
            .with_aliases(["Expat", "MIT License"])
    }

    #[test]
    fn test_default_template_renders_key() {
        assert_eq!(Template::default().render_symbol(&mit()).unwrap(), "MIT");
        assert_eq!(Template::default().as_str(), DEFAULT_TEMPLATE);
        assert_eq!(Template::new(DEFAULT_TEMPLATE).unwrap(), Template::default());
    }

    #[test]
    fn test_builtin_attributes() {
        let template = Template::new("{symbol} [{symbol.aliases}] {symbol.is_exception}").unwrap();
        assert_eq!(
            template.render_symbol(&mit()).unwrap(),
            "MIT [Expat, MIT License] false"
        );
    }

    #[test]
    fn test_escaped_braces() {
        let template = Template::new("{{{symbol.key}}}").unwrap();
        assert_eq!(template.render_symbol(&mit()).unwrap(), "{MIT}");
    }

    #[test]
    fn test_unknown_attribute_is_an_error() {
        let template = Template::new("{symbol.url}").unwrap();
        let err = template.render_symbol(&mit()).unwrap_err();
        assert!(matches!(err, LicenseError::Template { .. }));
    }

    #[test]
    fn test_malformed_templates() {
        assert!(Template::new("{symbol.key").is_err());
        assert!(Template::new("symbol.key}").is_err());
        assert!(Template::new("{license.key}").is_err());
        assert!(Template::new("{symbol.}").is_err());
        assert!(Template::new("{symbol.a.b}").is_err());
    }

    #[test]
    fn test_from_str() {
        let template: Template = "<{symbol.key}>".parse().unwrap();
        assert_eq!(template.render_symbol(&mit()).unwrap(), "<MIT>");
        assert_eq!(template.to_string(), "<{symbol.key}>");
    }
}
