//! Expression tokenizers.
//!
//! Two strategies produce raw tokens from an expression string:
//!
//! - [`simple`]: a nom splitter on parentheses and whitespace. Every other
//!   run of characters is one keyword or one symbol.
//! - [`automaton`]: an Aho-Corasick automaton over the registered keys and
//!   aliases, able to recognize multi-word license names.
//!
//! Both feed the same post-passes in [`finish`]: contiguous unmatched text is
//! fused into one symbol, whitespace is dropped, and `symbol WITH symbol`
//! triples are fused into a [`LicenseWithExceptionSymbol`].

use std::collections::VecDeque;
use std::fmt;

use crate::error::{LicenseResult, ParseError, ParseErrorCode};
use crate::symbol::{LicenseSymbol, LicenseWithExceptionSymbol, Symbol};

pub(crate) mod automaton;
pub(crate) mod simple;

/// Reserved words and punctuation of the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Keyword {
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `WITH`
    With,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
}

impl Keyword {
    /// Every keyword.
    pub const ALL: [Keyword; 5] = [
        Keyword::And,
        Keyword::Or,
        Keyword::With,
        Keyword::LeftParen,
        Keyword::RightParen,
    ];

    /// Canonical spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::With => "WITH",
            Keyword::LeftParen => "(",
            Keyword::RightParen => ")",
        }
    }

    /// Recognizes a keyword, ignoring case.
    pub fn from_word(word: &str) -> Option<Keyword> {
        Keyword::ALL
            .into_iter()
            .find(|kw| kw.as_str().eq_ignore_ascii_case(word))
    }

    /// True if `text`, trimmed, is a keyword in any case.
    pub fn is_reserved(text: &str) -> bool {
        Keyword::from_word(text.trim()).is_some()
    }

    /// The token kind of this keyword.
    pub fn kind(self) -> TokenKind {
        match self {
            Keyword::And => TokenKind::And,
            Keyword::Or => TokenKind::Or,
            Keyword::With => TokenKind::With,
            Keyword::LeftParen => TokenKind::LeftParen,
            Keyword::RightParen => TokenKind::RightParen,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of expression tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// A license symbol or license-with-exception.
    Symbol,
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `WITH`
    With,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
}

/// What a token stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    /// A keyword.
    Keyword(Keyword),
    /// A resolved symbol.
    Symbol(Symbol),
}

impl TokenValue {
    /// The kind of this value.
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenValue::Keyword(kw) => kw.kind(),
            TokenValue::Symbol(_) => TokenKind::Symbol,
        }
    }
}

/// A significant token of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionToken {
    /// The keyword or symbol.
    pub value: TokenValue,
    /// The text as written in the expression.
    pub string: String,
    /// Byte offset of the token in the expression.
    pub position: usize,
}

impl ExpressionToken {
    /// The kind of this token.
    pub fn kind(&self) -> TokenKind {
        self.value.kind()
    }
}

/// A raw tokenizer output record.
///
/// `value` is `None` for whitespace and for text no tokenizer recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
    pub string: String,
    pub value: Option<TokenValue>,
}

impl Token {
    pub(crate) fn new(start: usize, string: &str, value: Option<TokenValue>) -> Self {
        Self {
            start,
            end: start + string.len(),
            string: string.to_string(),
            value,
        }
    }

    fn is_blank(&self) -> bool {
        self.value.is_none() && self.string.trim().is_empty()
    }

    fn license_symbol(&self) -> Option<&LicenseSymbol> {
        match self.value {
            Some(TokenValue::Symbol(Symbol::License(ref symbol))) => Some(symbol),
            _ => None,
        }
    }

    fn is_keyword(&self, keyword: Keyword) -> bool {
        self.value == Some(TokenValue::Keyword(keyword))
    }

    fn error(&self, code: ParseErrorCode) -> ParseError {
        let kind = self
            .value
            .as_ref()
            .map(TokenValue::kind)
            .unwrap_or(TokenKind::Symbol);
        ParseError::new(code).at_token(kind, self.string.clone(), self.start)
    }
}

/// Runs the post-passes over raw tokens and keeps the significant ones.
pub(crate) fn finish(tokens: Vec<Token>, strict: bool) -> LicenseResult<Vec<ExpressionToken>> {
    let tokens = fuse_unmatched(tokens)?;
    let tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.is_blank()).collect();
    let tokens = fuse_with_exceptions(tokens, strict)?;

    tokens
        .into_iter()
        .map(|token| match token.value {
            Some(value) => Ok(ExpressionToken {
                value,
                string: token.string,
                position: token.start,
            }),
            None => Err(ParseError::new(ParseErrorCode::InvalidExpression)
                .at_token(TokenKind::Symbol, token.string, token.start)
                .into()),
        })
        .collect()
}

// ============================================================================
// Unmatched text fusion
// ============================================================================

/// Replaces each run of unmatched tokens with one token holding a new
/// [`LicenseSymbol`]. Leading whitespace is passed through untouched.
fn fuse_unmatched(tokens: Vec<Token>) -> LicenseResult<Vec<Token>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut unmatched: Vec<Token> = Vec::new();

    for token in tokens {
        if token.value.is_some() {
            flush_unmatched(&mut unmatched, &mut out)?;
            out.push(token);
        } else if unmatched.is_empty() && token.is_blank() {
            out.push(token);
        } else {
            unmatched.push(token);
        }
    }
    flush_unmatched(&mut unmatched, &mut out)?;

    Ok(out)
}

fn flush_unmatched(unmatched: &mut Vec<Token>, out: &mut Vec<Token>) -> LicenseResult<()> {
    let mut trailing = Vec::new();
    while unmatched.last().is_some_and(Token::is_blank) {
        trailing.extend(unmatched.pop());
    }

    if let (Some(first), Some(last)) = (unmatched.first(), unmatched.last()) {
        let string = unmatched
            .iter()
            .filter(|t| !t.is_blank())
            .map(|t| t.string.trim())
            .collect::<Vec<_>>()
            .join(" ");
        let symbol = LicenseSymbol::new(&string)?;
        out.push(Token {
            start: first.start,
            end: last.end,
            string,
            value: Some(TokenValue::Symbol(Symbol::License(symbol))),
        });
    }

    unmatched.clear();
    out.extend(trailing.into_iter().rev());
    Ok(())
}

// ============================================================================
// WITH fusion
// ============================================================================

fn is_with_triple(triple: &VecDeque<Token>) -> bool {
    triple.len() == 3
        && triple[0].license_symbol().is_some()
        && triple[1].is_keyword(Keyword::With)
        && triple[2].license_symbol().is_some()
}

/// Groups tokens into `symbol WITH symbol` triples and single tokens.
fn group_with_triples(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut groups = Vec::new();
    let mut window: VecDeque<Token> = VecDeque::with_capacity(3);

    for token in tokens {
        if window.len() == 3 {
            if is_with_triple(&window) {
                groups.push(window.drain(..).collect());
            } else {
                groups.extend(window.pop_front().map(|t| vec![t]));
            }
        }
        window.push_back(token);
    }

    if is_with_triple(&window) {
        groups.push(window.drain(..).collect());
    } else {
        groups.extend(window.into_iter().map(|t| vec![t]));
    }
    groups
}

/// Fuses `symbol WITH symbol` triples into license-with-exception tokens.
fn fuse_with_exceptions(tokens: Vec<Token>, strict: bool) -> LicenseResult<Vec<Token>> {
    let mut out = Vec::with_capacity(tokens.len());

    for group in group_with_triples(tokens) {
        match <[Token; 1]>::try_from(group) {
            Ok([token]) => {
                if token.is_keyword(Keyword::With) {
                    return Err(token.error(ParseErrorCode::InvalidExpression).into());
                }
                if let Some(symbol) = token.license_symbol() {
                    if strict && symbol.is_exception() {
                        return Err(token.error(ParseErrorCode::InvalidException).into());
                    }
                } else if !matches!(token.value, Some(TokenValue::Keyword(_))) {
                    return Err(token.error(ParseErrorCode::InvalidSymbol).into());
                }
                out.push(token);
            }
            Err(group) => out.push(fuse_triple(group, strict)?),
        }
    }

    Ok(out)
}

fn fuse_triple(group: Vec<Token>, strict: bool) -> LicenseResult<Token> {
    let [lic_token, with_token, exc_token] = match <[Token; 3]>::try_from(group) {
        Ok(triple) => triple,
        Err(group) => {
            let position = group.first().map(|t| t.start).unwrap_or_default();
            return Err(ParseError::new(ParseErrorCode::InvalidExpression)
                .at_position(position)
                .into());
        }
    };

    let (lic, exc) = match (lic_token.license_symbol(), exc_token.license_symbol()) {
        (Some(lic), Some(exc)) => (lic.clone(), exc.clone()),
        (None, _) => return Err(lic_token.error(ParseErrorCode::InvalidSymbol).into()),
        (_, None) => return Err(exc_token.error(ParseErrorCode::InvalidSymbol).into()),
    };
    if strict && lic.is_exception() {
        return Err(lic_token.error(ParseErrorCode::InvalidException).into());
    }
    if strict && !exc.is_exception() {
        return Err(exc_token.error(ParseErrorCode::InvalidSymbolAsException).into());
    }

    let symbol = LicenseWithExceptionSymbol::new(lic, exc, false)?;
    Ok(Token {
        start: lic_token.start,
        end: exc_token.end,
        string: format!("{} {} {}", lic_token.string, with_token.string, exc_token.string),
        value: Some(TokenValue::Symbol(Symbol::WithException(symbol))),
    })
}
