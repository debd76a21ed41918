//! Error types for license expression parsing and validation.

use std::fmt;

use thiserror::Error;

use crate::expression::Operator;
use crate::tokenizer::TokenKind;

/// Machine-readable codes for expression parse errors.
///
/// The numeric values returned by [`ParseErrorCode::code`] are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseErrorCode {
    /// A token that cannot start or continue an expression.
    UnknownToken,
    /// A closing parenthesis without a matching opening one.
    UnbalancedClosingParens,
    /// A structurally invalid expression (dangling operator, lone `WITH`, ...).
    InvalidExpression,
    /// An opening parenthesis where an operator was expected, e.g. `mit (bsd)`.
    InvalidNesting,
    /// Two symbols without an operator between them, e.g. `(A B)`.
    InvalidSymbolSequence,
    /// Two operators without a symbol between them, e.g. `A AND OR B`.
    InvalidOperatorSequence,
    /// The expression bytes are not valid UTF-8.
    ExpressionNotUnicode,
    /// An exception symbol used as a license (strict mode).
    InvalidException,
    /// A plain license symbol used after `WITH` (strict mode).
    InvalidSymbolAsException,
    /// A license symbol was required.
    InvalidSymbol,
}

impl ParseErrorCode {
    /// Returns the stable numeric code.
    pub fn code(self) -> u16 {
        match self {
            ParseErrorCode::UnknownToken => 1,
            ParseErrorCode::UnbalancedClosingParens => 2,
            ParseErrorCode::InvalidExpression => 3,
            ParseErrorCode::InvalidNesting => 4,
            ParseErrorCode::InvalidSymbolSequence => 5,
            ParseErrorCode::InvalidOperatorSequence => 6,
            ParseErrorCode::ExpressionNotUnicode => 100,
            ParseErrorCode::InvalidException => 101,
            ParseErrorCode::InvalidSymbolAsException => 102,
            ParseErrorCode::InvalidSymbol => 103,
        }
    }

    /// Returns a human readable description of the error.
    pub fn description(self) -> &'static str {
        match self {
            ParseErrorCode::UnknownToken => "Unknown token",
            ParseErrorCode::UnbalancedClosingParens => "Unbalanced parenthesis",
            ParseErrorCode::InvalidExpression => "Invalid expression",
            ParseErrorCode::InvalidNesting => "Invalid expression nesting such as (AND xx)",
            ParseErrorCode::InvalidSymbolSequence => "Invalid symbols sequence such as (A B)",
            ParseErrorCode::InvalidOperatorSequence => {
                "Invalid operator sequence without symbols such as AND OR or OR OR"
            }
            ParseErrorCode::ExpressionNotUnicode => "Expression string must be unicode.",
            ParseErrorCode::InvalidException => {
                "A license exception symbol can only be used as an exception in a \"WITH exception\" statement."
            }
            ParseErrorCode::InvalidSymbolAsException => {
                "A plain license symbol cannot be used as an exception in a \"WITH symbol\" statement."
            }
            ParseErrorCode::InvalidSymbol => "A proper license symbol is needed.",
        }
    }
}

impl fmt::Display for ParseErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A parse error with the offending token, when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseError {
    /// What went wrong.
    pub code: ParseErrorCode,
    /// Kind of the offending token.
    pub token_kind: Option<TokenKind>,
    /// Literal text of the offending token.
    pub token_string: Option<String>,
    /// Byte offset of the offending token in the expression.
    pub position: Option<usize>,
}

impl ParseError {
    /// Creates an error with no token information.
    pub fn new(code: ParseErrorCode) -> Self {
        Self {
            code,
            token_kind: None,
            token_string: None,
            position: None,
        }
    }

    /// Attaches the offending token to this error.
    pub fn at_token(mut self, kind: TokenKind, string: impl Into<String>, position: usize) -> Self {
        self.token_kind = Some(kind);
        self.token_string = Some(string.into());
        self.position = Some(position);
        self
    }

    /// Attaches only a position to this error.
    pub fn at_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code.description())?;
        if let Some(ref token) = self.token_string {
            write!(f, " for token: \"{}\"", token)?;
        }
        if let Some(position) = self.position {
            write!(f, " at position: {}", position)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Errors raised while building symbols, registries and expressions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LicenseError {
    /// A license key failed validation.
    #[error("invalid license key \"{key}\": {reason}")]
    InvalidKey {
        /// The rejected key, as supplied.
        key: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An `AND`/`OR` node was built with fewer than two operands.
    #[error("{operator} requires two or more licenses as in: MIT {operator} BSD")]
    Arity {
        /// The operator being built.
        operator: Operator,
        /// Number of operands supplied.
        found: usize,
    },

    /// A license-with-exception pair violates strict exception polarity.
    #[error("invalid license with exception: {0}")]
    InvalidWithException(String),

    /// The expression could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The known-symbol registry is inconsistent.
    #[error("invalid license symbols: {}", errors.join(" "))]
    InvalidRegistry {
        /// Blocking problems.
        errors: Vec<String>,
        /// Non-blocking problems found alongside the errors.
        warnings: Vec<String>,
    },

    /// The expression references keys outside the known-symbol registry.
    #[error("Unknown license key(s): {}", keys.join(", "))]
    UnknownLicenseKeys {
        /// Every unknown key, in first-appearance order.
        keys: Vec<String>,
    },

    /// A rendering template is malformed or references an unknown attribute.
    #[error("invalid template \"{template}\": {reason}")]
    Template {
        /// The template source.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A serialized registry document could not be decoded.
    #[error("invalid license registry document: {0}")]
    RegistryDocument(String),

    /// The symbol matcher could not be built from the registered keys and
    /// aliases.
    #[error("cannot build license symbol matcher: {0}")]
    Matcher(String),
}

impl LicenseError {
    /// Returns the parse error code, if this is a parse error.
    pub fn parse_code(&self) -> Option<ParseErrorCode> {
        match self {
            LicenseError::Parse(e) => Some(e.code),
            _ => None,
        }
    }
}

/// Result type for license expression operations.
pub type LicenseResult<T> = std::result::Result<T, LicenseError>;
