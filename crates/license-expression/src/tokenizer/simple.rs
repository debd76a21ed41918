//! Whitespace and parenthesis splitter.
//!
//! Splits an expression into parentheses, whitespace runs and "symop" runs
//! (everything else). A symop is a keyword when it spells `and`, `or` or
//! `with` in any case; otherwise it is looked up in the lowercase registry
//! and falls back to a new [`LicenseSymbol`] built from its text.

use std::collections::HashMap;

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{map, recognize},
    IResult,
};

use super::{Keyword, Token, TokenKind, TokenValue};
use crate::error::{LicenseResult, ParseError, ParseErrorCode};
use crate::symbol::{LicenseSymbol, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Fragment {
    Space,
    LeftParen,
    RightParen,
    SymOp,
}

fn space(input: &str) -> IResult<&str, (Fragment, &str)> {
    map(take_while1(|c: char| c.is_whitespace()), |s| (Fragment::Space, s))(input)
}

fn left_paren(input: &str) -> IResult<&str, (Fragment, &str)> {
    map(recognize(char('(')), |s| (Fragment::LeftParen, s))(input)
}

fn right_paren(input: &str) -> IResult<&str, (Fragment, &str)> {
    map(recognize(char(')')), |s| (Fragment::RightParen, s))(input)
}

fn symop(input: &str) -> IResult<&str, (Fragment, &str)> {
    map(
        take_while1(|c: char| !c.is_whitespace() && c != '(' && c != ')'),
        |s| (Fragment::SymOp, s),
    )(input)
}

fn fragment(input: &str) -> IResult<&str, (Fragment, &str)> {
    alt((space, left_paren, right_paren, symop))(input)
}

/// Splits `expression` into `(offset, kind, text)` fragments.
pub(super) fn fragments(expression: &str) -> LicenseResult<Vec<(usize, Fragment, &str)>> {
    let mut out = Vec::new();
    let mut rest = expression;

    while !rest.is_empty() {
        let start = expression.len() - rest.len();
        let (remaining, (kind, text)) = fragment(rest).map_err(|_| {
            ParseError::new(ParseErrorCode::UnknownToken).at_token(TokenKind::Symbol, rest, start)
        })?;
        out.push((start, kind, text));
        rest = remaining;
    }

    Ok(out)
}

/// Tokenizes `expression`, resolving symops through `known_lowercase`.
pub(crate) fn tokenize(
    expression: &str,
    known_lowercase: &HashMap<String, LicenseSymbol>,
) -> LicenseResult<Vec<Token>> {
    let mut tokens = Vec::new();
    for (start, kind, text) in fragments(expression)? {
        let value = match kind {
            Fragment::Space => None,
            Fragment::LeftParen => Some(TokenValue::Keyword(Keyword::LeftParen)),
            Fragment::RightParen => Some(TokenValue::Keyword(Keyword::RightParen)),
            Fragment::SymOp => Some(resolve_symop(text, known_lowercase)?),
        };
        tokens.push(Token::new(start, text, value));
    }
    Ok(tokens)
}

fn resolve_symop(
    text: &str,
    known_lowercase: &HashMap<String, LicenseSymbol>,
) -> LicenseResult<TokenValue> {
    if let Some(keyword) = Keyword::from_word(text) {
        return Ok(TokenValue::Keyword(keyword));
    }
    let symbol = match known_lowercase.get(&text.to_lowercase()) {
        Some(known) => known.clone(),
        None => LicenseSymbol::new(text)?,
    };
    Ok(TokenValue::Symbol(Symbol::License(symbol)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(keys: &[&str]) -> HashMap<String, LicenseSymbol> {
        keys.iter()
            .map(|k| (k.to_lowercase(), LicenseSymbol::new(k).unwrap()))
            .collect()
    }

    fn strings(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.string.as_str()).collect()
    }

    #[test]
    fn test_fragments() {
        let tokens = tokenize("(mit  or bsd)", &HashMap::new()).unwrap();
        assert_eq!(strings(&tokens), vec!["(", "mit", "  ", "or", " ", "bsd", ")"]);
        assert_eq!(tokens[2].value, None);
        assert_eq!(tokens[3].value, Some(TokenValue::Keyword(Keyword::Or)));
        assert_eq!((tokens[5].start, tokens[5].end), (9, 12));
    }

    #[test]
    fn test_keywords_ignore_case() {
        let tokens = tokenize("a AnD b WiTh c", &HashMap::new()).unwrap();
        assert_eq!(tokens[2].value, Some(TokenValue::Keyword(Keyword::And)));
        assert_eq!(tokens[6].value, Some(TokenValue::Keyword(Keyword::With)));
    }

    #[test]
    fn test_registry_lookup_ignores_case() {
        let tokens = tokenize("bsd", &registry(&["BSD"])).unwrap();
        match &tokens[0].value {
            Some(TokenValue::Symbol(Symbol::License(s))) => assert_eq!(s.key(), "BSD"),
            other => panic!("unexpected token value: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_symop_keeps_text() {
        let tokens = tokenize("GPL-2.0+", &HashMap::new()).unwrap();
        match &tokens[0].value {
            Some(TokenValue::Symbol(Symbol::License(s))) => assert_eq!(s.key(), "GPL-2.0+"),
            other => panic!("unexpected token value: {:?}", other),
        }
    }

    #[test]
    fn test_multi_word_names_are_split() {
        let tokens = tokenize("gnu gpl", &registry(&["gnu gpl"])).unwrap();
        assert_eq!(strings(&tokens), vec!["gnu", " ", "gpl"]);
    }

    #[test]
    fn test_invalid_symop_fails() {
        assert!(tokenize("mit/x11", &HashMap::new()).is_err());
    }

    #[test]
    fn test_offsets_are_bytes() {
        let tokens = tokenize("é or mit", &HashMap::new()).unwrap();
        assert_eq!(tokens[2].start, 3);
        assert_eq!(tokens[4].start, 6);
    }
}
