//! Expression parser over significant tokens.
//!
//! Grammar, with `AND` binding tighter than `OR`:
//!
//! ```text
//! or   := and ("OR" and)*
//! and  := atom ("AND" atom)*
//! atom := SYMBOL | "(" or ")"
//! ```
//!
//! Chains of the same operator build one n-ary node. Parenthesized
//! sub-expressions keep their own node.

use crate::error::{LicenseResult, ParseError, ParseErrorCode};
use crate::expression::{LicenseExpression, Operator};
use crate::tokenizer::{ExpressionToken, Keyword, TokenValue};

/// Parses tokens into an expression; `None` when there are no tokens.
pub(crate) fn parse_tokens(tokens: &[ExpressionToken]) -> LicenseResult<Option<LicenseExpression>> {
    if tokens.is_empty() {
        return Ok(None);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expression = parser.parse_or()?;
    if let Some(token) = parser.peek() {
        let code = match token.value {
            TokenValue::Keyword(Keyword::RightParen) => ParseErrorCode::UnbalancedClosingParens,
            _ => ParseErrorCode::InvalidExpression,
        };
        return Err(error_at(code, token).into());
    }
    Ok(Some(expression))
}

fn error_at(code: ParseErrorCode, token: &ExpressionToken) -> ParseError {
    ParseError::new(code).at_token(token.kind(), token.string.clone(), token.position)
}

struct Parser<'a> {
    tokens: &'a [ExpressionToken],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a ExpressionToken> {
        self.tokens.get(self.pos)
    }

    fn previous(&self) -> Option<&'a ExpressionToken> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    fn next_is(&self, keyword: Keyword) -> bool {
        matches!(self.peek(), Some(t) if t.value == TokenValue::Keyword(keyword))
    }

    fn parse_or(&mut self) -> LicenseResult<LicenseExpression> {
        self.parse_chain(Operator::Or)
    }

    fn parse_and(&mut self) -> LicenseResult<LicenseExpression> {
        self.parse_chain(Operator::And)
    }

    fn parse_chain(&mut self, operator: Operator) -> LicenseResult<LicenseExpression> {
        let keyword = match operator {
            Operator::And => Keyword::And,
            Operator::Or => Keyword::Or,
        };
        let mut args = vec![self.parse_operand(operator)?];
        while self.next_is(keyword) {
            self.pos += 1;
            args.push(self.parse_operand(operator)?);
        }
        if args.len() == 1 {
            return Ok(args.remove(0));
        }
        LicenseExpression::operation(operator, args)
    }

    fn parse_operand(&mut self, operator: Operator) -> LicenseResult<LicenseExpression> {
        match operator {
            Operator::Or => self.parse_and(),
            Operator::And => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> LicenseResult<LicenseExpression> {
        let token = match self.peek() {
            Some(token) => token,
            None => return Err(self.unexpected_end()),
        };

        let expression = match &token.value {
            TokenValue::Symbol(symbol) => {
                self.pos += 1;
                LicenseExpression::Symbol(symbol.clone())
            }
            TokenValue::Keyword(Keyword::LeftParen) => {
                self.pos += 1;
                if let Some(close) = self.peek().filter(|_| self.next_is(Keyword::RightParen)) {
                    return Err(error_at(ParseErrorCode::InvalidExpression, close).into());
                }
                let inner = self.parse_or()?;
                if !self.next_is(Keyword::RightParen) {
                    return Err(error_at(ParseErrorCode::UnbalancedClosingParens, token).into());
                }
                self.pos += 1;
                inner
            }
            TokenValue::Keyword(Keyword::And) | TokenValue::Keyword(Keyword::Or) => {
                let follows_operator = matches!(
                    self.previous().map(|t| &t.value),
                    Some(TokenValue::Keyword(Keyword::And)) | Some(TokenValue::Keyword(Keyword::Or))
                );
                let code = if follows_operator {
                    ParseErrorCode::InvalidOperatorSequence
                } else {
                    ParseErrorCode::InvalidExpression
                };
                return Err(error_at(code, token).into());
            }
            TokenValue::Keyword(Keyword::RightParen) => {
                let code = if self.pos == 0 {
                    ParseErrorCode::UnbalancedClosingParens
                } else {
                    ParseErrorCode::InvalidExpression
                };
                return Err(error_at(code, token).into());
            }
            TokenValue::Keyword(Keyword::With) => {
                return Err(error_at(ParseErrorCode::InvalidExpression, token).into());
            }
        };

        self.check_follower()?;
        Ok(expression)
    }

    /// After an operand only an operator, `)` or the end may follow.
    fn check_follower(&self) -> LicenseResult<()> {
        let token = match self.peek() {
            Some(token) => token,
            None => return Ok(()),
        };
        let code = match token.value {
            TokenValue::Symbol(_) => ParseErrorCode::InvalidSymbolSequence,
            TokenValue::Keyword(Keyword::LeftParen) => ParseErrorCode::InvalidNesting,
            TokenValue::Keyword(Keyword::With) => ParseErrorCode::InvalidExpression,
            TokenValue::Keyword(_) => return Ok(()),
        };
        Err(error_at(code, token).into())
    }

    fn unexpected_end(&self) -> crate::error::LicenseError {
        match self.previous() {
            Some(last) => error_at(ParseErrorCode::InvalidExpression, last).into(),
            None => ParseError::new(ParseErrorCode::InvalidExpression).into(),
        }
    }
}
