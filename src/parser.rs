//! Recursive descent parser for PQL calls
//!
//! # Grammar
//!
//! ```text
//! call      := IDENT '(' arg_list? ')'
//! arg_list  := argument (',' argument)*
//! argument  := (IDENT '=')? value
//! value     := NUMBER | STRING | IDENT | list | call
//! list      := '[' (value (',' value)*)? ']'
//! ```
//!
//! A query is exactly one top-level call followed by end of input. The parser
//! builds an unbound [`RawCall`]; it does not know which operations exist or
//! what their arguments mean.
//!
//! Calls and lists may nest at most [`MAX_DEPTH`] levels deep; deeper input is
//! rejected with a [`SyntaxError`] instead of exhausting the stack.

use crate::ast::{RawArgument, RawCall, RawValue, Token, TokenKind};
use crate::error::SyntaxError;

/// Nesting limit for calls and lists combined. Binding and rendering recurse
/// over the same tree, so this bounds them too.
pub const MAX_DEPTH: usize = 256;

pub struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    eof: Token,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    /// Tokens usually come from [`lex`](crate::lexer::lex), but any slice is
    /// accepted; token text is re-validated where it is converted.
    pub fn new(tokens: &'a [Token]) -> Self {
        let eof_at = tokens.last().map(|t| t.position).unwrap_or_default();
        Parser {
            tokens,
            position: 0,
            eof: Token::new(TokenKind::Eof, "", eof_at),
            depth: 0,
            max_depth: MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn current(&self) -> &Token {
        self.peek(0)
    }

    fn peek(&self, offset: usize) -> &Token {
        self.tokens.get(self.position + offset).unwrap_or(&self.eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn error(&self, expected: &str) -> SyntaxError {
        let found = self.current();
        SyntaxError {
            position: found.position,
            expected: expected.to_string(),
            found: found.describe(),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, SyntaxError> {
        if !self.check(kind) {
            return Err(self.error(expected));
        }
        Ok(self.advance())
    }

    /// Enter one level of call or list nesting. Callers leave it with
    /// `self.depth -= 1` once the nested construct is closed.
    fn enter_nesting(&mut self) -> Result<(), SyntaxError> {
        if self.depth >= self.max_depth {
            return Err(self.error(&format!("nesting depth <= {}", self.max_depth)));
        }
        self.depth += 1;
        Ok(())
    }

    /// Parse a complete query: one call, then end of input
    pub fn parse(&mut self) -> Result<RawCall, SyntaxError> {
        let call = self.parse_call()?;
        self.expect(TokenKind::Eof, "end of input")?;
        Ok(call)
    }

    fn parse_call(&mut self) -> Result<RawCall, SyntaxError> {
        let name = self.expect(TokenKind::Identifier, "operation name")?;
        self.parse_call_arguments(name)
    }

    /// Parse `'(' arg_list? ')'` for a call whose name was already consumed
    fn parse_call_arguments(&mut self, name: Token) -> Result<RawCall, SyntaxError> {
        self.enter_nesting()?;
        self.expect(TokenKind::LParen, "'('")?;

        let mut arguments = vec![];
        if self.check(TokenKind::RParen) {
            self.advance();
        } else {
            loop {
                arguments.push(self.parse_argument()?);

                if self.check(TokenKind::Comma) {
                    self.advance();
                } else {
                    self.expect(TokenKind::RParen, "',' or ')'")?;
                    break;
                }
            }
        }

        self.depth -= 1;
        Ok(RawCall {
            operation: name.text,
            arguments,
            position: name.position,
        })
    }

    fn parse_argument(&mut self) -> Result<RawArgument, SyntaxError> {
        let position = self.current().position;

        // `name=value` needs two tokens of lookahead to tell it apart from a
        // bare identifier value
        if self.check(TokenKind::Identifier) && self.peek(1).kind == TokenKind::Equals {
            let name = self.advance();
            self.advance(); // '='
            let value = self.parse_value()?;
            return Ok(RawArgument::keyword(name.text, value, position));
        }

        let value = self.parse_value()?;
        Ok(RawArgument::positional(value, position))
    }

    fn parse_value(&mut self) -> Result<RawValue, SyntaxError> {
        match self.current().kind {
            TokenKind::Number => {
                let number = self
                    .current()
                    .text
                    .parse::<u64>()
                    .map_err(|_| self.error("unsigned 64-bit number"))?;
                self.advance();
                Ok(RawValue::Number(number))
            }
            TokenKind::String => Ok(RawValue::Quoted(self.advance().text)),
            TokenKind::Identifier => {
                if self.peek(1).kind == TokenKind::LParen {
                    let name = self.advance();
                    Ok(RawValue::Call(self.parse_call_arguments(name)?))
                } else {
                    Ok(RawValue::Identifier(self.advance().text))
                }
            }
            TokenKind::LBracket => {
                self.enter_nesting()?;
                self.advance();
                let list = self.parse_list()?;
                self.depth -= 1;
                Ok(list)
            }
            _ => Err(self.error("value")),
        }
    }

    fn parse_list(&mut self) -> Result<RawValue, SyntaxError> {
        let mut elements = vec![];

        if self.check(TokenKind::RBracket) {
            self.advance();
            return Ok(RawValue::List(elements));
        }

        loop {
            elements.push(self.parse_value()?);

            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                self.expect(TokenKind::RBracket, "',' or ']'")?;
                break;
            }
        }

        Ok(RawValue::List(elements))
    }
}

/// Parse a token sequence (as produced by [`lex`](crate::lexer::lex)) into a call.
pub fn parse_call(tokens: &[Token]) -> Result<RawCall, SyntaxError> {
    Parser::new(tokens).parse()
}
