use crate::ast::{Position, Token, TokenKind};
use crate::error::LexError;
use tracing::trace;

/// Converts query text into tokens.
///
/// The lexer only holds a cursor into one input string; every call to
/// [`lex`] starts from scratch.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn location(&self) -> Position {
        Position::new(self.position, self.line, self.column)
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_identifier_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '-'
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if Self::is_identifier_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_number(&mut self, start: Position) -> Result<Token, LexError> {
        let mut number = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if number.parse::<u64>().is_err() {
            return Err(LexError::new(
                start,
                format!("number out of range: {}", number),
            ));
        }
        Ok(Token::new(TokenKind::Number, number, start))
    }

    fn read_string(&mut self, quote: char, start: Position) -> Result<Token, LexError> {
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(Token::new(TokenKind::String, result, start));
                }
                '\\' => {
                    let escape_at = self.location();
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some(ch) => {
                            return Err(LexError::new(
                                escape_at,
                                format!("invalid escape sequence '\\{}'", ch),
                            ));
                        }
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::new(start, "unterminated string"))
    }

    fn single(&mut self, kind: TokenKind, ch: char, start: Position) -> Token {
        self.advance();
        Token::new(kind, ch.to_string(), start)
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let start = self.location();

        match self.current_char() {
            None => Ok(Token::new(TokenKind::Eof, "", start)),
            Some(ch @ '(') => Ok(self.single(TokenKind::LParen, ch, start)),
            Some(ch @ ')') => Ok(self.single(TokenKind::RParen, ch, start)),
            Some(ch @ '[') => Ok(self.single(TokenKind::LBracket, ch, start)),
            Some(ch @ ']') => Ok(self.single(TokenKind::RBracket, ch, start)),
            Some(ch @ ',') => Ok(self.single(TokenKind::Comma, ch, start)),
            Some(ch @ '=') => Ok(self.single(TokenKind::Equals, ch, start)),
            Some(quote @ ('"' | '\'')) => self.read_string(quote, start),
            Some(ch) if ch.is_ascii_digit() => self.read_number(start),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                Ok(Token::new(TokenKind::Identifier, ident, start))
            }
            Some(ch) => Err(LexError::new(
                start,
                format!("unexpected character '{}'", ch),
            )),
        }
    }

    /// Lex the remaining input, ending with an [`TokenKind::Eof`] token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

/// Lex a whole query string.
pub fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    let tokens = Lexer::new(input).tokenize()?;
    trace!(tokens = tokens.len(), "lexed query");
    Ok(tokens)
}

#[test]
fn test_hyphenated_identifier() {
    let mut lexer = Lexer::new("top-n(");
    let token = lexer.next_token().unwrap();
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(token.text, "top-n");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::LParen);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
fn test_positions_track_lines() {
    let tokens = lex("get(\n  10)").unwrap();
    assert_eq!(tokens[2].text, "10");
    assert_eq!(tokens[2].position, Position::new(7, 2, 3));
}
