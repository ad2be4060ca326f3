use std::fmt;

/// Location of a token or argument in the query text.
///
/// `offset` counts characters from the start of the input (0-based);
/// `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Position {
            offset,
            line,
            column,
        }
    }

    /// Position of the first character of the input
    pub fn start() -> Self {
        Position::new(0, 1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Operation, keyword or bare value name
    ///
    /// Starts with a letter or underscore, followed by letters, digits,
    /// underscores or hyphens. Case-sensitive.
    ///
    /// # Examples
    /// ```text
    /// get
    /// top-n
    /// profile_id
    /// ```
    Identifier,

    /// Unsigned decimal integer
    ///
    /// # Examples
    /// ```text
    /// 0
    /// 12345
    /// ```
    Number,

    /// Quoted string, with quotes stripped and escapes resolved
    ///
    /// # Examples
    /// ```text
    /// "brand names"
    /// 'frame.v2'
    /// ```
    String,

    /// Argument and list element separator
    Comma,

    /// Opens an argument list
    LParen,

    /// Closes an argument list
    RParen,

    /// Opens a list literal
    LBracket,

    /// Closes a list literal
    RBracket,

    /// Separates a keyword from its value (`frame=brand`)
    Equals,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Human-readable name used in syntax diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Comma => "','",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Equals => "'='",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A lexical token: its kind, the text it was produced from, and where it starts.
///
/// For [`TokenKind::String`] the text is the unescaped contents, without quotes.
/// For [`TokenKind::Eof`] the text is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Describe the token for "found ..." diagnostics
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Identifier | TokenKind::Number => {
                format!("{} '{}'", self.kind.describe(), self.text)
            }
            TokenKind::String => format!("string {:?}", self.text),
            _ => self.kind.describe().to_string(),
        }
    }
}
