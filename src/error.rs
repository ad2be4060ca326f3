use crate::ast::Position;
use crate::schema::ParamType;
use thiserror::Error;

/// A character sequence the lexer could not turn into a token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason} at {position}")]
pub struct LexError {
    pub position: Position,
    pub reason: String,
}

impl LexError {
    pub fn new(position: Position, reason: impl Into<String>) -> Self {
        LexError {
            position,
            reason: reason.into(),
        }
    }
}

/// A token sequence that does not match the call grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected}, found {found} at {position}")]
pub struct SyntaxError {
    pub position: Position,
    pub expected: String,
    pub found: String,
}

/// Category of a [`BindError`], for callers that only care which rule failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindErrorKind {
    MissingRequiredParameter,
    UnexpectedArgument,
    TypeMismatch,
}

/// A well-formed call whose arguments do not satisfy its operation's schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("{operation}: missing required parameter '{parameter}'")]
    MissingRequiredParameter { operation: String, parameter: String },

    #[error("{operation}: unexpected argument {argument} at {position}")]
    UnexpectedArgument {
        operation: String,
        argument: String,
        position: Position,
    },

    #[error("{operation}: parameter '{parameter}' expects {expected}, found {found} at {position}")]
    TypeMismatch {
        operation: String,
        parameter: String,
        expected: ParamType,
        found: String,
        position: Position,
    },
}

impl BindError {
    pub fn kind(&self) -> BindErrorKind {
        match self {
            BindError::MissingRequiredParameter { .. } => BindErrorKind::MissingRequiredParameter,
            BindError::UnexpectedArgument { .. } => BindErrorKind::UnexpectedArgument,
            BindError::TypeMismatch { .. } => BindErrorKind::TypeMismatch,
        }
    }

    /// Operation whose schema rejected the call
    pub fn operation(&self) -> &str {
        match self {
            BindError::MissingRequiredParameter { operation, .. }
            | BindError::UnexpectedArgument { operation, .. }
            | BindError::TypeMismatch { operation, .. } => operation,
        }
    }
}

/// An operation schema that cannot be registered.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("invalid name '{0}': names must start with a letter or '_' and contain only letters, digits, '_' or '-'")]
    InvalidName(String),

    #[error("{operation}: parameter '{parameter}' is declared more than once")]
    DuplicateParameter { operation: String, parameter: String },

    #[error("{operation}: required parameter '{parameter}' cannot have a default")]
    RequiredWithDefault { operation: String, parameter: String },

    #[error("{operation}: default for parameter '{parameter}' is not a valid {expected}")]
    InvalidDefault {
        operation: String,
        parameter: String,
        expected: ParamType,
    },

    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read schema file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure of the full lex, parse and bind pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("bind error: {0}")]
    Bind(#[from] BindError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyntaxError {
            position: Position::new(4, 1, 5),
            expected: "')'".to_string(),
            found: "end of input".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "expected ')', found end of input at line 1, column 5"
        );

        let err = BindError::MissingRequiredParameter {
            operation: "get".to_string(),
            parameter: "id".to_string(),
        };
        assert_eq!(err.to_string(), "get: missing required parameter 'id'");
        assert_eq!(err.kind(), BindErrorKind::MissingRequiredParameter);
    }

    #[test]
    fn test_query_error_wraps_stage() {
        let err: QueryError = LexError::new(Position::start(), "unexpected character '!'").into();
        assert!(matches!(err, QueryError::Lex(_)));
        assert_eq!(
            err.to_string(),
            "lex error: unexpected character '!' at line 1, column 1"
        );
    }
}
