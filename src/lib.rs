pub mod ast;
pub mod binder;
pub mod cli;
pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod schema;

pub use ast::{ArgValue, Position, Query, RawArgument, RawCall, RawValue, Token, TokenKind};
pub use binder::{bind, Binder};
pub use error::{BindError, BindErrorKind, LexError, QueryError, SchemaError, SyntaxError};
pub use lexer::{lex, Lexer};
pub use output::{to_json, to_json_pretty, to_pql};
pub use parser::{parse_call, Parser};
pub use schema::{OperationSchema, ParamSpec, ParamType, SchemaRegistry};

/// Lex, parse and bind a query string in one step.
pub fn parse(input: &str, registry: &SchemaRegistry) -> Result<Query, QueryError> {
    let tokens = lex(input)?;
    let call = parse_call(&tokens)?;
    Ok(bind(&call, registry)?)
}
