//! Parse and bind a query, reporting the resulting tree

use super::CliError;
use crate::output::{to_json, to_json_pretty};
use crate::{lex, parse, parse_call, SchemaRegistry};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The PQL query to check
    pub query: String,
    /// Pretty-print the JSON output
    pub pretty: bool,
    /// Only lex and parse; skip binding against the schema
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Query bound successfully; JSON rendering of the tree
    Success(String),
}

/// Execute a check against `registry`
pub fn execute_check(
    options: &CheckOptions,
    registry: &SchemaRegistry,
) -> Result<CheckResult, CliError> {
    let query = options.query.trim();
    if query.is_empty() {
        return Err(CliError::NoInput);
    }

    if options.syntax_only {
        let tokens = lex(query)?;
        parse_call(&tokens)?;
        return Ok(CheckResult::SyntaxValid);
    }

    let bound = parse(query, registry)?;
    let json = if options.pretty {
        to_json_pretty(&bound)?
    } else {
        to_json(&bound)?
    };
    Ok(CheckResult::Success(json))
}
