//! Rewrite a query in canonical form

use super::CliError;
use crate::{parse, to_pql, SchemaRegistry};

pub fn execute_format(query: &str, registry: &SchemaRegistry) -> Result<String, CliError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::NoInput);
    }
    Ok(to_pql(&parse(query, registry)?, registry))
}
