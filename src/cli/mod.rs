//! CLI support for pql
//!
//! Provides programmatic access to the `pql` binary's commands so they can be
//! embedded in other tools and tested without spawning a process.

mod check;
mod format;
mod schema;

pub use check::{execute_check, CheckOptions, CheckResult};
pub use format::execute_format;
pub use schema::{describe_operation, describe_registry, load_registry};

use std::io;
use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Query(#[from] crate::QueryError),

    #[error("Schema error: {0}")]
    Schema(#[from] crate::SchemaError),

    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No query provided. Pass it as an argument or pipe it to stdin.")]
    NoInput,

    #[error("Unknown operation: '{0}'\nRun 'pql schema' to see available operations.")]
    UnknownOperation(String),
}

impl From<crate::LexError> for CliError {
    fn from(e: crate::LexError) -> Self {
        CliError::Query(e.into())
    }
}

impl From<crate::SyntaxError> for CliError {
    fn from(e: crate::SyntaxError) -> Self {
        CliError::Query(e.into())
    }
}
