//! Operation listings and schema loading for the CLI

use super::CliError;
use crate::SchemaRegistry;
use std::path::Path;

/// The standard registry, with schemas from `path` (if any) layered on top
pub fn load_registry(path: Option<&Path>) -> Result<SchemaRegistry, CliError> {
    let mut registry = SchemaRegistry::standard();
    if let Some(path) = path {
        registry.merge(SchemaRegistry::from_json_file(path)?);
    }
    Ok(registry)
}

/// List every operation with its signature
pub fn describe_registry(registry: &SchemaRegistry) -> String {
    let mut out = String::from("OPERATIONS\n\n");
    for schema in registry.operations() {
        out.push_str("  ");
        out.push_str(&schema.to_string());
        out.push('\n');
    }
    out.push_str(
        "\nOperations not listed here are accepted in pass-through mode: only\n\
         their nested calls are kept.\n",
    );
    out
}

/// Describe one operation's parameters, one per line
pub fn describe_operation(registry: &SchemaRegistry, name: &str) -> Result<String, CliError> {
    let schema = registry
        .get(name)
        .ok_or_else(|| CliError::UnknownOperation(name.to_string()))?;

    let mut out = format!("{}\n\n", schema);
    if schema.params.is_empty() && !schema.variadic {
        out.push_str("  (no parameters)\n");
    }
    for param in &schema.params {
        let mut notes = vec![];
        if param.required {
            notes.push("required".to_string());
        }
        if let Some(default) = &param.default {
            notes.push(format!("default {}", crate::output::format_arg(default)));
        }
        if param.contextual {
            notes.push("contextual".to_string());
        }
        out.push_str(&format!(
            "  {:<12} {:<28} {}\n",
            param.name,
            param.ty.to_string(),
            notes.join(", ")
        ));
    }
    if schema.variadic {
        out.push_str("  ...          any number of queries\n");
    }
    Ok(out)
}
