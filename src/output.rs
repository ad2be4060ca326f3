//! Rendering of bound queries.
//!
//! - **Canonical PQL** via [`to_pql()`] - one call per node, arguments as
//!   `name=value` in name order, then subqueries in order. Subqueries that
//!   fill a query-typed parameter are written as that keyword (`source=...`,
//!   or `source=[a, b]` for several); those of variadic and unknown
//!   operations are written positionally
//! - **JSON** via [`to_json()`] and [`to_json_pretty()`] - the `Query` tree as
//!   `{"operation", "args", "subqueries"}` objects
//!
//! Canonical text parses and binds back to an equal `Query` under the registry
//! it was rendered with, which makes it suitable for logging and for shipping
//! sub-plans around as text. `Display` for [`Query`] renders against the
//! standard operations.
//!
//! # Examples
//!
//! ```
//! use pql::{parse, SchemaRegistry};
//! use pql::output::to_pql;
//!
//! let registry = SchemaRegistry::standard();
//! let query = parse("union(get(10), get(11, brand))", &registry).unwrap();
//!
//! assert_eq!(
//!     to_pql(&query, &registry),
//!     "union(get(frame=general, id=10), get(frame=brand, id=11))"
//! );
//!
//! let query = parse("top-n([get(1), get(2)], n=4)", &registry).unwrap();
//! assert_eq!(
//!     to_pql(&query, &registry),
//!     "top-n(n=4, source=[get(frame=general, id=1), get(frame=general, id=2)])"
//! );
//! ```

use crate::ast::{ArgValue, Query};
use crate::schema::{ParamSpec, ParamType, SchemaRegistry};
use std::fmt;
use std::sync::OnceLock;

fn is_bare_word(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}

fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for ch in s.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Render a single argument value as PQL source text.
///
/// Text that is a valid identifier is written bare; anything else is quoted.
pub fn format_arg(value: &ArgValue) -> String {
    match value {
        ArgValue::UInt(n) => n.to_string(),
        ArgValue::Int(n) => n.to_string(),
        ArgValue::Text(s) if is_bare_word(s) => s.clone(),
        ArgValue::Text(s) => escape_string(s),
        ArgValue::UIntList(ids) => {
            let items: Vec<String> = ids.iter().map(|n| n.to_string()).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

/// Render a query tree as canonical PQL text.
///
/// `registry` decides how subqueries are written, so it should be the one the
/// query was bound with.
pub fn to_pql(query: &Query, registry: &SchemaRegistry) -> String {
    let mut parts: Vec<String> = query
        .args
        .iter()
        .map(|(name, value)| format!("{}={}", name, format_arg(value)))
        .collect();
    parts.extend(subquery_parts(query, registry));

    format!("{}({})", query.operation, parts.join(", "))
}

fn subquery_parts(query: &Query, registry: &SchemaRegistry) -> Vec<String> {
    let rendered: Vec<String> = query
        .subqueries
        .iter()
        .map(|q| to_pql(q, registry))
        .collect();

    let slots: Vec<&ParamSpec> = match registry.get(&query.operation) {
        Some(schema) if !schema.variadic => schema
            .params
            .iter()
            .filter(|p| p.ty == ParamType::Query)
            .collect(),
        _ => return rendered,
    };

    match (slots.as_slice(), rendered.len()) {
        (_, 0) => rendered,
        ([slot], 1) => vec![format!("{}={}", slot.name, rendered[0])],
        ([slot], _) => vec![format!("{}=[{}]", slot.name, rendered.join(", "))],
        // one call per slot is the only split that can be recovered
        (slots, n) if slots.len() == n => slots
            .iter()
            .zip(rendered)
            .map(|(slot, sub)| format!("{}={}", slot.name, sub))
            .collect(),
        _ => rendered,
    }
}

fn standard_registry() -> &'static SchemaRegistry {
    static STANDARD: OnceLock<SchemaRegistry> = OnceLock::new();
    STANDARD.get_or_init(SchemaRegistry::standard)
}

pub fn to_json(query: &Query) -> serde_json::Result<String> {
    serde_json::to_string(query)
}

pub fn to_json_pretty(query: &Query) -> serde_json::Result<String> {
    serde_json::to_string_pretty(query)
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_pql(self, standard_registry()))
    }
}
