use serde::Serialize;
use std::collections::BTreeMap;

/// A bound parameter value.
///
/// Nested queries are never stored here; they live in [`Query::subqueries`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Unsigned 64-bit value (ids, filters)
    UInt(u64),

    /// Signed integer (counts such as `n`)
    Int(i64),

    /// Text value (frame names)
    Text(String),

    /// List of unsigned values (`[1, 2, 3]`)
    UIntList(Vec<u64>),
}

impl ArgValue {
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            ArgValue::UInt(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_uint_list(&self) -> Option<&[u64]> {
        match self {
            ArgValue::UIntList(ids) => Some(ids),
            _ => None,
        }
    }
}

impl From<u64> for ArgValue {
    fn from(n: u64) -> Self {
        ArgValue::UInt(n)
    }
}

impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        ArgValue::Int(n)
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Text(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Text(s)
    }
}

impl From<Vec<u64>> for ArgValue {
    fn from(ids: Vec<u64>) -> Self {
        ArgValue::UIntList(ids)
    }
}

/// A bound query node, ready for the execution engine.
///
/// `args` is always present (empty for operations without parameters) and
/// keyed by parameter name. `subqueries` holds nested calls in the order they
/// appeared in the source, whether they were passed positionally or by keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub operation: String,
    pub args: BTreeMap<String, ArgValue>,
    pub subqueries: Vec<Query>,
}

impl Query {
    pub fn new(operation: impl Into<String>) -> Self {
        Query {
            operation: operation.into(),
            args: BTreeMap::new(),
            subqueries: Vec::new(),
        }
    }

    /// Builder-style argument insertion, mostly useful in tests
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    pub fn with_subquery(mut self, query: Query) -> Self {
        self.subqueries.push(query);
        self
    }

    pub fn arg(&self, name: &str) -> Option<&ArgValue> {
        self.args.get(name)
    }

    /// Number of queries nested anywhere below this one
    pub fn nested_count(&self) -> usize {
        self.subqueries
            .iter()
            .map(|q| 1 + q.nested_count())
            .sum()
    }
}
