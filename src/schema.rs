//! Operation schemas: the ordered, typed parameter lists the binder resolves
//! arguments against.
//!
//! A [`SchemaRegistry`] is plain data. Build it once (usually with
//! [`SchemaRegistry::standard`], optionally merged with schemas loaded from
//! JSON) and hand it to [`bind`](crate::binder::bind) by reference; it is
//! never mutated while queries are being bound.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "operations": [
//!     {
//!       "name": "range",
//!       "params": [
//!         { "name": "id", "type": "uint64", "required": true },
//!         { "name": "frame", "type": "string", "default": "general" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Parameter types are `uint64`, `int`, `string`, `uint64-list` and `query`.

use crate::ast::ArgValue;
use crate::error::SchemaError;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Default frame for operations that read or write a bitmap
pub const DEFAULT_FRAME: &str = "general";

const NAME_PATTERN: &str = r"^[\p{Alphabetic}_][\p{Alphabetic}\p{N}_-]*$";

fn name_regex() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(NAME_PATTERN).expect("name pattern compiles"))
}

fn validate_name(name: &str) -> Result<(), SchemaError> {
    if name_regex().is_match(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidName(name.to_string()))
    }
}

/// Declared type of a parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ParamType {
    #[serde(rename = "uint64")]
    UInt64,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "uint64-list")]
    UInt64List,
    /// A nested call (or a list of calls); bound into subqueries
    #[serde(rename = "query")]
    Query,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParamType::UInt64 => "unsigned integer",
            ParamType::Int => "integer",
            ParamType::String => "string",
            ParamType::UInt64List => "list of unsigned integers",
            ParamType::Query => "query",
        })
    }
}

impl ParamType {
    /// Whether `value` has the right kind for this type
    pub fn accepts(&self, value: &ArgValue) -> bool {
        matches!(
            (self, value),
            (ParamType::UInt64, ArgValue::UInt(_))
                | (ParamType::Int, ArgValue::Int(_))
                | (ParamType::String, ArgValue::Text(_))
                | (ParamType::UInt64List, ArgValue::UIntList(_))
        )
    }

    /// Signature name, as used in the JSON format
    pub fn name(&self) -> &'static str {
        match self {
            ParamType::UInt64 => "uint64",
            ParamType::Int => "int",
            ParamType::String => "string",
            ParamType::UInt64List => "uint64-list",
            ParamType::Query => "query",
        }
    }
}

/// One parameter slot of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub ty: ParamType,

    /// Value used when no argument fills the slot. Only optional slots have one.
    pub default: Option<ArgValue>,

    pub required: bool,

    /// A contextual slot only takes the next positional argument when that
    /// argument's shape fits `ty`; otherwise positional binding skips it.
    pub contextual: bool,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>, ty: ParamType) -> Self {
        ParamSpec {
            name: name.into(),
            ty,
            default: None,
            required: true,
            contextual: false,
        }
    }

    /// Optional slot with no default; absent from the bound args when unfilled
    pub fn optional(name: impl Into<String>, ty: ParamType) -> Self {
        ParamSpec {
            name: name.into(),
            ty,
            default: None,
            required: false,
            contextual: false,
        }
    }

    pub fn with_default(
        name: impl Into<String>,
        ty: ParamType,
        default: impl Into<ArgValue>,
    ) -> Self {
        ParamSpec {
            name: name.into(),
            ty,
            default: Some(default.into()),
            required: false,
            contextual: false,
        }
    }

    pub fn contextual(mut self) -> Self {
        self.contextual = true;
        self
    }
}

/// The ordered parameter list of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSchema {
    pub name: String,
    pub params: Vec<ParamSpec>,

    /// Leftover arguments that are calls (or lists of calls) become subqueries
    /// instead of being rejected.
    pub variadic: bool,
}

impl OperationSchema {
    pub fn new(name: impl Into<String>, params: Vec<ParamSpec>) -> Self {
        OperationSchema {
            name: name.into(),
            params,
            variadic: false,
        }
    }

    /// An operation whose arguments are all subqueries (`union`, ...)
    pub fn variadic(name: impl Into<String>) -> Self {
        OperationSchema {
            name: name.into(),
            params: vec![],
            variadic: true,
        }
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        validate_name(&self.name)?;

        for (i, param) in self.params.iter().enumerate() {
            validate_name(&param.name)?;

            if self.params[..i].iter().any(|p| p.name == param.name) {
                return Err(SchemaError::DuplicateParameter {
                    operation: self.name.clone(),
                    parameter: param.name.clone(),
                });
            }

            match &param.default {
                Some(_) if param.required => {
                    return Err(SchemaError::RequiredWithDefault {
                        operation: self.name.clone(),
                        parameter: param.name.clone(),
                    });
                }
                Some(default) if !param.ty.accepts(default) => {
                    return Err(SchemaError::InvalidDefault {
                        operation: self.name.clone(),
                        parameter: param.name.clone(),
                        expected: param.ty,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for OperationSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", param.name, param.ty.name())?;
            match &param.default {
                Some(default) => write!(f, " = {}", crate::output::format_arg(default))?,
                None if !param.required => write!(f, "?")?,
                None => {}
            }
        }
        if self.variadic {
            if !self.params.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "query...")?;
        }
        write!(f, ")")
    }
}

/// Operation name to schema table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    operations: HashMap<String, OperationSchema>,
}

impl SchemaRegistry {
    pub fn empty() -> Self {
        SchemaRegistry::default()
    }

    /// The built-in bitmap operations.
    pub fn standard() -> Self {
        let bit_write = |name: &str| {
            OperationSchema::new(
                name,
                vec![
                    ParamSpec::required("id", ParamType::UInt64),
                    ParamSpec::with_default("frame", ParamType::String, DEFAULT_FRAME),
                    ParamSpec::with_default("filter", ParamType::UInt64, 0u64),
                    ParamSpec::required("profile_id", ParamType::UInt64),
                ],
            )
        };

        let schemas = vec![
            OperationSchema::new(
                "get",
                vec![
                    ParamSpec::required("id", ParamType::UInt64),
                    ParamSpec::with_default("frame", ParamType::String, DEFAULT_FRAME),
                ],
            ),
            bit_write("set"),
            bit_write("clear"),
            OperationSchema::variadic("union"),
            OperationSchema::variadic("intersect"),
            OperationSchema::variadic("difference"),
            OperationSchema::new(
                "top-n",
                vec![
                    ParamSpec::optional("source", ParamType::Query).contextual(),
                    ParamSpec::optional("ids", ParamType::UInt64List).contextual(),
                    ParamSpec::optional("frame", ParamType::String).contextual(),
                    ParamSpec::optional("filter", ParamType::String).contextual(),
                    ParamSpec::required("n", ParamType::Int),
                ],
            ),
            OperationSchema::new("all", vec![]),
        ];

        let mut registry = SchemaRegistry::empty();
        for schema in schemas {
            registry.operations.insert(schema.name.clone(), schema);
        }
        registry
    }

    /// Add a schema, replacing any schema with the same operation name.
    pub fn register(&mut self, schema: OperationSchema) -> Result<(), SchemaError> {
        schema.validate()?;
        debug!(operation = %schema.name, params = schema.params.len(), "registered operation schema");
        self.operations.insert(schema.name.clone(), schema);
        Ok(())
    }

    pub fn get(&self, operation: &str) -> Option<&OperationSchema> {
        self.operations.get(operation)
    }

    pub fn contains(&self, operation: &str) -> bool {
        self.operations.contains_key(operation)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// All schemas, sorted by operation name
    pub fn operations(&self) -> impl Iterator<Item = &OperationSchema> {
        let mut schemas: Vec<_> = self.operations.values().collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas.into_iter()
    }

    /// Overlay `other` onto this registry; its schemas win on name clashes.
    pub fn merge(&mut self, other: SchemaRegistry) {
        self.operations.extend(other.operations);
    }

    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let config: RegistryConfig = serde_json::from_str(json)?;

        let mut registry = SchemaRegistry::empty();
        for op in config.operations {
            let schema = op.into_schema()?;
            registry.register(schema)?;
        }
        Ok(registry)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "loading operation schemas");
        Self::from_json(&json)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryConfig {
    operations: Vec<OperationConfig>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OperationConfig {
    name: String,
    #[serde(default)]
    params: Vec<ParamConfig>,
    #[serde(default)]
    variadic: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamConfig {
    name: String,
    #[serde(rename = "type")]
    ty: ParamType,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    default: Option<serde_json::Value>,
    #[serde(default)]
    contextual: bool,
}

impl OperationConfig {
    fn into_schema(self) -> Result<OperationSchema, SchemaError> {
        let operation = self.name;
        let params = self
            .params
            .into_iter()
            .map(|p| p.into_spec(&operation))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OperationSchema {
            name: operation,
            params,
            variadic: self.variadic,
        })
    }
}

impl ParamConfig {
    fn into_spec(self, operation: &str) -> Result<ParamSpec, SchemaError> {
        let default = match self.default {
            None => None,
            Some(json) => Some(json_default(self.ty, &json).ok_or_else(|| {
                SchemaError::InvalidDefault {
                    operation: operation.to_string(),
                    parameter: self.name.clone(),
                    expected: self.ty,
                }
            })?),
        };

        Ok(ParamSpec {
            name: self.name,
            ty: self.ty,
            default,
            required: self.required,
            contextual: self.contextual,
        })
    }
}

fn json_default(ty: ParamType, json: &serde_json::Value) -> Option<ArgValue> {
    match ty {
        ParamType::UInt64 => json.as_u64().map(ArgValue::UInt),
        ParamType::Int => json.as_i64().map(ArgValue::Int),
        ParamType::String => json.as_str().map(ArgValue::from),
        ParamType::UInt64List => json
            .as_array()?
            .iter()
            .map(|v| v.as_u64())
            .collect::<Option<Vec<_>>>()
            .map(ArgValue::UIntList),
        ParamType::Query => None,
    }
}
