use crate::ast::Position;

/// An argument value as written, before any schema is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Unsigned integer literal
    ///
    /// # Example
    /// ```text
    /// 10
    /// ```
    Number(u64),

    /// Bare word used as a symbolic value, such as a frame name
    ///
    /// # Example
    /// ```text
    /// general
    /// ```
    Identifier(String),

    /// Quoted string literal
    ///
    /// # Example
    /// ```text
    /// "brand names"
    /// ```
    Quoted(String),

    /// Nested call
    ///
    /// # Example
    /// ```text
    /// get(10, general)
    /// ```
    Call(RawCall),

    /// Bracketed list; elements may be numbers, calls or anything else
    ///
    /// # Examples
    /// ```text
    /// [1, 2, 3]
    /// [get(10), get(11)]
    /// ```
    List(Vec<RawValue>),
}

impl RawValue {
    /// Short name of the value's shape for type mismatch diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawValue::Number(_) => "number",
            RawValue::Identifier(_) => "identifier",
            RawValue::Quoted(_) => "string",
            RawValue::Call(_) => "call",
            RawValue::List(_) => "list",
        }
    }
}

/// One argument of a call: `value` or `name=value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArgument {
    /// Keyword name; `None` for positional arguments
    pub name: Option<String>,

    pub value: RawValue,

    /// Where the argument starts (the keyword, if any)
    pub position: Position,
}

impl RawArgument {
    pub fn positional(value: RawValue, position: Position) -> Self {
        RawArgument {
            name: None,
            value,
            position,
        }
    }

    pub fn keyword(name: impl Into<String>, value: RawValue, position: Position) -> Self {
        RawArgument {
            name: Some(name.into()),
            value,
            position,
        }
    }

    pub fn is_keyword(&self) -> bool {
        self.name.is_some()
    }
}

/// An unbound call: operation name plus arguments in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCall {
    pub operation: String,

    /// Arguments exactly as written; order decides positional binding and
    /// subquery order
    pub arguments: Vec<RawArgument>,

    pub position: Position,
}
