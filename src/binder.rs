//! Argument binding: resolve a [`RawCall`] against its operation schema.
//!
//! Slots are filled in schema order. For each slot a keyword argument with
//! the slot's name wins, wherever it appears in the call; otherwise the next
//! unused positional argument is taken; otherwise the slot's default applies.
//! A contextual slot only takes a positional argument whose shape fits its
//! type and is skipped otherwise.
//!
//! Once every slot is resolved, arguments are converted in source order so
//! that nested calls land in [`Query::subqueries`] exactly as they were
//! written, regardless of which were passed by keyword.
//!
//! Operations missing from the registry are bound in pass-through mode: their
//! nested calls (including those inside lists) become subqueries, and all
//! other arguments are dropped without validation.

use crate::ast::{ArgValue, Query, RawArgument, RawCall, RawValue};
use crate::error::BindError;
use crate::schema::{OperationSchema, ParamSpec, ParamType, SchemaRegistry};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Where an argument of a schema-bound call ended up
#[derive(Debug, Clone, Copy)]
enum Target {
    Slot(usize),
    /// Leftover argument of a variadic operation
    Rest,
}

pub struct Binder<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Binder<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Binder { registry }
    }

    pub fn bind(&self, call: &RawCall) -> Result<Query, BindError> {
        let query = match self.registry.get(&call.operation) {
            Some(schema) => self.bind_schema(call, schema)?,
            None => self.bind_passthrough(call)?,
        };
        trace!(
            operation = %query.operation,
            args = query.args.len(),
            subqueries = query.subqueries.len(),
            "bound query"
        );
        Ok(query)
    }

    fn bind_passthrough(&self, call: &RawCall) -> Result<Query, BindError> {
        debug!(operation = %call.operation, "unknown operation, binding in pass-through mode");

        let mut subqueries = vec![];
        for arg in &call.arguments {
            self.collect_passthrough(&arg.value, &mut subqueries)?;
        }

        Ok(Query {
            operation: call.operation.clone(),
            args: BTreeMap::new(),
            subqueries,
        })
    }

    fn collect_passthrough(&self, value: &RawValue, out: &mut Vec<Query>) -> Result<(), BindError> {
        match value {
            RawValue::Call(call) => out.push(self.bind(call)?),
            RawValue::List(items) => {
                for item in items {
                    self.collect_passthrough(item, out)?;
                }
            }
            RawValue::Number(_) | RawValue::Identifier(_) | RawValue::Quoted(_) => {}
        }
        Ok(())
    }

    fn bind_schema(&self, call: &RawCall, schema: &OperationSchema) -> Result<Query, BindError> {
        let targets = resolve_slots(call, schema)?;

        let mut args = BTreeMap::new();
        for param in &schema.params {
            if let Some(default) = &param.default {
                args.insert(param.name.clone(), default.clone());
            }
        }

        let mut subqueries = vec![];
        for (arg, target) in call.arguments.iter().zip(targets) {
            match target {
                Target::Slot(slot) => {
                    let param = &schema.params[slot];
                    if param.ty == ParamType::Query {
                        self.collect_queries(call, &param.name, arg, &mut subqueries)?;
                    } else {
                        let value = coerce(param.ty, &arg.value)
                            .ok_or_else(|| type_mismatch(call, &param.name, param.ty, arg))?;
                        args.insert(param.name.clone(), value);
                    }
                }
                Target::Rest => {
                    let name = arg.name.as_deref().unwrap_or("query...");
                    self.collect_queries(call, name, arg, &mut subqueries)?;
                }
            }
        }

        Ok(Query {
            operation: call.operation.clone(),
            args,
            subqueries,
        })
    }

    /// Bind a query-typed argument: a call, or a list of calls
    fn collect_queries(
        &self,
        call: &RawCall,
        parameter: &str,
        arg: &RawArgument,
        out: &mut Vec<Query>,
    ) -> Result<(), BindError> {
        let mismatch = || type_mismatch(call, parameter, ParamType::Query, arg);

        match &arg.value {
            RawValue::Call(nested) => out.push(self.bind(nested)?),
            RawValue::List(items) => {
                for item in items {
                    match item {
                        RawValue::Call(nested) => out.push(self.bind(nested)?),
                        _ => return Err(mismatch()),
                    }
                }
            }
            _ => return Err(mismatch()),
        }
        Ok(())
    }
}

/// Assign every argument of `call` to a slot of `schema` (or to the variadic
/// tail), checking required slots and leftovers.
fn resolve_slots(call: &RawCall, schema: &OperationSchema) -> Result<Vec<Target>, BindError> {
    let mut targets: Vec<Option<Target>> = vec![None; call.arguments.len()];
    let positional: Vec<usize> = call
        .arguments
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.is_keyword())
        .map(|(i, _)| i)
        .collect();
    let mut next_positional = 0;

    for (slot, param) in schema.params.iter().enumerate() {
        let keyword = call.arguments.iter().enumerate().position(|(i, a)| {
            targets[i].is_none() && a.name.as_deref() == Some(param.name.as_str())
        });
        if let Some(i) = keyword {
            targets[i] = Some(Target::Slot(slot));
            continue;
        }

        if let Some(&i) = positional.get(next_positional) {
            if !param.contextual || fits(param, &call.arguments[i].value) {
                targets[i] = Some(Target::Slot(slot));
                next_positional += 1;
                continue;
            }
        }

        if param.required {
            return Err(BindError::MissingRequiredParameter {
                operation: call.operation.clone(),
                parameter: param.name.clone(),
            });
        }
    }

    call.arguments
        .iter()
        .zip(targets)
        .enumerate()
        .map(|(i, (arg, target))| match target {
            Some(target) => Ok(target),
            None if schema.variadic && is_query_shaped(&arg.value) => Ok(Target::Rest),
            None if schema.variadic && !arg.is_keyword() => Err(type_mismatch(
                call,
                "query...",
                ParamType::Query,
                arg,
            )),
            None => Err(BindError::UnexpectedArgument {
                operation: call.operation.clone(),
                argument: describe_argument(call, i, arg),
                position: arg.position,
            }),
        })
        .collect()
}

fn describe_argument(call: &RawCall, index: usize, arg: &RawArgument) -> String {
    match &arg.name {
        Some(name) => {
            let earlier = call.arguments[..index]
                .iter()
                .any(|a| a.name.as_deref() == Some(name.as_str()));
            if earlier {
                format!("duplicate keyword '{}'", name)
            } else {
                format!("keyword '{}'", name)
            }
        }
        None => {
            let ordinal = call.arguments[..index]
                .iter()
                .filter(|a| !a.is_keyword())
                .count()
                + 1;
            format!("positional argument {} ({})", ordinal, arg.value.kind_name())
        }
    }
}

fn is_query_shaped(value: &RawValue) -> bool {
    match value {
        RawValue::Call(_) => true,
        RawValue::List(items) => !items.is_empty() && items.iter().all(|v| matches!(v, RawValue::Call(_))),
        _ => false,
    }
}

/// Whether a positional value may fill a contextual slot
fn fits(param: &ParamSpec, value: &RawValue) -> bool {
    match param.ty {
        ParamType::Query => is_query_shaped(value),
        ty => coerce(ty, value).is_some(),
    }
}

fn coerce(ty: ParamType, value: &RawValue) -> Option<ArgValue> {
    match (ty, value) {
        (ParamType::UInt64, RawValue::Number(n)) => Some(ArgValue::UInt(*n)),
        (ParamType::Int, RawValue::Number(n)) => i64::try_from(*n).ok().map(ArgValue::Int),
        (ParamType::String, RawValue::Identifier(s) | RawValue::Quoted(s)) => {
            Some(ArgValue::Text(s.clone()))
        }
        (ParamType::UInt64List, RawValue::List(items)) => items
            .iter()
            .map(|item| match item {
                RawValue::Number(n) => Some(*n),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(ArgValue::UIntList),
        _ => None,
    }
}

fn type_mismatch(call: &RawCall, parameter: &str, expected: ParamType, arg: &RawArgument) -> BindError {
    let found = match (&arg.value, expected) {
        (RawValue::Number(_), ParamType::Int) => "number out of range".to_string(),
        (RawValue::List(items), _) => match items.iter().find(|v| match expected {
            ParamType::Query => !matches!(v, RawValue::Call(_)),
            _ => !matches!(v, RawValue::Number(_)),
        }) {
            Some(bad) => format!("list containing {}", bad.kind_name()),
            None => "list".to_string(),
        },
        (value, _) => value.kind_name().to_string(),
    };

    BindError::TypeMismatch {
        operation: call.operation.clone(),
        parameter: parameter.to_string(),
        expected,
        found,
        position: arg.position,
    }
}

/// Bind a parsed call against `registry`.
pub fn bind(raw: &RawCall, registry: &SchemaRegistry) -> Result<Query, BindError> {
    Binder::new(registry).bind(raw)
}
