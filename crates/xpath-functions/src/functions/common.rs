use crate::error::Error;
use crate::model::{Cursor, Navigator};
use crate::query::{ContextQuery, Query, QueryRef};
use crate::value::Value;
use std::rc::Rc;

/// Argument of an optional-argument call, defaulting to the context node.
pub(super) fn arg_or_context<N: Navigator + 'static>(arg: Option<QueryRef<N>>) -> QueryRef<N> {
    arg.unwrap_or_else(|| Rc::new(ContextQuery::new()))
}

/// First node selected by the argument. Strings, numbers and booleans select
/// nothing.
pub(super) fn first_node<N: Navigator>(
    arg: &dyn Query<N>,
    cursor: &mut Cursor<N>,
) -> Result<Option<N>, Error> {
    match arg.evaluate(cursor)? {
        Value::NodeSet(q) => q.select(cursor),
        Value::String(_) | Value::Number(_) | Value::Boolean(_) => Ok(None),
    }
}

/// String argument: a string value as is, or the string-value of the first
/// node of a node-set. `None` when the node-set is empty.
pub(super) fn string_arg<N: Navigator>(
    function: &'static str,
    value: &Value<'_, N>,
    cursor: &mut Cursor<N>,
) -> Result<Option<String>, Error> {
    match value {
        Value::String(_) | Value::NodeSet(_) => value.to_string_value(function, cursor),
        other => Err(Error::unexpected(function, "string", other.kind())),
    }
}

/// Numeric argument; only a number value is accepted.
pub(super) fn number_arg<N: Navigator>(
    function: &'static str,
    value: &Value<'_, N>,
) -> Result<f64, Error> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(Error::unexpected(function, "number", other.kind())),
    }
}

// Node counts stay far below 2^53.
#[allow(clippy::cast_precision_loss)]
pub(super) fn count_to_number(count: usize) -> f64 {
    count as f64
}
