use crate::error::Error;
use crate::model::{Cursor, Navigator};
use crate::query::Query;
use crate::value::Value;

/// Evaluate a compiled expression against the cursor.
///
/// The first error aborts the whole pass. The cursor may be left elsewhere
/// than where it started, e.g. after `last()`.
pub fn evaluate<'q, N: Navigator>(
    query: &'q dyn Query<N>,
    cursor: &mut Cursor<N>,
) -> Result<Value<'q, N>, Error> {
    let _span = tracing::trace_span!("evaluate").entered();
    query.evaluate(cursor)
}

/// Evaluate and coerce the result to a boolean, as a predicate would.
pub fn evaluate_boolean<N: Navigator>(
    query: &dyn Query<N>,
    cursor: &mut Cursor<N>,
) -> Result<bool, Error> {
    let value = evaluate(query, cursor)?;
    value.to_boolean(cursor)
}
