use crate::error::Error;
use crate::model::{Cursor, Navigator};
use crate::query::{Query, QueryRef};
use crate::runtime::CallSite;
use crate::value::Value;
use std::rc::Rc;

/// `boolean(expr)`: the boolean coercion of the argument.
#[derive(Debug)]
pub struct BooleanFn<N: Navigator> {
    arg: QueryRef<N>,
}

impl<N: Navigator> Query<N> for BooleanFn<N> {
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        let value = self.arg.evaluate(cursor)?;
        Ok(Value::Boolean(value.to_boolean(cursor)?))
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

/// `not(expr)`.
///
/// Negates a boolean and tests a node-set for emptiness. Strings and numbers
/// yield `false` rather than a type error.
#[derive(Debug)]
pub struct Not<N: Navigator> {
    arg: QueryRef<N>,
}

impl<N: Navigator> Query<N> for Not<N> {
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        let b = match self.arg.evaluate(cursor)? {
            Value::Boolean(b) => !b,
            Value::NodeSet(q) => q.select(cursor)?.is_none(),
            Value::String(_) | Value::Number(_) => false,
        };
        Ok(Value::Boolean(b))
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

pub(super) fn boolean<N: Navigator + 'static>(site: CallSite<N>) -> Result<QueryRef<N>, Error> {
    let [arg] = site.exactly("boolean")?;
    Ok(Rc::new(BooleanFn { arg }))
}

pub(super) fn not<N: Navigator + 'static>(site: CallSite<N>) -> Result<QueryRef<N>, Error> {
    let [arg] = site.exactly("not")?;
    Ok(Rc::new(Not { arg }))
}
