use super::common::{arg_or_context, count_to_number, first_node};
use crate::error::Error;
use crate::model::{Cursor, Navigator};
use crate::query::{Query, QueryRef, predicate};
use crate::runtime::CallSite;
use crate::value::{Value, parse_number};
use std::rc::Rc;

/// `position()`: 1-based index of the current node among the nodes accepted
/// by the enclosing step's predicate, counted backwards to the first sibling.
///
/// Scans a saved copy of the cursor position and restores it afterwards.
#[derive(Debug)]
pub struct Position<N: Navigator> {
    input: Option<QueryRef<N>>,
}

impl<N: Navigator> Query<N> for Position<N> {
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        let test = predicate(self.input.as_deref());
        let saved = cursor.save_position();
        let mut count = 1;
        while cursor.move_to_previous() {
            if test(cursor.current()) {
                count += 1;
            }
        }
        cursor.restore_position(saved);
        Ok(Value::Number(count_to_number(count)))
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

/// `last()`: number of nodes in the whole sequence accepted by the enclosing
/// step's predicate.
///
/// Relocates the shared cursor: it moves to the first node and walks forward
/// to exhaustion, leaving the cursor on the final node. Callers must not rely
/// on the cursor position after evaluating `last()`.
#[derive(Debug)]
pub struct Last<N: Navigator> {
    input: Option<QueryRef<N>>,
}

impl<N: Navigator> Query<N> for Last<N> {
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        let test = predicate(self.input.as_deref());
        cursor.move_to_first();
        let mut count = 0;
        loop {
            if test(cursor.current()) {
                count += 1;
            }
            if !cursor.move_to_next() {
                break;
            }
        }
        tracing::trace!(count, "last() moved cursor to end of sequence");
        Ok(Value::Number(count_to_number(count)))
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

/// `count(node-set)`. A non-node-set argument counts as empty.
#[derive(Debug)]
pub struct Count<N: Navigator> {
    arg: QueryRef<N>,
}

impl<N: Navigator> Query<N> for Count<N> {
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        let test = predicate(Some(&*self.arg));
        let mut count = 0;
        if let Value::NodeSet(q) = self.arg.evaluate(cursor)? {
            while let Some(node) = q.select(cursor)? {
                if test(&node) {
                    count += 1;
                }
            }
        }
        Ok(Value::Number(count_to_number(count)))
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

/// `sum(node-set | number | string)`.
///
/// Node values that do not parse as numbers are skipped. A boolean argument
/// sums to 0.
#[derive(Debug)]
pub struct Sum<N: Navigator> {
    arg: QueryRef<N>,
}

impl<N: Navigator> Query<N> for Sum<N> {
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        let sum = match self.arg.evaluate(cursor)? {
            Value::NodeSet(q) => {
                let mut sum = 0.0;
                while let Some(node) = q.select(cursor)? {
                    let text = node.value();
                    match parse_number(&text) {
                        Some(v) => sum += v,
                        None => {
                            tracing::debug!(value = %text, "sum() skipping non-numeric node value");
                        }
                    }
                }
                sum
            }
            v @ (Value::Number(_) | Value::String(_)) => v.to_number("sum", cursor)?,
            Value::Boolean(_) => 0.0,
        };
        Ok(Value::Number(sum))
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

/// `name(node-set?)`: `prefix:local` of the first node, or the empty string
/// when nothing is selected (including scalar arguments).
#[derive(Debug)]
pub struct Name<N: Navigator> {
    arg: QueryRef<N>,
}

impl<N: Navigator> Query<N> for Name<N> {
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        let Some(node) = first_node(&*self.arg, cursor)? else {
            return Ok(Value::String(String::new()));
        };
        let name = match node.prefix() {
            "" => node.local_name().to_string(),
            prefix => format!("{prefix}:{}", node.local_name()),
        };
        Ok(Value::String(name))
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

/// `local-name(node-set?)`: local name of the first node, prefix ignored.
#[derive(Debug)]
pub struct LocalName<N: Navigator> {
    arg: QueryRef<N>,
}

impl<N: Navigator> Query<N> for LocalName<N> {
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        let name = first_node(&*self.arg, cursor)?
            .map(|node| node.local_name().to_string())
            .unwrap_or_default();
        Ok(Value::String(name))
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

pub(super) fn position<N: Navigator + 'static>(site: CallSite<N>) -> Result<QueryRef<N>, Error> {
    Ok(Rc::new(Position { input: site.input }))
}

pub(super) fn last<N: Navigator + 'static>(site: CallSite<N>) -> Result<QueryRef<N>, Error> {
    Ok(Rc::new(Last { input: site.input }))
}

pub(super) fn count<N: Navigator + 'static>(site: CallSite<N>) -> Result<QueryRef<N>, Error> {
    let [arg] = site.exactly("count")?;
    Ok(Rc::new(Count { arg }))
}

pub(super) fn sum<N: Navigator + 'static>(site: CallSite<N>) -> Result<QueryRef<N>, Error> {
    let [arg] = site.exactly("sum")?;
    Ok(Rc::new(Sum { arg }))
}

pub(super) fn name<N: Navigator + 'static>(site: CallSite<N>) -> Result<QueryRef<N>, Error> {
    let arg = arg_or_context(site.optional("name")?);
    Ok(Rc::new(Name { arg }))
}

pub(super) fn local_name<N: Navigator + 'static>(
    site: CallSite<N>,
) -> Result<QueryRef<N>, Error> {
    let arg = arg_or_context(site.optional("local-name")?);
    Ok(Rc::new(LocalName { arg }))
}
