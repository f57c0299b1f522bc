//! Compiled sub-expressions consumed by the function layer.
//!
//! A parser or tree builder produces [`Query`] values; the builtins hold their
//! argument queries and evaluate them against the shared [`Cursor`]. The few
//! concrete queries here (context node, literals, child step) are enough to
//! drive every builtin without a parser.
use crate::error::Error;
use crate::model::{Cursor, Navigator, NodeKind};
use crate::value::Value;
use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::Rc;

/// Optional predicate capability of a query, used by `position()`, `last()`
/// and `count()` to filter the nodes they scan.
pub trait NodeTest<N>: fmt::Debug {
    fn test(&self, node: &N) -> bool;
}

pub trait Query<N: Navigator>: fmt::Debug {
    /// Evaluate to whichever sort the expression naturally yields. Node-set
    /// queries reset their iteration and return themselves.
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error>;

    /// Pull the next node of the sequence, `None` once exhausted.
    fn select(&self, cursor: &mut Cursor<N>) -> Result<Option<N>, Error>;

    fn node_test(&self) -> Option<&dyn NodeTest<N>> {
        None
    }
}

/// Shared handle to a query owned by the compiled expression tree.
pub type QueryRef<N> = Rc<dyn Query<N>>;

/// Predicate of `query`, or the always-true predicate when the query is
/// absent or has no test capability.
pub fn predicate<'a, N: Navigator>(query: Option<&'a dyn Query<N>>) -> impl Fn(&N) -> bool + 'a {
    let test = query.and_then(|q| q.node_test());
    move |node: &N| test.is_none_or(|t| t.test(node))
}

/// The context node as a one-item sequence.
#[derive(Debug, Default)]
pub struct ContextQuery {
    consumed: Cell<bool>,
}

impl ContextQuery {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N: Navigator> Query<N> for ContextQuery {
    fn evaluate(&self, _cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        self.consumed.set(false);
        Ok(Value::NodeSet(self))
    }

    fn select(&self, cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        if self.consumed.replace(true) {
            return Ok(None);
        }
        Ok(Some(cursor.current().clone()))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
}

/// A literal string, number or boolean.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant(Literal);

impl Constant {
    pub fn string(s: impl Into<String>) -> Self {
        Constant(Literal::String(s.into()))
    }

    pub fn number(n: f64) -> Self {
        Constant(Literal::Number(n))
    }

    pub fn boolean(b: bool) -> Self {
        Constant(Literal::Boolean(b))
    }
}

impl<N: Navigator> Query<N> for Constant {
    fn evaluate(&self, _cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        Ok(match &self.0 {
            Literal::String(s) => Value::String(s.clone()),
            Literal::Number(n) => Value::Number(*n),
            Literal::Boolean(b) => Value::Boolean(*b),
        })
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

/// Element test on the local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTest {
    local: String,
}

impl NameTest {
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            local: local.into(),
        }
    }
}

impl<N: Navigator> NodeTest<N> for NameTest {
    fn test(&self, node: &N) -> bool {
        node.kind() == NodeKind::Element && node.local_name() == self.local
    }
}

#[derive(Debug)]
enum ChildState<N> {
    Start,
    At(N),
    Done,
}

/// `child::` step from the cursor's current node, optionally filtered.
///
/// The filter doubles as the query's predicate capability.
#[derive(Debug)]
pub struct ChildQuery<N: Navigator> {
    test: Option<Box<dyn NodeTest<N>>>,
    state: RefCell<ChildState<N>>,
}

impl<N: Navigator> ChildQuery<N> {
    /// All children.
    pub fn any() -> Self {
        Self {
            test: None,
            state: RefCell::new(ChildState::Start),
        }
    }

    pub fn matching(test: impl NodeTest<N> + 'static) -> Self {
        Self {
            test: Some(Box::new(test)),
            state: RefCell::new(ChildState::Start),
        }
    }

    /// Element children with the given local name.
    pub fn named(local: &str) -> Self {
        Self::matching(NameTest::new(local))
    }

    fn accepts(&self, node: &N) -> bool {
        self.test.as_ref().is_none_or(|t| t.test(node))
    }
}

impl<N: Navigator> Query<N> for ChildQuery<N> {
    fn evaluate(&self, _cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        *self.state.borrow_mut() = ChildState::Start;
        Ok(Value::NodeSet(self))
    }

    fn select(&self, cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        let mut state = self.state.borrow_mut();
        loop {
            let next = match &*state {
                ChildState::Start => {
                    let mut node = cursor.current().clone();
                    node.move_to_child().then_some(node)
                }
                ChildState::At(prev) => {
                    let mut node = prev.clone();
                    node.move_to_next().then_some(node)
                }
                ChildState::Done => return Ok(None),
            };
            let Some(node) = next else {
                *state = ChildState::Done;
                return Ok(None);
            };
            *state = ChildState::At(node.clone());
            if self.accepts(&node) {
                return Ok(Some(node));
            }
        }
    }

    fn node_test(&self) -> Option<&dyn NodeTest<N>> {
        self.test.as_deref()
    }
}
