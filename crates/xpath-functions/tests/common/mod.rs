#![allow(dead_code)]

use std::rc::Rc;
use xpath_functions::{
    CallSite, ChildQuery, Constant, ContextQuery, Cursor, Error, QueryRef, SimpleNode,
    StaticContext, Value, default_registry, evaluate,
};

pub type Q = QueryRef<SimpleNode>;

pub fn s(v: &str) -> Q {
    Rc::new(Constant::string(v))
}

pub fn n(v: f64) -> Q {
    Rc::new(Constant::number(v))
}

pub fn b(v: bool) -> Q {
    Rc::new(Constant::boolean(v))
}

/// `child::name` from the context node.
pub fn child(name: &str) -> Q {
    Rc::new(ChildQuery::named(name))
}

pub fn any_child() -> Q {
    Rc::new(ChildQuery::any())
}

pub fn context() -> Q {
    Rc::new(ContextQuery::new())
}

pub fn call(name: &str, args: Vec<Q>) -> Q {
    default_registry()
        .build(&StaticContext::default(), name, CallSite::new(args))
        .expect("function should build")
}

pub fn call_in(name: &str, input: Q) -> Q {
    default_registry()
        .build(
            &StaticContext::default(),
            name,
            CallSite::new(vec![]).with_input(input),
        )
        .expect("function should build")
}

pub fn eval_at(q: &Q, node: &SimpleNode) -> Result<Scalar, Error> {
    let mut cursor = Cursor::new(node.clone());
    let v = evaluate(&**q, &mut cursor)?;
    Ok(Scalar::from(&v))
}

/// Owned snapshot of a scalar result for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    NodeSet,
    String(String),
    Number(f64),
    Boolean(bool),
}

impl From<&Value<'_, SimpleNode>> for Scalar {
    fn from(v: &Value<'_, SimpleNode>) -> Self {
        match v {
            Value::NodeSet(_) => Scalar::NodeSet,
            Value::String(s) => Scalar::String(s.clone()),
            Value::Number(n) => Scalar::Number(*n),
            Value::Boolean(b) => Scalar::Boolean(*b),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}
