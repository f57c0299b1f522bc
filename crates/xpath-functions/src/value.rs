use crate::error::Error;
use crate::model::{Cursor, Navigator};
use crate::query::Query;
use core::fmt;

/// Runtime value produced by evaluating a query.
///
/// A node-set is not materialized: it is the query that produced it, and nodes
/// are pulled one at a time with [`Query::select`] against the live cursor.
/// Coercions never mutate the value itself, but coercing a node-set advances
/// that query's iteration.
#[derive(Debug, Clone)]
pub enum Value<'q, N: Navigator> {
    NodeSet(&'q dyn Query<N>),
    String(String),
    Number(f64),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    NodeSet,
    String,
    Number,
    Boolean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::NodeSet => "node-set",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
        })
    }
}

impl<'q, N: Navigator> Value<'q, N> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::NodeSet(_) => ValueKind::NodeSet,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Boolean(_) => ValueKind::Boolean,
        }
    }

    /// Boolean coercion.
    ///
    /// A node-set is true when it yields at least one node, a string when it is
    /// non-empty. A number is true when it is *equal to zero*; this inverted rule
    /// is kept for compatibility with existing query behavior.
    #[allow(clippy::float_cmp)]
    pub fn to_boolean(&self, cursor: &mut Cursor<N>) -> Result<bool, Error> {
        Ok(match self {
            Value::NodeSet(q) => q.select(cursor)?.is_some(),
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => *n == 0.0,
            Value::Boolean(b) => *b,
        })
    }

    /// String coercion. A node-set yields the string-value of its first node,
    /// or `None` when the selection is empty; callers decide what that means.
    pub fn to_string_value(
        &self,
        function: &'static str,
        cursor: &mut Cursor<N>,
    ) -> Result<Option<String>, Error> {
        match self {
            Value::NodeSet(q) => Ok(q.select(cursor)?.map(|n| n.value())),
            Value::String(s) => Ok(Some(s.clone())),
            Value::Number(n) => Ok(Some(format_number(*n))),
            Value::Boolean(_) => Err(Error::unexpected(function, "string", self.kind())),
        }
    }

    /// Number coercion. Text that does not parse is a type error.
    pub fn to_number(&self, function: &'static str, cursor: &mut Cursor<N>) -> Result<f64, Error> {
        let text = match self {
            Value::Number(n) => return Ok(*n),
            Value::String(s) => s.clone(),
            Value::NodeSet(q) => match q.select(cursor)? {
                Some(node) => node.value(),
                None => return Err(Error::type_error(function, "argument node-set is empty")),
            },
            Value::Boolean(_) => return Err(Error::unexpected(function, "number", self.kind())),
        };
        parse_number(&text).ok_or_else(|| {
            Error::type_error(function, format!("argument '{text}' is not a number"))
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl<N: Navigator> From<String> for Value<'_, N> {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<N: Navigator> From<&str> for Value<'_, N> {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<N: Navigator> From<f64> for Value<'_, N> {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl<N: Navigator> From<bool> for Value<'_, N> {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Parse a floating literal; `None` when the text is not a number.
///
/// Finite literals whose magnitude overflows `f64` (e.g. `1e400`) are
/// rejected; only the spelled-out `inf`/`infinity` literals yield infinities.
pub fn parse_number(text: &str) -> Option<f64> {
    let n = text.parse::<f64>().ok()?;
    if n.is_infinite() && !is_infinity_literal(text) {
        return None;
    }
    Some(n)
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Canonical decimal text of a number.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return (n as i64).to_string();
    }
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_float_literals() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("-1.5"), Some(-1.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("x"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number(" 1"), None);
    }

    #[test]
    fn parse_rejects_overflowing_literals() {
        assert_eq!(parse_number("1e400"), None);
        assert_eq!(parse_number("-1e400"), None);
        assert_eq!(parse_number("inf"), Some(f64::INFINITY));
        assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_number("1e308"), Some(1e308));
    }

    #[test]
    fn format_drops_integral_fraction() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }
}
