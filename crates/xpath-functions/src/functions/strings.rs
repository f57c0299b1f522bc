use super::common::{arg_or_context, number_arg, string_arg};
use crate::error::Error;
use crate::model::{Cursor, Navigator};
use crate::query::{Query, QueryRef};
use crate::runtime::CallSite;
use crate::value::Value;
use smallvec::SmallVec;
use std::rc::Rc;

/// `starts-with`, `ends-with` and `contains`.
///
/// The subject may be a string or a node-set (first node's string-value; an
/// empty node-set yields `false`). The pattern must evaluate to a string.
#[derive(Debug)]
pub struct StringMatch<N: Navigator> {
    function: &'static str,
    test: fn(&str, &str) -> bool,
    subject: QueryRef<N>,
    pattern: QueryRef<N>,
}

impl<N: Navigator> Query<N> for StringMatch<N> {
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        let subject = self.subject.evaluate(cursor)?;
        let Some(subject) = string_arg(self.function, &subject, cursor)? else {
            return Ok(Value::Boolean(false));
        };
        let pattern = match self.pattern.evaluate(cursor)? {
            Value::String(s) => s,
            other => return Err(Error::unexpected(self.function, "string", other.kind())),
        };
        Ok(Value::Boolean((self.test)(&subject, &pattern)))
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

/// `normalize-space(string?)`: strips leading and trailing whitespace.
///
/// An empty node-set yields boolean `false`, not the empty string.
#[derive(Debug)]
pub struct NormalizeSpace<N: Navigator> {
    arg: QueryRef<N>,
}

impl<N: Navigator> Query<N> for NormalizeSpace<N> {
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        let value = self.arg.evaluate(cursor)?;
        Ok(match string_arg("normalize-space", &value, cursor)? {
            Some(s) => Value::String(s.trim().to_string()),
            None => Value::Boolean(false),
        })
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

/// `substring(string, start, length?)` over byte offsets.
#[derive(Debug)]
pub struct Substring<N: Navigator> {
    subject: QueryRef<N>,
    start: QueryRef<N>,
    length: Option<QueryRef<N>>,
}

impl<N: Navigator> Query<N> for Substring<N> {
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        let subject = self.subject.evaluate(cursor)?;
        let Some(subject) = string_arg("substring", &subject, cursor)? else {
            return Ok(Value::String(String::new()));
        };
        let start = number_arg("substring", &self.start.evaluate(cursor)?)?;
        let length = match &self.length {
            Some(q) => Some(number_arg("substring", &q.evaluate(cursor)?)?),
            None => None,
        };
        substring_bytes(&subject, start, length).map(Value::String)
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

/// Slice `s` at byte offsets. Offsets are truncated toward zero; an absent
/// or non-positive length takes the rest of the string.
///
/// A cut that falls inside a multibyte character is a range error, so a
/// successful slice is always exactly `length` bytes long.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub(crate) fn substring_bytes(s: &str, start: f64, length: Option<f64>) -> Result<String, Error> {
    let len = s.len() as i64;
    let start = start.trunc() as i64;
    let length = length.map_or(0, |l| l.trunc() as i64);
    if len.saturating_sub(start) < length || start < 0 || start > len {
        return Err(Error::range_error(
            "substring",
            "start and length argument out of range",
        ));
    }
    let end = if length > 0 { start + length } else { len };
    s.get(start as usize..end as usize)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::range_error(
                "substring",
                "start and length argument must fall on character boundaries",
            )
        })
}

/// `string-length(string?)` in bytes; an empty node-set has length 0.
#[derive(Debug)]
pub struct StringLength<N: Navigator> {
    arg: QueryRef<N>,
}

impl<N: Navigator> Query<N> for StringLength<N> {
    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        let value = self.arg.evaluate(cursor)?;
        let len = string_arg("string-length", &value, cursor)?.map_or(0, |s| s.len());
        Ok(Value::Number(len as f64))
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

/// `concat(arg, arg, ...)`.
///
/// Strings contribute as is, node-sets the string-value of their first node.
/// An empty node-set, or any other sort, contributes nothing.
#[derive(Debug)]
pub struct Concat<N: Navigator> {
    args: Vec<QueryRef<N>>,
}

impl<N: Navigator> Query<N> for Concat<N> {
    fn evaluate(&self, cursor: &mut Cursor<N>) -> Result<Value<'_, N>, Error> {
        let mut parts: SmallVec<[String; 8]> = SmallVec::new();
        for arg in &self.args {
            match arg.evaluate(cursor)? {
                Value::String(s) => parts.push(s),
                Value::NodeSet(q) => {
                    if let Some(node) = q.select(cursor)? {
                        parts.push(node.value());
                    }
                }
                Value::Number(_) | Value::Boolean(_) => {}
            }
        }
        Ok(Value::String(parts.concat()))
    }

    fn select(&self, _cursor: &mut Cursor<N>) -> Result<Option<N>, Error> {
        Ok(None)
    }
}

fn string_match<N: Navigator + 'static>(
    function: &'static str,
    test: fn(&str, &str) -> bool,
    site: CallSite<N>,
) -> Result<QueryRef<N>, Error> {
    let [subject, pattern] = site.exactly(function)?;
    Ok(Rc::new(StringMatch {
        function,
        test,
        subject,
        pattern,
    }))
}

pub(super) fn starts_with<N: Navigator + 'static>(
    site: CallSite<N>,
) -> Result<QueryRef<N>, Error> {
    string_match("starts-with", |s, p| s.starts_with(p), site)
}

pub(super) fn ends_with<N: Navigator + 'static>(site: CallSite<N>) -> Result<QueryRef<N>, Error> {
    string_match("ends-with", |s, p| s.ends_with(p), site)
}

pub(super) fn contains<N: Navigator + 'static>(site: CallSite<N>) -> Result<QueryRef<N>, Error> {
    string_match("contains", |s, p| s.contains(p), site)
}

pub(super) fn normalize_space<N: Navigator + 'static>(
    site: CallSite<N>,
) -> Result<QueryRef<N>, Error> {
    let arg = arg_or_context(site.optional("normalize-space")?);
    Ok(Rc::new(NormalizeSpace { arg }))
}

pub(super) fn substring<N: Navigator + 'static>(
    site: CallSite<N>,
) -> Result<QueryRef<N>, Error> {
    let (subject, start, length) = if site.arity() == 3 {
        let [subject, start, length] = site.exactly("substring")?;
        (subject, start, Some(length))
    } else {
        let [subject, start] = site.exactly("substring")?;
        (subject, start, None)
    };
    Ok(Rc::new(Substring {
        subject,
        start,
        length,
    }))
}

pub(super) fn string_length<N: Navigator + 'static>(
    site: CallSite<N>,
) -> Result<QueryRef<N>, Error> {
    let arg = arg_or_context(site.optional("string-length")?);
    Ok(Rc::new(StringLength { arg }))
}

pub(super) fn concat<N: Navigator + 'static>(site: CallSite<N>) -> Result<QueryRef<N>, Error> {
    Ok(Rc::new(Concat { args: site.args }))
}

#[cfg(test)]
mod tests {
    use super::substring_bytes;
    use crate::error::ErrorKind;

    #[test]
    fn slices_by_byte_offset() {
        assert_eq!(substring_bytes("hello", 1.0, Some(3.0)).unwrap(), "ell");
        assert_eq!(substring_bytes("hello", 2.0, None).unwrap(), "llo");
        assert_eq!(substring_bytes("hello", 5.0, None).unwrap(), "");
        assert_eq!(substring_bytes("hello", 0.0, Some(0.0)).unwrap(), "hello");
    }

    #[test]
    fn truncates_fractional_offsets() {
        assert_eq!(substring_bytes("hello", 1.9, Some(2.7)).unwrap(), "el");
    }

    #[test]
    fn rejects_out_of_range() {
        for (start, length) in [(3.0, Some(10.0)), (6.0, None), (-1.0, Some(1.0))] {
            let err = substring_bytes("hello", start, length).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range);
        }
    }

    #[test]
    fn rejects_cut_inside_multibyte_char() {
        // "é" is two bytes
        for (start, length) in [(0.0, Some(1.0)), (1.0, None), (1.0, Some(1.0))] {
            let err = substring_bytes("é", start, length).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range);
        }
        assert_eq!(substring_bytes("aé", 1.0, Some(2.0)).unwrap(), "é");
    }
}
