use crate::value::ValueKind;
use core::fmt;

/// Discriminant of [`Error`], convenient for matching in callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Type,
    Range,
    UnknownFunction,
    WrongArity,
}

/// Errors raised while building or evaluating a function call.
///
/// Every builtin propagates the first error it sees; the whole evaluation pass
/// is aborted, nothing is collected or retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An argument evaluated to a sort the function cannot use.
    #[error("{function}() function {message}")]
    Type {
        function: &'static str,
        message: String,
    },
    /// A computed offset or length falls outside the subject string.
    #[error("{function}() function {message}")]
    Range {
        function: &'static str,
        message: String,
    },
    #[error("unknown function: {name}()")]
    UnknownFunction { name: String },
    #[error(
        "function {name}() cannot be called with {} (accepted: {})",
        Plural::of(.arity),
        Arities(.available)
    )]
    WrongArity {
        name: String,
        arity: usize,
        available: Vec<(usize, Option<usize>)>,
    },
}

impl Error {
    /// Type error with a free-form message, e.g. `"argument type must be string"`.
    pub fn type_error(function: &'static str, message: impl Into<String>) -> Self {
        Error::Type {
            function,
            message: message.into(),
        }
    }

    /// Type error naming the expected sort and the sort actually seen.
    pub fn unexpected(function: &'static str, expected: &str, actual: ValueKind) -> Self {
        Error::Type {
            function,
            message: format!("argument type must be {expected} (got {actual})"),
        }
    }

    pub fn range_error(function: &'static str, message: impl Into<String>) -> Self {
        Error::Range {
            function,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Type { .. } => ErrorKind::Type,
            Error::Range { .. } => ErrorKind::Range,
            Error::UnknownFunction { .. } => ErrorKind::UnknownFunction,
            Error::WrongArity { .. } => ErrorKind::WrongArity,
        }
    }

    /// Name of the function that raised the error.
    pub fn function(&self) -> &str {
        match self {
            Error::Type { function, .. } | Error::Range { function, .. } => function,
            Error::UnknownFunction { name } | Error::WrongArity { name, .. } => name.as_str(),
        }
    }
}

struct Plural(usize);

impl Plural {
    fn of(n: &usize) -> Self {
        Plural(*n)
    }
}

impl fmt::Display for Plural {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("no arguments"),
            1 => f.write_str("one argument"),
            n => write!(f, "{n} arguments"),
        }
    }
}

struct Arities<'a>(&'a [(usize, Option<usize>)]);

impl fmt::Display for Arities<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (min, max)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match max {
                Some(max) if max == min => write!(f, "{min}")?,
                Some(max) => write!(f, "{min}-{max}")?,
                None => write!(f, "{min} or more")?,
            }
        }
        Ok(())
    }
}
