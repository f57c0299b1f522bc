use crate::error::Error;
use crate::model::Navigator;
use crate::query::QueryRef;
use core::cmp::Ordering;
use core::fmt;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

pub type Arity = usize;

/// Arguments of one function call site, as handed over by the tree builder.
#[derive(Debug)]
pub struct CallSite<N: Navigator> {
    /// Enclosing step of the call, e.g. `item` in `item[position() = 2]`.
    /// `position()` and `last()` use its predicate capability.
    pub input: Option<QueryRef<N>>,
    pub args: Vec<QueryRef<N>>,
}

impl<N: Navigator> CallSite<N> {
    pub fn new(args: Vec<QueryRef<N>>) -> Self {
        Self { input: None, args }
    }

    pub fn with_input(mut self, input: QueryRef<N>) -> Self {
        self.input = Some(input);
        self
    }

    pub fn arity(&self) -> Arity {
        self.args.len()
    }

    /// Take exactly `K` arguments.
    pub fn exactly<const K: usize>(self, name: &str) -> Result<[QueryRef<N>; K], Error> {
        let arity = self.args.len();
        <[QueryRef<N>; K]>::try_from(self.args).map_err(|_| Error::WrongArity {
            name: name.to_string(),
            arity,
            available: vec![(K, Some(K))],
        })
    }

    /// Take at most one argument; `None` when the call site has none.
    pub fn optional(self, name: &str) -> Result<Option<QueryRef<N>>, Error> {
        let arity = self.args.len();
        let mut args = self.args.into_iter();
        let first = args.next();
        if args.next().is_some() {
            return Err(Error::WrongArity {
                name: name.to_string(),
                arity,
                available: vec![(0, Some(1))],
            });
        }
        Ok(first)
    }
}

/// Builds the evaluator for one call site from its argument queries.
pub type FunctionConstructor<N> =
    Arc<dyn Fn(CallSite<N>) -> Result<QueryRef<N>, Error> + Send + Sync>;

// (min_arity, max_arity, constructor); max_arity None means variadic.
pub type FunctionOverload<N> = (Arity, Option<Arity>, FunctionConstructor<N>);
pub type FunctionOverloads<N> = Vec<FunctionOverload<N>>;

/// Error type returned by function resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    Unknown(String),
    /// Function exists, but not for the requested arity. Provides known arity ranges.
    WrongArity {
        name: String,
        arity: Arity,
        available: Vec<(Arity, Option<Arity>)>,
    },
}

impl From<ResolveError> for Error {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::Unknown(name) => Error::UnknownFunction { name },
            ResolveError::WrongArity {
                name,
                arity,
                available,
            } => Error::WrongArity {
                name,
                arity,
                available,
            },
        }
    }
}

/// Compile-time configuration of function resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticContext {
    /// Prefix accepted in front of builtin names, e.g. `fn` for `fn:count`.
    pub function_prefix: Option<String>,
}

#[derive(Debug, Default)]
pub struct StaticContextBuilder {
    ctx: StaticContext,
}

impl StaticContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_function_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ctx.function_prefix = Some(prefix.into());
        self
    }

    pub fn build(self) -> StaticContext {
        self.ctx
    }
}

/// Maps function names and arities to constructors.
pub struct FunctionRegistry<N: Navigator> {
    fns: HashMap<String, FunctionOverloads<N>>,
}

impl<N: Navigator> Default for FunctionRegistry<N> {
    fn default() -> Self {
        Self {
            fns: HashMap::new(),
        }
    }
}

impl<N: Navigator + 'static> FunctionRegistry<N> {
    /// Registry with every builtin function.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        crate::functions::register_default_functions(&mut reg);
        reg
    }
}

// Higher min first; for equal mins smaller max first, variadic last.
fn overload_order<N: Navigator>(a: &FunctionOverload<N>, b: &FunctionOverload<N>) -> Ordering {
    let min_ord = b.0.cmp(&a.0);
    if min_ord != Ordering::Equal {
        return min_ord;
    }
    match (&a.1, &b.1) {
        (Some(amax), Some(bmax)) => amax.cmp(bmax),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl<N: Navigator> FunctionRegistry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, arity: Arity, f: F)
    where
        F: 'static + Send + Sync + Fn(CallSite<N>) -> Result<QueryRef<N>, Error>,
    {
        self.register_range(name, arity, Some(arity), f);
    }

    /// Register with an arity range. Overlapping ranges are allowed; the
    /// resolver picks the most specific (highest min, then smallest max).
    pub fn register_range<F>(
        &mut self,
        name: &str,
        min_arity: Arity,
        max_arity: Option<Arity>,
        f: F,
    ) where
        F: 'static + Send + Sync + Fn(CallSite<N>) -> Result<QueryRef<N>, Error>,
    {
        let overload: FunctionOverload<N> = (min_arity, max_arity, Arc::new(f));
        match self.fns.entry(name.to_string()) {
            Entry::Vacant(e) => {
                e.insert(vec![overload]);
            }
            Entry::Occupied(mut e) => {
                let v = e.get_mut();
                v.push(overload);
                v.sort_by(overload_order);
            }
        }
    }

    /// Register a function accepting `min_arity` or more arguments.
    pub fn register_variadic<F>(&mut self, name: &str, min_arity: Arity, f: F)
    where
        F: 'static + Send + Sync + Fn(CallSite<N>) -> Result<QueryRef<N>, Error>,
    {
        self.register_range(name, min_arity, None, f);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fns.contains_key(name)
    }

    /// Registered function names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a function by name and arity. A name carrying the configured
    /// function prefix is looked up without it when the literal name is unknown.
    pub fn resolve(
        &self,
        name: &str,
        arity: Arity,
        ctx: &StaticContext,
    ) -> Result<&FunctionConstructor<N>, ResolveError> {
        let effective = match self.fns.get(name) {
            Some(_) => name,
            None => ctx
                .function_prefix
                .as_deref()
                .and_then(|p| name.strip_prefix(p))
                .and_then(|rest| rest.strip_prefix(':'))
                .unwrap_or(name),
        };
        let Some(cands) = self.fns.get(effective) else {
            return Err(ResolveError::Unknown(name.to_string()));
        };
        if let Some((_, _, f)) = cands
            .iter()
            .find(|(min, max, _)| arity >= *min && max.is_none_or(|m| arity <= m))
        {
            tracing::trace!(function = effective, arity, "resolved function");
            return Ok(f);
        }
        let mut available: Vec<(Arity, Option<Arity>)> =
            cands.iter().map(|(min, max, _)| (*min, *max)).collect();
        available.sort_unstable();
        Err(ResolveError::WrongArity {
            name: effective.to_string(),
            arity,
            available,
        })
    }

    /// Resolve `name` for the call site's arity and build its evaluator.
    pub fn build(
        &self,
        ctx: &StaticContext,
        name: &str,
        site: CallSite<N>,
    ) -> Result<QueryRef<N>, Error> {
        let constructor = self.resolve(name, site.arity(), ctx)?;
        tracing::trace!(function = name, arity = site.arity(), "building call site");
        constructor(site)
    }
}

impl<N: Navigator> fmt::Debug for FunctionRegistry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
