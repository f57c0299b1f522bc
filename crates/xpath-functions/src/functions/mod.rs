//! Built-in functions.
//!
//! Each builtin is a small struct holding its argument queries and
//! implementing [`Query`](crate::query::Query): `evaluate` runs the function
//! against the cursor, `select` yields nothing. Constructors take a
//! [`CallSite`](crate::runtime::CallSite) and are registered by name and arity range.
use crate::model::Navigator;
use crate::runtime::FunctionRegistry;

pub mod boolean;
mod common;
pub mod sequences;
pub mod strings;

pub use boolean::{BooleanFn, Not};
pub use sequences::{Count, Last, LocalName, Name, Position, Sum};
pub use strings::{Concat, NormalizeSpace, StringLength, StringMatch, Substring};

pub fn register_default_functions<N: Navigator + 'static>(reg: &mut FunctionRegistry<N>) {
    // ===== Node-set =====
    reg.register("position", 0, sequences::position::<N>);
    reg.register("last", 0, sequences::last::<N>);
    reg.register("count", 1, sequences::count::<N>);
    reg.register("sum", 1, sequences::sum::<N>);
    reg.register_range("name", 0, Some(1), sequences::name::<N>);
    reg.register_range("local-name", 0, Some(1), sequences::local_name::<N>);

    // ===== Boolean =====
    reg.register("boolean", 1, boolean::boolean::<N>);
    reg.register("not", 1, boolean::not::<N>);

    // ===== String family =====
    reg.register("starts-with", 2, strings::starts_with::<N>);
    reg.register("ends-with", 2, strings::ends_with::<N>);
    reg.register("contains", 2, strings::contains::<N>);
    reg.register_range("normalize-space", 0, Some(1), strings::normalize_space::<N>);
    reg.register_range("substring", 2, Some(3), strings::substring::<N>);
    reg.register_range("string-length", 0, Some(1), strings::string_length::<N>);
    reg.register_variadic("concat", 2, strings::concat::<N>);
}

/// Registry holding every builtin.
pub fn default_registry<N: Navigator + 'static>() -> FunctionRegistry<N> {
    FunctionRegistry::with_defaults()
}
