mod common;

use common::{Q, Scalar, call, eval_at, n, s};
use rstest::rstest;
use std::rc::Rc;
use xpath_functions::{
    CallSite, Constant, Error, ErrorKind, FunctionRegistry, ResolveError, SimpleNode,
    StaticContext, StaticContextBuilder, default_registry, elem,
};

fn build(
    reg: &FunctionRegistry<SimpleNode>,
    ctx: &StaticContext,
    name: &str,
    args: Vec<Q>,
) -> Result<Q, Error> {
    reg.build(ctx, name, CallSite::new(args))
}

#[rstest]
fn default_registry_has_every_builtin() {
    let reg = default_registry::<SimpleNode>();
    assert_eq!(
        reg.names(),
        vec![
            "boolean",
            "concat",
            "contains",
            "count",
            "ends-with",
            "last",
            "local-name",
            "name",
            "normalize-space",
            "not",
            "position",
            "starts-with",
            "string-length",
            "substring",
            "sum",
        ]
    );
}

#[rstest]
#[case("position", 0)]
#[case("last", 0)]
#[case("count", 1)]
#[case("sum", 1)]
#[case("name", 0)]
#[case("name", 1)]
#[case("local-name", 1)]
#[case("boolean", 1)]
#[case("not", 1)]
#[case("starts-with", 2)]
#[case("normalize-space", 0)]
#[case("substring", 2)]
#[case("substring", 3)]
#[case("string-length", 0)]
#[case("concat", 2)]
#[case("concat", 12)]
fn resolves_supported_arities(#[case] name: &str, #[case] arity: usize) {
    let reg = default_registry::<SimpleNode>();
    assert!(reg.resolve(name, arity, &StaticContext::default()).is_ok());
}

#[rstest]
fn unknown_function() {
    let reg = default_registry::<SimpleNode>();
    let err = build(&reg, &StaticContext::default(), "translate", vec![]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownFunction);
    assert_eq!(err.to_string(), "unknown function: translate()");
}

#[rstest]
fn concat_with_one_argument_is_wrong_arity() {
    let reg = default_registry::<SimpleNode>();
    let err = build(&reg, &StaticContext::default(), "concat", vec![s("only-one")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongArity);
    let msg = err.to_string();
    assert!(msg.contains("one argument"), "{msg}");
    assert!(msg.contains("2 or more"), "{msg}");
}

#[rstest]
fn substring_reports_available_range() {
    let reg = default_registry::<SimpleNode>();
    let err = reg
        .resolve("substring", 4, &StaticContext::default())
        .err()
        .expect("four arguments must not resolve");
    assert_eq!(
        err,
        ResolveError::WrongArity {
            name: "substring".to_string(),
            arity: 4,
            available: vec![(2, Some(3))],
        }
    );
}

#[rstest]
fn function_prefix_is_configurable() {
    let reg = default_registry::<SimpleNode>();
    let root = elem("r").build();
    let plain = StaticContext::default();
    let err = build(&reg, &plain, "fn:string-length", vec![s("abc")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownFunction);

    let prefixed = StaticContextBuilder::new().with_function_prefix("fn").build();
    let q = build(&reg, &prefixed, "fn:string-length", vec![s("abc")]).unwrap();
    assert_eq!(eval_at(&q, &root).unwrap(), Scalar::Number(3.0));
    // other prefixes are not stripped
    let err = build(&reg, &prefixed, "xf:string-length", vec![s("abc")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownFunction);
}

#[rstest]
fn custom_functions_can_be_registered() {
    let mut reg = default_registry::<SimpleNode>();
    reg.register("pi", 0, |_site: CallSite<SimpleNode>| {
        Ok(Rc::new(Constant::number(std::f64::consts::PI)) as Q)
    });
    let root = elem("r").build();
    let q = build(&reg, &StaticContext::default(), "pi", vec![]).unwrap();
    assert_eq!(eval_at(&q, &root).unwrap(), Scalar::Number(std::f64::consts::PI));
}

#[rstest]
fn most_specific_overload_wins() {
    let mut reg = FunctionRegistry::<SimpleNode>::new();
    reg.register_variadic("pick", 0, |_site: CallSite<SimpleNode>| {
        Ok(Rc::new(Constant::string("any")) as Q)
    });
    reg.register("pick", 1, |_site: CallSite<SimpleNode>| {
        Ok(Rc::new(Constant::string("one")) as Q)
    });
    let root = elem("r").build();
    let ctx = StaticContext::default();
    let one = build(&reg, &ctx, "pick", vec![n(1.0)]).unwrap();
    let many = build(&reg, &ctx, "pick", vec![n(1.0), n(2.0)]).unwrap();
    assert_eq!(eval_at(&one, &root).unwrap(), Scalar::from("one"));
    assert_eq!(eval_at(&many, &root).unwrap(), Scalar::from("any"));
}

#[rstest]
fn call_sites_nest() {
    let root = elem("r").build();
    let q = call("concat", vec![call("substring", vec![s("hello"), n(1.0), n(3.0)]), s("!")]);
    assert_eq!(eval_at(&q, &root).unwrap(), Scalar::from("ell!"));
}
