pub mod error;
pub mod evaluator;
pub mod functions;
pub mod model;
pub mod query;
pub mod runtime;
pub mod simple_node;
pub mod value;

pub use error::{Error, ErrorKind};
pub use evaluator::{evaluate, evaluate_boolean};
pub use functions::default_registry;
pub use model::{Cursor, Navigator, NodeKind, QName, SavedPosition};
pub use query::{ChildQuery, Constant, ContextQuery, NameTest, NodeTest, Query, QueryRef};
pub use runtime::{CallSite, FunctionRegistry, ResolveError, StaticContext, StaticContextBuilder};
pub use simple_node::{SimpleNode, SimpleNodeBuilder, comment, doc, elem, text};
pub use value::{Value, ValueKind};
