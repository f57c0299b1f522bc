//! Simple in-memory tree implementing [`Navigator`], used in tests and quick prototypes.
//!
//! A [`SimpleNode`] is an `Arc` handle; navigation replaces the handle with the
//! sibling, child or parent it moved to, so cloning a node is cloning a cursor.
//!
//! Example:
//! ```
//! use xpath_functions::simple_node::{elem, text};
//! use xpath_functions::Navigator;
//!
//! // <root><item>1</item><item>2</item></root>
//! let root = elem("root")
//!     .child(elem("item").child(text("1")))
//!     .child(elem("item").child(text("2")))
//!     .build();
//!
//! let mut cursor = root.clone();
//! assert!(cursor.move_to_child());
//! assert_eq!(cursor.value(), "1");
//! assert!(cursor.move_to_next());
//! assert_eq!(cursor.value(), "2");
//! assert!(!cursor.move_to_next());
//! assert_eq!(root.value(), "12");
//! ```
use crate::model::{Navigator, NodeKind, QName};
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

pub(crate) struct Inner {
    kind: NodeKind,
    name: Option<QName>,
    value: Option<String>, // text / comment content
    parent: OnceLock<Weak<Inner>>,
    children: Vec<SimpleNode>,
}

#[derive(Clone)]
pub struct SimpleNode(Arc<Inner>);

impl PartialEq for SimpleNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for SimpleNode {}

impl fmt::Debug for SimpleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleNode")
            .field("kind", &self.0.kind)
            .field("name", &self.0.name)
            .field("value", &self.0.value)
            .finish_non_exhaustive()
    }
}

impl SimpleNode {
    fn leaf(kind: NodeKind, value: &str) -> Self {
        SimpleNode(Arc::new(Inner {
            kind,
            name: None,
            value: Some(value.to_string()),
            parent: OnceLock::new(),
            children: Vec::new(),
        }))
    }

    pub fn document() -> SimpleNodeBuilder {
        SimpleNodeBuilder::new(NodeKind::Document, None)
    }

    /// Element builder; `p:local` names carry a prefix.
    pub fn element(name: &str) -> SimpleNodeBuilder {
        SimpleNodeBuilder::new(NodeKind::Element, Some(QName::parse(name)))
    }

    pub fn text(value: &str) -> SimpleNode {
        SimpleNode::leaf(NodeKind::Text, value)
    }

    pub fn comment(value: &str) -> SimpleNode {
        SimpleNode::leaf(NodeKind::Comment, value)
    }

    pub fn name(&self) -> Option<&QName> {
        self.0.name.as_ref()
    }

    pub fn parent(&self) -> Option<SimpleNode> {
        self.0.parent.get().and_then(Weak::upgrade).map(SimpleNode)
    }

    pub fn children(&self) -> &[SimpleNode] {
        &self.0.children
    }

    // Parent and index of this node among the parent's children.
    fn sibling_slot(&self) -> Option<(SimpleNode, usize)> {
        let parent = self.parent()?;
        let index = parent.0.children.iter().position(|c| c == self)?;
        Some((parent, index))
    }

    fn move_to_sibling(&mut self, pick: impl FnOnce(usize, usize) -> Option<usize>) -> bool {
        let Some((parent, index)) = self.sibling_slot() else {
            return false;
        };
        let count = parent.0.children.len();
        match pick(index, count).and_then(|i| parent.0.children.get(i)) {
            Some(sibling) => {
                *self = sibling.clone();
                true
            }
            None => false,
        }
    }
}

impl Navigator for SimpleNode {
    fn kind(&self) -> NodeKind {
        self.0.kind
    }

    fn local_name(&self) -> &str {
        self.0.name.as_ref().map_or("", |q| q.local.as_str())
    }

    fn prefix(&self) -> &str {
        self.0
            .name
            .as_ref()
            .and_then(|q| q.prefix.as_deref())
            .unwrap_or("")
    }

    fn value(&self) -> String {
        match self.0.kind {
            NodeKind::Text | NodeKind::Comment => self.0.value.clone().unwrap_or_default(),
            NodeKind::Element | NodeKind::Document => {
                fn dfs(n: &SimpleNode, out: &mut String) {
                    if n.0.kind == NodeKind::Text
                        && let Some(v) = &n.0.value
                    {
                        out.push_str(v);
                    }
                    for c in &n.0.children {
                        dfs(c, out);
                    }
                }
                let mut out = String::new();
                dfs(self, &mut out);
                out
            }
        }
    }

    fn move_to_first(&mut self) -> bool {
        self.move_to_sibling(|index, _| (index > 0).then_some(0))
    }

    fn move_to_next(&mut self) -> bool {
        self.move_to_sibling(|index, count| (index + 1 < count).then_some(index + 1))
    }

    fn move_to_previous(&mut self) -> bool {
        self.move_to_sibling(|index, _| index.checked_sub(1))
    }

    fn move_to_child(&mut self) -> bool {
        match self.0.children.first() {
            Some(child) => {
                *self = child.clone();
                true
            }
            None => false,
        }
    }

    fn move_to_parent(&mut self) -> bool {
        match self.parent() {
            Some(parent) => {
                *self = parent;
                true
            }
            None => false,
        }
    }
}

pub struct SimpleNodeBuilder {
    kind: NodeKind,
    name: Option<QName>,
    pending_children: Vec<SimpleNode>,
}

impl SimpleNodeBuilder {
    fn new(kind: NodeKind, name: Option<QName>) -> Self {
        Self {
            kind,
            name,
            pending_children: Vec::new(),
        }
    }

    #[must_use]
    pub fn child(mut self, child: impl Into<SimpleNodeOrBuilder>) -> Self {
        self.pending_children.push(child.into().build());
        self
    }

    #[must_use]
    pub fn children<I: IntoIterator<Item = SimpleNodeOrBuilder>>(mut self, it: I) -> Self {
        self.pending_children
            .extend(it.into_iter().map(SimpleNodeOrBuilder::build));
        self
    }

    /// Finalize the node and link its children to it. A node can be attached
    /// to one parent only; attaching it again keeps the first parent.
    pub fn build(self) -> SimpleNode {
        let node = SimpleNode(Arc::new(Inner {
            kind: self.kind,
            name: self.name,
            value: None,
            parent: OnceLock::new(),
            children: self.pending_children,
        }));
        for c in &node.0.children {
            let _ = c.0.parent.set(Arc::downgrade(&node.0));
        }
        node
    }
}

pub enum SimpleNodeOrBuilder {
    Built(SimpleNode),
    Builder(SimpleNodeBuilder),
}

impl SimpleNodeOrBuilder {
    fn build(self) -> SimpleNode {
        match self {
            SimpleNodeOrBuilder::Built(n) => n,
            SimpleNodeOrBuilder::Builder(b) => b.build(),
        }
    }
}

impl From<SimpleNode> for SimpleNodeOrBuilder {
    fn from(n: SimpleNode) -> Self {
        SimpleNodeOrBuilder::Built(n)
    }
}

impl From<SimpleNodeBuilder> for SimpleNodeOrBuilder {
    fn from(b: SimpleNodeBuilder) -> Self {
        SimpleNodeOrBuilder::Builder(b)
    }
}

// Convenience helper functions for concise test code
pub fn elem(name: &str) -> SimpleNodeBuilder {
    SimpleNode::element(name)
}
pub fn text(v: &str) -> SimpleNode {
    SimpleNode::text(v)
}
pub fn comment(v: &str) -> SimpleNode {
    SimpleNode::comment(v)
}
pub fn doc() -> SimpleNodeBuilder {
    SimpleNode::document()
}
