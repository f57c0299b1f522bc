use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    /// Split a lexical `prefix:local` name; a name without a colon has no prefix.
    pub fn parse(lexical: &str) -> Self {
        match lexical.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() => QName {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            _ => QName {
                prefix: None,
                local: lexical.to_string(),
            },
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(p) => write!(f, "{p}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// A node handle that doubles as a movable position in the tree.
///
/// Moves mutate the handle in place and report whether they succeeded; on
/// failure the handle stays where it was. Sibling moves (`move_to_first`,
/// `move_to_next`, `move_to_previous`) define the node sequence that
/// `position()` and `last()` scan.
///
/// Adapters for real documents implement this trait; [`crate::simple_node`]
/// provides an in-memory tree for tests.
pub trait Navigator: Clone + fmt::Debug {
    fn kind(&self) -> NodeKind;
    /// Local part of the node name, empty for unnamed nodes.
    fn local_name(&self) -> &str;
    /// Namespace prefix of the node name, empty when there is none.
    fn prefix(&self) -> &str;
    /// String-value of the node.
    fn value(&self) -> String;

    fn move_to_first(&mut self) -> bool;
    fn move_to_next(&mut self) -> bool;
    fn move_to_previous(&mut self) -> bool;
    fn move_to_child(&mut self) -> bool;
    fn move_to_parent(&mut self) -> bool;
}

/// Snapshot of a [`Cursor`] position taken by [`Cursor::save_position`].
#[derive(Debug, Clone)]
#[must_use]
pub struct SavedPosition<N>(N);

/// The traversal context shared by every function call in one evaluation pass.
///
/// There is exactly one cursor per pass. Functions that scan the whole
/// sequence either work on a saved copy and restore it (`position()`), or
/// document that they leave the cursor elsewhere (`last()`).
#[derive(Debug, Clone)]
pub struct Cursor<N> {
    current: N,
}

impl<N: Navigator> Cursor<N> {
    pub fn new(node: N) -> Self {
        Self { current: node }
    }

    pub fn current(&self) -> &N {
        &self.current
    }

    pub fn move_to_first(&mut self) -> bool {
        self.current.move_to_first()
    }

    pub fn move_to_next(&mut self) -> bool {
        self.current.move_to_next()
    }

    pub fn move_to_previous(&mut self) -> bool {
        self.current.move_to_previous()
    }

    pub fn local_name(&self) -> &str {
        self.current.local_name()
    }

    pub fn prefix(&self) -> &str {
        self.current.prefix()
    }

    pub fn value(&self) -> String {
        self.current.value()
    }

    pub fn save_position(&self) -> SavedPosition<N> {
        SavedPosition(self.current.clone())
    }

    pub fn restore_position(&mut self, saved: SavedPosition<N>) {
        self.current = saved.0;
    }
}
