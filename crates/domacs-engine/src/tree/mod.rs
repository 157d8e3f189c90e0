//! # Document tree access
//!
//! The engine never owns the document. Hosts expose their tree through
//! [`DocumentTree`] (read-only structure) and, when formatting commands are
//! wanted, [`EditableTree`] (the handful of mutations those commands need).
//!
//! Nodes come in two kinds:
//!
//! - **containers** carry an element name and an ordered list of children
//! - **text-bearing** nodes carry a run of characters and never have children
//!
//! Document order is depth-first preorder over these nodes; see [`walk`].

pub mod walk;

use std::fmt::Debug;

pub use walk::{
    Leaves, descendants, first_leaf, following, is_inclusive_ancestor, last_leaf, leaves,
    next_in_order, next_text_leaf, node_order, preceding, prev_in_order, prev_text_leaf,
    text_leaves,
};

/// Read-only structural access to a host's node tree.
pub trait DocumentTree {
    /// Node handle. Cheap to copy, compared by identity.
    type Node: Copy + Eq + Debug;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;
    fn last_child(&self, node: Self::Node) -> Option<Self::Node>;
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;
    fn prev_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Characters held by a text-bearing node, `None` for containers.
    fn text(&self, node: Self::Node) -> Option<&str>;

    /// Element name of a container, `None` for text-bearing nodes.
    fn name(&self, node: Self::Node) -> Option<&str>;

    fn is_text(&self, node: Self::Node) -> bool {
        self.text(node).is_some()
    }

    fn has_children(&self, node: Self::Node) -> bool {
        self.first_child(node).is_some()
    }

    fn children(&self, node: Self::Node) -> Children<'_, Self> {
        Children {
            tree: self,
            next: self.first_child(node),
        }
    }

    fn child_at(&self, node: Self::Node, index: usize) -> Option<Self::Node> {
        self.children(node).nth(index)
    }

    fn index_in_parent(&self, node: Self::Node) -> usize {
        std::iter::successors(self.prev_sibling(node), |n| self.prev_sibling(*n)).count()
    }

    /// Upper bound of valid offsets in `node`: byte length for text, child count otherwise.
    fn node_len(&self, node: Self::Node) -> usize {
        match self.text(node) {
            Some(text) => text.len(),
            None => self.children(node).count(),
        }
    }

    /// Concatenated text of every text leaf under `node`.
    fn text_content(&self, node: Self::Node) -> String {
        text_leaves(self, node)
            .filter_map(|leaf| self.text(leaf))
            .collect()
    }
}

/// The mutations the formatting commands perform on a host tree.
///
/// Removed nodes are detached, not destroyed: handles to them stay valid but
/// no longer belong to any root.
pub trait EditableTree: DocumentTree {
    fn create_text(&mut self, text: &str) -> Self::Node;
    fn create_element(&mut self, name: &str) -> Self::Node;
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);
    fn insert_before(&mut self, reference: Self::Node, node: Self::Node);
    fn insert_after(&mut self, reference: Self::Node, node: Self::Node);
    fn remove(&mut self, node: Self::Node);

    /// Creates `<name>text</name>`.
    fn create_span(&mut self, name: &str, text: &str) -> Self::Node {
        let span = self.create_element(name);
        let inner = self.create_text(text);
        self.append_child(span, inner);
        span
    }

    /// Inserts `node` into `parent` so that it ends up at child index `offset`.
    fn insert_at(&mut self, parent: Self::Node, offset: usize, node: Self::Node) {
        match self.child_at(parent, offset) {
            Some(reference) => self.insert_before(reference, node),
            None => self.append_child(parent, node),
        }
    }
}

/// Iterator over the direct children of a node, in order.
pub struct Children<'a, T: DocumentTree + ?Sized> {
    tree: &'a T,
    next: Option<T::Node>,
}

impl<T: DocumentTree + ?Sized> Iterator for Children<'_, T> {
    type Item = T::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}
