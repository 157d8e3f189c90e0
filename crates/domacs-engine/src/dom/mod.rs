//! # In-memory document tree
//!
//! [`Dom`] is an arena of element and text nodes linked the way a browser DOM
//! links them (parent, first/last child, previous/next sibling). It backs
//! [`MemoryHost`](crate::host::MemoryHost) and the test-suite, and is the
//! reference implementation of [`DocumentTree`] and [`EditableTree`].
//!
//! Nodes are never freed. Removing a node detaches it; its [`NodeId`] stays
//! valid and can be re-inserted.

mod html;

pub use html::DomError;

use log::warn;

use crate::tree::{DocumentTree, EditableTree};

/// Name of the container every [`Dom`] is rooted at.
pub const FRAGMENT_NAME: &str = "#fragment";

/// Handle to a node of a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element(String),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<NodeData>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// An empty document holding only its root fragment.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Element(FRAGMENT_NAME.to_string()))],
        }
    }

    /// Parses an HTML fragment into a fresh document.
    pub fn parse_html(markup: &str) -> Result<Self, DomError> {
        let mut dom = Self::new();
        let root = dom.root();
        html::parse_into(&mut dom, root, markup)?;
        Ok(dom)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Serialises the children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            html::write_node(self, child, &mut out);
        }
        out
    }

    /// Serialises `node` itself, tags included.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        html::write_node(self, node, &mut out);
        out
    }

    /// First text leaf under `node` whose text contains `needle`.
    pub fn find_text(&self, node: NodeId, needle: &str) -> Option<NodeId> {
        crate::tree::text_leaves(self, node)
            .find(|leaf| self.text(*leaf).is_some_and(|text| text.contains(needle)))
    }

    fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0]
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.0]
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    /// Unlinks `node` from its parent and siblings.
    fn detach(&mut self, node: NodeId) {
        let NodeData {
            parent,
            prev_sibling,
            next_sibling,
            ..
        } = *self.data(node);

        match prev_sibling {
            Some(prev) => self.data_mut(prev).next_sibling = next_sibling,
            None => {
                if let Some(parent) = parent {
                    self.data_mut(parent).first_child = next_sibling;
                }
            }
        }
        match next_sibling {
            Some(next) => self.data_mut(next).prev_sibling = prev_sibling,
            None => {
                if let Some(parent) = parent {
                    self.data_mut(parent).last_child = prev_sibling;
                }
            }
        }

        let data = self.data_mut(node);
        data.parent = None;
        data.prev_sibling = None;
        data.next_sibling = None;
    }

    /// Links a detached `node` into `parent` between `prev` and `next`.
    fn link(&mut self, node: NodeId, parent: NodeId, prev: Option<NodeId>, next: Option<NodeId>) {
        {
            let data = self.data_mut(node);
            data.parent = Some(parent);
            data.prev_sibling = prev;
            data.next_sibling = next;
        }
        match prev {
            Some(prev) => self.data_mut(prev).next_sibling = Some(node),
            None => self.data_mut(parent).first_child = Some(node),
        }
        match next {
            Some(next) => self.data_mut(next).prev_sibling = Some(node),
            None => self.data_mut(parent).last_child = Some(node),
        }
    }

    fn can_insert(&self, reference: NodeId, node: NodeId) -> bool {
        if crate::tree::is_inclusive_ancestor(self, node, reference) {
            warn!("refusing to insert {node:?} relative to its own descendant {reference:?}");
            return false;
        }
        true
    }
}

impl DocumentTree for Dom {
    type Node = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).first_child
    }

    fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).last_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).next_sibling
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).prev_sibling
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.data(node).kind {
            NodeKind::Text(text) => Some(text.as_str()),
            NodeKind::Element(_) => None,
        }
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        match &self.data(node).kind {
            NodeKind::Element(name) => Some(name.as_str()),
            NodeKind::Text(_) => None,
        }
    }
}

impl EditableTree for Dom {
    fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::Element(name.to_ascii_lowercase()))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.can_insert(parent, child) {
            return;
        }
        if self.is_text(parent) {
            warn!("text node {parent:?} cannot hold children");
            return;
        }
        self.detach(child);
        let last = self.data(parent).last_child;
        self.link(child, parent, last, None);
    }

    fn insert_before(&mut self, reference: NodeId, node: NodeId) {
        if !self.can_insert(reference, node) {
            return;
        }
        let Some(parent) = self.data(reference).parent else {
            warn!("cannot insert before detached node {reference:?}");
            return;
        };
        self.detach(node);
        let prev = self.data(reference).prev_sibling;
        self.link(node, parent, prev, Some(reference));
    }

    fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        if !self.can_insert(reference, node) {
            return;
        }
        let Some(parent) = self.data(reference).parent else {
            warn!("cannot insert after detached node {reference:?}");
            return;
        };
        self.detach(node);
        let next = self.data(reference).next_sibling;
        self.link(node, parent, Some(reference), next);
    }

    fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }
}
