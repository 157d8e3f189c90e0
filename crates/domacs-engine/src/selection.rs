//! # Host selection seam
//!
//! [`SelectionHost`] is everything the engine needs from the application it
//! runs in: the current editable root, the native anchor/focus pair and the
//! native repositioning primitives. [`Selection`] wraps a host and derives
//! the operations the engine builds on.

use serde::{Deserialize, Serialize};

use crate::position::{self, Position};
use crate::tree::DocumentTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    Character,
    Word,
    Line,
}

/// Whether a movement drags the anchor along or leaves it in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alter {
    Move,
    Extend,
}

pub type NodeOf<H> = <<H as SelectionHost>::Tree as DocumentTree>::Node;
pub type PositionOf<H> = Position<NodeOf<H>>;

/// The application side of the engine.
///
/// The host owns the document and the native selection. It must also call
/// [`Engine::on_selection_changed`](crate::Engine::on_selection_changed)
/// whenever its selection changes, whatever the cause.
pub trait SelectionHost {
    type Tree: DocumentTree;

    fn tree(&self) -> &Self::Tree;
    fn tree_mut(&mut self) -> &mut Self::Tree;

    /// The root currently receiving input. Re-queried on every command.
    fn current_root(&self) -> Option<<Self::Tree as DocumentTree>::Node>;

    fn anchor(&self) -> Option<Position<<Self::Tree as DocumentTree>::Node>>;
    fn focus(&self) -> Option<Position<<Self::Tree as DocumentTree>::Node>>;

    fn collapse(&mut self, at: Position<<Self::Tree as DocumentTree>::Node>);

    fn set_base_and_extent(
        &mut self,
        anchor: Position<<Self::Tree as DocumentTree>::Node>,
        focus: Position<<Self::Tree as DocumentTree>::Node>,
    );

    /// Layout-aware movement of the focus by one `granularity` unit.
    /// Clamps silently at the ends of the document.
    fn modify(&mut self, alter: Alter, direction: Direction, granularity: Granularity);
}

/// Adapter deriving collapsed-state, collapse and resolution operations
/// from a host's raw anchor and focus.
pub struct Selection<'a, H: SelectionHost> {
    host: &'a mut H,
}

impl<'a, H: SelectionHost> Selection<'a, H> {
    pub fn new(host: &'a mut H) -> Self {
        Self { host }
    }

    pub fn anchor(&self) -> Option<PositionOf<H>> {
        self.host.anchor()
    }

    pub fn focus(&self) -> Option<PositionOf<H>> {
        self.host.focus()
    }

    /// True when anchor and focus are the same `(node, offset)`.
    ///
    /// Computed from the two ends, never from a host-side flag. A host with
    /// no selection at all counts as collapsed.
    pub fn is_collapsed(&self) -> bool {
        match (self.anchor(), self.focus()) {
            (Some(anchor), Some(focus)) => anchor == focus,
            _ => true,
        }
    }

    /// Drops any extension, keeping the caret where the focus is.
    pub fn collapse_to_focus(&mut self) {
        if let Some(focus) = self.focus() {
            self.host.collapse(focus);
        }
    }

    /// Collapses to `point`, or selects from `extend_from` to `point` when
    /// given. The resulting focus may precede its anchor.
    pub fn reposition(&mut self, point: PositionOf<H>, extend_from: Option<PositionOf<H>>) {
        match extend_from {
            Some(anchor) => self.host.set_base_and_extent(anchor, point),
            None => self.host.collapse(point),
        }
    }

    /// The focus resolved to a concrete text position inside `root`.
    pub fn text_under_focus(&self, root: NodeOf<H>) -> Option<PositionOf<H>> {
        position::resolve_text_position(self.host.tree(), root, self.focus()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Dom;
    use crate::host::MemoryHost;

    fn host() -> MemoryHost {
        MemoryHost::new(Dom::parse_html("<p>hello</p><p>world</p>").unwrap())
    }

    #[test]
    fn collapsed_state_comes_from_the_ends() {
        let mut host = host();
        let hello = host.dom().find_text(host.dom().root(), "hello").unwrap();
        host.select(Position::new(hello, 1), Position::new(hello, 1));
        assert!(Selection::new(&mut host).is_collapsed());

        host.select(Position::new(hello, 1), Position::new(hello, 3));
        assert!(!Selection::new(&mut host).is_collapsed());
    }

    #[test]
    fn same_offset_in_different_nodes_is_not_collapsed() {
        let mut host = host();
        let root = host.dom().root();
        let hello = host.dom().find_text(root, "hello").unwrap();
        let world = host.dom().find_text(root, "world").unwrap();
        host.select(Position::new(hello, 0), Position::new(world, 0));
        assert!(!Selection::new(&mut host).is_collapsed());
    }

    #[test]
    fn missing_selection_counts_as_collapsed() {
        let mut host = host();
        let root = host.dom().root();
        host.clear_selection();
        let selection = Selection::new(&mut host);
        assert!(selection.is_collapsed());
        assert_eq!(selection.text_under_focus(root), None);
    }

    #[test]
    fn collapse_to_focus_discards_extension() {
        let mut host = host();
        let hello = host.dom().find_text(host.dom().root(), "hello").unwrap();
        host.select(Position::new(hello, 4), Position::new(hello, 1));

        let mut selection = Selection::new(&mut host);
        selection.collapse_to_focus();
        assert!(selection.is_collapsed());
        assert_eq!(selection.anchor(), Some(Position::new(hello, 1)));
    }

    #[test]
    fn reposition_can_reverse_the_selection() {
        let mut host = host();
        let hello = host.dom().find_text(host.dom().root(), "hello").unwrap();

        let mut selection = Selection::new(&mut host);
        selection.reposition(Position::new(hello, 0), Some(Position::new(hello, 5)));
        assert_eq!(selection.anchor(), Some(Position::new(hello, 5)));
        assert_eq!(selection.focus(), Some(Position::new(hello, 0)));

        selection.reposition(Position::new(hello, 2), None);
        assert_eq!(selection.anchor(), Some(Position::new(hello, 2)));
        assert!(selection.is_collapsed());
    }

    #[test]
    fn focus_on_container_resolves_to_text() {
        let mut host = host();
        let root = host.dom().root();
        host.select(Position::new(root, 2), Position::new(root, 2));
        let world = host.dom().find_text(root, "world").unwrap();
        assert_eq!(
            Selection::new(&mut host).text_under_focus(root),
            Some(Position::new(world, 5))
        );
    }
}
