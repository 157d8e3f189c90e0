//! [`MemoryHost`]: a [`SelectionHost`] over an in-memory [`Dom`].
//!
//! It plays the part a browser plays for the engine: it owns the document,
//! keeps a native anchor/focus pair, implements `modify` without a layout
//! engine (lines are delimited by `'\n'`), and counts selection changes so a
//! driver can forward them to the engine.

use log::debug;

use crate::dom::{Dom, NodeId};
use crate::motion;
use crate::position::Position;
use crate::selection::{Alter, Direction, Granularity, SelectionHost};

#[derive(Debug, Clone)]
pub struct MemoryHost {
    dom: Dom,
    root: Option<NodeId>,
    anchor: Option<Position<NodeId>>,
    focus: Option<Position<NodeId>>,
    pending_changes: usize,
}

impl MemoryHost {
    /// Hosts `dom` with its fragment as the current root and the caret at
    /// the start of it.
    pub fn new(dom: Dom) -> Self {
        let root = dom.root();
        let caret = Position::start_of(root);
        Self {
            dom,
            root: Some(root),
            anchor: Some(caret),
            focus: Some(caret),
            pending_changes: 0,
        }
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    /// Switches the current root, as focusing another field would.
    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    /// Sets the selection directly, as a pointer drag would.
    pub fn select(&mut self, anchor: Position<NodeId>, focus: Position<NodeId>) {
        self.anchor = Some(anchor);
        self.focus = Some(focus);
        self.pending_changes += 1;
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
        self.focus = None;
        self.pending_changes += 1;
    }

    /// Number of selection changes since the last call.
    pub fn take_changes(&mut self) -> usize {
        std::mem::take(&mut self.pending_changes)
    }
}

impl SelectionHost for MemoryHost {
    type Tree = Dom;

    fn tree(&self) -> &Dom {
        &self.dom
    }

    fn tree_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    fn current_root(&self) -> Option<NodeId> {
        self.root
    }

    fn anchor(&self) -> Option<Position<NodeId>> {
        self.anchor
    }

    fn focus(&self) -> Option<Position<NodeId>> {
        self.focus
    }

    fn collapse(&mut self, at: Position<NodeId>) {
        self.select(at, at);
    }

    fn set_base_and_extent(&mut self, anchor: Position<NodeId>, focus: Position<NodeId>) {
        self.select(anchor, focus);
    }

    fn modify(&mut self, alter: Alter, direction: Direction, granularity: Granularity) {
        let (Some(root), Some(focus)) = (self.root, self.focus) else {
            return;
        };
        let Some(target) = motion::locate(&self.dom, root, focus, direction, granularity) else {
            debug!("nothing to move through under {root:?}");
            return;
        };
        match alter {
            Alter::Move => self.collapse(target),
            Alter::Extend => {
                let anchor = self.anchor.unwrap_or(focus);
                self.select(anchor, target);
            }
        }
    }
}
