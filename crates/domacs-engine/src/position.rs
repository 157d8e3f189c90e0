//! Caret positions as `(node, offset)` pairs.
//!
//! For a text-bearing node the offset is a byte offset into its text and must
//! fall on a `char` boundary. For a container it counts children: offset `k`
//! sits between child `k - 1` and child `k`.
//!
//! Positions are transient. They are recomputed from the host on every
//! command and never cached across tree mutations.

use std::cmp::Ordering;

use crate::error::EngineError;
use crate::tree::{self, DocumentTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position<N> {
    pub node: N,
    pub offset: usize,
}

impl<N: Copy + Eq + std::fmt::Debug> Position<N> {
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }

    /// Offset zero of `node`.
    pub fn start_of(node: N) -> Self {
        Self::new(node, 0)
    }

    /// The last valid offset of `node`.
    pub fn end_of<T: DocumentTree<Node = N> + ?Sized>(tree: &T, node: N) -> Self {
        Self::new(node, tree.node_len(node))
    }

    /// Checks the offset against the node it refers to.
    pub fn validate<T: DocumentTree<Node = N> + ?Sized>(&self, tree: &T) -> Result<(), EngineError> {
        let len = tree.node_len(self.node);
        if self.offset > len {
            return Err(EngineError::InvalidOffset {
                offset: self.offset,
                len,
            });
        }
        if let Some(text) = tree.text(self.node)
            && !text.is_char_boundary(self.offset)
        {
            return Err(EngineError::NotCharBoundary {
                offset: self.offset,
            });
        }
        Ok(())
    }

    pub fn is_within<T: DocumentTree<Node = N> + ?Sized>(&self, tree: &T, root: N) -> bool {
        tree::is_inclusive_ancestor(tree, root, self.node)
    }

    /// Boundary-point order of two positions in the same tree.
    ///
    /// Returns `None` when the nodes share no ancestor.
    pub fn cmp_in<T: DocumentTree<Node = N> + ?Sized>(&self, tree: &T, other: &Self) -> Option<Ordering> {
        if self.node == other.node {
            return Some(self.offset.cmp(&other.offset));
        }
        if tree::node_order(tree, self.node, other.node)? == Ordering::Greater {
            return other.cmp_in(tree, self).map(Ordering::reverse);
        }
        // self.node precedes other.node. The only way self can still come
        // after is when other sits inside a child left of self's offset.
        if tree::is_inclusive_ancestor(tree, self.node, other.node) {
            let child = std::iter::successors(Some(other.node), |n| tree.parent(*n))
                .find(|n| tree.parent(*n) == Some(self.node));
            if let Some(child) = child
                && tree.index_in_parent(child) < self.offset
            {
                return Some(Ordering::Greater);
            }
        }
        Some(Ordering::Less)
    }
}

/// Resolves `pos` to a position inside a text leaf of `root`.
///
/// Text positions resolve to themselves. A container position resolves to
/// the end of the last text leaf among the children before the offset, else
/// the start of the first text leaf among the children after it. A container
/// without text falls back to the end of the nearest preceding text leaf,
/// then the start of the nearest following one. `None` means `root` holds
/// no text at all.
pub fn resolve_text_position<T: DocumentTree + ?Sized>(
    tree: &T,
    root: T::Node,
    pos: Position<T::Node>,
) -> Option<Position<T::Node>> {
    if tree.is_text(pos.node) {
        return Some(pos);
    }

    let children: Vec<_> = tree.children(pos.node).collect();
    let split = pos.offset.min(children.len());
    let (before, after) = children.split_at(split);

    let inside_before = before
        .iter()
        .rev()
        .find_map(|child| tree::text_leaves(tree, *child).last())
        .map(|leaf| Position::end_of(tree, leaf));
    let inside_after = || {
        after
            .iter()
            .find_map(|child| tree::text_leaves(tree, *child).next())
            .map(Position::start_of)
    };
    let outside_before = || {
        tree::prev_text_leaf(tree, pos.node, root).map(|leaf| Position::end_of(tree, leaf))
    };
    let outside_after = || tree::next_text_leaf(tree, pos.node, root).map(Position::start_of);

    inside_before
        .or_else(inside_after)
        .or_else(outside_before)
        .or_else(outside_after)
}
