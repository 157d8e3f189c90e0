//! Depth-first preorder (DFP) traversal primitives.
//!
//! Every function takes the `root` of the walk explicitly: traversal never
//! escapes the root's subtree, and the two ends of the order map to `None`.

use std::cmp::Ordering;

use super::DocumentTree;

/// Descends through first children until reaching a leaf.
pub fn first_leaf<T: DocumentTree + ?Sized>(tree: &T, mut node: T::Node) -> T::Node {
    while let Some(child) = tree.first_child(node) {
        node = child;
    }
    node
}

/// Descends through last children until reaching a leaf.
pub fn last_leaf<T: DocumentTree + ?Sized>(tree: &T, mut node: T::Node) -> T::Node {
    while let Some(child) = tree.last_child(node) {
        node = child;
    }
    node
}

/// The node after `node` in the DFP order of `root`'s subtree.
///
/// `root` must be an inclusive ancestor of `node`.
pub fn next_in_order<T: DocumentTree + ?Sized>(
    tree: &T,
    node: T::Node,
    root: T::Node,
) -> Option<T::Node> {
    if let Some(child) = tree.first_child(node) {
        return Some(child);
    }
    let mut current = node;
    loop {
        if current == root {
            return None;
        }
        if let Some(sibling) = tree.next_sibling(current) {
            return Some(sibling);
        }
        current = tree.parent(current)?;
    }
}

/// The node before `node` in the DFP order of `root`'s subtree.
///
/// `root` must be an inclusive ancestor of `node`.
pub fn prev_in_order<T: DocumentTree + ?Sized>(
    tree: &T,
    node: T::Node,
    root: T::Node,
) -> Option<T::Node> {
    if node == root {
        return None;
    }
    match tree.prev_sibling(node) {
        Some(sibling) => Some(last_leaf(tree, sibling)),
        None => tree.parent(node),
    }
}

/// Every node of `root`'s subtree in DFP order, `root` first.
pub fn descendants<T: DocumentTree + ?Sized>(
    tree: &T,
    root: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    std::iter::successors(Some(root), move |n| next_in_order(tree, *n, root))
}

/// Nodes after `node` in DFP order, nearest first.
pub fn following<T: DocumentTree + ?Sized>(
    tree: &T,
    node: T::Node,
    root: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    std::iter::successors(next_in_order(tree, node, root), move |n| {
        next_in_order(tree, *n, root)
    })
}

/// Nodes before `node` in DFP order, nearest first.
pub fn preceding<T: DocumentTree + ?Sized>(
    tree: &T,
    node: T::Node,
    root: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    std::iter::successors(prev_in_order(tree, node, root), move |n| {
        prev_in_order(tree, *n, root)
    })
}

/// One-pass iterator over the leaves of a subtree, in document order.
///
/// A node without children is its own single leaf. To restart, call
/// [`leaves`] again.
pub struct Leaves<'a, T: DocumentTree + ?Sized> {
    tree: &'a T,
    next: Option<T::Node>,
    last: T::Node,
}

pub fn leaves<T: DocumentTree + ?Sized>(tree: &T, node: T::Node) -> Leaves<'_, T> {
    Leaves {
        tree,
        next: Some(first_leaf(tree, node)),
        last: last_leaf(tree, node),
    }
}

impl<T: DocumentTree + ?Sized> Iterator for Leaves<'_, T> {
    type Item = T::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if current != self.last {
            // Climb to the nearest ancestor with a next sibling. One exists
            // because `last` has not been reached yet.
            let mut climber = Some(current);
            while let Some(node) = climber {
                if let Some(sibling) = self.tree.next_sibling(node) {
                    self.next = Some(first_leaf(self.tree, sibling));
                    break;
                }
                climber = self.tree.parent(node);
            }
        }
        Some(current)
    }
}

/// Text-bearing leaves of a subtree, in document order.
pub fn text_leaves<T: DocumentTree + ?Sized>(
    tree: &T,
    node: T::Node,
) -> impl Iterator<Item = T::Node> + '_ {
    leaves(tree, node).filter(move |leaf| tree.is_text(*leaf))
}

/// Nearest text leaf before `node` within `root`.
pub fn prev_text_leaf<T: DocumentTree + ?Sized>(
    tree: &T,
    node: T::Node,
    root: T::Node,
) -> Option<T::Node> {
    preceding(tree, node, root).find(|n| tree.is_text(*n))
}

/// Nearest text leaf after `node` within `root`.
pub fn next_text_leaf<T: DocumentTree + ?Sized>(
    tree: &T,
    node: T::Node,
    root: T::Node,
) -> Option<T::Node> {
    following(tree, node, root).find(|n| tree.is_text(*n))
}

/// True when `ancestor` is `node` or one of its ancestors.
pub fn is_inclusive_ancestor<T: DocumentTree + ?Sized>(
    tree: &T,
    ancestor: T::Node,
    node: T::Node,
) -> bool {
    std::iter::successors(Some(node), |n| tree.parent(*n)).any(|n| n == ancestor)
}

/// Relative DFP order of two nodes, `None` when they share no ancestor.
pub fn node_order<T: DocumentTree + ?Sized>(tree: &T, a: T::Node, b: T::Node) -> Option<Ordering> {
    if a == b {
        return Some(Ordering::Equal);
    }
    let path_a = path_from_top(tree, a);
    let path_b = path_from_top(tree, b);
    if path_a.first() != path_b.first() {
        return None;
    }
    let shared = path_a
        .iter()
        .zip(&path_b)
        .take_while(|(x, y)| x == y)
        .count();
    match (path_a.get(shared), path_b.get(shared)) {
        // One path is a prefix of the other: the ancestor comes first.
        (None, _) => Some(Ordering::Less),
        (_, None) => Some(Ordering::Greater),
        (Some(x), Some(y)) => Some(tree.index_in_parent(*x).cmp(&tree.index_in_parent(*y))),
    }
}

fn path_from_top<T: DocumentTree + ?Sized>(tree: &T, node: T::Node) -> Vec<T::Node> {
    let mut path: Vec<_> = std::iter::successors(Some(node), |n| tree.parent(*n)).collect();
    path.reverse();
    path
}
