//! # Inline code formatting
//!
//! Tree surgery for wrapping and unwrapping text in `<code>` spans. The free
//! functions work on any [`EditableTree`]; the [`Engine`] methods combine them
//! with the caret so the selection ends up where the user expects it.
//!
//! Every replacement creates fresh nodes and detaches the old ones, so
//! positions computed before an edit are never reused after it.

use log::{debug, warn};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::motion::TextRuns;
use crate::position::{self, Position};
use crate::selection::{NodeOf, SelectionHost};
use crate::tree::{self, DocumentTree, EditableTree};

pub const CODE: &str = "code";
pub const BOLD: &str = "b";

/// Text inserted after a freshly inserted code span so typing continues
/// outside of it.
pub const NO_BREAK_SPACE: &str = "\u{a0}";

fn check_text_offset(text: &str, offset: usize) -> Result<(), EngineError> {
    if offset > text.len() {
        let err = EngineError::InvalidOffset {
            offset,
            len: text.len(),
        };
        warn!("{err}");
        return Err(err);
    }
    if !text.is_char_boundary(offset) {
        warn!("offset {offset} splits a character");
        return Err(EngineError::NotCharBoundary { offset });
    }
    Ok(())
}

/// Replaces text leaf `node` by two adjacent leaves split at `offset`.
pub fn split_text_leaf<T: EditableTree + ?Sized>(
    tree: &mut T,
    node: T::Node,
    offset: usize,
) -> Result<(T::Node, T::Node), EngineError> {
    let text = tree.text(node).ok_or(EngineError::NotText)?.to_string();
    check_text_offset(&text, offset)?;

    let left = tree.create_text(&text[..offset]);
    let right = tree.create_text(&text[offset..]);
    tree.insert_before(node, left);
    tree.insert_after(node, right);
    tree.remove(node);
    Ok((left, right))
}

/// Splits an inline element at `offset` into its text into two elements of
/// the same name and returns the left one.
///
/// Splitting at the very end is a no-op that returns `span` itself.
pub fn split_markup_span<T: EditableTree + ?Sized>(
    tree: &mut T,
    span: T::Node,
    offset: usize,
) -> Result<T::Node, EngineError> {
    let name = tree.name(span).ok_or(EngineError::NotElement)?.to_string();
    let text = tree.text_content(span);
    check_text_offset(&text, offset)?;
    if offset == text.len() {
        return Ok(span);
    }

    let left = tree.create_span(&name, &text[..offset]);
    let right = tree.create_span(&name, &text[offset..]);
    tree.insert_before(span, left);
    tree.insert_after(span, right);
    tree.remove(span);
    Ok(left)
}

/// Replaces `old` by a `<name>` element holding the same text.
pub fn replace_with_span<T: EditableTree + ?Sized>(tree: &mut T, old: T::Node, name: &str) -> T::Node {
    let text = tree.text_content(old);
    let new = tree.create_span(name, &text);
    tree.insert_after(old, new);
    tree.remove(old);
    new
}

/// Replaces every `<b>` under `root` by `<code>` with the same text.
///
/// Returns `(old, new)` pairs in document order. Bold elements nested inside
/// another bold element disappear with their outer element.
pub fn bold_to_code<T: EditableTree + ?Sized>(tree: &mut T, root: T::Node) -> Vec<(T::Node, T::Node)> {
    let bold: Vec<_> = {
        let tree = &*tree;
        tree::descendants(tree, root)
            .filter(|node| tree.name(*node) == Some(BOLD))
            .collect()
    };
    let mut replaced = Vec::new();
    for old in bold {
        if !tree::is_inclusive_ancestor(tree, root, old) {
            continue;
        }
        let new = replace_with_span(tree, old, CODE);
        replaced.push((old, new));
    }
    replaced
}

/// Where `pos` lands once the element `old` is replaced by a span whose
/// single text leaf is `new_text`. `None` when `pos` is not inside `old`.
fn carry_into<T: DocumentTree + ?Sized>(
    tree: &T,
    old: T::Node,
    new_text: T::Node,
    pos: Position<T::Node>,
) -> Option<Position<T::Node>> {
    if !pos.is_within(tree, old) {
        return None;
    }
    let resolved = position::resolve_text_position(tree, old, pos)?;
    let offset = offset_within(tree, old, resolved)?;
    Some(Position::new(new_text, offset))
}

/// The `<code>` element directly holding text leaf `node`, if any.
fn enclosing_code<T: DocumentTree + ?Sized>(tree: &T, node: T::Node) -> Option<T::Node> {
    let parent = tree.parent(node)?;
    (tree.is_text(node) && tree.name(parent) == Some(CODE)).then_some(parent)
}

type Ends<N> = (Option<Position<N>>, Option<Position<N>>);

/// Offset of `pos` into the concatenated text of `container`.
fn offset_within<T: DocumentTree + ?Sized>(
    tree: &T,
    container: T::Node,
    pos: Position<T::Node>,
) -> Option<usize> {
    TextRuns::collect(tree, container).to_flat(pos)
}

/// Result of [`Engine::uncodify_selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uncodify {
    /// The selected code text is plain text now.
    Done,
    /// The caret sits in code; the next typed text goes to
    /// [`Engine::break_out_of_code`].
    Pending,
    /// Neither the selection nor the caret is inside code.
    NotInCode,
}

impl<H> Engine<H>
where
    H: SelectionHost,
    H::Tree: EditableTree,
{
    /// Moves whichever selection ends sat inside a replaced element into
    /// its replacement.
    fn follow_replacements(&mut self, ends: Ends<NodeOf<H>>, replaced: &[(NodeOf<H>, NodeOf<H>)]) {
        let (Some(mut anchor), Some(mut focus)) = ends else {
            return;
        };
        let tree = self.host().tree();
        let mut moved = false;
        for &(old, new) in replaced {
            let Some(new_text) = tree.first_child(new) else {
                continue;
            };
            for end in [&mut anchor, &mut focus] {
                if let Some(carried) = carry_into(tree, old, new_text, *end) {
                    *end = carried;
                    moved = true;
                }
            }
        }
        if moved {
            self.write_selection(|selection| selection.reposition(focus, Some(anchor)));
        }
    }

    fn selection_ends(&self) -> Ends<NodeOf<H>> {
        (self.host().anchor(), self.host().focus())
    }

    /// Replaces every `<b>` in the current root by `<code>`, keeping the
    /// caret on the same character. Returns how many were replaced.
    pub fn bold_to_code(&mut self) -> Result<usize, EngineError> {
        let root = self.sync_root().ok_or(EngineError::NoRoot)?;
        let ends = self.selection_ends();
        let replaced = bold_to_code(self.host_mut().tree_mut(), root);
        debug!("replaced {} bold elements with code", replaced.len());
        self.follow_replacements(ends, &replaced);
        Ok(replaced.len())
    }

    /// Replaces the nearest element named `from` at or before the focus in
    /// document order by an element named `to` holding the same text.
    ///
    /// Returns `false` when there is no such element in the current root.
    pub fn swap_preceding_type(&mut self, from: &str, to: &str) -> Result<bool, EngineError> {
        let root = self.sync_root().ok_or(EngineError::NoRoot)?;
        let ends = self.selection_ends();
        let focus = ends.1.ok_or(EngineError::UnresolvablePosition)?;
        let tree = self.host().tree();
        if !focus.is_within(tree, root) {
            return Err(EngineError::NotInRoot);
        }
        let from = from.to_ascii_lowercase();
        let found = std::iter::once(focus.node)
            .chain(tree::preceding(tree, focus.node, root))
            .find(|node| tree.name(*node) == Some(from.as_str()));
        let Some(old) = found else {
            debug!("no <{from}> before {focus:?}");
            return Ok(false);
        };

        let new = replace_with_span(self.host_mut().tree_mut(), old, to);
        self.follow_replacements(ends, &[(old, new)]);
        Ok(true)
    }

    /// Turns the selection, or the caret, into inline code.
    ///
    /// A selection inside one text leaf is wrapped in `<code>`, caret at the
    /// end of the code text. A collapsed caret gets `<code>{input}</code>`
    /// followed by a no-break space inserted at it, caret after the space.
    pub fn codify_selection(&mut self, input: &str) -> Result<(), EngineError> {
        let root = self.sync_root().ok_or(EngineError::NoRoot)?;
        let (Some(anchor), Some(focus)) = self.selection_ends() else {
            return Err(EngineError::UnresolvablePosition);
        };
        let tree = self.host().tree();
        focus.validate(tree)?;
        if !focus.is_within(tree, root) {
            return Err(EngineError::NotInRoot);
        }

        if anchor == focus {
            self.insert_code_at(focus, input)
        } else {
            self.wrap_in_code(anchor, focus)
        }
    }

    fn insert_code_at(&mut self, at: Position<NodeOf<H>>, input: &str) -> Result<(), EngineError> {
        let tree = self.host_mut().tree_mut();
        let code = tree.create_span(CODE, input);
        let space = tree.create_text(NO_BREAK_SPACE);
        if tree.is_text(at.node) {
            let (left, _) = split_text_leaf(tree, at.node, at.offset)?;
            tree.insert_after(left, code);
        } else {
            tree.insert_at(at.node, at.offset, code);
        }
        tree.insert_after(code, space);
        let caret = Position::end_of(tree, space);
        self.write_selection(|selection| selection.reposition(caret, None));
        Ok(())
    }

    fn wrap_in_code(
        &mut self,
        anchor: Position<NodeOf<H>>,
        focus: Position<NodeOf<H>>,
    ) -> Result<(), EngineError> {
        if anchor.node != focus.node || !self.host().tree().is_text(focus.node) {
            return Err(EngineError::CrossNodeSelection);
        }
        anchor.validate(self.host().tree())?;
        let (low, high) = (anchor.offset.min(focus.offset), anchor.offset.max(focus.offset));

        let tree = self.host_mut().tree_mut();
        let text = tree.text(focus.node).ok_or(EngineError::NotText)?.to_string();
        let before = tree.create_text(&text[..low]);
        let code = tree.create_span(CODE, &text[low..high]);
        let after = tree.create_text(&text[high..]);
        tree.insert_before(focus.node, before);
        tree.insert_after(focus.node, after);
        tree.insert_after(focus.node, code);
        tree.remove(focus.node);

        let inner = tree.first_child(code).ok_or(EngineError::NotText)?;
        let caret = Position::end_of(tree, inner);
        self.write_selection(|selection| selection.reposition(caret, None));
        Ok(())
    }

    /// Turns selected code text back into plain text.
    ///
    /// A selection inside the text of one `<code>` element becomes left code,
    /// plain text, right code, with the caret at the end of the plain text. A
    /// collapsed caret inside code yields [`Uncodify::Pending`]: the host
    /// should pass the next typed text to [`Engine::break_out_of_code`].
    pub fn uncodify_selection(&mut self) -> Result<Uncodify, EngineError> {
        let root = self.sync_root().ok_or(EngineError::NoRoot)?;
        let (Some(anchor), Some(focus)) = self.selection_ends() else {
            return Ok(Uncodify::NotInCode);
        };
        let tree = self.host().tree();
        if !focus.is_within(tree, root) {
            return Err(EngineError::NotInRoot);
        }
        let Some(code) = enclosing_code(tree, focus.node) else {
            return Ok(Uncodify::NotInCode);
        };
        if anchor == focus {
            debug!("caret in code, waiting for text to break out with");
            return Ok(Uncodify::Pending);
        }
        if anchor.node != focus.node {
            return Err(EngineError::CrossNodeSelection);
        }
        anchor.validate(tree)?;
        focus.validate(tree)?;

        let (Some(a), Some(f)) = (
            offset_within(tree, code, anchor),
            offset_within(tree, code, focus),
        ) else {
            return Err(EngineError::UnresolvablePosition);
        };
        let (low, high) = (a.min(f), a.max(f));
        let text = tree.text_content(code);
        let tree = self.host_mut().tree_mut();
        let left = tree.create_span(CODE, &text[..low]);
        let middle = tree.create_text(&text[low..high]);
        let right = tree.create_span(CODE, &text[high..]);
        tree.insert_before(code, left);
        tree.insert_after(code, right);
        tree.insert_after(code, middle);
        tree.remove(code);

        let caret = Position::end_of(tree, middle);
        self.write_selection(|selection| selection.reposition(caret, None));
        Ok(Uncodify::Done)
    }

    /// Splits the code element holding the caret at the caret and inserts
    /// `text` as plain text between the halves, caret after it.
    pub fn break_out_of_code(&mut self, text: &str) -> Result<(), EngineError> {
        let root = self.sync_root().ok_or(EngineError::NoRoot)?;
        let focus = self.host().focus().ok_or(EngineError::UnresolvablePosition)?;
        let tree = self.host().tree();
        if !focus.is_within(tree, root) {
            return Err(EngineError::NotInRoot);
        }
        let code = enclosing_code(tree, focus.node).ok_or(EngineError::NotElement)?;
        focus.validate(tree)?;
        let offset = offset_within(tree, code, focus).ok_or(EngineError::UnresolvablePosition)?;

        let tree = self.host_mut().tree_mut();
        let left = split_markup_span(tree, code, offset)?;
        let plain = tree.create_text(text);
        tree.insert_after(left, plain);

        let caret = Position::end_of(tree, plain);
        self.write_selection(|selection| selection.reposition(caret, None));
        Ok(())
    }
}
