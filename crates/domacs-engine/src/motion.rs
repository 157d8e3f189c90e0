//! Offset arithmetic over the text of a root.
//!
//! [`TextRuns`] flattens the text leaves of a root into one string and maps
//! between `(leaf, offset)` positions and byte offsets into that string.
//! Character steps move by extended grapheme cluster, so a base letter and
//! its combining marks are crossed together. Word and line steps are plain
//! string arithmetic.

use log::{trace, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::position::{self, Position};
use crate::selection::{Direction, Granularity};
use crate::tree::{self, DocumentTree};

/// Which leaf wins when a flat offset falls on the boundary between two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// The leaf holding the character before the offset.
    Before,
    /// The leaf holding the character after the offset.
    After,
}

impl Bias {
    /// Landing bias for a step in `direction`: stay in the leaf just crossed.
    pub fn toward(direction: Direction) -> Self {
        match direction {
            Direction::Forward => Self::Before,
            Direction::Backward => Self::After,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Run<N> {
    node: N,
    start: usize,
    end: usize,
}

/// The text leaves of a root, concatenated in document order.
#[derive(Debug, Clone)]
pub struct TextRuns<N> {
    runs: Vec<Run<N>>,
    text: String,
}

impl<N: Copy + Eq + std::fmt::Debug> TextRuns<N> {
    pub fn collect<T: DocumentTree<Node = N> + ?Sized>(tree: &T, root: N) -> Self {
        let mut runs = Vec::new();
        let mut text = String::new();
        for leaf in tree::text_leaves(tree, root) {
            let start = text.len();
            text.push_str(tree.text(leaf).unwrap_or_default());
            runs.push(Run {
                node: leaf,
                start,
                end: text.len(),
            });
        }
        Self { runs, text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Flat offset of a position inside one of the runs.
    pub fn to_flat(&self, pos: Position<N>) -> Option<usize> {
        let run = self.runs.iter().find(|run| run.node == pos.node)?;
        (pos.offset <= run.end - run.start).then_some(run.start + pos.offset)
    }

    /// Position of a flat offset, choosing between adjacent leaves by `bias`.
    pub fn to_position(&self, flat: usize, bias: Bias) -> Option<Position<N>> {
        if flat > self.text.len() {
            return None;
        }
        let before = || {
            self.runs
                .iter()
                .rev()
                .find(|run| run.start < flat && flat <= run.end)
        };
        let after = || {
            self.runs
                .iter()
                .find(|run| run.start <= flat && flat < run.end)
        };
        let run = match bias {
            Bias::Before => before().or_else(after),
            Bias::After => after().or_else(before),
        };
        match run {
            Some(run) => Some(Position::new(run.node, flat - run.start)),
            // Every run is empty; flat can only be zero here.
            None => self.runs.first().map(|run| Position::start_of(run.node)),
        }
    }
}

/// Where one `granularity` step in `direction` from `focus` lands.
///
/// `None` when `root` holds no text to move through, or when `focus` is not
/// a valid position (an offset past the end or inside a character).
pub fn locate<T: DocumentTree + ?Sized>(
    tree: &T,
    root: T::Node,
    focus: Position<T::Node>,
    direction: Direction,
    granularity: Granularity,
) -> Option<Position<T::Node>> {
    if let Err(err) = focus.validate(tree) {
        warn!("not moving from {focus:?}: {err}");
        return None;
    }
    let runs = TextRuns::collect(tree, root);
    let start = position::resolve_text_position(tree, root, focus)?;
    let from = runs.to_flat(start)?;
    let to = step(runs.text(), from, direction, granularity);
    trace!("{granularity:?} {direction:?}: {from} -> {to}");
    runs.to_position(to, Bias::toward(direction))
}

/// One step over `text` from byte offset `at`, clamped to the text.
///
/// `at` must lie on a `char` boundary.
pub fn step(text: &str, at: usize, direction: Direction, granularity: Granularity) -> usize {
    match (granularity, direction) {
        (Granularity::Character, Direction::Forward) => {
            text[at..].graphemes(true).next().map_or(at, |g| at + g.len())
        }
        (Granularity::Character, Direction::Backward) => {
            text[..at].graphemes(true).next_back().map_or(at, |g| at - g.len())
        }
        (Granularity::Word, Direction::Forward) => word_forward(text, at),
        (Granularity::Word, Direction::Backward) => word_backward(text, at),
        (Granularity::Line, Direction::Forward) => line_forward(text, at),
        (Granularity::Line, Direction::Backward) => line_backward(text, at),
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Skips non-word characters, then to the end of the following word.
fn word_forward(text: &str, at: usize) -> usize {
    let mut seen_word = false;
    for (i, c) in text[at..].char_indices() {
        match (is_word(c), seen_word) {
            (true, _) => seen_word = true,
            (false, true) => return at + i,
            (false, false) => {}
        }
    }
    text.len()
}

/// Skips non-word characters backwards, then to the start of that word.
fn word_backward(text: &str, at: usize) -> usize {
    let mut seen_word = false;
    for (i, c) in text[..at].char_indices().rev() {
        match (is_word(c), seen_word) {
            (true, _) => seen_word = true,
            (false, true) => return i + c.len_utf8(),
            (false, false) => {}
        }
    }
    0
}

fn line_start(text: &str, at: usize) -> usize {
    text[..at].rfind('\n').map_or(0, |i| i + 1)
}

fn line_end(text: &str, at: usize) -> usize {
    text[at..].find('\n').map_or(text.len(), |i| at + i)
}

/// Byte offset `column` characters into the line starting at `start`.
fn at_column(text: &str, start: usize, column: usize) -> usize {
    let end = line_end(text, start);
    text[start..end]
        .char_indices()
        .nth(column)
        .map_or(end, |(i, _)| start + i)
}

/// Same column on the next line, or the end of the text on the last line.
fn line_forward(text: &str, at: usize) -> usize {
    let column = text[line_start(text, at)..at].chars().count();
    let end = line_end(text, at);
    if end == text.len() {
        return text.len();
    }
    at_column(text, end + 1, column)
}

/// Same column on the previous line, or the start of the text on the first.
fn line_backward(text: &str, at: usize) -> usize {
    let start = line_start(text, at);
    if start == 0 {
        return 0;
    }
    let column = text[start..at].chars().count();
    at_column(text, line_start(text, start - 1), column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Dom;
    use crate::tree::EditableTree;
    use rstest::rstest;

    #[rstest]
    #[case::char_forward("abc", 1, Direction::Forward, Granularity::Character, 2)]
    #[case::char_forward_clamps("abc", 3, Direction::Forward, Granularity::Character, 3)]
    #[case::char_backward_clamps("abc", 0, Direction::Backward, Granularity::Character, 0)]
    #[case::char_multibyte("aéb", 1, Direction::Forward, Granularity::Character, 3)]
    #[case::char_combining_mark("e\u{301}x", 0, Direction::Forward, Granularity::Character, 3)]
    #[case::char_combining_mark_backward("e\u{301}x", 3, Direction::Backward, Granularity::Character, 0)]
    #[case::char_crlf("a\r\nb", 1, Direction::Forward, Granularity::Character, 3)]
    #[case::word_forward("foo  bar baz", 0, Direction::Forward, Granularity::Word, 3)]
    #[case::word_forward_skips_gap("foo  bar baz", 3, Direction::Forward, Granularity::Word, 8)]
    #[case::word_forward_at_end("foo", 3, Direction::Forward, Granularity::Word, 3)]
    #[case::word_backward("foo  bar baz", 8, Direction::Backward, Granularity::Word, 5)]
    #[case::word_backward_mid_word("foo  bar", 7, Direction::Backward, Granularity::Word, 5)]
    #[case::word_backward_at_start("  foo", 2, Direction::Backward, Granularity::Word, 0)]
    #[case::line_forward_keeps_column("abcd\nxy\nlmnop", 3, Direction::Forward, Granularity::Line, 7)]
    #[case::line_forward_from_short_line("abcd\nxy\nlmnop", 7, Direction::Forward, Granularity::Line, 10)]
    #[case::line_forward_on_last_line("ab\ncd", 4, Direction::Forward, Granularity::Line, 5)]
    #[case::line_backward("abcd\nxy", 6, Direction::Backward, Granularity::Line, 1)]
    #[case::line_backward_on_first_line("abcd\nxy", 2, Direction::Backward, Granularity::Line, 0)]
    fn steps(
        #[case] text: &str,
        #[case] at: usize,
        #[case] direction: Direction,
        #[case] granularity: Granularity,
        #[case] expected: usize,
    ) {
        assert_eq!(step(text, at, direction, granularity), expected);
    }

    #[test]
    fn flat_offsets_round_trip_through_runs() {
        let dom = Dom::parse_html("<p>ab</p><p></p><p>cd</p>").unwrap();
        let runs = TextRuns::collect(&dom, dom.root());
        let ab = dom.find_text(dom.root(), "ab").unwrap();
        let cd = dom.find_text(dom.root(), "cd").unwrap();

        assert_eq!(runs.text(), "abcd");
        assert_eq!(runs.to_flat(Position::new(cd, 1)), Some(3));
        assert_eq!(runs.to_position(2, Bias::Before), Some(Position::new(ab, 2)));
        assert_eq!(runs.to_position(2, Bias::After), Some(Position::new(cd, 0)));
        assert_eq!(runs.to_position(0, Bias::Before), Some(Position::new(ab, 0)));
        assert_eq!(runs.to_position(4, Bias::After), Some(Position::new(cd, 2)));
        assert_eq!(runs.to_position(5, Bias::After), None);
    }

    #[test]
    fn runs_of_empty_text_still_give_a_position() {
        let mut dom = Dom::parse_html("<p></p>").unwrap();
        let root = dom.root();
        let p = dom.first_child(root).unwrap();
        let empty = dom.create_text("");
        dom.append_child(p, empty);

        let runs = TextRuns::collect(&dom, root);
        assert!(!runs.is_empty());
        assert_eq!(runs.to_position(0, Bias::Before), Some(Position::start_of(empty)));
    }

    #[test]
    fn locate_crosses_leaf_boundaries() {
        let dom = Dom::parse_html("<p>ab<b>cd</b></p>").unwrap();
        let root = dom.root();
        let ab = dom.find_text(root, "ab").unwrap();
        let cd = dom.find_text(root, "cd").unwrap();

        let forward = locate(&dom, root, Position::new(ab, 2), Direction::Forward, Granularity::Character);
        assert_eq!(forward, Some(Position::new(cd, 1)));

        let backward = locate(&dom, root, Position::new(cd, 0), Direction::Backward, Granularity::Character);
        assert_eq!(backward, Some(Position::new(ab, 1)));

        let word = locate(&dom, root, Position::new(ab, 0), Direction::Forward, Granularity::Word);
        assert_eq!(word, Some(Position::new(cd, 2)));
    }

    #[test]
    fn locate_refuses_offsets_inside_a_character() {
        let dom = Dom::parse_html("<p>é</p>").unwrap();
        let root = dom.root();
        let leaf = dom.find_text(root, "é").unwrap();
        for granularity in [Granularity::Character, Granularity::Word, Granularity::Line] {
            for direction in [Direction::Forward, Direction::Backward] {
                assert_eq!(
                    locate(&dom, root, Position::new(leaf, 1), direction, granularity),
                    None
                );
            }
        }
        assert_eq!(
            locate(&dom, root, Position::new(leaf, 9), Direction::Forward, Granularity::Character),
            None
        );
    }

    #[test]
    fn locate_without_text_is_none() {
        let dom = Dom::parse_html("<p><br></p>").unwrap();
        let root = dom.root();
        assert_eq!(
            locate(&dom, root, Position::start_of(root), Direction::Forward, Granularity::Word),
            None
        );
    }
}
