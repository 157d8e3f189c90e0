//! Case-insensitive substring search across text leaves.
//!
//! Matching runs over the concatenated text of a root, so an occurrence may
//! straddle any number of leaf boundaries. Landing points are mapped back to
//! `(leaf, offset)`: after the match when searching forward, at its start when
//! searching backward.

use log::{trace, warn};
use regex::{Regex, RegexBuilder};

use crate::motion::{Bias, TextRuns};
use crate::position::Position;
use crate::selection::Direction;

fn matcher(needle: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
        .inspect_err(|err| warn!("cannot search for {needle:?}: {err}"))
        .ok()
}

/// Landing point of the nearest occurrence of `needle` from `from`.
///
/// `from` must lie in one of the runs. Forward search takes the first
/// occurrence starting at or after `from`; backward search takes the last
/// one starting strictly before it. An empty needle is found at `from`.
pub fn find<N: Copy + Eq + std::fmt::Debug>(
    runs: &TextRuns<N>,
    from: Position<N>,
    needle: &str,
    direction: Direction,
) -> Option<Position<N>> {
    let origin = runs.to_flat(from)?;
    if needle.is_empty() {
        return Some(from);
    }
    let regex = matcher(needle)?;
    let text = runs.text();

    let flat = match direction {
        Direction::Forward => regex.find_at(text, origin).map(|m| m.end()),
        Direction::Backward => last_start_before(&regex, text, origin),
    };
    trace!("search {needle:?} {direction:?} from {origin}: {flat:?}");
    runs.to_position(flat?, Bias::toward(direction))
}

/// Start of the last match beginning before `origin`, overlaps included.
fn last_start_before(regex: &Regex, text: &str, origin: usize) -> Option<usize> {
    let mut found = None;
    let mut at = 0;
    while let Some(m) = regex.find_at(text, at) {
        if m.start() >= origin {
            break;
        }
        found = Some(m.start());
        let width = text[m.start()..].chars().next().map_or(1, char::len_utf8);
        at = m.start() + width;
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Dom, NodeId};
    use crate::tree::DocumentTree;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn leaves(dom: &Dom) -> Vec<NodeId> {
        crate::tree::text_leaves(dom, dom.root()).collect()
    }

    #[rstest]
    #[case::whole(&["abXYZcd"])]
    #[case::split_before(&["ab", "XYZcd"])]
    #[case::split_inside(&["abX", "YZ", "cd"])]
    #[case::one_char_each(&["a", "b", "X", "Y", "Z", "c", "d"])]
    fn round_trip_ignores_fragmentation(#[case] parts: &[&str]) {
        let markup: String = parts.iter().map(|part| format!("<span>{part}</span>")).collect();
        let dom = Dom::parse_html(&markup).unwrap();
        let runs = TextRuns::collect(&dom, dom.root());
        let leaves = leaves(&dom);

        let after = find(&runs, Position::start_of(leaves[0]), "XYZ", Direction::Forward).unwrap();
        let z_leaf = dom.text(after.node).unwrap();
        assert!(z_leaf[..after.offset].ends_with('Z'));

        let before = find(&runs, after, "XYZ", Direction::Backward).unwrap();
        let x_leaf = dom.text(before.node).unwrap();
        assert!(x_leaf[before.offset..].starts_with('X'));
    }

    #[test]
    fn matching_ignores_case() {
        let dom = Dom::parse_html("xxABCxx").unwrap();
        let runs = TextRuns::collect(&dom, dom.root());
        let start = Position::start_of(leaves(&dom)[0]);

        let lower = find(&runs, start, "abc", Direction::Forward);
        let upper = find(&runs, start, "ABC", Direction::Forward);
        assert_eq!(lower, upper);
        assert_eq!(lower.map(|pos| pos.offset), Some(5));
    }

    #[test]
    fn match_may_straddle_leaves() {
        let dom = Dom::parse_html("<p>Hello <b>world</b></p>").unwrap();
        let runs = TextRuns::collect(&dom, dom.root());
        let leaves = leaves(&dom);

        let found = find(&runs, Position::start_of(leaves[0]), "o w", Direction::Forward);
        assert_eq!(found, Some(Position::new(leaves[1], 1)));
    }

    #[test]
    fn backward_search_sees_overlapping_matches() {
        let dom = Dom::parse_html("aaa").unwrap();
        let runs = TextRuns::collect(&dom, dom.root());
        let leaf = leaves(&dom)[0];

        let found = find(&runs, Position::new(leaf, 3), "aa", Direction::Backward);
        assert_eq!(found, Some(Position::new(leaf, 1)));
    }

    #[test]
    fn backward_search_excludes_match_at_origin() {
        let dom = Dom::parse_html("ab ab").unwrap();
        let runs = TextRuns::collect(&dom, dom.root());
        let leaf = leaves(&dom)[0];

        assert_eq!(
            find(&runs, Position::new(leaf, 3), "ab", Direction::Backward),
            Some(Position::new(leaf, 0))
        );
        assert_eq!(find(&runs, Position::new(leaf, 0), "ab", Direction::Backward), None);
    }

    #[test]
    fn forward_search_includes_match_at_origin() {
        let dom = Dom::parse_html("ab ab").unwrap();
        let runs = TextRuns::collect(&dom, dom.root());
        let leaf = leaves(&dom)[0];

        assert_eq!(
            find(&runs, Position::new(leaf, 3), "ab", Direction::Forward),
            Some(Position::new(leaf, 5))
        );
        assert_eq!(find(&runs, Position::new(leaf, 4), "ab", Direction::Forward), None);
    }

    #[test]
    fn needle_with_regex_syntax_is_literal() {
        let dom = Dom::parse_html("1+1=2 or 11=2").unwrap();
        let runs = TextRuns::collect(&dom, dom.root());
        let leaf = leaves(&dom)[0];
        assert_eq!(
            find(&runs, Position::start_of(leaf), "1+1", Direction::Forward),
            Some(Position::new(leaf, 3))
        );
    }

    #[test]
    fn empty_needle_is_found_where_it_starts() {
        let dom = Dom::parse_html("text").unwrap();
        let runs = TextRuns::collect(&dom, dom.root());
        let at = Position::new(leaves(&dom)[0], 2);
        assert_eq!(find(&runs, at, "", Direction::Backward), Some(at));
        assert_eq!(find(&runs, at, "", Direction::Forward), Some(at));
    }
}
