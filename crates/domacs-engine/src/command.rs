//! Bindable actions and their dispatch onto an [`Engine`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::format::Uncodify;
use crate::selection::{Direction, Granularity, SelectionHost};
use crate::tree::EditableTree;

/// Every operation a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    ForwardChar,
    BackwardChar,
    ForwardWord,
    BackwardWord,
    NextLine,
    PreviousLine,
    SetMark,
    UnsetMark,
    SavePoint,
    RestorePoint,
    SearchForward,
    SearchBackward,
    CodifySelection,
    UncodifySelection,
    BreakOutOfCode,
    BoldToCode,
}

impl Action {
    pub const ALL: [Action; 16] = [
        Action::ForwardChar,
        Action::BackwardChar,
        Action::ForwardWord,
        Action::BackwardWord,
        Action::NextLine,
        Action::PreviousLine,
        Action::SetMark,
        Action::UnsetMark,
        Action::SavePoint,
        Action::RestorePoint,
        Action::SearchForward,
        Action::SearchBackward,
        Action::CodifySelection,
        Action::UncodifySelection,
        Action::BreakOutOfCode,
        Action::BoldToCode,
    ];

    /// Kebab-case name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Action::ForwardChar => "forward-char",
            Action::BackwardChar => "backward-char",
            Action::ForwardWord => "forward-word",
            Action::BackwardWord => "backward-word",
            Action::NextLine => "next-line",
            Action::PreviousLine => "previous-line",
            Action::SetMark => "set-mark",
            Action::UnsetMark => "unset-mark",
            Action::SavePoint => "save-point",
            Action::RestorePoint => "restore-point",
            Action::SearchForward => "search-forward",
            Action::SearchBackward => "search-backward",
            Action::CodifySelection => "codify-selection",
            Action::UncodifySelection => "uncodify-selection",
            Action::BreakOutOfCode => "break-out-of-code",
            Action::BoldToCode => "bold-to-code",
        }
    }

    /// Whether the action reads its text argument.
    pub fn takes_input(self) -> bool {
        matches!(
            self,
            Action::SearchForward
                | Action::SearchBackward
                | Action::CodifySelection
                | Action::BreakOutOfCode
        )
    }

    fn motion(self) -> Option<(Direction, Granularity)> {
        match self {
            Action::ForwardChar => Some((Direction::Forward, Granularity::Character)),
            Action::BackwardChar => Some((Direction::Backward, Granularity::Character)),
            Action::ForwardWord => Some((Direction::Forward, Granularity::Word)),
            Action::BackwardWord => Some((Direction::Backward, Granularity::Word)),
            Action::NextLine => Some((Direction::Forward, Granularity::Line)),
            Action::PreviousLine => Some((Direction::Backward, Granularity::Line)),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}

/// What running an [`Action`] came to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Result of a search.
    Found(bool),
    /// The action needs text and none was given.
    NeedsInput,
    /// The action completes on the next typed text, via
    /// [`Action::BreakOutOfCode`].
    Pending,
    Failed(EngineError),
}

impl From<Result<(), EngineError>> for Outcome {
    fn from(result: Result<(), EngineError>) -> Self {
        match result {
            Ok(()) => Outcome::Done,
            Err(err) => Outcome::Failed(err),
        }
    }
}

impl<H> Engine<H>
where
    H: SelectionHost,
    H::Tree: EditableTree,
{
    /// Runs `action`, taking its text argument from `input` when it has one.
    pub fn dispatch(&mut self, action: Action, input: Option<&str>) -> Outcome {
        if let Some((direction, granularity)) = action.motion() {
            self.move_focus(direction, granularity);
            return Outcome::Done;
        }
        let input = match (action.takes_input(), input) {
            (true, None) => return Outcome::NeedsInput,
            (_, input) => input.unwrap_or_default(),
        };

        match action {
            Action::SetMark => self.set_mark(),
            Action::UnsetMark => self.unset_mark(),
            Action::SavePoint => self.save_point(),
            Action::RestorePoint => self.restore_point(),
            Action::SearchForward => return Outcome::Found(self.search(input, Direction::Forward)),
            Action::SearchBackward => {
                return Outcome::Found(self.search(input, Direction::Backward));
            }
            Action::CodifySelection => return self.codify_selection(input).into(),
            Action::UncodifySelection => {
                return match self.uncodify_selection() {
                    Ok(Uncodify::Done | Uncodify::NotInCode) => Outcome::Done,
                    Ok(Uncodify::Pending) => Outcome::Pending,
                    Err(err) => Outcome::Failed(err),
                };
            }
            Action::BreakOutOfCode => return self.break_out_of_code(input).into(),
            Action::BoldToCode => {
                if let Err(err) = self.bold_to_code() {
                    return Outcome::Failed(err);
                }
            }
            Action::ForwardChar
            | Action::BackwardChar
            | Action::ForwardWord
            | Action::BackwardWord
            | Action::NextLine
            | Action::PreviousLine => {}
        }
        Outcome::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Dom;
    use crate::host::MemoryHost;
    use crate::position::Position;
    use pretty_assertions::assert_eq;

    fn engine(markup: &str) -> Engine<MemoryHost> {
        Engine::new(MemoryHost::new(Dom::parse_html(markup).unwrap()))
    }

    #[test]
    fn names_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>(), Ok(action));
        }
        assert!("fly".parse::<Action>().is_err());
    }

    #[test]
    fn search_without_text_asks_for_it() {
        let mut engine = engine("<p>abc</p>");
        assert_eq!(engine.dispatch(Action::SearchForward, None), Outcome::NeedsInput);
        assert_eq!(
            engine.dispatch(Action::SearchForward, Some("b")),
            Outcome::Found(true)
        );
        assert_eq!(
            engine.dispatch(Action::SearchForward, Some("zzz")),
            Outcome::Found(false)
        );
    }

    #[test]
    fn motion_actions_move_the_caret() {
        let mut engine = engine("<p>abc</p>");
        let dom = engine.host().dom();
        let abc = dom.find_text(dom.root(), "abc").unwrap();
        assert_eq!(engine.dispatch(Action::ForwardChar, None), Outcome::Done);
        assert_eq!(engine.dispatch(Action::ForwardChar, None), Outcome::Done);
        assert_eq!(engine.dispatch(Action::BackwardChar, None), Outcome::Done);
        assert_eq!(engine.host().focus(), Some(Position::new(abc, 1)));
    }

    #[test]
    fn uncodify_then_break_out() {
        let mut engine = engine("<code>ab</code>");
        let dom = engine.host().dom();
        let ab = dom.find_text(dom.root(), "ab").unwrap();
        engine.goto(Position::new(ab, 1)).unwrap();

        assert_eq!(engine.dispatch(Action::UncodifySelection, None), Outcome::Pending);
        assert_eq!(engine.dispatch(Action::BreakOutOfCode, Some("x")), Outcome::Done);
        let dom = engine.host().dom();
        assert_eq!(dom.inner_html(dom.root()), "<code>a</code>x<code>b</code>");
    }

    #[test]
    fn failures_are_reported() {
        let mut engine = engine("<p>plain</p>");
        assert_eq!(
            engine.dispatch(Action::BreakOutOfCode, Some("x")),
            Outcome::Failed(EngineError::NotElement)
        );
    }
}
