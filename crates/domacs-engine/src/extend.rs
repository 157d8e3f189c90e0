//! Extend-mode state machine.
//!
//! The stored state only matters while the selection is collapsed: a
//! non-collapsed selection always extends.

use serde::{Deserialize, Serialize};

use crate::selection::Alter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtendMode {
    #[default]
    Move,
    Extend,
}

impl ExtendMode {
    /// How the next movement alters the selection, read before it happens.
    pub fn alter_for(self, collapsed: bool) -> Alter {
        match (self, collapsed) {
            (Self::Move, true) => Alter::Move,
            _ => Alter::Extend,
        }
    }

    /// State after a movement performed with `alter`.
    ///
    /// An extension driven only by the stored state is consumed, unless the
    /// movement left the two ends coinciding: then extend mode is kept so the
    /// next movement still grows the selection.
    pub fn after_move(self, collapsed_before: bool, alter: Alter, collapsed_after: bool) -> Self {
        match alter {
            Alter::Move => self,
            Alter::Extend if collapsed_after => Self::Extend,
            Alter::Extend if collapsed_before => Self::Move,
            Alter::Extend => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::move_collapsed(ExtendMode::Move, true, Alter::Move)]
    #[case::move_with_selection(ExtendMode::Move, false, Alter::Extend)]
    #[case::extend_collapsed(ExtendMode::Extend, true, Alter::Extend)]
    #[case::extend_with_selection(ExtendMode::Extend, false, Alter::Extend)]
    fn selection_overrides_stored_state(
        #[case] mode: ExtendMode,
        #[case] collapsed: bool,
        #[case] expected: Alter,
    ) {
        assert_eq!(mode.alter_for(collapsed), expected);
    }

    #[rstest]
    #[case::plain_move(ExtendMode::Move, true, Alter::Move, true, ExtendMode::Move)]
    #[case::stored_extend_consumed(ExtendMode::Extend, true, Alter::Extend, false, ExtendMode::Move)]
    #[case::stored_extend_recollapsed(ExtendMode::Extend, true, Alter::Extend, true, ExtendMode::Extend)]
    #[case::selection_recollapsed(ExtendMode::Move, false, Alter::Extend, true, ExtendMode::Extend)]
    #[case::selection_still_open(ExtendMode::Move, false, Alter::Extend, false, ExtendMode::Move)]
    #[case::extend_with_open_selection(ExtendMode::Extend, false, Alter::Extend, false, ExtendMode::Extend)]
    fn transitions(
        #[case] mode: ExtendMode,
        #[case] collapsed_before: bool,
        #[case] alter: Alter,
        #[case] collapsed_after: bool,
        #[case] expected: ExtendMode,
    ) {
        assert_eq!(mode.after_move(collapsed_before, alter, collapsed_after), expected);
    }

    #[test]
    fn starts_in_move() {
        assert_eq!(ExtendMode::default(), ExtendMode::Move);
    }
}
