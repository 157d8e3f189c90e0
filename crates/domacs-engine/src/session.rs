use crate::extend::ExtendMode;
use crate::position::Position;

/// Engine state scoped to one editable root.
///
/// A fresh session is started whenever the host reports a different current
/// root, so nothing leaks from one field into the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session<N> {
    pub root: Option<N>,
    pub mode: ExtendMode,
    pub mark: Option<Position<N>>,
    pub saved_point: Option<Position<N>>,
    /// Set right before the engine touches the host selection; swallows the
    /// change notification that follows.
    pub expect_echo: bool,
}

impl<N> Session<N> {
    pub fn for_root(root: Option<N>) -> Self {
        Self {
            root,
            mode: ExtendMode::Move,
            mark: None,
            saved_point: None,
            expect_echo: false,
        }
    }
}
