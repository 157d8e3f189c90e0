//! # The caret engine
//!
//! [`Engine`] owns a [`SelectionHost`] and the [`Session`] state for the
//! host's current root. Every command starts by re-querying the current root;
//! when it differs from the session's, the session is replaced by a fresh one.
//!
//! ## Ordering
//!
//! Commands read the extend state and the collapsed state of the selection
//! before repositioning anything, because repositioning changes the very
//! state the next command observes.
//!
//! ## Change notifications
//!
//! The engine sets a one-shot flag immediately before each write to the host
//! selection. [`Engine::on_selection_changed`] consumes it, so the
//! notification caused by the engine's own write is reported as
//! [`SelectionChange::Echo`] and only genuine outside changes (pointer
//! selection, for instance) resynchronise the mark.

use log::{debug, warn};

use crate::error::EngineError;
use crate::extend::ExtendMode;
use crate::motion::{self, TextRuns};
use crate::search;
use crate::selection::{Alter, Direction, Granularity, NodeOf, PositionOf, Selection, SelectionHost};
use crate::session::Session;

/// How the engine classified a selection-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// Caused by the engine's own last write; ignored.
    Echo,
    /// Made outside the engine; the mark now follows the selection.
    External,
}

pub struct Engine<H: SelectionHost> {
    host: H,
    session: Session<NodeOf<H>>,
}

impl<H: SelectionHost> Engine<H> {
    pub fn new(host: H) -> Self {
        let session = Session::for_root(host.current_root());
        Self { host, session }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct access to the host. Selection writes made through it are
    /// indistinguishable from user input.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn session(&self) -> &Session<NodeOf<H>> {
        &self.session
    }

    pub fn mode(&self) -> ExtendMode {
        self.session.mode
    }

    pub fn mark(&self) -> Option<PositionOf<H>> {
        self.session.mark
    }

    pub fn saved_point(&self) -> Option<PositionOf<H>> {
        self.session.saved_point
    }

    /// Re-queries the current root, starting a fresh session if it moved.
    pub(crate) fn sync_root(&mut self) -> Option<NodeOf<H>> {
        let root = self.host.current_root();
        if root != self.session.root {
            debug!("current root changed to {root:?}, starting a new session");
            self.session = Session::for_root(root);
        }
        root
    }

    /// Runs a write to the host selection, flagging the notification it causes.
    pub(crate) fn write_selection(&mut self, write: impl FnOnce(&mut Selection<'_, H>)) {
        self.session.expect_echo = true;
        write(&mut Selection::new(&mut self.host));
    }

    fn is_collapsed(&mut self) -> bool {
        Selection::new(&mut self.host).is_collapsed()
    }

    fn collapse_to_focus(&mut self) {
        if self.host.focus().is_some() {
            self.write_selection(|selection| selection.collapse_to_focus());
        }
    }

    /// Collapses the selection to its focus and enters extend mode.
    ///
    /// Idempotent: a second call collapses onto the same point again.
    pub fn set_extend(&mut self) {
        self.sync_root();
        self.collapse_to_focus();
        self.session.mode = ExtendMode::Extend;
        debug!("extend mode on");
    }

    /// Collapses the selection to its focus and leaves extend mode.
    pub fn unset_extend(&mut self) {
        self.sync_root();
        self.collapse_to_focus();
        self.session.mode = ExtendMode::Move;
        debug!("extend mode off");
    }

    /// [`set_extend`](Self::set_extend), remembering the caret as the mark.
    pub fn set_mark(&mut self) {
        self.set_extend();
        self.session.mark = self.host.focus();
        debug!("mark set at {:?}", self.session.mark);
    }

    /// [`unset_extend`](Self::unset_extend), forgetting the mark.
    pub fn unset_mark(&mut self) {
        self.unset_extend();
        self.session.mark = None;
        debug!("mark cleared");
    }

    /// Moves the focus one `granularity` unit in `direction`, extending the
    /// selection when it is open or extend mode is on.
    ///
    /// Never fails: at the ends of the document the focus stays put.
    /// Character steps are computed here over the text leaves; word and line
    /// steps are delegated to [`SelectionHost::modify`].
    pub fn move_focus(&mut self, direction: Direction, granularity: Granularity) {
        let Some(root) = self.sync_root() else {
            debug!("no current root, ignoring {granularity:?} {direction:?}");
            return;
        };
        let collapsed_before = self.is_collapsed();
        let mode = self.session.mode;
        let alter = mode.alter_for(collapsed_before);

        match granularity {
            Granularity::Character => self.step_character(root, alter, direction),
            Granularity::Word | Granularity::Line => {
                self.session.expect_echo = true;
                self.host.modify(alter, direction, granularity);
            }
        }

        let next = mode.after_move(collapsed_before, alter, self.is_collapsed());
        if next != mode {
            debug!("{mode:?} -> {next:?} after {alter:?} {direction:?} {granularity:?}");
        }
        self.session.mode = next;
    }

    fn step_character(&mut self, root: NodeOf<H>, alter: Alter, direction: Direction) {
        let Some(focus) = self.host.focus() else {
            return;
        };
        let Some(target) = motion::locate(
            self.host.tree(),
            root,
            focus,
            direction,
            Granularity::Character,
        ) else {
            debug!("no text under {root:?} to move through");
            return;
        };
        let extend_from = match alter {
            Alter::Move => None,
            Alter::Extend => Some(self.host.anchor().unwrap_or(focus)),
        };
        self.write_selection(|selection| selection.reposition(target, extend_from));
    }

    /// Relocates the focus to `point`.
    ///
    /// An open selection is extended from its anchor; in extend mode a
    /// collapsed caret is extended from where it is; otherwise the caret
    /// simply jumps. Fails without touching anything when `point` is not a
    /// valid position inside the current root.
    pub fn goto(&mut self, point: PositionOf<H>) -> Result<(), EngineError> {
        let root = self.sync_root().ok_or(EngineError::NoRoot)?;
        let tree = self.host.tree();
        if let Err(err) = point.validate(tree) {
            warn!("goto {point:?} rejected: {err}");
            return Err(err);
        }
        if !point.is_within(tree, root) {
            warn!("goto {point:?} rejected: outside {root:?}");
            return Err(EngineError::NotInRoot);
        }

        let selection = Selection::new(&mut self.host);
        let extend_from = if !selection.is_collapsed() {
            selection.anchor()
        } else if self.session.mode == ExtendMode::Extend {
            selection.focus()
        } else {
            None
        };
        self.write_selection(|selection| selection.reposition(point, extend_from));
        Ok(())
    }

    /// Searches for `needle`, ignoring case, and moves the focus there.
    ///
    /// Forward search lands just after the match, backward search at its
    /// start. Returns `false`, leaving selection and mode untouched, when
    /// there is no match or no text to search from.
    pub fn search(&mut self, needle: &str, direction: Direction) -> bool {
        let Some(root) = self.sync_root() else {
            return false;
        };
        let Some(from) = Selection::new(&mut self.host).text_under_focus(root) else {
            debug!("nothing to search from under {root:?}");
            return false;
        };
        let runs = TextRuns::collect(self.host.tree(), root);
        let Some(target) = search::find(&runs, from, needle, direction) else {
            debug!("{needle:?} not found {direction:?}");
            return false;
        };
        self.goto(target).is_ok()
    }

    /// Remembers the focus, replacing any earlier saved point.
    pub fn save_point(&mut self) {
        self.sync_root();
        self.session.saved_point = self.host.focus();
    }

    /// Collapses the selection onto the saved point, if there is one.
    pub fn restore_point(&mut self) {
        let root = self.sync_root();
        let Some(point) = self.session.saved_point else {
            return;
        };
        let tree = self.host.tree();
        let usable = point.validate(tree).is_ok()
            && root.is_some_and(|root| point.is_within(tree, root));
        if !usable {
            warn!("saved point {point:?} no longer fits the document");
            return;
        }
        self.write_selection(|selection| selection.reposition(point, None));
    }

    /// Must be called by the host after every change of its selection.
    pub fn on_selection_changed(&mut self) -> SelectionChange {
        let echo = std::mem::take(&mut self.session.expect_echo);
        self.sync_root();
        if echo {
            return SelectionChange::Echo;
        }

        let selection = Selection::new(&mut self.host);
        if selection.is_collapsed() {
            self.session.mark = None;
            self.session.mode = ExtendMode::Move;
            debug!("selection collapsed externally, mark cleared");
        } else {
            self.session.mark = selection.anchor();
            debug!("mark follows external selection to {:?}", self.session.mark);
        }
        SelectionChange::External
    }

    /// The focus resolved to a text position in the current root.
    pub fn text_under_focus(&mut self) -> Result<PositionOf<H>, EngineError> {
        let root = self.sync_root().ok_or(EngineError::NoRoot)?;
        Selection::new(&mut self.host)
            .text_under_focus(root)
            .ok_or(EngineError::UnresolvablePosition)
    }
}

impl<H: SelectionHost> std::fmt::Debug for Engine<H>
where
    H: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("host", &self.host)
            .field("session", &self.session)
            .finish()
    }
}
