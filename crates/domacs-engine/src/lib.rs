/*!
 * # domacs engine
 *
 * Emacs-style caret movement, mark handling and incremental search over an
 * editable document tree.
 *
 * ## Addressing
 *
 * Three addressing models meet here:
 *
 * - **Tree structure**: containers and text leaves, walked in depth-first
 *   preorder ([`tree`])
 * - **Local offsets**: a [`Position`] is a node plus an offset into that node
 * - **Document order**: the concatenated text of every leaf under a root,
 *   which search and character motion work on ([`motion::TextRuns`])
 *
 * ## Host seam
 *
 * The engine never owns the document. A host implements [`SelectionHost`]
 * (and [`EditableTree`] on its tree for the formatting commands) and forwards
 * its selection-change notifications to [`Engine::on_selection_changed`].
 * [`MemoryHost`] over [`Dom`] is the in-memory host used by tests and
 * examples.
 *
 * ## Usage Pattern
 *
 * ```rust
 * use domacs_engine::{Action, Dom, Engine, MemoryHost, Outcome, SelectionHost};
 *
 * let dom = Dom::parse_html("<p>Hello <b>world</b></p>").unwrap();
 * let mut engine = Engine::new(MemoryHost::new(dom));
 *
 * // The match straddles two text leaves.
 * assert_eq!(engine.dispatch(Action::SearchForward, Some("O W")), Outcome::Found(true));
 *
 * // Mark, then extend the selection one word forward.
 * engine.dispatch(Action::SetMark, None);
 * engine.dispatch(Action::ForwardWord, None);
 * assert_ne!(engine.host().anchor(), engine.host().focus());
 * ```
 */

pub mod command;
pub mod dom;
pub mod engine;
pub mod error;
pub mod extend;
pub mod format;
pub mod host;
pub mod motion;
pub mod position;
pub mod search;
pub mod selection;
pub mod session;
pub mod tree;

// Re-export key types for easier usage
pub use command::{Action, Outcome};
pub use dom::{Dom, DomError, NodeId};
pub use engine::{Engine, SelectionChange};
pub use error::EngineError;
pub use extend::ExtendMode;
pub use format::Uncodify;
pub use host::MemoryHost;
pub use position::Position;
pub use selection::{Alter, Direction, Granularity, Selection, SelectionHost};
pub use session::Session;
pub use tree::{DocumentTree, EditableTree};
