use thiserror::Error;

/// Contract violations and unresolvable requests reported by the engine.
///
/// None of these are fatal to the host: the engine leaves the document and
/// the selection untouched whenever it returns one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("offset {offset} is outside 0..={len}")]
    InvalidOffset { offset: usize, len: usize },

    #[error("offset {offset} does not fall on a character boundary")]
    NotCharBoundary { offset: usize },

    #[error("no editable root is current")]
    NoRoot,

    #[error("position lies outside the current root")]
    NotInRoot,

    #[error("the document has no text to resolve the caret against")]
    UnresolvablePosition,

    #[error("expected a text-bearing node")]
    NotText,

    #[error("expected an element node")]
    NotElement,

    #[error("selection spans more than one text node")]
    CrossNodeSelection,
}
