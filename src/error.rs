use crate::frame::Scope;
use crate::style::StyleVar;
use thiserror::Error;

/// Errors reported by the editor.
///
/// Scope violations and duplicate ids are host bugs; they are also logged at
/// error level when raised.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("{call} called in {found} scope, expected {expected} scope")]
    ScopeViolation {
        call: &'static str,
        expected: Scope,
        found: Scope,
    },

    #[error("node id {0} was submitted twice in one frame")]
    DuplicateNodeId(i32),

    #[error("{0} stack popped more times than pushed")]
    StyleStackUnderflow(&'static str),

    #[error("style variable {0:?} does not take a value of this kind")]
    StyleVarMismatch(StyleVar),

    #[error("malformed ini content at line {line}: {content:?}")]
    MalformedIni { line: usize, content: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results in this crate.
pub type EditorResult<T> = Result<T, EditorError>;
