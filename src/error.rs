use thiserror::Error;

/// Unified error type for parsing and evaluation.
///
/// None of these are recoverable from inside a script — the language has no
/// catch construct. They propagate out of `eval` so the host can report the
/// failing construct and decide what to do with the load.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("end of input reached inside an open list (missing close parenthesis)")]
    UnbalancedParens,

    #[error("unexpected token {0:?}")]
    UnexpectedToken(String),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unbound symbol \"{0}\"")]
    UnboundSymbol(String),

    #[error("{intrinsic}: expected {expected}, got {found}")]
    TypeMismatch {
        intrinsic: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("{intrinsic}: expected {expected} arguments, got {found}")]
    Arity {
        intrinsic: &'static str,
        expected: String,
        found: usize,
    },

    #[error("function expected {expected} arguments, got {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("cannot apply {0}")]
    NotApplicable(String),

    #[error("term heap exhausted ({0} terms live)")]
    CapacityExceeded(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScriptError>;
