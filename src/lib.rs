//! Embedded s-expression scripting for game asset definition.
//!
//! Scripts describe assets — particle emitters, keyframed curves,
//! procedural data — as s-expressions evaluated against a small
//! interpreter. A host creates an [`Interp`] session, asks it for a root
//! context (which installs the intrinsic library and the scripted standard
//! library), and loads script files:
//!
//! ```no_run
//! use resin::Interp;
//!
//! let interp = Interp::new();
//! let ctx = interp.new_root_context().unwrap();
//! let result = interp.load_file(&ctx, "dat/script/emitter.s").unwrap();
//! ```
//!
//! Terms are reference counted: cloning a [`Term`] keeps it alive, dropping
//! the last clone frees it. A host cache that retains a result across loads
//! just holds on to its clone.

pub mod environment;
pub mod error;
pub mod heap;
pub mod interner;
pub mod interpreter;
pub mod language;
pub mod lexer;
pub mod native;
pub mod objects;
pub mod parser;
pub mod stdlib;

// Re-export commonly used items for convenience
pub use environment::Context;
pub use error::{Result, ScriptError};
pub use heap::{HeapConfig, TermHeap};
pub use interner::Symbol;
pub use interpreter::Interp;
pub use language::{Term, TermKind, Vec4};
pub use lexer::InputStream;
pub use parser::{parse, parse_sequence, parse_str};
