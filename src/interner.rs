//! Symbol interning.
//!
//! Every atom name is interned once, process-wide; contexts key their
//! binding maps on the interned handle rather than the spelling.

use once_cell::sync::Lazy;
use std::fmt;
use std::sync::RwLock;
use string_interner::{DefaultBackend, DefaultSymbol, StringInterner};

static SYMBOLS: Lazy<RwLock<StringInterner<DefaultBackend>>> =
    Lazy::new(|| RwLock::new(StringInterner::default()));

/// Handle to an interned atom name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(DefaultSymbol);

impl Symbol {
    /// Intern `name`, returning the canonical handle for that spelling.
    pub fn intern(name: &str) -> Self {
        let mut table = SYMBOLS.write().unwrap();
        Symbol(table.get_or_intern(name))
    }

    /// The spelling this handle was interned from.
    pub fn name(&self) -> String {
        self.with_str(str::to_owned)
    }

    /// Run `f` against the spelling without allocating a `String`.
    pub fn with_str<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        let table = SYMBOLS.read().unwrap();
        let s = table.resolve(self.0).expect("symbol was interned");
        f(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| write!(f, "{s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_spelling_same_handle() {
        assert_eq!(Symbol::intern("velocity"), Symbol::intern("velocity"));
        assert_ne!(Symbol::intern("velocity"), Symbol::intern("lifetime"));
    }

    #[test]
    fn name_round_trips() {
        let sym = Symbol::intern("spawn_interval");
        assert_eq!(sym.name(), "spawn_interval");
        assert_eq!(sym.with_str(str::len), "spawn_interval".len());
    }
}
