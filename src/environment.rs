//! Lexically-nested binding frames.
//!
//! A `Context` maps interned symbols to terms and chains to a parent frame.
//! Lookups walk the chain; bindings always land in the local frame. One
//! child frame is created per function application and dropped as soon as
//! the body has evaluated, so at runtime the frames form a tree rooted at
//! the session's global context.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::trace;
use rustc_hash::FxHashMap;

use crate::interner::Symbol;
use crate::language::Term;

// Decrements the session's frame count when the frame is freed.
struct FrameTicket(Rc<Cell<usize>>);

impl Drop for FrameTicket {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

struct ContextState {
    parent: Option<Context>,
    bindings: RefCell<FxHashMap<Symbol, Term>>,
    capacity: usize,
    #[allow(dead_code)]
    ticket: FrameTicket,
}

/// One binding frame in the context chain.
#[derive(Clone)]
pub struct Context {
    state: Rc<ContextState>,
}

impl Context {
    pub(crate) fn root(frames: &Rc<Cell<usize>>, capacity: usize) -> Context {
        Context::with_parent(frames, capacity, None)
    }

    /// A child frame for one function application.
    pub fn child(&self) -> Context {
        trace!("context frame created");
        Context::with_parent(
            &self.state.ticket.0,
            self.state.capacity,
            Some(self.clone()),
        )
    }

    fn with_parent(
        frames: &Rc<Cell<usize>>,
        capacity: usize,
        parent: Option<Context>,
    ) -> Context {
        frames.set(frames.get() + 1);
        Context {
            state: Rc::new(ContextState {
                parent,
                bindings: RefCell::new(FxHashMap::with_capacity_and_hasher(
                    capacity,
                    Default::default(),
                )),
                capacity,
                ticket: FrameTicket(Rc::clone(frames)),
            }),
        }
    }

    /// Bind `name` in this frame, taking a reference on the term.
    pub fn bind(&self, name: &str, value: Term) {
        self.bind_sym(Symbol::intern(name), value);
    }

    pub fn bind_sym(&self, sym: Symbol, value: Term) {
        self.state.bindings.borrow_mut().insert(sym, value);
    }

    /// Resolve `sym` here or in an enclosing frame.
    pub fn lookup(&self, sym: Symbol) -> Option<Term> {
        if let Some(value) = self.state.bindings.borrow().get(&sym) {
            return Some(value.clone());
        }
        self.state.parent.as_ref().and_then(|p| p.lookup(sym))
    }
}
