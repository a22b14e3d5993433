//! Session-owned term storage.
//!
//! Term nodes live on the Rust heap behind `Rc`; `TermHeap` keeps the
//! accounting. Every node carries a ticket that decrements the live count
//! when the node is freed, and allocation past the configured cap fails
//! with `CapacityExceeded`, so a session behaves like a fixed pool that
//! hosts can watch drain.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{Result, ScriptError};
use crate::interner::Symbol;
use crate::language::{IntrinsicFn, ListCell, Term, TermKind, TermNode, Vec4};
use crate::objects::ObjectRef;

/// Sizing knobs for a scripting session.
#[derive(Debug, Clone, Copy)]
pub struct HeapConfig {
    /// Hard cap on simultaneously-live terms.
    pub max_terms: usize,
    /// Pre-sizing hint for each context frame's binding map.
    pub context_capacity: usize,
}

impl Default for HeapConfig {
    fn default() -> Self {
        HeapConfig {
            max_terms: 4096,
            context_capacity: 128,
        }
    }
}

/// Decrements the live count when its term node is freed.
pub(crate) struct AllocTicket(Rc<Cell<usize>>);

impl Drop for AllocTicket {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

/// Allocation source for every term in one session.
pub struct TermHeap {
    live: Rc<Cell<usize>>,
    max_terms: usize,
    true_term: Term,
    false_term: Term,
}

impl TermHeap {
    pub(crate) fn new(config: &HeapConfig) -> Self {
        let live = Rc::new(Cell::new(0));
        // The boolean singletons are minted directly; they live as long as
        // the session and are handed out as clones, never reallocated.
        let true_term = mint(&live, TermKind::True);
        let false_term = mint(&live, TermKind::False);
        TermHeap {
            live,
            max_terms: config.max_terms,
            true_term,
            false_term,
        }
    }

    /// Terms currently alive in this session.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    fn alloc(&self, kind: TermKind) -> Result<Term> {
        if self.live.get() >= self.max_terms {
            return Err(ScriptError::CapacityExceeded(self.live.get()));
        }
        Ok(mint(&self.live, kind))
    }

    pub fn float(&self, value: f32) -> Result<Term> {
        self.alloc(TermKind::Float(value))
    }

    pub fn string(&self, value: impl Into<String>) -> Result<Term> {
        self.alloc(TermKind::Str(value.into()))
    }

    pub fn atom(&self, sym: Symbol) -> Result<Term> {
        self.alloc(TermKind::Atom(sym))
    }

    pub fn atom_named(&self, name: &str) -> Result<Term> {
        self.atom(Symbol::intern(name))
    }

    pub fn vector(&self, v: Vec4) -> Result<Term> {
        self.alloc(TermKind::Vector(v))
    }

    pub fn object(&self, obj: ObjectRef) -> Result<Term> {
        self.alloc(TermKind::Object(obj))
    }

    pub fn intrinsic(&self, f: IntrinsicFn) -> Result<Term> {
        self.alloc(TermKind::Intrinsic(f))
    }

    /// The shared boolean singleton for `value`.
    pub fn truth(&self, value: bool) -> Term {
        if value {
            self.true_term.clone()
        } else {
            self.false_term.clone()
        }
    }

    /// One cons cell. Both references are owned by the new cell.
    pub fn cons(&self, element: Option<Term>, next: Option<Term>) -> Result<Term> {
        self.alloc(TermKind::List(ListCell { element, next }))
    }

    /// The empty list `()`.
    pub fn empty_list(&self) -> Result<Term> {
        self.cons(None, None)
    }

    /// Build a list term from items, `()` when empty.
    pub fn list_from_vec(&self, items: Vec<Term>) -> Result<Term> {
        match self.chain_from_vec(items)? {
            Some(list) => Ok(list),
            None => self.empty_list(),
        }
    }

    /// Build an argument list from items, `None` when empty.
    pub fn chain_from_vec(&self, items: Vec<Term>) -> Result<Option<Term>> {
        let mut next = None;
        for item in items.into_iter().rev() {
            next = Some(self.cons(Some(item), next)?);
        }
        Ok(next)
    }

    /// Fresh node with the same payload. Lists get a fresh spine sharing
    /// their element terms; the boolean singletons stay shared.
    pub fn copy(&self, term: &Term) -> Result<Term> {
        let kind = match term.kind() {
            TermKind::List(_) => return self.copy_spine(term),
            TermKind::Atom(sym) => TermKind::Atom(*sym),
            TermKind::Str(s) => TermKind::Str(s.clone()),
            TermKind::Float(f) => TermKind::Float(*f),
            TermKind::Vector(v) => TermKind::Vector(*v),
            TermKind::Object(obj) => TermKind::Object(obj.clone()),
            TermKind::Intrinsic(f) => TermKind::Intrinsic(*f),
            TermKind::True | TermKind::False => return Ok(term.clone()),
        };
        self.alloc(kind)
    }

    /// Copy a list's cell chain, sharing the element terms.
    pub fn copy_spine(&self, list: &Term) -> Result<Term> {
        let mut elements = Vec::new();
        let mut cursor = Some(list);
        while let Some(term) = cursor {
            let Some(cell) = term.list_cell() else { break };
            if let Some(element) = &cell.element {
                elements.push(element.clone());
            }
            cursor = cell.next.as_ref();
        }
        self.list_from_vec(elements)
    }
}

fn mint(live: &Rc<Cell<usize>>, kind: TermKind) -> Term {
    live.set(live.get() + 1);
    Term(Rc::new(TermNode {
        kind,
        ticket: AllocTicket(Rc::clone(live)),
    }))
}
