//! The evaluator and its session state.
//!
//! Eval semantics:
//!
//! - an atom evaluates to its binding in the context chain;
//! - a literal value evaluates to a fresh copy of itself;
//! - a list evaluates its head into a callee, then applies it — intrinsics
//!   receive their argument forms unevaluated (that is how special forms
//!   control evaluation order), anything else gets its arguments evaluated
//!   eagerly, left to right.
//!
//! Execution is single-threaded and stack-recursive: `parse` and `eval`
//! both recurse on the native call stack, and nothing guards the depth. A
//! non-terminating scripted recursion exhausts the stack and aborts; that
//! is not a scripting-level error.

use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use log::debug;

use crate::environment::Context;
use crate::error::{Result, ScriptError};
use crate::heap::{HeapConfig, TermHeap};
use crate::language::{ListCell, Term, TermKind};
use crate::lexer::InputStream;
use crate::native;
use crate::parser;
use crate::stdlib;

/// One scripting session: the term heap, frame accounting, and the
/// evaluator entry points. All interpreter state lives here — nothing is
/// process-wide, so hosts can run isolated sessions side by side.
pub struct Interp {
    heap: TermHeap,
    frames: Rc<Cell<usize>>,
    config: HeapConfig,
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}

impl Interp {
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    pub fn with_config(config: HeapConfig) -> Self {
        Interp {
            heap: TermHeap::new(&config),
            frames: Rc::new(Cell::new(0)),
            config,
        }
    }

    pub fn heap(&self) -> &TermHeap {
        &self.heap
    }

    /// Terms currently alive in this session.
    pub fn live_terms(&self) -> usize {
        self.heap.live()
    }

    /// Context frames currently alive in this session.
    pub fn live_frames(&self) -> usize {
        self.frames.get()
    }

    /// Create the global context and install the intrinsic library plus
    /// the scripted part of the standard library.
    pub fn new_root_context(&self) -> Result<Context> {
        debug!("creating root context, installing intrinsics");
        let ctx = Context::root(&self.frames, self.config.context_capacity);
        stdlib::install(self, &ctx)?;
        Ok(ctx)
    }

    /// Evaluate one expression. The returned term is owned by the caller.
    pub fn eval(&self, expr: &Term, ctx: &Context) -> Result<Term> {
        match expr.kind() {
            TermKind::Atom(sym) => ctx
                .lookup(*sym)
                .ok_or_else(|| ScriptError::UnboundSymbol(sym.name())),
            TermKind::True | TermKind::False => Ok(expr.clone()),
            TermKind::List(cell) => {
                let head = cell
                    .element
                    .as_ref()
                    .ok_or_else(|| ScriptError::NotApplicable("()".to_string()))?;
                let callee = self.eval(head, ctx)?;
                if callee.is_intrinsic() {
                    self.apply(&callee, cell.next.clone(), ctx)
                } else {
                    let argv = native::eval_args(self, ctx, cell.next.as_ref())?;
                    let args = self.heap.chain_from_vec(argv)?;
                    self.apply(&callee, args, ctx)
                }
            }
            // Literals self-evaluate to an independent copy, never to a
            // shared reference to the source tree.
            _ => self.heap.copy(expr),
        }
    }

    /// Apply a callee to an argument list. For intrinsics the list holds
    /// whatever `eval` decided to pass (raw forms); for user lambdas it
    /// holds already-evaluated values.
    pub fn apply(&self, callee: &Term, args: Option<Term>, ctx: &Context) -> Result<Term> {
        match callee.kind() {
            TermKind::Intrinsic(f) => f(self, ctx, args.as_ref()),
            TermKind::List(cell) => self.apply_lambda(callee, cell, args, ctx),
            _ => Err(ScriptError::NotApplicable(callee.to_string())),
        }
    }

    // A lambda is a two-element list: the parameter-name list, then the
    // body expression. The body runs in a child frame of the *caller's*
    // context; the frame dies as soon as the body has evaluated.
    fn apply_lambda(
        &self,
        callee: &Term,
        cell: &ListCell,
        args: Option<Term>,
        ctx: &Context,
    ) -> Result<Term> {
        let params_term = match &cell.element {
            Some(t) if t.is_list() => t,
            _ => return Err(ScriptError::NotApplicable(callee.to_string())),
        };
        let body = cell
            .next
            .as_ref()
            .and_then(Term::first)
            .ok_or_else(|| ScriptError::NotApplicable(callee.to_string()))?;

        let mut params = Vec::new();
        for param in params_term.iter() {
            params.push(
                param
                    .as_atom()
                    .ok_or_else(|| native::type_mismatch("apply", "atom parameters", param))?,
            );
        }
        let argv: Vec<Term> = match &args {
            Some(list) => list.iter().cloned().collect(),
            None => Vec::new(),
        };
        if params.len() != argv.len() {
            return Err(ScriptError::ArityMismatch {
                expected: params.len(),
                found: argv.len(),
            });
        }

        let local = ctx.child();
        for (sym, value) in params.into_iter().zip(argv) {
            local.bind_sym(sym, value);
        }
        self.eval(body, &local)
    }

    /// Parse and evaluate a single expression from a string.
    pub fn eval_str(&self, ctx: &Context, source: &str) -> Result<Term> {
        let expr = parser::parse_str(&self.heap, source)?;
        self.eval(&expr, ctx)
    }

    /// Load a script file: parse it as an expression sequence, evaluate
    /// each form in order, return the last result.
    pub fn load_file(&self, ctx: &Context, path: impl AsRef<Path>) -> Result<Term> {
        let path = path.as_ref();
        debug!("loading script \"{}\"", path.display());
        let source = fs::read_to_string(path)?;
        let mut stream = InputStream::new(&source);
        let forms = parser::parse_sequence(&self.heap, &mut stream)?;
        self.eval_sequence(&forms, ctx)
    }

    /// Evaluate each form of a sequence, returning the last result.
    /// An empty sequence evaluates to `true`.
    pub fn eval_sequence(&self, forms: &Term, ctx: &Context) -> Result<Term> {
        let mut result = self.heap.truth(true);
        for form in forms.iter() {
            result = self.eval(form, ctx)?;
        }
        Ok(result)
    }
}
