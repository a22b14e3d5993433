//! Plumbing shared by the native intrinsics: argument evaluation and
//! arity/kind expectation helpers.

use crate::environment::Context;
use crate::error::{Result, ScriptError};
use crate::interner::Symbol;
use crate::interpreter::Interp;
use crate::language::Term;
use crate::objects::ObjectRef;

/// Evaluate every form of a raw argument list, left to right.
pub fn eval_args(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Vec<Term>> {
    let mut out = Vec::new();
    if let Some(forms) = raw {
        for form in forms.iter() {
            out.push(interp.eval(form, ctx)?);
        }
    }
    Ok(out)
}

/// Collect a raw argument list without evaluating anything.
pub fn raw_forms(raw: Option<&Term>) -> Vec<Term> {
    match raw {
        Some(forms) => forms.iter().cloned().collect(),
        None => Vec::new(),
    }
}

pub fn expect_exact(name: &'static str, args: &[Term], count: usize) -> Result<()> {
    if args.len() != count {
        return Err(ScriptError::Arity {
            intrinsic: name,
            expected: format!("exactly {count}"),
            found: args.len(),
        });
    }
    Ok(())
}

pub fn expect_range(name: &'static str, args: &[Term], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        return Err(ScriptError::Arity {
            intrinsic: name,
            expected: format!("{min} to {max}"),
            found: args.len(),
        });
    }
    Ok(())
}

pub fn type_mismatch(name: &'static str, expected: &'static str, found: &Term) -> ScriptError {
    ScriptError::TypeMismatch {
        intrinsic: name,
        expected,
        found: found.kind_name().to_string(),
    }
}

pub fn expect_float(name: &'static str, term: &Term) -> Result<f32> {
    term.as_float()
        .ok_or_else(|| type_mismatch(name, "a float", term))
}

pub fn expect_atom(name: &'static str, term: &Term) -> Result<Symbol> {
    term.as_atom()
        .ok_or_else(|| type_mismatch(name, "an atom", term))
}

pub fn expect_list<'a>(name: &'static str, term: &'a Term) -> Result<&'a Term> {
    if term.is_list() {
        Ok(term)
    } else {
        Err(type_mismatch(name, "a list", term))
    }
}

pub fn expect_object<'a>(name: &'static str, term: &'a Term) -> Result<&'a ObjectRef> {
    term.as_object()
        .ok_or_else(|| type_mismatch(name, "an object", term))
}
