//! The intrinsic library.
//!
//! Native primitives, the special forms, the native object intrinsics, and
//! the scripted part of the standard library (`map`, `filter`, `foldl` and
//! the boolean helpers), which is bootstrapped by parsing fixed snippets of
//! the language at root-context creation and binding the resulting lambda
//! terms.
//!
//! Every intrinsic receives its argument forms unevaluated; those that are
//! not special forms immediately evaluate everything via
//! `native::eval_args`.

use std::io::{self, Write};

use crate::environment::Context;
use crate::error::{Result, ScriptError};
use crate::interpreter::Interp;
use crate::language::{IntrinsicFn, Term, TermKind, Vec4};
use crate::native::{
    eval_args, expect_atom, expect_exact, expect_float, expect_list, expect_object, expect_range,
    raw_forms, type_mismatch,
};
use crate::objects::{Curve, EmitterDef, MAX_CURVE_STRIDE, ObjectData, ObjectRef};
use crate::parser;

// ============================================================================
// Arithmetic and comparison
// ============================================================================

fn binary_floats(
    interp: &Interp,
    ctx: &Context,
    raw: Option<&Term>,
    name: &'static str,
) -> Result<(f32, f32)> {
    let args = eval_args(interp, ctx, raw)?;
    expect_exact(name, &args, 2)?;
    Ok((expect_float(name, &args[0])?, expect_float(name, &args[1])?))
}

fn add(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let (a, b) = binary_floats(interp, ctx, raw, "+")?;
    interp.heap().float(a + b)
}

fn sub(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let (a, b) = binary_floats(interp, ctx, raw, "-")?;
    interp.heap().float(a - b)
}

fn mul(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let (a, b) = binary_floats(interp, ctx, raw, "*")?;
    interp.heap().float(a * b)
}

fn div(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let (a, b) = binary_floats(interp, ctx, raw, "/")?;
    interp.heap().float(a / b)
}

fn greater_than(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let (a, b) = binary_floats(interp, ctx, raw, ">")?;
    Ok(interp.heap().truth(a > b))
}

// ============================================================================
// Special forms
// ============================================================================

// (quote form) — the form passes through untouched and unevaluated.
fn quote(_interp: &Interp, _ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    raw.and_then(Term::first)
        .cloned()
        .ok_or_else(|| ScriptError::Arity {
            intrinsic: "quote",
            expected: "exactly 1".to_string(),
            found: 0,
        })
}

// (if cond then else) — exactly one branch is evaluated.
fn if_form(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let forms = raw_forms(raw);
    expect_exact("if", &forms, 3)?;
    let cond = interp.eval(&forms[0], ctx)?;
    if cond.is_truthy() {
        interp.eval(&forms[1], ctx)
    } else {
        interp.eval(&forms[2], ctx)
    }
}

// (defun name (params) body) — binds name to the ((params) body) lambda
// term in the context the defun is evaluated in.
fn defun(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let forms = raw_forms(raw);
    expect_exact("defun", &forms, 3)?;
    let name = expect_atom("defun", &forms[0])?;
    expect_list("defun", &forms[1])?;
    let definition = raw
        .and_then(Term::list_cell)
        .and_then(|cell| cell.next.clone())
        .ok_or_else(|| ScriptError::Arity {
            intrinsic: "defun",
            expected: "exactly 3".to_string(),
            found: forms.len(),
        })?;
    ctx.bind_sym(name, definition);
    Ok(interp.heap().truth(true))
}

// ============================================================================
// List primitives
// ============================================================================

fn head(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let args = eval_args(interp, ctx, raw)?;
    expect_exact("head", &args, 1)?;
    let list = expect_list("head", &args[0])?;
    let element = list
        .first()
        .ok_or_else(|| type_mismatch("head", "a non-empty list", list))?;
    // An independent copy: the caller may hold or drop it freely.
    interp.heap().copy(element)
}

fn tail(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let args = eval_args(interp, ctx, raw)?;
    expect_exact("tail", &args, 1)?;
    let list = expect_list("tail", &args[0])?;
    match list.list_cell().and_then(|cell| cell.next.as_ref()) {
        Some(rest) => interp.heap().copy_spine(rest),
        // The end-of-list convention the scripted library relies on.
        None => Ok(interp.heap().truth(false)),
    }
}

fn length(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let args = eval_args(interp, ctx, raw)?;
    expect_exact("length", &args, 1)?;
    let list = expect_list("length", &args[0])?;
    interp.heap().float(list.list_len() as f32)
}

fn list(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let args = eval_args(interp, ctx, raw)?;
    interp.heap().list_from_vec(args)
}

fn cons(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let args = eval_args(interp, ctx, raw)?;
    expect_exact("cons", &args, 2)?;
    let next = match args[1].kind() {
        // `false` and `()` both mean "no tail".
        TermKind::False => None,
        TermKind::List(cell) if cell.element.is_none() => None,
        TermKind::List(_) => Some(args[1].clone()),
        _ => return Err(type_mismatch("cons", "a list or false tail", &args[1])),
    };
    interp.heap().cons(Some(args[0].clone()), next)
}

// ============================================================================
// Vectors and colors
// ============================================================================

fn vector_from_args(
    interp: &Interp,
    ctx: &Context,
    raw: Option<&Term>,
    name: &'static str,
) -> Result<Term> {
    let args = eval_args(interp, ctx, raw)?;
    expect_range(name, &args, 1, 4)?;
    let mut components = Vec::with_capacity(4);
    for arg in &args {
        components.push(expect_float(name, arg)?);
    }
    interp.heap().vector(Vec4::from_slice(&components))
}

fn vector(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    vector_from_args(interp, ctx, raw, "vector")
}

// Colors are RGBA vectors; missing channels stay zero.
fn color(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    vector_from_args(interp, ctx, raw, "color")
}

// ============================================================================
// Native objects
// ============================================================================

// (new (quote type_name)) — a zeroed object of a registered native type.
fn new_object(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let args = eval_args(interp, ctx, raw)?;
    expect_exact("new", &args, 1)?;
    let type_name = expect_atom("new", &args[0])?;
    let data = type_name
        .with_str(ObjectData::create)
        .ok_or_else(|| ScriptError::TypeMismatch {
            intrinsic: "new",
            expected: "a registered object type",
            found: type_name.name(),
        })?;
    interp.heap().object(ObjectRef::new(data))
}

// (object_process object (setter args...)) — re-invokes the named setter
// with the object appended, and hands the object back so a fold can thread
// it through a whole list of setter forms.
fn object_process(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let args = eval_args(interp, ctx, raw)?;
    expect_exact("object_process", &args, 2)?;
    expect_object("object_process", &args[0])?;
    let setter_form = expect_list("object_process", &args[1])?;

    let mut call: Vec<Term> = setter_form.iter().cloned().collect();
    call.push(args[0].clone());
    let call = interp.heap().list_from_vec(call)?;
    interp.eval(&call, ctx)?;
    Ok(args[0].clone())
}

// (curve (quote ((time values...) ...))) — a keyframed track. The first
// key row fixes the stride; every row must match it.
fn curve(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let args = eval_args(interp, ctx, raw)?;
    expect_exact("curve", &args, 1)?;
    let rows = expect_list("curve", &args[0])?;

    let mut track: Option<Curve> = None;
    for row in rows.iter() {
        expect_list("curve", row)?;
        let mut floats = Vec::with_capacity(MAX_CURVE_STRIDE);
        for value in row.iter() {
            floats.push(expect_float("curve", value)?);
        }
        if floats.len() < 2 || floats.len() > MAX_CURVE_STRIDE {
            return Err(ScriptError::TypeMismatch {
                intrinsic: "curve",
                expected: "key rows of 2 to 5 floats",
                found: format!("a row of {} floats", floats.len()),
            });
        }
        let track = track.get_or_insert_with(|| Curve::with_stride(floats.len()));
        if track.stride != floats.len() {
            return Err(ScriptError::TypeMismatch {
                intrinsic: "curve",
                expected: "key rows of matching stride",
                found: format!("strides {} and {}", track.stride, floats.len()),
            });
        }
        track.add_key(floats[0], &floats[1..]);
    }
    let track = track.ok_or_else(|| type_mismatch("curve", "at least one key row", rows))?;
    interp.heap().object(ObjectRef::new(ObjectData::Curve(track)))
}

// Setters take (value object) and hand the object back, mutated in place.

fn with_emitter<T>(
    name: &'static str,
    object: &Term,
    value: T,
    set: fn(&mut EmitterDef, T),
) -> Result<()> {
    let obj = expect_object(name, object)?;
    match &mut *obj.borrow_mut() {
        ObjectData::Emitter(def) => {
            set(def, value);
            Ok(())
        }
        other => Err(ScriptError::TypeMismatch {
            intrinsic: name,
            expected: "an emitter object",
            found: other.type_name().to_string(),
        }),
    }
}

fn emitter_float_setter(
    interp: &Interp,
    ctx: &Context,
    raw: Option<&Term>,
    name: &'static str,
    set: fn(&mut EmitterDef, f32),
) -> Result<Term> {
    let args = eval_args(interp, ctx, raw)?;
    expect_exact(name, &args, 2)?;
    let value = expect_float(name, &args[0])?;
    with_emitter(name, &args[1], value, set)?;
    Ok(args[1].clone())
}

fn emitter_vector_setter(
    interp: &Interp,
    ctx: &Context,
    raw: Option<&Term>,
    name: &'static str,
    set: fn(&mut EmitterDef, Vec4),
) -> Result<Term> {
    let args = eval_args(interp, ctx, raw)?;
    expect_exact(name, &args, 2)?;
    let value = args[0]
        .as_vector()
        .ok_or_else(|| type_mismatch(name, "a vector", &args[0]))?;
    with_emitter(name, &args[1], value, set)?;
    Ok(args[1].clone())
}

fn emitter_curve_setter(
    interp: &Interp,
    ctx: &Context,
    raw: Option<&Term>,
    name: &'static str,
    set: fn(&mut EmitterDef, Curve),
) -> Result<Term> {
    let args = eval_args(interp, ctx, raw)?;
    expect_exact(name, &args, 2)?;
    let obj = expect_object(name, &args[0])?;
    let track = match &*obj.borrow() {
        ObjectData::Curve(track) => track.clone(),
        other => {
            return Err(ScriptError::TypeMismatch {
                intrinsic: name,
                expected: "a curve object",
                found: other.type_name().to_string(),
            });
        }
    };
    with_emitter(name, &args[1], track, set)?;
    Ok(args[1].clone())
}

fn emitter_lifetime(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    emitter_float_setter(interp, ctx, raw, "emitter_lifetime", |def, v| {
        def.lifetime = v
    })
}

fn emitter_spawn_interval(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    emitter_float_setter(interp, ctx, raw, "emitter_spawn_interval", |def, v| {
        def.spawn_interval = v
    })
}

fn emitter_velocity(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    emitter_vector_setter(interp, ctx, raw, "emitter_velocity", |def, v| {
        def.velocity = v
    })
}

fn emitter_color(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    emitter_vector_setter(interp, ctx, raw, "emitter_color", |def, v| def.color = v)
}

fn emitter_size_curve(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    emitter_curve_setter(interp, ctx, raw, "emitter_size_curve", |def, track| {
        def.size_curve = Some(track)
    })
}

fn emitter_color_curve(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    emitter_curve_setter(interp, ctx, raw, "emitter_color_curve", |def, track| {
        def.color_curve = Some(track)
    })
}

// ============================================================================
// Output
// ============================================================================

fn print(interp: &Interp, ctx: &Context, raw: Option<&Term>) -> Result<Term> {
    let args = eval_args(interp, ctx, raw)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(handle, " ")?;
        }
        // Strings print bare, everything else in source syntax.
        match arg.as_str() {
            Some(s) => write!(handle, "{s}")?,
            None => write!(handle, "{arg}")?,
        }
    }
    writeln!(handle)?;
    handle.flush()?;
    Ok(interp.heap().truth(true))
}

// ============================================================================
// Registration
// ============================================================================

fn define_intrinsic(interp: &Interp, ctx: &Context, name: &str, f: IntrinsicFn) -> Result<()> {
    ctx.bind(name, interp.heap().intrinsic(f)?);
    Ok(())
}

// Parse a lambda term from source and bind it — the scripted library
// bootstraps through the reader like any other script.
fn define_scripted(interp: &Interp, ctx: &Context, name: &str, source: &str) -> Result<()> {
    let func = parser::parse_str(interp.heap(), source)?;
    ctx.bind(name, func);
    Ok(())
}

/// Install every binding a root context starts with.
pub fn install(interp: &Interp, ctx: &Context) -> Result<()> {
    ctx.bind("true", interp.heap().truth(true));
    ctx.bind("false", interp.heap().truth(false));

    define_intrinsic(interp, ctx, "defun", defun)?;
    define_intrinsic(interp, ctx, "if", if_form)?;
    define_intrinsic(interp, ctx, "quote", quote)?;

    define_intrinsic(interp, ctx, "head", head)?;
    define_intrinsic(interp, ctx, "tail", tail)?;
    define_intrinsic(interp, ctx, "length", length)?;
    define_intrinsic(interp, ctx, "list", list)?;
    define_intrinsic(interp, ctx, "cons", cons)?;

    define_intrinsic(interp, ctx, "+", add)?;
    define_intrinsic(interp, ctx, "-", sub)?;
    define_intrinsic(interp, ctx, "*", mul)?;
    define_intrinsic(interp, ctx, "/", div)?;
    define_intrinsic(interp, ctx, ">", greater_than)?;

    define_intrinsic(interp, ctx, "vector", vector)?;
    define_intrinsic(interp, ctx, "color", color)?;

    define_intrinsic(interp, ctx, "new", new_object)?;
    define_intrinsic(interp, ctx, "object_process", object_process)?;
    define_intrinsic(interp, ctx, "curve", curve)?;
    define_intrinsic(interp, ctx, "emitter_lifetime", emitter_lifetime)?;
    define_intrinsic(interp, ctx, "emitter_spawn_interval", emitter_spawn_interval)?;
    define_intrinsic(interp, ctx, "emitter_velocity", emitter_velocity)?;
    define_intrinsic(interp, ctx, "emitter_color", emitter_color)?;
    define_intrinsic(interp, ctx, "emitter_size_curve", emitter_size_curve)?;
    define_intrinsic(interp, ctx, "emitter_color_curve", emitter_color_curve)?;

    define_intrinsic(interp, ctx, "print", print)?;

    define_scripted(
        interp,
        ctx,
        "map",
        "(( func list ) \
         (cons (func (head list)) (if (tail list) (map func (tail list)) false)))",
    )?;
    define_scripted(
        interp,
        ctx,
        "filter",
        "(( func list ) \
         (if (func (head list)) \
             (cons (head list) (if (tail list) (filter func (tail list)) false)) \
             (if (tail list) (filter func (tail list)) false)))",
    )?;
    define_scripted(
        interp,
        ctx,
        "foldl",
        "(( func item list ) \
         (if (tail list) \
             (foldl func (func item (head list)) (tail list)) \
             (func item (head list))))",
    )?;
    define_scripted(interp, ctx, "and", "(( a b ) (if a (if b true false) false))")?;
    define_scripted(interp, ctx, "or", "(( a b ) (if a true (if b true false)))")?;
    define_scripted(interp, ctx, "<=", "(( a b ) (if (> a b) false true))")?;

    Ok(())
}
