use criterion::{Criterion, black_box, criterion_group, criterion_main};

use resin::{Context, Interp, parse_str};

// ============================================================================
// Parsing Benchmarks
// ============================================================================

fn bench_parse_small(c: &mut Criterion) {
    let interp = Interp::new();
    c.bench_function("parse small expr", |b| {
        b.iter(|| black_box(parse_str(interp.heap(), "(+ 1.0 2.0)").unwrap()))
    });
}

fn bench_parse_emitter_script(c: &mut Criterion) {
    let interp = Interp::new();
    let source = "(foldl object_process (new (quote emitter)) \
                    (quote ((emitter_lifetime 2.0) \
                            (emitter_spawn_interval 0.03) \
                            (emitter_velocity (vector 0.0 0.1 0.0 0.0)) \
                            (emitter_size_curve (curve (quote ((0.0 0.6) (1.0 0.1))))))))";
    c.bench_function("parse emitter script", |b| {
        b.iter(|| black_box(parse_str(interp.heap(), source).unwrap()))
    });
}

fn bench_parse_large_list(c: &mut Criterion) {
    let interp = Interp::new();
    let mut elements = vec!["(list".to_string()];
    for i in 0..500 {
        elements.push(format!("{i}.0"));
    }
    elements.push(")".to_string());
    let source = elements.join(" ");

    c.bench_function("parse large list (500 elements)", |b| {
        b.iter(|| black_box(parse_str(interp.heap(), &source).unwrap()))
    });
}

// ============================================================================
// Evaluation Benchmarks
// ============================================================================

fn session() -> (Interp, Context) {
    let interp = Interp::new();
    let ctx = interp.new_root_context().unwrap();
    (interp, ctx)
}

fn bench_eval_arithmetic(c: &mut Criterion) {
    let (interp, ctx) = session();
    c.bench_function("eval nested arithmetic", |b| {
        b.iter(|| black_box(interp.eval_str(&ctx, "(* (+ 1.0 1.0) (- 5.0 2.0))").unwrap()))
    });
}

fn bench_eval_scripted_call(c: &mut Criterion) {
    let (interp, ctx) = session();
    interp.eval_str(&ctx, "(defun double (a) (+ a a))").unwrap();
    c.bench_function("eval scripted function call", |b| {
        b.iter(|| black_box(interp.eval_str(&ctx, "(double (double 5.0))").unwrap()))
    });
}

fn bench_eval_map(c: &mut Criterion) {
    let (interp, ctx) = session();
    interp.eval_str(&ctx, "(defun double (a) (+ a a))").unwrap();
    c.bench_function("eval map over 8 elements", |b| {
        b.iter(|| {
            black_box(
                interp
                    .eval_str(
                        &ctx,
                        "(map double (quote (1.0 2.0 3.0 4.0 5.0 6.0 7.0 8.0)))",
                    )
                    .unwrap(),
            )
        })
    });
}

fn bench_eval_emitter_construction(c: &mut Criterion) {
    let (interp, ctx) = session();
    let source = "(foldl object_process (new (quote emitter)) \
                    (quote ((emitter_lifetime 2.0) \
                            (emitter_spawn_interval 0.03) \
                            (emitter_velocity (vector 0.0 0.1 0.0 0.0)))))";
    c.bench_function("eval emitter construction", |b| {
        b.iter(|| black_box(interp.eval_str(&ctx, source).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_parse_small,
    bench_parse_emitter_script,
    bench_parse_large_list,
    bench_eval_arithmetic,
    bench_eval_scripted_call,
    bench_eval_map,
    bench_eval_emitter_construction
);
criterion_main!(benches);
