use resin::{HeapConfig, Interp, ScriptError, parse_str};

// ============================================================================
// Allocation discipline
// ============================================================================

#[test]
fn evaluation_leaves_no_terms_behind() {
    let interp = Interp::new();
    let ctx = interp.new_root_context().unwrap();

    let baseline = interp.live_terms();
    {
        let result = interp.eval_str(&ctx, "(list 1.0 2.0 3.0)").unwrap();
        assert!(interp.live_terms() > baseline);
        drop(result);
    }
    assert_eq!(interp.live_terms(), baseline);
}

#[test]
fn nested_evaluation_leaves_no_terms_behind() {
    let interp = Interp::new();
    let ctx = interp.new_root_context().unwrap();

    let baseline = interp.live_terms();
    {
        let result = interp
            .eval_str(&ctx, "(* (+ 1.0 1.0) (length (quote (1.0 2.0 3.0))))")
            .unwrap();
        assert_eq!(result.as_float(), Some(6.0));
    }
    assert_eq!(interp.live_terms(), baseline);
}

#[test]
fn scripted_function_calls_leave_no_terms_behind() {
    let interp = Interp::new();
    let ctx = interp.new_root_context().unwrap();
    // The definition itself stays bound, so take the baseline after it.
    interp.eval_str(&ctx, "(defun double (a) (+ a a))").unwrap();

    let baseline = interp.live_terms();
    {
        let result = interp.eval_str(&ctx, "(double (double 5.0))").unwrap();
        assert_eq!(result.as_float(), Some(20.0));
    }
    assert_eq!(interp.live_terms(), baseline);
}

#[test]
fn call_frames_drain_after_each_call() {
    let interp = Interp::new();
    let ctx = interp.new_root_context().unwrap();
    assert_eq!(interp.live_frames(), 1);

    interp.eval_str(&ctx, "(defun double (a) (+ a a))").unwrap();
    interp.eval_str(&ctx, "(double (double 2.0))").unwrap();
    interp
        .eval_str(&ctx, "(map double (quote (1.0 2.0 3.0)))")
        .unwrap();
    // Only the root frame survives evaluation.
    assert_eq!(interp.live_frames(), 1);
}

#[test]
fn retained_results_survive_their_source_tree() {
    let interp = Interp::new();
    let ctx = interp.new_root_context().unwrap();

    let retained = {
        let expr = parse_str(interp.heap(), "(list 1.0 2.0)").unwrap();
        let result = interp.eval(&expr, &ctx).unwrap();
        drop(expr);
        result
    };
    assert_eq!(retained.list_len(), 2);
    assert_eq!(retained.first().unwrap().as_float(), Some(1.0));
}

// ============================================================================
// Capacity
// ============================================================================

#[test]
fn term_heap_capacity_is_fatal_when_exceeded() {
    let interp = Interp::with_config(HeapConfig {
        max_terms: 16,
        context_capacity: 8,
    });
    // 20 floats plus their list cells cannot fit in 16 slots.
    let source = "(1.0 2.0 3.0 4.0 5.0 6.0 7.0 8.0 9.0 10.0 \
                  11.0 12.0 13.0 14.0 15.0 16.0 17.0 18.0 19.0 20.0)";
    assert!(matches!(
        parse_str(interp.heap(), source),
        Err(ScriptError::CapacityExceeded(_))
    ));
}
