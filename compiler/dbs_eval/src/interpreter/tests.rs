#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use dbs_diagnostic::ErrorCode;
use dbs_ir::StringInterner;
use pretty_assertions::assert_eq;

use super::*;
use crate::print_handler::buffer_handler;

/// Run `source` and return the captured output with the run result.
fn run(source: &str) -> (String, Result<(), RunError>) {
    run_with_limit(source, DEFAULT_MAX_LOOP_ITERATIONS)
}

fn run_with_limit(source: &str, limit: usize) -> (String, Result<(), RunError>) {
    let interner = StringInterner::new();
    let tokens = dbs_lexer::lex(source, &interner).unwrap();
    let tree = dbs_parse::parse(&tokens, &interner).unwrap();
    let output = buffer_handler();
    let result = InterpreterBuilder::new(&tree, &interner)
        .print_handler(output.clone())
        .max_loop_iterations(limit)
        .build()
        .run();
    (output.get_output(), result)
}

fn output(source: &str) -> String {
    let (out, result) = run(source);
    if let Err(err) = result {
        panic!("run failed: {err}\noutput so far:\n{out}");
    }
    out
}

fn error_code(source: &str) -> ErrorCode {
    match run(source).1 {
        Ok(()) => panic!("expected an error"),
        Err(err) => err.error_code(),
    }
}

#[test]
fn write_concatenates_display_forms() {
    assert_eq!(output("? \"n=\", 1 + 2, \" \", .T., NULL"), "n=3 .T.\n");
    assert_eq!(output("? 7 / 2"), "3.5\n");
    assert_eq!(output("? \"a\" + 1"), "a1\n");
    assert_eq!(output("WRITE"), "\n");
}

#[test]
fn logical_operators_return_operands() {
    assert_eq!(output("? 0 OR \"x\""), "x\n");
    assert_eq!(output("? 1 AND 0"), "0\n");
    assert_eq!(output("? \"\" OR NULL"), "\n");
    assert_eq!(output("? NOT 0"), ".T.\n");
}

#[test]
fn short_circuit_skips_the_right_operand() {
    // `missing` would fail with an undefined name if evaluated.
    assert_eq!(output("? .F. AND missing"), ".F.\n");
    assert_eq!(output("? 1 OR missing"), "1\n");
}

#[test]
fn comparisons() {
    assert_eq!(output("? 1 < 2, 2 <= 2, \"b\" > \"a\", 1 = 1, 1 <> 1"), ".T..T..T..T..F.\n");
    assert_eq!(error_code("? 1 < \"a\""), ErrorCode::E3010);
}

#[test]
fn arithmetic_errors() {
    assert_eq!(error_code("? 1 / 0"), ErrorCode::E3011);
    assert_eq!(error_code("? \"a\" - 1"), ErrorCode::E3010);
    assert_eq!(error_code("? -\"a\""), ErrorCode::E3010);
}

#[test]
fn if_else_uses_truthiness() {
    let src = "\
IF \"\"
  ? \"yes\"
ELSE
  ? \"no\"
ENDIF
IF 5
  ? \"five\"
ENDIF
";
    assert_eq!(output(src), "no\nfive\n");
}

#[test]
fn for_loop_counts_inclusively() {
    assert_eq!(output("FOR i = 1 TO 3\n  ? i\nENDFOR"), "1\n2\n3\n");
    assert_eq!(output("FOR i = 3 TO 1\n  ? i\nNEXT"), "3\n2\n1\n");
    assert_eq!(output("FOR i = 1 TO 6 STEP 2\n  ? i\nENDFOR"), "1\n3\n5\n");
    assert_eq!(output("FOR i = 1 TO 3 STEP -1\n  ? i\nENDFOR\n? \"done\""), "done\n");
}

#[test]
fn for_loop_variable_keeps_last_value() {
    assert_eq!(output("FOR i = 1 TO 3\nENDFOR\n? i"), "3\n");
}

#[test]
fn for_loop_counter_ignores_body_writes() {
    assert_eq!(output("FOR i = 1 TO 3\n  ? i\n  i = 10\nENDFOR"), "1\n2\n3\n");
}

#[test]
fn zero_step_is_an_error() {
    assert_eq!(error_code("FOR i = 1 TO 3 STEP 0\nENDFOR"), ErrorCode::E3013);
}

#[test]
fn for_bounds_must_be_numbers() {
    assert_eq!(error_code("FOR i = \"a\" TO 3\nENDFOR"), ErrorCode::E3010);
}

#[test]
fn break_ends_only_the_inner_loop() {
    let src = "\
FOR i = 1 TO 2
  FOR j = 1 TO 5
    IF j = 2
      BREAK
    ENDIF
    ? i, j
  ENDFOR
ENDFOR
";
    assert_eq!(output(src), "11\n21\n");
}

#[test]
fn do_while_runs_while_truthy() {
    let src = "\
n = 0
DO WHILE n < 3
  n = n + 1
ENDDO
? n
";
    assert_eq!(output(src), "3\n");
}

#[test]
fn do_while_hits_the_iteration_cap() {
    let (out, result) = run_with_limit("? \"start\"\nDO WHILE .T.\nENDDO\n? \"never\"", 10);
    assert_eq!(out, "start\n");
    let err = result.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::E3014);
    assert_eq!(err.to_string(), "DO WHILE ran more than 10 iterations");
}

#[test]
fn break_outside_a_loop_stops_the_program() {
    let (out, result) = run("? 1\nBREAK\n? 2");
    assert_eq!(out, "1\n");
    assert_eq!(result.unwrap_err().error_code(), ErrorCode::E3007);
}

#[test]
fn return_outside_a_method_is_an_error() {
    assert_eq!(error_code("RETURN 1"), ErrorCode::E3008);
}

#[test]
fn local_binds_in_the_innermost_frame() {
    assert_eq!(output("LOCAL a, b = 2\n? a, b"), "2\n");
}

#[test]
fn parameter_at_top_level_binds_null() {
    assert_eq!(output("PARAMETER a\n? a = NULL"), ".T.\n");
}

#[test]
fn undefined_names() {
    assert_eq!(error_code("? nothing"), ErrorCode::E3001);
    assert_eq!(error_code("? THIS"), ErrorCode::E3001);
    assert_eq!(error_code("DELETE nothing"), ErrorCode::E3001);
    assert_eq!(error_code("nothing()"), ErrorCode::E3001);
}

#[test]
fn invalid_assignment_targets() {
    assert_eq!(error_code("1 = 2"), ErrorCode::E3006);
    assert_eq!(error_code("x = 1\nx.y = 2"), ErrorCode::E3010);
}

#[test]
fn calling_a_number_is_not_callable() {
    assert_eq!(error_code("x = 1\nx()"), ErrorCode::E3012);
}

#[test]
fn bare_super_is_rejected() {
    assert_eq!(error_code("? SUPER::Init()"), ErrorCode::E3005);
}

#[test]
fn errors_carry_the_failing_span() {
    let (_, result) = run("x = 1\n? x / 0");
    let err = result.unwrap_err();
    let RunError::Runtime(err) = err else {
        panic!("expected a runtime error");
    };
    // `x / 0` starts at byte 8.
    assert_eq!(err.span.start, 8);
}

#[test]
fn globals_are_visible_to_the_host() {
    let interner = StringInterner::new();
    let tokens = dbs_lexer::lex("total = 4 * 10", &interner).unwrap();
    let tree = dbs_parse::parse(&tokens, &interner).unwrap();
    let mut interp = Interpreter::new(&tree, &interner);
    interp.run().unwrap();
    assert!(matches!(interp.global("total"), Some(Value::Number(n)) if (n - 40.0).abs() < f64::EPSILON));
    assert!(interp.global("missing").is_none());
    assert_eq!(interp.config().max_loop_iterations, DEFAULT_MAX_LOOP_ITERATIONS);
}
