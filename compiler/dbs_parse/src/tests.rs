#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use dbs_diagnostic::ErrorCode;
use dbs_ir::ast::{ExprKind, StmtKind};
use dbs_ir::StringInterner;
use pretty_assertions::assert_eq;

use super::*;

fn dump(source: &str) -> String {
    let interner = StringInterner::new();
    let tokens = dbs_lexer::lex(source, &interner).unwrap_or_else(|e| panic!("lex: {e}"));
    match parse(&tokens, &interner) {
        Ok(tree) => tree.dump(&interner),
        Err(err) => panic!("parse: {err}"),
    }
}

fn parse_err(source: &str) -> ParseError {
    let interner = StringInterner::new();
    let tokens = dbs_lexer::lex(source, &interner).unwrap_or_else(|e| panic!("lex: {e}"));
    match parse(&tokens, &interner) {
        Ok(tree) => panic!("expected error, got:\n{}", tree.dump(&interner)),
        Err(err) => err,
    }
}

#[test]
fn write_and_assignment() {
    assert_eq!(
        dump("x = 1 + 2 * 3\n? x, \"done\"\nWRITE"),
        "Assign X = (1 + (2 * 3))\nWrite X, \"done\"\nWrite \n"
    );
}

#[test]
fn blank_lines_are_ignored() {
    assert_eq!(dump("\n\n? 1\n\n\n? 2\n\n"), "Write 1\nWrite 2\n");
}

#[test]
fn precedence_of_logical_operators() {
    assert_eq!(
        dump("? NOT a = 1 AND b OR c"),
        "Write (((NOT (A == 1)) AND B) OR C)\n"
    );
}

#[test]
fn comparison_in_condition_is_equality() {
    assert_eq!(
        dump("IF x = 1\n  ? \"one\"\nELSE\n  ? \"other\"\nENDIF"),
        "If (X == 1)\n  Write \"one\"\nElse\n  Write \"other\"\n"
    );
}

#[test]
fn for_loop_with_step_and_next() {
    assert_eq!(
        dump("FOR i = 10 TO 1 STEP -2\n  ? i\nNEXT i"),
        "For I = 10 To 1 Step (-2)\n  Write I\n"
    );
    assert_eq!(dump("for i = 1 to 3\nendfor"), "For I = 1 To 3\n");
}

#[test]
fn do_while_and_break() {
    assert_eq!(
        dump("DO WHILE .T.\n  BREAK\nENDDO"),
        "DoWhile .T.\n  Break\n"
    );
}

#[test]
fn local_declarations_split() {
    assert_eq!(dump("LOCAL a, b = 2"), "Local A\nLocal B = 2\n");
}

#[test]
fn class_with_members() {
    let src = "\
CLASS Greeter OF Base
  PROPERTY greeting = \"hi\"
  PROPERTY target
  this.count = 0
  METHOD Greet(who, times)
    RETURN this.greeting + who
  ENDMETHOD
  PROCEDURE Reset
    SUPER::Reset()
  ENDMETHOD
ENDCLASS
";
    assert_eq!(
        dump(src),
        "\
Class GREETER Of BASE
  Property GREETING = \"hi\"
  Property TARGET
  Assign THIS.COUNT = 0
  Method GREET(WHO, TIMES)
    Return (THIS.GREETING + WHO)
  Method RESET()
    Expr SUPER.RESET()
"
    );
}

#[test]
fn with_block_assignments() {
    let src = "\
WITH (form)
  text = \"Hello\"
  font.bold = .T.
  this.x = 1
  show()
ENDWITH
";
    assert_eq!(
        dump(src),
        "\
With FORM
  WithAssign .TEXT = \"Hello\"
  WithAssign .FONT.BOLD = .T.
  Assign THIS.X = 1
  Expr SHOW()
"
    );
}

#[test]
fn assignment_outside_with_is_plain() {
    assert_eq!(dump("a.b = 1"), "Assign A.B = 1\n");
}

#[test]
fn handler_list_on_rhs() {
    assert_eq!(
        dump("b.OnClick = this.first ; this.second"),
        "Assign B.ONCLICK = [THIS.FIRST; THIS.SECOND]\n"
    );
}

#[test]
fn new_call_delete_create() {
    assert_eq!(
        dump("f = NEW Form()\nCALL f.Open()\nDELETE f\nCREATE FILE \"a.prg\"\nCREATE FILE"),
        "\
Assign F = NEW FORM()
Call F.OPEN()
Delete F
CreateFile \"a.prg\"
CreateFile
"
    );
}

#[test]
fn keyword_member_names() {
    assert_eq!(dump("? list.Next, x.File"), "Write LIST.NEXT, X.FILE\n");
}

#[test]
fn parameters_statement() {
    assert_eq!(dump("PARAMETERS a, b"), "Parameter A, B\n");
}

#[test]
fn expression_statement_starting_with_literal() {
    assert_eq!(dump("-1 + x"), "Expr ((-1) + X)\n");
}

#[test]
fn tree_shape_for_assignment() {
    let interner = StringInterner::new();
    let tokens = dbs_lexer::lex("x.y = 5", &interner).unwrap();
    let tree = parse(&tokens, &interner).unwrap();
    let StmtKind::Assign { target, .. } = &tree.stmt(tree.items()[0]).kind else {
        panic!("expected assignment");
    };
    assert!(matches!(tree.expr(*target).kind, ExprKind::Postfix { .. }));
    assert_eq!(tree.stmt(tree.items()[0]).span, Span::new(0, 7));
}

#[test]
fn unclosed_if() {
    let err = parse_err("IF x\n? 1\n");
    assert_eq!(err.code, ErrorCode::E1012);
    assert_eq!(err.message, "IF block is missing its ENDIF");
    assert_eq!(err.opened_at, Some(Span::new(0, 2)));
}

#[test]
fn unclosed_class() {
    let err = parse_err("CLASS A\nMETHOD m\nENDMETHOD\n");
    assert_eq!(err.code, ErrorCode::E1012);
    assert_eq!(err.message, "CLASS block is missing its ENDCLASS");
}

#[test]
fn stray_closer() {
    let err = parse_err("? 1\nENDIF");
    assert_eq!(err.code, ErrorCode::E1010);
    assert_eq!(err.message, "expected a statement, found ENDIF");
}

#[test]
fn method_outside_class() {
    let err = parse_err("METHOD m\nENDMETHOD");
    assert_eq!(err.message, "expected a statement, found METHOD");
}

#[test]
fn trailing_tokens_after_statement() {
    let err = parse_err("BREAK 1");
    assert_eq!(err.message, "expected end of line, found number");
}

#[test]
fn missing_operand() {
    let err = parse_err("x = 1 +");
    assert_eq!(err.code, ErrorCode::E1011);
    assert_eq!(err.message, "expected an expression, found end of file");
}

#[test]
fn diagnostic_labels_opener() {
    let err = parse_err("WITH (f)\n");
    let diag = err.to_diagnostic();
    assert_eq!(diag.labels.len(), 2);
    assert!(diag.labels[0].is_primary);
    assert!(!diag.labels[1].is_primary);
}
