use dbs_ir::{Name, StringInterner, TokenKind};
use pretty_assertions::assert_eq;

use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    let interner = StringInterner::new();
    match lex(source, &interner) {
        Ok(tokens) => tokens.iter().map(|t| t.kind.clone()).collect(),
        Err(err) => panic!("lex failed: {err}"),
    }
}

fn lex_err(source: &str) -> LexError {
    let interner = StringInterner::new();
    match lex(source, &interner) {
        Ok(tokens) => panic!("expected error, got {tokens:?}"),
        Err(err) => err,
    }
}

#[test]
fn keywords_are_case_insensitive() {
    assert_eq!(
        kinds("Class Foo OF form\nendclass"),
        vec![
            TokenKind::Class,
            TokenKind::Ident(StringInterner::new().intern("foo")),
            TokenKind::Of,
            TokenKind::Ident(Name::FORM),
            TokenKind::Newline,
            TokenKind::EndClass,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn method_aliases_and_dotted_logicals() {
    assert_eq!(
        kinds("procedure function METHOD parameters"),
        vec![
            TokenKind::Method,
            TokenKind::Method,
            TokenKind::Method,
            TokenKind::Parameter,
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds(".T. .and. .f. .OR. .not."),
        vec![
            TokenKind::True,
            TokenKind::And,
            TokenKind::False,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn dotted_logicals_win_over_member_access() {
    // Each `kinds` call interns into a fresh interner; mirror that.
    let interner = StringInterner::new();
    let ident = |text: &str| TokenKind::Ident(interner.intern(text));
    assert_eq!(
        kinds("obj.f.x a.and.b"),
        vec![
            ident("obj"),
            TokenKind::False,
            ident("x"),
            ident("a"),
            TokenKind::And,
            ident("b"),
            TokenKind::Eof,
        ]
    );
    let interner = StringInterner::new();
    let ident = |text: &str| TokenKind::Ident(interner.intern(text));
    assert_eq!(
        kinds("obj.t1 obj.name"),
        vec![
            ident("obj"),
            TokenKind::Dot,
            ident("t1"),
            ident("obj"),
            TokenKind::Dot,
            ident("name"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn identifiers_intern_upper_case() {
    let interner = StringInterner::new();
    let tokens = lex("pushButton1 THIS.text", &interner).unwrap_or_default();
    let TokenKind::Ident(name) = tokens.as_slice()[0].kind else {
        panic!("expected identifier");
    };
    assert_eq!(interner.lookup(name), "PUSHBUTTON1");
    assert_eq!(tokens.as_slice()[1].kind, TokenKind::This);
    assert_eq!(tokens.as_slice()[3].kind, TokenKind::Ident(Name::TEXT));
}

#[test]
fn numbers_and_strings() {
    assert_eq!(
        kinds(r#"12 1.5 "a\tb" 'it''s'"#),
        vec![
            TokenKind::Number(12.0),
            TokenKind::Number(1.5),
            TokenKind::Text("a\tb".to_string()),
            TokenKind::Text("it".to_string()),
            TokenKind::Text("s".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn bracket_string_in_operand_position() {
    assert_eq!(
        kinds(r#"? [say "hi"]"#),
        vec![
            TokenKind::Question,
            TokenKind::Text("say \"hi\"".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn bracket_string_doubles_closing_bracket() {
    assert_eq!(
        kinds("x = [a]]b]"),
        vec![
            TokenKind::Ident(StringInterner::new().intern("x")),
            TokenKind::Eq,
            TokenKind::Text("a]b".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn bracket_after_operand_is_rejected() {
    let err = lex_err("x[1]");
    assert_eq!(err.kind, LexErrorKind::InvalidCharacter('['));
    assert_eq!(err.span.start, 1);
}

#[test]
fn operators() {
    assert_eq!(
        kinds("+ - * / = == != <> < <= > >= ( ) , . :: ; ?"),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Eq,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Gt,
            TokenKind::GtEq,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::DoubleColon,
            TokenKind::Semicolon,
            TokenKind::Question,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("a // one\nb && two\nc ** three\nd /* x /* nested */ y */ e"),
        {
            let i = StringInterner::new();
            vec![
                TokenKind::Ident(i.intern("a")),
                TokenKind::Newline,
                TokenKind::Ident(i.intern("b")),
                TokenKind::Newline,
                TokenKind::Ident(i.intern("c")),
                TokenKind::Newline,
                TokenKind::Ident(i.intern("d")),
                TokenKind::Ident(i.intern("e")),
                TokenKind::Eof,
            ]
        }
    );
}

#[test]
fn trailing_semicolon_continues_line() {
    let i = StringInterner::new();
    assert_eq!(
        kinds("x = 1 + ;\n  2\ny = a ; b"),
        vec![
            TokenKind::Ident(i.intern("x")),
            TokenKind::Eq,
            TokenKind::Number(1.0),
            TokenKind::Plus,
            TokenKind::Number(2.0),
            TokenKind::Newline,
            TokenKind::Ident(i.intern("y")),
            TokenKind::Eq,
            TokenKind::Ident(i.intern("a")),
            TokenKind::Semicolon,
            TokenKind::Ident(i.intern("b")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unterminated_string() {
    let err = lex_err("? \"abc\n");
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.span.start, 2);
    assert_eq!(err.error_code(), dbs_diagnostic::ErrorCode::E1002);
}

#[test]
fn unterminated_block_comment() {
    let err = lex_err("a\n/* open /* inner */\nb");
    assert_eq!(err.kind, LexErrorKind::UnterminatedBlockComment);
    assert_eq!(err.span.start, 2);
    assert_eq!(err.to_diagnostic().code, dbs_diagnostic::ErrorCode::E1003);
}

#[test]
fn invalid_character() {
    let err = lex_err("x = 1 @ 2");
    assert_eq!(err.kind, LexErrorKind::InvalidCharacter('@'));
    assert_eq!(err.to_string(), "invalid character `@`");
}

#[test]
fn eof_span_points_past_end() {
    let interner = StringInterner::new();
    let tokens = lex("ab", &interner).unwrap_or_default();
    assert_eq!(tokens.last().map(|t| t.span), Some(Span::point(2)));
}
