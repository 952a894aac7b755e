//! Lexer for dbscript using logos with identifier interning.
//!
//! Runs on preprocessed text. Keywords are case-insensitive; identifiers
//! are interned upper case. Newlines are tokens (statements end at a line
//! break) except after a trailing `;`, which continues the statement on
//! the next physical line.

mod escape;
mod lex_error;

use dbs_ir::{Span, StringInterner, Token, TokenKind, TokenList};
use logos::Logos;

pub use lex_error::{LexError, LexErrorKind};

#[derive(Copy, Clone, Debug, PartialEq)]
enum CommentEnd {
    Closed,
    Open,
}

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    #[regex(r"&&[^\n]*")]
    #[regex(r"\*\*[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment(CommentEnd),

    #[token("\n")]
    Newline,

    #[regex(r";[ \t\r]*\n")]
    LineContinuation,

    #[token("class", ignore(ascii_case))]
    Class,
    #[token("of", ignore(ascii_case))]
    Of,
    #[token("endclass", ignore(ascii_case))]
    EndClass,
    #[token("method", ignore(ascii_case))]
    #[token("procedure", ignore(ascii_case))]
    #[token("function", ignore(ascii_case))]
    Method,
    #[token("endmethod", ignore(ascii_case))]
    EndMethod,
    #[token("property", ignore(ascii_case))]
    Property,
    #[token("if", ignore(ascii_case))]
    If,
    #[token("else", ignore(ascii_case))]
    Else,
    #[token("endif", ignore(ascii_case))]
    EndIf,
    #[token("for", ignore(ascii_case))]
    For,
    #[token("to", ignore(ascii_case))]
    To,
    #[token("step", ignore(ascii_case))]
    Step,
    #[token("endfor", ignore(ascii_case))]
    EndFor,
    #[token("next", ignore(ascii_case))]
    Next,
    #[token("do", ignore(ascii_case))]
    Do,
    #[token("while", ignore(ascii_case))]
    While,
    #[token("enddo", ignore(ascii_case))]
    EndDo,
    #[token("with", ignore(ascii_case))]
    With,
    #[token("endwith", ignore(ascii_case))]
    EndWith,
    #[token("local", ignore(ascii_case))]
    Local,
    #[token("parameter", ignore(ascii_case))]
    #[token("parameters", ignore(ascii_case))]
    Parameter,
    #[token("return", ignore(ascii_case))]
    Return,
    #[token("break", ignore(ascii_case))]
    Break,
    #[token("delete", ignore(ascii_case))]
    Delete,
    #[token("create", ignore(ascii_case))]
    Create,
    #[token("file", ignore(ascii_case))]
    File,
    #[token("call", ignore(ascii_case))]
    Call,
    #[token("write", ignore(ascii_case))]
    Write,
    #[token("new", ignore(ascii_case))]
    New,
    #[token("this", ignore(ascii_case))]
    This,
    #[token("super", ignore(ascii_case))]
    Super,
    #[token("and", ignore(ascii_case))]
    #[token(".and.", ignore(ascii_case))]
    And,
    #[token("or", ignore(ascii_case))]
    #[token(".or.", ignore(ascii_case))]
    Or,
    #[token("not", ignore(ascii_case))]
    #[token(".not.", ignore(ascii_case))]
    Not,
    #[token("true", ignore(ascii_case))]
    #[token(".t.", ignore(ascii_case))]
    True,
    #[token("false", ignore(ascii_case))]
    #[token(".f.", ignore(ascii_case))]
    False,
    #[token("null", ignore(ascii_case))]
    Null,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    #[token("<>")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("::")]
    DoubleColon,
    #[token(";")]
    Semicolon,
    #[token("?")]
    Question,

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    QuotedString,

    #[regex(r#""([^"\\\n]|\\.)*"#)]
    #[regex(r#"'([^'\\\n]|\\.)*"#)]
    UnterminatedString,

    #[regex(r"\[([^\]\n]|\]\])*\]")]
    BracketString,

    #[regex(r"\[([^\]\n]|\]\])*")]
    UnterminatedBracket,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
}

/// Skip a possibly nested `/* ... */` comment after its opening `/*`.
fn block_comment(lex: &mut logos::Lexer<RawToken>) -> CommentEnd {
    let rest = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < rest.len() {
        if rest[i..].starts_with(b"/*") {
            depth += 1;
            i += 2;
        } else if rest[i..].starts_with(b"*/") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                lex.bump(i);
                return CommentEnd::Closed;
            }
        } else {
            i += 1;
        }
    }
    lex.bump(rest.len());
    CommentEnd::Open
}

/// Lex preprocessed source into a [`TokenList`] ending in `Eof`.
///
/// Stops at the first malformed token.
pub fn lex(source: &str, interner: &StringInterner) -> Result<TokenList, LexError> {
    let mut result = TokenList::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span());
        let slice = logos.slice();

        let Ok(raw) = token_result else {
            let found = slice.chars().next().unwrap_or('\0');
            return Err(LexError::invalid_character(span, found));
        };

        let kind = match raw {
            RawToken::LineComment
            | RawToken::LineContinuation
            | RawToken::BlockComment(CommentEnd::Closed) => continue,
            RawToken::BlockComment(CommentEnd::Open) => {
                return Err(LexError::unterminated_block_comment(span));
            }
            RawToken::UnterminatedString => return Err(LexError::unterminated_string(span)),
            RawToken::BracketString | RawToken::UnterminatedBracket => {
                if result.last().is_some_and(|t| t.kind.ends_operand()) {
                    return Err(LexError::invalid_character(Span::point(span.start), '['));
                }
                if raw == RawToken::UnterminatedBracket {
                    return Err(LexError::unterminated_string(span));
                }
                TokenKind::Text(escape::unbracket(&slice[1..slice.len() - 1]))
            }
            RawToken::QuotedString => TokenKind::Text(escape::unescape(&slice[1..slice.len() - 1])),
            RawToken::Ident => TokenKind::Ident(interner.intern(slice)),
            other => convert_simple(other),
        };
        result.push(Token::new(kind, span));
    }

    let eof_pos = u32::try_from(source.len()).unwrap_or(u32::MAX);
    result.push(Token::new(TokenKind::Eof, Span::point(eof_pos)));
    Ok(result)
}

/// Tokens that carry no text.
fn convert_simple(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::Newline => TokenKind::Newline,
        RawToken::Number(n) => TokenKind::Number(n),
        RawToken::Class => TokenKind::Class,
        RawToken::Of => TokenKind::Of,
        RawToken::EndClass => TokenKind::EndClass,
        RawToken::Method => TokenKind::Method,
        RawToken::EndMethod => TokenKind::EndMethod,
        RawToken::Property => TokenKind::Property,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::EndIf => TokenKind::EndIf,
        RawToken::For => TokenKind::For,
        RawToken::To => TokenKind::To,
        RawToken::Step => TokenKind::Step,
        RawToken::EndFor => TokenKind::EndFor,
        RawToken::Next => TokenKind::Next,
        RawToken::Do => TokenKind::Do,
        RawToken::While => TokenKind::While,
        RawToken::EndDo => TokenKind::EndDo,
        RawToken::With => TokenKind::With,
        RawToken::EndWith => TokenKind::EndWith,
        RawToken::Local => TokenKind::Local,
        RawToken::Parameter => TokenKind::Parameter,
        RawToken::Return => TokenKind::Return,
        RawToken::Break => TokenKind::Break,
        RawToken::Delete => TokenKind::Delete,
        RawToken::Create => TokenKind::Create,
        RawToken::File => TokenKind::File,
        RawToken::Call => TokenKind::Call,
        RawToken::Write => TokenKind::Write,
        RawToken::New => TokenKind::New,
        RawToken::This => TokenKind::This,
        RawToken::Super => TokenKind::Super,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Eq => TokenKind::Eq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::DoubleColon => TokenKind::DoubleColon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Question => TokenKind::Question,
        // Trivia and text-carrying tokens are handled in `lex`.
        RawToken::LineComment
        | RawToken::BlockComment(_)
        | RawToken::LineContinuation
        | RawToken::QuotedString
        | RawToken::UnterminatedString
        | RawToken::BracketString
        | RawToken::UnterminatedBracket
        | RawToken::Ident => TokenKind::Eof,
    }
}

#[cfg(test)]
mod tests;
