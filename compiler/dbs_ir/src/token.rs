//! Token types produced by the lexer and consumed by the parser.

use std::fmt;

use crate::{Name, Span};

/// A token with its span in the preprocessed text.
#[derive(Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds.
///
/// Keywords are case-insensitive in source; `PROCEDURE` and `FUNCTION`
/// lex as [`TokenKind::Method`], `PARAMETERS` as [`TokenKind::Parameter`],
/// `.T.`/`.F.`/`.AND.`/`.OR.`/`.NOT.` as their word forms, and both `!=`
/// and `<>` as [`TokenKind::NotEq`].
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Number(f64),
    /// String literal with escapes resolved.
    Text(String),
    /// Identifier (interned upper case).
    Ident(Name),

    Class,
    Of,
    EndClass,
    Method,
    EndMethod,
    Property,
    If,
    Else,
    EndIf,
    For,
    To,
    Step,
    EndFor,
    Next,
    Do,
    While,
    EndDo,
    With,
    EndWith,
    Local,
    Parameter,
    Return,
    Break,
    Delete,
    Create,
    File,
    Call,
    Write,
    New,
    This,
    Super,
    And,
    Or,
    Not,
    True,
    False,
    Null,

    Plus,        // +
    Minus,       // -
    Star,        // *
    Slash,       // /
    Eq,          // =
    EqEq,        // ==
    NotEq,       // != <>
    Lt,          // <
    LtEq,        // <=
    Gt,          // >
    GtEq,        // >=
    LParen,      // (
    RParen,      // )
    Comma,       // ,
    Dot,         // .
    DoubleColon, // ::
    Semicolon,   // ;
    Question,    // ?

    Newline,
    Eof,
}

impl TokenKind {
    /// Human-readable name for "expected X, found Y" messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Number(_) => "number",
            TokenKind::Text(_) => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Class => "CLASS",
            TokenKind::Of => "OF",
            TokenKind::EndClass => "ENDCLASS",
            TokenKind::Method => "METHOD",
            TokenKind::EndMethod => "ENDMETHOD",
            TokenKind::Property => "PROPERTY",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::EndIf => "ENDIF",
            TokenKind::For => "FOR",
            TokenKind::To => "TO",
            TokenKind::Step => "STEP",
            TokenKind::EndFor => "ENDFOR",
            TokenKind::Next => "NEXT",
            TokenKind::Do => "DO",
            TokenKind::While => "WHILE",
            TokenKind::EndDo => "ENDDO",
            TokenKind::With => "WITH",
            TokenKind::EndWith => "ENDWITH",
            TokenKind::Local => "LOCAL",
            TokenKind::Parameter => "PARAMETER",
            TokenKind::Return => "RETURN",
            TokenKind::Break => "BREAK",
            TokenKind::Delete => "DELETE",
            TokenKind::Create => "CREATE",
            TokenKind::File => "FILE",
            TokenKind::Call => "CALL",
            TokenKind::Write => "WRITE",
            TokenKind::New => "NEW",
            TokenKind::This => "THIS",
            TokenKind::Super => "SUPER",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Null => "NULL",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Eq => "`=`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::DoubleColon => "`::`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Question => "`?`",
            TokenKind::Newline => "end of line",
            TokenKind::Eof => "end of file",
        }
    }

    /// True for tokens that can end an operand (a following `[` is then
    /// not a bracket string).
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Number(_)
                | TokenKind::Text(_)
                | TokenKind::Ident(_)
                | TokenKind::RParen
                | TokenKind::This
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }
}

/// Tokens for one preprocessed source, always ending in [`TokenKind::Eof`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
