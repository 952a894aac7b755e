//! Recursive descent parser for dbscript.
//!
//! Produces a flat [`SyntaxTree`] from a [`TokenList`]. Statements end at a
//! newline; blank lines are ignored. The first error stops parsing.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::ParseError;

use dbs_ir::ast::{StmtId, SyntaxTree};
use dbs_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList};

/// Parse a whole program.
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> Result<SyntaxTree, ParseError> {
    Parser::new(tokens, interner).parse_program()
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    interner: &'a StringInterner,
    tree: SyntaxTree,
    /// Number of enclosing `WITH` blocks.
    with_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            interner,
            tree: SyntaxTree::new(),
            with_depth: 0,
        }
    }

    #[inline]
    fn current_kind(&self) -> &'a TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn advance(&mut self) -> &'a Token {
        self.cursor.advance()
    }

    #[inline]
    fn skip_newlines(&mut self) {
        self.cursor.skip_newlines();
    }

    #[inline]
    fn expect(&mut self, kind: &TokenKind) -> Result<&'a Token, ParseError> {
        self.cursor.expect(kind)
    }

    #[inline]
    fn expect_ident(&mut self) -> Result<Name, ParseError> {
        self.cursor.expect_ident()
    }

    /// Consume `kind` if present.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Parse top-level items until end of input.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_program(mut self) -> Result<SyntaxTree, ParseError> {
        let mut items: Vec<StmtId> = Vec::new();
        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }
            if self.check(&TokenKind::Class) {
                items.push(self.parse_class()?);
            } else {
                self.parse_statement(&mut items)?;
            }
        }
        for item in items {
            self.tree.push_item(item);
        }
        tracing::debug!(
            statements = self.tree.stmt_count(),
            expressions = self.tree.expr_count(),
            "parse complete"
        );
        Ok(self.tree)
    }
}

#[cfg(test)]
mod tests;
