//! Token cursor for navigating the token stream.

use dbs_ir::{Name, Span, Token, TokenKind, TokenList};

use crate::ParseError;

static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    span: Span::DUMMY,
};

/// Cursor over a token list.
///
/// Never moves past the final `Eof` token, so grammar rules can always
/// look at `current()`.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Cursor {
            tokens: tokens.as_slice(),
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Roll back to a position returned by [`Cursor::position`].
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos <= self.tokens.len(), "cursor position {pos} out of bounds");
        self.pos = pos;
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        self.tokens.get(self.pos).unwrap_or(&EOF_TOKEN)
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    pub fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span,
            None => Span::DUMMY,
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// True at a newline or end of input.
    pub fn at_line_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Newline | TokenKind::Eof)
    }

    /// Consume the current token. Stays on `Eof` once reached.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        } else {
            self.pos = self.tokens.len().saturating_sub(1);
        }
        token
    }

    pub fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    pub fn expect(&mut self, kind: &TokenKind) -> Result<&'a Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected_token(
                self.current_span(),
                kind.display_name(),
                self.current_kind(),
            ))
        }
    }

    pub fn expect_ident(&mut self) -> Result<Name, ParseError> {
        if let TokenKind::Ident(name) = *self.current_kind() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::unexpected_token(
                self.current_span(),
                "identifier",
                self.current_kind(),
            ))
        }
    }
}
