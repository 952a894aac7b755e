//! Class declarations.

use dbs_ir::ast::{ClassDecl, MethodDecl, StmtId, StmtKind};
use dbs_ir::TokenKind;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `CLASS name [OF parent] NL { member } ENDCLASS`
    pub(crate) fn parse_class(&mut self) -> Result<StmtId, ParseError> {
        let start = self.advance().span;
        let name = self.expect_ident()?;
        let parent = if self.eat(&TokenKind::Of) {
            Some(self.expect_ident()?)
        } else {
            None
        };
        self.end_statement()?;

        let mut members = Vec::new();
        loop {
            self.skip_newlines();
            match self.current_kind() {
                TokenKind::EndClass => break,
                TokenKind::Eof => {
                    return Err(ParseError::unclosed_block(
                        self.current_span(),
                        "CLASS",
                        "ENDCLASS",
                        start,
                    ));
                }
                TokenKind::Method => members.push(self.parse_method()?),
                TokenKind::Property => members.push(self.parse_property()?),
                _ => self.parse_statement(&mut members)?,
            }
        }
        self.advance();
        let span = start.merge(self.previous_span());
        let id = self.tree.alloc_stmt(
            StmtKind::ClassDecl(ClassDecl {
                name,
                parent,
                members,
            }),
            span,
        );
        self.end_statement()?;
        Ok(id)
    }

    /// `METHOD name [(p, ...)] NL block ENDMETHOD`
    fn parse_method(&mut self) -> Result<StmtId, ParseError> {
        let start = self.advance().span;
        let name = self.expect_ident()?;
        let mut params = Vec::new();
        if self.eat(&TokenKind::LParen) && !self.eat(&TokenKind::RParen) {
            params.push(self.expect_ident()?);
            while self.eat(&TokenKind::Comma) {
                params.push(self.expect_ident()?);
            }
            self.expect(&TokenKind::RParen)?;
        }
        self.end_statement()?;
        let body = self.parse_block(&[TokenKind::EndMethod], "METHOD", start)?;
        self.advance();
        let span = start.merge(self.previous_span());
        let id = self
            .tree
            .alloc_stmt(StmtKind::MethodDecl(MethodDecl { name, params, body }), span);
        self.end_statement()?;
        Ok(id)
    }

    /// `PROPERTY name [= expr]`
    fn parse_property(&mut self) -> Result<StmtId, ParseError> {
        let start = self.advance().span;
        let name = self.expect_ident()?;
        let default = if self.eat(&TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let span = start.merge(self.previous_span());
        let id = self
            .tree
            .alloc_stmt(StmtKind::PropertyDecl { name, default }, span);
        self.end_statement()?;
        Ok(id)
    }
}
