//! Statement parsing.

use dbs_ir::ast::{ExprId, ExprKind, PostfixOp, StmtId, StmtKind};
use dbs_ir::{Name, Span, TokenKind};
use dbs_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

/// Keywords that close a block; never the start of a statement.
fn is_block_closer(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Else
            | TokenKind::EndIf
            | TokenKind::EndFor
            | TokenKind::Next
            | TokenKind::EndDo
            | TokenKind::EndWith
            | TokenKind::EndMethod
            | TokenKind::EndClass
    )
}

impl Parser<'_> {
    /// Parse one statement (several for `LOCAL a, b`) and its line end.
    pub(crate) fn parse_statement(&mut self, out: &mut Vec<StmtId>) -> Result<(), ParseError> {
        ensure_sufficient_stack(|| self.parse_statement_inner(out))
    }

    fn parse_statement_inner(&mut self, out: &mut Vec<StmtId>) -> Result<(), ParseError> {
        let start = self.current_span();
        let kind = match self.current_kind() {
            TokenKind::Write | TokenKind::Question => {
                self.advance();
                let mut args = Vec::new();
                if !self.cursor.at_line_end() {
                    args.push(self.parse_expr()?);
                    while self.eat(&TokenKind::Comma) {
                        args.push(self.parse_expr()?);
                    }
                }
                StmtKind::Write(args)
            }
            TokenKind::Local => return self.parse_local(out),
            TokenKind::Parameter => {
                self.advance();
                let mut names = vec![self.expect_ident()?];
                while self.eat(&TokenKind::Comma) {
                    names.push(self.expect_ident()?);
                }
                StmtKind::Parameter(names)
            }
            TokenKind::If => return self.parse_if(out),
            TokenKind::For => return self.parse_for(out),
            TokenKind::Do => return self.parse_do_while(out),
            TokenKind::With => return self.parse_with(out),
            TokenKind::Return => {
                self.advance();
                if self.cursor.at_line_end() {
                    StmtKind::Return(None)
                } else {
                    StmtKind::Return(Some(self.parse_expr()?))
                }
            }
            TokenKind::Break => {
                self.advance();
                StmtKind::Break
            }
            TokenKind::Delete => {
                self.advance();
                StmtKind::Delete(self.expect_ident()?)
            }
            TokenKind::Create => {
                self.advance();
                self.expect(&TokenKind::File)?;
                if self.cursor.at_line_end() {
                    StmtKind::CreateFile(None)
                } else {
                    StmtKind::CreateFile(Some(self.parse_expr()?))
                }
            }
            TokenKind::Call => {
                self.advance();
                StmtKind::Call(self.parse_postfix()?)
            }
            kind if is_block_closer(kind)
                || matches!(
                    kind,
                    TokenKind::Class | TokenKind::Method | TokenKind::Property
                ) =>
            {
                return Err(ParseError::unexpected_token(start, "a statement", kind));
            }
            _ => self.parse_assign_or_expr()?,
        };
        let span = start.merge(self.previous_span());
        out.push(self.tree.alloc_stmt(kind, span));
        self.end_statement()
    }

    /// A statement must be followed by a line break or end of input.
    pub(crate) fn end_statement(&mut self) -> Result<(), ParseError> {
        match self.current_kind() {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            other => Err(ParseError::unexpected_token(
                self.current_span(),
                "end of line",
                other,
            )),
        }
    }

    /// `LOCAL a [= e] {, b [= e]}`
    fn parse_local(&mut self, out: &mut Vec<StmtId>) -> Result<(), ParseError> {
        self.advance();
        loop {
            let start = self.current_span();
            let name = self.expect_ident()?;
            let kind = if self.eat(&TokenKind::Eq) {
                let value = self.parse_expr()?;
                StmtKind::LocalAssign { name, value }
            } else {
                StmtKind::LocalDecl(name)
            };
            let span = start.merge(self.previous_span());
            out.push(self.tree.alloc_stmt(kind, span));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.end_statement()
    }

    /// Assignment when a postfix target is followed by `=`, otherwise an
    /// expression statement.
    fn parse_assign_or_expr(&mut self) -> Result<StmtKind, ParseError> {
        let checkpoint = self.cursor.position();
        if let Ok(target) = self.parse_postfix() {
            if self.eat(&TokenKind::Eq) {
                let value = self.parse_rhs()?;
                if self.with_depth > 0 {
                    if let Some(path) = self.with_relative_path(target) {
                        return Ok(StmtKind::WithAssign { path, value });
                    }
                }
                return Ok(StmtKind::Assign { target, value });
            }
        }
        self.cursor.set_position(checkpoint);
        Ok(StmtKind::Expr(self.parse_expr()?))
    }

    /// `expr {';' expr}`; two or more items make a handler list.
    fn parse_rhs(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let first = self.parse_expr()?;
        if !self.check(&TokenKind::Semicolon) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&TokenKind::Semicolon) {
            items.push(self.parse_expr()?);
        }
        let span = start.merge(self.previous_span());
        Ok(self.tree.alloc_expr(ExprKind::HandlerList(items), span))
    }

    /// `name{.name}` not starting at `THIS`, as a path relative to the
    /// `WITH` receiver.
    fn with_relative_path(&self, target: ExprId) -> Option<Vec<Name>> {
        match &self.tree.expr(target).kind {
            ExprKind::Ident(name) => Some(vec![*name]),
            ExprKind::Postfix { base, ops } => {
                let ExprKind::Ident(head) = self.tree.expr(*base).kind else {
                    return None;
                };
                let mut path = vec![head];
                for op in ops {
                    match op {
                        PostfixOp::Member { name, .. } => path.push(*name),
                        PostfixOp::Call { .. } => return None,
                    }
                }
                Some(path)
            }
            _ => None,
        }
    }

    /// Statements until one of `closers`, which is left unconsumed.
    pub(crate) fn parse_block(
        &mut self,
        closers: &[TokenKind],
        opener: &'static str,
        opened_at: Span,
    ) -> Result<Vec<StmtId>, ParseError> {
        let mut body = Vec::new();
        loop {
            self.skip_newlines();
            if closers.iter().any(|c| self.check(c)) {
                return Ok(body);
            }
            if self.is_at_end() {
                let closer = closers.first().map_or("end", TokenKind::display_name);
                return Err(ParseError::unclosed_block(
                    self.current_span(),
                    opener,
                    closer,
                    opened_at,
                ));
            }
            self.parse_statement(&mut body)?;
        }
    }

    /// `IF cond NL block [ELSE NL block] ENDIF`
    fn parse_if(&mut self, out: &mut Vec<StmtId>) -> Result<(), ParseError> {
        let start = self.advance().span;
        let cond = self.parse_expr()?;
        self.end_statement()?;
        let then_branch = self.parse_block(&[TokenKind::EndIf, TokenKind::Else], "IF", start)?;
        let else_branch = if self.eat(&TokenKind::Else) {
            self.end_statement()?;
            self.parse_block(&[TokenKind::EndIf], "IF", start)?
        } else {
            Vec::new()
        };
        self.expect(&TokenKind::EndIf)?;
        let span = start.merge(self.previous_span());
        out.push(self.tree.alloc_stmt(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        ));
        self.end_statement()
    }

    /// `FOR v = start TO end [STEP s] NL block (ENDFOR | NEXT [v])`
    fn parse_for(&mut self, out: &mut Vec<StmtId>) -> Result<(), ParseError> {
        let start_span = self.advance().span;
        let var = self.expect_ident()?;
        self.expect(&TokenKind::Eq)?;
        let start = self.parse_expr()?;
        self.expect(&TokenKind::To)?;
        let end = self.parse_expr()?;
        let step = if self.eat(&TokenKind::Step) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.end_statement()?;
        let body = self.parse_block(&[TokenKind::EndFor, TokenKind::Next], "FOR", start_span)?;
        if self.eat(&TokenKind::Next) {
            if self.cursor.check_ident() {
                self.advance();
            }
        } else {
            self.expect(&TokenKind::EndFor)?;
        }
        let span = start_span.merge(self.previous_span());
        out.push(self.tree.alloc_stmt(
            StmtKind::For {
                var,
                start,
                end,
                step,
                body,
            },
            span,
        ));
        self.end_statement()
    }

    /// `DO WHILE cond NL block ENDDO`
    fn parse_do_while(&mut self, out: &mut Vec<StmtId>) -> Result<(), ParseError> {
        let start = self.advance().span;
        self.expect(&TokenKind::While)?;
        let cond = self.parse_expr()?;
        self.end_statement()?;
        let body = self.parse_block(&[TokenKind::EndDo], "DO WHILE", start)?;
        self.expect(&TokenKind::EndDo)?;
        let span = start.merge(self.previous_span());
        out.push(self.tree.alloc_stmt(StmtKind::DoWhile { cond, body }, span));
        self.end_statement()
    }

    /// `WITH (target) NL block ENDWITH`
    fn parse_with(&mut self, out: &mut Vec<StmtId>) -> Result<(), ParseError> {
        let start = self.advance().span;
        self.expect(&TokenKind::LParen)?;
        let target = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        self.end_statement()?;
        self.with_depth += 1;
        let body = self.parse_block(&[TokenKind::EndWith], "WITH", start);
        self.with_depth -= 1;
        let body = body?;
        self.expect(&TokenKind::EndWith)?;
        let span = start.merge(self.previous_span());
        out.push(self.tree.alloc_stmt(StmtKind::With { target, body }, span));
        self.end_statement()
    }
}
