//! Expression parsing.
//!
//! Precedence, loosest first: `OR`, `AND`, `NOT`, comparison (one, not
//! chained), `+ -`, `* /`, unary `-`, postfix (`.m`, `::m`, `(args)`),
//! primary.

use dbs_ir::ast::{AddOp, CompareOp, ExprId, ExprKind, Literal, MulOp, PostfixOp};
use dbs_ir::{Name, TokenKind};
use dbs_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_or())
    }

    fn parse_or(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let first = self.parse_and()?;
        if !self.check(&TokenKind::Or) {
            return Ok(first);
        }
        let mut operands = vec![first];
        while self.eat(&TokenKind::Or) {
            operands.push(self.parse_and()?);
        }
        let span = start.merge(self.previous_span());
        Ok(self.tree.alloc_expr(ExprKind::LogicalOr(operands), span))
    }

    fn parse_and(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let first = self.parse_not()?;
        if !self.check(&TokenKind::And) {
            return Ok(first);
        }
        let mut operands = vec![first];
        while self.eat(&TokenKind::And) {
            operands.push(self.parse_not()?);
        }
        let span = start.merge(self.previous_span());
        Ok(self.tree.alloc_expr(ExprKind::LogicalAnd(operands), span))
    }

    fn parse_not(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        if self.eat(&TokenKind::Not) {
            let operand = ensure_sufficient_stack(|| self.parse_not())?;
            let span = start.merge(self.previous_span());
            return Ok(self.tree.alloc_expr(ExprKind::LogicalNot(operand), span));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let left = self.parse_additive()?;
        let op = match self.current_kind() {
            TokenKind::Eq | TokenKind::EqEq => CompareOp::Eq,
            TokenKind::NotEq => CompareOp::NotEq,
            TokenKind::Lt => CompareOp::Lt,
            TokenKind::LtEq => CompareOp::LtEq,
            TokenKind::Gt => CompareOp::Gt,
            TokenKind::GtEq => CompareOp::GtEq,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_additive()?;
        let span = start.merge(self.previous_span());
        Ok(self
            .tree
            .alloc_expr(ExprKind::Comparison { left, op, right }, span))
    }

    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let first = self.parse_multiplicative()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => AddOp::Add,
                TokenKind::Minus => AddOp::Sub,
                _ => break,
            };
            self.advance();
            rest.push((op, self.parse_multiplicative()?));
        }
        if rest.is_empty() {
            return Ok(first);
        }
        let span = start.merge(self.previous_span());
        Ok(self.tree.alloc_expr(ExprKind::Additive { first, rest }, span))
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let first = self.parse_unary()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.current_kind() {
                TokenKind::Star => MulOp::Mul,
                TokenKind::Slash => MulOp::Div,
                _ => break,
            };
            self.advance();
            rest.push((op, self.parse_unary()?));
        }
        if rest.is_empty() {
            return Ok(first);
        }
        let span = start.merge(self.previous_span());
        Ok(self
            .tree
            .alloc_expr(ExprKind::Multiplicative { first, rest }, span))
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        if self.eat(&TokenKind::Minus) {
            let operand = ensure_sufficient_stack(|| self.parse_unary())?;
            let span = start.merge(self.previous_span());
            return Ok(self.tree.alloc_expr(ExprKind::Negate(operand), span));
        }
        self.parse_postfix()
    }

    /// `primary { .name | ::name | (args) }`
    pub(crate) fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        let base = self.parse_primary()?;
        let mut ops = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::Dot | TokenKind::DoubleColon => {
                    self.advance();
                    let span = self.current_span();
                    let name = self.expect_member_name()?;
                    ops.push(PostfixOp::Member { name, span });
                }
                TokenKind::LParen => {
                    let open = self.current_span();
                    let args = self.parse_call_args()?;
                    let span = open.merge(self.previous_span());
                    ops.push(PostfixOp::Call { args, span });
                }
                _ => break,
            }
        }
        if ops.is_empty() {
            return Ok(base);
        }
        let span = start.merge(self.previous_span());
        Ok(self.tree.alloc_expr(ExprKind::Postfix { base, ops }, span))
    }

    /// `'(' [expr {',' expr}] ')'`
    pub(crate) fn parse_call_args(&mut self) -> Result<Vec<ExprId>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(&TokenKind::RParen)?;
            return Ok(args);
        }
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let span = self.current_span();
        let kind = match self.current_kind() {
            TokenKind::Number(n) => ExprKind::Literal(Literal::Number(*n)),
            TokenKind::Text(text) => ExprKind::Literal(Literal::Text(text.clone())),
            TokenKind::True => ExprKind::Literal(Literal::Bool(true)),
            TokenKind::False => ExprKind::Literal(Literal::Bool(false)),
            TokenKind::Null => ExprKind::Literal(Literal::Null),
            TokenKind::Ident(name) => ExprKind::Ident(*name),
            TokenKind::This => ExprKind::This,
            TokenKind::Super => ExprKind::Super,
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                let span = span.merge(self.previous_span());
                return Ok(self.tree.alloc_expr(ExprKind::Paren(inner), span));
            }
            TokenKind::New => {
                self.advance();
                let class = self.expect_ident()?;
                let args = if self.check(&TokenKind::LParen) {
                    self.parse_call_args()?
                } else {
                    Vec::new()
                };
                let span = span.merge(self.previous_span());
                return Ok(self.tree.alloc_expr(ExprKind::New { class, args }, span));
            }
            other => return Err(ParseError::expected_expression(span, other)),
        };
        self.advance();
        Ok(self.tree.alloc_expr(kind, span))
    }

    /// Member names after `.`/`::` may be spelled like keywords
    /// (`form.Next`, `THIS.File`).
    fn expect_member_name(&mut self) -> Result<Name, ParseError> {
        let kind = self.current_kind();
        let name = match kind {
            TokenKind::Ident(name) => *name,
            TokenKind::Number(_)
            | TokenKind::Text(_)
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Eq
            | TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq
            | TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::Comma
            | TokenKind::Dot
            | TokenKind::DoubleColon
            | TokenKind::Semicolon
            | TokenKind::Question
            | TokenKind::Newline
            | TokenKind::Eof => {
                return Err(ParseError::unexpected_token(
                    self.current_span(),
                    "member name",
                    kind,
                ));
            }
            keyword => self.interner.intern(keyword.display_name()),
        };
        self.advance();
        Ok(name)
    }
}
