//! Expression evaluation, member chains and assignment targets.

use std::rc::Rc;

use dbs_ir::ast::{ExprId, ExprKind, Literal, PostfixOp};
use dbs_ir::{Name, Span};
use dbs_stack::ensure_sufficient_stack;

use super::Interpreter;
use crate::errors::{
    invalid_lvalue, invalid_super_call, member_not_found, type_mismatch, undefined_name,
    EvalResult,
};
use crate::operators::{
    evaluate_additive, evaluate_comparison, evaluate_multiplicative, evaluate_negate,
};
use crate::value::{Delegate, InstanceRef};
use crate::Value;

impl Interpreter<'_> {
    pub(crate) fn eval_expr(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(id))
    }

    fn eval_expr_inner(&mut self, id: ExprId) -> EvalResult {
        let tree = self.tree;
        let expr = tree.expr(id);
        let span = expr.span;
        match &expr.kind {
            ExprKind::LogicalOr(operands) => {
                let mut last = Value::Null;
                for &operand in operands {
                    last = self.eval_expr(operand)?;
                    if last.is_truthy() {
                        break;
                    }
                }
                Ok(last)
            }
            ExprKind::LogicalAnd(operands) => {
                let mut last = Value::Null;
                for &operand in operands {
                    last = self.eval_expr(operand)?;
                    if !last.is_truthy() {
                        break;
                    }
                }
                Ok(last)
            }
            ExprKind::LogicalNot(operand) => Ok(Value::Bool(!self.eval_expr(*operand)?.is_truthy())),
            ExprKind::Comparison { left, op, right } => {
                let left = self.eval_expr(*left)?;
                let right = self.eval_expr(*right)?;
                evaluate_comparison(*op, &left, &right, span)
            }
            ExprKind::Additive { first, rest } => {
                let mut acc = self.eval_expr(*first)?;
                for &(op, operand) in rest {
                    let right = self.eval_expr(operand)?;
                    acc = evaluate_additive(op, &acc, &right, span, self.interner)?;
                }
                Ok(acc)
            }
            ExprKind::Multiplicative { first, rest } => {
                let mut acc = self.eval_expr(*first)?;
                for &(op, operand) in rest {
                    let right = self.eval_expr(operand)?;
                    acc = evaluate_multiplicative(op, &acc, &right, span)?;
                }
                Ok(acc)
            }
            ExprKind::Negate(operand) => {
                let value = self.eval_expr(*operand)?;
                evaluate_negate(&value, span)
            }
            ExprKind::Postfix { base, ops } => Ok(self.eval_postfix(*base, ops)?.0),
            ExprKind::New { class, args } => {
                let args = self.eval_args(args)?;
                self.construct(*class, args, span)
            }
            ExprKind::HandlerList(items) => self.eval_handler_list(items),
            ExprKind::Literal(literal) => Ok(match literal {
                Literal::Number(n) => Value::Number(*n),
                Literal::Text(text) => Value::Text(text.clone()),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Null => Value::Null,
            }),
            ExprKind::Ident(name) => self
                .lookup_value(*name)
                .ok_or_else(|| undefined_name(self.name(*name), span)),
            ExprKind::This => self
                .this_stack
                .last()
                .map(|entry| Value::Instance(entry.instance.clone()))
                .ok_or_else(|| undefined_name("THIS", span)),
            ExprKind::Super => Err(invalid_super_call(
                "SUPER must be followed by a method name",
                span,
            )),
            ExprKind::Paren(inner) => self.eval_expr(*inner),
        }
    }

    pub(crate) fn eval_args(&mut self, args: &[ExprId]) -> EvalResult<Vec<Value>> {
        args.iter().map(|&arg| self.eval_expr(arg)).collect()
    }

    fn eval_handler_list(&mut self, items: &[ExprId]) -> EvalResult {
        let mut handlers: Vec<Delegate> = Vec::with_capacity(items.len());
        for &item in items {
            match self.eval_expr(item)? {
                Value::Delegate(delegate) => handlers.push(delegate),
                Value::HandlerList(list) => handlers.extend(list.iter().cloned()),
                other => {
                    return Err(type_mismatch(
                        format!("handler lists hold delegates, found {}", other.type_name()),
                        self.tree.expr(item).span,
                    ))
                }
            }
        }
        Ok(Value::HandlerList(Rc::from(handlers)))
    }

    /// Variables first, then a member of the active `WITH` receiver.
    pub(crate) fn lookup_value(&self, name: Name) -> Option<Value> {
        if let Some(value) = self.scopes.get(name) {
            return Some(value.clone());
        }
        let receiver = self.active_with()?.receiver.clone();
        self.get_member(&receiver, name, Span::DUMMY).ok()
    }

    /// Evaluate `target` and report the object it was read from, for
    /// writes that must be re-applied to that object.
    pub(crate) fn eval_with_owner(
        &mut self,
        target: ExprId,
    ) -> EvalResult<(Value, Option<InstanceRef>)> {
        let tree = self.tree;
        match &tree.expr(target).kind {
            ExprKind::Postfix { base, ops } => self.eval_postfix(*base, ops),
            ExprKind::Paren(inner) => self.eval_with_owner(*inner),
            _ => Ok((self.eval_expr(target)?, None)),
        }
    }

    /// Apply `ops` to `base` left to right. Returns the final value and the
    /// last object a member was read from.
    pub(crate) fn eval_postfix(
        &mut self,
        base: ExprId,
        ops: &[PostfixOp],
    ) -> EvalResult<(Value, Option<InstanceRef>)> {
        let tree = self.tree;
        let base_expr = tree.expr(base);
        let (mut current, rest) = match (&base_expr.kind, ops) {
            (
                ExprKind::Super,
                [PostfixOp::Member { name, .. }, PostfixOp::Call { args, span }, rest @ ..],
            ) => {
                let args = self.eval_args(args)?;
                let value = self.call_super(*name, args, base_expr.span.merge(*span))?;
                (value, rest)
            }
            (ExprKind::Super, [PostfixOp::Member { name, span }, rest @ ..]) => {
                let value = self.super_delegate(*name, base_expr.span.merge(*span))?;
                (value, rest)
            }
            (ExprKind::Ident(name), [PostfixOp::Call { args, span }, rest @ ..]) => {
                let args = self.eval_args(args)?;
                let value = self.call_bare(*name, args, base_expr.span.merge(*span))?;
                (value, rest)
            }
            _ => (self.eval_expr(base)?, ops),
        };

        let mut owner = None;
        let mut index = 0;
        while index < rest.len() {
            match &rest[index] {
                PostfixOp::Member { name, span } => {
                    if let Some(PostfixOp::Call {
                        args,
                        span: call_span,
                    }) = rest.get(index + 1)
                    {
                        let args = self.eval_args(args)?;
                        current = self.call_member(&current, *name, args, span.merge(*call_span))?;
                        owner = None;
                        index += 2;
                        continue;
                    }
                    let value = self.get_member(&current, *name, *span)?;
                    if let Value::Instance(instance) = &current {
                        owner = Some(instance.clone());
                    }
                    current = value;
                }
                PostfixOp::Call { args, span } => {
                    let args = self.eval_args(args)?;
                    current = self.call_value(&current, args, *span)?;
                    owner = None;
                }
            }
            index += 1;
        }
        Ok((current, owner))
    }

    /// Read `receiver.name`: a property, then a method as a delegate, then
    /// native `OPEN`. Fonts expose their style members.
    pub(crate) fn get_member(&self, receiver: &Value, name: Name, span: Span) -> EvalResult {
        match receiver {
            Value::Instance(instance) => {
                let stored = instance.borrow().prop(name).cloned();
                if let Some(value) = stored {
                    return Ok(value);
                }
                let (class, class_name) = {
                    let inst = instance.borrow();
                    (inst.class(), inst.class_name())
                };
                if self.registry.find_method(class, name).is_some()
                    || (name == Name::OPEN && self.can_open(class))
                {
                    return Ok(Value::Delegate(Delegate::new(instance, name, None)));
                }
                Err(member_not_found(self.name(name), self.name(class_name), span))
            }
            Value::Font(font) => font
                .borrow()
                .member(name)
                .ok_or_else(|| member_not_found(self.name(name), "FONT", span)),
            other => Err(member_not_found(self.name(name), other.type_name(), span)),
        }
    }

    /// Assignment statement `target = value`.
    pub(crate) fn assign(&mut self, target: ExprId, value: Value) -> EvalResult<()> {
        let tree = self.tree;
        let expr = tree.expr(target);
        match &expr.kind {
            ExprKind::Ident(name) => {
                self.scopes.set(*name, value);
                Ok(())
            }
            ExprKind::Postfix { base, ops } => match ops.split_last() {
                Some((PostfixOp::Member { name, span }, init)) => {
                    let (receiver, owner) = self.eval_postfix(*base, init)?;
                    self.assign_member(receiver, owner, *name, value, *span)
                }
                _ => Err(invalid_lvalue(expr.span)),
            },
            _ => Err(invalid_lvalue(expr.span)),
        }
    }

    /// Write `receiver.name`. Font writes are re-applied to `owner`.
    pub(crate) fn assign_member(
        &mut self,
        receiver: Value,
        owner: Option<InstanceRef>,
        name: Name,
        value: Value,
        span: Span,
    ) -> EvalResult<()> {
        match receiver {
            Value::Instance(instance) => self.set_property(&instance, name, value, span),
            Value::Font(font) => {
                self.set_font_member(&font, name, &value, span)?;
                match owner {
                    Some(owner) => self.reapply_font(&owner, span),
                    None => Ok(()),
                }
            }
            other => Err(type_mismatch(
                format!(
                    "cannot set member `{}` on a {} value",
                    self.name(name),
                    other.type_name()
                ),
                span,
            )),
        }
    }

    /// Assignment to a path relative to the active `WITH` receiver.
    ///
    /// A single name on an object updates an existing property, else an
    /// existing variable, else creates the property.
    pub(crate) fn with_assign(&mut self, path: &[Name], value: Value, span: Span) -> EvalResult<()> {
        let Some((&last, init)) = path.split_last() else {
            return Ok(());
        };
        let Some(entry) = self.active_with().cloned() else {
            return self.assign_path(None, init, last, value, span);
        };

        if !init.is_empty() {
            return self.assign_path(Some((entry.receiver, entry.owner)), init, last, value, span);
        }
        match entry.receiver {
            Value::Instance(instance) => {
                let has_prop = instance.borrow().has_prop(last);
                if !has_prop && self.scopes.contains(last) {
                    self.scopes.set(last, value);
                    Ok(())
                } else {
                    self.set_property(&instance, last, value, span)
                }
            }
            receiver => self.assign_member(receiver, entry.owner, last, value, span),
        }
    }

    /// Walk `init` from the receiver (or from a variable when there is
    /// none, or the receiver lacks the head), then write `last`.
    fn assign_path(
        &mut self,
        receiver: Option<(Value, Option<InstanceRef>)>,
        init: &[Name],
        last: Name,
        value: Value,
        span: Span,
    ) -> EvalResult<()> {
        let Some((&head, tail)) = init.split_first() else {
            self.scopes.set(last, value);
            return Ok(());
        };

        let from_receiver = receiver.and_then(|(receiver, owner)| {
            let value = self.get_member(&receiver, head, span).ok()?;
            let owner = receiver.as_instance().cloned().or(owner);
            Some((value, owner))
        });
        let (mut current, mut owner) = match from_receiver {
            Some(found) => found,
            None => {
                let value = self
                    .scopes
                    .get(head)
                    .cloned()
                    .ok_or_else(|| undefined_name(self.name(head), span))?;
                (value, None)
            }
        };

        for &segment in tail {
            let next = self.get_member(&current, segment, span)?;
            if let Value::Instance(instance) = &current {
                owner = Some(instance.clone());
            }
            current = next;
        }
        self.assign_member(current, owner, last, value, span)
    }
}
