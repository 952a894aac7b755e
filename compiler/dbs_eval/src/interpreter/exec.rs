//! Statement execution.

use dbs_ir::ast::{ExprId, StmtId, StmtKind};
use dbs_ir::{Name, Span};
use dbs_stack::ensure_sufficient_stack;

use super::{Flow, Interpreter, WithEntry};
use crate::errors::{
    backend_failure, break_outside_loop, loop_limit, return_outside_method, type_mismatch,
    undefined_name, zero_step, EvalResult,
};
use crate::Value;

impl Interpreter<'_> {
    /// Run statements in order until one finishes with `Break` or `Return`.
    pub(crate) fn exec_block(&mut self, stmts: &[StmtId]) -> EvalResult<Flow> {
        for &stmt in stmts {
            match self.exec_stmt(stmt)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    pub(crate) fn exec_stmt(&mut self, id: StmtId) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| self.exec_stmt_inner(id))
    }

    fn exec_stmt_inner(&mut self, id: StmtId) -> EvalResult<Flow> {
        let tree = self.tree;
        let stmt = tree.stmt(id);
        let span = stmt.span;
        match &stmt.kind {
            StmtKind::Write(exprs) => self.exec_write(exprs)?,
            StmtKind::Assign { target, value } => {
                let value = self.eval_expr(*value)?;
                self.assign(*target, value)?;
            }
            StmtKind::LocalDecl(name) => self.scopes.define_local(*name, Value::Null),
            StmtKind::LocalAssign { name, value } => {
                let value = self.eval_expr(*value)?;
                self.scopes.define_local(*name, value);
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let branch = if self.eval_expr(*cond)?.is_truthy() {
                    then_branch
                } else {
                    else_branch
                };
                return self.exec_block(branch);
            }
            StmtKind::For {
                var,
                start,
                end,
                step,
                body,
            } => return self.exec_for(*var, *start, *end, *step, body, span),
            StmtKind::DoWhile { cond, body } => return self.exec_do_while(*cond, body, span),
            StmtKind::Break => {
                if self.context.loop_depth == 0 {
                    return Err(break_outside_loop(span));
                }
                return Ok(Flow::Break);
            }
            StmtKind::Return(value) => {
                if !self.context.in_method {
                    return Err(return_outside_method(span));
                }
                let value = match value {
                    Some(expr) => self.eval_expr(*expr)?,
                    None => Value::Null,
                };
                return Ok(Flow::Return(value));
            }
            StmtKind::With { target, body } => return self.exec_with(*target, body),
            StmtKind::WithAssign { path, value } => {
                let value = self.eval_expr(*value)?;
                self.with_assign(path, value, span)?;
            }
            StmtKind::Parameter(names) => {
                let args = self.scopes.args().to_vec();
                for (index, &name) in names.iter().enumerate() {
                    let value = args.get(index).cloned().unwrap_or_default();
                    self.scopes.define_local(name, value);
                }
            }
            StmtKind::Expr(expr) | StmtKind::Call(expr) => {
                self.eval_expr(*expr)?;
            }
            StmtKind::Delete(name) => self.exec_delete(*name, span)?,
            StmtKind::CreateFile(path) => {
                let path = match path {
                    Some(expr) => self.eval_expr(*expr)?.display(self.interner),
                    None => String::new(),
                };
                self.backend
                    .create_file(&path)
                    .map_err(|err| backend_failure(&err, span))?;
            }
            // Class members are registered by the collect pass.
            StmtKind::ClassDecl(_) | StmtKind::MethodDecl(_) | StmtKind::PropertyDecl { .. } => {}
        }
        Ok(Flow::Normal)
    }

    fn exec_write(&mut self, exprs: &[ExprId]) -> EvalResult<()> {
        let mut line = String::new();
        for &expr in exprs {
            let value = self.eval_expr(expr)?;
            line.push_str(&value.display(self.interner));
        }
        self.print_handler.println(&line);
        Ok(())
    }

    fn eval_number(&mut self, expr: ExprId, what: &str) -> EvalResult<f64> {
        let value = self.eval_expr(expr)?;
        value.as_number().ok_or_else(|| {
            type_mismatch(
                format!("FOR {what} must be a number, found {}", value.type_name()),
                self.tree.expr(expr).span,
            )
        })
    }

    /// Inclusive counting loop. The counter is kept internally; writes to
    /// the loop variable inside the body do not change the iteration.
    fn exec_for(
        &mut self,
        var: Name,
        start: ExprId,
        end: ExprId,
        step: Option<ExprId>,
        body: &[StmtId],
        span: Span,
    ) -> EvalResult<Flow> {
        let start = self.eval_number(start, "start")?;
        let end = self.eval_number(end, "end")?;
        let step = match step {
            Some(step) => self.eval_number(step, "step")?,
            None if end >= start => 1.0,
            None => -1.0,
        };
        if step == 0.0 {
            return Err(zero_step(span));
        }

        self.context.loop_depth += 1;
        let result = self.run_for(var, start, end, step, body);
        self.context.loop_depth -= 1;
        result
    }

    fn run_for(
        &mut self,
        var: Name,
        start: f64,
        end: f64,
        step: f64,
        body: &[StmtId],
    ) -> EvalResult<Flow> {
        let mut counter = start;
        while (step > 0.0 && counter <= end) || (step < 0.0 && counter >= end) {
            self.scopes.set(var, Value::Number(counter));
            match self.exec_block(body)? {
                Flow::Normal => {}
                Flow::Break => break,
                flow @ Flow::Return(_) => return Ok(flow),
            }
            counter += step;
        }
        Ok(Flow::Normal)
    }

    fn exec_do_while(&mut self, cond: ExprId, body: &[StmtId], span: Span) -> EvalResult<Flow> {
        self.context.loop_depth += 1;
        let result = self.run_do_while(cond, body, span);
        self.context.loop_depth -= 1;
        result
    }

    fn run_do_while(&mut self, cond: ExprId, body: &[StmtId], span: Span) -> EvalResult<Flow> {
        let limit = self.config.max_loop_iterations;
        let mut iterations = 0usize;
        while self.eval_expr(cond)?.is_truthy() {
            iterations += 1;
            if iterations > limit {
                return Err(loop_limit(limit, span));
            }
            match self.exec_block(body)? {
                Flow::Normal => {}
                Flow::Break => break,
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// `WITH (target)`: the receiver is visible to the body until the
    /// guard drops. Edits made through a font receiver are re-applied to
    /// its owner on normal exit.
    fn exec_with(&mut self, target: ExprId, body: &[StmtId]) -> EvalResult<Flow> {
        let (receiver, chain_owner) = self.eval_with_owner(target)?;
        let owner = if matches!(receiver, Value::Font(_)) {
            chain_owner.or_else(|| {
                self.active_with()
                    .and_then(|entry| entry.receiver.as_instance().cloned())
            })
        } else {
            None
        };
        let span = self.tree.expr(target).span;

        let flow = {
            let mut scoped = self.scoped_with(WithEntry {
                receiver,
                owner: owner.clone(),
            });
            scoped.exec_block(body)?
        };
        if let Some(owner) = owner {
            self.reapply_font(&owner, span)?;
        }
        Ok(flow)
    }

    /// `DELETE name`: drop the nearest binding, then run `DESTROY` on an
    /// object whose class chain declares it.
    fn exec_delete(&mut self, name: Name, span: Span) -> EvalResult<()> {
        let Some(value) = self.scopes.remove(name) else {
            return Err(undefined_name(self.name(name), span));
        };
        let Value::Instance(instance) = value else {
            return Ok(());
        };
        let class = instance.borrow().class();
        if self.registry.find_method(class, Name::DESTROY).is_some() {
            tracing::debug!(variable = self.name(name), "running DESTROY");
            self.invoke_method(&instance, Name::DESTROY, Vec::new(), None, span)?;
        }
        Ok(())
    }
}
