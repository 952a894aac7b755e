//! Binary and unary operators on runtime values.

use std::cmp::Ordering;

use dbs_ir::ast::{AddOp, CompareOp, MulOp};
use dbs_ir::{Span, StringInterner};

use crate::errors::{binary_type_mismatch, division_by_zero, type_mismatch, EvalResult};
use crate::Value;

/// `+` and `-`. `+` concatenates when either side is text.
pub fn evaluate_additive(
    op: AddOp,
    left: &Value,
    right: &Value,
    span: Span,
    interner: &StringInterner,
) -> EvalResult {
    match (op, left, right) {
        (AddOp::Add, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (AddOp::Add, Value::Text(_), _) | (AddOp::Add, _, Value::Text(_)) => {
            let mut text = left.display(interner);
            text.push_str(&right.display(interner));
            Ok(Value::Text(text))
        }
        (AddOp::Sub, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        _ => Err(binary_type_mismatch(
            op.as_str(),
            left.type_name(),
            right.type_name(),
            span,
        )),
    }
}

/// `*` and `/`.
pub fn evaluate_multiplicative(op: MulOp, left: &Value, right: &Value, span: Span) -> EvalResult {
    let (Value::Number(a), Value::Number(b)) = (left, right) else {
        return Err(binary_type_mismatch(
            op.as_str(),
            left.type_name(),
            right.type_name(),
            span,
        ));
    };
    match op {
        MulOp::Mul => Ok(Value::Number(a * b)),
        MulOp::Div if *b == 0.0 => Err(division_by_zero(span)),
        MulOp::Div => Ok(Value::Number(a / b)),
    }
}

/// Comparisons yield a logical value. Equality works across kinds;
/// ordering needs two numbers, two texts or two logicals.
pub fn evaluate_comparison(op: CompareOp, left: &Value, right: &Value, span: Span) -> EvalResult {
    let ordered = || {
        order(left, right).ok_or_else(|| {
            binary_type_mismatch(op.as_str(), left.type_name(), right.type_name(), span)
        })
    };
    let result = match op {
        CompareOp::Eq => left.equals(right),
        CompareOp::NotEq => !left.equals(right),
        CompareOp::Lt => ordered()? == Ordering::Less,
        CompareOp::LtEq => ordered()? != Ordering::Greater,
        CompareOp::Gt => ordered()? == Ordering::Greater,
        CompareOp::GtEq => ordered()? != Ordering::Less,
    };
    Ok(Value::Bool(result))
}

fn order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Unary minus.
pub fn evaluate_negate(operand: &Value, span: Span) -> EvalResult {
    match operand {
        Value::Number(n) => Ok(Value::Number(-n)),
        other => Err(type_mismatch(
            format!("cannot negate a {} value", other.type_name()),
            span,
        )),
    }
}
