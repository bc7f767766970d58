//! Binary and unary operator evaluation.
//!
//! `and` / `or` short-circuit and are handled by the interpreter before
//! reaching here.

use ember_ir::{BinaryOp, UnaryOp};

use crate::{EvalError, EvalResult, Value};

pub(crate) fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => return Ok(Value::Bool(left != right)),
        _ => {}
    }

    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_op(op, *a, *b, left, right),
        (Value::Str(a), Value::Str(b)) => match op {
            BinaryOp::Add => Ok(Value::string(format!("{a}{b}"))),
            BinaryOp::Lt => Ok(Value::Bool(a < b)),
            BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
            BinaryOp::Gt => Ok(Value::Bool(a > b)),
            BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
            _ => Err(EvalError::type_mismatch(op.as_symbol(), left, right)),
        },
        _ => Err(EvalError::type_mismatch(op.as_symbol(), left, right)),
    }
}

fn int_op(op: BinaryOp, a: i64, b: i64, left: &Value, right: &Value) -> EvalResult {
    let overflow = || EvalError::IntegerOverflow {
        op: op.as_symbol().to_string(),
    };
    let value = match op {
        BinaryOp::Add => Value::Int(a.checked_add(b).ok_or_else(overflow)?),
        BinaryOp::Sub => Value::Int(a.checked_sub(b).ok_or_else(overflow)?),
        BinaryOp::Mul => Value::Int(a.checked_mul(b).ok_or_else(overflow)?),
        BinaryOp::Div | BinaryOp::Mod if b == 0 => return Err(EvalError::DivisionByZero),
        BinaryOp::Div => Value::Int(a.checked_div(b).ok_or_else(overflow)?),
        BinaryOp::Mod => Value::Int(a.checked_rem(b).ok_or_else(overflow)?),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::And | BinaryOp::Or => {
            return Err(EvalError::type_mismatch(op.as_symbol(), left, right))
        }
    };
    Ok(value)
}

pub(crate) fn evaluate_unary(op: UnaryOp, operand: &Value) -> EvalResult {
    match (op, operand) {
        (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
        (UnaryOp::Neg, Value::Int(n)) => {
            n.checked_neg()
                .map(Value::Int)
                .ok_or_else(|| EvalError::IntegerOverflow {
                    op: "-".to_string(),
                })
        }
        (UnaryOp::Neg, other) => Err(EvalError::TypeMismatch {
            op: "-".to_string(),
            left: other.type_name(),
            right: other.type_name(),
        }),
    }
}
