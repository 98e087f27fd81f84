use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{BinOp, SourceLocation};
use std::cmp::Ordering;

/// Comparison results are the ints 1 and 0
#[inline]
fn truth(b: bool) -> Value {
    Value::Int(b as i32)
}

#[inline]
fn compare(op: BinOp, ordering: Ordering) -> Option<Value> {
    let result = match op {
        BinOp::Eq => ordering == Ordering::Equal,
        BinOp::Ne => ordering != Ordering::Equal,
        BinOp::Lt => ordering == Ordering::Less,
        BinOp::Le => ordering != Ordering::Greater,
        BinOp::Gt => ordering == Ordering::Greater,
        BinOp::Ge => ordering != Ordering::Less,
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => return None,
    };
    Some(truth(result))
}

impl Interpreter {
    /// Apply a binary operator to two evaluated operands.
    ///
    /// Two ints stay int (checked); an int mixed with a float promotes to
    /// float; two strings support `+` and comparisons.
    pub(crate) fn evaluate_binary_op(
        &self,
        op: BinOp,
        left: Value,
        right: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match (left, right) {
            (Value::Int(a), Value::Int(b)) => Self::int_binary_op(op, a, b, location),
            (Value::Int(a), Value::Float(b)) => Self::float_binary_op(op, a as f64, b, location),
            (Value::Float(a), Value::Int(b)) => Self::float_binary_op(op, a, b as f64, location),
            (Value::Float(a), Value::Float(b)) => Self::float_binary_op(op, a, b, location),
            (Value::String(a), Value::String(b)) => Self::string_binary_op(op, a, b, location),
            (left, right) => Err(RuntimeError::type_error(
                format!("operands compatible with '{}'", op),
                format!("{} and {}", left.type_name(), right.type_name()),
                location,
            )),
        }
    }

    #[inline]
    fn int_binary_op(
        op: BinOp,
        a: i32,
        b: i32,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let overflow = || RuntimeError::IntegerOverflow {
            operation: format!("{} {} {}", a, op, b),
            location,
        };

        match op {
            BinOp::Add => a.checked_add(b).map(Value::Int).ok_or_else(overflow),
            BinOp::Sub => a.checked_sub(b).map(Value::Int).ok_or_else(overflow),
            BinOp::Mul => a.checked_mul(b).map(Value::Int).ok_or_else(overflow),
            BinOp::Div | BinOp::Mod if b == 0 => Err(RuntimeError::DivisionByZero {
                operation: format!("{} {} {}", a, op, b),
                location,
            }),
            BinOp::Div => a.checked_div(b).map(Value::Int).ok_or_else(overflow),
            BinOp::Mod => a.checked_rem(b).map(Value::Int).ok_or_else(overflow),
            _ => Ok(compare(op, a.cmp(&b)).unwrap_or(Value::Int(0))),
        }
    }

    #[inline]
    fn float_binary_op(
        op: BinOp,
        a: f64,
        b: f64,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            BinOp::Add => Ok(Value::Float(a + b)),
            BinOp::Sub => Ok(Value::Float(a - b)),
            BinOp::Mul => Ok(Value::Float(a * b)),
            BinOp::Div => Ok(Value::Float(a / b)),
            BinOp::Mod => Err(RuntimeError::type_error(
                "int operands for '%'",
                "float",
                location,
            )),
            // NaN compares unequal to everything
            _ => Ok(match a.partial_cmp(&b) {
                Some(ordering) => compare(op, ordering).unwrap_or(Value::Int(0)),
                None => truth(op == BinOp::Ne),
            }),
        }
    }

    fn string_binary_op(
        op: BinOp,
        a: String,
        b: String,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if op == BinOp::Add {
            let mut joined = a;
            joined.push_str(&b);
            return Ok(Value::String(joined));
        }

        compare(op, a.cmp(&b)).ok_or_else(|| {
            RuntimeError::type_error(
                format!("numeric operands for '{}'", op),
                "string and string",
                location,
            )
        })
    }
}
