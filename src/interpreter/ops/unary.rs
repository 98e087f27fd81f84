use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{SourceLocation, UnOp};

impl Interpreter {
    pub(crate) fn evaluate_unary_op(
        &self,
        op: UnOp,
        value: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            UnOp::Neg => match value {
                Value::Int(n) => n
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| RuntimeError::IntegerOverflow {
                        operation: format!("-({})", n),
                        location,
                    }),
                Value::Float(x) => Ok(Value::Float(-x)),
                other => Err(RuntimeError::type_error(
                    "int or float operand for '-'",
                    other.type_name(),
                    location,
                )),
            },
            UnOp::Not => {
                let truth = Self::value_to_bool(&value, location)?;
                Ok(Value::Int(!truth as i32))
            }
        }
    }
}
