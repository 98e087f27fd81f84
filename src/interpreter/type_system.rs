//! Type compatibility and coercion
//!
//! Every value that lands in a typed slot (declaration, assignment, argument,
//! return, union field read) passes through [`Interpreter::coerce_value_to_type`].
//!
//! # Coercion Rules
//!
//! - `int` and `float` convert into each other; float to int truncates toward zero
//! - `string` never converts to or from anything else
//! - Structs and unions must carry the same type name
//! - Arrays must have the declared length; elements are coerced one by one
//! - Nothing converts into `void`

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::*;

impl Interpreter {
    /// Convert `value` for storage in a slot declared as `target`
    pub(crate) fn coerce_value_to_type(
        &self,
        value: Value,
        target: &Type,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match (target, value) {
            (Type::Int, Value::Int(n)) => Ok(Value::Int(n)),
            (Type::Int, Value::Float(x)) => Self::float_to_int(x, location).map(Value::Int),
            (Type::Float, Value::Float(x)) => Ok(Value::Float(x)),
            (Type::Float, Value::Int(n)) => Ok(Value::Float(n as f64)),
            (Type::String, Value::String(s)) => Ok(Value::String(s)),

            (Type::Array(element, size), Value::Array(items)) if items.len() == *size => items
                .into_iter()
                .map(|item| self.coerce_value_to_type(item, element, location))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),

            (Type::Struct(expected), Value::Struct { name, fields }) if name == *expected => {
                Ok(Value::Struct { name, fields })
            }

            (
                Type::Union(expected),
                Value::Union {
                    name,
                    active,
                    value,
                },
            ) if name == *expected => Ok(Value::Union {
                name,
                active,
                value,
            }),

            (target, value) => Err(RuntimeError::type_error(
                target.to_string(),
                value.type_name(),
                location,
            )),
        }
    }

    /// Truncate toward zero, rejecting values outside the `int` range
    fn float_to_int(x: f64, location: SourceLocation) -> Result<i32, RuntimeError> {
        let truncated = x.trunc();
        if truncated.is_finite()
            && truncated >= i32::MIN as f64
            && truncated <= i32::MAX as f64
        {
            Ok(truncated as i32)
        } else {
            Err(RuntimeError::IntegerOverflow {
                operation: format!("conversion of {} to int", x),
                location,
            })
        }
    }

    /// Truth value of a condition: nonzero int or float
    pub(crate) fn value_to_bool(value: &Value, location: SourceLocation) -> Result<bool, RuntimeError> {
        match value {
            Value::Int(n) => Ok(*n != 0),
            Value::Float(x) => Ok(*x != 0.0),
            other => Err(RuntimeError::type_error(
                "int or float condition",
                other.type_name(),
                location,
            )),
        }
    }

    /// Zero value of a declared type, with registry failures located
    pub(crate) fn zero_value(&self, ty: &Type, location: SourceLocation) -> Result<Value, RuntimeError> {
        self.types
            .zero_value(ty)
            .map_err(|e| RuntimeError::undefined_type(e, location))
    }
}
