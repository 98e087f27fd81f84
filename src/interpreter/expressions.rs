//! Expression evaluation implementation
//!
//! This module handles evaluation of all CSubset expression types, including:
//!
//! - Literals (integers, floats, strings)
//! - Variables and identifiers
//! - Binary operators (arithmetic, comparison) and short-circuit logic
//! - Unary operators (negation, not)
//! - Array subscripting and struct/union member access
//! - Assignment and function calls (including built-ins)
//!
//! # Safety
//!
//! All integer arithmetic uses checked math to detect overflows and emit
//! runtime errors rather than panicking or wrapping silently.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::*;

impl Interpreter {
    /// Evaluate an expression and return its value
    pub(crate) fn evaluate_expr(&mut self, expr: &AstNode) -> Result<Value, RuntimeError> {
        match expr {
            AstNode::IntLiteral(n, _) => Ok(Value::Int(*n)),

            AstNode::FloatLiteral(x, _) => Ok(Value::Float(*x)),

            AstNode::StringLiteral(s, _) => Ok(Value::String(s.clone())),

            AstNode::Variable(name, loc) => self
                .env
                .lookup(name)
                .map(|slot| slot.value.clone())
                .ok_or_else(|| RuntimeError::UndefinedVariable {
                    name: name.clone(),
                    location: *loc,
                }),

            AstNode::Assignment { lhs, rhs, location } => {
                self.execute_assignment(lhs, rhs, *location)
            }

            AstNode::BinaryOp {
                op,
                left,
                right,
                location,
            } => {
                let left_val = self.evaluate_expr(left)?;
                let right_val = self.evaluate_expr(right)?;
                self.evaluate_binary_op(*op, left_val, right_val, *location)
            }

            AstNode::Logical {
                op,
                left,
                right,
                location,
            } => self.evaluate_logical(*op, left, right, *location),

            AstNode::UnaryOp {
                op,
                operand,
                location,
            } => {
                let val = self.evaluate_expr(operand)?;
                self.evaluate_unary_op(*op, val, *location)
            }

            AstNode::FunctionCall {
                name,
                args,
                location,
            } => self.call_function(name, args, *location),

            AstNode::ArrayAccess { .. } | AstNode::MemberAccess { .. } => {
                self.evaluate_access(expr)
            }

            statement => Err(RuntimeError::type_error(
                "expression",
                "statement",
                statement.location(),
            )),
        }
    }

    /// `&&` and `||`: the right operand runs only when it decides the result
    fn evaluate_logical(
        &mut self,
        op: LogicOp,
        left: &AstNode,
        right: &AstNode,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let left_val = self.evaluate_expr(left)?;
        let left_bool = Self::value_to_bool(&left_val, location)?;

        let result = match (op, left_bool) {
            (LogicOp::Or, true) => true,
            (LogicOp::And, false) => false,
            _ => {
                let right_val = self.evaluate_expr(right)?;
                Self::value_to_bool(&right_val, location)?
            }
        };

        Ok(Value::Int(result as i32))
    }
}
