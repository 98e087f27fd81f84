//! Statement execution implementation
//!
//! This module handles the execution of all CSubset statement types, including:
//!
//! - Variable and array declarations with initialization
//! - Control flow dispatch (if/else, loops, switch)
//! - Blocks and expression statements
//!
//! # Implementation
//!
//! All statement execution methods are implemented as `pub(crate)` methods
//! on the [`Interpreter`] struct, allowing them to access and modify the
//! interpreter's state (environment, terminal, control flow).
//!
//! # Control Flow
//!
//! - `break` sets [`ControlFlow::Break`], consumed by the nearest loop or switch
//! - `return` sets [`ControlFlow::Return`] and `return_value`, consumed by the call
//! - A statement list stops at the first statement that raises either signal

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::*;

impl Interpreter {
    /// Execute a single statement
    pub(crate) fn execute_statement(&mut self, stmt: &AstNode) -> Result<(), RuntimeError> {
        match stmt {
            AstNode::VarDecl {
                name,
                var_type,
                init,
                location,
            } => self.execute_var_decl(name, var_type, init.as_deref(), *location),

            AstNode::ArrayDecl {
                name,
                element_type,
                size,
                init,
                location,
            } => self.execute_array_decl(name, element_type, *size, init.as_deref(), *location),

            AstNode::Return { expr, location } => self.execute_return(expr.as_deref(), *location),

            AstNode::If {
                condition,
                then_branch,
                else_branch,
                location,
            } => {
                let cond_val = self.evaluate_expr(condition)?;
                if Self::value_to_bool(&cond_val, *location)? {
                    self.execute_block(then_branch)
                } else if let Some(else_stmts) = else_branch {
                    self.execute_block(else_stmts)
                } else {
                    Ok(())
                }
            }

            AstNode::While {
                condition,
                body,
                location,
            } => self.execute_while(condition, body, *location),

            AstNode::DoWhile {
                body,
                condition,
                location,
            } => self.execute_do_while(body, condition, *location),

            AstNode::For {
                init,
                condition,
                increment,
                body,
                location,
            } => self.execute_for(
                init.as_deref(),
                condition.as_deref(),
                increment.as_deref(),
                body,
                *location,
            ),

            AstNode::Switch { expr, cases, .. } => self.execute_switch(expr, cases),

            AstNode::Break { .. } => {
                self.control_flow = ControlFlow::Break;
                Ok(())
            }

            AstNode::Block { statements, .. } => self.execute_block(statements),

            AstNode::ExpressionStatement { expr, .. } => {
                self.evaluate_expr(expr)?;
                Ok(())
            }

            // Definitions are indexed when the interpreter is built
            AstNode::FunctionDef(_) | AstNode::StructDef { .. } | AstNode::UnionDef { .. } => {
                Ok(())
            }

            expr => {
                self.evaluate_expr(expr)?;
                Ok(())
            }
        }
    }

    /// Execute statements in order until one raises a control-flow signal
    pub(crate) fn execute_statements(&mut self, statements: &[AstNode]) -> Result<(), RuntimeError> {
        for stmt in statements {
            self.execute_statement(stmt)?;
            if self.control_flow != ControlFlow::Normal {
                break;
            }
        }
        Ok(())
    }

    /// Execute statements inside a fresh block scope
    pub(crate) fn execute_block(&mut self, statements: &[AstNode]) -> Result<(), RuntimeError> {
        self.env.enter_scope();
        let result = self.execute_statements(statements);
        self.env.exit_scope();
        result
    }

    pub(crate) fn execute_var_decl(
        &mut self,
        name: &str,
        var_type: &Type,
        init: Option<&AstNode>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let value = match init {
            Some(init_expr) => {
                let val = self.evaluate_expr(init_expr)?;
                self.coerce_value_to_type(val, var_type, location)?
            }
            None => self.zero_value(var_type, location)?,
        };

        self.bind(name, var_type.clone(), value, location)
    }

    pub(crate) fn execute_array_decl(
        &mut self,
        name: &str,
        element_type: &Type,
        size: usize,
        init: Option<&[Initializer]>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let array_type = element_type.clone().array_of(size);

        let value = match init {
            Some(items) => self.build_array(&array_type, items, location)?,
            None => self.zero_value(&array_type, location)?,
        };

        self.bind(name, array_type, value, location)
    }

    /// Evaluate a brace initializer, zero-filling the missing tail
    fn build_array(
        &mut self,
        array_type: &Type,
        items: &[Initializer],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let (element_type, size) = match array_type {
            Type::Array(element, size) => (element.as_ref(), *size),
            other => {
                return Err(RuntimeError::type_error(
                    other.to_string(),
                    "initializer list",
                    location,
                ))
            }
        };

        if items.len() > size {
            return Err(RuntimeError::IndexOutOfBounds {
                index: size as i64,
                size,
                location,
            });
        }

        let mut elements = Vec::with_capacity(size);
        for item in items {
            let element = match item {
                Initializer::Expr(expr) => {
                    let val = self.evaluate_expr(expr)?;
                    self.coerce_value_to_type(val, element_type, expr.location())?
                }
                Initializer::List(nested, nested_loc) => {
                    self.build_array(element_type, nested, *nested_loc)?
                }
            };
            elements.push(element);
        }

        if elements.len() < size {
            let zero = self.zero_value(element_type, location)?;
            elements.resize(size, zero);
        }

        Ok(Value::Array(elements))
    }

    /// Declare `name` in the innermost scope
    fn bind(
        &mut self,
        name: &str,
        var_type: Type,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if self.env.declare(name, var_type, value) {
            Ok(())
        } else {
            Err(RuntimeError::Redeclaration {
                name: name.to_string(),
                location,
            })
        }
    }
}
