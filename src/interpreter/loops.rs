//! Loop statement execution (`while`, `do-while`, `for`).
//!
//! Adds `impl Interpreter` methods for the three loop forms. `break` is
//! propagated via `LoopBodyResult` so the loop driver can react without
//! inspecting `control_flow` directly.
//!
//! `return` inside a loop body is handled by returning
//! `LoopBodyResult::Exit`, which causes the loop to unwind immediately and
//! let the enclosing call consume the control-flow signal.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{AstNode, SourceLocation};

/// Result returned by [`Interpreter::execute_loop_body`] to signal how the body ended.
pub(crate) enum LoopBodyResult {
    /// Body completed normally; the loop should iterate again.
    Continue,
    /// `break` was encountered; the loop should exit cleanly.
    Break,
    /// `return` was triggered; the loop driver should unwind and leave
    /// `self.control_flow` for the caller.
    Exit,
}

impl Interpreter {
    /// Executes all statements in `body` inside a fresh scope.
    pub(crate) fn execute_loop_body(
        &mut self,
        body: &[AstNode],
    ) -> Result<LoopBodyResult, RuntimeError> {
        self.execute_block(body)?;

        match self.control_flow {
            ControlFlow::Normal => Ok(LoopBodyResult::Continue),
            ControlFlow::Break => {
                self.control_flow = ControlFlow::Normal;
                Ok(LoopBodyResult::Break)
            }
            ControlFlow::Return => Ok(LoopBodyResult::Exit),
        }
    }

    /// Evaluate a loop condition to a boolean
    fn loop_condition(
        &mut self,
        condition: &AstNode,
        location: SourceLocation,
    ) -> Result<bool, RuntimeError> {
        let cond_val = self.evaluate_expr(condition)?;
        Self::value_to_bool(&cond_val, location)
    }

    /// Executes a `while (condition) { body }` loop.
    ///
    /// The condition is evaluated before each iteration.
    pub(crate) fn execute_while(
        &mut self,
        condition: &AstNode,
        body: &[AstNode],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        while self.loop_condition(condition, location)? {
            match self.execute_loop_body(body)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break | LoopBodyResult::Exit => break,
            }
        }
        Ok(())
    }

    /// Executes a `do { body } while (condition)` loop.
    ///
    /// The body always runs at least once; the condition is checked after each
    /// iteration.
    pub(crate) fn execute_do_while(
        &mut self,
        body: &[AstNode],
        condition: &AstNode,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        loop {
            match self.execute_loop_body(body)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break | LoopBodyResult::Exit => break,
            }

            if !self.loop_condition(condition, location)? {
                break;
            }
        }
        Ok(())
    }

    /// Executes a `for (init; condition; increment) { body }` loop.
    ///
    /// `init`, `condition`, and `increment` are all optional. A missing
    /// condition is treated as always-true. The initializer and loop variable
    /// share a single scope that is exited when the loop ends.
    pub(crate) fn execute_for(
        &mut self,
        init: Option<&AstNode>,
        condition: Option<&AstNode>,
        increment: Option<&AstNode>,
        body: &[AstNode],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        self.env.enter_scope();
        let result = self.run_for(init, condition, increment, body, location);
        self.env.exit_scope();
        result
    }

    fn run_for(
        &mut self,
        init: Option<&AstNode>,
        condition: Option<&AstNode>,
        increment: Option<&AstNode>,
        body: &[AstNode],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if let Some(init_stmt) = init {
            self.execute_statement(init_stmt)?;
        }

        loop {
            if let Some(cond) = condition {
                if !self.loop_condition(cond, location)? {
                    break;
                }
            }

            match self.execute_loop_body(body)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break | LoopBodyResult::Exit => break,
            }

            if let Some(inc) = increment {
                self.evaluate_expr(inc)?;
            }
        }
        Ok(())
    }
}
