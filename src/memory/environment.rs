//! Variable environment
//!
//! This module provides the scope chain the evaluator reads and writes:
//! - [`Environment`]: global scope plus the stack of call frames
//! - [`Frame`]: one function activation with its nested block scopes
//! - [`Slot`]: a variable's current value and declared type
//!
//! # Scoping
//!
//! A call pushes a [`Frame`] whose outermost scope holds the parameters; its
//! parent is the global scope, never the caller's locals. Blocks push a child
//! scope on the current frame and pop it on exit. Lookup walks the current
//! frame's scopes innermost-first, then the globals.

use super::value::Value;
use crate::parser::ast::Type;
use rustc_hash::FxHashMap;

/// A named storage location
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub value: Value,
    pub declared_type: Type,
}

type Scope = FxHashMap<String, Slot>;

/// Activation record of one function call
#[derive(Debug, Clone)]
pub struct Frame {
    pub return_type: Type,
    scopes: Vec<Scope>,
}

impl Frame {
    pub fn new(return_type: Type) -> Self {
        Frame {
            return_type,
            scopes: vec![Scope::default()],
        }
    }

    /// Number of scopes currently open in this frame
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }
}

/// Global scope plus the call-frame stack
#[derive(Debug, Clone, Default)]
pub struct Environment {
    globals: Scope,
    frames: Vec<Frame>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new call frame
    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Pop the top call frame
    pub fn pop_frame(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Get the current (top) frame
    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Depth of the call stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Enter a block scope in the current frame
    pub fn enter_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.scopes.push(Scope::default());
        }
    }

    /// Exit the innermost block scope, dropping its variables.
    /// The frame's parameter scope is never popped.
    pub fn exit_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            if frame.scopes.len() > 1 {
                frame.scopes.pop();
            }
        }
    }

    /// Bind a new variable in the innermost scope.
    ///
    /// Returns `false` without touching anything when the name is already
    /// bound in that same scope; shadowing an outer binding is allowed.
    pub fn declare(&mut self, name: &str, declared_type: Type, value: Value) -> bool {
        let scope = match self.frames.last_mut() {
            Some(frame) => match frame.scopes.last_mut() {
                Some(scope) => scope,
                None => return false,
            },
            None => &mut self.globals,
        };

        if scope.contains_key(name) {
            return false;
        }
        scope.insert(
            name.to_string(),
            Slot {
                value,
                declared_type,
            },
        );
        true
    }

    /// Resolve a name through the current frame, then the globals
    pub fn lookup(&self, name: &str) -> Option<&Slot> {
        if let Some(frame) = self.frames.last() {
            if let Some(slot) = frame.scopes.iter().rev().find_map(|s| s.get(name)) {
                return Some(slot);
            }
        }
        self.globals.get(name)
    }

    /// Mutable variant of [`Environment::lookup`]
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Slot> {
        if let Some(frame) = self.frames.last_mut() {
            if let Some(slot) = frame
                .scopes
                .iter_mut()
                .rev()
                .find_map(|s| s.get_mut(name))
            {
                return Some(slot);
            }
        }
        self.globals.get_mut(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::new(Type::Void)
    }

    #[test]
    fn test_globals_visible_from_frames() {
        let mut env = Environment::new();
        assert!(env.declare("g", Type::Int, Value::Int(1)));
        env.push_frame(frame());

        assert_eq!(env.lookup("g").map(|s| &s.value), Some(&Value::Int(1)));
    }

    #[test]
    fn test_frames_do_not_see_caller_locals() {
        let mut env = Environment::new();
        env.push_frame(frame());
        assert!(env.declare("local", Type::Int, Value::Int(5)));
        env.push_frame(frame());

        assert!(env.lookup("local").is_none());
        env.pop_frame();
        assert!(env.lookup("local").is_some());
    }

    #[test]
    fn test_redeclaration_in_same_scope() {
        let mut env = Environment::new();
        env.push_frame(frame());
        assert!(env.declare("x", Type::Int, Value::Int(1)));
        assert!(!env.declare("x", Type::Float, Value::Float(2.0)));
        assert_eq!(env.lookup("x").map(|s| &s.value), Some(&Value::Int(1)));
    }

    #[test]
    fn test_block_scope_shadowing() {
        let mut env = Environment::new();
        env.push_frame(frame());
        env.declare("x", Type::Int, Value::Int(1));

        env.enter_scope();
        assert!(env.declare("x", Type::Int, Value::Int(2)));
        assert_eq!(env.lookup("x").map(|s| &s.value), Some(&Value::Int(2)));
        env.exit_scope();

        assert_eq!(env.lookup("x").map(|s| &s.value), Some(&Value::Int(1)));
    }

    #[test]
    fn test_parameter_scope_survives_extra_exit() {
        let mut env = Environment::new();
        env.push_frame(frame());
        env.declare("p", Type::Int, Value::Int(3));
        env.exit_scope();

        assert_eq!(env.current_frame().map(Frame::scope_depth), Some(1));
        assert!(env.lookup("p").is_some());
    }

    #[test]
    fn test_lookup_mut_writes_through() {
        let mut env = Environment::new();
        env.declare("g", Type::Int, Value::Int(0));
        env.push_frame(frame());
        if let Some(slot) = env.lookup_mut("g") {
            slot.value = Value::Int(9);
        }
        env.pop_frame();
        assert_eq!(env.lookup("g").map(|s| &s.value), Some(&Value::Int(9)));
    }
}
