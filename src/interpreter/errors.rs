//! Runtime error types for the CSubset interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to lexical or syntax errors).
//!
//! All runtime errors are fatal - they unwind every pending call frame and
//! halt the run.

use crate::parser::ast::SourceLocation;
use crate::registry::RegistryError;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Value of the wrong type for an assignment, argument, return or operator
    #[error("Type error at {location}: expected {expected}, got {got}")]
    TypeError {
        expected: String,
        got: String,
        location: SourceLocation,
    },

    /// Function argument count mismatch
    #[error(
        "Function '{function}' expects {expected} argument{}, got {got} at {location}",
        if *.expected == 1 { "" } else { "s" }
    )]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    /// Undefined variable reference
    #[error("Undefined variable '{name}' at {location}")]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Undefined function call
    #[error("Undefined function '{name}' at {location}")]
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    /// Struct or union type, or one of their fields, not found
    #[error("Undefined type or field at {location}: {source}")]
    UndefinedType {
        source: RegistryError,
        location: SourceLocation,
    },

    /// Array index outside `[0, size)`
    #[error("Index out of bounds at {location}: index {index} for array of size {size}")]
    IndexOutOfBounds {
        index: i64,
        size: usize,
        location: SourceLocation,
    },

    /// `stoi`/`stof` given text without a numeric prefix
    #[error("Conversion error at {location}: {function}(\"{input}\") has no valid numeric prefix")]
    Conversion {
        function: String,
        input: String,
        location: SourceLocation,
    },

    /// printf/scanf placeholder and argument mismatch
    #[error("Format error at {location}: {message}")]
    Format {
        message: String,
        location: SourceLocation,
    },

    /// Call depth exceeded the configured limit
    #[error("Stack overflow at {location}: call depth exceeded the limit of {limit} calling '{function}'")]
    StackOverflow {
        function: String,
        limit: usize,
        location: SourceLocation,
    },

    /// Integer division or modulo by zero
    #[error("Division by zero in '{operation}' at {location}")]
    DivisionByZero {
        operation: String,
        location: SourceLocation,
    },

    /// Integer overflow in arithmetic operation
    #[error("Integer overflow in operation: {operation} at {location}")]
    IntegerOverflow {
        operation: String,
        location: SourceLocation,
    },

    /// Same name declared twice in one scope
    #[error("Variable '{name}' is already declared in this scope at {location}")]
    Redeclaration {
        name: String,
        location: SourceLocation,
    },

    /// Non-void function reached the end of its body
    #[error("Function '{function}' ended without returning a value at {location}")]
    MissingReturn {
        function: String,
        location: SourceLocation,
    },

    /// Entry point function not found
    #[error("No {name}() function found")]
    NoEntryPoint { name: String },

    /// Output sink or input source failed
    #[error("I/O error at {location}: {message}")]
    Io {
        message: String,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::TypeError { location, .. }
            | RuntimeError::ArgumentCountMismatch { location, .. }
            | RuntimeError::UndefinedVariable { location, .. }
            | RuntimeError::UndefinedFunction { location, .. }
            | RuntimeError::UndefinedType { location, .. }
            | RuntimeError::IndexOutOfBounds { location, .. }
            | RuntimeError::Conversion { location, .. }
            | RuntimeError::Format { location, .. }
            | RuntimeError::StackOverflow { location, .. }
            | RuntimeError::DivisionByZero { location, .. }
            | RuntimeError::IntegerOverflow { location, .. }
            | RuntimeError::Redeclaration { location, .. }
            | RuntimeError::MissingReturn { location, .. }
            | RuntimeError::Io { location, .. } => Some(location),
            RuntimeError::NoEntryPoint { .. } => None,
        }
    }

    /// Attach a location to a registry lookup failure
    pub fn undefined_type(source: RegistryError, location: SourceLocation) -> Self {
        RuntimeError::UndefinedType { source, location }
    }

    pub(crate) fn type_error(
        expected: impl Into<String>,
        got: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        RuntimeError::TypeError {
            expected: expected.into(),
            got: got.into(),
            location,
        }
    }

    pub(crate) fn io(err: std::io::Error, location: SourceLocation) -> Self {
        RuntimeError::Io {
            message: err.to_string(),
            location,
        }
    }
}
