//! Crate-level error type
//!
//! [`Error`] wraps the failure of each pipeline stage so a host can report
//! any of them through one channel, keyed by [`ErrorKind`] and line.

use crate::interpreter::errors::RuntimeError;
use crate::parser::lexer::LexError;
use crate::parser::ParseError;
use std::fmt;
use thiserror::Error;

/// Any error produced while lexing, parsing or running a program
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lexical(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Error taxonomy reported to hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    LexicalError,
    SyntaxError,
    TypeError,
    ArityError,
    UndefinedReferenceError,
    IndexOutOfBoundsError,
    ConversionError,
    FormatError,
    StackOverflow,
    DivisionByZero,
    IntegerOverflow,
    Redeclaration,
    MissingReturn,
    NoEntryPoint,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::LexicalError => "LexicalError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ArityError => "ArityError",
            ErrorKind::UndefinedReferenceError => "UndefinedReferenceError",
            ErrorKind::IndexOutOfBoundsError => "IndexOutOfBoundsError",
            ErrorKind::ConversionError => "ConversionError",
            ErrorKind::FormatError => "FormatError",
            ErrorKind::StackOverflow => "StackOverflow",
            ErrorKind::DivisionByZero => "DivisionByZero",
            ErrorKind::IntegerOverflow => "IntegerOverflow",
            ErrorKind::Redeclaration => "Redeclaration",
            ErrorKind::MissingReturn => "MissingReturn",
            ErrorKind::NoEntryPoint => "NoEntryPoint",
            ErrorKind::Io => "Io",
        };
        write!(f, "{}", name)
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lexical(_) => ErrorKind::LexicalError,
            Error::Syntax(_) => ErrorKind::SyntaxError,
            Error::Runtime(err) => match err {
                RuntimeError::TypeError { .. } => ErrorKind::TypeError,
                RuntimeError::ArgumentCountMismatch { .. } => ErrorKind::ArityError,
                RuntimeError::UndefinedVariable { .. }
                | RuntimeError::UndefinedFunction { .. }
                | RuntimeError::UndefinedType { .. } => ErrorKind::UndefinedReferenceError,
                RuntimeError::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfBoundsError,
                RuntimeError::Conversion { .. } => ErrorKind::ConversionError,
                RuntimeError::Format { .. } => ErrorKind::FormatError,
                RuntimeError::StackOverflow { .. } => ErrorKind::StackOverflow,
                RuntimeError::DivisionByZero { .. } => ErrorKind::DivisionByZero,
                RuntimeError::IntegerOverflow { .. } => ErrorKind::IntegerOverflow,
                RuntimeError::Redeclaration { .. } => ErrorKind::Redeclaration,
                RuntimeError::MissingReturn { .. } => ErrorKind::MissingReturn,
                RuntimeError::NoEntryPoint { .. } => ErrorKind::NoEntryPoint,
                RuntimeError::Io { .. } => ErrorKind::Io,
            },
        }
    }

    /// Source line the error points at, when it has one
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Lexical(err) => Some(err.location().line),
            Error::Syntax(err) => Some(err.location.line),
            Error::Runtime(err) => err.location().map(|loc| loc.line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::SourceLocation;

    #[test]
    fn test_kind_and_line() {
        let err = Error::from(RuntimeError::ArgumentCountMismatch {
            function: "add".to_string(),
            expected: 2,
            got: 1,
            location: SourceLocation::new(7, 12),
        });
        assert_eq!(err.kind(), ErrorKind::ArityError);
        assert_eq!(err.line(), Some(7));
        assert_eq!(err.kind().to_string(), "ArityError");

        let err = Error::from(RuntimeError::NoEntryPoint {
            name: "main".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::NoEntryPoint);
        assert_eq!(err.line(), None);
    }
}
