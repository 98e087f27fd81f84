//! # Introduction
//!
//! `csubset` lexes, parses and executes CSubset, a small C-like teaching
//! dialect with `int`, `float` and `string` values, fixed-size arrays,
//! structs, unions, recursive functions and a handful of I/O built-ins.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST + TypeRegistry → Interpreter → Terminal
//! ```
//!
//! 1. [`parser`]: tokenizes the source (resolving `#define`s) and builds an
//!    AST, registering struct/union layouts and function signatures in a
//!    [`registry::TypeRegistry`] as they are declared.
//! 2. [`interpreter`]: walks the AST, evaluating expressions to tagged
//!    [`memory::value::Value`]s held in a [`memory::environment::Environment`].
//! 3. [`terminal`]: the I/O boundary the built-ins write to and read from.
//! 4. [`error`]: one [`Error`] for every stage, classified by [`ErrorKind`].
//!
//! ## Example
//!
//! ```
//! let output = csubset::run_captured(
//!     "int main() { int x = stoi(\"41\") + 1; print(x); return 0; }",
//!     "",
//! )
//! .unwrap();
//! assert_eq!(output, "42\n");
//! ```
//!
//! Library code only emits [`tracing`] events; installing a subscriber is
//! up to the host.

pub mod error;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod registry;
pub mod terminal;

pub use error::{Error, ErrorKind};
pub use interpreter::engine::{Interpreter, InterpreterConfig};
pub use memory::value::Value;
pub use terminal::Terminal;

use parser::ast::Program;
use std::io::Cursor;

/// Tokenize and parse a source buffer
pub fn compile(source: &str) -> Result<Program, Error> {
    let tokens = parser::lexer::tokenize(source)?;
    Ok(parser::parse(tokens)?)
}

/// Run a program with default limits against in-memory input, returning
/// everything it printed
pub fn run_captured(source: &str, input: &str) -> Result<String, Error> {
    let program = compile(source)?;
    let terminal = Terminal::captured(Cursor::new(input.to_string()));
    let mut interpreter = Interpreter::new(program, InterpreterConfig::default(), terminal);
    interpreter.run()?;
    Ok(interpreter
        .terminal()
        .captured_output()
        .unwrap_or_default()
        .to_string())
}
