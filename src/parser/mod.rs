//! CSubset source code parser
//!
//! This module transforms CSubset source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens), including `#define` substitution
//! - [`parse`]: Parsing (tokens → AST), split across `declarations`,
//!   `statements` and `expressions`
//! - [`ast`]: AST node definitions
//!
//! # Supported Language
//!
//! - Types: `int`, `float`, `string`, `void`, structs, unions, fixed-size arrays
//! - Statements: declarations, assignments, control flow (`if`, `while`, `do`, `for`, `switch`)
//! - Expressions: arithmetic, comparison, short-circuit logical, calls, indexing, field access
//! - No pointers, casts or compound assignment
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one level per precedence tier.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{parse, ParseError, Parser};
