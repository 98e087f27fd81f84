//! CSubset interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Main interpreter, function calls and configuration
//! - [`errors`]: Runtime error types
//! - [`builtins`]: `print`, `puts`, `printf`, `scanf`, `stoi`, `stof`
//! - [`ops`]: Operators, element/field reads and assignment
//!
//! # Execution Model
//!
//! The interpreter walks the AST directly. Globals are initialized in source
//! order, then the entry point is called. `break` and `return` are carried as
//! a pending control-flow signal rather than as Rust errors, so runtime
//! errors are the only thing that unwinds through `?`.

pub mod builtins;
pub mod constants;
pub mod engine;
pub mod errors;
mod expressions;
mod jumps;
mod loops;
pub mod ops;
mod statements;
mod type_system;
