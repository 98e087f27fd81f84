//! Expression operators, split by kind.
//!
//! Every module here only adds methods to the interpreter.

pub mod access;
pub mod assign;
pub mod binary;
pub mod unary;
