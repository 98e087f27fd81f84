//! Memory model for the CSubset interpreter
//!
//! This module provides the core runtime abstractions:
//! - [`value`]: Runtime value representation (Int, Float, String, Array, Struct, Union, Void)
//! - [`environment`]: Global scope, call frames and block scopes
//!
//! There is no addressable memory: arrays, structs and unions are values that
//! are copied on assignment and on argument passing, the way C copies structs.

pub mod environment;
pub mod value;
