// Constants for the CSubset interpreter

/// Names resolved as intrinsics before any user-defined function
pub const BUILTINS: [&str; 6] = ["print", "puts", "printf", "scanf", "stoi", "stof"];

/// Default bound on nested user-function calls before `StackOverflow`
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Function executed by [`Interpreter::run`](crate::interpreter::engine::Interpreter::run)
pub const DEFAULT_ENTRY_POINT: &str = "main";

/// Fractional digits printed by `%f` without an explicit precision
pub const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Remaining host stack below which a call grows a new segment
pub const STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each host stack segment allocated for deep recursion
pub const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;
