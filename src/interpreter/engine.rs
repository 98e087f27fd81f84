// Execution engine for the CSubset interpreter

use crate::interpreter::constants::{
    BUILTINS, DEFAULT_ENTRY_POINT, DEFAULT_MAX_CALL_DEPTH, STACK_GROW_SIZE, STACK_RED_ZONE,
};
use crate::interpreter::errors::RuntimeError;
use crate::memory::environment::{Environment, Frame};
use crate::memory::value::Value;
use crate::parser::ast::*;
use crate::registry::TypeRegistry;
use crate::terminal::Terminal;
use rustc_hash::FxHashMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// Runtime limits and entry point selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Nested user-function calls allowed before `StackOverflow`
    pub max_call_depth: usize,
    /// Function called by [`Interpreter::run`]
    pub entry_point: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        }
    }
}

/// Control-flow signal raised by `break` and `return`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlFlow {
    Normal,
    Break,
    Return,
}

/// The main interpreter that executes a CSubset program
pub struct Interpreter {
    /// Struct/union layouts and function signatures from the parser
    pub(crate) types: TypeRegistry,

    /// Function definitions (name -> FunctionDef)
    pub(crate) functions: FxHashMap<String, Rc<FunctionDef>>,

    /// Global declarations in source order
    pub(crate) globals: Rc<[AstNode]>,

    /// Global scope and call frames
    pub(crate) env: Environment,

    /// Output sink and input source
    pub(crate) terminal: Terminal,

    pub(crate) config: InterpreterConfig,

    /// Pending `break`/`return` signal
    pub(crate) control_flow: ControlFlow,

    /// Value carried by the last executed `return`
    pub(crate) return_value: Option<Value>,
}

impl Interpreter {
    /// Create a new interpreter for a parsed program
    pub fn new(program: Program, config: InterpreterConfig, terminal: Terminal) -> Self {
        let mut functions = FxHashMap::default();
        let mut globals = Vec::new();

        for node in program.nodes {
            match node {
                AstNode::FunctionDef(def) => {
                    functions.insert(def.name.clone(), Rc::new(def));
                }
                AstNode::StructDef { .. } | AstNode::UnionDef { .. } => {}
                decl => globals.push(decl),
            }
        }

        Interpreter {
            types: program.types,
            functions,
            globals: globals.into(),
            env: Environment::new(),
            terminal,
            config,
            control_flow: ControlFlow::Normal,
            return_value: None,
        }
    }

    /// Run the program: initialize globals, then call the entry point.
    ///
    /// Returns the entry point's result (`Value::Void` for a `void main`).
    /// Every run starts from a fresh environment, so running twice gives the
    /// same output for the same input.
    pub fn run(&mut self) -> Result<Value, RuntimeError> {
        self.env = Environment::new();
        self.control_flow = ControlFlow::Normal;
        self.return_value = None;

        debug!(
            entry_point = %self.config.entry_point,
            globals = self.globals.len(),
            "starting execution"
        );

        let globals = Rc::clone(&self.globals);
        for decl in globals.iter() {
            self.execute_statement(decl)?;
        }

        let entry = self
            .functions
            .get(&self.config.entry_point)
            .cloned()
            .ok_or_else(|| RuntimeError::NoEntryPoint {
                name: self.config.entry_point.clone(),
            })?;

        let result = self.invoke_function(&entry, Vec::new(), entry.location)?;
        debug!(result = %result, "execution finished");
        Ok(result)
    }

    /// The I/O boundary, e.g. to read captured output after a run
    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub fn into_terminal(self) -> Terminal {
        self.terminal
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Call a function by name: built-ins first, then user definitions
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if BUILTINS.contains(&name) {
            return self.call_builtin(name, args, location);
        }

        let function = self.functions.get(name).cloned().ok_or_else(|| {
            RuntimeError::UndefinedFunction {
                name: name.to_string(),
                location,
            }
        })?;

        // Arity is checked before any argument is evaluated
        Self::check_arity(&function, args.len(), location)?;

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate_expr(arg)?);
        }

        self.invoke_function(&function, values, location)
    }

    fn check_arity(
        function: &FunctionDef,
        got: usize,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if function.params.len() != got {
            return Err(RuntimeError::ArgumentCountMismatch {
                function: function.name.clone(),
                expected: function.params.len(),
                got,
                location,
            });
        }
        Ok(())
    }

    /// Bind evaluated arguments into a new frame and run the body
    pub(crate) fn invoke_function(
        &mut self,
        function: &FunctionDef,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        Self::check_arity(function, args.len(), location)?;

        if self.env.depth() >= self.config.max_call_depth {
            return Err(RuntimeError::StackOverflow {
                function: function.name.clone(),
                limit: self.config.max_call_depth,
                location,
            });
        }

        let mut bound = Vec::with_capacity(args.len());
        for (param, arg) in function.params.iter().zip(args) {
            bound.push(self.coerce_value_to_type(arg, &param.param_type, location)?);
        }

        trace!(
            function = %function.name,
            depth = self.env.depth() + 1,
            "calling function"
        );

        self.env.push_frame(Frame::new(function.return_type.clone()));
        for (param, value) in function.params.iter().zip(bound) {
            self.env
                .declare(&param.name, param.param_type.clone(), value);
        }

        // Parameters and top-level locals share the frame's base scope.
        // The host stack grows on demand so `max_call_depth` is always reachable.
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.execute_statements(&function.body)
        });
        self.env.pop_frame();
        result?;

        let flow = std::mem::replace(&mut self.control_flow, ControlFlow::Normal);
        let returned = self.return_value.take();

        match (flow, returned) {
            (ControlFlow::Return, Some(value)) => Ok(value),
            _ if function.return_type == Type::Void => Ok(Value::Void),
            _ => Err(RuntimeError::MissingReturn {
                function: function.name.clone(),
                location: function.location,
            }),
        }
    }
}
