use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{AstNode, CaseLabel, CaseNode, SourceLocation, Type};

impl Interpreter {
    /// Evaluate the return value against the current function's return type
    pub(crate) fn execute_return(
        &mut self,
        expr: Option<&AstNode>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let return_type = self
            .env
            .current_frame()
            .map(|frame| frame.return_type.clone())
            .unwrap_or(Type::Void);

        self.return_value = match (expr, &return_type) {
            (Some(ret_expr), Type::Void) => {
                let val = self.evaluate_expr(ret_expr)?;
                return Err(RuntimeError::type_error("void", val.type_name(), location));
            }
            (Some(ret_expr), declared) => {
                let val = self.evaluate_expr(ret_expr)?;
                Some(self.coerce_value_to_type(val, declared, location)?)
            }
            (None, Type::Void) => None,
            (None, declared) => {
                return Err(RuntimeError::type_error(
                    declared.to_string(),
                    "void",
                    location,
                ))
            }
        };

        self.control_flow = ControlFlow::Return;
        Ok(())
    }

    /// Source-order case matching with fallthrough until `break`.
    ///
    /// The scrutinee is evaluated once; `default` runs only when no case
    /// matches, wherever it appears.
    pub(crate) fn execute_switch(
        &mut self,
        expr: &AstNode,
        cases: &[CaseNode],
    ) -> Result<(), RuntimeError> {
        let switch_val = self.evaluate_expr(expr)?;

        let mut match_index: Option<usize> = None;
        let mut default_index: Option<usize> = None;

        for (i, case) in cases.iter().enumerate() {
            match case {
                CaseNode::Case { value, .. } => {
                    if Self::values_equal(&switch_val, &Self::label_value(value)) {
                        match_index = Some(i);
                        break;
                    }
                }
                CaseNode::Default { .. } => {
                    default_index = Some(i);
                }
            }
        }

        let Some(start) = match_index.or(default_index) else {
            return Ok(());
        };

        self.env.enter_scope();
        let result = self.run_cases(&cases[start..]);
        self.env.exit_scope();
        result?;

        if self.control_flow == ControlFlow::Break {
            self.control_flow = ControlFlow::Normal;
        }
        Ok(())
    }

    fn run_cases(&mut self, cases: &[CaseNode]) -> Result<(), RuntimeError> {
        for case in cases {
            let statements = match case {
                CaseNode::Case { statements, .. } | CaseNode::Default { statements, .. } => {
                    statements
                }
            };
            self.execute_statements(statements)?;
            if self.control_flow != ControlFlow::Normal {
                break;
            }
        }
        Ok(())
    }

    fn label_value(label: &CaseLabel) -> Value {
        match label {
            CaseLabel::Int(n) => Value::Int(*n),
            CaseLabel::Float(x) => Value::Float(*x),
            CaseLabel::String(s) => Value::String(s.clone()),
        }
    }

    /// Case equality: numeric across int/float, exact for strings,
    /// never equal across kinds
    pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }
}
