//! Runtime value representation
//!
//! This module defines the [`Value`] enum, the tagged union every CSubset
//! expression evaluates to.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 32-bit signed integer
//! - [`Value::Float`]: 64-bit floating point
//! - [`Value::String`]: owned text
//! - [`Value::Array`]: fixed-length sequence; the length is set at construction
//!   and no operation grows or shrinks it
//! - [`Value::Struct`]: named instance holding a value for every declared field,
//!   in declaration order
//! - [`Value::Union`]: named instance holding exactly one active `(field, value)` pair
//! - [`Value::Void`]: the result of calling a `void` function

use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Struct {
        name: String,
        fields: Vec<(String, Value)>,
    },
    Union {
        name: String,
        active: String,
        value: Box<Value>,
    },
    Void,
}

impl Value {
    /// Numeric view of Int and Float values
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short description of the runtime tag, used in error messages
    pub fn type_name(&self) -> String {
        match self {
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Array(items) => match items.first() {
                Some(first) => format!("{}[{}]", first.type_name(), items.len()),
                None => "array".to_string(),
            },
            Value::Struct { name, .. } => format!("struct {}", name),
            Value::Union { name, .. } => format!("union {}", name),
            Value::Void => "void".to_string(),
        }
    }

    /// Look up a struct field by name
    pub fn field(&self, field: &str) -> Option<&Value> {
        match self {
            Value::Struct { fields, .. } => fields
                .iter()
                .find(|(name, _)| name == field)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

/// Render a float with at least one fractional digit
pub fn format_float(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

/// Human-readable rendering used by `print`
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Struct { name, fields } => {
                write!(f, "{} {{ ", name)?;
                for (i, (field, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field, value)?;
                }
                write!(f, " }}")
            }
            Value::Union {
                name,
                active,
                value,
            } => write!(f, "{} {{ {}: {} }}", name, active, value),
            Value::Void => write!(f, "void"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_rendering() {
        assert_eq!(Value::Float(13.0).to_string(), "13.0");
        assert_eq!(Value::Float(3.14159).to_string(), "3.14159");
        assert_eq!(Value::Float(-0.5).to_string(), "-0.5");
    }

    #[test]
    fn test_aggregate_rendering() {
        let point = Value::Struct {
            name: "Point".to_string(),
            fields: vec![
                ("x".to_string(), Value::Int(100)),
                ("y".to_string(), Value::Int(200)),
            ],
        };
        assert_eq!(point.to_string(), "Point { x: 100, y: 200 }");

        let arr = Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(arr.to_string(), "[1, 2, 3]");
        assert_eq!(arr.type_name(), "int[3]");

        let data = Value::Union {
            name: "Data".to_string(),
            active: "i".to_string(),
            value: Box::new(Value::Int(42)),
        };
        assert_eq!(data.to_string(), "Data { i: 42 }");
    }

    #[test]
    fn test_field_lookup() {
        let point = Value::Struct {
            name: "Point".to_string(),
            fields: vec![("x".to_string(), Value::Int(7))],
        };
        assert_eq!(point.field("x"), Some(&Value::Int(7)));
        assert_eq!(point.field("y"), None);
        assert_eq!(Value::Int(1).field("x"), None);
    }
}
