//! Type registry
//!
//! Holds the struct and union layouts and the function signatures of one
//! program. Struct and union names share one tag namespace. The parser fills it while reading declarations, so later
//! declarations can name an aggregate type; the interpreter consults it for
//! field types, zero values and call validation. A registry lives exactly as
//! long as the [`Program`](crate::parser::ast::Program) that owns it.

use crate::memory::value::Value;
use crate::parser::ast::{Field, Param, Type};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Failure to resolve a type-level name
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("struct '{0}' is already declared")]
    DuplicateStruct(String),

    #[error("union '{0}' is already declared")]
    DuplicateUnion(String),

    #[error("'{name}' is already declared as a {kind}")]
    TagInUse { name: String, kind: &'static str },

    #[error("function '{0}' is already defined")]
    DuplicateFunction(String),

    #[error("struct '{0}' is not declared")]
    UnknownStruct(String),

    #[error("union '{0}' is not declared")]
    UnknownUnion(String),

    #[error("{owner} has no field '{field}'")]
    UnknownField { owner: String, field: String },

    #[error("type {0} has no values")]
    NoValue(Type),
}

/// Ordered field list of a struct or union
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateDef {
    pub name: String,
    pub fields: Vec<Field>,
}

impl AggregateDef {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Signature of a user-defined function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSig {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Type,
}

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    structs: FxHashMap<String, AggregateDef>,
    unions: FxHashMap<String, AggregateDef>,
    functions: FxHashMap<String, FunctionSig>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_struct(&mut self, def: AggregateDef) -> Result<(), RegistryError> {
        if self.structs.contains_key(&def.name) {
            return Err(RegistryError::DuplicateStruct(def.name));
        }
        if self.unions.contains_key(&def.name) {
            return Err(RegistryError::TagInUse {
                name: def.name,
                kind: "union",
            });
        }
        self.structs.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn declare_union(&mut self, def: AggregateDef) -> Result<(), RegistryError> {
        if self.unions.contains_key(&def.name) {
            return Err(RegistryError::DuplicateUnion(def.name));
        }
        if self.structs.contains_key(&def.name) {
            return Err(RegistryError::TagInUse {
                name: def.name,
                kind: "struct",
            });
        }
        self.unions.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn declare_function(&mut self, sig: FunctionSig) -> Result<(), RegistryError> {
        if self.functions.contains_key(&sig.name) {
            return Err(RegistryError::DuplicateFunction(sig.name));
        }
        self.functions.insert(sig.name.clone(), sig);
        Ok(())
    }

    pub fn struct_def(&self, name: &str) -> Result<&AggregateDef, RegistryError> {
        self.structs
            .get(name)
            .ok_or_else(|| RegistryError::UnknownStruct(name.to_string()))
    }

    pub fn union_def(&self, name: &str) -> Result<&AggregateDef, RegistryError> {
        self.unions
            .get(name)
            .ok_or_else(|| RegistryError::UnknownUnion(name.to_string()))
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSig> {
        self.functions.get(name)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Whether every aggregate named by `ty` has been declared
    pub fn is_complete(&self, ty: &Type) -> bool {
        match ty {
            Type::Array(element, _) => self.is_complete(element),
            Type::Struct(name) => self.structs.contains_key(name),
            Type::Union(name) => self.unions.contains_key(name),
            Type::Void => false,
            Type::Int | Type::Float | Type::String => true,
        }
    }

    /// Declared type of `field` inside the struct or union type `owner`
    pub fn field_type(&self, owner: &Type, field: &str) -> Result<&Type, RegistryError> {
        let def = match owner {
            Type::Struct(name) => self.struct_def(name)?,
            Type::Union(name) => self.union_def(name)?,
            other => {
                return Err(RegistryError::UnknownField {
                    owner: other.to_string(),
                    field: field.to_string(),
                })
            }
        };

        def.field(field)
            .map(|f| &f.field_type)
            .ok_or_else(|| RegistryError::UnknownField {
                owner: owner.to_string(),
                field: field.to_string(),
            })
    }

    /// The value a freshly declared variable of type `ty` holds.
    ///
    /// Structs get every field zeroed recursively; unions activate their
    /// first field.
    pub fn zero_value(&self, ty: &Type) -> Result<Value, RegistryError> {
        match ty {
            Type::Int => Ok(Value::Int(0)),
            Type::Float => Ok(Value::Float(0.0)),
            Type::String => Ok(Value::String(String::new())),
            Type::Void => Err(RegistryError::NoValue(Type::Void)),
            Type::Array(element, size) => {
                let zero = self.zero_value(element)?;
                Ok(Value::Array(vec![zero; *size]))
            }
            Type::Struct(name) => {
                let def = self.struct_def(name)?;
                let fields = def
                    .fields
                    .iter()
                    .map(|f| Ok((f.name.clone(), self.zero_value(&f.field_type)?)))
                    .collect::<Result<Vec<_>, RegistryError>>()?;
                Ok(Value::Struct {
                    name: name.clone(),
                    fields,
                })
            }
            Type::Union(name) => {
                let def = self.union_def(name)?;
                let first = def
                    .fields
                    .first()
                    .ok_or_else(|| RegistryError::NoValue(ty.clone()))?;
                Ok(Value::Union {
                    name: name.clone(),
                    active: first.name.clone(),
                    value: Box::new(self.zero_value(&first.field_type)?),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> AggregateDef {
        AggregateDef {
            name: "Point".to_string(),
            fields: vec![
                Field {
                    name: "x".to_string(),
                    field_type: Type::Int,
                },
                Field {
                    name: "y".to_string(),
                    field_type: Type::Int,
                },
            ],
        }
    }

    #[test]
    fn test_duplicate_struct_is_rejected() {
        let mut types = TypeRegistry::new();
        types.declare_struct(point()).unwrap();
        assert_eq!(
            types.declare_struct(point()),
            Err(RegistryError::DuplicateStruct("Point".to_string()))
        );
    }

    #[test]
    fn test_struct_and_union_share_tag_namespace() {
        let mut types = TypeRegistry::new();
        types.declare_struct(point()).unwrap();
        assert_eq!(
            types.declare_union(point()),
            Err(RegistryError::TagInUse {
                name: "Point".to_string(),
                kind: "struct",
            })
        );
    }

    #[test]
    fn test_zero_value_of_nested_aggregate() {
        let mut types = TypeRegistry::new();
        types.declare_struct(point()).unwrap();
        types
            .declare_union(AggregateDef {
                name: "Data".to_string(),
                fields: vec![
                    Field {
                        name: "f".to_string(),
                        field_type: Type::Float,
                    },
                    Field {
                        name: "p".to_string(),
                        field_type: Type::Struct("Point".to_string()),
                    },
                ],
            })
            .unwrap();

        let zero = types
            .zero_value(&Type::Union("Data".to_string()).array_of(2))
            .unwrap();
        let expected_union = Value::Union {
            name: "Data".to_string(),
            active: "f".to_string(),
            value: Box::new(Value::Float(0.0)),
        };
        assert_eq!(zero, Value::Array(vec![expected_union.clone(), expected_union]));

        let point_zero = types.zero_value(&Type::Struct("Point".to_string())).unwrap();
        assert_eq!(
            point_zero,
            Value::Struct {
                name: "Point".to_string(),
                fields: vec![
                    ("x".to_string(), Value::Int(0)),
                    ("y".to_string(), Value::Int(0)),
                ],
            }
        );
    }

    #[test]
    fn test_field_type_lookup() {
        let mut types = TypeRegistry::new();
        types.declare_struct(point()).unwrap();
        let owner = Type::Struct("Point".to_string());

        assert_eq!(types.field_type(&owner, "y"), Ok(&Type::Int));
        assert!(matches!(
            types.field_type(&owner, "z"),
            Err(RegistryError::UnknownField { .. })
        ));
        assert!(matches!(
            types.field_type(&Type::Struct("Nope".to_string()), "x"),
            Err(RegistryError::UnknownStruct(_))
        ));
    }

    #[test]
    fn test_void_has_no_zero_value() {
        assert!(TypeRegistry::new().zero_value(&Type::Void).is_err());
    }
}
