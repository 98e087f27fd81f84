//! Array element and struct/union field reads
//!
//! An index or field chain rooted at a variable is resolved into a [`Place`]
//! (root name plus evaluated path) so reads and writes share one walk. Chains
//! rooted at any other expression, such as `make_point().x`, evaluate the
//! base and project out of the temporary.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{AstNode, SourceLocation, Type};
use crate::registry::RegistryError;
use std::borrow::Cow;

/// One step from an aggregate to one of its parts
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PathStep {
    Index(i64, SourceLocation),
    Field(String, SourceLocation),
}

/// A variable plus the evaluated index/field path into it
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Place {
    pub root: String,
    pub location: SourceLocation,
    pub steps: Vec<PathStep>,
}

/// Bounds-checked conversion of an index into a slice position
pub(crate) fn checked_index(
    index: i64,
    size: usize,
    location: SourceLocation,
) -> Result<usize, RuntimeError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < size)
        .ok_or(RuntimeError::IndexOutOfBounds {
            index,
            size,
            location,
        })
}

pub(crate) fn unknown_field(owner: String, field: &str, location: SourceLocation) -> RuntimeError {
    RuntimeError::undefined_type(
        RegistryError::UnknownField {
            owner,
            field: field.to_string(),
        },
        location,
    )
}

impl Interpreter {
    /// Resolve an identifier/index/field chain, evaluating indices left to right
    pub(crate) fn resolve_place(&mut self, expr: &AstNode) -> Result<Place, RuntimeError> {
        match expr {
            AstNode::Variable(name, loc) => Ok(Place {
                root: name.clone(),
                location: *loc,
                steps: Vec::new(),
            }),
            AstNode::ArrayAccess {
                array,
                index,
                location,
            } => {
                let mut place = self.resolve_place(array)?;
                let idx = self.evaluate_index(index, *location)?;
                place.steps.push(PathStep::Index(idx, *location));
                Ok(place)
            }
            AstNode::MemberAccess {
                object,
                member,
                location,
            } => {
                let mut place = self.resolve_place(object)?;
                place.steps.push(PathStep::Field(member.clone(), *location));
                Ok(place)
            }
            other => Err(RuntimeError::type_error(
                "variable, array element or field",
                "expression",
                other.location(),
            )),
        }
    }

    fn evaluate_index(&mut self, index: &AstNode, location: SourceLocation) -> Result<i64, RuntimeError> {
        match self.evaluate_expr(index)? {
            Value::Int(n) => Ok(n as i64),
            other => Err(RuntimeError::type_error(
                "int index",
                other.type_name(),
                location,
            )),
        }
    }

    /// Evaluate an `ArrayAccess` or `MemberAccess` expression
    pub(crate) fn evaluate_access(&mut self, expr: &AstNode) -> Result<Value, RuntimeError> {
        if expr.is_place() {
            let place = self.resolve_place(expr)?;
            return self.read_place(&place);
        }

        let (base, step) = match expr {
            AstNode::ArrayAccess {
                array,
                index,
                location,
            } => {
                let base = self.evaluate_expr(array)?;
                let idx = self.evaluate_index(index, *location)?;
                (base, PathStep::Index(idx, *location))
            }
            AstNode::MemberAccess {
                object,
                member,
                location,
            } => {
                let base = self.evaluate_expr(object)?;
                (base, PathStep::Field(member.clone(), *location))
            }
            other => return self.evaluate_expr(other),
        };

        Ok(self.project(&base, &step)?.into_owned())
    }

    /// Current value at a place
    pub(crate) fn read_place(&self, place: &Place) -> Result<Value, RuntimeError> {
        let slot = self
            .env
            .lookup(&place.root)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: place.root.clone(),
                location: place.location,
            })?;

        let mut current = Cow::Borrowed(&slot.value);
        for step in &place.steps {
            current = match current {
                Cow::Borrowed(value) => self.project(value, step)?,
                Cow::Owned(value) => Cow::Owned(self.project(&value, step)?.into_owned()),
            };
        }
        Ok(current.into_owned())
    }

    /// Declared type of the storage a place names
    pub(crate) fn place_type(&self, place: &Place) -> Result<Type, RuntimeError> {
        let slot = self
            .env
            .lookup(&place.root)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: place.root.clone(),
                location: place.location,
            })?;

        let mut ty = slot.declared_type.clone();
        for step in &place.steps {
            ty = match (step, ty) {
                (PathStep::Index(..), Type::Array(element, _)) => *element,
                (PathStep::Field(field, loc), owner @ (Type::Struct(_) | Type::Union(_))) => self
                    .types
                    .field_type(&owner, field)
                    .map_err(|e| RuntimeError::undefined_type(e, *loc))?
                    .clone(),
                (PathStep::Index(_, loc), other) => {
                    return Err(RuntimeError::type_error("array", other.to_string(), *loc))
                }
                (PathStep::Field(field, loc), other) => {
                    return Err(unknown_field(other.to_string(), field, *loc))
                }
            };
        }
        Ok(ty)
    }

    /// Take one step into `value`.
    ///
    /// Reading a union field that is not the active one coerces the active
    /// value to that field's declared type.
    pub(crate) fn project<'v>(
        &self,
        value: &'v Value,
        step: &PathStep,
    ) -> Result<Cow<'v, Value>, RuntimeError> {
        match (step, value) {
            (PathStep::Index(index, loc), Value::Array(items)) => {
                let i = checked_index(*index, items.len(), *loc)?;
                Ok(Cow::Borrowed(&items[i]))
            }

            (PathStep::Field(field, loc), Value::Struct { name, fields }) => fields
                .iter()
                .find(|(field_name, _)| field_name == field)
                .map(|(_, v)| Cow::Borrowed(v))
                .ok_or_else(|| unknown_field(format!("struct {}", name), field, *loc)),

            (
                PathStep::Field(field, loc),
                Value::Union {
                    name,
                    active,
                    value,
                },
            ) => {
                if active == field {
                    return Ok(Cow::Borrowed(value.as_ref()));
                }
                let field_type = self
                    .types
                    .field_type(&Type::Union(name.clone()), field)
                    .map_err(|e| RuntimeError::undefined_type(e, *loc))?;
                let reinterpreted =
                    self.coerce_value_to_type(value.as_ref().clone(), field_type, *loc)?;
                Ok(Cow::Owned(reinterpreted))
            }

            (PathStep::Index(_, loc), other) => Err(RuntimeError::type_error(
                "array",
                other.type_name(),
                *loc,
            )),

            (PathStep::Field(field, loc), other) => {
                Err(unknown_field(other.type_name(), field, *loc))
            }
        }
    }
}
