//! Assignment to variables, array elements and struct/union fields
//!
//! The stored value is first coerced to the declared type of the target
//! (found by walking the place's path through the type registry), then
//! written through a mutable walk of the root variable. Writing a union
//! field makes it the active one; stepping through an inactive union field
//! activates it with that field's zero value first.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::ops::access::{checked_index, unknown_field, PathStep, Place};
use crate::memory::value::Value;
use crate::parser::ast::{AstNode, SourceLocation, Type};
use crate::registry::TypeRegistry;

impl Interpreter {
    /// Evaluate `lhs = rhs`, yielding the stored value
    pub(crate) fn execute_assignment(
        &mut self,
        lhs: &AstNode,
        rhs: &AstNode,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let place = self.resolve_place(lhs)?;
        let value = self.evaluate_expr(rhs)?;
        self.write_place(&place, value, location)
    }

    /// Coerce `value` to the place's declared type and store it
    pub(crate) fn write_place(
        &mut self,
        place: &Place,
        value: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let target_type = self.place_type(place)?;
        let value = self.coerce_value_to_type(value, &target_type, location)?;

        let types = &self.types;
        let slot = self
            .env
            .lookup_mut(&place.root)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: place.root.clone(),
                location: place.location,
            })?;

        let Some((last, prefix)) = place.steps.split_last() else {
            slot.value = value.clone();
            return Ok(value);
        };

        let mut current = &mut slot.value;
        for step in prefix {
            current = Self::step_mut(types, current, step)?;
        }
        Self::store(types, current, last, value.clone())?;

        Ok(value)
    }

    /// Mutable projection used on the way to the written element
    fn step_mut<'v>(
        types: &TypeRegistry,
        value: &'v mut Value,
        step: &PathStep,
    ) -> Result<&'v mut Value, RuntimeError> {
        match (step, value) {
            (PathStep::Index(index, loc), Value::Array(items)) => {
                let i = checked_index(*index, items.len(), *loc)?;
                Ok(&mut items[i])
            }

            (PathStep::Field(field, loc), Value::Struct { name, fields }) => fields
                .iter_mut()
                .find(|(field_name, _)| field_name == field)
                .map(|(_, v)| v)
                .ok_or_else(|| unknown_field(format!("struct {}", name), field, *loc)),

            (
                PathStep::Field(field, loc),
                Value::Union {
                    name,
                    active,
                    value,
                },
            ) => {
                if active != field {
                    let field_type = types
                        .field_type(&Type::Union(name.clone()), field)
                        .map_err(|e| RuntimeError::undefined_type(e, *loc))?;
                    let zero = types
                        .zero_value(field_type)
                        .map_err(|e| RuntimeError::undefined_type(e, *loc))?;
                    **value = zero;
                    *active = field.clone();
                }
                Ok(value.as_mut())
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

    /// Write the final step; a union field write replaces the active pair
    fn store(
        types: &TypeRegistry,
        target: &mut Value,
        step: &PathStep,
        new_value: Value,
    ) -> Result<(), RuntimeError> {
        if let (
            PathStep::Field(field, loc),
            Value::Union {
                name,
                active,
                value,
            },
        ) = (step, &mut *target)
        {
            types
                .field_type(&Type::Union(name.clone()), field)
                .map_err(|e| RuntimeError::undefined_type(e, *loc))?;
            *active = field.clone();
            **value = new_value;
            return Ok(());
        }

        let element = Self::step_mut(types, target, step)?;
        *element = new_value;
        Ok(())
    }
}
