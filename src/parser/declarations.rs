//! Declaration parsing implementation
//!
//! This module handles parsing of declarations in CSubset programs:
//!
//! - Struct and union definitions: `struct Name { ... };`
//! - Function definitions: `type name(params) { ... }`
//! - Variable and array declarations, local or global
//! - Type parsing: base types and fixed array dimensions
//!
//! # Grammar
//!
//! ```text
//! declaration  ::= aggregate_def | function_def | var_decl
//! aggregate_def ::= ("struct" | "union") identifier "{" field* "}" ";"
//! field        ::= type identifier dims ";"
//! function_def ::= type identifier "(" params ")" "{" statements "}"
//! var_decl     ::= type identifier dims ["=" (expression | init_list)] ";"
//! type         ::= "int" | "float" | "string" | "void"
//!                | "struct" identifier | "union" identifier
//! dims         ::= ("[" int_literal "]")*
//! ```
//!
//! Aggregate layouts and function signatures are registered in the parser's
//! [`TypeRegistry`](crate::registry::TypeRegistry) as soon as they are read.

use crate::interpreter::constants::BUILTINS;
use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use crate::registry::{AggregateDef, FunctionSig};
use tracing::trace;

impl Parser {
    /// Parse a top-level declaration (aggregate, function or global variable)
    pub(crate) fn parse_top_level_declaration(&mut self) -> Result<AstNode, ParseError> {
        // `struct Name {` is a definition; `struct Name x` is a declaration
        // using the type.
        let is_aggregate_def = matches!(self.peek_kind(), TokenKind::Struct | TokenKind::Union)
            && matches!(self.peek_ahead(1), Some(TokenKind::Ident(_)))
            && matches!(self.peek_ahead(2), Some(TokenKind::LBrace));
        if is_aggregate_def {
            return self.parse_aggregate_definition();
        }

        if !self.is_type_keyword() {
            return Err(self.error_here(format!(
                "Expected declaration, found {}",
                self.peek()
            )));
        }

        let loc = self.current_location();
        let base = self.parse_type()?;
        let name = self.expect_identifier("in declaration")?;

        if self.check(&TokenKind::LParen) {
            self.parse_function_definition(base, name, loc)
        } else {
            self.parse_variable_rest(base, name, loc)
        }
    }

    /// Parse struct or union definition: struct Name { fields };
    pub(crate) fn parse_aggregate_definition(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();
        let is_union = matches!(self.advance().kind, TokenKind::Union);
        let keyword = if is_union { "union" } else { "struct" };

        let name = self.expect_identifier(&format!("after '{}'", keyword))?;
        self.expect_lbrace(&format!("after {} name", keyword))?;

        let mut fields: Vec<Field> = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let field_loc = self.current_location();
            let base = self.parse_type()?;
            if base == Type::Void {
                return Err(ParseError::new("Fields cannot have type void", field_loc));
            }
            let field_name = self.expect_identifier(&format!("for {} field", keyword))?;
            let field_type = self.parse_array_dimensions(base)?;
            self.expect_semicolon(&format!("after {} field", keyword))?;

            if fields.iter().any(|f| f.name == field_name) {
                return Err(ParseError::new(
                    format!("Duplicate field '{}' in {} {}", field_name, keyword, name),
                    field_loc,
                ));
            }
            fields.push(Field {
                name: field_name,
                field_type,
            });
        }

        self.expect_rbrace(&format!("after {} fields", keyword))?;
        self.expect_semicolon(&format!("after {} definition", keyword))?;

        if fields.is_empty() {
            return Err(ParseError::new(
                format!("{} {} must declare at least one field", keyword, name),
                loc,
            ));
        }

        let def = AggregateDef {
            name: name.clone(),
            fields: fields.clone(),
        };
        let registered = if is_union {
            self.types.declare_union(def)
        } else {
            self.types.declare_struct(def)
        };
        registered.map_err(|e| ParseError::from_registry(e, loc))?;

        Ok(if is_union {
            AstNode::UnionDef {
                name,
                fields,
                location: loc,
            }
        } else {
            AstNode::StructDef {
                name,
                fields,
                location: loc,
            }
        })
    }

    /// Parse the rest of a function definition: (params) { body }
    ///
    /// The signature is registered before the body is read so the body can
    /// call the function recursively.
    pub(crate) fn parse_function_definition(
        &mut self,
        return_type: Type,
        name: String,
        loc: SourceLocation,
    ) -> Result<AstNode, ParseError> {
        if BUILTINS.contains(&name.as_str()) {
            return Err(ParseError::new(
                format!("Cannot define function '{}': name is reserved for a built-in", name),
                loc,
            ));
        }

        self.expect_lparen("after function name")?;
        let params = self.parse_parameter_list()?;
        self.expect_rparen("after parameters")?;

        self.types
            .declare_function(FunctionSig {
                name: name.clone(),
                params: params.clone(),
                return_type: return_type.clone(),
            })
            .map_err(|e| ParseError::from_registry(e, loc))?;
        trace!(function = %name, params = params.len(), "registered function");

        self.expect_lbrace("before function body")?;
        let body = self.parse_block_statements()?;
        self.expect_rbrace("after function body")?;

        Ok(AstNode::FunctionDef(FunctionDef {
            name,
            params,
            return_type,
            body,
            location: loc,
        }))
    }

    /// Parse parameter list: (type name, type name, ...)
    pub(crate) fn parse_parameter_list(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params: Vec<Param> = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(params);
        }

        // (void) means no parameters
        if self.check(&TokenKind::Void) && matches!(self.peek_ahead(1), Some(TokenKind::RParen)) {
            self.advance();
            return Ok(params);
        }

        loop {
            let loc = self.current_location();
            let base = self.parse_type()?;
            if base == Type::Void {
                return Err(ParseError::new("Parameters cannot have type void", loc));
            }
            let name = self.expect_identifier("for parameter")?;
            let param_type = self.parse_array_dimensions(base)?;

            if params.iter().any(|p| p.name == name) {
                return Err(ParseError::new(
                    format!("Duplicate parameter '{}'", name),
                    loc,
                ));
            }
            params.push(Param { name, param_type });

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse a variable declaration statement starting at its type
    pub(crate) fn parse_variable_declaration(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();
        let base = self.parse_type()?;
        let name = self.expect_identifier("in variable declaration")?;
        self.parse_variable_rest(base, name, loc)
    }

    /// Parse everything after `type name` in a variable declaration
    fn parse_variable_rest(
        &mut self,
        base: Type,
        name: String,
        loc: SourceLocation,
    ) -> Result<AstNode, ParseError> {
        if base == Type::Void {
            return Err(ParseError::new(
                format!("Variable '{}' cannot have type void", name),
                loc,
            ));
        }

        let declared = self.parse_array_dimensions(base)?;
        let node = match declared {
            Type::Array(element_type, size) => {
                let init = if self.match_token(&TokenKind::Eq) {
                    let array_type = Type::Array(element_type.clone(), size);
                    Some(self.parse_initializer_list(&array_type)?)
                } else {
                    None
                };
                AstNode::ArrayDecl {
                    name,
                    element_type: *element_type,
                    size,
                    init,
                    location: loc,
                }
            }
            var_type => {
                let init = if self.match_token(&TokenKind::Eq) {
                    Some(Box::new(self.parse_expression()?))
                } else {
                    None
                };
                AstNode::VarDecl {
                    name,
                    var_type,
                    init,
                    location: loc,
                }
            }
        };

        self.expect_semicolon("after variable declaration")?;
        Ok(node)
    }

    /// Parse `{ item, item, ... }` for an array of type `array_type`.
    ///
    /// Nested arrays need nested braces. Fewer items than the size is fine;
    /// the rest are zero-filled at runtime.
    fn parse_initializer_list(&mut self, array_type: &Type) -> Result<Vec<Initializer>, ParseError> {
        let loc = self.current_location();
        let (element_type, size) = match array_type {
            Type::Array(element, size) => (element.as_ref(), *size),
            _ => return Err(ParseError::new("Initializer list needs an array type", loc)),
        };

        self.expect_lbrace("to start initializer list")?;
        let mut items = Vec::new();

        while !self.check(&TokenKind::RBrace) {
            let item_loc = self.current_location();
            if items.len() == size {
                return Err(ParseError::new(
                    format!("Too many initializers for array of size {}", size),
                    item_loc,
                ));
            }

            let item = if matches!(element_type, Type::Array(..)) {
                Initializer::List(self.parse_initializer_list(element_type)?, item_loc)
            } else {
                Initializer::Expr(self.parse_expression()?)
            };
            items.push(item);

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_rbrace("to close initializer list")?;
        Ok(items)
    }

    /// Parse a base type: int | float | string | void | struct N | union N
    ///
    /// Aggregate names must already be declared.
    pub(crate) fn parse_type(&mut self) -> Result<Type, ParseError> {
        let loc = self.current_location();
        let ty = match self.peek_kind() {
            TokenKind::Int => Type::Int,
            TokenKind::Float => Type::Float,
            TokenKind::Str => Type::String,
            TokenKind::Void => Type::Void,
            TokenKind::Struct | TokenKind::Union => {
                let is_union = self.check(&TokenKind::Union);
                self.advance();
                let name = self.expect_identifier("after aggregate keyword")?;
                let ty = if is_union {
                    Type::Union(name)
                } else {
                    Type::Struct(name)
                };
                if !self.types.is_complete(&ty) {
                    return Err(ParseError::new(format!("Unknown type {}", ty), loc));
                }
                return Ok(ty);
            }
            _ => return Err(self.error_here(format!("Expected type, found {}", self.peek()))),
        };
        self.advance();
        Ok(ty)
    }

    /// Parse `[N][M]...` after a declarator name, wrapping `base`.
    ///
    /// `int m[2][3]` is an array of 2 arrays of 3 ints.
    pub(crate) fn parse_array_dimensions(&mut self, base: Type) -> Result<Type, ParseError> {
        let mut dims = Vec::new();
        while self.match_token(&TokenKind::LBracket) {
            let size = match self.peek_kind() {
                TokenKind::IntLiteral(n) if *n > 0 => *n as usize,
                _ => {
                    return Err(self.error_here(format!(
                        "Array size must be a positive integer literal, found {}",
                        self.peek()
                    )))
                }
            };
            self.advance();
            dims.push(size);
            self.expect_token(&TokenKind::RBracket, "after array size")?;
        }

        Ok(dims
            .into_iter()
            .rev()
            .fold(base, |ty, size| ty.array_of(size)))
    }
}
