//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: struct/union definitions, functions, types and variables
//! - `statements`: Parsing statements (if, while, for, switch, etc.)
//! - `expressions`: Parsing expressions with precedence climbing
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::registry::{RegistryError, TypeRegistry};
use std::mem;
use thiserror::Error;
use tracing::debug;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Syntax error at {location}: {message}")]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        ParseError {
            message: message.into(),
            location,
        }
    }

    pub(crate) fn from_registry(err: RegistryError, location: SourceLocation) -> Self {
        ParseError::new(err.to_string(), location)
    }
}

/// Parse a token stream into a [`Program`]
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}

/// Recursive descent parser for CSubset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    /// Struct/union layouts and function signatures seen so far
    pub(crate) types: TypeRegistry,
    /// Number of enclosing loops and switches; `break` needs at least one
    pub(crate) breakable_depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let location = tokens
                .last()
                .map(|t| t.location)
                .unwrap_or(SourceLocation::new(1, 1));
            tokens.push(Token::new(TokenKind::Eof, location));
        }
        Self {
            tokens,
            position: 0,
            types: TypeRegistry::new(),
            breakable_depth: 0,
        }
    }

    /// Parse the entire program (top-level declarations)
    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut nodes = Vec::new();

        while !self.is_at_end() {
            let decl = self.parse_top_level_declaration()?;
            nodes.push(decl);
        }

        let program = Program {
            nodes,
            types: self.types,
        };
        debug!(
            declarations = program.nodes.len(),
            functions = program.types.function_count(),
            "parsed program"
        );
        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn is_type_keyword(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Int
                | TokenKind::Float
                | TokenKind::Str
                | TokenKind::Void
                | TokenKind::Struct
                | TokenKind::Union
        )
    }

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(self.peek_kind()) == mem::discriminant(kind)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.position + n).map(|t| &t.kind)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    /// Error pointing at the current token
    pub(crate) fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.current_location())
    }

    pub(crate) fn expect_token(&mut self, kind: &TokenKind, ctx: &str) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_here(format!(
                "Expected {} {}, found {}",
                kind,
                ctx,
                self.peek()
            )))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::LParen, ctx)
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::RParen, ctx)
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::LBrace, ctx)
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::RBrace, ctx)
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::Semicolon, ctx)
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = self.peek_kind() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error_here(format!(
                "Expected identifier {}, found {}",
                ctx,
                self.peek()
            )))
        }
    }
}
