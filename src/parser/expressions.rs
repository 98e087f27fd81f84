//! Expression parsing implementation
//!
//! This module handles parsing of CSubset expressions using one recursive
//! descent level per precedence tier.
//!
//! # Supported Expressions
//!
//! - Literals: integers, floats, strings
//! - Identifiers and variables
//! - Binary operators: arithmetic, comparison, short-circuit logical
//! - Unary operators: `-`, `!`
//! - Postfix: `[]`, `.`, `()`
//! - Assignment: `=` (right-associative, yields the stored value)
//!
//! # Precedence
//!
//! Lowest to highest: assignment, `||`, `&&`, `== !=`, `< <= > >=`, `+ -`,
//! `* / %`, unary, postfix/primary. All binary operators are left-associative.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        self.parse_assignment()
    }

    /// Parse assignment (right-associative)
    fn parse_assignment(&mut self) -> Result<AstNode, ParseError> {
        let expr = self.parse_logical_or()?;

        let loc = self.current_location();
        if self.match_token(&TokenKind::Eq) {
            if !expr.is_place() {
                return Err(ParseError::new(
                    "Invalid assignment target: expected variable, array element or field",
                    expr.location(),
                ));
            }
            let rhs = Box::new(self.parse_assignment()?);
            return Ok(AstNode::Assignment {
                lhs: Box::new(expr),
                rhs,
                location: loc,
            });
        }

        Ok(expr)
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.match_token(&TokenKind::OrOr) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_logical_and()?);
            left = AstNode::Logical {
                op: LogicOp::Or,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_equality()?;

        while self.match_token(&TokenKind::AndAnd) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_equality()?);
            left = AstNode::Logical {
                op: LogicOp::And,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_relational()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&TokenKind::EqEq) {
                BinOp::Eq
            } else if self.match_token(&TokenKind::NotEq) {
                BinOp::Ne
            } else {
                break;
            };

            let right = Box::new(self.parse_relational()?);
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse relational (< <= > >=)
    fn parse_relational(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&TokenKind::Lt) {
                BinOp::Lt
            } else if self.match_token(&TokenKind::Le) {
                BinOp::Le
            } else if self.match_token(&TokenKind::Gt) {
                BinOp::Gt
            } else if self.match_token(&TokenKind::Ge) {
                BinOp::Ge
            } else {
                break;
            };

            let right = Box::new(self.parse_additive()?);
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&TokenKind::Plus) {
                BinOp::Add
            } else if self.match_token(&TokenKind::Minus) {
                BinOp::Sub
            } else {
                break;
            };

            let right = Box::new(self.parse_multiplicative()?);
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&TokenKind::Star) {
                BinOp::Mul
            } else if self.match_token(&TokenKind::Slash) {
                BinOp::Div
            } else if self.match_token(&TokenKind::Percent) {
                BinOp::Mod
            } else {
                break;
            };

            let right = Box::new(self.parse_unary()?);
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse unary (! -)
    fn parse_unary(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        let op = if self.match_token(&TokenKind::Bang) {
            UnOp::Not
        } else if self.match_token(&TokenKind::Minus) {
            // `-N` folds into one literal so that INT_MIN is writable
            if let TokenKind::IntLiteral(n) = *self.peek_kind() {
                let value = self.int_literal_value(-n)?;
                self.advance();
                return Ok(AstNode::IntLiteral(value, loc));
            }
            UnOp::Neg
        } else {
            return self.parse_postfix();
        };

        let operand = Box::new(self.parse_unary()?);
        Ok(AstNode::UnaryOp {
            op,
            operand,
            location: loc,
        })
    }

    /// Parse postfix operators: [index], .field, (args)
    fn parse_postfix(&mut self) -> Result<AstNode, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let loc = self.current_location();

            if self.match_token(&TokenKind::LBracket) {
                let index = Box::new(self.parse_expression()?);
                self.expect_token(&TokenKind::RBracket, "after array index")?;
                expr = AstNode::ArrayAccess {
                    array: Box::new(expr),
                    index,
                    location: loc,
                };
            } else if self.match_token(&TokenKind::Dot) {
                let member = self.expect_identifier("after '.'")?;
                expr = AstNode::MemberAccess {
                    object: Box::new(expr),
                    member,
                    location: loc,
                };
            } else if self.match_token(&TokenKind::LParen) {
                let args = self.parse_argument_list()?;
                self.expect_rparen("after function arguments")?;

                let (name, call_loc) = if let AstNode::Variable(n, call_loc) = expr {
                    (n, call_loc)
                } else {
                    return Err(ParseError::new(
                        "Only named functions can be called",
                        loc,
                    ));
                };

                expr = AstNode::FunctionCall {
                    name,
                    args,
                    location: call_loc,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Narrow a lexed integer literal to `int`
    pub(crate) fn int_literal_value(&self, n: i64) -> Result<i32, ParseError> {
        i32::try_from(n)
            .map_err(|_| self.error_here(format!("Integer literal {} does not fit in int", n)))
    }

    /// Parse argument list: expr, expr, ...
    fn parse_argument_list(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut args = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(args)
    }

    /// Parse primary (literals, variables, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        let node = match self.peek_kind() {
            TokenKind::IntLiteral(n) => AstNode::IntLiteral(self.int_literal_value(*n)?, loc),
            TokenKind::FloatLiteral(x) => AstNode::FloatLiteral(*x, loc),
            TokenKind::StringLiteral(s) => AstNode::StringLiteral(s.clone(), loc),
            TokenKind::Ident(name) => AstNode::Variable(name.clone(), loc),
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                return Ok(expr);
            }
            _ => {
                return Err(self.error_here(format!(
                    "Expected expression, found {}",
                    self.peek()
                )))
            }
        };

        self.advance();
        Ok(node)
    }
}
