//! Statement parsing implementation
//!
//! This module handles parsing of all CSubset statement types:
//!
//! - Variable declarations: `int x = 42;`, `int a[3] = {1, 2, 3};`
//! - Control flow: `if`, `while`, `for`, `do-while`, `switch`
//! - Jump statements: `return`, `break`
//! - Compound statements: `{ ... }`
//! - Expression statements: function calls, assignments
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | if_stmt | while_stmt | for_stmt
//!             | do_while_stmt | switch_stmt | return_stmt
//!             | break_stmt | block | expr_stmt
//! case_label ::= int_literal | float_literal | string_literal
//!              | "-" (int_literal | float_literal)
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse block statements (inside braces, excluding the braces themselves)
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        if self.match_token(&TokenKind::Return) {
            return self.parse_return_statement();
        }

        if self.match_token(&TokenKind::If) {
            return self.parse_if_statement();
        }

        if self.match_token(&TokenKind::While) {
            return self.parse_while_statement();
        }

        if self.match_token(&TokenKind::Do) {
            return self.parse_do_while_statement();
        }

        if self.match_token(&TokenKind::For) {
            return self.parse_for_statement();
        }

        if self.match_token(&TokenKind::Switch) {
            return self.parse_switch_statement();
        }

        if self.match_token(&TokenKind::Break) {
            if self.breakable_depth == 0 {
                return Err(ParseError::new(
                    "'break' is only allowed inside a loop or switch",
                    loc,
                ));
            }
            self.expect_semicolon("after 'break'")?;
            return Ok(AstNode::Break { location: loc });
        }

        if self.match_token(&TokenKind::LBrace) {
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after block")?;
            return Ok(AstNode::Block {
                statements,
                location: loc,
            });
        }

        if self.is_type_keyword() {
            return self.parse_variable_declaration();
        }

        // Otherwise, it's an expression statement
        let expr = self.parse_expression()?;
        self.expect_semicolon("after expression")?;
        Ok(AstNode::ExpressionStatement {
            expr: Box::new(expr),
            location: loc,
        })
    }

    /// Parse return statement
    fn parse_return_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        let expr = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        self.expect_semicolon("after return")?;

        Ok(AstNode::Return {
            expr,
            location: loc,
        })
    }

    /// Parse if statement
    fn parse_if_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'if'")?;
        let condition = Box::new(self.parse_expression()?);
        self.expect_rparen("after if condition")?;

        let then_branch = self.parse_statement_or_block()?;

        let else_branch = if self.match_token(&TokenKind::Else) {
            Some(self.parse_statement_or_block()?)
        } else {
            None
        };

        Ok(AstNode::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'while'")?;
        let condition = Box::new(self.parse_expression()?);
        self.expect_rparen("after while condition")?;

        let body = self.parse_breakable_body()?;

        Ok(AstNode::While {
            condition,
            body,
            location: loc,
        })
    }

    /// Parse do-while statement
    fn parse_do_while_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        let body = self.parse_breakable_body()?;

        self.expect_token(&TokenKind::While, "after do body")?;
        self.expect_lparen("after 'while'")?;
        let condition = Box::new(self.parse_expression()?);
        self.expect_rparen("after do-while condition")?;
        self.expect_semicolon("after do-while")?;

        Ok(AstNode::DoWhile {
            body,
            condition,
            location: loc,
        })
    }

    /// Parse for statement
    fn parse_for_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'for'")?;

        // Init (optional)
        let init = if self.match_token(&TokenKind::Semicolon) {
            None
        } else if self.is_type_keyword() {
            // Declaration consumes its own semicolon
            Some(Box::new(self.parse_variable_declaration()?))
        } else {
            let init_loc = self.current_location();
            let expr = self.parse_expression()?;
            self.expect_semicolon("after for init")?;
            Some(Box::new(AstNode::ExpressionStatement {
                expr: Box::new(expr),
                location: init_loc,
            }))
        };

        // Condition (optional)
        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect_semicolon("after for condition")?;

        // Increment (optional)
        let increment = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect_rparen("after for clauses")?;

        let body = self.parse_breakable_body()?;

        Ok(AstNode::For {
            init,
            condition,
            increment,
            body,
            location: loc,
        })
    }

    /// Parse switch statement
    fn parse_switch_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'switch'")?;
        let expr = Box::new(self.parse_expression()?);
        self.expect_rparen("after switch expression")?;
        self.expect_lbrace("before switch body")?;

        self.breakable_depth += 1;
        let cases = self.parse_switch_cases();
        self.breakable_depth -= 1;
        let cases = cases?;

        self.expect_rbrace("after switch body")?;

        Ok(AstNode::Switch {
            expr,
            cases,
            location: loc,
        })
    }

    fn parse_switch_cases(&mut self) -> Result<Vec<CaseNode>, ParseError> {
        let mut cases = Vec::new();
        let mut seen_default = false;

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let case_loc = self.current_location();
            if self.match_token(&TokenKind::Case) {
                let value = self.parse_case_label()?;
                self.expect_token(&TokenKind::Colon, "after case value")?;
                let statements = self.parse_case_body()?;

                cases.push(CaseNode::Case {
                    value,
                    statements,
                    location: case_loc,
                });
            } else if self.match_token(&TokenKind::Default) {
                if seen_default {
                    return Err(ParseError::new(
                        "Multiple 'default' labels in one switch",
                        case_loc,
                    ));
                }
                seen_default = true;
                self.expect_token(&TokenKind::Colon, "after 'default'")?;
                let statements = self.parse_case_body()?;

                cases.push(CaseNode::Default {
                    statements,
                    location: case_loc,
                });
            } else {
                return Err(self.error_here(format!(
                    "Expected 'case' or 'default' in switch body, found {}",
                    self.peek()
                )));
            }
        }

        Ok(cases)
    }

    /// Statements up to the next label or the end of the switch
    fn parse_case_body(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut statements = Vec::new();
        while !self.check(&TokenKind::Case)
            && !self.check(&TokenKind::Default)
            && !self.check(&TokenKind::RBrace)
            && !self.is_at_end()
        {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    /// Parse a case label literal, allowing a leading minus on numbers
    fn parse_case_label(&mut self) -> Result<CaseLabel, ParseError> {
        let negate = self.match_token(&TokenKind::Minus);
        let label = match self.peek_kind() {
            TokenKind::IntLiteral(n) => {
                CaseLabel::Int(self.int_literal_value(if negate { -n } else { *n })?)
            }
            TokenKind::FloatLiteral(x) => CaseLabel::Float(if negate { -x } else { *x }),
            TokenKind::StringLiteral(s) if !negate => CaseLabel::String(s.clone()),
            _ => {
                return Err(self.error_here(format!(
                    "Expected literal case value, found {}",
                    self.peek()
                )))
            }
        };
        self.advance();
        Ok(label)
    }

    /// Loop body with `break` allowed inside
    fn parse_breakable_body(&mut self) -> Result<Vec<AstNode>, ParseError> {
        self.breakable_depth += 1;
        let body = self.parse_statement_or_block();
        self.breakable_depth -= 1;
        body
    }

    /// Parse statement or block (for if/while/for bodies)
    pub(crate) fn parse_statement_or_block(&mut self) -> Result<Vec<AstNode>, ParseError> {
        if self.match_token(&TokenKind::LBrace) {
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after block")?;
            Ok(statements)
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::parse;

    fn main_body(body: &str) -> Vec<AstNode> {
        let source = format!("void main() {{ {} }}", body);
        let program = parse(tokenize(&source).unwrap()).unwrap();
        let body = program.functions().next().unwrap().body.clone();
        body
    }

    #[test]
    fn test_switch_cases_in_source_order() {
        let body = main_body(
            "int v = 2; switch (v) { case 1: puts(\"a\"); case -2: break; default: puts(\"d\"); }",
        );

        match &body[1] {
            AstNode::Switch { cases, .. } => {
                assert_eq!(cases.len(), 3);
                assert!(matches!(
                    &cases[0],
                    CaseNode::Case { value: CaseLabel::Int(1), statements, .. } if statements.len() == 1
                ));
                assert!(matches!(
                    &cases[1],
                    CaseNode::Case {
                        value: CaseLabel::Int(-2),
                        ..
                    }
                ));
                assert!(matches!(&cases[2], CaseNode::Default { .. }));
            }
            other => panic!("Expected switch, got {:?}", other),
        }
    }

    #[test]
    fn test_for_with_declaration() {
        let body = main_body("for (int k = 0; k < 3; k = k + 1) { print(k); }");

        match &body[0] {
            AstNode::For {
                init: Some(init),
                condition: Some(_),
                increment: Some(_),
                body,
                ..
            } => {
                assert!(matches!(init.as_ref(), AstNode::VarDecl { .. }));
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected for loop, got {:?}", other),
        }
    }

    #[test]
    fn test_do_while_and_break() {
        let body = main_body("int c = 0; do { c = c + 1; if (c > 2) break; } while (c < 10);");
        assert!(matches!(&body[1], AstNode::DoWhile { .. }));
    }

    #[test]
    fn test_nested_array_initializer() {
        let body = main_body("int m[2][3] = {{1, 2, 3}, {4}};");

        match &body[0] {
            AstNode::ArrayDecl {
                element_type,
                size,
                init: Some(items),
                ..
            } => {
                assert_eq!(*size, 2);
                assert_eq!(*element_type, Type::Int.array_of(3));
                assert!(matches!(&items[1], Initializer::List(inner, _) if inner.len() == 1));
            }
            other => panic!("Expected array declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_void_variable_is_rejected() {
        let source = "void main() { void v; }";
        assert!(parse(tokenize(source).unwrap()).is_err());
    }
}
