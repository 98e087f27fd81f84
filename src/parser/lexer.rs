//! Lexer (tokenizer) for CSubset source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! `#define NAME VALUE` lines register a textual constant whose tokens replace
//! every later occurrence of `NAME`; any other preprocessor directive (such as
//! `#include`) is skipped.

use super::ast::SourceLocation;
use rustc_hash::FxHashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Magnitude of an integer literal; `2147483648` only fits once negated
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),

    // Identifiers
    Ident(String),

    // Keywords
    Int,
    Float,
    Str,
    Void,
    Struct,
    Union,
    If,
    Else,
    While,
    Do,
    For,
    Switch,
    Case,
    Default,
    Break,
    Return,

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    // Assignment
    Eq, // =

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,
    Dot,       // .
    Colon,     // :

    // End of file
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::IntLiteral(n) => write!(f, "int literal {}", n),
            TokenKind::FloatLiteral(x) => write!(f, "float literal {}", x),
            TokenKind::StringLiteral(s) => write!(f, "string literal \"{}\"", s),
            TokenKind::Ident(s) => write!(f, "identifier '{}'", s),
            TokenKind::Int => write!(f, "'int'"),
            TokenKind::Float => write!(f, "'float'"),
            TokenKind::Str => write!(f, "'string'"),
            TokenKind::Void => write!(f, "'void'"),
            TokenKind::Struct => write!(f, "'struct'"),
            TokenKind::Union => write!(f, "'union'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::Do => write!(f, "'do'"),
            TokenKind::For => write!(f, "'for'"),
            TokenKind::Switch => write!(f, "'switch'"),
            TokenKind::Case => write!(f, "'case'"),
            TokenKind::Default => write!(f, "'default'"),
            TokenKind::Break => write!(f, "'break'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::AndAnd => write!(f, "'&&'"),
            TokenKind::OrOr => write!(f, "'||'"),
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// A token together with the place it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Lexical error at {location}: unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, location: SourceLocation },

    #[error("Lexical error at {location}: unterminated string literal")]
    UnterminatedString { location: SourceLocation },

    #[error("Lexical error at {location}: unterminated block comment")]
    UnterminatedComment { location: SourceLocation },

    #[error("Lexical error at {location}: invalid numeric literal '{text}'")]
    InvalidNumber {
        text: String,
        location: SourceLocation,
    },

    #[error("Lexical error at {location}: malformed #define: {message}")]
    InvalidDefine {
        message: String,
        location: SourceLocation,
    },
}

impl LexError {
    pub fn location(&self) -> SourceLocation {
        match self {
            LexError::UnexpectedCharacter { location, .. }
            | LexError::UnterminatedString { location }
            | LexError::UnterminatedComment { location }
            | LexError::InvalidNumber { location, .. }
            | LexError::InvalidDefine { location, .. } => *location,
        }
    }
}

/// Tokenize a whole source buffer
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Lexer for CSubset source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    defines: FxHashMap<String, Vec<TokenKind>>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            defines: FxHashMap::default(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, self.current_location()));
                break;
            }

            if self.peek() == Some('#') {
                self.preprocessor_directive()?;
                continue;
            }

            let token = self.next_token()?;
            self.push_expanded(token, &mut tokens);
        }

        debug!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    /// Push a token, replacing a `#define`d identifier with its body
    fn push_expanded(&self, token: Token, tokens: &mut Vec<Token>) {
        if let TokenKind::Ident(name) = &token.kind {
            if let Some(body) = self.defines.get(name) {
                tokens.extend(
                    body.iter()
                        .map(|kind| Token::new(kind.clone(), token.location)),
                );
                return;
            }
        }
        tokens.push(token);
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Ok(Token::new(TokenKind::Eof, loc)),
        };

        let kind = match ch {
            // String literals
            '"' => self.string_literal(loc)?,

            // Numeric literals
            '0'..='9' => self.number_literal(ch, loc)?,

            // Identifiers and keywords
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(ch),

            // Operators and punctuation
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' => self.either('=', TokenKind::EqEq, TokenKind::Eq),
            '!' => self.either('=', TokenKind::NotEq, TokenKind::Bang),
            '<' => self.either('=', TokenKind::Le, TokenKind::Lt),
            '>' => self.either('=', TokenKind::Ge, TokenKind::Gt),
            '&' if self.peek() == Some('&') => {
                self.advance();
                TokenKind::AndAnd
            }
            '|' if self.peek() == Some('|') => {
                self.advance();
                TokenKind::OrOr
            }
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,

            _ => return Err(LexError::UnexpectedCharacter { ch, location: loc }),
        };

        Ok(Token::new(kind, loc))
    }

    /// Two-character operator if `next` follows, otherwise the single one
    fn either(&mut self, next: char, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some(next) {
            self.advance();
            double
        } else {
            single
        }
    }

    /// Parse string literal. Characters are taken verbatim; a backslash keeps
    /// the following character from closing the literal.
    fn string_literal(&mut self, loc: SourceLocation) -> Result<TokenKind, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.advance(); // consume closing quote
                    return Ok(TokenKind::StringLiteral(string));
                }
                '\n' => break,
                '\\' => {
                    self.advance();
                    string.push('\\');
                    if let Some(escaped) = self.peek().filter(|c| *c != '\n') {
                        self.advance();
                        string.push(escaped);
                    }
                }
                _ => {
                    self.advance();
                    string.push(ch);
                }
            }
        }

        Err(LexError::UnterminatedString { location: loc })
    }

    /// Parse numeric literal; a decimal point makes it a float
    fn number_literal(
        &mut self,
        first_digit: char,
        loc: SourceLocation,
    ) -> Result<TokenKind, LexError> {
        let mut text = String::new();
        text.push(first_digit);
        self.consume_digits(&mut text);

        if self.peek() == Some('.') {
            text.push('.');
            self.advance();
            self.consume_digits(&mut text);

            return text
                .parse::<f64>()
                .map(TokenKind::FloatLiteral)
                .map_err(|_| LexError::InvalidNumber { text, location: loc });
        }

        // An identifier glued to a number is not a number
        if self
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            while let Some(c) = self.peek().filter(|c| c.is_ascii_alphanumeric() || *c == '_') {
                text.push(c);
                self.advance();
            }
            return Err(LexError::InvalidNumber { text, location: loc });
        }

        match text.parse::<i64>() {
            Ok(n) if n <= i64::from(i32::MAX) + 1 => Ok(TokenKind::IntLiteral(n)),
            _ => Err(LexError::InvalidNumber { text, location: loc }),
        }
    }

    fn consume_digits(&mut self, text: &mut String) {
        while let Some(ch) = self.peek().filter(|c| c.is_ascii_digit()) {
            text.push(ch);
            self.advance();
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char) -> TokenKind {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "int" => TokenKind::Int,
            "float" => TokenKind::Float,
            "string" => TokenKind::Str,
            "void" => TokenKind::Void,
            "struct" => TokenKind::Struct,
            "union" => TokenKind::Union,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "for" => TokenKind::For,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "default" => TokenKind::Default,
            "break" => TokenKind::Break,
            "return" => TokenKind::Return,
            _ => TokenKind::Ident(ident),
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::UnterminatedComment {
            location: start_loc,
        })
    }

    /// Handle a `#` line: register `#define`s, skip everything else
    fn preprocessor_directive(&mut self) -> Result<(), LexError> {
        let loc = self.current_location();
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            text.push(ch);
            self.advance();
        }

        let directive = text[1..].trim_start();
        let Some(rest) = directive.strip_prefix("define") else {
            return Ok(());
        };
        if !rest.starts_with(char::is_whitespace) {
            return Err(LexError::InvalidDefine {
                message: "expected a name after #define".to_string(),
                location: loc,
            });
        }

        let rest = rest.trim_start();
        let name_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let (name, body) = rest.split_at(name_len);
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(LexError::InvalidDefine {
                message: format!("'{}' is not a valid macro name", rest),
                location: loc,
            });
        }

        // The body is lexed with the macros defined so far already applied
        let mut body_lexer = Lexer::new(body);
        body_lexer.line = loc.line;
        body_lexer.defines = self.defines.clone();
        let body_tokens: Vec<TokenKind> = body_lexer
            .tokenize()?
            .into_iter()
            .map(|token| token.kind)
            .filter(|kind| *kind != TokenKind::Eof)
            .collect();

        trace!(name, tokens = body_tokens.len(), "registered #define");
        self.defines.insert(name.to_string(), body_tokens);
        Ok(())
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
