// AST (Abstract Syntax Tree) definitions for the CSubset interpreter

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Declared types
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Float,
    String,
    Void,
    Array(Box<Type>, usize),
    Struct(String),
    Union(String),
}

impl Type {
    /// Wrap `self` in one more array dimension
    pub fn array_of(self, size: usize) -> Self {
        Type::Array(Box::new(self), size)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::String => write!(f, "string"),
            Type::Void => write!(f, "void"),
            Type::Array(element, size) => write!(f, "{}[{}]", element, size),
            Type::Struct(name) => write!(f, "struct {}", name),
            Type::Union(name) => write!(f, "union {}", name),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
        };
        write!(f, "{}", symbol)
    }
}

/// Short-circuit logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg, // -x
    Not, // !x
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub param_type: Type,
}

/// Struct or union field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: Type,
}

/// Function definition
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Type,
    pub body: Vec<AstNode>,
    pub location: SourceLocation,
}

/// Literal allowed as a `case` label
#[derive(Debug, Clone, PartialEq)]
pub enum CaseLabel {
    Int(i32),
    Float(f64),
    String(String),
}

/// Switch case
#[derive(Debug, Clone)]
pub enum CaseNode {
    Case {
        value: CaseLabel,
        statements: Vec<AstNode>,
        location: SourceLocation,
    },
    Default {
        statements: Vec<AstNode>,
        location: SourceLocation,
    },
}

/// Element of a brace-enclosed array initializer
#[derive(Debug, Clone)]
pub enum Initializer {
    Expr(AstNode),
    List(Vec<Initializer>, SourceLocation),
}

/// AST nodes representing statements and expressions
#[derive(Debug, Clone)]
pub enum AstNode {
    // Top-level declarations
    FunctionDef(FunctionDef),
    StructDef {
        name: String,
        fields: Vec<Field>,
        location: SourceLocation,
    },
    UnionDef {
        name: String,
        fields: Vec<Field>,
        location: SourceLocation,
    },

    // Statements
    VarDecl {
        name: String,
        var_type: Type,
        init: Option<Box<AstNode>>,
        location: SourceLocation,
    },
    ArrayDecl {
        name: String,
        element_type: Type,
        size: usize,
        init: Option<Vec<Initializer>>,
        location: SourceLocation,
    },
    Return {
        expr: Option<Box<AstNode>>,
        location: SourceLocation,
    },
    If {
        condition: Box<AstNode>,
        then_branch: Vec<AstNode>,
        else_branch: Option<Vec<AstNode>>,
        location: SourceLocation,
    },
    While {
        condition: Box<AstNode>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    DoWhile {
        body: Vec<AstNode>,
        condition: Box<AstNode>,
        location: SourceLocation,
    },
    For {
        init: Option<Box<AstNode>>,
        condition: Option<Box<AstNode>>,
        increment: Option<Box<AstNode>>,
        body: Vec<AstNode>,
        location: SourceLocation,
    },
    Switch {
        expr: Box<AstNode>,
        cases: Vec<CaseNode>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Block {
        statements: Vec<AstNode>,
        location: SourceLocation,
    },
    ExpressionStatement {
        expr: Box<AstNode>,
        location: SourceLocation,
    },

    // Expressions
    IntLiteral(i32, SourceLocation),
    FloatLiteral(f64, SourceLocation),
    StringLiteral(String, SourceLocation),
    Variable(String, SourceLocation),
    Assignment {
        lhs: Box<AstNode>,
        rhs: Box<AstNode>,
        location: SourceLocation,
    },
    BinaryOp {
        op: BinOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },
    Logical {
        op: LogicOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<AstNode>,
        location: SourceLocation,
    },
    FunctionCall {
        name: String,
        args: Vec<AstNode>,
        location: SourceLocation,
    },
    ArrayAccess {
        array: Box<AstNode>,
        index: Box<AstNode>,
        location: SourceLocation,
    },
    MemberAccess {
        object: Box<AstNode>,
        member: String,
        location: SourceLocation,
    },
}

impl AstNode {
    /// Get the source location of this node
    pub fn location(&self) -> SourceLocation {
        match self {
            AstNode::FunctionDef(def) => def.location,
            AstNode::StructDef { location, .. } => *location,
            AstNode::UnionDef { location, .. } => *location,
            AstNode::VarDecl { location, .. } => *location,
            AstNode::ArrayDecl { location, .. } => *location,
            AstNode::Return { location, .. } => *location,
            AstNode::If { location, .. } => *location,
            AstNode::While { location, .. } => *location,
            AstNode::DoWhile { location, .. } => *location,
            AstNode::For { location, .. } => *location,
            AstNode::Switch { location, .. } => *location,
            AstNode::Break { location } => *location,
            AstNode::Block { location, .. } => *location,
            AstNode::ExpressionStatement { location, .. } => *location,
            AstNode::IntLiteral(_, loc) => *loc,
            AstNode::FloatLiteral(_, loc) => *loc,
            AstNode::StringLiteral(_, loc) => *loc,
            AstNode::Variable(_, loc) => *loc,
            AstNode::Assignment { location, .. } => *location,
            AstNode::BinaryOp { location, .. } => *location,
            AstNode::Logical { location, .. } => *location,
            AstNode::UnaryOp { location, .. } => *location,
            AstNode::FunctionCall { location, .. } => *location,
            AstNode::ArrayAccess { location, .. } => *location,
            AstNode::MemberAccess { location, .. } => *location,
        }
    }

    /// Whether this expression names storage (identifier, index or field chain)
    pub fn is_place(&self) -> bool {
        match self {
            AstNode::Variable(..) => true,
            AstNode::ArrayAccess { array, .. } => array.is_place(),
            AstNode::MemberAccess { object, .. } => object.is_place(),
            _ => false,
        }
    }
}

/// Top-level program structure
///
/// Owns the whole tree plus the type registry populated while parsing.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub nodes: Vec<AstNode>, // Top-level declarations in source order
    pub types: crate::registry::TypeRegistry,
}

impl Program {
    /// Iterate over the function definitions in source order
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.nodes.iter().filter_map(|node| match node {
            AstNode::FunctionDef(def) => Some(def),
            _ => None,
        })
    }
}
