//! Syntax tree nodes built by the recognizer
//!
//! One node per production: declarations at the top, statements inside
//! function bodies, and expressions. The tree keeps only what the grammar
//! distinguishes; lines are recorded on declarations and statements for
//! later diagnostics. Every node serializes with serde so the driver can
//! print the tree as JSON.

use crate::tokens::TokenKind;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Identifier = String;

// === TYPES ===

/// Base of a declared type (EBNF: typeBase)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeBase {
    Int,
    Double,
    Char,
    Struct(Identifier),
}

/// Array suffix of a declarator or type name (EBNF: arrayDecl)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum ArraySpec {
    #[default]
    None,
    Unsized,
    Sized(Box<Expr>),
}

impl ArraySpec {
    pub fn is_array(&self) -> bool {
        !matches!(self, ArraySpec::None)
    }
}

/// Type used in casts (EBNF: typeName)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeName {
    pub base: TypeBase,
    pub array: ArraySpec,
}

// === DECLARATIONS ===

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Unit {
    pub items: Vec<Item>,
}

impl Unit {
    pub fn structs(&self) -> impl Iterator<Item = &StructDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Struct(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn globals(&self) -> impl Iterator<Item = &VarDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Vars(decl) => Some(decl),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Struct(StructDecl),
    Function(FuncDecl),
    Vars(VarDecl),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDecl {
    pub name: Identifier,
    pub fields: Vec<VarDecl>,
    pub line: u32,
}

/// `typeBase Id arrayDecl? (',' Id arrayDecl?)* ';'`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub base: TypeBase,
    pub declarators: Vec<Declarator>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declarator {
    pub name: Identifier,
    pub array: ArraySpec,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReturnType {
    Void,
    Value { base: TypeBase, pointer: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub ret: ReturnType,
    pub name: Identifier,
    pub params: Vec<Param>,
    pub body: Block,
    pub line: u32,
}

/// Function argument (EBNF: funcArg)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub base: TypeBase,
    pub name: Identifier,
    pub array: ArraySpec,
}

// === STATEMENTS ===

/// Compound statement body (EBNF: stmCompound)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub entries: Vec<BlockEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockEntry {
    Decl(VarDecl),
    Stmt(Stmt),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Block {
        block: Block,
        line: u32,
    },
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        line: u32,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
        line: u32,
    },
    For {
        init: Option<Expr>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Box<Stmt>,
        line: u32,
    },
    Break {
        line: u32,
    },
    Return {
        value: Option<Expr>,
        line: u32,
    },
    Expr {
        expr: Expr,
        line: u32,
    },
    Empty {
        line: u32,
    },
}

impl Stmt {
    /// Line of the token that opened the statement
    pub fn line(&self) -> u32 {
        match self {
            Stmt::Block { line, .. }
            | Stmt::If { line, .. }
            | Stmt::While { line, .. }
            | Stmt::For { line, .. }
            | Stmt::Break { line }
            | Stmt::Return { line, .. }
            | Stmt::Expr { line, .. }
            | Stmt::Empty { line } => *line,
        }
    }
}

// === EXPRESSIONS ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Operator for a binary operator token
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Or => Some(Self::Or),
            TokenKind::And => Some(Self::And),
            TokenKind::Equal => Some(Self::Eq),
            TokenKind::NotEq => Some(Self::NotEq),
            TokenKind::Less => Some(Self::Less),
            TokenKind::LessEq => Some(Self::LessEq),
            TokenKind::Greater => Some(Self::Greater),
            TokenKind::GreaterEq => Some(Self::GreaterEq),
            TokenKind::Add => Some(Self::Add),
            TokenKind::Sub => Some(Self::Sub),
            TokenKind::Mul => Some(Self::Mul),
            TokenKind::Div => Some(Self::Div),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Cast {
        ty: TypeName,
        expr: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Member {
        base: Box<Expr>,
        field: Identifier,
    },
    Call {
        callee: Identifier,
        args: Vec<Expr>,
    },
    Var(Identifier),
    Int(i64),
    Real(f64),
    Char(u8),
    Str(String),
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }
}

// === DISPLAY ===

impl fmt::Display for TypeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Double => write!(f, "double"),
            Self::Char => write!(f, "char"),
            Self::Struct(name) => write!(f, "struct {}", name),
        }
    }
}

impl fmt::Display for ArraySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Unsized => write!(f, "[]"),
            Self::Sized(size) => write!(f, "[{}]", size),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.array)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fully parenthesised form: every operator application gets its own parens
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign { target, value } => write!(f, "({} = {})", target, value),
            Self::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
            Self::Cast { ty, expr } => write!(f, "(({}){})", ty, expr),
            Self::Unary { op, operand } => write!(f, "({}{})", op, operand),
            Self::Index { base, index } => write!(f, "{}[{}]", base, index),
            Self::Member { base, field } => write!(f, "{}.{}", base, field),
            Self::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Self::Var(name) => write!(f, "{}", name),
            Self::Int(value) => write!(f, "{}", value),
            Self::Real(value) => write!(f, "{:?}", value),
            Self::Char(byte) => write!(f, "{:?}", *byte as char),
            Self::Str(text) => write!(f, "{:?}", text),
        }
    }
}
