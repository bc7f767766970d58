//! Syntax tree for Ember units.
//!
//! The tree is deliberately plain (boxed children, owned vectors): a unit is
//! parsed once per load and then either executed or serialized, so there is
//! no arena to share across passes.

use std::fmt;

use crate::{Name, Span};

/// One compiled, executable unit: the parsed top-level statements of a
/// source file together with the name of the storage it came from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct CodeUnit {
    /// Physical origin used in diagnostics (usually a file path).
    pub origin: String,
    pub body: Vec<Stmt>,
}

impl CodeUnit {
    pub fn new(origin: impl Into<String>, body: Vec<Stmt>) -> Self {
        CodeUnit {
            origin: origin.into(),
            body,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Stmt {
    /// `let name = value`
    Let { name: Name, value: Expr, span: Span },
    /// `target = value` or `object.attr = value`
    Assign { target: Expr, value: Expr, span: Span },
    Fn(FnDef),
    Class(ClassDef),
    /// `return` with an optional value.
    Return { value: Option<Expr>, span: Span },
    /// `raise message`
    Raise { value: Expr, span: Span },
    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
        span: Span,
    },
    Expr(Expr),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let { span, .. }
            | Stmt::Assign { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::Raise { span, .. }
            | Stmt::If { span, .. } => *span,
            Stmt::Fn(def) => def.span,
            Stmt::Class(def) => def.span,
            Stmt::Expr(expr) => expr.span,
        }
    }
}

/// Function definition.
///
/// An expression body (`fn f(x) = x + 1`) is stored as a single `Return`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FnDef {
    pub name: Name,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub doc: Option<String>,
    pub span: Span,
}

impl FnDef {
    /// Number of parameters that carry a default value.
    ///
    /// Defaults are only accepted on trailing parameters, so these are always
    /// the last `default_count()` entries of `params`.
    pub fn default_count(&self) -> usize {
        self.params.iter().filter(|p| p.default.is_some()).count()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: Name,
    pub default: Option<Expr>,
}

/// Class definition. The body only holds `Let`, `Fn` and `Class` statements.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDef {
    pub name: Name,
    pub bases: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub doc: Option<String>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    Int(i64),
    Str(String),
    Bool(bool),
    None,
    Ident(Name),
    Attr { object: Box<Expr>, attr: Name },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    Neg,
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => f.write_str("-"),
            UnaryOp::Not => f.write_str("not"),
        }
    }
}
