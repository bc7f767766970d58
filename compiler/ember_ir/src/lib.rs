//! Ember IR - syntax tree and shared identifier types.
//!
//! This crate contains the data structures shared by the Ember toolchain:
//! - `Span` for source locations
//! - `Name` for cheaply clonable identifiers
//! - The syntax tree (`CodeUnit`, `Stmt`, `Expr`) produced by `ember_parse`
//!   and consumed by `ember_eval`
//!
//! # Serialization
//!
//! With the `cache` feature every tree type derives `serde` traits, which is
//! what the compiled unit form (`.emc`) is built on.

pub mod ast;
mod name;
mod span;

pub use ast::{BinaryOp, ClassDef, CodeUnit, Expr, ExprKind, FnDef, Param, Stmt, UnaryOp};
pub use name::Name;
pub use span::{line_col, Span};
