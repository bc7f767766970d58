//! Ember Eval - runtime values and the tree-walking interpreter.
//!
//! # Architecture
//!
//! Every identity-bearing runtime object (function, bound method, class,
//! instance, namespace) is a reference-counted handle around interior
//! mutable state. Code elsewhere in a running program holds the handle, never
//! the state, so replacing the state behind a handle is visible to every
//! holder. This is the indirection live reloading builds on.
//!
//! - `Value`: closed tagged union of runtime values, `ValueKind` its tag
//! - `Namespace`: shared, insertion-ordered name to value mapping
//! - `Module`: the live handle for one loaded unit
//! - `Interpreter`: executes a `CodeUnit` into a namespace and calls values
//! - `lookup_attr` / `set_attr`: attribute protocol, independent of any
//!   interpreter state

mod attr;
mod builtins;
pub mod errors;
mod interpreter;
mod module;
mod namespace;
mod operators;
mod stack;
mod value;

pub use attr::{lookup_attr, set_attr};
pub use errors::{EvalError, EvalResult};
pub use interpreter::{Interpreter, DEFAULT_MAX_CALL_DEPTH};
pub use module::{Module, SELF_NAME};
pub use namespace::{Bindings, Namespace};
pub use stack::ensure_sufficient_stack;
pub use value::{
    BoundMethod, Builtin, BuiltinFn, Class, Function, FunctionCode, FunctionState, Instance,
    Value, ValueKind,
};

#[cfg(test)]
mod tests;
