//! Runtime values for the Ember interpreter.
//!
//! Scalars are stored inline. Everything with an identity is an `Rc` handle
//! (`Function`, `BoundMethod`, `Class`, `Instance`), so `Clone` on a `Value`
//! never copies an object, it only adds a reference.

mod class;
mod function;

use std::fmt;
use std::rc::Rc;

pub use class::{BoundMethod, Class, Instance};
pub use function::{Function, FunctionCode, FunctionState};

use crate::EvalError;

/// Native function signature.
pub type BuiltinFn = fn(&[Value]) -> Result<Value, EvalError>;

/// A native function resolved after module globals.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

/// Runtime value in the Ember interpreter.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Str(Rc<str>),
    Builtin(Builtin),
    Function(Function),
    Method(BoundMethod),
    Class(Class),
    Instance(Instance),
}

/// The runtime kind of a value.
///
/// Two values of the same kind can be patched into one another; a change of
/// kind across a reload always rebinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    None,
    Bool,
    Int,
    Str,
    Builtin,
    Function,
    Method,
    Class,
    Instance,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::None => "none",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Str => "str",
            ValueKind::Builtin => "builtin",
            ValueKind::Function => "function",
            ValueKind::Method => "method",
            ValueKind::Class => "class",
            ValueKind::Instance => "instance",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn string(text: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(text.as_ref()))
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::None => ValueKind::None,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Str(_) => ValueKind::Str,
            Value::Builtin(_) => ValueKind::Builtin,
            Value::Function(_) => ValueKind::Function,
            Value::Method(_) => ValueKind::Method,
            Value::Class(_) => ValueKind::Class,
            Value::Instance(_) => ValueKind::Instance,
        }
    }

    /// Type name for diagnostics; instances report their class name.
    pub fn type_name(&self) -> String {
        match self {
            Value::Instance(instance) => instance.class().name().to_string(),
            other => other.kind().as_str().to_string(),
        }
    }

    /// Identity test: pointer identity for handles, equality for scalars.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Method(a), Value::Method(b)) => a.ptr_eq(b),
            (Value::Class(a), Value::Class(b)) => a.ptr_eq(b),
            (Value::Instance(a), Value::Instance(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Value::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&BoundMethod> {
        match self {
            Value::Method(m) => Some(m),
            _ => None,
        }
    }
}

/// `==` semantics: scalars by value, objects by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("none"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name),
            Value::Function(func) => write!(f, "<fn {}>", func.name()),
            Value::Method(m) => write!(f, "<method {}>", m.func().name()),
            Value::Class(c) => write!(f, "<class {}>", c.name()),
            Value::Instance(i) => write!(f, "<{} instance>", i.class().name()),
        }
    }
}

impl fmt::Debug for Value {
    // Shallow on purpose: objects reach their own namespaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", &**s),
            other => fmt::Display::fmt(other, f),
        }
    }
}
