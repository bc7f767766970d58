//! Runtime errors raised while executing or calling Ember code.

use crate::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("undefined variable `{name}`")]
    UndefinedVariable { name: String },

    #[error("`{type_name}` has no attribute `{attr}`")]
    NoAttribute { type_name: String, attr: String },

    #[error("cannot set attribute `{attr}` on `{type_name}`")]
    CannotSetAttribute { type_name: String, attr: String },

    #[error("`{type_name}` is not callable")]
    NotCallable { type_name: String },

    #[error("`{name}` expected {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("unsupported operand types for `{op}`: `{left}` and `{right}`")]
    TypeMismatch {
        op: String,
        left: String,
        right: String,
    },

    #[error("base of class `{class}` must be a class, found `{found}`")]
    InvalidBase { class: String, found: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in `{op}`")]
    IntegerOverflow { op: String },

    #[error("maximum call depth of {depth} exceeded")]
    RecursionLimit { depth: usize },

    #[error("raised: {message}")]
    Raised { message: String },

    #[error("`return` outside of a function")]
    ReturnOutsideFunction,

    #[error("{name}: {message}")]
    Builtin { name: String, message: String },
}

impl EvalError {
    pub fn undefined_variable(name: &str) -> Self {
        EvalError::UndefinedVariable {
            name: name.to_string(),
        }
    }

    pub fn no_attribute(value: &Value, attr: &str) -> Self {
        EvalError::NoAttribute {
            type_name: value.type_name(),
            attr: attr.to_string(),
        }
    }

    /// Arity error for a callable accepting `min..=max` arguments.
    pub fn arity(name: &str, min: usize, max: usize, got: usize) -> Self {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{min} to {max}")
        };
        EvalError::ArityMismatch {
            name: name.to_string(),
            expected,
            got,
        }
    }

    pub fn type_mismatch(op: &str, left: &Value, right: &Value) -> Self {
        EvalError::TypeMismatch {
            op: op.to_string(),
            left: left.type_name(),
            right: right.type_name(),
        }
    }

    pub fn builtin(name: &str, message: impl Into<String>) -> Self {
        EvalError::Builtin {
            name: name.to_string(),
            message: message.into(),
        }
    }
}
