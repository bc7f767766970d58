//! Attribute protocol.
//!
//! Lookup order:
//! - instance: own fields, then the class chain (functions come back bound)
//! - class: `__name__`, then the class chain
//! - function: `__name__`, `__module__`, `__doc__`, then its attribute map
//! - bound method: `__func__`, `__self__`, then the underlying function

use ember_ir::Name;

use crate::{BoundMethod, EvalError, Value};

/// Look up `name` on `value`. `None` when the attribute does not exist.
pub fn lookup_attr(value: &Value, name: &str) -> Option<Value> {
    match value {
        Value::Instance(instance) => instance.field(name).or_else(|| {
            instance.class().lookup(name).map(|found| match found {
                Value::Function(func) => Value::Method(BoundMethod::new(value.clone(), func)),
                other => other,
            })
        }),
        Value::Class(class) => match name {
            "__name__" => Some(Value::string(class.name())),
            _ => class.lookup(name),
        },
        Value::Function(func) => match name {
            "__name__" => Some(Value::string(func.name())),
            "__module__" => Some(Value::string(func.module())),
            "__doc__" => Some(func.doc().map_or(Value::None, Value::string)),
            _ => func.attr(name),
        },
        Value::Method(method) => match name {
            "__func__" => Some(Value::Function(method.func().clone())),
            "__self__" => Some(method.receiver().clone()),
            _ => lookup_attr(&Value::Function(method.func().clone()), name),
        },
        Value::None
        | Value::Bool(_)
        | Value::Int(_)
        | Value::Str(_)
        | Value::Builtin(_) => None,
    }
}

/// Set `name` on `target`.
///
/// Instances take fields, classes take class attributes, functions take
/// auxiliary attributes (`__doc__` sets the doc string). Everything else is
/// read-only.
pub fn set_attr(target: &Value, name: Name, value: Value) -> Result<(), EvalError> {
    match target {
        Value::Instance(instance) => {
            instance.set_field(name, value);
            Ok(())
        }
        Value::Class(class) => {
            class.set_attr(name, value);
            Ok(())
        }
        Value::Function(func) if &*name == "__doc__" => {
            func.set_doc(value.as_str().map(str::to_string));
            Ok(())
        }
        Value::Function(func) => {
            func.set_attr(name, value);
            Ok(())
        }
        other => Err(EvalError::CannotSetAttribute {
            type_name: other.type_name(),
            attr: name.to_string(),
        }),
    }
}
