//! Native functions visible to every unit.
//!
//! Builtins are consulted after module globals and are never stored in a
//! namespace, so a freshly executed unit starts with an empty namespace.

use crate::{lookup_attr, Builtin, EvalError, Value};

const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "str",
        func: builtin_str,
    },
    Builtin {
        name: "len",
        func: builtin_len,
    },
    Builtin {
        name: "hasattr",
        func: builtin_hasattr,
    },
    Builtin {
        name: "getattr",
        func: builtin_getattr,
    },
    Builtin {
        name: "isinstance",
        func: builtin_isinstance,
    },
    Builtin {
        name: "type_name",
        func: builtin_type_name,
    },
];

pub(crate) fn lookup(name: &str) -> Option<Value> {
    BUILTINS
        .iter()
        .find(|b| b.name == name)
        .map(|b| Value::Builtin(*b))
}

fn expect_args(name: &str, args: &[Value], min: usize, max: usize) -> Result<(), EvalError> {
    if args.len() < min || args.len() > max {
        return Err(EvalError::arity(name, min, max, args.len()));
    }
    Ok(())
}

fn attr_name<'a>(name: &str, value: &'a Value) -> Result<&'a str, EvalError> {
    value
        .as_str()
        .ok_or_else(|| EvalError::builtin(name, "attribute name must be a string"))
}

fn builtin_str(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("str", args, 1, 1)?;
    Ok(Value::string(args[0].to_string()))
}

fn builtin_len(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("len", args, 1, 1)?;
    match &args[0] {
        Value::Str(s) => i64::try_from(s.chars().count())
            .map(Value::Int)
            .map_err(|_| EvalError::IntegerOverflow {
                op: "len".to_string(),
            }),
        other => Err(EvalError::builtin(
            "len",
            format!("`{}` has no length", other.type_name()),
        )),
    }
}

fn builtin_hasattr(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("hasattr", args, 2, 2)?;
    let attr = attr_name("hasattr", &args[1])?;
    Ok(Value::Bool(lookup_attr(&args[0], attr).is_some()))
}

fn builtin_getattr(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("getattr", args, 2, 3)?;
    let attr = attr_name("getattr", &args[1])?;
    match (lookup_attr(&args[0], attr), args.get(2)) {
        (Some(found), _) => Ok(found),
        (None, Some(default)) => Ok(default.clone()),
        (None, None) => Err(EvalError::no_attribute(&args[0], attr)),
    }
}

fn builtin_isinstance(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("isinstance", args, 2, 2)?;
    let Value::Class(class) = &args[1] else {
        return Err(EvalError::builtin(
            "isinstance",
            "second argument must be a class",
        ));
    };
    let result = args[0]
        .as_instance()
        .is_some_and(|instance| instance.class().is_subclass_of(class));
    Ok(Value::Bool(result))
}

fn builtin_type_name(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("type_name", args, 1, 1)?;
    Ok(Value::string(args[0].type_name()))
}
