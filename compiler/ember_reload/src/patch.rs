//! Patch dispatch: bring an old value up to date with its replacement.
//!
//! Identity-bearing values (functions, bound methods, classes) are updated
//! in place so that every holder of the old handle sees the new behaviour.
//! Everything else is replaced. For a single shared name:
//!
//! 0. same identity: keep
//! 1. different kind: replace
//! 2. `new.__reload_update__` exists: bind `hook(old)`. A hook found on a
//!    class is bound to the new class, as it is to an instance
//! 3. by kind: class, function and bound method are patched; the rest is
//!    replaced

use ember_eval::{lookup_attr, BoundMethod, Class, EvalError, Function, Interpreter, Value};

use crate::diff::NameDiff;
use crate::journal::Journal;

/// Attribute looked up on the new value to delegate its own update.
pub const UPDATE_HOOK: &str = "__reload_update__";

/// Class slots left untouched by the class patch.
pub const PRESERVED_SLOTS: &[&str] = &["__doc__", "__dict__"];

/// How a shared name was handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Old and new were already the same object.
    Unchanged,
    /// The old object was updated in place and stays bound.
    Patched,
    /// A custom hook chose the binding.
    Hook,
    /// The new object replaces the old one.
    Rebound,
}

/// Binding to install for a shared name, with how it was obtained.
#[derive(Debug)]
pub struct Update {
    pub value: Value,
    pub outcome: Outcome,
}

impl Update {
    fn keep(old: &Value, outcome: Outcome) -> Self {
        Update {
            value: old.clone(),
            outcome,
        }
    }

    fn rebind(new: &Value) -> Self {
        Update {
            value: new.clone(),
            outcome: Outcome::Rebound,
        }
    }
}

/// Decide and perform the update of `old` by `new`.
///
/// Only a failing hook returns an error; the caller rolls `journal` back.
pub fn update(
    interpreter: &Interpreter,
    old: &Value,
    new: &Value,
    journal: &mut Journal,
) -> Result<Update, EvalError> {
    if old.is_same(new) {
        return Ok(Update::keep(old, Outcome::Unchanged));
    }
    if old.kind() != new.kind() {
        return Ok(Update::rebind(new));
    }

    if let Some(hook) = find_hook(new) {
        let value = interpreter.call(&hook, vec![old.clone()])?;
        return Ok(Update {
            value,
            outcome: Outcome::Hook,
        });
    }

    match (old, new) {
        (Value::Class(old_class), Value::Class(new_class)) => {
            update_class(old_class, new_class, journal);
            Ok(Update::keep(old, Outcome::Patched))
        }
        (Value::Function(old_func), Value::Function(new_func)) => {
            update_function(old_func, new_func, journal);
            Ok(Update::keep(old, Outcome::Patched))
        }
        (Value::Method(old_method), Value::Method(new_method)) => {
            update_function(old_method.func(), new_method.func(), journal);
            Ok(Update::keep(old, Outcome::Patched))
        }
        _ => Ok(Update::rebind(new)),
    }
}

/// The update hook of `new`, ready to be called with the old value.
///
/// Class lookup returns plain functions, so a hook defined in a class body
/// is bound to the class here and receives it first, the same way an
/// instance's hook receives the instance.
fn find_hook(new: &Value) -> Option<Value> {
    let hook = lookup_attr(new, UPDATE_HOOK)?;
    Some(match (new, hook) {
        (Value::Class(_), Value::Function(func)) => {
            Value::Method(BoundMethod::new(new.clone(), func))
        }
        (_, hook) => hook,
    })
}

/// Copy the doc string, merge the attribute map, and replace code and
/// defaults. `old` keeps its name, module and globals.
pub fn update_function(old: &Function, new: &Function, journal: &mut Journal) {
    if old.ptr_eq(new) {
        return;
    }
    journal.record_function(old);
    let incoming = new.snapshot();
    let mut state = old.state_mut();
    state.doc = incoming.doc;
    state.attrs.extend(incoming.attrs);
    state.code = incoming.code;
    state.defaults = incoming.defaults;
}

/// Make `old`'s own attributes match `new`'s.
///
/// Added attributes are set, removed ones deleted, and shared ones
/// overwritten, except that a class attribute whose old and new values are
/// both classes is patched recursively. [`PRESERVED_SLOTS`] are never
/// deleted or overwritten. Each class is visited at most once per journal.
pub fn update_class(old: &Class, new: &Class, journal: &mut Journal) {
    if old.ptr_eq(new) || !journal.record_class(old) {
        return;
    }

    let diff = NameDiff::compute(&old.attr_names(), &new.attr_names(), PRESERVED_SLOTS)
        .without_shared(PRESERVED_SLOTS);
    tracing::trace!(
        class = %old.name(),
        added = diff.added.len(),
        removed = diff.removed.len(),
        shared = diff.shared.len(),
        "patching class"
    );

    for name in diff.added {
        if let Some(value) = new.own_attr(&name) {
            old.set_attr(name, value);
        }
    }
    for name in &diff.removed {
        old.remove_attr(name);
    }
    for name in diff.shared {
        let (Some(old_value), Some(new_value)) = (old.own_attr(&name), new.own_attr(&name))
        else {
            continue;
        };
        match (&old_value, &new_value) {
            (Value::Class(old_inner), Value::Class(new_inner)) => {
                update_class(old_inner, new_inner, journal);
            }
            _ => {
                old.set_attr(name, new_value);
            }
        }
    }
}
