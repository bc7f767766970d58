//! Name resolution scopes.
//!
//! There are three kinds of frame and they differ only in where local
//! bindings go:
//! - module body: locals *are* the globals
//! - function body: a private map, discarded on return
//! - class body: an ordered map that becomes the class attributes

use ember_ir::Name;
use rustc_hash::FxHashMap;

use crate::{builtins, Bindings, Namespace, Value};

pub(super) enum Locals {
    Module,
    Function(FxHashMap<Name, Value>),
    Class(Bindings),
}

pub(super) struct Frame<'a> {
    pub globals: &'a Namespace,
    /// Name of the module this code belongs to.
    pub module: &'a Name,
    pub locals: Locals,
}

impl<'a> Frame<'a> {
    pub fn module(globals: &'a Namespace, module: &'a Name) -> Self {
        Frame {
            globals,
            module,
            locals: Locals::Module,
        }
    }

    pub fn function(globals: &'a Namespace, module: &'a Name, args: FxHashMap<Name, Value>) -> Self {
        Frame {
            globals,
            module,
            locals: Locals::Function(args),
        }
    }

    pub fn class_body(globals: &'a Namespace, module: &'a Name, attrs: Bindings) -> Self {
        Frame {
            globals,
            module,
            locals: Locals::Class(attrs),
        }
    }

    /// Locals, then globals, then builtins.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let local = match &self.locals {
            Locals::Module => None,
            Locals::Function(map) => map.get(name).cloned(),
            Locals::Class(attrs) => attrs.get(name).cloned(),
        };
        local
            .or_else(|| self.globals.get(name))
            .or_else(|| builtins::lookup(name))
    }

    pub fn bind(&mut self, name: Name, value: Value) {
        match &mut self.locals {
            Locals::Module => {
                self.globals.insert(name, value);
            }
            Locals::Function(map) => {
                map.insert(name, value);
            }
            Locals::Class(attrs) => {
                attrs.insert(name, value);
            }
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.locals, Locals::Function(_))
    }

    /// Consume a class-body frame, yielding the collected attributes.
    pub fn into_class_attrs(self) -> Bindings {
        match self.locals {
            Locals::Class(attrs) => attrs,
            Locals::Module | Locals::Function(_) => Bindings::default(),
        }
    }
}
