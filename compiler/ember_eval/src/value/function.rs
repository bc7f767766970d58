//! Function objects.

use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use ember_ir::{FnDef, Name, Stmt};

use crate::{Bindings, Namespace, Value};

/// The executable part of a function: parameter names and body.
#[derive(Debug, PartialEq)]
pub struct FunctionCode {
    pub params: Vec<Name>,
    pub body: Vec<Stmt>,
}

impl FunctionCode {
    pub fn from_def(def: &FnDef) -> Self {
        FunctionCode {
            params: def.params.iter().map(|p| p.name.clone()).collect(),
            body: def.body.clone(),
        }
    }
}

/// Everything about a function that a reload may replace.
#[derive(Clone)]
pub struct FunctionState {
    pub doc: Option<String>,
    /// Auxiliary attributes set with `f.attr = value`.
    pub attrs: Bindings,
    pub code: Rc<FunctionCode>,
    /// Values for the trailing parameters, evaluated at definition time.
    pub defaults: Vec<Value>,
}

struct FunctionData {
    name: Name,
    /// Name of the defining module (`__module__`).
    module: Name,
    globals: Namespace,
    state: RefCell<FunctionState>,
}

/// Handle to a function object.
#[derive(Clone)]
pub struct Function(Rc<FunctionData>);

impl Function {
    pub fn new(name: Name, module: Name, globals: Namespace, state: FunctionState) -> Self {
        Function(Rc::new(FunctionData {
            name,
            module,
            globals,
            state: RefCell::new(state),
        }))
    }

    pub fn name(&self) -> &Name {
        &self.0.name
    }

    pub fn module(&self) -> &Name {
        &self.0.module
    }

    /// Namespace the body resolves free names in.
    pub fn globals(&self) -> &Namespace {
        &self.0.globals
    }

    pub fn doc(&self) -> Option<String> {
        self.0.state.borrow().doc.clone()
    }

    pub fn set_doc(&self, doc: Option<String>) {
        self.0.state.borrow_mut().doc = doc;
    }

    /// Current code. Callers hold the returned `Rc` for the duration of a
    /// call, so a reload during the call does not disturb the running body.
    pub fn code(&self) -> Rc<FunctionCode> {
        Rc::clone(&self.0.state.borrow().code)
    }

    pub fn defaults(&self) -> Vec<Value> {
        self.0.state.borrow().defaults.clone()
    }

    pub fn attr(&self, name: &str) -> Option<Value> {
        self.0.state.borrow().attrs.get(name).cloned()
    }

    pub fn set_attr(&self, name: Name, value: Value) {
        self.0.state.borrow_mut().attrs.insert(name, value);
    }

    pub fn state_mut(&self) -> RefMut<'_, FunctionState> {
        self.0.state.borrow_mut()
    }

    /// Copy of the patchable state.
    pub fn snapshot(&self) -> FunctionState {
        self.0.state.borrow().clone()
    }

    pub fn restore(&self, state: FunctionState) {
        *self.0.state.borrow_mut() = state;
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared state; stable while any handle is alive.
    #[inline]
    pub fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast()
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}.{}>", self.0.module, self.0.name)
    }
}
