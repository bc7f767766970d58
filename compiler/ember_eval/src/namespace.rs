//! Shared namespaces.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ember_ir::Name;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::Value;

/// Insertion-ordered bindings. Used directly for class attributes, instance
/// fields and function attributes, and behind `Namespace` for modules.
pub type Bindings = IndexMap<Name, Value, FxBuildHasher>;

/// A shared, mutable, ordered mapping from identifier to value.
///
/// Cloning the handle shares the mapping. Functions keep a handle to the
/// namespace they were defined in, so a module's namespace must be mutated in
/// place and never swapped for another one.
#[derive(Clone, Default)]
pub struct Namespace(Rc<RefCell<Bindings>>);

impl Namespace {
    pub fn new() -> Self {
        Namespace::default()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().contains_key(name)
    }

    /// Bind `name`, returning the previous value. A rebound name keeps its
    /// original position.
    pub fn insert(&self, name: Name, value: Value) -> Option<Value> {
        self.0.borrow_mut().insert(name, value)
    }

    /// Unbind `name`, preserving the order of the remaining bindings.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.0.borrow_mut().shift_remove(name)
    }

    /// Bound names in insertion order.
    pub fn names(&self) -> Vec<Name> {
        self.0.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Copy of the current bindings (values are shared handles).
    pub fn snapshot(&self) -> Bindings {
        self.0.borrow().clone()
    }

    /// Replace every binding with `bindings`, keeping this handle.
    pub fn restore(&self, bindings: Bindings) {
        *self.0.borrow_mut() = bindings;
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Namespace) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Namespace {
    // Names only: values may refer back to this namespace.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.borrow().keys()).finish()
    }
}
