//! Module handles.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ember_ir::Name;

use crate::{Namespace, Value};

/// Key under which a module namespace records its own qualified name.
pub const SELF_NAME: &str = "__name__";

struct ModuleData {
    name: Name,
    namespace: Namespace,
    /// Search locations for nested units; `Some` for packages.
    search_path: Option<Vec<PathBuf>>,
    origin: RefCell<Option<PathBuf>>,
}

/// The live handle for one loaded unit.
///
/// There is exactly one handle per loaded unit and its namespace is only
/// ever mutated in place, so everything holding the handle (or a function
/// defined in it) sees the same bindings.
#[derive(Clone)]
pub struct Module(Rc<ModuleData>);

impl Module {
    /// A plain module named `name` (qualified, e.g. `"app.shapes"`).
    pub fn new(name: &str) -> Self {
        Self::build(name, None)
    }

    /// A package whose nested units are searched for in `search_path`.
    pub fn package(name: &str, search_path: Vec<PathBuf>) -> Self {
        Self::build(name, Some(search_path))
    }

    fn build(name: &str, search_path: Option<Vec<PathBuf>>) -> Self {
        let name = Name::new(name);
        let namespace = Namespace::new();
        namespace.insert(Name::new(SELF_NAME), Value::string(&name));
        Module(Rc::new(ModuleData {
            name,
            namespace,
            search_path,
            origin: RefCell::new(None),
        }))
    }

    /// Qualified name.
    pub fn name(&self) -> &Name {
        &self.0.name
    }

    /// Split the qualified name into parent package and leaf:
    /// `"a.b.c"` gives `(Some("a.b"), "c")`, `"c"` gives `(None, "c")`.
    pub fn split_name(&self) -> (Option<&str>, &str) {
        match self.0.name.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, self.0.name.as_str()),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.0.namespace
    }

    pub fn search_path(&self) -> Option<&[PathBuf]> {
        self.0.search_path.as_deref()
    }

    pub fn is_package(&self) -> bool {
        self.0.search_path.is_some()
    }

    /// Storage the module was last loaded from.
    pub fn origin(&self) -> Option<PathBuf> {
        self.0.origin.borrow().clone()
    }

    pub fn set_origin(&self, origin: &Path) {
        *self.0.origin.borrow_mut() = Some(origin.to_path_buf());
    }

    /// Shorthand for `namespace().get(name)`.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.namespace.get(name)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Module) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.0.name)
            .field("package", &self.is_package())
            .field("names", &self.0.namespace)
            .finish()
    }
}
