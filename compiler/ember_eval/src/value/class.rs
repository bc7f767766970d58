//! Classes, their instances, and methods bound to an instance.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ember_ir::Name;

use crate::{Bindings, Function, Value};

struct ClassData {
    name: Name,
    bases: Vec<Class>,
    attrs: RefCell<Bindings>,
}

/// Handle to a class object: a named attribute namespace with bases.
#[derive(Clone)]
pub struct Class(Rc<ClassData>);

impl Class {
    pub fn new(name: Name, bases: Vec<Class>, attrs: Bindings) -> Self {
        Class(Rc::new(ClassData {
            name,
            bases,
            attrs: RefCell::new(attrs),
        }))
    }

    pub fn name(&self) -> &Name {
        &self.0.name
    }

    pub fn bases(&self) -> &[Class] {
        &self.0.bases
    }

    /// Attribute defined on this class itself, ignoring bases.
    pub fn own_attr(&self, name: &str) -> Option<Value> {
        self.0.attrs.borrow().get(name).cloned()
    }

    /// Attribute lookup through this class, then its bases depth-first.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.own_attr(name)
            .or_else(|| self.0.bases.iter().find_map(|base| base.lookup(name)))
    }

    pub fn set_attr(&self, name: Name, value: Value) -> Option<Value> {
        self.0.attrs.borrow_mut().insert(name, value)
    }

    pub fn remove_attr(&self, name: &str) -> Option<Value> {
        self.0.attrs.borrow_mut().shift_remove(name)
    }

    /// Own attribute names in definition order.
    pub fn attr_names(&self) -> Vec<Name> {
        self.0.attrs.borrow().keys().cloned().collect()
    }

    pub fn snapshot_attrs(&self) -> Bindings {
        self.0.attrs.borrow().clone()
    }

    pub fn restore_attrs(&self, attrs: Bindings) {
        *self.0.attrs.borrow_mut() = attrs;
    }

    /// True if `self` is `other` or inherits from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.ptr_eq(other) || self.0.bases.iter().any(|base| base.is_subclass_of(other))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Class) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared state; stable while any handle is alive.
    #[inline]
    pub fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast()
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.0.name)
    }
}

struct InstanceData {
    class: Class,
    fields: RefCell<Bindings>,
}

/// Handle to an instance. Holds its class by handle, so methods are always
/// looked up on the current state of the class.
#[derive(Clone)]
pub struct Instance(Rc<InstanceData>);

impl Instance {
    pub fn new(class: Class) -> Self {
        Instance(Rc::new(InstanceData {
            class,
            fields: RefCell::new(Bindings::default()),
        }))
    }

    pub fn class(&self) -> &Class {
        &self.0.class
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.0.fields.borrow().get(name).cloned()
    }

    pub fn set_field(&self, name: Name, value: Value) {
        self.0.fields.borrow_mut().insert(name, value);
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} instance>", self.0.class.name())
    }
}

struct MethodData {
    receiver: Value,
    func: Function,
}

/// A function bound to a receiver. Calling it prepends the receiver to the
/// arguments.
#[derive(Clone)]
pub struct BoundMethod(Rc<MethodData>);

impl BoundMethod {
    pub fn new(receiver: Value, func: Function) -> Self {
        BoundMethod(Rc::new(MethodData { receiver, func }))
    }

    pub fn receiver(&self) -> &Value {
        &self.0.receiver
    }

    /// The underlying function object.
    pub fn func(&self) -> &Function {
        &self.0.func
    }

    #[inline]
    pub fn ptr_eq(&self, other: &BoundMethod) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<method {}>", self.0.func.name())
    }
}
