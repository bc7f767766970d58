//! Undo log for the apply phase of a merge.
//!
//! Before the first mutation the live bindings are snapshotted. Every
//! function and class is recorded once, before it is first patched. A
//! rollback restores objects in reverse order and then the bindings, so the
//! live namespace and every patched object end up as they were when the
//! journal began.
//!
//! Objects a custom update hook touches on its own are not recorded.

use ember_eval::{Bindings, Class, Function, FunctionState, Namespace};
use rustc_hash::FxHashSet;

enum Entry {
    Function(Function, FunctionState),
    Class(Class, Bindings),
}

pub struct Journal {
    namespace: Namespace,
    bindings: Bindings,
    entries: Vec<Entry>,
    /// Addresses of the objects in `entries`.
    recorded: FxHashSet<*const ()>,
}

impl Journal {
    pub fn begin(namespace: &Namespace) -> Self {
        Journal {
            namespace: namespace.clone(),
            bindings: namespace.snapshot(),
            entries: Vec::new(),
            recorded: FxHashSet::default(),
        }
    }

    /// Record `func` unless it already is. Returns `true` the first time.
    pub fn record_function(&mut self, func: &Function) -> bool {
        let first = self.recorded.insert(func.addr());
        if first {
            self.entries
                .push(Entry::Function(func.clone(), func.snapshot()));
        }
        first
    }

    /// Record `class` unless it already is. Returns `true` the first time.
    ///
    /// The class patch uses the result to visit each class once, which also
    /// stops it on classes that reach themselves through their attributes.
    pub fn record_class(&mut self, class: &Class) -> bool {
        let first = self.recorded.insert(class.addr());
        if first {
            self.entries
                .push(Entry::Class(class.clone(), class.snapshot_attrs()));
        }
        first
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep every change.
    pub fn commit(self) {
        tracing::trace!(objects = self.entries.len(), "journal committed");
    }

    /// Undo every recorded change.
    pub fn rollback(self) {
        tracing::debug!(objects = self.entries.len(), "rolling back merge");
        for entry in self.entries.into_iter().rev() {
            match entry {
                Entry::Function(func, state) => func.restore(state),
                Entry::Class(class, attrs) => class.restore_attrs(attrs),
            }
        }
        self.namespace.restore(self.bindings);
    }
}

#[cfg(test)]
mod tests;
