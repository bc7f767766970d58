//! Name set algebra shared by the module merge and the class patch.

use ember_ir::Name;
use rustc_hash::FxHashSet;

/// Partition of two name lists.
///
/// - `added`: in `new` only, in `new`'s order
/// - `removed`: in `old` only, in `old`'s order
/// - `shared`: in both, in `old`'s order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameDiff {
    pub added: Vec<Name>,
    pub removed: Vec<Name>,
    pub shared: Vec<Name>,
}

impl NameDiff {
    /// Names listed in `exempt` are never reported as removed.
    pub fn compute(old: &[Name], new: &[Name], exempt: &[&str]) -> Self {
        let old_set: FxHashSet<&str> = old.iter().map(Name::as_str).collect();
        let new_set: FxHashSet<&str> = new.iter().map(Name::as_str).collect();

        let added = new
            .iter()
            .filter(|n| !old_set.contains(n.as_str()))
            .cloned()
            .collect();
        let (shared, removed) = old
            .iter()
            .cloned()
            .partition::<Vec<_>, _>(|n| new_set.contains(n.as_str()));
        let removed = removed
            .into_iter()
            .filter(|n| !exempt.contains(&n.as_str()))
            .collect();

        NameDiff {
            added,
            removed,
            shared,
        }
    }

    /// Drop `names` from the shared set.
    #[must_use]
    pub fn without_shared(mut self, names: &[&str]) -> Self {
        self.shared.retain(|n| !names.contains(&n.as_str()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.shared.is_empty()
    }
}

#[cfg(test)]
mod tests;
