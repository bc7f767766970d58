#![allow(
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn names(list: &[&str]) -> Vec<Name> {
    list.iter().map(|s| Name::new(s)).collect()
}

#[test]
fn partitions_in_source_order() {
    let old = names(&["__name__", "a", "b", "c"]);
    let new = names(&["d", "c", "a"]);
    let diff = NameDiff::compute(&old, &new, &["__name__"]);
    assert_eq!(diff.added, names(&["d"]));
    assert_eq!(diff.removed, names(&["b"]));
    assert_eq!(diff.shared, names(&["a", "c"]));
}

#[test]
fn exempt_names_are_still_shared() {
    let old = names(&["__doc__", "x"]);
    let new = names(&["__doc__"]);
    let diff = NameDiff::compute(&old, &new, &["__doc__", "x"]);
    assert!(diff.removed.is_empty());
    assert_eq!(diff.shared, names(&["__doc__"]));
    let diff = diff.without_shared(&["__doc__"]);
    assert!(diff.is_empty());
}

#[test]
fn identical_lists_share_everything() {
    let both = names(&["f", "g"]);
    let diff = NameDiff::compute(&both, &both, &[]);
    assert!(diff.added.is_empty() && diff.removed.is_empty());
    assert_eq!(diff.shared, both);
}

fn name_list() -> impl Strategy<Value = Vec<Name>> {
    prop::collection::btree_set("[a-e]{1,2}", 0..12)
        .prop_map(|set| set.into_iter().map(|s| Name::new(&s)).collect())
}

fn as_set(list: &[Name]) -> BTreeSet<Name> {
    list.iter().cloned().collect()
}

proptest! {
    #[test]
    fn set_algebra_holds(old in name_list(), new in name_list()) {
        let diff = NameDiff::compute(&old, &new, &[]);
        let (old_set, new_set) = (as_set(&old), as_set(&new));

        prop_assert_eq!(as_set(&diff.added), &new_set - &old_set);
        prop_assert_eq!(as_set(&diff.removed), &old_set - &new_set);
        prop_assert_eq!(as_set(&diff.shared), &old_set & &new_set);

        // Applying the diff to `old` yields exactly `new`.
        let mut result = old_set.clone();
        for name in &diff.removed {
            result.remove(name);
        }
        result.extend(diff.added.iter().cloned());
        prop_assert_eq!(result, new_set);
    }

    #[test]
    fn exempt_names_never_removed(old in name_list(), new in name_list()) {
        let exempt: Vec<&str> = old.iter().take(2).map(|n| n.as_str()).collect();
        let diff = NameDiff::compute(&old, &new, &exempt);
        for name in &diff.removed {
            prop_assert!(!exempt.contains(&name.as_str()));
        }
        prop_assert_eq!(diff.added.len() + diff.shared.len(), new.len());
    }
}
