//! Merging a freshly compiled unit into a live module.

use std::fmt;

use ember_eval::{Interpreter, Module, Namespace, SELF_NAME};
use ember_ir::{CodeUnit, Name};

use crate::diff::NameDiff;
use crate::journal::Journal;
use crate::patch::{self, Outcome};
use crate::ReloadError;

/// What a merge did to the live namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: Vec<Name>,
    pub removed: Vec<Name>,
    /// Shared names whose old object was kept and updated in place (or
    /// chosen by an update hook).
    pub patched: Vec<Name>,
    /// Shared names now bound to the new object.
    pub rebound: Vec<Name>,
}

impl MergeSummary {
    /// True if the reload changed nothing observable.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.patched.is_empty()
            && self.rebound.is_empty()
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} removed, {} patched, {} rebound",
            self.added.len(),
            self.removed.len(),
            self.patched.len(),
            self.rebound.len()
        )
    }
}

/// Execute `unit` in isolation and merge the result into `module`.
///
/// Execution happens in a scratch namespace; if it fails the module is not
/// touched. The apply phase is journaled and rolled back if a patch fails.
pub fn merge(
    interpreter: &Interpreter,
    unit: &CodeUnit,
    module: &Module,
) -> Result<MergeSummary, ReloadError> {
    let scratch = Namespace::new();
    interpreter
        .exec_unit(unit, &scratch, module.name())
        .map_err(|source| ReloadError::Execution {
            module: module.name().to_string(),
            source,
        })?;

    let live = module.namespace();
    let diff = NameDiff::compute(&live.names(), &scratch.names(), &[SELF_NAME]);

    let mut journal = Journal::begin(live);
    match apply(interpreter, diff, live, &scratch, &mut journal) {
        Ok(summary) => {
            journal.commit();
            Ok(summary)
        }
        Err(err) => {
            journal.rollback();
            Err(err)
        }
    }
}

fn apply(
    interpreter: &Interpreter,
    diff: NameDiff,
    live: &Namespace,
    scratch: &Namespace,
    journal: &mut Journal,
) -> Result<MergeSummary, ReloadError> {
    let mut summary = MergeSummary::default();

    for name in diff.added {
        if let Some(value) = scratch.get(&name) {
            live.insert(name.clone(), value);
            summary.added.push(name);
        }
    }

    for name in diff.removed {
        live.remove(&name);
        summary.removed.push(name);
    }

    for name in diff.shared {
        let (Some(old), Some(new)) = (live.get(&name), scratch.get(&name)) else {
            continue;
        };
        let update = patch::update(interpreter, &old, &new, journal).map_err(|source| {
            ReloadError::Patch {
                name: name.to_string(),
                source,
            }
        })?;
        tracing::trace!(name = %name, outcome = ?update.outcome, "shared name");
        match update.outcome {
            Outcome::Unchanged => {}
            Outcome::Patched | Outcome::Hook => summary.patched.push(name.clone()),
            Outcome::Rebound => summary.rebound.push(name.clone()),
        }
        live.insert(name, update.value);
    }

    Ok(summary)
}
