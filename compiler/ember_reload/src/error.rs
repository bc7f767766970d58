//! Reload failures.
//!
//! Everything that can go wrong before the live namespace is touched
//! (resolution, I/O, compilation, execution) aborts with no effect. A `Patch`
//! error is reported after the changes made so far have been rolled back.

use std::io;
use std::path::PathBuf;

use ember_eval::EvalError;
use ember_parse::ParseError;

use crate::UnitKind;

#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error("no unit named `{name}` found in {searched:?}")]
    NotFound { name: String, searched: Vec<PathBuf> },

    #[error("cannot locate `{module}`: parent package `{package}` is not loaded")]
    UnknownPackage { module: String, package: String },

    #[error("cannot locate `{module}`: `{package}` is not a package")]
    NotAPackage { module: String, package: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to compile {}: {source}", location.display())]
    Compile {
        location: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("corrupt compiled unit {}: {reason}", location.display())]
    CorruptCompiled { location: PathBuf, reason: String },

    /// Only `import` reports this; a reload hands the unit to the fallback.
    #[error("`{name}` resolves to a {kind} unit, which cannot be loaded")]
    UnsupportedKind { name: String, kind: UnitKind },

    #[error("executing `{module}` failed: {source}")]
    Execution {
        module: String,
        #[source]
        source: EvalError,
    },

    #[error("patching `{name}` failed, changes rolled back: {source}")]
    Patch {
        name: String,
        #[source]
        source: EvalError,
    },
}

impl ReloadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ReloadError::Io {
            path: path.into(),
            source,
        }
    }
}
