//! Ember Reload - replace the code of a running module in place.
//!
//! A reload finds the module's current storage, compiles it, executes it in
//! a scratch namespace and merges the result into the live namespace:
//!
//! ```text
//! ReloadContext::reload_module(&module)
//!   Loader   resolve leaf on the search path, read source or compiled form
//!   merge    exec into scratch -> NameDiff(live, scratch) -> apply
//!   patch    per shared name: keep / rebind / hook / patch class|fn|method
//! ```
//!
//! Functions, bound methods and classes keep their identity across a reload
//! and take on the new behaviour, so references held anywhere in the running
//! program (including instances, through their class) see the new code.
//! Other values are simply rebound.
//!
//! Nothing is mutated until the new unit has executed successfully, and a
//! patch failure rolls back everything applied before it.
//!
//! ```text
//! let mut ctx = ReloadContext::new([PathBuf::from("scripts")]);
//! let shapes = ctx.import("shapes")?;
//! // ... edit scripts/shapes.em ...
//! ctx.reload_module(&shapes)?;
//! ```

mod compiled;
mod context;
mod diff;
mod error;
mod journal;
mod loader;
mod merge;
mod patch;
mod resolve;

pub use compiled::{
    compile_file, read_compiled, write_compiled, CompiledError, COMPILED_FORMAT_VERSION,
    COMPILED_MAGIC,
};
pub use context::{FallbackReload, KeepCurrent, ReloadContext, ReloadContextBuilder};
pub use diff::NameDiff;
pub use error::ReloadError;
pub use journal::Journal;
pub use loader::{LoadOutcome, LoadedUnit, Loader};
pub use merge::{merge, MergeSummary};
pub use patch::{
    update, update_class, update_function, Outcome, Update, PRESERVED_SLOTS, UPDATE_HOOK,
};
pub use resolve::{
    FsResolver, ResolvedUnit, SearchPath, UnitKind, UnitResolver, UnitStream,
    COMPILED_EXTENSION, PACKAGE_INIT, SEARCH_PATH_VAR, SOURCE_EXTENSION,
};
