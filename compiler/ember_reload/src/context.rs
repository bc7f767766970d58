//! The reload session: module registry, search roots and collaborators.

use std::fmt;
use std::path::{Path, PathBuf};

use ember_eval::{Interpreter, Module};
use ember_ir::Name;
use rustc_hash::FxHashMap;

use crate::loader::{LoadOutcome, LoadedUnit, Loader};
use crate::merge::{merge, MergeSummary};
use crate::resolve::{FsResolver, SearchPath, UnitResolver};
use crate::{ReloadError, UnitKind};

/// What to do with a module whose storage cannot be compiled here.
pub trait FallbackReload {
    fn reload(
        &self,
        module: &Module,
        location: &Path,
        kind: UnitKind,
    ) -> Result<Module, ReloadError>;
}

/// Leaves the module as it is and logs a warning.
#[derive(Copy, Clone, Debug, Default)]
pub struct KeepCurrent;

impl FallbackReload for KeepCurrent {
    fn reload(
        &self,
        module: &Module,
        location: &Path,
        kind: UnitKind,
    ) -> Result<Module, ReloadError> {
        tracing::warn!(
            module = %module.name(),
            location = %location.display(),
            %kind,
            "unit kind not reloadable, keeping current module"
        );
        Ok(module.clone())
    }
}

/// Builder for [`ReloadContext`].
#[derive(Default)]
pub struct ReloadContextBuilder {
    roots: Vec<PathBuf>,
    resolver: Option<Box<dyn UnitResolver>>,
    fallback: Option<Box<dyn FallbackReload>>,
    max_call_depth: Option<usize>,
}

impl ReloadContextBuilder {
    /// Append a top-level search root.
    #[must_use]
    pub fn search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Append every root of `path`.
    #[must_use]
    pub fn search_path(mut self, path: SearchPath) -> Self {
        self.roots.extend(path.into_roots());
        self
    }

    #[must_use]
    pub fn resolver(mut self, resolver: impl UnitResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    #[must_use]
    pub fn fallback(mut self, fallback: impl FallbackReload + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = Some(depth);
        self
    }

    pub fn build(self) -> ReloadContext {
        let interpreter = match self.max_call_depth {
            Some(depth) => Interpreter::new().with_max_depth(depth),
            None => Interpreter::new(),
        };
        ReloadContext {
            modules: FxHashMap::default(),
            roots: self.roots,
            resolver: self.resolver.unwrap_or_else(|| Box::new(FsResolver)),
            fallback: self.fallback.unwrap_or_else(|| Box::new(KeepCurrent)),
            interpreter,
        }
    }
}

/// Everything a reload needs besides the module itself.
///
/// Holds the registry of loaded modules, used to find a nested module's
/// parent package and its search locations. Lives for as long as the
/// program wants to reload; dropping it drops the registry's handles, not
/// the modules other code still holds.
pub struct ReloadContext {
    modules: FxHashMap<Name, Module>,
    roots: Vec<PathBuf>,
    resolver: Box<dyn UnitResolver>,
    fallback: Box<dyn FallbackReload>,
    interpreter: Interpreter,
}

impl ReloadContext {
    pub fn builder() -> ReloadContextBuilder {
        ReloadContextBuilder::default()
    }

    /// Context with the given roots and default collaborators.
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self::builder().search_path(SearchPath::new(roots)).build()
    }

    /// Context with roots from `EMBER_PATH`.
    pub fn from_env() -> Self {
        Self::builder().search_path(SearchPath::from_env()).build()
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Add `module` to the registry under its qualified name, returning the
    /// handle it replaces.
    pub fn register(&mut self, module: Module) -> Option<Module> {
        self.modules.insert(module.name().clone(), module)
    }

    pub fn module(&self, name: &str) -> Option<Module> {
        self.modules.get(name).cloned()
    }

    /// Load `name` for the first time, or return the registered module.
    ///
    /// Parent packages are imported first. The unit executes directly in
    /// the new module's namespace and the module is registered only if that
    /// succeeds.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn import(&mut self, name: &str) -> Result<Module, ReloadError> {
        if let Some(module) = self.modules.get(name) {
            return Ok(module.clone());
        }

        let (parent, leaf) = match name.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, name),
        };
        if let Some(parent) = parent {
            self.import(parent)?;
        }
        let search = self.search_locations(name, parent)?;

        let loaded = match Loader::new(self.resolver.as_ref()).load(leaf, &search, None)? {
            LoadOutcome::Unit(loaded) => loaded,
            LoadOutcome::Unsupported { kind, .. } => {
                return Err(ReloadError::UnsupportedKind {
                    name: name.to_string(),
                    kind,
                })
            }
        };
        let LoadedUnit {
            unit,
            location,
            package_dir,
            ..
        } = loaded;

        let module = match package_dir {
            Some(dir) => Module::package(name, vec![dir]),
            None => Module::new(name),
        };
        self.interpreter
            .exec_unit(&unit, module.namespace(), module.name())
            .map_err(|source| ReloadError::Execution {
                module: name.to_string(),
                source,
            })?;
        module.set_origin(&location);

        tracing::debug!(location = %location.display(), names = module.namespace().len(), "imported");
        self.register(module.clone());
        Ok(module)
    }

    /// Reload `module` in place from its current storage.
    ///
    /// Returns the same handle. On error the module is unchanged.
    pub fn reload_module(&self, module: &Module) -> Result<Module, ReloadError> {
        self.reload_module_with_summary(module)
            .map(|(module, _)| module)
    }

    /// Like [`reload_module`](Self::reload_module), also returning what the
    /// merge did. The summary is `None` when the fallback handled the
    /// module.
    #[tracing::instrument(level = "debug", skip_all, fields(module = %module.name()))]
    pub fn reload_module_with_summary(
        &self,
        module: &Module,
    ) -> Result<(Module, Option<MergeSummary>), ReloadError> {
        let (parent, leaf) = module.split_name();
        let search = self.search_locations(module.name(), parent)?;

        let loader = Loader::new(self.resolver.as_ref());
        match loader.load(leaf, &search, module.search_path())? {
            LoadOutcome::Unsupported { location, kind } => {
                let module = self.fallback.reload(module, &location, kind)?;
                Ok((module, None))
            }
            LoadOutcome::Unit(loaded) => {
                let summary = merge(&self.interpreter, &loaded.unit, module)?;
                module.set_origin(&loaded.location);
                tracing::debug!(
                    location = %loaded.location.display(),
                    kind = %loaded.kind,
                    %summary,
                    "reloaded"
                );
                Ok((module.clone(), Some(summary)))
            }
        }
    }

    /// Where to look for a unit whose parent package is `parent`.
    fn search_locations(
        &self,
        module: &str,
        parent: Option<&str>,
    ) -> Result<Vec<PathBuf>, ReloadError> {
        let Some(parent) = parent else {
            return Ok(self.roots.clone());
        };
        let package = self
            .modules
            .get(parent)
            .ok_or_else(|| ReloadError::UnknownPackage {
                module: module.to_string(),
                package: parent.to_string(),
            })?;
        package
            .search_path()
            .map(<[PathBuf]>::to_vec)
            .ok_or_else(|| ReloadError::NotAPackage {
                module: module.to_string(),
                package: parent.to_string(),
            })
    }
}

impl fmt::Debug for ReloadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.modules.keys().map(Name::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ReloadContext")
            .field("roots", &self.roots)
            .field("modules", &names)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
