//! Finding and compiling the current version of a unit.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use ember_ir::CodeUnit;

use crate::compiled::{read_compiled, CompiledError};
use crate::resolve::{ResolvedUnit, UnitResolver, UnitStream, PACKAGE_INIT};
use crate::{ReloadError, UnitKind};

/// A unit ready to execute.
#[derive(Debug)]
pub struct LoadedUnit {
    pub unit: CodeUnit,
    /// File the unit was read from.
    pub location: PathBuf,
    pub kind: UnitKind,
    /// Set when the name resolved to a package directory and `unit` is its
    /// `__init__`.
    pub package_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum LoadOutcome {
    Unit(LoadedUnit),
    /// The storage is neither source nor compiled form. Nothing was read;
    /// the caller hands the module to its fallback.
    Unsupported { location: PathBuf, kind: UnitKind },
}

/// Resolves a leaf name and turns its storage into a `CodeUnit`.
pub struct Loader<'a> {
    resolver: &'a dyn UnitResolver,
}

impl<'a> Loader<'a> {
    pub fn new(resolver: &'a dyn UnitResolver) -> Self {
        Loader { resolver }
    }

    /// Load `leaf` from `search`.
    ///
    /// A package directory is retried as its `__init__` unit in
    /// `package_path` (the module's own search locations) when given,
    /// otherwise in the directory that was found.
    pub fn load(
        &self,
        leaf: &str,
        search: &[PathBuf],
        package_path: Option<&[PathBuf]>,
    ) -> Result<LoadOutcome, ReloadError> {
        let mut found = self.resolver.find_unit(leaf, search)?;
        let mut package_dir = None;

        if found.kind == UnitKind::PackageDirectory {
            let dir = found.location.clone();
            let retry = package_path.map_or_else(|| vec![dir.clone()], <[PathBuf]>::to_vec);
            tracing::debug!(package = %dir.display(), "retrying package as `{}`", PACKAGE_INIT);
            found = self.resolver.find_unit(PACKAGE_INIT, &retry)?;
            package_dir = Some(dir);
        }

        let ResolvedUnit {
            stream,
            location,
            kind,
        } = found;

        let unit = match kind {
            UnitKind::Source => compile_source(require_stream(stream, &location)?, &location)?,
            UnitKind::Compiled => {
                decode_compiled(require_stream(stream, &location)?, &location)?
            }
            UnitKind::PackageDirectory | UnitKind::Native => {
                return Ok(LoadOutcome::Unsupported { location, kind });
            }
        };

        Ok(LoadOutcome::Unit(LoadedUnit {
            unit,
            location,
            kind,
            package_dir,
        }))
    }
}

fn require_stream(stream: Option<UnitStream>, location: &Path) -> Result<UnitStream, ReloadError> {
    stream.ok_or_else(|| {
        ReloadError::io(
            location,
            io::Error::new(io::ErrorKind::NotFound, "resolver returned no stream"),
        )
    })
}

fn compile_source(mut stream: UnitStream, location: &Path) -> Result<CodeUnit, ReloadError> {
    let mut text = String::new();
    stream
        .read_to_string(&mut text)
        .map_err(|e| ReloadError::io(location, e))?;
    ember_parse::parse(&text, &location.to_string_lossy()).map_err(|source| {
        ReloadError::Compile {
            location: location.to_path_buf(),
            source,
        }
    })
}

fn decode_compiled(stream: UnitStream, location: &Path) -> Result<CodeUnit, ReloadError> {
    read_compiled(stream).map_err(|err| match err {
        CompiledError::Io(e) => ReloadError::io(location, e),
        CompiledError::Corrupt(reason) => ReloadError::CorruptCompiled {
            location: location.to_path_buf(),
            reason,
        },
    })
}

#[cfg(test)]
mod tests;
