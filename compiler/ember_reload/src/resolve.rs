//! Locating units on a search path.
//!
//! A unit is found by leaf name in an ordered list of directories. Each
//! directory is checked for, in order:
//!
//! ```text
//! <root>/<leaf>/__init__.em(c)   package directory
//! <root>/<leaf>.em               source text
//! <root>/<leaf>.emc              compiled form
//! <root>/<leaf>.{so,dylib,dll}   native library (not loadable here)
//! ```
//!
//! The first directory with any match wins.

use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::ReloadError;

pub const SOURCE_EXTENSION: &str = "em";
pub const COMPILED_EXTENSION: &str = "emc";
const NATIVE_EXTENSIONS: &[&str] = &["so", "dylib", "dll"];

/// Leaf name of the unit that holds a package's own code.
pub const PACKAGE_INIT: &str = "__init__";

/// Environment variable read by [`SearchPath::from_env`].
pub const SEARCH_PATH_VAR: &str = "EMBER_PATH";

/// What a resolved location holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Source,
    Compiled,
    PackageDirectory,
    Native,
}

impl UnitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitKind::Source => "source",
            UnitKind::Compiled => "compiled",
            UnitKind::PackageDirectory => "package directory",
            UnitKind::Native => "native",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An open handle on a unit's storage.
///
/// Released when dropped, so every path out of the loader (success,
/// fallback, compile error) closes it.
pub struct UnitStream {
    location: PathBuf,
    reader: Box<dyn Read>,
}

impl UnitStream {
    pub fn new(location: impl Into<PathBuf>, reader: impl Read + 'static) -> Self {
        UnitStream {
            location: location.into(),
            reader: Box::new(reader),
        }
    }

    /// Open `path` for buffered reading.
    pub fn open(path: &Path) -> Result<Self, ReloadError> {
        let file = File::open(path).map_err(|e| ReloadError::io(path, e))?;
        Ok(UnitStream::new(path, BufReader::new(file)))
    }

    pub fn location(&self) -> &Path {
        &self.location
    }
}

impl Read for UnitStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Drop for UnitStream {
    fn drop(&mut self) {
        tracing::trace!(location = %self.location.display(), "released unit stream");
    }
}

impl fmt::Debug for UnitStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitStream")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Result of a successful lookup. Package directories have no stream.
#[derive(Debug)]
pub struct ResolvedUnit {
    pub stream: Option<UnitStream>,
    pub location: PathBuf,
    pub kind: UnitKind,
}

/// Finds the storage backing a unit.
///
/// Implement this to load units from somewhere other than the file system
/// (an archive, an in-memory map in tests).
pub trait UnitResolver {
    /// Look `name` up in `search`, in order. A miss on every entry is
    /// `ReloadError::NotFound`.
    fn find_unit(&self, name: &str, search: &[PathBuf]) -> Result<ResolvedUnit, ReloadError>;
}

/// Resolves units against directories on the local file system.
#[derive(Copy, Clone, Debug, Default)]
pub struct FsResolver;

impl UnitResolver for FsResolver {
    fn find_unit(&self, name: &str, search: &[PathBuf]) -> Result<ResolvedUnit, ReloadError> {
        for root in search {
            if let Some(found) = probe(root, name)? {
                tracing::debug!(
                    name,
                    location = %found.location.display(),
                    kind = %found.kind,
                    "resolved unit"
                );
                return Ok(found);
            }
        }
        Err(ReloadError::NotFound {
            name: name.to_string(),
            searched: search.to_vec(),
        })
    }
}

fn probe(root: &Path, name: &str) -> Result<Option<ResolvedUnit>, ReloadError> {
    let dir = root.join(name);
    if dir.is_dir() && is_package_dir(&dir) {
        return Ok(Some(ResolvedUnit {
            stream: None,
            location: dir,
            kind: UnitKind::PackageDirectory,
        }));
    }

    let candidates = [
        (SOURCE_EXTENSION, UnitKind::Source),
        (COMPILED_EXTENSION, UnitKind::Compiled),
    ]
    .into_iter()
    .chain(NATIVE_EXTENSIONS.iter().map(|ext| (*ext, UnitKind::Native)));

    for (extension, kind) in candidates {
        let path = root.join(format!("{name}.{extension}"));
        if path.is_file() {
            return Ok(Some(ResolvedUnit {
                stream: Some(UnitStream::open(&path)?),
                location: path,
                kind,
            }));
        }
    }
    Ok(None)
}

fn is_package_dir(dir: &Path) -> bool {
    [SOURCE_EXTENSION, COMPILED_EXTENSION]
        .iter()
        .any(|ext| dir.join(format!("{PACKAGE_INIT}.{ext}")).is_file())
}

/// Ordered list of default search roots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchPath(Vec<PathBuf>);

impl SearchPath {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        SearchPath(roots.into_iter().collect())
    }

    /// Roots from `EMBER_PATH`, split with the platform's path-list
    /// separator. Unset means empty.
    pub fn from_env() -> Self {
        env::var_os(SEARCH_PATH_VAR).map_or_else(SearchPath::default, |v| Self::parse(&v))
    }

    /// Split a path list such as `"a:b"` (`"a;b"` on Windows). Empty entries
    /// are skipped.
    pub fn parse(list: &OsStr) -> Self {
        SearchPath(
            env::split_paths(list)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
        )
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn into_roots(self) -> Vec<PathBuf> {
        self.0
    }
}
