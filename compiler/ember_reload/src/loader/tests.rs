#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::compiled::write_compiled;
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;

/// Reader that counts how many streams have been dropped.
struct Tracked {
    bytes: io::Cursor<Vec<u8>>,
    released: Rc<Cell<usize>>,
}

impl Read for Tracked {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.bytes.read(buf)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

/// Resolves every name to one fixed unit.
struct Fixed {
    kind: UnitKind,
    bytes: Vec<u8>,
    released: Rc<Cell<usize>>,
}

impl Fixed {
    fn new(kind: UnitKind, bytes: impl Into<Vec<u8>>) -> Self {
        Fixed {
            kind,
            bytes: bytes.into(),
            released: Rc::new(Cell::new(0)),
        }
    }
}

impl UnitResolver for Fixed {
    fn find_unit(&self, name: &str, _search: &[PathBuf]) -> Result<ResolvedUnit, ReloadError> {
        let location = PathBuf::from(format!("mem/{name}"));
        let reader = Tracked {
            bytes: io::Cursor::new(self.bytes.clone()),
            released: Rc::clone(&self.released),
        };
        Ok(ResolvedUnit {
            stream: Some(UnitStream::new(location.clone(), reader)),
            location,
            kind: self.kind,
        })
    }
}

fn load(resolver: &Fixed) -> Result<LoadOutcome, ReloadError> {
    Loader::new(resolver).load("unit", &[], None)
}

#[test]
fn source_is_parsed() {
    let resolver = Fixed::new(UnitKind::Source, "fn f() = 1");
    let LoadOutcome::Unit(loaded) = load(&resolver).unwrap() else {
        panic!("expected a unit");
    };
    assert_eq!(loaded.kind, UnitKind::Source);
    assert_eq!(loaded.unit.body.len(), 1);
    assert_eq!(loaded.unit.origin, "mem/unit");
    assert_eq!(resolver.released.get(), 1);
}

#[test]
fn compiled_is_decoded() {
    let unit = ember_parse::parse("let a = 1\nlet b = 2", "orig.em").unwrap();
    let mut bytes = Vec::new();
    write_compiled(&unit, &mut bytes).unwrap();
    let resolver = Fixed::new(UnitKind::Compiled, bytes);
    let LoadOutcome::Unit(loaded) = load(&resolver).unwrap() else {
        panic!("expected a unit");
    };
    assert_eq!(loaded.unit, unit);
    assert_eq!(resolver.released.get(), 1);
}

#[test]
fn stream_released_on_compile_error() {
    let resolver = Fixed::new(UnitKind::Source, "let = ");
    let err = load(&resolver).unwrap_err();
    assert!(matches!(err, ReloadError::Compile { .. }));
    assert_eq!(resolver.released.get(), 1);
}

#[test]
fn stream_released_on_unsupported_kind() {
    let resolver = Fixed::new(UnitKind::Native, vec![0x7f, b'E', b'L', b'F']);
    let outcome = load(&resolver).unwrap();
    assert!(matches!(
        outcome,
        LoadOutcome::Unsupported {
            kind: UnitKind::Native,
            ..
        }
    ));
    assert_eq!(resolver.released.get(), 1);
}

#[test]
fn corrupt_compiled_unit() {
    let resolver = Fixed::new(UnitKind::Compiled, "not compiled");
    let err = load(&resolver).unwrap_err();
    assert!(matches!(err, ReloadError::CorruptCompiled { .. }));
}

#[test]
fn package_directory_retries_init_in_own_path() {
    let dir = tempfile::tempdir().unwrap();
    let pkg = dir.path().join("app");
    std::fs::create_dir(&pkg).unwrap();
    std::fs::write(pkg.join("__init__.em"), "let version = 1").unwrap();

    let resolver = crate::FsResolver;
    let roots = vec![dir.path().to_path_buf()];
    let LoadOutcome::Unit(loaded) = Loader::new(&resolver).load("app", &roots, None).unwrap()
    else {
        panic!("expected a unit");
    };
    assert_eq!(loaded.location, pkg.join("__init__.em"));
    assert_eq!(loaded.package_dir.as_deref(), Some(pkg.as_path()));

    // An explicit package path takes precedence over the found directory.
    let elsewhere = tempfile::tempdir().unwrap();
    std::fs::write(elsewhere.path().join("__init__.em"), "let version = 2").unwrap();
    let own = vec![elsewhere.path().to_path_buf()];
    let LoadOutcome::Unit(loaded) = Loader::new(&resolver)
        .load("app", &roots, Some(&own))
        .unwrap()
    else {
        panic!("expected a unit");
    };
    assert_eq!(loaded.location, elsewhere.path().join("__init__.em"));
}
