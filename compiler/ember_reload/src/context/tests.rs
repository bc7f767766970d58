#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn import_registers_on_success_only() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("good.em"), "let x = 1").unwrap();
    fs::write(dir.path().join("bad.em"), "let x = 1 / 0").unwrap();
    let mut ctx = ReloadContext::new([dir.path().to_path_buf()]);

    let good = ctx.import("good").unwrap();
    assert_eq!(good.origin(), Some(dir.path().join("good.em")));
    assert!(ctx.module("good").unwrap().ptr_eq(&good));
    assert!(ctx.import("good").unwrap().ptr_eq(&good));

    let err = ctx.import("bad").unwrap_err();
    assert!(matches!(err, ReloadError::Execution { .. }));
    assert!(ctx.module("bad").is_none());
}

#[test]
fn nested_import_loads_parent_package() {
    let dir = tempdir().unwrap();
    let pkg = dir.path().join("app");
    fs::create_dir(&pkg).unwrap();
    fs::write(pkg.join("__init__.em"), "").unwrap();
    fs::write(pkg.join("util.em"), "fn helper() = 1").unwrap();
    let mut ctx = ReloadContext::new([dir.path().to_path_buf()]);

    let util = ctx.import("app.util").unwrap();
    let app = ctx.module("app").unwrap();
    assert!(app.is_package());
    assert_eq!(app.search_path(), Some(&[pkg.clone()][..]));
    assert!(util.get("helper").is_some());
}

#[test]
fn nested_reload_needs_registered_package() {
    let ctx = ReloadContext::new(Vec::new());
    let err = ctx.reload_module(&Module::new("ghost.child")).unwrap_err();
    assert!(matches!(err, ReloadError::UnknownPackage { ref package, .. } if package == "ghost"));
}

#[test]
fn parent_must_be_a_package() {
    let mut ctx = ReloadContext::new(Vec::new());
    ctx.register(Module::new("plain"));
    let err = ctx.reload_module(&Module::new("plain.child")).unwrap_err();
    assert!(matches!(err, ReloadError::NotAPackage { .. }));
}

#[test]
fn import_of_native_unit_is_unsupported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("fast.so"), [0u8; 8]).unwrap();
    let mut ctx = ReloadContext::new([dir.path().to_path_buf()]);
    let err = ctx.import("fast").unwrap_err();
    assert!(matches!(
        err,
        ReloadError::UnsupportedKind {
            kind: UnitKind::Native,
            ..
        }
    ));
}

#[test]
fn builder_configures_call_depth() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("deep.em"),
        "fn down(n) { if n == 0 { return 0 } return down(n - 1) }\nlet r = down(20)",
    )
    .unwrap();
    let mut ctx = ReloadContext::builder()
        .search_root(dir.path())
        .max_call_depth(10)
        .build();
    let err = ctx.import("deep").unwrap_err();
    assert!(matches!(
        err,
        ReloadError::Execution {
            source: ember_eval::EvalError::RecursionLimit { depth: 10 },
            ..
        }
    ));
}
