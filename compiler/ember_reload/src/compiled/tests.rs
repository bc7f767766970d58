#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const SOURCE: &str = "/// Doubles.\nfn double(x, by = 2) = x * by\nclass Box { let size = 3 }";

fn sample() -> CodeUnit {
    ember_parse::parse(SOURCE, "sample.em").unwrap()
}

#[test]
fn written_unit_reads_back_identical() {
    let unit = sample();
    let mut bytes = Vec::new();
    write_compiled(&unit, &mut bytes).unwrap();
    assert_eq!(&bytes[..4], COMPILED_MAGIC);
    assert_eq!(read_compiled(&bytes[..]).unwrap(), unit);
}

#[test]
fn rejects_bad_magic() {
    let err = read_compiled(&b"NOPE\x01\x00\x00\x00"[..]).unwrap_err();
    assert!(matches!(err, CompiledError::Corrupt(ref reason) if reason == "bad magic"));
}

#[test]
fn rejects_other_versions() {
    let mut bytes = Vec::new();
    write_compiled(&sample(), &mut bytes).unwrap();
    bytes[4..8].copy_from_slice(&(COMPILED_FORMAT_VERSION + 1).to_le_bytes());
    let err = read_compiled(&bytes[..]).unwrap_err();
    assert!(err.to_string().contains("format version"));
}

#[test]
fn rejects_truncated_input() {
    let err = read_compiled(&b"EMB"[..]).unwrap_err();
    assert!(err.to_string().contains("truncated"));

    let mut bytes = Vec::new();
    write_compiled(&sample(), &mut bytes).unwrap();
    bytes.truncate(bytes.len() / 2);
    assert!(matches!(
        read_compiled(&bytes[..]),
        Err(CompiledError::Corrupt(_))
    ));
}

#[test]
fn compile_file_writes_next_to_source() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("sample.em");
    std::fs::write(&source, SOURCE).unwrap();

    let target = compile_file(&source).unwrap();
    assert_eq!(target, dir.path().join("sample.emc"));
    let unit = read_compiled(File::open(&target).unwrap()).unwrap();
    assert_eq!(unit.body, sample().body);
}

#[test]
fn compile_file_reports_parse_errors() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("broken.em");
    std::fs::write(&source, "fn (").unwrap();
    let err = compile_file(&source).unwrap_err();
    assert!(matches!(err, ReloadError::Compile { ref location, .. } if *location == source));
    assert!(!dir.path().join("broken.emc").exists());
}
