//! Compiled unit form (`.emc`).
//!
//! ```text
//! b"EMBC" | u32 LE format version | bincode-encoded CodeUnit
//! ```
//!
//! Loading a compiled unit skips lexing and parsing entirely. A unit written
//! by a different format version is rejected rather than guessed at.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use ember_ir::CodeUnit;

use crate::resolve::COMPILED_EXTENSION;
use crate::ReloadError;

pub const COMPILED_MAGIC: &[u8; 4] = b"EMBC";

/// Bump whenever the serialized tree changes shape.
pub const COMPILED_FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = COMPILED_MAGIC.len() + 4;

#[derive(Debug, thiserror::Error)]
pub enum CompiledError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{0}")]
    Corrupt(String),
}

/// Write `unit` in compiled form.
pub fn write_compiled(unit: &CodeUnit, mut out: impl Write) -> io::Result<()> {
    let payload = bincode::serialize(unit).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("failed to serialize unit: {e}"),
        )
    })?;
    out.write_all(COMPILED_MAGIC)?;
    out.write_all(&COMPILED_FORMAT_VERSION.to_le_bytes())?;
    out.write_all(&payload)?;
    out.flush()
}

/// Read a unit previously written by [`write_compiled`].
pub fn read_compiled(mut input: impl Read) -> Result<CodeUnit, CompiledError> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    decode(&bytes).map_err(CompiledError::Corrupt)
}

fn decode(bytes: &[u8]) -> Result<CodeUnit, String> {
    if bytes.len() < HEADER_LEN {
        return Err(format!("truncated header ({} bytes)", bytes.len()));
    }
    let (header, payload) = bytes.split_at(HEADER_LEN);
    let (magic, version) = header.split_at(COMPILED_MAGIC.len());
    if magic != COMPILED_MAGIC {
        return Err("bad magic".to_string());
    }
    let mut raw = [0u8; 4];
    raw.copy_from_slice(version);
    let version = u32::from_le_bytes(raw);
    if version != COMPILED_FORMAT_VERSION {
        return Err(format!(
            "format version {version}, expected {COMPILED_FORMAT_VERSION}"
        ));
    }
    bincode::deserialize(payload).map_err(|e| format!("failed to deserialize unit: {e}"))
}

/// Parse the source file at `source` and write its compiled form next to it
/// (same stem, `.emc`). Returns the path written.
#[tracing::instrument(level = "debug", skip_all, fields(source = %source.display()))]
pub fn compile_file(source: &Path) -> Result<PathBuf, ReloadError> {
    let text = fs::read_to_string(source).map_err(|e| ReloadError::io(source, e))?;
    let unit = ember_parse::parse(&text, &source.to_string_lossy()).map_err(|e| {
        ReloadError::Compile {
            location: source.to_path_buf(),
            source: e,
        }
    })?;

    let target = source.with_extension(COMPILED_EXTENSION);
    let file = File::create(&target).map_err(|e| ReloadError::io(&target, e))?;
    write_compiled(&unit, BufWriter::new(file)).map_err(|e| ReloadError::io(&target, e))?;
    tracing::debug!(target = %target.display(), "wrote compiled unit");
    Ok(target)
}

#[cfg(test)]
mod tests;
