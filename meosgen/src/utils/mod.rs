pub(crate) mod jsonl;

use std::{
    io::{self, Write},
    path::Path,
};

use crate::error::GenerationError;

/// Write `content` to a temporary file next to `path` and move it into place, so a
/// failed run never leaves a partially written file behind
pub(crate) fn write_atomically(path: &Path, content: &[u8]) -> Result<(), GenerationError> {
    let write_error = |source: io::Error| GenerationError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(content).map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}
