//! Serialization utilities for reading and writing wrapper manifests.

use std::path::Path;
use std::{fs, io};

use crate::api::record::WrapperRecord;
use crate::error::GenerationError;

/// Write records to a file in JSON-lines format, replacing it atomically
pub fn write_jsonl_file<P: AsRef<Path>>(
    file_path: P,
    records: &[WrapperRecord],
) -> Result<(), GenerationError> {
    let mut content = String::new();
    for record in records {
        content += &record.to_jsonl_string()?;
        content.push('\n');
    }
    crate::utils::write_atomically(file_path.as_ref(), content.as_bytes())
}

/// Read records from a JSON-lines file
pub fn read_jsonl_file<P: AsRef<Path>>(file_path: P) -> Result<Vec<WrapperRecord>, GenerationError> {
    let path = file_path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| GenerationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut records = Vec::new();

    // Parse JSON-lines format: each line is a separate JSON object
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: WrapperRecord = serde_json::from_str(line).map_err(|e| GenerationError::Read {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, format!("line {}: {e}", line_num + 1)),
        })?;
        records.push(record);
    }

    Ok(records)
}
