//! JSONL reading and atomic file writes

use serde::Serialize;
use serde_json::Value;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Lines of a JSONL file, split into parsed values and a count of lines
/// that were not valid UTF-8 JSON
#[derive(Debug, Default)]
pub struct JsonlLines {
    pub values: Vec<Value>,
    pub unparsable: usize,
}

/// Read every non-blank line of a JSONL file as a JSON value. Lines that
/// are not UTF-8 or not JSON are counted, not fatal.
pub fn read_jsonl_values(path: &Path) -> std::io::Result<JsonlLines> {
    let reader = BufReader::new(File::open(path)?);
    let mut out = JsonlLines::default();

    for line in reader.split(b'\n') {
        let line = line?;
        let Ok(text) = std::str::from_utf8(&line) else {
            out.unparsable += 1;
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(text) {
            Ok(value) => out.values.push(value),
            Err(_) => out.unparsable += 1,
        }
    }

    Ok(out)
}

/// Append records to a JSONL file, one per line
pub fn append_jsonl<T: Serialize>(path: &Path, records: &[T]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// `<name>.partial` next to `path`
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Write to a sibling temp file, then rename it over `path`. Readers see
/// either the old contents or the new, never a torn file.
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = partial_path(path);
    let mut file = File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    std::fs::rename(&temp_path, path)
}
