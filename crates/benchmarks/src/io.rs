//! I/O operations for annotations and aggregated outputs.
//!
//! Run artifacts are read by [`crate::loader`]; this module covers the
//! remaining files: the annotation table going in and the history payload
//! and summary coming out.

use crate::warning::{Warning, WarningSink};
use indexmap::IndexMap;
use search_bench_core::{AnnotationEntry, AnnotationTable};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// Read an annotation table from a JSON object file.
///
/// Keys that are not run timestamps are reported to `sink` and dropped.
pub fn read_annotations(path: impl AsRef<Path>, sink: &mut dyn WarningSink) -> io::Result<AnnotationTable> {
    let content = fs::read_to_string(path)?;
    let raw: IndexMap<String, AnnotationEntry> = serde_json::from_str(&content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let (table, rejected) = AnnotationTable::from_entries(raw);
    for key in rejected {
        sink.warn(Warning::InvalidAnnotationKey { key });
    }
    Ok(table)
}

/// Serialize `value` as pretty JSON.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> io::Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write `value` as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> io::Result<()> {
    let json = to_json_string(value)?;
    write_text(json, path)
}

/// Write text, creating parent directories as needed.
pub fn write_text(text: impl AsRef<[u8]>, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)
}
