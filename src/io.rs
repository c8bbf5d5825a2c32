//! File helpers for recordings, sample streams and reports.
//!
//! - `load_json`: read and parse any deserializable value.
//! - `load_recording`, `load_samples`, `load_layout`: typed wrappers.
//! - `write_json_file`: pretty-print a serializable value to disk.
//! - `write_text_file`: write plain text such as the statistics table.

use crate::static_fit::Recording;
use crate::types::{Sample, WordBox};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&data).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
}

pub fn load_recording(path: &Path) -> Result<Recording, String> {
    load_json(path)
}

pub fn load_samples(path: &Path) -> Result<Vec<Sample>, String> {
    load_json(path)
}

pub fn load_layout(path: &Path) -> Result<Vec<WordBox>, String> {
    load_json(path)
}

pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

pub fn write_text_file(path: &Path, text: &str) -> Result<(), String> {
    ensure_parent_dir(path)?;
    fs::write(path, text).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
