//! JSON configuration of the command-line tools.
//!
//! Every option block is optional and falls back to its defaults, so the
//! smallest configuration only names the input files.

pub mod replay;
pub mod static_fit;

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
