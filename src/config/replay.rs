use crate::online::ReadingOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct ReplayConfig {
    /// JSON array of `{x, y, timestamp}` samples.
    pub samples: PathBuf,
    /// JSON array of word boxes shown during the session.
    pub layout: PathBuf,
    #[serde(default)]
    pub output: ReplayOutputConfig,
    #[serde(default)]
    pub options: ReadingOptions,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReplayOutputConfig {
    /// Mapped words as JSON.
    pub trace_out: Option<PathBuf>,
    /// Word statistics table; printed to stdout when absent.
    pub statistics_out: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<ReplayConfig, String> {
    super::read_config(path)
}
