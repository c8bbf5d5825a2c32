use crate::static_fit::StaticFitOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct StaticFitConfig {
    /// Recording JSON (`{ "words": [...], "fixations": [...] }`).
    #[serde(rename = "input")]
    pub input_path: PathBuf,
    #[serde(default)]
    pub output: StaticFitOutputConfig,
    #[serde(default)]
    pub options: StaticFitOptions,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StaticFitOutputConfig {
    /// Annotated recording; printed to stdout when absent.
    pub json_out: Option<PathBuf>,
    pub report_out: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<StaticFitConfig, String> {
    super::read_config(path)
}
