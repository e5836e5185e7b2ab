use std::fs;
use std::path::{Path, PathBuf};

use nk_core::{ErrorInfo, NkError};
use serde::{Deserialize, Serialize};

/// Knobs controlling run discovery, log parsing and output location.
///
/// Every field has a default matching the historical NK directory layout, so
/// a YAML file only needs to list what differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MungeOptions {
    /// Glob, relative to the root, selecting replicate directories.
    pub pattern: String,
    pub table_file: String,
    pub log_file: String,
    pub index_column: String,
    /// First token of a settings line in the run log.
    pub settings_marker: String,
    /// Prefix of the first generation line; header parsing stops there.
    pub header_terminator: String,
    /// Inject the parent directory name of each run as a column.
    pub treatment: bool,
    pub treatment_column: String,
    /// Output CSV; relative paths are resolved against the root.
    pub output: PathBuf,
}

impl Default for MungeOptions {
    fn default() -> Self {
        Self {
            pattern: "*/[0-9]*".to_string(),
            table_file: "oee.csv".to_string(),
            log_file: "run.log".to_string(),
            index_column: "generation".to_string(),
            settings_marker: "set".to_string(),
            header_terminator: "0".to_string(),
            treatment: true,
            treatment_column: "treatment".to_string(),
            output: PathBuf::from("../data/nk_data.csv"),
        }
    }
}

impl MungeOptions {
    /// Reads options from a YAML file, filling missing fields with defaults.
    pub fn load(path: &Path) -> Result<Self, NkError> {
        let text =
            fs::read_to_string(path).map_err(|err| NkError::io("options-read", path, err))?;
        serde_yaml::from_str(&text).map_err(|err| {
            NkError::Serde(
                ErrorInfo::new("options-yaml", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Resolves the output path against `root`.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        if self.output.is_absolute() {
            self.output.clone()
        } else {
            root.join(&self.output)
        }
    }
}
