use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};
use crate::matcher::DEFAULT_THRESHOLD;
use crate::vocabulary::Vocabulary;

/// Directory, relative to the input folder, receiving normalized workbooks.
pub const DEFAULT_ACCEPTED_DIR: &str = "Formatted";
/// Directory, relative to the input folder, receiving untouched rejected files.
pub const DEFAULT_REJECTED_DIR: &str = "Bad files";

/// Settings for a folder run. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerConfig {
    /// Canonical column names.
    pub vocabulary: Vocabulary,
    /// Minimum similarity score (0–100) for a label to be renamed.
    pub threshold: u8,
    pub accepted_dir: String,
    pub rejected_dir: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            threshold: DEFAULT_THRESHOLD,
            accepted_dir: DEFAULT_ACCEPTED_DIR.to_string(),
            rejected_dir: DEFAULT_REJECTED_DIR.to_string(),
        }
    }
}

impl NormalizerConfig {
    /// Loads and validates a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make every sheet fail or every label match.
    pub fn validate(&self) -> Result<()> {
        if self.vocabulary.is_empty() {
            return Err(ToolError::InvalidConfig("vocabulary must not be empty".into()));
        }
        if self.threshold > 100 {
            return Err(ToolError::InvalidConfig(format!(
                "threshold {} is outside 0-100",
                self.threshold
            )));
        }
        for (key, dir) in [
            ("accepted_dir", &self.accepted_dir),
            ("rejected_dir", &self.rejected_dir),
        ] {
            if dir.trim().is_empty() {
                return Err(ToolError::InvalidConfig(format!("{key} must not be empty")));
            }
        }
        if self.accepted_dir == self.rejected_dir {
            return Err(ToolError::InvalidConfig(
                "accepted_dir and rejected_dir must differ".into(),
            ));
        }
        Ok(())
    }
}
