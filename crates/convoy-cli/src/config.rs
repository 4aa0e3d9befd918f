//! Stack configuration file handling.

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Config file name looked up in the stack root.
pub const DEFAULT_CONFIG_NAME: &str = "infra.json";

/// Per-stack settings stored as JSON next to the service directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    /// File name of the backup archive, relative to the stack root.
    pub archive_name: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            archive_name: "backup.tar.gz".to_string(),
        }
    }
}

impl StackConfig {
    /// Loads the config from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).with_context(|| {
            format!(
                "cannot read config '{}' (run 'convoy init' to create one)",
                path.display()
            )
        })?;
        serde_json::from_str(&data)
            .with_context(|| format!("config '{}' is not valid JSON", path.display()))
    }

    /// Writes the default config to `path`.
    pub fn write_default(path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(&Self::default())
            .context("cannot serialize default config")?;
        fs::write(path, data)
            .with_context(|| format!("cannot write config '{}'", path.display()))?;
        Ok(())
    }
}
