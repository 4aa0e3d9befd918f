//! Init command implementation.

use crate::config::StackConfig;
use crate::output::OutputFormatter;
use anyhow::Result;
use std::path::Path;

/// Writes the default config file, refusing to overwrite an existing one.
pub fn execute(config_path: &Path, formatter: &dyn OutputFormatter) -> Result<()> {
    if config_path.exists() {
        formatter.format_warning(&format!("'{}' already exists.", config_path.display()));
        return Ok(());
    }

    StackConfig::write_default(config_path)?;
    formatter.format_success(&format!(
        "Created default config: {}",
        config_path.display()
    ));
    Ok(())
}
