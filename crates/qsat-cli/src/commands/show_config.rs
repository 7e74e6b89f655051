//! Config command implementation.

use anyhow::Result;

use crate::config::QsatConfig;

/// Print the effective configuration as YAML.
pub fn execute(config: &QsatConfig) -> Result<()> {
    print!("{}", config.to_yaml()?);
    Ok(())
}
