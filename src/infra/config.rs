//! Fleet file access.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::fleet::FleetFile;

/// Loads and parses the fleet file at `path`.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not valid YAML for
/// the fleet schema.
pub fn load_fleet_file(path: &Path) -> Result<FleetFile> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}
