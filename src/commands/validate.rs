//! Validate command — check the fleet file without touching the cloud.
//!
//! Runs every fleet-level check (name shape and uniqueness, admin usernames,
//! password sources) and reports all violations at once instead of stopping
//! at the first one.

use std::path::Path;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::infra::config::load_fleet_file;

/// Entry point for `outpost validate`.
///
/// # Errors
///
/// Returns an error if the fleet file cannot be read or parsed, or if it
/// fails validation.
pub fn run(app: &AppContext, config: &Path) -> Result<()> {
    run_with(app, config, &|var| std::env::var(var).ok())
}

/// Validate with an injected environment lookup, so tests control which
/// password variables exist.
fn run_with(
    app: &AppContext,
    config: &Path,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<()> {
    let fleet = load_fleet_file(config)?;

    let violations = fleet.violations(env);
    let mut warnings = Vec::new();
    if fleet.has_plain_passwords() {
        warnings
            .push("fleet file contains plain-text passwords; prefer env: references".to_string());
    }

    if app.is_json() {
        let report = serde_json::json!({
            "config": config.display().to_string(),
            "machines": fleet
                .machines
                .iter()
                .map(|m| m.name.as_str())
                .collect::<Vec<_>>(),
            "valid": violations.is_empty(),
            "violations": violations.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "warnings": warnings,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("JSON serialization")?
        );
    } else {
        let out = &app.output;
        for violation in &violations {
            out.error(&violation.to_string());
        }
        for warning in &warnings {
            out.warn(warning);
        }
        if violations.is_empty() {
            let count = fleet.machines.len();
            let noun = if count == 1 { "machine" } else { "machines" };
            out.success(&format!("{} is valid ({count} {noun})", config.display()));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        let noun = if violations.len() == 1 {
            "violation"
        } else {
            "violations"
        };
        anyhow::bail!(
            "{} failed validation ({} {noun})",
            config.display(),
            violations.len()
        )
    }
}
