//! JSON output helpers.
//!
//! Error-object formatters used by the `--json` code paths when a command
//! fails. A plain failure is `{error, message, code}`; a partial
//! provisioning failure additionally carries the outputs of the machines
//! that did come up.

use anyhow::{Context, Result};
use serde_json::Value;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails (should not happen in
/// practice — `serde_json` only fails on non-finite floats and maps with
/// non-string keys, neither of which appear here).
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format a JSON error object that also carries the outputs of whatever
/// part of the run succeeded, as an `outputs` field.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error_with_outputs(
    message: &str,
    code: &str,
    outputs: &Value,
) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
        "outputs": outputs,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
