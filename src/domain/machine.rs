//! Machine specifications and credential handling.
//!
//! Pure types and validators — no I/O, no async, no filesystem access.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::FleetError;

/// Placeholder printed wherever a secret value is redacted.
pub const REDACTED: &str = "[hidden]";

// ── Secret ────────────────────────────────────────────────────────────────────

/// A sensitive string (admin password, API token).
///
/// `Debug` and `Display` redact the value; the raw bytes are reachable only
/// through [`Secret::expose`], which keeps every place a credential leaves
/// the process greppable.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the raw value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({REDACTED})")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

// ── MachineSpec ───────────────────────────────────────────────────────────────

/// A machine to provision: server name plus the administrative account
/// created on first boot. Immutable after fleet resolution.
#[derive(Debug, Clone)]
pub struct MachineSpec {
    /// Machine name; doubles as the provider-side server name.
    pub name: String,
    /// Admin account username.
    pub user_name: String,
    /// Admin account password, injected into the bootstrap script.
    pub password: Secret,
}

impl MachineSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, user_name: impl Into<String>, password: Secret) -> Self {
        Self {
            name: name.into(),
            user_name: user_name.into(),
            password,
        }
    }
}

// ── Validators ────────────────────────────────────────────────────────────────

/// RFC-1123-label shape: what the provider accepts as a server name.
pub static MACHINE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("valid regex")
});

/// Debian account-name shape accepted by `adduser`.
pub static USER_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z_][a-z0-9_-]{0,31}$").expect("valid regex")
});

/// Characters that would escape the unquoted `do_user` call or the
/// `chpasswd` here-string in the bootstrap script.
pub static SHELL_UNSAFE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"[\s"'`$()\\;|&<>!#~*?\[\]{}]"#).expect("valid regex")
});

/// Validates a machine name against the provider's resource-name shape.
///
/// # Errors
///
/// Returns `FleetError::InvalidName` when the name does not match.
pub fn validate_machine_name(name: &str) -> Result<(), FleetError> {
    if !MACHINE_NAME_RE.is_match(name) {
        return Err(FleetError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Validates an admin username against the Debian account-name shape.
///
/// # Errors
///
/// Returns `FleetError::InvalidUserName` when the username does not match.
pub fn validate_user_name(user: &str) -> Result<(), FleetError> {
    if !USER_NAME_RE.is_match(user) {
        return Err(FleetError::InvalidUserName(user.to_string()));
    }
    Ok(())
}

/// Validates that a password survives interpolation into the bootstrap
/// script. The renderer itself never escapes; this is the only guard.
///
/// # Errors
///
/// Returns `FleetError::EmptyPassword` or `FleetError::UnsafePassword`.
pub fn validate_password(machine: &str, password: &Secret) -> Result<(), FleetError> {
    if password.expose().is_empty() {
        return Err(FleetError::EmptyPassword(machine.to_string()));
    }
    if SHELL_UNSAFE_RE.is_match(password.expose()) {
        return Err(FleetError::UnsafePassword(machine.to_string()));
    }
    Ok(())
}

// ── Unit tests ────────────────────────────────────────────────────────────────


// ============================================================================
// Property-Based Tests
// ============================================================================
