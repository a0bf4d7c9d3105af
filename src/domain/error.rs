//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── SSH key errors ────────────────────────────────────────────────────────────

/// Errors related to the local SSH public key.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error(
        "SSH public key not found at {path}. Generate one with 'ssh-keygen', or point \
         ssh_public_key in the fleet file at an existing key."
    )]
    Missing { path: String },

    #[error("{path} does not look like an OpenSSH public key: {reason}")]
    Malformed { path: String, reason: String },
}

// ── Fleet validation errors ───────────────────────────────────────────────────

/// Errors raised when validating the fleet file.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("Duplicate machine name '{0}'. Names double as server names and must be unique.")]
    DuplicateName(String),

    #[error("Invalid machine name '{0}': must match ^[a-z0-9]([a-z0-9-]{{0,61}}[a-z0-9])?$")]
    InvalidName(String),

    #[error("Invalid admin username '{0}': must match ^[a-z_][a-z0-9_-]{{0,31}}$")]
    InvalidUserName(String),

    #[error(
        "Password for machine '{0}' contains characters that are unsafe inside the \
         bootstrap script (whitespace, quotes, or shell metacharacters)"
    )]
    UnsafePassword(String),

    #[error("Password for machine '{name}' references environment variable {var}, which is not set")]
    MissingPasswordEnv { name: String, var: String },

    #[error("Password for machine '{0}' is empty")]
    EmptyPassword(String),

    #[error("No machine named '{0}' in the fleet file")]
    UnknownMachine(String),
}

// ── Provider errors ───────────────────────────────────────────────────────────

/// Errors surfaced by the cloud provider boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider declined a create/register call. The provider's own
    /// error code and message pass through unmodified; no retry is attempted.
    #[error("{operation} rejected by provider ({code}): {message}")]
    Rejected {
        operation: &'static str,
        code: String,
        message: String,
    },

    /// The server never reported a public IPv4 address within the poll budget.
    #[error("server '{name}' (id {id}) did not report an IPv4 address after {attempts} polls")]
    AddressTimeout {
        name: String,
        id: u64,
        attempts: u32,
    },
}
