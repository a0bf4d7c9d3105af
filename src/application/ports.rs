//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use anyhow::Result;
use chrono::{DateTime, Utc};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Name the shared SSH key is registered under at the provider.
pub const SSH_KEY_NAME: &str = "creatorkey";

// ── Value Types ───────────────────────────────────────────────────────────────

/// Opaque reference to a registered public key, shared read-only by every
/// server-creation call in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshKeyHandle {
    /// Provider-side key id.
    pub id: u64,
    /// Name the key was registered under.
    pub name: String,
}

/// Creation parameters for one server.
pub struct ServerSpec<'a> {
    /// Server name; matches the machine name.
    pub name: &'a str,
    /// OS image, e.g. `"ubuntu-20.04"`.
    pub image: &'a str,
    /// Size class, e.g. `"cx41"`.
    pub server_type: &'a str,
    /// Datacenter location, e.g. `"fsn1"`.
    pub location: &'a str,
    /// Key handle authorizing SSH access.
    pub ssh_key: &'a SshKeyHandle,
    /// Rendered cloud-init payload submitted as instance user data.
    pub user_data: &'a str,
}

/// What the provider reports back for a freshly created server.
#[derive(Debug, Clone)]
pub struct CreatedServer {
    /// Provider-side server id.
    pub id: u64,
    /// Server name.
    pub name: String,
    /// Public IPv4 address, when already assigned at create time.
    pub ipv4: Option<String>,
    /// Provider-reported creation time.
    pub created: DateTime<Utc>,
}

// ── Cloud Provider Port ───────────────────────────────────────────────────────

/// Provisioning operations consumed from the cloud provider.
#[allow(async_fn_in_trait)]
pub trait CloudProvider {
    /// Register a public key under `name`, returning the shared handle.
    async fn register_ssh_key(&self, name: &str, public_key: &str) -> Result<SshKeyHandle>;
    /// Create one server. The address may not be assigned yet when the
    /// call returns.
    async fn create_server(&self, spec: &ServerSpec<'_>) -> Result<CreatedServer>;
    /// Look up a server's public IPv4, `None` while still unassigned.
    async fn server_address(&self, server_id: u64) -> Result<Option<String>>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
}
