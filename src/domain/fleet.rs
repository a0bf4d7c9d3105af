//! Fleet file schema and resolution.
//!
//! The fleet file (`outpost.yaml`) declares the machines to provision and the
//! server defaults they share. Parsing is tolerant at the top level (old files
//! keep working when fields are added) but strict inside machine entries, so a
//! typo like `pasword:` fails loudly instead of silently dropping a credential.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

use crate::domain::error::FleetError;
use crate::domain::machine::{
    MachineSpec, Secret, validate_machine_name, validate_password, validate_user_name,
};

/// Image used when the fleet file does not override it.
pub const DEFAULT_IMAGE: &str = "ubuntu-20.04";
/// Server size class used when the fleet file does not override it.
pub const DEFAULT_SERVER_TYPE: &str = "cx41";
/// Datacenter location used when the fleet file does not override it.
pub const DEFAULT_LOCATION: &str = "fsn1";

// ── Schema ────────────────────────────────────────────────────────────────────

/// Top-level fleet file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FleetFile {
    /// Path to the OpenSSH public key registered with the provider.
    /// Defaults to `~/.ssh/id_rsa.pub` when unset.
    pub ssh_public_key: Option<PathBuf>,
    /// Server creation defaults shared by every machine.
    pub server: ServerDefaults,
    /// Machines to provision.
    pub machines: Vec<MachineEntry>,
}

/// Server creation defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerDefaults {
    /// OS image name.
    pub image: String,
    /// Size class.
    #[serde(rename = "type")]
    pub server_type: String,
    /// Datacenter location.
    pub location: String,
}

impl Default for ServerDefaults {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            server_type: DEFAULT_SERVER_TYPE.to_string(),
            location: DEFAULT_LOCATION.to_string(),
        }
    }
}

/// One machine declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineEntry {
    /// Machine name; doubles as the server name.
    pub name: String,
    /// Admin account username.
    pub user: String,
    /// Where the admin password comes from.
    pub password: PasswordSource,
}

/// Where a machine's admin password comes from.
///
/// `{env: VAR}` is the preferred form; `{plain: …}` keeps tiny setups working
/// but `outpost validate` warns about it. The YAML map goes through a strict
/// helper so a typo'd key, a missing key, or both keys at once each fail with
/// an error naming the problem.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "PasswordSourceMap")]
pub enum PasswordSource {
    Env(String),
    Plain(String),
}

/// On-disk shape of a `password:` entry.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PasswordSourceMap {
    env: Option<String>,
    plain: Option<String>,
}

impl TryFrom<PasswordSourceMap> for PasswordSource {
    type Error = String;

    fn try_from(map: PasswordSourceMap) -> Result<Self, Self::Error> {
        match (map.env, map.plain) {
            (Some(var), None) => Ok(Self::Env(var)),
            (None, Some(value)) => Ok(Self::Plain(value)),
            (Some(_), Some(_)) => Err("password takes either `env` or `plain`, not both".into()),
            (None, None) => Err("password needs an `env` or `plain` key".into()),
        }
    }
}

impl PasswordSource {
    fn resolve_with(
        &self,
        machine: &str,
        env: &impl Fn(&str) -> Option<String>,
    ) -> Result<Secret, FleetError> {
        match self {
            Self::Env(var) => {
                env(var)
                    .map(Secret::new)
                    .ok_or_else(|| FleetError::MissingPasswordEnv {
                        name: machine.to_string(),
                        var: var.clone(),
                    })
            }
            Self::Plain(value) => Ok(Secret::new(value.clone())),
        }
    }
}

// ── Validation and resolution ─────────────────────────────────────────────────

impl FleetFile {
    /// Run every fleet validation, collecting all violations rather than
    /// stopping at the first: name shape and uniqueness, username shape,
    /// password resolvability and script safety.
    pub fn violations(&self, env: &impl Fn(&str) -> Option<String>) -> Vec<FleetError> {
        let mut violations = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for entry in &self.machines {
            if let Err(e) = validate_machine_name(&entry.name) {
                violations.push(e);
            }
            if !seen.insert(entry.name.as_str()) {
                violations.push(FleetError::DuplicateName(entry.name.clone()));
            }
            if let Err(e) = validate_user_name(&entry.user) {
                violations.push(e);
            }
            match entry.password.resolve_with(&entry.name, env) {
                Ok(password) => {
                    if let Err(e) = validate_password(&entry.name, &password) {
                        violations.push(e);
                    }
                }
                Err(e) => violations.push(e),
            }
        }

        violations
    }

    /// Resolve entries into immutable [`MachineSpec`]s, reading password
    /// references through `env`.
    ///
    /// # Errors
    ///
    /// Fails on the first unresolvable password reference. Run
    /// [`FleetFile::violations`] first for a complete report.
    pub fn resolve(&self, env: &impl Fn(&str) -> Option<String>) -> Result<Vec<MachineSpec>> {
        self.machines
            .iter()
            .map(|entry| {
                let password = entry.password.resolve_with(&entry.name, env)?;
                Ok(MachineSpec::new(
                    entry.name.clone(),
                    entry.user.clone(),
                    password,
                ))
            })
            .collect()
    }

    /// `true` when any machine stores its password inline in the file.
    #[must_use]
    pub fn has_plain_passwords(&self) -> bool {
        self.machines
            .iter()
            .any(|m| matches!(m.password, PasswordSource::Plain(_)))
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
