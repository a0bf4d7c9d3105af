//! Externally observable results of a provisioning run.
//!
//! Every machine contributes three named outputs: `<name>` (address),
//! `<name>_user`, and `<name>_password`. Password outputs stay redacted
//! unless the caller explicitly opts in.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::machine::{REDACTED, Secret};

/// One machine after the provider resolved its address.
#[derive(Debug, Clone)]
pub struct ProvisionedInstance {
    /// Provider-side server id.
    pub id: u64,
    /// Machine name.
    pub name: String,
    /// Public IPv4 address.
    pub ipv4: String,
    /// Admin account username.
    pub user_name: String,
    /// Admin account password.
    pub password: Secret,
    /// Provider-reported creation time.
    pub created: DateTime<Utc>,
}

// ── Output values ─────────────────────────────────────────────────────────────

/// A single published value, secret-aware.
#[derive(Debug, Clone)]
pub enum OutputValue {
    Plain(String),
    Secret(Secret),
}

impl OutputValue {
    /// The printable form. Secrets come back as [`REDACTED`] unless
    /// `show_secrets` is set.
    #[must_use]
    pub fn reveal(&self, show_secrets: bool) -> &str {
        match self {
            Self::Plain(value) => value,
            Self::Secret(secret) if show_secrets => secret.expose(),
            Self::Secret(_) => REDACTED,
        }
    }
}

/// Ordered key/value pairs published at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct RunOutputs {
    entries: Vec<(String, OutputValue)>,
}

impl RunOutputs {
    /// Builds the output set for a slice of provisioned machines, in
    /// declaration order.
    #[must_use]
    pub fn from_instances(instances: &[ProvisionedInstance]) -> Self {
        let mut entries = Vec::with_capacity(instances.len() * 3);
        for instance in instances {
            entries.push((
                instance.name.clone(),
                OutputValue::Plain(instance.ipv4.clone()),
            ));
            entries.push((
                format!("{}_user", instance.name),
                OutputValue::Plain(instance.user_name.clone()),
            ));
            entries.push((
                format!("{}_password", instance.name),
                OutputValue::Secret(instance.password.clone()),
            ));
        }
        Self { entries }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// JSON object form, keys in publication order semantics (object keys
    /// carry no order; values are revealed per `show_secrets`).
    #[must_use]
    pub fn to_json(&self, show_secrets: bool) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.entries {
            map.insert(
                key.clone(),
                Value::String(value.reveal(show_secrets).to_string()),
            );
        }
        Value::Object(map)
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
