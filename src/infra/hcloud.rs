//! Hetzner Cloud API adapter — implements the `CloudProvider` port.
//!
//! Thin JSON-over-HTTP client for the three calls the provisioning service
//! needs: key registration, server creation, and address lookup. Provider
//! rejections pass through with their original error code and message.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::application::ports::{CloudProvider, CreatedServer, ServerSpec, SshKeyHandle};
use crate::domain::error::ProviderError;
use crate::domain::machine::Secret;

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "HCLOUD_TOKEN";
/// Public API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.hetzner.cloud/v1";
/// The API rejects user data above this size.
const USER_DATA_LIMIT: usize = 32 * 1024;
/// Per-request ceiling; a stalled connection fails the call instead of
/// hanging the run.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated API client.
pub struct HcloudClient {
    http: reqwest::Client,
    base_url: String,
    token: Secret,
}

impl HcloudClient {
    /// Builds a client from [`TOKEN_ENV`].
    ///
    /// # Errors
    ///
    /// Fails when the variable is unset or blank.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "{TOKEN_ENV} is not set. Create a read/write API token in the Hetzner \
                     Cloud console and export it."
                )
            })?;
        Self::new(Secret::new(token), DEFAULT_BASE_URL)
    }

    /// Builds a client against a specific endpoint. Tests point this at a
    /// local server.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed.
    pub fn new(token: Secret, base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            token,
        })
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        operation: &'static str,
        body: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(self.token.expose())
            .json(&body)
            .send()
            .await
            .with_context(|| format!("{operation}: request to {path} failed"))?;
        Self::decode(response, operation).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, operation: &'static str) -> Result<T> {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(self.token.expose())
            .send()
            .await
            .with_context(|| format!("{operation}: request to {path} failed"))?;
        Self::decode(response, operation).await
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::rejection(status, &body, operation));
        }
        response
            .json::<T>()
            .await
            .with_context(|| format!("{operation}: invalid response body"))
    }

    /// Maps a non-2xx response to [`ProviderError::Rejected`], preserving
    /// the API's own error code and message when the body carries them.
    fn rejection(status: StatusCode, body: &str, operation: &'static str) -> anyhow::Error {
        let rejected = match serde_json::from_str::<ApiErrorEnvelope>(body) {
            Ok(envelope) => ProviderError::Rejected {
                operation,
                code: envelope.error.code,
                message: envelope.error.message,
            },
            Err(_) => ProviderError::Rejected {
                operation,
                code: status.as_u16().to_string(),
                message: if body.trim().is_empty() {
                    status.to_string()
                } else {
                    body.trim().to_string()
                },
            },
        };
        rejected.into()
    }
}

impl CloudProvider for HcloudClient {
    async fn register_ssh_key(&self, name: &str, public_key: &str) -> Result<SshKeyHandle> {
        let body: SshKeyEnvelope = self
            .post(
                "/ssh_keys",
                "RegisterKey",
                json!({ "name": name, "public_key": public_key }),
            )
            .await?;
        Ok(SshKeyHandle {
            id: body.ssh_key.id,
            name: body.ssh_key.name,
        })
    }

    async fn create_server(&self, spec: &ServerSpec<'_>) -> Result<CreatedServer> {
        anyhow::ensure!(
            spec.user_data.len() <= USER_DATA_LIMIT,
            "user data for '{}' is {} bytes, over the {USER_DATA_LIMIT}-byte API limit",
            spec.name,
            spec.user_data.len()
        );
        let body: ServerEnvelope = self
            .post(
                "/servers",
                "CreateInstance",
                json!({
                    "name": spec.name,
                    "image": spec.image,
                    "server_type": spec.server_type,
                    "location": spec.location,
                    "ssh_keys": [spec.ssh_key.id],
                    "user_data": spec.user_data,
                }),
            )
            .await?;
        Ok(body.server.into())
    }

    async fn server_address(&self, server_id: u64) -> Result<Option<String>> {
        let body: ServerEnvelope = self
            .get(&format!("/servers/{server_id}"), "ResolveAddress")
            .await?;
        Ok(body.server.public_net.ipv4.map(|v| v.ip))
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct SshKeyEnvelope {
    ssh_key: SshKeyBody,
}

#[derive(Debug, Deserialize)]
struct SshKeyBody {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ServerEnvelope {
    server: ServerBody,
}

#[derive(Debug, Deserialize)]
struct ServerBody {
    id: u64,
    name: String,
    created: DateTime<Utc>,
    #[serde(default)]
    public_net: PublicNet,
}

#[derive(Debug, Deserialize, Default)]
struct PublicNet {
    ipv4: Option<Ipv4Info>,
}

#[derive(Debug, Deserialize)]
struct Ipv4Info {
    ip: String,
}

impl From<ServerBody> for CreatedServer {
    fn from(body: ServerBody) -> Self {
        Self {
            id: body.id,
            name: body.name,
            ipv4: body.public_net.ipv4.map(|v| v.ip),
            created: body.created,
        }
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
