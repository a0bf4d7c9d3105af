//! Shared stub infrastructure for unit tests.
//!
//! Provides canned [`CloudProvider`] implementations and reporter stubs so
//! each test file doesn't have to re-define the same boilerplate.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::{Cell, RefCell};

use anyhow::Result;
use chrono::{TimeZone, Utc};
use outpost_cli::application::ports::{
    CloudProvider, CreatedServer, ProgressReporter, ServerSpec, SshKeyHandle,
};

/// Reporter that swallows everything.
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn step(&self, _msg: &str) {}
    fn success(&self, _msg: &str) {}
}

/// One recorded `create_server` call.
pub struct CreatedRecord {
    pub name: String,
    pub image: String,
    pub user_data: String,
}

/// Records every provider call. `Cell`/`RefCell` suffice because the whole
/// fleet is polled on a single task.
#[derive(Default)]
pub struct RecordingProvider {
    pub keys_registered: Cell<u32>,
    pub created: RefCell<Vec<CreatedRecord>>,
    /// When set, `create_server` rejects this machine name.
    pub reject: Option<&'static str>,
}

impl CloudProvider for RecordingProvider {
    async fn register_ssh_key(&self, name: &str, _public_key: &str) -> Result<SshKeyHandle> {
        self.keys_registered.set(self.keys_registered.get() + 1);
        Ok(SshKeyHandle {
            id: 77,
            name: name.to_string(),
        })
    }

    async fn create_server(&self, spec: &ServerSpec<'_>) -> Result<CreatedServer> {
        if self.reject == Some(spec.name) {
            anyhow::bail!("uniqueness error: server name is already used");
        }
        let mut created = self.created.borrow_mut();
        let id = 500 + created.len() as u64;
        created.push(CreatedRecord {
            name: spec.name.to_string(),
            image: spec.image.to_string(),
            user_data: spec.user_data.to_string(),
        });
        Ok(CreatedServer {
            id,
            name: spec.name.to_string(),
            ipv4: Some(format!("198.51.100.{}", id - 499)),
            created: Utc.with_ymd_and_hms(2021, 7, 1, 12, 0, 0).unwrap(),
        })
    }

    async fn server_address(&self, _server_id: u64) -> Result<Option<String>> {
        anyhow::bail!("not expected in this test")
    }
}
