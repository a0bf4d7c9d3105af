//! Application service — fleet provisioning use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All provider I/O is routed through the injected [`CloudProvider`] port.

use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::future::join_all;
use tokio::sync::OnceCell;

use crate::application::ports::{
    CloudProvider, CreatedServer, ProgressReporter, SSH_KEY_NAME, ServerSpec, SshKeyHandle,
};
use crate::domain::cloudinit::{BootstrapConfig, render_bootstrap_script};
use crate::domain::error::ProviderError;
use crate::domain::fleet::ServerDefaults;
use crate::domain::machine::MachineSpec;
use crate::domain::outputs::ProvisionedInstance;

/// How many times a pending address is polled before giving up.
const ADDRESS_POLL_ATTEMPTS: u32 = 60;
/// Delay between two address polls.
const ADDRESS_POLL_INTERVAL: Duration = Duration::from_secs(2);

// ── Key provisioning ──────────────────────────────────────────────────────────

/// Registers the shared public key at most once per run, however many
/// callers ask for the handle.
pub struct KeyProvisioner<'a, P: CloudProvider> {
    provider: &'a P,
    public_key: &'a str,
    handle: OnceCell<SshKeyHandle>,
}

impl<'a, P: CloudProvider> KeyProvisioner<'a, P> {
    #[must_use]
    pub fn new(provider: &'a P, public_key: &'a str) -> Self {
        Self {
            provider,
            public_key,
            handle: OnceCell::new(),
        }
    }

    /// Returns the shared key handle, registering the key on first call.
    ///
    /// # Errors
    ///
    /// Propagates the provider rejection when registration fails.
    pub async fn provision(&self) -> Result<&SshKeyHandle> {
        self.handle
            .get_or_try_init(|| async {
                self.provider
                    .register_ssh_key(SSH_KEY_NAME, self.public_key)
                    .await
                    .context("registering SSH key")
            })
            .await
    }
}

// ── Fleet provisioning ────────────────────────────────────────────────────────

/// One machine that failed to provision.
#[derive(Debug)]
pub struct MachineFailure {
    /// Machine name.
    pub machine: String,
    /// What went wrong.
    pub error: anyhow::Error,
}

/// Result of a whole-fleet run: instances that came up and machines that
/// did not. One machine failing never blocks the others.
#[derive(Debug, Default)]
pub struct FleetOutcome {
    pub instances: Vec<ProvisionedInstance>,
    pub failures: Vec<MachineFailure>,
}

impl FleetOutcome {
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Provision every machine in the fleet.
///
/// The shared key is registered first, exactly once. Machines then
/// provision concurrently; within one machine, render → config → create →
/// address resolution stay sequential. Instances come back in fleet
/// declaration order regardless of completion order.
///
/// # Errors
///
/// Returns an error when key registration fails; per-machine failures are
/// collected into the returned [`FleetOutcome`] instead.
pub async fn provision_fleet(
    provider: &impl CloudProvider,
    reporter: &impl ProgressReporter,
    defaults: &ServerDefaults,
    machines: &[MachineSpec],
    public_key: &str,
) -> Result<FleetOutcome> {
    let keys = KeyProvisioner::new(provider, public_key);
    reporter.step("registering SSH key...");
    let key = keys.provision().await?;
    reporter.success(&format!("SSH key '{}' registered", key.name));

    let tasks = machines
        .iter()
        .map(|machine| provision_machine(provider, reporter, defaults, machine, key));
    let results = join_all(tasks).await;

    let mut outcome = FleetOutcome::default();
    for (machine, result) in machines.iter().zip(results) {
        match result {
            Ok(instance) => outcome.instances.push(instance),
            Err(error) => outcome.failures.push(MachineFailure {
                machine: machine.name.clone(),
                error,
            }),
        }
    }
    Ok(outcome)
}

/// Provision a single machine: render its bootstrap payload, create the
/// server with the shared key, and wait for the address.
async fn provision_machine(
    provider: &impl CloudProvider,
    reporter: &impl ProgressReporter,
    defaults: &ServerDefaults,
    machine: &MachineSpec,
    key: &SshKeyHandle,
) -> Result<ProvisionedInstance> {
    let config = BootstrapConfig::build(&machine.name, render_bootstrap_script(machine));
    let user_data = config.rendered();

    reporter.step(&format!("{}: creating server...", machine.name));
    let server = provider
        .create_server(&ServerSpec {
            name: &machine.name,
            image: &defaults.image,
            server_type: &defaults.server_type,
            location: &defaults.location,
            ssh_key: key,
            user_data: &user_data,
        })
        .await
        .with_context(|| format!("creating server '{}'", machine.name))?;

    let ipv4 = if let Some(addr) = server.ipv4.clone() {
        addr
    } else {
        reporter.step(&format!("{}: waiting for IPv4 address...", machine.name));
        await_address(provider, &server).await?
    };
    reporter.success(&format!("{}: up at {ipv4}", machine.name));

    Ok(ProvisionedInstance {
        id: server.id,
        name: machine.name.clone(),
        ipv4,
        user_name: machine.user_name.clone(),
        password: machine.password.clone(),
        created: server.created,
    })
}

async fn await_address(provider: &impl CloudProvider, server: &CreatedServer) -> Result<String> {
    poll_address(
        provider,
        server,
        ADDRESS_POLL_ATTEMPTS,
        ADDRESS_POLL_INTERVAL,
    )
    .await
}

/// Polls until the provider reports an address. Checks before sleeping, so
/// an already-assigned address comes back without any delay.
async fn poll_address(
    provider: &impl CloudProvider,
    server: &CreatedServer,
    attempts: u32,
    interval: Duration,
) -> Result<String> {
    for attempt in 0..attempts {
        if attempt > 0 {
            tokio::time::sleep(interval).await;
        }
        if let Some(addr) = provider
            .server_address(server.id)
            .await
            .with_context(|| format!("polling address of server '{}'", server.name))?
        {
            return Ok(addr);
        }
    }
    Err(ProviderError::AddressTimeout {
        name: server.name.clone(),
        id: server.id,
        attempts,
    }
    .into())
}

// ── Unit tests ────────────────────────────────────────────────────────────────
