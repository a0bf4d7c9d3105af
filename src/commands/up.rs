//! Up command — provision every machine in the fleet file.
//!
//! Validates locally first (fleet file, then SSH key), so nothing reaches
//! the provider until the whole run can plausibly succeed. Machine failures
//! after that point are collected per machine rather than aborting the run.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize as _;

use crate::app::AppContext;
use crate::application::services::provision::provision_fleet;
use crate::domain::fleet::ServerDefaults;
use crate::domain::machine::MachineSpec;
use crate::domain::outputs::RunOutputs;
use crate::infra::config::load_fleet_file;
use crate::infra::hcloud::HcloudClient;
use crate::infra::sshkey::{load_public_key, resolve_key_path};
use crate::output::{json, progress};

/// Arguments for the `outpost up` command.
#[derive(Args)]
pub struct UpArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Show what would be provisioned without creating anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print secret outputs in clear text
    #[arg(long)]
    pub show_secrets: bool,
}

/// Entry point for `outpost up`.
///
/// # Errors
///
/// Returns an error if validation fails, the SSH key or API token is
/// missing, or any machine fails to provision.
pub async fn run(app: &AppContext, config: &Path, args: &UpArgs) -> Result<()> {
    let out = &app.output;
    let env = |var: &str| std::env::var(var).ok();

    let fleet = load_fleet_file(config)?;

    let violations = fleet.violations(&env);
    if !violations.is_empty() {
        for violation in &violations {
            out.error(&violation.to_string());
        }
        let noun = if violations.len() == 1 {
            "violation"
        } else {
            "violations"
        };
        let message = format!(
            "{} failed validation ({} {noun})",
            config.display(),
            violations.len()
        );
        if app.is_json() {
            println!("{}", json::format_error(&message, "invalid_fleet")?);
        }
        anyhow::bail!(message);
    }
    let machines = fleet.resolve(&env)?;

    if fleet.has_plain_passwords() && !app.is_json() {
        out.warn("fleet file contains plain-text passwords; prefer env: references");
    }

    // Key problems surface here, before any provider call.
    let key_path = resolve_key_path(fleet.ssh_public_key.as_deref())?;
    let public_key = load_public_key(&key_path)?;

    if args.dry_run {
        return print_plan(app, &fleet.server, &machines);
    }

    let provider = HcloudClient::from_env()?;

    let count = machines.len();
    let noun = if count == 1 { "machine" } else { "machines" };
    let prompt = format!("provision {count} {noun} on Hetzner Cloud?");
    if !app.confirm(&prompt, true)? {
        out.info("aborted, nothing was created");
        return Ok(());
    }

    let pb = (out.show_progress() && !app.is_json())
        .then(|| progress::spinner("provisioning fleet..."));
    let reporter = match &pb {
        Some(pb) => app.terminal_reporter().with_spinner(pb),
        None => app.terminal_reporter(),
    };

    let outcome =
        provision_fleet(&provider, &reporter, &fleet.server, &machines, &public_key).await;

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let outcome = outcome?;

    let outputs = RunOutputs::from_instances(&outcome.instances);

    if !outcome.all_succeeded() {
        for failure in &outcome.failures {
            out.error(&format!("{}: {:#}", failure.machine, failure.error));
        }
        let failed = outcome.failures.len();
        let message = format!("{failed} of {count} machines failed to provision");
        // Machines that did come up are exported even when the run fails.
        if app.is_json() {
            println!(
                "{}",
                json::format_error_with_outputs(
                    &message,
                    "provisioning_failed",
                    &outputs.to_json(args.show_secrets),
                )?
            );
        } else if !outputs.is_empty() {
            out.header("Outputs");
            for (name, value) in outputs.iter() {
                out.kv(name, value.reveal(args.show_secrets));
            }
        }
        anyhow::bail!(message);
    }

    if app.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&outputs.to_json(args.show_secrets))
                .context("JSON serialization")?
        );
        return Ok(());
    }

    if outputs.is_empty() {
        out.success("SSH key registered; no machines to provision");
        return Ok(());
    }

    out.header("Outputs");
    for (name, value) in outputs.iter() {
        out.kv(name, value.reveal(args.show_secrets));
    }
    if !args.show_secrets {
        out.info("passwords hidden, rerun with --show-secrets to print them");
    }
    out.success(&format!("{count} {noun} up"));
    Ok(())
}

/// Print the dry-run plan without touching the provider.
fn print_plan(app: &AppContext, defaults: &ServerDefaults, machines: &[MachineSpec]) -> Result<()> {
    if app.is_json() {
        let plan = serde_json::json!({
            "dry_run": true,
            "server": {
                "image": defaults.image,
                "type": defaults.server_type,
                "location": defaults.location,
            },
            "machines": machines.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&plan).context("JSON serialization")?
        );
        return Ok(());
    }

    let out = &app.output;
    out.header("Dry run");
    out.kv("image", &defaults.image);
    out.kv("type", &defaults.server_type);
    out.kv("location", &defaults.location);
    for machine in machines {
        println!(
            "  + {} (admin user '{}')",
            machine.name.style(out.styles.bold),
            machine.user_name
        );
    }
    out.info("no servers were created");
    Ok(())
}
