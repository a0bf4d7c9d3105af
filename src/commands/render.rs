//! Render command — print the cloud-init payload for one machine.
//!
//! Prints raw text to stdout regardless of `--json`: the payload is already
//! machine-consumable and any wrapping would corrupt it.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::domain::cloudinit::{BootstrapConfig, render_bootstrap_script};
use crate::domain::error::FleetError;
use crate::domain::machine::MachineSpec;
use crate::infra::config::load_fleet_file;

/// Arguments for the `outpost render` command.
#[derive(Args)]
pub struct RenderArgs {
    /// Machine to render (defaults to the only machine in the fleet file)
    pub machine: Option<String>,

    /// Print the full MIME envelope instead of the bare script
    #[arg(long)]
    pub mime: bool,
}

/// Entry point for `outpost render`.
///
/// # Errors
///
/// Returns an error if the fleet file cannot be loaded or resolved, or if
/// the requested machine does not exist.
pub fn run(config: &Path, args: &RenderArgs) -> Result<()> {
    run_with(config, args, &|var| std::env::var(var).ok())
}

fn run_with(config: &Path, args: &RenderArgs, env: &impl Fn(&str) -> Option<String>) -> Result<()> {
    let fleet = load_fleet_file(config)?;
    let machines = fleet.resolve(env)?;
    let spec = select_machine(&machines, args.machine.as_deref())?;

    let script = render_bootstrap_script(spec);
    if args.mime {
        let bootstrap = BootstrapConfig::build(&spec.name, script);
        print!("{}", bootstrap.rendered());
    } else {
        print!("{script}");
    }
    Ok(())
}

/// Pick the machine to render: the named one, or the sole machine when the
/// fleet declares exactly one.
fn select_machine<'a>(
    machines: &'a [MachineSpec],
    requested: Option<&str>,
) -> Result<&'a MachineSpec> {
    match requested {
        Some(name) => machines
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| FleetError::UnknownMachine(name.to_string()).into()),
        None => match machines {
            [] => anyhow::bail!("fleet file declares no machines"),
            [only] => Ok(only),
            _ => {
                let names: Vec<&str> = machines.iter().map(|m| m.name.as_str()).collect();
                anyhow::bail!(
                    "fleet file declares {} machines; pick one of: {}",
                    machines.len(),
                    names.join(", ")
                )
            }
        },
    }
}
