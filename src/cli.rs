//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Provision disposable dev fleets on Hetzner Cloud
#[derive(Parser)]
#[command(
    name = "outpost",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Fleet file path
    #[arg(
        short,
        long,
        global = true,
        env = "OUTPOST_CONFIG",
        default_value = "outpost.yaml"
    )]
    pub config: PathBuf,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    // The NO_COLOR convention treats any non-empty value as set; clap's
    // strict bool parser would reject `NO_COLOR=1`, so the env var goes
    // through the falsey parser instead.
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision every machine in the fleet file
    Up(commands::up::UpArgs),

    /// Print the cloud-init payload for one machine
    Render(commands::render::RenderArgs),

    /// Check the fleet file without touching the cloud
    Validate,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            config,
            json,
            quiet,
            no_color,
            command,
        } = self;

        // Only `up` prompts, so only `up` carries `--yes`.
        let yes = match &command {
            Command::Up(args) => args.yes,
            _ => false,
        };

        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        });

        match command {
            Command::Version => {
                commands::version::run(json);
                Ok(())
            }
            Command::Validate => commands::validate::run(&app, &config),
            Command::Render(args) => commands::render::run(&config, &args),
            Command::Up(args) => commands::up::run(&app, &config, &args).await,
        }
    }
}
