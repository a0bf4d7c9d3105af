//! Outpost CLI - Disposable cloud dev machines in one command

use clap::Parser;

use outpost_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        // `{:#}` prints the whole context chain on one line.
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
