//! FDE CLI - Command line tool for querying flight delay aggregates.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "fde-cli",
    version,
    about = "Flight delay aggregation and query toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: fde_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[FDE Debug] cli: starting");
    fde_cmd::run(cli.command)
}
