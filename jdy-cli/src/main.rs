//! jdy-cli - dependable yield and threshold availability for river junctions.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "jdy-cli",
    version,
    about = "Junction dependable yield toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: jdy_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("jdy-cli {}", env!("CARGO_PKG_VERSION"));
    jdy_cmd::run(cli.command)
}
