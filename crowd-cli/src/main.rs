//! Crowd CLI - drive the dashboard's selection engine from a terminal.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "crowd-cli",
    version,
    about = "Crowd dashboard selection toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: crowd_cmd::Command,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    crowd_cmd::run(cli.command).await
}
