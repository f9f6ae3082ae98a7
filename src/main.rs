use anyhow::Result;
use clap::{Parser, Subcommand};

use sitegauge_cli::cli::{cmd_check, cmd_run, CheckArgs, RunArgs};

#[derive(Parser)]
#[command(name = "sitegauge", version, about = "Website audit orchestration engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Audit every site against every criterion
    Run(RunArgs),
    /// Validate config and catalogs without running anything
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => cmd_run(&args).await,
        Command::Check(args) => cmd_check(&args),
    }
}
