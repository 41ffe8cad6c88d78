//! fukurow-cli entry point.

use anyhow::Result;
use clap::Parser;
use fukurow_cli::commands::{Cli, CommandExecutor, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Repl { data: cli.preload });

    let mut executor = CommandExecutor::new();
    let result = executor.execute(command).await?;

    if !result.message.is_empty() {
        println!("{}", result.message);
    }

    std::process::exit(if result.success { 0 } else { 1 });
}
