mod bootstrap_helpers;
mod cli_args;
mod mod_add_command;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::{Cli, CliCommand};
use crate::mod_add_command::execute_mod_add_command;

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        CliCommand::ModAdd(args) => {
            let outcome = execute_mod_add_command(cli, args).await?;
            println!("{}", outcome.label());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(failure) = run(&cli).await {
        error!(error = %format!("{failure:#}"), "deltabot command failed");
        std::process::exit(1);
    }
}
