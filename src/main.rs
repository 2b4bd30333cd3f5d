use clap::Parser;
use llm_endpoint_kit::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Deploy(args) => cli::deploy::run(args).await,
        Command::Invoke(args) => cli::invoke::run(args).await,
        Command::Chain(args) => cli::chain::run(args).await,
        Command::Scale(args) => cli::scale::run(args).await,
        Command::Schedule(args) => cli::schedule::run(args).await,
        Command::Unschedule(args) => cli::schedule::run_delete(args).await,
        Command::Status(args) => cli::status::run(args).await,
        Command::Teardown(args) => cli::teardown::run(args).await,
    }
}
