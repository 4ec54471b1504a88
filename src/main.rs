use clap::Parser;

use loom_lsp::cli::Cli;
use loom_lsp::lsp::server::run_server;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config();

    let outcome = run_server(&config).await?;
    std::process::exit(outcome.exit_code());
}
