use clap::Parser;
use docsearch_mcp::cli::{Cli, Commands, run};
use docsearch_mcp::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr: stdout carries MCP traffic or command output.
    docsearch_mcp::tracing::init(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    tracing::debug!(?config, "Resolved configuration");

    run(cli.command.unwrap_or(Commands::Serve), config).await
}
