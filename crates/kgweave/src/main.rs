use anyhow::Result;
use clap::Parser;

use kgweave::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Build {
            file,
            domain,
            url,
            jsonld,
        } => cli::build::run(&config, &file, domain.as_deref(), url.as_deref(), jsonld),
        Commands::Merge { graphs } => cli::merge::run(&graphs),
        Commands::Index {
            graphs,
            citations,
            apply,
        } => cli::index::run(&config, &graphs, citations.as_deref(), apply.as_deref()).await,
        Commands::Score { graph } => cli::score::run(&graph),
    }
}
