pub mod build;
pub mod index;
pub mod merge;
pub mod score;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kgweave_core::{KnowledgeGraph, PipelineConfig};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "kgw",
    about = "Build, merge and cross-index knowledge graphs from documents",
    version
)]
pub struct Cli {
    /// Pipeline configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a knowledge graph from a local document
    Build {
        /// Document to read (.html, .md or .txt)
        file: PathBuf,
        /// Domain the document belongs to; defaults to the host of --url
        #[arg(short, long)]
        domain: Option<String>,
        /// Address the document was retrieved from
        #[arg(short, long)]
        url: Option<String>,
        /// Print a Schema.org JSON-LD projection instead of the raw graph
        #[arg(long)]
        jsonld: bool,
    },
    /// Merge graphs of one domain
    Merge {
        /// Graph files produced by `build`
        graphs: Vec<PathBuf>,
    },
    /// Index graphs across domains and report network effects
    Index {
        /// Graph files, indexed in the order given
        graphs: Vec<PathBuf>,
        /// JSON array of {"response", "source"} citation records
        #[arg(long)]
        citations: Option<PathBuf>,
        /// Write each graph with its effects applied into this directory
        #[arg(long)]
        apply: Option<PathBuf>,
    },
    /// Print the quality score of a graph
    Score {
        /// Graph file produced by `build` or `merge`
        graph: PathBuf,
    },
}

/// `--config` if given, else `<config dir>/kgweave/config.toml` when it
/// exists, else defaults. Environment overrides apply last.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let path = path.map(Path::to_path_buf).or_else(|| {
        dirs::config_dir()
            .map(|dir| dir.join("kgweave").join("config.toml"))
            .filter(|p| p.is_file())
    });

    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            PipelineConfig::from_toml(&raw)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };

    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

pub fn read_graph(path: &Path) -> Result<KnowledgeGraph> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a graph", path.display()))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
