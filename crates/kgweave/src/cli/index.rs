use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use kgweave_core::network::{GlobalClaim, RegistryStats};
use kgweave_core::{
    apply_network_effects, Citation, GlobalEntity, GlobalRegistry, GlobalRelationship,
    KnowledgeGraph, NetworkEffect, PipelineConfig,
};
use serde::Serialize;

use super::print_json;

#[derive(Serialize)]
struct IndexReport {
    stats: RegistryStats,
    entities: Vec<GlobalEntity>,
    relationships: Vec<GlobalRelationship>,
    claims: Vec<GlobalClaim>,
    effects: Vec<NetworkEffect>,
}

async fn load_graph(path: PathBuf) -> Result<(PathBuf, KnowledgeGraph)> {
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let graph = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a graph", path.display()))?;
    Ok((path, graph))
}

async fn load_citations(path: &Path) -> Result<Vec<Citation>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a citation list", path.display()))
}

pub async fn run(
    config: &PipelineConfig,
    paths: &[PathBuf],
    citations: Option<&Path>,
    apply: Option<&Path>,
) -> Result<()> {
    if paths.is_empty() {
        bail!("no graphs given");
    }

    let citations = match citations {
        Some(path) => load_citations(path).await?,
        None => Vec::new(),
    };

    // Files load concurrently; indexing follows argument order so the first
    // domain to mention a name is deterministic.
    let handles: Vec<_> = paths
        .iter()
        .cloned()
        .map(|path| tokio::spawn(load_graph(path)))
        .collect();
    let mut graphs = Vec::with_capacity(handles.len());
    for handle in handles {
        graphs.push(handle.await??);
    }

    let registry = GlobalRegistry::with_config(config.boosts.clone());
    let mut effects = Vec::new();
    for (path, graph) in &graphs {
        let produced = registry.index_graph(graph, &citations);
        tracing::info!(
            path = %path.display(),
            domain = %graph.domain,
            effects = produced.len(),
            "indexed graph"
        );
        effects.extend(produced);
    }

    if let Some(dir) = apply {
        write_boosted(dir, &graphs, &effects)?;
    }

    let stats = registry.stats();
    eprintln!(
        "Indexed {} graphs: {} global entities, {} network effects",
        graphs.len(),
        stats.entities,
        effects.len()
    );

    print_json(&IndexReport {
        stats,
        entities: registry.entities(),
        relationships: registry.relationships(),
        claims: registry.claims(),
        effects,
    })
}

fn write_boosted(
    dir: &Path,
    graphs: &[(PathBuf, KnowledgeGraph)],
    effects: &[NetworkEffect],
) -> Result<()> {
    let mut names = HashSet::new();
    for (path, _) in graphs {
        let Some(name) = path.file_name() else {
            bail!("{} has no file name", path.display());
        };
        if !names.insert(name) {
            bail!(
                "two graphs share the file name {}; boosted copies would overwrite each other",
                name.to_string_lossy()
            );
        }
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    for (path, graph) in graphs {
        let Some(name) = path.file_name() else {
            continue;
        };
        let boosted = apply_network_effects(graph, effects);
        let dest = dir.join(name);
        std::fs::write(&dest, serde_json::to_string_pretty(&boosted)?)
            .with_context(|| format!("failed to write {}", dest.display()))?;
        eprintln!("Wrote {}", dest.display());
    }

    Ok(())
}
