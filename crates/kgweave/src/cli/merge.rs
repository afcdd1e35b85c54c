use std::path::PathBuf;

use anyhow::Result;
use kgweave_core::merge_graphs;

use super::{print_json, read_graph};

pub fn run(paths: &[PathBuf]) -> Result<()> {
    let graphs = paths
        .iter()
        .map(|p| read_graph(p))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_graphs(&graphs)?;
    eprintln!(
        "Merged {} graphs into version {}",
        graphs.len(),
        merged.metadata.version
    );
    print_json(&merged)
}
