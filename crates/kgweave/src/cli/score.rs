use std::path::Path;

use anyhow::Result;
use kgweave_core::quality_score;
use serde_json::json;

use super::{print_json, read_graph};

/// Prints `{"domain", "score"}`; `score` is null for a graph without entities.
pub fn run(path: &Path) -> Result<()> {
    let graph = read_graph(path)?;
    let score = quality_score(&graph);
    print_json(&json!({
        "domain": graph.domain,
        "score": score,
    }))
}
