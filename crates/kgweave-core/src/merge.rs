//! Merging several graphs of one domain into a single graph.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use uuid::Uuid;

use crate::graph::{bump_version, version_key, GraphMetadata, KnowledgeGraph};
use crate::relationship::RelationType;
use crate::{Error, Result};

/// Merge graphs that belong to the same domain.
///
/// Entities collapse by exact name and the first occurrence wins; later
/// duplicates are dropped without averaging. Relationships and claims that
/// pointed at a dropped duplicate are rewired to the kept entity, then
/// relationships collapse by `(source, type, target)` and claims by exact
/// statement text.
///
/// A single graph comes back unchanged. Two or more produce a new graph whose
/// version is one minor step above the highest input version.
pub fn merge_graphs(graphs: &[KnowledgeGraph]) -> Result<KnowledgeGraph> {
    let Some(first) = graphs.first() else {
        return Err(Error::EmptyInput);
    };

    if let Some(other) = graphs.iter().find(|g| g.domain != first.domain) {
        return Err(Error::DomainMismatch {
            expected: first.domain.clone(),
            found: other.domain.clone(),
        });
    }

    if graphs.len() == 1 {
        return Ok(first.clone());
    }

    let mut entities = Vec::new();
    let mut by_name: HashMap<String, Uuid> = HashMap::new();
    let mut remap: HashMap<Uuid, Uuid> = HashMap::new();

    for entity in graphs.iter().flat_map(|g| &g.entities) {
        match by_name.get(&entity.name) {
            Some(kept) => {
                remap.insert(entity.id, *kept);
            }
            None => {
                by_name.insert(entity.name.clone(), entity.id);
                entities.push(entity.clone());
            }
        }
    }

    let resolve = |id: Uuid| remap.get(&id).copied().unwrap_or(id);

    let mut relationships = Vec::new();
    let mut seen_triples: HashSet<(Uuid, RelationType, Uuid)> = HashSet::new();
    for rel in graphs.iter().flat_map(|g| &g.relationships) {
        let mut rel = rel.clone();
        rel.source_id = resolve(rel.source_id);
        rel.target_id = resolve(rel.target_id);
        if rel.source_id == rel.target_id {
            tracing::warn!(relationship = %rel.id, "Dropping relationship collapsed onto itself");
            continue;
        }
        if seen_triples.insert(rel.triple()) {
            relationships.push(rel);
        }
    }

    let mut claims = Vec::new();
    let mut seen_statements: HashSet<&str> = HashSet::new();
    for claim in graphs.iter().flat_map(|g| &g.claims) {
        if !seen_statements.insert(claim.statement.as_str()) {
            continue;
        }
        let mut claim = claim.clone();
        let mut ids = Vec::with_capacity(claim.entities.len());
        for id in claim.entities.iter().map(|id| resolve(*id)) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        claim.entities = ids;
        claims.push(claim);
    }

    let mut source_urls: Vec<String> = Vec::new();
    for url in graphs.iter().flat_map(|g| &g.metadata.source_urls) {
        if !source_urls.contains(url) {
            source_urls.push(url.clone());
        }
    }

    let mut applied_effects: Vec<Uuid> = Vec::new();
    for id in graphs.iter().flat_map(|g| &g.metadata.applied_effects) {
        if !applied_effects.contains(id) {
            applied_effects.push(*id);
        }
    }

    let highest = graphs
        .iter()
        .map(|g| g.metadata.version.as_str())
        .max_by_key(|v| version_key(v))
        .unwrap_or(crate::graph::INITIAL_VERSION);
    let created_at = graphs
        .iter()
        .map(|g| g.metadata.created_at)
        .min()
        .unwrap_or_else(Utc::now);

    let mut merged = KnowledgeGraph {
        id: Uuid::now_v7(),
        domain: first.domain.clone(),
        entities,
        relationships,
        claims,
        metadata: GraphMetadata {
            created_at,
            updated_at: Utc::now(),
            version: bump_version(highest),
            source_urls,
            entity_count: 0,
            relationship_count: 0,
            claim_count: 0,
            applied_effects,
        },
    };
    merged.refresh_counts();

    tracing::debug!(
        inputs = graphs.len(),
        entities = merged.metadata.entity_count,
        relationships = merged.metadata.relationship_count,
        claims = merged.metadata.claim_count,
        "merged graphs"
    );

    Ok(merged)
}
