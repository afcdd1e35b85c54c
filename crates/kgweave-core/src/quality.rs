use crate::graph::KnowledgeGraph;

/// Overall quality of a graph in `[0, 100]`.
///
/// Weighted as 40 for mean entity confidence, 30 for relationship density
/// against all possible entity pairs and 30 for claim coverage, which
/// saturates at two claims per entity. Returns `None` for a graph without
/// entities. A single entity has no possible pairs, so its density term is 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn quality_score(graph: &KnowledgeGraph) -> Option<u8> {
    let n = graph.entities.len();
    if n == 0 {
        return None;
    }
    let entities = n as f64;

    let avg_confidence = graph
        .entities
        .iter()
        .map(|e| e.confidence.clamp(0.0, 1.0))
        .sum::<f64>()
        / entities;

    let expected_pairs = n * (n - 1) / 2;
    let density = if expected_pairs == 0 {
        0.0
    } else {
        (graph.relationships.len() as f64 / expected_pairs as f64).min(1.0)
    };

    let coverage = (graph.claims.len() as f64 / entities / 2.0).min(1.0);

    let score = 40.0 * avg_confidence + 30.0 * density + 30.0 * coverage;
    Some(score.round().clamp(0.0, 100.0) as u8)
}
