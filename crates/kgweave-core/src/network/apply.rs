use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::effects::{EffectType, NetworkEffect};
use super::registry::{global_entity_id, normalize_name};
use crate::graph::KnowledgeGraph;

/// Copy the boosts carried by `effects` onto a local graph.
///
/// Local records are matched to effects through their normalized names, so
/// the registry is not consulted. Effects already recorded in
/// `metadata.applied_effects` are skipped, which makes re-application a no-op.
#[must_use]
pub fn apply_network_effects(graph: &KnowledgeGraph, effects: &[NetworkEffect]) -> KnowledgeGraph {
    let mut boosted = graph.clone();

    let global_ids: HashMap<Uuid, String> = boosted
        .entities
        .iter()
        .map(|e| (e.id, global_entity_id(&normalize_name(&e.name))))
        .collect();

    let mut applied = 0;
    for effect in effects {
        if boosted.metadata.applied_effects.contains(&effect.id) {
            continue;
        }

        match effect.effect_type {
            EffectType::EntityAmplification | EffectType::AuthorityBoost => {
                for entity in &mut boosted.entities {
                    let Some(id) = global_ids.get(&entity.id) else {
                        continue;
                    };
                    if effect.affects(id) {
                        entity.confidence =
                            (entity.confidence + effect.confidence_boost).clamp(0.0, 1.0);
                        entity.authority_score =
                            (entity.authority_score + effect.authority_boost).clamp(0.0, 100.0);
                    }
                }
            }
            EffectType::RelationshipValidation => {
                let [source, target] = effect.affected_entities.as_slice() else {
                    continue;
                };
                for rel in &mut boosted.relationships {
                    let matches = Some(rel.relation_type) == effect.relationship_type
                        && global_ids.get(&rel.source_id) == Some(source)
                        && global_ids.get(&rel.target_id) == Some(target);
                    if matches {
                        rel.confidence = (rel.confidence + effect.confidence_boost).clamp(0.0, 1.0);
                    }
                }
            }
            EffectType::ClaimValidation => {
                let Some(key) = effect.claim_key.as_deref() else {
                    continue;
                };
                for claim in &mut boosted.claims {
                    if normalize_name(&claim.statement) == key {
                        claim.confidence =
                            (claim.confidence + effect.confidence_boost).clamp(0.0, 1.0);
                    }
                }
            }
        }

        boosted.metadata.applied_effects.push(effect.id);
        applied += 1;
    }

    if applied > 0 {
        boosted.metadata.updated_at = Utc::now();
        tracing::debug!(domain = %boosted.domain, applied, "applied network effects");
    }

    boosted
}
