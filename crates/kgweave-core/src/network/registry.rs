//! Cross-domain entity index.
//!
//! Every mutation goes through one of the `upsert_*` methods. Each holds the
//! shard lock of a single key for its read-modify-write and never takes a
//! second lock while holding it, so concurrent ingestion only serializes on
//! the same name.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::config::{Boost, BoostConfig};
use super::effects::{citation_mentions, Citation, EffectType, NetworkEffect};
use crate::claim::Claim;
use crate::entity::{Entity, EntityType};
use crate::graph::KnowledgeGraph;
use crate::relationship::{RelationType, Relationship};

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s]+").expect("valid regex"));

/// Join key for names across domains: lowercase, punctuation removed,
/// whitespace collapsed. `"OpenAI, Inc."` becomes `"openai inc"`.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[must_use]
pub fn global_entity_id(key: &str) -> String {
    format!("ge_{}", key.replace(' ', "_"))
}

#[must_use]
pub fn global_relationship_id(source: &str, relation_type: RelationType, target: &str) -> String {
    format!("gr:{source}:{relation_type}:{target}")
}

#[must_use]
pub fn global_claim_id(key: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
}

fn add_clamped(value: &mut f64, delta: f64, max: f64) {
    *value = (*value + delta).clamp(0.0, max);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityVariant {
    pub domain: String,
    pub local_entity_id: Uuid,
    pub name_variant: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalEntity {
    pub global_entity_id: String,
    pub canonical_name: String,
    pub entity_type: EntityType,
    pub referenced_by_domains: Vec<String>,
    pub total_references: usize,
    pub merged_description: String,
    pub confidence_score: f64,
    pub authority_score: f64,
    /// Accumulated citation-probability lift, in percent.
    pub citation_probability: f64,
    pub variants: Vec<EntityVariant>,
    pub total_citations: usize,
    pub citation_platforms: Vec<String>,
    pub first_seen: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub connected_global_entities: Vec<String>,
    pub relationship_count: usize,
}

impl GlobalEntity {
    fn new(
        key: &str,
        domain: &str,
        entity: &Entity,
        citations: usize,
        platforms: Vec<String>,
        config: &BoostConfig,
    ) -> Self {
        let now = Utc::now();
        let mut global = Self {
            global_entity_id: global_entity_id(key),
            canonical_name: entity.name.clone(),
            entity_type: entity.entity_type(),
            referenced_by_domains: Vec::new(),
            total_references: 0,
            merged_description: String::new(),
            confidence_score: entity.confidence.clamp(0.0, 1.0),
            authority_score: config.initial_authority(entity.confidence, citations),
            citation_probability: 0.0,
            variants: Vec::new(),
            total_citations: citations,
            citation_platforms: platforms,
            first_seen: now,
            last_updated: now,
            connected_global_entities: Vec::new(),
            relationship_count: 0,
        };
        global.add_reference(domain, entity);
        global
    }

    #[must_use]
    pub fn is_referenced_by(&self, domain: &str) -> bool {
        self.referenced_by_domains.iter().any(|d| d == domain)
    }

    fn add_reference(&mut self, domain: &str, entity: &Entity) {
        self.referenced_by_domains.push(domain.to_string());
        self.total_references += 1;
        self.variants.push(EntityVariant {
            domain: domain.to_string(),
            local_entity_id: entity.id,
            name_variant: entity.name.clone(),
            description: entity.description.clone(),
            url: entity.url.clone(),
        });
        if let Some(description) = entity.description.as_deref() {
            let tagged = format!("[{domain}] {description}");
            self.merged_description = if self.merged_description.is_empty() {
                tagged
            } else {
                format!("{} | {tagged}", self.merged_description)
            };
        }
        self.last_updated = Utc::now();
    }

    fn apply(&mut self, boost: Boost) {
        add_clamped(&mut self.confidence_score, boost.confidence, 1.0);
        add_clamped(&mut self.authority_score, boost.authority, 100.0);
        add_clamped(&mut self.citation_probability, boost.citation_lift, 100.0);
    }

    /// Platforms in `platforms` not yet recorded, appended in order.
    fn union_platforms(&mut self, platforms: &[String]) -> usize {
        let mut added = 0;
        for platform in platforms {
            if !self.citation_platforms.contains(platform) {
                self.citation_platforms.push(platform.clone());
                added += 1;
            }
        }
        added
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalRelationship {
    pub global_relationship_id: String,
    pub source_global_id: String,
    pub target_global_id: String,
    pub relation_type: RelationType,
    pub supporting_domains: Vec<String>,
    pub confidence_score: f64,
    pub authority_score: f64,
    pub first_seen: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl GlobalRelationship {
    #[must_use]
    pub fn is_supported_by(&self, domain: &str) -> bool {
        self.supporting_domains.iter().any(|d| d == domain)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalClaim {
    pub global_claim_id: Uuid,
    pub statement: String,
    pub entities: Vec<String>,
    pub supporting_domains: Vec<String>,
    pub confidence_score: f64,
    pub authority_score: f64,
    pub evidence_count: usize,
    pub first_seen: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl GlobalClaim {
    #[must_use]
    pub fn is_supported_by(&self, domain: &str) -> bool {
        self.supporting_domains.iter().any(|d| d == domain)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub entities: usize,
    pub relationships: usize,
    pub claims: usize,
    pub domains: usize,
    pub multi_domain_entities: usize,
}

/// Process-wide index of entities, relationships and claims seen across
/// domains. Records are created on first sighting and only ever grow.
#[derive(Default)]
pub struct GlobalRegistry {
    entities: DashMap<String, GlobalEntity>,
    relationships: DashMap<String, GlobalRelationship>,
    claims: DashMap<String, GlobalClaim>,
    config: BoostConfig,
}

impl GlobalRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: BoostConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Index every entity, relationship and claim of `graph` under its domain
    /// and return the network effects this produced.
    ///
    /// Re-indexing a domain that is already recorded for a key changes nothing,
    /// so calling this twice with the same graph yields no effects the second
    /// time.
    pub fn index_graph(&self, graph: &KnowledgeGraph, citations: &[Citation]) -> Vec<NetworkEffect> {
        let domain = graph.domain.as_str();
        let mut effects = Vec::new();
        let mut keys: HashMap<Uuid, String> = HashMap::new();

        for entity in &graph.entities {
            let key = normalize_name(&entity.name);
            if key.is_empty() {
                continue;
            }
            let (mentions, platforms) = citation_mentions(&entity.name, citations);
            effects.extend(self.upsert_entity(&key, domain, entity, mentions, platforms));
            keys.insert(entity.id, key);
        }

        for rel in &graph.relationships {
            let (Some(source), Some(target)) = (keys.get(&rel.source_id), keys.get(&rel.target_id))
            else {
                continue;
            };
            if source == target {
                continue;
            }
            effects.extend(self.upsert_relationship(source, target, rel, domain));
        }

        for claim in &graph.claims {
            let mut entities: Vec<String> = Vec::new();
            for key in claim.entities.iter().filter_map(|id| keys.get(id)) {
                let id = global_entity_id(key);
                if !entities.contains(&id) {
                    entities.push(id);
                }
            }
            effects.extend(self.upsert_claim(claim, entities, domain));
        }

        for effect in &effects {
            info!(
                effect = %effect.effect_type,
                domain,
                entities = ?effect.affected_entities,
                confidence_boost = effect.confidence_boost,
                authority_boost = effect.authority_boost,
                "network effect"
            );
        }

        effects
    }

    /// Record `entity` from `domain` under `key`.
    ///
    /// Returns an `entity_amplification` effect when the domain is new for an
    /// existing key, plus an `authority_boost` effect when it also brings
    /// citation platforms not seen before.
    pub fn upsert_entity(
        &self,
        key: &str,
        domain: &str,
        entity: &Entity,
        citations: usize,
        platforms: Vec<String>,
    ) -> Vec<NetworkEffect> {
        let mut slot = match self.entities.entry(key.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(GlobalEntity::new(
                    key, domain, entity, citations, platforms, &self.config,
                ));
                return Vec::new();
            }
            Entry::Occupied(slot) => slot,
        };
        let global = slot.get_mut();

        if global.is_referenced_by(domain) {
            return Vec::new();
        }

        let domains_before = global.referenced_by_domains.len();
        global.add_reference(domain, entity);
        global.total_citations += citations;

        let mut effects = Vec::new();
        if let Some(boost) = self.config.entity_boost(domains_before) {
            global.apply(boost);
            effects.push(
                NetworkEffect::new(EffectType::EntityAmplification, boost, domain)
                    .with_entities(vec![global.global_entity_id.clone()])
                    .with_contributors(global.referenced_by_domains.clone()),
            );
        }

        let new_platforms = global.union_platforms(&platforms);
        if let Some(boost) = self.config.platform_boost(new_platforms) {
            global.apply(boost);
            effects.push(
                NetworkEffect::new(EffectType::AuthorityBoost, boost, domain)
                    .with_entities(vec![global.global_entity_id.clone()])
                    .with_contributors(global.referenced_by_domains.clone()),
            );
        }

        effects
    }

    /// Record a relationship between the entities keyed `source` and `target`.
    pub fn upsert_relationship(
        &self,
        source: &str,
        target: &str,
        rel: &Relationship,
        domain: &str,
    ) -> Option<NetworkEffect> {
        let source_id = global_entity_id(source);
        let target_id = global_entity_id(target);
        let id = global_relationship_id(&source_id, rel.relation_type, &target_id);

        match self.relationships.entry(id.clone()) {
            Entry::Vacant(slot) => {
                let now = Utc::now();
                slot.insert(GlobalRelationship {
                    global_relationship_id: id,
                    source_global_id: source_id.clone(),
                    target_global_id: target_id.clone(),
                    relation_type: rel.relation_type,
                    supporting_domains: vec![domain.to_string()],
                    confidence_score: rel.confidence.clamp(0.0, 1.0),
                    authority_score: self.config.initial_authority(rel.confidence, 0),
                    first_seen: now,
                    last_updated: now,
                });
            }
            Entry::Occupied(mut slot) => {
                let global = slot.get_mut();
                if global.is_supported_by(domain) {
                    return None;
                }
                let domains_before = global.supporting_domains.len();
                global.supporting_domains.push(domain.to_string());
                global.last_updated = Utc::now();

                let boost = self.config.relationship_boost(domains_before)?;
                add_clamped(&mut global.confidence_score, boost.confidence, 1.0);
                add_clamped(&mut global.authority_score, boost.authority, 100.0);
                return Some(
                    NetworkEffect::new(EffectType::RelationshipValidation, boost, domain)
                        .with_entities(vec![source_id, target_id])
                        .with_relationship_type(rel.relation_type)
                        .with_contributors(global.supporting_domains.clone()),
                );
            }
        }

        // The relationship shard lock is released before touching entities.
        self.connect(source, &target_id);
        self.connect(target, &source_id);
        None
    }

    fn connect(&self, key: &str, other: &str) {
        if let Some(mut global) = self.entities.get_mut(key) {
            if !global.connected_global_entities.iter().any(|id| id == other) {
                global.connected_global_entities.push(other.to_string());
            }
            global.relationship_count += 1;
            global.last_updated = Utc::now();
        }
    }

    /// Record a claim, keyed by its normalized statement. `entities` are the
    /// global ids of the entities it mentions.
    pub fn upsert_claim(
        &self,
        claim: &Claim,
        entities: Vec<String>,
        domain: &str,
    ) -> Option<NetworkEffect> {
        let key = normalize_name(&claim.statement);
        if key.is_empty() {
            return None;
        }

        match self.claims.entry(key.clone()) {
            Entry::Vacant(slot) => {
                let now = Utc::now();
                slot.insert(GlobalClaim {
                    global_claim_id: global_claim_id(&key),
                    statement: claim.statement.clone(),
                    entities,
                    supporting_domains: vec![domain.to_string()],
                    confidence_score: claim.confidence.clamp(0.0, 1.0),
                    authority_score: self.config.initial_authority(claim.confidence, 0),
                    evidence_count: claim.evidence.len(),
                    first_seen: now,
                    last_updated: now,
                });
                None
            }
            Entry::Occupied(mut slot) => {
                let global = slot.get_mut();
                if global.is_supported_by(domain) {
                    return None;
                }
                let domains_before = global.supporting_domains.len();
                global.supporting_domains.push(domain.to_string());
                global.evidence_count += claim.evidence.len();
                for id in entities {
                    if !global.entities.contains(&id) {
                        global.entities.push(id);
                    }
                }
                global.last_updated = Utc::now();

                let boost = self.config.claim_boost(domains_before)?;
                add_clamped(&mut global.confidence_score, boost.confidence, 1.0);
                add_clamped(&mut global.authority_score, boost.authority, 100.0);
                Some(
                    NetworkEffect::new(EffectType::ClaimValidation, boost, domain)
                        .with_entities(global.entities.clone())
                        .with_claim_key(key)
                        .with_contributors(global.supporting_domains.clone()),
                )
            }
        }
    }

    /// Global entity for a normalized key.
    #[must_use]
    pub fn entity(&self, key: &str) -> Option<GlobalEntity> {
        self.entities.get(key).map(|e| e.value().clone())
    }

    #[must_use]
    pub fn entity_by_name(&self, name: &str) -> Option<GlobalEntity> {
        self.entity(&normalize_name(name))
    }

    /// Snapshot of all global entities, ordered by id.
    #[must_use]
    pub fn entities(&self) -> Vec<GlobalEntity> {
        let mut all: Vec<GlobalEntity> = self.entities.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.global_entity_id.cmp(&b.global_entity_id));
        all
    }

    #[must_use]
    pub fn relationships(&self) -> Vec<GlobalRelationship> {
        let mut all: Vec<GlobalRelationship> =
            self.relationships.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| a.global_relationship_id.cmp(&b.global_relationship_id));
        all
    }

    #[must_use]
    pub fn claims(&self) -> Vec<GlobalClaim> {
        let mut all: Vec<GlobalClaim> = self.claims.iter().map(|c| c.value().clone()).collect();
        all.sort_by(|a, b| a.statement.cmp(&b.statement));
        all
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    #[must_use]
    pub fn claim_count(&self) -> usize {
        self.claims.len()
    }

    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let mut domains: HashSet<String> = HashSet::new();
        let mut multi_domain_entities = 0;
        for entry in &self.entities {
            domains.extend(entry.referenced_by_domains.iter().cloned());
            if entry.referenced_by_domains.len() > 1 {
                multi_domain_entities += 1;
            }
        }

        RegistryStats {
            entities: self.entities.len(),
            relationships: self.relationships.len(),
            claims: self.claims.len(),
            domains: domains.len(),
            multi_domain_entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityData;

    fn org_graph(domain: &str, name: &str) -> KnowledgeGraph {
        let org = Entity::new(name.into(), EntityData::Organization).with_confidence(0.7);
        KnowledgeGraph::assemble(domain, format!("https://{domain}/"), vec![org], vec![], vec![])
    }

    fn works_for_graph(domain: &str) -> KnowledgeGraph {
        let jane = Entity::new("Jane Smith".into(), EntityData::Person).with_confidence(0.6);
        let acme = Entity::new("Acme Inc".into(), EntityData::Organization).with_confidence(0.7);
        let rel = Relationship::new(jane.id, acme.id, RelationType::WorksFor)
            .unwrap()
            .with_confidence(0.75);
        let claim = Claim::new("Acme Inc grew revenue 30%".into())
            .with_entities(vec![acme.id])
            .with_confidence(0.8);
        KnowledgeGraph::assemble(domain, "", vec![jane, acme], vec![rel], vec![claim])
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("OpenAI"), "openai");
        assert_eq!(normalize_name("  OpenAI,   Inc. "), "openai inc");
        assert_eq!(normalize_name("snake_case-name"), "snakecasename");
        assert_eq!(normalize_name("!!!"), "");
        assert_eq!(global_entity_id("openai inc"), "ge_openai_inc");
    }

    #[test]
    fn test_second_domain_amplifies_once() {
        let registry = GlobalRegistry::new();

        let first = registry.index_graph(&org_graph("a.com", "OpenAI"), &[]);
        assert!(first.is_empty());
        let before = registry.entity("openai").unwrap();
        assert!((before.authority_score - 35.0).abs() < 1e-9);

        let second = registry.index_graph(&org_graph("b.com", "OpenAI"), &[]);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].effect_type, EffectType::EntityAmplification);
        assert_eq!(second[0].affected_entities, vec!["ge_openai"]);
        assert_eq!(second[0].contributing_domains, vec!["a.com", "b.com"]);
        assert_eq!(second[0].evidence_count, 2);

        let after = registry.entity_by_name("OpenAI").unwrap();
        assert_eq!(after.referenced_by_domains, vec!["a.com", "b.com"]);
        assert_eq!(after.variants.len(), 2);
        assert_eq!(after.total_references, 2);
        assert!((after.authority_score - before.authority_score - 30.0).abs() < 1e-9);
        assert!((after.confidence_score - 0.9).abs() < 1e-9);
        assert!((after.citation_probability - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_reindexing_same_domain_is_idempotent() {
        let registry = GlobalRegistry::new();
        let a = works_for_graph("a.com");
        let b = works_for_graph("b.com");

        assert!(registry.index_graph(&a, &[]).is_empty());
        let effects = registry.index_graph(&b, &[]);
        assert!(!effects.is_empty());

        let snapshot = registry.entity("acme inc").unwrap();
        assert!(registry.index_graph(&a, &[]).is_empty());
        assert!(registry.index_graph(&b, &[]).is_empty());
        let again = registry.entity("acme inc").unwrap();

        assert_eq!(again.referenced_by_domains.len(), 2);
        assert!((again.authority_score - snapshot.authority_score).abs() < f64::EPSILON);
        assert!((again.confidence_score - snapshot.confidence_score).abs() < f64::EPSILON);
    }

    #[test]
    fn test_descriptions_merge_tagged_by_domain() {
        let registry = GlobalRegistry::new();
        let described = |domain: &str, text: &str| {
            let org = Entity::new("Acme Inc".into(), EntityData::Organization)
                .with_confidence(0.7)
                .with_description(text.into());
            KnowledgeGraph::assemble(domain, "", vec![org], vec![], vec![])
        };

        registry.index_graph(&described("a.com", "one"), &[]);
        registry.index_graph(&described("b.com", "two"), &[]);
        registry.index_graph(&org_graph("c.com", "Acme Inc"), &[]);

        let global = registry.entity("acme inc").unwrap();
        assert_eq!(global.merged_description, "[a.com] one | [b.com] two");
        assert_eq!(global.variants[1].description.as_deref(), Some("two"));
        assert!(global.variants[2].description.is_none());
    }

    #[test]
    fn test_same_name_twice_in_one_graph_counts_once() {
        let registry = GlobalRegistry::new();
        let e1 = Entity::new("Acme Inc".into(), EntityData::Organization).with_confidence(0.7);
        let e2 = Entity::new("Acme Inc".into(), EntityData::Organization).with_confidence(0.7);
        let graph = KnowledgeGraph::assemble("a.com", "", vec![e1, e2], vec![], vec![]);

        assert!(registry.index_graph(&graph, &[]).is_empty());
        let global = registry.entity("acme inc").unwrap();
        assert_eq!(global.referenced_by_domains, vec!["a.com"]);
        assert_eq!(global.total_references, 1);
    }

    #[test]
    fn test_relationship_and_claim_validation() {
        let registry = GlobalRegistry::new();
        registry.index_graph(&works_for_graph("a.com"), &[]);
        let effects = registry.index_graph(&works_for_graph("b.com"), &[]);

        let rel_effect = effects
            .iter()
            .find(|e| e.effect_type == EffectType::RelationshipValidation)
            .unwrap();
        assert_eq!(rel_effect.affected_entities, vec!["ge_jane_smith", "ge_acme_inc"]);
        assert_eq!(rel_effect.relationship_type, Some(RelationType::WorksFor));
        assert!((rel_effect.confidence_boost - 0.10).abs() < 1e-9);
        assert!((rel_effect.authority_boost - 15.0).abs() < 1e-9);
        assert!((rel_effect.citation_probability_lift - 10.0).abs() < 1e-9);

        let claim_effect = effects
            .iter()
            .find(|e| e.effect_type == EffectType::ClaimValidation)
            .unwrap();
        assert_eq!(claim_effect.claim_key.as_deref(), Some("acme inc grew revenue 30"));
        assert_eq!(claim_effect.affected_entities, vec!["ge_acme_inc"]);

        let rels = registry.relationships();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].supporting_domains, vec!["a.com", "b.com"]);
        assert!((rels[0].confidence_score - 0.85).abs() < 1e-9);

        let acme = registry.entity("acme inc").unwrap();
        assert_eq!(acme.connected_global_entities, vec!["ge_jane_smith"]);
        assert_eq!(acme.relationship_count, 1);

        let stats = registry.stats();
        assert_eq!(stats.entities, 2);
        assert_eq!(stats.relationships, 1);
        assert_eq!(stats.claims, 1);
        assert_eq!(stats.domains, 2);
        assert_eq!(stats.multi_domain_entities, 2);
    }

    #[test]
    fn test_new_citation_platforms_boost_authority() {
        let registry = GlobalRegistry::new();
        let citations_a = vec![Citation::new("Try OpenAI", "chatgpt")];
        let citations_b = vec![
            Citation::new("OpenAI builds models", "chatgpt"),
            Citation::new("OpenAI is a lab", "perplexity"),
        ];

        registry.index_graph(&org_graph("a.com", "OpenAI"), &citations_a);
        let created = registry.entity("openai").unwrap();
        // 0.7 * 50 + 1 citation * 5
        assert!((created.authority_score - 40.0).abs() < 1e-9);
        assert_eq!(created.citation_platforms, vec!["chatgpt"]);

        let effects = registry.index_graph(&org_graph("b.com", "OpenAI"), &citations_b);
        assert_eq!(effects.len(), 2);
        let boost = effects
            .iter()
            .find(|e| e.effect_type == EffectType::AuthorityBoost)
            .unwrap();
        assert!((boost.authority_boost - 5.0).abs() < 1e-9);

        let global = registry.entity("openai").unwrap();
        assert_eq!(global.citation_platforms, vec!["chatgpt", "perplexity"]);
        assert_eq!(global.total_citations, 3);
        assert!((global.authority_score - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_scores_are_monotonic_and_clamped() {
        let registry = GlobalRegistry::new();
        let mut last_authority = 0.0;
        let mut last_confidence = 0.0;

        for i in 0..30 {
            let citations = vec![Citation::new("OpenAI", format!("platform-{i}"))];
            registry.index_graph(&org_graph(&format!("d{i}.com"), "OpenAI"), &citations);
            let global = registry.entity("openai").unwrap();

            assert!(global.authority_score >= last_authority);
            assert!(global.confidence_score >= last_confidence);
            assert!((0.0..=100.0).contains(&global.authority_score));
            assert!((0.0..=1.0).contains(&global.confidence_score));
            assert!((0.0..=100.0).contains(&global.citation_probability));

            last_authority = global.authority_score;
            last_confidence = global.confidence_score;
        }

        let global = registry.entity("openai").unwrap();
        assert_eq!(global.referenced_by_domains.len(), 30);
        assert!((global.authority_score - 100.0).abs() < f64::EPSILON);
        assert!((global.confidence_score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_concurrent_ingestion_loses_no_domains() {
        let registry = GlobalRegistry::new();
        let graphs: Vec<KnowledgeGraph> = (0..16)
            .map(|i| org_graph(&format!("site{i}.com"), "OpenAI"))
            .collect();

        let shared = &registry;
        let effect_counts: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = graphs
                .iter()
                .map(|g| s.spawn(move || shared.index_graph(g, &[]).len()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let global = registry.entity("openai").unwrap();
        assert_eq!(global.referenced_by_domains.len(), 16);
        let unique: HashSet<&String> = global.referenced_by_domains.iter().collect();
        assert_eq!(unique.len(), 16);
        // Every domain but the first produces exactly one amplification.
        assert_eq!(effect_counts.iter().sum::<usize>(), 15);
    }
}
