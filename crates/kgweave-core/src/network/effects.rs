use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::Boost;
use crate::relationship::RelationType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    EntityAmplification,
    RelationshipValidation,
    ClaimValidation,
    AuthorityBoost,
}

impl EffectType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EntityAmplification => "entity_amplification",
            Self::RelationshipValidation => "relationship_validation",
            Self::ClaimValidation => "claim_validation",
            Self::AuthorityBoost => "authority_boost",
        }
    }
}

impl std::fmt::Display for EffectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EffectType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entity_amplification" => Ok(Self::EntityAmplification),
            "relationship_validation" => Ok(Self::RelationshipValidation),
            "claim_validation" => Ok(Self::ClaimValidation),
            "authority_boost" => Ok(Self::AuthorityBoost),
            _ => Err(crate::Error::InvalidEffectType(s.to_string())),
        }
    }
}

/// An immutable record of one boosting event.
///
/// `affected_entities` holds global entity ids. Relationship effects list the
/// source then the target and set `relationship_type`; claim effects set
/// `claim_key` to the normalized statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkEffect {
    pub id: Uuid,
    pub effect_type: EffectType,
    pub affected_entities: Vec<String>,
    pub affected_domains: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<RelationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_key: Option<String>,
    pub confidence_boost: f64,
    pub authority_boost: f64,
    /// Percentage points.
    pub citation_probability_lift: f64,
    pub evidence_count: usize,
    pub contributing_domains: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl NetworkEffect {
    #[must_use]
    pub fn new(effect_type: EffectType, boost: Boost, domain: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            effect_type,
            affected_entities: Vec::new(),
            affected_domains: vec![domain.to_string()],
            relationship_type: None,
            claim_key: None,
            confidence_boost: boost.confidence,
            authority_boost: boost.authority,
            citation_probability_lift: boost.citation_lift,
            evidence_count: 0,
            contributing_domains: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_entities(mut self, entities: Vec<String>) -> Self {
        self.affected_entities = entities;
        self
    }

    #[must_use]
    pub const fn with_relationship_type(mut self, relation_type: RelationType) -> Self {
        self.relationship_type = Some(relation_type);
        self
    }

    #[must_use]
    pub fn with_claim_key(mut self, key: String) -> Self {
        self.claim_key = Some(key);
        self
    }

    #[must_use]
    pub fn with_contributors(mut self, domains: Vec<String>) -> Self {
        self.evidence_count = domains.len();
        self.contributing_domains = domains;
        self
    }

    #[must_use]
    pub fn affects(&self, global_id: &str) -> bool {
        self.affected_entities.iter().any(|id| id == global_id)
    }
}

/// One answer from an external citation source, e.g. an assistant response
/// and the platform that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub response: String,
    pub source: String,
}

impl Citation {
    #[must_use]
    pub fn new(response: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            source: source.into(),
        }
    }
}

/// Mentions of `name` across `citations` (case-insensitive) and the distinct
/// platforms they came from, in first-seen order.
#[must_use]
pub fn citation_mentions(name: &str, citations: &[Citation]) -> (usize, Vec<String>) {
    let needle = name.to_lowercase();
    if needle.is_empty() {
        return (0, Vec::new());
    }

    let mut count = 0;
    let mut platforms: Vec<String> = Vec::new();
    for citation in citations {
        let hits = citation.response.to_lowercase().matches(needle.as_str()).count();
        if hits == 0 {
            continue;
        }
        count += hits;
        if !platforms.contains(&citation.source) {
            platforms.push(citation.source.clone());
        }
    }
    (count, platforms)
}
