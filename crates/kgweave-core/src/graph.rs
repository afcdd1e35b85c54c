use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::claim::Claim;
use crate::entity::Entity;
use crate::relationship::Relationship;

pub const INITIAL_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: String,
    pub source_urls: Vec<String>,
    pub entity_count: usize,
    pub relationship_count: usize,
    pub claim_count: usize,
    /// Network effects already written back into this graph.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applied_effects: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub id: Uuid,
    pub domain: String,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub claims: Vec<Claim>,
    pub metadata: GraphMetadata,
}

impl KnowledgeGraph {
    /// Wrap extracted records into a graph for `domain`.
    ///
    /// Relationships whose endpoints are missing from `entities` or point at
    /// the same entity are dropped, as are claim references to unknown
    /// entities. Confidences are clamped into `[0, 1]`.
    #[must_use]
    pub fn assemble(
        domain: impl Into<String>,
        source_url: impl Into<String>,
        mut entities: Vec<Entity>,
        relationships: Vec<Relationship>,
        mut claims: Vec<Claim>,
    ) -> Self {
        let source_url = source_url.into();
        let now = Utc::now();

        for entity in &mut entities {
            entity.confidence = entity.confidence.clamp(0.0, 1.0);
        }

        let known: HashSet<Uuid> = entities.iter().map(|e| e.id).collect();
        let relationships: Vec<Relationship> = relationships
            .into_iter()
            .filter(|r| {
                let valid = r.source_id != r.target_id
                    && known.contains(&r.source_id)
                    && known.contains(&r.target_id);
                if !valid {
                    tracing::warn!(relationship = %r.id, "Dropping dangling relationship");
                }
                valid
            })
            .map(|mut r| {
                r.confidence = r.confidence.clamp(0.0, 1.0);
                r
            })
            .collect();

        for claim in &mut claims {
            claim.entities.retain(|id| known.contains(id));
            claim.confidence = claim.confidence.clamp(0.0, 1.0);
        }

        let source_urls = if source_url.is_empty() {
            Vec::new()
        } else {
            vec![source_url]
        };

        let mut graph = Self {
            id: Uuid::now_v7(),
            domain: domain.into(),
            entities,
            relationships,
            claims,
            metadata: GraphMetadata {
                created_at: now,
                updated_at: now,
                version: INITIAL_VERSION.to_string(),
                source_urls,
                entity_count: 0,
                relationship_count: 0,
                claim_count: 0,
                applied_effects: Vec::new(),
            },
        };
        graph.refresh_counts();
        graph
    }

    /// An empty graph for `domain`.
    #[must_use]
    pub fn empty(domain: impl Into<String>) -> Self {
        Self::assemble(domain, "", Vec::new(), Vec::new(), Vec::new())
    }

    pub fn refresh_counts(&mut self) {
        self.metadata.entity_count = self.entities.len();
        self.metadata.relationship_count = self.relationships.len();
        self.metadata.claim_count = self.claims.len();
    }

    #[must_use]
    pub fn counts_consistent(&self) -> bool {
        self.metadata.entity_count == self.entities.len()
            && self.metadata.relationship_count == self.relationships.len()
            && self.metadata.claim_count == self.claims.len()
    }

    #[must_use]
    pub fn entity(&self, id: Uuid) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty() && self.claims.is_empty()
    }
}

/// Next minor version: `1.0.0` becomes `1.1.0`. Unparseable versions restart
/// from the initial version's successor.
#[must_use]
pub fn bump_version(version: &str) -> String {
    let parts: Vec<u64> = version
        .split('.')
        .map(str::parse)
        .collect::<Result<_, _>>()
        .unwrap_or_default();

    match parts.as_slice() {
        [major, minor, _] => format!("{major}.{}.0", minor + 1),
        _ => "1.1.0".to_string(),
    }
}

/// Numeric comparison key for a `major.minor.patch` version string.
#[must_use]
pub fn version_key(version: &str) -> (u64, u64, u64) {
    let mut parts = version.split('.').map(|p| p.parse::<u64>().unwrap_or(0));
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}
