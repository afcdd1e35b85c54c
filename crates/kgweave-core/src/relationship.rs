use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationType {
    // Agency
    WorksFor,
    Owns,
    Creates,
    Specializes,

    // Evidence
    Proves,
    Contradicts,
    Cites,
    Supports,
    Measures,

    // Generic
    RelatedTo,
}

impl RelationType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WorksFor => "worksFor",
            Self::Owns => "owns",
            Self::Creates => "creates",
            Self::Specializes => "specializes",
            Self::Proves => "proves",
            Self::Contradicts => "contradicts",
            Self::Cites => "cites",
            Self::Supports => "supports",
            Self::Measures => "measures",
            Self::RelatedTo => "relatedTo",
        }
    }

    /// Relations where one side acts on the other.
    #[must_use]
    pub const fn is_agency(&self) -> bool {
        matches!(self, Self::WorksFor | Self::Owns | Self::Creates)
    }

    #[must_use]
    pub const fn is_measurement(&self) -> bool {
        matches!(self, Self::Measures | Self::Proves)
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "worksFor" => Ok(Self::WorksFor),
            "owns" => Ok(Self::Owns),
            "creates" => Ok(Self::Creates),
            "specializes" => Ok(Self::Specializes),
            "proves" => Ok(Self::Proves),
            "contradicts" => Ok(Self::Contradicts),
            "cites" => Ok(Self::Cites),
            "supports" => Ok(Self::Supports),
            "measures" => Ok(Self::Measures),
            "relatedTo" => Ok(Self::RelatedTo),
            _ => Err(crate::Error::InvalidRelationshipType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub id: Uuid,
    pub source_id: Uuid,
    pub target_id: Uuid,
    pub relation_type: RelationType,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub extracted_at: DateTime<Utc>,
}

impl Relationship {
    pub fn new(
        source_id: Uuid,
        target_id: Uuid,
        relation_type: RelationType,
    ) -> crate::Result<Self> {
        if source_id == target_id {
            return Err(crate::Error::SelfReference);
        }

        Ok(Self {
            id: Uuid::now_v7(),
            source_id,
            target_id,
            relation_type,
            confidence: 0.5,
            context: None,
            extracted_at: Utc::now(),
        })
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }

    /// Identity used when deduplicating relationships across graphs.
    #[must_use]
    pub const fn triple(&self) -> (Uuid, RelationType, Uuid) {
        (self.source_id, self.relation_type, self.target_id)
    }
}
