use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Person,
    Organization,
    Product,
    Service,
    Concept,
    Technology,
    Location,
    Event,
    Claim,
    Metric,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Product => "product",
            Self::Service => "service",
            Self::Concept => "concept",
            Self::Technology => "technology",
            Self::Location => "location",
            Self::Event => "event",
            Self::Claim => "claim",
            Self::Metric => "metric",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person" => Ok(Self::Person),
            "organization" => Ok(Self::Organization),
            "product" => Ok(Self::Product),
            "service" => Ok(Self::Service),
            "concept" => Ok(Self::Concept),
            "technology" => Ok(Self::Technology),
            "location" => Ok(Self::Location),
            "event" => Ok(Self::Event),
            "claim" => Ok(Self::Claim),
            "metric" => Ok(Self::Metric),
            _ => Err(crate::Error::InvalidEntityType(s.to_string())),
        }
    }
}

/// Quantity carried by a metric entity, e.g. `30% increase` is `{30, "%"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricData {
    pub value: f64,
    pub unit: String,
}

/// Typed payload per entity kind. Only metrics carry extra fields today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum EntityData {
    Person,
    Organization,
    Product,
    Service,
    Concept,
    Technology,
    Location,
    Event,
    Claim,
    Metric(MetricData),
}

impl EntityData {
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        match self {
            Self::Person => EntityType::Person,
            Self::Organization => EntityType::Organization,
            Self::Product => EntityType::Product,
            Self::Service => EntityType::Service,
            Self::Concept => EntityType::Concept,
            Self::Technology => EntityType::Technology,
            Self::Location => EntityType::Location,
            Self::Event => EntityType::Event,
            Self::Claim => EntityType::Claim,
            Self::Metric(_) => EntityType::Metric,
        }
    }

    /// Payload-free data for a type. Metrics default to a zero quantity.
    #[must_use]
    pub fn for_type(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Person => Self::Person,
            EntityType::Organization => Self::Organization,
            EntityType::Product => Self::Product,
            EntityType::Service => Self::Service,
            EntityType::Concept => Self::Concept,
            EntityType::Technology => Self::Technology,
            EntityType::Location => Self::Location,
            EntityType::Event => Self::Event,
            EntityType::Claim => Self::Claim,
            EntityType::Metric => Self::Metric(MetricData {
                value: 0.0,
                unit: String::new(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: Uuid,
    pub name: String,
    pub data: EntityData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub confidence: f64,
    /// Cross-domain authority in [0, 100], written back by network effects.
    #[serde(default)]
    pub authority_score: f64,
    pub source_url: String,
    pub source_context: String,
    pub extracted_at: DateTime<Utc>,
}

impl Entity {
    #[must_use]
    pub fn new(name: String, data: EntityData) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            data,
            description: None,
            url: None,
            confidence: 0.0,
            authority_score: 0.0,
            source_url: String::new(),
            source_context: String::new(),
            extracted_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source_url: String, source_context: String) -> Self {
        self.source_url = source_url;
        self.source_context = source_context;
        self
    }

    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        self.data.entity_type()
    }

    #[must_use]
    pub const fn metric(&self) -> Option<&MetricData> {
        match &self.data {
            EntityData::Metric(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_round_trip_through_str() {
        for ty in [EntityType::Person, EntityType::Metric, EntityType::Technology] {
            assert_eq!(ty.as_str().parse::<EntityType>().unwrap(), ty);
        }
        assert!("robot".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_confidence_is_clamped() {
        let e = Entity::new("Acme Inc".into(), EntityData::Organization).with_confidence(1.7);
        assert!((e.confidence - 1.0).abs() < f64::EPSILON);

        let e = Entity::new("Acme Inc".into(), EntityData::Organization).with_confidence(-0.2);
        assert!(e.confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn test_entity_data_serializes_tagged() {
        let data = EntityData::Metric(MetricData {
            value: 30.0,
            unit: "%".into(),
        });
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["type"], "metric");
        assert_eq!(json["data"]["unit"], "%");

        let plain = serde_json::to_value(EntityData::Person).unwrap();
        assert_eq!(plain["type"], "person");
        let back: EntityData = serde_json::from_value(plain).unwrap();
        assert_eq!(back.entity_type(), EntityType::Person);
    }

    #[test]
    fn test_for_type_matches_entity_type() {
        assert_eq!(
            EntityData::for_type(EntityType::Metric).entity_type(),
            EntityType::Metric
        );
        assert_eq!(
            EntityData::for_type(EntityType::Location).entity_type(),
            EntityType::Location
        );
    }
}
