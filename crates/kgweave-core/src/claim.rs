use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceType {
    Citation,
    Data,
    ExpertOpinion,
    CaseStudy,
}

impl EvidenceType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Citation => "citation",
            Self::Data => "data",
            Self::ExpertOpinion => "expert_opinion",
            Self::CaseStudy => "case_study",
        }
    }
}

impl std::fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EvidenceType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "citation" => Ok(Self::Citation),
            "data" => Ok(Self::Data),
            "expert_opinion" => Ok(Self::ExpertOpinion),
            "case_study" => Ok(Self::CaseStudy),
            _ => Err(crate::Error::InvalidEvidenceType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub evidence_type: EvidenceType,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Evidence {
    #[must_use]
    pub const fn new(evidence_type: EvidenceType, source: String) -> Self {
        Self {
            evidence_type,
            source,
            url: None,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }
}

/// Period during which a claim holds, as stated in the text (years).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Temporal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
}

impl Temporal {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.valid_from.is_none() && self.valid_until.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub id: Uuid,
    pub statement: String,
    pub entities: Vec<Uuid>,
    pub evidence: Vec<Evidence>,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal: Option<Temporal>,
}

impl Claim {
    #[must_use]
    pub fn new(statement: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            statement,
            entities: Vec::new(),
            evidence: Vec::new(),
            confidence: 0.5,
            temporal: None,
        }
    }

    #[must_use]
    pub fn with_entities(mut self, entities: Vec<Uuid>) -> Self {
        self.entities = entities;
        self
    }

    #[must_use]
    pub fn with_evidence(mut self, evidence: Vec<Evidence>) -> Self {
        self.evidence = evidence;
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_temporal(mut self, temporal: Temporal) -> Self {
        if !temporal.is_empty() {
            self.temporal = Some(temporal);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_type_parse() {
        assert_eq!(
            "expert_opinion".parse::<EvidenceType>().unwrap(),
            EvidenceType::ExpertOpinion
        );
        assert!("rumor".parse::<EvidenceType>().is_err());
    }

    #[test]
    fn test_empty_temporal_not_attached() {
        let claim = Claim::new("Revenue grew".into()).with_temporal(Temporal::default());
        assert!(claim.temporal.is_none());

        let claim = Claim::new("Revenue grew".into()).with_temporal(Temporal {
            valid_from: Some("2021".into()),
            valid_until: None,
        });
        assert_eq!(claim.temporal.unwrap().valid_from.as_deref(), Some("2021"));
    }
}
