use serde::{Deserialize, Serialize};

/// Diminishing-returns boost tables applied when an entity, relationship or
/// claim is corroborated by a domain it has not been seen on before.
///
/// Index 0 of each table is the boost for the 2nd domain, index 1 for the
/// 3rd, and so on. The last entry repeats for every later domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    pub confidence: Vec<f64>,
    pub authority: Vec<f64>,
    /// Citation-probability lift in percentage points.
    pub citation_lift: Vec<f64>,
    /// Relationship and claim confidence boost as a fraction of the entity table.
    pub corroboration_confidence_factor: f64,
    pub relationship_authority: f64,
    pub relationship_lift: f64,
    pub claim_authority: f64,
    pub claim_lift: f64,
    /// Initial authority contributed per citation mention.
    pub authority_per_citation: f64,
    pub max_citation_authority: f64,
    /// Authority and lift granted per newly seen citation platform.
    pub platform_authority: f64,
    pub platform_lift: f64,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            confidence: vec![0.20, 0.10, 0.05, 0.02],
            authority: vec![30.0, 20.0, 10.0, 5.0],
            citation_lift: vec![25.0, 15.0, 10.0, 5.0],
            corroboration_confidence_factor: 0.5,
            relationship_authority: 15.0,
            relationship_lift: 10.0,
            claim_authority: 10.0,
            claim_lift: 10.0,
            authority_per_citation: 5.0,
            max_citation_authority: 50.0,
            platform_authority: 5.0,
            platform_lift: 5.0,
        }
    }
}

/// Boosts for one corroboration event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boost {
    pub confidence: f64,
    pub authority: f64,
    pub citation_lift: f64,
}

impl BoostConfig {
    /// Boost for a new domain given how many domains were already present.
    /// Returns `None` when nothing was present, since a first sighting is not
    /// a network effect.
    #[must_use]
    pub fn entity_boost(&self, domains_before: usize) -> Option<Boost> {
        if domains_before == 0 {
            return None;
        }
        let idx = domains_before - 1;
        Some(Boost {
            confidence: table_value(&self.confidence, idx),
            authority: table_value(&self.authority, idx),
            citation_lift: table_value(&self.citation_lift, idx),
        })
    }

    #[must_use]
    pub fn relationship_boost(&self, domains_before: usize) -> Option<Boost> {
        self.entity_boost(domains_before).map(|b| Boost {
            confidence: b.confidence * self.corroboration_confidence_factor,
            authority: self.relationship_authority,
            citation_lift: self.relationship_lift,
        })
    }

    #[must_use]
    pub fn claim_boost(&self, domains_before: usize) -> Option<Boost> {
        self.entity_boost(domains_before).map(|b| Boost {
            confidence: b.confidence * self.corroboration_confidence_factor,
            authority: self.claim_authority,
            citation_lift: self.claim_lift,
        })
    }

    #[must_use]
    pub fn platform_boost(&self, new_platforms: usize) -> Option<Boost> {
        if new_platforms == 0 {
            return None;
        }
        let n = new_platforms as f64;
        Some(Boost {
            confidence: 0.0,
            authority: self.platform_authority * n,
            citation_lift: self.platform_lift * n,
        })
    }

    /// Authority of a freshly created global entity.
    #[must_use]
    pub fn initial_authority(&self, confidence: f64, citation_count: usize) -> f64 {
        let citations = (citation_count as f64 * self.authority_per_citation)
            .min(self.max_citation_authority);
        (confidence * 50.0 + citations).clamp(0.0, 100.0)
    }

    pub fn validate(&self) -> crate::Result<()> {
        for (name, table) in [
            ("confidence", &self.confidence),
            ("authority", &self.authority),
            ("citation_lift", &self.citation_lift),
        ] {
            if table.is_empty() {
                return Err(crate::Error::Config(format!("boost table {name} is empty")));
            }
            if table.iter().any(|v| *v < 0.0) {
                return Err(crate::Error::Config(format!(
                    "boost table {name} contains a negative value"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.corroboration_confidence_factor) {
            return Err(crate::Error::Config(
                "corroboration_confidence_factor must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

fn table_value(table: &[f64], idx: usize) -> f64 {
    table
        .get(idx)
        .or_else(|| table.last())
        .copied()
        .unwrap_or(0.0)
}
