use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::extractor::{ExtractedEntity, ExtractionOutput};
use crate::config::ExtractionConfig;
use crate::entity::{Entity, EntityType};
use crate::relationship::{RelationType, Relationship};

fn keywords(pattern: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{pattern})\b")).expect("valid regex")
}

static WORKS_FOR: LazyLock<Regex> = LazyLock::new(|| {
    keywords(
        "ceo|cto|cfo|coo|founder|co-founder|cofounder|works at|works for|worked at|employee|president|director|chief|head of|executive|joined|hired|vp",
    )
});
static OWNS: LazyLock<Regex> = LazyLock::new(|| {
    keywords("acquired|acquires|acquisition|merger|merged|owns|owned|subsidiary|bought|parent company")
});
static CREATES: LazyLock<Regex> = LazyLock::new(|| {
    keywords(
        "creates|created|launches|launched|develops|developed|released|releases|builds|built|makes|made|introduced|unveiled",
    )
});
static PROVES: LazyLock<Regex> =
    LazyLock::new(|| keywords("proves|proved|proven|demonstrates|demonstrated"));
static MEASURES: LazyLock<Regex> = LazyLock::new(|| {
    keywords("shows|show|showed|measures|measured|indicates|indicated|reached|reports|reported")
});
static SPECIALIZES: LazyLock<Regex> = LazyLock::new(|| {
    keywords("specializes in|specialises in|specializing in|expert in|experts in|focuses on|focused on|specialist")
});
static CONTRADICTS: LazyLock<Regex> = LazyLock::new(|| {
    keywords("contradicts|contradicted|however|but|conflicts with|disputes|disputed|unlike|versus|vs|refutes")
});
static SUPPORTS: LazyLock<Regex> = LazyLock::new(|| {
    keywords("supports|supported|confirms|reinforces|backs|consistent with|corroborates")
});
static CITES: LazyLock<Regex> =
    LazyLock::new(|| keywords("cites|cited|references|referenced|according to|based on"));
static CONNECTIVE: LazyLock<Regex> = LazyLock::new(|| keywords("and|with|related"));
static STRONG: LazyLock<Regex> =
    LazyLock::new(|| keywords("confirmed|verified|official|officially"));

/// Outcome of classifying an entity pair. `reversed` means the second entity
/// of the pair is the relationship's source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub relation_type: RelationType,
    pub reversed: bool,
}

impl Classification {
    const fn forward(relation_type: RelationType) -> Self {
        Self {
            relation_type,
            reversed: false,
        }
    }
}

/// Decides whether, and how, two entities sharing a sentence are related.
pub trait RelationshipClassifier: Send + Sync {
    fn classify(&self, first: &Entity, second: &Entity, sentence: &str) -> Option<Classification>;
}

/// Ordered keyword rules conditioned on the pair's entity types.
pub struct KeywordClassifier;

/// `Some(reversed)` when the pair is `(source, target)` in either order.
fn orient(a: EntityType, b: EntityType, source: EntityType, target: EntityType) -> Option<bool> {
    if a == source && b == target {
        Some(false)
    } else if a == target && b == source {
        Some(true)
    } else {
        None
    }
}

impl RelationshipClassifier for KeywordClassifier {
    fn classify(&self, first: &Entity, second: &Entity, sentence: &str) -> Option<Classification> {
        use EntityType::{Concept, Metric, Organization, Person, Product, Technology};

        let a = first.entity_type();
        let b = second.entity_type();
        let rule = |relation_type, reversed| {
            Some(Classification {
                relation_type,
                reversed,
            })
        };

        if let Some(rev) = orient(a, b, Person, Organization) {
            if WORKS_FOR.is_match(sentence) {
                return rule(RelationType::WorksFor, rev);
            }
        }

        if a == Organization && b == Organization && OWNS.is_match(sentence) {
            return rule(RelationType::Owns, false);
        }

        if let Some(rev) =
            orient(a, b, Organization, Product).or_else(|| orient(a, b, Person, Product))
        {
            if CREATES.is_match(sentence) {
                return rule(RelationType::Creates, rev);
            }
        }

        if a == Metric || b == Metric || (a == Concept && b == Concept && PROVES.is_match(sentence))
        {
            // The metric, when present, is the source.
            let rev = b == Metric && a != Metric;
            if PROVES.is_match(sentence) {
                return rule(RelationType::Proves, rev);
            }
            if MEASURES.is_match(sentence) {
                return rule(RelationType::Measures, rev);
            }
        }

        for target in [Concept, Technology] {
            if let Some(rev) =
                orient(a, b, Organization, target).or_else(|| orient(a, b, Person, target))
            {
                if SPECIALIZES.is_match(sentence) {
                    return rule(RelationType::Specializes, rev);
                }
            }
        }

        if a == Concept && b == Concept {
            if CONTRADICTS.is_match(sentence) {
                return Some(Classification::forward(RelationType::Contradicts));
            }
            if SUPPORTS.is_match(sentence) {
                return Some(Classification::forward(RelationType::Supports));
            }
            if CITES.is_match(sentence) {
                return Some(Classification::forward(RelationType::Cites));
            }
            return Some(Classification::forward(RelationType::RelatedTo));
        }

        if CONNECTIVE.is_match(sentence) {
            return Some(Classification::forward(RelationType::RelatedTo));
        }

        None
    }
}

/// Confidence for a relationship of `relation_type` found in `sentence`.
#[must_use]
pub fn relationship_confidence(
    relation_type: RelationType,
    sentence: &str,
    config: &ExtractionConfig,
) -> f64 {
    let base = if relation_type.is_measurement() {
        0.8
    } else if relation_type.is_agency() {
        0.75
    } else {
        0.5
    };

    if STRONG.is_match(sentence) {
        (base + config.strong_corroboration_bonus).min(config.max_relationship_confidence)
    } else {
        base
    }
}

pub struct RelationshipInferencer {
    classifier: Box<dyn RelationshipClassifier>,
    config: ExtractionConfig,
}

impl RelationshipInferencer {
    #[must_use]
    pub fn new(classifier: Box<dyn RelationshipClassifier>, config: ExtractionConfig) -> Self {
        Self { classifier, config }
    }

    /// Sentences holding at least two entities, keyed by sentence index.
    fn sentence_index(output: &ExtractionOutput) -> BTreeMap<usize, Vec<&ExtractedEntity>> {
        let mut index: BTreeMap<usize, Vec<&ExtractedEntity>> = BTreeMap::new();
        for extracted in &output.entities {
            index.entry(extracted.span.sentence).or_default().push(extracted);
        }
        index.retain(|_, entities| entities.len() >= 2);
        index
    }

    #[must_use]
    pub fn infer(&self, output: &ExtractionOutput) -> Vec<Relationship> {
        let mut relationships = Vec::new();

        for (sentence_idx, entities) in Self::sentence_index(output) {
            let Some(sentence) = output.sentences.get(sentence_idx) else {
                continue;
            };

            let pairs = entities
                .iter()
                .enumerate()
                .flat_map(|(i, a)| entities[i + 1..].iter().map(move |b| (*a, *b)))
                .take(self.config.max_pairs_per_sentence);

            for (first, second) in pairs {
                let Some(class) = self.classifier.classify(&first.entity, &second.entity, sentence)
                else {
                    continue;
                };

                let (source, target) = if class.reversed {
                    (second, first)
                } else {
                    (first, second)
                };

                match Relationship::new(source.entity.id, target.entity.id, class.relation_type) {
                    Ok(rel) => {
                        let confidence =
                            relationship_confidence(class.relation_type, sentence, &self.config);
                        let context = sentence
                            .chars()
                            .take(self.config.context_snippet_chars)
                            .collect();
                        relationships.push(rel.with_confidence(confidence).with_context(context));
                    }
                    Err(e) => {
                        tracing::warn!("Skipping invalid relationship: {}", e);
                    }
                }
            }
        }

        tracing::debug!(relationships = relationships.len(), "inferred relationships");
        relationships
    }
}

impl Default for RelationshipInferencer {
    fn default() -> Self {
        Self::new(Box::new(KeywordClassifier), ExtractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityData;
    use crate::ingest::extractor::{Extractor, RuleBasedExtractor, TextSpan};

    fn entity(name: &str, data: EntityData) -> Entity {
        Entity::new(name.into(), data)
    }

    fn output_with(sentence: &str, entities: Vec<Entity>) -> ExtractionOutput {
        ExtractionOutput {
            sentences: vec![sentence.to_string()],
            entities: entities
                .into_iter()
                .map(|e| ExtractedEntity {
                    span: TextSpan::new(e.name.clone(), 0, 0, 0),
                    entity: e,
                })
                .collect(),
        }
    }

    #[test]
    fn test_scenario_works_for() {
        let text = "Jane Smith, CEO of Acme Inc, announced a 30% increase in revenue according to Acme Inc's Q3 report.";
        let output = RuleBasedExtractor::default().extract(text, "https://acme.example");
        let rels = RelationshipInferencer::default().infer(&output);

        let jane = output
            .entities
            .iter()
            .find(|e| e.entity.name == "Jane Smith")
            .unwrap();
        let works_for: Vec<_> = rels
            .iter()
            .filter(|r| r.relation_type == RelationType::WorksFor)
            .collect();

        // One per "Acme Inc" mention; duplicates are kept until merge.
        assert_eq!(works_for.len(), 2);
        assert_eq!(rels.len(), 2);
        for rel in works_for {
            assert_eq!(rel.source_id, jane.entity.id);
            assert!(rel.confidence >= 0.75);
        }
    }

    #[test]
    fn test_reversed_pair_keeps_person_as_source() {
        let acme = entity("Acme Inc", EntityData::Organization);
        let jane = entity("Jane Smith", EntityData::Person);
        let class = KeywordClassifier
            .classify(&acme, &jane, "Acme Inc hired Jane Smith as director")
            .unwrap();
        assert_eq!(class.relation_type, RelationType::WorksFor);
        assert!(class.reversed);
    }

    #[test]
    fn test_acquisition_is_owns() {
        let a = entity("Globex Corp", EntityData::Organization);
        let b = entity("Initech LLC", EntityData::Organization);
        let class = KeywordClassifier
            .classify(&a, &b, "Globex Corp acquired Initech LLC in a cash deal")
            .unwrap();
        assert_eq!(class, Classification::forward(RelationType::Owns));
    }

    #[test]
    fn test_no_rule_and_no_connective_emits_nothing() {
        let a = entity("Jane Smith", EntityData::Person);
        let b = entity("Robert Brown", EntityData::Person);
        assert!(KeywordClassifier
            .classify(&a, &b, "Jane Smith spoke before Robert Brown arrived")
            .is_none());
        assert_eq!(
            KeywordClassifier
                .classify(&a, &b, "Jane Smith and Robert Brown spoke")
                .unwrap()
                .relation_type,
            RelationType::RelatedTo
        );
    }

    #[test]
    fn test_concept_rules() {
        let a = entity("zero trust", EntityData::Concept);
        let b = entity("perimeter security", EntityData::Concept);
        let classify = |s: &str| KeywordClassifier.classify(&a, &b, s).unwrap().relation_type;

        assert_eq!(classify("zero trust contradicts perimeter security"), RelationType::Contradicts);
        assert_eq!(classify("zero trust supports perimeter security"), RelationType::Supports);
        assert_eq!(classify("zero trust cites perimeter security"), RelationType::Cites);
        assert_eq!(classify("zero trust near perimeter security"), RelationType::RelatedTo);
    }

    #[test]
    fn test_metric_is_source_of_measures() {
        let org = entity("Acme Inc", EntityData::Organization);
        let metric = entity("40% growth", EntityData::for_type(EntityType::Metric));
        let class = KeywordClassifier
            .classify(&org, &metric, "The survey shows Acme Inc at 40% growth")
            .unwrap();
        assert_eq!(class.relation_type, RelationType::Measures);
        assert!(class.reversed);
    }

    #[test]
    fn test_confidence_levels() {
        let config = ExtractionConfig::default();
        let plain = "nothing special here";
        assert!((relationship_confidence(RelationType::RelatedTo, plain, &config) - 0.5).abs() < 1e-9);
        assert!((relationship_confidence(RelationType::Owns, plain, &config) - 0.75).abs() < 1e-9);
        assert!((relationship_confidence(RelationType::Measures, plain, &config) - 0.8).abs() < 1e-9);

        let strong = "this was officially confirmed";
        assert!((relationship_confidence(RelationType::WorksFor, strong, &config) - 0.9).abs() < 1e-9);
        assert!((relationship_confidence(RelationType::Proves, strong, &config) - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_pair_cap_limits_relationships() {
        let sentence = "alpha and beta and gamma and delta and epsilon and zeta";
        let entities = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"]
            .iter()
            .map(|n| entity(n, EntityData::Person))
            .collect();
        let output = output_with(sentence, entities);

        // 6 entities would give 15 pairs without the cap.
        let rels = RelationshipInferencer::default().infer(&output);
        assert_eq!(rels.len(), 10);

        let config = ExtractionConfig {
            max_pairs_per_sentence: 3,
            ..ExtractionConfig::default()
        };
        let rels = RelationshipInferencer::new(Box::new(KeywordClassifier), config).infer(&output);
        assert_eq!(rels.len(), 3);
    }

    #[test]
    fn test_single_entity_sentences_skipped() {
        let output = output_with(
            "Jane Smith and nobody else",
            vec![entity("Jane Smith", EntityData::Person)],
        );
        assert!(RelationshipInferencer::default().infer(&output).is_empty());
    }
}
