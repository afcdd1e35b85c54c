//! JSON-LD projection of a graph using Schema.org vocabulary.

use serde_json::{json, Map, Value};

use crate::entity::{Entity, EntityType};
use crate::graph::KnowledgeGraph;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

#[must_use]
pub const fn schema_type(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Person => "Person",
        EntityType::Organization => "Organization",
        EntityType::Product => "Product",
        EntityType::Service => "Service",
        EntityType::Concept => "DefinedTerm",
        EntityType::Technology => "SoftwareApplication",
        EntityType::Location => "Place",
        EntityType::Event => "Event",
        EntityType::Claim => "Claim",
        EntityType::Metric => "QuantitativeValue",
    }
}

fn node_id(id: impl std::fmt::Display) -> String {
    format!("urn:uuid:{id}")
}

fn entity_node(entity: &Entity) -> Value {
    let mut node = Map::new();
    node.insert("@id".into(), json!(node_id(entity.id)));
    node.insert("@type".into(), json!(schema_type(entity.entity_type())));
    node.insert("name".into(), json!(entity.name));
    if let Some(description) = &entity.description {
        node.insert("description".into(), json!(description));
    }
    if let Some(url) = &entity.url {
        node.insert("url".into(), json!(url));
    }
    if let Some(metric) = entity.metric() {
        node.insert("value".into(), json!(metric.value));
        node.insert("unitText".into(), json!(metric.unit));
    }
    node.insert("confidence".into(), json!(entity.confidence));
    if entity.authority_score > 0.0 {
        node.insert("authorityScore".into(), json!(entity.authority_score));
    }
    if !entity.source_url.is_empty() {
        node.insert("isBasedOn".into(), json!(entity.source_url));
    }
    Value::Object(node)
}

/// Entities become typed nodes, relationships become `Relationship` edge
/// records and claims become `Claim` nodes that point at the entities they
/// are about.
#[must_use]
pub fn to_json_ld(graph: &KnowledgeGraph) -> Value {
    let mut nodes: Vec<Value> = graph.entities.iter().map(entity_node).collect();

    nodes.extend(graph.relationships.iter().map(|rel| {
        json!({
            "@id": node_id(rel.id),
            "@type": "Relationship",
            "relationshipType": rel.relation_type.as_str(),
            "source": { "@id": node_id(rel.source_id) },
            "target": { "@id": node_id(rel.target_id) },
            "confidence": rel.confidence,
        })
    }));

    nodes.extend(graph.claims.iter().map(|claim| {
        let about: Vec<Value> = claim
            .entities
            .iter()
            .map(|id| json!({ "@id": node_id(id) }))
            .collect();
        let evidence: Vec<Value> = claim
            .evidence
            .iter()
            .map(|e| {
                let mut node = json!({
                    "@type": "CreativeWork",
                    "additionalType": e.evidence_type.as_str(),
                    "text": e.source,
                });
                if let Some(url) = &e.url {
                    node["url"] = json!(url);
                }
                node
            })
            .collect();

        let mut node = json!({
            "@id": node_id(claim.id),
            "@type": "Claim",
            "text": claim.statement,
            "about": about,
            "confidence": claim.confidence,
        });
        if !evidence.is_empty() {
            node["citation"] = Value::Array(evidence);
        }
        if let Some(temporal) = &claim.temporal {
            if let Some(from) = &temporal.valid_from {
                node["validFrom"] = json!(from);
            }
            if let Some(until) = &temporal.valid_until {
                node["validThrough"] = json!(until);
            }
        }
        node
    }));

    json!({
        "@context": SCHEMA_CONTEXT,
        "@id": node_id(graph.id),
        "name": graph.domain,
        "version": graph.metadata.version,
        "dateCreated": graph.metadata.created_at.to_rfc3339(),
        "dateModified": graph.metadata.updated_at.to_rfc3339(),
        "@graph": nodes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{Claim, Evidence, EvidenceType};
    use crate::entity::{EntityData, MetricData};
    use crate::relationship::{RelationType, Relationship};

    #[test]
    fn test_json_ld_shape() {
        let acme = Entity::new("OpenAI".into(), EntityData::Organization)
            .with_confidence(0.7)
            .with_url("https://openai.com".into());
        let jane = Entity::new("Jane Smith".into(), EntityData::Person).with_confidence(0.6);
        let metric = Entity::new(
            "30% increase".into(),
            EntityData::Metric(MetricData {
                value: 30.0,
                unit: "%".into(),
            }),
        );
        let rel = Relationship::new(jane.id, acme.id, RelationType::WorksFor).unwrap();
        let claim = Claim::new("OpenAI grew 30%".into())
            .with_entities(vec![acme.id])
            .with_evidence(vec![Evidence::new(EvidenceType::Data, "30%".into())]);

        let graph = KnowledgeGraph::assemble(
            "openai.com",
            "",
            vec![acme, jane, metric],
            vec![rel],
            vec![claim],
        );
        let doc = to_json_ld(&graph);

        assert_eq!(doc["@context"], SCHEMA_CONTEXT);
        let nodes = doc["@graph"].as_array().unwrap();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0]["@type"], "Organization");
        assert_eq!(nodes[0]["url"], "https://openai.com");
        assert_eq!(nodes[1]["@type"], "Person");
        assert_eq!(nodes[2]["@type"], "QuantitativeValue");
        assert_eq!(nodes[2]["unitText"], "%");
        assert_eq!(nodes[3]["relationshipType"], "worksFor");
        assert_eq!(nodes[3]["source"]["@id"], nodes[1]["@id"]);
        assert_eq!(nodes[4]["@type"], "Claim");
        assert_eq!(nodes[4]["about"][0]["@id"], nodes[0]["@id"]);
        assert_eq!(nodes[4]["citation"][0]["additionalType"], "data");
    }
}
