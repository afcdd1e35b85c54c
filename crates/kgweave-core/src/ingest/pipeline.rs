use crate::config::PipelineConfig;
use crate::graph::KnowledgeGraph;

use super::claims::ClaimExtractor;
use super::extractor::{Extractor, RuleBasedExtractor};
use super::normalizer::{normalize_document, DocumentFormat};
use super::relationships::{KeywordClassifier, RelationshipInferencer};

/// Runs normalize, extract, infer and assemble over one document.
///
/// Holds no shared state, so one builder can serve many documents from many
/// threads.
pub struct GraphBuilder {
    extractor: Box<dyn Extractor>,
    inferencer: RelationshipInferencer,
    claims: ClaimExtractor,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            extractor: Box::new(RuleBasedExtractor::with_default_matchers(
                config.extraction.clone(),
            )),
            inferencer: RelationshipInferencer::new(
                Box::new(KeywordClassifier),
                config.extraction.clone(),
            ),
            claims: ClaimExtractor,
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn with_inferencer(mut self, inferencer: RelationshipInferencer) -> Self {
        self.inferencer = inferencer;
        self
    }

    /// Build a graph from markup.
    #[must_use]
    pub fn build_graph(&self, domain: &str, html: &str, source_url: &str) -> KnowledgeGraph {
        self.build_document(domain, html, DocumentFormat::Html, source_url)
    }

    #[must_use]
    pub fn build_document(
        &self,
        domain: &str,
        raw: &str,
        format: DocumentFormat,
        source_url: &str,
    ) -> KnowledgeGraph {
        let text = normalize_document(raw, format);
        let output = self.extractor.extract(&text, source_url);
        let relationships = self.inferencer.infer(&output);
        let sentences = output.sentences.clone();
        let entities = output.into_entities();
        let claims = self.claims.extract(&sentences, &entities);

        let graph = KnowledgeGraph::assemble(domain, source_url, entities, relationships, claims);
        tracing::debug!(
            domain,
            entities = graph.metadata.entity_count,
            relationships = graph.metadata.relationship_count,
            claims = graph.metadata.claim_count,
            "built graph"
        );
        graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

/// Build a graph from markup with the default configuration.
#[must_use]
pub fn build_graph(domain: &str, html: &str, source_url: &str) -> KnowledgeGraph {
    GraphBuilder::default().build_graph(domain, html, source_url)
}
