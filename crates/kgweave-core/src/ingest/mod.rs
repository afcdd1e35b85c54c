mod claims;
mod extractor;
mod normalizer;
mod pipeline;
mod relationships;

pub use claims::ClaimExtractor;
pub use extractor::{
    known_homepage, split_sentences, ConceptMatcher, EntityMatcher, ExtractedEntity,
    ExtractionOutput, Extractor, MetricMatcher, OrganizationMatcher, PatternMatch,
    PersonMatcher, ProductMatcher, RuleBasedExtractor, TextSpan,
};
pub use normalizer::{collapse_whitespace, normalize_document, normalize_markup, DocumentFormat};
pub use pipeline::{build_graph, GraphBuilder};
pub use relationships::{
    relationship_confidence, Classification, KeywordClassifier, RelationshipClassifier,
    RelationshipInferencer,
};
