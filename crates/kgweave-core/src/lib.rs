#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod claim;
pub mod config;
pub mod entity;
pub mod error;
pub mod export;
pub mod graph;
pub mod ingest;
pub mod merge;
pub mod network;
pub mod quality;
pub mod relationship;

pub use claim::{Claim, Evidence, EvidenceType, Temporal};
pub use config::{ExtractionConfig, PipelineConfig};
pub use entity::{Entity, EntityData, EntityType, MetricData};
pub use error::{Error, Result};
pub use export::to_json_ld;
pub use graph::{GraphMetadata, KnowledgeGraph};
pub use ingest::{build_graph, DocumentFormat, GraphBuilder};
pub use merge::merge_graphs;
pub use network::{
    apply_network_effects, BoostConfig, Citation, EffectType, GlobalEntity, GlobalRegistry,
    GlobalRelationship, NetworkEffect,
};
pub use quality::quality_score;
pub use relationship::{RelationType, Relationship};
