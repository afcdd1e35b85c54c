use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot merge an empty list of graphs")]
    EmptyInput,

    #[error("Domain mismatch: expected {expected}, found {found}")]
    DomainMismatch { expected: String, found: String },

    #[error("Self-referential relationship not allowed")]
    SelfReference,

    #[error("Invalid entity type: {0}")]
    InvalidEntityType(String),

    #[error("Invalid relationship type: {0}")]
    InvalidRelationshipType(String),

    #[error("Invalid evidence type: {0}")]
    InvalidEvidenceType(String),

    #[error("Invalid network effect type: {0}")]
    InvalidEffectType(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
