mod apply;
mod config;
mod effects;
mod registry;

pub use apply::apply_network_effects;
pub use config::{Boost, BoostConfig};
pub use effects::{citation_mentions, Citation, EffectType, NetworkEffect};
pub use registry::{
    global_claim_id, global_entity_id, global_relationship_id, normalize_name, EntityVariant,
    GlobalClaim, GlobalEntity, GlobalRegistry, GlobalRelationship, RegistryStats,
};
