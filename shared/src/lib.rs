//! # Initstate Shared
//! Per-actor feature init-state protocol shared by every initstate feature:
//! state chains, the feature registry, change notifications, and the
//! [`InitStateFeature`] trait that ties them together.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod actor_id;
mod error;
mod feature;
mod feature_key;
mod init_state;
mod registry;

pub use actor_id::ActorId;
pub use error::InitStateError;
pub use feature::{
    chain_advancer::continue_init_state_chain,
    init_state_feature::{DefaultInitialization, InitStateFeature},
    notification_bridge::{bind_init_state_notifications, unbind_init_state_notifications},
};
pub use feature_key::FeatureKey;
pub use init_state::{InitState, InitStateChain};
pub use registry::{
    config::RegistryConfig,
    event::{InitStateChangedEvent, InitStateFilter},
    event_bus::{InitStateCallback, SubscriptionHandle},
    feature_record::FeatureRecord,
    feature_registry::FeatureRegistry,
    gate::InitStateGate,
};
