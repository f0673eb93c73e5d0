//! # Initstate Pawn
//! Pawn initialization feature: walks a pawn through
//! Spawned → DataAvailable → DataInitialized → GameplayReady once it is
//! possessed and every sibling feature on the pawn has its data available.

#![deny(trivial_casts, trivial_numeric_casts, unstable_features, unused_import_braces)]

mod config;
mod pawn_host;
mod pawn_initialization;

pub use config::{PawnInitializationConfig, PAWN_INITIALIZATION_FEATURE};
pub use pawn_host::PawnHost;
pub use pawn_initialization::PawnInitialization;

pub mod shared {
    pub use initstate_shared::{
        ActorId, DefaultInitialization, FeatureKey, FeatureRegistry, InitState, InitStateChain,
        InitStateChangedEvent, InitStateFeature, InitStateFilter, RegistryConfig,
    };
}
