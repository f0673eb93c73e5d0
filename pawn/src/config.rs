use std::default::Default;

use initstate_shared::FeatureKey;

pub const PAWN_INITIALIZATION_FEATURE: FeatureKey = FeatureKey::new("PawnInitialization");

/// Contains Config properties which will be used by a
/// [`PawnInitialization`](crate::PawnInitialization) feature
#[derive(Clone, Copy, Debug)]
pub struct PawnInitializationConfig {
    /// Name the feature registers under. Peers filter self-notifications by
    /// it, so it must be unique per actor.
    pub feature_key: FeatureKey,
}

impl Default for PawnInitializationConfig {
    fn default() -> Self {
        Self {
            feature_key: PAWN_INITIALIZATION_FEATURE,
        }
    }
}
