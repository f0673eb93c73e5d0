use thiserror::Error as ThisError;

use crate::{FeatureKey, InitState};

/// Errors raised by the [`FeatureRegistry`](crate::FeatureRegistry)
///
/// None of these are fatal. The plain (non-`try_`) registry methods log them
/// and carry on; the `try_` variants hand them back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum InitStateError {
    /// The registry does not belong to a running game world
    #[error("Cannot register or advance features on actor {actor_id} outside of a game world")]
    InvalidRegistrationContext { actor_id: String },

    /// A feature was registered without a name
    #[error("Feature on actor {actor_id} was registered without a feature name")]
    InvalidFeatureKey { actor_id: String },

    /// The actor already carries a record for this feature
    #[error("Feature {feature} is already registered on actor {actor_id}")]
    FeatureAlreadyRegistered {
        actor_id: String,
        feature: FeatureKey,
    },

    /// Operation requires a registered feature
    #[error("Feature {feature} is not registered on actor {actor_id} - operation '{operation}' requires registration")]
    FeatureNotRegistered {
        actor_id: String,
        feature: FeatureKey,
        operation: &'static str,
    },

    /// Transition would skip or reverse a step of the canonical chain
    #[error("Invalid init state transition for feature {feature}: {from} -> {to}")]
    NonSequentialTransition {
        feature: FeatureKey,
        from: InitState,
        to: InitState,
    },

    /// Registry lock is poisoned (a panic occurred while it was held)
    #[error("Feature registry lock is poisoned - this indicates a panic occurred while holding the lock")]
    RegistryLockPoisoned,
}
