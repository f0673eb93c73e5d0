use std::default::Default;

use crate::InitStateChain;

/// Contains Config properties which will be used by a
/// [`FeatureRegistry`](crate::FeatureRegistry)
#[derive(Clone, Copy, Debug)]
pub struct RegistryConfig {
    /// Whether the registry belongs to a running game world. Features can only
    /// register and advance while this is set; outside of a game world (an
    /// editor preview, a loading world) every attempt is silently ignored.
    pub is_game_world: bool,
    /// Chain every feature's state is measured against when asking whether all
    /// features on an actor have reached some state.
    pub canonical_chain: InitStateChain,
    /// Reject transitions that skip or reverse a step of `canonical_chain`
    /// before the feature's gate is ever consulted.
    pub enforce_sequential_transitions: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            is_game_world: true,
            canonical_chain: InitStateChain::DEFAULT,
            enforce_sequential_transitions: true,
        }
    }
}
