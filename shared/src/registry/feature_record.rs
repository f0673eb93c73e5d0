use crate::{FeatureKey, InitState};

/// One feature's entry on an actor. Only the registry mutates `state`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureRecord {
    feature: FeatureKey,
    state: InitState,
}

impl FeatureRecord {
    pub(crate) fn new(feature: FeatureKey) -> Self {
        Self {
            feature,
            state: InitState::Unset,
        }
    }

    pub fn feature(&self) -> FeatureKey {
        self.feature
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: InitState) {
        self.state = state;
    }
}
