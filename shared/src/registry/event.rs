use crate::{FeatureKey, InitState};

/// Broadcast to subscribers after a feature's new state has been committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitStateChangedEvent<A> {
    pub actor: A,
    pub feature: FeatureKey,
    pub state: InitState,
}

impl<A> InitStateChangedEvent<A> {
    pub fn new(actor: A, feature: FeatureKey, state: InitState) -> Self {
        Self {
            actor,
            feature,
            state,
        }
    }
}

/// Selects which events a subscriber hears about. `None` matches anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InitStateFilter {
    pub feature: Option<FeatureKey>,
    pub state: Option<InitState>,
}

impl InitStateFilter {
    pub const ANY: InitStateFilter = InitStateFilter {
        feature: None,
        state: None,
    };

    pub fn feature(feature: FeatureKey) -> Self {
        Self {
            feature: Some(feature),
            state: None,
        }
    }

    pub fn state(state: InitState) -> Self {
        Self {
            feature: None,
            state: Some(state),
        }
    }

    pub fn with_state(mut self, state: InitState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn matches(&self, feature: FeatureKey, state: InitState) -> bool {
        if let Some(filter_feature) = self.feature {
            if filter_feature != feature {
                return false;
            }
        }
        if let Some(filter_state) = self.state {
            if filter_state != state {
                return false;
            }
        }
        true
    }
}
