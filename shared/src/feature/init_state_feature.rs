use std::marker::PhantomData;

use log::warn;

use crate::{
    feature::chain_advancer::continue_init_state_chain, ActorId, FeatureKey, FeatureRegistry,
    InitState, InitStateChain, InitStateChangedEvent, InitStateError, InitStateGate,
};

/// Anything that can be asked to push its initialization as far as it
/// currently can. Object safe, so composed features can hold their
/// dependents as `Weak<dyn DefaultInitialization>`.
pub trait DefaultInitialization: Send + Sync {
    fn check_default_initialization(&self);
}

/// A unit of per-actor functionality taking part in the init state protocol.
///
/// Implementors supply their identity, their gate and
/// [`DefaultInitialization::check_default_initialization`]; registration,
/// transitions and chain walking come for free.
pub trait InitStateFeature<A: ActorId>: DefaultInitialization {
    fn feature_key(&self) -> FeatureKey;

    fn actor(&self) -> A;

    fn registry(&self) -> &FeatureRegistry<A>;

    /// Gate for `current → desired`, evaluated against the pre-transition state
    fn can_change_init_state(&self, current: InitState, desired: InitState) -> bool;

    /// Runs once per committed transition, before peers are notified
    fn handle_change_init_state(&self, _current: InitState, _desired: InitState) {}

    /// Called for every change event the feature has been bound to
    fn on_actor_init_state_changed(&self, _event: &InitStateChangedEvent<A>) {}

    /// Gives features this one depends on a chance to advance first
    fn check_default_initialization_for_implementers(&self) {}

    fn register_init_state_feature(&self) -> bool {
        self.registry()
            .register_feature(&self.actor(), self.feature_key())
    }

    fn unregister_init_state_feature(&self) {
        self.registry()
            .unregister_feature(&self.actor(), self.feature_key());
    }

    /// Current state, [`InitState::Unset`] when not registered
    fn init_state(&self) -> InitState {
        self.registry()
            .feature_init_state(&self.actor(), self.feature_key())
            .unwrap_or(InitState::Unset)
    }

    fn has_reached_init_state(&self, state: InitState) -> bool {
        self.registry()
            .config()
            .canonical_chain
            .has_reached(self.init_state(), state)
    }

    fn have_all_features_reached_init_state(&self, min_state: InitState) -> bool {
        self.registry()
            .have_all_features_reached_init_state(&self.actor(), min_state)
    }

    /// Attempt a single transition through this feature's own gate
    ///
    /// A feature without a record (registered outside of a game world, or
    /// already unregistered) quietly stays where it is; triggers may arrive at
    /// any point of the feature's lifetime.
    fn try_to_change_init_state(&self, desired: InitState) -> bool {
        let gate = FeatureGate::<A, Self>::new(self);
        match self.registry().try_change_feature_init_state(
            &self.actor(),
            self.feature_key(),
            desired,
            &gate,
        ) {
            Ok(changed) => changed,
            Err(InitStateError::InvalidRegistrationContext { .. })
            | Err(InitStateError::FeatureNotRegistered { .. }) => false,
            Err(err) => {
                warn!("{}", err);
                false
            }
        }
    }

    /// Advance along `chain` as far as the gate allows, returning where the
    /// feature ended up
    fn continue_init_state_chain(&self, chain: &InitStateChain) -> InitState {
        continue_init_state_chain::<A, Self>(self, chain)
    }
}

// FeatureGate
/// Routes the registry's gate calls back to the feature.
struct FeatureGate<'a, A, F: ?Sized> {
    feature: &'a F,
    phantom_a: PhantomData<A>,
}

impl<'a, A, F: ?Sized> FeatureGate<'a, A, F> {
    fn new(feature: &'a F) -> Self {
        Self {
            feature,
            phantom_a: PhantomData,
        }
    }
}

impl<'a, A: ActorId, F: InitStateFeature<A> + ?Sized> InitStateGate for FeatureGate<'a, A, F> {
    fn admits(&self, current: InitState, desired: InitState) -> bool {
        self.feature.can_change_init_state(current, desired)
    }

    fn prepare(&self, current: InitState, desired: InitState) {
        self.feature.handle_change_init_state(current, desired);
    }
}
