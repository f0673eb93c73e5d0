use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use log::{debug, error, warn};

use crate::{
    registry::{
        config::RegistryConfig,
        event::{InitStateChangedEvent, InitStateFilter},
        event_bus::{ActorEventBus, InitStateCallback, SubscriptionHandle},
        feature_record::FeatureRecord,
        gate::InitStateGate,
    },
    ActorId, FeatureKey, InitState, InitStateError,
};

// ActorData
struct ActorData<A> {
    features: Vec<FeatureRecord>,
    event_bus: ActorEventBus<A>,
}

impl<A> ActorData<A> {
    fn new() -> Self {
        Self {
            features: Vec::new(),
            event_bus: ActorEventBus::new(),
        }
    }

    fn record(&self, feature: FeatureKey) -> Option<&FeatureRecord> {
        self.features
            .iter()
            .find(|record| record.feature() == feature)
    }

    fn record_mut(&mut self, feature: FeatureKey) -> Option<&mut FeatureRecord> {
        self.features
            .iter_mut()
            .find(|record| record.feature() == feature)
    }

    fn is_empty(&self) -> bool {
        self.features.is_empty() && self.event_bus.is_empty()
    }
}

// RegistryData
struct RegistryData<A> {
    config: RegistryConfig,
    actors: HashMap<A, ActorData<A>>,
    next_subscription_id: u64,
}

impl<A: ActorId> RegistryData<A> {
    fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            actors: HashMap::new(),
            next_subscription_id: 0,
        }
    }

    fn feature_state(&self, actor: &A, feature: FeatureKey) -> Option<InitState> {
        self.actors
            .get(actor)?
            .record(feature)
            .map(|record| record.state())
    }

    fn remove_actor_if_empty(&mut self, actor: &A) {
        let is_empty = self
            .actors
            .get(actor)
            .map(|actor_data| actor_data.is_empty())
            .unwrap_or(false);
        if is_empty {
            self.actors.remove(actor);
        }
    }
}

/// Tracks the init state of every feature on every actor, commits
/// transitions, and notifies subscribers of each committed change.
///
/// Cloning yields another handle onto the same registry. No internal lock is
/// held while gates or subscriber callbacks run, so both may call back into
/// the registry.
#[derive(Clone)]
pub struct FeatureRegistry<A: ActorId> {
    data: Arc<RwLock<RegistryData<A>>>,
}

impl<A: ActorId> Default for FeatureRegistry<A> {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl<A: ActorId> FeatureRegistry<A> {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            data: Arc::new(RwLock::new(RegistryData::new(config))),
        }
    }

    fn read_data(&self) -> Result<RwLockReadGuard<'_, RegistryData<A>>, InitStateError> {
        self.data
            .read()
            .map_err(|_| InitStateError::RegistryLockPoisoned)
    }

    fn write_data(&self) -> Result<RwLockWriteGuard<'_, RegistryData<A>>, InitStateError> {
        self.data
            .write()
            .map_err(|_| InitStateError::RegistryLockPoisoned)
    }

    // Config

    pub fn config(&self) -> RegistryConfig {
        match self.read_data() {
            Ok(data) => data.config,
            Err(err) => {
                error!("{}", err);
                RegistryConfig::default()
            }
        }
    }

    pub fn is_game_world(&self) -> bool {
        self.config().is_game_world
    }

    /// Marks the owning world as running (or not). Existing records are kept.
    pub fn set_game_world(&self, is_game_world: bool) {
        match self.write_data() {
            Ok(mut data) => data.config.is_game_world = is_game_world,
            Err(err) => error!("{}", err),
        }
    }

    // Registration

    /// Register a feature on an actor, starting at [`InitState::Unset`]
    ///
    /// Returns whether a record was created. Registering outside of a game
    /// world is silently ignored; registering a feature twice logs a warning
    /// and keeps the existing record.
    pub fn register_feature(&self, actor: &A, feature: FeatureKey) -> bool {
        match self.try_register_feature(actor, feature) {
            Ok(()) => true,
            Err(err @ InitStateError::InvalidRegistrationContext { .. }) => {
                debug!("{}", err);
                false
            }
            Err(err) => {
                warn!("{}", err);
                false
            }
        }
    }

    /// Register a feature on an actor
    ///
    /// Returns an error if the registry is not a game world, the key is
    /// [`FeatureKey::NONE`], or the feature is already registered.
    pub fn try_register_feature(&self, actor: &A, feature: FeatureKey) -> Result<(), InitStateError> {
        let mut data = self.write_data()?;

        if !data.config.is_game_world {
            return Err(InitStateError::InvalidRegistrationContext {
                actor_id: format!("{:?}", actor),
            });
        }
        if feature.is_none() {
            return Err(InitStateError::InvalidFeatureKey {
                actor_id: format!("{:?}", actor),
            });
        }

        let actor_data = data.actors.entry(*actor).or_insert_with(ActorData::new);
        if actor_data.record(feature).is_some() {
            return Err(InitStateError::FeatureAlreadyRegistered {
                actor_id: format!("{:?}", actor),
                feature,
            });
        }
        actor_data.features.push(FeatureRecord::new(feature));

        debug!("Registered feature {} on actor {:?}", feature, actor);
        Ok(())
    }

    /// Remove a feature's record. Unknown features are ignored.
    pub fn unregister_feature(&self, actor: &A, feature: FeatureKey) {
        if let Err(err) = self.try_unregister_feature(actor, feature) {
            error!("{}", err);
        }
    }

    /// Remove a feature's record, returning whether one existed.
    pub fn try_unregister_feature(&self, actor: &A, feature: FeatureKey) -> Result<bool, InitStateError> {
        let mut data = self.write_data()?;

        let Some(actor_data) = data.actors.get_mut(actor) else {
            return Ok(false);
        };
        let Some(index) = actor_data
            .features
            .iter()
            .position(|record| record.feature() == feature)
        else {
            return Ok(false);
        };
        actor_data.features.remove(index);
        data.remove_actor_if_empty(actor);

        debug!("Unregistered feature {} from actor {:?}", feature, actor);
        Ok(true)
    }

    /// Drop every record and subscription of an actor that is going away.
    pub fn remove_actor(&self, actor: &A) {
        match self.write_data() {
            Ok(mut data) => {
                if data.actors.remove(actor).is_some() {
                    debug!("Removed all init state data for actor {:?}", actor);
                }
            }
            Err(err) => error!("{}", err),
        }
    }

    // Queries

    pub fn is_feature_registered(&self, actor: &A, feature: FeatureKey) -> bool {
        self.feature_init_state(actor, feature).is_some()
    }

    /// Current state of a registered feature, `None` when not registered.
    pub fn feature_init_state(&self, actor: &A, feature: FeatureKey) -> Option<InitState> {
        match self.read_data() {
            Ok(data) => data.feature_state(actor, feature),
            Err(err) => {
                error!("{}", err);
                None
            }
        }
    }

    /// Records of an actor in registration order.
    pub fn feature_records(&self, actor: &A) -> Vec<FeatureRecord> {
        match self.read_data() {
            Ok(data) => data
                .actors
                .get(actor)
                .map(|actor_data| actor_data.features.clone())
                .unwrap_or_default(),
            Err(err) => {
                error!("{}", err);
                Vec::new()
            }
        }
    }

    pub fn registered_features(&self, actor: &A) -> Vec<FeatureKey> {
        self.feature_records(actor)
            .iter()
            .map(|record| record.feature())
            .collect()
    }

    /// Whether every feature on `actor` is at `min_state` or further along the
    /// canonical chain. Vacuously true for an actor with no features.
    pub fn have_all_features_reached_init_state(&self, actor: &A, min_state: InitState) -> bool {
        self.have_all_features_reached_init_state_excluding(actor, min_state, FeatureKey::NONE)
    }

    /// Same as [`Self::have_all_features_reached_init_state`], ignoring the
    /// feature named `exclude`.
    pub fn have_all_features_reached_init_state_excluding(
        &self,
        actor: &A,
        min_state: InitState,
        exclude: FeatureKey,
    ) -> bool {
        let data = match self.read_data() {
            Ok(data) => data,
            Err(err) => {
                error!("{}", err);
                return false;
            }
        };
        let Some(actor_data) = data.actors.get(actor) else {
            return true;
        };
        let chain = data.config.canonical_chain;
        actor_data
            .features
            .iter()
            .filter(|record| record.feature() != exclude)
            .all(|record| chain.has_reached(record.state(), min_state))
    }

    // Transitions

    /// Move a feature to `desired` if `gate` admits it
    ///
    /// Returns whether the transition was committed. A rejecting gate is not an
    /// error and is not logged. Attempting a transition on a feature that was
    /// never registered is a caller bug: it panics in debug builds and is
    /// logged and ignored otherwise.
    pub fn change_feature_init_state<G: InitStateGate + ?Sized>(
        &self,
        actor: &A,
        feature: FeatureKey,
        desired: InitState,
        gate: &G,
    ) -> bool {
        match self.try_change_feature_init_state(actor, feature, desired, gate) {
            Ok(changed) => changed,
            Err(InitStateError::InvalidRegistrationContext { .. }) => false,
            Err(err @ InitStateError::FeatureNotRegistered { .. }) => {
                error!("{}", err);
                if cfg!(debug_assertions) {
                    panic!("{}", err);
                }
                false
            }
            Err(err) => {
                warn!("{}", err);
                false
            }
        }
    }

    /// Move a feature to `desired` if `gate` admits it
    ///
    /// The gate sees the state held before the transition. On success the new
    /// state is committed first, then the gate's `prepare` runs, then every
    /// matching subscriber is called in bind order, then `Ok(true)` is
    /// returned. On rejection nothing changes and nobody is notified.
    pub fn try_change_feature_init_state<G: InitStateGate + ?Sized>(
        &self,
        actor: &A,
        feature: FeatureKey,
        desired: InitState,
        gate: &G,
    ) -> Result<bool, InitStateError> {
        let (current, config) = {
            let data = self.read_data()?;
            if !data.config.is_game_world {
                return Err(InitStateError::InvalidRegistrationContext {
                    actor_id: format!("{:?}", actor),
                });
            }
            let current = data.feature_state(actor, feature).ok_or_else(|| {
                InitStateError::FeatureNotRegistered {
                    actor_id: format!("{:?}", actor),
                    feature,
                    operation: "change_feature_init_state",
                }
            })?;
            (current, data.config)
        };

        if current == desired {
            return Ok(false);
        }

        if config.enforce_sequential_transitions {
            let chain = config.canonical_chain;
            let current_in_chain = !current.is_valid() || chain.contains(current);
            if current_in_chain && chain.contains(desired) && !chain.is_next_step(current, desired) {
                return Err(InitStateError::NonSequentialTransition {
                    feature,
                    from: current,
                    to: desired,
                });
            }
        }

        if !gate.admits(current, desired) {
            return Ok(false);
        }

        let callbacks: Vec<InitStateCallback<A>> = {
            let mut data = self.write_data()?;
            let Some(actor_data) = data.actors.get_mut(actor) else {
                debug!(
                    "Feature {} on actor {:?} was unregistered while changing init state",
                    feature, actor
                );
                return Ok(false);
            };
            let Some(record) = actor_data.record_mut(feature) else {
                debug!(
                    "Feature {} on actor {:?} was unregistered while changing init state",
                    feature, actor
                );
                return Ok(false);
            };
            if record.state() != current {
                // Someone else moved this feature on while the gate ran
                return Ok(false);
            }
            record.set_state(desired);
            actor_data.event_bus.matching(feature, desired)
        };

        // Only a committed transition reaches the handler, so it runs exactly once
        gate.prepare(current, desired);

        debug!(
            "Feature {} on actor {:?} changed init state {} -> {}",
            feature, actor, current, desired
        );

        let event = InitStateChangedEvent::new(*actor, feature, desired);
        for callback in callbacks {
            callback(&event);
        }

        Ok(true)
    }

    // Subscriptions

    /// Call `callback` for every future committed change on `actor` matching
    /// `filter`
    ///
    /// With `call_if_reached`, the callback is also invoked right away for each
    /// registered feature that matches the filter's feature and has already
    /// reached the filter's state (any valid state when the filter has none).
    pub fn bind_on_actor_init_state_changed<F>(
        &self,
        actor: &A,
        filter: InitStateFilter,
        call_if_reached: bool,
        callback: F,
    ) -> SubscriptionHandle
    where
        F: Fn(&InitStateChangedEvent<A>) + Send + Sync + 'static,
    {
        match self.try_bind_on_actor_init_state_changed(actor, filter, call_if_reached, callback) {
            Ok(handle) => handle,
            Err(err) => {
                error!("{}", err);
                SubscriptionHandle::new(u64::MAX)
            }
        }
    }

    pub fn try_bind_on_actor_init_state_changed<F>(
        &self,
        actor: &A,
        filter: InitStateFilter,
        call_if_reached: bool,
        callback: F,
    ) -> Result<SubscriptionHandle, InitStateError>
    where
        F: Fn(&InitStateChangedEvent<A>) + Send + Sync + 'static,
    {
        let callback: InitStateCallback<A> = Arc::new(callback);

        let (handle, reached) = {
            let mut data = self.write_data()?;

            let handle = SubscriptionHandle::new(data.next_subscription_id);
            data.next_subscription_id += 1;

            let chain = data.config.canonical_chain;
            let actor_data = data.actors.entry(*actor).or_insert_with(ActorData::new);
            actor_data.event_bus.bind(handle, filter, callback.clone());

            let reached: Vec<FeatureRecord> = if call_if_reached {
                actor_data
                    .features
                    .iter()
                    .filter(|record| {
                        if let Some(filter_feature) = filter.feature {
                            if filter_feature != record.feature() {
                                return false;
                            }
                        }
                        match filter.state {
                            Some(filter_state) => chain.has_reached(record.state(), filter_state),
                            None => record.state().is_valid(),
                        }
                    })
                    .copied()
                    .collect()
            } else {
                Vec::new()
            };

            (handle, reached)
        };

        for record in reached {
            callback(&InitStateChangedEvent::new(*actor, record.feature(), record.state()));
        }

        Ok(handle)
    }

    /// Returns whether the subscription existed. Safe to call from within a
    /// callback; an in-flight broadcast still finishes its snapshot.
    pub fn unbind_on_actor_init_state_changed(&self, actor: &A, handle: SubscriptionHandle) -> bool {
        let mut data = match self.write_data() {
            Ok(data) => data,
            Err(err) => {
                error!("{}", err);
                return false;
            }
        };
        let Some(actor_data) = data.actors.get_mut(actor) else {
            return false;
        };
        let removed = actor_data.event_bus.unbind(&handle);
        data.remove_actor_if_empty(actor);
        removed
    }

    pub fn subscriber_count(&self, actor: &A) -> usize {
        match self.read_data() {
            Ok(data) => data
                .actors
                .get(actor)
                .map(|actor_data| actor_data.event_bus.len())
                .unwrap_or(0),
            Err(err) => {
                error!("{}", err);
                0
            }
        }
    }
}
