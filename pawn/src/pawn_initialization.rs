use std::sync::{Arc, Mutex, RwLock, Weak};

use log::{error, warn};

use initstate_shared::{
    bind_init_state_notifications, unbind_init_state_notifications, ActorId,
    DefaultInitialization, FeatureKey, FeatureRegistry, InitState, InitStateChain,
    InitStateChangedEvent, InitStateError, InitStateFeature, InitStateFilter,
    SubscriptionHandle,
};

use crate::{config::PawnInitializationConfig, pawn_host::PawnHost};

/// Drives a pawn from spawn to gameplay-ready.
///
/// The pawn becomes `DataAvailable` once it is possessed (when it has
/// authority or is locally controlled), `DataInitialized` once every other
/// feature on the pawn has its data available, and `GameplayReady` right
/// after. Other features listen for these transitions to run their own setup.
///
/// Owned by its actor through an `Arc`; it only keeps a `Weak` to the host.
pub struct PawnInitialization<A: ActorId, H: PawnHost<A>> {
    config: PawnInitializationConfig,
    actor: A,
    host: Weak<H>,
    registry: FeatureRegistry<A>,
    subscription: Mutex<Option<SubscriptionHandle>>,
    dependents: RwLock<Vec<Weak<dyn DefaultInitialization>>>,
}

impl<A: ActorId, H: PawnHost<A> + 'static> PawnInitialization<A, H> {
    /// Every state this feature walks through, in order
    pub const STATE_CHAIN: InitStateChain = InitStateChain::DEFAULT;

    pub fn new(host: &Arc<H>, registry: FeatureRegistry<A>) -> Arc<Self> {
        Self::with_config(host, registry, PawnInitializationConfig::default())
    }

    pub fn with_config(
        host: &Arc<H>,
        registry: FeatureRegistry<A>,
        config: PawnInitializationConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            actor: host.actor(),
            host: Arc::downgrade(host),
            registry,
            subscription: Mutex::new(None),
            dependents: RwLock::new(Vec::new()),
        })
    }

    pub fn host(&self) -> Option<Arc<H>> {
        self.host.upgrade()
    }

    pub fn is_bound(&self) -> bool {
        match self.subscription.lock() {
            Ok(subscription) => subscription.is_some(),
            Err(_) => false,
        }
    }

    /// Another feature to advance before this one on every check, e.g. a
    /// feature whose data this pawn waits for
    pub fn add_dependent<D: DefaultInitialization + 'static>(&self, dependent: &Arc<D>) {
        let dependent: Weak<D> = Arc::downgrade(dependent);
        let dependent: Weak<dyn DefaultInitialization> = dependent;
        match self.dependents.write() {
            Ok(mut dependents) => dependents.push(dependent),
            Err(_) => error!("PawnInitialization dependents lock is poisoned"),
        }
    }

    // Host lifecycle

    /// The feature was attached to its actor
    ///
    /// Registers with the registry early; outside of a game world this
    /// silently does nothing.
    pub fn on_register(&self) {
        let is_pawn = self.host().map(|host| host.is_pawn()).unwrap_or(false);
        if !is_pawn {
            error!(
                "PawnInitialization on [{:?}] can only be added to Pawn actors.",
                self.actor
            );
        }

        match self
            .registry
            .try_register_feature(&self.actor, self.config.feature_key)
        {
            Ok(()) => {}
            Err(InitStateError::InvalidRegistrationContext { .. }) => {}
            Err(InitStateError::FeatureAlreadyRegistered { .. }) => {
                error!(
                    "Only one {} should exist on [{:?}].",
                    self.config.feature_key, self.actor
                );
            }
            Err(err) => warn!("{}", err),
        }
    }

    /// The actor became active
    ///
    /// Listens to every feature on the actor, reports the spawn, then pushes
    /// initialization as far as it can go.
    pub fn begin_play(self: &Arc<Self>) {
        let handle = bind_init_state_notifications::<A, Self>(self, InitStateFilter::ANY, false);
        let previous = match self.subscription.lock() {
            Ok(mut subscription) => subscription.replace(handle),
            Err(_) => {
                error!("PawnInitialization subscription lock is poisoned");
                None
            }
        };
        if let Some(previous) = previous {
            unbind_init_state_notifications::<A, Self>(self, previous);
        }

        // Notifies the registry that we have spawned, unless an earlier begin_play already did
        if self.init_state() == InitState::Unset
            && !self.try_to_change_init_state(InitState::Spawned)
            && self
                .registry
                .is_feature_registered(&self.actor, self.config.feature_key)
        {
            warn!(
                "PawnInitialization on [{:?}] could not enter {}",
                self.actor,
                InitState::Spawned
            );
        }

        self.check_default_initialization();
    }

    /// The actor is being torn down
    pub fn end_play(&self) {
        let handle = match self.subscription.lock() {
            Ok(mut subscription) => subscription.take(),
            Err(_) => {
                error!("PawnInitialization subscription lock is poisoned");
                None
            }
        };
        if let Some(handle) = handle {
            unbind_init_state_notifications::<A, Self>(self, handle);
        }

        self.unregister_init_state_feature();
    }

    /// The pawn was possessed or unpossessed
    pub fn handle_controller_changed(&self) {
        self.check_default_initialization();
    }

    /// The owning player's replicated state arrived
    pub fn handle_player_state_replicated(&self) {
        self.check_default_initialization();
    }

    /// Player input was bound for the pawn
    pub fn setup_player_input(&self) {
        self.check_default_initialization();
    }
}

impl<A: ActorId, H: PawnHost<A> + 'static> DefaultInitialization for PawnInitialization<A, H> {
    fn check_default_initialization(&self) {
        // Before checking our progress, try progressing any other features we might depend on
        self.check_default_initialization_for_implementers();

        self.continue_init_state_chain(&Self::STATE_CHAIN);
    }
}

impl<A: ActorId, H: PawnHost<A> + 'static> InitStateFeature<A> for PawnInitialization<A, H> {
    fn feature_key(&self) -> FeatureKey {
        self.config.feature_key
    }

    fn actor(&self) -> A {
        self.actor
    }

    fn registry(&self) -> &FeatureRegistry<A> {
        &self.registry
    }

    fn can_change_init_state(&self, current: InitState, desired: InitState) -> bool {
        let host = self.host();

        match (current, desired) {
            (InitState::Unset, InitState::Spawned) => {
                // As long as we are on a valid pawn, we count as spawned
                host.map(|host| host.is_pawn()).unwrap_or(false)
            }
            (InitState::Spawned, InitState::DataAvailable) => {
                let Some(host) = host else {
                    return false;
                };
                if host.has_authority() || host.is_locally_controlled() {
                    // Wait to be possessed by a controller
                    return host.has_controller();
                }
                true
            }
            (InitState::DataAvailable, InitState::DataInitialized) => {
                self.have_all_features_reached_init_state(InitState::DataAvailable)
            }
            (InitState::DataInitialized, InitState::GameplayReady) => true,
            _ => false,
        }
    }

    fn on_actor_init_state_changed(&self, event: &InitStateChangedEvent<A>) {
        // If another feature now has its data available, we may be able to initialize
        if event.feature != self.feature_key() && event.state == InitState::DataAvailable {
            self.check_default_initialization();
        }
    }

    fn check_default_initialization_for_implementers(&self) {
        let dependents: Vec<Weak<dyn DefaultInitialization>> = match self.dependents.read() {
            Ok(dependents) => dependents.clone(),
            Err(_) => {
                error!("PawnInitialization dependents lock is poisoned");
                return;
            }
        };
        for dependent in dependents {
            if let Some(dependent) = dependent.upgrade() {
                dependent.check_default_initialization();
            }
        }
    }
}
