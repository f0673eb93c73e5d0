use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::info;

use initstate_shared::{
    DefaultInitialization, FeatureKey, FeatureRegistry, InitState, InitStateChain,
    InitStateChangedEvent, InitStateFeature,
};

use crate::world::Entity;

pub const EQUIPMENT_FEATURE: FeatureKey = FeatureKey::new("Equipment");

/// Loads a loadout for its character; data is available once the loadout arrives
pub struct Equipment {
    entity: Entity,
    registry: FeatureRegistry<Entity>,
    loadout_loaded: AtomicBool,
}

impl Equipment {
    pub fn new(entity: Entity, registry: &FeatureRegistry<Entity>) -> Arc<Self> {
        Arc::new(Self {
            entity,
            registry: registry.clone(),
            loadout_loaded: AtomicBool::new(false),
        })
    }

    pub fn receive_loadout(&self) {
        info!("Equipment loadout arrived for {:?}", self.entity);
        self.loadout_loaded.store(true, Ordering::SeqCst);
        self.check_default_initialization();
    }
}

impl DefaultInitialization for Equipment {
    fn check_default_initialization(&self) {
        self.continue_init_state_chain(&InitStateChain::DEFAULT);
    }
}

impl InitStateFeature<Entity> for Equipment {
    fn feature_key(&self) -> FeatureKey {
        EQUIPMENT_FEATURE
    }

    fn actor(&self) -> Entity {
        self.entity
    }

    fn registry(&self) -> &FeatureRegistry<Entity> {
        &self.registry
    }

    fn can_change_init_state(&self, current: InitState, desired: InitState) -> bool {
        match (current, desired) {
            (InitState::Unset, InitState::Spawned) => true,
            (InitState::Spawned, InitState::DataAvailable) => {
                self.loadout_loaded.load(Ordering::SeqCst)
            }
            (InitState::DataAvailable, InitState::DataInitialized) => {
                self.have_all_features_reached_init_state(InitState::DataAvailable)
            }
            (InitState::DataInitialized, InitState::GameplayReady) => true,
            _ => false,
        }
    }

    fn handle_change_init_state(&self, _current: InitState, desired: InitState) {
        if desired == InitState::DataInitialized {
            info!("Equipping loadout on {:?}", self.entity);
        }
    }

    fn on_actor_init_state_changed(&self, event: &InitStateChangedEvent<Entity>) {
        if event.feature != EQUIPMENT_FEATURE && event.state == InitState::DataAvailable {
            self.check_default_initialization();
        }
    }
}
