use std::sync::Arc;

use log::info;

use initstate_pawn::PawnInitialization;
use initstate_shared::{
    bind_init_state_notifications, unbind_init_state_notifications, FeatureRegistry, InitState,
    InitStateFeature, InitStateFilter, SubscriptionHandle,
};

use crate::{
    equipment::Equipment,
    world::{Character, Entity},
};

const LAST_TICK: u32 = 8;

/// Spawns one character and replays the events a server would see for it,
/// one per tick, until everything on it is gameplay ready.
pub struct App {
    registry: FeatureRegistry<Entity>,
    character: Arc<Character>,
    pawn: Arc<PawnInitialization<Entity, Character>>,
    equipment: Arc<Equipment>,
    equipment_subscription: Option<SubscriptionHandle>,
    tick: u32,
}

impl App {
    pub fn default() -> Self {
        info!("Basic init state demo started");

        let registry = FeatureRegistry::default();
        let entity = Entity::new(1);

        registry.bind_on_actor_init_state_changed(
            &entity,
            InitStateFilter::ANY,
            false,
            |event| info!("{:?}: {} -> {}", event.actor, event.feature, event.state),
        );

        let character = Character::spawn(entity);
        let pawn = PawnInitialization::new(&character, registry.clone());
        let equipment = Equipment::new(entity, &registry);

        Self {
            registry,
            character,
            pawn,
            equipment,
            equipment_subscription: None,
            tick: 0,
        }
    }

    pub fn update(&mut self) {
        match self.tick {
            0 => {
                info!("Spawning character");
                self.pawn.on_register();
                self.equipment.register_init_state_feature();
            }
            1 => {
                let handle = bind_init_state_notifications::<Entity, Equipment>(
                    &self.equipment,
                    InitStateFilter::ANY,
                    false,
                );
                self.equipment_subscription = Some(handle);
                self.equipment.try_to_change_init_state(InitState::Spawned);
                self.pawn.begin_play();
            }
            3 => {
                info!("Server possesses the character");
                self.character.possess();
                self.pawn.handle_controller_changed();
            }
            5 => self.equipment.receive_loadout(),
            _ => {}
        }

        if self.tick == LAST_TICK {
            info!(
                "Character ready: {}",
                self.registry.have_all_features_reached_init_state(
                    &self.character_entity(),
                    InitState::GameplayReady
                )
            );
            self.despawn();
        }
        self.tick += 1;
    }

    fn despawn(&mut self) {
        info!("Despawning character");
        if let Some(handle) = self.equipment_subscription.take() {
            unbind_init_state_notifications::<Entity, Equipment>(self.equipment.as_ref(), handle);
        }
        self.equipment.unregister_init_state_feature();
        self.pawn.end_play();
    }

    pub fn is_finished(&self) -> bool {
        self.tick > LAST_TICK
    }

    fn character_entity(&self) -> Entity {
        self.pawn.actor()
    }
}
