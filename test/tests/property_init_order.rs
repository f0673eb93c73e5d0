/// Property tests: whatever order triggers arrive in, features on one actor
/// only ever step forward, never initialize before every peer has its data,
/// and all end up gameplay ready once every condition holds.
use std::sync::Arc;

use proptest::prelude::*;

use initstate_pawn::{PawnInitialization, PAWN_INITIALIZATION_FEATURE};
use initstate_shared::{
    DefaultInitialization, FeatureKey, FeatureRegistry, InitState, InitStateChain,
    InitStateFilter,
};
use initstate_test::{assert_sequential, EventRecorder, TestActor, TestFeature, TestPawn};

const PEER_KEYS: [FeatureKey; 3] = [
    FeatureKey::new("Equipment"),
    FeatureKey::new("Abilities"),
    FeatureKey::new("Camera"),
];

#[derive(Clone, Copy, Debug)]
enum Trigger {
    Possess,
    PlayerStateReplicated,
    PeerDataReady(usize),
    PeerCheck(usize),
}

fn trigger_strategy() -> impl Strategy<Value = Trigger> {
    prop_oneof![
        Just(Trigger::Possess),
        Just(Trigger::PlayerStateReplicated),
        (0usize..PEER_KEYS.len()).prop_map(Trigger::PeerDataReady),
        (0usize..PEER_KEYS.len()).prop_map(Trigger::PeerCheck),
    ]
}

struct Scenario {
    registry: FeatureRegistry<TestActor>,
    pawn: Arc<TestPawn>,
    pawn_feature: Arc<PawnInitialization<TestActor, TestPawn>>,
    peers: Vec<Arc<TestFeature>>,
    recorder: EventRecorder,
}

impl Scenario {
    fn new(has_authority: bool, peer_count: usize) -> Self {
        let registry = FeatureRegistry::default();
        let pawn = if has_authority {
            TestPawn::with_authority(1)
        } else {
            TestPawn::new(1)
        };
        let actor = pawn.test_actor();
        let recorder = EventRecorder::new();
        recorder.bind(&registry, actor, InitStateFilter::ANY);

        let pawn_feature = PawnInitialization::new(&pawn, registry.clone());
        let peers: Vec<Arc<TestFeature>> = PEER_KEYS[..peer_count]
            .iter()
            .map(|key| TestFeature::waiting(*key, actor, &registry))
            .collect();

        pawn_feature.on_register();
        for peer in &peers {
            peer.attach_and_begin_play();
        }
        pawn_feature.begin_play();

        Self {
            registry,
            pawn,
            pawn_feature,
            peers,
            recorder,
        }
    }

    fn apply(&self, trigger: Trigger) {
        match trigger {
            Trigger::Possess => {
                self.pawn.set_controller(true);
                self.pawn_feature.handle_controller_changed();
            }
            Trigger::PlayerStateReplicated => self.pawn_feature.handle_player_state_replicated(),
            Trigger::PeerDataReady(index) => {
                if let Some(peer) = self.peers.get(index) {
                    peer.set_data_ready(true);
                    peer.check_default_initialization();
                }
            }
            Trigger::PeerCheck(index) => {
                if let Some(peer) = self.peers.get(index) {
                    peer.check_default_initialization();
                }
            }
        }
    }

    fn keys(&self) -> Vec<FeatureKey> {
        let mut keys = vec![PAWN_INITIALIZATION_FEATURE];
        keys.extend(PEER_KEYS[..self.peers.len()].iter().copied());
        keys
    }

    fn state_of(&self, feature: FeatureKey) -> InitState {
        self.registry
            .feature_init_state(&self.pawn.test_actor(), feature)
            .unwrap_or(InitState::Unset)
    }
}

proptest! {
    #[test]
    fn prop_broadcasts_step_forward_one_state_at_a_time(
        has_authority in any::<bool>(),
        peer_count in 0usize..=PEER_KEYS.len(),
        triggers in prop::collection::vec(trigger_strategy(), 0..24),
    ) {
        let scenario = Scenario::new(has_authority, peer_count);
        for trigger in triggers {
            scenario.apply(trigger);
        }

        for feature in scenario.keys() {
            assert_sequential!(InitStateChain::DEFAULT, scenario.recorder.states_of(feature));
        }
    }

    #[test]
    fn prop_nobody_initializes_before_all_data_is_available(
        has_authority in any::<bool>(),
        peer_count in 0usize..=PEER_KEYS.len(),
        triggers in prop::collection::vec(trigger_strategy(), 0..24),
    ) {
        let scenario = Scenario::new(has_authority, peer_count);
        let chain = InitStateChain::DEFAULT;
        let actor = scenario.pawn.test_actor();

        for trigger in triggers {
            scenario.apply(trigger);

            let any_initialized = scenario
                .keys()
                .into_iter()
                .any(|feature| chain.has_reached(scenario.state_of(feature), InitState::DataInitialized));
            if any_initialized {
                prop_assert!(scenario
                    .registry
                    .have_all_features_reached_init_state(&actor, InitState::DataAvailable));
            }
        }
    }

    #[test]
    fn prop_everything_converges_once_conditions_hold(
        has_authority in any::<bool>(),
        peer_count in 0usize..=PEER_KEYS.len(),
        triggers in prop::collection::vec(trigger_strategy(), 0..16),
    ) {
        let scenario = Scenario::new(has_authority, peer_count);
        for trigger in triggers {
            scenario.apply(trigger);
        }

        // every remaining condition, each followed only by its own trigger
        scenario.apply(Trigger::Possess);
        for index in 0..scenario.peers.len() {
            scenario.apply(Trigger::PeerDataReady(index));
        }

        for feature in scenario.keys() {
            prop_assert_eq!(scenario.state_of(feature), InitState::GameplayReady);
        }
        prop_assert!(scenario
            .registry
            .have_all_features_reached_init_state(&scenario.pawn.test_actor(), InitState::GameplayReady));
    }
}
