use initstate_pawn::{PawnInitialization, PAWN_INITIALIZATION_FEATURE};
use initstate_shared::{
    DefaultInitialization, FeatureKey, FeatureRegistry, InitState, InitStateChain,
    InitStateFeature, InitStateFilter,
};
use initstate_test::{
    assert_init_state, assert_sequential, init_logger, EventRecorder, TestActor, TestFeature,
    TestPawn,
};

const EQUIPMENT: FeatureKey = FeatureKey::new("Equipment");
const ABILITIES: FeatureKey = FeatureKey::new("Abilities");

/// Feature A needs no controller, the pawn feature (B) does. A stalls at
/// DataAvailable until B catches up, then both finish on B's trigger alone.
#[test]
fn controller_gated_peer_holds_back_data_initialized() {
    init_logger();
    let registry: FeatureRegistry<TestActor> = FeatureRegistry::default();
    let pawn = TestPawn::with_authority(1);
    let actor = pawn.test_actor();
    let recorder = EventRecorder::new();
    recorder.bind(&registry, actor, InitStateFilter::ANY);

    let feature_a = TestFeature::new(EQUIPMENT, actor, &registry);
    let feature_b = PawnInitialization::new(&pawn, registry.clone());
    feature_a.register_init_state_feature();
    feature_b.on_register();
    feature_a.begin_play();
    feature_b.begin_play();

    assert_init_state!(registry, actor, EQUIPMENT, InitState::DataAvailable);
    assert_init_state!(registry, actor, PAWN_INITIALIZATION_FEATURE, InitState::Spawned);
    assert!(!registry.have_all_features_reached_init_state(&actor, InitState::DataAvailable));

    // retrying without a controller changes nothing
    feature_b.handle_controller_changed();
    feature_a.check_default_initialization();
    assert_init_state!(registry, actor, PAWN_INITIALIZATION_FEATURE, InitState::Spawned);
    assert_init_state!(registry, actor, EQUIPMENT, InitState::DataAvailable);

    pawn.set_controller(true);
    feature_b.handle_controller_changed();

    assert!(registry.have_all_features_reached_init_state(&actor, InitState::DataAvailable));
    assert_init_state!(registry, actor, EQUIPMENT, InitState::GameplayReady);
    assert_init_state!(registry, actor, PAWN_INITIALIZATION_FEATURE, InitState::GameplayReady);
    assert_sequential!(InitStateChain::DEFAULT, recorder.states_of(EQUIPMENT));
    assert_sequential!(InitStateChain::DEFAULT, recorder.states_of(PAWN_INITIALIZATION_FEATURE));
}

/// The pawn is waiting at DataAvailable; the last peer to get its data wakes
/// it through the change broadcast without any pawn trigger.
#[test]
fn last_peer_data_available_wakes_waiting_pawn() {
    init_logger();
    let registry: FeatureRegistry<TestActor> = FeatureRegistry::default();
    let pawn = TestPawn::new(2);
    let actor = pawn.test_actor();

    let pawn_feature = PawnInitialization::new(&pawn, registry.clone());
    let abilities = TestFeature::waiting(ABILITIES, actor, &registry);
    pawn_feature.on_register();
    abilities.register_init_state_feature();
    pawn_feature.begin_play();
    abilities.begin_play();

    assert_init_state!(registry, actor, PAWN_INITIALIZATION_FEATURE, InitState::DataAvailable);
    assert_init_state!(registry, actor, ABILITIES, InitState::Spawned);

    abilities.set_data_ready(true);
    abilities.check_default_initialization();

    assert_init_state!(registry, actor, PAWN_INITIALIZATION_FEATURE, InitState::GameplayReady);
    assert_init_state!(registry, actor, ABILITIES, InitState::GameplayReady);
}

#[test]
fn three_features_converge_in_any_begin_order() {
    init_logger();
    let registry: FeatureRegistry<TestActor> = FeatureRegistry::default();
    let pawn = TestPawn::with_authority(3);
    pawn.set_controller(true);
    let actor = pawn.test_actor();

    let equipment = TestFeature::new(EQUIPMENT, actor, &registry);
    let abilities = TestFeature::waiting(ABILITIES, actor, &registry);
    let pawn_feature = PawnInitialization::new(&pawn, registry.clone());
    equipment.register_init_state_feature();
    abilities.register_init_state_feature();
    pawn_feature.on_register();

    abilities.begin_play();
    pawn_feature.begin_play();
    equipment.begin_play();
    assert!(!registry.have_all_features_reached_init_state(&actor, InitState::DataInitialized));

    abilities.set_data_ready(true);
    abilities.check_default_initialization();

    for feature in [EQUIPMENT, ABILITIES, PAWN_INITIALIZATION_FEATURE] {
        assert_init_state!(registry, actor, feature, InitState::GameplayReady);
    }
}

#[test]
fn handler_runs_once_per_transition() {
    init_logger();
    let registry: FeatureRegistry<TestActor> = FeatureRegistry::default();
    let pawn = TestPawn::with_authority(4);
    let actor = pawn.test_actor();

    let equipment = TestFeature::new(EQUIPMENT, actor, &registry);
    let pawn_feature = PawnInitialization::new(&pawn, registry.clone());
    pawn_feature.on_register();
    equipment.attach_and_begin_play();
    pawn_feature.begin_play();
    assert_init_state!(registry, actor, EQUIPMENT, InitState::DataAvailable);

    pawn.set_controller(true);
    pawn_feature.handle_controller_changed();
    pawn_feature.handle_player_state_replicated();
    equipment.check_default_initialization();

    assert_eq!(
        equipment.handled_transitions(),
        vec![
            (InitState::Unset, InitState::Spawned),
            (InitState::Spawned, InitState::DataAvailable),
            (InitState::DataAvailable, InitState::DataInitialized),
            (InitState::DataInitialized, InitState::GameplayReady),
        ]
    );
}

#[test]
fn pawn_advances_dependents_before_itself() {
    init_logger();
    let registry: FeatureRegistry<TestActor> = FeatureRegistry::default();
    let pawn = TestPawn::new(5);
    let actor = pawn.test_actor();

    let pawn_feature = PawnInitialization::new(&pawn, registry.clone());
    let abilities = TestFeature::waiting(ABILITIES, actor, &registry);
    pawn_feature.add_dependent(&abilities);
    pawn_feature.on_register();
    abilities.attach_and_begin_play();
    pawn_feature.begin_play();
    assert_init_state!(registry, actor, ABILITIES, InitState::Spawned);

    // no direct trigger on the dependent, the pawn's own check pulls it along
    abilities.set_data_ready(true);
    let checks_before = abilities.check_count();
    pawn_feature.handle_player_state_replicated();

    assert!(abilities.check_count() > checks_before);
    assert_init_state!(registry, actor, ABILITIES, InitState::GameplayReady);
    assert_init_state!(registry, actor, PAWN_INITIALIZATION_FEATURE, InitState::GameplayReady);
}

#[test]
fn dropped_dependent_is_skipped() {
    let registry: FeatureRegistry<TestActor> = FeatureRegistry::default();
    let pawn = TestPawn::new(6);
    let actor = pawn.test_actor();

    let pawn_feature = PawnInitialization::new(&pawn, registry.clone());
    let abilities = TestFeature::new(ABILITIES, actor, &registry);
    pawn_feature.add_dependent(&abilities);
    drop(abilities);

    pawn_feature.on_register();
    pawn_feature.begin_play();

    assert_init_state!(registry, actor, PAWN_INITIALIZATION_FEATURE, InitState::GameplayReady);
}

#[test]
fn peer_leaving_unblocks_remaining_features() {
    init_logger();
    let registry: FeatureRegistry<TestActor> = FeatureRegistry::default();
    let pawn = TestPawn::new(7);
    let actor = pawn.test_actor();

    let pawn_feature = PawnInitialization::new(&pawn, registry.clone());
    let abilities = TestFeature::waiting(ABILITIES, actor, &registry);
    pawn_feature.on_register();
    abilities.attach_and_begin_play();
    pawn_feature.begin_play();
    assert_init_state!(registry, actor, PAWN_INITIALIZATION_FEATURE, InitState::DataAvailable);

    abilities.end_play();
    pawn_feature.handle_controller_changed();

    assert_init_state!(registry, actor, PAWN_INITIALIZATION_FEATURE, InitState::GameplayReady);
    assert_eq!(abilities.init_state(), InitState::Unset);
}
