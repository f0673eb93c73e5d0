use crate::{feature::init_state_feature::InitStateFeature, ActorId, InitState, InitStateChain};

/// Walk `feature` along `chain`, one admitted step at a time, until a gate
/// rejects or the chain runs out. Returns the state the feature ends on.
///
/// The current state is re-read before every step: a transition may notify a
/// peer that advances this very feature before control comes back here.
pub fn continue_init_state_chain<A, F>(feature: &F, chain: &InitStateChain) -> InitState
where
    A: ActorId,
    F: InitStateFeature<A> + ?Sized,
{
    loop {
        let current = feature.init_state();
        let Some(next) = chain.next_after(current) else {
            return current;
        };
        if !feature.try_to_change_init_state(next) {
            return feature.init_state();
        }
    }
}
