use std::sync::{Arc, Weak};

use crate::{
    feature::init_state_feature::InitStateFeature, ActorId, InitStateFilter, SubscriptionHandle,
};

/// Forward change events on the feature's actor to
/// [`InitStateFeature::on_actor_init_state_changed`].
///
/// The registry only keeps a `Weak` to the feature; once the feature is
/// dropped the subscription does nothing until it is unbound.
pub fn bind_init_state_notifications<A, F>(
    feature: &Arc<F>,
    filter: InitStateFilter,
    call_if_reached: bool,
) -> SubscriptionHandle
where
    A: ActorId,
    F: InitStateFeature<A> + 'static,
{
    let weak_feature: Weak<F> = Arc::downgrade(feature);
    feature.registry().bind_on_actor_init_state_changed(
        &feature.actor(),
        filter,
        call_if_reached,
        move |event| {
            if let Some(feature) = weak_feature.upgrade() {
                feature.on_actor_init_state_changed(event);
            }
        },
    )
}

pub fn unbind_init_state_notifications<A, F>(feature: &F, handle: SubscriptionHandle) -> bool
where
    A: ActorId,
    F: InitStateFeature<A> + ?Sized,
{
    feature
        .registry()
        .unbind_on_actor_init_state_changed(&feature.actor(), handle)
}
