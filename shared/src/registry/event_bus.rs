use std::sync::Arc;

use crate::{
    registry::event::{InitStateChangedEvent, InitStateFilter},
    FeatureKey, InitState,
};

pub type InitStateCallback<A> = Arc<dyn Fn(&InitStateChangedEvent<A>) + Send + Sync>;

/// Returned by a bind, used to unbind later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

struct Subscription<A> {
    handle: SubscriptionHandle,
    filter: InitStateFilter,
    callback: InitStateCallback<A>,
}

// ActorEventBus
/// Subscribers of a single actor, in bind order.
pub(crate) struct ActorEventBus<A> {
    subscriptions: Vec<Subscription<A>>,
}

impl<A> ActorEventBus<A> {
    pub(crate) fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    pub(crate) fn bind(
        &mut self,
        handle: SubscriptionHandle,
        filter: InitStateFilter,
        callback: InitStateCallback<A>,
    ) {
        self.subscriptions.push(Subscription {
            handle,
            filter,
            callback,
        });
    }

    /// Returns whether a subscription was removed.
    pub(crate) fn unbind(&mut self, handle: &SubscriptionHandle) -> bool {
        let Some(index) = self
            .subscriptions
            .iter()
            .position(|subscription| subscription.handle == *handle)
        else {
            return false;
        };
        self.subscriptions.remove(index);
        true
    }

    /// Copies out every callback whose filter matches, so dispatch can run
    /// without holding the registry lock and without caring whether callbacks
    /// bind or unbind along the way.
    pub(crate) fn matching(&self, feature: FeatureKey, state: InitState) -> Vec<InitStateCallback<A>> {
        self.subscriptions
            .iter()
            .filter(|subscription| subscription.filter.matches(feature, state))
            .map(|subscription| subscription.callback.clone())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
