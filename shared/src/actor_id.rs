use std::{fmt::Debug, hash::Hash};

/// Identity of the actor that owns a set of features.
///
/// The registry keys everything by this id and never holds the actor itself,
/// so an actor's lifetime is not tied to its bookkeeping.
pub trait ActorId: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T: Copy + Eq + Hash + Debug + Send + Sync + 'static> ActorId for T {}
