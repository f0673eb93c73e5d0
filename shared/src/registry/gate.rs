use crate::InitState;

/// Decides whether a feature may move from `current` to `desired`.
///
/// `admits` is evaluated against the state the registry holds before the
/// transition. `prepare` runs once per committed transition, after the new
/// state is stored and before any subscriber hears about it. A transition
/// that loses to a re-entrant change never reaches `prepare`.
pub trait InitStateGate {
    fn admits(&self, current: InitState, desired: InitState) -> bool;

    fn prepare(&self, _current: InitState, _desired: InitState) {}
}

impl<F: Fn(InitState, InitState) -> bool> InitStateGate for F {
    fn admits(&self, current: InitState, desired: InitState) -> bool {
        self(current, desired)
    }
}
