use std::fmt;

/// Lifecycle state a feature can be in.
///
/// States carry no ordering of their own. Whether one state comes "after"
/// another is decided by an [`InitStateChain`], never by comparing values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InitState {
    /// Not registered yet, or registered but not spawned
    Unset,
    Spawned,
    DataAvailable,
    DataInitialized,
    GameplayReady,
}

impl InitState {
    pub fn is_valid(&self) -> bool {
        *self != InitState::Unset
    }

    pub fn name(&self) -> &'static str {
        match self {
            InitState::Unset => "Unset",
            InitState::Spawned => "InitState.Spawned",
            InitState::DataAvailable => "InitState.DataAvailable",
            InitState::DataInitialized => "InitState.DataInitialized",
            InitState::GameplayReady => "InitState.GameplayReady",
        }
    }
}

impl Default for InitState {
    fn default() -> Self {
        InitState::Unset
    }
}

impl fmt::Display for InitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed, ordered sequence of states a feature walks through.
///
/// [`InitState::Unset`] is treated as sitting before the first element, so
/// `next_after(Unset)` yields the head of the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitStateChain {
    states: &'static [InitState],
}

impl InitStateChain {
    /// Spawned → DataAvailable → DataInitialized → GameplayReady
    pub const DEFAULT: InitStateChain = InitStateChain::new(&[
        InitState::Spawned,
        InitState::DataAvailable,
        InitState::DataInitialized,
        InitState::GameplayReady,
    ]);

    pub const fn new(states: &'static [InitState]) -> Self {
        Self { states }
    }

    pub fn states(&self) -> &'static [InitState] {
        self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn first(&self) -> Option<InitState> {
        self.states.first().copied()
    }

    pub fn last(&self) -> Option<InitState> {
        self.states.last().copied()
    }

    pub fn contains(&self, state: InitState) -> bool {
        self.position(state).is_some()
    }

    /// Index of `state` within the chain. `Unset` is never part of a chain.
    pub fn position(&self, state: InitState) -> Option<usize> {
        if !state.is_valid() {
            return None;
        }
        self.states.iter().position(|chain_state| *chain_state == state)
    }

    /// The state that follows `current`, or `None` at the end of the chain or
    /// when `current` is not part of it.
    pub fn next_after(&self, current: InitState) -> Option<InitState> {
        if !current.is_valid() {
            return self.first();
        }
        let index = self.position(current)?;
        self.states.get(index + 1).copied()
    }

    /// Whether `desired` is exactly one step past `current`.
    pub fn is_next_step(&self, current: InitState, desired: InitState) -> bool {
        self.next_after(current) == Some(desired)
    }

    /// Whether `current` equals `min` or lies after it. States missing from
    /// the chain have reached nothing.
    pub fn has_reached(&self, current: InitState, min: InitState) -> bool {
        let Some(current_index) = self.position(current) else {
            return false;
        };
        let Some(min_index) = self.position(min) else {
            return false;
        };
        current_index >= min_index
    }

    pub fn is_terminal(&self, state: InitState) -> bool {
        state.is_valid() && self.last() == Some(state)
    }
}

impl Default for InitStateChain {
    fn default() -> Self {
        InitStateChain::DEFAULT
    }
}
