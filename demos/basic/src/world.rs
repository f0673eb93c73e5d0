use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use initstate_pawn::PawnHost;

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Entity(u32);

impl Entity {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A pawn in the demo world, possessed on the server
pub struct Character {
    entity: Entity,
    possessed: AtomicBool,
}

impl Character {
    pub fn spawn(entity: Entity) -> Arc<Self> {
        Arc::new(Self {
            entity,
            possessed: AtomicBool::new(false),
        })
    }

    pub fn possess(&self) {
        self.possessed.store(true, Ordering::SeqCst);
    }
}

impl PawnHost<Entity> for Character {
    fn actor(&self) -> Entity {
        self.entity
    }

    fn is_pawn(&self) -> bool {
        true
    }

    fn has_authority(&self) -> bool {
        true
    }

    fn is_locally_controlled(&self) -> bool {
        false
    }

    fn has_controller(&self) -> bool {
        self.possessed.load(Ordering::SeqCst)
    }
}
