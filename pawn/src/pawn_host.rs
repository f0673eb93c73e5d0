use initstate_shared::ActorId;

/// What the pawn initialization feature needs to know about the actor it is
/// attached to. Implemented by the host's actor model; all queries are
/// read-only.
pub trait PawnHost<A: ActorId>: Send + Sync {
    fn actor(&self) -> A;

    /// Whether the host actor is a pawn at all
    fn is_pawn(&self) -> bool;

    fn has_authority(&self) -> bool;

    fn is_locally_controlled(&self) -> bool;

    /// Whether a controller currently possesses the pawn
    fn has_controller(&self) -> bool;
}
