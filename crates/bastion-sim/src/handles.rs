//! Components that hold non-owning entity handles.
//!
//! A `hecs::Entity` carries a generation, so a handle to a reaped enemy
//! fails every lookup instead of aliasing a newer entity.

use hecs::Entity;

/// A tower's current target. Revalidated every tick before use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetLock(pub Option<Entity>);

/// The enemy a projectile was fired at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Homing {
    pub target: Entity,
}

/// Stable external id for an entity.
pub fn entity_id(entity: Entity) -> u64 {
    entity.to_bits().get()
}
