//! Cleanup system: reaps dead enemies and spent projectiles.
//!
//! Runs after every system that can mark an entity, so removal never
//! happens while another pass is iterating.

use hecs::{Entity, World};

use bastion_core::components::Projectile;
use bastion_core::enums::LifeState;

/// Despawn enemies that left `Alive` and projectiles flagged for removal.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) -> usize {
    despawn_buffer.clear();

    for (entity, life) in world.query_mut::<&LifeState>() {
        if !life.is_alive() {
            despawn_buffer.push(entity);
        }
    }

    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if projectile.should_destroy {
            despawn_buffer.push(entity);
        }
    }

    let reaped = despawn_buffer.len();
    for entity in despawn_buffer.drain(..) {
        if world.despawn(entity).is_err() {
            tracing::warn!(?entity, "entity reaped twice");
        }
    }
    reaped
}
