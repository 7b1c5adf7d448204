//! Entity spawn factories.
//!
//! Creates enemy, tower and projectile entities with their component bundles.

use hecs::{Entity, World};

use bastion_core::components::*;
use bastion_core::definitions::{EnemyDefinition, TowerDefinition};
use bastion_core::enums::{LifeState, ProjectileEffect, TowerKind};
use bastion_core::types::Position;

use crate::handles::{Homing, TargetLock};
use crate::path::Path;

/// Spawn an enemy at the first point of the route.
pub fn spawn_enemy(
    world: &mut World,
    path: &Path,
    definition: &EnemyDefinition,
    wave: u32,
    serial: u64,
) -> Entity {
    let profile = EnemyProfile {
        kind: definition.kind,
        base_speed: definition.speed,
        damage_to_base: definition.damage_to_base,
        gold_value: definition.gold_value,
        score_value: definition.score_value,
        wave,
        serial,
    };
    world.spawn((
        path.start(),
        Health::new(definition.health),
        profile,
        PathFollower::default(),
        StatusEffects::default(),
        LifeState::Alive,
    ))
}

/// Spawn a tower at a fixed position. `slot` is the grid cell it occupies,
/// if it was placed through the grid.
pub fn spawn_tower(
    world: &mut World,
    definition: &TowerDefinition,
    position: Position,
    slot: Option<GridSlot>,
    serial: u64,
) -> Entity {
    let tower = Tower {
        definition_id: definition.id.clone(),
        kind: definition.kind,
        rarity: definition.rarity,
        level: 1,
        strategy: definition.strategy,
        effect: definition.effect,
        projectile_speed: definition.projectile_speed,
        last_attack_ms: None,
        serial,
    };
    let entity = world.spawn((position, tower, definition.base_stats(), TargetLock(None)));
    if let Some(slot) = slot {
        let _ = world.insert_one(entity, slot);
    }
    entity
}

/// Spawn a projectile homing on `target`.
pub fn spawn_projectile(
    world: &mut World,
    origin: Position,
    target: Entity,
    damage: f64,
    speed: f64,
    effect: ProjectileEffect,
    source_kind: TowerKind,
) -> Entity {
    world.spawn((
        origin,
        Projectile {
            damage,
            speed,
            effect,
            source_kind,
            should_destroy: false,
        },
        Homing { target },
    ))
}
