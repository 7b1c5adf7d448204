//! Enemy damage, death and healing.
//!
//! Every mutation is guarded by the enemy's `LifeState`: once an enemy
//! leaves `Alive` it can no longer be damaged, killed again or healed.

use hecs::{Entity, World};

use bastion_core::components::{EnemyProfile, Health};
use bastion_core::constants::TANK_DAMAGE_FACTOR;
use bastion_core::enums::{EnemyKind, LifeState};
use bastion_core::events::BattleEvent;
use bastion_core::types::Position;

use crate::handles::entity_id;

/// Result of a damage attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Target missing, already dead, or non-positive amount.
    Ignored,
    Damaged { applied: f64 },
    Killed { applied: f64 },
}

impl DamageOutcome {
    pub fn killed(&self) -> bool {
        matches!(self, DamageOutcome::Killed { .. })
    }
}

/// Incoming damage after kind-specific mitigation.
pub fn mitigated(kind: EnemyKind, amount: f64) -> f64 {
    match kind {
        EnemyKind::Tank => (amount * TANK_DAMAGE_FACTOR).floor(),
        _ => amount,
    }
}

/// Apply damage to one enemy's components. Transitions to `Dying` when
/// health reaches zero. No-op on a dead enemy.
pub fn take_damage(
    health: &mut Health,
    life: &mut LifeState,
    kind: EnemyKind,
    amount: f64,
) -> DamageOutcome {
    if !life.is_alive() || amount.is_nan() || amount <= 0.0 {
        return DamageOutcome::Ignored;
    }
    let applied = mitigated(kind, amount);
    health.current -= applied;
    if health.current <= 0.0 && die(life) {
        DamageOutcome::Killed { applied }
    } else {
        DamageOutcome::Damaged { applied }
    }
}

/// Mark an enemy as dying. Returns true only on the first call.
pub fn die(life: &mut LifeState) -> bool {
    if !life.is_alive() {
        return false;
    }
    *life = LifeState::Dying;
    true
}

/// Restore health, clamped to the maximum. Returns the amount restored.
pub fn heal(health: &mut Health, life: &LifeState, amount: f64) -> f64 {
    if !life.is_alive() || amount.is_nan() || amount <= 0.0 {
        return 0.0;
    }
    let before = health.current;
    health.current = (health.current + amount).min(health.max);
    health.current - before
}

/// The death notification for an enemy. Pushed exactly once, by the caller
/// that observed `DamageOutcome::Killed`.
pub fn kill_event(entity: Entity, profile: &EnemyProfile, position: Position) -> BattleEvent {
    BattleEvent::EnemyKilled {
        enemy_id: entity_id(entity),
        kind: profile.kind,
        gold: profile.gold_value,
        score: profile.score_value,
        position,
    }
}

/// Damage an enemy by handle. Stale handles and dead enemies are ignored.
pub fn damage_enemy(
    world: &mut World,
    entity: Entity,
    amount: f64,
    events: &mut Vec<BattleEvent>,
) -> DamageOutcome {
    let Ok((health, life, profile, pos)) = world
        .query_one_mut::<(&mut Health, &mut LifeState, &EnemyProfile, &Position)>(entity)
    else {
        return DamageOutcome::Ignored;
    };
    let outcome = take_damage(health, life, profile.kind, amount);
    if outcome.killed() {
        events.push(kill_event(entity, profile, *pos));
    }
    outcome
}

/// Heal an enemy by handle. Returns the amount restored.
pub fn heal_enemy(world: &mut World, entity: Entity, amount: f64) -> f64 {
    match world.query_one_mut::<(&mut Health, &LifeState)>(entity) {
        Ok((health, life)) => heal(health, life, amount),
        Err(_) => 0.0,
    }
}

/// Whether a handle refers to a live enemy.
pub fn is_alive(world: &World, entity: Entity) -> bool {
    world
        .get::<&LifeState>(entity)
        .map(|life| life.is_alive())
        .unwrap_or(false)
}
