//! Snapshot system: queries the ECS world and builds a complete BattleSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use bastion_core::components::*;
use bastion_core::enums::{BattlePhase, LifeState};
use bastion_core::events::BattleEvent;
use bastion_core::state::*;
use bastion_core::types::{Position, SimTime};

use crate::battle::BattleState;
use crate::handles::{entity_id, TargetLock};
use crate::merge::Reserve;
use crate::systems::wave_scheduler::WaveScheduler;

/// Pause state and playback speed as seen by the presentation layer.
#[derive(Debug, Clone, Copy)]
pub struct Playback {
    pub paused: bool,
    pub time_scale: f64,
}

/// Build a complete BattleSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    playback: Playback,
    battle: &BattleState,
    scheduler: &WaveScheduler,
    reserve: &Reserve,
    events: Vec<BattleEvent>,
) -> BattleSnapshot {
    BattleSnapshot {
        time: *time,
        phase: battle.phase,
        paused: playback.paused,
        time_scale: playback.time_scale,
        enemies: build_enemies(world),
        towers: build_towers(world),
        projectiles: build_projectiles(world),
        battle: BattleView {
            wave: WaveView {
                number: scheduler.wave(),
                timer_secs: scheduler.timer_secs(),
                is_boss: scheduler.is_boss_wave(),
                pending_spawns: scheduler.pending_spawns(),
            },
            score: battle.score,
            score_multiplier: battle.score_multiplier,
            gold: battle.gold,
            population: battle.population,
            population_cap: battle.population_cap,
            warning_secs: battle.warning_secs(),
            is_game_over: battle.phase == BattlePhase::GameOver,
            reserve: reserve.cards().to_vec(),
            enemies_killed: battle.enemies_killed,
            enemies_leaked: battle.enemies_leaked,
        },
        events,
    }
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<(u64, EnemyView)> = world
        .query::<(
            &Position,
            &Health,
            &EnemyProfile,
            &PathFollower,
            &StatusEffects,
            &LifeState,
        )>()
        .iter()
        .map(|(entity, (pos, health, profile, follower, effects, life))| {
            (
                profile.serial,
                EnemyView {
                    id: entity_id(entity),
                    kind: profile.kind,
                    position: *pos,
                    health: health.current,
                    max_health: health.max,
                    statuses: effects.kinds(),
                    is_dead: !life.is_alive(),
                    path_progress: follower.progress,
                    laps: follower.laps,
                },
            )
        })
        .collect();
    enemies.sort_by_key(|(serial, _)| *serial);
    enemies.into_iter().map(|(_, view)| view).collect()
}

fn build_towers(world: &World) -> Vec<TowerView> {
    let mut towers: Vec<(u64, TowerView)> = world
        .query::<(&Position, &Tower, &TowerStats, &TargetLock, Option<&GridSlot>)>()
        .iter()
        .map(|(entity, (pos, tower, stats, lock, slot))| {
            (
                tower.serial,
                TowerView {
                    id: entity_id(entity),
                    definition_id: tower.definition_id.clone(),
                    kind: tower.kind,
                    rarity: tower.rarity,
                    level: tower.level,
                    position: *pos,
                    cell: slot.copied(),
                    damage: stats.damage(),
                    range: stats.range(),
                    attack_speed_ms: stats.attack_speed_ms(),
                    target_id: lock.0.map(entity_id),
                },
            )
        })
        .collect();
    towers.sort_by_key(|(serial, _)| *serial);
    towers.into_iter().map(|(_, view)| view).collect()
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Position, &Projectile)>()
        .iter()
        .filter(|(_, (_, proj))| !proj.should_destroy)
        .map(|(entity, (pos, proj))| ProjectileView {
            id: entity_id(entity),
            position: *pos,
            effect: proj.effect,
            source_kind: proj.source_kind,
        })
        .collect();
    projectiles.sort_by_key(|p| p.id);
    projectiles
}
