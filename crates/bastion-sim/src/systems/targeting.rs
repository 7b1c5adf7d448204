//! Tower system: target acquisition and firing.
//!
//! Each tower revalidates its lock (alive and within current range), re-scans
//! when the lock is gone, and fires once its cooldown has elapsed. Fire
//! orders are collected during the tower pass and projectiles are spawned
//! afterwards, so the world is never mutated while it is being iterated.

use std::collections::HashMap;

use hecs::{Entity, World};

use bastion_core::components::{EnemyProfile, PathFollower, Tower, TowerStats};
use bastion_core::constants::SPLASH_RADIUS;
use bastion_core::enums::{LifeState, ProjectileEffect, TargetingStrategy, TowerKind};
use bastion_core::events::BattleEvent;
use bastion_core::types::Position;

use crate::handles::{entity_id, TargetLock};
use crate::world_setup;

/// A live enemy as seen by the targeting pass.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub entity: Entity,
    pub position: Position,
    /// Laps plus fractional progress, for furthest-along-path ranking.
    pub advancement: f64,
    pub serial: u64,
}

#[derive(Debug, Clone, Copy)]
struct FireOrder {
    tower: Entity,
    target: Entity,
    origin: Position,
    damage: f64,
    speed: f64,
    effect: ProjectileEffect,
    kind: TowerKind,
}

/// Live enemies in spawn order.
pub fn collect_candidates(world: &World) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = world
        .query::<(&Position, &EnemyProfile, &PathFollower, &LifeState)>()
        .iter()
        .filter(|(_, (_, _, _, life))| life.is_alive())
        .map(|(entity, (pos, profile, follower, _))| Candidate {
            entity,
            position: *pos,
            advancement: follower.laps as f64 + follower.progress,
            serial: profile.serial,
        })
        .collect();
    candidates.sort_by_key(|c| c.serial);
    candidates
}

/// Pick a target among `candidates` within `range` of `origin`.
pub fn select_target(
    strategy: TargetingStrategy,
    origin: &Position,
    range: f64,
    candidates: &[Candidate],
) -> Option<Entity> {
    let in_range = candidates
        .iter()
        .map(|c| (c, origin.distance_to(&c.position)))
        .filter(|(_, dist)| *dist <= range);

    let mut best: Option<(&Candidate, f64, f64)> = None;
    for (candidate, dist) in in_range {
        // Higher score wins; ties go to the shorter distance, then to the
        // earlier spawn (iteration order).
        let score = match strategy {
            TargetingStrategy::Closest => -dist,
            TargetingStrategy::FurthestAlongPath => candidate.advancement,
            TargetingStrategy::ClosestToOtherEnemies => neighbours(candidate, candidates) as f64,
        };
        let better = match best {
            None => true,
            Some((_, best_score, best_dist)) => match strategy {
                TargetingStrategy::Closest | TargetingStrategy::FurthestAlongPath => {
                    score > best_score
                }
                TargetingStrategy::ClosestToOtherEnemies => {
                    score > best_score || (score == best_score && dist < best_dist)
                }
            },
        };
        if better {
            best = Some((candidate, score, dist));
        }
    }
    best.map(|(c, _, _)| c.entity)
}

/// Other live enemies strictly inside the splash radius of `candidate`.
fn neighbours(candidate: &Candidate, candidates: &[Candidate]) -> usize {
    candidates
        .iter()
        .filter(|other| other.entity != candidate.entity)
        .filter(|other| candidate.position.distance_to(&other.position) < SPLASH_RADIUS)
        .count()
}

/// Run the tower pass. Returns the number of projectiles fired.
pub fn run(world: &mut World, now_ms: f64, events: &mut Vec<BattleEvent>) -> usize {
    let candidates = collect_candidates(world);
    let by_entity: HashMap<Entity, &Candidate> =
        candidates.iter().map(|c| (c.entity, c)).collect();

    let mut orders = Vec::new();
    for (entity, (pos, tower, stats, lock)) in
        world.query_mut::<(&Position, &mut Tower, &TowerStats, &mut TargetLock)>()
    {
        let range = stats.range();

        if let Some(target) = lock.0 {
            let still_valid = by_entity
                .get(&target)
                .is_some_and(|c| pos.distance_to(&c.position) <= range);
            if !still_valid {
                lock.0 = None;
            }
        }
        if lock.0.is_none() {
            lock.0 = select_target(tower.strategy, pos, range, &candidates);
        }

        let Some(target) = lock.0 else {
            continue;
        };
        let ready = tower
            .last_attack_ms
            .map_or(true, |last| now_ms - last >= stats.attack_speed_ms());
        if !ready {
            continue;
        }

        tower.last_attack_ms = Some(now_ms);
        orders.push(FireOrder {
            tower: entity,
            target,
            origin: *pos,
            damage: stats.damage(),
            speed: tower.projectile_speed,
            effect: tower.effect,
            kind: tower.kind,
        });
    }

    let fired = orders.len();
    for order in orders {
        world_setup::spawn_projectile(
            world,
            order.origin,
            order.target,
            order.damage,
            order.speed,
            order.effect,
            order.kind,
        );
        events.push(BattleEvent::ProjectileFired {
            tower_id: entity_id(order.tower),
            target_id: entity_id(order.target),
            effect: order.effect,
        });
    }
    fired
}
