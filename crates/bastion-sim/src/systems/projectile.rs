//! Projectile system: homing flight, impact resolution and delayed chain hops.
//!
//! Projectiles are processed one at a time against the current world, so a
//! projectile whose target was killed earlier in the same pass misses
//! cleanly. Removal is deferred to cleanup via `should_destroy`.

use hecs::{Entity, World};

use bastion_core::components::{EnemyProfile, Projectile, StatusEffects};
use bastion_core::constants::*;
use bastion_core::enums::{LifeState, ProjectileEffect, StatusKind};
use bastion_core::events::BattleEvent;
use bastion_core::types::Position;

use crate::combat::{self, DamageOutcome};
use crate::handles::{entity_id, Homing};
use crate::status;
use crate::timers::Timeline;

/// Reduced damage scheduled against one secondary target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainHop {
    pub target: Entity,
    pub damage: f64,
}

#[derive(Debug, Clone, Copy)]
struct Flight {
    entity: Entity,
    position: Position,
    target: Entity,
    damage: f64,
    speed: f64,
    effect: ProjectileEffect,
}

/// Everything the projectile pass needs besides the world.
pub struct ProjectileContext<'a> {
    pub chain_hops: &'a mut Timeline<ChainHop>,
    pub now_ms: f64,
    pub delta_ms: f64,
    /// Half the map edge plus the out-of-bounds margin.
    pub bounds: f64,
    pub events: &'a mut Vec<BattleEvent>,
}

/// Fire due chain hops, then advance and resolve every projectile.
pub fn run(world: &mut World, ctx: ProjectileContext<'_>) {
    fire_chain_hops(world, ctx.chain_hops, ctx.now_ms, ctx.events);

    let flights: Vec<Flight> = world
        .query::<(&Position, &Projectile, &Homing)>()
        .iter()
        .filter(|(_, (_, proj, _))| !proj.should_destroy)
        .map(|(entity, (pos, proj, homing))| Flight {
            entity,
            position: *pos,
            target: homing.target,
            damage: proj.damage,
            speed: proj.speed,
            effect: proj.effect,
        })
        .collect();

    for flight in flights {
        let target_pos = match world.query_one_mut::<(&Position, &LifeState)>(flight.target) {
            Ok((pos, life)) if life.is_alive() => Some(*pos),
            _ => None,
        };

        let (new_pos, arrived) = match target_pos {
            // Target gone before arrival: clean miss, no secondaries.
            None => (flight.position, false),
            Some(target_pos) => {
                let step = flight.speed * ctx.delta_ms / 1000.0;
                let next = flight.position.step_toward(&target_pos, step);
                (next, next.distance_to(&target_pos) < PROJECTILE_ARRIVAL_DISTANCE)
            }
        };
        let out_of_bounds = new_pos.x.abs() > ctx.bounds || new_pos.y.abs() > ctx.bounds;
        let destroy = target_pos.is_none() || arrived || out_of_bounds;

        if let Ok((pos, proj)) =
            world.query_one_mut::<(&mut Position, &mut Projectile)>(flight.entity)
        {
            *pos = new_pos;
            proj.should_destroy = destroy;
        }

        if arrived {
            hit(
                world,
                &flight,
                new_pos,
                ctx.chain_hops,
                ctx.now_ms,
                ctx.events,
            );
        }
    }
}

/// Resolve an impact on a live primary target.
fn hit(
    world: &mut World,
    flight: &Flight,
    impact: Position,
    chain_hops: &mut Timeline<ChainHop>,
    now_ms: f64,
    events: &mut Vec<BattleEvent>,
) {
    let outcome = combat::damage_enemy(world, flight.target, flight.damage, events);
    if outcome == DamageOutcome::Ignored {
        return;
    }
    events.push(BattleEvent::ProjectileImpact {
        target_id: entity_id(flight.target),
        damage: flight.damage,
        effect: flight.effect,
        position: impact,
    });

    match flight.effect {
        ProjectileEffect::Plain => {}
        ProjectileEffect::Slow => {
            if let Ok((effects, life)) =
                world.query_one_mut::<(&mut StatusEffects, &LifeState)>(flight.target)
            {
                if life.is_alive() {
                    status::apply(effects, StatusKind::Slow, FROST_SLOW_SECS);
                }
            }
        }
        ProjectileEffect::Chain => {
            // A primary killed by the direct hit does not chain.
            if !matches!(outcome, DamageOutcome::Damaged { .. }) {
                return;
            }
            let Ok(origin) = world.get::<&Position>(flight.target).map(|p| *p) else {
                return;
            };
            let hop_damage = flight.damage * CHAIN_DAMAGE_FACTOR;
            let targets = others_within(world, flight.target, &origin, CHAIN_RADIUS);
            for (i, target) in targets.into_iter().take(CHAIN_MAX_HOPS).enumerate() {
                let due = now_ms + CHAIN_HOP_DELAY_MS * (i as f64 + 1.0);
                chain_hops.schedule(
                    due,
                    ChainHop {
                        target,
                        damage: hop_damage,
                    },
                );
            }
        }
        ProjectileEffect::Splash => {
            let splash_damage = flight.damage * SPLASH_DAMAGE_FACTOR;
            for target in others_within(world, flight.target, &impact, SPLASH_RADIUS) {
                combat::damage_enemy(world, target, splash_damage, events);
            }
        }
    }
}

/// Live enemies other than `exclude` strictly within `radius` of `centre`,
/// in spawn order.
fn others_within(world: &World, exclude: Entity, centre: &Position, radius: f64) -> Vec<Entity> {
    let mut found: Vec<(u64, Entity)> = world
        .query::<(&Position, &EnemyProfile, &LifeState)>()
        .iter()
        .filter(|(entity, (pos, _, life))| {
            *entity != exclude && life.is_alive() && centre.distance_to(pos) < radius
        })
        .map(|(entity, (_, profile, _))| (profile.serial, entity))
        .collect();
    found.sort_by_key(|(serial, _)| *serial);
    found.into_iter().map(|(_, entity)| entity).collect()
}

/// Apply chain hops whose delay has elapsed. Each hop revalidates its target.
fn fire_chain_hops(
    world: &mut World,
    chain_hops: &mut Timeline<ChainHop>,
    now_ms: f64,
    events: &mut Vec<BattleEvent>,
) {
    for hop in chain_hops.drain_due(now_ms) {
        let outcome = combat::damage_enemy(world, hop.target, hop.damage, events);
        if outcome != DamageOutcome::Ignored {
            events.push(BattleEvent::ChainArc {
                target_id: entity_id(hop.target),
                damage: hop.damage,
            });
        }
    }
}
