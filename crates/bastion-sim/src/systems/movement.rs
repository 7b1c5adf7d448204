//! Enemy system: route following, status decay and damage over time.
//!
//! Distance left over after reaching a waypoint carries into the next
//! segment within the same tick.

use hecs::World;

use bastion_core::components::{EnemyProfile, Health, PathFollower, StatusEffects};
use bastion_core::constants::WAYPOINT_EPSILON;
use bastion_core::enums::LifeState;
use bastion_core::events::BattleEvent;
use bastion_core::types::Position;

use crate::combat;
use crate::handles::entity_id;
use crate::path::Path;
use crate::status;

/// Outcome of moving one enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moving,
    /// Reached the final point of a non-looped route.
    ReachedEnd,
}

/// Move a follower `distance` world units along `path`.
pub fn advance_along(
    path: &Path,
    pos: &mut Position,
    follower: &mut PathFollower,
    distance: f64,
) -> Advance {
    let last = path.len() - 1;
    let mut remaining = distance;
    // Whole laps bring a looped follower back to where it stands.
    if path.is_looped() {
        let lap = path.length();
        if lap > 0.0 && remaining >= lap {
            let whole = (remaining / lap).floor();
            follower.laps += whole as u32;
            remaining -= whole * lap;
        }
    }
    // Bounded so a degenerate route cannot spin forever.
    let mut steps = 0;

    while remaining > 0.0 && steps <= path.len() {
        steps += 1;
        let Some(target) = path.point_at(follower.index + 1) else {
            tracing::warn!(index = follower.index, "follower index past end of route");
            debug_assert!(false, "follower index past end of route");
            follower.index = 0;
            break;
        };
        let gap = pos.distance_to(&target);
        if gap <= remaining + WAYPOINT_EPSILON {
            remaining = (remaining - gap).max(0.0);
            *pos = target;
            follower.index += 1;
            if follower.index == last {
                if path.is_looped() {
                    follower.index = 0;
                    follower.laps += 1;
                    *pos = path.start();
                } else {
                    follower.progress = 1.0;
                    return Advance::ReachedEnd;
                }
            }
        } else {
            *pos = pos.step_toward(&target, remaining);
            remaining = 0.0;
        }
    }

    follower.progress = path.progress_at(follower.index, pos);
    Advance::Moving
}

/// Advance every live enemy by `delta_ms`.
pub fn run(world: &mut World, path: &Path, delta_ms: f64, events: &mut Vec<BattleEvent>) {
    for (entity, (pos, health, profile, follower, effects, life)) in world.query_mut::<(
        &mut Position,
        &mut Health,
        &EnemyProfile,
        &mut PathFollower,
        &mut StatusEffects,
        &mut LifeState,
    )>() {
        if !life.is_alive() {
            continue;
        }

        let speed = profile.base_speed * status::speed_multiplier(effects);
        if speed > 0.0 {
            let distance = speed * delta_ms / 1000.0;
            if advance_along(path, pos, follower, distance) == Advance::ReachedEnd {
                *life = LifeState::ReachedBase;
                events.push(BattleEvent::EnemyReachedBase {
                    enemy_id: entity_id(entity),
                    kind: profile.kind,
                    damage: profile.damage_to_base,
                    position: *pos,
                });
                continue;
            }
        }

        let dots = status::tick(effects, delta_ms, health.max);
        for _ in 0..dots.count {
            let outcome = combat::take_damage(health, life, profile.kind, dots.damage_per_tick);
            if outcome.killed() {
                events.push(combat::kill_event(entity, profile, *pos));
                break;
            }
        }
    }
}
