//! Population watch: starts a countdown while the live enemy count is at or
//! above the cap, cancels it when the count drops, and reports game over
//! when the countdown runs out.

use hecs::World;

use bastion_core::constants::POPULATION_WARNING_SECS;
use bastion_core::enums::LifeState;
use bastion_core::events::BattleEvent;

use crate::battle::{BattleState, PopulationWarning};

pub fn live_enemy_count(world: &World) -> usize {
    world
        .query::<&LifeState>()
        .iter()
        .filter(|(_, life)| life.is_alive())
        .count()
}

/// Returns true when the warning countdown expired this tick.
pub fn run(
    world: &World,
    battle: &mut BattleState,
    delta_ms: f64,
    events: &mut Vec<BattleEvent>,
) -> bool {
    let live = live_enemy_count(world);
    battle.population = live;

    if live < battle.population_cap {
        if battle.warning.take().is_some() {
            tracing::info!(live, "population warning cancelled");
            events.push(BattleEvent::PopulationWarningCancelled { live });
        }
        return false;
    }

    if battle.warning.is_none() {
        tracing::warn!(live, cap = battle.population_cap, "population cap reached");
        events.push(BattleEvent::PopulationWarning {
            live,
            cap: battle.population_cap,
            seconds: POPULATION_WARNING_SECS,
        });
    }
    // The tick that starts the warning counts toward it.
    let warning = battle.warning.get_or_insert(PopulationWarning {
        remaining_secs: POPULATION_WARNING_SECS,
        elapsed_ms: 0.0,
    });

    warning.elapsed_ms += delta_ms;
    while warning.elapsed_ms >= 1000.0 {
        warning.elapsed_ms -= 1000.0;
        warning.remaining_secs = warning.remaining_secs.saturating_sub(1);
        if warning.remaining_secs == 0 {
            return true;
        }
    }
    false
}
