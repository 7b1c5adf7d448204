//! Status effect engine.
//!
//! Re-applying any kind refreshes its remaining time; nothing stacks.
//! Damage over time accumulates exactly and fires every `DOT_INTERVAL_MS`.

use bastion_core::components::{ActiveStatus, StatusEffects};
use bastion_core::constants::*;
use bastion_core::enums::StatusKind;

/// Apply or refresh an effect.
pub fn apply(effects: &mut StatusEffects, kind: StatusKind, duration_secs: f64) {
    let remaining_ms = duration_secs * 1000.0;
    if remaining_ms <= 0.0 {
        return;
    }
    match effects.active.iter_mut().find(|s| s.kind == kind) {
        Some(existing) => existing.remaining_ms = remaining_ms,
        None => effects.active.push(ActiveStatus {
            kind,
            remaining_ms,
            dot_elapsed_ms: 0.0,
        }),
    }
}

/// Periodic damage produced by one call to [`tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DotTicks {
    pub count: u32,
    pub damage_per_tick: f64,
}

/// Decay every effect by `delta_ms` and collect damage-over-time ticks.
/// Expired effects are removed. An effect only accrues damage for the part
/// of `delta_ms` during which it was still active.
pub fn tick(effects: &mut StatusEffects, delta_ms: f64, max_health: f64) -> DotTicks {
    let mut count = 0;
    for status in effects.active.iter_mut() {
        if status.kind.is_damage_over_time() {
            status.dot_elapsed_ms += delta_ms.min(status.remaining_ms);
            while status.dot_elapsed_ms >= DOT_INTERVAL_MS {
                status.dot_elapsed_ms -= DOT_INTERVAL_MS;
                count += 1;
            }
        }
        status.remaining_ms -= delta_ms;
    }
    effects.active.retain(|s| s.remaining_ms > 0.0);

    DotTicks {
        count,
        damage_per_tick: (max_health * DOT_HEALTH_FRACTION).ceil(),
    }
}

/// Speed multiplier from active effects. Freeze takes precedence over slow.
pub fn speed_multiplier(effects: &StatusEffects) -> f64 {
    if effects.has(StatusKind::Freeze) {
        FREEZE_SPEED_MULTIPLIER
    } else if effects.has(StatusKind::Slow) {
        SLOW_SPEED_MULTIPLIER
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reapply_refreshes_instead_of_stacking() {
        let mut effects = StatusEffects::default();
        apply(&mut effects, StatusKind::Burn, 3.0);
        tick(&mut effects, 2000.0, 100.0);
        apply(&mut effects, StatusKind::Burn, 3.0);
        assert_eq!(effects.active.len(), 1);
        assert_eq!(effects.get(StatusKind::Burn).unwrap().remaining_ms, 3000.0);
    }

    #[test]
    fn test_expired_effects_removed() {
        let mut effects = StatusEffects::default();
        apply(&mut effects, StatusKind::Slow, 1.0);
        tick(&mut effects, 999.0, 100.0);
        assert!(effects.has(StatusKind::Slow));
        tick(&mut effects, 1.0, 100.0);
        assert!(!effects.has(StatusKind::Slow));
    }

    #[test]
    fn test_freeze_overrides_slow() {
        let mut effects = StatusEffects::default();
        assert_eq!(speed_multiplier(&effects), 1.0);
        apply(&mut effects, StatusKind::Slow, 2.0);
        assert_eq!(speed_multiplier(&effects), 0.5);
        apply(&mut effects, StatusKind::Freeze, 1.0);
        assert_eq!(speed_multiplier(&effects), 0.0);
        apply(&mut effects, StatusKind::Stun, 1.0);
        assert_eq!(speed_multiplier(&effects), 0.0);
    }

    #[test]
    fn test_dot_fires_at_fixed_interval() {
        let mut effects = StatusEffects::default();
        apply(&mut effects, StatusKind::Poison, 2.0);
        let mut total = 0;
        for _ in 0..100 {
            let ticks = tick(&mut effects, 20.0, 120.0);
            // ceil(120 * 0.02) = ceil(2.4) = 3
            assert_eq!(ticks.damage_per_tick, 3.0);
            total += ticks.count;
        }
        assert_eq!(total, 4, "2 s of poison at 500 ms intervals");
        assert!(effects.active.is_empty());
    }

    #[test]
    fn test_non_dot_effects_deal_no_damage() {
        let mut effects = StatusEffects::default();
        apply(&mut effects, StatusKind::Weakness, 5.0);
        let ticks = tick(&mut effects, 1000.0, 100.0);
        assert_eq!(ticks.count, 0);
    }

    #[test]
    fn test_zero_duration_ignored() {
        let mut effects = StatusEffects::default();
        apply(&mut effects, StatusKind::Slow, 0.0);
        assert!(effects.active.is_empty());
    }
}
