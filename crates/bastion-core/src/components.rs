//! ECS components for the battle simulation.
//!
//! Components are plain data structs attached to hecs entities.
//! Components that hold entity handles live in the sim crate.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_ATTACK_COOLDOWN_MS;
use crate::enums::*;

// --- Enemy components ---

/// Current and maximum health.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

/// Static per-enemy stats fixed at spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub kind: EnemyKind,
    /// World units per second before status modifiers.
    pub base_speed: f64,
    pub damage_to_base: u32,
    pub gold_value: u32,
    pub score_value: u32,
    /// Wave the enemy was scheduled for.
    pub wave: u32,
    /// Spawn order within the battle. Used as the deterministic tie-break.
    pub serial: u64,
}

/// Route-following state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PathFollower {
    /// Index of the waypoint the enemy most recently reached.
    pub index: usize,
    /// Fraction of the route completed on the current lap, 0..=1.
    pub progress: f64,
    /// Completed laps of a looped route.
    pub laps: u32,
}

/// One active timed modifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActiveStatus {
    pub kind: StatusKind,
    pub remaining_ms: f64,
    /// Time accumulated toward the next damage-over-time tick.
    pub dot_elapsed_ms: f64,
}

/// At most one active instance per kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEffects {
    pub active: Vec<ActiveStatus>,
}

// --- Tower components ---

/// Tower identity and firing state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    pub definition_id: String,
    pub kind: TowerKind,
    pub rarity: Rarity,
    pub level: u32,
    pub strategy: TargetingStrategy,
    pub effect: ProjectileEffect,
    pub projectile_speed: f64,
    /// Simulation time of the last shot. `None` until the first shot.
    pub last_attack_ms: Option<f64>,
    /// Placement order within the battle.
    pub serial: u64,
}

/// Base stats from the definition plus additive bonuses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TowerStats {
    pub base_damage: f64,
    pub base_range: f64,
    pub base_attack_speed_ms: f64,
    pub damage_bonus: f64,
    pub range_bonus: f64,
    /// Cooldown reduction in milliseconds.
    pub attack_speed_bonus_ms: f64,
}

/// Placement cell occupied by a tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSlot {
    pub col: u32,
    pub row: u32,
}

// --- Projectile components ---

/// In-flight projectile. The captured target lives in the sim crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub damage: f64,
    /// World units per second.
    pub speed: f64,
    pub effect: ProjectileEffect,
    /// Family of the tower that fired it.
    pub source_kind: TowerKind,
    /// Terminal flag: set once, reaped by cleanup.
    pub should_destroy: bool,
}

impl Health {
    pub fn new(max: f64) -> Self {
        Self { current: max, max }
    }

    pub fn fraction(&self) -> f64 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.current / self.max).clamp(0.0, 1.0)
        }
    }
}

impl StatusEffects {
    pub fn get(&self, kind: StatusKind) -> Option<&ActiveStatus> {
        self.active.iter().find(|s| s.kind == kind)
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn kinds(&self) -> Vec<StatusKind> {
        self.active.iter().map(|s| s.kind).collect()
    }
}

impl TowerStats {
    pub fn damage(&self) -> f64 {
        self.base_damage + self.damage_bonus
    }

    pub fn range(&self) -> f64 {
        self.base_range + self.range_bonus
    }

    /// Cooldown between shots, floored at `MIN_ATTACK_COOLDOWN_MS`.
    pub fn attack_speed_ms(&self) -> f64 {
        (self.base_attack_speed_ms - self.attack_speed_bonus_ms).max(MIN_ATTACK_COOLDOWN_MS)
    }
}
