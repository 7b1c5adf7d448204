//! Events emitted by the simulation.
//!
//! Systems push events into a per-tick queue. The engine drains it once per
//! tick for bookkeeping and listeners, then hands it to the snapshot.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BattleEvent {
    EnemySpawned {
        enemy_id: u64,
        kind: EnemyKind,
        wave: u32,
    },
    /// Fired exactly once per enemy whose health reached zero.
    EnemyKilled {
        enemy_id: u64,
        kind: EnemyKind,
        gold: u32,
        /// Unmultiplied score value.
        score: u32,
        position: Position,
    },
    EnemyReachedBase {
        enemy_id: u64,
        kind: EnemyKind,
        damage: u32,
        position: Position,
    },
    ProjectileFired {
        tower_id: u64,
        target_id: u64,
        effect: ProjectileEffect,
    },
    ProjectileImpact {
        target_id: u64,
        damage: f64,
        effect: ProjectileEffect,
        position: Position,
    },
    /// A delayed chain hop landed on a live enemy.
    ChainArc {
        target_id: u64,
        damage: f64,
    },
    TowerPlaced {
        tower_id: u64,
        definition_id: String,
        col: u32,
        row: u32,
    },
    TowerSold {
        tower_id: u64,
        refund: u32,
    },
    MergeCompleted {
        consumed_id: String,
        result_id: String,
    },
    WaveStarted {
        wave: u32,
        is_boss: bool,
        enemy_count: u32,
    },
    WaveCompleted {
        wave: u32,
        skipped: bool,
        score_multiplier: f64,
    },
    PopulationWarning {
        live: usize,
        cap: usize,
        seconds: u32,
    },
    PopulationWarningCancelled {
        live: usize,
    },
    GameOver {
        score: u64,
        wave: u32,
    },
}
