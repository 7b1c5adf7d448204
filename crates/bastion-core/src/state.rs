//! Snapshot types: the complete read-only view of a battle after one tick.
//!
//! A presentation layer renders exclusively from these. Entity ids are the
//! bit representation of the simulation's generational handles.

use serde::{Deserialize, Serialize};

use crate::components::GridSlot;
use crate::enums::*;
use crate::events::BattleEvent;
use crate::types::{Position, SimTime};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub time: SimTime,
    pub phase: BattlePhase,
    pub paused: bool,
    pub time_scale: f64,
    pub enemies: Vec<EnemyView>,
    pub towers: Vec<TowerView>,
    pub projectiles: Vec<ProjectileView>,
    pub battle: BattleView,
    /// Events emitted since the previous snapshot.
    pub events: Vec<BattleEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u64,
    pub kind: EnemyKind,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub statuses: Vec<StatusKind>,
    pub is_dead: bool,
    pub path_progress: f64,
    pub laps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerView {
    pub id: u64,
    pub definition_id: String,
    pub kind: TowerKind,
    pub rarity: Rarity,
    pub level: u32,
    pub position: Position,
    pub cell: Option<GridSlot>,
    pub damage: f64,
    pub range: f64,
    pub attack_speed_ms: f64,
    pub target_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u64,
    pub position: Position,
    pub effect: ProjectileEffect,
    pub source_kind: TowerKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveView {
    pub number: u32,
    pub timer_secs: u32,
    pub is_boss: bool,
    pub pending_spawns: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleView {
    pub wave: WaveView,
    pub score: u64,
    pub score_multiplier: f64,
    pub gold: u32,
    pub population: usize,
    pub population_cap: usize,
    /// Seconds left on the population warning, if running.
    pub warning_secs: Option<u32>,
    pub is_game_over: bool,
    /// Unplaced tower cards, by definition id.
    pub reserve: Vec<String>,
    pub enemies_killed: u32,
    pub enemies_leaked: u32,
}
