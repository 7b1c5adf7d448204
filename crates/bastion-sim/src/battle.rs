//! Battle state: economy, score and the population watch.
//!
//! Stored in `BattleEngine`, NOT as ECS entities.

use bastion_core::constants::*;
use bastion_core::enums::BattlePhase;

#[derive(Debug, Clone)]
pub struct BattleState {
    pub phase: BattlePhase,
    pub gold: u32,
    pub score: u64,
    pub score_multiplier: f64,
    pub population_cap: usize,
    /// Live enemy count observed by the last population check.
    pub population: usize,
    pub warning: Option<PopulationWarning>,

    // --- Stats ---
    pub enemies_killed: u32,
    pub enemies_leaked: u32,
    pub base_damage_taken: u32,
}

/// Countdown running while the population is at or above the cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationWarning {
    pub remaining_secs: u32,
    /// Time accumulated toward the next one-second decrement.
    pub elapsed_ms: f64,
}

impl BattleState {
    pub fn new(starting_gold: u32, population_cap: usize) -> Self {
        Self {
            phase: BattlePhase::Idle,
            gold: starting_gold,
            score: 0,
            score_multiplier: 1.0,
            population_cap,
            population: 0,
            warning: None,
            enemies_killed: 0,
            enemies_leaked: 0,
            base_damage_taken: 0,
        }
    }

    /// Credit a kill: full gold, score scaled by the current multiplier.
    pub fn credit_kill(&mut self, gold: u32, score: u32) {
        self.gold = self.gold.saturating_add(gold);
        self.score += (score as f64 * self.score_multiplier).floor() as u64;
        self.enemies_killed += 1;
    }

    pub fn record_leak(&mut self, damage: u32) {
        self.enemies_leaked += 1;
        self.base_damage_taken = self.base_damage_taken.saturating_add(damage);
    }

    pub fn refund(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == BattlePhase::GameOver
    }

    pub fn warning_secs(&self) -> Option<u32> {
        self.warning.map(|w| w.remaining_secs)
    }
}

impl Default for BattleState {
    fn default() -> Self {
        Self::new(STARTING_GOLD, DEFAULT_POPULATION_CAP)
    }
}
