//! Wave scheduler: composition, staggered spawns and the wave countdown.
//!
//! Each wave schedules its spawn orders on a timeline when it starts. Orders
//! carry the wave they were scheduled for, so a skipped wave's remaining
//! spawns still arrive with that wave's scaling.

use hecs::World;
use rand::distributions::{Distribution, WeightedIndex};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use bastion_core::constants::*;
use bastion_core::definitions::EnemyDefinition;
use bastion_core::enums::{BattlePhase, EnemyKind};
use bastion_core::events::BattleEvent;

use crate::battle::BattleState;
use crate::handles::entity_id;
use crate::path::Path;
use crate::timers::Timeline;
use crate::world_setup;

/// Balance coefficients for wave composition and scaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub timer_secs: u32,
    pub skip_multiplier_step: f64,
    pub boss_interval: u32,

    // --- Composition ---
    pub base_enemy_count: u32,
    pub enemies_per_wave: u32,
    pub max_enemy_count: u32,
    pub base_spawn_delay_ms: f64,
    pub spawn_delay_per_wave_ms: f64,
    pub min_spawn_delay_ms: f64,
    pub fast_from_wave: u32,
    pub tank_from_wave: u32,
    pub flying_from_wave: u32,
    pub elite_from_wave: u32,
    pub elite_weight: f64,

    // --- Scaling ---
    pub health_per_wave: f64,
    pub reward_per_wave: f64,

    // --- Boss ---
    pub boss_spawn_delay_ms: f64,
    pub boss_health_base: f64,
    pub boss_health_per_wave: f64,
    pub boss_speed: f64,
    pub boss_gold_base: u32,
    pub boss_gold_per_wave: u32,
    pub boss_score_base: u32,
    pub boss_score_per_wave: u32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            timer_secs: WAVE_TIMER_SECS,
            skip_multiplier_step: SKIP_MULTIPLIER_STEP,
            boss_interval: BOSS_WAVE_INTERVAL,
            base_enemy_count: 8,
            enemies_per_wave: 2,
            max_enemy_count: 20,
            base_spawn_delay_ms: 1500.0,
            spawn_delay_per_wave_ms: 50.0,
            min_spawn_delay_ms: 300.0,
            fast_from_wave: 3,
            tank_from_wave: 5,
            flying_from_wave: 10,
            elite_from_wave: 20,
            elite_weight: 0.5,
            health_per_wave: 0.35,
            reward_per_wave: 0.2,
            boss_spawn_delay_ms: BOSS_SPAWN_DELAY_MS,
            boss_health_base: 500.0,
            boss_health_per_wave: 200.0,
            boss_speed: 40.0,
            boss_gold_base: 100,
            boss_gold_per_wave: 30,
            boss_score_base: 500,
            boss_score_per_wave: 75,
        }
    }
}

impl WaveTuning {
    pub fn is_boss_wave(&self, wave: u32) -> bool {
        wave > 0 && self.boss_interval > 0 && wave % self.boss_interval == 0
    }

    pub fn enemy_count(&self, wave: u32) -> u32 {
        (self.base_enemy_count + self.enemies_per_wave * wave).min(self.max_enemy_count)
    }

    pub fn spawn_delay_ms(&self, wave: u32) -> f64 {
        (self.base_spawn_delay_ms - self.spawn_delay_per_wave_ms * wave as f64)
            .max(self.min_spawn_delay_ms)
    }

    /// Kinds available at `wave` with their draw weights.
    pub fn kind_pool(&self, wave: u32) -> Vec<(EnemyKind, f64)> {
        let mut pool = vec![(EnemyKind::Normal, 1.0)];
        if wave >= self.fast_from_wave {
            pool.push((EnemyKind::Fast, 1.0));
        }
        if wave >= self.tank_from_wave {
            pool.push((EnemyKind::Tank, 1.0));
        }
        if wave >= self.flying_from_wave {
            pool.push((EnemyKind::Flying, 1.0));
        }
        if wave >= self.elite_from_wave {
            pool.push((EnemyKind::Elite, self.elite_weight));
        }
        pool
    }

    pub fn boss_definition(&self, wave: u32) -> EnemyDefinition {
        EnemyDefinition {
            kind: EnemyKind::Boss,
            health: self.boss_health_base + self.boss_health_per_wave * wave as f64,
            speed: self.boss_speed,
            damage_to_base: 0,
            gold_value: self.boss_gold_base + self.boss_gold_per_wave * wave,
            score_value: self.boss_score_base + self.boss_score_per_wave * wave,
        }
    }
}

/// One scheduled spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOrder {
    Regular { wave: u32 },
    Boss { wave: u32 },
}

/// Wave number, countdown and pending spawns.
#[derive(Debug, Clone)]
pub struct WaveScheduler {
    pub tuning: WaveTuning,
    wave: u32,
    timer_secs: u32,
    timer_elapsed_ms: f64,
    timer_running: bool,
    spawns: Timeline<SpawnOrder>,
}

impl WaveScheduler {
    pub fn new(tuning: WaveTuning) -> Self {
        Self {
            tuning,
            wave: 0,
            timer_secs: 0,
            timer_elapsed_ms: 0.0,
            timer_running: false,
            spawns: Timeline::new(),
        }
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn timer_secs(&self) -> u32 {
        self.timer_secs
    }

    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    pub fn is_boss_wave(&self) -> bool {
        self.tuning.is_boss_wave(self.wave)
    }

    pub fn pending_spawns(&self) -> usize {
        self.spawns.len()
    }

    /// Start `wave`: reset the countdown and schedule its spawns.
    pub fn start_wave(
        &mut self,
        wave: u32,
        now_ms: f64,
        battle: &mut BattleState,
        events: &mut Vec<BattleEvent>,
    ) {
        self.wave = wave;
        self.timer_secs = self.tuning.timer_secs;
        self.timer_elapsed_ms = 0.0;
        self.timer_running = true;
        battle.phase = BattlePhase::WaveActive;

        let is_boss = self.tuning.is_boss_wave(wave);
        let enemy_count = if is_boss {
            self.spawns
                .schedule(now_ms + self.tuning.boss_spawn_delay_ms, SpawnOrder::Boss { wave });
            1
        } else {
            let count = self.tuning.enemy_count(wave);
            let delay = self.tuning.spawn_delay_ms(wave);
            for i in 0..count {
                self.spawns
                    .schedule(now_ms + delay * (i as f64 + 1.0), SpawnOrder::Regular { wave });
            }
            count
        };

        tracing::info!(wave, is_boss, enemy_count, "wave started");
        events.push(BattleEvent::WaveStarted {
            wave,
            is_boss,
            enemy_count,
        });
    }

    /// End the current wave and start the next one.
    fn resolve(
        &mut self,
        skipped: bool,
        now_ms: f64,
        battle: &mut BattleState,
        events: &mut Vec<BattleEvent>,
    ) {
        battle.phase = BattlePhase::WaveResolving;
        self.timer_running = false;
        events.push(BattleEvent::WaveCompleted {
            wave: self.wave,
            skipped,
            score_multiplier: battle.score_multiplier,
        });
        self.start_wave(self.wave + 1, now_ms, battle, events);
    }

    /// Skip the rest of the current wave for a multiplier bonus. The
    /// multiplier is never reset on this path.
    pub fn skip(
        &mut self,
        now_ms: f64,
        battle: &mut BattleState,
        events: &mut Vec<BattleEvent>,
    ) -> bool {
        if battle.phase != BattlePhase::WaveActive {
            return false;
        }
        battle.score_multiplier += self.tuning.skip_multiplier_step;
        tracing::info!(
            wave = self.wave,
            multiplier = battle.score_multiplier,
            "wave skipped"
        );
        self.resolve(true, now_ms, battle, events);
        true
    }

    /// Count the wave timer down once per elapsed second. On natural expiry
    /// the score multiplier resets to 1.0 and the next wave starts.
    pub fn advance_timer(
        &mut self,
        delta_ms: f64,
        now_ms: f64,
        battle: &mut BattleState,
        events: &mut Vec<BattleEvent>,
    ) {
        if !self.timer_running || battle.phase != BattlePhase::WaveActive {
            return;
        }
        self.timer_elapsed_ms += delta_ms;
        while self.timer_elapsed_ms >= 1000.0 && self.timer_running {
            self.timer_elapsed_ms -= 1000.0;
            self.timer_secs = self.timer_secs.saturating_sub(1);
            if self.timer_secs == 0 {
                battle.score_multiplier = 1.0;
                tracing::info!(wave = self.wave, "wave timer expired");
                self.resolve(false, now_ms, battle, events);
            }
        }
    }

    pub fn due_spawns(&mut self, now_ms: f64) -> Vec<SpawnOrder> {
        self.spawns.drain_due(now_ms)
    }

    /// Stop the countdown and drop every pending spawn.
    pub fn cancel_all(&mut self) {
        self.timer_running = false;
        self.spawns.clear();
    }

    /// Stats for one spawn order. Regular orders draw their kind here.
    pub fn definition_for(&self, order: SpawnOrder, rng: &mut ChaCha8Rng) -> EnemyDefinition {
        match order {
            SpawnOrder::Boss { wave } => self.tuning.boss_definition(wave),
            SpawnOrder::Regular { wave } => {
                let pool = self.tuning.kind_pool(wave);
                let kind = WeightedIndex::new(pool.iter().map(|(_, w)| *w))
                    .map(|dist| pool[dist.sample(rng)].0)
                    .unwrap_or(EnemyKind::Normal);
                EnemyDefinition::base(kind).scaled(
                    wave,
                    self.tuning.health_per_wave,
                    self.tuning.reward_per_wave,
                )
            }
        }
    }
}

/// Spawn every order that has come due.
pub fn run(
    world: &mut World,
    path: &Path,
    scheduler: &mut WaveScheduler,
    rng: &mut ChaCha8Rng,
    next_serial: &mut u64,
    now_ms: f64,
    events: &mut Vec<BattleEvent>,
) {
    for order in scheduler.due_spawns(now_ms) {
        let definition = scheduler.definition_for(order, rng);
        let wave = match order {
            SpawnOrder::Regular { wave } | SpawnOrder::Boss { wave } => wave,
        };
        let serial = *next_serial;
        *next_serial += 1;
        let entity = world_setup::spawn_enemy(world, path, &definition, wave, serial);
        tracing::debug!(kind = ?definition.kind, wave, "enemy spawned");
        events.push(BattleEvent::EnemySpawned {
            enemy_id: entity_id(entity),
            kind: definition.kind,
            wave,
        });
    }
}
