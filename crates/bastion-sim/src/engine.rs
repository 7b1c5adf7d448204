//! Battle engine: the core of the simulation.
//!
//! `BattleEngine` owns the hecs ECS world, processes queued commands at tick
//! boundaries, runs all systems in a fixed order, and produces
//! `BattleSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use bastion_core::commands::PlayerCommand;
use bastion_core::components::{GridSlot, Tower, TowerStats};
use bastion_core::constants::*;
use bastion_core::definitions::{TowerCatalog, TowerDefinition};
use bastion_core::enums::{BattlePhase, LifeState};
use bastion_core::errors::{MergeError, PathError, PlacementError, TowerError};
use bastion_core::events::BattleEvent;
use bastion_core::state::BattleSnapshot;
use bastion_core::types::{Position, SimTime};

use crate::battle::BattleState;
use crate::combat;
use crate::handles::entity_id;
use crate::merge::{self, Reserve};
use crate::path::Path;
use crate::placement::{ArenaLayout, PlacementGrid};
use crate::systems;
use crate::systems::projectile::{ChainHop, ProjectileContext};
use crate::systems::snapshot::Playback;
use crate::systems::wave_scheduler::{WaveScheduler, WaveTuning};
use crate::timers::Timeline;
use crate::world_setup;

/// Configuration for starting a new battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same battle.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    pub starting_gold: u32,
    pub population_cap: usize,
    pub arena: ArenaLayout,
    pub path_samples_per_segment: u32,
    pub waves: WaveTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            starting_gold: STARTING_GOLD,
            population_cap: DEFAULT_POPULATION_CAP,
            arena: ArenaLayout::default(),
            path_samples_per_segment: PATH_SAMPLES_PER_SEGMENT,
            waves: WaveTuning::default(),
        }
    }
}

type Listener = Box<dyn FnMut(&BattleEvent)>;

/// Registered observers. Invoked after a tick's systems have finished.
#[derive(Default)]
struct Listeners {
    enemy_death: Vec<Listener>,
    wave_complete: Vec<Listener>,
    game_over: Vec<Listener>,
    all: Vec<Listener>,
}

/// The battle engine. Owns the ECS world and all battle state.
pub struct BattleEngine {
    world: World,
    time: SimTime,
    paused: bool,
    time_scale: f64,
    rng: ChaCha8Rng,
    path: Path,
    grid: PlacementGrid,
    catalog: TowerCatalog,
    battle: BattleState,
    scheduler: WaveScheduler,
    reserve: Reserve,
    chain_hops: Timeline<ChainHop>,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<BattleEvent>,
    /// Events before this index have been credited to the battle state.
    settled_events: usize,
    next_enemy_serial: u64,
    next_tower_serial: u64,
    listeners: Listeners,
}

impl BattleEngine {
    /// Create an engine on the standard battlefield route.
    pub fn new(config: SimConfig) -> Result<Self, PathError> {
        let path = Path::tian(&config.arena, config.path_samples_per_segment)?;
        Ok(Self::with_path(config, path))
    }

    /// Create an engine on a custom route.
    pub fn with_path(config: SimConfig, path: Path) -> Self {
        let grid = PlacementGrid::new(config.arena.clone(), &path);
        Self {
            world: World::new(),
            time: SimTime::default(),
            paused: false,
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            path,
            grid,
            catalog: TowerCatalog::standard(),
            battle: BattleState::new(config.starting_gold, config.population_cap),
            scheduler: WaveScheduler::new(config.waves),
            reserve: Reserve::default(),
            chain_hops: Timeline::new(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            settled_events: 0,
            next_enemy_serial: 0,
            next_tower_serial: 0,
            listeners: Listeners::default(),
        }
    }

    /// Replace the tower catalog used for placement and merges.
    pub fn with_catalog(mut self, catalog: TowerCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one fixed tick and return the resulting snapshot.
    pub fn tick(&mut self) -> BattleSnapshot {
        self.step(DT_MS)
    }

    /// Advance the simulation by an arbitrary delta.
    pub fn advance(&mut self, delta_ms: f64) -> BattleSnapshot {
        self.step(delta_ms)
    }

    // --- Listeners ---

    /// Called once per enemy whose health reached zero.
    pub fn on_enemy_death(&mut self, listener: impl FnMut(&BattleEvent) + 'static) {
        self.listeners.enemy_death.push(Box::new(listener));
    }

    /// Called when a wave ends, by timer or skip.
    pub fn on_wave_complete(&mut self, listener: impl FnMut(&BattleEvent) + 'static) {
        self.listeners.wave_complete.push(Box::new(listener));
    }

    /// Called once, when the battle is lost.
    pub fn on_game_over(&mut self, listener: impl FnMut(&BattleEvent) + 'static) {
        self.listeners.game_over.push(Box::new(listener));
    }

    /// Called for every event.
    pub fn subscribe(&mut self, listener: impl FnMut(&BattleEvent) + 'static) {
        self.listeners.all.push(Box::new(listener));
    }

    // --- Direct calls ---

    /// Place a tower from the catalog at the grid cell containing `position`.
    pub fn place_tower(
        &mut self,
        definition_id: &str,
        position: Position,
    ) -> Result<Entity, PlacementError> {
        let definition = self
            .catalog
            .get(definition_id)
            .cloned()
            .ok_or_else(|| PlacementError::UnknownDefinition(definition_id.to_string()))?;
        let slot = self.grid.check(&position)?;
        let centre = self.grid.cell_centre(slot);

        let serial = self.next_tower_serial;
        self.next_tower_serial += 1;
        let entity = world_setup::spawn_tower(
            &mut self.world,
            &definition,
            centre,
            Some(slot),
            serial,
        );
        self.grid.occupy(slot, entity);

        tracing::debug!(definition = definition_id, col = slot.col, row = slot.row, "tower placed");
        self.events.push(BattleEvent::TowerPlaced {
            tower_id: entity_id(entity),
            definition_id: definition.id,
            col: slot.col,
            row: slot.row,
        });
        Ok(entity)
    }

    /// Sell a tower. Returns the gold refunded.
    pub fn sell_tower(&mut self, tower: Entity) -> Result<u32, TowerError> {
        let level = self
            .world
            .get::<&Tower>(tower)
            .map(|t| t.level)
            .map_err(|_| TowerError::UnknownTower(entity_id(tower)))?;
        let refund = (SELL_REFUND_BASE + level as f64 * SELL_REFUND_PER_LEVEL).floor() as u32;

        if let Ok(slot) = self.world.get::<&GridSlot>(tower).map(|s| *s) {
            self.grid.release(slot);
        }
        let _ = self.world.despawn(tower);
        self.battle.refund(refund);

        tracing::debug!(tower = entity_id(tower), refund, "tower sold");
        self.events.push(BattleEvent::TowerSold {
            tower_id: entity_id(tower),
            refund,
        });
        Ok(refund)
    }

    /// Raise a tower's level: +50% damage (floored), +20 range, -100 ms cooldown.
    /// Returns the new level.
    pub fn upgrade_tower(&mut self, tower: Entity) -> Result<u32, TowerError> {
        let (tower_data, stats) = self
            .world
            .query_one_mut::<(&mut Tower, &mut TowerStats)>(tower)
            .map_err(|_| TowerError::UnknownTower(entity_id(tower)))?;
        let damage_gain = (stats.damage() * UPGRADE_DAMAGE_FACTOR).floor();
        tower_data.level += 1;
        stats.damage_bonus += damage_gain;
        stats.range_bonus += UPGRADE_RANGE_BONUS;
        stats.attack_speed_bonus_ms += UPGRADE_ATTACK_SPEED_BONUS_MS;
        tracing::debug!(tower = entity_id(tower), level = tower_data.level, "tower upgraded");
        Ok(tower_data.level)
    }

    /// Add flat bonuses to a tower (modifier cards).
    pub fn apply_tower_bonus(
        &mut self,
        tower: Entity,
        damage: f64,
        range: f64,
        attack_speed_ms: f64,
    ) -> Result<(), TowerError> {
        let stats = self
            .world
            .query_one_mut::<&mut TowerStats>(tower)
            .map_err(|_| TowerError::UnknownTower(entity_id(tower)))?;
        stats.damage_bonus += damage;
        stats.range_bonus += range;
        stats.attack_speed_bonus_ms += attack_speed_ms;
        Ok(())
    }

    /// Put a tower card in the reserve.
    pub fn add_tower_card(&mut self, definition_id: &str) -> Result<(), MergeError> {
        if self.catalog.get(definition_id).is_none() {
            return Err(MergeError::UnknownDefinition(definition_id.to_string()));
        }
        self.reserve.add(definition_id);
        Ok(())
    }

    /// Merge five copies of a tower into one of the next rarity tier.
    pub fn request_merge_upgrade(
        &mut self,
        definition_id: &str,
    ) -> Result<TowerDefinition, MergeError> {
        merge::merge_upgrade(
            &mut self.world,
            &mut self.grid,
            &mut self.reserve,
            &self.catalog,
            &mut self.rng,
            definition_id,
            &mut self.events,
        )
    }

    /// Heal a live enemy. Returns the amount restored.
    pub fn heal_enemy(&mut self, enemy: Entity, amount: f64) -> f64 {
        combat::heal_enemy(&mut self.world, enemy, amount)
    }

    /// Resolve an external id back to an entity handle.
    pub fn entity(&self, id: u64) -> Option<Entity> {
        Entity::from_bits(id).filter(|e| self.world.contains(*e))
    }

    // --- Accessors ---

    pub fn phase(&self) -> BattlePhase {
        self.battle.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn battle(&self) -> &BattleState {
        &self.battle
    }

    pub fn scheduler(&self) -> &WaveScheduler {
        &self.scheduler
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    pub fn catalog(&self) -> &TowerCatalog {
        &self.catalog
    }

    pub fn reserve(&self) -> &Reserve {
        &self.reserve
    }

    pub fn pending_chain_hops(&self) -> usize {
        self.chain_hops.len()
    }

    // --- Test helpers ---

    /// Spawn an enemy at the start of the route, bypassing the scheduler.
    #[cfg(test)]
    pub fn spawn_test_enemy(
        &mut self,
        definition: &bastion_core::definitions::EnemyDefinition,
    ) -> Entity {
        let serial = self.next_enemy_serial;
        self.next_enemy_serial += 1;
        world_setup::spawn_enemy(&mut self.world, &self.path, definition, 0, serial)
    }

    /// Spawn an enemy at an arbitrary position.
    #[cfg(test)]
    pub fn spawn_test_enemy_at(
        &mut self,
        definition: &bastion_core::definitions::EnemyDefinition,
        position: Position,
    ) -> Entity {
        let entity = self.spawn_test_enemy(definition);
        if let Ok(mut pos) = self.world.get::<&mut Position>(entity) {
            *pos = position;
        }
        entity
    }

    /// Spawn a tower anywhere, bypassing the grid.
    #[cfg(test)]
    pub fn spawn_test_tower(&mut self, definition: &TowerDefinition, position: Position) -> Entity {
        let serial = self.next_tower_serial;
        self.next_tower_serial += 1;
        world_setup::spawn_tower(&mut self.world, definition, position, None, serial)
    }

    /// Damage an enemy outside the tick, as a projectile would.
    #[cfg(test)]
    pub fn damage_enemy(&mut self, enemy: Entity, amount: f64) -> combat::DamageOutcome {
        combat::damage_enemy(&mut self.world, enemy, amount, &mut self.events)
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn battle_mut(&mut self) -> &mut BattleState {
        &mut self.battle
    }

    // --- Tick ---

    fn step(&mut self, delta_ms: f64) -> BattleSnapshot {
        self.process_commands();

        let delta_ms = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };
        if !self.paused && !self.battle.is_game_over() && delta_ms > 0.0 {
            self.run_systems(delta_ms);
            self.time.advance_by(delta_ms);
        }

        let events = std::mem::take(&mut self.events);
        self.settled_events = 0;
        self.notify(&events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            Playback {
                paused: self.paused,
                time_scale: self.time_scale,
            },
            &self.battle,
            &self.scheduler,
            &self.reserve,
            events,
        )
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        let now = self.time.elapsed_ms;
        match command {
            PlayerCommand::StartWave => {
                if self.battle.phase == BattlePhase::Idle {
                    self.scheduler
                        .start_wave(1, now, &mut self.battle, &mut self.events);
                }
            }
            PlayerCommand::SkipWave => {
                self.scheduler.skip(now, &mut self.battle, &mut self.events);
            }
            PlayerCommand::Pause => {
                if !self.battle.is_game_over() {
                    self.paused = true;
                }
            }
            PlayerCommand::Resume => {
                self.paused = false;
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = if scale.is_finite() {
                    scale.clamp(0.0, 4.0)
                } else {
                    1.0
                };
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, delta_ms: f64) {
        let now = self.time.elapsed_ms;

        // 1. Towers: revalidate, acquire, fire
        systems::targeting::run(&mut self.world, now, &mut self.events);
        // 2. Enemies: movement, status decay, damage over time
        systems::movement::run(&mut self.world, &self.path, delta_ms, &mut self.events);
        // 3. Projectiles: chain hops, homing, impacts
        systems::projectile::run(
            &mut self.world,
            ProjectileContext {
                chain_hops: &mut self.chain_hops,
                now_ms: now,
                delta_ms,
                bounds: self.grid.layout().half_size() + PROJECTILE_BOUNDS_MARGIN,
                events: &mut self.events,
            },
        );
        // 4. Reap dead enemies and spent projectiles
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        // 5. Scheduler bookkeeping: rewards, population, wave timer, spawns
        self.settle_events();
        if systems::population::run(&self.world, &mut self.battle, delta_ms, &mut self.events) {
            self.game_over();
            return;
        }
        if self.battle.phase == BattlePhase::WaveActive {
            self.scheduler
                .advance_timer(delta_ms, now, &mut self.battle, &mut self.events);
            systems::wave_scheduler::run(
                &mut self.world,
                &self.path,
                &mut self.scheduler,
                &mut self.rng,
                &mut self.next_enemy_serial,
                now,
                &mut self.events,
            );
        }
    }

    /// Credit kills and leaks emitted since the last settlement.
    fn settle_events(&mut self) {
        for event in &self.events[self.settled_events..] {
            match event {
                BattleEvent::EnemyKilled { gold, score, .. } => {
                    self.battle.credit_kill(*gold, *score);
                }
                BattleEvent::EnemyReachedBase { damage, .. } => {
                    self.battle.record_leak(*damage);
                }
                _ => {}
            }
        }
        self.settled_events = self.events.len();
    }

    /// Freeze every enemy without rewards, stop all timelines and end the battle.
    fn game_over(&mut self) {
        for (_entity, life) in self.world.query_mut::<&mut LifeState>() {
            if life.is_alive() {
                *life = LifeState::Culled;
            }
        }
        self.scheduler.cancel_all();
        self.chain_hops.clear();
        self.battle.warning = None;
        self.battle.phase = BattlePhase::GameOver;

        tracing::info!(
            score = self.battle.score,
            wave = self.scheduler.wave(),
            "game over"
        );
        self.events.push(BattleEvent::GameOver {
            score: self.battle.score,
            wave: self.scheduler.wave(),
        });
    }

    fn notify(&mut self, events: &[BattleEvent]) {
        for event in events {
            let targeted = match event {
                BattleEvent::EnemyKilled { .. } => Some(&mut self.listeners.enemy_death),
                BattleEvent::WaveCompleted { .. } => Some(&mut self.listeners.wave_complete),
                BattleEvent::GameOver { .. } => Some(&mut self.listeners.game_over),
                _ => None,
            };
            if let Some(listeners) = targeted {
                for listener in listeners.iter_mut() {
                    listener(event);
                }
            }
            for listener in self.listeners.all.iter_mut() {
                listener(event);
            }
        }
    }
}
