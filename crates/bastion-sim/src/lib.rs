//! Simulation engine for BASTION.
//!
//! Owns the hecs ECS world, runs systems in a fixed order each tick,
//! and produces BattleSnapshots for a presentation layer.

pub mod battle;
pub mod combat;
pub mod engine;
pub mod handles;
pub mod merge;
pub mod path;
pub mod placement;
pub mod status;
pub mod systems;
pub mod timers;
pub mod world_setup;

pub use bastion_core as core;
pub use engine::{BattleEngine, SimConfig};
