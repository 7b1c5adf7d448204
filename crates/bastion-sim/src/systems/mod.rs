//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions that take `&mut World` (or `&World` for
//! read-only). Battle-level state is passed in explicitly by the engine.

pub mod cleanup;
pub mod movement;
pub mod population;
pub mod projectile;
pub mod snapshot;
pub mod targeting;
pub mod wave_scheduler;
